use crate::attributes::{AttributeId, NodeId, NodeKind, Rating, Value};
use crate::features::WalletFeatures;
use crate::ladders::{LadderStage, LadderType, WalletLadderEvaluation};
use crate::variants::{Variant, VariantSet, WalletType};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WalletMetadata {
    pub id: String,
    pub display_name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub repo_url: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub last_updated: Option<NaiveDate>,
}

impl WalletMetadata {
    pub fn new(id: impl Into<String>, display_name: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            display_name: display_name.into(),
            url: None,
            repo_url: None,
            last_updated: None,
        }
    }
}

/// A wallet as authored by maintainers, before rating.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BaseWallet {
    pub metadata: WalletMetadata,
    pub variants: VariantSet,
    #[serde(default)]
    pub features: WalletFeatures,
}

/// Starting record for a new wallet of `wallet_type`: every variant of that
/// type, with no research filled in.
pub fn unrated_template(wallet_type: WalletType) -> BaseWallet {
    let variants = VariantSet::new(wallet_type.variants())
        .unwrap_or_else(|_| VariantSet::single(Variant::Browser));
    BaseWallet {
        metadata: WalletMetadata::new(
            format!("new_{}_wallet", wallet_type.key()),
            format!("New {}", wallet_type.label().to_lowercase()),
        ),
        variants,
        features: WalletFeatures::default(),
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RatedNode {
    pub key: String,
    pub display_name: String,
    pub weight: f64,
    pub parent: Option<NodeId>,
    pub children: Vec<NodeId>,
    pub kind: NodeKind,
    pub value: Value,
    #[serde(skip_serializing_if = "BTreeMap::is_empty")]
    pub per_variant: BTreeMap<Variant, Value>,
    /// Set when this node or any non-exempt descendant is unrated.
    pub has_unrated_component: bool,
}

/// The attribute tree with a value on every node.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RatedAttributeTree {
    nodes: Vec<RatedNode>,
    #[serde(skip)]
    index: BTreeMap<AttributeId, NodeId>,
}

impl RatedAttributeTree {
    pub(crate) fn from_nodes(nodes: Vec<RatedNode>) -> Self {
        let index = nodes
            .iter()
            .enumerate()
            .filter_map(|(position, node)| match node.kind {
                NodeKind::Attribute(id) => Some((id, NodeId::new(position))),
                NodeKind::Group => None,
            })
            .collect();
        Self { nodes, index }
    }

    pub fn root(&self) -> &RatedNode {
        &self.nodes[0]
    }

    pub fn node(&self, id: NodeId) -> &RatedNode {
        &self.nodes[id.index()]
    }

    pub fn nodes(&self) -> impl Iterator<Item = &RatedNode> {
        self.nodes.iter()
    }

    pub fn children<'a>(&'a self, node: &'a RatedNode) -> impl Iterator<Item = &'a RatedNode> {
        node.children.iter().map(|child| self.node(*child))
    }

    pub fn attribute_node(&self, id: AttributeId) -> Option<&RatedNode> {
        self.index.get(&id).map(|node| self.node(*node))
    }

    /// Reconciled value of an attribute; `None` when it was dropped.
    pub fn value_of(&self, id: AttributeId) -> Option<&Value> {
        self.attribute_node(id).map(|node| &node.value)
    }

    pub fn variant_value_of(&self, id: AttributeId, variant: Variant) -> Option<&Value> {
        self.attribute_node(id)
            .and_then(|node| node.per_variant.get(&variant))
    }

    pub fn group(&self, key: &str) -> Option<&RatedNode> {
        self.nodes
            .iter()
            .find(|node| node.kind == NodeKind::Group && node.key == key)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct OverallScore {
    pub score: Option<f64>,
    pub has_unrated_component: bool,
}

/// Rating output for one wallet.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RatedWallet {
    pub metadata: WalletMetadata,
    pub variants: VariantSet,
    pub wallet_types: BTreeSet<WalletType>,
    pub primary_type: WalletType,
    pub tree: RatedAttributeTree,
    pub overall: OverallScore,
    pub ladders: BTreeMap<LadderType, WalletLadderEvaluation>,
}

impl RatedWallet {
    pub fn stage(&self, ladder_type: LadderType) -> LadderStage {
        self.ladders
            .get(&ladder_type)
            .map_or(LadderStage::NotApplicable, |evaluation| evaluation.stage)
    }

    pub fn overall_rating(&self) -> Rating {
        self.tree.root().value.rating
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct StageLookup<'a> {
    pub ladder_type: LadderType,
    pub stage: LadderStage,
    pub evaluation: &'a WalletLadderEvaluation,
}

/// The stage to headline for a wallet: its primary type's ladder first,
/// then the first ladder that applies at all.
pub fn get_wallet_stage_and_ladder(wallet: &RatedWallet) -> Option<StageLookup<'_>> {
    let applicable = |ladder_type: LadderType| {
        wallet
            .ladders
            .get(&ladder_type)
            .filter(|evaluation| evaluation.stage != LadderStage::NotApplicable)
            .map(|evaluation| StageLookup {
                ladder_type,
                stage: evaluation.stage,
                evaluation,
            })
    };

    LadderType::for_wallet_type(wallet.primary_type)
        .and_then(applicable)
        .or_else(|| LadderType::ordered().into_iter().find_map(applicable))
}
