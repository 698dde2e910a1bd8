use crate::attributes::{AttributeTree, NodeId, NodeKind, Rating, TreeError, Value};
use crate::evaluator::{evaluate_attribute, AttributeOutcome};
use crate::features::RatingSettings;
use crate::ladders::{evaluate_ladder, validate_ladders, LadderError, LadderType};
use crate::score::{weighted_score, ScoreError, WeightedScore};
use crate::wallet::{BaseWallet, OverallScore, RatedAttributeTree, RatedNode, RatedWallet};
use std::collections::BTreeMap;
use tracing::debug;

#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum RatingError {
    #[error("invalid attribute tree: {0}")]
    Tree(#[from] TreeError),
    #[error("invalid ladder definition: {0}")]
    Ladder(#[from] LadderError),
    #[error("cannot aggregate group `{node}`: {source}")]
    Score {
        node: String,
        #[source]
        source: ScoreError,
    },
}

/// Rates wallets against a validated attribute tree and the stage ladders.
#[derive(Debug, Clone)]
pub struct RatingEngine {
    settings: RatingSettings,
    tree: AttributeTree,
}

impl RatingEngine {
    pub fn new(settings: RatingSettings) -> Result<Self, RatingError> {
        Self::with_tree(settings, AttributeTree::standard())
    }

    pub fn with_tree(settings: RatingSettings, tree: AttributeTree) -> Result<Self, RatingError> {
        tree.validate()?;
        validate_ladders(&tree)?;
        Ok(Self { settings, tree })
    }

    pub fn settings(&self) -> &RatingSettings {
        &self.settings
    }

    pub fn tree(&self) -> &AttributeTree {
        &self.tree
    }

    pub fn rate_wallet(&self, wallet: &BaseWallet) -> Result<RatedWallet, RatingError> {
        let mut nodes = Vec::with_capacity(self.tree.len());
        self.rate_node(wallet, self.tree.root(), None, &mut nodes)?;
        let tree = RatedAttributeTree::from_nodes(nodes);

        let ladders: BTreeMap<_, _> = LadderType::ordered()
            .into_iter()
            .map(|ladder_type| {
                (
                    ladder_type,
                    evaluate_ladder(ladder_type.ladder(), &tree, &wallet.variants),
                )
            })
            .collect();

        let root = tree.root();
        let overall = OverallScore {
            score: root.value.score(),
            has_unrated_component: root.has_unrated_component,
        };
        debug!(
            wallet = %wallet.metadata.id,
            rating = %root.value.rating,
            score = ?overall.score,
            "wallet rated"
        );

        Ok(RatedWallet {
            metadata: wallet.metadata.clone(),
            variants: wallet.variants.clone(),
            wallet_types: wallet.variants.wallet_types(),
            primary_type: wallet.variants.primary_type(),
            tree,
            overall,
            ladders,
        })
    }

    /// Appends `definition` and its descendants to `nodes` in pre-order.
    /// Returns `None` when the node is dropped from this wallet's tree.
    fn rate_node(
        &self,
        wallet: &BaseWallet,
        definition: NodeId,
        parent: Option<NodeId>,
        nodes: &mut Vec<RatedNode>,
    ) -> Result<Option<NodeId>, RatingError> {
        let node = self.tree.node(definition);

        if let NodeKind::Attribute(id) = node.kind {
            let AttributeOutcome::Rated { value, per_variant } =
                evaluate_attribute(id.attribute(), wallet, &self.settings)
            else {
                return Ok(None);
            };
            let position = NodeId::new(nodes.len());
            nodes.push(RatedNode {
                key: node.key.clone(),
                display_name: node.display_name.clone(),
                weight: node.weight,
                parent,
                children: Vec::new(),
                kind: node.kind,
                has_unrated_component: value.rating == Rating::Unrated,
                value,
                per_variant,
            });
            return Ok(Some(position));
        }

        let position = NodeId::new(nodes.len());
        nodes.push(RatedNode {
            key: node.key.clone(),
            display_name: node.display_name.clone(),
            weight: node.weight,
            parent,
            children: Vec::new(),
            kind: node.kind,
            value: Value::new(node.key.clone(), Rating::Unrated, node.display_name.clone(), ""),
            per_variant: BTreeMap::new(),
            has_unrated_component: false,
        });

        let mut children = Vec::with_capacity(node.children.len());
        for child in &node.children {
            if let Some(rated) = self.rate_node(wallet, *child, Some(position), nodes)? {
                children.push(rated);
            }
        }

        let (value, has_unrated_component) =
            aggregate_group(&node.key, &node.display_name, &children, nodes, wallet)?;
        let group = &mut nodes[position.index()];
        group.children = children;
        group.value = value;
        group.has_unrated_component = has_unrated_component;
        Ok(Some(position))
    }
}

/// Weighted value of a group from its rated children. Exempt and
/// zero-weight children do not count; a group with nothing left is exempt.
fn aggregate_group(
    key: &str,
    display_name: &str,
    children: &[NodeId],
    nodes: &[RatedNode],
    wallet: &BaseWallet,
) -> Result<(Value, bool), RatingError> {
    let counted: Vec<&RatedNode> = children
        .iter()
        .map(|child| &nodes[child.index()])
        .filter(|child| child.value.rating != Rating::Exempt && child.weight > 0.0)
        .collect();

    if counted.is_empty() {
        let value = Value::new(
            key,
            Rating::Exempt,
            display_name,
            format!(
                "Nothing in {display_name} applies to {}.",
                wallet.metadata.display_name
            ),
        );
        return Ok((value, false));
    }

    let scores: Vec<WeightedScore> = counted
        .iter()
        .map(|child| WeightedScore::new(child.value.score(), child.weight))
        .collect();
    let score = weighted_score(&scores).map_err(|source| RatingError::Score {
        node: key.to_string(),
        source,
    })?;

    let unrated = counted
        .iter()
        .filter(|child| child.value.rating == Rating::Unrated)
        .count();
    let details = match unrated {
        0 => format!("All {} rated components counted.", counted.len()),
        unrated => format!(
            "{unrated} of {} components are not rated yet and count as zero.",
            counted.len()
        ),
    };
    let has_unrated_component = counted.iter().any(|child| child.has_unrated_component);

    Ok((
        Value::aggregate(key, score, display_name, details),
        has_unrated_component,
    ))
}

/// One-off rating with a freshly validated engine.
pub fn rate_wallet(wallet: &BaseWallet, settings: &RatingSettings) -> Result<RatedWallet, RatingError> {
    RatingEngine::new(*settings)?.rate_wallet(wallet)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::attributes::AttributeId;
    use crate::features::{Feature, License, Licensing, WalletFeatures};
    use crate::ladders::LadderStage;
    use crate::variants::{Variant, VariantSet};
    use crate::wallet::WalletMetadata;
    use chrono::NaiveDate;

    fn settings() -> RatingSettings {
        RatingSettings::new(NaiveDate::from_ymd_opt(2025, 1, 1).expect("valid date"))
    }

    fn wallet(variants: &[Variant], features: WalletFeatures) -> BaseWallet {
        BaseWallet {
            metadata: WalletMetadata::new("sample", "Sample"),
            variants: VariantSet::new(variants.iter().copied()).expect("non-empty variants"),
            features,
        }
    }

    #[test]
    fn unresearched_wallet_is_unrated_everywhere() {
        let engine = RatingEngine::new(settings()).expect("engine builds");
        let rated = engine
            .rate_wallet(&wallet(&[Variant::Mobile], WalletFeatures::default()))
            .expect("wallet rates");

        assert_eq!(rated.overall.score, None);
        assert!(rated.overall.has_unrated_component);
        assert_eq!(rated.overall_rating(), Rating::Unrated);
        assert_eq!(
            rated.stage(LadderType::Software),
            LadderStage::QualifiedForNoStages
        );
        assert_eq!(rated.stage(LadderType::Hardware), LadderStage::NotApplicable);
    }

    #[test]
    fn excluded_attributes_leave_the_rated_tree() {
        let rated = rate_wallet(&wallet(&[Variant::Mobile], WalletFeatures::default()), &settings())
            .expect("wallet rates");
        assert!(rated.tree.value_of(AttributeId::BrowserIntegration).is_none());
        assert!(rated.tree.value_of(AttributeId::Interoperability).is_none());
        assert!(rated.tree.value_of(AttributeId::OpenSource).is_some());
    }

    #[test]
    fn groups_aggregate_rated_children() {
        let mut features = WalletFeatures::default();
        features.transparency.licensing = Feature::Supported(Licensing::SingleRepo {
            license: License::Mit,
            references: Vec::new(),
        });
        let rated = rate_wallet(&wallet(&[Variant::Mobile], features), &settings())
            .expect("wallet rates");

        let transparency = rated.tree.group("transparency").expect("group present");
        // Two of four equally weighted attributes pass, the rest are unrated.
        assert_eq!(transparency.value.score(), Some(0.5));
        assert_eq!(transparency.value.rating, Rating::Partial);
        assert!(transparency.has_unrated_component);
    }

    #[test]
    fn parents_point_back_at_their_group() {
        let rated = rate_wallet(&wallet(&[Variant::Browser], WalletFeatures::default()), &settings())
            .expect("wallet rates");
        for node in rated.tree.nodes() {
            for child in &node.children {
                let child = rated.tree.node(*child);
                let parent = child.parent.expect("child has a parent");
                assert_eq!(rated.tree.node(parent).key, node.key);
            }
        }
    }

    #[test]
    fn groups_with_only_exempt_children_are_exempt() {
        let rated = rate_wallet(&wallet(&[Variant::Hardware], WalletFeatures::default()), &settings())
            .expect("wallet rates");
        let ecosystem = rated.tree.group("ecosystem").expect("group present");
        assert_eq!(ecosystem.value.rating, Rating::Exempt);
        assert_eq!(ecosystem.value.score(), None);
        assert!(!ecosystem.has_unrated_component);
    }

    #[test]
    fn custom_trees_must_cover_ladder_attributes() {
        let mut builder = AttributeTree::builder("root", "Root");
        let root = builder.root();
        let transparency = builder.group(root, "transparency", "Transparency", 1.0);
        builder.attribute(transparency, AttributeId::SourceVisibility, 1.0);
        assert!(matches!(
            RatingEngine::with_tree(settings(), builder.build()),
            Err(RatingError::Ladder(LadderError::UnknownAttribute { .. }))
        ));
    }
}
