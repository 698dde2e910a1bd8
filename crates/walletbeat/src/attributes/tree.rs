use super::{AttributeId, Category};
use serde::Serialize;
use std::collections::{BTreeMap, BTreeSet};

/// Index of a node inside one tree arena.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
#[serde(transparent)]
pub struct NodeId(usize);

impl NodeId {
    pub(crate) const fn new(index: usize) -> Self {
        Self(index)
    }

    pub const fn index(self) -> usize {
        self.0
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum NodeKind {
    Group,
    Attribute(AttributeId),
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TreeNode {
    pub key: String,
    pub display_name: String,
    pub weight: f64,
    pub parent: Option<NodeId>,
    pub children: Vec<NodeId>,
    pub kind: NodeKind,
}

/// Definitional defects in an attribute tree.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum TreeError {
    #[error("attribute `{0}` appears more than once in the tree")]
    DuplicateAttribute(AttributeId),
    #[error("node `{key}` has invalid weight {weight}")]
    InvalidWeight { key: String, weight: f64 },
    #[error("group `{key}` has no children")]
    EmptyGroup { key: String },
    #[error("every child of group `{key}` has zero weight")]
    ZeroWeightGroup { key: String },
    #[error("attribute `{key}` is used as a parent")]
    AttributeAsParent { key: String },
}

/// Arena of attribute groups and leaves, rooted at node 0.
#[derive(Debug, Clone, PartialEq)]
pub struct AttributeTree {
    nodes: Vec<TreeNode>,
    index: BTreeMap<AttributeId, NodeId>,
}

impl AttributeTree {
    pub fn builder(root_key: impl Into<String>, display_name: impl Into<String>) -> TreeBuilder {
        TreeBuilder {
            nodes: vec![TreeNode {
                key: root_key.into(),
                display_name: display_name.into(),
                weight: 1.0,
                parent: None,
                children: Vec::new(),
                kind: NodeKind::Group,
            }],
        }
    }

    /// Root with one group per category, each attribute weighted equally.
    pub fn standard() -> Self {
        let mut builder = Self::builder("root", "Overall");
        let root = builder.root();
        for category in Category::ordered() {
            let group = builder.group(root, category.key(), category.label(), 1.0);
            for id in category.attributes() {
                builder.attribute(group, id, 1.0);
            }
        }
        builder.build()
    }

    pub fn root(&self) -> NodeId {
        NodeId(0)
    }

    pub fn node(&self, id: NodeId) -> &TreeNode {
        &self.nodes[id.0]
    }

    pub fn children(&self, id: NodeId) -> &[NodeId] {
        &self.nodes[id.0].children
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    /// Never true: a tree always has its root.
    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    pub fn find(&self, id: AttributeId) -> Option<NodeId> {
        self.index.get(&id).copied()
    }

    pub fn contains(&self, id: AttributeId) -> bool {
        self.index.contains_key(&id)
    }

    /// Attribute ids in depth-first order.
    pub fn attributes(&self) -> Vec<AttributeId> {
        let mut out = Vec::new();
        let mut stack = vec![self.root()];
        while let Some(id) = stack.pop() {
            let node = self.node(id);
            if let NodeKind::Attribute(attribute) = node.kind {
                out.push(attribute);
            }
            stack.extend(node.children.iter().rev().copied());
        }
        out
    }

    pub fn validate(&self) -> Result<(), TreeError> {
        let mut seen = BTreeSet::new();
        for node in &self.nodes {
            if !node.weight.is_finite() || node.weight < 0.0 {
                return Err(TreeError::InvalidWeight {
                    key: node.key.clone(),
                    weight: node.weight,
                });
            }

            match node.kind {
                NodeKind::Attribute(id) => {
                    if !seen.insert(id) {
                        return Err(TreeError::DuplicateAttribute(id));
                    }
                    if !node.children.is_empty() {
                        return Err(TreeError::AttributeAsParent {
                            key: node.key.clone(),
                        });
                    }
                }
                NodeKind::Group => {
                    if node.children.is_empty() {
                        return Err(TreeError::EmptyGroup {
                            key: node.key.clone(),
                        });
                    }
                    let all_zero = node
                        .children
                        .iter()
                        .all(|child| self.node(*child).weight == 0.0);
                    if all_zero {
                        return Err(TreeError::ZeroWeightGroup {
                            key: node.key.clone(),
                        });
                    }
                }
            }
        }
        Ok(())
    }
}

/// Incremental construction of an [`AttributeTree`]. Structural checks
/// happen in [`AttributeTree::validate`].
#[derive(Debug, Clone)]
pub struct TreeBuilder {
    nodes: Vec<TreeNode>,
}

impl TreeBuilder {
    pub fn root(&self) -> NodeId {
        NodeId(0)
    }

    pub fn group(
        &mut self,
        parent: NodeId,
        key: impl Into<String>,
        display_name: impl Into<String>,
        weight: f64,
    ) -> NodeId {
        self.push(parent, key.into(), display_name.into(), weight, NodeKind::Group)
    }

    pub fn attribute(&mut self, parent: NodeId, id: AttributeId, weight: f64) -> NodeId {
        self.push(
            parent,
            id.as_str().to_string(),
            id.attribute().display_name.to_string(),
            weight,
            NodeKind::Attribute(id),
        )
    }

    fn push(
        &mut self,
        parent: NodeId,
        key: String,
        display_name: String,
        weight: f64,
        kind: NodeKind,
    ) -> NodeId {
        let id = NodeId(self.nodes.len());
        self.nodes.push(TreeNode {
            key,
            display_name,
            weight,
            parent: Some(parent),
            children: Vec::new(),
            kind,
        });
        self.nodes[parent.0].children.push(id);
        id
    }

    pub fn build(self) -> AttributeTree {
        let mut index = BTreeMap::new();
        for (position, node) in self.nodes.iter().enumerate() {
            if let NodeKind::Attribute(id) = node.kind {
                index.entry(id).or_insert(NodeId(position));
            }
        }
        AttributeTree {
            nodes: self.nodes,
            index,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn standard_tree_is_valid_and_complete() {
        let tree = AttributeTree::standard();
        tree.validate().expect("standard tree validates");
        assert_eq!(tree.attributes(), AttributeId::ALL.to_vec());
        assert_eq!(tree.children(tree.root()).len(), Category::ordered().len());
        for id in AttributeId::ALL {
            let node = tree.find(id).expect("attribute present");
            let parent = tree.node(node).parent.expect("leaf has a parent");
            assert_eq!(tree.node(parent).key, id.category().key());
        }
    }

    #[test]
    fn duplicate_attributes_are_rejected() {
        let mut builder = AttributeTree::builder("root", "Root");
        let root = builder.root();
        let group = builder.group(root, "security", "Security", 1.0);
        builder.attribute(group, AttributeId::SecurityAudits, 1.0);
        builder.attribute(group, AttributeId::SecurityAudits, 1.0);
        assert_eq!(
            builder.build().validate(),
            Err(TreeError::DuplicateAttribute(AttributeId::SecurityAudits))
        );
    }

    #[test]
    fn weights_must_be_finite_and_non_negative() {
        let mut builder = AttributeTree::builder("root", "Root");
        let root = builder.root();
        let group = builder.group(root, "security", "Security", 1.0);
        builder.attribute(group, AttributeId::SecurityAudits, -0.5);
        assert!(matches!(
            builder.build().validate(),
            Err(TreeError::InvalidWeight { .. })
        ));
    }

    #[test]
    fn empty_and_zero_weight_groups_are_rejected() {
        let mut builder = AttributeTree::builder("root", "Root");
        let root = builder.root();
        builder.group(root, "empty", "Empty", 1.0);
        assert_eq!(
            builder.build().validate(),
            Err(TreeError::EmptyGroup {
                key: "empty".to_string()
            })
        );

        let mut builder = AttributeTree::builder("root", "Root");
        let root = builder.root();
        let group = builder.group(root, "zero", "Zero", 1.0);
        builder.attribute(group, AttributeId::Funding, 0.0);
        assert_eq!(
            builder.build().validate(),
            Err(TreeError::ZeroWeightGroup {
                key: "zero".to_string()
            })
        );
    }

    #[test]
    fn attributes_cannot_have_children() {
        let mut builder = AttributeTree::builder("root", "Root");
        let root = builder.root();
        let leaf = builder.attribute(root, AttributeId::Funding, 1.0);
        builder.group(leaf, "nested", "Nested", 1.0);
        assert_eq!(
            builder.build().validate(),
            Err(TreeError::AttributeAsParent {
                key: "funding".to_string()
            })
        );
    }
}
