//! Domain entities: hierarchy nodes, ranks, ids and edit commands

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Rank of a hierarchy element.
///
/// Variants are declared leaf first so the derived `Ord` gives
/// `Program > Phase > Block`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum NodeKind {
    Block,
    Phase,
    Program,
}

impl NodeKind {
    /// The only kind allowed directly below this one, `None` for leaves.
    pub fn child_kind(self) -> Option<NodeKind> {
        match self {
            NodeKind::Program => Some(NodeKind::Phase),
            NodeKind::Phase => Some(NodeKind::Block),
            NodeKind::Block => None,
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            NodeKind::Program => "Program",
            NodeKind::Phase => "Phase",
            NodeKind::Block => "Block",
        }
    }

    /// Lowercase form used as id prefix.
    pub fn slug(self) -> &'static str {
        match self {
            NodeKind::Program => "program",
            NodeKind::Phase => "phase",
            NodeKind::Block => "block",
        }
    }

    /// Name given to freshly inserted nodes.
    pub fn default_name(self) -> String {
        format!("New {}", self.label())
    }
}

impl fmt::Display for NodeKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Error parsing a [`NodeKind`] from text.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParseKindError {
    pub input: String,
}

impl fmt::Display for ParseKindError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "unknown node kind '{}' (expected program, phase or block)",
            self.input
        )
    }
}

impl std::error::Error for ParseKindError {}

impl FromStr for NodeKind {
    type Err = ParseKindError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "program" => Ok(NodeKind::Program),
            "phase" => Ok(NodeKind::Phase),
            "block" => Ok(NodeKind::Block),
            _ => Err(ParseKindError {
                input: s.to_string(),
            }),
        }
    }
}

/// Opaque node identifier, unique across a whole forest.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct NodeId(String);

impl NodeId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// Fresh id for a node of `kind`, e.g. `block-3f2a…`.
    ///
    /// Backed by a v4 uuid, so generated ids are never handed out twice and
    /// cannot clash with sequential seed ids like `block-1`.
    pub fn generate(kind: NodeKind) -> Self {
        Self(format!("{}-{}", kind.slug(), Uuid::new_v4().simple()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for NodeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for NodeId {
    fn from(s: &str) -> Self {
        Self(s.to_string())
    }
}

impl From<String> for NodeId {
    fn from(s: String) -> Self {
        Self(s)
    }
}

/// One element of the academic hierarchy and its ordered children.
///
/// The model itself allows empty names and wrong-rank children so edits can
/// pass through invalid intermediate states; validation reports them.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TreeNode {
    pub id: NodeId,
    pub name: String,
    pub kind: NodeKind,
    #[serde(default)]
    pub children: Vec<TreeNode>,
}

/// Ordered list of root `Program` nodes.
pub type Forest = Vec<TreeNode>;

impl TreeNode {
    pub fn new(id: impl Into<NodeId>, name: impl Into<String>, kind: NodeKind) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            kind,
            children: Vec::new(),
        }
    }

    /// Node with a generated id and the default name for its kind.
    pub fn fresh(kind: NodeKind) -> Self {
        Self::new(NodeId::generate(kind), kind.default_name(), kind)
    }

    pub fn with_children(mut self, children: Vec<TreeNode>) -> Self {
        self.children = children;
        self
    }

    /// Ids of this node and all descendants, in pre-order.
    pub fn subtree_ids(&self) -> Vec<NodeId> {
        let mut ids = Vec::new();
        collect_ids(std::slice::from_ref(self), &mut ids);
        ids
    }
}

fn collect_ids(nodes: &[TreeNode], ids: &mut Vec<NodeId>) {
    for node in nodes {
        ids.push(node.id.clone());
        collect_ids(&node.children, ids);
    }
}

/// Pre-order, left-to-right iterator over every node of a forest.
pub struct ForestIter<'a> {
    stack: Vec<&'a TreeNode>,
}

impl<'a> ForestIter<'a> {
    pub fn new(forest: &'a [TreeNode]) -> Self {
        Self {
            stack: forest.iter().rev().collect(),
        }
    }
}

impl<'a> Iterator for ForestIter<'a> {
    type Item = &'a TreeNode;

    fn next(&mut self) -> Option<Self::Item> {
        let node = self.stack.pop()?;
        // Push children in reverse order for left-to-right traversal
        self.stack.extend(node.children.iter().rev());
        Some(node)
    }
}

/// Iterate a forest in pre-order.
pub fn walk(forest: &[TreeNode]) -> ForestIter<'_> {
    ForestIter::new(forest)
}

/// First node with `id` in pre-order.
pub fn find<'a>(forest: &'a [TreeNode], id: &NodeId) -> Option<&'a TreeNode> {
    walk(forest).find(|node| node.id == *id)
}

pub fn contains(forest: &[TreeNode], id: &NodeId) -> bool {
    find(forest, id).is_some()
}

/// Ids that occur more than once, each reported once, in first-seen order.
pub fn duplicate_ids(forest: &[TreeNode]) -> Vec<NodeId> {
    let mut seen = std::collections::HashSet::new();
    let mut duplicates: Vec<NodeId> = Vec::new();
    for node in walk(forest) {
        if !seen.insert(&node.id) && !duplicates.contains(&node.id) {
            duplicates.push(node.id.clone());
        }
    }
    duplicates
}

/// An edit issued by the hosting UI.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all_fields = "camelCase")]
pub enum Command {
    Insert { parent_id: NodeId, kind: NodeKind },
    InsertRoot,
    Rename { node_id: NodeId, name: String },
    Delete { node_id: NodeId },
}

/// Outcome of applying a [`Command`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Applied {
    pub forest: Forest,
    /// Id of the node created by an insert.
    pub inserted: Option<NodeId>,
    /// Ids dropped by a delete, target first.
    pub removed: Vec<NodeId>,
}
