use std::collections::HashMap;

use generational_arena::{Arena, Index};
use tracing::instrument;

use crate::domain::entities::{NodeId, NodeKind, TreeNode};

/// Separator used when joining breadcrumb names.
pub const BREADCRUMB_SEPARATOR: &str = " › ";

/// Flattened copy of one forest node, linked to its parent by arena index.
#[derive(Debug)]
pub struct ArenaNode {
    pub id: NodeId,
    pub name: String,
    pub kind: NodeKind,
    /// Index of parent node in the arena, None for root nodes
    pub parent: Option<Index>,
}

/// Read-only index over a forest snapshot.
///
/// Built once per snapshot; gives O(1) lookup by id plus parent links,
/// which the nested [`TreeNode`] representation lacks.
#[derive(Debug, Default)]
pub struct HierarchyArena {
    arena: Arena<ArenaNode>,
    by_id: HashMap<NodeId, Index>,
}

impl HierarchyArena {
    #[instrument(level = "trace", skip(forest))]
    pub fn from_forest(forest: &[TreeNode]) -> Self {
        let mut index = Self::default();
        for root in forest {
            index.insert_subtree(root, None);
        }
        index
    }

    fn insert_subtree(&mut self, node: &TreeNode, parent: Option<Index>) {
        let idx = self.arena.insert(ArenaNode {
            id: node.id.clone(),
            name: node.name.clone(),
            kind: node.kind,
            parent,
        });
        // first occurrence wins for duplicate ids, matching `entities::find`
        self.by_id.entry(node.id.clone()).or_insert(idx);
        for child in &node.children {
            self.insert_subtree(child, Some(idx));
        }
    }

    pub fn get(&self, id: &NodeId) -> Option<&ArenaNode> {
        self.by_id.get(id).and_then(|&idx| self.arena.get(idx))
    }

    /// Nodes from the root down to `id`, inclusive. Empty if `id` is unknown.
    #[instrument(level = "trace", skip(self))]
    pub fn ancestry(&self, id: &NodeId) -> Vec<&ArenaNode> {
        let mut chain = Vec::new();
        let mut current = self.by_id.get(id).copied();
        while let Some(idx) = current {
            match self.arena.get(idx) {
                Some(node) => {
                    chain.push(node);
                    current = node.parent;
                }
                None => break,
            }
        }
        chain.reverse();
        chain
    }

    /// Names from the root down to `id`, e.g. `Doctor of Medicine › Phase 2 › Block 5`.
    pub fn breadcrumb(&self, id: &NodeId) -> Option<String> {
        let chain = self.ancestry(id);
        if chain.is_empty() {
            return None;
        }
        Some(
            chain
                .iter()
                .map(|node| node.name.as_str())
                .collect::<Vec<_>>()
                .join(BREADCRUMB_SEPARATOR),
        )
    }
}
