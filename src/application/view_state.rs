//! Expansion and rename-mode state for a tree view
//!
//! Ephemeral and never persisted. Keyed by node id, so it has to be
//! reconciled whenever ids leave the forest.

use std::collections::{BTreeSet, HashSet};

use tracing::trace;

use crate::domain::{walk, NodeId, NodeKind, TreeNode};

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ViewState {
    expanded: BTreeSet<NodeId>,
    editing: Option<NodeId>,
}

impl ViewState {
    pub fn new() -> Self {
        Self::default()
    }

    /// Every program and phase of `forest` expanded, nothing in rename mode.
    pub fn expanded_to_phases(forest: &[TreeNode]) -> Self {
        Self {
            expanded: walk(forest)
                .filter(|node| node.kind != NodeKind::Block)
                .map(|node| node.id.clone())
                .collect(),
            editing: None,
        }
    }

    pub fn is_expanded(&self, id: &NodeId) -> bool {
        self.expanded.contains(id)
    }

    pub fn expanded(&self) -> impl Iterator<Item = &NodeId> {
        self.expanded.iter()
    }

    pub fn expand(&mut self, id: NodeId) {
        self.expanded.insert(id);
    }

    pub fn collapse(&mut self, id: &NodeId) {
        self.expanded.remove(id);
    }

    /// Flip expansion of `id`; returns whether it is now expanded.
    pub fn toggle(&mut self, id: &NodeId) -> bool {
        if self.expanded.remove(id) {
            false
        } else {
            self.expanded.insert(id.clone());
            true
        }
    }

    pub fn editing(&self) -> Option<&NodeId> {
        self.editing.as_ref()
    }

    /// Put `id` in rename mode, replacing any previous one.
    pub fn begin_edit(&mut self, id: NodeId) {
        self.editing = Some(id);
    }

    pub fn finish_edit(&mut self) {
        self.editing = None;
    }

    /// Drop every id in `removed` from both the expansion set and the
    /// edit pointer.
    pub fn reconcile_removed(&mut self, removed: &[NodeId]) {
        let removed: HashSet<&NodeId> = removed.iter().collect();
        self.expanded.retain(|id| !removed.contains(id));
        if self
            .editing
            .as_ref()
            .is_some_and(|id| removed.contains(id))
        {
            self.editing = None;
        }
        trace!("reconciled {} removed ids", removed.len());
    }

    /// Drop every id that is not present in `forest`.
    pub fn retain_live(&mut self, forest: &[TreeNode]) {
        let live: HashSet<&NodeId> = walk(forest).map(|node| &node.id).collect();
        self.expanded.retain(|id| live.contains(id));
        if self.editing.as_ref().is_some_and(|id| !live.contains(id)) {
            self.editing = None;
        }
    }

    /// Forget everything; used on full-forest replacement.
    pub fn reset(&mut self) {
        self.expanded.clear();
        self.editing = None;
    }
}
