//! Read-only views derived from a forest
//!
//! Nothing here is cached; recompute after every mutation.

use serde::{Deserialize, Serialize};
use tracing::instrument;

use crate::domain::entities::{walk, NodeId, NodeKind, TreeNode};

/// Node totals per rank.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct NodeCounts {
    pub programs: usize,
    pub phases: usize,
    pub blocks: usize,
}

impl NodeCounts {
    pub fn get(&self, kind: NodeKind) -> usize {
        match kind {
            NodeKind::Program => self.programs,
            NodeKind::Phase => self.phases,
            NodeKind::Block => self.blocks,
        }
    }

    pub fn total(&self) -> usize {
        self.programs + self.phases + self.blocks
    }

    fn bump(&mut self, kind: NodeKind) {
        match kind {
            NodeKind::Program => self.programs += 1,
            NodeKind::Phase => self.phases += 1,
            NodeKind::Block => self.blocks += 1,
        }
    }
}

/// A block as offered for course assignment, with its nearest ancestors.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BlockRef {
    pub id: NodeId,
    pub name: String,
    pub phase_id: Option<NodeId>,
    pub program_id: Option<NodeId>,
}

#[instrument(level = "trace", skip(forest))]
pub fn count_by_kind(forest: &[TreeNode]) -> NodeCounts {
    let mut counts = NodeCounts::default();
    for node in walk(forest) {
        counts.bump(node.kind);
    }
    counts
}

/// All blocks, depth-first and left-to-right across the forest.
///
/// This order is what course assignment lists, so it is part of the contract.
#[instrument(level = "trace", skip(forest))]
pub fn flatten_blocks(forest: &[TreeNode]) -> Vec<BlockRef> {
    let mut blocks = Vec::new();
    collect_blocks(forest, None, None, &mut blocks);
    blocks
}

fn collect_blocks(
    nodes: &[TreeNode],
    program: Option<&NodeId>,
    phase: Option<&NodeId>,
    out: &mut Vec<BlockRef>,
) {
    for node in nodes {
        match node.kind {
            NodeKind::Block => {
                out.push(BlockRef {
                    id: node.id.clone(),
                    name: node.name.clone(),
                    phase_id: phase.cloned(),
                    program_id: program.cloned(),
                });
                // only reachable in a malformed forest
                collect_blocks(&node.children, program, phase, out);
            }
            NodeKind::Phase => collect_blocks(&node.children, program, Some(&node.id), out),
            NodeKind::Program => collect_blocks(&node.children, Some(&node.id), phase, out),
        }
    }
}

/// Every phase with its number of children, in traversal order.
pub fn blocks_per_phase(forest: &[TreeNode]) -> Vec<(NodeId, usize)> {
    walk(forest)
        .filter(|node| node.kind == NodeKind::Phase)
        .map(|node| (node.id.clone(), node.children.len()))
        .collect()
}

/// Longest root-to-leaf path length, 0 for an empty forest.
pub fn depth(forest: &[TreeNode]) -> usize {
    forest
        .iter()
        .map(|node| 1 + depth(&node.children))
        .max()
        .unwrap_or(0)
}
