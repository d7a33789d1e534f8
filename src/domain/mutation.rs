//! Hierarchy mutations
//!
//! Every operation takes a forest snapshot and returns a new one. The input
//! is never modified, so callers keep the previous snapshot for comparison.
//! Mutations only check what they need to find their target; structural
//! rules (phase/block counts, empty names) are left to validation.

use serde::{Deserialize, Serialize};
use tracing::{debug, instrument};

use crate::domain::entities::{find, Applied, Command, Forest, NodeId, NodeKind, TreeNode};
use crate::domain::error::{DomainError, DomainResult};

/// What delete does when asked to remove the only program.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum DeletePolicy {
    /// Allow it; the empty forest is reported by validation.
    #[default]
    Permissive,
    /// Refuse with [`DomainError::CannotDeleteRoot`].
    KeepLastProgram,
}

/// Append a new `kind` node under `parent_id`.
///
/// Returns the new forest and the generated id of the inserted node.
#[instrument(level = "debug", skip(forest))]
pub fn insert(
    forest: &[TreeNode],
    parent_id: &NodeId,
    kind: NodeKind,
) -> DomainResult<(Forest, NodeId)> {
    let parent = find(forest, parent_id)
        .ok_or_else(|| DomainError::NodeNotFound(parent_id.clone()))?;
    if parent.kind.child_kind() != Some(kind) {
        return Err(DomainError::InvalidRank {
            parent: parent_id.clone(),
            parent_kind: parent.kind,
            kind,
        });
    }

    let node = TreeNode::fresh(kind);
    let new_id = node.id.clone();
    let mut next = forest.to_vec();
    if let Some(target) = find_mut(&mut next, parent_id) {
        target.children.push(node);
    }
    debug!("inserted {} {} under {}", kind, new_id, parent_id);
    Ok((next, new_id))
}

/// Append a new, childless `Program` at root level.
///
/// The result is invalid until the caller adds a phase to it.
#[instrument(level = "debug", skip(forest))]
pub fn insert_root(forest: &[TreeNode]) -> (Forest, NodeId) {
    let node = TreeNode::fresh(NodeKind::Program);
    let new_id = node.id.clone();
    let mut next = forest.to_vec();
    next.push(node);
    debug!("inserted root program {}", new_id);
    (next, new_id)
}

/// Replace the name of `node_id`, verbatim.
///
/// Empty and whitespace-only names are stored as given.
#[instrument(level = "debug", skip(forest))]
pub fn rename(forest: &[TreeNode], node_id: &NodeId, new_name: &str) -> DomainResult<Forest> {
    let mut next = forest.to_vec();
    let target =
        find_mut(&mut next, node_id).ok_or_else(|| DomainError::NodeNotFound(node_id.clone()))?;
    target.name = new_name.to_string();
    Ok(next)
}

/// Remove `node_id` and its whole subtree under the default policy.
///
/// Returns the new forest and the ids that no longer exist, target first.
/// Callers holding ids in side tables must drop every one of them.
pub fn delete(forest: &[TreeNode], node_id: &NodeId) -> DomainResult<(Forest, Vec<NodeId>)> {
    delete_with(forest, node_id, DeletePolicy::default())
}

/// Like [`delete`], with an explicit [`DeletePolicy`].
#[instrument(level = "debug", skip(forest))]
pub fn delete_with(
    forest: &[TreeNode],
    node_id: &NodeId,
    policy: DeletePolicy,
) -> DomainResult<(Forest, Vec<NodeId>)> {
    let target =
        find(forest, node_id).ok_or_else(|| DomainError::NodeNotFound(node_id.clone()))?;

    if policy == DeletePolicy::KeepLastProgram
        && target.kind == NodeKind::Program
        && forest.len() == 1
        && forest[0].id == *node_id
    {
        return Err(DomainError::CannotDeleteRoot(node_id.clone()));
    }

    let removed = target.subtree_ids();
    let mut next = forest.to_vec();
    remove_first(&mut next, node_id);
    debug!("deleted {} ({} nodes)", node_id, removed.len());
    Ok((next, removed))
}

/// Apply a command under the default delete policy.
pub fn apply(forest: &[TreeNode], command: &Command) -> DomainResult<Applied> {
    apply_with(forest, command, DeletePolicy::default())
}

/// Dispatch a command to the matching mutation.
pub fn apply_with(
    forest: &[TreeNode],
    command: &Command,
    policy: DeletePolicy,
) -> DomainResult<Applied> {
    match command {
        Command::Insert { parent_id, kind } => {
            let (forest, id) = insert(forest, parent_id, *kind)?;
            Ok(Applied {
                forest,
                inserted: Some(id),
                removed: Vec::new(),
            })
        }
        Command::InsertRoot => {
            let (forest, id) = insert_root(forest);
            Ok(Applied {
                forest,
                inserted: Some(id),
                removed: Vec::new(),
            })
        }
        Command::Rename { node_id, name } => Ok(Applied {
            forest: rename(forest, node_id, name)?,
            inserted: None,
            removed: Vec::new(),
        }),
        Command::Delete { node_id } => {
            let (forest, removed) = delete_with(forest, node_id, policy)?;
            Ok(Applied {
                forest,
                inserted: None,
                removed,
            })
        }
    }
}

fn find_mut<'a>(nodes: &'a mut [TreeNode], id: &NodeId) -> Option<&'a mut TreeNode> {
    for node in nodes.iter_mut() {
        if node.id == *id {
            return Some(node);
        }
        if let Some(found) = find_mut(&mut node.children, id) {
            return Some(found);
        }
    }
    None
}

/// Remove the first node with `id` in pre-order, the same node `find` returns.
fn remove_first(nodes: &mut Vec<TreeNode>, id: &NodeId) -> bool {
    for i in 0..nodes.len() {
        if nodes[i].id == *id {
            nodes.remove(i);
            return true;
        }
        if remove_first(&mut nodes[i].children, id) {
            return true;
        }
    }
    false
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::entities::{contains, walk};

    fn seed() -> Forest {
        vec![TreeNode::new("prog-1", "Program 1", NodeKind::Program).with_children(vec![
            TreeNode::new("phase-1", "Phase 1", NodeKind::Phase).with_children(vec![
                TreeNode::new("block-1", "Block 1", NodeKind::Block),
                TreeNode::new("block-2", "Block 2", NodeKind::Block),
            ]),
            TreeNode::new("phase-2", "Phase 2", NodeKind::Phase).with_children(vec![
                TreeNode::new("block-3", "Block 3", NodeKind::Block),
            ]),
        ])]
    }

    #[test]
    fn given_phase_when_inserting_block_then_appended_with_default_name() {
        let forest = seed();
        let (next, id) = insert(&forest, &NodeId::from("phase-1"), NodeKind::Block).unwrap();

        let phase = &next[0].children[0];
        assert_eq!(phase.children.len(), 3);
        let last = phase.children.last().unwrap();
        assert_eq!(last.id, id);
        assert_eq!(last.name, "New Block");
        assert!(last.children.is_empty());
        // input untouched
        assert_eq!(forest[0].children[0].children.len(), 2);
    }

    #[test]
    fn given_program_when_inserting_block_then_invalid_rank() {
        let forest = seed();
        let err = insert(&forest, &NodeId::from("prog-1"), NodeKind::Block).unwrap_err();
        assert_eq!(
            err,
            DomainError::InvalidRank {
                parent: NodeId::from("prog-1"),
                parent_kind: NodeKind::Program,
                kind: NodeKind::Block,
            }
        );
    }

    #[test]
    fn given_block_when_inserting_anything_then_invalid_rank() {
        let forest = seed();
        for kind in [NodeKind::Program, NodeKind::Phase, NodeKind::Block] {
            let result = insert(&forest, &NodeId::from("block-1"), kind);
            assert!(matches!(result, Err(DomainError::InvalidRank { .. })));
        }
    }

    #[test]
    fn given_unknown_parent_when_inserting_then_not_found() {
        let err = insert(&seed(), &NodeId::from("nope"), NodeKind::Phase).unwrap_err();
        assert_eq!(err, DomainError::NodeNotFound(NodeId::from("nope")));
    }

    #[test]
    fn given_forest_when_inserting_root_then_program_appended_without_children() {
        let (next, id) = insert_root(&seed());
        assert_eq!(next.len(), 2);
        assert_eq!(next[1].id, id);
        assert_eq!(next[1].kind, NodeKind::Program);
        assert_eq!(next[1].name, "New Program");
        assert!(next[1].children.is_empty());
    }

    #[test]
    fn given_node_when_renaming_then_only_name_changes() {
        let forest = seed();
        let next = rename(&forest, &NodeId::from("phase-2"), "  ").unwrap();
        assert_eq!(next[0].children[1].name, "  ");
        assert_eq!(next[0].children[1].id, forest[0].children[1].id);
        assert_eq!(next[0].children[1].children, forest[0].children[1].children);
        assert_eq!(next[0].children[0], forest[0].children[0]);
    }

    #[test]
    fn given_unknown_node_when_renaming_then_not_found() {
        assert!(matches!(
            rename(&seed(), &NodeId::from("x"), "X"),
            Err(DomainError::NodeNotFound(_))
        ));
    }

    #[test]
    fn given_phase_when_deleting_then_subtree_removed_and_reported() {
        let forest = seed();
        let (next, removed) = delete(&forest, &NodeId::from("phase-1")).unwrap();
        assert_eq!(
            removed,
            vec![
                NodeId::from("phase-1"),
                NodeId::from("block-1"),
                NodeId::from("block-2")
            ]
        );
        for id in &removed {
            assert!(!contains(&next, id));
        }
        let remaining: Vec<&str> = walk(&next).map(|n| n.id.as_str()).collect();
        assert_eq!(remaining, vec!["prog-1", "phase-2", "block-3"]);
    }

    #[test]
    fn given_middle_sibling_when_deleting_then_order_of_rest_kept() {
        let forest = vec![TreeNode::new("p", "P", NodeKind::Program).with_children(vec![
            TreeNode::new("a", "A", NodeKind::Phase),
            TreeNode::new("b", "B", NodeKind::Phase),
            TreeNode::new("c", "C", NodeKind::Phase),
        ])];
        let (next, _) = delete(&forest, &NodeId::from("b")).unwrap();
        let names: Vec<&str> = next[0].children.iter().map(|n| n.name.as_str()).collect();
        assert_eq!(names, vec!["A", "C"]);
    }

    #[test]
    fn given_repeated_id_when_deleting_then_only_first_preorder_match_removed() {
        let forest = vec![
            TreeNode::new("p", "P", NodeKind::Program).with_children(vec![
                TreeNode::new("x", "Nested", NodeKind::Phase)
                    .with_children(vec![TreeNode::new("y", "Y", NodeKind::Block)]),
            ]),
            TreeNode::new("x", "Root twin", NodeKind::Program),
        ];

        let (next, removed) = delete(&forest, &NodeId::from("x")).unwrap();

        assert_eq!(removed, vec![NodeId::from("x"), NodeId::from("y")]);
        let remaining: Vec<&str> = walk(&next).map(|n| n.name.as_str()).collect();
        assert_eq!(remaining, vec!["P", "Root twin"]);
        assert_eq!(walk(&next).count() + removed.len(), walk(&forest).count());
    }

    #[test]
    fn given_only_program_when_deleting_permissively_then_forest_empty() {
        let (next, removed) = delete(&seed(), &NodeId::from("prog-1")).unwrap();
        assert!(next.is_empty());
        assert_eq!(removed.len(), 6);
    }

    #[test]
    fn given_only_program_when_deleting_strictly_then_cannot_delete_root() {
        let err = delete_with(&seed(), &NodeId::from("prog-1"), DeletePolicy::KeepLastProgram)
            .unwrap_err();
        assert_eq!(err, DomainError::CannotDeleteRoot(NodeId::from("prog-1")));
    }

    #[test]
    fn given_two_programs_when_deleting_strictly_then_allowed() {
        let (forest, extra) = insert_root(&seed());
        let (next, _) = delete_with(&forest, &extra, DeletePolicy::KeepLastProgram).unwrap();
        assert_eq!(next, seed());
    }

    #[test]
    fn given_commands_when_applying_then_dispatches() {
        let forest = seed();
        let applied = apply(
            &forest,
            &Command::Insert {
                parent_id: NodeId::from("prog-1"),
                kind: NodeKind::Phase,
            },
        )
        .unwrap();
        let new_id = applied.inserted.clone().unwrap();
        assert!(contains(&applied.forest, &new_id));
        assert!(applied.removed.is_empty());

        let applied = apply(
            &applied.forest,
            &Command::Delete {
                node_id: new_id.clone(),
            },
        )
        .unwrap();
        assert_eq!(applied.removed, vec![new_id]);
        assert_eq!(applied.forest, forest);
    }
}
