//! Structural validation of a forest
//!
//! Traversal is fixed: programs in order, and for each program its own
//! checks before those of its phases. Only the first violation is reported,
//! so the same forest always yields the same result.

use serde::{Deserialize, Serialize};
use tracing::{debug, instrument};

use crate::domain::entities::{NodeId, NodeKind, TreeNode};

/// Id reported when the forest itself is at fault.
pub const ROOT_NODE_ID: &str = "root";

/// Limits checked by [`validate_with`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ValidationRules {
    pub min_phases_per_program: usize,
    pub min_blocks_per_phase: usize,
    pub max_blocks_per_phase: usize,
}

impl Default for ValidationRules {
    fn default() -> Self {
        Self {
            min_phases_per_program: 1,
            min_blocks_per_phase: 1,
            max_blocks_per_phase: 20,
        }
    }
}

/// Outcome of validation; a failed check is a value, not an error.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "status", rename_all = "lowercase")]
pub enum ValidationResult {
    Valid,
    Invalid {
        reason: String,
        #[serde(rename = "nodeId")]
        node_id: NodeId,
    },
}

impl ValidationResult {
    fn invalid(reason: impl Into<String>, node_id: &NodeId) -> Self {
        Self::Invalid {
            reason: reason.into(),
            node_id: node_id.clone(),
        }
    }

    pub fn is_valid(&self) -> bool {
        matches!(self, Self::Valid)
    }

    pub fn reason(&self) -> Option<&str> {
        match self {
            Self::Valid => None,
            Self::Invalid { reason, .. } => Some(reason),
        }
    }

    pub fn node_id(&self) -> Option<&NodeId> {
        match self {
            Self::Valid => None,
            Self::Invalid { node_id, .. } => Some(node_id),
        }
    }
}

/// Validate against the default rules (1 phase minimum, 1–20 blocks per phase).
pub fn validate(forest: &[TreeNode]) -> ValidationResult {
    validate_with(forest, &ValidationRules::default())
}

#[instrument(level = "debug", skip(forest))]
pub fn validate_with(forest: &[TreeNode], rules: &ValidationRules) -> ValidationResult {
    let result = first_violation(forest, rules).unwrap_or(ValidationResult::Valid);
    debug!("validation: {:?}", result);
    result
}

fn first_violation(forest: &[TreeNode], rules: &ValidationRules) -> Option<ValidationResult> {
    if forest.is_empty() {
        return Some(ValidationResult::invalid(
            "At least one program is required",
            &NodeId::from(ROOT_NODE_ID),
        ));
    }

    for program in forest {
        if let Some(v) = wrong_rank(program, NodeKind::Program) {
            return Some(v);
        }
        for phase in &program.children {
            if let Some(v) = wrong_rank(phase, NodeKind::Phase) {
                return Some(v);
            }
        }
        if program.children.len() < rules.min_phases_per_program {
            return Some(ValidationResult::invalid(
                format!(
                    "Each program must have at least {}",
                    plural(rules.min_phases_per_program, "phase")
                ),
                &program.id,
            ));
        }

        for phase in &program.children {
            if let Some(v) = check_phase(phase, rules) {
                return Some(v);
            }
        }
    }
    None
}

fn check_phase(phase: &TreeNode, rules: &ValidationRules) -> Option<ValidationResult> {
    for block in &phase.children {
        if let Some(v) = wrong_rank(block, NodeKind::Block) {
            return Some(v);
        }
    }
    let blocks = phase.children.len();
    if blocks < rules.min_blocks_per_phase {
        return Some(ValidationResult::invalid(
            format!(
                "Each phase must have at least {}",
                plural(rules.min_blocks_per_phase, "block")
            ),
            &phase.id,
        ));
    }
    if blocks > rules.max_blocks_per_phase {
        return Some(ValidationResult::invalid(
            format!(
                "{} has more than {} blocks",
                phase.name, rules.max_blocks_per_phase
            ),
            &phase.id,
        ));
    }
    phase
        .children
        .iter()
        .find(|block| !block.children.is_empty())
        .map(|block| {
            ValidationResult::invalid(
                format!("{} is a Block and cannot have children", block.name),
                &block.id,
            )
        })
}

fn wrong_rank(node: &TreeNode, expected: NodeKind) -> Option<ValidationResult> {
    (node.kind != expected).then(|| {
        ValidationResult::invalid(
            format!(
                "{} is a {} but must be a {}",
                node.name, node.kind, expected
            ),
            &node.id,
        )
    })
}

fn plural(n: usize, noun: &str) -> String {
    if n == 1 {
        format!("{} {}", n, noun)
    } else {
        format!("{} {}s", n, noun)
    }
}
