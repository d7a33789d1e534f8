//! Validation result enriched for display

use serde::Serialize;

use crate::domain::{
    count_by_kind, validate_with, HierarchyArena, NodeCounts, TreeNode, ValidationResult,
    ValidationRules,
};

/// What the confirmation step shows: the first violation (if any), where it
/// sits in the hierarchy, and the node totals.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ValidationReport {
    #[serde(flatten)]
    pub result: ValidationResult,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub breadcrumb: Option<String>,
    pub counts: NodeCounts,
}

impl ValidationReport {
    pub fn build(forest: &[TreeNode], rules: &ValidationRules) -> Self {
        let result = validate_with(forest, rules);
        let breadcrumb = result.node_id().and_then(|id| {
            let arena = HierarchyArena::from_forest(forest);
            arena.breadcrumb(id)
        });
        Self {
            result,
            breadcrumb,
            counts: count_by_kind(forest),
        }
    }

    pub fn is_valid(&self) -> bool {
        self.result.is_valid()
    }
}
