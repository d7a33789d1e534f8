//! Domain-level errors (no external dependencies)

use thiserror::Error;

use crate::domain::entities::{NodeId, NodeKind};

/// Errors returned by hierarchy mutations.
///
/// All of them leave the input forest untouched.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum DomainError {
    #[error("node not found: {0}")]
    NodeNotFound(NodeId),

    #[error("cannot insert a {kind} under {parent_kind} '{parent}'")]
    InvalidRank {
        parent: NodeId,
        parent_kind: NodeKind,
        kind: NodeKind,
    },

    /// Only raised under [`DeletePolicy::KeepLastProgram`](crate::domain::DeletePolicy).
    /// The default policy lets the last program go and leaves the empty
    /// forest to validation.
    #[error("cannot delete the only program: {0}")]
    CannotDeleteRoot(NodeId),
}

/// Result type for domain operations.
pub type DomainResult<T> = Result<T, DomainError>;
