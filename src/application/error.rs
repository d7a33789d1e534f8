//! Application-level errors (wraps domain errors)

use thiserror::Error;

use crate::domain::{DomainError, NodeId};

/// Application errors wrap domain errors and add snapshot/config context.
#[derive(Error, Debug)]
pub enum ApplicationError {
    #[error("{0}")]
    Domain(#[from] DomainError),

    #[error("snapshot contains duplicate ids: {}", join_ids(.0))]
    DuplicateIds(Vec<NodeId>),

    #[error("invalid snapshot: {context}")]
    Snapshot {
        context: String,
        #[source]
        source: serde_json::Error,
    },

    #[error("I/O error: {context}")]
    Io {
        context: String,
        #[source]
        source: std::io::Error,
    },

    #[error("config error: {message}")]
    Config { message: String },
}

fn join_ids(ids: &[NodeId]) -> String {
    ids.iter()
        .map(NodeId::as_str)
        .collect::<Vec<_>>()
        .join(", ")
}

/// Result type for application layer operations.
pub type ApplicationResult<T> = Result<T, ApplicationError>;
