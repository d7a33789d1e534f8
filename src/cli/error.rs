//! CLI-level errors (wraps application errors)

use thiserror::Error;

use crate::application::ApplicationError;
use crate::domain::NodeId;

/// CLI errors are the top-level error type.
/// These are what get displayed to the user.
#[derive(Error, Debug)]
pub enum CliError {
    #[error("{0}")]
    Application(#[from] ApplicationError),

    #[error("invalid arguments: {0}")]
    InvalidArgs(String),

    #[error("hierarchy is invalid: {reason} ({node_id})")]
    Invalid { reason: String, node_id: NodeId },

    #[error("cannot write output: {0}")]
    Output(#[source] std::io::Error),
}

/// Result type for CLI operations.
pub type CliResult<T> = Result<T, CliError>;

impl CliError {
    /// Get the appropriate exit code for this error.
    pub fn exit_code(&self) -> i32 {
        match self {
            CliError::InvalidArgs(_) => crate::exitcode::USAGE,
            CliError::Invalid { .. } => crate::exitcode::DATAERR,
            CliError::Output(_) => crate::exitcode::CANTCREAT,
            CliError::Application(e) => match e {
                ApplicationError::Domain(_)
                | ApplicationError::DuplicateIds(_)
                | ApplicationError::Snapshot { .. } => crate::exitcode::DATAERR,
                ApplicationError::Io { source, .. }
                    if source.kind() == std::io::ErrorKind::NotFound =>
                {
                    crate::exitcode::NOINPUT
                }
                ApplicationError::Io { .. } => crate::exitcode::IOERR,
                ApplicationError::Config { .. } => crate::exitcode::CONFIG,
            },
        }
    }
}
