//! Error conversion helpers for snapshot I/O
//!
//! Provides extension traits for cleaner error handling with path context.

use std::io;
use std::path::Path;

use crate::application::{ApplicationError, ApplicationResult};

/// Extension trait for converting `io::Result` to `ApplicationResult` with context.
pub trait IoResultExt<T> {
    /// Add path context to an I/O error.
    ///
    /// # Example
    /// ```ignore
    /// fs::read_to_string(path).with_path_context("read snapshot", path)?;
    /// ```
    fn with_path_context(self, action: &str, path: &Path) -> ApplicationResult<T>;
}

impl<T> IoResultExt<T> for io::Result<T> {
    fn with_path_context(self, action: &str, path: &Path) -> ApplicationResult<T> {
        self.map_err(|e| ApplicationError::Io {
            context: format!("{}: {}", action, path.display()),
            source: e,
        })
    }
}

/// Same as [`IoResultExt`] for JSON (de)serialization.
pub trait JsonResultExt<T> {
    fn with_snapshot_context(self, context: impl Into<String>) -> ApplicationResult<T>;
}

impl<T> JsonResultExt<T> for serde_json::Result<T> {
    fn with_snapshot_context(self, context: impl Into<String>) -> ApplicationResult<T> {
        self.map_err(|e| ApplicationError::Snapshot {
            context: context.into(),
            source: e,
        })
    }
}
