//! JSON forest snapshots
//!
//! The snapshot is the only shape crossing the engine boundary: a list of
//! `{id, name, kind, children}` objects, recursively.

use std::fs;
use std::path::Path;

use tracing::{debug, instrument};

use crate::application::error_ext::{IoResultExt, JsonResultExt};
use crate::application::{ApplicationError, ApplicationResult};
use crate::domain::{duplicate_ids, Forest, TreeNode};

/// Parse a snapshot, rejecting duplicate ids.
pub fn from_json(json: &str) -> ApplicationResult<Forest> {
    let forest: Forest = serde_json::from_str(json).with_snapshot_context("parse forest")?;
    let duplicates = duplicate_ids(&forest);
    if !duplicates.is_empty() {
        return Err(ApplicationError::DuplicateIds(duplicates));
    }
    Ok(forest)
}

pub fn to_json_pretty(forest: &[TreeNode]) -> ApplicationResult<String> {
    serde_json::to_string_pretty(forest).with_snapshot_context("serialize forest")
}

#[instrument(level = "debug")]
pub fn load(path: &Path) -> ApplicationResult<Forest> {
    let content = fs::read_to_string(path).with_path_context("read snapshot", path)?;
    let forest = from_json(&content)?;
    debug!("loaded {} programs from {}", forest.len(), path.display());
    Ok(forest)
}

#[instrument(level = "debug", skip(forest))]
pub fn save(path: &Path, forest: &[TreeNode]) -> ApplicationResult<()> {
    let mut json = to_json_pretty(forest)?;
    json.push('\n');
    fs::write(path, json).with_path_context("write snapshot", path)
}
