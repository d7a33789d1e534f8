//! Domain layer: hierarchy model, mutations, views and validation
//!
//! This layer is independent of external concerns (no I/O, no CLI, no config loading).

pub mod aggregate;
pub mod arena;
pub mod entities;
pub mod error;
pub mod mutation;
pub mod render;
pub mod validation;

pub use aggregate::{blocks_per_phase, count_by_kind, depth, flatten_blocks, BlockRef, NodeCounts};
pub use arena::{ArenaNode, HierarchyArena};
pub use entities::{
    contains, duplicate_ids, find, walk, Applied, Command, Forest, NodeId, NodeKind, TreeNode,
};
pub use error::{DomainError, DomainResult};
pub use mutation::{
    apply, apply_with, delete, delete_with, insert, insert_root, rename, DeletePolicy,
};
pub use render::ToTermTree;
pub use validation::{validate, validate_with, ValidationResult, ValidationRules, ROOT_NODE_ID};
