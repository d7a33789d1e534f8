//! Academic hierarchy builder and validation engine.
//!
//! A curriculum is a forest of `Program → Phase → Block` trees. Mutations
//! return new snapshots, views and validation are recomputed from them, and
//! expansion/rename state is reconciled whenever nodes disappear.
//!
//! ```
//! use curriculum_tree::application::{default_seed, SeedShape};
//! use curriculum_tree::domain::{insert, validate, NodeId, NodeKind};
//!
//! let forest = default_seed(&SeedShape::default());
//! let (forest, _block) = insert(&forest, &NodeId::from("phase-1"), NodeKind::Block).unwrap();
//! assert!(validate(&forest).is_valid());
//! ```

pub mod application;
pub mod cli;
pub mod config;
pub mod domain;
pub mod exitcode;
pub mod util;
