//! Application layer: editing session, view state and snapshots
//!
//! This layer orchestrates domain logic and owns the only file I/O.

pub mod editor;
pub mod error;
pub mod error_ext;
pub mod report;
pub mod seed;
pub mod snapshot;
pub mod view_state;

pub use editor::{EditOutcome, HierarchyEditor};
pub use error::{ApplicationError, ApplicationResult};
pub use error_ext::{IoResultExt, JsonResultExt};
pub use report::ValidationReport;
pub use seed::{default_seed, SeedShape, DEFAULT_PROGRAM_NAME};
pub use view_state::ViewState;
