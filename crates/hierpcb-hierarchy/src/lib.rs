//! Hierarchical instance tree and enforcement selection.
//!
//! A footprint's final placement is decided by at most one job: the one for
//! the shallowest selected instance containing it. Selections where one
//! enabled path contains another are rejected rather than resolved.

mod error;
mod jobs;
mod path;
mod selection;
mod tree;

pub use error::HierarchyError;
pub use jobs::{plan_jobs, resolve_selection, EnforcementJob, DEFAULT_GROUP_PREFIX};
pub use path::SheetPath;
pub use selection::{reset_to_default, reset_to_default_where, EnforcementSelection, SelectionEntry};
pub use tree::{Hierarchy, HierarchyNode, SubLayoutBinding};
