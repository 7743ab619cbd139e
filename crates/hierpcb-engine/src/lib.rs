//! Layout propagation: replicate a sub-layout onto every selected
//! hierarchical instance of the main board.
//!
//! A run is `plan_jobs` (validation, no mutation), then per job
//! [`plan_job`] (pure matching and transform solving) followed by
//! [`apply_plan`] (the only step that writes to the main document).

mod anchor;
mod cache;
mod config;
mod error;
mod matcher;
mod report;
mod run;
mod store;
mod sync;

pub use anchor::{anchor_candidates, pick_anchor, AnchorCandidate};
pub use cache::SubLayoutCache;
pub use config::{EngineConfig, MissingFootprintPolicy};
pub use error::{AnchorSide, EngineError, JobError};
pub use matcher::{plan_job, PlacementPlan, PlannedFootprint};
pub use report::{JobResult, JobStatus, RunReport};
pub use run::{enforce, run};
pub use store::SelectionStore;
pub use sync::{apply_plan, SyncStats};
