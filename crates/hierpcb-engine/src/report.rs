use std::fmt;

use serde::Serialize;

use crate::error::JobError;
use crate::matcher::PlacementPlan;
use crate::sync::SyncStats;
use hierpcb_board::StableId;
use hierpcb_hierarchy::{
    resolve_selection, EnforcementJob, EnforcementSelection, Hierarchy, SheetPath,
};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum JobStatus {
    Success,
    Error,
}

/// Outcome of one enforcement job.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct JobResult {
    pub path: String,
    pub human_path: String,
    pub status: JobStatus,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub anchor: Option<String>,
    pub placed_count: usize,
    pub missing_footprint_ids: Vec<String>,
    pub ignored_count: usize,
    pub copper_regen_count: usize,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub unresolved_nets: Vec<String>,
}

impl JobResult {
    pub(crate) fn success(job: &EnforcementJob, plan: &PlacementPlan, stats: &SyncStats) -> Self {
        Self {
            path: job.path.to_string(),
            human_path: job.human_path.clone(),
            status: JobStatus::Success,
            error: None,
            anchor: Some(plan.anchor.to_string()),
            placed_count: stats.placed,
            missing_footprint_ids: plan.missing.iter().map(|s| s.to_string()).collect(),
            ignored_count: plan.ignored.len(),
            copper_regen_count: stats.copper_created,
            unresolved_nets: plan.unresolved_nets.clone(),
        }
    }

    pub(crate) fn failure(job: &EnforcementJob, err: &JobError) -> Self {
        let missing_footprint_ids = match err {
            JobError::MissingFootprints { ids } => ids.iter().map(|s| s.to_string()).collect(),
            _ => Vec::new(),
        };
        Self {
            path: job.path.to_string(),
            human_path: job.human_path.clone(),
            status: JobStatus::Error,
            error: Some(err.to_string()),
            anchor: job.anchor.as_ref().map(|a| a.to_string()),
            placed_count: 0,
            missing_footprint_ids,
            ignored_count: 0,
            copper_regen_count: 0,
            unresolved_nets: Vec::new(),
        }
    }

    #[must_use]
    pub fn is_success(&self) -> bool {
        self.status == JobStatus::Success
    }
}

/// Outcome of a run, one entry per job in execution order.
#[derive(Debug, Clone, PartialEq, Default, Serialize)]
pub struct RunReport {
    pub jobs: Vec<JobResult>,
}

impl RunReport {
    #[must_use]
    pub fn is_success(&self) -> bool {
        self.jobs.iter().all(JobResult::is_success)
    }

    pub fn failed(&self) -> impl Iterator<Item = &JobResult> {
        self.jobs.iter().filter(|j| !j.is_success())
    }

    /// True when every job succeeded and nothing was reported missing.
    #[must_use]
    pub fn is_clean(&self) -> bool {
        self.is_success() && self.jobs.iter().all(|j| j.missing_footprint_ids.is_empty())
    }

    /// The selection this run actually applied: `requested` resolved against
    /// `hierarchy`, with each successful job's anchor pinned.
    #[must_use]
    pub fn selection_used(
        &self,
        hierarchy: &Hierarchy,
        requested: &EnforcementSelection,
    ) -> EnforcementSelection {
        let mut used = resolve_selection(hierarchy, requested);
        for job in self.jobs.iter().filter(|j| j.is_success()) {
            if let Some(anchor) = &job.anchor {
                let path = SheetPath::from(job.path.clone());
                used.set_anchor(&path, StableId::new(anchor.as_str()));
            }
        }
        used
    }
}

impl fmt::Display for RunReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.jobs.is_empty() {
            return writeln!(f, "No instances selected.");
        }
        for job in &self.jobs {
            match (&job.status, &job.error) {
                (JobStatus::Error, Some(error)) => {
                    writeln!(f, "{} ({}): error: {error}", job.path, job.human_path)?;
                }
                _ => {
                    writeln!(
                        f,
                        "{} ({}): {} placed, {} copper items",
                        job.path, job.human_path, job.placed_count, job.copper_regen_count
                    )?;
                }
            }
            if !job.missing_footprint_ids.is_empty() {
                writeln!(f, "  missing: {}", job.missing_footprint_ids.join(", "))?;
            }
            if !job.unresolved_nets.is_empty() {
                writeln!(f, "  unconnected nets: {}", job.unresolved_nets.join(", "))?;
            }
        }
        let failed = self.failed().count();
        write!(
            f,
            "{} job(s), {} succeeded, {} failed.",
            self.jobs.len(),
            self.jobs.len() - failed,
            failed
        )
    }
}
