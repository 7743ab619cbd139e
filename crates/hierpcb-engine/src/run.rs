use hierpcb_board::{Board, BoardLoader};
use hierpcb_hierarchy::{plan_jobs, EnforcementJob, EnforcementSelection, Hierarchy};
use tracing::{error, info, info_span};

use crate::cache::SubLayoutCache;
use crate::config::EngineConfig;
use crate::error::{EngineError, JobError};
use crate::matcher::{plan_job, PlacementPlan};
use crate::report::{JobResult, RunReport};
use crate::sync::{apply_plan, SyncStats};

/// Validate `selection` against `hierarchy` and run the resulting jobs.
///
/// A conflicting selection fails here, before any job touches `main`.
pub fn enforce<L: BoardLoader>(
    main: &mut Board,
    hierarchy: &Hierarchy,
    selection: &EnforcementSelection,
    cache: &SubLayoutCache<L>,
    config: &EngineConfig,
) -> Result<RunReport, EngineError> {
    let jobs = plan_jobs(hierarchy, selection, &config.group_prefix)?;
    Ok(run(main, &jobs, cache, config))
}

/// Run `jobs` one after another against `main`.
///
/// Sub-layouts are prefetched in parallel; mutation of `main` is strictly
/// sequential. A job that fails to load or match leaves `main` untouched and
/// does not stop the jobs after it.
pub fn run<L: BoardLoader>(
    main: &mut Board,
    jobs: &[EnforcementJob],
    cache: &SubLayoutCache<L>,
    config: &EngineConfig,
) -> RunReport {
    cache.prefetch(jobs.iter().map(|j| j.sub_layout.as_path()));

    let mut report = RunReport::default();
    for job in jobs {
        let span = info_span!("job", path = %job.path);
        let _enter = span.enter();
        let result = match run_job(main, job, cache, config) {
            Ok((plan, stats)) => {
                info!(
                    placed = stats.placed,
                    missing = plan.missing.len(),
                    copper = stats.copper_created,
                    "enforced {}",
                    job.human_path
                );
                JobResult::success(job, &plan, &stats)
            }
            Err(err) => {
                error!(%err, "job failed");
                JobResult::failure(job, &err)
            }
        };
        report.jobs.push(result);
    }
    report
}

fn run_job<L: BoardLoader>(
    main: &mut Board,
    job: &EnforcementJob,
    cache: &SubLayoutCache<L>,
    config: &EngineConfig,
) -> Result<(PlacementPlan, SyncStats), JobError> {
    let sub = cache.get(&job.sub_layout)?;
    let plan = plan_job(job, &sub, main, config)?;
    let stats = apply_plan(main, &plan);
    Ok((plan, stats))
}
