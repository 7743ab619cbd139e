use std::collections::HashSet;

use hierpcb_board::{Board, ItemId};
use serde::Serialize;
use tracing::{debug, warn};

use crate::matcher::PlacementPlan;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct SyncStats {
    pub placed: usize,
    /// Footprints pulled out of some other group.
    pub regrouped: usize,
    /// Footprints dropped from the group because the plan no longer covers them.
    pub released: usize,
    pub copper_removed: usize,
    pub copper_created: usize,
}

/// Write `plan` into the main document.
///
/// This is the only step of a job that mutates the main document. It creates
/// or reuses the job's group, places every planned footprint, rebuilds group
/// membership, and regenerates the group's copper from scratch. Applying the
/// same plan twice leaves the document unchanged.
pub fn apply_plan(main: &mut Board, plan: &PlacementPlan) -> SyncStats {
    let mut stats = SyncStats::default();
    main.ensure_group(&plan.group_name, plan.group_id.clone());

    for placement in &plan.placements {
        let Some(fp) = main.footprint_mut(&placement.target) else {
            warn!(item = %placement.target, "planned footprint vanished from main document");
            continue;
        };
        fp.set_pose(&placement.pose);
        fp.properties = placement.properties;
        for text in &placement.texts {
            if let Some(existing) = fp.texts.iter_mut().find(|t| t.kind == text.kind) {
                existing.position = text.position;
                existing.visible = text.visible;
            }
        }
        let reference = fp.reference.clone();
        stats.placed += 1;

        if main.move_to_group(&placement.target, &plan.group_name) {
            warn!(%reference, group = %plan.group_name, "footprint was in another group, moved");
            stats.regrouped += 1;
        }
    }

    let planned: HashSet<&ItemId> = plan.placements.iter().map(|p| &p.target).collect();
    let footprint_ids: HashSet<ItemId> = main.footprints.iter().map(|f| f.id.clone()).collect();
    let copper_ids: HashSet<ItemId> = main.copper.iter().map(|c| c.id().clone()).collect();

    let mut stale: HashSet<ItemId> = plan.copper.iter().map(|c| c.id().clone()).collect();
    if let Some(group) = main.group_mut(&plan.group_name) {
        let before = group.members.len();
        group
            .members
            .retain(|m| !footprint_ids.contains(m) || planned.contains(m));
        stats.released = before - group.members.len();
        stale.extend(
            group
                .members
                .iter()
                .filter(|m| copper_ids.contains(*m))
                .cloned(),
        );
    }

    stats.copper_removed = main.replace_copper(&stale, plan.copper.clone());
    stats.copper_created = plan.copper.len();
    if let Some(group) = main.group_mut(&plan.group_name) {
        group
            .members
            .extend(plan.copper.iter().map(|c| c.id().clone()));
    }

    debug!(
        group = %plan.group_name,
        placed = stats.placed,
        released = stats.released,
        copper_removed = stats.copper_removed,
        copper_created = stats.copper_created,
        "synchronized group"
    );
    stats
}
