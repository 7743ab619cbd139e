use std::collections::{BTreeMap, HashMap};
use std::path::PathBuf;

use hierpcb_board::{ItemId, StableId};
use tracing::{debug, info};

use crate::error::HierarchyError;
use crate::path::SheetPath;
use crate::selection::EnforcementSelection;
use crate::tree::Hierarchy;

pub const DEFAULT_GROUP_PREFIX: &str = "subpcb_";

/// One instance to enforce: its scope, bound sub-layout and anchor choice.
#[derive(Debug, Clone, PartialEq)]
pub struct EnforcementJob {
    pub path: SheetPath,
    pub human_path: String,
    pub sub_layout: PathBuf,
    /// Anchor in the sub-layout's namespace; `None` lets the engine pick one.
    pub anchor: Option<StableId>,
    pub scope: BTreeMap<StableId, ItemId>,
    pub group_name: String,
}

/// The part of `selection` that can still apply to `hierarchy`.
///
/// Entries for paths that no longer exist are dropped; entries for
/// instances without a bound sub-layout are kept but disabled.
#[must_use]
pub fn resolve_selection(
    hierarchy: &Hierarchy,
    selection: &EnforcementSelection,
) -> EnforcementSelection {
    let mut live = selection.clone();
    for path in live.retain_known(hierarchy) {
        debug!(path = %path, "dropping stale selection entry");
    }
    for path in selection.enabled_paths() {
        if let Some(node) = hierarchy.get(path) {
            if node.sub_layout.is_none() {
                debug!(path = %path, "selected instance has no sub-layout, ignoring");
                live.disable(path);
            }
        }
    }
    live
}

/// Turn a selection into validated, scope-disjoint jobs in tree order.
///
/// The selection is resolved first, see [`resolve_selection`].
pub fn plan_jobs(
    hierarchy: &Hierarchy,
    selection: &EnforcementSelection,
    group_prefix: &str,
) -> Result<Vec<EnforcementJob>, HierarchyError> {
    let live = resolve_selection(hierarchy, selection);
    live.validate()?;

    let ambiguous = ambiguous_human_paths(hierarchy);
    let mut jobs = Vec::new();
    for node in hierarchy.iter() {
        let Some(entry) = live.get(&node.path) else {
            continue;
        };
        let (true, Some(sub_layout)) = (entry.enabled, &node.sub_layout) else {
            continue;
        };
        let human_path = hierarchy.human_path(&node.path);
        let group_name = if ambiguous.contains_key(human_path.as_str()) {
            format!("{group_prefix}{}", node.path)
        } else {
            format!("{group_prefix}{human_path}")
        };
        jobs.push(EnforcementJob {
            path: node.path.clone(),
            group_name,
            human_path,
            sub_layout: sub_layout.clone(),
            anchor: entry.anchor.clone(),
            scope: node.footprint_scope.clone(),
        });
    }
    info!(jobs = jobs.len(), "planned enforcement jobs");
    Ok(jobs)
}

/// Human paths shared by more than one instance with a bound sub-layout.
///
/// Computed over the whole tree so a group keeps its name whatever else is
/// selected.
fn ambiguous_human_paths(hierarchy: &Hierarchy) -> HashMap<String, usize> {
    let mut seen: HashMap<String, usize> = HashMap::new();
    for node in hierarchy.iter().filter(|n| n.sub_layout.is_some()) {
        *seen.entry(hierarchy.human_path(&node.path)).or_default() += 1;
    }
    seen.retain(|human_path, count| {
        if *count > 1 {
            debug!(%human_path, "instances share a name, grouping by sheet path");
        }
        *count > 1
    });
    seen
}
