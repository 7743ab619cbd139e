use hierpcb_board::{
    Board, CopperItem, Footprint, FootprintText, ItemId, LocalProperties, StableId,
};
use hierpcb_core::{Pose, Transform};
use hierpcb_hierarchy::EnforcementJob;
use indexmap::{IndexMap, IndexSet};
use tracing::{debug, warn};

use crate::anchor::pick_anchor;
use crate::config::{EngineConfig, MissingFootprintPolicy};
use crate::error::{AnchorSide, JobError};

/// Target state of one main-document footprint.
#[derive(Debug, Clone, PartialEq)]
pub struct PlannedFootprint {
    pub target: ItemId,
    pub stable_id: StableId,
    pub pose: Pose,
    pub properties: LocalProperties,
    pub texts: Vec<FootprintText>,
}

/// Everything one job will write, computed without touching the main document.
#[derive(Debug, Clone, PartialEq)]
pub struct PlacementPlan {
    pub group_name: String,
    pub group_id: ItemId,
    pub anchor: StableId,
    pub transform: Transform,
    pub placements: Vec<PlannedFootprint>,
    /// In the sub-layout but absent from the main scope.
    pub missing: Vec<StableId>,
    /// Staged left of or above the sub-layout origin.
    pub ignored: Vec<StableId>,
    /// Sub-layout copper, already transformed and on main-document nets.
    pub copper: Vec<CopperItem>,
    /// Sub-layout net names no matched pad maps onto a main net.
    pub unresolved_nets: Vec<String>,
}

/// Match the sub-layout against the job's scope and solve the transform.
pub fn plan_job(
    job: &EnforcementJob,
    sub: &Board,
    main: &Board,
    config: &EngineConfig,
) -> Result<PlacementPlan, JobError> {
    let sub_index: IndexMap<StableId, &Footprint> = sub
        .footprints
        .iter()
        .filter_map(|fp| Some((fp.path.as_ref()?.stable_id(), fp)))
        .collect();
    if sub_index.is_empty() {
        return Err(JobError::EmptySubLayout {
            path: job.sub_layout.clone(),
        });
    }

    let anchor = match &job.anchor {
        Some(anchor) => anchor.clone(),
        None => {
            let picked = pick_anchor(sub, config.ignore_region).ok_or_else(|| {
                JobError::EmptySubLayout {
                    path: job.sub_layout.clone(),
                }
            })?;
            debug!(anchor = %picked, "no anchor selected, using heuristic choice");
            picked
        }
    };
    let unresolvable = |side| JobError::UnresolvableAnchor {
        anchor: anchor.clone(),
        side,
    };

    let sub_anchor = sub_index
        .get(&anchor)
        .ok_or_else(|| unresolvable(AnchorSide::SubLayout))?;
    if config.ignore_region && sub_anchor.pose().is_before_origin() {
        return Err(unresolvable(AnchorSide::IgnoreRegion));
    }
    let main_anchor = job
        .scope
        .get(&anchor)
        .and_then(|id| main.footprint(id))
        .ok_or_else(|| unresolvable(AnchorSide::MainScope))?;

    let transform = Transform::between(&sub_anchor.pose(), &main_anchor.pose());
    debug!(
        rotation = transform.rotation(),
        flip = transform.flips(),
        "solved transform"
    );

    let mut placements = Vec::new();
    let mut missing = Vec::new();
    let mut ignored = Vec::new();
    let mut nets = NetMap::default();

    for (stable_id, sub_fp) in &sub_index {
        if config.ignore_region && sub_fp.pose().is_before_origin() {
            ignored.push(stable_id.clone());
            continue;
        }
        let Some(main_fp) = job.scope.get(stable_id).and_then(|id| main.footprint(id)) else {
            warn!(
                stable_id = %stable_id,
                reference = %sub_fp.reference,
                "footprint missing from main document"
            );
            missing.push(stable_id.clone());
            continue;
        };

        nets.learn(sub, sub_fp, main, main_fp);

        // The anchor keeps its exact main pose so reruns cannot drift.
        let pose = if *stable_id == anchor {
            main_fp.pose()
        } else {
            transform.apply_pose(&sub_fp.pose())
        };
        placements.push(PlannedFootprint {
            target: main_fp.id.clone(),
            stable_id: stable_id.clone(),
            pose,
            properties: sub_fp.properties,
            texts: sub_fp
                .texts
                .iter()
                .map(|t| t.transformed(&transform))
                .collect(),
        });
    }

    if config.missing_footprints == MissingFootprintPolicy::Abort && !missing.is_empty() {
        return Err(JobError::MissingFootprints { ids: missing });
    }

    let group_id = ItemId::derived(&[job.group_name.as_str()]);
    let mut unresolved = IndexSet::new();
    let copper = sub
        .copper
        .iter()
        .map(|item| {
            let net = match nets.resolve(sub, item.net()) {
                Ok(code) => code,
                Err(name) => {
                    unresolved.insert(name);
                    0
                }
            };
            let id = ItemId::derived(&[group_id.as_str(), item.id().as_str()]);
            item.transformed(&transform, id, net)
        })
        .collect();

    let unresolved_nets: Vec<String> = unresolved.into_iter().collect();
    for name in &unresolved_nets {
        warn!(net = %name, "no matched pad carries this net; copper left unconnected");
    }

    Ok(PlacementPlan {
        group_name: job.group_name.clone(),
        group_id,
        anchor,
        transform,
        placements,
        missing,
        ignored,
        copper,
        unresolved_nets,
    })
}

/// Sub-layout net name to main-document net code, learned from the pads of
/// matched footprint pairs.
#[derive(Debug, Default)]
struct NetMap {
    by_name: IndexMap<String, u32>,
}

impl NetMap {
    fn learn(&mut self, sub: &Board, sub_fp: &Footprint, main: &Board, main_fp: &Footprint) {
        for pad in &sub_fp.pads {
            let Some(name) = sub.net_name(pad.net).filter(|_| pad.net != 0) else {
                continue;
            };
            let Some(main_pad) = main_fp.pad(&pad.number) else {
                continue;
            };
            match self.by_name.get(name) {
                None => {
                    self.by_name.insert(name.to_string(), main_pad.net);
                }
                Some(&known) if known != main_pad.net => warn!(
                    net = name,
                    first = main.net_name(known).unwrap_or("?"),
                    other = main.net_name(main_pad.net).unwrap_or("?"),
                    "sub-layout net maps onto several main nets; keeping the first"
                ),
                Some(_) => {}
            }
        }
    }

    /// Main net code for sub-layout net `code`, or the unmapped net name.
    fn resolve(&self, sub: &Board, code: u32) -> Result<u32, String> {
        if code == 0 {
            return Ok(0);
        }
        let Some(name) = sub.net_name(code) else {
            return Err(format!("#{code}"));
        };
        self.by_name.get(name).copied().ok_or_else(|| name.to_string())
    }
}
