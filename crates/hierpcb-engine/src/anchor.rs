use std::collections::HashMap;

use hierpcb_board::{Board, StableId};
use serde::Serialize;

/// A sub-layout footprint that could serve as the anchor.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AnchorCandidate {
    pub stable_id: StableId,
    pub reference: String,
    pub area: f64,
}

/// Anchor candidates of a sub-layout, best guess first.
///
/// Larger footprints rank first (the switch of a key, not its diode), then
/// those whose reference prefix is rarest, then by reference.
#[must_use]
pub fn anchor_candidates(sub: &Board, skip_ignore_region: bool) -> Vec<AnchorCandidate> {
    let eligible: Vec<_> = sub
        .footprints
        .iter()
        .filter(|fp| fp.path.is_some())
        .filter(|fp| !(skip_ignore_region && fp.pose().is_before_origin()))
        .collect();

    let mut prefixes: HashMap<&str, usize> = HashMap::new();
    for fp in &eligible {
        *prefixes.entry(fp.reference_prefix()).or_default() += 1;
    }

    let mut ranked: Vec<(usize, AnchorCandidate)> = eligible
        .iter()
        .filter_map(|fp| {
            let stable_id = fp.path.as_ref()?.stable_id();
            Some((
                prefixes[fp.reference_prefix()],
                AnchorCandidate {
                    stable_id,
                    reference: fp.reference.clone(),
                    area: fp.area(),
                },
            ))
        })
        .collect();
    ranked.sort_by(|(a_count, a), (b_count, b)| {
        b.area
            .total_cmp(&a.area)
            .then(a_count.cmp(b_count))
            .then_with(|| a.reference.cmp(&b.reference))
    });
    ranked.into_iter().map(|(_, c)| c).collect()
}

/// The heuristic anchor choice, if the sub-layout has any candidate.
#[must_use]
pub fn pick_anchor(sub: &Board, skip_ignore_region: bool) -> Option<StableId> {
    anchor_candidates(sub, skip_ignore_region)
        .into_iter()
        .next()
        .map(|c| c.stable_id)
}
