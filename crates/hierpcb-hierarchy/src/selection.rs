use hierpcb_board::StableId;
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

use crate::error::HierarchyError;
use crate::path::SheetPath;
use crate::tree::{Hierarchy, HierarchyNode};

#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct SelectionEntry {
    pub enabled: bool,
    /// Anchor footprint, in the sub-layout's own namespace.
    #[serde(default, rename = "anchor_stable_id", skip_serializing_if = "Option::is_none")]
    pub anchor: Option<StableId>,
}

/// Instances marked for enforcement, with their anchor choices.
///
/// This is also the persisted record: one entry per instance path.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct EnforcementSelection {
    entries: IndexMap<SheetPath, SelectionEntry>,
}

impl EnforcementSelection {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    pub fn enable(&mut self, path: SheetPath, anchor: Option<StableId>) -> &mut Self {
        self.entries.insert(
            path,
            SelectionEntry {
                enabled: true,
                anchor,
            },
        );
        self
    }

    /// Disable `path`, keeping its anchor choice for later runs.
    pub fn disable(&mut self, path: &SheetPath) -> &mut Self {
        if let Some(entry) = self.entries.get_mut(path) {
            entry.enabled = false;
        }
        self
    }

    pub fn set_anchor(&mut self, path: &SheetPath, anchor: StableId) {
        self.entries.entry(path.clone()).or_default().anchor = Some(anchor);
    }

    #[must_use]
    pub fn get(&self, path: &SheetPath) -> Option<&SelectionEntry> {
        self.entries.get(path)
    }

    #[must_use]
    pub fn anchor(&self, path: &SheetPath) -> Option<&StableId> {
        self.entries.get(path).and_then(|e| e.anchor.as_ref())
    }

    pub fn entries(&self) -> impl Iterator<Item = (&SheetPath, &SelectionEntry)> {
        self.entries.iter()
    }

    pub fn enabled_paths(&self) -> impl Iterator<Item = &SheetPath> {
        self.entries
            .iter()
            .filter(|(_, e)| e.enabled)
            .map(|(p, _)| p)
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Drop entries whose path no longer exists in `hierarchy`. Returns the
    /// dropped paths.
    pub fn retain_known(&mut self, hierarchy: &Hierarchy) -> Vec<SheetPath> {
        let mut dropped = Vec::new();
        self.entries.retain(|path, _| {
            let known = hierarchy.get(path).is_some();
            if !known {
                dropped.push(path.clone());
            }
            known
        });
        dropped
    }

    /// Check that no enabled path is an ancestor of another.
    ///
    /// Sorting puts every descendant of a path directly after it, so one
    /// pass that remembers the last non-conflicting path finds every
    /// offending descendant.
    pub fn validate(&self) -> Result<(), HierarchyError> {
        let mut paths: Vec<&SheetPath> = self.enabled_paths().collect();
        paths.sort();

        let mut conflicts = Vec::new();
        let mut outer: Option<&SheetPath> = None;
        for path in paths {
            match outer {
                Some(o) if o.is_ancestor_of(path) => conflicts.push((o.clone(), path.clone())),
                _ => outer = Some(path),
            }
        }

        if conflicts.is_empty() {
            Ok(())
        } else {
            Err(HierarchyError::SelectionConflict { conflicts })
        }
    }
}

/// Default selection: along each root-to-leaf path, the outermost instance
/// with a bound sub-layout.
#[must_use]
pub fn reset_to_default(hierarchy: &Hierarchy) -> EnforcementSelection {
    reset_to_default_where(hierarchy, |_| true)
}

/// As [`reset_to_default`], only considering instances `accept` approves of
/// (e.g. sub-layouts that actually contain footprints).
pub fn reset_to_default_where(
    hierarchy: &Hierarchy,
    accept: impl Fn(&HierarchyNode) -> bool,
) -> EnforcementSelection {
    fn walk(
        node: &HierarchyNode,
        accept: &dyn Fn(&HierarchyNode) -> bool,
        out: &mut EnforcementSelection,
    ) {
        if node.sub_layout.is_some() && accept(node) {
            out.enable(node.path.clone(), None);
            return;
        }
        for child in node.children() {
            walk(child, accept, out);
        }
    }

    let mut out = EnforcementSelection::new();
    walk(hierarchy.root(), &accept, &mut out);
    out
}
