use std::fmt;
use std::path::PathBuf;

use hierpcb_board::{BoardError, StableId};
use hierpcb_hierarchy::HierarchyError;

/// Which document an anchor lookup failed in.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AnchorSide {
    SubLayout,
    IgnoreRegion,
    MainScope,
}

impl fmt::Display for AnchorSide {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            AnchorSide::SubLayout => "not found in sub-layout",
            AnchorSide::IgnoreRegion => "lies in the sub-layout's ignore region",
            AnchorSide::MainScope => "not found in main document scope",
        })
    }
}

/// Errors fatal to one enforcement job. Sibling jobs still run.
#[derive(Debug, thiserror::Error)]
pub enum JobError {
    #[error("could not load sub-layout: {0}")]
    DocumentLoad(#[from] BoardError),

    #[error("sub-layout {} has no footprints with schematic paths", path.display())]
    EmptySubLayout { path: PathBuf },

    #[error("anchor {anchor} {side}")]
    UnresolvableAnchor { anchor: StableId, side: AnchorSide },

    #[error("{} footprint(s) missing from main document: {}", ids.len(), join(ids))]
    MissingFootprints { ids: Vec<StableId> },
}

fn join(ids: &[StableId]) -> String {
    ids.iter()
        .map(StableId::as_str)
        .collect::<Vec<_>>()
        .join(", ")
}

/// Errors that stop a whole run rather than a single job.
#[derive(Debug, thiserror::Error)]
pub enum EngineError {
    #[error(transparent)]
    Selection(#[from] HierarchyError),

    #[error("could not read config {}: {source}", path.display())]
    ConfigIo {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("invalid config {}: {source}", path.display())]
    Config {
        path: PathBuf,
        #[source]
        source: serde_yaml::Error,
    },

    #[error("could not access selection state {}: {source}", path.display())]
    StoreIo {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("invalid selection state {}: {source}", path.display())]
    StoreFormat {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
}
