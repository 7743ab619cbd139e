use std::path::Path;

use hierpcb_hierarchy::DEFAULT_GROUP_PREFIX;
use serde::{Deserialize, Serialize};

use crate::error::EngineError;

/// What to do when a sub-layout footprint has no counterpart in the main
/// document.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MissingFootprintPolicy {
    /// Report the ids and place everything else.
    #[default]
    Warn,
    /// Fail the job before it touches the main document.
    Abort,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct EngineConfig {
    pub missing_footprints: MissingFootprintPolicy,
    /// Skip sub-layout footprints left of or above the origin.
    pub ignore_region: bool,
    pub group_prefix: String,
    pub sublayout_extension: String,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            missing_footprints: MissingFootprintPolicy::Warn,
            ignore_region: true,
            group_prefix: DEFAULT_GROUP_PREFIX.to_string(),
            sublayout_extension: "kicad_pcb".to_string(),
        }
    }
}

impl EngineConfig {
    pub fn from_yaml_str(yaml: &str) -> Result<Self, serde_yaml::Error> {
        if yaml.trim().is_empty() {
            return Ok(Self::default());
        }
        serde_yaml::from_str(yaml)
    }

    pub fn load(path: &Path) -> Result<Self, EngineError> {
        let raw = std::fs::read_to_string(path).map_err(|source| EngineError::ConfigIo {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_yaml_str(&raw).map_err(|source| EngineError::Config {
            path: path.to_path_buf(),
            source,
        })
    }
}
