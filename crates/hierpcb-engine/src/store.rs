use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use hierpcb_board::write_atomic;
use hierpcb_hierarchy::EnforcementSelection;
use tracing::{debug, warn};

use crate::error::EngineError;

/// Sidecar file holding the last selection used for a board.
#[derive(Debug, Clone)]
pub struct SelectionStore {
    path: PathBuf,
}

impl SelectionStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// The store next to `board`: `<board>.hierpcb.json`.
    pub fn for_board(board: &Path) -> Self {
        let mut name = board.as_os_str().to_owned();
        name.push(".hierpcb.json");
        Self::new(name)
    }

    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Load the stored selection; a missing file is an empty selection.
    pub fn load(&self) -> Result<EnforcementSelection, EngineError> {
        let raw = match std::fs::read_to_string(&self.path) {
            Ok(raw) => raw,
            Err(err) if err.kind() == ErrorKind::NotFound => {
                warn!(path = %self.path.display(), "no saved selection, starting empty");
                return Ok(EnforcementSelection::new());
            }
            Err(source) => {
                return Err(EngineError::StoreIo {
                    path: self.path.clone(),
                    source,
                })
            }
        };
        serde_json::from_str(&raw).map_err(|source| EngineError::StoreFormat {
            path: self.path.clone(),
            source,
        })
    }

    pub fn save(&self, selection: &EnforcementSelection) -> Result<(), EngineError> {
        let io_err = |source| EngineError::StoreIo {
            path: self.path.clone(),
            source,
        };
        let json = serde_json::to_string_pretty(selection).map_err(|source| {
            EngineError::StoreFormat {
                path: self.path.clone(),
                source,
            }
        })?;
        write_atomic(&self.path, json.as_bytes()).map_err(io_err)?;
        debug!(path = %self.path.display(), "saved selection");
        Ok(())
    }
}
