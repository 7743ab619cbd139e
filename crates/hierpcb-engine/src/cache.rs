use std::path::{Path, PathBuf};
use std::sync::{Arc, PoisonError, RwLock};

use hierpcb_board::{Board, BoardError, BoardLoader};
use indexmap::{IndexMap, IndexSet};
use rayon::prelude::*;
use tracing::{debug, info};

/// Sub-layout documents, loaded once and shared read-only across jobs.
///
/// Sibling instances of one block usually share a sub-layout file, so a
/// document is opened at most once per run. Load failures are not cached;
/// each job that needs the file reports the error itself.
pub struct SubLayoutCache<L> {
    loader: L,
    boards: RwLock<IndexMap<PathBuf, Arc<Board>>>,
}

impl<L: BoardLoader> SubLayoutCache<L> {
    pub fn new(loader: L) -> Self {
        Self {
            loader,
            boards: RwLock::new(IndexMap::new()),
        }
    }

    pub fn get(&self, path: &Path) -> Result<Arc<Board>, BoardError> {
        if let Some(board) = self.cached(path) {
            return Ok(board);
        }
        let board = Arc::new(self.loader.load(path)?);
        info!(
            path = %path.display(),
            footprints = board.footprints.len(),
            copper = board.copper.len(),
            "imported sub-layout"
        );
        let mut boards = self.boards.write().unwrap_or_else(PoisonError::into_inner);
        Ok(boards.entry(path.to_path_buf()).or_insert(board).clone())
    }

    /// Load every distinct, not yet cached path in parallel.
    pub fn prefetch<'a>(&self, paths: impl IntoIterator<Item = &'a Path>) {
        let pending: Vec<&Path> = paths
            .into_iter()
            .filter(|p| self.cached(p).is_none())
            .collect::<IndexSet<_>>()
            .into_iter()
            .collect();
        if pending.is_empty() {
            return;
        }
        debug!(count = pending.len(), "prefetching sub-layouts");
        pending.par_iter().for_each(|path| {
            if let Err(err) = self.get(path) {
                debug!(path = %path.display(), %err, "prefetch failed");
            }
        });
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.boards
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    fn cached(&self, path: &Path) -> Option<Arc<Board>> {
        self.boards
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .get(path)
            .cloned()
    }
}
