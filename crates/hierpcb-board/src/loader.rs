use std::path::Path;

use crate::board::Board;
use crate::error::BoardError;

/// Opens board documents by path.
///
/// The engine only reads what a loader returns; sub-layout documents are
/// never written back.
pub trait BoardLoader: Send + Sync {
    fn load(&self, path: &Path) -> Result<Board, BoardError>;
}

/// Loads JSON board snapshots from the filesystem.
#[derive(Debug, Clone, Copy, Default)]
pub struct JsonBoardLoader;

impl BoardLoader for JsonBoardLoader {
    fn load(&self, path: &Path) -> Result<Board, BoardError> {
        Board::load(path)
    }
}

impl<L: BoardLoader + ?Sized> BoardLoader for &L {
    fn load(&self, path: &Path) -> Result<Board, BoardError> {
        (**self).load(path)
    }
}
