//! Board document object model.
//!
//! This mirrors the parts of the host board API that layout propagation
//! touches: footprints with schematic paths, pads with nets, copper items,
//! and named groups. Nets are document-local; only their names carry meaning
//! across documents.

mod board;
mod copper;
mod error;
mod footprint;
mod fs;
mod ids;
mod loader;

pub use board::{Board, Group, Net};
pub use copper::{ArcTrack, CopperItem, Track, Via};
pub use error::BoardError;
pub use footprint::{
    Footprint, FootprintText, LocalProperties, Pad, Side, TextKind, ZoneConnection,
};
pub use fs::write_atomic;
pub use ids::{FootprintPath, ItemId, StableId};
pub use loader::{BoardLoader, JsonBoardLoader};
