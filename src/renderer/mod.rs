//! Snapshot projection
//!
//! Pure functions from the current snapshot (and animation clock) to what
//! should be on screen. Nothing here touches the page.

pub mod board;
pub mod status;

pub use board::{Atlas, AtlasCell, BoardRenderer, DrawList, Layer, Sprite, TileDraw};
pub use status::StatusView;
