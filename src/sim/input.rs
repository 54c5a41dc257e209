//! Pointer and keyboard routing
//!
//! Converts page-space pointer positions into board tiles and decides which
//! server call (if any) a gesture turns into. Nothing here touches the DOM.

use glam::Vec2;

use super::snapshot::GameSnapshot;
use crate::net::ApiCall;

/// Board cell address; may lie outside the board until validated
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct TileCoord {
    pub x: i32,
    pub y: i32,
}

/// Map a pointer to the tile under it (floored, unclamped)
#[inline]
pub fn pixel_to_tile(pointer: Vec2, board_origin: Vec2, tile_size: f32) -> TileCoord {
    let local = (pointer - board_origin) / tile_size;
    TileCoord {
        x: local.x.floor() as i32,
        y: local.y.floor() as i32,
    }
}

/// A player gesture with the pointer position it happened at
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Gesture {
    /// Primary click
    Reveal(Vec2),
    /// Flag key pressed while the pointer hovers the board
    Flag(Vec2),
}

/// Turns gestures into server calls
#[derive(Debug, Clone, Copy)]
pub struct InputRouter {
    pub tile_size: f32,
}

impl InputRouter {
    pub fn new(tile_size: f32) -> Self {
        Self { tile_size }
    }

    /// Resolve a pointer to an on-board tile
    pub fn locate(&self, pointer: Vec2, board_origin: Vec2, snapshot: &GameSnapshot) -> Option<(u32, u32)> {
        if !pointer.is_finite() || !board_origin.is_finite() {
            return None;
        }
        let coord = pixel_to_tile(pointer, board_origin, self.tile_size);
        if !snapshot.contains(coord.x, coord.y) {
            log::debug!("Ignoring off-board tile ({}, {})", coord.x, coord.y);
            return None;
        }
        let (x, y) = (coord.x as u32, coord.y as u32);
        if snapshot.tile(x, y).is_none() {
            log::debug!("Ignoring tile ({}, {}) missing from the grid", x, y);
            return None;
        }
        Some((x, y))
    }

    /// Server call for a gesture, or `None` when it must not reach the network
    pub fn route(
        &self,
        gesture: Gesture,
        board_origin: Vec2,
        snapshot: Option<&GameSnapshot>,
    ) -> Option<ApiCall> {
        let snapshot = snapshot?;
        if !snapshot.game_active {
            return None;
        }

        match gesture {
            Gesture::Reveal(pointer) => {
                let (x, y) = self.locate(pointer, board_origin, snapshot)?;
                Some(ApiCall::Reveal { x, y })
            }
            Gesture::Flag(pointer) => {
                let (x, y) = self.locate(pointer, board_origin, snapshot)?;
                Some(ApiCall::ToggleFlag { x, y })
            }
        }
    }
}
