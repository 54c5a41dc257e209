//! Board draw list
//!
//! Builds the full visual tile tree for a snapshot. The result is plain data;
//! applying it to a page is the platform layer's job.

use glam::Vec2;

use crate::consts::{ATLAS_CELL_PX, KITTEN_ATLAS_URL, SPRITE_SCALE, TILE_ATLAS_URL};
use crate::sim::{AnimationClock, GameSnapshot, TileKind, TileState, atlas_row};

/// Sprite sheets
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Atlas {
    Tiles,
    Kittens,
}

impl Atlas {
    pub fn url(&self) -> &'static str {
        match self {
            Atlas::Tiles => TILE_ATLAS_URL,
            Atlas::Kittens => KITTEN_ATLAS_URL,
        }
    }

    /// CSS background size for the scaled sheet
    pub fn background_size(&self) -> &'static str {
        match self {
            Atlas::Tiles => "320px auto",
            Atlas::Kittens => "256px 320px",
        }
    }
}

/// Cell in an atlas, in cell units
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct AtlasCell {
    pub col: u32,
    pub row: u32,
}

impl AtlasCell {
    pub const fn new(col: u32, row: u32) -> Self {
        Self { col, row }
    }

    /// Top-left of the cell in the scaled sheet, in pixels
    pub fn pixel_offset(&self) -> (u32, u32) {
        let cell = ATLAS_CELL_PX * SPRITE_SCALE;
        (self.col * cell, self.row * cell)
    }
}

/// Tile atlas cells
pub mod cells {
    use super::AtlasCell;

    pub const WALL: AtlasCell = AtlasCell::new(0, 2);
    pub const UNREVEALED: AtlasCell = AtlasCell::new(2, 0);
    pub const EMPTY: AtlasCell = AtlasCell::new(5, 0);
    pub const FLAG: AtlasCell = AtlasCell::new(1, 0);
    /// Row holding the 1..=8 digits
    pub const NUMBER_ROW: u32 = 1;
}

/// Stacking role of a sprite within a tile
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Layer {
    Base,
    Number,
    /// Animated kitten; keeps its value so frames can be refreshed in place
    Kitten { value: u32 },
    Flag,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Sprite {
    pub layer: Layer,
    pub atlas: Atlas,
    pub cell: AtlasCell,
}

impl Sprite {
    const fn tile(layer: Layer, cell: AtlasCell) -> Self {
        Self {
            layer,
            atlas: Atlas::Tiles,
            cell,
        }
    }
}

/// One tile, sprites ordered bottom to top
#[derive(Debug, Clone, PartialEq)]
pub struct TileDraw {
    pub x: u32,
    pub y: u32,
    /// Top-left in board pixels
    pub origin: Vec2,
    pub sprites: Vec<Sprite>,
}

/// Everything needed to draw the board
#[derive(Debug, Clone, PartialEq)]
pub struct DrawList {
    pub width_px: f32,
    pub height_px: f32,
    pub tiles: Vec<TileDraw>,
}

impl DrawList {
    pub fn tile(&self, x: u32, y: u32) -> Option<&TileDraw> {
        self.tiles.iter().find(|t| t.x == x && t.y == y)
    }
}

/// Base sprite for each tile kind
pub fn base_cell(kind: TileKind) -> AtlasCell {
    match kind {
        TileKind::Wall => cells::WALL,
        TileKind::Unrevealed | TileKind::UnrevealedMine => cells::UNREVEALED,
        TileKind::Empty | TileKind::Number(_) | TileKind::RevealedMine => cells::EMPTY,
    }
}

/// Kitten atlas cell for a value at the clock's current frame
pub fn kitten_cell(value: u32, clock: &AnimationClock) -> AtlasCell {
    AtlasCell::new(clock.frame(value), atlas_row(value))
}

/// Sprite stack for one tile
pub fn tile_sprites(tile: &TileState, clock: &AnimationClock) -> Vec<Sprite> {
    let mut sprites = vec![Sprite::tile(Layer::Base, base_cell(tile.kind))];

    match tile.kind {
        TileKind::Number(n) if (1..=8).contains(&n) => {
            let cell = AtlasCell::new(u32::from(n) - 1, cells::NUMBER_ROW);
            sprites.push(Sprite::tile(Layer::Number, cell));
        }
        TileKind::RevealedMine => sprites.push(Sprite {
            layer: Layer::Kitten {
                value: tile.mine_value,
            },
            atlas: Atlas::Kittens,
            cell: kitten_cell(tile.mine_value, clock),
        }),
        _ => {}
    }

    if tile.flagged {
        sprites.push(Sprite::tile(Layer::Flag, cells::FLAG));
    }
    sprites
}

/// Rebuilds the whole board on every call
#[derive(Debug, Clone, Copy)]
pub struct BoardRenderer {
    pub tile_size: f32,
}

impl BoardRenderer {
    pub fn new(tile_size: f32) -> Self {
        Self { tile_size }
    }

    pub fn render(&self, snapshot: &GameSnapshot, clock: &AnimationClock) -> DrawList {
        // Bounded by the tiles actually received, never by the declared size alone
        let height = snapshot.height as usize;
        let columns = &snapshot.tiles[..snapshot.tiles.len().min(snapshot.width as usize)];
        let rows = columns.iter().map(Vec::len).max().unwrap_or(0).min(height);
        let mut tiles = Vec::with_capacity(columns.iter().map(|c| c.len().min(rows)).sum());

        for y in 0..rows {
            for (x, column) in columns.iter().enumerate() {
                // Ragged grids were already reported at decode time
                let Some(tile) = column.get(y) else {
                    continue;
                };
                let (x, y) = (x as u32, y as u32);
                tiles.push(TileDraw {
                    x,
                    y,
                    origin: Vec2::new(x as f32, y as f32) * self.tile_size,
                    sprites: tile_sprites(tile, clock),
                });
            }
        }

        DrawList {
            width_px: snapshot.width as f32 * self.tile_size,
            height_px: snapshot.height as f32 * self.tile_size,
            tiles,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::consts::TILE_SIZE;
    use crate::sim::{Gesture, InputRouter};

    fn renderer() -> BoardRenderer {
        BoardRenderer::new(TILE_SIZE)
    }

    #[test]
    fn test_number_tile_scenario() {
        let mut snap = GameSnapshot::filled(9, 9, TileKind::Unrevealed);
        let call = InputRouter::new(TILE_SIZE)
            .route(Gesture::Reveal(Vec2::new(50.0, 80.0)), Vec2::ZERO, Some(&snap))
            .unwrap();
        assert_eq!(call, crate::net::ApiCall::Reveal { x: 1, y: 2 });

        snap.tiles[1][2].kind = TileKind::from_code(3).unwrap();
        let list = renderer().render(&snap, &AnimationClock::new());
        let tile = list.tile(1, 2).unwrap();

        assert_eq!(tile.origin, Vec2::new(32.0, 64.0));
        assert_eq!(
            tile.sprites,
            vec![
                Sprite::tile(Layer::Base, AtlasCell::new(5, 0)),
                Sprite::tile(Layer::Number, AtlasCell::new(2, 1)),
            ]
        );
    }

    #[test]
    fn test_board_geometry_and_order() {
        let snap = GameSnapshot::filled(3, 2, TileKind::Wall);
        let list = renderer().render(&snap, &AnimationClock::new());

        assert_eq!((list.width_px, list.height_px), (96.0, 64.0));
        assert_eq!(list.tiles.len(), 6);
        let order: Vec<(u32, u32)> = list.tiles.iter().map(|t| (t.x, t.y)).collect();
        assert_eq!(order, vec![(0, 0), (1, 0), (2, 0), (0, 1), (1, 1), (2, 1)]);
        assert_eq!(list.tile(2, 1).unwrap().origin, Vec2::new(64.0, 32.0));
        assert!(list.tiles.iter().all(|t| t.sprites == vec![Sprite::tile(Layer::Base, cells::WALL)]));
    }

    #[test]
    fn test_base_cells() {
        assert_eq!(base_cell(TileKind::Wall), AtlasCell::new(0, 2));
        assert_eq!(base_cell(TileKind::Unrevealed), AtlasCell::new(2, 0));
        // Hidden kittens look like any other unrevealed tile
        assert_eq!(base_cell(TileKind::UnrevealedMine), AtlasCell::new(2, 0));
        assert_eq!(base_cell(TileKind::Empty), AtlasCell::new(5, 0));
        assert_eq!(base_cell(TileKind::RevealedMine), AtlasCell::new(5, 0));
    }

    #[test]
    fn test_number_overlays() {
        let clock = AnimationClock::new();
        for n in 1..=8u8 {
            let sprites = tile_sprites(&TileState::new(TileKind::Number(n)), &clock);
            assert_eq!(sprites[1].cell, AtlasCell::new(u32::from(n) - 1, 1));
        }
    }

    #[test]
    fn test_flag_overlay_on_any_kind() {
        let clock = AnimationClock::new();
        for kind in [TileKind::Unrevealed, TileKind::UnrevealedMine, TileKind::Wall, TileKind::Number(4)] {
            let tile = TileState {
                kind,
                flagged: true,
                mine_value: 0,
            };
            let sprites = tile_sprites(&tile, &clock);
            assert_eq!(*sprites.last().unwrap(), Sprite::tile(Layer::Flag, cells::FLAG));
        }
    }

    #[test]
    fn test_revealed_kitten_animates() {
        let mut snap = GameSnapshot::filled(4, 1, TileKind::Empty);
        for (x, value) in [(0, 5), (1, 5), (2, 7), (3, 42)] {
            snap.tiles[x][0] = TileState {
                kind: TileKind::RevealedMine,
                flagged: false,
                mine_value: value,
            };
        }

        let clock = AnimationClock::at(15 * 6);
        let list = renderer().render(&snap, &clock);
        let kitten = |x: u32| list.tile(x, 0).unwrap().sprites[1];

        assert_eq!(kitten(0).atlas, Atlas::Kittens);
        assert_eq!(kitten(0).layer, Layer::Kitten { value: 5 });
        assert_eq!(kitten(0).cell, AtlasCell::new(6, 5));
        // Same value, same frame
        assert_eq!(kitten(0).cell, kitten(1).cell);
        assert_eq!(kitten(2).cell, AtlasCell::new(0, 7));
        // Unknown values fall back to row 0
        assert_eq!(kitten(3).cell, AtlasCell::new(2, 0));
    }

    #[test]
    fn test_render_is_pure() {
        let mut snap = GameSnapshot::filled(5, 5, TileKind::Unrevealed);
        snap.tiles[2][2].kind = TileKind::RevealedMine;
        snap.tiles[1][3].flagged = true;
        snap.tiles[4][0].kind = TileKind::Number(6);
        let clock = AnimationClock::at(99);

        assert_eq!(renderer().render(&snap, &clock), renderer().render(&snap, &clock));
    }

    #[test]
    fn test_missing_tiles_skipped() {
        let mut snap = GameSnapshot::filled(3, 3, TileKind::Empty);
        snap.tiles.truncate(1);
        let list = renderer().render(&snap, &AnimationClock::new());
        assert_eq!(list.tiles.len(), 3);
        assert_eq!(list.width_px, 96.0);
    }

    #[test]
    fn test_oversized_dimensions_render_received_tiles() {
        let body = r#"{"gameActive": true, "board": {"width": 100000, "height": 100000, "tiles": []}}"#;
        let snap = GameSnapshot::from_json(body).unwrap();
        let list = renderer().render(&snap, &AnimationClock::new());
        assert!(list.tiles.is_empty());

        let body = r#"{"gameActive": true, "board": {"width": 4294967295, "height": 4294967295,
            "tiles": [[{"type": -1}, {"type": -2}], [{"type": 0}]]}}"#;
        let snap = GameSnapshot::from_json(body).unwrap();
        let list = renderer().render(&snap, &AnimationClock::new());
        let drawn: Vec<_> = list.tiles.iter().map(|t| (t.x, t.y)).collect();
        assert_eq!(drawn, vec![(0, 0), (1, 0), (0, 1)]);
    }

    #[test]
    fn test_pixel_offset() {
        assert_eq!(AtlasCell::new(2, 1).pixel_offset(), (64, 32));
        assert_eq!(cells::EMPTY.pixel_offset(), (160, 0));
    }
}
