//! Authoritative game snapshot
//!
//! A snapshot is the complete board + timer state returned by the server.
//! It is never patched in place: every response is decoded into a fresh
//! snapshot that replaces the previous one.

use serde::Deserialize;

/// Wire tile type codes
pub mod codes {
    pub const WALL: i32 = 0;
    pub const UNREVEALED: i32 = -1;
    pub const EMPTY: i32 = -2;
    pub const UNREVEALED_KITTEN: i32 = -3;
    pub const REVEALED_KITTEN: i32 = -4;
}

/// What a tile currently shows
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TileKind {
    Wall,
    Unrevealed,
    Empty,
    UnrevealedMine,
    RevealedMine,
    /// Revealed tile with 1..=8 neighbouring kittens
    Number(u8),
}

impl TileKind {
    /// Decode a wire type code
    pub fn from_code(code: i32) -> Option<Self> {
        match code {
            codes::WALL => Some(TileKind::Wall),
            codes::UNREVEALED => Some(TileKind::Unrevealed),
            codes::EMPTY => Some(TileKind::Empty),
            codes::UNREVEALED_KITTEN => Some(TileKind::UnrevealedMine),
            codes::REVEALED_KITTEN => Some(TileKind::RevealedMine),
            1..=8 => Some(TileKind::Number(code as u8)),
            _ => None,
        }
    }

    pub fn code(&self) -> i32 {
        match self {
            TileKind::Wall => codes::WALL,
            TileKind::Unrevealed => codes::UNREVEALED,
            TileKind::Empty => codes::EMPTY,
            TileKind::UnrevealedMine => codes::UNREVEALED_KITTEN,
            TileKind::RevealedMine => codes::REVEALED_KITTEN,
            TileKind::Number(n) => *n as i32,
        }
    }

    pub fn is_mine(&self) -> bool {
        matches!(self, TileKind::UnrevealedMine | TileKind::RevealedMine)
    }
}

/// One board cell
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TileState {
    pub kind: TileKind,
    pub flagged: bool,
    /// Kitten sprite variant (0..=9), only meaningful for mines
    pub mine_value: u32,
}

impl TileState {
    pub const fn new(kind: TileKind) -> Self {
        Self {
            kind,
            flagged: false,
            mine_value: 0,
        }
    }
}

/// Complete game state as last reported by the server
#[derive(Debug, Clone, PartialEq)]
pub struct GameSnapshot {
    pub width: u32,
    pub height: u32,
    /// Column-major: `tiles[x][y]`
    pub tiles: Vec<Vec<TileState>>,
    pub game_active: bool,
    /// Board-level end flag (set on any reveal that ends the run)
    pub game_over: bool,
    pub has_won: bool,
    pub time_remaining: i32,
    pub formatted_time: String,
    pub num_kittens: u32,
}

impl GameSnapshot {
    /// Decode a server response body
    pub fn from_json(body: &str) -> Result<Self, serde_json::Error> {
        let wire: WireSnapshot = serde_json::from_str(body)?;
        Ok(wire.into())
    }

    /// Tile at `(x, y)`, if the server sent one there
    pub fn tile(&self, x: u32, y: u32) -> Option<&TileState> {
        self.tiles.get(x as usize)?.get(y as usize)
    }

    /// Whether `(x, y)` lies on the board
    pub fn contains(&self, x: i32, y: i32) -> bool {
        x >= 0 && y >= 0 && (x as u32) < self.width && (y as u32) < self.height
    }

    /// Settle the outcome of a reveal at `(x, y)`.
    ///
    /// If the revealed cell holds a kitten the run is over regardless of what
    /// the rest of the response says: the tile is shown as revealed and the
    /// snapshot is marked inactive.
    pub fn confirm_reveal(mut self, x: u32, y: u32) -> Self {
        let Some(tile) = self
            .tiles
            .get_mut(x as usize)
            .and_then(|column| column.get_mut(y as usize))
        else {
            log::error!("Reveal response has no tile at ({}, {})", x, y);
            return self;
        };

        if tile.kind.is_mine() {
            log::info!("Kitten revealed at ({}, {})", x, y);
            tile.kind = TileKind::RevealedMine;
            self.game_over = true;
            self.game_active = false;
        }
        self
    }

    /// Board filled with one kind, active, with a fresh timer
    #[cfg(test)]
    pub fn filled(width: u32, height: u32, kind: TileKind) -> Self {
        Self {
            width,
            height,
            tiles: vec![vec![TileState::new(kind); height as usize]; width as usize],
            game_active: true,
            game_over: false,
            has_won: false,
            time_remaining: 240,
            formatted_time: "4:00".to_string(),
            num_kittens: 9,
        }
    }
}

// === Wire format ===

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct WireSnapshot {
    game_active: bool,
    #[serde(default)]
    formatted_time: String,
    #[serde(default)]
    time_remaining: i32,
    board: WireBoard,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct WireBoard {
    width: u32,
    height: u32,
    #[serde(default)]
    has_won: bool,
    #[serde(default)]
    game_over: bool,
    #[serde(default)]
    num_kittens: u32,
    #[serde(default)]
    tiles: Vec<Vec<WireTile>>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct WireTile {
    #[serde(rename = "type")]
    code: i32,
    #[serde(default)]
    flagged: bool,
    #[serde(default)]
    kitten_value: Option<i64>,
}

impl From<WireTile> for TileState {
    fn from(wire: WireTile) -> Self {
        let kind = TileKind::from_code(wire.code).unwrap_or_else(|| {
            log::warn!("Unknown tile type {}, showing as unrevealed", wire.code);
            TileKind::Unrevealed
        });
        let mine_value = wire
            .kitten_value
            .and_then(|v| u32::try_from(v).ok())
            .unwrap_or(0);
        Self {
            kind,
            flagged: wire.flagged,
            mine_value,
        }
    }
}

impl From<WireSnapshot> for GameSnapshot {
    fn from(wire: WireSnapshot) -> Self {
        let board = wire.board;
        let tiles: Vec<Vec<TileState>> = board
            .tiles
            .into_iter()
            .map(|column| column.into_iter().map(TileState::from).collect())
            .collect();

        let ragged = tiles.len() != board.width as usize
            || tiles.iter().any(|c| c.len() != board.height as usize);
        if ragged {
            log::warn!(
                "Tile grid does not match {}x{} board; missing tiles will be skipped",
                board.width,
                board.height
            );
        }

        Self {
            width: board.width,
            height: board.height,
            tiles,
            game_active: wire.game_active,
            game_over: board.game_over,
            has_won: board.has_won,
            time_remaining: wire.time_remaining,
            formatted_time: wire.formatted_time,
            num_kittens: board.num_kittens,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const SAMPLE: &str = r#"{
        "id": "abc",
        "difficulty": "EASY",
        "gameActive": true,
        "formattedTime": "3:59",
        "timeRemaining": 239,
        "board": {
            "width": 2,
            "height": 3,
            "hasWon": false,
            "gameOver": false,
            "numKittens": 1,
            "tiles": [
                [{"type": 0, "flagged": false}, {"type": -1, "flagged": true}, {"type": 3, "flagged": false}],
                [{"type": -2, "flagged": false}, {"type": -3, "flagged": false, "kittenValue": 5, "kitten": true, "revealed": false}, {"type": -4, "flagged": false, "kittenValue": 7}]
            ]
        }
    }"#;

    #[test]
    fn test_decode_snapshot() {
        let snap = GameSnapshot::from_json(SAMPLE).unwrap();
        assert_eq!((snap.width, snap.height), (2, 3));
        assert!(snap.game_active);
        assert_eq!(snap.time_remaining, 239);
        assert_eq!(snap.formatted_time, "3:59");
        assert_eq!(snap.num_kittens, 1);

        assert_eq!(snap.tile(0, 0).unwrap().kind, TileKind::Wall);
        assert!(snap.tile(0, 1).unwrap().flagged);
        assert_eq!(snap.tile(0, 2).unwrap().kind, TileKind::Number(3));
        assert_eq!(snap.tile(1, 0).unwrap().kind, TileKind::Empty);
        assert_eq!(snap.tile(1, 1).unwrap().kind, TileKind::UnrevealedMine);
        assert_eq!(snap.tile(1, 1).unwrap().mine_value, 5);
        assert_eq!(snap.tile(1, 2).unwrap().mine_value, 7);
    }

    #[test]
    fn test_unknown_code_is_contained() {
        let body = r#"{"gameActive": true, "board": {"width": 1, "height": 1,
            "tiles": [[{"type": 42, "flagged": false, "kittenValue": -3}]]}}"#;
        let snap = GameSnapshot::from_json(body).unwrap();
        let tile = snap.tile(0, 0).unwrap();
        assert_eq!(tile.kind, TileKind::Unrevealed);
        assert_eq!(tile.mine_value, 0);
    }

    #[test]
    fn test_ragged_grid_is_tolerated() {
        let body = r#"{"gameActive": true, "board": {"width": 2, "height": 2,
            "tiles": [[{"type": -1}]]}}"#;
        let snap = GameSnapshot::from_json(body).unwrap();
        assert!(snap.tile(0, 0).is_some());
        assert!(snap.tile(1, 1).is_none());
    }

    #[test]
    fn test_code_roundtrip_and_predicates() {
        for code in [-4, -3, -2, -1, 0, 1, 5, 8] {
            assert_eq!(TileKind::from_code(code).unwrap().code(), code);
        }
        assert_eq!(TileKind::from_code(9), None);
        assert_eq!(TileKind::from_code(-5), None);
        assert!(TileKind::UnrevealedMine.is_mine());
        assert!(!TileKind::Number(2).is_mine());
    }

    #[test]
    fn test_confirm_reveal_on_kitten_ends_game() {
        let mut snap = GameSnapshot::filled(3, 3, TileKind::Unrevealed);
        snap.tiles[1][2].kind = TileKind::UnrevealedMine;

        let snap = snap.confirm_reveal(1, 2);
        assert_eq!(snap.tile(1, 2).unwrap().kind, TileKind::RevealedMine);
        assert!(!snap.game_active);
        assert!(snap.game_over);
    }

    #[test]
    fn test_confirm_reveal_on_safe_tile_is_unchanged() {
        let mut snap = GameSnapshot::filled(3, 3, TileKind::Unrevealed);
        snap.tiles[0][0].kind = TileKind::Number(2);
        let before = snap.clone();
        assert_eq!(snap.confirm_reveal(0, 0), before);
    }

    #[test]
    fn test_confirm_reveal_missing_tile() {
        let snap = GameSnapshot::filled(2, 2, TileKind::Empty);
        let before = snap.clone();
        assert_eq!(snap.confirm_reveal(5, 5), before);
    }
}
