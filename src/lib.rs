//! Kitten Sweeper - browser client for a kitten-themed minesweeper
//!
//! Core modules:
//! - `sim`: Client-side game engine (snapshot, input, animation, shake, sequencing)
//! - `net`: HTTP round trips against the authoritative game server
//! - `renderer`: Pure draw-list and status-panel projection
//! - `platform`: Browser DOM application of rendered output
//! - `settings`: Persisted player preferences

#[cfg(target_arch = "wasm32")]
pub mod audio;
pub mod net;
pub mod platform;
pub mod renderer;
pub mod settings;
pub mod sim;

pub use settings::Settings;

/// Game configuration constants
pub mod consts {
    /// Rendered tile edge in pixels
    pub const TILE_SIZE: f32 = 32.0;
    /// Source atlas cell edge in pixels
    pub const ATLAS_CELL_PX: u32 = 16;
    /// Atlas cells are drawn at 2x
    pub const SPRITE_SCALE: u32 = 2;

    /// Spring pull toward the origin per tick
    pub const SHAKE_STRENGTH: f32 = 2.0;
    /// Velocity retained per tick
    pub const SHAKE_DAMPING: f32 = 0.85;
    /// Initial shake speed (tile units per tick)
    pub const SHAKE_VELOCITY: f32 = 0.15;
    /// Initial displacement from the origin (tile units)
    pub const SHAKE_START_OFFSET: f32 = 0.15;
    /// Below this on every axis the shake snaps to rest
    pub const SHAKE_EPSILON: f32 = 0.001;

    /// Loop ticks per kitten animation frame (~4 Hz at 60 Hz)
    pub const TICKS_PER_FRAME: u64 = 15;
    /// Accumulated loop time between server time ticks
    pub const TIME_TICK_MS: f64 = 1000.0;
    /// Delay between game end and the result overlay
    pub const GAME_OVER_DELAY_MS: f64 = 2000.0;
    /// Largest frame delta fed to the loop (background tabs resume with a huge gap)
    pub const MAX_FRAME_MS: f64 = 1000.0;
    /// Seconds remaining at which the timer switches to its warning style
    pub const LOW_TIME_THRESHOLD: i32 = 10;

    /// Asset locations
    pub const TILE_ATLAS_URL: &str = "/images/MinesweeperTiles.png";
    pub const KITTEN_ATLAS_URL: &str = "/images/kittens.png";
    pub const MEOW_URLS: [&str; 4] = [
        "/audio/cat-meow-1.mp3",
        "/audio/cat-meow-2.mp3",
        "/audio/cat-meow-3.mp3",
        "/audio/cat-meow-4.mp3",
    ];
    pub const GAME_MUSIC_URL: &str = "/audio/game_soundtrack.mp3";
    pub const GAME_OVER_MUSIC_URL: &str = "/audio/gameover_soundtrack.mp3";
}
