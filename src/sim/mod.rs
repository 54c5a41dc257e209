//! Client-side game engine
//!
//! Everything in here is pure and platform-free:
//! - Snapshots are decoded once and replaced wholesale
//! - Time advances only through `GameClient::frame`
//! - Randomness comes from a seeded RNG
//! - No DOM, audio or network dependencies

pub mod animation;
pub mod camera;
pub mod client;
pub mod input;
pub mod sequencer;
pub mod snapshot;

pub use animation::{AnimationClock, atlas_row, max_frames};
pub use camera::CameraShake;
pub use client::{FrameReport, GameClient, Ticket};
pub use input::{Gesture, InputRouter, TileCoord, pixel_to_tile};
pub use sequencer::{Cue, GameOverSequencer, Outcome, SequencePhase};
pub use snapshot::{GameSnapshot, TileKind, TileState};
