//! Kitten sprite animation
//!
//! All kittens sharing a value animate in lockstep: the frame is derived
//! from the loop tick and the value alone.

use crate::consts::TICKS_PER_FRAME;

/// Highest kitten value with its own atlas row
pub const MAX_KITTEN_VALUE: u32 = 9;

/// Frames in the atlas row for a kitten value
pub fn max_frames(value: u32) -> u64 {
    match value {
        0..=3 | 6 => 4,
        4 | 5 => 8,
        7 => 6,
        8 => 7,
        9 => 8,
        _ => 4,
    }
}

/// Atlas row for a kitten value (unknown values fall back to row 0)
pub fn atlas_row(value: u32) -> u32 {
    if value <= MAX_KITTEN_VALUE { value } else { 0 }
}

/// Loop tick counter driving kitten frames
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct AnimationClock {
    ticks: u64,
}

impl AnimationClock {
    pub fn new() -> Self {
        Self::default()
    }

    /// Clock positioned at an arbitrary tick
    pub fn at(ticks: u64) -> Self {
        Self { ticks }
    }

    pub fn ticks(&self) -> u64 {
        self.ticks
    }

    /// Advance one loop tick. Returns true when the shared frame index changed.
    pub fn tick(&mut self) -> bool {
        self.ticks = self.ticks.wrapping_add(1);
        self.ticks % TICKS_PER_FRAME == 0
    }

    pub fn reset(&mut self) {
        self.ticks = 0;
    }

    /// Current frame for a kitten value
    pub fn frame(&self, value: u32) -> u32 {
        ((self.ticks / TICKS_PER_FRAME) % max_frames(value)) as u32
    }
}
