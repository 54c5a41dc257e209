//! Camera shake
//!
//! Damped spring pulling the board back to its rest position after a kick
//! in a random direction. Positions are in tile units; multiply by the tile
//! size for the pixel translation.

use glam::Vec2;
use rand::Rng;

use crate::consts::*;

/// Spring state for the board offset
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct CameraShake {
    pub position: Vec2,
    pub velocity: Vec2,
    pub active: bool,
}

impl CameraShake {
    pub fn new() -> Self {
        Self::default()
    }

    /// Kick the camera in a random direction
    pub fn activate(&mut self, rng: &mut impl Rng) {
        let angle = rng.random_range(0.0..std::f32::consts::TAU);
        self.activate_at(angle);
    }

    /// Kick the camera along `angle` (radians)
    pub fn activate_at(&mut self, angle: f32) {
        let dir = Vec2::new(angle.cos(), angle.sin());
        self.velocity = dir * SHAKE_VELOCITY;
        self.position = dir * SHAKE_START_OFFSET;
        self.active = true;
    }

    /// Integrate one loop tick. Returns true while still shaking.
    pub fn step(&mut self) -> bool {
        if !self.active {
            return false;
        }

        let delta = Vec2::ZERO - self.position;
        self.velocity = (self.velocity + delta * SHAKE_STRENGTH) * SHAKE_DAMPING;
        self.position += self.velocity;

        let settled = self.velocity.abs().max_element() < SHAKE_EPSILON
            && delta.abs().max_element() < SHAKE_EPSILON;
        if settled {
            self.halt();
        }
        self.active
    }

    /// Snap to rest at the origin
    pub fn halt(&mut self) {
        self.position = Vec2::ZERO;
        self.velocity = Vec2::ZERO;
        self.active = false;
    }

    /// Board translation in pixels
    pub fn offset(&self, tile_size: f32) -> Vec2 {
        self.position * tile_size
    }
}
