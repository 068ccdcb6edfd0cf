//! Player physics
//!
//! Gravity integration, jump impulses with a double-tap boost, and a smoothed
//! visual tilt.

use glam::Vec2;
use serde::{Deserialize, Serialize};
use std::f32::consts::{FRAC_PI_4, FRAC_PI_6};

use super::collision::Aabb;
use crate::tuning::PhysicsTuning;

/// Baseline rotation smoothing
const BASE_ROTATION_LERP: f32 = 0.1;
/// Smoothing right after a jump (snappier tilt)
const JUMP_ROTATION_LERP: f32 = 0.3;
/// Per-tick decay of the post-jump smoothing boost
const ROTATION_LERP_DECAY: f32 = 0.02;
/// Tilt per unit of vertical velocity
const ROTATION_PER_VELOCITY: f32 = 0.2;

/// The player character
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Player {
    /// Fixed horizontal screen position
    pub x: f32,
    pub y: f32,
    /// Vertical velocity (positive = falling)
    pub vy: f32,
    /// Consecutive jumps since the player last fell
    pub jump_count: u32,
    /// Visual tilt (radians)
    pub rotation: f32,
    pub target_rotation: f32,
    rotation_lerp: f32,
    tuning: PhysicsTuning,
}

impl Player {
    pub fn new(tuning: PhysicsTuning, y: f32) -> Self {
        Self {
            x: tuning.player_x,
            y,
            vy: 0.0,
            jump_count: 0,
            rotation: 0.0,
            target_rotation: 0.0,
            rotation_lerp: BASE_ROTATION_LERP,
            tuning,
        }
    }

    pub fn reset(&mut self, y: f32) {
        self.x = self.tuning.player_x;
        self.y = y;
        self.vy = 0.0;
        self.jump_count = 0;
        self.rotation = 0.0;
        self.target_rotation = 0.0;
        self.rotation_lerp = BASE_ROTATION_LERP;
    }

    #[inline]
    pub fn pos(&self) -> Vec2 {
        Vec2::new(self.x, self.y)
    }

    #[inline]
    pub fn radius(&self) -> f32 {
        self.tuning.player_radius
    }

    /// Forgiving hitbox used against obstacles
    pub fn bounds(&self) -> Aabb {
        Aabb::around(self.pos(), self.tuning.player_radius, self.tuning.collision_scale)
    }

    /// Advance one tick under `gravity`, capping fall speed at `max_fall`
    pub fn update(&mut self, gravity: f32, max_fall: f32) {
        self.vy += gravity * self.tuning.gravity_factor;
        self.vy = self.vy.min(max_fall * self.tuning.max_fall_factor);
        self.y += self.vy;

        // Clearly falling: the next jump starts a fresh chain
        if self.vy > self.tuning.falling_threshold {
            self.jump_count = 0;
        }

        self.target_rotation = (self.vy * ROTATION_PER_VELOCITY).clamp(-FRAC_PI_6, FRAC_PI_4);
        self.rotation += (self.target_rotation - self.rotation) * self.rotation_lerp;
        if self.rotation_lerp > BASE_ROTATION_LERP {
            self.rotation_lerp = (self.rotation_lerp - ROTATION_LERP_DECAY).max(BASE_ROTATION_LERP);
        }
    }

    /// Apply a jump impulse. `jump_strength` is negative (upward).
    pub fn jump(&mut self, jump_strength: f32) {
        self.jump_count += 1;
        let mut impulse = jump_strength * self.tuning.jump_factor;
        if self.jump_count == 2 {
            impulse -= self.tuning.double_jump_boost;
        }
        self.vy = impulse;
        self.rotation_lerp = JUMP_ROTATION_LERP;
    }

    /// Keep the player below the ceiling; returns true if clamped
    pub fn clamp_to_ceiling(&mut self) -> bool {
        let radius = self.tuning.player_radius;
        if self.y < radius {
            self.y = radius;
            self.vy = self.vy.max(0.0);
            return true;
        }
        false
    }
}
