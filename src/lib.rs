//! Pumpy Pills - A trading-themed side-scrolling arcade game
//!
//! Core modules:
//! - `sim`: Deterministic simulation (difficulty, obstacle patterns, physics, collisions)
//! - `tuning`: Data-driven game balance
//! - `characters`: Character roster and selection hit-testing
//! - `platform`: Browser-side helpers (input debouncing, frame timing)

pub mod characters;
pub mod platform;
pub mod sim;
pub mod tuning;

pub use characters::{Character, CharacterManager};
pub use tuning::{Tuning, TuningError};

/// Game configuration constants
pub mod consts {
    /// Logical canvas dimensions
    pub const CANVAS_WIDTH: f32 = 480.0;
    pub const CANVAS_HEIGHT: f32 = 640.0;

    /// Player defaults
    pub const PLAYER_X: f32 = 120.0;
    pub const PLAYER_RADIUS: f32 = 15.0;
    /// Hitbox shrink factor (forgiving collisions)
    pub const COLLISION_SCALE: f32 = 0.8;

    /// Physics (per tick, one tick per rendered frame)
    pub const GRAVITY: f32 = 0.25;
    pub const MAX_FALL_SPEED: f32 = 8.0;
    pub const JUMP_STRENGTH: f32 = -5.5;

    /// Obstacle defaults
    pub const OBSTACLE_WIDTH: f32 = 60.0;
    pub const MIN_GAP: f32 = 120.0;
    pub const BASE_GAP: f32 = 210.0;
    pub const BASE_SPACING: f32 = 360.0;
    pub const MIN_SPACING: f32 = 240.0;

    /// Speed curve
    pub const BASE_SPEED: f32 = 1.4;
    pub const SPEED_SLOPE: f32 = 0.08;
    pub const SPEED_CAP: f32 = 3.2;

    /// Portfolio value at the start of a run
    pub const STARTING_PORTFOLIO: f64 = 50_000.0;
    /// Portfolio ceiling (one billion)
    pub const PORTFOLIO_CAP: f64 = 1e9;
}
