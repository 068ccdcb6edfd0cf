//! Deterministic simulation module
//!
//! All gameplay logic lives here. This module must be pure and deterministic:
//! - One tick per rendered frame
//! - Seeded RNG only
//! - Obstacles kept in spawn order (oldest first)
//! - No rendering or platform dependencies

pub mod chart;
pub mod collision;
pub mod difficulty;
pub mod hud;
pub mod obstacles;
pub mod particles;
pub mod pattern;
pub mod player;
pub mod state;
pub mod tick;

use thiserror::Error;

use crate::tuning::TuningError;

pub use chart::{Candle, CandleDirection, ChartTrail};
pub use collision::{Aabb, CollisionResult, HitSide, check_collision};
pub use difficulty::DifficultyManager;
pub use hud::HudSnapshot;
pub use obstacles::{Obstacle, ObstacleField};
pub use particles::{Particle, Particles};
pub use pattern::{Pattern, PatternSession};
pub use player::Player;
pub use state::{GamePhase, GameState, RunSummary, World};
pub use tick::{TickEvents, TickInput, tick};

/// Fatal simulation errors surfaced to the frame driver
#[derive(Debug, Error)]
pub enum SimError {
    #[error(transparent)]
    Tuning(#[from] TuningError),
    #[error(
        "obstacle geometry violated: top={top} bottom={bottom} (min gap {min_gap}, canvas height {canvas_height})"
    )]
    InvalidObstacle {
        top: f32,
        bottom: f32,
        min_gap: f32,
        canvas_height: f32,
    },
}
