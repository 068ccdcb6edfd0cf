//! Level-driven difficulty curve
//!
//! Speed, gap size and spacing are pure functions of the level. The level
//! advances once enough obstacles have been passed.

use serde::{Deserialize, Serialize};

use crate::tuning::DifficultyTuning;

/// Current difficulty and level progress
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DifficultyManager {
    pub level: u32,
    pub obstacles_in_level: u32,
    pub obstacles_needed: u32,
    pub speed: f32,
    pub pipe_gap: f32,
    pub pipe_spacing: f32,
    tuning: DifficultyTuning,
    min_gap: f32,
}

impl DifficultyManager {
    /// `min_gap` is the global gap floor shared with the obstacle generator
    pub fn new(tuning: DifficultyTuning, min_gap: f32) -> Self {
        let mut manager = Self {
            level: 1,
            obstacles_in_level: 0,
            obstacles_needed: tuning.initial_obstacles_needed,
            speed: tuning.base_speed,
            pipe_gap: tuning.base_gap,
            pipe_spacing: tuning.base_spacing,
            tuning,
            min_gap,
        };
        manager.reset();
        manager
    }

    pub fn reset(&mut self) {
        self.level = 1;
        self.obstacles_in_level = 0;
        self.obstacles_needed = self.tuning.initial_obstacles_needed;
        self.update_difficulty();
    }

    /// Recompute the derived tuning from `level`
    pub fn update_difficulty(&mut self) {
        let t = &self.tuning;
        let level = self.level as f32;
        self.speed = (t.base_speed + level * t.speed_slope).min(t.speed_cap);
        self.pipe_gap = (t.base_gap - level * t.gap_slope).max(self.min_gap);
        self.pipe_spacing = (t.base_spacing - level * t.spacing_slope).max(t.min_spacing);
    }

    /// Record one obstacle passed. Returns true when this pass advanced the level.
    pub fn level_up(&mut self) -> bool {
        self.obstacles_in_level += 1;
        if self.obstacles_in_level < self.obstacles_needed {
            return false;
        }

        self.level += 1;
        self.obstacles_in_level = 0;
        self.obstacles_needed = obstacles_needed_for(&self.tuning, self.level);
        self.update_difficulty();
        true
    }

    /// Score multiplier for the current level
    pub fn level_multiplier(&self, level_bonus: f64) -> f64 {
        1.0 + self.level as f64 * level_bonus
    }
}

/// Obstacles to pass on `level` before the next level-up (sublinear, capped)
pub fn obstacles_needed_for(tuning: &DifficultyTuning, level: u32) -> u32 {
    let grown = tuning.initial_obstacles_needed + (level as f32 * 1.5).floor() as u32;
    grown.min(tuning.max_obstacles_needed)
}
