//! Data-driven game balance
//!
//! Every number that shapes a run lives here, grouped by the subsystem that
//! reads it. Tunings load from JSON (missing fields fall back to defaults) and
//! are validated up front so a bad config fails at startup instead of
//! producing unplayable obstacles mid-run.

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::consts::*;

/// Configuration problems detected by [`Tuning::validate`]
#[derive(Debug, Error)]
pub enum TuningError {
    #[error("canvas dimensions must be positive, got {width}x{height}")]
    CanvasSize { width: f32, height: f32 },
    #[error("min gap must be positive, got {0}")]
    MinGap(f32),
    #[error("base gap {base_gap} is smaller than min gap {min_gap}")]
    BaseGapBelowMin { base_gap: f32, min_gap: f32 },
    #[error("min gap {min_gap} plus edge margins {edge_margin}x2 does not fit canvas height {height}")]
    GapExceedsCanvas {
        min_gap: f32,
        edge_margin: f32,
        height: f32,
    },
    #[error("staircase edge boundary {boundary} leaves no room on canvas height {height}")]
    EdgeBoundary { boundary: f32, height: f32 },
    #[error("min spacing {min_spacing} must exceed obstacle width {width}")]
    SpacingTooTight { min_spacing: f32, width: f32 },
    #[error("obstacle width must be positive, got {0}")]
    ObstacleWidth(f32),
    #[error("speed cap {cap} is below base speed {base}")]
    SpeedCap { cap: f32, base: f32 },
    #[error("base speed must be positive, got {0}")]
    BaseSpeed(f32),
    #[error("difficulty slope `{name}` must be non-negative, got {value}")]
    DifficultySlope { name: &'static str, value: f32 },
    #[error("pattern run {min}..={max} must be within 1..={limit}")]
    PatternRun { min: u32, max: u32, limit: u32 },
    #[error("collision scale must be in (0, 1], got {0}")]
    CollisionScale(f32),
    #[error("player radius must be positive, got {0}")]
    PlayerRadius(f32),
    #[error("gravity and max fall speed must be positive, got {gravity} / {max_fall}")]
    Gravity { gravity: f32, max_fall: f32 },
    #[error("jump strength must be negative (upward), got {0}")]
    JumpStrength(f32),
    #[error("wave period must be positive, got {0}")]
    WavePeriod(f32),
    #[error("probability `{name}` must be in [0, 1], got {value}")]
    Probability { name: &'static str, value: f32 },
    #[error("{0} capacity must be non-zero")]
    Capacity(&'static str),
    #[error("invalid tuning JSON: {0}")]
    Json(#[from] serde_json::Error),
}

/// Longest allowed pattern run (spawns)
pub const MAX_PATTERN_RUN: u32 = 1_000;

/// Logical canvas the world is laid out on
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct CanvasTuning {
    pub width: f32,
    pub height: f32,
}

impl Default for CanvasTuning {
    fn default() -> Self {
        Self {
            width: CANVAS_WIDTH,
            height: CANVAS_HEIGHT,
        }
    }
}

/// Player physics
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct PhysicsTuning {
    pub player_x: f32,
    pub player_radius: f32,
    /// Hitbox shrink factor applied to the radius during collision
    pub collision_scale: f32,
    pub gravity: f32,
    pub max_fall_speed: f32,
    /// Negative = upward
    pub jump_strength: f32,
    /// Multiplier applied to gravity (slightly below 1 to be forgiving)
    pub gravity_factor: f32,
    /// Multiplier applied to max fall speed
    pub max_fall_factor: f32,
    /// Multiplier applied to every jump impulse
    pub jump_factor: f32,
    /// Extra upward impulse on the second consecutive jump
    pub double_jump_boost: f32,
    /// Falling faster than this resets the jump chain
    pub falling_threshold: f32,
}

impl Default for PhysicsTuning {
    fn default() -> Self {
        Self {
            player_x: PLAYER_X,
            player_radius: PLAYER_RADIUS,
            collision_scale: COLLISION_SCALE,
            gravity: GRAVITY,
            max_fall_speed: MAX_FALL_SPEED,
            jump_strength: JUMP_STRENGTH,
            gravity_factor: 0.95,
            max_fall_factor: 1.05,
            jump_factor: 1.05,
            double_jump_boost: 0.12,
            falling_threshold: 0.5,
        }
    }
}

/// Obstacle geometry and gap-size policy
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ObstacleTuning {
    pub width: f32,
    /// Hard floor on every navigable gap
    pub min_gap: f32,
    /// Minimum distance kept between a gap center and either canvas edge
    pub edge_margin: f32,
    /// Gap multiplier for the narrow pattern
    pub narrow_factor: f32,
    /// Narrow gaps never drop below `min_gap + narrow_buffer`
    pub narrow_buffer: f32,
    /// Chance of a widened "breather" gap on non-narrow obstacles
    pub breather_chance: f32,
    pub breather_factor: f32,
    /// Fixed deduction applied before the final `min_gap` clamp
    pub gap_deduction: f32,
    /// Obstacles are dropped once their right edge passes this far left of the viewport
    pub prune_margin: f32,
    /// Upper bound (exclusive) of the decorative height jitter
    pub decoration_jitter: f32,
}

impl Default for ObstacleTuning {
    fn default() -> Self {
        Self {
            width: OBSTACLE_WIDTH,
            min_gap: MIN_GAP,
            edge_margin: 50.0,
            narrow_factor: 0.75,
            narrow_buffer: 10.0,
            breather_chance: 0.1,
            breather_factor: 1.2,
            gap_deduction: 10.0,
            prune_margin: 50.0,
            decoration_jitter: 10.0,
        }
    }
}

/// Per-pattern gap-center parameters
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct PatternTuning {
    pub staircase_step: f32,
    /// Staircase reverses when its center comes this close to an edge
    pub edge_boundary: f32,
    pub wave_amplitude: f32,
    /// Half-period of the wave, in obstacles
    pub wave_period: f32,
    pub zigzag_offset: f32,
    pub narrow_jitter: f32,
    pub rhythm_offset: f32,
    pub standard_jitter: f32,
    pub surprise_chance: f32,
    pub surprise_jitter: f32,
    /// Patterns switch every `min_run..=max_run` spawns
    pub min_run: u32,
    pub max_run: u32,
}

impl Default for PatternTuning {
    fn default() -> Self {
        Self {
            staircase_step: 50.0,
            edge_boundary: 150.0,
            wave_amplitude: 100.0,
            wave_period: 6.0,
            zigzag_offset: 80.0,
            narrow_jitter: 50.0,
            rhythm_offset: 100.0,
            standard_jitter: 60.0,
            surprise_chance: 0.2,
            surprise_jitter: 50.0,
            min_run: 4,
            max_run: 8,
        }
    }
}

/// Difficulty curve
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct DifficultyTuning {
    pub base_speed: f32,
    pub speed_slope: f32,
    pub speed_cap: f32,
    pub base_gap: f32,
    pub gap_slope: f32,
    pub base_spacing: f32,
    pub spacing_slope: f32,
    pub min_spacing: f32,
    pub initial_obstacles_needed: u32,
    pub max_obstacles_needed: u32,
}

impl Default for DifficultyTuning {
    fn default() -> Self {
        Self {
            base_speed: BASE_SPEED,
            speed_slope: SPEED_SLOPE,
            speed_cap: SPEED_CAP,
            base_gap: BASE_GAP,
            gap_slope: 10.0,
            base_spacing: BASE_SPACING,
            spacing_slope: 15.0,
            min_spacing: MIN_SPACING,
            initial_obstacles_needed: 3,
            max_obstacles_needed: 50,
        }
    }
}

/// Score and portfolio rewards
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ScoringTuning {
    pub starting_portfolio: f64,
    pub portfolio_cap: f64,
    /// Portfolio gain per obstacle passed, before the level multiplier
    pub portfolio_gain: f64,
    /// Score multiplier is `1 + level * level_bonus`
    pub level_bonus: f64,
}

impl Default for ScoringTuning {
    fn default() -> Self {
        Self {
            starting_portfolio: STARTING_PORTFOLIO,
            portfolio_cap: PORTFOLIO_CAP,
            portfolio_gain: 1_000.0,
            level_bonus: 0.15,
        }
    }
}

/// Candle trail behind the player
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ChartTuning {
    pub candle_width: f32,
    pub max_candles: usize,
    pub wick_buffer: f32,
    pub vertical_fill: f32,
}

impl Default for ChartTuning {
    fn default() -> Self {
        Self {
            candle_width: 8.0,
            max_candles: 60,
            wick_buffer: 10.0,
            vertical_fill: 1.2,
        }
    }
}

/// Cosmetic particle bursts
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ParticleTuning {
    pub capacity: usize,
    pub life_ticks: u32,
    pub max_velocity: f32,
    pub burst: usize,
}

impl Default for ParticleTuning {
    fn default() -> Self {
        Self {
            capacity: 12,
            life_ticks: 30,
            max_velocity: 1.0,
            burst: 4,
        }
    }
}

/// Complete game balance
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Tuning {
    pub canvas: CanvasTuning,
    pub physics: PhysicsTuning,
    pub obstacles: ObstacleTuning,
    pub patterns: PatternTuning,
    pub difficulty: DifficultyTuning,
    pub scoring: ScoringTuning,
    pub chart: ChartTuning,
    pub particles: ParticleTuning,
}

impl Tuning {
    /// Parse a tuning from JSON and validate it
    pub fn from_json(json: &str) -> Result<Self, TuningError> {
        let tuning: Tuning = serde_json::from_str(json)?;
        tuning.validate()?;
        Ok(tuning)
    }

    pub fn to_json(&self) -> Result<String, TuningError> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Reject configurations that could produce invalid obstacles
    pub fn validate(&self) -> Result<(), TuningError> {
        let canvas = &self.canvas;
        let obstacles = &self.obstacles;
        let patterns = &self.patterns;
        let difficulty = &self.difficulty;
        let physics = &self.physics;

        if !(canvas.width > 0.0 && canvas.height > 0.0) {
            return Err(TuningError::CanvasSize {
                width: canvas.width,
                height: canvas.height,
            });
        }
        if !(obstacles.width > 0.0) {
            return Err(TuningError::ObstacleWidth(obstacles.width));
        }
        if !(obstacles.min_gap > 0.0) {
            return Err(TuningError::MinGap(obstacles.min_gap));
        }
        if difficulty.base_gap < obstacles.min_gap {
            return Err(TuningError::BaseGapBelowMin {
                base_gap: difficulty.base_gap,
                min_gap: obstacles.min_gap,
            });
        }
        if obstacles.min_gap + 2.0 * obstacles.edge_margin > canvas.height {
            return Err(TuningError::GapExceedsCanvas {
                min_gap: obstacles.min_gap,
                edge_margin: obstacles.edge_margin,
                height: canvas.height,
            });
        }
        if patterns.edge_boundary * 2.0 >= canvas.height {
            return Err(TuningError::EdgeBoundary {
                boundary: patterns.edge_boundary,
                height: canvas.height,
            });
        }
        if difficulty.min_spacing <= obstacles.width {
            return Err(TuningError::SpacingTooTight {
                min_spacing: difficulty.min_spacing,
                width: obstacles.width,
            });
        }
        if !(difficulty.base_speed > 0.0) {
            return Err(TuningError::BaseSpeed(difficulty.base_speed));
        }
        for (name, value) in [
            ("speed_slope", difficulty.speed_slope),
            ("gap_slope", difficulty.gap_slope),
            ("spacing_slope", difficulty.spacing_slope),
        ] {
            if !(value >= 0.0) {
                return Err(TuningError::DifficultySlope { name, value });
            }
        }
        if difficulty.speed_cap < difficulty.base_speed {
            return Err(TuningError::SpeedCap {
                cap: difficulty.speed_cap,
                base: difficulty.base_speed,
            });
        }
        if !(physics.collision_scale > 0.0 && physics.collision_scale <= 1.0) {
            return Err(TuningError::CollisionScale(physics.collision_scale));
        }
        if !(physics.player_radius > 0.0) {
            return Err(TuningError::PlayerRadius(physics.player_radius));
        }
        if !(physics.gravity > 0.0 && physics.max_fall_speed > 0.0) {
            return Err(TuningError::Gravity {
                gravity: physics.gravity,
                max_fall: physics.max_fall_speed,
            });
        }
        if !(physics.jump_strength < 0.0) {
            return Err(TuningError::JumpStrength(physics.jump_strength));
        }
        if !(patterns.wave_period > 0.0) {
            return Err(TuningError::WavePeriod(patterns.wave_period));
        }
        for (name, value) in [
            ("breather_chance", obstacles.breather_chance),
            ("surprise_chance", patterns.surprise_chance),
        ] {
            if !(0.0..=1.0).contains(&value) {
                return Err(TuningError::Probability { name, value });
            }
        }
        if patterns.min_run == 0
            || patterns.max_run < patterns.min_run
            || patterns.max_run > MAX_PATTERN_RUN
        {
            return Err(TuningError::PatternRun {
                min: patterns.min_run,
                max: patterns.max_run,
                limit: MAX_PATTERN_RUN,
            });
        }
        if self.particles.capacity == 0 {
            return Err(TuningError::Capacity("particle"));
        }
        if self.chart.max_candles == 0 {
            return Err(TuningError::Capacity("candle"));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_tuning_is_valid() {
        assert!(Tuning::default().validate().is_ok());
    }

    #[test]
    fn test_min_gap_larger_than_canvas_fails_fast() {
        let mut tuning = Tuning::default();
        tuning.obstacles.min_gap = tuning.canvas.height + 1.0;
        tuning.difficulty.base_gap = tuning.obstacles.min_gap;
        assert!(matches!(
            tuning.validate(),
            Err(TuningError::GapExceedsCanvas { .. })
        ));
    }

    #[test]
    fn test_base_gap_below_min_gap_rejected() {
        let mut tuning = Tuning::default();
        tuning.difficulty.base_gap = tuning.obstacles.min_gap - 1.0;
        assert!(matches!(
            tuning.validate(),
            Err(TuningError::BaseGapBelowMin { .. })
        ));
    }

    #[test]
    fn test_collision_scale_bounds() {
        let mut tuning = Tuning::default();
        tuning.physics.collision_scale = 0.0;
        assert!(tuning.validate().is_err());
        tuning.physics.collision_scale = 1.0;
        assert!(tuning.validate().is_ok());
    }

    #[test]
    fn test_from_json_partial_uses_defaults() {
        let tuning = Tuning::from_json(r#"{ "obstacles": { "min_gap": 130.0 } }"#).unwrap();
        assert_eq!(tuning.obstacles.min_gap, 130.0);
        assert_eq!(tuning.obstacles.width, OBSTACLE_WIDTH);
        assert_eq!(tuning.canvas.height, CANVAS_HEIGHT);
    }

    #[test]
    fn test_from_json_rejects_invalid() {
        assert!(matches!(
            Tuning::from_json(r#"{ "canvas": { "height": 100.0 } }"#),
            Err(TuningError::GapExceedsCanvas { .. })
        ));
        assert!(matches!(Tuning::from_json("{ nope"), Err(TuningError::Json(_))));
    }

    #[test]
    fn test_negative_difficulty_slopes_rejected() {
        let mut tuning = Tuning::default();
        tuning.difficulty.speed_slope = -0.5;
        assert!(matches!(
            tuning.validate(),
            Err(TuningError::DifficultySlope { name: "speed_slope", .. })
        ));

        let mut tuning = Tuning::default();
        tuning.difficulty.gap_slope = -40.0;
        assert!(matches!(
            tuning.validate(),
            Err(TuningError::DifficultySlope { name: "gap_slope", .. })
        ));

        let mut tuning = Tuning::default();
        tuning.difficulty.spacing_slope = -30.0;
        assert!(matches!(
            tuning.validate(),
            Err(TuningError::DifficultySlope { name: "spacing_slope", .. })
        ));

        // Flat curves are allowed
        let mut tuning = Tuning::default();
        tuning.difficulty.speed_slope = 0.0;
        tuning.difficulty.gap_slope = 0.0;
        tuning.difficulty.spacing_slope = 0.0;
        assert!(tuning.validate().is_ok());
    }

    #[test]
    fn test_inverted_curve_json_rejected() {
        let json = r#"{"difficulty":{"speed_slope":-0.5,"gap_slope":-40.0,"spacing_slope":-30.0}}"#;
        assert!(matches!(
            Tuning::from_json(json),
            Err(TuningError::DifficultySlope { .. })
        ));
    }

    #[test]
    fn test_non_positive_base_speed_rejected() {
        let mut tuning = Tuning::default();
        tuning.difficulty.base_speed = 0.0;
        assert!(matches!(tuning.validate(), Err(TuningError::BaseSpeed(_))));
        tuning.difficulty.base_speed = -1.0;
        assert!(matches!(tuning.validate(), Err(TuningError::BaseSpeed(_))));
    }

    #[test]
    fn test_pattern_run_bounds() {
        let mut tuning = Tuning::default();
        tuning.patterns.min_run = 4_294_967_290;
        tuning.patterns.max_run = u32::MAX;
        assert!(matches!(
            tuning.validate(),
            Err(TuningError::PatternRun { .. })
        ));

        tuning.patterns.min_run = 0;
        tuning.patterns.max_run = 8;
        assert!(matches!(
            tuning.validate(),
            Err(TuningError::PatternRun { .. })
        ));

        tuning.patterns.min_run = 1;
        tuning.patterns.max_run = MAX_PATTERN_RUN;
        assert!(tuning.validate().is_ok());
    }

    #[test]
    fn test_json_roundtrip_preserves_values() {
        let mut tuning = Tuning::default();
        tuning.patterns.max_run = 6;
        let json = tuning.to_json().unwrap();
        let back = Tuning::from_json(&json).unwrap();
        assert_eq!(back.patterns.max_run, 6);
    }
}
