//! Game state and core simulation types
//!
//! `GameState` is the run record (phase, score, portfolio, scroll). `World`
//! owns every simulation subsystem plus the seeded RNG and is the single value
//! the frame driver passes into [`tick`](super::tick::tick).

use rand::SeedableRng;
use rand_pcg::Pcg32;
use serde::{Deserialize, Serialize};

use super::SimError;
use super::chart::ChartTrail;
use super::difficulty::DifficultyManager;
use super::obstacles::ObstacleField;
use super::particles::Particles;
use super::player::Player;
use crate::tuning::{ScoringTuning, Tuning};

/// Current phase of the game
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum GamePhase {
    /// Assets still loading
    #[default]
    Loading,
    /// Title / character select, waiting for the first jump
    Start,
    /// Active gameplay
    Playing,
    /// Run ended, waiting for a restart jump
    GameOver,
}

/// The run record shown to the player
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GameState {
    pub phase: GamePhase,
    pub score: u64,
    pub portfolio_value: f64,
    /// Total horizontal distance travelled
    pub world_x: f32,
    pub scroll: f32,
    /// Kept across restarts
    pub selected_character: Option<String>,
    scoring: ScoringTuning,
}

impl GameState {
    pub fn new(scoring: ScoringTuning) -> Self {
        Self {
            phase: GamePhase::Loading,
            score: 0,
            portfolio_value: scoring.starting_portfolio,
            world_x: 0.0,
            scroll: 0.0,
            selected_character: None,
            scoring,
        }
    }

    /// Clear per-run values; phase and character selection are left alone
    pub fn reset(&mut self) {
        self.score = 0;
        self.portfolio_value = self.scoring.starting_portfolio;
        self.world_x = 0.0;
        self.scroll = 0.0;
    }

    pub fn is_playing(&self) -> bool {
        self.phase == GamePhase::Playing
    }

    /// Add `amount` scaled by the level multiplier (rounded up)
    pub fn increment_score(&mut self, amount: u64, difficulty: &DifficultyManager) -> u64 {
        let multiplier = difficulty.level_multiplier(self.scoring.level_bonus);
        self.score += (amount as f64 * multiplier).ceil() as u64;
        self.score
    }

    /// Adjust the portfolio, capped at the configured ceiling
    pub fn update_portfolio(&mut self, delta: f64) -> f64 {
        self.portfolio_value = (self.portfolio_value + delta).min(self.scoring.portfolio_cap);
        self.portfolio_value
    }

    /// Portfolio reward for one obstacle passed at the current level
    pub fn pass_reward(&self, difficulty: &DifficultyManager) -> f64 {
        self.scoring.portfolio_gain * difficulty.level_multiplier(self.scoring.level_bonus)
    }

    pub fn advance_world(&mut self, distance: f32) {
        self.world_x += distance;
        self.scroll += distance;
    }
}

/// Final numbers of a run, returned by [`World::dispose`]
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RunSummary {
    pub score: u64,
    pub portfolio_value: f64,
    pub level: u32,
    pub obstacles_spawned: u32,
    pub ticks: u64,
}

/// Every piece of simulation state, single-owner
#[derive(Debug, Clone)]
pub struct World {
    pub tuning: Tuning,
    pub seed: u64,
    pub rng: Pcg32,
    pub game: GameState,
    pub difficulty: DifficultyManager,
    pub obstacles: ObstacleField,
    pub player: Player,
    pub chart: ChartTrail,
    /// Visual particles (not gameplay-affecting)
    pub particles: Particles,
    /// Simulation ticks this run
    pub time_ticks: u64,
}

impl World {
    /// Validate `tuning` and build a world in the loading phase
    pub fn new(tuning: Tuning, seed: u64) -> Result<Self, SimError> {
        tuning.validate()?;

        let mut rng = Pcg32::seed_from_u64(seed);
        let difficulty = DifficultyManager::new(tuning.difficulty.clone(), tuning.obstacles.min_gap);
        let obstacles = ObstacleField::new(
            tuning.obstacles.clone(),
            tuning.patterns.clone(),
            tuning.canvas.width,
            tuning.canvas.height,
            difficulty.pipe_gap,
            difficulty.pipe_spacing,
            &mut rng,
        );
        let player = Player::new(tuning.physics.clone(), tuning.canvas.height / 2.0);
        let chart = ChartTrail::new(tuning.chart.clone(), tuning.canvas.height);
        let particles = Particles::new(tuning.particles.clone());
        let game = GameState::new(tuning.scoring.clone());

        log::info!("World created with seed {}", seed);

        Ok(Self {
            tuning,
            seed,
            rng,
            game,
            difficulty,
            obstacles,
            player,
            chart,
            particles,
            time_ticks: 0,
        })
    }

    /// Assets are ready: show the start screen
    pub fn finish_loading(&mut self) {
        if self.game.phase == GamePhase::Loading {
            self.game.phase = GamePhase::Start;
        }
    }

    /// Reset every subsystem for a fresh run (phase unchanged)
    pub fn reset(&mut self) {
        self.game.reset();
        self.difficulty.reset();
        self.obstacles.reset(
            self.difficulty.pipe_gap,
            self.difficulty.pipe_spacing,
            &mut self.rng,
        );
        self.player.reset(self.tuning.canvas.height / 2.0);
        self.chart.reset();
        self.particles.reset();
        self.time_ticks = 0;
    }

    /// Reset and enter play
    pub fn start_game(&mut self) {
        self.reset();
        self.game.phase = GamePhase::Playing;
        log::info!("Run started (seed {})", self.seed);
    }

    pub fn end_game(&mut self) {
        self.game.phase = GamePhase::GameOver;
        log::info!(
            "Position liquidated: score {}, level {}, portfolio ${:.0}",
            self.game.score,
            self.difficulty.level,
            self.game.portfolio_value
        );
    }

    pub fn set_selected_character(&mut self, id: impl Into<String>) {
        self.game.selected_character = Some(id.into());
    }

    pub fn summary(&self) -> RunSummary {
        RunSummary {
            score: self.game.score,
            portfolio_value: self.game.portfolio_value,
            level: self.difficulty.level,
            obstacles_spawned: self.obstacles.session.obstacle_count,
            ticks: self.time_ticks,
        }
    }

    /// Tear down the world, returning the final run numbers
    pub fn dispose(self) -> RunSummary {
        let summary = self.summary();
        log::info!("World disposed after {} ticks", summary.ticks);
        summary
    }
}
