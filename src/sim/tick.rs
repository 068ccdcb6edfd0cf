//! Per-frame simulation tick
//!
//! Core game loop that advances the world by one step. Input arrives as a
//! drained command set, so nothing mutates the world between ticks.

use super::SimError;
use super::collision::check_collision;
use super::state::{GamePhase, World};

/// Particle palette index for a passed obstacle
const PASS_PARTICLE_COLOR: u32 = 1;
/// Particle palette index for a crash
const CRASH_PARTICLE_COLOR: u32 = 2;

/// Input commands for a single tick
#[derive(Debug, Clone, Default)]
pub struct TickInput {
    /// Debounced jump (also start/restart outside play)
    pub jump: bool,
}

/// What happened during a tick (for audio/visual hooks and tests)
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TickEvents {
    /// A new run began this tick
    pub started: bool,
    pub jumped: bool,
    /// Obstacles passed this tick
    pub passed: u32,
    /// New level, if one was reached
    pub level_up: Option<u32>,
    pub game_over: bool,
}

/// Advance the world by one tick
pub fn tick(world: &mut World, input: &TickInput) -> Result<TickEvents, SimError> {
    let mut events = TickEvents::default();

    match world.game.phase {
        GamePhase::Loading => return Ok(events),
        GamePhase::Start | GamePhase::GameOver => {
            // Keep the last crash's particles fading on the game-over screen
            world.particles.update();
            if !input.jump {
                return Ok(events);
            }
            world.start_game();
            events.started = true;
        }
        GamePhase::Playing => {}
    }

    world.time_ticks += 1;

    if input.jump {
        world.player.jump(world.tuning.physics.jump_strength);
        events.jumped = true;
    }

    let physics = &world.tuning.physics;
    world.player.update(physics.gravity, physics.max_fall_speed);
    world.player.clamp_to_ceiling();

    let speed = world.difficulty.speed;
    world.obstacles.update(speed, &mut world.rng)?;
    world.game.advance_world(speed);
    world.chart.update(world.game.world_x, world.player.y);
    world.particles.update();

    // Collision runs every tick during play
    let hit = check_collision(
        &world.player.bounds(),
        world.obstacles.obstacles.iter(),
        world.obstacles.width(),
    );
    let fell_out = world.player.y + world.player.radius() > world.tuning.canvas.height;
    if hit.hit || fell_out {
        world
            .particles
            .burst(world.player.pos(), CRASH_PARTICLE_COLOR, &mut world.rng);
        world.end_game();
        events.game_over = true;
        return Ok(events);
    }

    score_passed_obstacles(world, &mut events);
    Ok(events)
}

/// Mark obstacles the player has cleared and award them once each
fn score_passed_obstacles(world: &mut World, events: &mut TickEvents) {
    let width = world.obstacles.width();
    let player_x = world.player.x;

    let mut newly_passed = 0;
    for obstacle in world.obstacles.obstacles.iter_mut() {
        if !obstacle.scored && obstacle.right(width) < player_x {
            obstacle.scored = true;
            newly_passed += 1;
        }
    }

    for _ in 0..newly_passed {
        world.game.increment_score(1, &world.difficulty);
        let reward = world.game.pass_reward(&world.difficulty);
        world.game.update_portfolio(reward);

        if world.difficulty.level_up() {
            let d = &world.difficulty;
            world.obstacles.update_difficulty(d.pipe_gap, d.pipe_spacing);
            log::info!(
                "Level {}: speed {:.2}, gap {:.0}, spacing {:.0}, next in {}",
                d.level,
                d.speed,
                d.pipe_gap,
                d.pipe_spacing,
                d.obstacles_needed
            );
            events.level_up = Some(d.level);
        }

        world
            .particles
            .burst(world.player.pos(), PASS_PARTICLE_COLOR, &mut world.rng);
        events.passed += 1;
    }
}
