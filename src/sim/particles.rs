//! Cosmetic particle bursts
//!
//! Fixed-capacity ring: when full, the oldest particle is overwritten. The
//! buffer is allocated once and never grows.

use glam::Vec2;
use rand::Rng;
use std::collections::VecDeque;

use crate::tuning::ParticleTuning;

/// A particle for visual effects
#[derive(Debug, Clone, Copy)]
pub struct Particle {
    pub pos: Vec2,
    pub vel: Vec2,
    /// Ticks remaining
    pub life: u32,
    /// Palette index for the renderer
    pub color: u32,
}

impl Particle {
    /// Remaining life in 0-1 (for alpha)
    pub fn alpha(&self, max_life: u32) -> f32 {
        self.life as f32 / max_life.max(1) as f32
    }
}

#[derive(Debug, Clone)]
pub struct Particles {
    items: VecDeque<Particle>,
    tuning: ParticleTuning,
}

impl Particles {
    pub fn new(tuning: ParticleTuning) -> Self {
        Self {
            items: VecDeque::with_capacity(tuning.capacity),
            tuning,
        }
    }

    pub fn reset(&mut self) {
        self.items.clear();
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Particle> {
        self.items.iter()
    }

    pub fn max_life(&self) -> u32 {
        self.tuning.life_ticks
    }

    pub fn add(&mut self, pos: Vec2, color: u32, rng: &mut impl Rng) {
        if self.items.len() >= self.tuning.capacity {
            self.items.pop_front();
        }
        let v = self.tuning.max_velocity;
        let vel = if v > 0.0 {
            Vec2::new(rng.random_range(-v..v), rng.random_range(-v..v))
        } else {
            Vec2::ZERO
        };
        self.items.push_back(Particle {
            pos,
            vel,
            life: self.tuning.life_ticks,
            color,
        });
    }

    /// Spawn the configured burst size at `pos`
    pub fn burst(&mut self, pos: Vec2, color: u32, rng: &mut impl Rng) {
        for _ in 0..self.tuning.burst {
            self.add(pos, color, rng);
        }
    }

    pub fn update(&mut self) {
        for particle in self.items.iter_mut() {
            particle.pos += particle.vel;
            particle.life = particle.life.saturating_sub(1);
        }
        self.items.retain(|p| p.life > 0);
    }
}
