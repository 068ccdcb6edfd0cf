//! Obstacle generation, scrolling and pruning
//!
//! The tricky part of Pumpy Pills: gap centers follow the active pattern, gap
//! sizes shrink or widen per pattern, and the final geometry is clamped so
//! every obstacle stays on-canvas with at least `min_gap` of navigable space.

use rand::Rng;
use serde::{Deserialize, Serialize};
use std::collections::VecDeque;
use std::f32::consts::PI;

use super::SimError;
use super::pattern::{Pattern, PatternSession};
use crate::tuning::{ObstacleTuning, PatternTuning};

/// Tolerance for float comparisons in invariant checks
const GEOMETRY_EPSILON: f32 = 1e-3;

/// A paired top/bottom barrier with a navigable gap between `top` and `bottom`
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Obstacle {
    /// Left edge in screen space (decreases each tick)
    pub x: f32,
    /// Lower edge of the upper barrier
    pub top: f32,
    /// Upper edge of the lower barrier
    pub bottom: f32,
    pub scored: bool,
    /// Pattern that placed this obstacle
    #[serde(rename = "type")]
    pub kind: Pattern,
    /// Drawing-only height jitter, never part of the hitbox
    pub top_jitter: f32,
    pub bottom_jitter: f32,
}

impl Obstacle {
    #[inline]
    pub fn gap(&self) -> f32 {
        self.bottom - self.top
    }

    #[inline]
    pub fn gap_center(&self) -> f32 {
        (self.top + self.bottom) * 0.5
    }

    #[inline]
    pub fn right(&self, width: f32) -> f32 {
        self.x + width
    }
}

/// Check the geometry contract of a freshly generated obstacle
pub fn validate_obstacle(
    obstacle: &Obstacle,
    canvas_height: f32,
    min_gap: f32,
) -> Result<(), SimError> {
    let Obstacle { top, bottom, .. } = *obstacle;
    let in_bounds = top >= -GEOMETRY_EPSILON && bottom <= canvas_height + GEOMETRY_EPSILON;
    let ordered = top < bottom;
    let wide_enough = bottom - top >= min_gap - GEOMETRY_EPSILON;
    if in_bounds && ordered && wide_enough && top.is_finite() && bottom.is_finite() {
        Ok(())
    } else {
        Err(SimError::InvalidObstacle {
            top,
            bottom,
            min_gap,
            canvas_height,
        })
    }
}

/// The ordered obstacle sequence and the pattern engine that feeds it
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ObstacleField {
    /// Oldest (leftmost) first
    pub obstacles: VecDeque<Obstacle>,
    pub session: PatternSession,
    /// Base gap from the difficulty curve
    pub pipe_gap: f32,
    /// Horizontal distance between consecutive spawns
    pub pipe_spacing: f32,
    last_gap_center: f32,
    canvas_width: f32,
    canvas_height: f32,
    tuning: ObstacleTuning,
    patterns: PatternTuning,
}

impl ObstacleField {
    pub fn new(
        tuning: ObstacleTuning,
        patterns: PatternTuning,
        canvas_width: f32,
        canvas_height: f32,
        pipe_gap: f32,
        pipe_spacing: f32,
        rng: &mut impl Rng,
    ) -> Self {
        let session = PatternSession::new(&patterns, rng);
        Self {
            obstacles: VecDeque::new(),
            session,
            pipe_gap,
            pipe_spacing,
            last_gap_center: canvas_height / 2.0,
            canvas_width,
            canvas_height,
            tuning,
            patterns,
        }
    }

    /// Clear all obstacles and restart the pattern engine
    pub fn reset(&mut self, pipe_gap: f32, pipe_spacing: f32, rng: &mut impl Rng) {
        self.obstacles.clear();
        self.last_gap_center = self.canvas_height / 2.0;
        self.pipe_gap = pipe_gap;
        self.pipe_spacing = pipe_spacing;
        self.session.reset(&self.patterns, rng);
    }

    /// Apply retuned difficulty to future spawns
    pub fn update_difficulty(&mut self, pipe_gap: f32, pipe_spacing: f32) {
        self.pipe_gap = pipe_gap;
        self.pipe_spacing = pipe_spacing;
    }

    #[inline]
    pub fn width(&self) -> f32 {
        self.tuning.width
    }

    #[inline]
    pub fn current_pattern(&self) -> Pattern {
        self.session.current
    }

    /// Scroll obstacles left by `speed`, spawn at the right edge when spacing
    /// allows, and drop obstacles that have left the viewport.
    pub fn update(&mut self, speed: f32, rng: &mut impl Rng) -> Result<(), SimError> {
        for obstacle in self.obstacles.iter_mut() {
            obstacle.x -= speed;
        }

        let spawn_line = self.canvas_width - self.pipe_spacing;
        let should_spawn = self.obstacles.back().is_none_or(|last| last.x <= spawn_line);
        if should_spawn {
            let obstacle = self.generate_obstacle(self.canvas_width, rng)?;
            self.obstacles.push_back(obstacle);
        }

        let cutoff = -self.tuning.prune_margin;
        while self
            .obstacles
            .front()
            .is_some_and(|first| first.right(self.tuning.width) < cutoff)
        {
            self.obstacles.pop_front();
        }
        Ok(())
    }

    /// Build the next obstacle at horizontal position `x`.
    ///
    /// On a geometry error the pattern session is rolled back, so a rejected
    /// obstacle leaves the field as it was.
    pub fn generate_obstacle(&mut self, x: f32, rng: &mut impl Rng) -> Result<Obstacle, SimError> {
        let saved = self.session.clone();
        self.session.advance(&self.patterns, rng);

        let raw_center = self.calculate_gap_center(rng);
        let gap = self.gap_size(rng);
        let center = self.clamp_center(raw_center, gap);

        let obstacle = Obstacle {
            x,
            top: (center - gap / 2.0).max(0.0),
            bottom: (center + gap / 2.0).min(self.canvas_height),
            scored: false,
            kind: self.session.current,
            top_jitter: self.decoration(rng),
            bottom_jitter: self.decoration(rng),
        };

        if let Err(err) = validate_obstacle(&obstacle, self.canvas_height, self.tuning.min_gap) {
            log::error!("Rejected obstacle from {} pattern: {}", obstacle.kind.as_str(), err);
            self.session = saved;
            return Err(err);
        }

        self.last_gap_center = center;
        self.session.record_spawn();
        Ok(obstacle)
    }

    /// Unclamped gap center for the active pattern
    pub fn calculate_gap_center(&mut self, rng: &mut impl Rng) -> f32 {
        let p = &self.patterns;
        let mid = self.canvas_height / 2.0;
        let step = self.session.step;

        match self.session.current {
            Pattern::Staircase => {
                let center = self.last_gap_center + self.session.direction * p.staircase_step;
                if center < p.edge_boundary || center > self.canvas_height - p.edge_boundary {
                    self.session.direction = -self.session.direction;
                }
                center
            }
            Pattern::Wave => mid + p.wave_amplitude * (step as f32 * PI / p.wave_period).sin(),
            Pattern::Zigzag => {
                if step % 2 == 0 {
                    mid - p.zigzag_offset
                } else {
                    mid + p.zigzag_offset
                }
            }
            Pattern::Narrow => self.last_gap_center + jitter(rng, p.narrow_jitter),
            Pattern::Rhythm => match step % 3 {
                0 => mid,
                1 => mid - p.rhythm_offset,
                _ => mid + p.rhythm_offset,
            },
            Pattern::Standard => {
                let mut center = self.last_gap_center + jitter(rng, p.standard_jitter);
                if rng.random_bool(p.surprise_chance as f64) {
                    center += jitter(rng, p.surprise_jitter);
                }
                center
            }
        }
    }

    /// Final navigable gap for the next obstacle, never below `min_gap`
    fn gap_size(&self, rng: &mut impl Rng) -> f32 {
        let t = &self.tuning;
        let params = self.session.current.params(t.narrow_factor);

        let mut gap = self.pipe_gap;
        if let Some(factor) = params.gap_factor {
            gap = (self.pipe_gap * factor).max(t.min_gap + t.narrow_buffer);
        } else if params.allows_breather && rng.random_bool(t.breather_chance as f64) {
            gap = self.pipe_gap * t.breather_factor;
        }

        let max_gap = self.canvas_height - 2.0 * t.edge_margin;
        (gap - t.gap_deduction).max(t.min_gap).min(max_gap)
    }

    /// Clamp a center so the final gap sits fully on-canvas
    fn clamp_center(&self, center: f32, gap: f32) -> f32 {
        let half = (gap / 2.0).max(self.tuning.edge_margin);
        let lo = half;
        let hi = self.canvas_height - half;
        if lo > hi {
            return self.canvas_height / 2.0;
        }
        center.clamp(lo, hi)
    }

    fn decoration(&self, rng: &mut impl Rng) -> f32 {
        if self.tuning.decoration_jitter > 0.0 {
            rng.random_range(0.0..self.tuning.decoration_jitter).floor()
        } else {
            0.0
        }
    }
}

/// Uniform offset in `[-amount, amount)`
fn jitter(rng: &mut impl Rng, amount: f32) -> f32 {
    if amount > 0.0 {
        rng.random_range(-amount..amount)
    } else {
        0.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tuning::Tuning;
    use proptest::prelude::*;
    use rand::SeedableRng;
    use rand_pcg::Pcg32;

    fn field_with(tuning: &Tuning, pipe_gap: f32, seed: u64) -> (ObstacleField, Pcg32) {
        let mut rng = Pcg32::seed_from_u64(seed);
        let field = ObstacleField::new(
            tuning.obstacles.clone(),
            tuning.patterns.clone(),
            tuning.canvas.width,
            tuning.canvas.height,
            pipe_gap,
            tuning.difficulty.base_spacing,
            &mut rng,
        );
        (field, rng)
    }

    fn field(seed: u64) -> (ObstacleField, Pcg32) {
        field_with(&Tuning::default(), 200.0, seed)
    }

    fn assert_geometry(o: &Obstacle, tuning: &Tuning) {
        assert!(o.top >= 0.0, "top {} off canvas", o.top);
        assert!(o.bottom <= tuning.canvas.height, "bottom {} off canvas", o.bottom);
        assert!(o.top < o.bottom);
        assert!(o.gap() >= tuning.obstacles.min_gap - GEOMETRY_EPSILON);
    }

    #[test]
    fn test_first_update_spawns_at_right_edge() {
        let (mut field, mut rng) = field(1);
        field.update(1.5, &mut rng).unwrap();
        assert_eq!(field.obstacles.len(), 1);
        assert_eq!(field.obstacles[0].x, field.canvas_width);
        assert!(!field.obstacles[0].scored);
    }

    #[test]
    fn test_spawn_waits_for_spacing() {
        let (mut field, mut rng) = field(2);
        field.update(2.0, &mut rng).unwrap();
        // Needs pipe_spacing of travel before the next spawn
        let ticks = (field.pipe_spacing / 2.0) as usize;
        for _ in 0..ticks - 1 {
            field.update(2.0, &mut rng).unwrap();
        }
        assert_eq!(field.obstacles.len(), 1);
        field.update(2.0, &mut rng).unwrap();
        assert_eq!(field.obstacles.len(), 2);
    }

    #[test]
    fn test_obstacles_stay_ordered_and_pruned() {
        let (mut field, mut rng) = field(3);
        for _ in 0..5_000 {
            field.update(3.0, &mut rng).unwrap();
            let xs: Vec<f32> = field.obstacles.iter().map(|o| o.x).collect();
            assert!(xs.windows(2).all(|w| w[0] < w[1]));
            let front = field.obstacles.front().unwrap();
            assert!(front.right(field.width()) >= -field.tuning.prune_margin);
        }
        // Only a screenful of obstacles is ever alive
        assert!(field.obstacles.len() <= 4);
        assert!(field.session.obstacle_count > 30);
    }

    #[test]
    fn test_wave_follows_sinusoid() {
        let (mut field, mut rng) = field(4);
        field.session.current = Pattern::Wave;
        field.session.step = 3;
        let center = field.calculate_gap_center(&mut rng);
        // sin(3 * PI / 6) = 1
        assert!((center - (320.0 + 100.0)).abs() < 1e-3);
    }

    #[test]
    fn test_zigzag_and_rhythm_offsets() {
        let (mut field, mut rng) = field(5);
        field.session.current = Pattern::Zigzag;
        field.session.step = 0;
        assert_eq!(field.calculate_gap_center(&mut rng), 240.0);
        field.session.step = 1;
        assert_eq!(field.calculate_gap_center(&mut rng), 400.0);

        field.session.current = Pattern::Rhythm;
        let centers: Vec<f32> = (0..3)
            .map(|step| {
                field.session.step = step;
                field.calculate_gap_center(&mut rng)
            })
            .collect();
        assert_eq!(centers, vec![320.0, 220.0, 420.0]);
    }

    #[test]
    fn test_staircase_flips_near_edge() {
        let (mut field, mut rng) = field(6);
        field.session.current = Pattern::Staircase;
        field.session.direction = -1.0;
        field.last_gap_center = 160.0;
        let center = field.calculate_gap_center(&mut rng);
        assert_eq!(center, 110.0);
        assert_eq!(field.session.direction, 1.0);
    }

    #[test]
    fn test_narrow_gap_respects_floor() {
        let tuning = Tuning::default();
        let (mut field, mut rng) = field_with(&tuning, tuning.obstacles.min_gap, 7);
        field.session.current = Pattern::Narrow;
        field.session.next_switch_at = u32::MAX;
        for _ in 0..100 {
            let o = field.generate_obstacle(0.0, &mut rng).unwrap();
            assert_eq!(o.kind, Pattern::Narrow);
            // max(120 * 0.75, 130) - 10 = 120
            assert!((o.gap() - tuning.obstacles.min_gap).abs() < 1e-3);
            assert_geometry(&o, &tuning);
        }
    }

    #[test]
    fn test_center_reclamped_after_gap_adjustment() {
        // Center pinned against the top edge, then the breather widens the gap:
        // clamping must use the final gap so the top stays on-canvas.
        let mut tuning = Tuning::default();
        tuning.obstacles.breather_chance = 1.0;
        tuning.obstacles.gap_deduction = 0.0;
        let (mut field, mut rng) = field_with(&tuning, 300.0, 8);
        field.session.current = Pattern::Staircase;
        field.session.next_switch_at = u32::MAX;
        field.session.direction = -1.0;
        field.last_gap_center = 0.0;

        let o = field.generate_obstacle(0.0, &mut rng).unwrap();
        assert!((o.gap() - 360.0).abs() < 1e-3);
        assert_eq!(o.top, 0.0);
        assert_geometry(&o, &tuning);

        field.last_gap_center = tuning.canvas.height;
        field.session.direction = 1.0;
        let o = field.generate_obstacle(0.0, &mut rng).unwrap();
        assert!((o.bottom - tuning.canvas.height).abs() < 1e-3);
        assert_geometry(&o, &tuning);
    }

    #[test]
    fn test_gap_capped_by_canvas() {
        let mut tuning = Tuning::default();
        tuning.canvas.height = 400.0;
        tuning.patterns.edge_boundary = 100.0;
        tuning.obstacles.breather_chance = 1.0;
        let (mut field, mut rng) = field_with(&tuning, 350.0, 9);
        let o = field.generate_obstacle(0.0, &mut rng).unwrap();
        assert!(o.gap() <= 400.0 - 2.0 * tuning.obstacles.edge_margin + 1e-3);
        assert_geometry(&o, &tuning);
    }

    #[test]
    fn test_decoration_not_in_hitbox() {
        let (mut field, mut rng) = field(10);
        let o = field.generate_obstacle(0.0, &mut rng).unwrap();
        assert!((0.0..10.0).contains(&o.top_jitter));
        assert!((0.0..10.0).contains(&o.bottom_jitter));
    }

    #[test]
    fn test_validate_rejects_inverted_gap() {
        let o = Obstacle {
            x: 0.0,
            top: 300.0,
            bottom: 250.0,
            scored: false,
            kind: Pattern::Standard,
            top_jitter: 0.0,
            bottom_jitter: 0.0,
        };
        assert!(matches!(
            validate_obstacle(&o, 640.0, 120.0),
            Err(SimError::InvalidObstacle { .. })
        ));
    }

    #[test]
    fn test_rejected_obstacle_leaves_session_untouched() {
        let (mut field, mut rng) = field(12);
        // Due for a pattern switch on this spawn
        field.session.next_switch_at = 0;
        // Unreachable floor: every gap fails validation
        field.tuning.min_gap = 10_000.0;
        let before = field.session.clone();
        let center_before = field.last_gap_center;

        let result = field.generate_obstacle(0.0, &mut rng);
        assert!(matches!(result, Err(SimError::InvalidObstacle { .. })));
        assert_eq!(field.session.current, before.current);
        assert_eq!(field.session.step, before.step);
        assert_eq!(field.session.direction, before.direction);
        assert_eq!(field.session.obstacle_count, before.obstacle_count);
        assert_eq!(field.session.next_switch_at, before.next_switch_at);
        assert_eq!(field.session.history, before.history);
        assert_eq!(field.last_gap_center, center_before);

        // Nothing gets queued through `update` either
        assert!(field.update(2.0, &mut rng).is_err());
        assert!(field.obstacles.is_empty());
    }

    #[test]
    fn test_reset_clears_obstacles() {
        let (mut field, mut rng) = field(11);
        for _ in 0..400 {
            field.update(2.0, &mut rng).unwrap();
        }
        field.reset(180.0, 300.0, &mut rng);
        assert!(field.obstacles.is_empty());
        assert_eq!(field.session.obstacle_count, 0);
        assert_eq!(field.current_pattern(), Pattern::Standard);
        assert_eq!(field.pipe_gap, 180.0);
    }

    #[test]
    fn test_same_seed_same_obstacles() {
        let (mut a, mut rng_a) = field(42);
        let (mut b, mut rng_b) = field(42);
        for _ in 0..2_000 {
            a.update(2.5, &mut rng_a).unwrap();
            b.update(2.5, &mut rng_b).unwrap();
        }
        let tops = |f: &ObstacleField| f.obstacles.iter().map(|o| o.top).collect::<Vec<_>>();
        assert_eq!(tops(&a), tops(&b));
        assert_eq!(a.session.history, b.session.history);
    }

    proptest! {
        #[test]
        fn prop_generated_geometry_valid(
            seed in any::<u64>(),
            pipe_gap in 120.0f32..420.0,
            height in 400.0f32..900.0,
        ) {
            let mut tuning = Tuning::default();
            tuning.canvas.height = height;
            tuning.patterns.edge_boundary = height * 0.2;
            let (mut field, mut rng) = field_with(&tuning, pipe_gap, seed);
            for _ in 0..200 {
                let o = field.generate_obstacle(0.0, &mut rng).unwrap();
                prop_assert!(o.top >= 0.0);
                prop_assert!(o.bottom <= height);
                prop_assert!(o.top < o.bottom);
                prop_assert!(o.gap() >= tuning.obstacles.min_gap - GEOMETRY_EPSILON);
            }
        }
    }
}
