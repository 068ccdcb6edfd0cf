//! Player vs obstacle collision
//!
//! The player is tested as an axis-aligned box around its center, shrunk by
//! the collision scale so grazing contacts are forgiven. Only `top`/`bottom`
//! are authoritative; decorative jitter never enters the hitbox.

use glam::Vec2;

use super::obstacles::Obstacle;

/// Which barrier the player struck
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HitSide {
    Top,
    Bottom,
}

/// Result of a collision check
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CollisionResult {
    /// Whether a collision occurred
    pub hit: bool,
    /// Index of the obstacle hit (in the field's order)
    pub index: Option<usize>,
    pub side: Option<HitSide>,
}

impl CollisionResult {
    pub fn miss() -> Self {
        Self {
            hit: false,
            index: None,
            side: None,
        }
    }
}

/// Axis-aligned bounding box
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Aabb {
    pub min: Vec2,
    pub max: Vec2,
}

impl Aabb {
    /// Square box of half-extent `radius * scale` around `center`
    pub fn around(center: Vec2, radius: f32, scale: f32) -> Self {
        let half = Vec2::splat(radius * scale);
        Self {
            min: center - half,
            max: center + half,
        }
    }

    /// Horizontal overlap with the span `[left, right)`
    #[inline]
    pub fn overlaps_x(&self, left: f32, right: f32) -> bool {
        self.max.x > left && self.min.x < right
    }
}

/// Test the player box against every obstacle; the first hit short-circuits
pub fn check_collision<'a>(
    bounds: &Aabb,
    obstacles: impl IntoIterator<Item = &'a Obstacle>,
    width: f32,
) -> CollisionResult {
    for (index, obstacle) in obstacles.into_iter().enumerate() {
        if !bounds.overlaps_x(obstacle.x, obstacle.x + width) {
            continue;
        }

        let side = if bounds.min.y < obstacle.top {
            Some(HitSide::Top)
        } else if bounds.max.y > obstacle.bottom {
            Some(HitSide::Bottom)
        } else {
            None
        };

        if side.is_some() {
            return CollisionResult {
                hit: true,
                index: Some(index),
                side,
            };
        }
    }
    CollisionResult::miss()
}
