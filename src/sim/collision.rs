//! Collision detection and world bounds
//!
//! Everything is an axis-aligned box anchored at its bottom-left corner.

use glam::Vec2;

use super::pool::{ObstacleHandle, ObstaclePool};
use super::state::Player;

/// Axis-aligned bounding box (bottom-left corner + size)
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Aabb {
    pub min: Vec2,
    pub size: Vec2,
}

impl Aabb {
    pub fn new(min: Vec2, size: Vec2) -> Self {
        Self { min, size }
    }

    #[inline]
    pub fn max(&self) -> Vec2 {
        self.min + self.size
    }

    /// Strict overlap: boxes sharing only an edge do not collide
    pub fn overlaps(&self, other: &Aabb) -> bool {
        let (a_max, b_max) = (self.max(), other.max());
        self.min.x < b_max.x
            && other.min.x < a_max.x
            && self.min.y < b_max.y
            && other.min.y < a_max.y
    }
}

/// Clamp a left edge so an entity `width` wide stays inside `[0, world_width]`
#[inline]
pub fn clamp_x(x: f32, width: f32, world_width: f32) -> f32 {
    x.clamp(0.0, (world_width - width).max(0.0))
}

/// Find the first live, not-yet-hit obstacle touching the player and latch
/// its `hit` flag. Only one collision is reported per call even when several
/// obstacles overlap at once.
pub fn first_collision<'a, I>(
    pool: &mut ObstaclePool,
    live: I,
    player: &Player,
) -> Option<ObstacleHandle>
where
    I: IntoIterator<Item = &'a ObstacleHandle>,
{
    live.into_iter().copied().find(|&handle| {
        pool.get_mut(handle)
            .map(|obstacle| obstacle.collide_with(player))
            .unwrap_or(false)
    })
}
