//! Entity state and core simulation types

use glam::Vec2;
use serde::{Deserialize, Serialize};

use super::collision::{Aabb, clamp_x};

/// Current phase of the session
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum SessionPhase {
    /// Active gameplay
    Playing,
    /// Lives exhausted; terminal for this session
    GameOver,
}

/// The player-controlled entity along the bottom of the world
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Player {
    /// Bottom-left corner
    pub pos: Vec2,
    pub size: Vec2,
}

impl Player {
    pub fn new(pos: Vec2, size: f32) -> Self {
        Self {
            pos,
            size: Vec2::splat(size),
        }
    }

    pub fn bounds(&self) -> Aabb {
        Aabb::new(self.pos, self.size)
    }

    /// Apply a horizontal displacement and keep the player inside the world
    pub fn move_by(&mut self, dx: f32, world_width: f32) {
        self.pos.x = clamp_x(self.pos.x + dx, self.size.x, world_width);
    }

    /// Jump straight to an absolute x (pointer/touch), bounds-safe
    pub fn move_to(&mut self, x: f32, world_width: f32) {
        self.pos.x = clamp_x(x, self.size.x, world_width);
    }
}

/// A falling obstacle
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Obstacle {
    /// Bottom-left corner
    pub pos: Vec2,
    pub size: Vec2,
    /// Fall distance per frame
    pub speed: f32,
    /// Already cost the player a life; never collides again
    pub hit: bool,
}

impl Default for Obstacle {
    fn default() -> Self {
        Self {
            pos: Vec2::ZERO,
            size: Vec2::ZERO,
            speed: 0.0,
            hit: false,
        }
    }
}

impl Obstacle {
    /// Overwrite every field for a fresh spawn (recycled slots carry stale data)
    pub fn reset(&mut self, pos: Vec2, size: f32, speed: f32) {
        self.pos = pos;
        self.size = Vec2::splat(size);
        self.speed = speed;
        self.hit = false;
    }

    /// Advance one frame
    pub fn fall(&mut self) {
        self.pos.y -= self.speed;
    }

    pub fn bounds(&self) -> Aabb {
        Aabb::new(self.pos, self.size)
    }

    /// Test against the player and latch `hit` on contact.
    ///
    /// Returns true only for the first contact of this obstacle's lifetime.
    pub fn collide_with(&mut self, player: &Player) -> bool {
        if self.hit {
            return false;
        }
        if self.bounds().overlaps(&player.bounds()) {
            self.hit = true;
            return true;
        }
        false
    }
}
