//! Game tuning configuration
//!
//! Every constant the simulation reads lives in [`GameConfig`]. A config is
//! validated before a session is built; an invalid config never starts a run.

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::consts::*;

/// Reasons a configuration is refused
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ConfigError {
    #[error("world dimensions must be positive (got {width} x {height})")]
    InvalidWorld { width: f32, height: f32 },
    #[error("{entity} size {size} does not fit a world {world_width} wide")]
    EntityTooLarge {
        entity: &'static str,
        size: f32,
        world_width: f32,
    },
    #[error("{name} must be positive (got {value})")]
    NonPositive { name: &'static str, value: f32 },
    #[error("starting lives must be at least 1")]
    NoLives,
    #[error("obstacle pool capacity must be at least 1")]
    EmptyPool,
    #[error("score increment range is inverted ({min} > {max})")]
    InvertedScoreRange { min: u32, max: u32 },
    #[error("obstacle speed must be positive and finite (got {0})")]
    InvalidObstacleSpeed(f32),
    #[error("pool capacity {capacity} is below the worst-case live count {required}")]
    PoolTooSmall { capacity: usize, required: usize },
}

/// Game configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GameConfig {
    pub world_width: f32,
    pub world_height: f32,
    pub player_size: f32,
    /// Horizontal distance per frame at full input
    pub player_speed: f32,
    pub obstacle_size: f32,
    /// Seconds between obstacle spawns
    pub spawn_interval: f32,
    /// Seconds between score increments
    pub score_interval: f32,
    pub score_increment_min: u32,
    pub score_increment_max: u32,
    /// Display score catch-up rate (points per second)
    pub display_score_rate: f32,
    pub lives: u32,
    pub pool_capacity: usize,
    /// Nominal frame step the pool capacity is sized against
    pub frame_dt: f32,
    /// Zero both scores on every lost life
    #[serde(default)]
    pub reset_score_on_life_loss: bool,
}

impl Default for GameConfig {
    fn default() -> Self {
        Self {
            world_width: WORLD_WIDTH,
            world_height: WORLD_HEIGHT,
            player_size: PLAYER_SIZE,
            player_speed: MAX_PLAYER_X_SPEED,
            obstacle_size: OBSTACLE_SIZE,
            spawn_interval: OBSTACLE_SPAWN_TIME,
            score_interval: SCORE_MAX_TIME,
            score_increment_min: SCORE_INCREMENT_MIN,
            score_increment_max: SCORE_INCREMENT_MAX,
            display_score_rate: DISPLAY_SCORE_RATE,
            lives: LIVES_START,
            pool_capacity: OBSTACLE_POOL_CAPACITY,
            frame_dt: FRAME_DT,
            reset_score_on_life_loss: false,
        }
    }
}

impl GameConfig {
    /// Check that every constant describes a playable world
    pub fn validate(&self) -> Result<(), ConfigError> {
        if !(self.world_width > 0.0 && self.world_height > 0.0) {
            return Err(ConfigError::InvalidWorld {
                width: self.world_width,
                height: self.world_height,
            });
        }

        let positives = [
            ("player size", self.player_size),
            ("player speed", self.player_speed),
            ("obstacle size", self.obstacle_size),
            ("spawn interval", self.spawn_interval),
            ("score interval", self.score_interval),
            ("display score rate", self.display_score_rate),
            ("frame step", self.frame_dt),
        ];
        for (name, value) in positives {
            // `!(x > 0)` also rejects NaN
            if !(value > 0.0) || !value.is_finite() {
                return Err(ConfigError::NonPositive { name, value });
            }
        }

        for (entity, size) in [("player", self.player_size), ("obstacle", self.obstacle_size)] {
            if size > self.world_width {
                return Err(ConfigError::EntityTooLarge {
                    entity,
                    size,
                    world_width: self.world_width,
                });
            }
        }

        if self.lives == 0 {
            return Err(ConfigError::NoLives);
        }
        if self.pool_capacity == 0 {
            return Err(ConfigError::EmptyPool);
        }
        if self.score_increment_min > self.score_increment_max {
            return Err(ConfigError::InvertedScoreRange {
                min: self.score_increment_min,
                max: self.score_increment_max,
            });
        }

        Ok(())
    }

    /// Peak number of simultaneously live obstacles at a given fall speed
    /// when frames arrive every `frame_dt`.
    ///
    /// An obstacle lives until it drops below `-obstacle_size`, and the
    /// spawn timer fires once every `spawn_interval / frame_dt` frames.
    /// Longer frames spawn faster than this; the spawner drops what does
    /// not fit.
    pub fn max_live_obstacles(&self, obstacle_speed: f32) -> usize {
        let travel = self.world_height + self.obstacle_size;
        // +2: the spawn frame and the frame the despawn check runs on
        let lifetime_frames = (travel / obstacle_speed).ceil() + 2.0;
        let frames_per_spawn = (self.spawn_interval / self.frame_dt).floor().max(1.0);
        // Float-to-int casts saturate, so a crawling speed yields usize::MAX
        ((lifetime_frames / frames_per_spawn).ceil() as usize).saturating_add(1)
    }

    /// Validate the pool against a concrete fall speed
    pub fn check_capacity(&self, obstacle_speed: f32) -> Result<(), ConfigError> {
        if !(obstacle_speed > 0.0) || !obstacle_speed.is_finite() {
            return Err(ConfigError::InvalidObstacleSpeed(obstacle_speed));
        }
        let required = self.max_live_obstacles(obstacle_speed);
        if required > self.pool_capacity {
            return Err(ConfigError::PoolTooSmall {
                capacity: self.pool_capacity,
                required,
            });
        }
        Ok(())
    }

    /// Player rest position: centered, resting on the bottom edge
    pub fn player_start(&self) -> (f32, f32) {
        (
            (self.world_width - self.player_size) / 2.0,
            1.0 - self.player_size / 2.0,
        )
    }

    /// Right-most x an obstacle may spawn at
    pub fn max_obstacle_x(&self) -> f32 {
        self.world_width - self.obstacle_size
    }
}
