//! Obstacle Avoid - falling-obstacle arcade game core
//!
//! Core modules:
//! - `sim`: Frame-driven simulation (player, obstacle pool, spawning, collisions, scoring)
//! - `config`: Validated game tuning constants
//! - `settings`: Player preferences and difficulty tiers
//! - `highscores`: Leaderboard that receives final scores
//! - `persistence`: JSON save/load for settings and scores

pub mod config;
pub mod highscores;
pub mod persistence;
pub mod settings;
pub mod sim;

pub use config::{ConfigError, GameConfig};
pub use highscores::HighScores;
pub use settings::{DifficultyLevel, Settings};

/// Game configuration constants
pub mod consts {
    /// Nominal frame step (60 Hz); drives the headless loop and pool sizing
    pub const FRAME_DT: f32 = 1.0 / 60.0;

    /// World dimensions (world units)
    pub const WORLD_WIDTH: f32 = 6.0;
    pub const WORLD_HEIGHT: f32 = 10.0;

    /// Player defaults
    pub const PLAYER_SIZE: f32 = 0.8;
    /// Horizontal distance covered per frame at full input
    pub const MAX_PLAYER_X_SPEED: f32 = 0.25;

    /// Obstacle defaults
    pub const OBSTACLE_SIZE: f32 = 0.3;
    pub const OBSTACLE_SPAWN_TIME: f32 = 0.25;
    pub const OBSTACLE_POOL_CAPACITY: usize = 40;

    /// Fall speed per frame for each difficulty tier
    pub const EASY_OBSTACLE_SPEED: f32 = 0.1;
    pub const MEDIUM_OBSTACLE_SPEED: f32 = 0.15;
    pub const HARD_OBSTACLE_SPEED: f32 = 0.18;

    /// Scoring
    pub const SCORE_MAX_TIME: f32 = 1.0;
    pub const SCORE_INCREMENT_MIN: u32 = 1;
    pub const SCORE_INCREMENT_MAX: u32 = 5;
    /// Display score catch-up rate (points per second)
    pub const DISPLAY_SCORE_RATE: f32 = 60.0;

    pub const LIVES_START: u32 = 3;
}
