//! Frame-driven simulation module
//!
//! All gameplay logic lives here. This module must stay free of I/O:
//! - Input arrives as a [`TickInput`] value each frame
//! - Seeded RNG only
//! - Live obstacles iterate in spawn order
//! - No rendering or platform dependencies

pub mod collision;
pub mod pool;
pub mod score;
pub mod session;
pub mod spawn;
pub mod state;

pub use collision::{Aabb, clamp_x, first_collision};
pub use pool::{ObstacleHandle, ObstaclePool, PoolError};
pub use score::ScoreEngine;
pub use session::{DifficultySource, GameSession, ScoreSink, TickInput};
pub use spawn::SpawnScheduler;
pub use state::{Obstacle, Player, SessionPhase};
