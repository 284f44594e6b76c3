//! Obstacle spawning and despawning
//!
//! The live list is kept in spawn order. With one fall speed per session the
//! oldest obstacle is always the lowest, so despawn only ever inspects the
//! front of the list. Per-obstacle speeds would break that and require a
//! full scan.

use std::collections::VecDeque;

use glam::Vec2;
use rand::Rng;

use super::pool::{ObstacleHandle, ObstaclePool, PoolError};
use super::state::Obstacle;
use crate::config::GameConfig;

/// Spawn timer plus the pool and live list it feeds
#[derive(Debug, Clone)]
pub struct SpawnScheduler {
    pool: ObstaclePool,
    /// Live obstacles, oldest first
    live: VecDeque<ObstacleHandle>,
    timer: f32,
    interval: f32,
}

impl SpawnScheduler {
    pub fn new(interval: f32, capacity: usize) -> Self {
        Self {
            pool: ObstaclePool::new(capacity),
            live: VecDeque::with_capacity(capacity),
            timer: 0.0,
            interval,
        }
    }

    /// Run one frame: move every obstacle, maybe spawn, then retire the oldest
    /// if it has left the world. Returns the handle spawned this frame, if any.
    pub fn advance<R: Rng>(
        &mut self,
        delta: f32,
        speed: f32,
        config: &GameConfig,
        rng: &mut R,
    ) -> Option<ObstacleHandle> {
        for &handle in &self.live {
            if let Some(obstacle) = self.pool.get_mut(handle) {
                obstacle.fall();
            }
        }

        let spawned = self.tick_timer(delta, speed, config, rng);
        self.despawn_passed(config.obstacle_size);
        spawned
    }

    /// At most one spawn per call, however many intervals have elapsed
    fn tick_timer<R: Rng>(
        &mut self,
        delta: f32,
        speed: f32,
        config: &GameConfig,
        rng: &mut R,
    ) -> Option<ObstacleHandle> {
        self.timer += delta;
        if self.timer < self.interval {
            return None;
        }
        self.timer = 0.0;

        let x = rng.random_range(0.0..=config.max_obstacle_x());
        let pos = Vec2::new(x, config.world_height);
        match self.spawn_at(pos, config.obstacle_size, speed) {
            Ok(handle) => {
                log::debug!("Spawned obstacle in {} at x={:.2}", handle, x);
                Some(handle)
            }
            Err(e) => {
                log::warn!("Dropping spawn: {}", e);
                None
            }
        }
    }

    /// Place a new obstacle at `pos` and append it to the live list
    pub fn spawn_at(
        &mut self,
        pos: Vec2,
        size: f32,
        speed: f32,
    ) -> Result<ObstacleHandle, PoolError> {
        let handle = self.pool.acquire()?;
        if let Some(obstacle) = self.pool.get_mut(handle) {
            obstacle.reset(pos, size, speed);
        }
        self.live.push_back(handle);
        Ok(handle)
    }

    /// Retire the oldest obstacle once it is fully below the world
    fn despawn_passed(&mut self, obstacle_size: f32) {
        let Some(&oldest) = self.live.front() else {
            return;
        };
        let passed = self
            .pool
            .get(oldest)
            .map(|o| o.pos.y < -obstacle_size)
            .unwrap_or(true);
        if passed {
            self.live.pop_front();
            if let Err(e) = self.pool.release(oldest) {
                log::warn!("Despawn release failed: {}", e);
            }
        }
    }

    /// Release every live obstacle back to the pool
    pub fn clear(&mut self) {
        for handle in self.live.drain(..) {
            if let Err(e) = self.pool.release(handle) {
                log::warn!("Clear release failed: {}", e);
            }
        }
    }

    /// Live obstacles in spawn order
    pub fn iter(&self) -> impl Iterator<Item = &Obstacle> + '_ {
        self.live.iter().filter_map(|&h| self.pool.get(h))
    }

    /// Pool and live list together, for passes that mutate obstacles in order
    pub fn live_mut(&mut self) -> (&mut ObstaclePool, &VecDeque<ObstacleHandle>) {
        (&mut self.pool, &self.live)
    }

    pub fn len(&self) -> usize {
        self.live.len()
    }

    pub fn is_empty(&self) -> bool {
        self.live.is_empty()
    }

    pub fn capacity(&self) -> usize {
        self.pool.capacity()
    }

    pub fn timer(&self) -> f32 {
        self.timer
    }
}
