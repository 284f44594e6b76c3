//! Fixed-capacity obstacle arena
//!
//! Slots are created lazily up to `capacity` and then recycled forever, so a
//! warmed pool never allocates. Live obstacles are addressed by slot index.

use std::fmt;

use thiserror::Error;

use super::state::Obstacle;

/// Index of a pool slot
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ObstacleHandle(usize);

impl fmt::Display for ObstacleHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "slot {}", self.0)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PoolError {
    #[error("obstacle pool exhausted ({capacity} slots live)")]
    Exhausted { capacity: usize },
    #[error("{0} is not live")]
    NotLive(ObstacleHandle),
}

/// Pool of reusable obstacle records
#[derive(Debug, Clone)]
pub struct ObstaclePool {
    slots: Vec<Obstacle>,
    live: Vec<bool>,
    /// Recycled slot indices (LIFO)
    free: Vec<usize>,
    capacity: usize,
}

impl ObstaclePool {
    pub fn new(capacity: usize) -> Self {
        Self {
            slots: Vec::with_capacity(capacity),
            live: Vec::with_capacity(capacity),
            free: Vec::with_capacity(capacity),
            capacity,
        }
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// Number of slots currently handed out
    pub fn live_count(&self) -> usize {
        self.slots.len() - self.free.len()
    }

    /// Hand out a slot, recycling before constructing. Field values of a
    /// recycled slot are stale; the caller overwrites them.
    pub fn acquire(&mut self) -> Result<ObstacleHandle, PoolError> {
        if let Some(slot) = self.free.pop() {
            self.live[slot] = true;
            return Ok(ObstacleHandle(slot));
        }
        if self.slots.len() < self.capacity {
            self.slots.push(Obstacle::default());
            self.live.push(true);
            return Ok(ObstacleHandle(self.slots.len() - 1));
        }
        Err(PoolError::Exhausted {
            capacity: self.capacity,
        })
    }

    /// Return a slot to the free set
    pub fn release(&mut self, handle: ObstacleHandle) -> Result<(), PoolError> {
        match self.live.get_mut(handle.0) {
            Some(live) if *live => {
                *live = false;
                self.free.push(handle.0);
                Ok(())
            }
            _ => Err(PoolError::NotLive(handle)),
        }
    }

    pub fn get(&self, handle: ObstacleHandle) -> Option<&Obstacle> {
        self.is_live(handle).then(|| &self.slots[handle.0])
    }

    pub fn get_mut(&mut self, handle: ObstacleHandle) -> Option<&mut Obstacle> {
        if self.is_live(handle) {
            Some(&mut self.slots[handle.0])
        } else {
            None
        }
    }

    pub fn is_live(&self, handle: ObstacleHandle) -> bool {
        self.live.get(handle.0).copied().unwrap_or(false)
    }
}
