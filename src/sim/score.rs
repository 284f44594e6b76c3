//! Score accumulation and display smoothing
//!
//! The true score grows by a random amount on a fixed cadence. The display
//! score chases it at a capped rate and is purely cosmetic.

use rand::Rng;

use crate::config::GameConfig;

#[derive(Debug, Clone, PartialEq)]
pub struct ScoreEngine {
    score: u32,
    display_score: u32,
    timer: f32,
    interval: f32,
    increment_min: u32,
    increment_max: u32,
    display_rate: f32,
}

impl ScoreEngine {
    pub fn new(config: &GameConfig) -> Self {
        Self {
            score: 0,
            display_score: 0,
            timer: 0.0,
            interval: config.score_interval,
            increment_min: config.score_increment_min,
            increment_max: config.score_increment_max,
            display_rate: config.display_score_rate,
        }
    }

    /// Accumulate time; award one random increment per elapsed interval tick
    pub fn advance<R: Rng>(&mut self, delta: f32, rng: &mut R) {
        self.timer += delta;
        if self.timer >= self.interval {
            let gained = rng.random_range(self.increment_min..=self.increment_max);
            self.score = self.score.saturating_add(gained);
            self.timer = 0.0;
        }
    }

    /// Move the display score toward the true score without overshooting
    pub fn advance_display(&mut self, delta: f32) {
        if self.display_score < self.score {
            let step = (self.display_rate * delta).round().max(0.0) as u32;
            let remaining = self.score - self.display_score;
            self.display_score += step.min(remaining);
        }
    }

    /// Zero both scores and the cadence timer
    pub fn reset(&mut self) {
        self.score = 0;
        self.display_score = 0;
        self.timer = 0.0;
    }

    pub fn score(&self) -> u32 {
        self.score
    }

    pub fn display_score(&self) -> u32 {
        self.display_score
    }
}
