//! Game settings and preferences
//!
//! Persisted separately from high scores as JSON.

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::consts::*;
use crate::persistence::{self, PersistError};
use crate::sim::DifficultySource;

/// Difficulty tiers
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
pub enum DifficultyLevel {
    Easy,
    #[default]
    Medium,
    Hard,
}

impl DifficultyLevel {
    pub const ALL: [DifficultyLevel; 3] = [
        DifficultyLevel::Easy,
        DifficultyLevel::Medium,
        DifficultyLevel::Hard,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            DifficultyLevel::Easy => "Easy",
            DifficultyLevel::Medium => "Medium",
            DifficultyLevel::Hard => "Hard",
        }
    }

    pub fn from_str(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "easy" => Some(DifficultyLevel::Easy),
            "medium" | "med" => Some(DifficultyLevel::Medium),
            "hard" => Some(DifficultyLevel::Hard),
            _ => None,
        }
    }

    /// Obstacle fall distance per frame
    pub fn obstacle_speed(&self) -> f32 {
        match self {
            DifficultyLevel::Easy => EASY_OBSTACLE_SPEED,
            DifficultyLevel::Medium => MEDIUM_OBSTACLE_SPEED,
            DifficultyLevel::Hard => HARD_OBSTACLE_SPEED,
        }
    }
}

impl DifficultySource for DifficultyLevel {
    fn obstacle_speed(&self) -> f32 {
        DifficultyLevel::obstacle_speed(self)
    }
}

/// Game settings/preferences
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Settings {
    /// Active difficulty tier
    pub difficulty: DifficultyLevel,
}

impl Settings {
    /// Load settings, falling back to defaults when the file is missing or unreadable
    pub fn load_or_default(path: &Path) -> Self {
        match persistence::load_json(path) {
            Ok(Some(settings)) => {
                log::info!("Loaded settings from {}", path.display());
                settings
            }
            Ok(None) => {
                log::info!("Using default settings");
                Self::default()
            }
            Err(e) => {
                log::warn!("Ignoring unreadable settings {}: {}", path.display(), e);
                Self::default()
            }
        }
    }

    pub fn save(&self, path: &Path) -> Result<(), PersistError> {
        persistence::save_json(path, self)?;
        log::info!("Settings saved");
        Ok(())
    }
}

impl DifficultySource for Settings {
    fn obstacle_speed(&self) -> f32 {
        self.difficulty.obstacle_speed()
    }
}
