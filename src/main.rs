//! Obstacle Avoid entry point
//!
//! Headless driver: runs one session at a fixed 60 Hz step with an autopilot
//! standing in for keyboard input, then records the result.
//!
//! Usage: `obstacle-avoid [easy|medium|hard] [seed]`

use std::path::Path;

use obstacle_avoid::consts::FRAME_DT;
use obstacle_avoid::sim::{GameSession, Obstacle, Player, TickInput};
use obstacle_avoid::{DifficultyLevel, GameConfig, HighScores, Settings};

const SETTINGS_PATH: &str = "obstacle_avoid_settings.json";
const HIGHSCORES_PATH: &str = "obstacle_avoid_highscores.json";

/// Give up after five simulated minutes
const MAX_FRAMES: u32 = 60 * 60 * 5;

/// How far above the player the autopilot looks for threats
const LOOKAHEAD: f32 = 3.0;

fn main() {
    env_logger::init();
    log::info!("Obstacle Avoid (headless) starting...");

    let mut args = std::env::args().skip(1);
    let mut settings = Settings::load_or_default(Path::new(SETTINGS_PATH));
    if let Some(arg) = args.next() {
        match DifficultyLevel::from_str(&arg) {
            Some(level) => {
                settings.difficulty = level;
                if let Err(e) = settings.save(Path::new(SETTINGS_PATH)) {
                    log::warn!("Could not save settings: {}", e);
                }
            }
            None => log::warn!("Unknown difficulty '{}', keeping {}", arg, settings.difficulty.as_str()),
        }
    }
    let seed = args
        .next()
        .and_then(|s| s.parse::<u64>().ok())
        .unwrap_or_else(seed_from_clock);

    let mut highscores = HighScores::load_or_default(Path::new(HIGHSCORES_PATH));
    let best_before = highscores.high_score();

    let mut session = match GameSession::new(GameConfig::default(), &settings, &mut highscores, seed) {
        Ok(session) => session,
        Err(e) => {
            log::error!("Refusing to start: {}", e);
            std::process::exit(1);
        }
    };

    let mut frames = 0;
    while !session.is_game_over() && frames < MAX_FRAMES {
        let input = autopilot(session.player(), session.obstacles(), session.config());
        session.update(FRAME_DT, &input);
        frames += 1;
    }

    let score = session.score();
    let survived = frames as f32 * FRAME_DT;
    let finished = session.is_game_over();
    drop(session);

    println!(
        "{} | seed {} | survived {:.1}s | score {} | best {}",
        settings.difficulty.as_str(),
        seed,
        survived,
        score,
        highscores.high_score().max(best_before)
    );
    if !finished {
        println!("Autopilot outlasted the frame limit; score not recorded");
    }

    if let Err(e) = highscores.save(Path::new(HIGHSCORES_PATH)) {
        log::warn!("Could not save high scores: {}", e);
    }
}

/// Dodge the nearest obstacle about to land on the player, otherwise drift
/// back toward the middle of the world
fn autopilot<'a>(
    player: &Player,
    obstacles: impl Iterator<Item = &'a Obstacle>,
    config: &GameConfig,
) -> TickInput {
    let margin = config.player_speed * 2.0;
    let left = player.pos.x - margin;
    let right = player.pos.x + player.size.x + margin;
    let top = player.pos.y + player.size.y;

    let threat = obstacles
        .filter(|o| !o.hit)
        .filter(|o| o.pos.x < right && o.pos.x + o.size.x > left)
        .filter(|o| o.pos.y >= player.pos.y && o.pos.y - top < LOOKAHEAD)
        .min_by(|a, b| a.pos.y.total_cmp(&b.pos.y));

    let player_center = player.pos.x + player.size.x / 2.0;
    match threat {
        Some(o) => {
            let obstacle_center = o.pos.x + o.size.x / 2.0;
            let room_left = player.pos.x;
            let room_right = config.world_width - player.pos.x - player.size.x;
            // Step away from the obstacle unless pinned against a wall
            let away = if obstacle_center > player_center { -1.0 } else { 1.0 };
            let axis = if away < 0.0 && room_left < margin {
                1.0
            } else if away > 0.0 && room_right < margin {
                -1.0
            } else {
                away
            };
            TickInput {
                axis,
                target_x: None,
            }
        }
        None => {
            let offset = config.world_width / 2.0 - player_center;
            TickInput {
                axis: (offset / config.player_speed).clamp(-1.0, 1.0),
                target_x: None,
            }
        }
    }
}

fn seed_from_clock() -> u64 {
    std::time::SystemTime::now()
        .duration_since(std::time::UNIX_EPOCH)
        .map(|d| d.as_nanos() as u64)
        .unwrap_or(0)
}
