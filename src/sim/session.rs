//! Per-frame session controller
//!
//! Owns lives and drives the update order: player, obstacles, score,
//! display score, collision. A collision either soft-resets the field or
//! ends the run and hands the final score to the [`ScoreSink`].

use glam::Vec2;
use rand::SeedableRng;
use rand_pcg::Pcg32;

use super::collision::first_collision;
use super::score::ScoreEngine;
use super::spawn::SpawnScheduler;
use super::state::{Obstacle, Player, SessionPhase};
use crate::config::{ConfigError, GameConfig};

/// Read-only lookup of the active difficulty tier's fall speed
pub trait DifficultySource {
    /// Obstacle fall distance per frame
    fn obstacle_speed(&self) -> f32;
}

/// Receives the final score once per finished run
pub trait ScoreSink {
    fn submit_final_score(&mut self, score: u32);
}

impl<T: DifficultySource + ?Sized> DifficultySource for &T {
    fn obstacle_speed(&self) -> f32 {
        (**self).obstacle_speed()
    }
}

impl<T: ScoreSink + ?Sized> ScoreSink for &mut T {
    fn submit_final_score(&mut self, score: u32) {
        (**self).submit_final_score(score)
    }
}

/// Player intent for a single frame
#[derive(Debug, Clone, Default)]
pub struct TickInput {
    /// Horizontal direction in [-1, 1] (keyboard left/right)
    pub axis: f32,
    /// Absolute x target (pointer/touch); overrides `axis` when set
    pub target_x: Option<f32>,
}

impl TickInput {
    pub fn left() -> Self {
        Self {
            axis: -1.0,
            ..Default::default()
        }
    }

    pub fn right() -> Self {
        Self {
            axis: 1.0,
            ..Default::default()
        }
    }

    pub fn pointer(x: f32) -> Self {
        Self {
            target_x: Some(x),
            ..Default::default()
        }
    }
}

/// A single play session, from first frame to game over
#[derive(Debug)]
pub struct GameSession<D, S> {
    config: GameConfig,
    difficulty: D,
    sink: S,
    rng: Pcg32,
    phase: SessionPhase,
    lives: u32,
    player: Player,
    obstacles: SpawnScheduler,
    score: ScoreEngine,
}

impl<D: DifficultySource, S: ScoreSink> GameSession<D, S> {
    /// Validate the config against the active difficulty and start a run
    pub fn new(
        config: GameConfig,
        difficulty: D,
        sink: S,
        seed: u64,
    ) -> Result<Self, ConfigError> {
        config.validate()?;
        config.check_capacity(difficulty.obstacle_speed())?;

        let (x, y) = config.player_start();
        log::info!(
            "Session started: seed={}, lives={}, speed={}",
            seed,
            config.lives,
            difficulty.obstacle_speed()
        );

        Ok(Self {
            player: Player::new(Vec2::new(x, y), config.player_size),
            obstacles: SpawnScheduler::new(config.spawn_interval, config.pool_capacity),
            score: ScoreEngine::new(&config),
            lives: config.lives,
            phase: SessionPhase::Playing,
            rng: Pcg32::seed_from_u64(seed),
            config,
            difficulty,
            sink,
        })
    }

    /// Advance the simulation by one frame. No-op once the run is over.
    pub fn update(&mut self, delta: f32, input: &TickInput) {
        if self.is_game_over() {
            return;
        }
        let delta = Self::sanitize_delta(delta);

        self.update_player(input);

        let speed = self.difficulty.obstacle_speed();
        self.obstacles.advance(delta, speed, &self.config, &mut self.rng);

        self.score.advance(delta, &mut self.rng);
        self.score.advance_display(delta);

        let (pool, live) = self.obstacles.live_mut();
        if first_collision(pool, live, &self.player).is_some() {
            log::debug!("Collision detected");
            self.lose_life();
        }
    }

    /// Negative or non-finite deltas freeze time; long frames pass through
    fn sanitize_delta(delta: f32) -> f32 {
        if delta.is_finite() && delta > 0.0 { delta } else { 0.0 }
    }

    fn update_player(&mut self, input: &TickInput) {
        let width = self.config.world_width;
        match input.target_x {
            Some(x) if x.is_finite() => self.player.move_to(x, width),
            _ => {
                let axis = if input.axis.is_finite() {
                    input.axis.clamp(-1.0, 1.0)
                } else {
                    0.0
                };
                // Always clamp, even with no input
                self.player.move_by(axis * self.config.player_speed, width);
            }
        }
    }

    fn lose_life(&mut self) {
        self.lives = self.lives.saturating_sub(1);

        if self.lives == 0 {
            self.phase = SessionPhase::GameOver;
            let final_score = self.score.score();
            log::info!("Game over, final score {}", final_score);
            self.sink.submit_final_score(final_score);
        } else {
            self.restart();
        }
    }

    /// Soft reset after a lost life: clear the field, re-center the player
    fn restart(&mut self) {
        self.obstacles.clear();
        let (x, y) = self.config.player_start();
        self.player.pos = Vec2::new(x, y);
        if self.config.reset_score_on_life_loss {
            self.score.reset();
        }
        log::debug!("Life lost, {} remaining", self.lives);
    }
}

impl<D, S> GameSession<D, S> {
    pub fn player(&self) -> &Player {
        &self.player
    }

    /// Live obstacles, oldest first
    pub fn obstacles(&self) -> impl Iterator<Item = &Obstacle> + '_ {
        self.obstacles.iter()
    }

    pub fn live_obstacle_count(&self) -> usize {
        self.obstacles.len()
    }

    pub fn pool_capacity(&self) -> usize {
        self.obstacles.capacity()
    }

    pub fn lives(&self) -> u32 {
        self.lives
    }

    pub fn score(&self) -> u32 {
        self.score.score()
    }

    pub fn display_score(&self) -> u32 {
        self.score.display_score()
    }

    pub fn phase(&self) -> SessionPhase {
        self.phase
    }

    pub fn is_game_over(&self) -> bool {
        self.phase == SessionPhase::GameOver
    }

    pub fn config(&self) -> &GameConfig {
        &self.config
    }

    pub fn score_sink(&self) -> &S {
        &self.sink
    }

    /// Place an obstacle directly, bypassing the spawn timer
    #[cfg(test)]
    fn inject_obstacle(&mut self, pos: Vec2) {
        let size = self.config.obstacle_size;
        let speed = 0.0;
        self.obstacles
            .spawn_at(pos, size, speed)
            .expect("pool has room");
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::consts::{FRAME_DT, OBSTACLE_SPAWN_TIME};
    use crate::settings::DifficultyLevel;
    use proptest::prelude::*;

    /// Fixed fall speed stand-in for the settings store
    struct Speed(f32);

    impl DifficultySource for Speed {
        fn obstacle_speed(&self) -> f32 {
            self.0
        }
    }

    #[derive(Default)]
    struct RecordingSink {
        scores: Vec<u32>,
    }

    impl ScoreSink for RecordingSink {
        fn submit_final_score(&mut self, score: u32) {
            self.scores.push(score);
        }
    }

    fn small_world() -> GameConfig {
        GameConfig {
            world_width: 10.0,
            world_height: 10.0,
            player_size: 1.0,
            spawn_interval: 2.0,
            ..Default::default()
        }
    }

    fn small_world_lives(lives: u32) -> GameConfig {
        GameConfig {
            lives,
            ..small_world()
        }
    }

    fn session(lives: u32) -> GameSession<Speed, RecordingSink> {
        GameSession::new(small_world_lives(lives), Speed(0.15), RecordingSink::default(), 42)
            .unwrap()
    }

    /// A spot inside the player's current bounds
    fn on_player<D, S>(s: &GameSession<D, S>) -> Vec2 {
        s.player().pos + Vec2::splat(0.1)
    }

    #[test]
    fn test_two_idle_seconds_spawn_one_obstacle() {
        let mut s = session(3);
        let start_x = s.player().pos.x;

        s.update(1.0, &TickInput::default());
        assert_eq!(s.live_obstacle_count(), 0);
        s.update(1.0, &TickInput::default());

        assert_eq!(s.player().pos.x, start_x);
        assert_eq!(s.live_obstacle_count(), 1);
        let obstacle = s.obstacles().next().unwrap();
        assert_eq!(obstacle.pos.y, 10.0);
        assert_eq!(obstacle.speed, 0.15);
    }

    #[test]
    fn test_last_life_ends_game_once() {
        let mut s = session(1);
        s.update(1.0, &TickInput::default());
        let pos = on_player(&s);
        s.inject_obstacle(pos);

        s.update(0.016, &TickInput::default());
        assert_eq!(s.lives(), 0);
        assert!(s.is_game_over());
        assert_eq!(s.phase(), SessionPhase::GameOver);
        assert_eq!(s.score_sink().scores, vec![s.score()]);
        assert!(s.obstacles().any(|o| o.hit));

        // Frozen: nothing moves, nothing is reported again
        let player = s.player().clone();
        let count = s.live_obstacle_count();
        for _ in 0..10 {
            s.update(1.0, &TickInput::right());
        }
        assert_eq!(s.player(), &player);
        assert_eq!(s.live_obstacle_count(), count);
        assert_eq!(s.score_sink().scores.len(), 1);
    }

    #[test]
    fn test_collision_with_lives_left_soft_resets() {
        let mut s = session(3);
        let start = s.player().pos;
        s.update(0.016, &TickInput::left());
        let pos = on_player(&s);
        s.inject_obstacle(pos);
        s.inject_obstacle(Vec2::new(8.0, 8.0));

        s.update(0.016, &TickInput::default());
        assert_eq!(s.lives(), 2);
        assert_eq!(s.live_obstacle_count(), 0);
        assert_eq!(s.player().pos, start);
        assert_eq!(s.phase(), SessionPhase::Playing);
        assert!(s.score_sink().scores.is_empty());
    }

    #[test]
    fn test_simultaneous_hits_cost_one_life() {
        let mut s = session(3);
        let pos = on_player(&s);
        s.inject_obstacle(pos);
        s.inject_obstacle(pos + Vec2::new(0.2, 0.0));

        s.update(0.016, &TickInput::default());
        assert_eq!(s.lives(), 2);
    }

    #[test]
    fn test_score_survives_life_loss_by_default() {
        let config = GameConfig {
            score_increment_min: 4,
            score_increment_max: 4,
            ..small_world()
        };
        let mut s = GameSession::new(config, Speed(0.15), RecordingSink::default(), 1).unwrap();
        s.update(1.0, &TickInput::default());
        assert_eq!(s.score(), 4);

        let pos = on_player(&s);
        s.inject_obstacle(pos);
        s.update(0.0, &TickInput::default());
        assert_eq!(s.lives(), 2);
        assert_eq!(s.score(), 4);
    }

    #[test]
    fn test_score_reset_on_life_loss_when_configured() {
        let config = GameConfig {
            reset_score_on_life_loss: true,
            ..small_world()
        };
        let mut s = GameSession::new(config, Speed(0.15), RecordingSink::default(), 1).unwrap();
        s.update(1.0, &TickInput::default());
        assert!(s.score() > 0);

        let pos = on_player(&s);
        s.inject_obstacle(pos);
        s.update(0.0, &TickInput::default());
        assert_eq!(s.score(), 0);
        assert_eq!(s.display_score(), 0);
    }

    #[test]
    fn test_pointer_target_is_clamped() {
        let mut s = session(3);
        s.update(0.016, &TickInput::pointer(42.0));
        assert_eq!(s.player().pos.x, 9.0);
        s.update(0.016, &TickInput::pointer(-3.0));
        assert_eq!(s.player().pos.x, 0.0);
        // Non-finite target falls back to the axis
        s.update(0.016, &TickInput {
            axis: 1.0,
            target_x: Some(f32::NAN),
        });
        assert_eq!(s.player().pos.x, small_world().player_speed);
    }

    #[test]
    fn test_negative_delta_freezes_timers() {
        let mut s = session(3);
        for _ in 0..5 {
            s.update(-1.0, &TickInput::default());
            s.update(f32::NAN, &TickInput::default());
        }
        assert_eq!(s.live_obstacle_count(), 0);
        assert_eq!(s.score(), 0);
    }

    #[test]
    fn test_long_frame_advances_timers_in_full() {
        let config = GameConfig::default();
        let mut s = GameSession::new(config, DifficultyLevel::Easy, RecordingSink::default(), 9)
            .unwrap();
        // 30 s at once: one spawn and one score tick, no catch-up burst
        s.update(30.0, &TickInput::default());
        assert_eq!(s.live_obstacle_count(), 1);
        assert!((1..=5).contains(&s.score()));
        assert_eq!(s.display_score(), s.score());
    }

    #[test]
    fn test_score_keeps_pace_at_low_frame_rate() {
        let config = GameConfig {
            score_increment_min: 1,
            score_increment_max: 1,
            lives: 1000,
            ..Default::default()
        };
        let mut s = GameSession::new(config, DifficultyLevel::Medium, RecordingSink::default(), 3)
            .unwrap();
        // Ten seconds at 10 fps
        for _ in 0..100 {
            s.update(0.1, &TickInput::default());
        }
        assert!(!s.is_game_over());
        assert!(s.score() >= 9, "score = {}", s.score());
    }

    #[test]
    fn test_long_frames_fill_pool_then_drop_spawns() {
        let speed = 0.15;
        let mut config = GameConfig {
            world_height: 100.0,
            lives: 1000,
            ..Default::default()
        };
        // Smallest pool that passes construction at 60 Hz
        config.pool_capacity = config.max_live_obstacles(speed);
        let capacity = config.pool_capacity;
        let mut s = GameSession::new(config, Speed(speed), RecordingSink::default(), 11).unwrap();

        // Every frame is a full second, so every frame wants a spawn;
        // nothing falls far enough to reach the player or despawn
        for _ in 0..capacity + 50 {
            s.update(1.0, &TickInput::default());
            assert!(s.live_obstacle_count() <= capacity);
        }
        assert_eq!(s.live_obstacle_count(), capacity);
        assert_eq!(s.lives(), 1000);
        assert!(s.obstacles().all(|o| o.pos.y > 50.0));
    }

    #[test]
    fn test_rejects_invalid_config() {
        let config = GameConfig {
            lives: 0,
            ..Default::default()
        };
        let result = GameSession::new(config, DifficultyLevel::Medium, RecordingSink::default(), 0);
        assert!(matches!(result, Err(ConfigError::NoLives)));

        let config = GameConfig {
            pool_capacity: 2,
            ..Default::default()
        };
        let result = GameSession::new(config, DifficultyLevel::Easy, RecordingSink::default(), 0);
        assert!(matches!(result, Err(ConfigError::PoolTooSmall { .. })));

        let result = GameSession::new(GameConfig::default(), Speed(1e-30), RecordingSink::default(), 0);
        assert!(matches!(
            result,
            Err(ConfigError::PoolTooSmall {
                required: usize::MAX,
                ..
            })
        ));
    }

    #[test]
    fn test_borrowed_collaborators() {
        let difficulty = DifficultyLevel::Hard;
        let mut sink = RecordingSink::default();
        {
            let mut s = GameSession::new(small_world_lives(1), &difficulty, &mut sink, 5).unwrap();
            let pos = on_player(&s);
            s.inject_obstacle(pos);
            s.update(0.0, &TickInput::default());
            assert!(s.is_game_over());
        }
        assert_eq!(sink.scores, vec![0]);
    }

    #[test]
    fn test_determinism() {
        let run = |seed| {
            let mut s = GameSession::new(
                GameConfig::default(),
                DifficultyLevel::Medium,
                RecordingSink::default(),
                seed,
            )
            .unwrap();
            for i in 0..600 {
                let input = if (i / 40) % 2 == 0 {
                    TickInput::left()
                } else {
                    TickInput::right()
                };
                s.update(1.0 / 60.0, &input);
            }
            let xs: Vec<f32> = s.obstacles().map(|o| o.pos.x).collect();
            (s.lives(), s.score(), xs)
        };
        assert_eq!(run(1234), run(1234));
    }

    fn arb_input() -> impl Strategy<Value = TickInput> {
        prop_oneof![
            (-2.0f32..2.0).prop_map(|axis| TickInput {
                axis,
                target_x: None
            }),
            (-5.0f32..15.0).prop_map(TickInput::pointer),
        ]
    }

    proptest! {
        #[test]
        fn prop_player_stays_in_bounds(
            frames in prop::collection::vec((arb_input(), -0.1f32..0.2), 1..300),
        ) {
            let mut s = session(3);
            let max_x = s.config().world_width - s.config().player_size;
            for (input, dt) in &frames {
                s.update(*dt, input);
                let x = s.player().pos.x;
                prop_assert!((0.0..=max_x).contains(&x));
            }
        }

        #[test]
        fn prop_display_never_exceeds_score(
            seed in any::<u64>(),
            dts in prop::collection::vec(0.0f32..0.05, 1..400),
        ) {
            let mut s = GameSession::new(
                GameConfig::default(),
                DifficultyLevel::Medium,
                RecordingSink::default(),
                seed,
            )
            .unwrap();
            let mut last_display = 0;
            let mut last_lives = s.lives();
            for dt in dts {
                s.update(dt, &TickInput::default());
                prop_assert!(s.display_score() <= s.score());
                if s.lives() == last_lives {
                    prop_assert!(s.display_score() >= last_display);
                }
                last_display = s.display_score();
                last_lives = s.lives();
            }
        }

        #[test]
        fn prop_live_count_within_capacity(
            seed in any::<u64>(),
            level in prop::sample::select(DifficultyLevel::ALL.to_vec()),
            frames in 1usize..3000,
        ) {
            // Park the player in a corner so runs last long enough to fill the field
            let mut s = GameSession::new(
                GameConfig::default(),
                level,
                RecordingSink::default(),
                seed,
            )
            .unwrap();
            let capacity = s.pool_capacity();
            for _ in 0..frames {
                s.update(FRAME_DT, &TickInput::left());
                prop_assert!(s.live_obstacle_count() <= capacity);
            }
        }

        #[test]
        fn prop_long_frames_never_overfill_pool(
            seed in any::<u64>(),
            level in prop::sample::select(DifficultyLevel::ALL.to_vec()),
            dts in prop::collection::vec(OBSTACLE_SPAWN_TIME..2.0f32, 1..600),
        ) {
            // Every frame fires the spawn timer, well past what the pool was sized for
            let config = GameConfig {
                lives: u32::MAX,
                ..Default::default()
            };
            let mut s = GameSession::new(config, level, RecordingSink::default(), seed).unwrap();
            let capacity = s.pool_capacity();
            for dt in dts {
                s.update(dt, &TickInput::left());
                prop_assert!(s.live_obstacle_count() <= capacity);
            }
            prop_assert!(!s.is_game_over());
        }
    }
}
