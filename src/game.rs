//! Game state machine
//!
//! `Game` is the single owner of everything that changes during a session.
//! Input arrives as [`Command`]s queued between frames and drained at the
//! start of [`Game::update`], so a step always sees every input that came in
//! before it.

use std::collections::VecDeque;

use rand::SeedableRng;
use rand_pcg::Pcg32;

use crate::config::Tuning;
use crate::physics::{self, Crash};
use crate::spawner::Spawner;
use crate::viewport::Viewport;
use crate::world::{Bird, Obstacle, Scenery};

/// Keeps cosmetic randomness on its own stream so resizes never change
/// the gap sequence.
const SCENERY_STREAM: u64 = 0x9e37_79b9_7f4a_7c15;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    /// Waiting for the first flap
    NotStarted,
    Running,
    /// World frozen until restart
    GameOver,
}

impl Phase {
    /// Label for the host button, which performs [`Command::Primary`].
    pub fn button_label(self) -> &'static str {
        match self {
            Phase::NotStarted => "Start",
            Phase::Running => "Flap",
            Phase::GameOver => "Restart",
        }
    }

    fn scenery_rate(self, idle_rate: f32) -> f32 {
        match self {
            Phase::NotStarted => idle_rate,
            Phase::Running => 1.0,
            Phase::GameOver => 0.0,
        }
    }
}

/// Input to the game, applied between steps.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Command {
    Flap,
    /// Pointer-down, confirm key or the host button: restart when the game
    /// is over, flap otherwise
    Primary,
    Restart,
    Resize(Viewport),
}

/// Something that happened during a step or command, for sound and logs.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GameEvent {
    Started,
    Flapped,
    Scored(u32),
    Crashed(Crash),
    Restarted,
}

pub struct Game {
    pub tuning: Tuning,
    pub viewport: Viewport,
    pub phase: Phase,
    pub bird: Bird,
    /// Ordered left to right
    pub obstacles: Vec<Obstacle>,
    pub scenery: Scenery,
    pub score: u32,
    /// Best score this session
    pub best: u32,
    /// Seconds spent running in the current run
    pub run_time: f32,
    spawner: Spawner,
    scenery_rng: Pcg32,
    commands: VecDeque<Command>,
    events: Vec<GameEvent>,
}

impl Game {
    pub fn new(tuning: Tuning, viewport: Viewport, seed: u64) -> Self {
        let mut scenery_rng = Pcg32::seed_from_u64(seed ^ SCENERY_STREAM);
        Self {
            bird: Bird::new(&tuning, &viewport),
            scenery: Scenery::new(&viewport, &mut scenery_rng),
            tuning,
            viewport,
            phase: Phase::NotStarted,
            obstacles: Vec::new(),
            score: 0,
            best: 0,
            run_time: 0.0,
            spawner: Spawner::new(seed),
            scenery_rng,
            commands: VecDeque::new(),
            events: Vec::new(),
        }
    }

    /// Queue a command for the next update.
    pub fn push(&mut self, command: Command) {
        self.commands.push_back(command);
    }

    /// Apply queued commands, then advance one step.
    pub fn update(&mut self, dt: f32) {
        while let Some(command) = self.commands.pop_front() {
            self.apply(command);
        }
        self.step(dt);
    }

    pub fn apply(&mut self, command: Command) {
        match command {
            Command::Flap => self.flap(),
            Command::Primary => self.primary(),
            Command::Restart => self.restart(),
            Command::Resize(viewport) => self.resize(viewport),
        }
    }

    pub fn flap(&mut self) {
        match self.phase {
            Phase::NotStarted => {
                log::info!("run started");
                self.phase = Phase::Running;
                self.events.push(GameEvent::Started);
            }
            Phase::Running => {}
            Phase::GameOver => return,
        }
        self.bird.flap(self.tuning.flap_velocity);
        self.events.push(GameEvent::Flapped);
    }

    pub fn primary(&mut self) {
        if self.phase == Phase::GameOver {
            self.restart();
        } else {
            self.flap();
        }
    }

    /// Back to a fresh NotStarted world. Best score and scenery survive.
    pub fn restart(&mut self) {
        log::info!("restart (previous score {})", self.score);
        self.phase = Phase::NotStarted;
        self.bird = Bird::new(&self.tuning, &self.viewport);
        self.obstacles.clear();
        self.score = 0;
        self.run_time = 0.0;
        self.events.push(GameEvent::Restarted);
    }

    pub fn resize(&mut self, viewport: Viewport) {
        log::info!("viewport {:.0}x{:.0}", viewport.width, viewport.height);
        self.viewport = viewport;
        self.scenery.reseed(&self.viewport, &mut self.scenery_rng);
        self.bird.clamp_to(&self.viewport);
    }

    /// Advance scenery, and while running, the bird and obstacles.
    pub fn step(&mut self, dt: f32) {
        let rate = self.phase.scenery_rate(self.tuning.idle_rate);
        self.scenery.advance(
            dt,
            rate,
            self.tuning.scroll_speed,
            &self.viewport,
            &mut self.scenery_rng,
        );

        if self.phase != Phase::Running {
            return;
        }
        self.run_time += dt;

        if let Some(crash) = physics::integrate(&mut self.bird, dt, &self.tuning, &self.viewport) {
            self.crash(crash);
            return;
        }

        self.spawner
            .update(&mut self.obstacles, dt, &self.viewport, &self.tuning);

        let pipe_width = self.tuning.pipe_width;
        if physics::first_collision(&self.bird, &self.obstacles, pipe_width).is_some() {
            self.crash(Crash::Pipe);
        }

        let gained = physics::award_passes(&self.bird, &mut self.obstacles, pipe_width);
        if gained > 0 {
            self.score += gained;
            self.best = self.best.max(self.score);
            self.events.push(GameEvent::Scored(self.score));
        }
    }

    /// Events since the last call.
    pub fn take_events(&mut self) -> Vec<GameEvent> {
        std::mem::take(&mut self.events)
    }

    fn crash(&mut self, crash: Crash) {
        if self.phase != Phase::Running {
            return;
        }
        self.phase = Phase::GameOver;
        self.best = self.best.max(self.score);
        log::info!(
            "crashed into {:?}: score {} after {:.1}s (best {})",
            crash,
            self.score,
            self.run_time,
            self.best
        );
        self.events.push(GameEvent::Crashed(crash));
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn game() -> Game {
        Game::new(Tuning::default(), Viewport::new(480.0, 640.0), 42)
    }

    /// Gravity off and a 360px-tall field: every gap contains the bird's
    /// resting height, so it glides through forever.
    fn gliding_game() -> Game {
        let tuning = Tuning {
            gravity: 0.0,
            ..Tuning::default()
        };
        Game::new(tuning, Viewport::new(640.0, 360.0), 7)
    }

    #[test]
    fn first_flap_starts_the_run() {
        let mut game = game();
        assert_eq!(game.phase, Phase::NotStarted);
        game.flap();
        assert_eq!(game.phase, Phase::Running);
        assert_eq!(game.bird.vy, -420.0);
        assert_eq!(game.take_events(), vec![GameEvent::Started, GameEvent::Flapped]);
    }

    #[test]
    fn nothing_moves_before_start() {
        let mut game = game();
        let bird = game.bird.clone();
        for _ in 0..30 {
            game.update(0.05);
        }
        assert_eq!(game.bird, bird);
        assert!(game.obstacles.is_empty());
        assert!(game.scenery.scroll > 0.0);
    }

    #[test]
    fn flap_overrides_velocity_and_is_ignored_when_over() {
        let mut game = game();
        game.flap();
        game.bird.vy = 900.0;
        game.flap();
        assert_eq!(game.bird.vy, -420.0);
        game.bird.vy = -1000.0;
        game.flap();
        assert_eq!(game.bird.vy, -420.0);

        game.phase = Phase::GameOver;
        game.bird.vy = 300.0;
        game.take_events();
        game.flap();
        assert_eq!(game.bird.vy, 300.0);
        assert!(game.take_events().is_empty());
    }

    #[test]
    fn falling_for_a_second_ends_the_run() {
        let mut game = game();
        game.flap();
        game.bird.y = 300.0;
        game.bird.vy = 0.0;
        game.step(1.0);
        assert_eq!(game.bird.vy, 1800.0);
        assert_eq!(game.phase, Phase::GameOver);
        assert_eq!(game.bird.y, 640.0 - game.bird.size);
        assert!(
            game.take_events()
                .contains(&GameEvent::Crashed(Crash::Ground))
        );
    }

    #[test]
    fn crash_is_reported_once() {
        let mut game = game();
        game.flap();
        game.bird.y = 600.0;
        game.bird.vy = 500.0;
        game.take_events();
        for _ in 0..5 {
            game.step(0.1);
        }
        game.crash(Crash::Pipe);
        let crashes = game
            .take_events()
            .into_iter()
            .filter(|e| matches!(e, GameEvent::Crashed(_)))
            .count();
        assert_eq!(crashes, 1);
        assert_eq!(game.phase, Phase::GameOver);
    }

    #[test]
    fn pipe_overlap_ends_the_run() {
        let mut game = game();
        game.flap();
        game.bird.vy = 0.0;
        game.bird.y = 100.0;
        game.obstacles.push(Obstacle::new(game.bird.x, 200.0, 150.0));
        game.step(0.0);
        assert_eq!(game.phase, Phase::GameOver);
        assert!(game.take_events().contains(&GameEvent::Crashed(Crash::Pipe)));
    }

    #[test]
    fn world_freezes_after_game_over() {
        let mut game = game();
        game.flap();
        game.step(0.1);
        game.phase = Phase::GameOver;
        let scroll = game.scenery.scroll;
        let obstacles = game.obstacles.clone();
        let bird = game.bird.clone();
        for _ in 0..10 {
            game.step(0.1);
        }
        assert_eq!(game.scenery.scroll, scroll);
        assert_eq!(game.obstacles, obstacles);
        assert_eq!(game.bird, bird);
    }

    #[test]
    fn primary_is_phase_sensitive() {
        let mut game = game();
        game.primary();
        assert_eq!(game.phase, Phase::Running);
        assert_eq!(game.bird.vy, -420.0);

        game.phase = Phase::GameOver;
        game.score = 3;
        game.primary();
        assert_eq!(game.phase, Phase::NotStarted);
        assert_eq!(game.score, 0);
        assert_eq!(game.bird.vy, 0.0);
    }

    #[test]
    fn button_label_follows_phase() {
        assert_eq!(Phase::NotStarted.button_label(), "Start");
        assert_eq!(Phase::Running.button_label(), "Flap");
        assert_eq!(Phase::GameOver.button_label(), "Restart");
    }

    #[test]
    fn glide_scores_each_obstacle_once() {
        let mut game = gliding_game();
        game.flap();
        game.bird.vy = 0.0;
        let mut last = 0;
        for _ in 0..(60 * 20) {
            game.step(1.0 / 60.0);
            assert!(game.score == last || game.score == last + 1);
            last = game.score;
        }
        assert_eq!(game.phase, Phase::Running);
        // ~324px between obstacles at 180px/s
        assert!(game.score >= 8);
        assert_eq!(game.best, game.score);
    }

    #[test]
    fn passed_obstacle_is_not_scored_again() {
        let mut game = game();
        game.flap();
        game.bird.vy = 0.0;
        game.obstacles.push(Obstacle::new(game.bird.x - 100.0, 0.0, 640.0));
        game.step(0.0);
        assert_eq!(game.score, 1);
        game.step(0.0);
        game.step(0.0);
        assert_eq!(game.score, 1);
    }

    #[test]
    fn resize_reclamps_bird_and_keeps_progress() {
        let mut game = game();
        game.flap();
        game.score = 5;
        game.bird.y = 600.0;
        game.push(Command::Resize(Viewport::new(800.0, 450.0)));
        game.update(0.0);
        assert!(game.bird.y <= 450.0 - game.bird.size);
        assert_eq!(game.score, 5);
        assert_eq!(game.phase, Phase::Running);
        assert_eq!(game.viewport, Viewport::new(800.0, 450.0));

        game.push(Command::Resize(Viewport::new(320.0, 300.0)));
        game.update(0.0);
        assert_eq!(game.scenery.clouds.len(), (320.0f32 / 200.0).ceil() as usize + 1);
        for cloud in &game.scenery.clouds {
            assert!((0.0..=320.0).contains(&cloud.x), "{cloud:?}");
            assert!(cloud.y <= 300.0 * 0.35);
        }
        assert!(game.bird.y <= 300.0 - game.bird.size);
    }

    #[test]
    fn queued_commands_apply_in_order_before_the_step() {
        let mut game = game();
        game.push(Command::Flap);
        game.push(Command::Restart);
        game.update(0.1);
        assert_eq!(game.phase, Phase::NotStarted);

        game.push(Command::Restart);
        game.push(Command::Flap);
        game.update(0.0);
        assert_eq!(game.phase, Phase::Running);
    }

    #[test]
    fn same_seed_same_gaps() {
        let mut a = gliding_game();
        let mut b = gliding_game();
        a.flap();
        b.flap();
        for _ in 0..300 {
            a.step(1.0 / 30.0);
            b.step(1.0 / 30.0);
        }
        assert_eq!(a.obstacles, b.obstacles);
    }

    proptest! {
        #[test]
        fn restart_resets_from_any_state(
            flaps in proptest::collection::vec(any::<bool>(), 0..200),
            crash in any::<bool>(),
        ) {
            let mut game = game();
            for flap in flaps {
                if flap {
                    game.flap();
                }
                game.step(1.0 / 30.0);
            }
            if crash {
                game.crash(Crash::Pipe);
            }
            game.score += 2;
            game.restart();
            prop_assert_eq!(game.phase, Phase::NotStarted);
            prop_assert_eq!(game.score, 0);
            prop_assert!(game.obstacles.is_empty());
            prop_assert_eq!(&game.bird, &Bird::new(&game.tuning, &game.viewport));
            prop_assert_eq!(game.run_time, 0.0);
        }

        #[test]
        fn bird_never_leaves_the_viewport(
            flaps in proptest::collection::vec(any::<bool>(), 1..300),
            dt in 0.0f32..0.1,
        ) {
            let mut game = game();
            for flap in flaps {
                if flap {
                    game.push(Command::Flap);
                }
                game.update(dt);
                prop_assert!(game.bird.y >= 0.0);
                prop_assert!(game.bird.y <= game.viewport.height - game.bird.size);
            }
        }
    }
}
