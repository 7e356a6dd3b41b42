//! One archery round: phases, periodic activities and scoring.
//!
//! `GameSession` is driven from outside. Input handlers call `fire`, `move_bow`
//! and `aim_at`; a frame loop (or a test) calls `advance(dt)` with elapsed
//! simulated seconds. Every periodic activity lives in the session's scheduler
//! and is cancelled whenever the round leaves `Phase::Playing`.

use glam::DVec2;
use log::{debug, info};
use rand::SeedableRng;
use rand::rngs::SmallRng;

use crate::arrow::Arrow;
use crate::bow::{Bow, Direction};
use crate::clock::GameClock;
use crate::config::GameConfig;
use crate::difficulty::{DifficultyController, Obstacle};
use crate::error::Result;
use crate::schedule::{Activity, Scheduler};
use crate::target::Target;

/// Clock resolution: the countdown moves in whole seconds.
const CLOCK_PERIOD_SECS: f64 = 1.0;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Phase {
    Idle,
    Playing,
    GameOver,
}

/// Things that happened during a call, for the presentation layer.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum GameEvent {
    Started,
    Tick { time_left: u32 },
    TargetMoved { at: DVec2 },
    ArrowFired { velocity: DVec2 },
    ObstacleStruck { index: usize },
    Hit { score: u32, at: DVec2 },
    Missed,
    LevelUp { level: u32 },
    ObstaclesSpawned { count: usize },
    GameOver { score: u32, level: u32 },
    Reset,
}

pub struct GameSession {
    config: GameConfig,
    rng: SmallRng,
    phase: Phase,
    score: u32,
    clock: GameClock,
    target: Target,
    bow: Bow,
    arrow: Arrow,
    obstacles: Vec<Obstacle>,
    difficulty: DifficultyController,
    scheduler: Scheduler,
    events: Vec<GameEvent>,
}

impl GameSession {
    /// Session seeded from the platform's entropy source.
    pub fn new(config: GameConfig) -> Result<Self> {
        Self::with_rng(config, SmallRng::from_entropy())
    }

    /// Session with a reproducible random sequence.
    pub fn with_seed(config: GameConfig, seed: u64) -> Result<Self> {
        Self::with_rng(config, SmallRng::seed_from_u64(seed))
    }

    fn with_rng(config: GameConfig, rng: SmallRng) -> Result<Self> {
        config.validate()?;
        let bow = Bow::new(config.bow);
        let arrow = Arrow::new(config.arrow.size, bow.nock(), bow.heading());
        Ok(Self {
            rng,
            phase: Phase::Idle,
            score: 0,
            clock: GameClock::new(config.duration_secs, config.clock_ramp_every),
            target: Target::new(config.target),
            bow,
            arrow,
            obstacles: Vec::new(),
            difficulty: DifficultyController::new(config.difficulty.points_per_level),
            scheduler: Scheduler::new(),
            events: Vec::new(),
            config,
        })
    }

    pub fn config(&self) -> &GameConfig {
        &self.config
    }

    pub fn phase(&self) -> Phase {
        self.phase
    }

    pub fn is_playing(&self) -> bool {
        self.phase == Phase::Playing
    }

    pub fn score(&self) -> u32 {
        self.score
    }

    pub fn time_left(&self) -> u32 {
        self.clock.time_left()
    }

    pub fn level(&self) -> u32 {
        self.difficulty.level()
    }

    pub fn target(&self) -> &Target {
        &self.target
    }

    pub fn bow(&self) -> &Bow {
        &self.bow
    }

    pub fn arrow(&self) -> &Arrow {
        &self.arrow
    }

    pub fn obstacles(&self) -> &[Obstacle] {
        &self.obstacles
    }

    /// Periodic activities currently scheduled.
    pub fn armed_activities(&self) -> Vec<Activity> {
        self.scheduler.armed().collect()
    }

    pub fn drain_events(&mut self) -> Vec<GameEvent> {
        std::mem::take(&mut self.events)
    }

    /// Begins a round from `Idle` or `GameOver`. Does nothing mid-round.
    pub fn start(&mut self) {
        if self.is_playing() {
            return;
        }
        self.restore_initial_state();
        self.phase = Phase::Playing;
        self.scheduler.arm(Activity::Clock, CLOCK_PERIOD_SECS);
        self.scheduler.arm(Activity::TargetMover, self.target.mover_period());
        if !self.target.is_bouncing() {
            self.jump_target();
        }
        self.events.push(GameEvent::Started);
        info!("round started: {}s, level {}", self.clock.duration(), self.level());
    }

    /// Abandons whatever is going on and returns to `Idle` with fresh state.
    pub fn reset(&mut self) {
        self.scheduler.cancel_all();
        self.restore_initial_state();
        self.phase = Phase::Idle;
        self.events.push(GameEvent::Reset);
        debug!("session reset");
    }

    pub fn restart(&mut self) {
        self.reset();
        self.start();
    }

    /// Looses an arrow. No-op (returns `false`) outside a round or while another
    /// arrow is still flying.
    pub fn fire(&mut self) -> bool {
        if !self.is_playing() {
            return false;
        }
        let velocity = self.bow.launch_velocity(self.config.arrow.speed);
        if !self.arrow.fire(self.bow.nock(), velocity) {
            return false;
        }
        self.scheduler.arm(Activity::Projectile, self.config.arrow.tick);
        self.events.push(GameEvent::ArrowFired { velocity });
        true
    }

    pub fn move_bow(&mut self, dir: Direction) {
        if !self.is_playing() {
            return;
        }
        self.bow.nudge(dir);
        self.arrow.follow(self.bow.nock(), self.bow.heading());
    }

    /// Points an aiming bow at `point` (play-area coordinates).
    pub fn aim_at(&mut self, point: DVec2) {
        if !self.is_playing() {
            return;
        }
        self.bow.aim_at(point);
        self.arrow.follow(self.bow.nock(), self.bow.heading());
    }

    /// Lets `dt` seconds of simulated time pass, running every activity that
    /// comes due in chronological order. Stops as soon as the round ends.
    pub fn advance(&mut self, dt: f64) {
        if !self.is_playing() || dt <= 0.0 {
            return;
        }
        self.target.decay_pulse(dt);
        for obstacle in &mut self.obstacles {
            obstacle.decay_pulse(dt);
        }
        let mut budget = dt;
        while self.is_playing() {
            match self.scheduler.next_due(budget) {
                Some((elapsed, activity)) => {
                    budget -= elapsed;
                    self.run(activity);
                }
                None => {
                    self.scheduler.elapse(budget);
                    break;
                }
            }
        }
    }

    /// Runs one clock second immediately.
    pub fn tick(&mut self) {
        if self.is_playing() {
            self.run(Activity::Clock);
        }
    }

    fn run(&mut self, activity: Activity) {
        match activity {
            Activity::Clock => self.on_clock(),
            Activity::TargetMover => {
                self.target.on_mover_tick(self.config.play_area, &mut self.rng);
                self.events.push(GameEvent::TargetMoved { at: self.target_position() });
            }
            Activity::Projectile => self.on_projectile(),
        }
    }

    fn on_clock(&mut self) {
        let tick = self.clock.tick();
        self.events.push(GameEvent::Tick { time_left: tick.time_left });
        if tick.ramp {
            self.target.speed_up_by_clock();
        }
        if tick.expired {
            self.end_round();
        }
    }

    fn on_projectile(&mut self) {
        if !self.arrow.is_flying() {
            self.scheduler.cancel(Activity::Projectile);
            return;
        }
        self.arrow.step(self.config.arrow.tick);
        let tip = self.arrow.tip();
        let body = self.arrow.bounds();
        let policy = self.config.collision;

        if let Some(rules) = &self.config.difficulty.obstacles {
            for (index, obstacle) in self.obstacles.iter_mut().enumerate() {
                if policy.hits(tip, &body, &obstacle.rect) && self.arrow.mark_obstacle(index) {
                    self.arrow.damp(rules.damping);
                    obstacle.start_pulse();
                    self.events.push(GameEvent::ObstacleStruck { index });
                }
            }
        }

        if policy.hits(tip, &body, &self.target.rect()) {
            self.on_hit(tip);
        } else if !self.config.play_area.contains(tip) {
            self.ground_arrow();
            self.events.push(GameEvent::Missed);
        }
    }

    fn on_hit(&mut self, at: DVec2) {
        self.score += self.config.score_per_hit;
        self.target.start_pulse();
        self.ground_arrow();
        self.events.push(GameEvent::Hit { score: self.score, at });
        if let Some(level) = self.difficulty.on_score(self.score) {
            self.level_up(level);
        }
    }

    fn level_up(&mut self, level: u32) {
        let area = self.config.play_area;
        self.events.push(GameEvent::LevelUp { level });
        info!("level {level} reached at score {}", self.score);
        if self.target.apply_level(level, &self.config.difficulty.shrink, area) {
            self.scheduler.arm(Activity::TargetMover, self.target.mover_period());
            self.jump_target();
        }
        if let Some(rules) = &self.config.difficulty.obstacles {
            let count = rules.count_for(level);
            if count > 0 {
                self.obstacles = rules.spawn(count, area, &mut self.rng);
                self.events.push(GameEvent::ObstaclesSpawned { count });
                debug!("spawned {count} obstacles");
            }
        }
    }

    fn end_round(&mut self) {
        self.scheduler.cancel_all();
        self.ground_arrow();
        self.phase = Phase::GameOver;
        self.events.push(GameEvent::GameOver { score: self.score, level: self.level() });
        info!("game over: score {}, level {}", self.score, self.level());
    }

    fn ground_arrow(&mut self) {
        self.arrow.ground(self.bow.nock(), self.bow.heading());
        self.scheduler.cancel(Activity::Projectile);
    }

    fn jump_target(&mut self) {
        self.target.jump(self.config.play_area, &mut self.rng);
        self.events.push(GameEvent::TargetMoved { at: self.target_position() });
    }

    fn target_position(&self) -> DVec2 {
        let r = self.target.rect();
        DVec2::new(r.x, r.y)
    }

    fn restore_initial_state(&mut self) {
        self.score = 0;
        self.clock.reset();
        self.target.reset();
        self.bow.reset();
        self.arrow.ground(self.bow.nock(), self.bow.heading());
        self.obstacles.clear();
        self.difficulty.reset();
    }
}
