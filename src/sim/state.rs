//! Match state and core simulation types
//!
//! Paddles and ball are plain owned values; the `Match` owns all of them and
//! is only mutated through `advance` and the explicit transitions below.

use glam::Vec2;
use rand::{Rng, SeedableRng};
use rand_pcg::Pcg32;
use serde::{Deserialize, Serialize};

use super::collision::Rect;
use crate::settings::MatchConfig;

/// Which end of the arena
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Side {
    /// The player's paddle
    Left,
    /// The opponent's paddle
    Right,
}

impl Side {
    pub fn as_str(&self) -> &'static str {
        match self {
            Side::Left => "left",
            Side::Right => "right",
        }
    }
}

/// Rally phase; pausing is tracked separately and overlays either
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Phase {
    /// Ball parked at center, waiting for a serve
    AwaitingServe,
    /// Ball in play
    Rallying,
}

/// Something the host should react to after a tick
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum MatchEvent {
    /// `side` won the point
    PointScored { side: Side },
}

/// Overlay text the renderer should show
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Prompt {
    /// Paused before a serve ("Press A to Start")
    Serve,
    /// Paused mid-rally
    Paused,
}

/// A paddle. `y` is the top edge; the origin is the arena's top-left corner.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Paddle {
    pub side: Side,
    pub x: f32,
    pub y: f32,
    pub width: f32,
    pub height: f32,
    pub base_height: f32,
    /// Units per second at full input
    pub speed: f32,
    pub score: u32,
    /// Clock reading (µs of simulated time) at which the active power-up
    /// ends; `None` when inactive
    pub power_up_until: Option<u64>,
}

impl Paddle {
    pub fn new(side: Side, config: &MatchConfig) -> Self {
        let x = match side {
            Side::Left => config.paddle_inset,
            Side::Right => config.arena_width - config.paddle_width - config.paddle_inset,
        };
        Self {
            side,
            x,
            y: (config.arena_height - config.paddle_height) / 2.0,
            width: config.paddle_width,
            height: config.paddle_height,
            base_height: config.paddle_height,
            speed: config.paddle_speed,
            score: 0,
            power_up_until: None,
        }
    }

    pub fn rect(&self) -> Rect {
        Rect::new(self.x, self.y, self.width, self.height)
    }

    pub fn center_y(&self) -> f32 {
        self.y + self.height / 2.0
    }

    pub fn is_powered_up(&self) -> bool {
        self.power_up_until.is_some()
    }

    /// Move vertically and clamp into the arena
    pub fn move_by(&mut self, dy: f32, arena_height: f32) {
        if dy.is_finite() {
            self.y += dy;
        }
        self.clamp(arena_height);
    }

    /// Enforce `0 <= y <= arena_height - height`
    pub fn clamp(&mut self, arena_height: f32) {
        self.y = self.y.clamp(0.0, (arena_height - self.height).max(0.0));
    }

    /// Grow until clock reading `until`. Returns false (and changes nothing) if a
    /// power-up is already running.
    pub fn grow(&mut self, growth: f32, until: u64, arena_height: f32) -> bool {
        if self.is_powered_up() {
            return false;
        }
        self.height = self.base_height + growth;
        self.power_up_until = Some(until);
        self.clamp(arena_height);
        true
    }

    /// Revert to base height if the power-up has run out by `now`
    pub fn expire_power_up(&mut self, now: u64, arena_height: f32) -> bool {
        match self.power_up_until {
            Some(until) if now >= until => {
                self.clear_power_up(arena_height);
                true
            }
            _ => false,
        }
    }

    pub fn clear_power_up(&mut self, arena_height: f32) {
        self.power_up_until = None;
        self.height = self.base_height;
        self.clamp(arena_height);
    }

    /// Back to match-start state: centered, base height, no score
    pub fn reset(&mut self, arena_height: f32) {
        self.clear_power_up(arena_height);
        self.score = 0;
        self.y = (arena_height - self.base_height) / 2.0;
    }
}

/// The ball. Position is its center.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Ball {
    pub pos: Vec2,
    /// Units per second
    pub vel: Vec2,
    pub size: f32,
    /// Per-axis speed at serve; also scales angled paddle returns
    pub speed: f32,
    pub served: bool,
}

impl Ball {
    pub fn new(center: Vec2, size: f32, speed: f32) -> Self {
        Self {
            pos: center,
            vel: Vec2::ZERO,
            size,
            speed,
            served: false,
        }
    }

    pub fn radius(&self) -> f32 {
        self.size / 2.0
    }

    /// Bounding square
    pub fn rect(&self) -> Rect {
        let r = self.radius();
        Rect::new(self.pos.x - r, self.pos.y - r, self.size, self.size)
    }

    /// Park at `center` with no velocity
    pub fn reset(&mut self, center: Vec2) {
        self.pos = center;
        self.vel = Vec2::ZERO;
        self.served = false;
    }

    /// Launch diagonally; each axis picks its sign independently
    pub fn serve<R: Rng>(&mut self, rng: &mut R) {
        let sx = if rng.random_bool(0.5) { 1.0 } else { -1.0 };
        let sy = if rng.random_bool(0.5) { 1.0 } else { -1.0 };
        self.vel = Vec2::new(sx * self.speed, sy * self.speed);
        self.served = true;
    }
}

/// Read-only view handed to the renderer each frame
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Snapshot {
    pub left: Rect,
    pub right: Rect,
    pub ball: Rect,
    pub left_score: u32,
    pub right_score: u32,
    pub left_powered: bool,
    pub right_powered: bool,
    pub prompt: Option<Prompt>,
}

/// Complete match state
#[derive(Debug, Clone)]
pub struct Match {
    pub config: MatchConfig,
    pub left: Paddle,
    pub right: Paddle,
    pub ball: Ball,
    pub phase: Phase,
    pub paused: bool,
    /// A serve will happen on the next unpaused tick
    pub serve_requested: bool,
    /// Simulated time in microseconds; only unpaused `advance` calls move it
    pub clock_us: u64,
    rng: Pcg32,
}

impl Match {
    /// New match, paused and awaiting the first serve
    pub fn new(config: MatchConfig, seed: u64) -> Self {
        let config = config.validated();
        let center = Vec2::new(config.arena_width / 2.0, config.arena_height / 2.0);
        Self {
            left: Paddle::new(Side::Left, &config),
            right: Paddle::new(Side::Right, &config),
            ball: Ball::new(center, config.ball_size, config.ball_speed),
            phase: Phase::AwaitingServe,
            paused: true,
            serve_requested: false,
            clock_us: 0,
            rng: Pcg32::seed_from_u64(seed),
            config,
        }
    }

    pub fn center(&self) -> Vec2 {
        Vec2::new(self.config.arena_width / 2.0, self.config.arena_height / 2.0)
    }

    pub fn paddle(&self, side: Side) -> &Paddle {
        match side {
            Side::Left => &self.left,
            Side::Right => &self.right,
        }
    }

    pub fn paddle_mut(&mut self, side: Side) -> &mut Paddle {
        match side {
            Side::Left => &mut self.left,
            Side::Right => &mut self.right,
        }
    }

    /// Launch the parked ball and start the rally
    pub fn serve(&mut self) {
        self.ball.serve(&mut self.rng);
        self.phase = Phase::Rallying;
        self.serve_requested = false;
        log::info!("Serve ({:.0}, {:.0})", self.ball.vel.x, self.ball.vel.y);
    }

    /// Flip the pause flag. Unpausing before a serve requests one.
    pub fn toggle_pause(&mut self) {
        self.paused = !self.paused;
        self.serve_requested = !self.paused && self.phase == Phase::AwaitingServe;
        log::debug!("Match {}", if self.paused { "paused" } else { "resumed" });
    }

    /// Pause without toggling; a pending serve waits for the next unpause
    pub fn pause(&mut self) {
        if !self.paused {
            log::debug!("Match paused");
        }
        self.paused = true;
        self.serve_requested = false;
    }

    /// Zero scores, recenter everything, cancel power-ups, wait for a serve
    pub fn reset_match(&mut self) {
        let h = self.config.arena_height;
        self.left.reset(h);
        self.right.reset(h);
        let center = self.center();
        self.ball.reset(center);
        self.phase = Phase::AwaitingServe;
        self.paused = true;
        self.serve_requested = false;
        log::info!("Match reset");
    }

    /// Grow `side`'s paddle for the configured duration. No-op while one is
    /// already running; returns whether it took effect.
    pub fn activate_power_up(&mut self, side: Side) -> bool {
        let growth = self.config.power_up_growth;
        let until = self.clock_us.saturating_add(self.config.power_up_micros());
        let h = self.config.arena_height;
        let activated = self.paddle_mut(side).grow(growth, until, h);
        if activated {
            log::debug!("Power-up on {} paddle until {} us", side.as_str(), until);
        }
        activated
    }

    pub fn prompt(&self) -> Option<Prompt> {
        match (self.paused, self.phase) {
            (false, _) => None,
            (true, Phase::AwaitingServe) => Some(Prompt::Serve),
            (true, Phase::Rallying) => Some(Prompt::Paused),
        }
    }

    pub fn snapshot(&self) -> Snapshot {
        Snapshot {
            left: self.left.rect(),
            right: self.right.rect(),
            ball: self.ball.rect(),
            left_score: self.left.score,
            right_score: self.right.score,
            left_powered: self.left.is_powered_up(),
            right_powered: self.right.is_powered_up(),
            prompt: self.prompt(),
        }
    }
}
