//! Fixed timestep simulation tick
//!
//! Core game loop that advances a match deterministically.

use super::collision::{approaching_side, goal_scored, paddle_bounce, wall_bounce};
use super::state::{Match, MatchEvent, Phase, Side};

/// Sampled controls for one side
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct SideInput {
    pub up: bool,
    pub down: bool,
    /// Joystick axis, -1 (up) to 1 (down). Clamped before use.
    pub axis: f32,
}

impl SideInput {
    /// Keys as -1 (up), 0 or 1 (down); both held cancel out
    pub fn digital(&self) -> f32 {
        match (self.up, self.down) {
            (true, false) => -1.0,
            (false, true) => 1.0,
            _ => 0.0,
        }
    }
}

/// One-shot triggers, latched by the input layer until the next frame
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Actions {
    pub toggle_pause: bool,
    /// Pause unconditionally (focus loss); wins over a toggle in the same frame
    pub pause: bool,
    pub reset: bool,
    pub power_up_left: bool,
    pub power_up_right: bool,
}

impl Actions {
    pub fn any(&self) -> bool {
        self.toggle_pause
            || self.pause
            || self.reset
            || self.power_up_left
            || self.power_up_right
    }
}

/// Input for a frame, read as a whole before the first tick
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct InputSnapshot {
    pub left: SideInput,
    pub right: SideInput,
    pub actions: Actions,
}

impl InputSnapshot {
    pub fn side(&self, side: Side) -> &SideInput {
        match side {
            Side::Left => &self.left,
            Side::Right => &self.right,
        }
    }

    /// Same held controls, triggers dropped (for substeps after the first)
    pub fn without_actions(&self) -> Self {
        Self {
            actions: Actions::default(),
            ..*self
        }
    }
}

impl Match {
    /// Apply one-shot triggers: reset, pause toggle, forced pause, power-ups
    pub fn apply_actions(&mut self, actions: &Actions) {
        if actions.reset {
            self.reset_match();
        }
        if actions.toggle_pause {
            self.toggle_pause();
        }
        if actions.pause {
            self.pause();
        }
        if actions.power_up_left {
            self.activate_power_up(Side::Left);
        }
        if actions.power_up_right {
            self.activate_power_up(Side::Right);
        }
    }

    /// Advance the match by `dt` seconds.
    ///
    /// Reads only the held controls of `input`; triggers go through
    /// [`Match::apply_actions`]. A paused match does not change at all.
    /// Power-up expiry follows the simulated clock, so it depends on the
    /// total `dt` fed in rather than on how many calls were made.
    pub fn advance(&mut self, dt: f32, input: &InputSnapshot) -> Option<MatchEvent> {
        if self.paused {
            return None;
        }
        let dt = if dt.is_finite() { dt.max(0.0) } else { 0.0 };
        let arena_height = self.config.arena_height;

        self.clock_us = self.clock_us.saturating_add(crate::secs_to_micros(dt));
        let now = self.clock_us;
        for paddle in [&mut self.left, &mut self.right] {
            if paddle.expire_power_up(now, arena_height) {
                log::debug!("Power-up expired on {} paddle", paddle.side.as_str());
            }
        }

        if self.phase == Phase::AwaitingServe && self.serve_requested {
            self.serve();
        }

        // Paddles
        let modes = [self.config.left_input, self.config.right_input];
        for (mode, side) in modes.into_iter().zip([Side::Left, Side::Right]) {
            let controls = *input.side(side);
            let axis = mode.axis(controls.digital(), controls.axis);
            let paddle = self.paddle_mut(side);
            let dy = axis * paddle.speed * dt;
            paddle.move_by(dy, arena_height);
        }

        if self.phase != Phase::Rallying {
            return None;
        }

        // Ball
        self.ball.pos += self.ball.vel * dt;
        wall_bounce(&mut self.ball, arena_height);

        if let Some(side) = approaching_side(&self.ball) {
            let paddle = match side {
                Side::Left => &self.left,
                Side::Right => &self.right,
            };
            paddle_bounce(&mut self.ball, paddle);
        }

        goal_scored(&self.ball, self.config.arena_width).map(|side| self.score_point(side))
    }

    fn score_point(&mut self, side: Side) -> MatchEvent {
        self.paddle_mut(side).score += 1;
        let center = self.center();
        self.ball.reset(center);
        self.phase = Phase::AwaitingServe;
        self.paused = true;
        self.serve_requested = false;
        log::info!(
            "Point to {} ({} - {})",
            side.as_str(),
            self.left.score,
            self.right.score
        );
        MatchEvent::PointScored { side }
    }
}
