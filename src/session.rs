//! Frame-driven session
//!
//! Turns variable display frame times into fixed simulation ticks and hands
//! scoring events to the report boundary.

use crate::consts::*;
use crate::report::{self, IdentityProvider, ScoreReporter};
use crate::settings::MatchConfig;
use crate::sim::{InputSnapshot, Match, MatchEvent, Snapshot};

pub struct Session {
    pub game: Match,
    accumulator: f32,
    reporter: Box<dyn ScoreReporter>,
    identity: Box<dyn IdentityProvider>,
}

impl Session {
    pub fn new(
        config: MatchConfig,
        seed: u64,
        reporter: Box<dyn ScoreReporter>,
        identity: Box<dyn IdentityProvider>,
    ) -> Self {
        Self {
            game: Match::new(config, seed),
            accumulator: 0.0,
            reporter,
            identity,
        }
    }

    /// Run the ticks owed for a frame that took `frame_dt` seconds.
    ///
    /// Triggers in `input` are applied once, before the first tick.
    pub fn frame(&mut self, frame_dt: f32, input: &InputSnapshot) -> Vec<MatchEvent> {
        if input.actions.any() {
            self.game.apply_actions(&input.actions);
        }

        let dt = if frame_dt.is_finite() {
            frame_dt.clamp(0.0, MAX_FRAME_DT)
        } else {
            0.0
        };
        self.accumulator += dt;

        let held = input.without_actions();
        let mut events = Vec::new();
        let mut substeps = 0;
        while self.accumulator >= SIM_DT && substeps < MAX_SUBSTEPS {
            if let Some(event) = self.game.advance(SIM_DT, &held) {
                self.on_event(event);
                events.push(event);
            }
            self.accumulator -= SIM_DT;
            substeps += 1;
        }
        events
    }

    fn on_event(&self, event: MatchEvent) {
        match event {
            MatchEvent::PointScored { .. } => {
                report::dispatch(
                    self.identity.as_ref(),
                    self.reporter.as_ref(),
                    self.game.left.score,
                    self.game.right.score,
                );
            }
        }
    }

    pub fn snapshot(&self) -> Snapshot {
        self.game.snapshot()
    }
}

#[cfg(test)]
mod tests {
    use std::cell::RefCell;
    use std::rc::Rc;

    use glam::Vec2;

    use super::*;
    use crate::error::ReportError;
    use crate::report::{Anonymous, Identity, ScoreReport, StaticIdentity};
    use crate::sim::{Actions, Phase, Side};

    #[derive(Clone, Default)]
    struct Recorder(Rc<RefCell<Vec<ScoreReport>>>);

    impl ScoreReporter for Recorder {
        fn submit(&self, report: ScoreReport) -> Result<(), ReportError> {
            self.0.borrow_mut().push(report);
            Ok(())
        }
    }

    struct Broken;

    impl ScoreReporter for Broken {
        fn submit(&self, _report: ScoreReport) -> Result<(), ReportError> {
            Err(ReportError::Rejected("permission denied".into()))
        }
    }

    fn player() -> Box<StaticIdentity> {
        Box::new(StaticIdentity(Identity {
            uid: "p1".into(),
            display_name: None,
        }))
    }

    fn serve_input() -> InputSnapshot {
        InputSnapshot {
            actions: Actions {
                toggle_pause: true,
                ..Default::default()
            },
            ..Default::default()
        }
    }

    /// Serve, then aim the ball straight at the left goal below the paddle
    fn start_losing_rally(session: &mut Session) {
        session.frame(SIM_DT, &serve_input());
        assert_eq!(session.game.phase, Phase::Rallying);
        session.game.ball.pos = Vec2::new(100.0, 550.0);
        session.game.ball.vel = Vec2::new(-BALL_SPEED, 0.0);
    }

    fn run_until_point(session: &mut Session) -> Vec<MatchEvent> {
        let mut events = Vec::new();
        for _ in 0..120 {
            events.extend(session.frame(SIM_DT, &InputSnapshot::default()));
        }
        events
    }

    #[test]
    fn test_paused_session_does_not_tick() {
        let mut session = Session::new(MatchConfig::default(), 1, Box::new(Broken), Box::new(Anonymous));
        for _ in 0..10 {
            session.frame(SIM_DT, &InputSnapshot::default());
        }
        assert_eq!(session.game.clock_us, 0);
    }

    #[test]
    fn test_long_frame_is_bounded() {
        let mut session = Session::new(MatchConfig::default(), 1, Box::new(Broken), Box::new(Anonymous));
        session.frame(5.0, &serve_input());
        // Frame delta is capped, so only a handful of 60 Hz ticks run
        let step = crate::secs_to_micros(SIM_DT);
        let elapsed = session.game.clock_us;
        assert!(elapsed >= 5 * step && elapsed <= u64::from(MAX_SUBSTEPS) * step);
    }

    #[test]
    fn test_actions_applied_once_per_frame() {
        let mut session = Session::new(MatchConfig::default(), 1, Box::new(Broken), Box::new(Anonymous));
        // A multi-tick frame must not toggle pause once per substep
        session.frame(0.05, &serve_input());
        assert!(!session.game.paused);
    }

    #[test]
    fn test_point_is_reported_with_scores() {
        let recorder = Recorder::default();
        let mut session = Session::new(MatchConfig::default(), 2, Box::new(recorder.clone()), player());
        start_losing_rally(&mut session);

        let events = run_until_point(&mut session);
        assert_eq!(events, vec![MatchEvent::PointScored { side: Side::Right }]);

        let sent = recorder.0.borrow();
        assert_eq!(sent.len(), 1);
        assert_eq!(sent[0].user_id, "p1");
        assert_eq!((sent[0].player_score, sent[0].opponent_score), (0, 1));
    }

    #[test]
    fn test_anonymous_player_reports_nothing() {
        let recorder = Recorder::default();
        let mut session =
            Session::new(MatchConfig::default(), 2, Box::new(recorder.clone()), Box::new(Anonymous));
        start_losing_rally(&mut session);
        assert_eq!(run_until_point(&mut session).len(), 1);
        assert!(recorder.0.borrow().is_empty());
    }

    #[test]
    fn test_failed_report_does_not_disturb_play() {
        let mut ok = Session::new(MatchConfig::default(), 3, Box::new(Recorder::default()), player());
        let mut broken = Session::new(MatchConfig::default(), 3, Box::new(Broken), player());
        for session in [&mut ok, &mut broken] {
            start_losing_rally(session);
            assert_eq!(run_until_point(session).len(), 1);
            // Next serve proceeds normally
            session.frame(SIM_DT, &serve_input());
            for _ in 0..30 {
                session.frame(SIM_DT, &InputSnapshot::default());
            }
        }
        assert_eq!(ok.game.ball, broken.game.ball);
        assert_eq!(ok.game.right.score, broken.game.right.score);
        assert_eq!(broken.game.phase, Phase::Rallying);
    }
}
