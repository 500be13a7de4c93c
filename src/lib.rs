//! Pong Arena - two-paddle Pong with power-ups and joystick input
//!
//! Core modules:
//! - `sim`: Deterministic match simulation (physics, collisions, scoring)
//! - `input`: Keyboard/joystick sampling into per-frame snapshots
//! - `session`: Fixed timestep driver and score report dispatch
//! - `report`: Score reporting and identity boundary
//! - `settings`: Persisted preferences and match tuning
//! - `platform`: Browser bindings (wasm32 only)

pub mod error;
pub mod input;
pub mod platform;
pub mod report;
pub mod session;
pub mod settings;
pub mod sim;

pub use error::{ReportError, SettingsError};
pub use session::Session;
pub use settings::{InputMode, MatchConfig, Settings};

/// Game configuration constants
pub mod consts {
    /// Fixed simulation timestep (60 Hz, one logical tick per display frame)
    pub const SIM_DT: f32 = 1.0 / 60.0;
    /// Largest frame delta fed to the accumulator (tab switches, debugger stops)
    pub const MAX_FRAME_DT: f32 = 0.1;
    /// Maximum substeps per frame to prevent spiral of death
    pub const MAX_SUBSTEPS: u32 = 8;

    /// Arena dimensions
    pub const ARENA_WIDTH: f32 = 800.0;
    pub const ARENA_HEIGHT: f32 = 600.0;

    /// Paddle defaults
    pub const PADDLE_WIDTH: f32 = 10.0;
    pub const PADDLE_HEIGHT: f32 = 100.0;
    /// Gap between a paddle and its wall
    pub const PADDLE_INSET: f32 = 10.0;
    /// Units per second (7 units per 60 Hz frame)
    pub const PADDLE_SPEED: f32 = 420.0;

    /// Ball defaults
    pub const BALL_SIZE: f32 = 10.0;
    /// Units per second on each axis at serve (5 units per 60 Hz frame)
    pub const BALL_SPEED: f32 = 300.0;

    /// Power-up defaults
    pub const POWER_UP_GROWTH: f32 = 50.0;
    pub const POWER_UP_DURATION_SECS: f32 = 3.0;
    /// Longest power-up a settings file may ask for
    pub const MAX_POWER_UP_SECS: f32 = 60.0;
}

/// Convert seconds to whole microseconds of simulated time (rounded).
/// Negative and NaN give 0; huge values saturate.
#[inline]
pub fn secs_to_micros(secs: f32) -> u64 {
    (f64::from(secs.max(0.0)) * 1e6).round() as u64
}
