//! Game settings and match tuning
//!
//! Persisted in LocalStorage on the web; natively the defaults are used.

use serde::{Deserialize, Serialize};

use crate::consts::*;
use crate::error::SettingsError;
use crate::input::KeyBindings;

/// Which input sources drive a paddle
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum InputMode {
    /// Up/down keys only
    Keyboard,
    /// On-screen joystick only
    Analog,
    /// Keys and joystick summed, capped at full speed
    #[default]
    Combined,
    /// Paddle never moves
    Stationary,
}

impl InputMode {
    /// Resolve digital and analog input into a movement axis in [-1, 1]
    ///
    /// `digital` is -1, 0 or 1; `analog` is clamped first, NaN counts as 0.
    pub fn axis(&self, digital: f32, analog: f32) -> f32 {
        let analog = if analog.is_nan() {
            0.0
        } else {
            analog.clamp(-1.0, 1.0)
        };
        match self {
            InputMode::Keyboard => digital,
            InputMode::Analog => analog,
            InputMode::Combined => (digital + analog).clamp(-1.0, 1.0),
            InputMode::Stationary => 0.0,
        }
    }
}

/// Match tuning: arena geometry, speeds and power-up behaviour
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MatchConfig {
    pub arena_width: f32,
    pub arena_height: f32,

    pub paddle_width: f32,
    pub paddle_height: f32,
    pub paddle_inset: f32,
    /// Units per second at full input
    pub paddle_speed: f32,

    pub ball_size: f32,
    /// Units per second on each axis at serve
    pub ball_speed: f32,

    pub power_up_growth: f32,
    pub power_up_duration_secs: f32,

    pub left_input: InputMode,
    pub right_input: InputMode,
}

impl Default for MatchConfig {
    fn default() -> Self {
        Self {
            arena_width: ARENA_WIDTH,
            arena_height: ARENA_HEIGHT,
            paddle_width: PADDLE_WIDTH,
            paddle_height: PADDLE_HEIGHT,
            paddle_inset: PADDLE_INSET,
            paddle_speed: PADDLE_SPEED,
            ball_size: BALL_SIZE,
            ball_speed: BALL_SPEED,
            power_up_growth: POWER_UP_GROWTH,
            power_up_duration_secs: POWER_UP_DURATION_SECS,
            left_input: InputMode::Combined,
            right_input: InputMode::Combined,
        }
    }
}

impl MatchConfig {
    /// Replace values that cannot produce a playable match with defaults
    pub fn validated(mut self) -> Self {
        let defaults = Self::default();
        let positive = |v: f32| v.is_finite() && v > 0.0;

        if !positive(self.arena_width) || !positive(self.arena_height) {
            self.arena_width = defaults.arena_width;
            self.arena_height = defaults.arena_height;
        }
        if !positive(self.paddle_width) {
            self.paddle_width = defaults.paddle_width;
        }
        if !positive(self.paddle_height) || self.paddle_height > self.arena_height {
            self.paddle_height = defaults.paddle_height.min(self.arena_height);
        }
        // Both paddles, with their insets, must fit side by side
        let fits = |c: &Self| 2.0 * (c.paddle_inset + c.paddle_width) < c.arena_width;
        if !self.paddle_inset.is_finite() || self.paddle_inset < 0.0 || !fits(&self) {
            self.paddle_inset = defaults.paddle_inset;
        }
        if !fits(&self) {
            self.arena_width = defaults.arena_width;
        }
        if !fits(&self) {
            self.paddle_width = defaults.paddle_width;
        }
        if !positive(self.paddle_speed) {
            self.paddle_speed = defaults.paddle_speed;
        }
        if !positive(self.ball_size) || self.ball_size >= self.arena_height {
            self.ball_size = defaults.ball_size;
        }
        if !positive(self.ball_speed) {
            self.ball_speed = defaults.ball_speed;
        }
        // Grown paddle must still fit the arena
        if !self.power_up_growth.is_finite() || self.power_up_growth < 0.0 {
            self.power_up_growth = defaults.power_up_growth;
        }
        self.power_up_growth = self
            .power_up_growth
            .min(self.arena_height - self.paddle_height);
        if !self.power_up_duration_secs.is_finite() || self.power_up_duration_secs < 0.0 {
            self.power_up_duration_secs = defaults.power_up_duration_secs;
        }
        self.power_up_duration_secs = self.power_up_duration_secs.min(MAX_POWER_UP_SECS);
        self
    }

    /// Power-up lifetime in microseconds of simulated time
    pub fn power_up_micros(&self) -> u64 {
        crate::secs_to_micros(self.power_up_duration_secs)
    }
}

/// Player preferences
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    /// Match tuning and per-side input modes
    pub match_config: MatchConfig,
    /// Keyboard layout
    pub key_bindings: KeyBindings,
}

impl Settings {
    /// LocalStorage key (used only in wasm32)
    #[allow(dead_code)]
    const STORAGE_KEY: &'static str = "pong_arena_settings";

    /// Parse settings, filling missing fields with defaults
    pub fn from_json(json: &str) -> Result<Self, SettingsError> {
        let mut settings: Settings = serde_json::from_str(json)?;
        settings.match_config = settings.match_config.validated();
        Ok(settings)
    }

    pub fn to_json(&self) -> Result<String, SettingsError> {
        Ok(serde_json::to_string(self)?)
    }

    /// Load settings from LocalStorage (WASM only)
    #[cfg(target_arch = "wasm32")]
    pub fn load() -> Self {
        match crate::platform::web::storage_get(Self::STORAGE_KEY) {
            Ok(Some(json)) => match Self::from_json(&json) {
                Ok(settings) => {
                    log::info!("Loaded settings from LocalStorage");
                    return settings;
                }
                Err(e) => log::warn!("Ignoring stored settings: {}", e),
            },
            Ok(None) => {}
            Err(e) => log::warn!("{}", e),
        }

        log::info!("Using default settings");
        Self::default()
    }

    /// Save settings to LocalStorage (WASM only)
    #[cfg(target_arch = "wasm32")]
    pub fn save(&self) {
        let result = self
            .to_json()
            .and_then(|json| crate::platform::web::storage_set(Self::STORAGE_KEY, &json));
        match result {
            Ok(()) => log::info!("Settings saved"),
            Err(e) => log::warn!("Settings not saved: {}", e),
        }
    }

    /// Native stubs
    #[cfg(not(target_arch = "wasm32"))]
    pub fn load() -> Self {
        Self::default()
    }

    #[cfg(not(target_arch = "wasm32"))]
    pub fn save(&self) {
        // No-op for native
    }
}
