//! Deterministic simulation module
//!
//! All gameplay logic lives here. This module must be pure and deterministic:
//! - Fixed timestep only
//! - Seeded RNG only
//! - No rendering, storage or platform dependencies

pub mod collision;
pub mod state;
pub mod tick;

pub use collision::{Rect, approaching_side, goal_scored, paddle_bounce, wall_bounce};
pub use state::{Ball, Match, MatchEvent, Paddle, Phase, Prompt, Side, Snapshot};
pub use tick::{Actions, InputSnapshot, SideInput};
