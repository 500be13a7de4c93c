//! Input sampling
//!
//! Browser events arrive at any time between frames. They are folded into an
//! `InputState`, and each frame takes one `InputSnapshot` from it, so a tick
//! never sees half-applied input.

use serde::{Deserialize, Serialize};

use crate::sim::{Actions, InputSnapshot, Side, SideInput};

/// One-shot commands from keys or on-screen buttons
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Action {
    TogglePause,
    /// Pause whatever the current state (not bindable; sent on focus loss)
    Pause,
    Reset,
    PowerUp(Side),
}

/// What a key is bound to
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Binding {
    Up(Side),
    Down(Side),
    Action(Action),
}

/// Key names (`KeyboardEvent.key`) for each control. Single letters match
/// either case.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct KeyBindings {
    pub left_up: Vec<String>,
    pub left_down: Vec<String>,
    pub right_up: Vec<String>,
    pub right_down: Vec<String>,
    pub toggle_pause: Vec<String>,
    pub reset: Vec<String>,
    pub power_up_left: Vec<String>,
    pub power_up_right: Vec<String>,
}

fn keys(names: &[&str]) -> Vec<String> {
    names.iter().map(|s| s.to_string()).collect()
}

impl Default for KeyBindings {
    fn default() -> Self {
        Self {
            left_up: keys(&["w"]),
            left_down: keys(&["s"]),
            right_up: keys(&["ArrowUp"]),
            right_down: keys(&["ArrowDown"]),
            toggle_pause: keys(&["p", " "]),
            reset: keys(&["r"]),
            power_up_left: keys(&["q"]),
            power_up_right: keys(&["/"]),
        }
    }
}

impl KeyBindings {
    pub fn lookup(&self, key: &str) -> Option<Binding> {
        let key = normalize_key(key);
        let table = [
            (&self.left_up, Binding::Up(Side::Left)),
            (&self.left_down, Binding::Down(Side::Left)),
            (&self.right_up, Binding::Up(Side::Right)),
            (&self.right_down, Binding::Down(Side::Right)),
            (&self.toggle_pause, Binding::Action(Action::TogglePause)),
            (&self.reset, Binding::Action(Action::Reset)),
            (&self.power_up_left, Binding::Action(Action::PowerUp(Side::Left))),
            (&self.power_up_right, Binding::Action(Action::PowerUp(Side::Right))),
        ];
        table
            .into_iter()
            .find(|(names, _)| names.iter().any(|n| normalize_key(n) == key))
            .map(|(_, binding)| binding)
    }
}

fn normalize_key(key: &str) -> String {
    if key.chars().count() == 1 {
        key.to_lowercase()
    } else {
        key.to_string()
    }
}

/// Map a joystick drag to a vertical axis.
///
/// `dx`/`dy` are the pointer's offset from the stick origin in screen pixels
/// (y grows downward) and `radius` is the stick's travel. Mostly-horizontal
/// drags give 0; otherwise the drag distance over `radius`, signed by
/// direction and clamped to [-1, 1].
pub fn analog_axis(dx: f32, dy: f32, radius: f32) -> f32 {
    if !(dx.is_finite() && dy.is_finite()) || radius <= 0.0 || dy.abs() <= dx.abs() {
        return 0.0;
    }
    (dy.signum() * dx.hypot(dy) / radius).clamp(-1.0, 1.0)
}

/// Controls accumulated between frames
#[derive(Debug, Clone, Default)]
pub struct InputState {
    bindings: KeyBindings,
    left: SideInput,
    right: SideInput,
    actions: Actions,
}

impl InputState {
    pub fn new(bindings: KeyBindings) -> Self {
        Self {
            bindings,
            ..Default::default()
        }
    }

    fn side_mut(&mut self, side: Side) -> &mut SideInput {
        match side {
            Side::Left => &mut self.left,
            Side::Right => &mut self.right,
        }
    }

    /// Returns whether the key is bound (so the host can suppress scrolling)
    pub fn key_down(&mut self, key: &str) -> bool {
        match self.bindings.lookup(key) {
            Some(Binding::Up(side)) => self.side_mut(side).up = true,
            Some(Binding::Down(side)) => self.side_mut(side).down = true,
            Some(Binding::Action(action)) => self.trigger(action),
            None => return false,
        }
        true
    }

    pub fn key_up(&mut self, key: &str) -> bool {
        match self.bindings.lookup(key) {
            Some(Binding::Up(side)) => self.side_mut(side).up = false,
            Some(Binding::Down(side)) => self.side_mut(side).down = false,
            Some(Binding::Action(_)) => {}
            None => return false,
        }
        true
    }

    /// Latch a one-shot action until the next snapshot
    pub fn trigger(&mut self, action: Action) {
        match action {
            Action::TogglePause => self.actions.toggle_pause = true,
            Action::Pause => self.actions.pause = true,
            Action::Reset => self.actions.reset = true,
            Action::PowerUp(Side::Left) => self.actions.power_up_left = true,
            Action::PowerUp(Side::Right) => self.actions.power_up_right = true,
        }
    }

    pub fn set_axis(&mut self, side: Side, value: f32) {
        self.side_mut(side).axis = if value.is_nan() {
            0.0
        } else {
            value.clamp(-1.0, 1.0)
        };
    }

    pub fn release_axis(&mut self, side: Side) {
        self.side_mut(side).axis = 0.0;
    }

    /// Drop all held controls (window blur: key-up events will never come)
    pub fn release_all(&mut self) {
        self.left = SideInput::default();
        self.right = SideInput::default();
    }

    /// Take this frame's input; latched actions are consumed
    pub fn snapshot(&mut self) -> InputSnapshot {
        InputSnapshot {
            left: self.left,
            right: self.right,
            actions: std::mem::take(&mut self.actions),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_bindings() {
        let b = KeyBindings::default();
        assert_eq!(b.lookup("w"), Some(Binding::Up(Side::Left)));
        assert_eq!(b.lookup("S"), Some(Binding::Down(Side::Left)));
        assert_eq!(b.lookup("ArrowUp"), Some(Binding::Up(Side::Right)));
        assert_eq!(b.lookup(" "), Some(Binding::Action(Action::TogglePause)));
        assert_eq!(b.lookup("/"), Some(Binding::Action(Action::PowerUp(Side::Right))));
        assert_eq!(b.lookup("arrowup"), None);
        assert_eq!(b.lookup("x"), None);
    }

    #[test]
    fn test_held_keys_persist_across_snapshots() {
        let mut input = InputState::default();
        assert!(input.key_down("w"));
        let first = input.snapshot();
        let second = input.snapshot();
        assert!(first.left.up && second.left.up);

        input.key_up("w");
        assert!(!input.snapshot().left.up);
    }

    #[test]
    fn test_actions_are_consumed_once() {
        let mut input = InputState::default();
        input.key_down("p");
        input.trigger(Action::PowerUp(Side::Left));
        let snap = input.snapshot();
        assert!(snap.actions.toggle_pause);
        assert!(snap.actions.power_up_left);
        assert!(!input.snapshot().actions.any());
    }

    #[test]
    fn test_pause_latches_beside_toggle() {
        let mut input = InputState::default();
        input.key_down("p");
        input.release_all();
        input.trigger(Action::Pause);
        let snap = input.snapshot();
        assert!(snap.actions.toggle_pause);
        assert!(snap.actions.pause);
        assert!(!input.snapshot().actions.pause);
    }

    #[test]
    fn test_unbound_key_is_not_handled() {
        let mut input = InputState::default();
        assert!(!input.key_down("Tab"));
        assert_eq!(input.snapshot(), InputSnapshot::default());
    }

    #[test]
    fn test_axis_is_clamped() {
        let mut input = InputState::default();
        input.set_axis(Side::Right, -4.0);
        assert_eq!(input.snapshot().right.axis, -1.0);
        input.set_axis(Side::Right, f32::NAN);
        assert_eq!(input.snapshot().right.axis, 0.0);
        input.set_axis(Side::Left, 0.5);
        input.release_all();
        assert_eq!(input.snapshot().left.axis, 0.0);
    }

    #[test]
    fn test_analog_axis_sectors() {
        // Straight up half way
        assert_eq!(analog_axis(0.0, -25.0, 50.0), -0.5);
        // Past the rim
        assert_eq!(analog_axis(0.0, 80.0, 50.0), 1.0);
        // Mostly sideways
        assert_eq!(analog_axis(40.0, 10.0, 50.0), 0.0);
        assert_eq!(analog_axis(0.0, 0.0, 50.0), 0.0);
        // Diagonal-ish downward uses full distance
        let axis = analog_axis(3.0, 4.0, 10.0);
        assert!((axis - 0.5).abs() < 1e-6);
    }
}
