//! Input state: held keys plus edge-triggered presses collected between ticks

use crate::expedition::ExpeditionInput;
use crate::sim::TickInput;

/// Logical key, independent of layout
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Key {
    Up,
    Down,
    Left,
    Right,
    /// Space: jump in the runner, pulse in the expedition
    Action,
    /// Shift: dash in the runner, sprint in the expedition
    Shift,
    /// Dedicated dash key
    Dash,
    Pause,
    Reset,
    Start,
    /// Back to the title screen (expedition only)
    Idle,
}

impl Key {
    /// Map a `KeyboardEvent.code` string
    pub fn from_code(code: &str) -> Option<Self> {
        match code {
            "KeyW" | "ArrowUp" => Some(Key::Up),
            "KeyS" | "ArrowDown" => Some(Key::Down),
            "KeyA" | "ArrowLeft" => Some(Key::Left),
            "KeyD" | "ArrowRight" => Some(Key::Right),
            "Space" => Some(Key::Action),
            "ShiftLeft" | "ShiftRight" => Some(Key::Shift),
            "KeyK" => Some(Key::Dash),
            "KeyP" | "Escape" => Some(Key::Pause),
            "KeyR" => Some(Key::Reset),
            "Enter" => Some(Key::Start),
            "Backspace" => Some(Key::Idle),
            _ => None,
        }
    }
}

/// Presses seen since the last `take_*`
#[derive(Debug, Clone, Copy, Default)]
struct Edges {
    up: bool,
    action: bool,
    dash: bool,
    pause: bool,
    blur: bool,
    start: bool,
    reset: bool,
    idle: bool,
    tap: bool,
    double_tap: bool,
}

/// Keyboard/pointer/focus state shared by both games
#[derive(Debug, Clone)]
pub struct InputState {
    up: bool,
    down: bool,
    left: bool,
    right: bool,
    shift: bool,
    edges: Edges,
    last_tap_ms: Option<f64>,
    double_tap_window_ms: f64,
}

impl InputState {
    pub fn new(double_tap_window: f32) -> Self {
        Self {
            up: false,
            down: false,
            left: false,
            right: false,
            shift: false,
            edges: Edges::default(),
            last_tap_ms: None,
            double_tap_window_ms: double_tap_window as f64 * 1000.0,
        }
    }

    /// Returns true when the code is bound (host should prevent default)
    pub fn key_down(&mut self, code: &str, repeat: bool) -> bool {
        let Some(key) = Key::from_code(code) else {
            return false;
        };
        if repeat {
            return true;
        }
        match key {
            Key::Up => {
                self.up = true;
                self.edges.up = true;
            }
            Key::Down => self.down = true,
            Key::Left => self.left = true,
            Key::Right => self.right = true,
            Key::Action => self.edges.action = true,
            Key::Shift => {
                self.shift = true;
                self.edges.dash = true;
            }
            Key::Dash => self.edges.dash = true,
            Key::Pause => self.edges.pause = true,
            Key::Reset => self.edges.reset = true,
            Key::Start => self.edges.start = true,
            Key::Idle => self.edges.idle = true,
        }
        true
    }

    pub fn key_up(&mut self, code: &str) {
        match Key::from_code(code) {
            Some(Key::Up) => self.up = false,
            Some(Key::Down) => self.down = false,
            Some(Key::Left) => self.left = false,
            Some(Key::Right) => self.right = false,
            Some(Key::Shift) => self.shift = false,
            _ => {}
        }
    }

    /// Pointer press at `timestamp_ms`; a second press inside the
    /// double-tap window is flagged as a double tap
    pub fn pointer_down(&mut self, timestamp_ms: f64) {
        self.edges.tap = true;
        match self.last_tap_ms {
            Some(last) if timestamp_ms - last <= self.double_tap_window_ms => {
                self.edges.double_tap = true;
                self.last_tap_ms = None;
            }
            _ => self.last_tap_ms = Some(timestamp_ms),
        }
    }

    /// Window lost focus: held keys are released and a pause is forced
    pub fn blur(&mut self) {
        self.up = false;
        self.down = false;
        self.left = false;
        self.right = false;
        self.shift = false;
        self.edges.blur = true;
    }

    /// Normalised top-down movement axis
    pub fn move_axis(&self) -> glam::Vec2 {
        let mut axis = glam::Vec2::ZERO;
        if self.up {
            axis.y -= 1.0;
        }
        if self.down {
            axis.y += 1.0;
        }
        if self.left {
            axis.x -= 1.0;
        }
        if self.right {
            axis.x += 1.0;
        }
        axis.normalize_or_zero()
    }

    pub fn sprint_held(&self) -> bool {
        self.shift
    }

    /// Drain edges into a runner command
    pub fn take_runner(&mut self, autopilot: bool) -> TickInput {
        let edges = std::mem::take(&mut self.edges);
        TickInput {
            jump: edges.action || edges.up,
            dash: edges.dash || edges.double_tap,
            tap: edges.tap,
            pause: edges.pause,
            force_pause: edges.blur,
            start: edges.start,
            reset: edges.reset,
            autopilot,
        }
    }

    /// Drain edges into an expedition command
    pub fn take_expedition(&mut self) -> ExpeditionInput {
        let edges = std::mem::take(&mut self.edges);
        ExpeditionInput {
            movement: self.move_axis(),
            sprint: self.shift,
            pulse: edges.action,
            tap: edges.tap,
            pause: edges.pause,
            force_pause: edges.blur,
            start: edges.start || edges.reset,
            reset_to_idle: edges.idle,
        }
    }
}

impl Default for InputState {
    fn default() -> Self {
        Self::new(crate::RunnerConfig::default().double_tap_window)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_key_mapping() {
        assert_eq!(Key::from_code("Space"), Some(Key::Action));
        assert_eq!(Key::from_code("ArrowLeft"), Some(Key::Left));
        assert_eq!(Key::from_code("KeyZ"), None);
    }

    #[test]
    fn test_edges_consumed_once() {
        let mut input = InputState::default();
        input.key_down("Space", false);
        assert!(input.take_runner(false).jump);
        assert!(!input.take_runner(false).jump);
    }

    #[test]
    fn test_repeat_ignored() {
        let mut input = InputState::default();
        assert!(input.key_down("Space", true));
        assert!(!input.take_runner(false).jump);
    }

    #[test]
    fn test_double_tap_requests_dash() {
        let mut input = InputState::new(0.28);
        input.pointer_down(1000.0);
        let first = input.take_runner(false);
        assert!(first.tap && !first.dash);

        input.pointer_down(1200.0);
        let second = input.take_runner(false);
        assert!(second.tap && second.dash);

        // A third tap starts a new pair
        input.pointer_down(1300.0);
        assert!(!input.take_runner(false).dash);
    }

    #[test]
    fn test_slow_taps_do_not_dash() {
        let mut input = InputState::new(0.28);
        input.pointer_down(0.0);
        input.take_runner(false);
        input.pointer_down(500.0);
        assert!(!input.take_runner(false).dash);
    }

    #[test]
    fn test_blur_releases_keys_and_forces_pause() {
        let mut input = InputState::default();
        input.key_down("KeyD", false);
        input.key_down("ShiftLeft", false);
        input.blur();
        let cmd = input.take_expedition();
        assert!(cmd.force_pause);
        assert_eq!(cmd.movement, glam::Vec2::ZERO);
        assert!(!cmd.sprint);
    }

    #[test]
    fn test_backspace_returns_expedition_to_idle() {
        let mut input = InputState::default();
        assert!(input.key_down("Backspace", false));
        input.key_down("KeyR", false);
        let cmd = input.take_expedition();
        assert!(cmd.reset_to_idle);
        assert!(cmd.start);
        assert!(!input.take_expedition().reset_to_idle);
    }

    #[test]
    fn test_diagonal_is_normalised() {
        let mut input = InputState::default();
        input.key_down("KeyW", false);
        input.key_down("KeyD", false);
        assert!((input.move_axis().length() - 1.0).abs() < 1e-5);
        input.key_up("KeyW");
        assert_eq!(input.move_axis(), glam::Vec2::X);
    }
}
