//! Keyboard state.
//!
//! Key events are translated to `Action`s and folded into a boolean
//! `InputState` that the frame driver reads once per frame.

use std::collections::HashMap;

use crossterm::event::KeyCode;

/// A key is considered "held" if its last press/repeat event arrived within
/// this many frames.  Covers terminals that don't emit key-release events:
/// the OS key-repeat rate is ≥ 15 Hz, so a window of 8 frames (≈133 ms at
/// 60 FPS) is always refreshed before expiry.
pub const HOLD_WINDOW: u64 = 8;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Action {
    Fire,
    Left,
    Right,
    Up,
    Down,
    Pause,
}

/// Map a terminal key to the action it drives, if any.
pub fn action_for_key(code: &KeyCode) -> Option<Action> {
    match code {
        KeyCode::Char(' ') => Some(Action::Fire),
        KeyCode::Left | KeyCode::Char('a') | KeyCode::Char('A') => Some(Action::Left),
        KeyCode::Right | KeyCode::Char('d') | KeyCode::Char('D') => Some(Action::Right),
        KeyCode::Up | KeyCode::Char('w') | KeyCode::Char('W') => Some(Action::Up),
        KeyCode::Down | KeyCode::Char('s') | KeyCode::Char('S') => Some(Action::Down),
        KeyCode::Char('p') | KeyCode::Char('P') => Some(Action::Pause),
        _ => None,
    }
}

/// Which controls are held this frame.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct InputState {
    pub fire: bool,
    pub left: bool,
    pub right: bool,
    pub up: bool,
    pub down: bool,
}

impl InputState {
    pub fn set(&mut self, action: Action, pressed: bool) {
        match action {
            Action::Fire => self.fire = pressed,
            Action::Left => self.left = pressed,
            Action::Right => self.right = pressed,
            Action::Up => self.up = pressed,
            Action::Down => self.down = pressed,
            // Pause is a toggle, handled on key-down by the caller
            Action::Pause => {}
        }
    }

    pub fn is_moving(&self) -> bool {
        self.left || self.right || self.up || self.down
    }
}

/// Records the frame each action was last pressed or repeated.
///
/// Works on two classes of terminal:
/// * **Keyboard-enhancement capable** (kitty protocol): proper `Release`
///   events remove the action immediately.
/// * **Classic terminals**: only `Press` events; an action expires after
///   `HOLD_WINDOW` frames of silence.
#[derive(Clone, Debug, Default)]
pub struct KeyTracker {
    last_seen: HashMap<Action, u64>,
}

impl KeyTracker {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn press(&mut self, action: Action, frame: u64) {
        self.last_seen.insert(action, frame);
    }

    pub fn release(&mut self, action: Action) {
        self.last_seen.remove(&action);
    }

    pub fn is_held(&self, action: Action, frame: u64) -> bool {
        self.last_seen
            .get(&action)
            .map(|&last| frame.saturating_sub(last) <= HOLD_WINDOW)
            .unwrap_or(false)
    }

    /// Fold the held actions into an `InputState` for `frame`.
    pub fn snapshot(&self, frame: u64) -> InputState {
        let mut state = InputState::default();
        for action in [Action::Fire, Action::Left, Action::Right, Action::Up, Action::Down] {
            state.set(action, self.is_held(action, frame));
        }
        state
    }

    pub fn clear(&mut self) {
        self.last_seen.clear();
    }
}
