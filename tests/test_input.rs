use crossterm::event::KeyCode;

use space_shooter::input::*;

#[test]
fn keys_map_to_actions() {
    assert_eq!(action_for_key(&KeyCode::Char(' ')), Some(Action::Fire));
    assert_eq!(action_for_key(&KeyCode::Left), Some(Action::Left));
    assert_eq!(action_for_key(&KeyCode::Right), Some(Action::Right));
    assert_eq!(action_for_key(&KeyCode::Up), Some(Action::Up));
    assert_eq!(action_for_key(&KeyCode::Down), Some(Action::Down));
    assert_eq!(action_for_key(&KeyCode::Char('p')), Some(Action::Pause));
}

#[test]
fn wasd_is_case_insensitive() {
    for (lower, upper, action) in [
        ('a', 'A', Action::Left),
        ('d', 'D', Action::Right),
        ('w', 'W', Action::Up),
        ('s', 'S', Action::Down),
    ] {
        assert_eq!(action_for_key(&KeyCode::Char(lower)), Some(action));
        assert_eq!(action_for_key(&KeyCode::Char(upper)), Some(action));
    }
}

#[test]
fn unbound_keys_are_ignored() {
    assert_eq!(action_for_key(&KeyCode::Char('x')), None);
    assert_eq!(action_for_key(&KeyCode::Enter), None);
    assert_eq!(action_for_key(&KeyCode::Tab), None);
}

#[test]
fn input_state_set_and_release() {
    let mut input = InputState::default();
    assert!(!input.is_moving());

    input.set(Action::Fire, true);
    assert!(input.fire);
    assert!(!input.is_moving());

    input.set(Action::Left, true);
    assert!(input.is_moving());
    input.set(Action::Left, false);
    assert!(!input.left);

    // Pause never lands in the held state
    input.set(Action::Pause, true);
    assert_eq!(input, InputState { fire: true, ..InputState::default() });
}

#[test]
fn tracker_holds_within_window() {
    let mut keys = KeyTracker::new();
    keys.press(Action::Right, 10);
    assert!(keys.is_held(Action::Right, 10));
    assert!(keys.is_held(Action::Right, 10 + HOLD_WINDOW));
    assert!(!keys.is_held(Action::Right, 11 + HOLD_WINDOW));
}

#[test]
fn tracker_repeat_refreshes_hold() {
    let mut keys = KeyTracker::new();
    keys.press(Action::Fire, 0);
    keys.press(Action::Fire, 6);
    assert!(keys.is_held(Action::Fire, 6 + HOLD_WINDOW));
}

#[test]
fn tracker_release_drops_immediately() {
    let mut keys = KeyTracker::new();
    keys.press(Action::Up, 3);
    keys.release(Action::Up);
    assert!(!keys.is_held(Action::Up, 3));
}

#[test]
fn snapshot_combines_fire_and_direction() {
    let mut keys = KeyTracker::new();
    keys.press(Action::Fire, 5);
    keys.press(Action::Left, 5);
    keys.press(Action::Pause, 5);

    let state = keys.snapshot(6);
    assert!(state.fire);
    assert!(state.left);
    assert!(!state.right && !state.up && !state.down);

    keys.clear();
    assert_eq!(keys.snapshot(6), InputState::default());
}
