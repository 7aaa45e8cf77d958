//! Keyboard binding: raw crossterm events in, held movement flags and
//! discrete actions out.
//!
//! Two classes of terminal are supported:
//! * **Keyboard-enhancement capable** (kitty protocol, Ghostty, …): proper
//!   `Press` / `Repeat` / `Release` events, so a direction is held exactly
//!   from press to release.
//! * **Classic terminals**: only `Press` events, with OS key-repeat showing
//!   up as repeated presses.  A direction stays held while its last press is
//!   at most `HOLD_WINDOW_TICKS` old, which is shorter than the repeat
//!   interval, so it stays live for as long as the key keeps repeating.

use std::collections::HashMap;

use crossterm::event::{Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers};

use crate::compute::{fire, restart, set_movement, toggle_pause};
use crate::entities::WorldState;

/// A direction counts as held if it was seen within this many ticks
/// (≈133 ms at 60 Hz).
pub const HOLD_WINDOW_TICKS: u64 = 8;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Direction {
    Left,
    Right,
}

/// Edge-triggered actions produced by a key press.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum InputAction {
    Fire,
    TogglePause,
    Restart,
    Quit,
}

fn direction_for(code: &KeyCode) -> Option<Direction> {
    match code {
        KeyCode::Left | KeyCode::Char('a') | KeyCode::Char('A') => Some(Direction::Left),
        KeyCode::Right | KeyCode::Char('d') | KeyCode::Char('D') => Some(Direction::Right),
        _ => None,
    }
}

fn action_for(key: &KeyEvent) -> Option<InputAction> {
    match key.code {
        KeyCode::Char(' ') => Some(InputAction::Fire),
        KeyCode::Esc | KeyCode::Char('p') | KeyCode::Char('P') => Some(InputAction::TogglePause),
        KeyCode::Enter | KeyCode::Char('r') | KeyCode::Char('R') => Some(InputAction::Restart),
        KeyCode::Char('q') | KeyCode::Char('Q') => Some(InputAction::Quit),
        KeyCode::Char('c') if key.modifiers.contains(KeyModifiers::CONTROL) => {
            Some(InputAction::Quit)
        }
        _ => None,
    }
}

#[derive(Debug, Default)]
pub struct InputBinding {
    /// Tick at which each direction was last pressed or repeated.
    last_seen: HashMap<Direction, u64>,
    /// Whether the terminal reports key releases.
    release_events: bool,
}

impl InputBinding {
    pub fn new(release_events: bool) -> Self {
        InputBinding {
            last_seen: HashMap::new(),
            release_events,
        }
    }

    /// Feed one terminal event observed at driver tick `now`.  Returns the
    /// discrete action it triggers, if any.
    pub fn handle(&mut self, event: &Event, now: u64) -> Option<InputAction> {
        let Event::Key(key) = event else {
            return None;
        };

        if let Some(direction) = direction_for(&key.code) {
            match key.kind {
                KeyEventKind::Press | KeyEventKind::Repeat => {
                    self.last_seen.insert(direction, now);
                }
                KeyEventKind::Release => {
                    self.last_seen.remove(&direction);
                }
            }
            return None;
        }

        // Actions fire on the press edge only, one per physical press.
        if key.kind != KeyEventKind::Press {
            return None;
        }
        action_for(key)
    }

    pub fn is_held(&self, direction: Direction, now: u64) -> bool {
        match self.last_seen.get(&direction) {
            Some(_) if self.release_events => true,
            Some(&last) => now.saturating_sub(last) <= HOLD_WINDOW_TICKS,
            None => false,
        }
    }

    /// Copy the current held flags into the world.
    pub fn sync_movement(&self, state: &mut WorldState, now: u64) {
        set_movement(
            state,
            self.is_held(Direction::Left, now),
            self.is_held(Direction::Right, now),
        );
    }
}

/// Apply a discrete action to the world.  Returns whether the world changed.
/// `Quit` is the loop driver's business and never touches the world.
pub fn apply_action(state: &mut WorldState, action: InputAction) -> bool {
    match action {
        InputAction::Fire => {
            let before = state.total_shots_fired;
            fire(state);
            state.total_shots_fired != before
        }
        InputAction::TogglePause => {
            toggle_pause(state);
            true
        }
        InputAction::Restart => restart(state),
        InputAction::Quit => false,
    }
}
