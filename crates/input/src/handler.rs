//! Held-key repeat limiter for terminal environments.
//!
//! Terminals report a held key as a stream of repeated presses at the OS
//! repeat rate. The handler lets the first press through immediately and
//! throttles further moves in the same direction to one per repeat interval.
//! The interval is the base interval divided by the character's speed
//! multiplier, so faster characters move more often while a key is held.
//!
//! Time is passed in by the caller (milliseconds on any monotonic clock).

use crossterm::event::{KeyEvent, KeyEventKind};

use crate::map::handle_key_event;
use crate::types::{Direction, GameAction, MOVE_REPEAT_MS};

#[derive(Debug, Clone)]
pub struct InputHandler {
    base_repeat_ms: u32,
    repeat_ms: u32,
    held: Option<Direction>,
    last_move_ms: u64,
}

impl Default for InputHandler {
    fn default() -> Self {
        Self::new()
    }
}

impl InputHandler {
    pub fn new() -> Self {
        Self::with_repeat_ms(MOVE_REPEAT_MS)
    }

    pub fn with_repeat_ms(repeat_ms: u32) -> Self {
        Self {
            base_repeat_ms: repeat_ms,
            repeat_ms,
            held: None,
            last_move_ms: 0,
        }
    }

    /// Scale the repeat interval by a speed multiplier (> 1 is faster).
    pub fn with_speed(mut self, speed: f32) -> Self {
        self.set_speed(speed);
        self
    }

    pub fn set_speed(&mut self, speed: f32) {
        let speed = if speed.is_finite() && speed > 0.0 {
            speed
        } else {
            1.0
        };
        self.repeat_ms = (self.base_repeat_ms as f32 / speed).round() as u32;
    }

    pub fn repeat_ms(&self) -> u32 {
        self.repeat_ms
    }

    /// Translate a key event at `now_ms` into an action, if any.
    ///
    /// Releases clear the held direction and never produce an action.
    pub fn handle_key_event(&mut self, key: KeyEvent, now_ms: u64) -> Option<GameAction> {
        if key.kind == KeyEventKind::Release {
            if let Some(GameAction::Move(direction)) = handle_key_event(key) {
                self.release(direction);
            }
            return None;
        }

        match handle_key_event(key)? {
            GameAction::Move(direction) => {
                let repeating = self.held == Some(direction)
                    && now_ms.saturating_sub(self.last_move_ms) < self.repeat_ms as u64;
                if repeating {
                    return None;
                }
                self.held = Some(direction);
                self.last_move_ms = now_ms;
                Some(GameAction::Move(direction))
            }
            other => {
                self.held = None;
                Some(other)
            }
        }
    }

    pub fn release(&mut self, direction: Direction) {
        if self.held == Some(direction) {
            self.held = None;
        }
    }

    pub fn reset(&mut self) {
        self.held = None;
        self.last_move_ms = 0;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crossterm::event::{KeyCode, KeyModifiers};

    fn press(code: KeyCode) -> KeyEvent {
        KeyEvent::from(code)
    }

    #[test]
    fn first_press_passes_and_repeats_are_throttled() {
        let mut h = InputHandler::with_repeat_ms(100);
        let left = Some(GameAction::Move(Direction::Left));
        assert_eq!(h.handle_key_event(press(KeyCode::Left), 1000), left);
        assert_eq!(h.handle_key_event(press(KeyCode::Left), 1030), None);
        assert_eq!(h.handle_key_event(press(KeyCode::Left), 1099), None);
        assert_eq!(h.handle_key_event(press(KeyCode::Left), 1100), left);
    }

    #[test]
    fn direction_change_is_immediate() {
        let mut h = InputHandler::with_repeat_ms(100);
        h.handle_key_event(press(KeyCode::Left), 0);
        assert_eq!(
            h.handle_key_event(press(KeyCode::Right), 10),
            Some(GameAction::Move(Direction::Right))
        );
    }

    #[test]
    fn release_allows_immediate_press() {
        let mut h = InputHandler::with_repeat_ms(100);
        h.handle_key_event(press(KeyCode::Down), 0);
        let release = KeyEvent::new_with_kind(KeyCode::Down, KeyModifiers::NONE, KeyEventKind::Release);
        assert_eq!(h.handle_key_event(release, 10), None);
        assert_eq!(
            h.handle_key_event(press(KeyCode::Down), 20),
            Some(GameAction::Move(Direction::Drill))
        );
    }

    #[test]
    fn speed_scales_interval() {
        assert_eq!(InputHandler::with_repeat_ms(120).with_speed(1.5).repeat_ms(), 80);
        assert_eq!(InputHandler::with_repeat_ms(120).with_speed(0.0).repeat_ms(), 120);
    }

    #[test]
    fn session_keys_pass_through() {
        let mut h = InputHandler::new();
        assert_eq!(
            h.handle_key_event(press(KeyCode::Char('p')), 0),
            Some(GameAction::Pause)
        );
        assert_eq!(
            h.handle_key_event(press(KeyCode::Char('p')), 1),
            Some(GameAction::Pause)
        );
    }
}
