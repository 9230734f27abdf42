//! Game clock - fixed-interval oxygen decay
//!
//! Time only accumulates while the session is Playing. A partially elapsed
//! interval is kept across a pause, so pausing never grants or steals a tick.

use arrayvec::ArrayVec;

use crate::game_state::GameState;
use crate::types::{GameStatus, Notification};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GameClock {
    tick_ms: u32,
    elapsed_ms: u32,
}

impl GameClock {
    pub fn new(tick_ms: u32) -> Self {
        Self {
            tick_ms: tick_ms.max(1),
            elapsed_ms: 0,
        }
    }

    pub fn tick_ms(&self) -> u32 {
        self.tick_ms
    }

    /// Milliseconds of Playing time left until the next tick fires
    pub fn until_next_tick(&self) -> u32 {
        self.tick_ms - self.elapsed_ms
    }

    pub fn reset(&mut self) {
        self.elapsed_ms = 0;
    }

    /// Advance by `elapsed_ms`, firing every tick that falls due.
    ///
    /// Returns the notifications raised (at most one Game Over).
    pub fn advance(&mut self, state: &mut GameState, elapsed_ms: u32) -> ArrayVec<Notification, 1> {
        let mut out = ArrayVec::new();
        let mut remaining = elapsed_ms;
        while remaining > 0 && state.is_playing() {
            let step = remaining.min(self.until_next_tick());
            self.elapsed_ms += step;
            remaining -= step;
            if self.elapsed_ms >= self.tick_ms {
                self.elapsed_ms = 0;
                if let Some(n) = Self::tick(state) {
                    out.push(n);
                }
            }
        }
        out
    }

    /// One decay step. No-op unless Playing.
    ///
    /// Oxygen drops by the decay rate scaled by the character's consumption;
    /// at zero the session ends.
    pub fn tick(state: &mut GameState) -> Option<Notification> {
        if !state.is_playing() {
            return None;
        }

        let decay = state.config.oxygen_decay_rate * state.player.character.oxygen_consumption;
        state.spend_oxygen(decay);

        if state.hud.oxygen <= 0.0 {
            state.status = GameStatus::GameOver;
            tracing::info!(
                score = state.hud.score,
                depth = state.hud.depth,
                "out of oxygen"
            );
            return Some(Notification::GameOver {
                score: state.hud.score,
                depth: state.hud.depth,
            });
        }
        None
    }
}
