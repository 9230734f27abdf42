//! Terminal input module (engine-facing).
//!
//! Maps `crossterm` key events into [`crate::types::GameAction`] and throttles
//! held-key repeats per the character's speed. Independent of any UI
//! framework.

pub mod handler;
pub mod map;

pub use drill_master_types as types;

pub use handler::InputHandler;
pub use map::{handle_key_event, should_quit};
