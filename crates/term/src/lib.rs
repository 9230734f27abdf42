//! Terminal front end.
//!
//! A small game-oriented rendering layer: [`GameView`] draws a snapshot into a
//! [`FrameBuffer`], and [`TerminalRenderer`] flushes framebuffers to the
//! terminal through crossterm, rewriting only what changed.

pub mod fb;
pub mod game_view;
pub mod renderer;

pub use drill_master_core as core;
pub use drill_master_types as types;

pub use fb::{FrameBuffer, Glyph, Rgb, Style};
pub use game_view::{required_size, GameView};
pub use renderer::{encode_diff, encode_full, TerminalRenderer};
