//! Core game logic - pure, deterministic, and testable
//!
//! All digging rules live here: the board, flood fills, gravity, board
//! generation, action resolution and oxygen decay. Nothing in this crate
//! touches a terminal, a socket or a timer; callers feed it actions and
//! elapsed time and read back snapshots.
//!
//! # Module Structure
//!
//! - [`grid`]: rectangular board of cells with stable cell identities
//! - [`connectivity`]: same-type flood fill and support analysis
//! - [`gravity`]: settle floating blocks until stable
//! - [`generator`]: seeded, policy-driven initial boards
//! - [`game_state`]: player, HUD counters and lifecycle status
//! - [`turn`]: destroy and move resolution
//! - [`clock`]: fixed-interval oxygen decay
//! - [`snapshot`]: serializable read-only view
//! - [`config`]: tunables and validation
//! - [`rng`]: small deterministic LCG
//!
//! # Example
//!
//! ```
//! use drill_master_core::{GameConfig, GameState};
//! use drill_master_types::{Direction, RED_DRILLER};
//!
//! let mut game = GameState::new(GameConfig::default(), RED_DRILLER, 12345).unwrap();
//! let outcome = game.apply_move(Direction::Drill);
//! if outcome.schedule_gravity {
//!     game.apply_settle();
//! }
//! assert!(outcome.applied);
//! ```

pub mod clock;
pub mod config;
pub mod connectivity;
pub mod game_state;
pub mod generator;
pub mod gravity;
pub mod grid;
pub mod rng;
pub mod snapshot;
pub mod turn;

pub use drill_master_types as types;

pub use clock::GameClock;
pub use config::{ConfigError, GameConfig};
pub use connectivity::{compute_supported, find_connected, CellSet};
pub use game_state::{GameState, Hud, Player};
pub use generator::{BandedPolicy, BoardGenerator, DistributionPolicy};
pub use gravity::{is_settled, settle, SettleReport};
pub use grid::{Cell, CellId, Grid, GridError, Pos};
pub use rng::SimpleRng;
pub use snapshot::GameSnapshot;
pub use turn::TurnOutcome;
