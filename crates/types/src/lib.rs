//! Core types module - shared data structures and constants
//!
//! This module defines the fundamental types used throughout the game.
//! All types are plain data with no behavior beyond parsing and labeling,
//! making them usable in any context (simulation, terminal rendering, tooling).
//!
//! # Board Dimensions
//!
//! Default playfield dimensions:
//!
//! - **Width**: 12 columns (indexed 0-11)
//! - **Height**: 20 rows (indexed 0-19, row 0 is the surface)
//! - **Spawn position**: (5, 4), just above the dense block band
//!
//! # Tuning Defaults
//!
//! | Constant | Value | Description |
//! |----------|-------|-------------|
//! | `MIN_CONNECTED_BLOCKS` | 4 | Group size that triggers a chain reaction |
//! | `MULTI_HIT_THRESHOLD` | 5 | Hits needed to break a multi-hit block |
//! | `MULTI_HIT_OXYGEN_PENALTY` | 5 | Oxygen lost per multi-hit strike |
//! | `PICKUP_OXYGEN` | 20 | Oxygen restored by an air capsule |
//! | `MAX_OXYGEN` | 100 | Oxygen cap |
//! | `OXYGEN_DECAY_RATE` | 0.5 | Oxygen lost per clock tick |
//! | `TICK_MS` | 1000 | Oxygen clock period |
//! | `GRAVITY_DELAY_MS` | 1000 | Delay between a clear and its settling pass |
//!
//! # Examples
//!
//! ```
//! use drill_master_types::{BlockType, Direction, GameAction, BOARD_WIDTH, BOARD_HEIGHT};
//!
//! let block = BlockType::from_str("pink").unwrap();
//! assert!(block.is_regular());
//! assert!(!BlockType::Empty.matches(BlockType::Empty));
//!
//! let action = GameAction::from_str("drill").unwrap();
//! assert_eq!(action, GameAction::Move(Direction::Drill));
//!
//! assert_eq!(BOARD_WIDTH, 12);
//! assert_eq!(BOARD_HEIGHT, 20);
//! ```

use serde::{Deserialize, Serialize};

/// Board width in cells (12 columns)
pub const BOARD_WIDTH: u16 = 12;

/// Board height in cells (20 rows)
pub const BOARD_HEIGHT: u16 = 20;

/// Player spawn column
pub const SPAWN_COL: u16 = 5;

/// Player spawn row
pub const SPAWN_ROW: u16 = 4;

/// Rows above the dense band; also the depth origin.
pub const TOP_MARGIN_ROWS: u16 = 4;

/// Meters of depth per row below the margin
pub const DEPTH_SCALE: u32 = 10;

/// Depth at which the level is complete
pub const TARGET_DEPTH: u32 = 1000;

/// Lives shown on the HUD at session start
pub const STARTING_LIVES: u32 = 3;

/// Connected same-color group size that triggers a chain reaction
pub const MIN_CONNECTED_BLOCKS: usize = 4;

/// Hits required to break a multi-hit block
pub const MULTI_HIT_THRESHOLD: u8 = 5;

/// Oxygen lost per strike on a multi-hit block
pub const MULTI_HIT_OXYGEN_PENALTY: f32 = 5.0;

/// Oxygen restored by a pickup
pub const PICKUP_OXYGEN: f32 = 20.0;

/// Oxygen cap
pub const MAX_OXYGEN: f32 = 100.0;

/// Oxygen lost per clock tick (before the character multiplier)
pub const OXYGEN_DECAY_RATE: f32 = 0.5;

/// Oxygen clock period in milliseconds
pub const TICK_MS: u32 = 1000;

/// Delay between a clearing action and its settling pass
pub const GRAVITY_DELAY_MS: u32 = 1000;

/// Drill-only oxygen cost for clearing a single regular block
pub const DRILL_SINGLE_OXYGEN_COST: f32 = 1.0;

/// Drill-only oxygen cost for triggering a chain reaction
pub const DRILL_CHAIN_OXYGEN_COST: f32 = 2.0;

/// Score for clearing a single regular block
pub const SCORE_SINGLE_BLOCK: u32 = 10;

/// Score per block cleared in a chain reaction
pub const SCORE_CHAIN_PER_BLOCK: u32 = 20;

/// Score for breaking a multi-hit block
pub const SCORE_MULTI_HIT: u32 = 50;

/// Score for collecting a pickup
pub const SCORE_PICKUP: u32 = 100;

/// Frame interval of the terminal runner (~60 FPS)
pub const FRAME_MS: u32 = 16;

/// Held-key repeat interval at speed multiplier 1.0
pub const MOVE_REPEAT_MS: u32 = 120;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_tuning_matches_reference_values() {
        assert_eq!(MIN_CONNECTED_BLOCKS, 4);
        assert_eq!(MULTI_HIT_THRESHOLD, 5);
        assert_eq!(MULTI_HIT_OXYGEN_PENALTY, 5.0);
        assert_eq!(PICKUP_OXYGEN, 20.0);
        assert_eq!(MAX_OXYGEN, 100.0);
        assert_eq!(TICK_MS, 1000);
        assert_eq!(GRAVITY_DELAY_MS, 1000);
        assert_eq!(SCORE_CHAIN_PER_BLOCK * 4, 80);
    }

    #[test]
    fn block_type_matching_excludes_empty() {
        assert!(BlockType::Green.matches(BlockType::Green));
        assert!(!BlockType::Green.matches(BlockType::Blue));
        assert!(!BlockType::Empty.matches(BlockType::Empty));
        assert!(!BlockType::MultiHit.matches(BlockType::Pickup));
    }

    #[test]
    fn notification_text() {
        let n = Notification::ChainReaction {
            blocks: 4,
            points: 80,
        };
        assert_eq!(n.kind(), NotificationKind::ChainReaction);
        assert_eq!(n.title(), "Chain Reaction!");
        assert_eq!(n.description(), "4 blocks destroyed! +80 points");

        let n = Notification::Refill { oxygen: 20 };
        assert_eq!(n.description(), "+20 Oxygen");
    }

    #[test]
    fn character_lookup() {
        assert_eq!(Character::by_index(0), Some(RED_DRILLER));
        assert_eq!(Character::by_index(2), Some(GREEN_SAVER));
        assert_eq!(Character::by_index(3), None);
    }
}

/// Block types that can occupy a board cell
///
/// - **Empty**: no block; never matches anything, including other Empty cells
/// - **Green / Pink / Blue / Yellow**: regular colors, cleared in groups
/// - **MultiHit**: needs [`MULTI_HIT_THRESHOLD`] strikes, costs oxygen per strike
/// - **Pickup**: air capsule, restores oxygen
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BlockType {
    #[default]
    Empty,
    Green,
    Pink,
    Blue,
    Yellow,
    MultiHit,
    Pickup,
}

/// The interchangeable regular colors
pub const REGULAR_COLORS: [BlockType; 4] = [
    BlockType::Green,
    BlockType::Pink,
    BlockType::Blue,
    BlockType::Yellow,
];

impl BlockType {
    pub fn is_empty(self) -> bool {
        self == BlockType::Empty
    }

    pub fn is_solid(self) -> bool {
        self != BlockType::Empty
    }

    /// True for the interchangeable color blocks
    pub fn is_regular(self) -> bool {
        matches!(
            self,
            BlockType::Green | BlockType::Pink | BlockType::Blue | BlockType::Yellow
        )
    }

    /// Connectivity match: exact type equality, with Empty matching nothing.
    pub fn matches(self, other: BlockType) -> bool {
        self.is_solid() && self == other
    }

    /// Parse block type from string (case-insensitive)
    ///
    /// # Examples
    ///
    /// ```
    /// use drill_master_types::BlockType;
    ///
    /// assert_eq!(BlockType::from_str("GREEN"), Some(BlockType::Green));
    /// assert_eq!(BlockType::from_str("multi_hit"), Some(BlockType::MultiHit));
    /// assert_eq!(BlockType::from_str("lava"), None);
    /// ```
    pub fn from_str(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "empty" => Some(BlockType::Empty),
            "green" => Some(BlockType::Green),
            "pink" => Some(BlockType::Pink),
            "blue" => Some(BlockType::Blue),
            "yellow" => Some(BlockType::Yellow),
            "multi_hit" | "multihit" => Some(BlockType::MultiHit),
            "pickup" | "air" => Some(BlockType::Pickup),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            BlockType::Empty => "empty",
            BlockType::Green => "green",
            BlockType::Pink => "pink",
            BlockType::Blue => "blue",
            BlockType::Yellow => "yellow",
            BlockType::MultiHit => "multi_hit",
            BlockType::Pickup => "pickup",
        }
    }

    /// Single-character glyph used by board fixtures and debug dumps.
    pub fn glyph(&self) -> char {
        match self {
            BlockType::Empty => '.',
            BlockType::Green => 'G',
            BlockType::Pink => 'P',
            BlockType::Blue => 'B',
            BlockType::Yellow => 'Y',
            BlockType::MultiHit => 'X',
            BlockType::Pickup => 'A',
        }
    }

    pub fn from_glyph(c: char) -> Option<Self> {
        match c {
            '.' => Some(BlockType::Empty),
            'G' => Some(BlockType::Green),
            'P' => Some(BlockType::Pink),
            'B' => Some(BlockType::Blue),
            'Y' => Some(BlockType::Yellow),
            'X' => Some(BlockType::MultiHit),
            'A' => Some(BlockType::Pickup),
            _ => None,
        }
    }
}

/// Player movement directions
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Direction {
    Left,
    Right,
    /// Move down, destroying the block below if there is one
    Drill,
}

impl Direction {
    pub fn from_str(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "left" | "l" => Some(Direction::Left),
            "right" | "r" => Some(Direction::Right),
            "drill" | "down" | "d" => Some(Direction::Drill),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Direction::Left => "left",
            Direction::Right => "right",
            Direction::Drill => "drill",
        }
    }
}

/// Session lifecycle status
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum GameStatus {
    #[default]
    Playing,
    Paused,
    GameOver,
    LevelComplete,
}

impl GameStatus {
    pub fn is_playing(self) -> bool {
        self == GameStatus::Playing
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            GameStatus::Playing => "playing",
            GameStatus::Paused => "paused",
            GameStatus::GameOver => "game_over",
            GameStatus::LevelComplete => "level_complete",
        }
    }
}

/// Input-level actions produced by the input layer
///
/// Movement goes through the turn engine; the rest are session controls.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum GameAction {
    Move(Direction),
    /// Toggle pause state
    Pause,
    /// Restart with the current character
    Restart,
    /// Restart with the character at the given roster index
    SelectCharacter(u8),
}

impl GameAction {
    /// Parse action from string
    ///
    /// # Examples
    ///
    /// ```
    /// use drill_master_types::{Direction, GameAction};
    ///
    /// assert_eq!(GameAction::from_str("left"), Some(GameAction::Move(Direction::Left)));
    /// assert_eq!(GameAction::from_str("pause"), Some(GameAction::Pause));
    /// assert_eq!(GameAction::from_str("jump"), None);
    /// ```
    pub fn from_str(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "pause" => Some(GameAction::Pause),
            "restart" => Some(GameAction::Restart),
            other => Direction::from_str(other).map(GameAction::Move),
        }
    }
}

/// Static character profile
///
/// Characters only change rate parameters: oxygen consumption scales the
/// clock's decay, speed scales the held-key repeat interval.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Character {
    pub name: &'static str,
    /// Display color as RGB
    pub color: [u8; 3],
    pub oxygen_consumption: f32,
    pub speed: f32,
}

pub const RED_DRILLER: Character = Character {
    name: "Red Driller",
    color: [0xdc, 0x26, 0x26],
    oxygen_consumption: 1.0,
    speed: 1.0,
};

pub const BLUE_SPEEDSTER: Character = Character {
    name: "Blue Speedster",
    color: [0x25, 0x63, 0xeb],
    oxygen_consumption: 1.2,
    speed: 1.5,
};

pub const GREEN_SAVER: Character = Character {
    name: "Green Saver",
    color: [0x05, 0x96, 0x69],
    oxygen_consumption: 0.7,
    speed: 0.9,
};

/// Selectable characters, in menu order
pub const CHARACTERS: [Character; 3] = [RED_DRILLER, BLUE_SPEEDSTER, GREEN_SAVER];

impl Character {
    pub fn by_index(index: usize) -> Option<Character> {
        CHARACTERS.get(index).copied()
    }
}

impl Default for Character {
    fn default() -> Self {
        RED_DRILLER
    }
}

/// Notification categories consumed by the presentation layer
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum NotificationKind {
    Refill,
    ChainReaction,
    GameOver,
    LevelComplete,
}

/// Transient message emitted by the engine for toasts
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Notification {
    Refill { oxygen: u32 },
    ChainReaction { blocks: u32, points: u32 },
    GameOver { score: u32, depth: u32 },
    LevelComplete { depth: u32 },
}

impl Notification {
    pub fn kind(&self) -> NotificationKind {
        match self {
            Notification::Refill { .. } => NotificationKind::Refill,
            Notification::ChainReaction { .. } => NotificationKind::ChainReaction,
            Notification::GameOver { .. } => NotificationKind::GameOver,
            Notification::LevelComplete { .. } => NotificationKind::LevelComplete,
        }
    }

    pub fn title(&self) -> &'static str {
        match self {
            Notification::Refill { .. } => "Air Refill!",
            Notification::ChainReaction { .. } => "Chain Reaction!",
            Notification::GameOver { .. } => "Game Over!",
            Notification::LevelComplete { .. } => "Level Complete!",
        }
    }

    pub fn description(&self) -> String {
        match self {
            Notification::Refill { oxygen } => format!("+{} Oxygen", oxygen),
            Notification::ChainReaction { blocks, points } => {
                format!("{} blocks destroyed! +{} points", blocks, points)
            }
            Notification::GameOver { .. } => "You ran out of oxygen!".to_string(),
            Notification::LevelComplete { depth } => format!("Reached {}m", depth),
        }
    }
}
