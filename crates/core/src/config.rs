//! Game configuration - every tunable the simulation reads
//!
//! Defaults come from the constants table in `drill_master_types`.
//! [`GameConfig::from_env`] overrides a subset from `DRILL_*` environment
//! variables; unparsable values fall back to the default silently.

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::types::*;

#[derive(Debug, Clone, PartialEq, Error)]
pub enum ConfigError {
    #[error("board must be at least 1x2, got {width}x{height}")]
    BoardTooSmall { width: u16, height: u16 },
    #[error("spawn ({col}, {row}) is outside a {width}x{height} board")]
    SpawnOutOfBounds {
        col: u16,
        row: u16,
        width: u16,
        height: u16,
    },
    #[error("multi-hit threshold must be at least 1")]
    ZeroHitThreshold,
    #[error("chain reactions need a minimum group of at least 2, got {0}")]
    ChainTooSmall(usize),
    #[error("{0} must be greater than zero")]
    ZeroInterval(&'static str),
    #[error("{name} must be a finite non-negative number, got {value}")]
    InvalidAmount { name: &'static str, value: f32 },
}

/// Simulation parameters
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GameConfig {
    pub board_width: u16,
    pub board_height: u16,
    pub spawn_col: u16,
    pub spawn_row: u16,

    pub min_connected_blocks: usize,
    pub multi_hit_threshold: u8,
    pub multi_hit_oxygen_penalty: f32,
    pub pickup_oxygen: f32,
    pub max_oxygen: f32,
    /// Oxygen lost per tick before the character multiplier
    pub oxygen_decay_rate: f32,
    pub drill_single_oxygen_cost: f32,
    pub drill_chain_oxygen_cost: f32,

    pub score_single_block: u32,
    pub score_chain_per_block: u32,
    pub score_multi_hit: u32,
    pub score_pickup: u32,

    pub top_margin_rows: u16,
    pub depth_scale: u32,
    pub target_depth: u32,
    pub lives: u32,

    pub tick_ms: u32,
    pub gravity_delay_ms: u32,
}

impl Default for GameConfig {
    fn default() -> Self {
        Self {
            board_width: BOARD_WIDTH,
            board_height: BOARD_HEIGHT,
            spawn_col: SPAWN_COL,
            spawn_row: SPAWN_ROW,
            min_connected_blocks: MIN_CONNECTED_BLOCKS,
            multi_hit_threshold: MULTI_HIT_THRESHOLD,
            multi_hit_oxygen_penalty: MULTI_HIT_OXYGEN_PENALTY,
            pickup_oxygen: PICKUP_OXYGEN,
            max_oxygen: MAX_OXYGEN,
            oxygen_decay_rate: OXYGEN_DECAY_RATE,
            drill_single_oxygen_cost: DRILL_SINGLE_OXYGEN_COST,
            drill_chain_oxygen_cost: DRILL_CHAIN_OXYGEN_COST,
            score_single_block: SCORE_SINGLE_BLOCK,
            score_chain_per_block: SCORE_CHAIN_PER_BLOCK,
            score_multi_hit: SCORE_MULTI_HIT,
            score_pickup: SCORE_PICKUP,
            top_margin_rows: TOP_MARGIN_ROWS,
            depth_scale: DEPTH_SCALE,
            target_depth: TARGET_DEPTH,
            lives: STARTING_LIVES,
            tick_ms: TICK_MS,
            gravity_delay_ms: GRAVITY_DELAY_MS,
        }
    }
}

impl GameConfig {
    /// Load defaults, then apply environment overrides:
    ///
    /// - `DRILL_BOARD_WIDTH`, `DRILL_BOARD_HEIGHT`
    /// - `DRILL_MIN_CHAIN`
    /// - `DRILL_OXYGEN_DECAY`, `DRILL_MAX_OXYGEN`
    /// - `DRILL_TICK_MS`, `DRILL_GRAVITY_DELAY_MS`
    /// - `DRILL_TARGET_DEPTH`
    pub fn from_env() -> Self {
        fn parsed<T: std::str::FromStr>(key: &str) -> Option<T> {
            std::env::var(key).ok().and_then(|s| s.trim().parse().ok())
        }

        let defaults = Self::default();
        Self {
            board_width: parsed("DRILL_BOARD_WIDTH").unwrap_or(defaults.board_width),
            board_height: parsed("DRILL_BOARD_HEIGHT").unwrap_or(defaults.board_height),
            min_connected_blocks: parsed("DRILL_MIN_CHAIN")
                .unwrap_or(defaults.min_connected_blocks),
            oxygen_decay_rate: parsed("DRILL_OXYGEN_DECAY").unwrap_or(defaults.oxygen_decay_rate),
            max_oxygen: parsed("DRILL_MAX_OXYGEN").unwrap_or(defaults.max_oxygen),
            tick_ms: parsed("DRILL_TICK_MS").unwrap_or(defaults.tick_ms),
            gravity_delay_ms: parsed("DRILL_GRAVITY_DELAY_MS")
                .unwrap_or(defaults.gravity_delay_ms),
            target_depth: parsed("DRILL_TARGET_DEPTH").unwrap_or(defaults.target_depth),
            ..defaults
        }
    }

    /// Override the board size; the spawn is clamped onto the new board.
    pub fn with_board(mut self, width: u16, height: u16) -> Self {
        self.board_width = width;
        self.board_height = height;
        self.spawn_col = self.spawn_col.min(width.saturating_sub(1));
        self.spawn_row = self.spawn_row.min(height.saturating_sub(1));
        self
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.board_width < 1 || self.board_height < 2 {
            return Err(ConfigError::BoardTooSmall {
                width: self.board_width,
                height: self.board_height,
            });
        }
        if self.spawn_col >= self.board_width || self.spawn_row >= self.board_height {
            return Err(ConfigError::SpawnOutOfBounds {
                col: self.spawn_col,
                row: self.spawn_row,
                width: self.board_width,
                height: self.board_height,
            });
        }
        if self.multi_hit_threshold == 0 {
            return Err(ConfigError::ZeroHitThreshold);
        }
        if self.min_connected_blocks < 2 {
            return Err(ConfigError::ChainTooSmall(self.min_connected_blocks));
        }
        if self.tick_ms == 0 {
            return Err(ConfigError::ZeroInterval("tick_ms"));
        }
        if self.gravity_delay_ms == 0 {
            return Err(ConfigError::ZeroInterval("gravity_delay_ms"));
        }

        let amounts = [
            ("max_oxygen", self.max_oxygen),
            ("oxygen_decay_rate", self.oxygen_decay_rate),
            ("multi_hit_oxygen_penalty", self.multi_hit_oxygen_penalty),
            ("pickup_oxygen", self.pickup_oxygen),
            ("drill_single_oxygen_cost", self.drill_single_oxygen_cost),
            ("drill_chain_oxygen_cost", self.drill_chain_oxygen_cost),
        ];
        for (name, value) in amounts {
            if !value.is_finite() || value < 0.0 {
                return Err(ConfigError::InvalidAmount { name, value });
            }
        }
        Ok(())
    }
}
