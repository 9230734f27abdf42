//! Game state module - the single unit of truth for one session
//!
//! This module ties together the grid, the player, the HUD counters and the
//! lifecycle status. Action resolution lives in [`crate::turn`] and oxygen
//! decay in [`crate::clock`]; both mutate a `GameState` through `&mut self`,
//! so a caller holding the state can never observe a half-applied turn.

use serde::Serialize;

use crate::config::{ConfigError, GameConfig};
use crate::generator::{BoardGenerator, DistributionPolicy};
use crate::grid::{Grid, Pos};
use crate::snapshot::GameSnapshot;
use crate::types::{Character, GameStatus};

/// The player's position and profile
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Player {
    pub col: u16,
    pub row: u16,
    pub character: Character,
}

impl Player {
    pub fn pos(&self) -> Pos {
        Pos::new(self.col, self.row)
    }
}

/// HUD counters
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Hud {
    /// Always within `[0, max_oxygen]`
    pub oxygen: f32,
    pub max_oxygen: f32,
    /// Never decreases
    pub score: u32,
    /// Deepest depth reached; never decreases
    pub depth: u32,
    pub level: u32,
    pub lives: u32,
}

/// Complete game state
#[derive(Debug, Clone)]
pub struct GameState {
    pub(crate) grid: Grid,
    pub(crate) player: Player,
    pub(crate) hud: Hud,
    pub(crate) status: GameStatus,
    pub(crate) config: GameConfig,
    seed: u32,
}

impl GameState {
    /// Create a new session with a generated board
    pub fn new(config: GameConfig, character: Character, seed: u32) -> Result<Self, ConfigError> {
        let generator = BoardGenerator::default();
        Self::with_generator(config, character, seed, &generator)
    }

    /// Create a new session with a board from a custom generator
    ///
    /// The generator's multi-hit threshold is replaced by the config's.
    pub fn with_generator<P: DistributionPolicy + Clone>(
        config: GameConfig,
        character: Character,
        seed: u32,
        generator: &BoardGenerator<P>,
    ) -> Result<Self, ConfigError> {
        config.validate()?;
        let grid = generator
            .clone()
            .with_hit_threshold(config.multi_hit_threshold)
            .generate(config.board_width, config.board_height, seed);
        let spawn = Pos::new(config.spawn_col, config.spawn_row);
        Ok(Self::assemble(config, character, grid, spawn, seed))
    }

    /// Create a session on a prepared board
    ///
    /// The config's board size is taken from `grid`. If `spawn` holds a block it
    /// is cleared, then the player falls to the first solid cell below.
    pub fn with_grid(
        config: GameConfig,
        character: Character,
        grid: Grid,
        spawn: Pos,
    ) -> Result<Self, ConfigError> {
        let config = GameConfig {
            board_width: grid.width(),
            board_height: grid.height(),
            spawn_col: spawn.col,
            spawn_row: spawn.row,
            ..config
        };
        config.validate()?;
        Ok(Self::assemble(config, character, grid, spawn, 0))
    }

    fn assemble(
        config: GameConfig,
        character: Character,
        mut grid: Grid,
        spawn: Pos,
        seed: u32,
    ) -> Self {
        if grid.is_solid_at(spawn) {
            grid.clear(spawn);
        }

        let hud = Hud {
            oxygen: config.max_oxygen,
            max_oxygen: config.max_oxygen,
            score: 0,
            depth: 0,
            level: 1,
            lives: config.lives,
        };

        let mut state = Self {
            grid,
            player: Player {
                col: spawn.col,
                row: spawn.row,
                character,
            },
            hud,
            status: GameStatus::Playing,
            config,
            seed,
        };
        state.free_fall();
        state.hud.depth = state.depth_at_player();

        tracing::info!(
            character = character.name,
            seed,
            width = state.grid.width(),
            height = state.grid.height(),
            "session started"
        );
        state
    }

    pub fn grid(&self) -> &Grid {
        &self.grid
    }

    pub fn player(&self) -> &Player {
        &self.player
    }

    pub fn character(&self) -> Character {
        self.player.character
    }

    pub fn hud(&self) -> &Hud {
        &self.hud
    }

    pub fn status(&self) -> GameStatus {
        self.status
    }

    pub fn is_playing(&self) -> bool {
        self.status.is_playing()
    }

    pub fn target_depth(&self) -> u32 {
        self.config.target_depth
    }

    pub fn config(&self) -> &GameConfig {
        &self.config
    }

    pub fn seed(&self) -> u32 {
        self.seed
    }

    pub fn score(&self) -> u32 {
        self.hud.score
    }

    pub fn oxygen(&self) -> f32 {
        self.hud.oxygen
    }

    pub fn depth(&self) -> u32 {
        self.hud.depth
    }

    /// Set oxygen directly, clamped to `[0, max_oxygen]`.
    ///
    /// Intended for scenario setup; gameplay changes oxygen through turns and
    /// clock ticks.
    pub fn set_oxygen(&mut self, oxygen: f32) {
        self.hud.oxygen = oxygen.clamp(0.0, self.hud.max_oxygen);
    }

    /// Playing -> Paused. Returns false from any other status.
    pub fn pause(&mut self) -> bool {
        if self.status != GameStatus::Playing {
            return false;
        }
        self.status = GameStatus::Paused;
        true
    }

    /// Paused -> Playing. Returns false from any other status.
    pub fn resume(&mut self) -> bool {
        if self.status != GameStatus::Paused {
            return false;
        }
        self.status = GameStatus::Playing;
        true
    }

    pub fn snapshot(&self) -> GameSnapshot {
        GameSnapshot::capture(self)
    }

    /// Drop the player while the cell below is Empty; returns rows fallen.
    pub(crate) fn free_fall(&mut self) -> u16 {
        let mut fallen = 0;
        while let Some(below) = self.grid.below(self.player.pos()) {
            if !self.grid.is_empty_at(below) {
                break;
            }
            self.player.row = below.row;
            fallen += 1;
        }
        fallen
    }

    /// Depth value for the player's current row
    pub(crate) fn depth_at_player(&self) -> u32 {
        self.player.row.saturating_sub(self.config.top_margin_rows) as u32
            * self.config.depth_scale
    }

    pub(crate) fn spend_oxygen(&mut self, amount: f32) {
        self.hud.oxygen = (self.hud.oxygen - amount).max(0.0);
    }

    pub(crate) fn add_oxygen(&mut self, amount: f32) {
        self.hud.oxygen = (self.hud.oxygen + amount).min(self.hud.max_oxygen);
    }

    pub(crate) fn add_score(&mut self, points: u32) {
        self.hud.score = self.hud.score.saturating_add(points);
    }
}
