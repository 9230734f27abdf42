//! Snapshot module - read-only, serializable view of a session
//!
//! Renderers and remote observers consume snapshots instead of borrowing the
//! live state. `episode_id` and `pending_settles` are owned by the session
//! driver and stay zero when captured straight from a [`GameState`].

use serde::Serialize;

use crate::game_state::{GameState, Hud, Player};
use crate::grid::Grid;
use crate::types::GameStatus;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct GameSnapshot {
    pub grid: Grid,
    pub player: Player,
    pub hud: Hud,
    pub status: GameStatus,
    pub target_depth: u32,
    pub seed: u32,
    /// Incremented on every restart
    pub episode_id: u32,
    /// Deferred settles not yet applied
    pub pending_settles: usize,
}

impl GameSnapshot {
    pub fn capture(state: &GameState) -> Self {
        Self {
            grid: state.grid.clone(),
            player: state.player,
            hud: state.hud,
            status: state.status,
            target_depth: state.config.target_depth,
            seed: state.seed(),
            episode_id: 0,
            pending_settles: 0,
        }
    }

    /// Board rows as glyph strings, top to bottom
    pub fn rows(&self) -> Vec<String> {
        self.grid.to_rows()
    }

    /// Oxygen as a whole percentage of the maximum
    pub fn oxygen_percent(&self) -> u32 {
        if self.hud.max_oxygen <= 0.0 {
            return 0;
        }
        ((self.hud.oxygen / self.hud.max_oxygen) * 100.0).round() as u32
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::GameConfig;
    use crate::types::RED_DRILLER;

    #[test]
    fn capture_copies_visible_state() {
        let mut state = GameState::new(GameConfig::default(), RED_DRILLER, 99).unwrap();
        state.set_oxygen(42.0);
        let snap = state.snapshot();
        assert_eq!(snap.player, *state.player());
        assert_eq!(snap.hud.oxygen, 42.0);
        assert_eq!(snap.oxygen_percent(), 42);
        assert_eq!(snap.seed, 99);
        assert!(snap.grid.same_layout(state.grid()));
        assert_eq!(snap.rows().len(), 20);
    }

    #[test]
    fn snapshot_serializes_to_json() {
        let state = GameState::new(GameConfig::default(), RED_DRILLER, 3).unwrap();
        let value = serde_json::to_value(state.snapshot()).unwrap();
        assert_eq!(value["status"], "playing");
        assert_eq!(value["hud"]["lives"], 3);
        assert_eq!(value["player"]["character"]["name"], "Red Driller");
        assert_eq!(value["grid"]["width"], 12);
    }
}
