//! Turn engine - resolves player actions against the game state
//!
//! Two entry points, both no-ops unless the session is Playing:
//!
//! - [`GameState::destroy_at`]: strike a block adjacent to (or under) the player
//! - [`GameState::apply_move`]: step left/right, or drill downward
//!
//! Block destruction dispatches on the block type:
//!
//! | Block | Effect |
//! |-------|--------|
//! | MultiHit | lose one hit and oxygen; breaks for points at 0 hits |
//! | Pickup | cleared, oxygen refilled (capped), points, refill notification |
//! | Color, group ≥ minimum | whole 4-connected group cleared, points per block, chain notification |
//! | Color, smaller group | only the target cleared, flat points |
//!
//! The drill path additionally spends a small amount of oxygen on color
//! blocks. Every clear asks the caller to schedule a deferred settle
//! ([`TurnOutcome::schedule_gravity`]); the player itself falls immediately.

use arrayvec::ArrayVec;

use crate::connectivity::find_connected;
use crate::game_state::GameState;
use crate::gravity::{is_settled, settle_in_place, SettleReport};
use crate::grid::Pos;
use crate::types::{BlockType, Direction, GameStatus, Notification};

/// Result of resolving one action
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TurnOutcome {
    /// Whether the state changed at all
    pub applied: bool,
    /// Blocks turned Empty by this action
    pub cleared: u32,
    /// Whether a deferred settle should be scheduled
    pub schedule_gravity: bool,
    pub notifications: ArrayVec<Notification, 2>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum StrikeSource {
    Click,
    Drill,
}

impl GameState {
    /// Strike the block at (col, row).
    ///
    /// The target must be within Manhattan distance 1 of the player. Empty
    /// targets and targets out of range are ignored.
    pub fn destroy_at(&mut self, col: u16, row: u16) -> TurnOutcome {
        let mut out = TurnOutcome::default();
        if !self.status.is_playing() {
            return out;
        }

        let target = Pos::new(col, row);
        if !self.grid.contains(target) || target.distance(self.player.pos()) > 1 {
            return out;
        }
        if self.grid.is_empty_at(target) {
            return out;
        }

        self.strike(target, StrikeSource::Click, &mut out);
        self.record_depth(&mut out);

        tracing::debug!(
            col,
            row,
            cleared = out.cleared,
            score = self.hud.score,
            "destroy resolved"
        );
        out
    }

    /// Move the player one step, then let it fall.
    pub fn apply_move(&mut self, direction: Direction) -> TurnOutcome {
        let mut out = TurnOutcome::default();
        if !self.status.is_playing() {
            return out;
        }

        let origin = self.player.pos();
        match direction {
            Direction::Left | Direction::Right => {
                let col = match direction {
                    Direction::Left => origin.col.saturating_sub(1),
                    _ => (origin.col + 1).min(self.grid.width() - 1),
                };
                let dest = Pos::new(col, origin.row);
                if dest != origin && self.grid.is_empty_at(dest) {
                    self.player.col = col;
                    out.applied = true;
                }
            }
            Direction::Drill => {
                if let Some(below) = self.grid.below(origin) {
                    if !self.grid.is_empty_at(below) {
                        self.strike(below, StrikeSource::Drill, &mut out);
                    }
                    if self.grid.is_empty_at(below) {
                        self.player.row = below.row;
                        out.applied = true;
                    }
                }
            }
        }

        if self.free_fall() > 0 {
            out.applied = true;
        }
        // Blocks resting on the player's old cell are left hanging.
        if self.player.pos() != origin && !is_settled(&self.grid, Some(self.player.pos())) {
            out.schedule_gravity = true;
        }
        self.record_depth(&mut out);

        tracing::debug!(
            direction = direction.as_str(),
            col = self.player.col,
            row = self.player.row,
            cleared = out.cleared,
            "move resolved"
        );
        out
    }

    /// Settle the board around the player, then let the player fall.
    ///
    /// Runs regardless of status: a settle that was already scheduled still
    /// lands while paused. After GameOver the blocks still settle but the
    /// player and depth stay frozen.
    pub fn apply_settle(&mut self) -> (SettleReport, TurnOutcome) {
        let mut out = TurnOutcome::default();
        let mut report = SettleReport::default();
        let frozen = self.status == GameStatus::GameOver;

        loop {
            let pass = settle_in_place(&mut self.grid, Some(self.player.pos()));
            report.passes += pass.passes;
            report.moves += pass.moves;
            // Whatever rested on the player follows it down.
            if frozen || self.free_fall() == 0 {
                break;
            }
            out.applied = true;
        }

        if report.changed() {
            out.applied = true;
        }
        if !frozen {
            self.record_depth(&mut out);
        }
        (report, out)
    }

    fn strike(&mut self, target: Pos, source: StrikeSource, out: &mut TurnOutcome) {
        let Some(cell) = self.grid.cell(target).copied() else {
            return;
        };

        match cell.block {
            BlockType::Empty => {}
            BlockType::MultiHit => {
                let remaining = self.grid.strike(target).unwrap_or(0);
                self.spend_oxygen(self.config.multi_hit_oxygen_penalty);
                out.applied = true;
                if remaining == 0 {
                    self.grid.clear(target);
                    self.add_score(self.config.score_multi_hit);
                    out.cleared += 1;
                    out.schedule_gravity = true;
                }
            }
            BlockType::Pickup => {
                self.grid.clear(target);
                self.add_oxygen(self.config.pickup_oxygen);
                self.add_score(self.config.score_pickup);
                out.applied = true;
                out.cleared += 1;
                out.schedule_gravity = true;
                out.notifications.push(Notification::Refill {
                    oxygen: self.config.pickup_oxygen.round() as u32,
                });
            }
            color => {
                let region = find_connected(&self.grid, target, color);
                if region.len() >= self.config.min_connected_blocks {
                    for pos in region.iter() {
                        self.grid.clear(pos);
                    }
                    let blocks = region.len() as u32;
                    let points = self.config.score_chain_per_block.saturating_mul(blocks);
                    self.add_score(points);
                    if source == StrikeSource::Drill {
                        self.spend_oxygen(self.config.drill_chain_oxygen_cost);
                    }
                    out.cleared += blocks;
                    out.notifications
                        .push(Notification::ChainReaction { blocks, points });
                    tracing::debug!(blocks, points, "chain reaction");
                } else {
                    self.grid.clear(target);
                    self.add_score(self.config.score_single_block);
                    if source == StrikeSource::Drill {
                        self.spend_oxygen(self.config.drill_single_oxygen_cost);
                    }
                    out.cleared += 1;
                }
                out.applied = true;
                out.schedule_gravity = true;
            }
        }
    }

    /// Raise depth to the player's row if deeper; completes the level at the
    /// target depth.
    fn record_depth(&mut self, out: &mut TurnOutcome) {
        let depth = self.depth_at_player();
        if depth > self.hud.depth {
            self.hud.depth = depth;
            out.applied = true;
        }

        if self.status == GameStatus::Playing && self.hud.depth >= self.config.target_depth {
            self.status = GameStatus::LevelComplete;
            out.applied = true;
            let _ = out.notifications.try_push(Notification::LevelComplete {
                depth: self.hud.depth,
            });
            tracing::info!(depth = self.hud.depth, "level complete");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::GameConfig;
    use crate::grid::Grid;
    use crate::types::RED_DRILLER;

    fn state(rows: &[&str], spawn: (u16, u16)) -> GameState {
        let grid = Grid::from_rows(rows, 5).unwrap();
        GameState::with_grid(
            GameConfig::default(),
            RED_DRILLER,
            grid,
            Pos::new(spawn.0, spawn.1),
        )
        .unwrap()
    }

    #[test]
    fn small_group_clears_only_target() {
        // Target plus 2 same-color neighbors: group of 3.
        let mut s = state(&["....", "GGG.", "BBBB"], (0, 0));
        let out = s.destroy_at(0, 1);
        assert!(out.applied);
        assert_eq!(out.cleared, 1);
        assert!(out.schedule_gravity);
        assert!(out.notifications.is_empty());
        assert_eq!(s.score(), 10);
        assert_eq!(s.grid().to_rows()[1], ".GG.");
    }

    #[test]
    fn group_of_four_chain_clears() {
        let mut s = state(&["....", "GGGG", "BBBB"], (0, 0));
        let out = s.destroy_at(0, 1);
        assert_eq!(out.cleared, 4);
        assert_eq!(s.score(), 80);
        assert_eq!(s.grid().to_rows()[1], "....");
        assert_eq!(
            out.notifications.as_slice(),
            &[Notification::ChainReaction {
                blocks: 4,
                points: 80
            }]
        );
        assert_eq!(
            out.notifications[0].description(),
            "4 blocks destroyed! +80 points"
        );
        // Click path costs no oxygen for color blocks.
        assert_eq!(s.oxygen(), 100.0);
    }

    #[test]
    fn multi_hit_needs_five_strikes() {
        let mut s = state(&[".", "X", "B"], (0, 0));
        for strike in 1..=4u8 {
            let out = s.destroy_at(0, 1);
            assert!(out.applied);
            assert!(!out.schedule_gravity);
            let cell = *s.grid().cell(Pos::new(0, 1)).unwrap();
            assert_eq!(cell.block, BlockType::MultiHit);
            assert_eq!(cell.hits, 5 - strike);
            assert_eq!(s.score(), 0);
        }
        assert_eq!(s.oxygen(), 80.0);

        let out = s.destroy_at(0, 1);
        assert!(out.schedule_gravity);
        assert_eq!(out.cleared, 1);
        assert_eq!(s.grid().block_at(Pos::new(0, 1)), BlockType::Empty);
        assert_eq!(s.score(), 50);
        assert_eq!(s.oxygen(), 75.0);
    }

    #[test]
    fn pickup_refill_is_capped() {
        let mut s = state(&[".", "A", "A", "B"], (0, 0));
        s.set_oxygen(90.0);
        let out = s.destroy_at(0, 1);
        assert_eq!(s.oxygen(), 100.0);
        assert_eq!(s.score(), 100);
        assert_eq!(
            out.notifications.as_slice(),
            &[Notification::Refill { oxygen: 20 }]
        );
    }

    #[test]
    fn destroy_out_of_reach_or_empty_is_noop() {
        let mut s = state(&["...", "...", "GGG"], (0, 1));
        assert_eq!(s.player().pos(), Pos::new(0, 1));
        assert_eq!(s.destroy_at(2, 2), TurnOutcome::default());
        assert_eq!(s.destroy_at(1, 1), TurnOutcome::default());
        assert_eq!(s.destroy_at(40, 40), TurnOutcome::default());
        assert_eq!(s.score(), 0);
    }

    #[test]
    fn actions_ignored_when_not_playing() {
        let mut s = state(&["..", "GG"], (0, 0));
        s.pause();
        assert_eq!(s.destroy_at(0, 1), TurnOutcome::default());
        assert_eq!(s.apply_move(Direction::Drill), TurnOutcome::default());
        assert_eq!(s.grid().to_rows()[1], "GG");
    }

    #[test]
    fn horizontal_move_blocked_by_solid_and_clamped_at_edge() {
        let mut s = state(&[".G", "BB"], (0, 0));
        let out = s.apply_move(Direction::Right);
        assert!(!out.applied);
        assert_eq!(s.player().col, 0);

        let out = s.apply_move(Direction::Left);
        assert!(!out.applied);
        assert_eq!(s.player().col, 0);
    }

    #[test]
    fn horizontal_move_then_free_fall() {
        let mut s = state(&["...", "B..", "BB.", "BBB"], (0, 0));
        assert_eq!(s.player().pos(), Pos::new(0, 0));
        let out = s.apply_move(Direction::Right);
        assert!(!out.schedule_gravity);
        assert_eq!(s.player().pos(), Pos::new(1, 1));
        s.apply_move(Direction::Right);
        assert_eq!(s.player().pos(), Pos::new(2, 2));
    }

    #[test]
    fn drill_single_block_costs_oxygen_and_moves_player() {
        let mut s = state(&[".", "G", "B", "Y"], (0, 0));
        let out = s.apply_move(Direction::Drill);
        assert!(out.schedule_gravity);
        assert_eq!(s.player().pos(), Pos::new(0, 1));
        assert_eq!(s.score(), 10);
        assert_eq!(s.oxygen(), 99.0);
    }

    #[test]
    fn drill_chain_costs_two_oxygen() {
        let mut s = state(&["....", "PPPP", "BYBY"], (0, 0));
        let out = s.apply_move(Direction::Drill);
        assert_eq!(out.cleared, 4);
        assert_eq!(s.score(), 80);
        assert_eq!(s.oxygen(), 98.0);
        assert_eq!(s.player().pos(), Pos::new(0, 1));
    }

    #[test]
    fn drill_into_multi_hit_stays_until_broken() {
        let mut s = state(&[".", "X", "B"], (0, 0));
        for _ in 0..4 {
            s.apply_move(Direction::Drill);
            assert_eq!(s.player().pos(), Pos::new(0, 0));
        }
        s.apply_move(Direction::Drill);
        assert_eq!(s.player().pos(), Pos::new(0, 1));
        assert_eq!(s.score(), 50);
        assert_eq!(s.oxygen(), 75.0);
    }

    #[test]
    fn drill_through_empty_falls_to_floor() {
        let mut s = state(&["..", "..", "..", ".."], (0, 0));
        assert_eq!(s.player().pos(), Pos::new(0, 3));
        let out = s.apply_move(Direction::Drill);
        assert!(!out.applied);
        assert_eq!(s.player().pos(), Pos::new(0, 3));
    }

    #[test]
    fn depth_tracks_deepest_row() {
        let rows = [
            ".....", ".....", ".....", ".....", ".....", "GBGBG", "BGBGB", "YPYPY",
        ];
        let mut s = state(&rows, (0, 4));
        assert_eq!(s.depth(), 0);
        s.apply_move(Direction::Drill);
        assert_eq!(s.player().row, 5);
        assert_eq!(s.depth(), 10);
        s.apply_move(Direction::Drill);
        assert_eq!(s.depth(), 20);
        s.apply_move(Direction::Right);
        assert_eq!(s.depth(), 20);
    }

    #[test]
    fn reaching_target_depth_completes_level() {
        let grid = Grid::from_rows(&["..", "..", "GB", "BG"], 5).unwrap();
        let config = GameConfig {
            top_margin_rows: 0,
            target_depth: 30,
            ..GameConfig::default()
        };
        let mut s = GameState::with_grid(config, RED_DRILLER, grid, Pos::new(0, 0)).unwrap();
        assert_eq!(s.depth(), 10);
        s.apply_move(Direction::Drill);
        assert_eq!(s.depth(), 20);
        let out = s.apply_move(Direction::Drill);
        assert_eq!(s.depth(), 30);
        assert_eq!(s.status(), GameStatus::LevelComplete);
        assert!(out
            .notifications
            .contains(&Notification::LevelComplete { depth: 30 }));
        assert_eq!(s.apply_move(Direction::Left), TurnOutcome::default());
    }

    #[test]
    fn settle_rests_blocks_on_player() {
        let mut s = state(&["G.", "..", "..", ".B"], (0, 2));
        // Player fell to the floor row under the green.
        assert_eq!(s.player().pos(), Pos::new(0, 3));
        let (report, _) = s.apply_settle();
        assert!(report.changed());
        assert_eq!(s.grid().to_rows(), vec!["..", "..", "G.", ".B"]);
        assert!(s.grid().is_empty_at(s.player().pos()));
    }

    #[test]
    fn settle_drops_player_when_support_falls() {
        let mut s = state(&["..", "G.", "..", ".."], (0, 0));
        assert_eq!(s.player().pos(), Pos::new(0, 0));
        s.apply_settle();
        // Green fell to the floor, player followed it down.
        assert_eq!(s.grid().to_rows(), vec!["..", "..", "..", "G."]);
        assert_eq!(s.player().pos(), Pos::new(0, 2));
    }

    #[test]
    fn stepping_out_from_under_a_block_schedules_settle() {
        let mut s = state(&["G..", "...", "...", "..."], (0, 1));
        assert_eq!(s.player().pos(), Pos::new(0, 3));
        s.apply_settle();
        assert_eq!(s.grid().to_rows()[2], "G..");

        let out = s.apply_move(Direction::Right);
        assert!(out.applied);
        assert!(out.schedule_gravity);
        assert_eq!(out.cleared, 0);
        assert_eq!(s.player().pos(), Pos::new(1, 3));
    }

    #[test]
    fn settle_follows_player_that_drops_out_from_under_a_block() {
        let mut s = state(&["G.", "..", "B.", ".."], (0, 1));
        assert_eq!(s.player().pos(), Pos::new(0, 1));
        s.apply_settle();
        // Blue fell to the floor, the player followed and the green came after.
        assert_eq!(s.grid().to_rows(), vec!["..", "G.", "..", "B."]);
        assert_eq!(s.player().pos(), Pos::new(0, 2));
        assert!(is_settled(s.grid(), Some(s.player().pos())));
    }

    #[test]
    fn settle_after_game_over_leaves_player_and_depth() {
        let grid = Grid::from_rows(&["G.", "..", "B.", ".."], 5).unwrap();
        let config = GameConfig {
            top_margin_rows: 0,
            ..GameConfig::default()
        };
        let mut s = GameState::with_grid(config, RED_DRILLER, grid, Pos::new(0, 1)).unwrap();
        assert_eq!(s.depth(), 10);
        s.status = GameStatus::GameOver;

        s.apply_settle();
        assert_eq!(s.grid().to_rows(), vec!["G.", "..", "..", "B."]);
        assert_eq!(s.player().pos(), Pos::new(0, 1));
        assert_eq!(s.depth(), 10);
    }
}
