//! Gravity resolution - multi-pass settling of unsupported blocks
//!
//! Each pass recomputes the supported set, then scans rows from the second
//! deepest row upward, left to right, dropping every unsupported block whose
//! cell below is Empty by exactly one row. Passes repeat until one moves
//! nothing. Dropping one row at a time keeps the horizontal-shelf support rule
//! true at every intermediate step; a shelf that lands on anything stops as a
//! unit.

use crate::connectivity::compute_supported_around;
use crate::grid::{Grid, Pos};

/// Statistics from one settle
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct SettleReport {
    /// Passes run, including the final pass that moved nothing
    pub passes: u32,
    /// Single-row block moves performed
    pub moves: u32,
}

impl SettleReport {
    pub fn changed(&self) -> bool {
        self.moves > 0
    }
}

/// Return the settled copy of `grid`.
pub fn settle(grid: &Grid) -> Grid {
    let mut out = grid.clone();
    settle_in_place(&mut out, None);
    out
}

/// Settle treating `obstacle` as a solid, immovable cell that blocks can rest
/// on but never move into.
pub fn settle_around(grid: &Grid, obstacle: Option<Pos>) -> Grid {
    let mut out = grid.clone();
    settle_in_place(&mut out, obstacle);
    out
}

/// Settle `grid` in place.
pub fn settle_in_place(grid: &mut Grid, obstacle: Option<Pos>) -> SettleReport {
    let mut report = SettleReport::default();
    if grid.height() < 2 {
        report.passes = 1;
        return report;
    }

    loop {
        report.passes += 1;
        let supported = compute_supported_around(grid, obstacle);
        let mut moved = 0u32;

        for row in (0..grid.height() - 1).rev() {
            for col in 0..grid.width() {
                let pos = Pos::new(col, row);
                if !grid.is_solid_at(pos) || supported.contains(pos) {
                    continue;
                }
                let below = Pos::new(col, row + 1);
                if obstacle == Some(below) || !grid.is_empty_at(below) {
                    continue;
                }
                if grid.move_down(pos) {
                    moved += 1;
                }
            }
        }

        report.moves += moved;
        if moved == 0 {
            break;
        }
    }

    tracing::debug!(
        passes = report.passes,
        moves = report.moves,
        "settled board"
    );
    report
}

/// True if no block in `grid` would move when settled.
pub fn is_settled(grid: &Grid, obstacle: Option<Pos>) -> bool {
    let supported = compute_supported_around(grid, obstacle);
    grid.positions()
        .filter(|&pos| grid.is_solid_at(pos))
        .all(|pos| supported.contains(pos))
}
