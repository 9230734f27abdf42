//! Connectivity analysis - flood fills used by clearing and gravity
//!
//! Both searches run on an explicit work-list, so board size never bounds the
//! call stack. Results are [`CellSet`]s: membership only, iterated in
//! row-major order regardless of the order cells were discovered in.

use crate::grid::{Grid, Pos};
use crate::types::BlockType;

/// A set of board positions backed by a bitmap
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CellSet {
    width: u16,
    bits: Vec<bool>,
    len: usize,
}

impl CellSet {
    /// Empty set sized for `grid`
    pub fn for_grid(grid: &Grid) -> Self {
        Self {
            width: grid.width(),
            bits: vec![false; grid.width() as usize * grid.height() as usize],
            len: 0,
        }
    }

    #[inline(always)]
    fn index(&self, pos: Pos) -> Option<usize> {
        if pos.col >= self.width {
            return None;
        }
        let idx = pos.row as usize * self.width as usize + pos.col as usize;
        (idx < self.bits.len()).then_some(idx)
    }

    pub fn contains(&self, pos: Pos) -> bool {
        self.index(pos).map(|idx| self.bits[idx]).unwrap_or(false)
    }

    /// Insert a position; returns true if it was not already present.
    pub fn insert(&mut self, pos: Pos) -> bool {
        let Some(idx) = self.index(pos) else {
            return false;
        };
        if self.bits[idx] {
            return false;
        }
        self.bits[idx] = true;
        self.len += 1;
        true
    }

    pub fn len(&self) -> usize {
        self.len
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Members in row-major order
    pub fn iter(&self) -> impl Iterator<Item = Pos> + '_ {
        let width = self.width as usize;
        self.bits
            .iter()
            .enumerate()
            .filter(|&(_, &set)| set)
            .map(move |(idx, _)| Pos::new((idx % width) as u16, (idx / width) as u16))
    }

    pub fn to_vec(&self) -> Vec<Pos> {
        self.iter().collect()
    }
}

/// All positions reachable from `start` through 4-directional steps onto
/// cells of exactly `target` type.
///
/// Returns an empty set when `target` is Empty or the start cell does not
/// hold `target`.
pub fn find_connected(grid: &Grid, start: Pos, target: BlockType) -> CellSet {
    let mut found = CellSet::for_grid(grid);
    if target.is_empty() || !grid.block_at(start).matches(target) {
        return found;
    }

    let mut stack = vec![start];
    found.insert(start);
    while let Some(pos) = stack.pop() {
        for next in grid.neighbors(pos) {
            if grid.block_at(next).matches(target) && found.insert(next) {
                stack.push(next);
            }
        }
    }
    found
}

/// Whether a solid cell rests on the floor or on a solid cell.
///
/// `obstacle` is an extra position treated as solid ground (the player).
pub fn is_directly_supported(grid: &Grid, pos: Pos, obstacle: Option<Pos>) -> bool {
    if !grid.is_solid_at(pos) {
        return false;
    }
    match grid.below(pos) {
        None => true,
        Some(below) => grid.is_solid_at(below) || obstacle == Some(below),
    }
}

/// Cells that will not fall: directly supported cells plus their
/// horizontal-only closure over same-type neighbors.
pub fn compute_supported(grid: &Grid) -> CellSet {
    compute_supported_around(grid, None)
}

/// [`compute_supported`] with an extra solid `obstacle` position.
pub fn compute_supported_around(grid: &Grid, obstacle: Option<Pos>) -> CellSet {
    let mut supported = CellSet::for_grid(grid);
    let mut stack = Vec::new();

    for pos in grid.positions() {
        if is_directly_supported(grid, pos, obstacle) && supported.insert(pos) {
            stack.push(pos);
        }
    }

    while let Some(pos) = stack.pop() {
        let block = grid.block_at(pos);
        for next in grid.horizontal_neighbors(pos) {
            if grid.block_at(next).matches(block) && supported.insert(next) {
                stack.push(next);
            }
        }
    }
    supported
}
