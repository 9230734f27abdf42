//! Grid module - the 2D tile container
//!
//! The grid is a `width x height` board where every position holds exactly one
//! [`Cell`]. Storage is a flat row-major vector for cache locality.
//! Coordinates: (col, row) where col runs left to right and row 0 is the
//! surface; row `height - 1` is the deepest row.
//!
//! Each cell carries an opaque [`CellId`] used by observers to diff boards.
//! The grid owns the id allocator, so any operation that empties a cell hands
//! out a fresh id and an emptied cell is never confused with its former block.

use arrayvec::ArrayVec;
use serde::Serialize;
use thiserror::Error;

use crate::types::BlockType;

/// A board position
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
pub struct Pos {
    pub col: u16,
    pub row: u16,
}

impl Pos {
    pub const fn new(col: u16, row: u16) -> Self {
        Self { col, row }
    }

    /// Manhattan distance to another position
    pub fn distance(self, other: Pos) -> u32 {
        self.col.abs_diff(other.col) as u32 + self.row.abs_diff(other.row) as u32
    }
}

/// Opaque identity of the cell occupying a position
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
#[serde(transparent)]
pub struct CellId(u64);

impl CellId {
    pub fn raw(self) -> u64 {
        self.0
    }
}

/// A single board cell
///
/// `hits` is only meaningful for [`BlockType::MultiHit`] and is 0 otherwise.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Cell {
    pub block: BlockType,
    pub hits: u8,
    pub id: CellId,
}

impl Cell {
    pub fn is_empty(&self) -> bool {
        self.block.is_empty()
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum GridError {
    #[error("grid must have at least one row and one column")]
    Empty,
    #[error("row {row} has {found} cells, expected {expected}")]
    RaggedRow {
        row: usize,
        expected: usize,
        found: usize,
    },
    #[error("unknown block glyph {glyph:?} at row {row}, col {col}")]
    UnknownGlyph { glyph: char, row: usize, col: usize },
    #[error("grid dimension {0} exceeds the supported maximum")]
    TooLarge(usize),
}

/// The game board
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Grid {
    width: u16,
    height: u16,
    /// Flat array of cells, row-major order (row * width + col)
    cells: Vec<Cell>,
    #[serde(skip)]
    next_id: u64,
}

impl Grid {
    /// Create a grid filled with Empty cells
    pub fn new(width: u16, height: u16) -> Self {
        let mut grid = Self {
            width,
            height,
            cells: Vec::with_capacity(width as usize * height as usize),
            next_id: 0,
        };
        for _ in 0..(width as usize * height as usize) {
            let id = grid.alloc_id();
            grid.cells.push(Cell {
                block: BlockType::Empty,
                hits: 0,
                id,
            });
        }
        grid
    }

    /// Build a grid from glyph rows (see [`BlockType::glyph`]).
    ///
    /// Multi-hit cells (`X`) start at `hit_threshold` hits.
    ///
    /// ```
    /// use drill_master_core::{Grid, Pos};
    /// use drill_master_core::types::BlockType;
    ///
    /// let grid = Grid::from_rows(&["..G", "BXA"], 5).unwrap();
    /// assert_eq!(grid.block_at(Pos::new(2, 0)), BlockType::Green);
    /// assert_eq!(grid.cell(Pos::new(1, 1)).unwrap().hits, 5);
    /// ```
    pub fn from_rows<S: AsRef<str>>(rows: &[S], hit_threshold: u8) -> Result<Self, GridError> {
        let height = rows.len();
        let width = rows.first().map(|r| r.as_ref().chars().count()).unwrap_or(0);
        if height == 0 || width == 0 {
            return Err(GridError::Empty);
        }
        let width_u16 = u16::try_from(width).map_err(|_| GridError::TooLarge(width))?;
        let height_u16 = u16::try_from(height).map_err(|_| GridError::TooLarge(height))?;

        let mut grid = Grid::new(width_u16, height_u16);
        for (row, line) in rows.iter().enumerate() {
            let line = line.as_ref();
            let found = line.chars().count();
            if found != width {
                return Err(GridError::RaggedRow {
                    row,
                    expected: width,
                    found,
                });
            }
            for (col, glyph) in line.chars().enumerate() {
                let block = BlockType::from_glyph(glyph)
                    .ok_or(GridError::UnknownGlyph { glyph, row, col })?;
                if block.is_solid() {
                    grid.place(Pos::new(col as u16, row as u16), block, hit_threshold);
                }
            }
        }
        Ok(grid)
    }

    /// Render the grid as glyph rows (inverse of [`Grid::from_rows`])
    pub fn to_rows(&self) -> Vec<String> {
        (0..self.height)
            .map(|row| {
                (0..self.width)
                    .map(|col| self.block_at(Pos::new(col, row)).glyph())
                    .collect()
            })
            .collect()
    }

    fn alloc_id(&mut self) -> CellId {
        let id = CellId(self.next_id);
        self.next_id += 1;
        id
    }

    #[inline(always)]
    fn index(&self, pos: Pos) -> Option<usize> {
        if pos.col >= self.width || pos.row >= self.height {
            return None;
        }
        Some(pos.row as usize * self.width as usize + pos.col as usize)
    }

    pub fn width(&self) -> u16 {
        self.width
    }

    pub fn height(&self) -> u16 {
        self.height
    }

    pub fn bottom_row(&self) -> u16 {
        self.height.saturating_sub(1)
    }

    pub fn contains(&self, pos: Pos) -> bool {
        pos.col < self.width && pos.row < self.height
    }

    /// Resolve signed coordinates to a position, None if out of bounds
    pub fn pos_at(&self, col: i32, row: i32) -> Option<Pos> {
        if col < 0 || row < 0 || col >= self.width as i32 || row >= self.height as i32 {
            return None;
        }
        Some(Pos::new(col as u16, row as u16))
    }

    /// Get cell at position, None if out of bounds
    pub fn cell(&self, pos: Pos) -> Option<&Cell> {
        self.index(pos).map(|idx| &self.cells[idx])
    }

    /// Block type at position; out-of-bounds reads as Empty
    pub fn block_at(&self, pos: Pos) -> BlockType {
        self.cell(pos).map(|c| c.block).unwrap_or(BlockType::Empty)
    }

    pub fn is_empty_at(&self, pos: Pos) -> bool {
        matches!(self.cell(pos), Some(c) if c.is_empty())
    }

    pub fn is_solid_at(&self, pos: Pos) -> bool {
        matches!(self.cell(pos), Some(c) if !c.is_empty())
    }

    /// Put a fresh block at a position
    ///
    /// Multi-hit blocks receive `hit_threshold` hits, all other types 0.
    /// Returns false if out of bounds.
    pub fn place(&mut self, pos: Pos, block: BlockType, hit_threshold: u8) -> bool {
        let Some(idx) = self.index(pos) else {
            return false;
        };
        let hits = if block == BlockType::MultiHit {
            hit_threshold
        } else {
            0
        };
        let id = self.alloc_id();
        self.cells[idx] = Cell { block, hits, id };
        true
    }

    /// Turn a cell into Empty with a fresh identity
    ///
    /// Returns false if out of bounds.
    pub fn clear(&mut self, pos: Pos) -> bool {
        self.place(pos, BlockType::Empty, 0)
    }

    /// Remove one hit from a multi-hit cell, returning the remaining hits.
    ///
    /// The cell type is left unchanged; callers decide when it breaks.
    pub fn strike(&mut self, pos: Pos) -> Option<u8> {
        let idx = self.index(pos)?;
        let cell = &mut self.cells[idx];
        if cell.block != BlockType::MultiHit {
            return None;
        }
        cell.hits = cell.hits.saturating_sub(1);
        Some(cell.hits)
    }

    /// Move a cell one row down into an Empty cell, leaving a fresh Empty
    /// cell behind. The moved block keeps its identity.
    ///
    /// Returns false if the move is impossible.
    pub fn move_down(&mut self, pos: Pos) -> bool {
        let Some(below) = self.below(pos) else {
            return false;
        };
        let (Some(src), Some(dst)) = (self.index(pos), self.index(below)) else {
            return false;
        };
        if self.cells[src].is_empty() || !self.cells[dst].is_empty() {
            return false;
        }
        self.cells[dst] = self.cells[src];
        self.clear(pos)
    }

    /// Position directly below, None on the bottom row
    pub fn below(&self, pos: Pos) -> Option<Pos> {
        if pos.row + 1 < self.height && pos.col < self.width {
            Some(Pos::new(pos.col, pos.row + 1))
        } else {
            None
        }
    }

    /// In-bounds 4-neighbors (right, left, down, up)
    pub fn neighbors(&self, pos: Pos) -> ArrayVec<Pos, 4> {
        let mut out = ArrayVec::new();
        let (col, row) = (pos.col as i32, pos.row as i32);
        for (dc, dr) in [(1, 0), (-1, 0), (0, 1), (0, -1)] {
            if let Some(p) = self.pos_at(col + dc, row + dr) {
                out.push(p);
            }
        }
        out
    }

    /// In-bounds left/right neighbors
    pub fn horizontal_neighbors(&self, pos: Pos) -> ArrayVec<Pos, 2> {
        let mut out = ArrayVec::new();
        for dc in [-1, 1] {
            if let Some(p) = self.pos_at(pos.col as i32 + dc, pos.row as i32) {
                out.push(p);
            }
        }
        out
    }

    /// All positions in row-major order
    pub fn positions(&self) -> impl Iterator<Item = Pos> + '_ {
        let width = self.width;
        (0..self.height).flat_map(move |row| (0..width).map(move |col| Pos::new(col, row)))
    }

    pub fn cells(&self) -> &[Cell] {
        &self.cells
    }

    /// Number of non-Empty cells
    pub fn solid_count(&self) -> usize {
        self.cells.iter().filter(|c| !c.is_empty()).count()
    }

    /// Compare block layout (type and hits), ignoring identities
    pub fn same_layout(&self, other: &Grid) -> bool {
        self.width == other.width
            && self.height == other.height
            && self
                .cells
                .iter()
                .zip(other.cells.iter())
                .all(|(a, b)| a.block == b.block && a.hits == b.hits)
    }
}
