//! Grid tests - board container, identities and generation contract

use std::collections::HashSet;

use drill_master::core::{BoardGenerator, Grid, GridError, Pos};
use drill_master::types::{BlockType, BOARD_HEIGHT, BOARD_WIDTH, MULTI_HIT_THRESHOLD};

#[test]
fn test_new_grid_is_all_empty() {
    let grid = Grid::new(BOARD_WIDTH, BOARD_HEIGHT);
    assert_eq!(grid.width(), 12);
    assert_eq!(grid.height(), 20);
    assert_eq!(grid.cells().len(), 240);
    assert_eq!(grid.solid_count(), 0);
    for pos in grid.positions() {
        assert!(grid.is_empty_at(pos));
    }
}

#[test]
fn test_out_of_bounds_reads_are_empty() {
    let grid = Grid::from_rows(&["GG", "GG"], 5).unwrap();
    assert_eq!(grid.cell(Pos::new(2, 0)), None);
    assert_eq!(grid.block_at(Pos::new(0, 9)), BlockType::Empty);
    assert_eq!(grid.pos_at(-1, 0), None);
    assert_eq!(grid.pos_at(1, 1), Some(Pos::new(1, 1)));
    assert_eq!(grid.below(Pos::new(0, 1)), None);
}

#[test]
fn test_rows_round_trip_through_glyphs() {
    let rows = ["..A.", "GPBY", "X..G"];
    let grid = Grid::from_rows(&rows, 5).unwrap();
    assert_eq!(grid.to_rows(), rows);
    assert_eq!(grid.cell(Pos::new(0, 2)).unwrap().hits, 5);
    assert_eq!(grid.cell(Pos::new(1, 1)).unwrap().hits, 0);
}

#[test]
fn test_from_rows_errors() {
    let empty: [&str; 0] = [];
    assert_eq!(Grid::from_rows(&empty, 5), Err(GridError::Empty));
    assert!(matches!(
        Grid::from_rows(&["G?"], 5),
        Err(GridError::UnknownGlyph { glyph: '?', .. })
    ));
}

#[test]
fn test_every_cell_has_a_unique_identity() {
    let mut grid = BoardGenerator::default().generate(12, 20, 31337);
    let mut seen: HashSet<_> = grid.cells().iter().map(|c| c.id).collect();
    assert_eq!(seen.len(), 240);

    // Clearing and moving never reuse an identity.
    for col in 0..12 {
        let pos = Pos::new(col, 10);
        grid.clear(pos);
        assert!(seen.insert(grid.cell(pos).unwrap().id));
    }
    let current: HashSet<_> = grid.cells().iter().map(|c| c.id).collect();
    assert_eq!(current.len(), 240);
}

#[test]
fn test_generated_hits_follow_block_type() {
    for seed in [1, 2, 3, 99, 4096] {
        let grid = BoardGenerator::default().generate(12, 20, seed);
        for cell in grid.cells() {
            let expected = if cell.block == BlockType::MultiHit {
                MULTI_HIT_THRESHOLD
            } else {
                0
            };
            assert_eq!(cell.hits, expected, "seed {}", seed);
        }
    }
}

#[test]
fn test_generation_is_seeded() {
    let generator = BoardGenerator::default();
    assert!(generator
        .generate(12, 20, 5)
        .same_layout(&generator.generate(12, 20, 5)));
}
