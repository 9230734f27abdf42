use criterion::{black_box, criterion_group, criterion_main, Criterion};
use drill_master::core::gravity::settle_in_place;
use drill_master::core::{find_connected, BoardGenerator, GameConfig, GameState, Grid, Pos};
use drill_master::engine::Session;
use drill_master::types::{BlockType, Direction, RED_DRILLER};

/// Deep board with its top half knocked out into a checkerboard of holes,
/// so settle has real work to do.
fn loose_board() -> Grid {
    let mut grid = BoardGenerator::default().generate(12, 20, 12345);
    for row in 5..12u16 {
        for col in 0..12u16 {
            if (row + col) % 2 == 0 {
                grid.clear(Pos::new(col, row));
            }
        }
    }
    grid
}

fn bench_generate(c: &mut Criterion) {
    let generator = BoardGenerator::default();
    c.bench_function("generate_12x20", |b| {
        b.iter(|| generator.generate(12, 20, black_box(42)))
    });
}

fn bench_settle(c: &mut Criterion) {
    let grid = loose_board();
    c.bench_function("settle_loose_board", |b| {
        b.iter(|| {
            let mut g = grid.clone();
            settle_in_place(&mut g, None)
        })
    });
}

fn bench_flood_fill(c: &mut Criterion) {
    let rows: Vec<String> = (0..64).map(|_| "G".repeat(64)).collect();
    let grid = Grid::from_rows(&rows, 5).unwrap();
    c.bench_function("find_connected_64x64", |b| {
        b.iter(|| find_connected(&grid, black_box(Pos::new(0, 0)), BlockType::Green).len())
    });
}

fn bench_drill(c: &mut Criterion) {
    let state = GameState::new(GameConfig::default(), RED_DRILLER, 12345).unwrap();
    c.bench_function("drill_move", |b| {
        b.iter(|| {
            let mut s = state.clone();
            s.apply_move(Direction::Drill)
        })
    });
}

fn bench_session_advance(c: &mut Criterion) {
    let mut session = Session::new(GameConfig::default(), RED_DRILLER, 7).unwrap();
    session.pause();
    c.bench_function("session_advance_16ms", |b| {
        b.iter(|| session.advance(black_box(16)))
    });
}

criterion_group!(
    benches,
    bench_generate,
    bench_settle,
    bench_flood_fill,
    bench_drill,
    bench_session_advance
);
criterion_main!(benches);
