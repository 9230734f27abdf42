//! Board generation - seeded, policy-driven initial boards
//!
//! A [`DistributionPolicy`] decides the block type of each cell from its row;
//! [`BoardGenerator`] walks the board row-major, rolling every cell
//! independently from a [`SimpleRng`] seeded by the caller, so a
//! `(policy, seed, size)` triple always produces the same board.

use crate::grid::{Grid, Pos};
use crate::rng::SimpleRng;
use crate::types::{BlockType, MULTI_HIT_THRESHOLD, REGULAR_COLORS};

/// Per-cell content distribution
pub trait DistributionPolicy {
    /// Pick the block type for a cell in `row` of a board `height` rows deep.
    fn pick(&self, row: u16, height: u16, rng: &mut SimpleRng) -> BlockType;
}

impl<F> DistributionPolicy for F
where
    F: Fn(u16, u16, &mut SimpleRng) -> BlockType,
{
    fn pick(&self, row: u16, height: u16, rng: &mut SimpleRng) -> BlockType {
        self(row, height, rng)
    }
}

/// Two-band distribution: a sparse surface band over a dense deep band.
///
/// Probabilities are per-mille.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BandedPolicy {
    /// Rows (from the top) that belong to the sparse surface band
    pub surface_rows: u16,
    /// Chance that a surface cell holds any block
    pub surface_fill: u32,
    /// Chance that a filled surface cell is a pickup rather than a color
    pub surface_pickup: u32,
    /// Chance that a deep cell is a multi-hit block
    pub deep_multi_hit: u32,
    /// Chance that a deep cell is a pickup
    pub deep_pickup: u32,
}

impl Default for BandedPolicy {
    fn default() -> Self {
        Self {
            surface_rows: 5,
            surface_fill: 200,
            surface_pickup: 300,
            deep_multi_hit: 50,
            deep_pickup: 50,
        }
    }
}

impl DistributionPolicy for BandedPolicy {
    fn pick(&self, row: u16, _height: u16, rng: &mut SimpleRng) -> BlockType {
        if row < self.surface_rows {
            if !rng.chance_permille(self.surface_fill) {
                return BlockType::Empty;
            }
            if rng.chance_permille(self.surface_pickup) {
                return BlockType::Pickup;
            }
            return rng.choose(&REGULAR_COLORS).unwrap_or(BlockType::Green);
        }

        let roll = rng.next_range(1000);
        if roll < self.deep_multi_hit {
            BlockType::MultiHit
        } else if roll < self.deep_multi_hit + self.deep_pickup {
            BlockType::Pickup
        } else {
            rng.choose(&REGULAR_COLORS).unwrap_or(BlockType::Green)
        }
    }
}

/// Produces initial boards from a distribution policy
#[derive(Debug, Clone)]
pub struct BoardGenerator<P = BandedPolicy> {
    policy: P,
    hit_threshold: u8,
}

impl Default for BoardGenerator<BandedPolicy> {
    fn default() -> Self {
        Self::new(BandedPolicy::default())
    }
}

impl<P: DistributionPolicy> BoardGenerator<P> {
    pub fn new(policy: P) -> Self {
        Self {
            policy,
            hit_threshold: MULTI_HIT_THRESHOLD,
        }
    }

    /// Hits given to every generated multi-hit block
    pub fn with_hit_threshold(mut self, hit_threshold: u8) -> Self {
        self.hit_threshold = hit_threshold;
        self
    }

    pub fn policy(&self) -> &P {
        &self.policy
    }

    /// Generate a `width x height` board from `seed`.
    pub fn generate(&self, width: u16, height: u16, seed: u32) -> Grid {
        let mut rng = SimpleRng::new(seed);
        let mut grid = Grid::new(width, height);
        for row in 0..height {
            for col in 0..width {
                let block = self.policy.pick(row, height, &mut rng);
                if block.is_solid() {
                    grid.place(Pos::new(col, row), block, self.hit_threshold);
                }
            }
        }
        tracing::debug!(
            width,
            height,
            seed,
            solid = grid.solid_count(),
            "generated board"
        );
        grid
    }
}

/// Generate a board with an explicit policy
pub fn generate<P: DistributionPolicy>(
    width: u16,
    height: u16,
    policy: P,
    seed: u32,
    hit_threshold: u8,
) -> Grid {
    BoardGenerator::new(policy)
        .with_hit_threshold(hit_threshold)
        .generate(width, height, seed)
}
