use bevy::prelude::IVec2;

use crate::math::{Real, Vector, pow2};

/// Number of neighbors in 3x3 kernel
pub const NEIGHBOR_COUNT: usize = 9;
/// MPM kernel size (3x3 B-spline)
pub const KERNEL_SIZE: usize = 3;

// Stencil offsets, row-major: y is the outer axis.
pub const COORD_OFFSETS: [IVec2; NEIGHBOR_COUNT] = [
    IVec2::new(-1, -1),
    IVec2::new(0, -1),
    IVec2::new(1, -1),
    IVec2::new(-1, 0),
    IVec2::new(0, 0),
    IVec2::new(1, 0),
    IVec2::new(-1, 1),
    IVec2::new(0, 1),
    IVec2::new(1, 1),
];

/// 1-D quadratic B-spline weights for the cells at offsets -1, 0, +1.
///
/// `d` is the signed distance from the particle to the centre of its own cell
/// and lies in `[-0.5, 0.5]`; the three weights then sum to one.
#[inline(always)]
pub fn quadratic_bspline_weights(d: Real) -> [Real; KERNEL_SIZE] {
    [0.5 * pow2(0.5 + d), 0.75 - pow2(d), 0.5 * pow2(0.5 - d)]
}

/// One stencil entry: linear cell index, interpolation weight and the offset
/// from the particle to the cell centre.
pub type StencilEntry = (usize, Real, Vector);

/// Interpolation data for one particle, computed once in P2G and reused by the
/// pressure pass and G2P of the same frame.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ParticleTransferCache {
    /// `(⌊x⌋ + 0.5 - x, ⌊y⌋ + 0.5 - y)`
    pub cell_difference: Vector,
    pub neighbors: [StencilEntry; NEIGHBOR_COUNT],
    /// Padding lane: carries no weight and is skipped by every pass.
    pub inert: bool,
}

impl Default for ParticleTransferCache {
    fn default() -> Self {
        Self::INERT
    }
}

impl ParticleTransferCache {
    pub const INERT: Self = Self {
        cell_difference: Vector::ZERO,
        neighbors: [(0, 0.0, Vector::ZERO); NEIGHBOR_COUNT],
        inert: true,
    };

    /// Build the 3x3 stencil of a particle on a row-major grid `grid_width`
    /// cells wide. The caller guarantees `1 <= x, y` and that the stencil
    /// fits inside the grid.
    #[inline]
    pub fn for_particle(position: Vector, grid_width: usize) -> Self {
        debug_assert!(
            position.x >= 1.0 && position.y >= 1.0,
            "particle at {position} reaches past the lower grid edge"
        );

        let floor = position.floor();
        let cell_difference = floor + 0.5 - position;
        let wx = quadratic_bspline_weights(cell_difference.x);
        let wy = quadratic_bspline_weights(cell_difference.y);

        let base_x = floor.x as usize - 1;
        let base_y = floor.y as usize - 1;
        debug_assert!(base_x + KERNEL_SIZE <= grid_width);
        let base = base_y * grid_width + base_x;

        let mut neighbors = [(0, 0.0, Vector::ZERO); NEIGHBOR_COUNT];
        for (k, entry) in neighbors.iter_mut().enumerate() {
            let gx = k % KERNEL_SIZE;
            let gy = k / KERNEL_SIZE;
            let offset = COORD_OFFSETS[k].as_vec2();
            *entry = (
                base + gy * grid_width + gx,
                wx[gx] * wy[gy],
                cell_difference + offset,
            );
        }

        Self {
            cell_difference,
            neighbors,
            inert: false,
        }
    }

    /// Iterator over (cell index, weight, offset) for the nine stencil cells.
    #[inline(always)]
    pub fn iter(&self) -> impl Iterator<Item = StencilEntry> + '_ {
        self.neighbors.iter().copied()
    }

    #[inline(always)]
    pub fn is_inert(&self) -> bool {
        self.inert
    }

    /// Largest linear cell index touched by this stencil.
    #[inline]
    pub fn max_cell_index(&self) -> usize {
        self.neighbors[NEIGHBOR_COUNT - 1].0
    }
}
