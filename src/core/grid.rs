//! Background grid for the water simulation
//!
//! Dense row-major cells with a fixed capacity; the active `width x height`
//! window may change between frames.

use crate::config::MIN_GRID_DIM;
use crate::error::{SimError, SimResult};
use crate::math::{Real, Vector, zero_vector};

#[repr(C)]
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct Cell {
    pub mass: Real,
    /// Mass-weighted foam; normalized to `[0, 1]` after P2G.
    pub aeration: Real,
    /// Momentum during P2G, velocity after the grid update.
    pub velocity: Vector,
    /// Pressure force accumulator, consumed by the grid update.
    pub velocity_delta: Vector,
}

impl Cell {
    #[inline(always)]
    pub fn zeroed() -> Self {
        Self {
            mass: 0.0,
            aeration: 0.0,
            velocity: zero_vector(),
            velocity_delta: zero_vector(),
        }
    }

    #[inline(always)]
    pub fn zero(&mut self) {
        *self = Self::zeroed();
    }
}

/// Which cell of a mirrored pair gets the negated difference.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct MirrorFlip {
    pub x: bool,
    pub y: bool,
}

impl MirrorFlip {
    /// Left and right walls: x is wall-normal.
    pub const VERTICAL_WALL: Self = Self { x: true, y: false };
    /// Bottom and top walls: y is wall-normal.
    pub const HORIZONTAL_WALL: Self = Self { x: false, y: true };
}

#[derive(Clone, Debug)]
pub struct Grid {
    cells: Vec<Cell>,
    width: usize,
    height: usize,
}

impl Grid {
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            cells: vec![Cell::zeroed(); capacity],
            width: 0,
            height: 0,
        }
    }

    pub fn capacity(&self) -> usize {
        self.cells.len()
    }

    pub fn width(&self) -> usize {
        self.width
    }

    pub fn height(&self) -> usize {
        self.height
    }

    /// Number of cells in the active window.
    pub fn cell_count(&self) -> usize {
        self.width * self.height
    }

    pub fn resize(&mut self, width: usize, height: usize) -> SimResult {
        if width < MIN_GRID_DIM || height < MIN_GRID_DIM {
            return Err(SimError::GridTooSmall {
                width,
                height,
                min: MIN_GRID_DIM,
            });
        }
        let requested = width.checked_mul(height).unwrap_or(usize::MAX);
        if requested > self.capacity() {
            return Err(SimError::GridCapacityExceeded {
                requested,
                capacity: self.capacity(),
            });
        }
        self.width = width;
        self.height = height;
        Ok(())
    }

    #[inline(always)]
    pub fn index(&self, x: usize, y: usize) -> usize {
        y * self.width + x
    }

    /// Centre of the cell at `(x, y)` in grid coordinates.
    #[inline(always)]
    pub fn cell_center(x: usize, y: usize) -> Vector {
        Vector::new(x as Real + 0.5, y as Real + 0.5)
    }

    pub fn get(&self, x: usize, y: usize) -> Option<&Cell> {
        if x < self.width && y < self.height {
            self.cells.get(self.index(x, y))
        } else {
            None
        }
    }

    /// Active cells in row-major order.
    pub fn cells(&self) -> &[Cell] {
        &self.cells[..self.cell_count()]
    }

    pub fn cells_mut(&mut self) -> &mut [Cell] {
        let count = self.cell_count();
        &mut self.cells[..count]
    }

    /// Zero every active cell.
    pub fn zero_active_cells(&mut self) {
        self.cells_mut().iter_mut().for_each(Cell::zero);
    }

    pub fn total_mass(&self) -> Real {
        self.cells().iter().map(|cell| cell.mass).sum()
    }

    /// Divide accumulated foam by mass in every occupied cell. Rounding may
    /// land the weighted mean just above one, hence the cap.
    pub fn normalize_aeration(&mut self) {
        for cell in self.cells_mut() {
            if cell.mass > 0.0 {
                cell.aeration = (cell.aeration / cell.mass).min(1.0);
            }
        }
    }

    /// Sum mass and momentum of a boundary cell and its interior neighbour
    /// into both, as if a ghost cell beyond the wall carried the same values.
    #[inline]
    pub fn mirror_accumulation(&mut self, c1: usize, c2: usize) {
        let mass = self.cells[c1].mass + self.cells[c2].mass;
        let momentum = self.cells[c1].velocity + self.cells[c2].velocity;
        for c in [c1, c2] {
            self.cells[c].mass = mass;
            self.cells[c].velocity = momentum;
        }
    }

    /// Mirror the pressure force of a pair: antisymmetric along flipped axes,
    /// symmetric along the others.
    #[inline]
    pub fn mirror_force(&mut self, c1: usize, c2: usize, flip: MirrorFlip) {
        let a = self.cells[c1].velocity_delta;
        let b = self.cells[c2].velocity_delta;
        let (x1, x2) = mirror_component(a.x, b.x, flip.x);
        let (y1, y2) = mirror_component(a.y, b.y, flip.y);
        self.cells[c1].velocity_delta = Vector::new(x1, y1);
        self.cells[c2].velocity_delta = Vector::new(x2, y2);
    }

    /// Accumulation mirror along all four edges.
    pub fn mirror_accumulation_edges(&mut self) {
        let (w, h) = (self.width, self.height);
        for y in 0..h {
            let row = y * w;
            self.mirror_accumulation(row, row + 1);
            self.mirror_accumulation(row + w - 1, row + w - 2);
        }
        for x in 0..w {
            self.mirror_accumulation(x, x + w);
            self.mirror_accumulation(x + (h - 1) * w, x + (h - 2) * w);
        }
    }

    /// Force mirror along all four edges.
    pub fn mirror_force_edges(&mut self) {
        let (w, h) = (self.width, self.height);
        for y in 0..h {
            let row = y * w;
            self.mirror_force(row, row + 1, MirrorFlip::VERTICAL_WALL);
            self.mirror_force(row + w - 1, row + w - 2, MirrorFlip::VERTICAL_WALL);
        }
        for x in 0..w {
            self.mirror_force(x, x + w, MirrorFlip::HORIZONTAL_WALL);
            self.mirror_force(
                x + (h - 1) * w,
                x + (h - 2) * w,
                MirrorFlip::HORIZONTAL_WALL,
            );
        }
    }

    /// Reflect wall-normal velocity on the outer ring so nothing flows out.
    pub fn apply_wall_boundary(&mut self) {
        let (w, h) = (self.width, self.height);
        for y in 0..h {
            let left = self.index(0, y);
            let right = self.index(w - 1, y);
            let vx = -self.cells[left + 1].velocity.x;
            self.cells[left].velocity.x = if vx < 0.0 { -vx } else { vx };
            let vx = -self.cells[right - 1].velocity.x;
            self.cells[right].velocity.x = if vx > 0.0 { -vx } else { vx };
        }
        for x in 0..w {
            let bottom = self.index(x, 0);
            let top = self.index(x, h - 1);
            let vy = -self.cells[bottom + w].velocity.y;
            self.cells[bottom].velocity.y = if vy < 0.0 { -vy } else { vy };
            let vy = -self.cells[top - w].velocity.y;
            self.cells[top].velocity.y = if vy > 0.0 { -vy } else { vy };
        }
    }
}

#[inline(always)]
fn mirror_component(a: Real, b: Real, flip: bool) -> (Real, Real) {
    if flip {
        let sub = a - b;
        (sub, -sub)
    } else {
        let sum = a + b;
        (sum, sum)
    }
}
