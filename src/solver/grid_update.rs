//! Grid update stage
//!
//! Turns momentum plus pressure force into velocity, adds gravity, applies
//! the pointer drag and reflects velocity at the walls.

use bevy::prelude::*;

use crate::core::{FluidState, Grid};
use crate::error::{SimPhase, SimResult};
use crate::math::{Real, Vector, zero_vector};

/// Localized drag towards the pointer's velocity.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct PointerInteraction {
    pub position: Vector,
    pub velocity: Vector,
    /// A radius of zero disables the interaction.
    pub radius: Real,
}

impl PointerInteraction {
    pub const NONE: Self = Self {
        position: Vector::ZERO,
        velocity: Vector::ZERO,
        radius: 0.0,
    };

    pub fn new(position: Vector, velocity: Vector, radius: Real) -> Self {
        Self {
            position,
            velocity,
            radius,
        }
    }

    /// Blend factor for a cell centred at `center`.
    ///
    /// `min(1, 2 - r/radius)` is 1 everywhere inside the radius, so the
    /// pointer acts on a hard-edged disk.
    #[inline]
    pub fn influence(&self, center: Vector) -> Real {
        let r2 = self.position.distance_squared(center);
        if r2 < self.radius * self.radius {
            (2.0 - r2.sqrt() / self.radius).min(1.0)
        } else {
            0.0
        }
    }

    #[inline]
    pub fn apply(&self, center: Vector, velocity: Vector) -> Vector {
        let coeff = self.influence(center);
        if coeff == 0.0 {
            velocity
        } else {
            velocity + coeff * (self.velocity - velocity)
        }
    }
}

/// External inputs of one grid update, supplied by the host every frame.
#[derive(Resource, Clone, Copy, Debug, PartialEq)]
pub struct GridForces {
    pub gravity: Vector,
    pub pointer: PointerInteraction,
}

impl Default for GridForces {
    fn default() -> Self {
        Self {
            gravity: crate::config::DEFAULT_GRAVITY,
            pointer: PointerInteraction::NONE,
        }
    }
}

impl GridForces {
    pub fn gravity(gravity: Vector) -> Self {
        Self {
            gravity,
            pointer: PointerInteraction::NONE,
        }
    }

    pub fn with_pointer(mut self, pointer: PointerInteraction) -> Self {
        self.pointer = pointer;
        self
    }

    /// Inputs in the flat argument order used by the host ABI.
    pub fn from_raw(
        gravity_x: Real,
        gravity_y: Real,
        pointer_x: Real,
        pointer_y: Real,
        pointer_vel_x: Real,
        pointer_vel_y: Real,
        radius: Real,
    ) -> Self {
        Self {
            gravity: Vector::new(gravity_x, gravity_y),
            pointer: PointerInteraction::new(
                Vector::new(pointer_x, pointer_y),
                Vector::new(pointer_vel_x, pointer_vel_y),
                radius,
            ),
        }
    }
}

/// Grid update stage. Must run exactly once between P2G and G2P.
pub fn grid_update(state: &mut FluidState, forces: &GridForces) -> SimResult {
    state.expect_phase(SimPhase::Scattered)?;
    let grid = state.grid_mut();
    integrate_grid_velocities(grid, forces);
    grid.apply_wall_boundary();
    state.set_phase(SimPhase::Solved);
    Ok(())
}

/// Momentum and force to velocity, gravity and pointer drag. Empty cells get
/// zero velocity, also inside the pointer disk.
pub fn integrate_grid_velocities(grid: &mut Grid, forces: &GridForces) {
    let width = grid.width();
    for (index, cell) in grid.cells_mut().iter_mut().enumerate() {
        let momentum = cell.velocity + cell.velocity_delta;
        cell.velocity_delta = zero_vector();
        if cell.mass <= 0.0 {
            cell.velocity = zero_vector();
            continue;
        }

        let velocity = momentum * (1.0 / cell.mass) + forces.gravity;
        let center = Grid::cell_center(index % width, index / width);
        cell.velocity = forces.pointer.apply(center, velocity);
    }
}
