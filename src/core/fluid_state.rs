use bevy::prelude::*;

use crate::config::{MAX_CELLS, MAX_PARTICLES, SolverParams};
use crate::error::{SimError, SimPhase, SimResult};
use crate::math::{Real, Vector};
use crate::solver::{self, GridForces, PositionBounds};

use super::grid::{Cell, Grid};
use super::particle::Particle;
use super::particle_set::ParticleSet;

/// Aggregate simulation state for the solver.
///
/// Lifecycle: [`FluidState::new`] → [`FluidState::set_grid`] → write
/// particles → [`FluidState::step`] (or `p2g`, `update_grid`, `g2p`) once per
/// frame. Grid size and particle count may only change between frames.
#[derive(Resource)]
pub struct FluidState {
    particle_set: ParticleSet,
    grid: Grid,
    solver_params: SolverParams,
    phase: SimPhase,
}

impl Default for FluidState {
    fn default() -> Self {
        Self::from_parts(MAX_PARTICLES, MAX_CELLS, SolverParams::default())
    }
}

impl FluidState {
    pub fn new(
        particle_capacity: usize,
        cell_capacity: usize,
        solver_params: SolverParams,
    ) -> SimResult<Self> {
        solver_params.validate()?;
        info!(
            "fluid state: {} particle slots, {} cell slots",
            particle_capacity, cell_capacity
        );
        Ok(Self::from_parts(particle_capacity, cell_capacity, solver_params))
    }

    /// State sized for the largest supported scene.
    pub fn with_default_capacity(solver_params: SolverParams) -> SimResult<Self> {
        Self::new(MAX_PARTICLES, MAX_CELLS, solver_params)
    }

    fn from_parts(particle_capacity: usize, cell_capacity: usize, solver_params: SolverParams) -> Self {
        Self {
            particle_set: ParticleSet::with_capacity(particle_capacity),
            grid: Grid::with_capacity(cell_capacity),
            solver_params,
            phase: SimPhase::Idle,
        }
    }

    /// Set the active grid size. Only valid between frames.
    pub fn set_grid(&mut self, width: usize, height: usize) -> SimResult {
        self.expect_phase(SimPhase::Idle)?;
        self.grid.resize(width, height)?;
        info!("grid resized to {}x{}", width, height);
        Ok(())
    }

    pub fn grid(&self) -> &Grid {
        &self.grid
    }

    pub fn grid_mut(&mut self) -> &mut Grid {
        &mut self.grid
    }

    pub fn grid_size(&self) -> (usize, usize) {
        (self.grid.width(), self.grid.height())
    }

    /// Active cells, row-major.
    pub fn cells(&self) -> &[Cell] {
        self.grid.cells()
    }

    pub fn cells_mut(&mut self) -> &mut [Cell] {
        self.grid.cells_mut()
    }

    /// Every particle slot up to capacity; the first `particle_count` are simulated.
    pub fn particles(&self) -> &[Particle] {
        self.particle_set.storage()
    }

    pub fn particles_mut(&mut self) -> &mut [Particle] {
        self.particle_set.storage_mut()
    }

    pub fn active_particles(&self) -> &[Particle] {
        self.particle_set.particles()
    }

    pub fn active_particles_mut(&mut self) -> &mut [Particle] {
        self.particle_set.particles_mut()
    }

    pub fn particle_set(&self) -> &ParticleSet {
        &self.particle_set
    }

    pub fn particle_capacity(&self) -> usize {
        self.particle_set.capacity()
    }

    pub fn particle_count(&self) -> usize {
        self.particle_set.len()
    }

    pub fn set_particle_count(&mut self, count: usize) -> SimResult {
        self.expect_phase(SimPhase::Idle)?;
        self.particle_set.set_len(count)
    }

    /// Append a particle with zero foam and gradient.
    pub fn spawn_particle(&mut self, position: Vector, velocity: Vector) -> SimResult<usize> {
        self.add_particle(Particle::new(position).with_velocity(velocity))
    }

    pub fn add_particle(&mut self, particle: Particle) -> SimResult<usize> {
        self.expect_phase(SimPhase::Idle)?;
        self.particle_set.push(particle)
    }

    pub fn clear_particles(&mut self) -> SimResult {
        self.expect_phase(SimPhase::Idle)?;
        self.particle_set.clear();
        Ok(())
    }

    /// Check that every active particle sits inside the grid interior, at
    /// least `position_epsilon` away from the outer ring of cells.
    pub fn validate_particles(&self) -> SimResult {
        let bounds = PositionBounds::for_grid(
            self.grid.width(),
            self.grid.height(),
            self.solver_params.position_epsilon,
        );
        for (index, particle) in self.particle_set.iter().enumerate() {
            if !bounds.contains(particle.position) {
                return Err(SimError::ParticleOutOfBounds {
                    index,
                    position: particle.position,
                });
            }
        }
        Ok(())
    }

    pub fn solver_params(&self) -> &SolverParams {
        &self.solver_params
    }

    pub fn set_solver_params(&mut self, solver_params: SolverParams) -> SimResult {
        solver_params.validate()?;
        self.solver_params = solver_params;
        Ok(())
    }

    pub fn phase(&self) -> SimPhase {
        self.phase
    }

    pub(crate) fn set_phase(&mut self, phase: SimPhase) {
        self.phase = phase;
    }

    pub(crate) fn expect_phase(&self, expected: SimPhase) -> SimResult {
        if self.phase == expected {
            Ok(())
        } else {
            Err(SimError::PhaseOrder {
                expected,
                found: self.phase,
            })
        }
    }

    /// Drop a frame that was started but not finished.
    pub fn abort_frame(&mut self) {
        self.phase = SimPhase::Idle;
    }

    /// Disjoint borrows used by the transfer passes.
    pub(crate) fn transfer_parts(&mut self) -> (&mut Grid, &mut ParticleSet, &SolverParams) {
        (&mut self.grid, &mut self.particle_set, &self.solver_params)
    }

    pub fn p2g(&mut self) -> SimResult {
        solver::particle_to_grid(self)
    }

    pub fn update_grid(&mut self, forces: &GridForces) -> SimResult {
        solver::grid_update(self, forces)
    }

    /// `update_grid` with the flat argument list of the host ABI.
    #[allow(clippy::too_many_arguments)]
    pub fn update_grid_raw(
        &mut self,
        gravity_x: Real,
        gravity_y: Real,
        pointer_x: Real,
        pointer_y: Real,
        pointer_vel_x: Real,
        pointer_vel_y: Real,
        radius: Real,
    ) -> SimResult {
        let forces = GridForces::from_raw(
            gravity_x,
            gravity_y,
            pointer_x,
            pointer_y,
            pointer_vel_x,
            pointer_vel_y,
            radius,
        );
        self.update_grid(&forces)
    }

    pub fn g2p(&mut self) -> SimResult {
        solver::grid_to_particle(self)
    }

    /// One full frame: P2G, grid update, G2P.
    pub fn step(&mut self, forces: &GridForces) -> SimResult {
        self.p2g()?;
        self.update_grid(forces)?;
        self.g2p()
    }
}
