use std::time::Instant;

use bevy::prelude::*;

pub mod config;
pub mod core;
pub mod error;
pub mod math;
pub mod solver;

// Public re-exports for clean API
pub use config::{DEFAULT_GRAVITY, MAX_CELLS, MAX_PARTICLES, REST_DENSITY, SolverParams};
pub use crate::core::{Cell, FluidState, Grid, Particle, VelocityGradient};
pub use error::{SimError, SimPhase, SimResult};
pub use solver::{GridForces, PointerInteraction};

/// Runs one solver frame per `Update`.
///
/// The host writes particles into [`FluidState`] and updates [`GridForces`]
/// (gravity and pointer) before the chained systems run.
pub struct WaterPlugin {
    pub grid_size: UVec2,
    pub particle_capacity: usize,
    pub cell_capacity: usize,
    pub solver_params: SolverParams,
}

impl Default for WaterPlugin {
    fn default() -> Self {
        Self {
            grid_size: UVec2::new(128, 128),
            particle_capacity: MAX_PARTICLES,
            cell_capacity: MAX_CELLS,
            solver_params: SolverParams::default(),
        }
    }
}

impl Plugin for WaterPlugin {
    fn build(&self, app: &mut App) {
        let state = FluidState::new(
            self.particle_capacity,
            self.cell_capacity,
            self.solver_params.clone(),
        )
        .and_then(|mut state| {
            state.set_grid(self.grid_size.x as usize, self.grid_size.y as usize)?;
            Ok(state)
        })
        .unwrap_or_else(|err| panic!("invalid water plugin configuration: {err}"));

        app.insert_resource(state)
            .init_resource::<GridForces>()
            .add_systems(
                Update,
                (particle_to_grid, grid_update, grid_to_particle).chain(),
            );
    }
}

fn particle_to_grid(mut state: ResMut<FluidState>) -> Result {
    let start = Instant::now();
    state.p2g()?;
    debug!("p2g: {:.3}ms", start.elapsed().as_secs_f64() * 1000.0);
    trace!(
        "p2g: {} particles, grid mass {:.3}",
        state.particle_count(),
        state.grid().total_mass()
    );
    Ok(())
}

fn grid_update(mut state: ResMut<FluidState>, forces: Res<GridForces>) -> Result {
    let start = Instant::now();
    state.update_grid(&forces)?;
    debug!("grid_update: {:.3}ms", start.elapsed().as_secs_f64() * 1000.0);
    Ok(())
}

fn grid_to_particle(mut state: ResMut<FluidState>) -> Result {
    let start = Instant::now();
    state.g2p()?;
    debug!("g2p: {:.3}ms", start.elapsed().as_secs_f64() * 1000.0);
    Ok(())
}
