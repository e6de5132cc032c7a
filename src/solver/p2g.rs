//! Particle-to-Grid (P2G) transfer operations
//!
//! Scatters mass, APIC momentum and foam onto the grid, then samples density
//! back from the mirrored grid and scatters the pressure-penalty force.

use crate::config::SolverParams;
use crate::core::grid::Cell;
use crate::core::{FluidState, Particle, ParticleTransferCache};
use crate::error::{SimPhase, SimResult};
use crate::math::inv_exact;

use super::batch::BatchPlan;

/// Full P2G pass. Always allowed; starts a new frame.
pub fn particle_to_grid(state: &mut FluidState) -> SimResult {
    let (grid, particle_set, params) = state.transfer_parts();
    let plan = BatchPlan::new(particle_set.len(), params.batch_width);
    let grid_width = grid.width();

    grid.zero_active_cells();
    let (particles, cache) = particle_set.particles_mut_and_fresh_cache(plan.padded_len());

    // mass and momentum transfer
    for batch in plan.batches() {
        for lane in batch.clone() {
            if plan.is_padding(lane) {
                continue;
            }
            cache[lane] = ParticleTransferCache::for_particle(particles[lane].position, grid_width);
            debug_assert!(
                cache[lane].max_cell_index() < grid.cell_count(),
                "particle {lane} at {} has a stencil outside the grid",
                particles[lane].position
            );
        }

        let cells = grid.cells_mut();
        for lane in batch {
            if let Some(particle) = particles.get(lane) {
                scatter_mass_momentum(cells, particle, &cache[lane]);
            }
        }
    }

    grid.normalize_aeration();
    grid.mirror_accumulation_edges();

    // density, foam diffusion and pressure
    let cells = grid.cells_mut();
    for batch in plan.batches() {
        for lane in batch {
            if plan.is_padding(lane) {
                continue;
            }
            scatter_pressure(cells, &mut particles[lane], &cache[lane], params);
        }
    }

    grid.mirror_force_edges();
    state.set_phase(SimPhase::Scattered);
    Ok(())
}

/// Scatter one particle's mass, foam and affine momentum onto its stencil.
#[inline]
pub fn scatter_mass_momentum(cells: &mut [Cell], particle: &Particle, transfer: &ParticleTransferCache) {
    if transfer.is_inert() {
        return;
    }
    for (index, weight, offset) in transfer.iter() {
        let cell = &mut cells[index];
        let velocity = particle.velocity + particle.velocity_gradient.apply(offset);
        cell.mass += weight;
        cell.aeration += weight * particle.aeration;
        cell.velocity += weight * velocity;
    }
}

/// Sample density and foam for one particle, diffuse and decay its foam, and
/// scatter its pressure force into the velocity-delta accumulators.
#[inline]
pub fn scatter_pressure(
    cells: &mut [Cell],
    particle: &mut Particle,
    transfer: &ParticleTransferCache,
    params: &SolverParams,
) {
    if transfer.is_inert() {
        return;
    }

    let mut density = 0.0;
    let mut aeration = 0.0;
    for (index, weight, _) in transfer.iter() {
        density += weight * cells[index].mass;
        aeration += weight * cells[index].aeration;
    }
    particle.density = density;
    particle.aeration = (params.aeration_damp
        * (particle.aeration + params.aeration_blur * (aeration - particle.aeration)))
        .clamp(0.0, 1.0);

    let pressure = equation_of_state(density, params);
    if pressure == 0.0 {
        return;
    }
    let volume = inv_exact(density);
    let coeff = -4.0 * volume * pressure;
    for (index, weight, offset) in transfer.iter() {
        cells[index].velocity_delta -= weight * (coeff * offset);
    }
}

/// One-sided pressure: repulsive above rest density, zero below.
#[inline(always)]
pub fn equation_of_state(density: f32, params: &SolverParams) -> f32 {
    (params.pressure_stiffness * (density * params.inv_rest_density() - 1.0)).max(0.0)
}
