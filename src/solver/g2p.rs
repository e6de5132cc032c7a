//! Grid-to-Particle (G2P) transfer operations
//!
//! Gathers velocities and velocity gradients from grid nodes back to
//! particles, advects them and grows foam where they accelerate in thin
//! regions.

use crate::config::{APIC_SCALE, SolverParams};
use crate::core::grid::Cell;
use crate::core::{FluidState, Particle, ParticleTransferCache, VelocityGradient};
use crate::error::{SimPhase, SimResult};
use crate::math::{Real, Vector, outer_product, zero_matrix, zero_vector};

/// Inclusive range particle positions are clamped to.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct PositionBounds {
    pub min: Vector,
    pub max: Vector,
}

impl PositionBounds {
    pub fn for_grid(width: usize, height: usize, epsilon: Real) -> Self {
        let one = 1.0 + epsilon;
        Self {
            min: Vector::splat(one),
            max: Vector::new(width as Real - one, height as Real - one),
        }
    }

    #[inline(always)]
    pub fn clamp(&self, position: Vector) -> Vector {
        position.max(self.min).min(self.max)
    }

    #[inline]
    pub fn contains(&self, position: Vector) -> bool {
        position.cmpge(self.min).all() && position.cmple(self.max).all()
    }
}

/// G2P stage, reusing the stencils cached by this frame's P2G.
pub fn grid_to_particle(state: &mut FluidState) -> SimResult {
    state.expect_phase(SimPhase::Solved)?;
    let (grid, particle_set, params) = state.transfer_parts();
    let bounds = PositionBounds::for_grid(grid.width(), grid.height(), params.position_epsilon);
    let cells = grid.cells();
    let (particles, cache) = particle_set.particles_mut_and_cache();

    for (particle, transfer) in particles.iter_mut().zip(cache) {
        gather_particle(cells, particle, transfer, &bounds, params);
    }

    state.set_phase(SimPhase::Idle);
    Ok(())
}

/// Gather, advect and update foam for a single particle.
#[inline]
pub fn gather_particle(
    cells: &[Cell],
    particle: &mut Particle,
    transfer: &ParticleTransferCache,
    bounds: &PositionBounds,
    params: &SolverParams,
) {
    if transfer.is_inert() {
        return;
    }

    let mut velocity = zero_vector();
    let mut velocity_gradient = zero_matrix();
    for (index, weight, offset) in transfer.iter() {
        let weighted_velocity = cells[index].velocity * weight;
        velocity += weighted_velocity;
        velocity_gradient += outer_product(weighted_velocity, offset);
    }
    particle.velocity_gradient = VelocityGradient::from_matrix(velocity_gradient * APIC_SCALE);

    // Velocity is the displacement after clamping, so walls cancel it.
    let old_position = particle.position;
    let position = bounds.clamp(old_position + velocity);
    let new_velocity = position - old_position;

    let acceleration = new_velocity - particle.velocity;
    particle.aeration = grow_aeration(particle.aeration, acceleration, particle.density, params);
    particle.position = position;
    particle.velocity = new_velocity;
}

/// Foam grows with acceleration where the fluid is thinner than
/// `aeration_threshold` times the rest density. It never shrinks here.
#[inline]
pub fn grow_aeration(aeration: Real, acceleration: Vector, density: Real, params: &SolverParams) -> Real {
    let density_ratio = density * params.inv_rest_density();
    let scale = params.aeration_coeff * (1.0 - density_ratio / params.aeration_threshold);
    let delta = (acceleration.length() * scale).max(0.0);
    (aeration + delta).min(1.0)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn clamp_keeps_particles_off_the_outer_ring() {
        let bounds = PositionBounds::for_grid(8, 6, 1e-3);
        let clamped = bounds.clamp(Vector::new(-50.0, 50.0));
        assert!((clamped - Vector::new(1.001, 4.999)).length() < 1e-6);
        assert!(bounds.contains(Vector::new(4.0, 3.0)));
        assert!(!bounds.contains(Vector::new(7.5, 3.0)));
    }

    #[test]
    fn dense_fluid_does_not_foam() {
        let params = SolverParams::default();
        let grown = grow_aeration(0.2, Vector::new(0.0, -5.0), params.rest_density, &params);
        assert_eq!(grown, 0.2);
    }

    #[test]
    fn thin_fluid_foams_under_acceleration_and_saturates() {
        let params = SolverParams::default();
        let grown = grow_aeration(0.0, Vector::new(0.0, -0.01), 0.0, &params);
        assert!((grown - 0.2).abs() < 1e-6);
        assert_eq!(grow_aeration(0.9, Vector::new(3.0, 4.0), 0.0, &params), 1.0);
    }

    #[test]
    fn uniform_grid_velocity_is_gathered_without_gradient() {
        let mut cells = vec![Cell::zeroed(); 64];
        for cell in cells.iter_mut() {
            cell.velocity = Vector::new(0.25, -0.5);
        }
        let mut particle = Particle::new(Vector::new(3.3, 4.6));
        let transfer = ParticleTransferCache::for_particle(particle.position, 8);
        let bounds = PositionBounds::for_grid(8, 8, 1e-3);
        gather_particle(&cells, &mut particle, &transfer, &bounds, &SolverParams::without_aeration());

        assert!((particle.velocity - Vector::new(0.25, -0.5)).length() < 1e-5);
        assert!((particle.position - Vector::new(3.55, 4.1)).length() < 1e-5);
        let g = particle.velocity_gradient;
        for component in [g.g00, g.g01, g.g10, g.g11] {
            assert!(component.abs() < 1e-5, "gradient {g:?}");
        }
    }

    #[test]
    fn linear_grid_field_is_recovered_as_gradient() {
        // v(x, y) = (0.1 * y, -0.2 * x) sampled at cell centres
        let mut cells = vec![Cell::zeroed(); 100];
        for (i, cell) in cells.iter_mut().enumerate() {
            let centre = Vector::new((i % 10) as Real + 0.5, (i / 10) as Real + 0.5);
            cell.velocity = Vector::new(0.1 * centre.y, -0.2 * centre.x);
        }
        let mut particle = Particle::new(Vector::new(5.2, 4.9));
        let transfer = ParticleTransferCache::for_particle(particle.position, 10);
        let bounds = PositionBounds::for_grid(10, 10, 1e-3);
        gather_particle(&cells, &mut particle, &transfer, &bounds, &SolverParams::without_aeration());

        let g = particle.velocity_gradient;
        assert!(g.g00.abs() < 1e-4);
        assert!((g.g01 - 0.1).abs() < 1e-4);
        assert!((g.g10 + 0.2).abs() < 1e-4);
        assert!(g.g11.abs() < 1e-4);
    }
}
