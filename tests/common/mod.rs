#![allow(dead_code)]

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use water2d::{FluidState, GridForces, Particle, SolverParams, VelocityGradient};
use bevy::math::Vec2;

pub fn state_with_grid(width: usize, height: usize, particles: usize, params: SolverParams) -> FluidState {
    let mut state = FluidState::new(particles.max(1), width * height, params).unwrap();
    state.set_grid(width, height).unwrap();
    state
}

/// Random particles strictly inside the grid interior, with random motion,
/// gradients and foam.
pub fn random_scene(state: &mut FluidState, count: usize, seed: u64, max_speed: f32) {
    let mut rng = StdRng::seed_from_u64(seed);
    let (w, h) = state.grid_size();
    for _ in 0..count {
        let position = Vec2::new(
            rng.random_range(1.01..(w as f32 - 1.01)),
            rng.random_range(1.01..(h as f32 - 1.01)),
        );
        let velocity = Vec2::new(
            rng.random_range(-max_speed..=max_speed),
            rng.random_range(-max_speed..=max_speed),
        );
        let gradient = VelocityGradient {
            g00: rng.random_range(-0.1..0.1),
            g01: rng.random_range(-0.1..0.1),
            g10: rng.random_range(-0.1..0.1),
            g11: rng.random_range(-0.1..0.1),
        };
        let particle = Particle::new(position)
            .with_velocity(velocity)
            .with_velocity_gradient(gradient)
            .with_aeration(rng.random_range(0.0..=1.0));
        state.add_particle(particle).unwrap();
    }
}

/// A block of particles at rest spacing (four per cell) filling
/// `[x0, x1) x [y0, y1)` in cell units.
pub fn water_block(state: &mut FluidState, x0: usize, y0: usize, x1: usize, y1: usize) {
    for cx in (2 * x0)..(2 * x1) {
        for cy in (2 * y0)..(2 * y1) {
            let position = Vec2::new(cx as f32 * 0.5 + 0.25, cy as f32 * 0.5 + 0.25);
            state.spawn_particle(position, Vec2::ZERO).unwrap();
        }
    }
}

pub fn run_frames(state: &mut FluidState, forces: &GridForces, frames: usize) {
    for _ in 0..frames {
        state.step(forces).unwrap();
    }
}
