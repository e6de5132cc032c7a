// Physical constants for the aerated water solver
use bevy::prelude::*;

// Global physics
pub const DEFAULT_GRAVITY: Vec2 = Vec2::new(0.0, -0.01);

// Rest spacing between particles in grid units; four particles per cell at rest.
pub const PARTICLE_SPACING: f32 = 0.5;
pub const REST_DENSITY: f32 = 1.0 / (PARTICLE_SPACING * PARTICLE_SPACING);

// One-sided equation of state
pub const PRESSURE_STIFFNESS: f32 = 5.0;

// Foam
pub const AERATION_THRESHOLD: f32 = 0.7;
pub const AERATION_COEFF: f32 = 20.0;
pub const AERATION_BLUR: f32 = 0.01;
pub const AERATION_DAMP: f32 = 0.992;

// Particles are kept this far inside the outer ring of cells.
pub const POSITION_EPSILON: f32 = 1e-3;

/// Inverse second moment of the quadratic kernel for unit grid spacing.
pub const APIC_SCALE: f32 = 4.0;

// Capacities
pub const MAX_PARTICLES: usize = 262_144;
pub const MAX_CELLS: usize = 262_144;
pub const MIN_GRID_DIM: usize = 3;

pub const DEFAULT_BATCH_WIDTH: usize = 4;
