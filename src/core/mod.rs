pub mod fluid_state;
pub mod grid;
pub mod kernel;
pub mod particle;
pub mod particle_set;

pub use fluid_state::FluidState;
pub use grid::{Cell, Grid, MirrorFlip};
pub use kernel::{
    COORD_OFFSETS, KERNEL_SIZE, NEIGHBOR_COUNT, ParticleTransferCache, StencilEntry,
    quadratic_bspline_weights,
};
pub use particle::{Particle, VelocityGradient};
pub use particle_set::ParticleSet;
