//! Fluid particles
//!
//! Particles carry position, velocity, the APIC velocity gradient and foam.
//! The field order and stride of [`Particle`] are shared with hosts that read
//! the particle buffer directly, so both are fixed by `#[repr(C)]`.

use crate::math::{Matrix, Real, Vector, zero_vector};

/// Per-particle affine velocity field, stored row-major.
///
/// `g00`/`g01` map an offset to the x velocity, `g10`/`g11` to the y velocity.
#[repr(C)]
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct VelocityGradient {
    pub g00: Real,
    pub g01: Real,
    pub g10: Real,
    pub g11: Real,
}

impl VelocityGradient {
    pub const ZERO: Self = Self {
        g00: 0.0,
        g01: 0.0,
        g10: 0.0,
        g11: 0.0,
    };

    /// Velocity of the local linear field at `offset` from the particle.
    #[inline(always)]
    pub fn apply(&self, offset: Vector) -> Vector {
        Vector::new(
            self.g00 * offset.x + self.g01 * offset.y,
            self.g10 * offset.x + self.g11 * offset.y,
        )
    }

    #[inline]
    pub fn from_matrix(m: Matrix) -> Self {
        Self {
            g00: m.x_axis.x,
            g01: m.y_axis.x,
            g10: m.x_axis.y,
            g11: m.y_axis.y,
        }
    }

    #[inline]
    pub fn to_matrix(self) -> Matrix {
        Matrix::from_cols(
            Vector::new(self.g00, self.g10),
            Vector::new(self.g01, self.g11),
        )
    }

    #[inline]
    pub fn is_finite(&self) -> bool {
        self.g00.is_finite() && self.g01.is_finite() && self.g10.is_finite() && self.g11.is_finite()
    }
}

#[repr(C)]
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct Particle {
    /// Foam intensity in `[0, 1]`.
    pub aeration: Real,
    pub position: Vector,
    pub velocity: Vector,
    pub velocity_gradient: VelocityGradient,
    /// Grid density sampled during the last P2G pass.
    pub density: Real,
}

impl Particle {
    pub fn zeroed() -> Self {
        Self {
            aeration: 0.0,
            position: zero_vector(),
            velocity: zero_vector(),
            velocity_gradient: VelocityGradient::ZERO,
            density: 0.0,
        }
    }

    pub fn new(position: Vector) -> Self {
        Self {
            position,
            ..Self::zeroed()
        }
    }

    pub fn with_velocity(mut self, velocity: Vector) -> Self {
        self.velocity = velocity;
        self
    }

    pub fn with_aeration(mut self, aeration: Real) -> Self {
        self.aeration = aeration.clamp(0.0, 1.0);
        self
    }

    pub fn with_velocity_gradient(mut self, gradient: VelocityGradient) -> Self {
        self.velocity_gradient = gradient;
        self
    }

    #[inline]
    pub fn is_finite(&self) -> bool {
        self.aeration.is_finite()
            && self.position.is_finite()
            && self.velocity.is_finite()
            && self.velocity_gradient.is_finite()
    }
}
