use bevy::prelude::*;

use super::constants::{
    AERATION_BLUR, AERATION_COEFF, AERATION_DAMP, AERATION_THRESHOLD, DEFAULT_BATCH_WIDTH,
    POSITION_EPSILON, PRESSURE_STIFFNESS, REST_DENSITY,
};
use crate::error::{SimError, SimResult};

/// Solver parameters for controlling the water simulation
#[derive(Resource, Clone, Debug, PartialEq)]
pub struct SolverParams {
    /// Reference density; cells above it push particles apart.
    pub rest_density: f32,

    /// Stiffness of the one-sided equation of state
    pub pressure_stiffness: f32,

    /// Density ratio below which accelerating particles gain foam
    pub aeration_threshold: f32,

    /// Foam gained per unit of acceleration in fully rarefied regions
    pub aeration_coeff: f32,

    /// Fraction of the neighbourhood foam blended in each frame (0.0 = no diffusion)
    pub aeration_blur: f32,

    /// Multiplicative foam decay applied every frame
    pub aeration_damp: f32,

    /// Gap kept between particles and the outer ring of cells
    pub position_epsilon: f32,

    /// Number of particles whose stencils are built together.
    /// Results do not depend on it.
    pub batch_width: usize,
}

impl Default for SolverParams {
    fn default() -> Self {
        Self {
            rest_density: REST_DENSITY,
            pressure_stiffness: PRESSURE_STIFFNESS,
            aeration_threshold: AERATION_THRESHOLD,
            aeration_coeff: AERATION_COEFF,
            aeration_blur: AERATION_BLUR,
            aeration_damp: AERATION_DAMP,
            position_epsilon: POSITION_EPSILON,
            batch_width: DEFAULT_BATCH_WIDTH,
        }
    }
}

impl SolverParams {
    /// Parameters with foam generation and diffusion disabled
    pub fn without_aeration() -> Self {
        Self {
            aeration_coeff: 0.0,
            aeration_blur: 0.0,
            ..Self::default()
        }
    }

    pub fn with_batch_width(mut self, width: usize) -> Self {
        self.batch_width = width.max(1);
        self
    }

    pub fn with_pressure_stiffness(mut self, stiffness: f32) -> Self {
        self.pressure_stiffness = stiffness;
        self
    }

    pub fn with_rest_density(mut self, density: f32) -> Self {
        self.rest_density = density;
        self
    }

    /// Set foam blur (0.0 to 1.0)
    pub fn with_aeration_blur(mut self, blur: f32) -> Self {
        self.aeration_blur = blur.clamp(0.0, 1.0);
        self
    }

    /// Set foam damping (0.0 to 1.0)
    pub fn with_aeration_damp(mut self, damp: f32) -> Self {
        self.aeration_damp = damp.clamp(0.0, 1.0);
        self
    }

    #[inline]
    pub fn inv_rest_density(&self) -> f32 {
        1.0 / self.rest_density
    }

    /// Reject parameter sets that would break the solver's invariants.
    pub fn validate(&self) -> SimResult {
        check(
            "rest_density",
            self.rest_density,
            self.rest_density > 0.0 && self.rest_density.is_finite(),
        )?;
        check(
            "pressure_stiffness",
            self.pressure_stiffness,
            self.pressure_stiffness >= 0.0 && self.pressure_stiffness.is_finite(),
        )?;
        check(
            "aeration_threshold",
            self.aeration_threshold,
            self.aeration_threshold > 0.0 && self.aeration_threshold.is_finite(),
        )?;
        check(
            "aeration_coeff",
            self.aeration_coeff,
            self.aeration_coeff >= 0.0 && self.aeration_coeff.is_finite(),
        )?;
        check(
            "aeration_blur",
            self.aeration_blur,
            (0.0..=1.0).contains(&self.aeration_blur),
        )?;
        check(
            "aeration_damp",
            self.aeration_damp,
            (0.0..=1.0).contains(&self.aeration_damp),
        )?;
        check(
            "position_epsilon",
            self.position_epsilon,
            self.position_epsilon > 0.0 && self.position_epsilon < 0.5,
        )?;
        check("batch_width", self.batch_width as f32, self.batch_width > 0)
    }
}

#[inline]
fn check(name: &'static str, value: f32, ok: bool) -> SimResult {
    if ok {
        Ok(())
    } else {
        Err(SimError::InvalidParameter { name, value })
    }
}
