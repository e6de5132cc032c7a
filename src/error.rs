//! Errors reported by the solver's configuration and phase entry points.
//!
//! The per-particle loops never produce errors; they rely on the invariants
//! these checks establish.

use std::fmt;

use crate::math::Vector;

/// Which phase of the frame the solver last completed.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum SimPhase {
    /// No transfer in flight; `p2g` may run.
    #[default]
    Idle,
    /// P2G finished; the grid holds mass, momentum and pressure forces.
    Scattered,
    /// Grid update finished; cell velocities are ready to be gathered.
    Solved,
}

impl fmt::Display for SimPhase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Idle => "idle",
            Self::Scattered => "scattered",
            Self::Solved => "solved",
        };
        f.write_str(name)
    }
}

#[derive(Clone, Debug, PartialEq)]
pub enum SimError {
    GridTooSmall {
        width: usize,
        height: usize,
        min: usize,
    },
    GridCapacityExceeded {
        requested: usize,
        capacity: usize,
    },
    ParticleCapacityExceeded {
        requested: usize,
        capacity: usize,
    },
    ParticleOutOfBounds {
        index: usize,
        position: Vector,
    },
    PhaseOrder {
        expected: SimPhase,
        found: SimPhase,
    },
    InvalidParameter {
        name: &'static str,
        value: f32,
    },
}

impl fmt::Display for SimError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::GridTooSmall { width, height, min } => write!(
                f,
                "grid {width}x{height} is too small, both dimensions must be at least {min}"
            ),
            Self::GridCapacityExceeded {
                requested,
                capacity,
            } => write!(
                f,
                "grid needs {requested} cells but only {capacity} are allocated"
            ),
            Self::ParticleCapacityExceeded {
                requested,
                capacity,
            } => write!(
                f,
                "{requested} particles requested but only {capacity} are allocated"
            ),
            Self::ParticleOutOfBounds { index, position } => write!(
                f,
                "particle {index} at ({}, {}) lies outside the grid interior",
                position.x, position.y
            ),
            Self::PhaseOrder { expected, found } => write!(
                f,
                "solver phase out of order: expected {expected}, found {found}"
            ),
            Self::InvalidParameter { name, value } => {
                write!(f, "invalid solver parameter {name} = {value}")
            }
        }
    }
}

impl std::error::Error for SimError {}

pub type SimResult<T = ()> = Result<T, SimError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn phase_order_message_names_both_phases() {
        let err = SimError::PhaseOrder {
            expected: SimPhase::Solved,
            found: SimPhase::Idle,
        };
        assert_eq!(
            err.to_string(),
            "solver phase out of order: expected solved, found idle"
        );
    }
}
