// src/solver/mod.rs
pub mod batch;
pub mod g2p;
pub mod grid_update;
pub mod p2g;

// Re-export from the solver module
pub use batch::BatchPlan;
pub use g2p::*;
pub use grid_update::*;
pub use p2g::*;
