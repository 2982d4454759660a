//! The pivot distortion model.
//!
//! Implemented as small, pure functions so that the reverser can re-run the
//! forward model to validate its estimates.

pub mod distortion;

pub use distortion::*;
