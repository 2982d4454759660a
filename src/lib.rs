//! `pivot-curves` library crate.
//!
//! The binary (`pivot`) is a thin wrapper around this library so that:
//!
//! - the distortion model and its reversal are testable without spawning processes
//! - the core can be embedded by other front-ends
//!
//! The numerical core is two pure functions:
//!
//! - [`models::simulate`]: distort a baseline curve around a pivot tenor
//! - [`fit::reverse`]: recover the distortion parameters from a curve pair

pub mod app;
pub mod cli;
pub mod data;
pub mod domain;
pub mod error;
pub mod fit;
pub mod io;
pub mod math;
pub mod models;
pub mod report;

pub use domain::{Curve, CurvePoint, DistortionParameters, Reversal};
pub use error::CurveError;
pub use fit::{reverse, reverse_with};
pub use models::{simulate, simulate_many};
