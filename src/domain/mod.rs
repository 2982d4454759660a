//! Domain types used throughout the crate.
//!
//! This module defines:
//!
//! - tenor labels and the tenor comparison tolerance (`tenor`)
//! - the validated `Curve` container (`curve`)
//! - distortion parameters, reversal outputs and the curve file schema (`types`)

pub mod curve;
pub mod tenor;
pub mod types;

pub use curve::*;
pub use tenor::*;
pub use types::*;
