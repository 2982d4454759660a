//! Reverse-engineering of distortion parameters.
//!
//! Responsibilities:
//!
//! - detect cap plateaus on each wing
//! - regress observed shifts on distance from the pivot
//! - validate the estimate by re-simulating it

pub mod plateau;
pub mod reverse;

pub use plateau::*;
pub use reverse::*;
