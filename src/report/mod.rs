//! Reporting utilities: formatted terminal output for simulations,
//! reversals and sweeps.

pub mod format;

pub use format::*;
