//! Built-in curves and synthetic scenarios.

pub mod sample;

pub use sample::*;
