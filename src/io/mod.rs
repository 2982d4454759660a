//! Input/output helpers.
//!
//! - CSV curve ingest + validation (`ingest`)
//! - comparison CSV export (`export`)
//! - curve / reversal JSON read/write (`curve`)

pub mod curve;
pub mod export;
pub mod ingest;

pub use curve::*;
pub use export::*;
pub use ingest::*;
