//! Input/output helpers.
//!
//! - CSV ingest + column typing (`ingest`)
//! - result exports (JSON) and dataset writes (CSV) (`export`)

pub mod export;
pub mod ingest;

pub use export::*;
pub use ingest::*;
