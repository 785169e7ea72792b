//! Terminal charts for the batch CLI.

pub mod ascii;

pub use ascii::*;
