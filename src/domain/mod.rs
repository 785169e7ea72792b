//! Domain types used throughout the pipeline.
//!
//! This module defines:
//!
//! - data source and run configuration (`DataSource`, `PriceConfig`, `CreditConfig`)
//! - column typing (`ColumnKind`)
//! - test outputs (`AnovaTable`, `ChiSquareResult`, `ApprovalRates`, etc.)

pub mod types;

pub use types::*;
