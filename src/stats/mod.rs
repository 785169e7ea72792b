//! Statistical routines behind the two canned tests.
//!
//! - least squares (`ols`)
//! - one-way ANOVA (`anova`)
//! - crosstabs, approval rates, chi-square (`contingency`)
//! - per-group descriptive statistics (`summary`)

pub mod anova;
pub mod contingency;
pub mod ols;
pub mod summary;

pub use anova::*;
pub use contingency::*;
pub use summary::*;
