//! `fairlend` library crate.
//!
//! The binary (`fairlend`) is a thin wrapper around this library so that:
//!
//! - the statistics are testable without spawning processes
//! - the CLI and the dashboard share one pipeline
//! - code stays easy to navigate as the project grows

pub mod app;
pub mod cli;
pub mod config;
pub mod data;
pub mod domain;
pub mod error;
pub mod io;
pub mod plot;
pub mod report;
pub mod stats;
pub mod tui;
