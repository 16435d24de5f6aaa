//! Command-line front end for the refsweep sweep engine
//!
//! This crate wires [`refsweep_core`] to the outside world:
//! - YAML sweep files
//! - Logging to stderr and a rotating log file
//! - Ctrl-C cancellation
//! - Summary reports as CSV, LaTeX, Markdown or a console table

pub mod commands;
pub mod config;
pub mod logging;
pub mod report;
pub mod reporter;
pub mod signal;
pub mod util;

pub use logging::init_logging;
