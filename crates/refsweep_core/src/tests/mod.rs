//! Integration tests for the sweep engine
//!
//! Tests are organized by topic:
//! - `sweep` - End-to-end sweeps against scripted stand-in tools
//! - `summary` - Aggregation of persisted artifacts into summary rows
//!
//! The stand-in tools are `sh` scripts, so these only run on unix.

#[cfg(unix)]
mod support;
#[cfg(unix)]
mod sweep;
