//! Parameter sweep engine for external verification tools
//!
//! This crate renders one configuration file per point of a parameter grid,
//! runs a verification tool (FDR's `refines` by default) against each file,
//! and stores the tool's JSON verdicts next to the rendered files.
//! It supports:
//! - Ordered Cartesian enumeration with random access for resuming
//! - Placeholder substitution in opaque template text
//! - Cancellable child-process execution with wall-clock timing
//! - Classification of tool output (completed, tool error, malformed)
//! - Aggregation of stored artifacts into sortable summary rows

#![warn(clippy::all)]

// ============================================================================
// Core modules
// ============================================================================

pub mod analysis;
pub mod collect;
pub mod error;
pub mod exec;
pub mod store;
pub mod template;

// ============================================================================
// Type definition modules
// ============================================================================

pub mod config;
pub mod model;

// ============================================================================
// Test modules
// ============================================================================

#[cfg(test)]
mod tests;

// ============================================================================
// Public re-exports for convenience
// ============================================================================

pub use analysis::{SweepController, SweepProgress, SweepReporter, SweepSummary};
pub use config::{ParameterSpec, SweepConfig, SweepParameter};
pub use error::SweepError;
pub use model::{ParameterAssignment, ParameterValue, RunArtifact};
