//! Sweep configuration types.
//!
//! A sweep is described by a [`ParameterSpec`] (which values to try and which
//! template constant each parameter drives) plus a [`SweepConfig`] naming the
//! template, the tool and where files go.

mod parameters;
mod sweep;

pub use parameters::*;
pub use sweep::*;
