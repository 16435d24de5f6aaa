//! Parameter sweep execution and result aggregation.
//!
//! A sweep enumerates every assignment of a [`ParameterSpace`] in a fixed
//! order and runs each one through the external tool:
//!
//! ```ignore
//! use refsweep_core::analysis::{NullReporter, SweepController, SweepProgress};
//! use refsweep_core::config::{ParameterSpec, SweepConfig};
//!
//! let spec = ParameterSpec::builder()
//!     .parameter("phil", "PHILOSOPHERS", [2_i64, 3, 4])
//!     .build()?;
//! let controller = SweepController::new(SweepConfig::new(spec, "phil.csp"))?;
//!
//! // Resume from index 1; cancel from another thread via a clone of `progress`
//! let progress = SweepProgress::default();
//! let summary = controller.run(1, &progress, &NullReporter)?;
//! ```
//!
//! Persisted artifacts are later folded into [`SummaryRow`]s with
//! [`summarise`].

mod controller;
mod progress;
mod space;
mod summary;

pub use controller::*;
pub use progress::*;
pub use space::*;
pub use summary::*;
