//! Domain model types shared by the sweep engine and the aggregator.

mod artifact;
mod assignment;
mod value;

pub use artifact::*;
pub use assignment::*;
pub use value::*;
