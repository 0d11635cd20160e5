//! Grid-search optimisation of equipment sizing.

pub mod objective;
pub mod search;
/// Sizing axes, reference bounds, and snapping.
pub mod space;

pub use objective::Objective;
pub use search::{CandidateRecord, OptimizationOutcome, SearchOptions, optimize, optimize_with};
pub use space::{Axis, SearchSpace};
