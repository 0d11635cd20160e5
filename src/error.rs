//! Error types shared by the model, the optimizer, and the front ends.

use thiserror::Error;

/// Input the model refuses to compute with.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ModelError {
    /// A configuration or sizing value is outside what the equations accept.
    #[error("invalid input `{field}`: {reason}")]
    InvalidInput {
        /// Dotted field path (e.g. `"baseline.cop"`).
        field: String,
        /// Human-readable constraint description.
        reason: String,
    },
}

impl ModelError {
    pub(crate) fn invalid(field: &str, reason: impl Into<String>) -> Self {
        Self::InvalidInput {
            field: field.to_string(),
            reason: reason.into(),
        }
    }
}

/// Failure of a whole optimizer run.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum OptimizeError {
    /// The shared configuration cannot be evaluated at all.
    #[error("configuration rejected before search: {0}")]
    InvalidConfig(#[from] ModelError),
    /// A search axis is malformed.
    #[error("invalid search axis `{axis}`: {reason}")]
    InvalidAxis {
        /// Axis name (e.g. `"pv_area_m2"`).
        axis: &'static str,
        /// Human-readable constraint description.
        reason: String,
    },
    /// Every candidate faulted during evaluation.
    #[error("no feasible solution: all {evaluated} candidates were skipped")]
    NoFeasibleSolution {
        /// Number of candidates attempted.
        evaluated: usize,
    },
    /// The cancellation flag was raised before the search completed.
    #[error("search cancelled after {completed} of {total} candidates")]
    Cancelled {
        /// Candidates evaluated before cancellation was observed.
        completed: usize,
        /// Size of the full grid.
        total: usize,
    },
}
