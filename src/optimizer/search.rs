//! Exhaustive grid search over the sizing space.

use std::fmt;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

use rayon::prelude::*;
use serde::Serialize;
use tracing::{debug, info, warn};

use super::objective::Objective;
use super::space::SearchSpace;
use crate::error::OptimizeError;
use crate::model::engine::{Evaluation, evaluate, evaluate_unchecked};
use crate::model::types::{Configuration, EquipmentSizing};

/// How the grid is walked. Results are identical either way.
#[derive(Debug, Clone, Default)]
pub struct SearchOptions {
    /// Evaluate candidates on the rayon thread pool.
    pub parallel: bool,
    /// Checked before each candidate; when raised the search returns
    /// [`OptimizeError::Cancelled`].
    pub cancel: Option<Arc<AtomicBool>>,
}

/// Outcome of one candidate.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CandidateRecord {
    /// Position in enumeration order.
    pub index: usize,
    /// Snapped and clamped sizing that was evaluated.
    pub sizing: EquipmentSizing,
    /// Objective value, absent when the candidate was skipped.
    pub objective_value: Option<f64>,
    /// Why the candidate was skipped.
    pub skip_reason: Option<String>,
}

/// Best sizing found and its recomputed evaluation.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct OptimizationOutcome {
    pub objective: Objective,
    pub best_sizing: EquipmentSizing,
    /// Objective value of the best sizing (NPV appears negated).
    pub best_value: f64,
    pub evaluation: Evaluation,
    /// Candidates attempted.
    pub evaluated: usize,
    /// Candidates skipped because their evaluation faulted.
    pub skipped: usize,
    /// Every candidate in enumeration order.
    pub candidates: Vec<CandidateRecord>,
}

/// Runs the grid search serially.
///
/// # Errors
///
/// See [`optimize_with`].
pub fn optimize(
    config: &Configuration,
    objective: Objective,
    space: &SearchSpace,
) -> Result<OptimizationOutcome, OptimizeError> {
    optimize_with(config, objective, space, &SearchOptions::default())
}

/// Runs the grid search with explicit options.
///
/// Ties are broken in favour of the candidate enumerated first, so the
/// parallel walk selects the same sizing as the serial one.
///
/// # Errors
///
/// - [`OptimizeError::InvalidConfig`] if the configuration fails its checks
/// - [`OptimizeError::InvalidAxis`] for a malformed axis
/// - [`OptimizeError::NoFeasibleSolution`] if every candidate was skipped
/// - [`OptimizeError::Cancelled`] if the cancel flag was raised
pub fn optimize_with(
    config: &Configuration,
    objective: Objective,
    space: &SearchSpace,
    options: &SearchOptions,
) -> Result<OptimizationOutcome, OptimizeError> {
    config.check()?;
    space.check()?;

    let candidates = space.candidates();
    let total = candidates.len();
    info!(%objective, total, parallel = options.parallel, "starting grid search");

    let is_cancelled = || {
        options
            .cancel
            .as_ref()
            .is_some_and(|flag| flag.load(Ordering::Relaxed))
    };
    let run = |(index, sizing): (usize, &EquipmentSizing)| {
        (!is_cancelled()).then(|| score_candidate(config, objective, index, sizing))
    };

    let attempted: Vec<Option<CandidateRecord>> = if options.parallel {
        candidates.par_iter().enumerate().map(run).collect()
    } else {
        candidates.iter().enumerate().map(run).collect()
    };

    let completed = attempted.iter().filter(|r| r.is_some()).count();
    if completed < total {
        warn!(completed, total, "grid search cancelled");
        return Err(OptimizeError::Cancelled { completed, total });
    }
    let records: Vec<CandidateRecord> = attempted.into_iter().flatten().collect();

    let skipped = records.iter().filter(|r| r.objective_value.is_none()).count();
    let best = records
        .iter()
        .filter_map(|r| r.objective_value.map(|v| (r.index, r.sizing, v)))
        .reduce(|incumbent, challenger| pick_better(objective, incumbent, challenger));

    let Some((best_index, best_sizing, best_value)) = best else {
        warn!(total, "every candidate was skipped");
        return Err(OptimizeError::NoFeasibleSolution { evaluated: total });
    };

    info!(
        best_index,
        best_value,
        skipped,
        ?best_sizing,
        "grid search finished"
    );

    Ok(OptimizationOutcome {
        objective,
        best_sizing,
        best_value,
        evaluation: evaluate_unchecked(config, &best_sizing),
        evaluated: total,
        skipped,
        candidates: records,
    })
}

/// Keeps the incumbent unless the challenger is strictly better, or equal
/// and enumerated earlier.
fn pick_better(
    objective: Objective,
    incumbent: (usize, EquipmentSizing, f64),
    challenger: (usize, EquipmentSizing, f64),
) -> (usize, EquipmentSizing, f64) {
    let (i_idx, _, i_val) = incumbent;
    let (c_idx, _, c_val) = challenger;
    if objective.is_better(c_val, i_val) || (c_val == i_val && c_idx < i_idx) {
        challenger
    } else {
        incumbent
    }
}

fn score_candidate(
    config: &Configuration,
    objective: Objective,
    index: usize,
    sizing: &EquipmentSizing,
) -> CandidateRecord {
    let skip = |reason: String| {
        warn!(index, ?sizing, %reason, "skipping candidate");
        CandidateRecord {
            index,
            sizing: *sizing,
            objective_value: None,
            skip_reason: Some(reason),
        }
    };

    let evaluation = match evaluate(config, sizing) {
        Ok(evaluation) => evaluation,
        Err(e) => return skip(e.to_string()),
    };
    let value = objective.value(&evaluation.metrics, config.economics.lifespan_years);
    if !value.is_finite() {
        return skip(format!("non-finite objective value {value}"));
    }

    debug!(index, ?sizing, value, "scored candidate");
    CandidateRecord {
        index,
        sizing: *sizing,
        objective_value: Some(value),
        skip_reason: None,
    }
}

impl fmt::Display for OptimizationOutcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "--- Optimization ---")?;
        writeln!(f, "Objective:             {}", self.objective)?;
        writeln!(f, "Candidates evaluated:  {}", self.evaluated)?;
        writeln!(f, "Candidates skipped:    {}", self.skipped)?;
        writeln!(f, "Best objective value:  {:.6}", self.best_value)?;
        write!(f, "{}", self.evaluation)
    }
}
