//! API request and response types.

use serde::{Deserialize, Serialize};

use crate::model::engine::Evaluation;
use crate::model::types::{Configuration, EquipmentSizing};
use crate::optimizer::{Objective, OptimizationOutcome, SearchSpace};

/// `POST /evaluate` body.
#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct EvaluateRequest {
    pub sizing: EquipmentSizing,
    /// Replaces the server configuration for this request.
    #[serde(default)]
    pub config: Option<Configuration>,
}

/// `POST /optimize` body. Every field is optional.
#[derive(Debug, Default, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct OptimizeRequest {
    pub objective: Objective,
    /// Replaces the server search space; unspecified axes take reference bounds.
    pub space: Option<SearchSpace>,
    pub config: Option<Configuration>,
    pub parallel: bool,
}

/// `POST /optimize` response: the outcome without the per-candidate trace.
#[derive(Debug, Serialize)]
pub struct OptimizeResponse {
    pub objective: Objective,
    pub best_sizing: EquipmentSizing,
    pub best_value: f64,
    pub evaluated: usize,
    pub skipped: usize,
    pub evaluation: Evaluation,
}

impl From<OptimizationOutcome> for OptimizeResponse {
    fn from(outcome: OptimizationOutcome) -> Self {
        Self {
            objective: outcome.objective,
            best_sizing: outcome.best_sizing,
            best_value: outcome.best_value,
            evaluated: outcome.evaluated,
            skipped: outcome.skipped,
            evaluation: outcome.evaluation,
        }
    }
}

/// Error response body for 4xx and 5xx errors.
#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    /// Human-readable error message.
    pub error: String,
}
