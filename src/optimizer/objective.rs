//! Optimisation objectives and their scalar values.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::finance::metrics::FinancialMetricsResult;

/// Stand-in IRR for candidates whose IRR is undefined. Finite so that
/// comparisons never involve infinities.
pub const UNDEFINED_IRR_PENALTY: f64 = -1.0e9;

/// Unrecovered payback is scored as this multiple of the project lifespan.
pub const UNRECOVERED_PAYBACK_LIFESPANS: f64 = 2.0;

/// Financial metric the optimizer targets.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum Objective {
    #[default]
    #[serde(rename = "irr")]
    MaximizeIrr,
    #[serde(rename = "payback")]
    MinimizePayback,
    #[serde(rename = "npv")]
    MaximizeNpv,
}

/// Comparison direction of an objective value.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    Maximize,
    Minimize,
}

impl Objective {
    pub const ALL: [Objective; 3] = [
        Objective::MaximizeIrr,
        Objective::MinimizePayback,
        Objective::MaximizeNpv,
    ];

    /// Scalar value of the metrics under this objective.
    ///
    /// NPV is negated so that it shares the minimising direction with payback.
    pub fn value(&self, metrics: &FinancialMetricsResult, lifespan_years: u32) -> f64 {
        match self {
            Objective::MaximizeIrr => metrics.irr.rate().unwrap_or(UNDEFINED_IRR_PENALTY),
            Objective::MinimizePayback => {
                if metrics.payback.is_recovered() {
                    metrics.payback.years()
                } else {
                    UNRECOVERED_PAYBACK_LIFESPANS * f64::from(lifespan_years)
                }
            }
            Objective::MaximizeNpv => -metrics.npv,
        }
    }

    pub fn direction(&self) -> Direction {
        match self {
            Objective::MaximizeIrr => Direction::Maximize,
            Objective::MinimizePayback | Objective::MaximizeNpv => Direction::Minimize,
        }
    }

    /// Strict improvement test; equal values never replace the incumbent.
    pub fn is_better(&self, candidate: f64, incumbent: f64) -> bool {
        match self.direction() {
            Direction::Maximize => candidate > incumbent,
            Direction::Minimize => candidate < incumbent,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Objective::MaximizeIrr => "irr",
            Objective::MinimizePayback => "payback",
            Objective::MaximizeNpv => "npv",
        }
    }
}

impl fmt::Display for Objective {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            Objective::MaximizeIrr => "maximize IRR",
            Objective::MinimizePayback => "minimize payback",
            Objective::MaximizeNpv => "maximize NPV",
        };
        f.write_str(label)
    }
}

impl FromStr for Objective {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Objective::ALL
            .into_iter()
            .find(|o| o.as_str() == s)
            .ok_or_else(|| format!("unknown objective \"{s}\", expected one of: irr, payback, npv"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::finance::cash_flow::CashFlowSeries;
    use crate::finance::metrics::{Irr, IrrUndefined, Payback};

    fn metrics(payback: Payback, irr: Irr, npv: f64) -> FinancialMetricsResult {
        FinancialMetricsResult {
            payback,
            irr,
            npv,
            cash_flows: CashFlowSeries::zeros(20),
        }
    }

    #[test]
    fn undefined_irr_gets_finite_penalty() {
        let m = metrics(Payback::Immediate, Irr::Undefined(IrrUndefined::NotConverged), 0.0);
        assert_eq!(Objective::MaximizeIrr.value(&m, 20), UNDEFINED_IRR_PENALTY);
    }

    #[test]
    fn unrecovered_payback_is_twice_lifespan() {
        let m = metrics(Payback::NotRecovered, Irr::Rate(0.0), 0.0);
        assert_eq!(Objective::MinimizePayback.value(&m, 20), 40.0);
        let m = metrics(Payback::NoDemand, Irr::Rate(0.0), 0.0);
        assert_eq!(Objective::MinimizePayback.value(&m, 15), 30.0);
    }

    #[test]
    fn npv_is_negated_and_minimised() {
        let m = metrics(Payback::Immediate, Irr::Rate(0.1), 1234.0);
        assert_eq!(Objective::MaximizeNpv.value(&m, 20), -1234.0);
        assert!(Objective::MaximizeNpv.is_better(-2000.0, -1234.0));
    }

    #[test]
    fn ties_do_not_improve() {
        for objective in Objective::ALL {
            assert!(!objective.is_better(1.0, 1.0));
        }
    }

    #[test]
    fn parses_cli_names() {
        assert_eq!("npv".parse::<Objective>(), Ok(Objective::MaximizeNpv));
        assert_eq!("payback".parse::<Objective>(), Ok(Objective::MinimizePayback));
        assert!("roi".parse::<Objective>().is_err());
    }
}
