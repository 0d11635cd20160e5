//! After-tax cash-flow series with a straight-line depreciation tax shield.

use serde::Serialize;

use crate::model::types::Economics;

/// Year-indexed after-tax cash flows; index 0 is the initial investment.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(transparent)]
pub struct CashFlowSeries(Vec<f64>);

impl CashFlowSeries {
    pub fn new(flows: Vec<f64>) -> Self {
        Self(flows)
    }

    /// All-zero series of `lifespan_years + 1` entries.
    pub fn zeros(lifespan_years: u32) -> Self {
        Self(vec![0.0; lifespan_years as usize + 1])
    }

    pub fn as_slice(&self) -> &[f64] {
        &self.0
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Year-0 flow, `-total_capex` for a generated series.
    pub fn initial(&self) -> f64 {
        self.0.first().copied().unwrap_or(0.0)
    }

    /// Running sum of the series.
    pub fn cumulative(&self) -> Vec<f64> {
        self.0
            .iter()
            .scan(0.0, |acc, cf| {
                *acc += cf;
                Some(*acc)
            })
            .collect()
    }

    pub fn into_inner(self) -> Vec<f64> {
        self.0
    }
}

/// Depreciation charged in each year `0..=lifespan` (year 0 is always zero).
///
/// Straight line over `depreciation_years`, truncated at the end of the
/// project. A zero depreciation period means no depreciation.
pub fn depreciation_schedule(total_capex: f64, economics: &Economics) -> Vec<f64> {
    let years = economics.depreciation_years;
    (0..=economics.lifespan_years)
        .map(|t| {
            if t >= 1 && years > 0 && t <= years {
                total_capex / f64::from(years)
            } else {
                0.0
            }
        })
        .collect()
}

/// Builds the after-tax series from CAPEX and the pre-tax annual gross saving.
///
/// Year `t >= 1` is `saving * (1 - tax) + depreciation_t * tax`. No floor is
/// applied when depreciation exceeds the saving.
pub fn generate_cash_flows(
    total_capex: f64,
    annual_gross_saving: f64,
    economics: &Economics,
) -> CashFlowSeries {
    let tax = economics.tax_rate;
    let flows = depreciation_schedule(total_capex, economics)
        .into_iter()
        .enumerate()
        .map(|(t, depreciation)| {
            if t == 0 {
                -total_capex
            } else {
                annual_gross_saving * (1.0 - tax) + depreciation * tax
            }
        })
        .collect();
    CashFlowSeries(flows)
}
