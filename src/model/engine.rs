//! Single-point evaluation: sizing in, energy balance, costs, and metrics out.

use std::fmt;

use serde::Serialize;
use tracing::debug;

use super::baseline::baseline_annual_cost;
use super::cost::{CostBreakdown, cost_breakdown};
use super::energy_balance::{EnergyFlowResult, energy_balance};
use super::types::{Configuration, EquipmentSizing};
use crate::error::ModelError;
use crate::finance::cash_flow::generate_cash_flows;
use crate::finance::metrics::FinancialMetricsResult;

/// Everything derived from one `(configuration, sizing)` pair.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Evaluation {
    /// The sizing that was evaluated.
    pub sizing: EquipmentSizing,
    pub energy: EnergyFlowResult,
    pub costs: CostBreakdown,
    /// Annual cost of the grid-only reference plant.
    pub baseline_annual_cost: f64,
    /// Annual grid cost plus OPEX of the mixed system.
    pub mixed_annual_cost: f64,
    /// Pre-tax saving versus the baseline.
    pub annual_gross_saving: f64,
    pub metrics: FinancialMetricsResult,
}

/// Evaluates one sizing against a configuration.
///
/// A site with zero total demand short-circuits to an all-zero result with
/// "no demand" payback and IRR.
///
/// # Errors
///
/// Returns [`ModelError::InvalidInput`] when the configuration fails
/// [`Configuration::check`] or the sizing is negative or non-finite.
pub fn evaluate(config: &Configuration, sizing: &EquipmentSizing) -> Result<Evaluation, ModelError> {
    config.check()?;
    sizing.check()?;
    Ok(evaluate_unchecked(config, sizing))
}

/// [`evaluate`] without input checks, for callers that validated up front.
pub(crate) fn evaluate_unchecked(config: &Configuration, sizing: &EquipmentSizing) -> Evaluation {
    let lifespan = config.economics.lifespan_years;

    if config.demand.total_kwh() == 0.0 {
        debug!(?sizing, "no demand, short-circuiting evaluation");
        return Evaluation {
            sizing: *sizing,
            energy: EnergyFlowResult::default(),
            costs: CostBreakdown::default(),
            baseline_annual_cost: 0.0,
            mixed_annual_cost: 0.0,
            annual_gross_saving: 0.0,
            metrics: FinancialMetricsResult::no_demand(lifespan),
        };
    }

    let energy = energy_balance(config, sizing);
    let costs = cost_breakdown(config, sizing);
    let baseline = baseline_annual_cost(config);
    let mixed = energy.annual_grid_cost + costs.annual_opex;
    let saving = baseline - mixed;

    let cash_flows = generate_cash_flows(costs.total_capex, saving, &config.economics);
    let metrics = FinancialMetricsResult::from_cash_flows(cash_flows, config.economics.discount_rate);

    debug!(
        ?sizing,
        total_capex = costs.total_capex,
        annual_gross_saving = saving,
        npv = metrics.npv,
        "evaluated sizing"
    );

    Evaluation {
        sizing: *sizing,
        energy,
        costs,
        baseline_annual_cost: baseline,
        mixed_annual_cost: mixed,
        annual_gross_saving: saving,
        metrics,
    }
}

impl fmt::Display for Evaluation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = &self.sizing;
        writeln!(f, "--- Evaluation ---")?;
        writeln!(f, "Solar thermal area:    {:.0} m2", s.solar_thermal_area_m2)?;
        writeln!(f, "PV area:               {:.0} m2", s.pv_area_m2)?;
        writeln!(f, "Heat pump capacity:    {:.0} kW", s.heat_pump_kw)?;
        writeln!(f, "Storage capacity:      {:.0} kWh", s.storage_kwh)?;
        writeln!(f, "Baseline annual cost:  {:.2}", self.baseline_annual_cost)?;
        writeln!(f, "Total CAPEX:           {:.2}", self.costs.total_capex)?;
        writeln!(f, "Annual OPEX:           {:.2}", self.costs.annual_opex)?;
        writeln!(f, "Annual gross saving:   {:.2}", self.annual_gross_saving)?;
        writeln!(f, "Payback:               {}", self.metrics.payback)?;
        writeln!(f, "IRR:                   {}", self.metrics.irr)?;
        write!(f, "NPV:                   {:.2}", self.metrics.npv)
    }
}
