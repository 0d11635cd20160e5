//! Capital and operating cost of an equipment sizing.

use serde::Serialize;

use super::types::{Configuration, EquipmentSizing};

/// CAPEX per technology and the derived annual OPEX.
#[derive(Debug, Clone, PartialEq, Default, Serialize)]
pub struct CostBreakdown {
    pub solar_thermal_capex: f64,
    pub pv_capex: f64,
    pub heat_pump_capex: f64,
    pub storage_capex: f64,
    /// Sum of the four technology terms.
    pub total_capex: f64,
    /// Annual OPEX, a fixed fraction of total CAPEX.
    pub annual_opex: f64,
}

/// Linear CAPEX per technology plus OPEX as a fraction of the total.
pub fn cost_breakdown(config: &Configuration, sizing: &EquipmentSizing) -> CostBreakdown {
    let solar_thermal_capex = sizing.solar_thermal_area_m2 * config.solar_thermal.cost_per_m2;
    let pv_capex = sizing.pv_area_m2 * config.photovoltaic.cost_per_m2;
    let heat_pump_capex = sizing.heat_pump_kw * config.heat_pump.cost_per_kw;
    let storage_capex = sizing.storage_kwh * config.storage.cost_per_kwh;
    let total_capex = solar_thermal_capex + pv_capex + heat_pump_capex + storage_capex;

    CostBreakdown {
        solar_thermal_capex,
        pv_capex,
        heat_pump_capex,
        storage_capex,
        total_capex,
        annual_opex: total_capex * config.economics.opex_fraction,
    }
}

#[cfg(test)]
mod tests {
    use approx::assert_relative_eq;

    use super::*;
    use crate::model::types::fixtures::reference;

    #[test]
    fn capex_is_sum_of_linear_terms() {
        let cfg = reference();
        let costs = cost_breakdown(&cfg, &EquipmentSizing::new(1000.0, 2000.0, 400.0, 1000.0));
        assert_relative_eq!(costs.solar_thermal_capex, 1_500_000.0);
        assert_relative_eq!(costs.pv_capex, 2_000_000.0);
        assert_relative_eq!(costs.heat_pump_capex, 800_000.0);
        assert_relative_eq!(costs.storage_capex, 1_500_000.0);
        assert_relative_eq!(costs.total_capex, 5_800_000.0);
        assert_relative_eq!(costs.annual_opex, 87_000.0, max_relative = 1e-12);
    }

    #[test]
    fn zero_sizing_costs_nothing() {
        let costs = cost_breakdown(&reference(), &EquipmentSizing::default());
        assert_eq!(costs, CostBreakdown::default());
    }
}
