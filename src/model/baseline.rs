//! Grid-only reference plant.

use super::types::Configuration;

/// Grid electricity needed to meet all demand without on-site equipment (kWh/year).
///
/// Heat and cooling are bought as electricity at the baseline COP/EER.
pub fn baseline_grid_input_kwh(config: &Configuration) -> f64 {
    let d = &config.demand;
    d.electricity_kwh + d.heat_kwh / config.baseline.cop + d.cooling_kwh / config.baseline.eer
}

/// Annual operating cost of the grid-only reference plant at the blended tariff.
pub fn baseline_annual_cost(config: &Configuration) -> f64 {
    baseline_grid_input_kwh(config) * config.tariff.blended_price()
}

#[cfg(test)]
mod tests {
    use approx::assert_relative_eq;

    use super::*;
    use crate::model::types::fixtures::reference;

    #[test]
    fn reference_grid_input() {
        let cfg = reference();
        // 10e6 + 5e6/2.5 + 3e6/3.5
        let expected = 10_000_000.0 + 2_000_000.0 + 3_000_000.0 / 3.5;
        assert_relative_eq!(baseline_grid_input_kwh(&cfg), expected);
        assert_relative_eq!(baseline_annual_cost(&cfg), expected * 0.775, max_relative = 1e-12);
    }

    #[test]
    fn zero_demand_costs_nothing() {
        let mut cfg = reference();
        cfg.demand.electricity_kwh = 0.0;
        cfg.demand.heat_kwh = 0.0;
        cfg.demand.cooling_kwh = 0.0;
        assert_eq!(baseline_annual_cost(&cfg), 0.0);
    }

    #[test]
    fn better_baseline_cop_lowers_cost() {
        let cfg = reference();
        let mut efficient = reference();
        efficient.baseline.cop = 4.0;
        assert!(baseline_annual_cost(&efficient) < baseline_annual_cost(&cfg));
    }
}
