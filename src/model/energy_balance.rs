//! Annual energy balance of the mixed installation.
//!
//! Sources are dispatched against demand in a fixed order: PV against
//! electricity, solar thermal against heat, then the heat pump against the
//! heat left after solar thermal and against cooling. Whatever remains is
//! bought from the grid at baseline efficiency. Storage substitutes no energy;
//! it earns a peak/valley arbitrage saving instead.

use serde::Serialize;

use super::types::{Configuration, EquipmentSizing};

/// Assumed equivalent full-load operating hours of the heat pump per year.
pub const HEAT_PUMP_ANNUAL_RUN_HOURS: f64 = 4000.0;

/// Share of [`HEAT_PUMP_ANNUAL_RUN_HOURS`] spent on heating duty; the rest is cooling.
pub const HEAT_PUMP_HEATING_SHARE: f64 = 0.5;

/// Annual energy delivered per source and residual grid purchase.
#[derive(Debug, Clone, PartialEq, Default, Serialize)]
pub struct EnergyFlowResult {
    /// Electricity supplied by PV (kWh).
    pub pv_supplied_kwh: f64,
    /// Heat supplied by solar thermal (kWh).
    pub solar_thermal_heat_kwh: f64,
    /// Heat supplied by the heat pump (kWh).
    pub heat_pump_heat_kwh: f64,
    /// Cooling supplied by the heat pump (kWh).
    pub heat_pump_cooling_kwh: f64,
    /// Electricity drawn by the heat pump (kWh).
    pub heat_pump_grid_input_kwh: f64,
    /// Electricity demand left to the grid (kWh).
    pub grid_electricity_kwh: f64,
    /// Grid input for the residual heat demand at baseline COP (kWh).
    pub grid_heat_input_kwh: f64,
    /// Grid input for the residual cooling demand at baseline EER (kWh).
    pub grid_cooling_input_kwh: f64,
    /// All grid electricity purchased by the mixed system (kWh).
    pub total_grid_input_kwh: f64,
    /// Annual storage arbitrage saving (currency).
    pub storage_saving: f64,
    /// Grid cost after the storage saving, floored at zero (currency).
    pub annual_grid_cost: f64,
}

/// Annual heat potential of the solar-thermal field (kWh).
pub fn solar_thermal_potential_kwh(config: &Configuration, area_m2: f64) -> f64 {
    let st = &config.solar_thermal;
    area_m2 * st.yield_kwh_per_m2_hr * st.annual_sun_hours
}

/// Annual electricity potential of the PV array (kWh).
pub fn pv_potential_kwh(config: &Configuration, area_m2: f64) -> f64 {
    let pv = &config.photovoltaic;
    area_m2 * pv.yield_kwh_per_m2_hr * pv.annual_sun_hours
}

/// Annual heating and cooling the heat pump could deliver if demand allowed (kWh).
pub fn heat_pump_potential_kwh(config: &Configuration, capacity_kw: f64) -> (f64, f64) {
    let heating_hours = HEAT_PUMP_ANNUAL_RUN_HOURS * HEAT_PUMP_HEATING_SHARE;
    let cooling_hours = HEAT_PUMP_ANNUAL_RUN_HOURS - heating_hours;
    (
        capacity_kw * config.heat_pump.cop * heating_hours,
        capacity_kw * config.heat_pump.eer * cooling_hours,
    )
}

/// Annual arbitrage saving from cycling storage between valley and peak.
pub fn storage_arbitrage_saving(config: &Configuration, capacity_kwh: f64) -> f64 {
    let s = &config.storage;
    capacity_kwh
        * s.cycles_per_year
        * config.tariff.peak_valley_spread()
        * s.charge_efficiency
        * s.discharge_efficiency
}

/// Computes the annual energy balance for one sizing.
///
/// Assumes `config` has passed [`Configuration::check`].
pub fn energy_balance(config: &Configuration, sizing: &EquipmentSizing) -> EnergyFlowResult {
    let demand = &config.demand;

    let pv_supplied = pv_potential_kwh(config, sizing.pv_area_m2).min(demand.electricity_kwh);
    let st_heat =
        solar_thermal_potential_kwh(config, sizing.solar_thermal_area_m2).min(demand.heat_kwh);
    let (hp_heat_potential, hp_cool_potential) = heat_pump_potential_kwh(config, sizing.heat_pump_kw);
    let hp_heat = hp_heat_potential.min(demand.heat_kwh - st_heat);
    let hp_cool = hp_cool_potential.min(demand.cooling_kwh);

    let hp_grid_input = hp_heat / config.heat_pump.cop + hp_cool / config.heat_pump.eer;

    let grid_electricity = (demand.electricity_kwh - pv_supplied).max(0.0);
    let grid_heat_input = (demand.heat_kwh - st_heat - hp_heat).max(0.0) / config.baseline.cop;
    let grid_cooling_input = (demand.cooling_kwh - hp_cool).max(0.0) / config.baseline.eer;
    let total_grid_input = grid_electricity + grid_heat_input + grid_cooling_input + hp_grid_input;

    let storage_saving = storage_arbitrage_saving(config, sizing.storage_kwh);
    let annual_grid_cost =
        (total_grid_input * config.tariff.blended_price() - storage_saving).max(0.0);

    EnergyFlowResult {
        pv_supplied_kwh: pv_supplied,
        solar_thermal_heat_kwh: st_heat,
        heat_pump_heat_kwh: hp_heat,
        heat_pump_cooling_kwh: hp_cool,
        heat_pump_grid_input_kwh: hp_grid_input,
        grid_electricity_kwh: grid_electricity,
        grid_heat_input_kwh: grid_heat_input,
        grid_cooling_input_kwh: grid_cooling_input,
        total_grid_input_kwh: total_grid_input,
        storage_saving,
        annual_grid_cost,
    }
}

#[cfg(test)]
mod tests {
    use approx::assert_relative_eq;

    use super::*;
    use crate::model::baseline::{baseline_annual_cost, baseline_grid_input_kwh};
    use crate::model::types::fixtures::reference;

    #[test]
    fn zero_sizing_matches_baseline() {
        let cfg = reference();
        let flows = energy_balance(&cfg, &EquipmentSizing::default());
        assert_eq!(flows.total_grid_input_kwh, baseline_grid_input_kwh(&cfg));
        assert_eq!(flows.annual_grid_cost, baseline_annual_cost(&cfg));
        assert_eq!(flows.storage_saving, 0.0);
    }

    #[test]
    fn pv_supply_is_capped_by_demand() {
        let cfg = reference();
        // 1e6 m² * 0.15 * 1200 = 180 GWh >> 10 GWh
        let flows = energy_balance(&cfg, &EquipmentSizing::new(0.0, 1_000_000.0, 0.0, 0.0));
        assert_eq!(flows.pv_supplied_kwh, cfg.demand.electricity_kwh);
        assert_eq!(flows.grid_electricity_kwh, 0.0);
    }

    #[test]
    fn pv_is_monotone_until_demand_is_met() {
        let cfg = reference();
        let mut last_supply = -1.0;
        let mut last_residual = f64::INFINITY;
        for area in (0..=100).map(|i| i as f64 * 1000.0) {
            let flows = energy_balance(&cfg, &EquipmentSizing::new(0.0, area, 0.0, 0.0));
            assert!(flows.pv_supplied_kwh >= last_supply);
            assert!(flows.grid_electricity_kwh <= last_residual);
            assert!(flows.pv_supplied_kwh <= cfg.demand.electricity_kwh);
            last_supply = flows.pv_supplied_kwh;
            last_residual = flows.grid_electricity_kwh;
        }
        // saturation: 10e6 / 180 ≈ 55 556 m²; beyond it nothing changes
        let a = energy_balance(&cfg, &EquipmentSizing::new(0.0, 60_000.0, 0.0, 0.0));
        let b = energy_balance(&cfg, &EquipmentSizing::new(0.0, 90_000.0, 0.0, 0.0));
        assert_eq!(a, b);
    }

    #[test]
    fn heat_pump_tops_up_after_solar_thermal() {
        let cfg = reference();
        // solar thermal: 5000 m² * 0.5 * 1500 = 3.75 GWh of 5 GWh heat
        // heat pump: 2000 kW * 4.0 * 2000 h = 16 GWh potential, capped at 1.25 GWh
        let flows = energy_balance(&cfg, &EquipmentSizing::new(5000.0, 0.0, 2000.0, 0.0));
        assert_relative_eq!(flows.solar_thermal_heat_kwh, 3_750_000.0);
        assert_relative_eq!(flows.heat_pump_heat_kwh, 1_250_000.0);
        assert_eq!(flows.grid_heat_input_kwh, 0.0);
        // cooling: 2000 * 5.0 * 2000 = 20 GWh potential, capped at 3 GWh
        assert_relative_eq!(flows.heat_pump_cooling_kwh, 3_000_000.0);
        assert_eq!(flows.grid_cooling_input_kwh, 0.0);
        assert_relative_eq!(
            flows.heat_pump_grid_input_kwh,
            1_250_000.0 / 4.0 + 3_000_000.0 / 5.0
        );
    }

    #[test]
    fn partial_heat_pump_leaves_grid_residual() {
        let cfg = reference();
        // 100 kW: heat 100*4*2000 = 800 MWh, cool 100*5*2000 = 1 GWh
        let flows = energy_balance(&cfg, &EquipmentSizing::new(0.0, 0.0, 100.0, 0.0));
        assert_relative_eq!(flows.heat_pump_heat_kwh, 800_000.0);
        assert_relative_eq!(flows.heat_pump_cooling_kwh, 1_000_000.0);
        assert_relative_eq!(flows.grid_heat_input_kwh, 4_200_000.0 / 2.5);
        assert_relative_eq!(flows.grid_cooling_input_kwh, 2_000_000.0 / 3.5);
    }

    #[test]
    fn no_source_exceeds_its_demand() {
        let cfg = reference();
        let big = EquipmentSizing::new(1e7, 1e7, 1e7, 0.0);
        let flows = energy_balance(&cfg, &big);
        assert!(flows.pv_supplied_kwh <= cfg.demand.electricity_kwh);
        assert!(flows.solar_thermal_heat_kwh + flows.heat_pump_heat_kwh <= cfg.demand.heat_kwh);
        assert!(flows.heat_pump_cooling_kwh <= cfg.demand.cooling_kwh);
        assert!(flows.total_grid_input_kwh >= 0.0);
    }

    #[test]
    fn storage_saving_formula() {
        let cfg = reference();
        // 1000 kWh * 300 cycles * 0.7 spread * 0.95 * 0.95
        assert_relative_eq!(
            storage_arbitrage_saving(&cfg, 1000.0),
            1000.0 * 300.0 * 0.7 * 0.9025,
            max_relative = 1e-12
        );
    }

    #[test]
    fn storage_saving_cannot_make_grid_cost_negative() {
        let cfg = reference();
        let flows = energy_balance(&cfg, &EquipmentSizing::new(0.0, 0.0, 0.0, 1e9));
        assert_eq!(flows.annual_grid_cost, 0.0);
        assert!(flows.storage_saving > 0.0);
    }
}
