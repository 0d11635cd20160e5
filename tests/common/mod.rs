//! Shared test fixtures for integration tests.

use efinops::config::ScenarioConfig;
use efinops::model::types::Configuration;
use efinops::optimizer::{Axis, SearchSpace};

/// Reference industrial park (10 / 5 / 3 GWh demand).
pub fn reference_config() -> Configuration {
    ScenarioConfig::industrial_park().configuration()
}

/// Electricity-only site with a flat tariff and cheap PV.
///
/// Heat and cooling demand are zero and peak equals valley, so solar
/// thermal, heat pumps and storage only add cost. PV is the sole
/// profitable asset.
pub fn pv_dominant_config() -> Configuration {
    let mut cfg = reference_config();
    cfg.demand.electricity_kwh = 4_000_000.0;
    cfg.demand.heat_kwh = 0.0;
    cfg.demand.cooling_kwh = 0.0;
    cfg.tariff.peak_price = 0.8;
    cfg.tariff.valley_price = 0.8;
    cfg.tariff.shoulder_price = 0.8;
    cfg.photovoltaic.cost_per_m2 = 500.0;
    cfg
}

/// Reference bounds with three points per axis (81 candidates).
pub fn coarse_space() -> SearchSpace {
    SearchSpace {
        solar_thermal_area_m2: Axis::new(0.0, 5000.0, 3),
        pv_area_m2: Axis::new(0.0, 10_000.0, 3),
        heat_pump_kw: Axis::new(0.0, 2000.0, 3),
        storage_kwh: Axis::new(0.0, 5000.0, 3),
    }
}
