//! Site configuration and equipment sizing records consumed by the model.

use serde::{Deserialize, Serialize};

use crate::error::ModelError;

/// Annual end-use demand of the site.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Demand {
    /// Electricity demand (kWh/year).
    pub electricity_kwh: f64,
    /// Heat demand (kWh thermal/year).
    pub heat_kwh: f64,
    /// Cooling demand (kWh cooling/year).
    pub cooling_kwh: f64,
}

impl Demand {
    /// Sum of the three end uses.
    pub fn total_kwh(&self) -> f64 {
        self.electricity_kwh + self.heat_kwh + self.cooling_kwh
    }
}

/// Time-of-use grid tariff.
///
/// The shoulder fraction is never stored; it is derived as
/// `1 - peak - valley` and clamped at zero.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Tariff {
    /// Flat reference price (per kWh). Reported only.
    pub static_price: f64,
    /// Peak period price (per kWh).
    pub peak_price: f64,
    /// Valley period price (per kWh).
    pub valley_price: f64,
    /// Shoulder period price (per kWh).
    pub shoulder_price: f64,
    /// Share of the year in the peak period (0.0–1.0).
    pub peak_fraction: f64,
    /// Share of the year in the valley period (0.0–1.0).
    pub valley_fraction: f64,
}

impl Tariff {
    /// Remaining share of the year, clamped at zero.
    pub fn shoulder_fraction(&self) -> f64 {
        (1.0 - self.peak_fraction - self.valley_fraction).max(0.0)
    }

    /// Whether peak and valley fractions together exceed the whole year.
    pub fn fractions_overflow(&self) -> bool {
        1.0 - self.peak_fraction - self.valley_fraction < -1e-9
    }
}

/// Conversion efficiencies of the grid-only reference plant.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct BaselineEfficiency {
    /// Average heating COP of grid-driven heating.
    pub cop: f64,
    /// Average cooling EER of grid-driven cooling.
    pub eer: f64,
}

/// Solar-thermal collector performance and cost.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct SolarThermalSpec {
    /// Mean collected heat per m² per effective sun hour (kWh/m²/h).
    pub yield_kwh_per_m2_hr: f64,
    /// Installed cost per m².
    pub cost_per_m2: f64,
    /// Effective sun hours per year.
    pub annual_sun_hours: f64,
}

/// Photovoltaic array performance and cost.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct PhotovoltaicSpec {
    /// Mean generation per m² per effective sun hour (kWh/m²/h).
    pub yield_kwh_per_m2_hr: f64,
    /// Installed cost per m².
    pub cost_per_m2: f64,
    /// Effective generation hours per year.
    pub annual_sun_hours: f64,
}

/// Heat pump / chiller performance and cost.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct HeatPumpSpec {
    /// Heating COP.
    pub cop: f64,
    /// Cooling EER.
    pub eer: f64,
    /// Installed cost per kW of capacity.
    pub cost_per_kw: f64,
}

/// Electrical storage performance and cost.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct StorageSpec {
    /// Charge efficiency (0.0–1.0).
    pub charge_efficiency: f64,
    /// Discharge efficiency (0.0–1.0).
    pub discharge_efficiency: f64,
    /// Installed cost per kWh of capacity.
    pub cost_per_kwh: f64,
    /// Equivalent full cycles per year used for arbitrage.
    pub cycles_per_year: f64,
}

/// Project-level economic assumptions.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Economics {
    /// Project lifespan in years; the cash-flow series has `lifespan + 1` entries.
    pub lifespan_years: u32,
    /// Annual OPEX as a fraction of total CAPEX.
    pub opex_fraction: f64,
    /// Corporate tax rate (0.0–1.0).
    pub tax_rate: f64,
    /// Discount rate used for NPV.
    pub discount_rate: f64,
    /// Straight-line depreciation period in years (0 disables depreciation).
    pub depreciation_years: u32,
}

/// Immutable configuration of one analysis session.
///
/// Every field must be supplied; the model functions never fall back to
/// defaults. Scenario files and presets in [`crate::config`] are the place
/// where defaults are filled in.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Configuration {
    pub demand: Demand,
    pub tariff: Tariff,
    pub baseline: BaselineEfficiency,
    pub solar_thermal: SolarThermalSpec,
    pub photovoltaic: PhotovoltaicSpec,
    pub heat_pump: HeatPumpSpec,
    pub storage: StorageSpec,
    pub economics: Economics,
}

impl Configuration {
    /// Rejects values the model cannot compute with.
    ///
    /// Narrower than [`crate::config::ScenarioConfig::validate`]:
    /// negative prices or over-range fractions are accepted here, while
    /// anything that would divide by zero or propagate NaN is not.
    ///
    /// # Errors
    ///
    /// Returns [`ModelError::InvalidInput`] naming the first offending field.
    pub fn check(&self) -> Result<(), ModelError> {
        let finite = [
            ("demand.electricity_kwh", self.demand.electricity_kwh),
            ("demand.heat_kwh", self.demand.heat_kwh),
            ("demand.cooling_kwh", self.demand.cooling_kwh),
            ("tariff.static_price", self.tariff.static_price),
            ("tariff.peak_price", self.tariff.peak_price),
            ("tariff.valley_price", self.tariff.valley_price),
            ("tariff.shoulder_price", self.tariff.shoulder_price),
            ("tariff.peak_fraction", self.tariff.peak_fraction),
            ("tariff.valley_fraction", self.tariff.valley_fraction),
            ("solar_thermal.yield_kwh_per_m2_hr", self.solar_thermal.yield_kwh_per_m2_hr),
            ("solar_thermal.cost_per_m2", self.solar_thermal.cost_per_m2),
            ("solar_thermal.annual_sun_hours", self.solar_thermal.annual_sun_hours),
            ("photovoltaic.yield_kwh_per_m2_hr", self.photovoltaic.yield_kwh_per_m2_hr),
            ("photovoltaic.cost_per_m2", self.photovoltaic.cost_per_m2),
            ("photovoltaic.annual_sun_hours", self.photovoltaic.annual_sun_hours),
            ("heat_pump.cost_per_kw", self.heat_pump.cost_per_kw),
            ("storage.charge_efficiency", self.storage.charge_efficiency),
            ("storage.discharge_efficiency", self.storage.discharge_efficiency),
            ("storage.cost_per_kwh", self.storage.cost_per_kwh),
            ("storage.cycles_per_year", self.storage.cycles_per_year),
            ("economics.opex_fraction", self.economics.opex_fraction),
            ("economics.tax_rate", self.economics.tax_rate),
            ("economics.discount_rate", self.economics.discount_rate),
        ];
        for (field, value) in finite {
            if !value.is_finite() {
                return Err(ModelError::invalid(field, format!("must be finite, got {value}")));
            }
        }

        let divisors = [
            ("baseline.cop", self.baseline.cop),
            ("baseline.eer", self.baseline.eer),
            ("heat_pump.cop", self.heat_pump.cop),
            ("heat_pump.eer", self.heat_pump.eer),
        ];
        for (field, value) in divisors {
            if !(value.is_finite() && value > 0.0) {
                return Err(ModelError::invalid(field, format!("must be > 0, got {value}")));
            }
        }

        if self.economics.discount_rate <= -1.0 {
            return Err(ModelError::invalid(
                "economics.discount_rate",
                format!("must be > -1, got {}", self.economics.discount_rate),
            ));
        }

        Ok(())
    }
}

/// The four sizing decision variables.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct EquipmentSizing {
    /// Solar-thermal collector area (m²).
    pub solar_thermal_area_m2: f64,
    /// Photovoltaic array area (m²).
    pub pv_area_m2: f64,
    /// Heat pump / chiller capacity (kW).
    pub heat_pump_kw: f64,
    /// Storage capacity (kWh).
    pub storage_kwh: f64,
}

impl EquipmentSizing {
    pub fn new(solar_thermal_area_m2: f64, pv_area_m2: f64, heat_pump_kw: f64, storage_kwh: f64) -> Self {
        Self {
            solar_thermal_area_m2,
            pv_area_m2,
            heat_pump_kw,
            storage_kwh,
        }
    }

    /// Sizing values in axis order: solar thermal, PV, heat pump, storage.
    pub fn as_array(&self) -> [f64; 4] {
        [
            self.solar_thermal_area_m2,
            self.pv_area_m2,
            self.heat_pump_kw,
            self.storage_kwh,
        ]
    }

    pub fn from_array(values: [f64; 4]) -> Self {
        Self::new(values[0], values[1], values[2], values[3])
    }

    /// # Errors
    ///
    /// Returns [`ModelError::InvalidInput`] for a negative or non-finite value.
    pub fn check(&self) -> Result<(), ModelError> {
        let named = [
            ("sizing.solar_thermal_area_m2", self.solar_thermal_area_m2),
            ("sizing.pv_area_m2", self.pv_area_m2),
            ("sizing.heat_pump_kw", self.heat_pump_kw),
            ("sizing.storage_kwh", self.storage_kwh),
        ];
        for (field, value) in named {
            if !(value.is_finite() && value >= 0.0) {
                return Err(ModelError::invalid(field, format!("must be finite and >= 0, got {value}")));
            }
        }
        Ok(())
    }
}
