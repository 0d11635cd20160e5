//! TOML-based scenario configuration and preset definitions.
//!
//! A scenario bundles the site [`Configuration`], a sizing to evaluate, and
//! optimizer settings. Missing sections fall back to the reference
//! industrial-park values; a section that is present must be complete.

use std::fs;
use std::path::Path;

use serde::Deserialize;
use thiserror::Error;

use crate::error::OptimizeError;
use crate::model::types::{
    BaselineEfficiency, Configuration, Demand, Economics, EquipmentSizing, HeatPumpSpec,
    PhotovoltaicSpec, SolarThermalSpec, StorageSpec, Tariff,
};
use crate::optimizer::{Objective, SearchSpace};

/// Top-level scenario configuration parsed from TOML.
#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ScenarioConfig {
    /// Annual end-use demand.
    #[serde(default)]
    pub demand: Demand,
    /// Time-of-use grid tariff.
    #[serde(default)]
    pub tariff: Tariff,
    /// Grid-only reference efficiencies.
    #[serde(default)]
    pub baseline: BaselineEfficiency,
    #[serde(default)]
    pub solar_thermal: SolarThermalSpec,
    #[serde(default)]
    pub photovoltaic: PhotovoltaicSpec,
    #[serde(default)]
    pub heat_pump: HeatPumpSpec,
    #[serde(default)]
    pub storage: StorageSpec,
    /// Lifespan, tax, discounting and depreciation.
    #[serde(default)]
    pub economics: Economics,
    /// Sizing used by `evaluate`; zero by default.
    #[serde(default)]
    pub sizing: EquipmentSizing,
    /// Optimizer settings.
    #[serde(default)]
    pub search: SearchConfig,
}

/// Optimizer settings.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct SearchConfig {
    /// `"irr"`, `"payback"` or `"npv"`.
    pub objective: Objective,
    /// Evaluate candidates in parallel.
    pub parallel: bool,
    /// Per-axis bounds; unspecified axes use the reference bounds.
    pub axes: SearchSpace,
}

impl Default for Demand {
    fn default() -> Self {
        Self {
            electricity_kwh: 10_000_000.0,
            heat_kwh: 5_000_000.0,
            cooling_kwh: 3_000_000.0,
        }
    }
}

impl Default for Tariff {
    fn default() -> Self {
        Self {
            static_price: 0.8,
            peak_price: 1.2,
            valley_price: 0.5,
            shoulder_price: 0.8,
            peak_fraction: 0.20,
            valley_fraction: 0.35,
        }
    }
}

impl Default for BaselineEfficiency {
    fn default() -> Self {
        Self { cop: 2.5, eer: 3.5 }
    }
}

impl Default for SolarThermalSpec {
    fn default() -> Self {
        Self {
            yield_kwh_per_m2_hr: 0.5,
            cost_per_m2: 1500.0,
            annual_sun_hours: 1500.0,
        }
    }
}

impl Default for PhotovoltaicSpec {
    fn default() -> Self {
        Self {
            yield_kwh_per_m2_hr: 0.15,
            cost_per_m2: 1000.0,
            annual_sun_hours: 1200.0,
        }
    }
}

impl Default for HeatPumpSpec {
    fn default() -> Self {
        Self {
            cop: 4.0,
            eer: 5.0,
            cost_per_kw: 2000.0,
        }
    }
}

impl Default for StorageSpec {
    fn default() -> Self {
        Self {
            charge_efficiency: 0.95,
            discharge_efficiency: 0.95,
            cost_per_kwh: 1500.0,
            cycles_per_year: 300.0,
        }
    }
}

impl Default for Economics {
    fn default() -> Self {
        Self {
            lifespan_years: 20,
            opex_fraction: 0.015,
            tax_rate: 0.25,
            discount_rate: 0.08,
            depreciation_years: 10,
        }
    }
}

/// Configuration error with field path and constraint description.
#[derive(Debug, Clone, PartialEq, Error)]
#[error("config error: {field}: {message}")]
pub struct ConfigError {
    /// Dotted field path (e.g., `"baseline.cop"`).
    pub field: String,
    /// Human-readable constraint description.
    pub message: String,
}

impl ConfigError {
    fn new(field: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            field: field.into(),
            message: message.into(),
        }
    }
}

impl ScenarioConfig {
    /// Reference industrial park: 10 GWh electricity, 5 GWh heat, 3 GWh cooling.
    pub fn industrial_park() -> Self {
        Self {
            demand: Demand::default(),
            tariff: Tariff::default(),
            baseline: BaselineEfficiency::default(),
            solar_thermal: SolarThermalSpec::default(),
            photovoltaic: PhotovoltaicSpec::default(),
            heat_pump: HeatPumpSpec::default(),
            storage: StorageSpec::default(),
            economics: Economics::default(),
            sizing: EquipmentSizing::default(),
            search: SearchConfig::default(),
        }
    }

    /// Sunny site with cheaper, higher-yield collectors and panels.
    pub fn solar_rich() -> Self {
        Self {
            solar_thermal: SolarThermalSpec {
                cost_per_m2: 1000.0,
                annual_sun_hours: 1800.0,
                ..SolarThermalSpec::default()
            },
            photovoltaic: PhotovoltaicSpec {
                yield_kwh_per_m2_hr: 0.2,
                cost_per_m2: 700.0,
                annual_sun_hours: 1500.0,
            },
            search: SearchConfig {
                objective: Objective::MaximizeNpv,
                ..SearchConfig::default()
            },
            ..Self::industrial_park()
        }
    }

    /// Wide peak/valley spread with inexpensive storage.
    pub fn arbitrage() -> Self {
        Self {
            tariff: Tariff {
                peak_price: 1.5,
                valley_price: 0.3,
                peak_fraction: 0.25,
                valley_fraction: 0.35,
                ..Tariff::default()
            },
            storage: StorageSpec {
                cost_per_kwh: 800.0,
                cycles_per_year: 330.0,
                ..StorageSpec::default()
            },
            search: SearchConfig {
                objective: Objective::MinimizePayback,
                ..SearchConfig::default()
            },
            ..Self::industrial_park()
        }
    }

    /// Available preset names.
    pub const PRESETS: &[&str] = &["industrial_park", "solar_rich", "arbitrage"];

    /// Loads a scenario from a named preset.
    ///
    /// # Errors
    ///
    /// Returns a `ConfigError` if the preset name is unknown.
    pub fn from_preset(name: &str) -> Result<Self, ConfigError> {
        match name {
            "industrial_park" => Ok(Self::industrial_park()),
            "solar_rich" => Ok(Self::solar_rich()),
            "arbitrage" => Ok(Self::arbitrage()),
            _ => Err(ConfigError::new(
                "preset",
                format!(
                    "unknown preset \"{name}\", available: {}",
                    Self::PRESETS.join(", ")
                ),
            )),
        }
    }

    /// Parses a scenario from a TOML file.
    ///
    /// # Errors
    ///
    /// Returns a `ConfigError` if the file cannot be read or the TOML is invalid.
    pub fn from_toml_file(path: &Path) -> Result<Self, ConfigError> {
        let content = fs::read_to_string(path).map_err(|e| {
            ConfigError::new("scenario", format!("cannot read \"{}\": {e}", path.display()))
        })?;
        Self::from_toml_str(&content)
    }

    /// Parses a scenario from a TOML string.
    ///
    /// # Errors
    ///
    /// Returns a `ConfigError` if the TOML is invalid or contains unknown fields.
    pub fn from_toml_str(s: &str) -> Result<Self, ConfigError> {
        toml::from_str(s).map_err(|e| ConfigError::new("toml", e.to_string()))
    }

    /// The site configuration handed to the model.
    pub fn configuration(&self) -> Configuration {
        Configuration {
            demand: self.demand.clone(),
            tariff: self.tariff.clone(),
            baseline: self.baseline.clone(),
            solar_thermal: self.solar_thermal.clone(),
            photovoltaic: self.photovoltaic.clone(),
            heat_pump: self.heat_pump.clone(),
            storage: self.storage.clone(),
            economics: self.economics.clone(),
        }
    }

    /// Validates all fields and returns a list of errors.
    ///
    /// Returns an empty vector if configuration is valid. Over-range tariff
    /// fractions are reported by [`ScenarioConfig::warnings`] instead.
    pub fn validate(&self) -> Vec<ConfigError> {
        let mut errors = Vec::new();

        let non_negative = [
            ("demand.electricity_kwh", self.demand.electricity_kwh),
            ("demand.heat_kwh", self.demand.heat_kwh),
            ("demand.cooling_kwh", self.demand.cooling_kwh),
            ("tariff.static_price", self.tariff.static_price),
            ("tariff.peak_price", self.tariff.peak_price),
            ("tariff.valley_price", self.tariff.valley_price),
            ("tariff.shoulder_price", self.tariff.shoulder_price),
            ("solar_thermal.yield_kwh_per_m2_hr", self.solar_thermal.yield_kwh_per_m2_hr),
            ("solar_thermal.cost_per_m2", self.solar_thermal.cost_per_m2),
            ("solar_thermal.annual_sun_hours", self.solar_thermal.annual_sun_hours),
            ("photovoltaic.yield_kwh_per_m2_hr", self.photovoltaic.yield_kwh_per_m2_hr),
            ("photovoltaic.cost_per_m2", self.photovoltaic.cost_per_m2),
            ("photovoltaic.annual_sun_hours", self.photovoltaic.annual_sun_hours),
            ("heat_pump.cost_per_kw", self.heat_pump.cost_per_kw),
            ("storage.cost_per_kwh", self.storage.cost_per_kwh),
            ("storage.cycles_per_year", self.storage.cycles_per_year),
            ("economics.opex_fraction", self.economics.opex_fraction),
            ("sizing.solar_thermal_area_m2", self.sizing.solar_thermal_area_m2),
            ("sizing.pv_area_m2", self.sizing.pv_area_m2),
            ("sizing.heat_pump_kw", self.sizing.heat_pump_kw),
            ("sizing.storage_kwh", self.sizing.storage_kwh),
        ];
        for (field, value) in non_negative {
            if !(value.is_finite() && value >= 0.0) {
                errors.push(ConfigError::new(field, format!("must be finite and >= 0, got {value}")));
            }
        }

        let positive = [
            ("baseline.cop", self.baseline.cop),
            ("baseline.eer", self.baseline.eer),
            ("heat_pump.cop", self.heat_pump.cop),
            ("heat_pump.eer", self.heat_pump.eer),
        ];
        for (field, value) in positive {
            if !(value.is_finite() && value > 0.0) {
                errors.push(ConfigError::new(field, format!("must be > 0, got {value}")));
            }
        }

        let unit_interval = [
            ("tariff.peak_fraction", self.tariff.peak_fraction),
            ("tariff.valley_fraction", self.tariff.valley_fraction),
            ("storage.charge_efficiency", self.storage.charge_efficiency),
            ("storage.discharge_efficiency", self.storage.discharge_efficiency),
            ("economics.tax_rate", self.economics.tax_rate),
        ];
        for (field, value) in unit_interval {
            if !(0.0..=1.0).contains(&value) {
                errors.push(ConfigError::new(field, format!("must be in [0.0, 1.0], got {value}")));
            }
        }

        let econ = &self.economics;
        if econ.lifespan_years == 0 {
            errors.push(ConfigError::new("economics.lifespan_years", "must be > 0"));
        }
        if econ.depreciation_years == 0 {
            errors.push(ConfigError::new("economics.depreciation_years", "must be > 0"));
        }
        if !(econ.discount_rate.is_finite() && econ.discount_rate > -1.0) {
            errors.push(ConfigError::new(
                "economics.discount_rate",
                format!("must be > -1.0, got {}", econ.discount_rate),
            ));
        }

        if let Err(e) = self.search.axes.check() {
            let field = match &e {
                OptimizeError::InvalidAxis { axis, .. } => format!("search.axes.{axis}"),
                _ => "search.axes".to_string(),
            };
            errors.push(ConfigError::new(field, e.to_string()));
        }

        errors
    }

    /// Non-fatal issues worth surfacing to the user.
    pub fn warnings(&self) -> Vec<String> {
        let mut warnings = Vec::new();
        if self.tariff.fractions_overflow() {
            warnings.push(format!(
                "tariff.peak_fraction + tariff.valley_fraction = {:.3} exceeds 1; shoulder fraction clamped to 0",
                self.tariff.peak_fraction + self.tariff.valley_fraction
            ));
        }
        warnings
    }
}
