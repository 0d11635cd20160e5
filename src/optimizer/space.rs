//! Discretised four-axis sizing space.

use itertools::iproduct;
use serde::{Deserialize, Serialize};

use crate::error::OptimizeError;
use crate::model::types::EquipmentSizing;

/// Axis names in sizing order.
pub const AXIS_NAMES: [&str; 4] = ["solar_thermal_area_m2", "pv_area_m2", "heat_pump_kw", "storage_kwh"];

/// Step granularity each axis snaps to (m², m², kW, kWh).
pub const AXIS_GRANULARITY: [f64; 4] = [50.0, 100.0, 10.0, 50.0];

/// Number of evenly spaced points per axis in the reference space.
pub const REFERENCE_STEPS: usize = 6;

/// Largest grid the optimizer will enumerate.
pub const MAX_CANDIDATES: usize = 1_000_000;

/// One evenly spaced search axis, endpoints included.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Axis {
    pub min: f64,
    pub max: f64,
    /// Number of grid points (>= 1).
    pub steps: usize,
}

impl Axis {
    pub fn new(min: f64, max: f64, steps: usize) -> Self {
        Self { min, max, steps }
    }

    /// Grid points from `min` to `max`; a single step yields just `min`.
    pub fn points(&self) -> Vec<f64> {
        if self.steps <= 1 {
            return vec![self.min];
        }
        let last = self.steps - 1;
        let delta = (self.max - self.min) / last as f64;
        (0..self.steps)
            .map(|i| if i == last { self.max } else { self.min + i as f64 * delta })
            .collect()
    }

    fn check(&self, name: &'static str) -> Result<(), OptimizeError> {
        let invalid = |reason: String| OptimizeError::InvalidAxis { axis: name, reason };
        if self.steps == 0 {
            return Err(invalid("steps must be >= 1".into()));
        }
        if self.steps > MAX_CANDIDATES {
            return Err(invalid(format!(
                "steps must be <= {MAX_CANDIDATES}, got {}",
                self.steps
            )));
        }
        if !(self.min.is_finite() && self.max.is_finite()) {
            return Err(invalid(format!("bounds must be finite, got [{}, {}]", self.min, self.max)));
        }
        if self.min < 0.0 {
            return Err(invalid(format!("min must be >= 0, got {}", self.min)));
        }
        if self.min > self.max {
            return Err(invalid(format!("min ({}) must be <= max ({})", self.min, self.max)));
        }
        Ok(())
    }
}

/// Rounds `value` to the nearest multiple of `granularity` (ties to even),
/// then clamps it into the axis bounds.
pub fn snap_to_axis(value: f64, granularity: f64, axis: &Axis) -> f64 {
    ((value / granularity).round_ties_even() * granularity).clamp(axis.min, axis.max)
}

/// Bounds and resolution of the four sizing axes.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct SearchSpace {
    pub solar_thermal_area_m2: Axis,
    pub pv_area_m2: Axis,
    pub heat_pump_kw: Axis,
    pub storage_kwh: Axis,
}

impl Default for SearchSpace {
    /// Reference bounds, six points per axis.
    fn default() -> Self {
        Self {
            solar_thermal_area_m2: Axis::new(0.0, 5000.0, REFERENCE_STEPS),
            pv_area_m2: Axis::new(0.0, 10_000.0, REFERENCE_STEPS),
            heat_pump_kw: Axis::new(0.0, 2000.0, REFERENCE_STEPS),
            storage_kwh: Axis::new(0.0, 5000.0, REFERENCE_STEPS),
        }
    }
}

impl SearchSpace {
    /// Axes in sizing order.
    pub fn axes(&self) -> [Axis; 4] {
        [
            self.solar_thermal_area_m2,
            self.pv_area_m2,
            self.heat_pump_kw,
            self.storage_kwh,
        ]
    }

    /// # Errors
    ///
    /// Returns [`OptimizeError::InvalidAxis`] for the first malformed axis.
    /// Also rejects a grid larger than [`MAX_CANDIDATES`], naming the axis at
    /// which the running product crosses the limit.
    pub fn check(&self) -> Result<(), OptimizeError> {
        let mut total = 1usize;
        for (axis, name) in self.axes().iter().zip(AXIS_NAMES) {
            axis.check(name)?;
            total = total
                .checked_mul(axis.steps)
                .filter(|&n| n <= MAX_CANDIDATES)
                .ok_or_else(|| OptimizeError::InvalidAxis {
                    axis: name,
                    reason: format!("search grid exceeds {MAX_CANDIDATES} candidates"),
                })?;
        }
        Ok(())
    }

    /// Number of grid points in the Cartesian product, saturating at `usize::MAX`.
    pub fn size(&self) -> usize {
        self.axes()
            .iter()
            .fold(1usize, |n, a| n.saturating_mul(a.steps.max(1)))
    }

    /// Snaps and clamps a raw grid point.
    pub fn snap(&self, raw: [f64; 4]) -> EquipmentSizing {
        let axes = self.axes();
        let mut snapped = [0.0; 4];
        for (i, value) in raw.into_iter().enumerate() {
            snapped[i] = snap_to_axis(value, AXIS_GRANULARITY[i], &axes[i]);
        }
        EquipmentSizing::from_array(snapped)
    }

    /// All candidates in enumeration order (last axis varies fastest), snapped.
    ///
    /// Assumes [`SearchSpace::check`] passed.
    pub fn candidates(&self) -> Vec<EquipmentSizing> {
        let [st, pv, hp, storage] = self.axes().map(|a| a.points());
        iproduct!(st, pv, hp, storage)
            .map(|(a, b, c, d)| self.snap([a, b, c, d]))
            .collect()
    }
}
