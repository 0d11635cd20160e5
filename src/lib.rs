//! Sizing and investment appraisal for mixed energy supply systems.
//!
//! An industrial site's electricity, heat, and cooling demand is met by a
//! mix of solar thermal collectors, photovoltaics, heat pumps, and battery
//! storage, with the grid covering the remainder. [`evaluate`] prices one
//! sizing against a grid-only baseline; [`optimize`] grid-searches the
//! sizing that best serves an investment objective.

#[cfg(feature = "api")]
pub mod api;
pub mod cli;
pub mod config;
pub mod error;
/// Cash flows, payback, IRR, and NPV.
pub mod finance;
pub mod io;
pub mod model;
pub mod optimizer;

pub use error::{ModelError, OptimizeError};
pub use model::{Configuration, EquipmentSizing, Evaluation, evaluate};
pub use optimizer::{Objective, OptimizationOutcome, SearchSpace, optimize};
