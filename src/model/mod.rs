//! Techno-economic model of the mixed supply installation.

/// Grid-only reference plant.
pub mod baseline;
pub mod cost;
pub mod energy_balance;
pub mod engine;
/// Time-of-use tariff blending.
pub mod tariff;
pub mod types;

pub use engine::{Evaluation, evaluate};
pub use types::{Configuration, EquipmentSizing};
