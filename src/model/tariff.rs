//! Blending of a time-of-use tariff into a single average price.

use super::types::Tariff;

/// Time-weighted average of three period prices.
///
/// Fractions are normalised to sum to one. When all fractions are zero the
/// unweighted mean of the three prices is returned instead.
///
/// # Examples
///
/// ```
/// use efinops::model::tariff::blended_price;
///
/// let p = blended_price(1.2, 0.5, 0.8, 0.2, 0.35, 0.45);
/// assert!((p - 0.775).abs() < 1e-12);
/// ```
pub fn blended_price(
    peak_price: f64,
    valley_price: f64,
    shoulder_price: f64,
    peak_fraction: f64,
    valley_fraction: f64,
    shoulder_fraction: f64,
) -> f64 {
    let total = peak_fraction + valley_fraction + shoulder_fraction;
    if total == 0.0 {
        return (peak_price + valley_price + shoulder_price) / 3.0;
    }

    peak_price * (peak_fraction / total)
        + valley_price * (valley_fraction / total)
        + shoulder_price * (shoulder_fraction / total)
}

impl Tariff {
    /// Blended price using the derived (clamped) shoulder fraction.
    pub fn blended_price(&self) -> f64 {
        blended_price(
            self.peak_price,
            self.valley_price,
            self.shoulder_price,
            self.peak_fraction,
            self.valley_fraction,
            self.shoulder_fraction(),
        )
    }

    /// Price spread captured per kWh shifted from valley to peak.
    pub fn peak_valley_spread(&self) -> f64 {
        self.peak_price - self.valley_price
    }
}
