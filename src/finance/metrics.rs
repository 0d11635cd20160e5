//! Payback period, internal rate of return, and net present value.

use std::fmt;

use serde::Serialize;

use super::cash_flow::CashFlowSeries;

/// Starting point of the Newton iteration.
const IRR_INITIAL_GUESS: f64 = 0.1;
const NEWTON_MAX_ITERATIONS: usize = 100;
const BISECTION_MAX_ITERATIONS: usize = 300;
/// Lower brackets tried in turn, `-1 + 10^-k`; long series overflow the
/// NPV close to -100 %, so the bracket backs off toward zero.
const BRACKET_FLOOR_EXPONENTS: [i32; 6] = [6, 5, 4, 3, 2, 1];
/// Highest rate tried when bracketing.
const BRACKET_CEILING: f64 = 1.0e6;
const RATE_TOLERANCE: f64 = 1.0e-12;
/// NPV tolerance relative to the largest absolute cash flow.
const NPV_RELATIVE_TOLERANCE: f64 = 1.0e-10;

/// Time until the cumulative after-tax cash flow turns non-negative.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(tag = "status", content = "years", rename_all = "snake_case")]
pub enum Payback {
    /// Cumulative cash flow is already non-negative at year 0.
    Immediate,
    /// Fractional years to break even.
    Years(f64),
    /// The investment is never recovered within the project life.
    NotRecovered,
    /// The site has no energy demand to save against.
    NoDemand,
}

impl Payback {
    /// Numeric payback; unrecoverable states map to `+inf`.
    pub fn years(&self) -> f64 {
        match self {
            Payback::Immediate => 0.0,
            Payback::Years(y) => *y,
            Payback::NotRecovered | Payback::NoDemand => f64::INFINITY,
        }
    }

    pub fn is_recovered(&self) -> bool {
        matches!(self, Payback::Immediate | Payback::Years(_))
    }
}

impl fmt::Display for Payback {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Payback::Immediate => write!(f, "immediate"),
            Payback::Years(y) => write!(f, "{y:.2} years"),
            Payback::NotRecovered => write!(f, "N/A (not recovered)"),
            Payback::NoDemand => write!(f, "N/A (no energy demand)"),
        }
    }
}

/// Why an IRR could not be reported.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum IrrUndefined {
    /// The site has no energy demand.
    NoDemand,
    /// No year after the first has a positive cash flow.
    NoPositiveFlow,
    /// The year-0 flow is not an investment (not negative).
    NonNegativeInvestment,
    /// The root finder found no rate that zeroes the NPV.
    NotConverged,
}

impl fmt::Display for IrrUndefined {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let reason = match self {
            IrrUndefined::NoDemand => "no energy demand",
            IrrUndefined::NoPositiveFlow => "no positive cash flow",
            IrrUndefined::NonNegativeInvestment => "initial investment is not negative",
            IrrUndefined::NotConverged => "no convergent rate",
        };
        f.write_str(reason)
    }
}

/// Internal rate of return or the reason it is undefined.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(tag = "status", content = "value", rename_all = "snake_case")]
pub enum Irr {
    /// Rate as a fraction (0.1 = 10 %).
    Rate(f64),
    Undefined(IrrUndefined),
}

impl Irr {
    pub fn rate(&self) -> Option<f64> {
        match self {
            Irr::Rate(r) => Some(*r),
            Irr::Undefined(_) => None,
        }
    }
}

impl fmt::Display for Irr {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Irr::Rate(r) => write!(f, "{:.2} %", r * 100.0),
            Irr::Undefined(reason) => write!(f, "N/A ({reason})"),
        }
    }
}

/// Metrics derived from one cash-flow series.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FinancialMetricsResult {
    pub payback: Payback,
    pub irr: Irr,
    /// NPV at the configured discount rate.
    pub npv: f64,
    /// The series the metrics were computed from.
    pub cash_flows: CashFlowSeries,
}

impl FinancialMetricsResult {
    /// Computes all three metrics from a series.
    pub fn from_cash_flows(cash_flows: CashFlowSeries, discount_rate: f64) -> Self {
        let flows = cash_flows.as_slice();
        Self {
            payback: payback_period(flows),
            irr: internal_rate_of_return(flows),
            npv: net_present_value(discount_rate, flows),
            cash_flows,
        }
    }

    /// Result for a site without demand: zero flows and "no demand" sentinels.
    pub fn no_demand(lifespan_years: u32) -> Self {
        Self {
            payback: Payback::NoDemand,
            irr: Irr::Undefined(IrrUndefined::NoDemand),
            npv: 0.0,
            cash_flows: CashFlowSeries::zeros(lifespan_years),
        }
    }
}

/// `Σ CF_t / (1 + rate)^t` with the first flow undiscounted.
pub fn net_present_value(rate: f64, flows: &[f64]) -> f64 {
    let factor = 1.0 + rate;
    flows
        .iter()
        .enumerate()
        .map(|(t, cf)| cf / factor.powi(t as i32))
        .sum()
}

/// First derivative of [`net_present_value`] with respect to the rate.
fn npv_derivative(rate: f64, flows: &[f64]) -> f64 {
    let factor = 1.0 + rate;
    flows
        .iter()
        .enumerate()
        .skip(1)
        .map(|(t, cf)| -(t as f64) * cf / factor.powi(t as i32 + 1))
        .sum()
}

/// Fractional payback year from the cumulative cash flow.
///
/// The cumulative series must end non-negative; otherwise the investment is
/// not recovered. Within the break-even year the remaining deficit is
/// interpolated linearly.
pub fn payback_period(flows: &[f64]) -> Payback {
    let cumulative: Vec<f64> = CashFlowSeries::new(flows.to_vec()).cumulative();
    let Some(&last) = cumulative.last() else {
        return Payback::NotRecovered;
    };
    if last < 0.0 {
        return Payback::NotRecovered;
    }
    if cumulative[0] >= 0.0 {
        return Payback::Immediate;
    }

    cumulative
        .windows(2)
        .enumerate()
        .find(|(_, w)| w[0] < 0.0 && w[1] >= 0.0)
        .map_or(Payback::NotRecovered, |(i, w)| {
            Payback::Years(i as f64 + w[0].abs() / flows[i + 1])
        })
}

/// IRR of a conventional investment series.
///
/// Requires at least one positive flow after year 0 and a negative year-0
/// flow; solved with Newton's method, falling back to bisection.
pub fn internal_rate_of_return(flows: &[f64]) -> Irr {
    if !flows.iter().skip(1).any(|cf| *cf > 0.0) {
        return Irr::Undefined(IrrUndefined::NoPositiveFlow);
    }
    if flows[0] >= 0.0 {
        return Irr::Undefined(IrrUndefined::NonNegativeInvestment);
    }
    match solve_irr(flows) {
        Some(rate) => Irr::Rate(rate),
        None => Irr::Undefined(IrrUndefined::NotConverged),
    }
}

/// Finds a rate in `(-1, BRACKET_CEILING]` where the NPV is zero.
fn solve_irr(flows: &[f64]) -> Option<f64> {
    let scale = flows.iter().fold(0.0_f64, |m, cf| m.max(cf.abs()));
    let tolerance = NPV_RELATIVE_TOLERANCE * scale.max(1.0);
    newton(flows, tolerance).or_else(|| bisection(flows, tolerance))
}

fn newton(flows: &[f64], tolerance: f64) -> Option<f64> {
    let mut rate = IRR_INITIAL_GUESS;
    for _ in 0..NEWTON_MAX_ITERATIONS {
        let value = net_present_value(rate, flows);
        if !value.is_finite() {
            return None;
        }
        if value.abs() <= tolerance {
            return Some(rate);
        }
        let slope = npv_derivative(rate, flows);
        if slope == 0.0 || !slope.is_finite() {
            return None;
        }
        let next = rate - value / slope;
        if !next.is_finite() || next <= -1.0 || next > BRACKET_CEILING {
            return None;
        }
        if (next - rate).abs() < RATE_TOLERANCE {
            let residual = net_present_value(next, flows).abs();
            return (residual <= tolerance).then_some(next);
        }
        rate = next;
    }
    None
}

fn bisection(flows: &[f64], tolerance: f64) -> Option<f64> {
    let (mut lo, lo_value) = BRACKET_FLOOR_EXPONENTS
        .iter()
        .map(|&k| -1.0 + 10f64.powi(-k))
        .map(|rate| (rate, net_present_value(rate, flows)))
        .find(|(_, value)| value.is_finite())?;

    let mut hi = 1.0;
    let mut hi_value = net_present_value(hi, flows);
    while hi_value.signum() == lo_value.signum() {
        if hi >= BRACKET_CEILING {
            return None;
        }
        hi = (hi * 2.0).min(BRACKET_CEILING);
        hi_value = net_present_value(hi, flows);
    }

    for _ in 0..BISECTION_MAX_ITERATIONS {
        let mid = 0.5 * (lo + hi);
        let mid_value = net_present_value(mid, flows);
        if mid_value.abs() <= tolerance || (hi - lo) < RATE_TOLERANCE {
            return Some(mid);
        }
        if mid_value.signum() == lo_value.signum() {
            lo = mid;
        } else {
            hi = mid;
        }
    }
    None
}
