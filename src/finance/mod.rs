//! Cash-flow generation and investment metrics.

pub mod cash_flow;
pub mod metrics;

pub use cash_flow::CashFlowSeries;
pub use metrics::{FinancialMetricsResult, Irr, IrrUndefined, Payback};
