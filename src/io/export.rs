//! CSV export for cash-flow tables and optimizer candidate traces.

use std::fs::File;
use std::io::{self, Write};
use std::path::Path;

use crate::finance::cash_flow::depreciation_schedule;
use crate::model::engine::Evaluation;
use crate::model::types::Economics;
use crate::optimizer::CandidateRecord;

/// Column header for the cash-flow table.
const CASH_FLOW_HEADER: &str = "year,depreciation,cash_flow,cumulative,discounted";

/// Column header for the candidate trace.
const CANDIDATES_HEADER: &str = "index,solar_thermal_area_m2,pv_area_m2,heat_pump_kw,\
                                 storage_kwh,objective_value,skip_reason";

/// Exports the year-by-year cash-flow table of an evaluation to a CSV file.
///
/// # Arguments
///
/// * `evaluation` - Evaluation whose cash-flow series is written
/// * `economics` - Depreciation period and discount rate of the series
/// * `path` - Output file path
///
/// # Errors
///
/// Returns an `io::Error` if file creation or writing fails.
pub fn export_cash_flow_csv(
    evaluation: &Evaluation,
    economics: &Economics,
    path: &Path,
) -> io::Result<()> {
    let file = File::create(path)?;
    let buf = io::BufWriter::new(file);
    write_cash_flow_csv(evaluation, economics, buf)
}

/// Writes the cash-flow table as CSV to any writer.
///
/// One row per year `0..=lifespan`. `discounted` is the flow discounted at
/// `economics.discount_rate`; the discounted column sums to the NPV.
///
/// # Arguments
///
/// * `evaluation` - Evaluation whose cash-flow series is written
/// * `economics` - Depreciation period and discount rate of the series
/// * `writer` - Destination implementing `Write`
///
/// # Errors
///
/// Returns an `io::Error` if writing fails.
pub fn write_cash_flow_csv(
    evaluation: &Evaluation,
    economics: &Economics,
    writer: impl Write,
) -> io::Result<()> {
    let mut wtr = csv::WriterBuilder::new().from_writer(writer);
    wtr.write_record(CASH_FLOW_HEADER.split(','))?;

    let flows = &evaluation.metrics.cash_flows;
    let depreciation = depreciation_schedule(evaluation.costs.total_capex, economics);
    let cumulative = flows.cumulative();
    let base = 1.0 + economics.discount_rate;

    for (year, (&cash_flow, &running)) in flows.as_slice().iter().zip(&cumulative).enumerate() {
        let dep = depreciation.get(year).copied().unwrap_or(0.0);
        let discounted = cash_flow / base.powi(year as i32);
        wtr.write_record(&[
            year.to_string(),
            format!("{dep:.2}"),
            format!("{cash_flow:.2}"),
            format!("{running:.2}"),
            format!("{discounted:.2}"),
        ])?;
    }

    wtr.flush()?;
    Ok(())
}

/// Exports the optimizer candidate trace to a CSV file.
///
/// # Arguments
///
/// * `candidates` - Candidate records in enumeration order
/// * `path` - Output file path
///
/// # Errors
///
/// Returns an `io::Error` if file creation or writing fails.
pub fn export_candidates_csv(candidates: &[CandidateRecord], path: &Path) -> io::Result<()> {
    let file = File::create(path)?;
    let buf = io::BufWriter::new(file);
    write_candidates_csv(candidates, buf)
}

/// Writes the candidate trace as CSV to any writer.
///
/// Skipped candidates leave `objective_value` empty and carry a reason.
///
/// # Arguments
///
/// * `candidates` - Candidate records in enumeration order
/// * `writer` - Destination implementing `Write`
///
/// # Errors
///
/// Returns an `io::Error` if writing fails.
pub fn write_candidates_csv(candidates: &[CandidateRecord], writer: impl Write) -> io::Result<()> {
    let mut wtr = csv::WriterBuilder::new().from_writer(writer);
    wtr.write_record(CANDIDATES_HEADER.split(',').map(str::trim))?;

    for c in candidates {
        let s = &c.sizing;
        wtr.write_record(&[
            c.index.to_string(),
            format!("{:.1}", s.solar_thermal_area_m2),
            format!("{:.1}", s.pv_area_m2),
            format!("{:.1}", s.heat_pump_kw),
            format!("{:.1}", s.storage_kwh),
            c.objective_value.map_or_else(String::new, |v| format!("{v:.6}")),
            c.skip_reason.clone().unwrap_or_default(),
        ])?;
    }

    wtr.flush()?;
    Ok(())
}
