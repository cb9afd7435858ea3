//! Writing query results as CSV or JSON.

use crate::args::OutputFormat;
use atd_data::{AirportAverage, MonthlyAverage, StateTotal, TimeSeriesPoint};
use atd_query::models::DateBounds;
use serde::Serialize;
use std::io::Write;

/// CSV header of a row type, in field order.
pub trait Columns {
    const COLUMNS: &'static [&'static str];
}

impl Columns for TimeSeriesPoint {
    const COLUMNS: &'static [&'static str] = &["date", "nm_flights", "airport_flights"];
}

impl Columns for AirportAverage {
    const COLUMNS: &'static [&'static str] = &["airport_name", "daily_average"];
}

impl Columns for StateTotal {
    const COLUMNS: &'static [&'static str] = &["state_name", "nm_flights", "airport_flights"];
}

impl Columns for MonthlyAverage {
    const COLUMNS: &'static [&'static str] =
        &["month_label", "month_number", "nm_flights", "airport_flights"];
}

impl Columns for DateBounds {
    const COLUMNS: &'static [&'static str] = &[
        "min_date",
        "max_date",
        "max_date_allowed",
        "min_date_label",
        "max_date_label",
        "max_date_allowed_label",
    ];
}

/// Write one record per row: CSV with a header line, or a pretty JSON array.
///
/// The CSV header is written even when there are no rows.
pub fn write_rows<W: Write, T: Serialize + Columns>(
    mut out: W,
    format: OutputFormat,
    rows: &[T],
) -> anyhow::Result<()> {
    match format {
        OutputFormat::Csv => {
            let mut writer = csv::WriterBuilder::new()
                .has_headers(false)
                .from_writer(out);
            writer.write_record(T::COLUMNS)?;
            for row in rows {
                writer.serialize(row)?;
            }
            writer.flush()?;
        }
        OutputFormat::Json => {
            serde_json::to_writer_pretty(&mut out, rows)?;
            writeln!(out)?;
        }
    }
    Ok(())
}

/// Write a nested document as pretty JSON.
pub fn write_document<W: Write, T: Serialize>(mut out: W, document: &T) -> anyhow::Result<()> {
    serde_json::to_writer_pretty(&mut out, document)?;
    writeln!(out)?;
    Ok(())
}
