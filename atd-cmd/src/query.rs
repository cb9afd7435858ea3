//! Subcommand implementations: run one dashboard query and write its rows.

use crate::{
    args::{FilterArgs, OutputFormat},
    output::{write_document, write_rows, Columns},
};
use anyhow::Context;
use atd_core::{Movement, Source};
use atd_data::SavitzkyGolay;
use atd_query::Dashboard;
use chrono::NaiveDate;
use serde::Serialize;
use std::io::Write;

#[derive(Serialize)]
struct StateRow<'a> {
    state_name: &'a str,
}

impl Columns for StateRow<'_> {
    const COLUMNS: &'static [&'static str] = &["state_name"];
}

#[derive(Serialize)]
struct AirportRow<'a> {
    airport_name: &'a str,
}

impl Columns for AirportRow<'_> {
    const COLUMNS: &'static [&'static str] = &["airport_name"];
}

#[derive(Serialize)]
struct SmoothedPoint {
    date: NaiveDate,
    nm_flights: u64,
    airport_flights: Option<u64>,
    nm_smoothed: f64,
    airport_smoothed: Option<f64>,
}

impl Columns for SmoothedPoint {
    const COLUMNS: &'static [&'static str] = &[
        "date",
        "nm_flights",
        "airport_flights",
        "nm_smoothed",
        "airport_smoothed",
    ];
}

#[derive(Serialize)]
struct ChoroplethRow<'a> {
    state_name: &'a str,
    nm_flights: u64,
}

impl Columns for ChoroplethRow<'_> {
    const COLUMNS: &'static [&'static str] = &["state_name", "nm_flights"];
}

pub fn run_states<W: Write>(
    dashboard: &Dashboard,
    airports: &[String],
    format: OutputFormat,
    out: W,
) -> anyhow::Result<()> {
    let states = dashboard.get_states(airports)?;
    let rows: Vec<StateRow> = states
        .iter()
        .map(|s| StateRow { state_name: s })
        .collect();
    write_rows(out, format, &rows)
}

pub fn run_airports<W: Write>(
    dashboard: &Dashboard,
    states: &[String],
    format: OutputFormat,
    out: W,
) -> anyhow::Result<()> {
    let airports = dashboard.get_airports(states)?;
    let rows: Vec<AirportRow> = airports
        .iter()
        .map(|a| AirportRow { airport_name: a })
        .collect();
    write_rows(out, format, &rows)
}

pub fn run_range<W: Write>(
    dashboard: &Dashboard,
    format: OutputFormat,
    out: W,
) -> anyhow::Result<()> {
    write_rows(out, format, &[dashboard.get_date_bounds()])
}

/// Daily counts, optionally with the dashboard's smoothed lines alongside.
pub fn run_time_series<W: Write>(
    dashboard: &Dashboard,
    filter: &FilterArgs,
    smooth: bool,
    format: OutputFormat,
    out: W,
) -> anyhow::Result<()> {
    let selection = filter.to_selection()?;
    if !smooth {
        return write_rows(out, format, &dashboard.get_time_series(&selection)?);
    }

    let smoothing = SavitzkyGolay::dashboard_default()?;
    let chart = dashboard.get_time_series_chart(&selection, &smoothing)?;
    match format {
        OutputFormat::Json => write_document(out, &chart),
        OutputFormat::Csv => {
            let rows: Vec<SmoothedPoint> = chart
                .points
                .iter()
                .enumerate()
                .map(|(i, p)| SmoothedPoint {
                    date: p.date,
                    nm_flights: p.nm_flights,
                    airport_flights: p.airport_flights,
                    nm_smoothed: chart.nm_smoothed[i],
                    airport_smoothed: chart.airport_smoothed.as_ref().map(|s| s[i]),
                })
                .collect();
            write_rows(out, format, &rows)
        }
    }
}

pub fn run_seasonality<W: Write>(
    dashboard: &Dashboard,
    filter: &FilterArgs,
    format: OutputFormat,
    out: W,
) -> anyhow::Result<()> {
    let selection = filter.to_selection()?;
    write_rows(out, format, &dashboard.get_seasonality(&selection)?)
}

pub fn run_state_map<W: Write>(
    dashboard: &Dashboard,
    movement: &[String],
    date: NaiveDate,
    format: OutputFormat,
    out: W,
) -> anyhow::Result<()> {
    let movement = Movement::from_selection(movement)?;
    write_rows(out, format, &dashboard.get_state_map(movement, date)?)
}

/// The state map joined against the boundaries. CSV output lists the
/// matched states only; JSON carries the whole layer.
pub fn run_choropleth<W: Write>(
    dashboard: &Dashboard,
    movement: &[String],
    date: NaiveDate,
    format: OutputFormat,
    out: W,
) -> anyhow::Result<()> {
    let movement = Movement::from_selection(movement)?;
    let layer = dashboard
        .get_choropleth(movement, date)
        .context("pass --regions <PATH> with GeoJSON state boundaries")?;
    match format {
        OutputFormat::Json => write_document(out, &layer),
        OutputFormat::Csv => {
            let rows: Vec<ChoroplethRow> = layer
                .regions
                .iter()
                .map(|r| ChoroplethRow {
                    state_name: &r.state_name,
                    nm_flights: r.nm_flights,
                })
                .collect();
            write_rows(out, format, &rows)
        }
    }
}

pub fn run_top_airports<W: Write>(
    dashboard: &Dashboard,
    filter: &FilterArgs,
    source: Source,
    count: usize,
    format: OutputFormat,
    out: W,
) -> anyhow::Result<()> {
    let selection = filter.to_selection()?;
    let ranking = dashboard.get_top_airports_n(&selection, source, count)?;
    if source == Source::Apt && !dashboard.dataset().has_airport_reported_data() {
        log::warn!("[ATD] cmd: the dataset has no airport-reported columns, APT ranking is empty");
    }
    write_rows(out, format, &ranking)
}

/// Every panel at once. Always written as JSON.
pub fn run_snapshot<W: Write>(
    dashboard: &Dashboard,
    filter: &FilterArgs,
    format: OutputFormat,
    out: W,
) -> anyhow::Result<()> {
    if format == OutputFormat::Csv {
        log::debug!("[ATD] cmd: snapshot has nested panels, writing JSON");
    }
    let selection = filter.to_selection()?;
    write_document(out, &dashboard.get_snapshot(&selection)?)
}
