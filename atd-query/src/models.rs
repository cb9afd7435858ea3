//! Result models returned by the [`Dashboard`](crate::Dashboard) queries.
//!
//! Row-level shapes (time series points, state totals, monthly averages,
//! airport rankings) live in `atd-data`; the structs here group them into
//! what one dashboard panel draws. Every struct derives `Serialize` so the
//! front end can take it as JSON.

use atd_core::{DateRange, Movement};
use atd_data::{AirportAverage, FilterSelection, MonthlyAverage, StateTotal, TimeSeriesPoint};
use chrono::NaiveDate;
use serde::Serialize;

/// Legend of the NM series in the traffic chart.
pub const NM_SERIES_LABEL: &str = "Number of flights (recorded by NM)";

/// Legend of the airport-reported series in the traffic chart.
pub const AIRPORT_SERIES_LABEL: &str = "Number of flights (reported by airport)";

/// Bounds for the date range picker.
///
/// The picker treats its upper limit as exclusive, hence `max_date_allowed`.
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct DateBounds {
    pub min_date: NaiveDate,
    pub max_date: NaiveDate,
    /// One day past `max_date`.
    pub max_date_allowed: NaiveDate,
    /// `min_date` as `MM/DD/YYYY`.
    pub min_date_label: String,
    /// `max_date` as `MM/DD/YYYY`.
    pub max_date_label: String,
    /// `max_date_allowed` as `MM/DD/YYYY`.
    pub max_date_allowed_label: String,
}

/// The traffic line chart: raw daily points plus their smoothed lines.
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct TimeSeriesChart {
    pub points: Vec<TimeSeriesPoint>,
    pub nm_label: &'static str,
    pub nm_smoothed: Vec<f64>,
    /// Absent when the dataset carries no airport-reported columns.
    pub airport_label: Option<&'static str>,
    pub airport_smoothed: Option<Vec<f64>>,
}

/// One state drawn on the choropleth.
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct ChoroplethRegion {
    pub state_name: String,
    pub nm_flights: u64,
    /// GeoJSON geometry of the state's boundary.
    pub geometry: serde_json::Value,
}

/// Colour scale of the choropleth, from zero to the busiest state.
#[derive(Debug, Clone, Copy, Serialize, PartialEq)]
pub struct ColorRange {
    pub min: u64,
    pub max: u64,
}

/// The state map joined against region boundaries.
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct ChoroplethLayer {
    pub date: NaiveDate,
    pub movement: Movement,
    pub legend: String,
    pub regions: Vec<ChoroplethRegion>,
    /// States with traffic on `date` but no boundary to draw them with.
    pub unmatched_states: Vec<String>,
    pub color_range: ColorRange,
}

/// Every dashboard panel for one selection.
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct DashboardSnapshot {
    pub selection: FilterSelection,
    /// Date range after filling the open ends from the dataset.
    pub range: DateRange,
    pub has_airport_reported_data: bool,
    pub time_series: Vec<TimeSeriesPoint>,
    pub seasonality: Vec<MonthlyAverage>,
    pub state_map_date: NaiveDate,
    pub state_map: Vec<StateTotal>,
    pub top_nm_airports: Vec<AirportAverage>,
    pub top_apt_airports: Vec<AirportAverage>,
}
