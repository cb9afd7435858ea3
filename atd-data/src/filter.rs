//! The filter engine: date range first, then state and airport membership.

use atd_core::{resolve_columns, ColumnPair, Condition, Dataset, DateRange, FilteredView, Movement};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// Everything the user picked in the dashboard header.
///
/// Empty `states`/`airports` lists mean "no constraint", exactly like absent
/// ones. Missing dates fall back to the dataset's first/last date.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct FilterSelection {
    #[serde(default)]
    pub states: Vec<String>,
    #[serde(default)]
    pub airports: Vec<String>,
    #[serde(default)]
    pub movement: Movement,
    #[serde(default)]
    pub start_date: Option<NaiveDate>,
    #[serde(default)]
    pub end_date: Option<NaiveDate>,
}

impl FilterSelection {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_states<I, S>(mut self, states: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.states = states.into_iter().map(Into::into).collect();
        self
    }

    pub fn with_airports<I, S>(mut self, airports: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.airports = airports.into_iter().map(Into::into).collect();
        self
    }

    pub fn with_movement(mut self, movement: Movement) -> Self {
        self.movement = movement;
        self
    }

    pub fn with_dates(mut self, start_date: Option<NaiveDate>, end_date: Option<NaiveDate>) -> Self {
        self.start_date = start_date;
        self.end_date = end_date;
        self
    }

    /// Inclusive bounds after filling the missing ones from the dataset.
    pub fn effective_range(&self, dataset: &Dataset) -> DateRange {
        DateRange::resolve(self.start_date, self.end_date, dataset.date_range())
    }

    /// Column pair resolved from the movement selection.
    pub fn columns(&self) -> ColumnPair {
        resolve_columns(self.movement)
    }
}

/// Narrow `dataset` to the records matching `selection`.
///
/// An inverted date range is not an error on the query path: it is logged
/// and yields an empty view.
pub fn filter<'a>(dataset: &'a Dataset, selection: &FilterSelection) -> FilteredView<'a> {
    let range = selection.effective_range(dataset);
    if let Err(e) = range.validate() {
        log::warn!("[ATD] filter: {}; returning no records", e);
        return FilteredView::empty(dataset);
    }

    let view = filter_by_entities(
        filter_by_date(dataset.view(), range),
        &selection.states,
        &selection.airports,
    );
    if log::log_enabled!(log::Level::Debug) {
        log::debug!(
            "[ATD] filter: kept {} of {} records ({} to {}, {} states, {} airports)",
            view.len().unwrap_or_default(),
            dataset.len(),
            range.0,
            range.1,
            selection.states.len(),
            selection.airports.len()
        );
    }
    view
}

/// Keep records whose date lies in `range`, bounds included.
pub fn filter_by_date(view: FilteredView<'_>, range: DateRange) -> FilteredView<'_> {
    view.narrow(Condition::Between(range))
}

/// Keep records dated exactly `date`.
pub fn filter_on_date(view: FilteredView<'_>, date: NaiveDate) -> FilteredView<'_> {
    view.narrow(Condition::On(date))
}

/// Apply state/airport membership. An empty list places no constraint.
pub fn filter_by_entities<'a, S: AsRef<str>>(
    view: FilteredView<'a>,
    states: &[S],
    airports: &[S],
) -> FilteredView<'a> {
    let mut view = view;
    if !states.is_empty() {
        view = view.narrow(Condition::StateIn(owned(states)));
    }
    if !airports.is_empty() {
        view = view.narrow(Condition::AirportIn(owned(airports)));
    }
    view
}

fn owned<S: AsRef<str>>(names: &[S]) -> Vec<String> {
    names.iter().map(|s| s.as_ref().to_string()).collect()
}
