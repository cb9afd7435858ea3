//! Dashboard queries.
//!
//! Each method takes plain filter values, narrows the shared dataset with the
//! filter engine and reduces the view with the aggregation engine, one SQL
//! statement per table. Nothing is cached: a query over an unchanged
//! selection recomputes the same rows.

use crate::models::{
    ChoroplethLayer, ChoroplethRegion, ColorRange, DashboardSnapshot, DateBounds, TimeSeriesChart,
    AIRPORT_SERIES_LABEL, NM_SERIES_LABEL,
};
use crate::Dashboard;
use anyhow::anyhow;
use atd_core::{Movement, Source};
use atd_data::{
    daily_average_by_state, filter,
    filter::{filter_by_entities, filter_on_date},
    seasonal_average_by_month, time_series_by_date, top_airports, AirportAverage, FilterSelection,
    MonthlyAverage, SavitzkyGolay, StateTotal, TimeSeriesPoint, TOP_AIRPORTS_DEFAULT,
};
use atd_utils::dates::{format_picker_date, DATASET_FORMAT};
use chrono::NaiveDate;

impl Dashboard {
    // ───────────────────── Picker options ─────────────────────

    /// States available in the state picker, in order of first appearance.
    ///
    /// With a non-empty airport filter only the states owning those airports
    /// are listed.
    pub fn get_states<S: AsRef<str>>(&self, airport_filter: &[S]) -> anyhow::Result<Vec<String>> {
        let no_states: &[S] = &[];
        let view = filter_by_entities(self.dataset.view(), no_states, airport_filter);
        let states = view.distinct_states()?;
        log::info!(
            "[ATD] query: get_states returned {} states",
            states.len()
        );
        Ok(states)
    }

    /// Airports available in the airport picker, in order of first appearance.
    ///
    /// With a non-empty state filter only airports in those states are listed.
    pub fn get_airports<S: AsRef<str>>(&self, state_filter: &[S]) -> anyhow::Result<Vec<String>> {
        let no_airports: &[S] = &[];
        let view = filter_by_entities(self.dataset.view(), state_filter, no_airports);
        let airports = view.distinct_airports()?;
        log::info!(
            "[ATD] query: get_airports returned {} airports",
            airports.len()
        );
        Ok(airports)
    }

    /// Limits and initial values of the date range picker.
    pub fn get_date_bounds(&self) -> DateBounds {
        let min_date = self.dataset.min_date();
        let max_date = self.dataset.max_date();
        let max_date_allowed = self.dataset.max_date_exclusive();
        DateBounds {
            min_date,
            max_date,
            max_date_allowed,
            min_date_label: format_picker_date(&min_date),
            max_date_label: format_picker_date(&max_date),
            max_date_allowed_label: format_picker_date(&max_date_allowed),
        }
    }

    // ───────────────────── Panels ─────────────────────

    /// Daily flight counts for the traffic chart.
    pub fn get_time_series(
        &self,
        selection: &FilterSelection,
    ) -> anyhow::Result<Vec<TimeSeriesPoint>> {
        let view = filter(&self.dataset, selection);
        let points = time_series_by_date(&view, selection.columns())?;
        log::info!(
            "[ATD] query: get_time_series returned {} points",
            points.len()
        );
        Ok(points)
    }

    /// Daily flight counts together with the smoothed lines drawn over them.
    pub fn get_time_series_chart(
        &self,
        selection: &FilterSelection,
        smoothing: &SavitzkyGolay,
    ) -> anyhow::Result<TimeSeriesChart> {
        let points = self.get_time_series(selection)?;
        log::debug!(
            "[ATD] query: smoothing {} points (window {}, order {})",
            points.len(),
            smoothing.window(),
            smoothing.polyorder()
        );
        let nm: Vec<f64> = points.iter().map(|p| p.nm_flights as f64).collect();
        let nm_smoothed = smoothing.apply(&nm);

        let (airport_label, airport_smoothed) = if self.dataset.has_airport_reported_data() {
            let airport: Vec<f64> = points
                .iter()
                .map(|p| p.airport_flights.unwrap_or(0) as f64)
                .collect();
            (Some(AIRPORT_SERIES_LABEL), Some(smoothing.apply(&airport)))
        } else {
            (None, None)
        };

        Ok(TimeSeriesChart {
            points,
            nm_label: NM_SERIES_LABEL,
            nm_smoothed,
            airport_label,
            airport_smoothed,
        })
    }

    /// Mean flights per record for each calendar month, January first.
    pub fn get_seasonality(
        &self,
        selection: &FilterSelection,
    ) -> anyhow::Result<Vec<MonthlyAverage>> {
        let view = filter(&self.dataset, selection);
        let months = seasonal_average_by_month(&view, selection.columns())?;
        log::info!(
            "[ATD] query: get_seasonality returned {} months",
            months.len()
        );
        Ok(months)
    }

    /// Flights per state on one date, for the map.
    ///
    /// The map ignores the state, airport and date range pickers.
    pub fn get_state_map(
        &self,
        movement: Movement,
        date: NaiveDate,
    ) -> anyhow::Result<Vec<StateTotal>> {
        let view = filter_on_date(self.dataset.view(), date);
        let states = daily_average_by_state(&view, movement.columns())?;
        log::info!(
            "[ATD] query: get_state_map returned {} states for {}",
            states.len(),
            date
        );
        Ok(states)
    }

    /// The state map joined against the loaded region boundaries.
    ///
    /// Fails when no boundaries were attached to the dashboard.
    pub fn get_choropleth(
        &self,
        movement: Movement,
        date: NaiveDate,
    ) -> anyhow::Result<ChoroplethLayer> {
        let boundaries = self
            .regions()
            .ok_or_else(|| anyhow!("no region boundaries loaded; the choropleth needs them"))?;
        let states = self.get_state_map(movement, date)?;
        let max = states.iter().map(|s| s.nm_flights).max().unwrap_or(0);

        let mut regions = Vec::with_capacity(states.len());
        let mut unmatched_states = Vec::new();
        for state in states {
            match boundaries.get(&state.state_name) {
                Some(region) => regions.push(ChoroplethRegion {
                    state_name: state.state_name,
                    nm_flights: state.nm_flights,
                    geometry: region.geometry.clone(),
                }),
                None => unmatched_states.push(state.state_name),
            }
        }
        if !unmatched_states.is_empty() {
            log::warn!(
                "[ATD] query: no boundary for {} state(s): {}",
                unmatched_states.len(),
                unmatched_states.join(", ")
            );
        }

        Ok(ChoroplethLayer {
            date,
            movement,
            legend: format!("Number of flights on {}", date.format(DATASET_FORMAT)),
            regions,
            unmatched_states,
            color_range: ColorRange { min: 0, max },
        })
    }

    /// The five airports with the highest mean daily traffic.
    pub fn get_top_airports(
        &self,
        selection: &FilterSelection,
        source: Source,
    ) -> anyhow::Result<Vec<AirportAverage>> {
        self.get_top_airports_n(selection, source, TOP_AIRPORTS_DEFAULT)
    }

    /// The `n` airports with the highest mean daily traffic.
    pub fn get_top_airports_n(
        &self,
        selection: &FilterSelection,
        source: Source,
        n: usize,
    ) -> anyhow::Result<Vec<AirportAverage>> {
        let view = filter(&self.dataset, selection);
        let ranking = top_airports(&view, source, n)?;
        log::info!(
            "[ATD] query: get_top_airports ({}) returned {} airports",
            source,
            ranking.len()
        );
        Ok(ranking)
    }

    /// Every panel for one selection.
    ///
    /// The map shows the last day of the selected period. The ranking tables
    /// list airports, so they are narrowed by state and period only.
    pub fn get_snapshot(&self, selection: &FilterSelection) -> anyhow::Result<DashboardSnapshot> {
        let range = selection.effective_range(&self.dataset);
        let tables_selection = FilterSelection {
            airports: Vec::new(),
            ..selection.clone()
        };

        Ok(DashboardSnapshot {
            selection: selection.clone(),
            range,
            has_airport_reported_data: self.dataset.has_airport_reported_data(),
            time_series: self.get_time_series(selection)?,
            seasonality: self.get_seasonality(selection)?,
            state_map_date: range.end(),
            state_map: self.get_state_map(selection.movement, range.end())?,
            top_nm_airports: self.get_top_airports(&tables_selection, Source::Nm)?,
            top_apt_airports: self.get_top_airports(&tables_selection, Source::Apt)?,
        })
    }
}

#[cfg(test)]
mod tests {
    use crate::{
        test_support::{sample_dashboard, REGIONS},
        Dashboard,
    };
    use atd_core::{Dataset, FlightRecord, Movement, Source};
    use atd_data::{FilterSelection, SavitzkyGolay};
    use chrono::NaiveDate;

    fn ymd(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn close(a: f64, b: f64) -> bool {
        (a - b).abs() < 1e-9
    }

    #[test]
    fn test_get_states() {
        let dashboard = sample_dashboard();
        let none: &[&str] = &[];
        assert_eq!(
            dashboard.get_states(none).unwrap(),
            vec!["Albania", "Austria", "Belgium"]
        );
        assert_eq!(
            dashboard.get_states(&["Vienna", "Brussels"]).unwrap(),
            vec!["Austria", "Belgium"]
        );
        assert!(dashboard.get_states(&["Gatwick"]).unwrap().is_empty());
    }

    #[test]
    fn test_get_airports() {
        let dashboard = sample_dashboard();
        let none: &[String] = &[];
        assert_eq!(
            dashboard.get_airports(none).unwrap(),
            vec!["Tirana", "Vienna", "Salzburg", "Brussels"]
        );
        assert_eq!(dashboard.get_airports(&["Austria"]).unwrap(), vec!["Vienna", "Salzburg"]);
    }

    #[test]
    fn test_get_date_bounds() {
        let bounds = sample_dashboard().get_date_bounds();
        assert_eq!(bounds.min_date, ymd(2020, 1, 1));
        assert_eq!(bounds.max_date, ymd(2021, 2, 2));
        assert_eq!(bounds.max_date_allowed, ymd(2021, 2, 3));
        assert_eq!(bounds.min_date_label, "01/01/2020");
        assert_eq!(bounds.max_date_label, "02/02/2021");
        assert_eq!(bounds.max_date_allowed_label, "02/03/2021");
    }

    #[test]
    fn test_get_time_series() {
        let series = sample_dashboard().get_time_series(&FilterSelection::new()).unwrap();
        let nm: Vec<u64> = series.iter().map(|p| p.nm_flights).collect();
        let apt: Vec<Option<u64>> = series.iter().map(|p| p.airport_flights).collect();
        assert_eq!(nm, vec![693, 1075, 840, 252, 185]);
        assert_eq!(
            apt,
            vec![Some(684), Some(1050), Some(840), Some(252), Some(0)]
        );
    }

    #[test]
    fn test_get_time_series_inverted_range_is_empty() {
        let selection =
            FilterSelection::new().with_dates(Some(ymd(2021, 1, 1)), Some(ymd(2020, 1, 1)));
        assert!(sample_dashboard().get_time_series(&selection).unwrap().is_empty());
    }

    #[test]
    fn test_get_time_series_chart() {
        let dashboard = sample_dashboard();
        let smoothing = SavitzkyGolay::new(3, 1).unwrap();
        let chart = dashboard.get_time_series_chart(&FilterSelection::new(), &smoothing).unwrap();
        assert_eq!(chart.points.len(), 5);
        assert_eq!(chart.nm_smoothed.len(), 5);
        assert!(close(chart.nm_smoothed[2], (1075.0 + 840.0 + 252.0) / 3.0));
        let airport = chart.airport_smoothed.unwrap();
        assert!(close(airport[2], (1050.0 + 840.0 + 252.0) / 3.0));
        assert_eq!(chart.airport_label, Some("Number of flights (reported by airport)"));
    }

    #[test]
    fn test_get_time_series_chart_without_airport_columns() {
        let dataset = Dataset::new(
            vec![
                FlightRecord::new(ymd(2020, 1, 1), "A", "X", 5, 5),
                FlightRecord::new(ymd(2020, 1, 2), "A", "X", 10, 10),
            ],
            false,
        )
        .unwrap();
        let dashboard = Dashboard::new(dataset);
        let smoothing = SavitzkyGolay::dashboard_default().unwrap();
        let chart = dashboard.get_time_series_chart(&FilterSelection::new(), &smoothing).unwrap();
        assert_eq!(chart.nm_smoothed, vec![10.0, 20.0]);
        assert!(chart.airport_label.is_none());
        assert!(chart.airport_smoothed.is_none());
    }

    #[test]
    fn test_get_seasonality() {
        let months = sample_dashboard().get_seasonality(&FilterSelection::new()).unwrap();
        assert_eq!(months.len(), 2);
        assert_eq!(months[0].month_label, "JAN");
        assert!(close(months[0].nm_flights, 2020.0 / 9.0));
        assert_eq!(months[1].month_label, "FEB");
        assert!(close(months[1].nm_flights, 1025.0 / 3.0));
    }

    #[test]
    fn test_get_state_map() {
        let dashboard = sample_dashboard();
        let totals = dashboard.get_state_map(Movement::Both, ymd(2020, 1, 2)).unwrap();
        let nm: Vec<(&str, u64)> = totals
            .iter()
            .map(|s| (s.state_name.as_str(), s.nm_flights))
            .collect();
        assert_eq!(nm, vec![("Albania", 55), ("Austria", 610), ("Belgium", 410)]);
        assert_eq!(totals[1].airport_flights, Some(590));

        let arrivals = dashboard.get_state_map(Movement::Arrival, ymd(2020, 1, 2)).unwrap();
        let nm: Vec<u64> = arrivals.iter().map(|s| s.nm_flights).collect();
        assert_eq!(nm, vec![27, 311, 210]);

        assert!(dashboard
            .get_state_map(Movement::Both, ymd(2019, 1, 1))
            .unwrap()
            .is_empty());
    }

    #[test]
    fn test_get_choropleth() {
        let dashboard = sample_dashboard().load_regions(REGIONS).unwrap();
        let layer = dashboard
            .get_choropleth(Movement::Both, ymd(2020, 1, 2))
            .unwrap();
        let matched: Vec<&str> = layer.regions.iter().map(|r| r.state_name.as_str()).collect();
        assert_eq!(matched, vec!["Albania", "Austria"]);
        assert_eq!(layer.regions[1].nm_flights, 610);
        assert!(layer.regions[0].geometry.is_object());
        assert_eq!(layer.unmatched_states, vec!["Belgium"]);
        assert_eq!(layer.color_range.min, 0);
        assert_eq!(layer.color_range.max, 610);
        assert_eq!(layer.legend, "Number of flights on 02/01/2020");
    }

    #[test]
    fn test_get_choropleth_requires_regions() {
        let dashboard = sample_dashboard();
        assert!(dashboard
            .get_choropleth(Movement::Both, ymd(2020, 1, 2))
            .is_err());
    }

    #[test]
    fn test_get_choropleth_empty_date() {
        let dashboard = sample_dashboard().load_regions(REGIONS).unwrap();
        let layer = dashboard
            .get_choropleth(Movement::Both, ymd(2019, 6, 1))
            .unwrap();
        assert!(layer.regions.is_empty());
        assert_eq!(layer.color_range.max, 0);
    }

    #[test]
    fn test_get_top_airports() {
        let dashboard = sample_dashboard();
        let nm = dashboard.get_top_airports(&FilterSelection::new(), Source::Nm).unwrap();
        let names: Vec<&str> = nm.iter().map(|a| a.airport_name.as_str()).collect();
        assert_eq!(names, vec!["Vienna", "Brussels", "Tirana", "Salzburg"]);
        assert!(close(nm[0].daily_average, 475.0));

        let apt = dashboard.get_top_airports(&FilterSelection::new(), Source::Apt).unwrap();
        assert_eq!(apt[0].airport_name, "Vienna");
        assert!(close(apt[0].daily_average, 473.25));

        let two = dashboard.get_top_airports_n(&FilterSelection::new(), Source::Nm, 2).unwrap();
        assert_eq!(two.len(), 2);
    }

    #[test]
    fn test_get_snapshot() {
        let dashboard = sample_dashboard();
        let selection = FilterSelection::new()
            .with_airports(["Vienna"])
            .with_dates(None, Some(ymd(2020, 1, 2)));
        let snapshot = dashboard.get_snapshot(&selection).unwrap();

        assert_eq!(snapshot.range.start(), ymd(2020, 1, 1));
        assert_eq!(snapshot.state_map_date, ymd(2020, 1, 2));
        assert_eq!(snapshot.state_map.len(), 3);
        assert!(snapshot.has_airport_reported_data);

        let series: Vec<u64> = snapshot.time_series.iter().map(|p| p.nm_flights).collect();
        assert_eq!(series, vec![610, 590]);
        // The ranking tables do not follow the airport picker.
        assert_eq!(snapshot.top_nm_airports.len(), 4);
        assert_eq!(snapshot.top_apt_airports[0].airport_name, "Vienna");

        let json = serde_json::to_value(&snapshot).unwrap();
        assert_eq!(json["state_map_date"], "2020-01-02");
    }

    #[test]
    fn test_concurrent_queries_agree() {
        let dashboard = sample_dashboard();
        let expected = dashboard.get_time_series(&FilterSelection::new()).unwrap();
        std::thread::scope(|scope| {
            let handles: Vec<_> = (0..4)
                .map(|_| {
                    let dashboard = dashboard.clone();
                    scope.spawn(move || {
                        dashboard
                            .get_time_series(&FilterSelection::new())
                            .unwrap()
                    })
                })
                .collect();
            for handle in handles {
                assert_eq!(handle.join().unwrap(), expected);
            }
        });
    }
}
