//! Reductions from a filtered view to the tables each chart draws.
//!
//! Each function is one grouped SQL query over the view's rows. An empty
//! view gives an empty table. The airport-reported series is only filled in
//! when the dataset carries airport-reported data: sums use `TOTAL()` so a
//! group whose airport cells are all blank sums to 0, and means use `AVG()`
//! which skips blank cells.

use atd_core::{ColumnPair, FilteredView, Source};
use chrono::NaiveDate;
use rusqlite::types::Value;
use serde::Serialize;

/// Number of airports in the dashboard's ranking tables.
pub const TOP_AIRPORTS_DEFAULT: usize = 5;

/// Flights on one date, summed over the view.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TimeSeriesPoint {
    pub date: NaiveDate,
    pub nm_flights: u64,
    pub airport_flights: Option<u64>,
}

/// One row of a top-airports table.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AirportAverage {
    pub airport_name: String,
    pub daily_average: f64,
}

/// Flights of one state, summed over the view.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct StateTotal {
    pub state_name: String,
    pub nm_flights: u64,
    pub airport_flights: Option<u64>,
}

/// Mean daily flights in one calendar month, all years pooled.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MonthlyAverage {
    pub month_label: String,
    pub month_number: u32,
    pub nm_flights: f64,
    pub airport_flights: Option<f64>,
}

/// `SUM(nm), TOTAL(airport)` over the pair's columns.
fn sum_columns(columns: ColumnPair) -> String {
    format!(
        "SUM({}), CAST(TOTAL({}) AS INTEGER)",
        columns.nm.sql_column(),
        columns.airport.sql_column()
    )
}

/// Total flights per date, ascending by date.
pub fn time_series_by_date(
    view: &FilteredView<'_>,
    columns: ColumnPair,
) -> anyhow::Result<Vec<TimeSeriesPoint>> {
    let airport_reported = view.has_airport_reported_data();
    let points = view.query(
        &format!("date, {}", sum_columns(columns)),
        "GROUP BY date ORDER BY date",
        &[],
        |row| {
            Ok(TimeSeriesPoint {
                date: row.get(0)?,
                nm_flights: row.get(1)?,
                airport_flights: if airport_reported {
                    Some(row.get(2)?)
                } else {
                    None
                },
            })
        },
    )?;
    log::debug!(
        "[ATD] aggregate: time_series_by_date returned {} points",
        points.len()
    );
    Ok(points)
}

/// The `n` airports with the highest mean total flights per row.
///
/// The mean is taken over every matching row of the airport with a value in
/// the source's column (one row per airport per day in this dataset, hence a
/// daily average). Ties are broken by airport name. Ranking by
/// airport-reported counts skips airports that never reported and gives an
/// empty table when the dataset has no such data.
pub fn top_airports(
    view: &FilteredView<'_>,
    source: Source,
    n: usize,
) -> anyhow::Result<Vec<AirportAverage>> {
    if source == Source::Apt && !view.has_airport_reported_data() {
        return Ok(Vec::new());
    }
    let column = source.total_column().sql_column();
    let limit = i64::try_from(n).unwrap_or(i64::MAX);

    let ranking = view.query(
        &format!("airport_name, AVG({column}) AS daily_average"),
        &format!(
            "GROUP BY airport_name HAVING COUNT({column}) > 0
             ORDER BY daily_average DESC, airport_name LIMIT ?"
        ),
        &[Value::Integer(limit)],
        |row| {
            Ok(AirportAverage {
                airport_name: row.get(0)?,
                daily_average: row.get(1)?,
            })
        },
    )?;
    log::debug!(
        "[ATD] aggregate: top_airports ({}) returned {} airports",
        source,
        ranking.len()
    );
    Ok(ranking)
}

/// Flights summed per state, ascending by state name.
///
/// This is a plain sum. The map passes a single day's slice, where the sum
/// is that day's traffic per state.
pub fn daily_average_by_state(
    view: &FilteredView<'_>,
    columns: ColumnPair,
) -> anyhow::Result<Vec<StateTotal>> {
    let airport_reported = view.has_airport_reported_data();
    let states = view.query(
        &format!("state_name, {}", sum_columns(columns)),
        "GROUP BY state_name ORDER BY state_name",
        &[],
        |row| {
            Ok(StateTotal {
                state_name: row.get(0)?,
                nm_flights: row.get(1)?,
                airport_flights: if airport_reported {
                    Some(row.get(2)?)
                } else {
                    None
                },
            })
        },
    )?;
    log::debug!(
        "[ATD] aggregate: daily_average_by_state returned {} states",
        states.len()
    );
    Ok(states)
}

/// Mean flights per row for each calendar month (1-12), ascending by month.
pub fn seasonal_average_by_month(
    view: &FilteredView<'_>,
    columns: ColumnPair,
) -> anyhow::Result<Vec<MonthlyAverage>> {
    let airport_reported = view.has_airport_reported_data();
    let months = view.query(
        &format!(
            "CAST(strftime('%m', date) AS INTEGER) AS month, AVG({}), AVG({})",
            columns.nm.sql_column(),
            columns.airport.sql_column()
        ),
        "GROUP BY strftime('%m', date) ORDER BY month",
        &[],
        |row| {
            let month_number: u32 = row.get(0)?;
            Ok(MonthlyAverage {
                month_label: atd_utils::dates::month_label(month_number).to_string(),
                month_number,
                nm_flights: row.get(1)?,
                airport_flights: if airport_reported { row.get(2)? } else { None },
            })
        },
    )?;
    log::debug!(
        "[ATD] aggregate: seasonal_average_by_month returned {} months",
        months.len()
    );
    Ok(months)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        filter::{filter, filter_on_date, FilterSelection},
        test_support::{sample_dataset, two_row_dataset, ymd},
    };
    use atd_core::{Dataset, FlightRecord, Movement};
    use proptest::prelude::*;

    fn close(a: f64, b: f64) -> bool {
        (a - b).abs() < 1e-9
    }

    #[test]
    fn test_two_row_time_series() {
        let dataset = two_row_dataset();
        let view = filter(&dataset, &FilterSelection::new());
        let series = time_series_by_date(&view, ColumnPair::TOTAL).unwrap();
        assert_eq!(
            series,
            vec![
                TimeSeriesPoint {
                    date: ymd(2020, 1, 1),
                    nm_flights: 10,
                    airport_flights: None
                },
                TimeSeriesPoint {
                    date: ymd(2020, 1, 2),
                    nm_flights: 20,
                    airport_flights: None
                },
            ]
        );
    }

    #[test]
    fn test_two_row_top_airports() {
        let dataset = two_row_dataset();
        let view = dataset.view();
        let top = top_airports(&view, Source::Nm, TOP_AIRPORTS_DEFAULT).unwrap();
        assert_eq!(top.len(), 1);
        assert_eq!(top[0].airport_name, "X");
        assert!(close(top[0].daily_average, 15.0));
    }

    #[test]
    fn test_time_series_over_sample() {
        let dataset = sample_dataset();
        let series = time_series_by_date(&dataset.view(), ColumnPair::TOTAL).unwrap();
        let dates: Vec<NaiveDate> = series.iter().map(|p| p.date).collect();
        assert_eq!(
            dates,
            vec![
                ymd(2020, 1, 1),
                ymd(2020, 1, 2),
                ymd(2020, 2, 15),
                ymd(2021, 1, 1),
                ymd(2021, 2, 2)
            ]
        );
        let nm: Vec<u64> = series.iter().map(|p| p.nm_flights).collect();
        assert_eq!(nm, vec![693, 1075, 840, 252, 185]);
        let airport: Vec<Option<u64>> = series.iter().map(|p| p.airport_flights).collect();
        // The last day has no airport-reported cells at all.
        assert_eq!(
            airport,
            vec![Some(684), Some(1050), Some(840), Some(252), Some(0)]
        );
    }

    #[test]
    fn test_time_series_by_movement() {
        let dataset = sample_dataset();
        let selection = FilterSelection::new()
            .with_states(["Albania"])
            .with_movement(Movement::Arrival);
        let view = filter(&dataset, &selection);
        let series = time_series_by_date(&view, selection.columns()).unwrap();
        let nm: Vec<u64> = series.iter().map(|p| p.nm_flights).collect();
        assert_eq!(nm, vec![31, 27, 22]);
    }

    #[test]
    fn test_empty_and_both_movement_agree() {
        let dataset = sample_dataset();
        let view = dataset.view();
        let empty: [&str; 0] = [];
        let from_empty = Movement::from_selection(&empty).unwrap().columns();
        let from_both = Movement::from_selection(&["Arrival", "Departure"])
            .unwrap()
            .columns();
        assert_eq!(
            time_series_by_date(&view, from_empty).unwrap(),
            time_series_by_date(&view, from_both).unwrap()
        );
        assert_eq!(
            seasonal_average_by_month(&view, from_empty).unwrap(),
            seasonal_average_by_month(&view, from_both).unwrap()
        );
    }

    #[test]
    fn test_top_airports_nm_and_apt() {
        let dataset = sample_dataset();
        let view = dataset.view();

        let nm = top_airports(&view, Source::Nm, TOP_AIRPORTS_DEFAULT).unwrap();
        let names: Vec<&str> = nm.iter().map(|a| a.airport_name.as_str()).collect();
        assert_eq!(names, vec!["Vienna", "Brussels", "Tirana", "Salzburg"]);
        assert!(close(nm[0].daily_average, 475.0));
        assert!(close(nm[1].daily_average, 315.0));
        assert!(close(nm[2].daily_average, 158.0 / 3.0));
        assert!(close(nm[3].daily_average, 21.0));

        let apt = top_airports(&view, Source::Apt, TOP_AIRPORTS_DEFAULT).unwrap();
        let values: Vec<f64> = apt.iter().map(|a| a.daily_average).collect();
        assert!(close(values[0], 473.25));
        assert!(close(values[1], 377.5));
        assert!(close(values[2], 52.0));
        assert!(close(values[3], 22.0));
    }

    #[test]
    fn test_top_airports_truncates_and_breaks_ties_by_name() {
        let date = ymd(2020, 1, 1);
        let dataset = Dataset::new(
            vec![
                FlightRecord::new(date, "S", "Delta", 5, 5),
                FlightRecord::new(date, "S", "Alpha", 5, 5),
                FlightRecord::new(date, "S", "Charlie", 50, 50),
                FlightRecord::new(date, "S", "Bravo", 5, 5),
            ],
            false,
        )
        .unwrap();
        let top = top_airports(&dataset.view(), Source::Nm, 3).unwrap();
        let names: Vec<&str> = top.iter().map(|a| a.airport_name.as_str()).collect();
        assert_eq!(names, vec!["Charlie", "Alpha", "Bravo"]);
    }

    #[test]
    fn test_top_airports_empty_view_and_missing_source() {
        let dataset = two_row_dataset();
        let selection = FilterSelection::new().with_states(["Nowhere"]);
        let view = filter(&dataset, &selection);
        assert!(top_airports(&view, Source::Nm, 5).unwrap().is_empty());
        // No airport-reported columns in this dataset.
        assert!(top_airports(&dataset.view(), Source::Apt, 5).unwrap().is_empty());
        assert!(top_airports(&dataset.view(), Source::Nm, 0).unwrap().is_empty());
    }

    #[test]
    fn test_state_map_single_day() {
        let dataset = sample_dataset();
        let view = filter_on_date(dataset.view(), ymd(2020, 1, 2));
        let totals = daily_average_by_state(&view, ColumnPair::TOTAL).unwrap();
        assert_eq!(
            totals,
            vec![
                StateTotal {
                    state_name: "Albania".to_string(),
                    nm_flights: 55,
                    airport_flights: Some(55)
                },
                StateTotal {
                    state_name: "Austria".to_string(),
                    nm_flights: 610,
                    airport_flights: Some(590)
                },
                StateTotal {
                    state_name: "Belgium".to_string(),
                    nm_flights: 410,
                    airport_flights: Some(405)
                },
            ]
        );

        let arrivals = daily_average_by_state(&view, ColumnPair::ARRIVALS).unwrap();
        let nm: Vec<u64> = arrivals.iter().map(|s| s.nm_flights).collect();
        assert_eq!(nm, vec![27, 311, 210]);
    }

    #[test]
    fn test_state_map_without_airport_data() {
        let dataset = two_row_dataset();
        let totals = daily_average_by_state(&dataset.view(), ColumnPair::TOTAL).unwrap();
        assert_eq!(totals.len(), 1);
        assert_eq!(totals[0].nm_flights, 30);
        assert_eq!(totals[0].airport_flights, None);
    }

    #[test]
    fn test_seasonality_pools_years() {
        let dataset = sample_dataset();
        let months = seasonal_average_by_month(&dataset.view(), ColumnPair::TOTAL).unwrap();
        assert_eq!(months.len(), 2);

        assert_eq!(months[0].month_label, "JAN");
        assert_eq!(months[0].month_number, 1);
        assert!(close(months[0].nm_flights, 2020.0 / 9.0));
        assert!(close(months[0].airport_flights.unwrap(), 248.25));

        assert_eq!(months[1].month_label, "FEB");
        assert_eq!(months[1].month_number, 2);
        assert!(close(months[1].nm_flights, 1025.0 / 3.0));
        assert!(close(months[1].airport_flights.unwrap(), 420.0));
    }

    #[test]
    fn test_aggregations_of_empty_view() {
        let dataset = sample_dataset();
        let selection =
            FilterSelection::new().with_dates(Some(ymd(2030, 1, 1)), Some(ymd(2030, 12, 31)));
        let view = filter(&dataset, &selection);
        assert!(view.is_empty().unwrap());
        assert!(time_series_by_date(&view, ColumnPair::TOTAL).unwrap().is_empty());
        assert!(daily_average_by_state(&view, ColumnPair::TOTAL).unwrap().is_empty());
        assert!(seasonal_average_by_month(&view, ColumnPair::TOTAL).unwrap().is_empty());
        assert!(top_airports(&view, Source::Apt, 5).unwrap().is_empty());
    }

    fn arb_records() -> impl Strategy<Value = Vec<FlightRecord>> {
        let record = (0u32..400, 0usize..8, 0u32..300, 0u32..300).prop_map(
            |(offset, airport, arr, dep)| {
                let date = ymd(2019, 6, 1) + chrono::Duration::days(offset as i64);
                let name = ["A1", "A2", "A3", "A4", "A5", "A6", "A7", "A8"][airport];
                FlightRecord::new(date, "S", name, arr, dep)
            },
        );
        prop::collection::vec(record, 1..60)
    }

    proptest! {
        #[test]
        fn top_airports_bounded_and_non_increasing(records in arb_records(), n in 0usize..10) {
            let dataset = Dataset::new(records, false).unwrap();
            let top = top_airports(&dataset.view(), Source::Nm, n).unwrap();
            prop_assert!(top.len() <= n);
            for pair in top.windows(2) {
                prop_assert!(pair[0].daily_average >= pair[1].daily_average);
            }
        }

        #[test]
        fn time_series_dates_strictly_increase(records in arb_records()) {
            let expected: u64 = records.iter().map(|r| u64::from(r.nm_total_flights)).sum();
            let dataset = Dataset::new(records, false).unwrap();
            let series = time_series_by_date(&dataset.view(), ColumnPair::TOTAL).unwrap();
            for pair in series.windows(2) {
                prop_assert!(pair[0].date < pair[1].date);
            }
            let total: u64 = series.iter().map(|p| p.nm_flights).sum();
            prop_assert_eq!(total, expected);
        }
    }
}
