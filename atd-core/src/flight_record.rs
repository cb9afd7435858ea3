use crate::{
    error::{DataLoadError, Result},
    schema::{self, AIRPORT_REPORTED_COLUMNS, REQUIRED_COLUMNS},
};
use chrono::NaiveDate;
use csv::StringRecord;
use serde::Serialize;

/// One row of the traffic dataset: the flights of one airport on one day.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
pub struct FlightRecord {
    pub date: NaiveDate,
    pub state_name: String,
    pub airport_name: String,
    /// Counts reported by the network manager
    pub nm_arr_flights: u32,
    pub nm_dep_flights: u32,
    pub nm_total_flights: u32,
    /// Counts self-reported by the airport; `None` when the cell is blank
    /// or the dataset carries no airport-reported columns
    pub airport_arr_flights: Option<u32>,
    pub airport_dep_flights: Option<u32>,
    pub airport_total_flights: Option<u32>,
}

impl FlightRecord {
    /// A record with network manager counts only. The total is
    /// `arrivals + departures`, saturating at `u32::MAX`.
    pub fn new(
        date: NaiveDate,
        state_name: &str,
        airport_name: &str,
        nm_arr_flights: u32,
        nm_dep_flights: u32,
    ) -> Self {
        FlightRecord {
            date,
            state_name: state_name.to_string(),
            airport_name: airport_name.to_string(),
            nm_arr_flights,
            nm_dep_flights,
            nm_total_flights: nm_arr_flights.saturating_add(nm_dep_flights),
            airport_arr_flights: None,
            airport_dep_flights: None,
            airport_total_flights: None,
        }
    }

    /// Attach airport-reported counts. The total saturates like [`FlightRecord::new`].
    pub fn with_airport_counts(mut self, arrivals: u32, departures: u32) -> Self {
        self.airport_arr_flights = Some(arrivals);
        self.airport_dep_flights = Some(departures);
        self.airport_total_flights = Some(arrivals.saturating_add(departures));
        self
    }
}

/// Positions of the known columns inside a header row.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct HeaderLayout {
    date: usize,
    state_name: usize,
    airport_name: usize,
    nm: [usize; 3],
    airport: Option<[usize; 3]>,
}

impl HeaderLayout {
    /// Locate every known column by name. Extra columns are ignored.
    pub fn from_headers(headers: &StringRecord) -> Result<Self> {
        let find = |name: &str| headers.iter().position(|h| h.trim() == name);
        let require = |name: &'static str| find(name).ok_or(DataLoadError::MissingColumn(name));

        let [date, state_name, airport_name, nm_arr, nm_dep, nm_total] = REQUIRED_COLUMNS;
        let layout_nm = [require(nm_arr)?, require(nm_dep)?, require(nm_total)?];

        let found: Vec<Option<usize>> = AIRPORT_REPORTED_COLUMNS.iter().map(|c| find(*c)).collect();
        let airport = match found.as_slice() {
            [Some(arr), Some(dep), Some(total)] => Some([*arr, *dep, *total]),
            [None, None, None] => None,
            _ => {
                let missing = AIRPORT_REPORTED_COLUMNS
                    .iter()
                    .zip(&found)
                    .find(|(_, idx)| idx.is_none())
                    .map(|(name, _)| *name)
                    .unwrap_or(schema::AIRPORT_TOTAL_FLIGHTS);
                return Err(DataLoadError::MissingColumn(missing));
            }
        };

        Ok(HeaderLayout {
            date: require(date)?,
            state_name: require(state_name)?,
            airport_name: require(airport_name)?,
            nm: layout_nm,
            airport,
        })
    }

    /// True when the airport-reported columns are part of the table.
    pub fn has_airport_reported_data(&self) -> bool {
        self.airport.is_some()
    }

    /// Convert one data row into a FlightRecord.
    pub fn parse_record(&self, record: &StringRecord) -> Result<FlightRecord> {
        let line = record.position().map(|p| p.line()).unwrap_or_default();
        let field = |idx: usize| record.get(idx).unwrap_or("").trim();

        let date_str = field(self.date);
        let date = atd_utils::dates::parse_dataset_date(date_str).map_err(|_| {
            DataLoadError::DateParse {
                line,
                value: date_str.to_string(),
            }
        })?;

        let count = |idx: usize, column: &'static str| -> Result<u32> {
            let value = field(idx);
            value.parse::<u32>().map_err(|_| DataLoadError::InvalidCount {
                line,
                column,
                value: value.to_string(),
            })
        };
        let optional_count = |idx: usize, column: &'static str| -> Result<Option<u32>> {
            if field(idx).is_empty() {
                Ok(None)
            } else {
                count(idx, column).map(Some)
            }
        };

        let (airport_arr_flights, airport_dep_flights, airport_total_flights) = match self.airport
        {
            Some([arr, dep, total]) => (
                optional_count(arr, schema::AIRPORT_ARR_FLIGHTS)?,
                optional_count(dep, schema::AIRPORT_DEP_FLIGHTS)?,
                optional_count(total, schema::AIRPORT_TOTAL_FLIGHTS)?,
            ),
            None => (None, None, None),
        };

        Ok(FlightRecord {
            date,
            state_name: field(self.state_name).to_string(),
            airport_name: field(self.airport_name).to_string(),
            nm_arr_flights: count(self.nm[0], schema::NM_ARR_FLIGHTS)?,
            nm_dep_flights: count(self.nm[1], schema::NM_DEP_FLIGHTS)?,
            nm_total_flights: count(self.nm[2], schema::NM_TOTAL_FLIGHTS)?,
            airport_arr_flights,
            airport_dep_flights,
            airport_total_flights,
        })
    }
}
