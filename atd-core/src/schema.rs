//! Canonical field names of the traffic dataset and the column groupings
//! derived from them.

use crate::error::InvalidFilterError;
use serde::{Deserialize, Serialize};
use std::{fmt, str::FromStr};

pub const DATE: &str = "FLT_DATE";
pub const STATE_NAME: &str = "STATE_NAME";
pub const AIRPORT_NAME: &str = "APT_NAME";

pub const NM_ARR_FLIGHTS: &str = "FLT_ARR_1";
pub const NM_DEP_FLIGHTS: &str = "FLT_DEP_1";
pub const NM_TOTAL_FLIGHTS: &str = "FLT_TOT_1";

pub const AIRPORT_ARR_FLIGHTS: &str = "FLT_ARR_IFR_2";
pub const AIRPORT_DEP_FLIGHTS: &str = "FLT_DEP_IFR_2";
pub const AIRPORT_TOTAL_FLIGHTS: &str = "FLT_TOT_IFR_2";

/// GeoJSON feature property joined against `STATE_NAME`.
pub const REGION_NAME_PROPERTY: &str = "NAME";

/// The dataset is published `;`-separated.
pub const DEFAULT_DELIMITER: u8 = b';';

/// Headers every dataset must carry.
pub const REQUIRED_COLUMNS: [&str; 6] = [
    DATE,
    STATE_NAME,
    AIRPORT_NAME,
    NM_ARR_FLIGHTS,
    NM_DEP_FLIGHTS,
    NM_TOTAL_FLIGHTS,
];

/// Optional headers: present all together or not at all.
pub const AIRPORT_REPORTED_COLUMNS: [&str; 3] = [
    AIRPORT_ARR_FLIGHTS,
    AIRPORT_DEP_FLIGHTS,
    AIRPORT_TOTAL_FLIGHTS,
];

/// One of the six flight count columns.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum FlightColumn {
    NmArrivals,
    NmDepartures,
    NmTotal,
    AirportArrivals,
    AirportDepartures,
    AirportTotal,
}

impl FlightColumn {
    /// Header of this column in the dataset.
    pub fn header(&self) -> &'static str {
        match self {
            FlightColumn::NmArrivals => NM_ARR_FLIGHTS,
            FlightColumn::NmDepartures => NM_DEP_FLIGHTS,
            FlightColumn::NmTotal => NM_TOTAL_FLIGHTS,
            FlightColumn::AirportArrivals => AIRPORT_ARR_FLIGHTS,
            FlightColumn::AirportDepartures => AIRPORT_DEP_FLIGHTS,
            FlightColumn::AirportTotal => AIRPORT_TOTAL_FLIGHTS,
        }
    }

    /// Column of the `flights` table holding these counts.
    pub fn sql_column(&self) -> &'static str {
        match self {
            FlightColumn::NmArrivals => "nm_arr",
            FlightColumn::NmDepartures => "nm_dep",
            FlightColumn::NmTotal => "nm_total",
            FlightColumn::AirportArrivals => "apt_arr",
            FlightColumn::AirportDepartures => "apt_dep",
            FlightColumn::AirportTotal => "apt_total",
        }
    }
}

impl fmt::Display for FlightColumn {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.header())
    }
}

/// The (network manager, airport) column pair aggregated for one movement type.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ColumnPair {
    pub nm: FlightColumn,
    pub airport: FlightColumn,
}

impl ColumnPair {
    pub const ARRIVALS: ColumnPair = ColumnPair {
        nm: FlightColumn::NmArrivals,
        airport: FlightColumn::AirportArrivals,
    };
    pub const DEPARTURES: ColumnPair = ColumnPair {
        nm: FlightColumn::NmDepartures,
        airport: FlightColumn::AirportDepartures,
    };
    pub const TOTAL: ColumnPair = ColumnPair {
        nm: FlightColumn::NmTotal,
        airport: FlightColumn::AirportTotal,
    };
}

/// Which party reported the counts: the network manager or the airport itself.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum Source {
    #[default]
    #[serde(rename = "NM")]
    Nm,
    #[serde(rename = "APT")]
    Apt,
}

impl Source {
    /// The total-flights column for this source; rankings always use totals.
    pub fn total_column(&self) -> FlightColumn {
        match self {
            Source::Nm => FlightColumn::NmTotal,
            Source::Apt => FlightColumn::AirportTotal,
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            Source::Nm => "NM",
            Source::Apt => "APT",
        }
    }
}

impl fmt::Display for Source {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl FromStr for Source {
    type Err = InvalidFilterError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_uppercase().as_str() {
            "NM" => Ok(Source::Nm),
            "APT" | "AIRPORT" => Ok(Source::Apt),
            _ => Err(InvalidFilterError::UnknownSource(s.to_string())),
        }
    }
}

// ───────────────────── Store schema ─────────────────────

/// SQL that creates the in-memory flight store.
///
/// One row per input record. Dates are ISO text (`YYYY-MM-DD`) so string
/// order is date order. Airport-reported counts are NULL when the cell was
/// blank or the dataset has no such columns.
pub fn create_schema() -> &'static str {
    "
    CREATE TABLE IF NOT EXISTS flights (
        date TEXT NOT NULL,
        state_name TEXT NOT NULL,
        airport_name TEXT NOT NULL,
        nm_arr INTEGER NOT NULL,
        nm_dep INTEGER NOT NULL,
        nm_total INTEGER NOT NULL,
        apt_arr INTEGER,
        apt_dep INTEGER,
        apt_total INTEGER
    );

    CREATE INDEX IF NOT EXISTS idx_flights_date ON flights(date);
    CREATE INDEX IF NOT EXISTS idx_flights_state ON flights(state_name);
    CREATE INDEX IF NOT EXISTS idx_flights_airport ON flights(airport_name);
    "
}
