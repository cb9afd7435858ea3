//! The immutable dataset store.
//!
//! A [`Dataset`] is parsed once, validated as a whole, and written into an
//! in-memory SQLite table that is read-only from then on. Loading either
//! succeeds completely or returns a [`DataLoadError`]; nothing is ever
//! served from a partially parsed table.

use crate::{
    date_range::DateRange,
    error::{DataLoadError, Result},
    flight_record::{FlightRecord, HeaderLayout},
    schema::{self, DEFAULT_DELIMITER},
    view::FilteredView,
};
use atd_utils::dates::format_date;
use chrono::NaiveDate;
use csv::{ReaderBuilder, Trim};
use rusqlite::{params, Connection};
use std::{
    fs::File,
    io::Read,
    path::Path,
    sync::{Arc, Mutex, MutexGuard, PoisonError},
};

/// The loaded flight table.
///
/// The connection sits behind `Arc<Mutex<..>>` so clones share one store and
/// the dataset can be queried from several threads.
#[derive(Debug, Clone)]
pub struct Dataset {
    conn: Arc<Mutex<Connection>>,
    airport_reported: bool,
    range: DateRange,
    len: usize,
}

impl Dataset {
    /// Build a dataset from records already in memory.
    ///
    /// `airport_reported` states whether the source carried the optional
    /// airport-reported columns.
    pub fn new(records: Vec<FlightRecord>, airport_reported: bool) -> Result<Self> {
        if records.is_empty() {
            return Err(DataLoadError::Empty);
        }

        let mut conn = Connection::open_in_memory()?;
        conn.execute_batch(schema::create_schema())?;
        insert_records(&mut conn, &records)?;

        let range = conn.query_row("SELECT MIN(date), MAX(date) FROM flights", [], |row| {
            Ok(DateRange(row.get(0)?, row.get(1)?))
        })?;
        conn.execute_batch("PRAGMA query_only = ON;")?;

        Ok(Dataset {
            conn: Arc::new(Mutex::new(conn)),
            airport_reported,
            range,
            len: records.len(),
        })
    }

    /// Parse a `;`-separated table held in a string.
    pub fn from_csv_str(csv_data: &str) -> Result<Self> {
        Dataset::from_reader(csv_data.as_bytes(), DEFAULT_DELIMITER)
    }

    /// Open and parse a `;`-separated table from disk.
    pub fn from_path(path: impl AsRef<Path>) -> Result<Self> {
        Dataset::from_path_with_delimiter(path, DEFAULT_DELIMITER)
    }

    pub fn from_path_with_delimiter(path: impl AsRef<Path>, delimiter: u8) -> Result<Self> {
        let path = path.as_ref();
        log::info!("[ATD] loader: reading dataset from {}", path.display());
        let file = File::open(path)?;
        Dataset::from_reader(file, delimiter)
    }

    /// Parse a delimited table with a header row.
    ///
    /// Expected headers (any order, extra columns ignored):
    /// `FLT_DATE;APT_NAME;STATE_NAME;FLT_DEP_1;FLT_ARR_1;FLT_TOT_1`, optionally
    /// followed by `FLT_DEP_IFR_2;FLT_ARR_IFR_2;FLT_TOT_IFR_2`.
    ///
    /// # Example CSV
    /// ```text
    /// FLT_DATE;APT_NAME;STATE_NAME;FLT_DEP_1;FLT_ARR_1;FLT_TOT_1
    /// 01/01/2020;Tirana;Albania;30;31;61
    /// ```
    pub fn from_reader<R: Read>(reader: R, delimiter: u8) -> Result<Self> {
        let mut rdr = ReaderBuilder::new()
            .delimiter(delimiter)
            .has_headers(true)
            .trim(Trim::All)
            .from_reader(reader);

        let layout = HeaderLayout::from_headers(rdr.headers()?)?;
        let mut records = Vec::new();
        for result in rdr.records() {
            let row = result?;
            records.push(layout.parse_record(&row)?);
        }

        let dataset = Dataset::new(records, layout.has_airport_reported_data())?;
        log::info!(
            "[ATD] loader: Loaded {} flight records from {} to {} (airport-reported data: {})",
            dataset.len,
            dataset.range.0,
            dataset.range.1,
            dataset.airport_reported
        );
        Ok(dataset)
    }

    /// Lock the store for one query. A poisoned lock still guards a
    /// read-only table, so it is recovered rather than propagated.
    pub(crate) fn connection(&self) -> MutexGuard<'_, Connection> {
        self.conn.lock().unwrap_or_else(PoisonError::into_inner)
    }

    pub fn len(&self) -> usize {
        self.len
    }

    /// Always false for a successfully loaded dataset.
    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// A view over every record.
    pub fn view(&self) -> FilteredView<'_> {
        FilteredView::new(self)
    }

    pub fn has_airport_reported_data(&self) -> bool {
        self.airport_reported
    }

    pub fn min_date(&self) -> NaiveDate {
        self.range.0
    }

    pub fn max_date(&self) -> NaiveDate {
        self.range.1
    }

    /// `max_date + 1 day`, the "allowed up to" bound for date pickers.
    pub fn max_date_exclusive(&self) -> NaiveDate {
        atd_utils::dates::next_day(&self.range.1)
    }

    /// The full inclusive range of dates in the dataset.
    pub fn date_range(&self) -> DateRange {
        self.range
    }
}

/// Write every record in one transaction.
fn insert_records(conn: &mut Connection, records: &[FlightRecord]) -> rusqlite::Result<()> {
    let tx = conn.transaction()?;
    {
        let mut stmt = tx.prepare(
            "INSERT INTO flights
             (date, state_name, airport_name, nm_arr, nm_dep, nm_total, apt_arr, apt_dep, apt_total)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9)",
        )?;
        for record in records {
            stmt.execute(params![
                format_date(&record.date),
                record.state_name,
                record.airport_name,
                record.nm_arr_flights,
                record.nm_dep_flights,
                record.nm_total_flights,
                record.airport_arr_flights,
                record.airport_dep_flights,
                record.airport_total_flights,
            ])?;
        }
    }
    tx.commit()
}
