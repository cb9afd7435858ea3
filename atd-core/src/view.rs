//! A filtered slice of the dataset.
//!
//! Every query narrows the immutable [`Dataset`](crate::Dataset) into a
//! `FilteredView`: the dataset plus the conditions a row must meet. Views are
//! cheap to build and never touch the store until a query runs, at which
//! point the conditions become the `WHERE` clause of one SQL statement over
//! the `flights` table.

use crate::{
    dataset::Dataset,
    date_range::DateRange,
    error::QueryResult,
};
use atd_utils::dates::format_date;
use chrono::NaiveDate;
use rusqlite::{params_from_iter, types::Value, Row};

/// One restriction on the rows of a view.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Condition {
    /// Date within the inclusive range
    Between(DateRange),
    /// Date equal to the given day
    On(NaiveDate),
    StateIn(Vec<String>),
    AirportIn(Vec<String>),
    /// Matches no row
    Nothing,
}

impl Condition {
    fn push_sql(&self, clauses: &mut Vec<String>, values: &mut Vec<Value>) {
        match self {
            Condition::Between(range) => {
                clauses.push("date BETWEEN ? AND ?".to_string());
                values.push(Value::Text(format_date(&range.start())));
                values.push(Value::Text(format_date(&range.end())));
            }
            Condition::On(date) => {
                clauses.push("date = ?".to_string());
                values.push(Value::Text(format_date(date)));
            }
            Condition::StateIn(names) => {
                clauses.push(format!("state_name IN ({})", placeholders(names.len())));
                values.extend(names.iter().cloned().map(Value::Text));
            }
            Condition::AirportIn(names) => {
                clauses.push(format!("airport_name IN ({})", placeholders(names.len())));
                values.extend(names.iter().cloned().map(Value::Text));
            }
            Condition::Nothing => clauses.push("0".to_string()),
        }
    }
}

fn placeholders(n: usize) -> String {
    vec!["?"; n].join(", ")
}

#[derive(Debug, Clone)]
pub struct FilteredView<'a> {
    dataset: &'a Dataset,
    conditions: Vec<Condition>,
}

impl<'a> FilteredView<'a> {
    /// Every row of `dataset`.
    pub fn new(dataset: &'a Dataset) -> Self {
        FilteredView {
            dataset,
            conditions: Vec::new(),
        }
    }

    /// A view matching no row. It keeps the capability flag of its dataset.
    pub fn empty(dataset: &'a Dataset) -> Self {
        FilteredView::new(dataset).narrow(Condition::Nothing)
    }

    /// Add one more condition; rows must meet all of them.
    pub fn narrow(mut self, condition: Condition) -> Self {
        self.conditions.push(condition);
        self
    }

    pub fn has_airport_reported_data(&self) -> bool {
        self.dataset.has_airport_reported_data()
    }

    /// Run `SELECT <select> FROM flights WHERE <conditions> <tail>`.
    ///
    /// `tail` holds the GROUP BY / ORDER BY / LIMIT part; its `?` placeholders
    /// are bound to `tail_values` after the condition values.
    pub fn query<T, F>(
        &self,
        select: &str,
        tail: &str,
        tail_values: &[Value],
        map: F,
    ) -> QueryResult<Vec<T>>
    where
        F: FnMut(&Row<'_>) -> rusqlite::Result<T>,
    {
        let mut clauses = Vec::with_capacity(self.conditions.len());
        let mut values = Vec::new();
        for condition in &self.conditions {
            condition.push_sql(&mut clauses, &mut values);
        }
        values.extend_from_slice(tail_values);

        let mut sql = format!("SELECT {} FROM flights", select);
        if !clauses.is_empty() {
            sql.push_str(" WHERE ");
            sql.push_str(&clauses.join(" AND "));
        }
        if !tail.is_empty() {
            sql.push(' ');
            sql.push_str(tail);
        }
        log::trace!("[ATD] view: {}", sql);

        let conn = self.dataset.connection();
        let mut stmt = conn.prepare(&sql)?;
        let rows = stmt
            .query_map(params_from_iter(values), map)?
            .collect::<Result<Vec<_>, _>>()?;
        Ok(rows)
    }

    /// Number of matching rows.
    pub fn len(&self) -> QueryResult<usize> {
        let counts = self.query("COUNT(*)", "", &[], |row| row.get::<_, i64>(0))?;
        Ok(counts
            .first()
            .and_then(|&n| usize::try_from(n).ok())
            .unwrap_or(0))
    }

    pub fn is_empty(&self) -> QueryResult<bool> {
        Ok(self.len()? == 0)
    }

    /// First date in the view, `None` when empty.
    pub fn min_date(&self) -> QueryResult<Option<NaiveDate>> {
        self.single_date("MIN(date)")
    }

    /// Last date in the view, `None` when empty.
    pub fn max_date(&self) -> QueryResult<Option<NaiveDate>> {
        self.single_date("MAX(date)")
    }

    /// The day after the last date, for widgets taking an exclusive upper bound.
    pub fn max_date_exclusive(&self) -> QueryResult<Option<NaiveDate>> {
        Ok(self.max_date()?.map(|d| atd_utils::dates::next_day(&d)))
    }

    fn single_date(&self, select: &str) -> QueryResult<Option<NaiveDate>> {
        let dates = self.query(select, "", &[], |row| row.get::<_, Option<NaiveDate>>(0))?;
        Ok(dates.into_iter().next().flatten())
    }

    /// State names in order of first appearance in the source table.
    pub fn distinct_states(&self) -> QueryResult<Vec<String>> {
        self.query(
            "state_name",
            "GROUP BY state_name ORDER BY MIN(rowid)",
            &[],
            |row| row.get(0),
        )
    }

    /// Airport names in order of first appearance in the source table.
    pub fn distinct_airports(&self) -> QueryResult<Vec<String>> {
        self.query(
            "airport_name",
            "GROUP BY airport_name ORDER BY MIN(rowid)",
            &[],
            |row| row.get(0),
        )
    }
}
