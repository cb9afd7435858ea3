use crate::error::InvalidFilterError;
use chrono::NaiveDate;
use serde::Serialize;

/// An inclusive range of dates, from the start date through the end date.
#[derive(Clone, Eq, PartialEq, Copy, Debug, Serialize)]
pub struct DateRange(pub NaiveDate, pub NaiveDate);

impl DateRange {
    /// Fill in missing bounds from `fallback`: a missing start takes the
    /// fallback's start, a missing end takes the fallback's end.
    pub fn resolve(start: Option<NaiveDate>, end: Option<NaiveDate>, fallback: DateRange) -> Self {
        DateRange(start.unwrap_or(fallback.0), end.unwrap_or(fallback.1))
    }

    pub fn start(&self) -> NaiveDate {
        self.0
    }

    pub fn end(&self) -> NaiveDate {
        self.1
    }

    /// An inverted range (end before start) contains no date.
    pub fn validate(&self) -> Result<(), InvalidFilterError> {
        if self.1 < self.0 {
            Err(InvalidFilterError::InvertedDateRange {
                start: self.0,
                end: self.1,
            })
        } else {
            Ok(())
        }
    }
}
