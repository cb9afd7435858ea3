//! Shared utility functions for ATD crates.

/// Date utility functions
pub mod dates {
    use chrono::NaiveDate;

    /// Date format used by the traffic dataset: "DD/MM/YYYY"
    pub const DATASET_FORMAT: &str = "%d/%m/%Y";

    /// Date format used by the dashboard date pickers: "MM/DD/YYYY"
    pub const PICKER_FORMAT: &str = "%m/%d/%Y";

    /// ISO date format: "YYYY-MM-DD"
    pub const ISO_FORMAT: &str = "%Y-%m-%d";

    /// Three-letter month labels, indexed by month number - 1.
    pub const MONTH_LABELS: [&str; 12] = [
        "JAN", "FEB", "MAR", "APR", "MAY", "JUN", "JUL", "AUG", "SEP", "OCT", "NOV", "DEC",
    ];

    /// Format a NaiveDate as "YYYY-MM-DD"
    pub fn format_date(date: &NaiveDate) -> String {
        date.format(ISO_FORMAT).to_string()
    }

    /// Format a NaiveDate the way the date pickers expect it ("MM/DD/YYYY")
    pub fn format_picker_date(date: &NaiveDate) -> String {
        date.format(PICKER_FORMAT).to_string()
    }

    /// Parse a date string in "YYYY-MM-DD" format
    pub fn parse_date(s: &str) -> anyhow::Result<NaiveDate> {
        Ok(NaiveDate::parse_from_str(s, ISO_FORMAT)?)
    }

    /// Parse a date string in the dataset's "DD/MM/YYYY" format
    pub fn parse_dataset_date(s: &str) -> anyhow::Result<NaiveDate> {
        Ok(NaiveDate::parse_from_str(s.trim(), DATASET_FORMAT)?)
    }

    /// Parse a user-supplied date, accepting either "YYYY-MM-DD" or "DD/MM/YYYY".
    pub fn parse_any_date(s: &str) -> anyhow::Result<NaiveDate> {
        let s = s.trim();
        if s.contains('/') {
            parse_dataset_date(s)
        } else {
            parse_date(s)
        }
    }

    /// The day after `date`, saturating at the last representable date.
    pub fn next_day(date: &NaiveDate) -> NaiveDate {
        date.succ_opt().unwrap_or(*date)
    }

    /// Three-letter label for a month number (1-12).
    pub fn month_label(month: u32) -> &'static str {
        MONTH_LABELS
            .get(month.wrapping_sub(1) as usize)
            .copied()
            .unwrap_or("???")
    }

}
