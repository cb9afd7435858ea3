//! Argument types shared by several subcommands.

use atd_core::Movement;
use atd_data::FilterSelection;
use atd_utils::dates::parse_any_date;
use chrono::NaiveDate;
use clap::{Args, ValueEnum};

/// Filter selection as given on the command line.
#[derive(Args, Debug, Clone, Default, PartialEq, Eq)]
pub struct FilterArgs {
    /// Only include this state (repeatable)
    #[arg(long = "state")]
    pub states: Vec<String>,

    /// Only include this airport (repeatable)
    #[arg(long = "airport")]
    pub airports: Vec<String>,

    /// Movement switch: arrival, departure or both (repeatable; both switches mean totals)
    #[arg(long = "movement")]
    pub movement: Vec<String>,

    /// First day of the period (DD/MM/YYYY or YYYY-MM-DD)
    #[arg(long, value_parser = parse_date_arg)]
    pub start: Option<NaiveDate>,

    /// Last day of the period, inclusive (DD/MM/YYYY or YYYY-MM-DD)
    #[arg(long, value_parser = parse_date_arg)]
    pub end: Option<NaiveDate>,
}

impl FilterArgs {
    /// Validate the movement switches and build the selection.
    pub fn to_selection(&self) -> anyhow::Result<FilterSelection> {
        let movement = Movement::from_selection(self.movement.as_slice())?;
        Ok(FilterSelection::new()
            .with_states(self.states.iter().cloned())
            .with_airports(self.airports.iter().cloned())
            .with_movement(movement)
            .with_dates(self.start, self.end))
    }
}

/// How result rows are written to stdout.
#[derive(ValueEnum, Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum OutputFormat {
    #[default]
    Csv,
    Json,
}

pub(crate) fn parse_date_arg(s: &str) -> Result<NaiveDate, String> {
    parse_any_date(s).map_err(|e| format!("invalid date '{}': {}", s, e))
}

/// Accepts one ASCII character, or `tab`/`\t`.
pub(crate) fn parse_delimiter(s: &str) -> Result<u8, String> {
    match s {
        "tab" | "\\t" | "\t" => Ok(b'\t'),
        _ => match s.as_bytes() {
            [byte] if byte.is_ascii() => Ok(*byte),
            _ => Err(format!(
                "delimiter must be a single ASCII character, got '{}'",
                s
            )),
        },
    }
}
