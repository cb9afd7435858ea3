//! Command implementations for the ATD CLI.
//!
//! Each subcommand answers one dashboard query against the configured
//! dataset and writes the rows to stdout as CSV or JSON.

use atd_core::Source;
use atd_data::TOP_AIRPORTS_DEFAULT;
use chrono::NaiveDate;
use clap::Subcommand;
use std::io::Write;

pub mod args;
pub mod config;
pub mod output;
pub mod query;

pub use args::{FilterArgs, OutputFormat};
pub use config::DashboardConfig;

#[derive(Subcommand, Debug, Clone, PartialEq)]
pub enum Command {
    /// List states, optionally only those owning the given airports
    States {
        /// Airport to look up (repeatable)
        #[arg(long = "airport")]
        airports: Vec<String>,
    },

    /// List airports, optionally only those in the given states
    Airports {
        /// State to look up (repeatable)
        #[arg(long = "state")]
        states: Vec<String>,
    },

    /// Show the first and last date of the dataset
    Range,

    /// Daily flight counts for the selection
    TimeSeries {
        #[command(flatten)]
        filter: FilterArgs,

        /// Add Savitzky-Golay smoothed lines (window 53, cubic)
        #[arg(long)]
        smooth: bool,
    },

    /// Mean flights per record for each calendar month
    Seasonality {
        #[command(flatten)]
        filter: FilterArgs,
    },

    /// Flights per state on a single date
    StateMap {
        /// Movement switch (repeatable)
        #[arg(long = "movement")]
        movement: Vec<String>,

        /// Date to map (DD/MM/YYYY or YYYY-MM-DD)
        #[arg(long, value_parser = args::parse_date_arg)]
        date: NaiveDate,
    },

    /// Flights per state on a single date, joined with state boundaries
    Choropleth {
        /// Movement switch (repeatable)
        #[arg(long = "movement")]
        movement: Vec<String>,

        /// Date to map (DD/MM/YYYY or YYYY-MM-DD)
        #[arg(long, value_parser = args::parse_date_arg)]
        date: NaiveDate,
    },

    /// Airports ranked by mean daily traffic
    TopAirports {
        #[command(flatten)]
        filter: FilterArgs,

        /// Who reported the counts: nm or apt
        #[arg(long, default_value = "nm")]
        source: Source,

        /// Number of airports to list
        #[arg(long, default_value_t = TOP_AIRPORTS_DEFAULT)]
        count: usize,
    },

    /// Every dashboard panel for the selection, as JSON
    Snapshot {
        #[command(flatten)]
        filter: FilterArgs,
    },
}

/// Run `command` and write its result to stdout.
pub fn run(config: &DashboardConfig, command: Command) -> anyhow::Result<()> {
    let stdout = std::io::stdout();
    run_with_writer(config, command, stdout.lock())
}

/// Run `command` and write its result to `out`.
pub fn run_with_writer<W: Write>(
    config: &DashboardConfig,
    command: Command,
    out: W,
) -> anyhow::Result<()> {
    let dashboard = config.build_dashboard()?;
    let format = config.format;
    match command {
        Command::States { airports } => query::run_states(&dashboard, &airports, format, out),
        Command::Airports { states } => query::run_airports(&dashboard, &states, format, out),
        Command::Range => query::run_range(&dashboard, format, out),
        Command::TimeSeries { filter, smooth } => {
            query::run_time_series(&dashboard, &filter, smooth, format, out)
        }
        Command::Seasonality { filter } => {
            query::run_seasonality(&dashboard, &filter, format, out)
        }
        Command::StateMap { movement, date } => {
            query::run_state_map(&dashboard, &movement, date, format, out)
        }
        Command::Choropleth { movement, date } => {
            query::run_choropleth(&dashboard, &movement, date, format, out)
        }
        Command::TopAirports {
            filter,
            source,
            count,
        } => query::run_top_airports(&dashboard, &filter, source, count, format, out),
        Command::Snapshot { filter } => query::run_snapshot(&dashboard, &filter, format, out),
    }
}
