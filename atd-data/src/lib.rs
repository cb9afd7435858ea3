//! Data processing for airport traffic records.
//!
//! This crate narrows the dataset down to a filter selection and reduces the
//! result into the shapes each dashboard panel draws: daily time series,
//! per-state totals, monthly seasonality and top airport rankings.

pub mod aggregate;
pub mod filter;
pub mod smoothing;

pub use aggregate::{
    daily_average_by_state, seasonal_average_by_month, time_series_by_date, top_airports,
    AirportAverage, MonthlyAverage, StateTotal, TimeSeriesPoint, TOP_AIRPORTS_DEFAULT,
};
pub use filter::{filter, FilterSelection};
pub use smoothing::SavitzkyGolay;
