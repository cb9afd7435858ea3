//! Core types for the airport traffic dashboard.
//!
//! Holds the dataset schema, the immutable [`dataset::Dataset`] store loaded
//! once at startup into in-memory SQLite, the [`view::FilteredView`] every
//! query narrows it with,
//! the movement-to-column resolver and the region boundaries used for the
//! state choropleth.

pub mod dataset;
pub mod date_range;
pub mod error;
pub mod flight_record;
pub mod movement;
pub mod region;
pub mod schema;
pub mod view;

pub use dataset::Dataset;
pub use date_range::DateRange;
pub use error::{DataLoadError, InvalidFilterError, QueryError, QueryResult};
pub use flight_record::FlightRecord;
pub use movement::{resolve_columns, Movement};
pub use region::{Region, RegionBoundaries};
pub use schema::{ColumnPair, FlightColumn, Source};
pub use view::{Condition, FilteredView};
