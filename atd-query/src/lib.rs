//! Query interface of the airport traffic dashboard.
//!
//! The UI layer holds one [`Dashboard`] and calls its `get_*` methods with
//! plain filter values every time a control changes. Each call filters the
//! shared dataset afresh and returns serializable rows ready to be drawn.
//!
//! # Architecture
//!
//! - The [`Dataset`](atd_core::Dataset) is loaded once into in-memory SQLite
//!   and wrapped in an `Arc`; the store is read-only afterwards, so clones of
//!   the dashboard can be queried from any number of threads
//! - Region boundaries for the choropleth are optional and attached after load
//! - Result rows derive `Serialize` for JSON or CSV export
//!
//! # Usage
//!
//! ```rust
//! use atd_query::Dashboard;
//! use atd_data::FilterSelection;
//! use atd_core::Source;
//!
//! let dashboard = Dashboard::load_csv(
//!     "FLT_DATE;APT_NAME;STATE_NAME;FLT_DEP_1;FLT_ARR_1;FLT_TOT_1\n\
//!      01/01/2020;X;A;5;5;10\n\
//!      02/01/2020;X;A;10;10;20\n",
//! )
//! .unwrap();
//!
//! let series = dashboard.get_time_series(&FilterSelection::new()).unwrap();
//! assert_eq!(series.len(), 2);
//! let top = dashboard.get_top_airports(&FilterSelection::new(), Source::Nm).unwrap();
//! assert_eq!(top[0].daily_average, 15.0);
//! ```

mod loader;
pub mod models;
mod queries;

use atd_core::{Dataset, RegionBoundaries};
use std::sync::Arc;

/// Read-only dashboard over one immutable dataset.
///
/// Cloning is cheap (`Arc`) and every clone sees the same data.
#[derive(Debug, Clone)]
pub struct Dashboard {
    dataset: Arc<Dataset>,
    regions: Option<Arc<RegionBoundaries>>,
}

impl Dashboard {
    /// Wrap an already loaded dataset.
    pub fn new(dataset: Dataset) -> Self {
        Self {
            dataset: Arc::new(dataset),
            regions: None,
        }
    }

    pub fn dataset(&self) -> &Dataset {
        &self.dataset
    }

    pub fn regions(&self) -> Option<&RegionBoundaries> {
        self.regions.as_deref()
    }
}
