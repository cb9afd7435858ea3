//! Loading the dataset and region boundaries into a [`Dashboard`].
//!
//! # Formats
//!
//! - **Traffic dataset** (has headers, `;`-separated):
//!   `FLT_DATE;APT_NAME;STATE_NAME;FLT_DEP_1;FLT_ARR_1;FLT_TOT_1[;FLT_DEP_IFR_2;FLT_ARR_IFR_2;FLT_TOT_IFR_2]`
//! - **Region boundaries**: GeoJSON `FeatureCollection` with a `NAME` property per feature

use crate::Dashboard;
use atd_core::{error::Result, Dataset, RegionBoundaries};
use std::{path::Path, sync::Arc};

impl Dashboard {
    /// Load the traffic dataset from a `;`-separated string.
    ///
    /// # Example CSV
    /// ```text
    /// FLT_DATE;APT_NAME;STATE_NAME;FLT_DEP_1;FLT_ARR_1;FLT_TOT_1
    /// 01/01/2020;Tirana;Albania;30;31;61
    /// ```
    pub fn load_csv(csv_data: &str) -> Result<Self> {
        Ok(Dashboard::new(Dataset::from_csv_str(csv_data)?))
    }

    /// Load the traffic dataset from a file.
    pub fn load_path(path: impl AsRef<Path>, delimiter: u8) -> Result<Self> {
        Ok(Dashboard::new(Dataset::from_path_with_delimiter(
            path, delimiter,
        )?))
    }

    /// Attach region boundaries used by the choropleth.
    pub fn with_regions(mut self, regions: RegionBoundaries) -> Self {
        self.regions = Some(Arc::new(regions));
        self
    }

    /// Parse GeoJSON boundaries and attach them.
    pub fn load_regions(self, geojson: &str) -> Result<Self> {
        let regions = RegionBoundaries::from_geojson(geojson)?;
        Ok(self.with_regions(regions))
    }

    /// Read GeoJSON boundaries from a file and attach them.
    pub fn load_regions_path(self, path: impl AsRef<Path>) -> Result<Self> {
        let regions = RegionBoundaries::from_path(path)?;
        Ok(self.with_regions(regions))
    }
}
