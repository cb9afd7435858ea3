//! Global options and dashboard construction.

use crate::args::{parse_delimiter, OutputFormat};
use anyhow::Context;
use atd_core::schema::DEFAULT_DELIMITER;
use atd_query::Dashboard;
use clap::Args;
use std::path::PathBuf;

/// Options shared by every subcommand.
#[derive(Args, Debug, Clone)]
pub struct DashboardConfig {
    /// Airport traffic dataset
    #[arg(short, long, env = "ATD_DATA")]
    pub data: PathBuf,

    /// Field delimiter of the dataset
    #[arg(long, default_value = ";", value_parser = parse_delimiter)]
    pub delimiter: u8,

    /// GeoJSON state boundaries, needed by `choropleth`
    #[arg(short, long, env = "ATD_REGIONS")]
    pub regions: Option<PathBuf>,

    /// Output format
    #[arg(short, long, value_enum, default_value_t = OutputFormat::Csv)]
    pub format: OutputFormat,
}

impl DashboardConfig {
    pub fn new(data: impl Into<PathBuf>) -> Self {
        DashboardConfig {
            data: data.into(),
            delimiter: DEFAULT_DELIMITER,
            regions: None,
            format: OutputFormat::default(),
        }
    }

    /// Load the dataset, and the boundaries when configured.
    ///
    /// Any load failure is fatal: no dashboard is built from partial data.
    pub fn build_dashboard(&self) -> anyhow::Result<Dashboard> {
        let mut dashboard = Dashboard::load_path(&self.data, self.delimiter)
            .with_context(|| format!("failed to load traffic data from {}", self.data.display()))?;
        if let Some(regions) = &self.regions {
            dashboard = dashboard.load_regions_path(regions).with_context(|| {
                format!("failed to load region boundaries from {}", regions.display())
            })?;
        }
        log::info!(
            "[ATD] config: dashboard ready over {} records ({} region boundaries)",
            dashboard.dataset().len(),
            dashboard.regions().map_or(0, |r| r.len())
        );
        Ok(dashboard)
    }
}
