//! Dashboard configuration.
//!
//! Loaded from an optional JSON file; every field falls back to the
//! dashboard's stock defaults. Command-line flags are applied on top.

use std::path::{Path, PathBuf};

use anyhow::{bail, Context, Result};
use serde::{Deserialize, Serialize};

use crate::cli::Args;
use crate::data::aggregate::AggregateSettings;
use crate::data::filter::FilterDefaults;

/// Root configuration structure.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DashboardConfig {
    /// Dataset opened at startup.
    pub data_path: Option<PathBuf>,

    /// Initial sidebar values.
    pub filters: FilterDefaults,

    pub histogram_bins: usize,

    /// How many locations the ranking chart shows.
    pub top_locations: usize,
}

impl Default for DashboardConfig {
    fn default() -> Self {
        let settings = AggregateSettings::default();
        Self {
            data_path: None,
            filters: FilterDefaults::default(),
            histogram_bins: settings.histogram_bins,
            top_locations: settings.top_locations,
        }
    }
}

impl DashboardConfig {
    /// Read a JSON config file.
    pub fn load(path: &Path) -> Result<Self> {
        let text = std::fs::read_to_string(path)
            .with_context(|| format!("reading config file {}", path.display()))?;
        let config: DashboardConfig = serde_json::from_str(&text)
            .with_context(|| format!("parsing config file {}", path.display()))?;
        config.validate()?;
        Ok(config)
    }

    /// Build the effective configuration: file (if any), then CLI overrides.
    pub fn from_args(args: &Args) -> Result<Self> {
        let mut config = match &args.config {
            Some(path) => Self::load(path)?,
            None => Self::default(),
        };

        if let Some(path) = &args.data {
            config.data_path = Some(path.clone());
        }
        if let Some(bins) = args.bins {
            config.histogram_bins = bins;
        }
        if let Some(top) = args.top {
            config.top_locations = top;
        }

        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<()> {
        if self.histogram_bins == 0 {
            bail!("histogram_bins must be at least 1");
        }
        let (lo, hi) = self.filters.age_range;
        if lo > hi {
            bail!("filters.age_range is inverted: ({lo}, {hi})");
        }
        if !(0.0..=5.0).contains(&self.filters.min_review_rating) {
            bail!(
                "filters.min_review_rating must be within 0..=5, got {}",
                self.filters.min_review_rating
            );
        }
        Ok(())
    }

    pub fn aggregate_settings(&self) -> AggregateSettings {
        AggregateSettings {
            histogram_bins: self.histogram_bins,
            top_locations: self.top_locations,
        }
    }
}

#[cfg(test)]
mod tests {
    use std::io::Write;

    use clap::Parser;

    use super::*;
    use crate::data::model::YesNo;

    fn write_config(json: &str) -> tempfile::NamedTempFile {
        let mut file = tempfile::Builder::new().suffix(".json").tempfile().unwrap();
        file.write_all(json.as_bytes()).unwrap();
        file
    }

    #[test]
    fn defaults_match_stock_dashboard() {
        let config = DashboardConfig::default();
        assert_eq!(config.histogram_bins, 20);
        assert_eq!(config.top_locations, 5);
        assert_eq!(config.filters.age_range, (18, 60));
        assert_eq!(config.filters.min_previous_purchases, 5);
        assert_eq!(config.filters.subscription, Some(YesNo::Yes));
        assert!(config.validate().is_ok());
    }

    #[test]
    fn partial_file_keeps_other_defaults() {
        let file = write_config(
            r#"{ "histogram_bins": 10, "filters": { "subscription": null, "age_range": [20, 40] } }"#,
        );
        let config = DashboardConfig::load(file.path()).unwrap();

        assert_eq!(config.histogram_bins, 10);
        assert_eq!(config.top_locations, 5);
        assert_eq!(config.filters.subscription, None);
        assert_eq!(config.filters.discount, Some(YesNo::Yes));
        assert_eq!(config.filters.age_range, (20, 40));
        assert_eq!(config.filters.min_review_rating, 3.0);
    }

    #[test]
    fn invalid_values_are_rejected() {
        let file = write_config(r#"{ "histogram_bins": 0 }"#);
        let err = DashboardConfig::load(file.path()).unwrap_err();
        assert!(err.to_string().contains("histogram_bins"));

        let file = write_config(r#"{ "filters": { "age_range": [60, 18] } }"#);
        assert!(DashboardConfig::load(file.path()).is_err());
    }

    #[test]
    fn cli_overrides_file() {
        let file = write_config(r#"{ "histogram_bins": 10, "data_path": "a.csv" }"#);
        let config_path = file.path().to_str().unwrap();
        let args = Args::parse_from(["shopping-trends", "b.csv", "--config", config_path, "--bins", "30"]);

        let config = DashboardConfig::from_args(&args).unwrap();
        assert_eq!(config.data_path, Some(PathBuf::from("b.csv")));
        assert_eq!(config.histogram_bins, 30);
        assert_eq!(config.aggregate_settings().top_locations, 5);
    }
}
