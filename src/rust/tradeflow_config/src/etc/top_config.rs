//! Top-level configuration file for the trade-flow tools.

use super::{CurveTuning, StyleTuning};
use serde::{Deserialize, Serialize};

fn default_min_year() -> u16 {
    2018
}

fn default_max_year() -> u16 {
    2024
}

fn default_top_n() -> usize {
    3
}

/// Top-level configuration file for the trade-flow tools.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
pub struct Config {
    /// Version number for the configuration file.
    /// This will be set to "1.0".
    pub version: String,

    /// Directory holding the generated `trade_*.geojson` files
    pub data_directory: String,

    /// Where rendered arc and label layers are written
    pub output_directory: String,

    /// Oldest year for which trade-flow data may be requested
    #[serde(default = "default_min_year")]
    pub min_year: u16,

    /// Newest year for which trade-flow data may be requested
    #[serde(default = "default_max_year")]
    pub max_year: u16,

    /// How many exporters/importers the summary lists
    #[serde(default = "default_top_n")]
    pub top_n: usize,

    /// Arc geometry tuning
    #[serde(default)]
    pub curve: CurveTuning,

    /// Stroke styling
    #[serde(default)]
    pub style: StyleTuning,
}

impl Config {
    /// Checks that a configuration is usable.
    pub fn validate(&self) -> Result<(), String> {
        if self.version.trim() != "1.0" {
            return Err(format!(
                "Configuration file is at version [{}], but this version only supports version 1.0",
                self.version
            ));
        }
        if self.data_directory.trim().is_empty() {
            return Err("data_directory must be set".to_string());
        }
        if self.min_year > self.max_year {
            return Err(format!(
                "min_year ({}) is after max_year ({})",
                self.min_year, self.max_year
            ));
        }
        if self.top_n == 0 {
            return Err("top_n must be at least 1".to_string());
        }
        self.curve.validate()?;
        self.style.validate()?;
        Ok(())
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            version: "1.0".to_string(),
            data_directory: "../scripts/data/output".to_string(),
            output_directory: "./rendered".to_string(),
            min_year: default_min_year(),
            max_year: default_max_year(),
            top_n: default_top_n(),
            curve: CurveTuning::default(),
            style: StyleTuning::default(),
        }
    }
}
