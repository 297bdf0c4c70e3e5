//! Finds and concatenates the generated trade-flow files.
//!
//! The collectors write one file per reporter/partner pair, named
//! `trade_<item>_<year>_<reporter>_<partner>.geojson`. Semiconductors
//! span two HS codes and are written as `trade_semiconductor_8541_...`
//! and `trade_semiconductor_8542_...`; both are served as
//! "semiconductor".

use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::path::PathBuf;
use thiserror::Error;
use tracing::{error, info, warn};
use tradeflow_config::Config;

const SEMICONDUCTOR_HS_CODES: [&str; 2] = ["8541", "8542"];

/// Every flow for one item and year, merged from all matching files.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct FlowCollection {
    #[serde(rename = "type")]
    pub kind: String,
    pub features: Vec<Value>,
    pub metadata: CollectionMetadata,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CollectionMetadata {
    pub item: String,
    pub year: u16,
    pub total_flows: usize,
    pub source_files: Vec<String>,
}

/// A directory of generated trade-flow files.
#[derive(Clone, Debug)]
pub struct TradeDataset {
    data_directory: PathBuf,
    min_year: u16,
    max_year: u16,
}

impl TradeDataset {
    /// Uses the default year range, 2018 to 2024.
    pub fn new<P: Into<PathBuf>>(data_directory: P) -> Self {
        let defaults = Config::default();
        Self {
            data_directory: data_directory.into(),
            min_year: defaults.min_year,
            max_year: defaults.max_year,
        }
    }

    pub fn from_config(config: &Config) -> Self {
        Self {
            data_directory: PathBuf::from(&config.data_directory),
            min_year: config.min_year,
            max_year: config.max_year,
        }
    }

    pub fn with_year_range(mut self, min_year: u16, max_year: u16) -> Self {
        self.min_year = min_year;
        self.max_year = max_year;
        self
    }

    /// Names of the files holding `item` flows for `year`, sorted.
    pub fn matching_files(&self, item: &str, year: u16) -> Result<Vec<String>, DatasetError> {
        self.check_request(item, year)?;
        if !self.data_directory.is_dir() {
            error!("Data directory {} not found", self.data_directory.display());
            return Err(DatasetError::DataDirectoryMissing(
                self.data_directory.display().to_string(),
            ));
        }

        let entries = std::fs::read_dir(&self.data_directory).map_err(|e| {
            error!("Unable to list {}", self.data_directory.display());
            error!("{e:?}");
            DatasetError::CannotListDirectory(self.data_directory.display().to_string())
        })?;

        let prefixes = file_prefixes(item, year);
        let mut files: Vec<String> = entries
            .filter_map(|entry| entry.ok())
            .filter_map(|entry| entry.file_name().into_string().ok())
            .filter(|name| {
                name.ends_with(".geojson") && prefixes.iter().any(|p| name.starts_with(p))
            })
            .collect();
        files.sort();
        Ok(files)
    }

    /// Loads every flow for `item` in `year`.
    ///
    /// Files without a `features` array contribute nothing. Fails with
    /// [`DatasetError::NotFound`] when no file matches.
    pub fn load(&self, item: &str, year: u16) -> Result<FlowCollection, DatasetError> {
        let files = self.matching_files(item, year)?;
        if files.is_empty() {
            warn!("No {item} data for {year} in {}", self.data_directory.display());
            return Err(DatasetError::NotFound {
                item: item.to_string(),
                year,
            });
        }

        let mut features = Vec::new();
        for file_name in files.iter() {
            let path = self.data_directory.join(file_name);
            let raw = std::fs::read_to_string(&path).map_err(|e| {
                error!("Unable to read {}", path.display());
                error!("{e:?}");
                DatasetError::CannotReadFile(file_name.clone())
            })?;
            let mut document: Value = serde_json::from_str(&raw).map_err(|e| {
                error!("Unable to parse GeoJSON in {}", path.display());
                error!("{e:?}");
                DatasetError::CannotParseJson(file_name.clone())
            })?;
            match document.get_mut("features").map(Value::take) {
                Some(Value::Array(file_features)) => features.extend(file_features),
                _ => warn!("{file_name} has no features array, ignoring it"),
            }
        }

        info!(
            "Loaded {} {item} flows for {year} from {} files",
            features.len(),
            files.len()
        );
        Ok(FlowCollection {
            kind: "FeatureCollection".to_string(),
            metadata: CollectionMetadata {
                item: item.to_string(),
                year,
                total_flows: features.len(),
                source_files: files,
            },
            features,
        })
    }

    fn check_request(&self, item: &str, year: u16) -> Result<(), DatasetError> {
        if !(self.min_year..=self.max_year).contains(&year) {
            error!("Year {year} outside {}-{}", self.min_year, self.max_year);
            return Err(DatasetError::YearOutOfRange {
                year,
                min: self.min_year,
                max: self.max_year,
            });
        }
        // Item names end up in file name patterns
        if item.is_empty() || !item.chars().all(|c| c.is_ascii_alphanumeric() || c == '_') {
            error!("Rejecting item name {item:?}");
            return Err(DatasetError::InvalidItem(item.to_string()));
        }
        Ok(())
    }
}

/// File name prefixes holding `item` flows for `year`.
pub fn file_prefixes(item: &str, year: u16) -> Vec<String> {
    if item == "semiconductor" {
        SEMICONDUCTOR_HS_CODES
            .iter()
            .map(|code| format!("trade_semiconductor_{code}_{year}_"))
            .collect()
    } else {
        vec![format!("trade_{item}_{year}_")]
    }
}

#[derive(Error, Debug)]
pub enum DatasetError {
    #[error("Year {year} is outside the supported range {min}-{max}")]
    YearOutOfRange { year: u16, min: u16, max: u16 },
    #[error("'{0}' is not a valid item name")]
    InvalidItem(String),
    #[error("Data directory {0} does not exist")]
    DataDirectoryMissing(String),
    #[error("Unable to list data directory {0}")]
    CannotListDirectory(String),
    #[error("No {item} data found for {year}")]
    NotFound { item: String, year: u16 },
    #[error("Unable to read {0}")]
    CannotReadFile(String),
    #[error("Unable to parse GeoJSON in {0}")]
    CannotParseJson(String),
}

#[cfg(test)]
mod test {
    use super::*;
    use serde_json::json;
    use std::path::Path;

    fn write(dir: &Path, name: &str, contents: &str) {
        std::fs::write(dir.join(name), contents).expect("Unable to write fixture");
    }

    fn flow_file(direction: &str) -> String {
        json!({
            "type": "FeatureCollection",
            "features": [{
                "type": "Feature",
                "geometry": {"type": "LineString", "coordinates": [[0.0, 0.0], [10.0, 10.0]]},
                "properties": {"flow_direction": direction, "trade_value": 1.0}
            }]
        })
        .to_string()
    }

    #[test]
    fn prefixes() {
        assert_eq!(file_prefixes("copper", 2023), vec!["trade_copper_2023_"]);
        assert_eq!(
            file_prefixes("semiconductor", 2019),
            vec![
                "trade_semiconductor_8541_2019_",
                "trade_semiconductor_8542_2019_"
            ]
        );
    }

    #[test]
    fn concatenates_matching_files() {
        let dir = tempfile::tempdir().unwrap();
        write(dir.path(), "trade_copper_2023_156_842.geojson", &flow_file("A → B"));
        write(dir.path(), "trade_copper_2023_276_156.geojson", &flow_file("B → A"));
        write(dir.path(), "trade_copper_2022_156_842.geojson", &flow_file("C → D"));
        write(dir.path(), "trade_copper_2023_156_842.csv", "not geojson");

        let dataset = TradeDataset::new(dir.path());
        let collection = dataset.load("copper", 2023).unwrap();
        assert_eq!(collection.kind, "FeatureCollection");
        assert_eq!(collection.features.len(), 2);
        assert_eq!(collection.metadata.total_flows, 2);
        assert_eq!(
            collection.metadata.source_files,
            vec![
                "trade_copper_2023_156_842.geojson",
                "trade_copper_2023_276_156.geojson"
            ]
        );
    }

    #[test]
    fn semiconductor_merges_both_codes() {
        let dir = tempfile::tempdir().unwrap();
        write(dir.path(), "trade_semiconductor_8541_2023_1_2.geojson", &flow_file("A → B"));
        write(dir.path(), "trade_semiconductor_8542_2023_1_2.geojson", &flow_file("A → B"));
        write(dir.path(), "trade_semiconductor_8542_2021_1_2.geojson", &flow_file("A → B"));

        let collection = TradeDataset::new(dir.path()).load("semiconductor", 2023).unwrap();
        assert_eq!(collection.metadata.source_files.len(), 2);
        assert_eq!(collection.features.len(), 2);
    }

    #[test]
    fn missing_data_is_not_found() {
        let dir = tempfile::tempdir().unwrap();
        let result = TradeDataset::new(dir.path()).load("oil", 2020);
        assert!(matches!(result, Err(DatasetError::NotFound { year: 2020, .. })));
    }

    #[test]
    fn year_range_is_enforced() {
        let dir = tempfile::tempdir().unwrap();
        let dataset = TradeDataset::new(dir.path());
        assert!(matches!(
            dataset.load("oil", 2017),
            Err(DatasetError::YearOutOfRange { .. })
        ));
        assert!(matches!(
            dataset.load("oil", 2025),
            Err(DatasetError::YearOutOfRange { .. })
        ));
        let widened = dataset.with_year_range(2010, 2030);
        assert!(matches!(
            widened.load("oil", 2025),
            Err(DatasetError::NotFound { .. })
        ));
    }

    #[test]
    fn item_names_are_checked() {
        let dir = tempfile::tempdir().unwrap();
        let dataset = TradeDataset::new(dir.path());
        assert!(matches!(
            dataset.load("../etc", 2023),
            Err(DatasetError::InvalidItem(_))
        ));
        assert!(matches!(dataset.load("", 2023), Err(DatasetError::InvalidItem(_))));
    }

    #[test]
    fn broken_json_names_the_file() {
        let dir = tempfile::tempdir().unwrap();
        write(dir.path(), "trade_oil_2020_1_2.geojson", "{ not json");
        let result = TradeDataset::new(dir.path()).load("oil", 2020);
        match result {
            Err(DatasetError::CannotParseJson(name)) => {
                assert_eq!(name, "trade_oil_2020_1_2.geojson")
            }
            other => panic!("unexpected result {other:?}"),
        }
    }

    #[test]
    fn files_without_features_contribute_nothing() {
        let dir = tempfile::tempdir().unwrap();
        write(dir.path(), "trade_oil_2020_1_2.geojson", r#"{"type": "FeatureCollection"}"#);
        write(dir.path(), "trade_oil_2020_3_4.geojson", &flow_file("A → B"));
        let collection = TradeDataset::new(dir.path()).load("oil", 2020).unwrap();
        assert_eq!(collection.features.len(), 1);
        assert_eq!(collection.metadata.source_files.len(), 2);
    }

    #[test]
    fn missing_directory() {
        let result = TradeDataset::new("/nonexistent/tradeflow/data").load("oil", 2020);
        assert!(matches!(result, Err(DatasetError::DataDirectoryMissing(_))));
    }

    #[test]
    fn metadata_uses_camel_case() {
        let metadata = CollectionMetadata {
            item: "copper".to_string(),
            year: 2023,
            total_flows: 25,
            source_files: vec![],
        };
        let value = serde_json::to_value(&metadata).unwrap();
        assert_eq!(value["totalFlows"], 25);
        assert!(value.get("sourceFiles").is_some());
    }
}
