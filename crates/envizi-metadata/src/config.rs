use std::time::Duration;

use serde::Deserialize;

use crate::DatasetKind;

/// Tuning knobs for the metadata cache and the dropdowns it feeds.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct MetadataCacheConfig {
    /// Datasets older than this are re-fetched on the next lookup (default: 2 days).
    #[serde(rename = "refreshIntervalMs", with = "millis")]
    pub refresh_interval: Duration,
    /// Hidden sheet holding the per-category type columns.
    pub types_table: String,
    /// Hidden sheet holding countries, states/provinces and power grids.
    pub area_table: String,
    /// Title of the alert shown when a user types a value outside the dropdown.
    pub rejection_title: String,
    pub rejection_message: String,
}

pub const DEFAULT_REFRESH_INTERVAL: Duration = Duration::from_secs(2 * 24 * 60 * 60);

impl Default for MetadataCacheConfig {
    fn default() -> Self {
        Self {
            refresh_interval: DEFAULT_REFRESH_INTERVAL,
            types_table: "API_Types_Data".to_string(),
            area_table: "API_Area_Data".to_string(),
            rejection_title: "Invalid input".to_string(),
            rejection_message: "Please select a value from the dropdown list.".to_string(),
        }
    }
}

impl MetadataCacheConfig {
    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }

    pub fn table_name(&self, kind: DatasetKind) -> &str {
        match kind {
            DatasetKind::Types => &self.types_table,
            DatasetKind::Area => &self.area_table,
        }
    }
}

mod millis {
    use std::time::Duration;

    use serde::{Deserialize, Deserializer};

    pub fn deserialize<'de, D: Deserializer<'de>>(d: D) -> Result<Duration, D::Error> {
        Ok(Duration::from_millis(u64::deserialize(d)?))
    }
}
