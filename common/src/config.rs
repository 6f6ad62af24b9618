use std::{collections::BTreeMap, path::Path};

use eyre::{Context, Result};
use serde::{Deserialize, Serialize};

use crate::util::read_json_file;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    /// How many following points the smoothing looks at
    pub smoothing: usize,
    /// Points with a smaller x-value are never smoothed
    pub smoothing_threshold: f64,
    /// Name of the cache level table inside the results directory
    pub cache_file: String,
    pub width: u32,
    pub height: u32,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            smoothing: 3,
            smoothing_threshold: 100.0,
            cache_file: "cache.json".to_owned(),
            width: 1024,
            height: 768,
        }
    }
}

/// Cache level name to size in KiB, ie. `{"L1": 32, "L2": 256}`
#[derive(Debug, Default, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct CacheLevels(pub BTreeMap<String, u64>);

impl CacheLevels {
    pub async fn load(path: &Path) -> Result<Self> {
        read_json_file::<CacheLevels>(path)
            .await
            .wrap_err_with(|| format!("Load cache levels from {}", path.display()))
    }

    /// Levels in name order
    pub fn iter(&self) -> impl Iterator<Item = (&str, u64)> {
        self.0.iter().map(|(name, size)| (name.as_str(), *size))
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl<const N: usize> From<[(&str, u64); N]> for CacheLevels {
    fn from(levels: [(&str, u64); N]) -> Self {
        Self(
            levels
                .into_iter()
                .map(|(name, size)| (name.to_owned(), size))
                .collect(),
        )
    }
}
