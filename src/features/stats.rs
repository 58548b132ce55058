//! Per-feature normalization statistics.
//!
//! The mean/std table is produced offline next to the classifier and shipped
//! as a small CSV (`column,mean,std`). It is read once at startup and never
//! mutated afterwards.

use std::collections::HashMap;
use std::fs::File;
use std::io::Read;
use std::path::Path;

use serde::Deserialize;

use crate::error::{ConfigError, FeatureError};

/// Mean and standard deviation of one numeric feature over the training set.
#[derive(Debug, Clone, Copy, Deserialize)]
pub struct FeatureStats {
    pub mean: f64,
    pub std: f64,
}

#[derive(Debug, Deserialize)]
struct StatsRow {
    column: String,
    mean: f64,
    std: f64,
}

/// Read-only mapping from numeric feature name to its training stats.
#[derive(Debug, Clone)]
pub struct NormalizationStats {
    stats: HashMap<String, FeatureStats>,
}

impl NormalizationStats {
    /// Build directly from entries. Used by tests and callers that already
    /// hold the table in memory.
    pub fn from_entries(entries: impl IntoIterator<Item = (String, FeatureStats)>) -> Self {
        Self {
            stats: entries.into_iter().collect(),
        }
    }

    /// Load the table from a `column,mean,std` CSV file.
    pub fn from_csv_path(path: &Path) -> Result<Self, ConfigError> {
        let file = File::open(path).map_err(|e| ConfigError::InvalidValue {
            key: "stats_path".to_string(),
            message: format!("failed to open {}: {e}", path.display()),
        })?;
        Self::from_reader(file)
    }

    /// Load the table from any CSV reader with a `column,mean,std` header.
    pub fn from_reader<R: Read>(reader: R) -> Result<Self, ConfigError> {
        let mut csv_reader = csv::ReaderBuilder::new()
            .trim(csv::Trim::All)
            .from_reader(reader);

        let mut stats = HashMap::new();
        for row in csv_reader.deserialize::<StatsRow>() {
            let row = row.map_err(|e| ConfigError::ParseError(format!("stats CSV: {e}")))?;
            stats.insert(row.column, FeatureStats {
                mean: row.mean,
                std: row.std,
            });
        }
        if stats.is_empty() {
            return Err(ConfigError::ParseError(
                "stats CSV contained no rows".to_string(),
            ));
        }
        Ok(Self { stats })
    }

    pub fn get(&self, feature: &str) -> Option<&FeatureStats> {
        self.stats.get(feature)
    }

    /// Z-score one raw value: `(raw - mean) / std`. Pure, full precision, no
    /// clamping. A zero std means the table is inconsistent with training and
    /// scaling is undefined.
    pub fn normalize(&self, feature: &str, raw: f64) -> Result<f64, FeatureError> {
        let stats = self
            .stats
            .get(feature)
            .ok_or_else(|| FeatureError::MissingStats {
                feature: feature.to_string(),
            })?;
        if stats.std == 0.0 {
            return Err(FeatureError::DegenerateStat {
                feature: feature.to_string(),
            });
        }
        Ok((raw - stats.mean) / stats.std)
    }
}
