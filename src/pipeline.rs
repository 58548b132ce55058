//! The assembled scoring path: one immutable handle built at startup.

use std::sync::Arc;

use crate::config::AppConfig;
use crate::error::Error;
use crate::features::{BorrowerRecord, EncodingTable, NormalizationStats, assemble};
use crate::model::{Decision, LogisticScorer, Scorer};

/// Encoding table, normalization stats, and classifier bundled behind one
/// read-only handle. Constructed once, shared by reference into every request
/// — there is no per-call artifact loading and no mutable state.
pub struct ScoringPipeline {
    encodings: EncodingTable,
    stats: NormalizationStats,
    scorer: Arc<dyn Scorer>,
}

impl ScoringPipeline {
    pub fn new(encodings: EncodingTable, stats: NormalizationStats, scorer: Arc<dyn Scorer>) -> Self {
        Self {
            encodings,
            stats,
            scorer,
        }
    }

    /// Load both artifacts named by the configuration.
    pub fn from_config(config: &AppConfig) -> Result<Self, Error> {
        let stats = NormalizationStats::from_csv_path(&config.stats_path)?;
        let scorer = LogisticScorer::from_json_path(&config.classifier_path)?;
        tracing::info!(
            stats = %config.stats_path.display(),
            classifier = %config.classifier_path.display(),
            "Loaded scoring artifacts"
        );
        Ok(Self::new(EncodingTable::builtin(), stats, Arc::new(scorer)))
    }

    /// Validate, encode, normalize, and score one record.
    pub fn score(&self, record: &BorrowerRecord) -> Result<Decision, Error> {
        let label = self.score_label(record)?;
        Ok(Decision::from_label(label))
    }

    /// Like [`score`](Self::score) but returns the raw {0, 1} label.
    pub fn score_label(&self, record: &BorrowerRecord) -> Result<u8, Error> {
        let vector = assemble(record, &self.encodings, &self.stats)?;
        let label = self.scorer.predict(&vector)?;
        tracing::debug!(label, "Scored borrower record");
        Ok(label)
    }

    pub fn encodings(&self) -> &EncodingTable {
        &self.encodings
    }
}
