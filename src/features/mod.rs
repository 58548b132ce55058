//! Borrower feature pipeline: raw fields → encoded/normalized vector.

pub mod assemble;
pub mod encoding;
pub mod record;
pub mod stats;

pub use assemble::{CATEGORICAL_FEATURES, FEATURE_COUNT, FeatureVector, NUMERIC_FEATURES, assemble};
pub use encoding::EncodingTable;
pub use record::BorrowerRecord;
pub use stats::{FeatureStats, NormalizationStats};
