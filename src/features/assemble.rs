//! Feature assembly — the ordered bridge between a raw record and the
//! classifier's trained input contract.
//!
//! The classifier was fit on the categorical block first, then the numeric
//! block, in the exact order of the two const arrays below. A permutation
//! produces silently wrong predictions with no error signal, so the order is
//! pinned here and unit-tested rather than derived at runtime.

use crate::error::FeatureError;
use crate::features::encoding::EncodingTable;
use crate::features::record::BorrowerRecord;
use crate::features::stats::NormalizationStats;

/// Categorical features, in training order.
pub const CATEGORICAL_FEATURES: [&str; 5] = [
    "person_gender",
    "person_education",
    "person_home_ownership",
    "loan_intent",
    "previous_loan_defaults_on_file",
];

/// Numeric features, in training order.
pub const NUMERIC_FEATURES: [&str; 8] = [
    "person_age",
    "person_income",
    "person_emp_exp",
    "loan_amnt",
    "loan_int_rate",
    "loan_percent_income",
    "cb_person_cred_hist_length",
    "credit_score",
];

pub const FEATURE_COUNT: usize = CATEGORICAL_FEATURES.len() + NUMERIC_FEATURES.len();

/// A fully encoded and normalized record in canonical training order:
/// 5 encoded categorical codes followed by 8 z-scored numerics.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FeatureVector([f64; FEATURE_COUNT]);

impl FeatureVector {
    pub fn values(&self) -> &[f64; FEATURE_COUNT] {
        &self.0
    }

    pub fn as_slice(&self) -> &[f64] {
        &self.0
    }
}

/// Encode the categorical fields and normalize the numeric fields into one
/// ordered vector. Fails fast on the first invalid field; no partial vector
/// ever reaches the scorer.
pub fn assemble(
    record: &BorrowerRecord,
    encodings: &EncodingTable,
    stats: &NormalizationStats,
) -> Result<FeatureVector, FeatureError> {
    let mut values = [0.0; FEATURE_COUNT];
    let mut index = 0;

    for feature in CATEGORICAL_FEATURES {
        let raw = record
            .categorical(feature)
            .ok_or_else(|| FeatureError::UnknownFeature {
                feature: feature.to_string(),
            })?;
        values[index] = f64::from(encodings.encode(feature, raw)?);
        index += 1;
    }

    for feature in NUMERIC_FEATURES {
        let raw = record
            .numeric(feature)
            .ok_or_else(|| FeatureError::UnknownFeature {
                feature: feature.to_string(),
            })?;
        values[index] = stats.normalize(feature, raw)?;
        index += 1;
    }

    Ok(FeatureVector(values))
}
