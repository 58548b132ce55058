//! Categorical encoding table.
//!
//! Codes are design-time constants fixed by the classifier's training
//! preprocessing (integer per label, alphabetical within each feature). They
//! live in one constructor so the contract stays auditable in one place.

use std::collections::HashMap;

use crate::error::FeatureError;

/// Immutable two-level lookup: feature name → label → integer code.
///
/// A label outside a feature's vocabulary is a hard validation failure, never
/// a missing value passed through to the scorer.
#[derive(Debug, Clone)]
pub struct EncodingTable {
    features: HashMap<&'static str, HashMap<&'static str, u32>>,
}

impl EncodingTable {
    /// The training-time codes. Any deviation invalidates the classifier.
    pub fn builtin() -> Self {
        let mut features = HashMap::new();
        features.insert(
            "person_gender",
            HashMap::from([("female", 0), ("male", 1)]),
        );
        features.insert(
            "person_education",
            HashMap::from([
                ("associate", 0),
                ("bachelor", 1),
                ("doctorate", 2),
                ("high school", 3),
                ("master", 4),
            ]),
        );
        features.insert(
            "person_home_ownership",
            HashMap::from([("mortgage", 0), ("other", 1), ("own", 2), ("rent", 3)]),
        );
        features.insert(
            "loan_intent",
            HashMap::from([
                ("debt_consolidation", 0),
                ("education", 1),
                ("home_improvement", 2),
                ("medical", 3),
                ("personal", 4),
                ("venture", 5),
            ]),
        );
        features.insert(
            "previous_loan_defaults_on_file",
            HashMap::from([("no", 0), ("yes", 1)]),
        );
        Self { features }
    }

    /// Encode one categorical value. Labels are matched after trimming and
    /// ASCII-lowercasing the input.
    pub fn encode(&self, feature: &str, raw: &str) -> Result<u32, FeatureError> {
        let labels = self
            .features
            .get(feature)
            .ok_or_else(|| FeatureError::UnknownFeature {
                feature: feature.to_string(),
            })?;
        let label = raw.trim().to_ascii_lowercase();
        labels
            .get(label.as_str())
            .copied()
            .ok_or_else(|| FeatureError::UnrecognizedCategory {
                feature: feature.to_string(),
                value: raw.to_string(),
            })
    }

    /// The vocabulary for one feature, sorted by code. Used to declare enum
    /// parameters in the tool schema sent to the oracle.
    pub fn labels(&self, feature: &str) -> Option<Vec<&'static str>> {
        let labels = self.features.get(feature)?;
        let mut pairs: Vec<_> = labels.iter().map(|(l, c)| (*c, *l)).collect();
        pairs.sort_unstable();
        Some(pairs.into_iter().map(|(_, l)| l).collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn training_time_codes_are_exact() {
        let table = EncodingTable::builtin();
        assert_eq!(table.encode("person_gender", "female").unwrap(), 0);
        assert_eq!(table.encode("person_gender", "male").unwrap(), 1);
        assert_eq!(table.encode("person_education", "associate").unwrap(), 0);
        assert_eq!(table.encode("person_education", "bachelor").unwrap(), 1);
        assert_eq!(table.encode("person_education", "doctorate").unwrap(), 2);
        assert_eq!(table.encode("person_education", "high school").unwrap(), 3);
        assert_eq!(table.encode("person_education", "master").unwrap(), 4);
        assert_eq!(table.encode("person_home_ownership", "mortgage").unwrap(), 0);
        assert_eq!(table.encode("person_home_ownership", "rent").unwrap(), 3);
        assert_eq!(table.encode("loan_intent", "debt_consolidation").unwrap(), 0);
        assert_eq!(table.encode("loan_intent", "venture").unwrap(), 5);
        assert_eq!(
            table
                .encode("previous_loan_defaults_on_file", "no")
                .unwrap(),
            0
        );
        assert_eq!(
            table
                .encode("previous_loan_defaults_on_file", "yes")
                .unwrap(),
            1
        );
    }

    #[test]
    fn input_is_trimmed_and_lowercased() {
        let table = EncodingTable::builtin();
        assert_eq!(table.encode("person_gender", " Male ").unwrap(), 1);
        assert_eq!(table.encode("person_education", "Bachelor").unwrap(), 1);
    }

    #[test]
    fn unknown_feature_is_an_error() {
        let table = EncodingTable::builtin();
        assert!(matches!(
            table.encode("person_species", "human"),
            Err(FeatureError::UnknownFeature { .. })
        ));
    }

    #[test]
    fn unrecognized_label_is_an_error_not_a_default() {
        let table = EncodingTable::builtin();
        let err = table.encode("person_gender", "unknown").unwrap_err();
        match err {
            FeatureError::UnrecognizedCategory { feature, value } => {
                assert_eq!(feature, "person_gender");
                assert_eq!(value, "unknown");
            }
            other => panic!("expected UnrecognizedCategory, got {other:?}"),
        }
    }

    #[test]
    fn labels_sorted_by_code() {
        let table = EncodingTable::builtin();
        assert_eq!(
            table.labels("person_education").unwrap(),
            vec!["associate", "bachelor", "doctorate", "high school", "master"]
        );
        assert!(table.labels("loan_amnt").is_none());
    }
}
