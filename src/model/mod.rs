//! Classifier interface and the decision it produces.

pub mod scorer;

pub use scorer::{LogisticScorer, Scorer};

use serde::{Deserialize, Serialize};

/// Binary loan decision derived from the classifier's output label.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Decision {
    Approved,
    Denied,
}

impl Decision {
    /// Label 1 approves; anything else denies.
    pub fn from_label(label: u8) -> Self {
        if label == 1 {
            Decision::Approved
        } else {
            Decision::Denied
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Decision::Approved => "approved",
            Decision::Denied => "denied",
        }
    }
}

impl std::fmt::Display for Decision {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}
