//! The borrower application record.

use serde::{Deserialize, Serialize};

/// One loan application as submitted — 8 continuous fields plus 5 categorical
/// labels. Categorical values stay raw strings here; membership in the fixed
/// vocabularies is checked by the encoding table during assembly, so an
/// invalid label fails loudly instead of being coerced on the way in.
///
/// Built fresh per request (form submission or parsed tool-call arguments)
/// and discarded after scoring.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct BorrowerRecord {
    pub person_age: f64,
    pub person_gender: String,
    pub person_education: String,
    pub person_income: f64,
    pub person_emp_exp: f64,
    pub person_home_ownership: String,
    pub loan_amnt: f64,
    pub loan_intent: String,
    pub loan_int_rate: f64,
    pub loan_percent_income: f64,
    pub cb_person_cred_hist_length: f64,
    pub credit_score: f64,
    pub previous_loan_defaults_on_file: String,
}

impl BorrowerRecord {
    /// Look up a categorical field by feature name.
    pub fn categorical(&self, feature: &str) -> Option<&str> {
        match feature {
            "person_gender" => Some(&self.person_gender),
            "person_education" => Some(&self.person_education),
            "person_home_ownership" => Some(&self.person_home_ownership),
            "loan_intent" => Some(&self.loan_intent),
            "previous_loan_defaults_on_file" => Some(&self.previous_loan_defaults_on_file),
            _ => None,
        }
    }

    /// Look up a numeric field by feature name.
    pub fn numeric(&self, feature: &str) -> Option<f64> {
        match feature {
            "person_age" => Some(self.person_age),
            "person_income" => Some(self.person_income),
            "person_emp_exp" => Some(self.person_emp_exp),
            "loan_amnt" => Some(self.loan_amnt),
            "loan_int_rate" => Some(self.loan_int_rate),
            "loan_percent_income" => Some(self.loan_percent_income),
            "cb_person_cred_hist_length" => Some(self.cb_person_cred_hist_length),
            "credit_score" => Some(self.credit_score),
            _ => None,
        }
    }
}
