//! The `set_borrower_details` tool — the oracle's entry into the scoring
//! pipeline.

use std::sync::Arc;
use std::time::Instant;

use async_trait::async_trait;
use serde_json::json;

use crate::error::{Error, ToolError};
use crate::features::BorrowerRecord;
use crate::pipeline::ScoringPipeline;
use crate::tools::tool::{Tool, ToolOutput};

/// Name the tool is declared under.
pub const SET_BORROWER_DETAILS: &str = "set_borrower_details";

/// Tool that accepts the 13 borrower fields extracted by the oracle,
/// validates them as a [`BorrowerRecord`], and scores the application.
pub struct SetBorrowerDetailsTool {
    pipeline: Arc<ScoringPipeline>,
}

impl SetBorrowerDetailsTool {
    pub fn new(pipeline: Arc<ScoringPipeline>) -> Self {
        Self { pipeline }
    }

    fn enum_labels(&self, feature: &str) -> Vec<&'static str> {
        self.pipeline
            .encodings()
            .labels(feature)
            .unwrap_or_default()
    }
}

#[async_trait]
impl Tool for SetBorrowerDetailsTool {
    fn name(&self) -> &str {
        SET_BORROWER_DETAILS
    }

    fn description(&self) -> &str {
        "Record the borrower's loan application details and score the application. \
         Call this once you have extracted every field from the user's description. \
         All 13 parameters are required; categorical fields must use one of their \
         listed values exactly."
    }

    fn parameters_schema(&self) -> serde_json::Value {
        json!({
            "type": "object",
            "properties": {
                "person_age": {
                    "type": "number",
                    "description": "Borrower age in years"
                },
                "person_gender": {
                    "type": "string",
                    "enum": self.enum_labels("person_gender"),
                    "description": "Borrower gender"
                },
                "person_education": {
                    "type": "string",
                    "enum": self.enum_labels("person_education"),
                    "description": "Highest education level"
                },
                "person_income": {
                    "type": "number",
                    "description": "Annual income"
                },
                "person_emp_exp": {
                    "type": "number",
                    "description": "Employment experience in years"
                },
                "person_home_ownership": {
                    "type": "string",
                    "enum": self.enum_labels("person_home_ownership"),
                    "description": "Home ownership status"
                },
                "loan_amnt": {
                    "type": "number",
                    "description": "Requested loan amount"
                },
                "loan_intent": {
                    "type": "string",
                    "enum": self.enum_labels("loan_intent"),
                    "description": "Purpose of the loan"
                },
                "loan_int_rate": {
                    "type": "number",
                    "description": "Loan interest rate in percent"
                },
                "loan_percent_income": {
                    "type": "number",
                    "description": "Loan amount as a fraction of annual income"
                },
                "cb_person_cred_hist_length": {
                    "type": "number",
                    "description": "Credit history length in years"
                },
                "credit_score": {
                    "type": "number",
                    "description": "Credit bureau score"
                },
                "previous_loan_defaults_on_file": {
                    "type": "string",
                    "enum": self.enum_labels("previous_loan_defaults_on_file"),
                    "description": "Whether the borrower has previous loan defaults on file"
                }
            },
            "required": [
                "person_age", "person_gender", "person_education", "person_income",
                "person_emp_exp", "person_home_ownership", "loan_amnt", "loan_intent",
                "loan_int_rate", "loan_percent_income", "cb_person_cred_hist_length",
                "credit_score", "previous_loan_defaults_on_file"
            ]
        })
    }

    async fn execute(&self, params: serde_json::Value) -> Result<ToolOutput, ToolError> {
        let start = Instant::now();

        // The argument mapping must deserialize into the same record shape
        // the form path uses. A wrong JSON type (e.g. a number where a label
        // belongs) fails here rather than being guessed at.
        let record: BorrowerRecord =
            serde_json::from_value(params).map_err(|e| ToolError::MalformedArguments {
                name: SET_BORROWER_DETAILS.to_string(),
                reason: e.to_string(),
            })?;

        let decision = self.pipeline.score(&record).map_err(|e| match e {
            Error::Feature(feature_error) => ToolError::MalformedArguments {
                name: SET_BORROWER_DETAILS.to_string(),
                reason: feature_error.to_string(),
            },
            other => ToolError::ExecutionFailed {
                name: SET_BORROWER_DETAILS.to_string(),
                reason: other.to_string(),
            },
        })?;

        tracing::info!(%decision, "Scored borrower via tool call");

        Ok(ToolOutput::success(
            json!({ "loan_approval_status": decision }),
            start.elapsed(),
        ))
    }
}
