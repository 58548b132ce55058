//! The locally callable function surface declared to the oracle.

use std::time::Duration;

use async_trait::async_trait;

use crate::error::ToolError;

/// Result of a tool execution.
#[derive(Debug, Clone)]
pub struct ToolOutput {
    /// Structured result mapped back to the oracle.
    pub result: serde_json::Value,
    /// Wall-clock execution time.
    pub elapsed: Duration,
}

impl ToolOutput {
    pub fn success(result: serde_json::Value, elapsed: Duration) -> Self {
        Self { result, elapsed }
    }
}

/// A named local function the oracle may invoke.
#[async_trait]
pub trait Tool: Send + Sync {
    /// Stable name the oracle calls this tool by.
    fn name(&self) -> &str;

    /// Description sent to the oracle with the declared schema.
    fn description(&self) -> &str;

    /// JSON Schema of the argument mapping.
    fn parameters_schema(&self) -> serde_json::Value;

    /// Validate the argument mapping and execute.
    async fn execute(&self, params: serde_json::Value) -> Result<ToolOutput, ToolError>;
}
