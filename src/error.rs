//! Error types for loan-screen.

/// Top-level error type for the service.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("Feature error: {0}")]
    Feature(#[from] FeatureError),

    #[error("Model error: {0}")]
    Model(#[from] ModelError),

    #[error("Tool error: {0}")]
    Tool(#[from] ToolError),

    #[error("LLM error: {0}")]
    Llm(#[from] LlmError),
}

/// Configuration-related errors.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Missing required environment variable: {0}")]
    MissingEnvVar(String),

    #[error("Invalid configuration value for {key}: {message}")]
    InvalidValue { key: String, message: String },

    #[error("Failed to parse configuration: {0}")]
    ParseError(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Feature encoding and normalization errors.
///
/// Every variant names the offending feature so the caller can surface the
/// exact field the user needs to correct. None of these are swallowed into a
/// default value.
#[derive(Debug, thiserror::Error)]
pub enum FeatureError {
    #[error("Unknown feature: {feature}")]
    UnknownFeature { feature: String },

    #[error("Unrecognized value {value:?} for categorical feature {feature}")]
    UnrecognizedCategory { feature: String, value: String },

    #[error("No normalization stats for feature {feature}")]
    MissingStats { feature: String },

    #[error("Degenerate stats for feature {feature}: std is zero")]
    DegenerateStat { feature: String },
}

/// Classifier artifact errors.
#[derive(Debug, thiserror::Error)]
pub enum ModelError {
    #[error("Failed to read classifier artifact: {0}")]
    Io(#[from] std::io::Error),

    #[error("Failed to parse classifier artifact: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Classifier expects {expected} weights, artifact has {got}")]
    ShapeMismatch { expected: usize, got: usize },
}

/// Tool dispatch errors.
#[derive(Debug, thiserror::Error)]
pub enum ToolError {
    #[error("Unknown tool call: {name}")]
    UnknownToolCall { name: String },

    #[error("Malformed arguments for tool {name}: {reason}")]
    MalformedArguments { name: String, reason: String },

    #[error("Tool {name} execution failed: {reason}")]
    ExecutionFailed { name: String, reason: String },
}

/// Oracle (LLM provider) errors. A transport failure on either round trip is
/// terminal for the request; nothing here is retried.
#[derive(Debug, thiserror::Error)]
pub enum LlmError {
    #[error("Provider {provider} request failed: {reason}")]
    RequestFailed { provider: String, reason: String },

    #[error("Invalid response from {provider}: {reason}")]
    InvalidResponse { provider: String, reason: String },

    #[error("Authentication failed for provider {provider}")]
    AuthFailed { provider: String },

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

/// Result type alias for the service.
pub type Result<T> = std::result::Result<T, Error>;
