use std::sync::Arc;

use loan_screen::agent::ToolCallMediator;
use loan_screen::api::{AppState, routes};
use loan_screen::config::AppConfig;
use loan_screen::llm::{LlmBackend, LlmConfig, create_provider};
use loan_screen::pipeline::ScoringPipeline;
use loan_screen::tools::{SetBorrowerDetailsTool, ToolRegistry};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize tracing
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .with_target(false)
        .init();

    let config = AppConfig::from_env()?;

    // ── Scoring pipeline: artifacts loaded once, shared read-only ────────
    let pipeline = Arc::new(ScoringPipeline::from_config(&config)?);

    let registry = Arc::new(ToolRegistry::new());
    registry
        .register(Arc::new(SetBorrowerDetailsTool::new(pipeline.clone())))
        .await;

    // ── Oracle: optional — without a key only the form path is served ────
    let mediator = match std::env::var("ANTHROPIC_API_KEY") {
        Ok(api_key) => {
            let llm_config = LlmConfig {
                backend: LlmBackend::Anthropic,
                api_key: secrecy::SecretString::from(api_key),
                model: config.model.clone(),
            };
            let llm = create_provider(&llm_config)?;
            Some(Arc::new(ToolCallMediator::new(llm, registry.clone())))
        }
        Err(_) => {
            tracing::warn!(
                "ANTHROPIC_API_KEY not set — /api/chat disabled, /api/score still available"
            );
            None
        }
    };

    eprintln!("loan-screen v{}", env!("CARGO_PKG_VERSION"));
    eprintln!("   Model: {}", config.model);
    eprintln!("   Score API: http://{}/api/score", config.bind_addr);
    eprintln!("   Chat API:  http://{}/api/chat", config.bind_addr);

    let app = routes(AppState { pipeline, mediator });
    let listener = tokio::net::TcpListener::bind(config.bind_addr).await?;
    tracing::info!("Listening on {}", config.bind_addr);
    axum::serve(listener, app).await?;

    Ok(())
}
