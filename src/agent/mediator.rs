//! Tool-call mediator — the two-turn exchange between user text, the
//! reasoning oracle, and the local scoring function.
//!
//! The exchange is a small explicit state machine rather than ad hoc
//! sequential calls, so timeout and failure policy hang off a named state:
//!
//! ```text
//! AwaitingUserInput → AwaitingOracleCall → Dispatching
//!                   → AwaitingFinalResponse → Done
//! ```
//!
//! A plain-text first response short-circuits straight to `Done`. Transport
//! failure in either oracle call is terminal for the exchange; nothing is
//! retried.

use std::sync::Arc;

use uuid::Uuid;

use crate::agent::transcript::Transcript;
use crate::error::{Error, LlmError, ToolError};
use crate::llm::{ChatMessage, LlmProvider, ToolCall, ToolCompletionRequest};
use crate::model::Decision;
use crate::tools::ToolRegistry;

const SYSTEM_PROMPT: &str = "You are a loan screening assistant. The user describes a borrower \
     in free text. Extract all thirteen application fields and call \
     set_borrower_details exactly once to score the application, then explain \
     the decision to the user in plain language. If information is missing, \
     ask for it instead of guessing.";

/// States of one mediated exchange.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MediatorState {
    AwaitingUserInput,
    AwaitingOracleCall,
    Dispatching,
    AwaitingFinalResponse,
    Done,
}

/// Result of a completed exchange.
#[derive(Debug)]
pub struct MediatorOutcome {
    /// The oracle's final natural-language reply.
    pub reply: String,
    /// The scoring decision, when the oracle invoked the pipeline.
    pub decision: Option<Decision>,
    /// The full exchange as it was replayed to the oracle.
    pub transcript: Transcript,
}

/// Orchestrates the two-turn oracle exchange around the local tool registry.
pub struct ToolCallMediator {
    llm: Arc<dyn LlmProvider>,
    tools: Arc<ToolRegistry>,
}

impl ToolCallMediator {
    pub fn new(llm: Arc<dyn LlmProvider>, tools: Arc<ToolRegistry>) -> Self {
        Self { llm, tools }
    }

    /// Run one full exchange for a free-text borrower description.
    pub async fn handle(&self, user_text: &str) -> Result<MediatorOutcome, Error> {
        let exchange = Uuid::new_v4();
        let mut state = MediatorState::AwaitingUserInput;
        let mut transcript = Transcript::new();
        tracing::debug!(%exchange, ?state, "Mediator exchange started");

        transcript.push(ChatMessage::user(user_text));
        state = MediatorState::AwaitingOracleCall;
        tracing::debug!(%exchange, ?state, "Mediator transition");

        let tool_definitions = self.tools.tool_definitions().await;
        let first = self
            .llm
            .complete_with_tools(ToolCompletionRequest::new(
                self.replay(&transcript),
                tool_definitions.clone(),
            ))
            .await
            .map_err(Error::Llm)?;

        // Plain text is terminal — the oracle chose not to call anything
        // (e.g. it needs more information from the user).
        let Some(call) = first.tool_calls.first().cloned() else {
            let reply = first.content.unwrap_or_default();
            transcript.push(ChatMessage::assistant(&reply));
            state = MediatorState::Done;
            tracing::debug!(%exchange, ?state, "Mediator short-circuit: text response");
            return Ok(MediatorOutcome {
                reply,
                decision: None,
                transcript,
            });
        };

        if first.tool_calls.len() > 1 {
            tracing::warn!(
                %exchange,
                extra = first.tool_calls.len() - 1,
                "Oracle requested multiple calls; dispatching the first only"
            );
        }

        state = MediatorState::Dispatching;
        tracing::debug!(%exchange, ?state, tool = %call.name, "Mediator transition");

        // Only the dispatched call is recorded, so every tool_use in the
        // replayed transcript has a matching tool_result.
        transcript.push(ChatMessage::assistant_with_tool_calls(
            first.content.clone(),
            vec![call.clone()],
        ));

        let output = self.dispatch(&call).await?;
        let decision = decision_from_result(&output);
        transcript.push(ChatMessage::tool_result(&call.id, output.to_string()));

        state = MediatorState::AwaitingFinalResponse;
        tracing::debug!(%exchange, ?state, "Mediator transition");

        let second = self
            .llm
            .complete_with_tools(ToolCompletionRequest::new(
                self.replay(&transcript),
                tool_definitions,
            ))
            .await
            .map_err(Error::Llm)?;

        if !second.tool_calls.is_empty() {
            return Err(Error::Llm(LlmError::InvalidResponse {
                provider: self.llm.model_name().to_string(),
                reason: "expected final text after the tool result, got another tool call"
                    .to_string(),
            }));
        }

        let reply = second.content.unwrap_or_default();
        transcript.push(ChatMessage::assistant(&reply));
        state = MediatorState::Done;
        tracing::debug!(%exchange, ?state, ?decision, "Mediator exchange complete");

        Ok(MediatorOutcome {
            reply,
            decision,
            transcript,
        })
    }

    /// Look the named function up and execute it. A name outside the registry
    /// is refused before any execution happens.
    async fn dispatch(&self, call: &ToolCall) -> Result<serde_json::Value, Error> {
        let tool = self
            .tools
            .get(&call.name)
            .await
            .ok_or_else(|| ToolError::UnknownToolCall {
                name: call.name.clone(),
            })?;
        let output = tool.execute(call.arguments.clone()).await?;
        tracing::debug!(tool = %call.name, elapsed = ?output.elapsed, "Tool dispatched");
        Ok(output.result)
    }

    /// Full replay: system prompt plus every transcript turn, in order.
    fn replay(&self, transcript: &Transcript) -> Vec<ChatMessage> {
        let mut messages = vec![ChatMessage::system(SYSTEM_PROMPT)];
        messages.extend(transcript.messages());
        messages
    }
}

fn decision_from_result(result: &serde_json::Value) -> Option<Decision> {
    match result.get("loan_approval_status").and_then(|v| v.as_str()) {
        Some("approved") => Some(Decision::Approved),
        Some("denied") => Some(Decision::Denied),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ModelError;
    use crate::features::stats::FeatureStats;
    use crate::features::{
        EncodingTable, FeatureVector, NUMERIC_FEATURES, NormalizationStats,
    };
    use crate::llm::{
        CompletionRequest, CompletionResponse, MessageRole, ToolCompletionResponse,
    };
    use crate::model::Scorer;
    use crate::pipeline::ScoringPipeline;
    use crate::tools::SetBorrowerDetailsTool;
    use async_trait::async_trait;
    use std::collections::VecDeque;
    use std::sync::Mutex;

    /// Oracle stub that pops scripted responses and records every request.
    struct ScriptedOracle {
        script: Mutex<VecDeque<ToolCompletionResponse>>,
        requests: Mutex<Vec<Vec<ChatMessage>>>,
    }

    impl ScriptedOracle {
        fn new(script: Vec<ToolCompletionResponse>) -> Self {
            Self {
                script: Mutex::new(script.into()),
                requests: Mutex::new(Vec::new()),
            }
        }

        fn requests(&self) -> Vec<Vec<ChatMessage>> {
            self.requests.lock().unwrap().clone()
        }
    }

    #[async_trait]
    impl LlmProvider for ScriptedOracle {
        fn model_name(&self) -> &str {
            "scripted"
        }

        async fn complete(
            &self,
            _request: CompletionRequest,
        ) -> Result<CompletionResponse, LlmError> {
            unimplemented!("mediator only uses tool completion")
        }

        async fn complete_with_tools(
            &self,
            request: ToolCompletionRequest,
        ) -> Result<ToolCompletionResponse, LlmError> {
            self.requests.lock().unwrap().push(request.messages);
            self.script
                .lock()
                .unwrap()
                .pop_front()
                .ok_or_else(|| LlmError::RequestFailed {
                    provider: "scripted".to_string(),
                    reason: "script exhausted".to_string(),
                })
        }
    }

    fn text_response(text: &str) -> ToolCompletionResponse {
        ToolCompletionResponse {
            content: Some(text.to_string()),
            tool_calls: Vec::new(),
            input_tokens: 1,
            output_tokens: 1,
        }
    }

    fn call_response(name: &str, arguments: serde_json::Value) -> ToolCompletionResponse {
        ToolCompletionResponse {
            content: None,
            tool_calls: vec![ToolCall {
                id: "toolu_1".to_string(),
                name: name.to_string(),
                arguments,
            }],
            input_tokens: 1,
            output_tokens: 1,
        }
    }

    struct FixedScorer(u8);

    impl Scorer for FixedScorer {
        fn predict(&self, _features: &FeatureVector) -> Result<u8, ModelError> {
            Ok(self.0)
        }
    }

    struct PanicScorer;

    impl Scorer for PanicScorer {
        fn predict(&self, _features: &FeatureVector) -> Result<u8, ModelError> {
            panic!("scorer must not run for this exchange");
        }
    }

    async fn registry_with(scorer: Arc<dyn Scorer>) -> Arc<ToolRegistry> {
        let stats = NormalizationStats::from_entries(
            NUMERIC_FEATURES
                .iter()
                .map(|f| (f.to_string(), FeatureStats { mean: 0.0, std: 1.0 })),
        );
        let pipeline = Arc::new(ScoringPipeline::new(
            EncodingTable::builtin(),
            stats,
            scorer,
        ));
        let registry = Arc::new(ToolRegistry::new());
        registry
            .register(Arc::new(SetBorrowerDetailsTool::new(pipeline)))
            .await;
        registry
    }

    fn valid_args() -> serde_json::Value {
        serde_json::json!({
            "person_age": 25.0,
            "person_gender": "male",
            "person_education": "bachelor",
            "person_income": 50000.0,
            "person_emp_exp": 2.0,
            "person_home_ownership": "rent",
            "loan_amnt": 10000.0,
            "loan_intent": "personal",
            "loan_int_rate": 11.5,
            "loan_percent_income": 0.2,
            "cb_person_cred_hist_length": 3.0,
            "credit_score": 650.0,
            "previous_loan_defaults_on_file": "no"
        })
    }

    #[tokio::test]
    async fn plain_text_response_short_circuits() {
        let oracle = Arc::new(ScriptedOracle::new(vec![text_response(
            "What is the borrower's income?",
        )]));
        let registry = registry_with(Arc::new(PanicScorer)).await;
        let mediator = ToolCallMediator::new(oracle.clone(), registry);

        let outcome = mediator.handle("Score a borrower for me").await.unwrap();
        assert_eq!(outcome.reply, "What is the borrower's income?");
        assert!(outcome.decision.is_none());
        assert_eq!(outcome.transcript.len(), 2);
        assert_eq!(oracle.requests().len(), 1);
    }

    #[tokio::test]
    async fn unknown_tool_call_is_refused_without_execution() {
        let oracle = Arc::new(ScriptedOracle::new(vec![call_response(
            "delete_borrower",
            serde_json::json!({}),
        )]));
        // A panicking scorer proves the pipeline never runs.
        let registry = registry_with(Arc::new(PanicScorer)).await;
        let mediator = ToolCallMediator::new(oracle.clone(), registry);

        let err = mediator.handle("Score this borrower").await.unwrap_err();
        assert!(matches!(
            err,
            Error::Tool(ToolError::UnknownToolCall { name }) if name == "delete_borrower"
        ));
        // No second oracle call either.
        assert_eq!(oracle.requests().len(), 1);
    }

    #[tokio::test]
    async fn malformed_arguments_are_rejected() {
        let mut args = valid_args();
        args["previous_loan_defaults_on_file"] = serde_json::json!(0);
        let oracle = Arc::new(ScriptedOracle::new(vec![call_response(
            "set_borrower_details",
            args,
        )]));
        let registry = registry_with(Arc::new(PanicScorer)).await;
        let mediator = ToolCallMediator::new(oracle, registry);

        let err = mediator.handle("Score this borrower").await.unwrap_err();
        assert!(matches!(
            err,
            Error::Tool(ToolError::MalformedArguments { .. })
        ));
    }

    #[tokio::test]
    async fn full_round_trip_replays_transcript_and_scores() {
        let oracle = Arc::new(ScriptedOracle::new(vec![
            call_response("set_borrower_details", valid_args()),
            text_response("Good news — the application is approved."),
        ]));
        let registry = registry_with(Arc::new(FixedScorer(1))).await;
        let mediator = ToolCallMediator::new(oracle.clone(), registry);

        let outcome = mediator.handle("25 year old male, bachelor...").await.unwrap();

        assert_eq!(outcome.decision, Some(Decision::Approved));
        assert_eq!(outcome.reply, "Good news — the application is approved.");

        // Finished transcript: user prompt, model call, tool result, final text.
        assert_eq!(outcome.transcript.len(), 4);
        let turns = outcome.transcript.messages();
        assert_eq!(turns[0].role, MessageRole::User);
        assert_eq!(turns[1].role, MessageRole::Assistant);
        assert_eq!(turns[1].tool_calls.len(), 1);
        assert_eq!(turns[2].role, MessageRole::Tool);
        assert!(turns[2].content.as_deref().unwrap().contains("approved"));
        assert_eq!(turns[3].role, MessageRole::Assistant);

        // The second oracle call replayed the whole exchange in order:
        // system prompt + user prompt + model call + tool result.
        let requests = oracle.requests();
        assert_eq!(requests.len(), 2);
        let second = &requests[1];
        assert_eq!(second.len(), 4);
        assert_eq!(second[0].role, MessageRole::System);
        assert_eq!(second[1].role, MessageRole::User);
        assert_eq!(second[2].role, MessageRole::Assistant);
        assert_eq!(second[3].role, MessageRole::Tool);
        assert_eq!(second[3].tool_call_id.as_deref(), Some("toolu_1"));
    }

    #[tokio::test]
    async fn denied_label_round_trips_as_denied() {
        let oracle = Arc::new(ScriptedOracle::new(vec![
            call_response("set_borrower_details", valid_args()),
            text_response("Unfortunately the application was denied."),
        ]));
        let registry = registry_with(Arc::new(FixedScorer(0))).await;
        let mediator = ToolCallMediator::new(oracle, registry);

        let outcome = mediator.handle("Score this borrower").await.unwrap();
        assert_eq!(outcome.decision, Some(Decision::Denied));
    }

    #[tokio::test]
    async fn second_tool_call_is_a_protocol_error() {
        let oracle = Arc::new(ScriptedOracle::new(vec![
            call_response("set_borrower_details", valid_args()),
            call_response("set_borrower_details", valid_args()),
        ]));
        let registry = registry_with(Arc::new(FixedScorer(1))).await;
        let mediator = ToolCallMediator::new(oracle, registry);

        let err = mediator.handle("Score this borrower").await.unwrap_err();
        assert!(matches!(
            err,
            Error::Llm(LlmError::InvalidResponse { .. })
        ));
    }

    #[tokio::test]
    async fn oracle_transport_failure_is_terminal() {
        // Empty script → the first call fails; nothing is retried.
        let oracle = Arc::new(ScriptedOracle::new(vec![]));
        let registry = registry_with(Arc::new(PanicScorer)).await;
        let mediator = ToolCallMediator::new(oracle.clone(), registry);

        let err = mediator.handle("Score this borrower").await.unwrap_err();
        assert!(matches!(err, Error::Llm(LlmError::RequestFailed { .. })));
        assert_eq!(oracle.requests().len(), 1);
    }
}
