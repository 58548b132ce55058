//! Conversational scoring: transcript bookkeeping and the tool-call mediator.

pub mod mediator;
pub mod transcript;

pub use mediator::{MediatorOutcome, MediatorState, ToolCallMediator};
pub use transcript::Transcript;
