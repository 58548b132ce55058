//! Append-only conversation transcript.

use chrono::{DateTime, Utc};

use crate::llm::ChatMessage;

/// One recorded turn with its arrival time.
#[derive(Debug, Clone)]
pub struct Turn {
    pub at: DateTime<Utc>,
    pub message: ChatMessage,
}

/// Ordered sequence of conversation turns.
///
/// Turns are only ever appended — prior turns are never dropped or rewritten,
/// because the oracle depends on seeing the exchange replayed in full and in
/// order on the second call.
#[derive(Debug, Clone, Default)]
pub struct Transcript {
    turns: Vec<Turn>,
}

impl Transcript {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a turn. There is deliberately no way to remove or reorder.
    pub fn push(&mut self, message: ChatMessage) {
        self.turns.push(Turn {
            at: Utc::now(),
            message,
        });
    }

    pub fn turns(&self) -> &[Turn] {
        &self.turns
    }

    /// The turns as provider messages, for replay.
    pub fn messages(&self) -> Vec<ChatMessage> {
        self.turns.iter().map(|t| t.message.clone()).collect()
    }

    pub fn len(&self) -> usize {
        self.turns.len()
    }

    pub fn is_empty(&self) -> bool {
        self.turns.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::llm::MessageRole;

    #[test]
    fn preserves_insertion_order() {
        let mut transcript = Transcript::new();
        transcript.push(ChatMessage::user("hello"));
        transcript.push(ChatMessage::assistant("hi"));
        transcript.push(ChatMessage::tool_result("call_1", "{}"));

        assert_eq!(transcript.len(), 3);
        let messages = transcript.messages();
        assert_eq!(messages[0].role, MessageRole::User);
        assert_eq!(messages[1].role, MessageRole::Assistant);
        assert_eq!(messages[2].role, MessageRole::Tool);
    }

    #[test]
    fn starts_empty() {
        assert!(Transcript::new().is_empty());
    }
}
