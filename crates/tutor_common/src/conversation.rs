//! Conversation history
//!
//! Ordered, append-only record of the exchange with the model. Owned by the
//! active session; the whole history is sent with every request so the
//! model keeps context across turns.

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    User,
    Assistant,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Message {
    pub role: Role,
    pub content: String,
}

/// Append-only message sequence. Reset means replacing with empty, never
/// editing in place.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ConversationHistory {
    messages: Vec<Message>,
}

impl ConversationHistory {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push_user(&mut self, content: impl Into<String>) {
        self.messages.push(Message {
            role: Role::User,
            content: content.into(),
        });
    }

    pub fn push_assistant(&mut self, content: impl Into<String>) {
        self.messages.push(Message {
            role: Role::Assistant,
            content: content.into(),
        });
    }

    /// Record one full prompt/reply exchange.
    pub fn record_exchange(&mut self, prompt: impl Into<String>, reply: impl Into<String>) {
        self.push_user(prompt);
        self.push_assistant(reply);
    }

    pub fn clear(&mut self) {
        self.messages = Vec::new();
    }

    pub fn messages(&self) -> &[Message] {
        &self.messages
    }

    pub fn iter(&self) -> impl Iterator<Item = &Message> {
        self.messages.iter()
    }

    pub fn len(&self) -> usize {
        self.messages.len()
    }

    pub fn is_empty(&self) -> bool {
        self.messages.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_exchange_appends_in_order() {
        let mut history = ConversationHistory::new();
        history.record_exchange("first prompt", "first reply");
        history.push_user("follow-up");

        assert_eq!(history.len(), 3);
        assert_eq!(history.messages()[0].role, Role::User);
        assert_eq!(history.messages()[1].role, Role::Assistant);
        assert_eq!(history.messages()[2].content, "follow-up");
    }

    #[test]
    fn test_clear_resets_to_empty() {
        let mut history = ConversationHistory::new();
        history.record_exchange("p", "r");
        history.clear();
        assert!(history.is_empty());
    }

    #[test]
    fn test_roles_serialize_lowercase() {
        let mut history = ConversationHistory::new();
        history.push_user("hi");
        let json = serde_json::to_string(history.messages()).unwrap();
        assert!(json.contains(r#""role":"user""#));
    }
}
