//! In-memory transcript for one session.

use crate::types::Message;

/// The ordered transcript of a session.
///
/// Append-only apart from [`ConversationStore::clear`].  The system prompt is never stored here.
#[derive(Debug, Clone, Default)]
pub struct ConversationStore {
    messages: Vec<Message>,
}

impl ConversationStore {
    /// Creates an empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends one message to the end of the transcript.
    pub fn append(&mut self, message: Message) {
        self.messages.push(message);
    }

    /// Appends a user message and its reply as a single step.
    pub fn append_turn(&mut self, user: Message, assistant: Message) {
        self.messages.reserve(2);
        self.messages.push(user);
        self.messages.push(assistant);
    }

    /// Returns a copy of the transcript in insertion order.
    pub fn snapshot(&self) -> Vec<Message> {
        self.messages.clone()
    }

    /// Borrows the transcript.
    pub fn messages(&self) -> &[Message] {
        &self.messages
    }

    /// Empties the transcript.
    pub fn clear(&mut self) {
        self.messages.clear();
    }

    /// Number of stored messages.
    pub fn len(&self) -> usize {
        self.messages.len()
    }

    /// True when nothing has been said yet.
    pub fn is_empty(&self) -> bool {
        self.messages.is_empty()
    }
}
