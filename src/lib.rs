//! MentorAI: a career-mentor chat client for OpenAI-compatible chat-completion APIs.
//!
//! A [`Session`] turns each user message into one request carrying a system prompt built from the
//! session's [`ConversationConfig`], records the reply (or the error) in its transcript, and can
//! export that transcript as plain text.

// Public modules
pub mod catalog;
pub mod chat;
pub mod client;
pub mod error;
pub mod export;
pub mod prompt;
pub mod render;
pub mod session;
pub mod store;
pub mod types;

mod observability;

// Re-exports
pub use catalog::{FALLBACK_MODELS, ModelCatalog, PREFERRED_DEFAULT_MODEL};
pub use client::{CompletionClient, Groq, ModelSource};
pub use error::{Error, Result};
pub use observability::register_biometrics;
pub use session::{
    NoProgress, Session, SessionStats, TurnOutcome, TurnProgress, TurnView, VALIDATION_MESSAGE,
};
pub use store::ConversationStore;
pub use types::*;
