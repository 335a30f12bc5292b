// Public modules
pub mod completion;
pub mod conversation_config;
pub mod message;

// Re-exports
pub use completion::{
    ChoiceMessage, CompletionChoice, CompletionRequest, CompletionResponse, ModelInfo,
    ModelListResponse,
};
pub use conversation_config::{
    CareerGoal, ConversationConfig, DEFAULT_CREATIVITY, ExperienceLevel, MAX_CREATIVITY,
    MIN_CREATIVITY, OutputType, Tone,
};
pub use message::{Message, MessageRole};
