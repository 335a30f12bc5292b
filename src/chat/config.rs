//! Configuration types for the chat application.
//!
//! This module provides CLI argument parsing via `arrrg` and the resolved configuration the REPL
//! starts from.

use std::fmt;

use arrrg_derive::CommandLine;

use crate::error::Error;
use crate::types::{
    CareerGoal, ConversationConfig, DEFAULT_CREATIVITY, ExperienceLevel, MAX_CREATIVITY,
    MIN_CREATIVITY, OutputType, Tone,
};

/// Command-line arguments for the mentorai tool.
#[derive(CommandLine, Debug, Default, PartialEq, Eq)]
pub struct ChatArgs {
    /// Model to use for chat.
    #[arrrg(optional, "Model to use (default: picked from the provider's list)", "MODEL")]
    pub model: Option<String>,

    /// Experience level.
    #[arrrg(optional, "Beginner, Intermediate or Advanced (default: Beginner)", "LEVEL")]
    pub level: Option<String>,

    /// Career goal.
    #[arrrg(optional, "Internship, Job, Skill Learning or Interview Prep (default: Job)", "GOAL")]
    pub goal: Option<String>,

    /// Answer tone.
    #[arrrg(optional, "Friendly, Professional or Mentor-like (default: Professional)", "TONE")]
    pub tone: Option<String>,

    /// Comma-separated output types.
    #[arrrg(optional, "Outputs to generate, e.g. roadmap,resume,interview,portfolio", "LIST")]
    pub outputs: Option<String>,

    /// Sampling temperature.
    #[arrrg(optional, "Creativity between 0.1 and 1.0 (default: 0.7)", "VALUE")]
    pub creativity: Option<String>,

    /// Provider base URL.
    #[arrrg(optional, "OpenAI-compatible API base URL (default: Groq)", "URL")]
    pub base_url: Option<String>,

    /// Disable ANSI colors and styles.
    #[arrrg(flag, "Disable ANSI colors/styles")]
    pub no_color: bool,
}

/// A command-line value that could not be resolved.
#[derive(Debug, Clone)]
pub struct ChatArgsError {
    /// The offending option.
    pub option: &'static str,
    /// Why it was rejected.
    pub error: Error,
}

impl fmt::Display for ChatArgsError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "--{}: {}", self.option, self.error)
    }
}

impl std::error::Error for ChatArgsError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        Some(&self.error)
    }
}

/// Configuration for a chat session.
///
/// This struct holds the resolved configuration values after processing command-line arguments
/// with appropriate defaults.  The model stays optional until the model catalog has been fetched.
#[derive(Debug, Clone, PartialEq)]
pub struct ChatConfig {
    /// Explicitly requested model, if any.
    pub model: Option<String>,

    /// Experience level.
    pub level: ExperienceLevel,

    /// Career goal.
    pub goal: CareerGoal,

    /// Answer tone.
    pub tone: Tone,

    /// Output types selected at startup.
    pub outputs: Vec<OutputType>,

    /// Sampling temperature.
    pub creativity: f32,

    /// Provider base URL; `None` means Groq.
    pub base_url: Option<String>,

    /// Whether to use ANSI colors and styles in output.
    pub use_color: bool,
}

impl ChatConfig {
    /// Creates a new ChatConfig with default values.
    ///
    /// Defaults:
    /// - Level: Beginner
    /// - Goal: Job
    /// - Tone: Professional
    /// - Outputs: none
    /// - Creativity: 0.7
    /// - Color: enabled
    pub fn new() -> Self {
        Self {
            model: None,
            level: ExperienceLevel::default(),
            goal: CareerGoal::default(),
            tone: Tone::default(),
            outputs: Vec::new(),
            creativity: DEFAULT_CREATIVITY,
            base_url: None,
            use_color: true,
        }
    }

    /// Builds the session settings, using `default_model` unless a model was requested.
    pub fn conversation(&self, default_model: String) -> ConversationConfig {
        let model = self.model.clone().unwrap_or(default_model);
        let mut config = ConversationConfig::new(model)
            .with_level(self.level)
            .with_goal(self.goal)
            .with_tone(self.tone)
            .with_output_types(self.outputs.iter().cloned());
        if let Err(err) = config.set_creativity(self.creativity) {
            tracing::warn!(error = %err, "ignoring creativity {}", self.creativity);
        }
        config
    }
}

impl Default for ChatConfig {
    fn default() -> Self {
        Self::new()
    }
}

/// Splits a comma-separated list of output types.
pub fn parse_output_list(list: &str) -> Result<Vec<OutputType>, Error> {
    list.split(',')
        .filter(|item| !item.trim().is_empty())
        .map(str::parse)
        .collect()
}

/// Parses a creativity value and checks its range.
pub fn parse_creativity(value: &str) -> Result<f32, Error> {
    let out_of_range = || {
        Error::validation(
            format!("expects a value between {MIN_CREATIVITY} and {MAX_CREATIVITY}"),
            Some("creativity".to_string()),
        )
    };
    let parsed: f32 = value.trim().parse().map_err(|_| out_of_range())?;
    if parsed.is_finite() && (MIN_CREATIVITY..=MAX_CREATIVITY).contains(&parsed) {
        Ok(parsed)
    } else {
        Err(out_of_range())
    }
}

fn resolve<T>(
    option: &'static str,
    value: Option<String>,
    parse: impl FnOnce(&str) -> Result<T, Error>,
    default: T,
) -> Result<T, ChatArgsError> {
    match value {
        Some(value) => parse(&value).map_err(|error| ChatArgsError { option, error }),
        None => Ok(default),
    }
}

impl TryFrom<ChatArgs> for ChatConfig {
    type Error = ChatArgsError;

    fn try_from(args: ChatArgs) -> Result<Self, Self::Error> {
        let defaults = ChatConfig::new();
        Ok(ChatConfig {
            model: args.model,
            level: resolve("level", args.level, |s| s.parse(), defaults.level)?,
            goal: resolve("goal", args.goal, |s| s.parse(), defaults.goal)?,
            tone: resolve("tone", args.tone, |s| s.parse(), defaults.tone)?,
            outputs: resolve("outputs", args.outputs, parse_output_list, defaults.outputs)?,
            creativity: resolve(
                "creativity",
                args.creativity,
                parse_creativity,
                defaults.creativity,
            )?,
            base_url: args.base_url,
            use_color: !args.no_color,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config() {
        let config = ChatConfig::new();
        assert!(config.model.is_none());
        assert_eq!(config.level, ExperienceLevel::Beginner);
        assert_eq!(config.goal, CareerGoal::Job);
        assert_eq!(config.tone, Tone::Professional);
        assert!(config.outputs.is_empty());
        assert_eq!(config.creativity, 0.7);
        assert!(config.base_url.is_none());
        assert!(config.use_color);
    }

    #[test]
    fn config_from_args_defaults() {
        let config = ChatConfig::try_from(ChatArgs::default()).unwrap();
        assert_eq!(config, ChatConfig::new());
    }

    #[test]
    fn config_from_args_custom() {
        let args = ChatArgs {
            model: Some("mixtral-8x7b-32768".to_string()),
            level: Some("advanced".to_string()),
            goal: Some("interview-prep".to_string()),
            tone: Some("Mentor-like".to_string()),
            outputs: Some("interview, portfolio".to_string()),
            creativity: Some("0.4".to_string()),
            base_url: Some("http://localhost:8080/v1/".to_string()),
            no_color: true,
        };
        let config = ChatConfig::try_from(args).unwrap();
        assert_eq!(config.model.as_deref(), Some("mixtral-8x7b-32768"));
        assert_eq!(config.level, ExperienceLevel::Advanced);
        assert_eq!(config.goal, CareerGoal::InterviewPrep);
        assert_eq!(config.tone, Tone::MentorLike);
        assert_eq!(
            config.outputs,
            vec![OutputType::InterviewQA, OutputType::PortfolioGuidance]
        );
        assert_eq!(config.creativity, 0.4);
        assert!(!config.use_color);
    }

    #[test]
    fn config_from_args_rejects_bad_values() {
        let args = ChatArgs {
            creativity: Some("2".to_string()),
            ..ChatArgs::default()
        };
        let err = ChatConfig::try_from(args).unwrap_err();
        assert_eq!(err.option, "creativity");
        assert!(err.to_string().starts_with("--creativity: "));

        let args = ChatArgs {
            tone: Some("sarcastic".to_string()),
            ..ChatArgs::default()
        };
        assert_eq!(ChatConfig::try_from(args).unwrap_err().option, "tone");
    }

    #[test]
    fn conversation_uses_default_model_unless_overridden() {
        let mut config = ChatConfig::new();
        config.outputs = vec![OutputType::Roadmap];
        let conversation = config.conversation("llama-3.1-70b-versatile".to_string());
        assert_eq!(conversation.model(), "llama-3.1-70b-versatile");
        assert!(conversation.is_selected(&OutputType::Roadmap));

        config.model = Some("gemma-7b-it".to_string());
        assert_eq!(config.conversation("x".to_string()).model(), "gemma-7b-it");
    }
}
