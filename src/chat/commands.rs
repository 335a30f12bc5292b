//! Slash command parsing for the chat application.
//!
//! This module handles parsing of special commands that start with `/`, allowing users to change
//! the mentor settings without sending messages to the API.

use crate::chat::config::{parse_creativity, parse_output_list};
use crate::types::{CareerGoal, ExperienceLevel, OutputType, Tone};

/// Canned prompts offered as quick starts.
pub const QUICK_START_EXAMPLES: [&str; 4] = [
    "I am a beginner CS student, give me a roadmap",
    "How can I prepare for internships?",
    "Suggest portfolio projects based on industry demand",
    "Give me interview questions and answers for software developer",
];

/// A parsed chat command.
///
/// These commands control the chat session and are not sent to the API.
#[derive(Debug, Clone, PartialEq)]
pub enum ChatCommand {
    /// Clear the conversation history.
    Clear,

    /// Set the experience level.
    Level(ExperienceLevel),

    /// Set the career goal.
    Goal(CareerGoal),

    /// Set the answer tone.
    Tone(Tone),

    /// Replace the selected output types.  An empty list deselects everything.
    Outputs(Vec<OutputType>),

    /// Select or deselect one output type.
    Toggle(OutputType),

    /// Set the creativity.
    Creativity(f32),

    /// Change the model.
    Model(String),

    /// List the models on offer.
    Models,

    /// Send one of the quick-start prompts (zero-based index).
    Example(usize),

    /// Save the transcript; `None` picks a temporary file.
    Save(Option<String>),

    /// Display help information.
    Help,

    /// Exit the chat application.
    Quit,

    /// Display session statistics.
    Stats,

    /// Show the current configuration.
    ShowConfig,

    /// Report a parsing error back to the caller.
    Invalid(String),
}

/// Parses user input for slash commands.
///
/// Returns `Some(ChatCommand)` if the input is a valid command,
/// or `None` if it should be treated as a regular message.
///
/// # Examples
///
/// ```
/// # use mentorai::chat::parse_command;
/// assert!(parse_command("/quit").is_some());
/// assert!(parse_command("/level advanced").is_some());
/// assert!(parse_command("How do I get an internship?").is_none());
/// ```
pub fn parse_command(input: &str) -> Option<ChatCommand> {
    let input = input.trim();

    if !input.starts_with('/') {
        return None;
    }

    let mut parts = input[1..].splitn(2, ' ');
    let command = parts.next()?.to_lowercase();
    let argument = parts.next().map(|s| s.trim()).filter(|s| !s.is_empty());

    let result = match command.as_str() {
        "clear" => ChatCommand::Clear,
        "level" => parse_setting(argument, "/level", ChatCommand::Level),
        "goal" => parse_setting(argument, "/goal", ChatCommand::Goal),
        "tone" => parse_setting(argument, "/tone", ChatCommand::Tone),
        "outputs" => match argument {
            Some(arg) if arg.eq_ignore_ascii_case("none") => ChatCommand::Outputs(Vec::new()),
            Some(arg) => match parse_output_list(arg) {
                Ok(outputs) => ChatCommand::Outputs(outputs),
                Err(err) => ChatCommand::Invalid(format!("/outputs {err}")),
            },
            None => ChatCommand::Invalid(
                "/outputs requires a comma-separated list or 'none'".to_string(),
            ),
        },
        "toggle" => parse_setting(argument, "/toggle", ChatCommand::Toggle),
        "creativity" | "temperature" => match argument {
            Some(arg) => match parse_creativity(arg) {
                Ok(value) => ChatCommand::Creativity(value),
                Err(_) => ChatCommand::Invalid(
                    "/creativity expects a value between 0.1 and 1.0".to_string(),
                ),
            },
            None => ChatCommand::Invalid("/creativity requires a value".to_string()),
        },
        "model" => match argument {
            Some(model) => ChatCommand::Model(model.to_string()),
            None => ChatCommand::Invalid("/model requires a model name".to_string()),
        },
        "models" => ChatCommand::Models,
        "example" => match argument.map(str::parse::<usize>) {
            Some(Ok(n)) if (1..=QUICK_START_EXAMPLES.len()).contains(&n) => {
                ChatCommand::Example(n - 1)
            }
            _ => ChatCommand::Invalid(format!(
                "/example expects a number from 1 to {}",
                QUICK_START_EXAMPLES.len()
            )),
        },
        "save" | "download" => ChatCommand::Save(argument.map(|s| s.to_string())),
        "help" | "?" => ChatCommand::Help,
        "quit" | "exit" | "q" => ChatCommand::Quit,
        "stats" | "status" => ChatCommand::Stats,
        "config" | "settings" => ChatCommand::ShowConfig,
        _ => ChatCommand::Invalid(format!("Unknown command: /{}", command)),
    };

    Some(result)
}

fn parse_setting<T, F>(argument: Option<&str>, name: &str, constructor: F) -> ChatCommand
where
    T: std::str::FromStr<Err = crate::Error>,
    F: Fn(T) -> ChatCommand,
{
    match argument {
        Some(arg) => match arg.parse::<T>() {
            Ok(value) => constructor(value),
            Err(err) => ChatCommand::Invalid(format!("{} {}", name, err)),
        },
        None => ChatCommand::Invalid(format!("{} requires a value", name)),
    }
}

/// Returns help text describing available commands.
pub fn help_text() -> &'static str {
    r#"Available commands:
  /clear                 Clear conversation history
  /level <level>         Beginner, Intermediate or Advanced
  /goal <goal>           Internship, Job, Skill Learning or Interview Prep
  /tone <tone>           Friendly, Professional or Mentor-like
  /outputs <a,b,...>     Select outputs: roadmap, resume, interview, portfolio (or 'none')
  /toggle <output>       Select or deselect one output
  /creativity <v>        Set creativity 0.1-1.0
  /model <name>          Change the model
  /models                List available models
  /example <1-4>         Send a quick-start prompt
  /save [file]           Save the chat (default: a temporary .txt file)
  /stats                 Show session statistics
  /config                Show current settings
  /help                  Show this help message
  /quit                  Exit the chat"#
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_quit_commands() {
        assert_eq!(parse_command("/quit"), Some(ChatCommand::Quit));
        assert_eq!(parse_command("/exit"), Some(ChatCommand::Quit));
        assert_eq!(parse_command("/q"), Some(ChatCommand::Quit));
        assert_eq!(parse_command("  /quit  "), Some(ChatCommand::Quit));
    }

    #[test]
    fn parse_clear() {
        assert_eq!(parse_command("/clear"), Some(ChatCommand::Clear));
        assert_eq!(parse_command("/CLEAR"), Some(ChatCommand::Clear));
    }

    #[test]
    fn parse_settings() {
        assert_eq!(
            parse_command("/level intermediate"),
            Some(ChatCommand::Level(ExperienceLevel::Intermediate))
        );
        assert_eq!(
            parse_command("/goal Skill Learning"),
            Some(ChatCommand::Goal(CareerGoal::SkillLearning))
        );
        assert_eq!(
            parse_command("/tone friendly"),
            Some(ChatCommand::Tone(Tone::Friendly))
        );
        assert!(matches!(
            parse_command("/tone"),
            Some(ChatCommand::Invalid(msg)) if msg.contains("requires")
        ));
        assert!(matches!(
            parse_command("/level guru"),
            Some(ChatCommand::Invalid(msg)) if msg.starts_with("/level")
        ));
    }

    #[test]
    fn parse_outputs() {
        assert_eq!(
            parse_command("/outputs roadmap, interview"),
            Some(ChatCommand::Outputs(vec![
                OutputType::Roadmap,
                OutputType::InterviewQA
            ]))
        );
        assert_eq!(
            parse_command("/outputs none"),
            Some(ChatCommand::Outputs(Vec::new()))
        );
        assert_eq!(
            parse_command("/toggle Resume Tips"),
            Some(ChatCommand::Toggle(OutputType::ResumeTips))
        );
    }

    #[test]
    fn parse_creativity_command() {
        assert_eq!(
            parse_command("/creativity 0.5"),
            Some(ChatCommand::Creativity(0.5))
        );
        assert!(matches!(
            parse_command("/creativity 0"),
            Some(ChatCommand::Invalid(msg)) if msg.contains("between")
        ));
    }

    #[test]
    fn parse_model_commands() {
        assert_eq!(
            parse_command("/model   gemma-7b-it  "),
            Some(ChatCommand::Model("gemma-7b-it".to_string()))
        );
        assert_eq!(parse_command("/models"), Some(ChatCommand::Models));
    }

    #[test]
    fn parse_example() {
        assert_eq!(parse_command("/example 1"), Some(ChatCommand::Example(0)));
        assert_eq!(parse_command("/example 4"), Some(ChatCommand::Example(3)));
        assert!(matches!(parse_command("/example 5"), Some(ChatCommand::Invalid(_))));
        assert!(matches!(parse_command("/example"), Some(ChatCommand::Invalid(_))));
    }

    #[test]
    fn parse_save() {
        assert_eq!(parse_command("/save"), Some(ChatCommand::Save(None)));
        assert_eq!(
            parse_command("/save chat.txt"),
            Some(ChatCommand::Save(Some("chat.txt".to_string())))
        );
    }

    #[test]
    fn parse_stats_and_config() {
        assert_eq!(parse_command("/stats"), Some(ChatCommand::Stats));
        assert_eq!(parse_command("/config"), Some(ChatCommand::ShowConfig));
    }

    #[test]
    fn non_commands() {
        assert_eq!(parse_command("Hello, mentor!"), None);
        assert_eq!(parse_command(""), None);
        assert_eq!(parse_command("  "), None);
    }

    #[test]
    fn help_text_not_empty() {
        let help = help_text();
        assert!(help.contains("/quit"));
        assert!(help.contains("/clear"));
        assert!(help.contains("/outputs"));
        assert!(help.contains("/save"));
    }
}
