//! System-prompt assembly.
//!
//! The provider is stateless, so every request starts with a system message built from the fixed
//! persona and the current [`ConversationConfig`].  Both functions here are pure.

use crate::types::{ConversationConfig, OutputType};

/// The mentor persona that opens every system prompt.
pub const PERSONA: &str = "\
You are MentorAI, a highly experienced and supportive AI Career Mentor specializing in tech careers.
Provide structured, practical and realistic guidance.
";

const GUIDANCE: &str = "\
If interview requested: give 3-6 Q/A.
If roadmap requested: give timeline phases.
If resume guidance requested: give practical improvements.
If portfolio guidance requested: suggest project ideas.
";

/// Renders the configuration block appended to the persona.
///
/// Lists level, goal and tone, then one line per selected output type in config order, then the
/// fixed guidance for interview, roadmap, resume and portfolio requests.
pub fn compose(config: &ConversationConfig) -> String {
    let mut context = format!(
        "User Level: {}\nCareer Goal: {}\nTone: {}\n\nRequested Outputs:\n",
        config.level(),
        config.goal(),
        config.tone(),
    );
    for output in config.output_types() {
        context.push_str("- ");
        context.push_str(output.label());
        context.push('\n');
    }
    context.push('\n');
    context.push_str(GUIDANCE);
    context
}

/// The full content of the system message: persona, newline, configuration block.
pub fn system_prompt(config: &ConversationConfig) -> String {
    format!("{PERSONA}\n{}", compose(config))
}

/// True when the prompt carries dedicated guidance for `output`.
pub fn has_guidance(output: &OutputType) -> bool {
    !matches!(output, OutputType::Custom(_))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{CareerGoal, ExperienceLevel, Tone};

    fn interview_config() -> ConversationConfig {
        ConversationConfig::new("llama-3.1-8b-instant")
            .with_level(ExperienceLevel::Beginner)
            .with_goal(CareerGoal::Job)
            .with_tone(Tone::Professional)
            .with_output_types([OutputType::InterviewQA])
    }

    #[test]
    fn compose_layout() {
        let expected = "\
User Level: Beginner
Career Goal: Job
Tone: Professional

Requested Outputs:
- Interview Q/A

If interview requested: give 3-6 Q/A.
If roadmap requested: give timeline phases.
If resume guidance requested: give practical improvements.
If portfolio guidance requested: suggest project ideas.
";
        assert_eq!(compose(&interview_config()), expected);
    }

    #[test]
    fn compose_is_deterministic() {
        let config = interview_config()
            .with_output_types([OutputType::PortfolioGuidance, OutputType::Roadmap]);
        assert_eq!(compose(&config), compose(&config));
        assert_eq!(compose(&config), compose(&config.clone()));
    }

    #[test]
    fn compose_lists_every_output_in_order() {
        let config = ConversationConfig::new("m")
            .with_goal(CareerGoal::SkillLearning)
            .with_tone(Tone::MentorLike)
            .with_output_types([
                OutputType::Custom("Salary negotiation".to_string()),
                OutputType::PortfolioGuidance,
                OutputType::ResumeTips,
                OutputType::Roadmap,
                OutputType::InterviewQA,
            ]);
        let context = compose(&config);
        assert!(context.contains("Career Goal: Skill Learning\n"));
        assert!(context.contains("Tone: Mentor-like\n"));
        assert!(context.contains(
            "- Learning Roadmap\n- Resume Tips\n- Interview Q/A\n- Portfolio Guidance\n- Salary negotiation\n"
        ));
    }

    #[test]
    fn compose_without_outputs_still_renders() {
        let context = compose(&ConversationConfig::new("m"));
        assert!(context.contains("Requested Outputs:\n\nIf interview requested"));
    }

    #[test]
    fn system_prompt_starts_with_persona() {
        let prompt = system_prompt(&interview_config());
        assert!(prompt.starts_with(PERSONA));
        assert!(prompt.contains("Interview Q/A"));
        assert!(prompt.ends_with(GUIDANCE));
    }

    #[test]
    fn custom_outputs_have_no_guidance() {
        assert!(has_guidance(&OutputType::Roadmap));
        assert!(!has_guidance(&OutputType::Custom("x".to_string())));
    }
}
