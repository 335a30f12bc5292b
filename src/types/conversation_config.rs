use std::collections::BTreeSet;
use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

/// Lowest accepted creativity (sampling temperature).
pub const MIN_CREATIVITY: f32 = 0.1;
/// Highest accepted creativity (sampling temperature).
pub const MAX_CREATIVITY: f32 = 1.0;
/// Creativity used until the user changes it.
pub const DEFAULT_CREATIVITY: f32 = 0.7;

fn normalize(label: &str) -> String {
    label
        .trim()
        .to_lowercase()
        .chars()
        .filter(|c| c.is_ascii_alphanumeric())
        .collect()
}

/// How experienced the user is.
#[derive(Debug, Copy, Clone, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ExperienceLevel {
    /// New to the field.
    #[default]
    Beginner,
    /// Some experience.
    Intermediate,
    /// Seasoned.
    Advanced,
}

impl ExperienceLevel {
    /// All levels in menu order.
    pub const ALL: [ExperienceLevel; 3] = [
        ExperienceLevel::Beginner,
        ExperienceLevel::Intermediate,
        ExperienceLevel::Advanced,
    ];

    /// The label shown to the user and the model.
    pub fn label(&self) -> &'static str {
        match self {
            ExperienceLevel::Beginner => "Beginner",
            ExperienceLevel::Intermediate => "Intermediate",
            ExperienceLevel::Advanced => "Advanced",
        }
    }
}

/// What the user is working toward.
#[derive(Debug, Copy, Clone, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum CareerGoal {
    /// Landing an internship.
    Internship,
    /// Landing a job.
    #[default]
    Job,
    /// Learning a skill.
    SkillLearning,
    /// Preparing for interviews.
    InterviewPrep,
}

impl CareerGoal {
    /// All goals in menu order.
    pub const ALL: [CareerGoal; 4] = [
        CareerGoal::Internship,
        CareerGoal::Job,
        CareerGoal::SkillLearning,
        CareerGoal::InterviewPrep,
    ];

    /// The label shown to the user and the model.
    pub fn label(&self) -> &'static str {
        match self {
            CareerGoal::Internship => "Internship",
            CareerGoal::Job => "Job",
            CareerGoal::SkillLearning => "Skill Learning",
            CareerGoal::InterviewPrep => "Interview Prep",
        }
    }
}

/// The voice the mentor should answer in.
#[derive(Debug, Copy, Clone, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Tone {
    /// Casual and warm.
    Friendly,
    /// Businesslike.
    #[default]
    Professional,
    /// Like a personal mentor.
    MentorLike,
}

impl Tone {
    /// All tones in menu order.
    pub const ALL: [Tone; 3] = [Tone::Friendly, Tone::Professional, Tone::MentorLike];

    /// The label shown to the user and the model.
    pub fn label(&self) -> &'static str {
        match self {
            Tone::Friendly => "Friendly",
            Tone::Professional => "Professional",
            Tone::MentorLike => "Mentor-like",
        }
    }
}

/// A kind of output the user asked the mentor to produce.
///
/// Known kinds carry dedicated guidance in the system prompt.  `Custom` kinds are passed through as
/// a plain line, in the same way unknown model identifiers are.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum OutputType {
    /// A phased learning roadmap.
    Roadmap,
    /// Resume improvements.
    ResumeTips,
    /// Interview questions with answers.
    InterviewQA,
    /// Portfolio project ideas.
    PortfolioGuidance,
    /// Any other requested output.
    Custom(String),
}

impl OutputType {
    /// All known output types in menu order.
    pub const KNOWN: [OutputType; 4] = [
        OutputType::Roadmap,
        OutputType::ResumeTips,
        OutputType::InterviewQA,
        OutputType::PortfolioGuidance,
    ];

    /// The label shown to the user and the model.
    pub fn label(&self) -> &str {
        match self {
            OutputType::Roadmap => "Learning Roadmap",
            OutputType::ResumeTips => "Resume Tips",
            OutputType::InterviewQA => "Interview Q/A",
            OutputType::PortfolioGuidance => "Portfolio Guidance",
            OutputType::Custom(label) => label,
        }
    }
}

macro_rules! label_impls {
    ($ty:ty, $param:literal, { $($alias:literal => $variant:expr),* $(,)? }) => {
        impl fmt::Display for $ty {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(self.label())
            }
        }

        impl FromStr for $ty {
            type Err = Error;

            fn from_str(s: &str) -> Result<Self> {
                let wanted = normalize(s);
                for candidate in <$ty>::ALL {
                    if normalize(candidate.label()) == wanted {
                        return Ok(candidate);
                    }
                }
                match wanted.as_str() {
                    $($alias => Ok($variant),)*
                    _ => Err(Error::validation(
                        format!("unknown {} {s:?}", $param),
                        Some($param.to_string()),
                    )),
                }
            }
        }
    };
}

label_impls!(ExperienceLevel, "level", {
    "intro" => ExperienceLevel::Beginner,
    "expert" => ExperienceLevel::Advanced,
});
label_impls!(CareerGoal, "goal", {
    "skills" => CareerGoal::SkillLearning,
    "interview" => CareerGoal::InterviewPrep,
    "interviews" => CareerGoal::InterviewPrep,
});
label_impls!(Tone, "tone", {
    "mentor" => Tone::MentorLike,
});

impl fmt::Display for OutputType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl FromStr for OutputType {
    type Err = Error;

    /// Parses a label or short alias; anything else becomes `Custom`.
    fn from_str(s: &str) -> Result<Self> {
        let trimmed = s.trim();
        if trimmed.is_empty() {
            return Err(Error::validation(
                "output type must not be empty",
                Some("outputs".to_string()),
            ));
        }
        let wanted = normalize(trimmed);
        for candidate in OutputType::KNOWN {
            if normalize(candidate.label()) == wanted {
                return Ok(candidate);
            }
        }
        Ok(match wanted.as_str() {
            "roadmap" => OutputType::Roadmap,
            "resume" | "resumetips" => OutputType::ResumeTips,
            "interview" | "interviewqa" | "qa" => OutputType::InterviewQA,
            "portfolio" => OutputType::PortfolioGuidance,
            _ => OutputType::Custom(trimmed.to_string()),
        })
    }
}

/// The user's settings for a conversation.
///
/// A session owns exactly one of these.  A turn works on a snapshot, so changing settings never
/// affects a request that is already in flight.
#[derive(Debug, Clone, PartialEq)]
pub struct ConversationConfig {
    level: ExperienceLevel,
    goal: CareerGoal,
    output_types: BTreeSet<OutputType>,
    tone: Tone,
    creativity: f32,
    model: String,
}

impl ConversationConfig {
    /// Creates a config with the default settings for the given model.
    ///
    /// Defaults: Beginner, Job, Professional, creativity 0.7, no output types selected.
    pub fn new(model: impl Into<String>) -> Self {
        Self {
            level: ExperienceLevel::default(),
            goal: CareerGoal::default(),
            output_types: BTreeSet::new(),
            tone: Tone::default(),
            creativity: DEFAULT_CREATIVITY,
            model: model.into(),
        }
    }

    /// Sets the experience level.
    pub fn with_level(mut self, level: ExperienceLevel) -> Self {
        self.level = level;
        self
    }

    /// Sets the career goal.
    pub fn with_goal(mut self, goal: CareerGoal) -> Self {
        self.goal = goal;
        self
    }

    /// Sets the tone.
    pub fn with_tone(mut self, tone: Tone) -> Self {
        self.tone = tone;
        self
    }

    /// Replaces the selected output types.
    pub fn with_output_types(mut self, output_types: impl IntoIterator<Item = OutputType>) -> Self {
        self.output_types = output_types.into_iter().collect();
        self
    }

    /// Sets the creativity, rejecting values outside `[0.1, 1.0]`.
    pub fn with_creativity(mut self, creativity: f32) -> Result<Self> {
        self.set_creativity(creativity)?;
        Ok(self)
    }

    /// Sets the model identifier.
    pub fn with_model(mut self, model: impl Into<String>) -> Self {
        self.model = model.into();
        self
    }

    /// The experience level.
    pub fn level(&self) -> ExperienceLevel {
        self.level
    }

    /// The career goal.
    pub fn goal(&self) -> CareerGoal {
        self.goal
    }

    /// The tone.
    pub fn tone(&self) -> Tone {
        self.tone
    }

    /// The selected output types in canonical order.
    pub fn output_types(&self) -> impl Iterator<Item = &OutputType> {
        self.output_types.iter()
    }

    /// True when at least one output type is selected.
    pub fn has_output_types(&self) -> bool {
        !self.output_types.is_empty()
    }

    /// True when `output` is selected.
    pub fn is_selected(&self, output: &OutputType) -> bool {
        self.output_types.contains(output)
    }

    /// The sampling temperature.
    pub fn creativity(&self) -> f32 {
        self.creativity
    }

    /// The model identifier.
    pub fn model(&self) -> &str {
        &self.model
    }

    /// Sets the experience level.
    pub fn set_level(&mut self, level: ExperienceLevel) {
        self.level = level;
    }

    /// Sets the career goal.
    pub fn set_goal(&mut self, goal: CareerGoal) {
        self.goal = goal;
    }

    /// Sets the tone.
    pub fn set_tone(&mut self, tone: Tone) {
        self.tone = tone;
    }

    /// Sets the model identifier.
    pub fn set_model(&mut self, model: impl Into<String>) {
        self.model = model.into();
    }

    /// Sets the creativity, rejecting values outside `[0.1, 1.0]`.
    pub fn set_creativity(&mut self, creativity: f32) -> Result<()> {
        if creativity.is_finite() && (MIN_CREATIVITY..=MAX_CREATIVITY).contains(&creativity) {
            self.creativity = creativity;
            Ok(())
        } else {
            Err(Error::validation(
                format!("creativity must be between {MIN_CREATIVITY} and {MAX_CREATIVITY}"),
                Some("creativity".to_string()),
            ))
        }
    }

    /// Replaces the selected output types.
    pub fn set_output_types(&mut self, output_types: impl IntoIterator<Item = OutputType>) {
        self.output_types = output_types.into_iter().collect();
    }

    /// Flips the selection of one output type and returns whether it is now selected.
    pub fn toggle_output_type(&mut self, output: OutputType) -> bool {
        if self.output_types.remove(&output) {
            false
        } else {
            self.output_types.insert(output);
            true
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_follow_the_settings_panel() {
        let config = ConversationConfig::new("llama-3.1-8b-instant");
        assert_eq!(config.level(), ExperienceLevel::Beginner);
        assert_eq!(config.goal(), CareerGoal::Job);
        assert_eq!(config.tone(), Tone::Professional);
        assert_eq!(config.creativity(), DEFAULT_CREATIVITY);
        assert!(!config.has_output_types());
        assert_eq!(config.model(), "llama-3.1-8b-instant");
    }

    #[test]
    fn output_types_keep_canonical_order() {
        let config = ConversationConfig::new("m").with_output_types([
            OutputType::PortfolioGuidance,
            OutputType::Custom("Salary advice".to_string()),
            OutputType::Roadmap,
            OutputType::Roadmap,
        ]);
        let labels: Vec<&str> = config.output_types().map(OutputType::label).collect();
        assert_eq!(
            labels,
            vec!["Learning Roadmap", "Portfolio Guidance", "Salary advice"]
        );
    }

    #[test]
    fn toggle_output_type() {
        let mut config = ConversationConfig::new("m");
        assert!(config.toggle_output_type(OutputType::InterviewQA));
        assert!(config.is_selected(&OutputType::InterviewQA));
        assert!(!config.toggle_output_type(OutputType::InterviewQA));
        assert!(!config.has_output_types());
    }

    #[test]
    fn creativity_range() {
        let mut config = ConversationConfig::new("m");
        assert!(config.set_creativity(0.1).is_ok());
        assert!(config.set_creativity(1.0).is_ok());
        assert!(config.set_creativity(0.0).unwrap_err().is_validation());
        assert!(config.set_creativity(1.5).is_err());
        assert!(config.set_creativity(f32::NAN).is_err());
        assert_eq!(config.creativity(), 1.0);
    }

    #[test]
    fn creativity_builder_checks_range() {
        let err = ConversationConfig::new("m").with_creativity(5.0).unwrap_err();
        assert!(err.is_validation());
        let config = ConversationConfig::new("m").with_creativity(0.4).unwrap();
        assert_eq!(config.creativity(), 0.4);
    }

    #[test]
    fn parse_labels_and_aliases() {
        assert_eq!("beginner".parse::<ExperienceLevel>().unwrap(), ExperienceLevel::Beginner);
        assert_eq!("Skill Learning".parse::<CareerGoal>().unwrap(), CareerGoal::SkillLearning);
        assert_eq!("interview-prep".parse::<CareerGoal>().unwrap(), CareerGoal::InterviewPrep);
        assert_eq!("Mentor-like".parse::<Tone>().unwrap(), Tone::MentorLike);
        assert_eq!("mentor".parse::<Tone>().unwrap(), Tone::MentorLike);
        assert!("wizard".parse::<ExperienceLevel>().unwrap_err().is_validation());
    }

    #[test]
    fn parse_output_types() {
        assert_eq!("Interview Q/A".parse::<OutputType>().unwrap(), OutputType::InterviewQA);
        assert_eq!("resume".parse::<OutputType>().unwrap(), OutputType::ResumeTips);
        assert_eq!(
            "Networking plan".parse::<OutputType>().unwrap(),
            OutputType::Custom("Networking plan".to_string())
        );
        assert!("  ".parse::<OutputType>().is_err());
    }
}
