//! Core trait definition for learner profile backends.
//!
//! The async trait here is implemented by the `tutormark-profile` crate.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

// ---------------------------------------------------------------------------
// Profile client trait
// ---------------------------------------------------------------------------

/// Trait for profile backends that serve learner personalization data.
#[async_trait]
pub trait ProfileClient: Send + Sync {
    /// Human-readable backend name (e.g. "http").
    fn name(&self) -> &str;

    /// Fetch the aggregated profile for a learner.
    async fn personalization(&self, user_id: &str) -> anyhow::Result<ProfileData>;

    /// Fetch a feedback template by key.
    async fn template(&self, key: TemplateKey) -> anyhow::Result<FeedbackTemplate>;
}

/// Aggregated learner history used to personalize feedback.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ProfileData {
    /// Skill areas the learner is strongest in, best first.
    #[serde(default)]
    pub top_strengths: Vec<String>,
    /// Skill areas the learner most needs to work on, weakest first.
    #[serde(default)]
    pub top_weaknesses: Vec<String>,
    /// Total responses the learner has submitted so far.
    #[serde(default)]
    pub response_count: u32,
}

// ---------------------------------------------------------------------------
// Personalization templates
// ---------------------------------------------------------------------------

/// The personalization templates a profile backend can serve.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TemplateKey {
    /// Praise referencing the learner's strongest skill area.
    Strength,
    /// Encouragement referencing the learner's weakest skill area.
    Improvement,
    /// Progress note referencing the learner's submission history.
    Progress,
}

impl TemplateKey {
    /// Wire identifier of the template.
    pub fn as_str(&self) -> &'static str {
        match self {
            TemplateKey::Strength => "strength_template",
            TemplateKey::Improvement => "improvement_template",
            TemplateKey::Progress => "progress_template",
        }
    }

    /// The placeholder this template's body substitutes.
    pub fn placeholder(&self) -> &'static str {
        match self {
            TemplateKey::Strength => "{strength_area}",
            TemplateKey::Improvement => "{weakness_area}",
            TemplateKey::Progress => "{skill_area}",
        }
    }
}

impl std::fmt::Display for TemplateKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// A feedback template body with a single named placeholder.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FeedbackTemplate {
    /// Template text, e.g. "Keep building on your {strength_area} skills!".
    pub template: String,
}

impl FeedbackTemplate {
    /// Substitute `placeholder` with `value` everywhere it occurs.
    pub fn render(&self, placeholder: &str, value: &str) -> String {
        self.template.replace(placeholder, value)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn template_key_identifiers() {
        assert_eq!(TemplateKey::Strength.as_str(), "strength_template");
        assert_eq!(TemplateKey::Improvement.as_str(), "improvement_template");
        assert_eq!(TemplateKey::Progress.as_str(), "progress_template");
    }

    #[test]
    fn template_key_placeholders() {
        assert_eq!(TemplateKey::Strength.placeholder(), "{strength_area}");
        assert_eq!(TemplateKey::Improvement.placeholder(), "{weakness_area}");
        assert_eq!(TemplateKey::Progress.placeholder(), "{skill_area}");
    }

    #[test]
    fn render_substitutes_placeholder() {
        let tpl = FeedbackTemplate {
            template: "Keep building on your {strength_area} skills!".into(),
        };
        assert_eq!(
            tpl.render("{strength_area}", "Storytelling"),
            "Keep building on your Storytelling skills!"
        );
    }

    #[test]
    fn render_without_placeholder_is_identity() {
        let tpl = FeedbackTemplate {
            template: "You are making steady progress.".into(),
        };
        assert_eq!(
            tpl.render("{skill_area}", "Clarity"),
            "You are making steady progress."
        );
    }

    #[test]
    fn profile_data_deserializes_with_defaults() {
        let data: ProfileData = serde_json::from_str("{}").unwrap();
        assert!(data.top_strengths.is_empty());
        assert!(data.top_weaknesses.is_empty());
        assert_eq!(data.response_count, 0);
    }
}
