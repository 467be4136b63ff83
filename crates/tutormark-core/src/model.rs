//! Core data model types for tutormark.
//!
//! These are the fundamental types the entire tutormark system uses to
//! represent lesson criteria, rule sets, and evaluation results.

use std::collections::BTreeSet;
use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// Matched keywords for one (response, lesson) pair, stored under their
/// original catalog spelling. Sorted so results serialize identically
/// across runs.
pub type MatchSet = BTreeSet<String>;

/// A named pedagogical check for one lesson step.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Criterion {
    /// Human-readable criterion name, unique within its rule set.
    pub name: String,
    /// Case-insensitive keyword literals; single words or space-joined phrases.
    pub keywords: Vec<String>,
    /// Line emitted when the criterion is satisfied.
    pub good_feedback: String,
    /// Line emitted when the criterion is missed.
    pub bad_feedback: String,
    /// Optional extra praise appended after `good_feedback`.
    #[serde(default)]
    pub extra_good_feedback: Option<String>,
    /// Optional tip appended after `bad_feedback`.
    #[serde(default)]
    pub improvement_tip: Option<String>,
}

impl Criterion {
    /// Minimum number of distinct keyword hits needed to satisfy this
    /// criterion: 30% of the keyword count, rounded up.
    pub fn threshold(&self) -> usize {
        (self.keywords.len() as f64 * 0.3).ceil() as usize
    }
}

/// The criteria for exactly one lesson step, in declaration order.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RuleSet {
    /// Serialized lesson id this set belongs to (e.g. "lesson_2_step_1").
    pub lesson_id: String,
    /// Criteria evaluated for this step, in declaration order.
    pub criteria: Vec<Criterion>,
}

impl RuleSet {
    /// Every keyword of every criterion, in declaration order.
    pub fn keywords(&self) -> impl Iterator<Item = &str> {
        self.criteria
            .iter()
            .flat_map(|c| c.keywords.iter().map(String::as_str))
    }
}

/// A lesson identifier: either a bare lesson or one of its numbered steps.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum LessonId {
    /// A whole lesson, e.g. "lesson_3".
    Base(u32),
    /// A single step within a lesson, e.g. "lesson_3_step_2".
    Step(u32, u32),
}

impl fmt::Display for LessonId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            LessonId::Base(n) => write!(f, "lesson_{n}"),
            LessonId::Step(n, m) => write!(f, "lesson_{n}_step_{m}"),
        }
    }
}

impl FromStr for LessonId {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let segments: Vec<&str> = s.split('_').collect();
        match segments.as_slice() {
            ["lesson", n] => {
                let n = n
                    .parse::<u32>()
                    .map_err(|_| format!("invalid lesson number in id: {s}"))?;
                Ok(LessonId::Base(n))
            }
            ["lesson", n, "step", m] => {
                let n = n
                    .parse::<u32>()
                    .map_err(|_| format!("invalid lesson number in id: {s}"))?;
                let m = m
                    .parse::<u32>()
                    .map_err(|_| format!("invalid step number in id: {s}"))?;
                Ok(LessonId::Step(n, m))
            }
            _ => Err(format!("malformed lesson id: {s}")),
        }
    }
}

/// Objective structural metrics of a raw response.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct QualityMetrics {
    /// Character count of the raw response.
    pub char_length: usize,
    /// Whitespace-delimited token count; 0 for blank input.
    pub word_count: usize,
    /// Non-empty segments after splitting on runs of `.`, `!`, `?`.
    pub sentence_count: usize,
    /// Whether the response contains any of `.`, `!`, `?`.
    pub has_punctuation: bool,
    /// Whether the response is long enough to count as detailed (> 30 words).
    pub includes_details: bool,
}

/// How one criterion fared against a response.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CriterionOutcome {
    /// Criterion name.
    pub name: String,
    /// Keywords of this criterion found in the response, sorted.
    pub matched: Vec<String>,
    /// Distinct hits required to satisfy the criterion.
    pub threshold: usize,
    /// Whether `matched.len() >= threshold`.
    pub satisfied: bool,
}

/// The full outcome of evaluating one response against one lesson.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FeedbackResult {
    /// Feedback lines in emission order, displayed verbatim by callers.
    pub feedback_lines: Vec<String>,
    /// AND over all per-criterion verdicts; true on the unresolved-lesson path.
    pub meets_expectations: bool,
    /// Structural metrics of the raw response.
    pub quality: QualityMetrics,
    /// Matched keywords under their original catalog spelling.
    pub matched_keywords: MatchSet,
    /// Per-criterion breakdown, in rule declaration order.
    pub criteria: Vec<CriterionOutcome>,
    /// Engagement score in 0..=100.
    pub engagement_score: u8,
    /// Whether personalization lines were appended.
    pub personalized: bool,
}

/// One unit of work for batch evaluation, typically a JSONL line.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EvaluationRequest {
    /// Lesson or step id the response answers.
    pub lesson_id: String,
    /// The learner's free-text response.
    pub response: String,
    /// Learner id for personalization; omit to skip the profile lookup.
    #[serde(default)]
    pub user_id: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn lesson_id_display_and_parse() {
        assert_eq!(LessonId::Base(3).to_string(), "lesson_3");
        assert_eq!(LessonId::Step(3, 2).to_string(), "lesson_3_step_2");
        assert_eq!("lesson_3".parse::<LessonId>().unwrap(), LessonId::Base(3));
        assert_eq!(
            "lesson_3_step_2".parse::<LessonId>().unwrap(),
            LessonId::Step(3, 2)
        );
    }

    #[test]
    fn lesson_id_rejects_malformed() {
        assert!("lesson".parse::<LessonId>().is_err());
        assert!("lesson_".parse::<LessonId>().is_err());
        assert!("lesson_abc".parse::<LessonId>().is_err());
        assert!("lesson_3_step".parse::<LessonId>().is_err());
        assert!("lesson_3_part_2".parse::<LessonId>().is_err());
        assert!("module_3".parse::<LessonId>().is_err());
        assert!("".parse::<LessonId>().is_err());
    }

    #[test]
    fn lesson_id_round_trips() {
        for id in ["lesson_2", "lesson_2_step_1", "lesson_6_step_7"] {
            let parsed: LessonId = id.parse().unwrap();
            assert_eq!(parsed.to_string(), id);
        }
    }

    #[test]
    fn threshold_is_thirty_percent_rounded_up() {
        let mut criterion = Criterion {
            name: "Test".into(),
            keywords: vec!["a".into(); 14],
            good_feedback: "good".into(),
            bad_feedback: "bad".into(),
            extra_good_feedback: None,
            improvement_tip: None,
        };
        assert_eq!(criterion.threshold(), 5);

        criterion.keywords.truncate(10);
        assert_eq!(criterion.threshold(), 3);

        criterion.keywords.truncate(1);
        assert_eq!(criterion.threshold(), 1);

        criterion.keywords.clear();
        assert_eq!(criterion.threshold(), 0);
    }

    #[test]
    fn feedback_result_serde_roundtrip() {
        let result = FeedbackResult {
            feedback_lines: vec!["✅ Nice work!".into()],
            meets_expectations: true,
            quality: QualityMetrics {
                char_length: 12,
                word_count: 2,
                sentence_count: 1,
                has_punctuation: true,
                includes_details: false,
            },
            matched_keywords: ["interview".to_string()].into_iter().collect(),
            criteria: vec![CriterionOutcome {
                name: "Interview Understanding".into(),
                matched: vec!["interview".into()],
                threshold: 1,
                satisfied: true,
            }],
            engagement_score: 46,
            personalized: false,
        };
        let json = serde_json::to_string(&result).unwrap();
        let deserialized: FeedbackResult = serde_json::from_str(&json).unwrap();
        assert_eq!(deserialized, result);
    }
}
