//! TOML rule catalog parser and lesson resolver.
//!
//! Loads lesson rule sets from TOML files and directories, validates them,
//! and resolves lesson ids to the rule set that governs them.

use std::collections::BTreeMap;
use std::path::Path;

use anyhow::{Context, Result};
use serde::Deserialize;

use crate::model::{Criterion, LessonId, RuleSet};

/// Intermediate TOML structure for parsing rule files.
#[derive(Debug, Deserialize)]
struct TomlRulesFile {
    #[serde(default)]
    lessons: Vec<TomlLesson>,
}

#[derive(Debug, Deserialize)]
struct TomlLesson {
    id: String,
    #[serde(default)]
    criteria: Vec<TomlCriterion>,
}

#[derive(Debug, Deserialize)]
struct TomlCriterion {
    name: String,
    keywords: Vec<String>,
    good_feedback: String,
    bad_feedback: String,
    #[serde(default)]
    extra_good_feedback: Option<String>,
    #[serde(default)]
    improvement_tip: Option<String>,
}

/// Parse a single TOML file into rule sets.
pub fn parse_rules(path: &Path) -> Result<Vec<RuleSet>> {
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("failed to read rules file: {}", path.display()))?;

    parse_rules_str(&content, path)
}

/// Parse a TOML string into rule sets (useful for testing).
pub fn parse_rules_str(content: &str, source_path: &Path) -> Result<Vec<RuleSet>> {
    let parsed: TomlRulesFile = toml::from_str(content)
        .with_context(|| format!("failed to parse TOML: {}", source_path.display()))?;

    let sets = parsed
        .lessons
        .into_iter()
        .map(|lesson| {
            let criteria = lesson
                .criteria
                .into_iter()
                .map(|c| Criterion {
                    name: c.name,
                    keywords: c.keywords,
                    good_feedback: c.good_feedback,
                    bad_feedback: c.bad_feedback,
                    extra_good_feedback: c.extra_good_feedback,
                    improvement_tip: c.improvement_tip,
                })
                .collect();

            RuleSet {
                lesson_id: lesson.id,
                criteria,
            }
        })
        .collect();

    Ok(sets)
}

/// Recursively load all `.toml` rule files from a directory.
pub fn load_rules_dir(dir: &Path) -> Result<Vec<RuleSet>> {
    let mut sets = Vec::new();

    if !dir.is_dir() {
        anyhow::bail!("not a directory: {}", dir.display());
    }

    for entry in std::fs::read_dir(dir)
        .with_context(|| format!("failed to read directory: {}", dir.display()))?
    {
        let entry = entry?;
        let path = entry.path();

        if path.is_dir() {
            sets.extend(load_rules_dir(&path)?);
        } else if path.extension().is_some_and(|ext| ext == "toml") {
            match parse_rules(&path) {
                Ok(parsed) => sets.extend(parsed),
                Err(e) => {
                    tracing::warn!("skipping {}: {}", path.display(), e);
                }
            }
        }
    }

    Ok(sets)
}

// Rule data shipped with the crate, one file per lesson.
const BUILTIN_RULES: &[(&str, &str)] = &[
    ("lesson_2.toml", include_str!("../rules/lesson_2.toml")),
    ("lesson_3.toml", include_str!("../rules/lesson_3.toml")),
    ("lesson_4.toml", include_str!("../rules/lesson_4.toml")),
    ("lesson_5.toml", include_str!("../rules/lesson_5.toml")),
    ("lesson_6.toml", include_str!("../rules/lesson_6.toml")),
];

/// The rule sets shipped with the crate, in file order.
pub fn builtin_rule_sets() -> Vec<RuleSet> {
    BUILTIN_RULES
        .iter()
        .flat_map(|(name, content)| {
            parse_rules_str(content, Path::new(name)).expect("failed to parse builtin rules")
        })
        .collect()
}

/// All known lesson rule sets, keyed by serialized lesson id.
///
/// A catalog is built once and shared read-only; iteration order is
/// deterministic (sorted by lesson id).
#[derive(Debug, Clone)]
pub struct RuleCatalog {
    rules: BTreeMap<String, RuleSet>,
}

impl RuleCatalog {
    /// Build a catalog from rule sets. Later sets replace earlier ones
    /// with the same lesson id.
    pub fn from_sets(sets: impl IntoIterator<Item = RuleSet>) -> Self {
        let rules = sets
            .into_iter()
            .map(|set| (set.lesson_id.clone(), set))
            .collect();

        Self { rules }
    }

    /// The catalog shipped with the crate.
    pub fn builtin() -> Self {
        Self::from_sets(builtin_rule_sets())
    }

    /// Number of rule sets in the catalog.
    pub fn len(&self) -> usize {
        self.rules.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rules.is_empty()
    }

    /// Exact lookup by serialized lesson id.
    pub fn get(&self, lesson_id: &str) -> Option<&RuleSet> {
        self.rules.get(lesson_id)
    }

    /// All rule sets, sorted by lesson id.
    pub fn rule_sets(&self) -> impl Iterator<Item = &RuleSet> {
        self.rules.values()
    }

    /// Resolve a lesson id to its rule set.
    ///
    /// Falls back in two stages: a bare lesson id resolves to its first
    /// step, and failing that to the first catalog entry that is a step
    /// of the requested id. Returns `None` when nothing applies.
    pub fn resolve(&self, lesson_id: &str) -> Option<&RuleSet> {
        if let Some(set) = self.rules.get(lesson_id) {
            return Some(set);
        }

        if let Ok(LessonId::Base(n)) = lesson_id.parse::<LessonId>() {
            let first_step = LessonId::Step(n, 1).to_string();
            if let Some(set) = self.rules.get(&first_step) {
                return Some(set);
            }
        }

        let prefix = format!("{lesson_id}_step_");
        self.rules
            .iter()
            .find(|(id, _)| id.starts_with(&prefix))
            .map(|(_, set)| set)
    }
}

/// A warning from rule set validation.
#[derive(Debug, Clone)]
pub struct ValidationWarning {
    /// The lesson id the warning applies to (if applicable).
    pub lesson_id: Option<String>,
    /// Warning message.
    pub message: String,
}

/// Validate rule sets for common issues.
pub fn validate_rule_sets(sets: &[RuleSet]) -> Vec<ValidationWarning> {
    let mut warnings = Vec::new();

    // Check for duplicate lesson ids
    let mut seen_ids = std::collections::HashSet::new();
    for set in sets {
        if !seen_ids.insert(&set.lesson_id) {
            warnings.push(ValidationWarning {
                lesson_id: Some(set.lesson_id.clone()),
                message: format!("duplicate lesson id: {}", set.lesson_id),
            });
        }
    }

    // Check that ids round-trip through the lesson id grammar, so the
    // resolver's fallback stages can reach them
    for set in sets {
        match set.lesson_id.parse::<LessonId>() {
            Ok(parsed) if parsed.to_string() == set.lesson_id => {}
            Ok(parsed) => {
                warnings.push(ValidationWarning {
                    lesson_id: Some(set.lesson_id.clone()),
                    message: format!(
                        "lesson id does not round-trip (parses as {parsed}); only exact lookups will find it"
                    ),
                });
            }
            Err(_) => {
                warnings.push(ValidationWarning {
                    lesson_id: Some(set.lesson_id.clone()),
                    message: "lesson id is not in lesson_<n>[_step_<m>] form".into(),
                });
            }
        }
    }

    // Check for empty criteria lists
    for set in sets {
        if set.criteria.is_empty() {
            warnings.push(ValidationWarning {
                lesson_id: Some(set.lesson_id.clone()),
                message: "rule set has no criteria".into(),
            });
        }
    }

    for set in sets {
        let mut seen_names = std::collections::HashSet::new();
        for criterion in &set.criteria {
            if !seen_names.insert(&criterion.name) {
                warnings.push(ValidationWarning {
                    lesson_id: Some(set.lesson_id.clone()),
                    message: format!("duplicate criterion name: {}", criterion.name),
                });
            }

            if criterion.keywords.is_empty() {
                warnings.push(ValidationWarning {
                    lesson_id: Some(set.lesson_id.clone()),
                    message: format!("criterion '{}' has no keywords", criterion.name),
                });
            }

            let mut seen_keywords = std::collections::HashSet::new();
            for keyword in &criterion.keywords {
                if !seen_keywords.insert(keyword) {
                    warnings.push(ValidationWarning {
                        lesson_id: Some(set.lesson_id.clone()),
                        message: format!(
                            "criterion '{}' repeats keyword '{}'",
                            criterion.name, keyword
                        ),
                    });
                }
            }

            if criterion.good_feedback.trim().is_empty()
                || criterion.bad_feedback.trim().is_empty()
            {
                warnings.push(ValidationWarning {
                    lesson_id: Some(set.lesson_id.clone()),
                    message: format!("criterion '{}' has blank feedback text", criterion.name),
                });
            }
        }
    }

    warnings
}
