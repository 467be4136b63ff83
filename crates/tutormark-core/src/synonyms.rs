//! Synonym table and morphological expansion for keyword matching.
//!
//! The table maps canonical domain terms to related terms. It is built once
//! and shared read-only; there is no mutation API. Expansion also generates
//! mechanical inflections (tested/testing/tests, saved/saves/saver,
//! studies/studied) so a keyword matches light variation in learner prose.

use std::collections::{BTreeMap, BTreeSet};

/// Builtin vocabulary, keyed by canonical term.
const BUILTIN_ENTRIES: &[(&str, &[&str])] = &[
    // Analysis & understanding
    (
        "analyze",
        &[
            "examine",
            "study",
            "investigate",
            "assess",
            "evaluate",
            "review",
            "inspect",
            "explore",
            "dissect",
            "scrutinize",
        ],
    ),
    (
        "understand",
        &[
            "comprehend",
            "grasp",
            "realize",
            "recognize",
            "perceive",
            "discern",
            "interpret",
            "appreciate",
            "fathom",
            "identify",
        ],
    ),
    // Design & creation
    (
        "design",
        &[
            "create",
            "develop",
            "build",
            "craft",
            "construct",
            "shape",
            "devise",
            "formulate",
            "conceive",
            "architect",
        ],
    ),
    (
        "prototype",
        &[
            "model",
            "mockup",
            "sample",
            "demo",
            "test version",
            "beta",
            "draft",
            "simulation",
            "proof of concept",
        ],
    ),
    // User research
    (
        "interview",
        &[
            "question",
            "survey",
            "talk with",
            "speak to",
            "discuss with",
            "consult",
            "inquire",
            "converse",
            "chat",
            "meet",
        ],
    ),
    (
        "feedback",
        &[
            "response",
            "reaction",
            "input",
            "opinion",
            "review",
            "comment",
            "critique",
            "assessment",
            "evaluation",
        ],
    ),
    // Problem solving
    (
        "solution",
        &[
            "answer",
            "resolution",
            "fix",
            "remedy",
            "approach",
            "method",
            "way",
            "strategy",
            "plan",
        ],
    ),
    (
        "improve",
        &[
            "enhance",
            "upgrade",
            "optimize",
            "refine",
            "better",
            "advance",
            "develop",
            "progress",
            "strengthen",
        ],
    ),
    // Business & strategy
    (
        "market",
        &[
            "audience",
            "customers",
            "users",
            "demographic",
            "sector",
            "industry",
            "niche",
            "segment",
        ],
    ),
    (
        "strategy",
        &[
            "plan",
            "approach",
            "method",
            "system",
            "framework",
            "process",
            "roadmap",
            "blueprint",
        ],
    ),
    // Testing & validation
    (
        "test",
        &[
            "verify",
            "validate",
            "check",
            "assess",
            "evaluate",
            "examine",
            "try out",
            "experiment",
        ],
    ),
    (
        "iterate",
        &[
            "repeat", "refine", "adjust", "modify", "update", "revise", "adapt", "improve",
        ],
    ),
    // Behavior & psychology
    (
        "behavior",
        &[
            "action", "conduct", "habit", "pattern", "practice", "routine", "tendency",
        ],
    ),
    (
        "emotion",
        &[
            "feeling",
            "sentiment",
            "reaction",
            "response",
            "mood",
            "attitude",
            "state of mind",
        ],
    ),
    // Project management
    (
        "milestone",
        &[
            "goal",
            "target",
            "objective",
            "checkpoint",
            "achievement",
            "marker",
            "stage",
        ],
    ),
    (
        "task",
        &[
            "activity",
            "action item",
            "assignment",
            "job",
            "work item",
            "deliverable",
        ],
    ),
    // Collaboration & communication
    (
        "collaborate",
        &[
            "work together",
            "cooperate",
            "partner",
            "team up",
            "join forces",
            "coordinate",
        ],
    ),
    (
        "communicate",
        &[
            "convey", "express", "share", "discuss", "explain", "present", "relay",
        ],
    ),
    // Implementation & monitoring
    (
        "implement",
        &[
            "execute",
            "carry out",
            "perform",
            "accomplish",
            "achieve",
            "complete",
            "deliver",
        ],
    ),
    (
        "monitor",
        &[
            "track",
            "observe",
            "follow",
            "watch",
            "check",
            "supervise",
            "measure",
        ],
    ),
    // Quality & value
    (
        "effective",
        &[
            "successful",
            "efficient",
            "productive",
            "valuable",
            "useful",
            "beneficial",
            "worthwhile",
        ],
    ),
    (
        "essential",
        &[
            "crucial",
            "critical",
            "vital",
            "key",
            "core",
            "fundamental",
            "important",
            "necessary",
        ],
    ),
    // Innovation & creativity
    (
        "innovative",
        &[
            "creative",
            "novel",
            "unique",
            "original",
            "new",
            "groundbreaking",
            "inventive",
        ],
    ),
    (
        "brainstorm",
        &[
            "ideate",
            "think up",
            "generate ideas",
            "conceptualize",
            "imagine",
            "envision",
        ],
    ),
];

/// Immutable mapping from canonical term to related terms.
#[derive(Debug, Clone)]
pub struct SynonymTable {
    entries: BTreeMap<String, Vec<String>>,
}

impl SynonymTable {
    /// The builtin vocabulary shipped with the crate.
    pub fn builtin() -> Self {
        Self::from_entries(
            BUILTIN_ENTRIES
                .iter()
                .map(|(term, syns)| ((*term).to_string(), syns.iter().map(|s| s.to_string()))),
        )
    }

    /// Builds a table from arbitrary entries. Terms are lowercased.
    pub fn from_entries<T, S, I>(entries: I) -> Self
    where
        I: IntoIterator<Item = (T, S)>,
        T: Into<String>,
        S: IntoIterator<Item = T>,
    {
        let entries = entries
            .into_iter()
            .map(|(term, syns)| {
                (
                    term.into().to_lowercase(),
                    syns.into_iter().map(Into::into).collect(),
                )
            })
            .collect();
        Self { entries }
    }

    /// `term` itself, its registered synonyms, and its generated word forms.
    ///
    /// Total: unknown terms still yield themselves plus mechanical forms.
    pub fn related_forms(&self, term: &str) -> BTreeSet<String> {
        let term = term.to_lowercase();
        let mut related = word_forms(&term);
        if let Some(synonyms) = self.entries.get(&term) {
            related.extend(synonyms.iter().cloned());
        }
        related
    }
}

/// Mechanically generated inflectional variants of `word`, including `word`.
pub fn word_forms(word: &str) -> BTreeSet<String> {
    let mut forms = BTreeSet::new();
    forms.insert(word.to_string());

    if word.ends_with('e') {
        forms.insert(format!("{word}d"));
        forms.insert(format!("{word}s"));
        forms.insert(format!("{word}r"));
    } else {
        forms.insert(format!("{word}ed"));
        forms.insert(format!("{word}ing"));
        forms.insert(format!("{word}s"));
    }

    if let Some(stem) = word.strip_suffix('y') {
        forms.insert(format!("{stem}ies"));
        forms.insert(format!("{stem}ied"));
    }

    forms
}
