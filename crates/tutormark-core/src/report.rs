//! Batch report types with JSON persistence and aggregate statistics.

use std::collections::BTreeMap;
use std::path::Path;

use anyhow::{Context, Result};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::model::FeedbackResult;

/// A complete batch evaluation report.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BatchReport {
    /// Unique report identifier.
    pub id: Uuid,
    /// When the report was created.
    pub created_at: DateTime<Utc>,
    /// Individual evaluation outcomes, in input order.
    pub entries: Vec<BatchEntry>,
    /// Aggregate statistics over all entries.
    pub stats: AggregateStats,
    /// Total wall-clock duration in milliseconds.
    pub duration_ms: u64,
}

/// One evaluated request inside a batch report.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BatchEntry {
    /// Lesson id the response was evaluated against.
    pub lesson_id: String,
    /// Learner id, when the request carried one.
    #[serde(default)]
    pub user_id: Option<String>,
    /// The evaluation outcome.
    pub result: FeedbackResult,
}

impl BatchReport {
    /// Save the report as JSON to a file.
    pub fn save_json(&self, path: &Path) -> Result<()> {
        let json = serde_json::to_string_pretty(self).context("failed to serialize report")?;
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        std::fs::write(path, json)
            .with_context(|| format!("failed to write report to {}", path.display()))?;
        Ok(())
    }

    /// Load a report from a JSON file.
    pub fn load_json(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("failed to read report from {}", path.display()))?;
        let report: BatchReport =
            serde_json::from_str(&content).context("failed to parse report JSON")?;
        Ok(report)
    }
}

/// Aggregate statistics over a batch of evaluations.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AggregateStats {
    /// Number of responses evaluated.
    pub response_count: usize,
    /// Mean engagement score across all responses.
    pub mean_engagement: f64,
    /// Fraction of responses that met expectations.
    pub meets_rate: f64,
    /// Mean word count across all responses.
    pub mean_word_count: f64,
    /// Responses that received at least one personalization line.
    pub personalized_count: usize,
    /// Per-lesson breakdowns, keyed by lesson id.
    pub per_lesson: BTreeMap<String, LessonStats>,
    /// How often each keyword matched, across all entries.
    pub keyword_hits: BTreeMap<String, usize>,
}

/// Aggregates for a single lesson within a batch.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LessonStats {
    /// Responses evaluated for this lesson.
    pub response_count: usize,
    /// Mean engagement score for this lesson.
    pub mean_engagement: f64,
    /// Fraction of this lesson's responses that met expectations.
    pub meets_rate: f64,
}

/// Compute aggregate statistics for a batch of entries.
pub fn compute_aggregate_stats(entries: &[BatchEntry]) -> AggregateStats {
    if entries.is_empty() {
        return AggregateStats::default();
    }

    let n = entries.len() as f64;
    let mean_engagement = entries
        .iter()
        .map(|e| e.result.engagement_score as f64)
        .sum::<f64>()
        / n;
    let meets_rate = entries
        .iter()
        .filter(|e| e.result.meets_expectations)
        .count() as f64
        / n;
    let mean_word_count = entries
        .iter()
        .map(|e| e.result.quality.word_count as f64)
        .sum::<f64>()
        / n;
    let personalized_count = entries.iter().filter(|e| e.result.personalized).count();

    let mut keyword_hits: BTreeMap<String, usize> = BTreeMap::new();
    for entry in entries {
        for keyword in &entry.result.matched_keywords {
            *keyword_hits.entry(keyword.clone()).or_default() += 1;
        }
    }

    let mut grouped: BTreeMap<&str, Vec<&BatchEntry>> = BTreeMap::new();
    for entry in entries {
        grouped
            .entry(entry.lesson_id.as_str())
            .or_default()
            .push(entry);
    }

    let per_lesson = grouped
        .into_iter()
        .map(|(lesson_id, group)| {
            let n = group.len() as f64;
            let stats = LessonStats {
                response_count: group.len(),
                mean_engagement: group
                    .iter()
                    .map(|e| e.result.engagement_score as f64)
                    .sum::<f64>()
                    / n,
                meets_rate: group
                    .iter()
                    .filter(|e| e.result.meets_expectations)
                    .count() as f64
                    / n,
            };
            (lesson_id.to_string(), stats)
        })
        .collect();

    AggregateStats {
        response_count: entries.len(),
        mean_engagement,
        meets_rate,
        mean_word_count,
        personalized_count,
        per_lesson,
        keyword_hits,
    }
}
