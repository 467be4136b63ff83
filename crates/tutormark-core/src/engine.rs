//! Central feedback engine.
//!
//! Evaluates learner responses against lesson rule sets, appends
//! profile-driven personalization, and runs batches with bounded
//! parallelism.

use std::collections::BTreeSet;
use std::sync::Arc;
use std::time::Instant;

use futures::stream::{FuturesUnordered, StreamExt};
use tokio::sync::Semaphore;
use uuid::Uuid;

use crate::catalog::RuleCatalog;
use crate::error::ProfileError;
use crate::matcher::{self, NormalizedResponse};
use crate::model::{CriterionOutcome, EvaluationRequest, FeedbackResult, MatchSet};
use crate::quality;
use crate::report::{compute_aggregate_stats, BatchEntry, BatchReport};
use crate::synonyms::SynonymTable;
use crate::traits::{ProfileClient, TemplateKey};

/// Emitted alone when no rule set can be resolved for the lesson.
const GENERIC_ACKNOWLEDGMENT: &str = "Thank you for your response!";

/// Appended when a response is long enough to praise.
const EXCELLENT_DETAIL: &str = "✨ Excellent detail in your response!";

/// Appended when a response is too short.
const MORE_DETAIL: &str = "💡 Consider providing more details in your response.";

/// Word counts at or above this get the excellent-detail remark.
const DETAIL_PRAISE_WORDS: usize = 50;

/// Word counts below this get the more-detail remark.
const DETAIL_NUDGE_WORDS: usize = 20;

/// Progress templates only render for learners past this many responses.
const PROGRESS_MIN_RESPONSES: u32 = 5;

/// The central feedback engine.
///
/// Holds the rule catalog and synonym table behind `Arc` so clones share
/// the same read-only data.
#[derive(Clone)]
pub struct FeedbackEngine {
    catalog: Arc<RuleCatalog>,
    synonyms: Arc<SynonymTable>,
}

impl FeedbackEngine {
    pub fn new(catalog: Arc<RuleCatalog>, synonyms: Arc<SynonymTable>) -> Self {
        Self { catalog, synonyms }
    }

    /// Engine over the builtin rule catalog and synonym table.
    pub fn builtin() -> Self {
        Self::new(
            Arc::new(RuleCatalog::builtin()),
            Arc::new(SynonymTable::builtin()),
        )
    }

    /// Evaluate a response against the rules for a lesson.
    ///
    /// An unresolvable lesson degrades to a single acknowledgment line
    /// rather than an error; the learner always gets feedback.
    pub fn evaluate(&self, response_text: &str, lesson_id: &str) -> FeedbackResult {
        let quality = quality::analyze(response_text);

        let Some(rule_set) = self.catalog.resolve(lesson_id) else {
            tracing::warn!("no rules for lesson '{lesson_id}', using generic feedback");
            let engagement_score = quality::engagement_score(&quality, true);
            return FeedbackResult {
                feedback_lines: vec![GENERIC_ACKNOWLEDGMENT.to_string()],
                meets_expectations: true,
                quality,
                matched_keywords: MatchSet::new(),
                criteria: Vec::new(),
                engagement_score,
                personalized: false,
            };
        };

        let response = NormalizedResponse::new(response_text);
        let mut matched_keywords = MatchSet::new();
        for keyword in rule_set.keywords() {
            if matcher::keyword_matches(&response, keyword, &self.synonyms) {
                matched_keywords.insert(keyword.to_string());
            }
        }

        let mut feedback_lines = Vec::new();
        let mut criteria = Vec::with_capacity(rule_set.criteria.len());
        let mut meets_expectations = true;

        for criterion in &rule_set.criteria {
            let matched: Vec<String> = criterion
                .keywords
                .iter()
                .filter(|k| matched_keywords.contains(k.as_str()))
                .cloned()
                .collect::<BTreeSet<String>>()
                .into_iter()
                .collect();
            let threshold = criterion.threshold();
            let satisfied = matched.len() >= threshold;

            if satisfied {
                feedback_lines.push(criterion.good_feedback.clone());
                if let Some(extra) = &criterion.extra_good_feedback {
                    feedback_lines.push(extra.clone());
                }
            } else {
                meets_expectations = false;
                feedback_lines.push(criterion.bad_feedback.clone());
                if let Some(tip) = &criterion.improvement_tip {
                    feedback_lines.push(tip.clone());
                }
            }

            criteria.push(CriterionOutcome {
                name: criterion.name.clone(),
                matched,
                threshold,
                satisfied,
            });
        }

        if quality.word_count >= DETAIL_PRAISE_WORDS {
            feedback_lines.push(EXCELLENT_DETAIL.to_string());
        } else if quality.word_count < DETAIL_NUDGE_WORDS {
            feedback_lines.push(MORE_DETAIL.to_string());
        }

        let engagement_score = quality::engagement_score(&quality, meets_expectations);

        FeedbackResult {
            feedback_lines,
            meets_expectations,
            quality,
            matched_keywords,
            criteria,
            engagement_score,
            personalized: false,
        }
    }

    /// Append profile-driven personalization lines to a base result.
    ///
    /// Fail-open: any profile fetch failure leaves the base result as is.
    /// An unreachable profile service never blocks feedback.
    pub async fn augment(
        &self,
        base: FeedbackResult,
        user_id: &str,
        lesson_id: &str,
        client: &dyn ProfileClient,
    ) -> FeedbackResult {
        let profile = match client.personalization(user_id).await {
            Ok(profile) => profile,
            Err(e) => {
                log_profile_miss(&e, client.name(), "personalization");
                return base;
            }
        };

        tracing::debug!(
            "personalizing {lesson_id} feedback for {user_id} ({} prior responses)",
            profile.response_count
        );

        let mut result = base;
        let base_lines = result.feedback_lines.len();

        if let Some(strength) = profile.top_strengths.first() {
            match client.template(TemplateKey::Strength).await {
                Ok(tpl) => result
                    .feedback_lines
                    .push(tpl.render(TemplateKey::Strength.placeholder(), strength)),
                Err(e) => log_profile_miss(&e, client.name(), TemplateKey::Strength.as_str()),
            }
        }

        if let Some(weakness) = profile.top_weaknesses.first() {
            match client.template(TemplateKey::Improvement).await {
                Ok(tpl) => result
                    .feedback_lines
                    .push(tpl.render(TemplateKey::Improvement.placeholder(), weakness)),
                Err(e) => log_profile_miss(&e, client.name(), TemplateKey::Improvement.as_str()),
            }
        }

        if profile.response_count > PROGRESS_MIN_RESPONSES {
            if let Some(skill) = profile.top_strengths.first() {
                match client.template(TemplateKey::Progress).await {
                    Ok(tpl) => result
                        .feedback_lines
                        .push(tpl.render(TemplateKey::Progress.placeholder(), skill)),
                    Err(e) => log_profile_miss(&e, client.name(), TemplateKey::Progress.as_str()),
                }
            }
        }

        result.personalized = result.feedback_lines.len() > base_lines;
        result
    }

    /// Evaluate a batch of requests with bounded parallelism.
    ///
    /// Personalization runs only for requests carrying a user id and only
    /// when a profile client is supplied. Output order matches input order.
    pub async fn evaluate_batch(
        &self,
        requests: &[EvaluationRequest],
        client: Option<&dyn ProfileClient>,
        parallelism: usize,
    ) -> BatchReport {
        let start = Instant::now();
        let semaphore = Arc::new(Semaphore::new(parallelism.max(1)));

        let mut futures = FuturesUnordered::new();
        for (index, request) in requests.iter().enumerate() {
            let semaphore = Arc::clone(&semaphore);
            futures.push(async move {
                // The semaphore is never closed, so a failed acquire only
                // loses throttling.
                let _permit = semaphore.acquire_owned().await.ok();

                let base = self.evaluate(&request.response, &request.lesson_id);
                let result = match (client, request.user_id.as_deref()) {
                    (Some(client), Some(user_id)) => {
                        self.augment(base, user_id, &request.lesson_id, client).await
                    }
                    _ => base,
                };

                let entry = BatchEntry {
                    lesson_id: request.lesson_id.clone(),
                    user_id: request.user_id.clone(),
                    result,
                };
                (index, entry)
            });
        }

        let mut slots: Vec<Option<BatchEntry>> = Vec::with_capacity(requests.len());
        slots.resize_with(requests.len(), || None);
        while let Some((index, entry)) = futures.next().await {
            slots[index] = Some(entry);
        }
        let entries: Vec<BatchEntry> = slots.into_iter().flatten().collect();

        let stats = compute_aggregate_stats(&entries);

        BatchReport {
            id: Uuid::new_v4(),
            created_at: chrono::Utc::now(),
            entries,
            stats,
            duration_ms: start.elapsed().as_millis() as u64,
        }
    }
}

/// Log a profile fetch failure at a level matching its cause.
fn log_profile_miss(error: &anyhow::Error, backend: &str, what: &str) {
    match error.downcast_ref::<ProfileError>() {
        Some(e) if e.is_absence() => {
            tracing::debug!("{what} not available from {backend}: {e}");
        }
        _ => {
            tracing::warn!("{what} fetch failed from {backend}: {error:#}");
        }
    }
}
