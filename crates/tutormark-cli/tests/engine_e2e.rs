//! End-to-end tests over the builtin catalog and the mock profile client.
//!
//! These tests verify that evaluation, personalization, and batch reporting
//! work together the way the CLI wires them up.

use tutormark_core::engine::FeedbackEngine;
use tutormark_core::model::EvaluationRequest;
use tutormark_core::report::BatchReport;
use tutormark_core::traits::ProfileData;
use tutormark_profile::mock::MockProfileClient;

const INTERVIEW_SUMMARY: &str = "We interviewed five users about checkout problems. Their \
    frustration and pain points were obvious, and every customer described a need we had \
    missed. I documented each insight, recorded quotes, and noted recurring observations in \
    our research log.";

fn engine() -> FeedbackEngine {
    FeedbackEngine::builtin()
}

fn profile() -> ProfileData {
    ProfileData {
        top_strengths: vec!["user research".into()],
        top_weaknesses: vec!["prioritization".into()],
        response_count: 9,
    }
}

fn request(lesson_id: &str, response: &str, user_id: Option<&str>) -> EvaluationRequest {
    EvaluationRequest {
        lesson_id: lesson_id.into(),
        response: response.into(),
        user_id: user_id.map(String::from),
    }
}

// --- Evaluation against the builtin catalog ---

#[test]
fn thorough_response_meets_expectations() {
    let result = engine().evaluate(INTERVIEW_SUMMARY, "lesson_2_step_1");

    assert!(result.meets_expectations);
    assert!(result.criteria.iter().all(|c| c.satisfied));
    assert!(result.engagement_score >= 70);
    assert!(result.matched_keywords.contains("interview"));
    assert!(result.matched_keywords.contains("pain point"));
}

#[test]
fn every_builtin_lesson_produces_feedback() {
    let engine = engine();
    let catalog = tutormark_core::catalog::RuleCatalog::builtin();

    for rule_set in catalog.rule_sets() {
        let result = engine.evaluate("A short answer.", &rule_set.lesson_id);
        assert!(
            !result.feedback_lines.is_empty(),
            "no feedback for {}",
            rule_set.lesson_id
        );
        assert!(result.engagement_score <= 100);
    }
}

// --- Personalization through the mock client ---

#[tokio::test]
async fn personalization_appends_profile_lines() {
    let engine = engine();
    let client = MockProfileClient::new(profile());

    let base = engine.evaluate(INTERVIEW_SUMMARY, "lesson_2_step_1");
    let result = engine
        .augment(base, "learner-42", "lesson_2_step_1", &client)
        .await;

    assert!(result.personalized);
    let rendered = result.feedback_lines.join("\n");
    assert!(rendered.contains("strength in user research"));
    assert!(rendered.contains("struggle with prioritization"));
    assert!(rendered.contains("progress with user research"));
    assert_eq!(client.last_user_id().as_deref(), Some("learner-42"));
}

#[tokio::test]
async fn profile_outage_keeps_base_feedback() {
    let engine = engine();
    let client = MockProfileClient::unavailable();

    let base = engine.evaluate(INTERVIEW_SUMMARY, "lesson_2_step_1");
    let result = engine
        .augment(base.clone(), "learner-42", "lesson_2_step_1", &client)
        .await;

    assert_eq!(result, base);
    assert_eq!(client.call_count(), 1);
}

#[tokio::test]
async fn missing_templates_leave_feedback_untouched() {
    let engine = engine();
    let client = MockProfileClient::new(profile()).without_templates();

    let base = engine.evaluate(INTERVIEW_SUMMARY, "lesson_2_step_1");
    let result = engine
        .augment(base.clone(), "learner-42", "lesson_2_step_1", &client)
        .await;

    assert_eq!(result, base);
    assert!(!result.personalized);
}

// --- Batch evaluation and reporting ---

#[tokio::test]
async fn batch_report_roundtrips_through_json() {
    let engine = engine();
    let client = MockProfileClient::new(profile());
    let requests = vec![
        request("lesson_2_step_1", INTERVIEW_SUMMARY, Some("learner-42")),
        request("lesson_3_step_2", "Our canvas covers customer segments.", None),
        request("lesson_99", "Anything at all.", None),
    ];

    let report = engine.evaluate_batch(&requests, Some(&client), 2).await;

    assert_eq!(report.entries.len(), 3);
    assert_eq!(report.stats.response_count, 3);
    assert_eq!(report.stats.personalized_count, 1);
    assert!(report.entries[0].result.personalized);
    assert!(report.entries[2].result.meets_expectations);

    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("report.json");
    report.save_json(&path).unwrap();
    let loaded = BatchReport::load_json(&path).unwrap();

    assert_eq!(loaded.id, report.id);
    assert_eq!(loaded.entries.len(), report.entries.len());
    assert_eq!(loaded.stats.personalized_count, 1);
}
