//! The `tutormark run` command.

use std::path::{Path, PathBuf};
use std::sync::Arc;

use anyhow::{Context, Result};
use comfy_table::{Cell, Table};

use tutormark_core::engine::FeedbackEngine;
use tutormark_core::model::{EvaluationRequest, FeedbackResult};
use tutormark_core::report::BatchReport;
use tutormark_core::synonyms::SynonymTable;
use tutormark_core::traits::ProfileClient;
use tutormark_profile::{create_client, load_config_from};

#[allow(clippy::too_many_arguments)]
pub async fn execute(
    lesson: Option<String>,
    response: Option<String>,
    input: Option<PathBuf>,
    user: Option<String>,
    rules: Option<PathBuf>,
    output: PathBuf,
    format: String,
    parallelism: Option<usize>,
    config_path: Option<PathBuf>,
) -> Result<()> {
    // Validate inputs
    anyhow::ensure!(
        format == "text" || format == "json",
        "format must be 'text' or 'json'"
    );

    // Load config
    let config = load_config_from(config_path.as_deref())?;
    let parallelism = parallelism.unwrap_or(config.engine.parallelism);
    anyhow::ensure!(parallelism >= 1, "parallelism must be at least 1");

    // Build the catalog and engine
    let rules_dir = rules.or_else(|| config.engine.rules_dir.clone());
    let catalog = super::build_catalog(rules_dir.as_deref())?;
    let engine = FeedbackEngine::new(Arc::new(catalog), Arc::new(SynonymTable::builtin()));

    let client = config.profile.as_ref().map(create_client);
    if user.is_some() && client.is_none() {
        eprintln!(
            "Warning: --user given without a [profile] config; feedback will not be personalized."
        );
    }

    match (response, input) {
        (Some(text), None) => {
            let lesson = lesson.context("--lesson is required with --response")?;
            run_single(
                &engine,
                &text,
                &lesson,
                user.as_deref(),
                client.as_deref(),
                &format,
            )
            .await
        }
        (None, Some(path)) => {
            run_batch(
                &engine,
                &path,
                client.as_deref(),
                parallelism,
                &output,
                &format,
            )
            .await
        }
        (Some(_), Some(_)) => anyhow::bail!("--response and --input are mutually exclusive"),
        (None, None) => anyhow::bail!("one of --response or --input is required"),
    }
}

async fn run_single(
    engine: &FeedbackEngine,
    response_text: &str,
    lesson_id: &str,
    user: Option<&str>,
    client: Option<&dyn ProfileClient>,
    format: &str,
) -> Result<()> {
    let base = engine.evaluate(response_text, lesson_id);
    let result = match (user, client) {
        (Some(user_id), Some(client)) => engine.augment(base, user_id, lesson_id, client).await,
        _ => base,
    };

    if format == "json" {
        println!("{}", serde_json::to_string_pretty(&result)?);
    } else {
        print_result(&result);
    }

    Ok(())
}

async fn run_batch(
    engine: &FeedbackEngine,
    input: &Path,
    client: Option<&dyn ProfileClient>,
    parallelism: usize,
    output: &Path,
    format: &str,
) -> Result<()> {
    let requests = read_requests(input)?;
    anyhow::ensure!(
        !requests.is_empty(),
        "no requests found in {}",
        input.display()
    );

    eprintln!(
        "Evaluating {} response(s) (parallelism {parallelism})",
        requests.len()
    );

    let report = engine.evaluate_batch(&requests, client, parallelism).await;

    std::fs::create_dir_all(output)?;
    let timestamp = report.created_at.format("%Y-%m-%dT%H%M%S");
    let path = output.join(format!("report-{timestamp}.json"));
    report.save_json(&path)?;

    if format == "json" {
        println!("{}", serde_json::to_string_pretty(&report)?);
    } else {
        print_aggregate(&report);
    }
    eprintln!("Results saved to: {}", path.display());

    Ok(())
}

fn read_requests(path: &Path) -> Result<Vec<EvaluationRequest>> {
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("failed to read requests: {}", path.display()))?;

    let mut requests = Vec::new();
    for (number, line) in content.lines().enumerate() {
        let line = line.trim();
        if line.is_empty() {
            continue;
        }
        let request: EvaluationRequest = serde_json::from_str(line).with_context(|| {
            format!("invalid request on line {} of {}", number + 1, path.display())
        })?;
        requests.push(request);
    }

    Ok(requests)
}

fn print_result(result: &FeedbackResult) {
    if !result.criteria.is_empty() {
        let mut table = Table::new();
        table.set_header(vec!["Criterion", "Matched", "Threshold", "Met"]);
        for outcome in &result.criteria {
            table.add_row(vec![
                Cell::new(&outcome.name),
                Cell::new(outcome.matched.join(", ")),
                Cell::new(format!("{}/{}", outcome.matched.len(), outcome.threshold)),
                Cell::new(if outcome.satisfied { "yes" } else { "no" }),
            ]);
        }
        println!("{table}\n");
    }

    for line in &result.feedback_lines {
        println!("{line}");
    }

    println!();
    println!("Engagement score: {}/100", result.engagement_score);
    println!(
        "Meets expectations: {}",
        if result.meets_expectations { "yes" } else { "no" }
    );
    if result.personalized {
        println!("Personalized: yes");
    }
}

fn print_aggregate(report: &BatchReport) {
    let stats = &report.stats;

    let mut table = Table::new();
    table.set_header(vec!["Lesson", "Responses", "Mean Score", "Meets %"]);
    for (lesson, lesson_stats) in &stats.per_lesson {
        table.add_row(vec![
            Cell::new(lesson),
            Cell::new(lesson_stats.response_count),
            Cell::new(format!("{:.1}", lesson_stats.mean_engagement)),
            Cell::new(format!("{:.1}%", lesson_stats.meets_rate * 100.0)),
        ]);
    }
    println!("\n{table}");

    println!(
        "\n{} response(s), mean engagement {:.1}, {:.1}% meet expectations, {} personalized ({}ms)",
        stats.response_count,
        stats.mean_engagement,
        stats.meets_rate * 100.0,
        stats.personalized_count,
        report.duration_ms,
    );
}
