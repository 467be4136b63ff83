//! The `tutormark lessons` command.

use std::path::PathBuf;

use anyhow::Result;
use comfy_table::{Cell, Table};

pub fn execute(rules: Option<PathBuf>) -> Result<()> {
    let catalog = super::build_catalog(rules.as_deref())?;

    let mut table = Table::new();
    table.set_header(vec!["Lesson", "Criteria", "Keywords", "Thresholds"]);
    for rule_set in catalog.rule_sets() {
        let names: Vec<&str> = rule_set.criteria.iter().map(|c| c.name.as_str()).collect();
        let keyword_count: usize = rule_set.criteria.iter().map(|c| c.keywords.len()).sum();
        let thresholds: Vec<String> = rule_set
            .criteria
            .iter()
            .map(|c| c.threshold().to_string())
            .collect();
        table.add_row(vec![
            Cell::new(&rule_set.lesson_id),
            Cell::new(names.join(", ")),
            Cell::new(keyword_count),
            Cell::new(thresholds.join(", ")),
        ]);
    }
    println!("{table}");

    println!("\n{} lesson step(s) in the catalog.", catalog.len());

    Ok(())
}
