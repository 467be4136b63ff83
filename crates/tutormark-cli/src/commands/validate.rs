//! The `tutormark validate` command.

use std::path::PathBuf;

use anyhow::Result;

use tutormark_core::catalog;

pub fn execute(rules_path: PathBuf) -> Result<()> {
    let sets = if rules_path.is_dir() {
        catalog::load_rules_dir(&rules_path)?
    } else {
        catalog::parse_rules(&rules_path)?
    };

    println!(
        "Parsed {} rule set(s) from {}",
        sets.len(),
        rules_path.display()
    );

    let warnings = catalog::validate_rule_sets(&sets);
    for w in &warnings {
        let prefix = w
            .lesson_id
            .as_ref()
            .map(|id| format!("  [{id}]"))
            .unwrap_or_else(|| "  ".to_string());
        println!("{prefix} WARNING: {}", w.message);
    }

    if warnings.is_empty() {
        println!("All rule files valid.");
    } else {
        println!("\n{} warning(s) found.", warnings.len());
    }

    Ok(())
}
