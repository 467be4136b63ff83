//! Subcommand implementations.

use std::path::Path;

use anyhow::Result;

use tutormark_core::catalog::{self, RuleCatalog};

pub mod init;
pub mod lessons;
pub mod run;
pub mod validate;

/// The builtin catalog, with rule files from `rules_dir` layered on top.
fn build_catalog(rules_dir: Option<&Path>) -> Result<RuleCatalog> {
    match rules_dir {
        Some(dir) => {
            let mut sets = catalog::builtin_rule_sets();
            sets.extend(catalog::load_rules_dir(dir)?);
            Ok(RuleCatalog::from_sets(sets))
        }
        None => Ok(RuleCatalog::builtin()),
    }
}
