//! Configuration loading and the profile client factory.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

use tutormark_core::traits::ProfileClient;

use crate::http::HttpProfileClient;

/// Connection settings for the learner profile service.
///
/// The `Debug` impl masks the token.
#[derive(Clone, Serialize, Deserialize)]
pub struct ProfileSettings {
    pub base_url: String,
    pub token: String,
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
}

impl std::fmt::Debug for ProfileSettings {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ProfileSettings")
            .field("base_url", &self.base_url)
            .field("token", &"***")
            .field("timeout_secs", &self.timeout_secs)
            .finish()
    }
}

fn default_timeout_secs() -> u64 {
    10
}

/// Feedback engine settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EngineSettings {
    /// Directory of rule files loaded over the builtin catalog.
    #[serde(default)]
    pub rules_dir: Option<PathBuf>,
    /// Max concurrent evaluations in batch mode.
    #[serde(default = "default_parallelism")]
    pub parallelism: usize,
}

fn default_parallelism() -> usize {
    4
}

impl Default for EngineSettings {
    fn default() -> Self {
        Self {
            rules_dir: None,
            parallelism: default_parallelism(),
        }
    }
}

/// Top-level tutormark configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TutormarkConfig {
    /// Profile service connection; personalization is off when absent.
    #[serde(default)]
    pub profile: Option<ProfileSettings>,
    /// Engine settings.
    #[serde(default)]
    pub engine: EngineSettings,
}

impl Default for TutormarkConfig {
    fn default() -> Self {
        Self {
            profile: None,
            engine: EngineSettings::default(),
        }
    }
}

/// Resolve environment variable references like `${VAR_NAME}` in a string.
fn resolve_env_vars(s: &str) -> String {
    let mut result = s.to_string();
    while let Some(start) = result.find("${") {
        if let Some(end) = result[start..].find('}') {
            let var_name = &result[start + 2..start + end];
            let value = std::env::var(var_name).unwrap_or_default();
            result = format!(
                "{}{}{}",
                &result[..start],
                value,
                &result[start + end + 1..]
            );
        } else {
            break;
        }
    }
    result
}

/// Load configuration from well-known paths.
///
/// Search order:
/// 1. `tutormark.toml` in the current directory
/// 2. `~/.config/tutormark/config.toml`
///
/// Environment variable overrides: `TUTORMARK_PROFILE_URL`, `TUTORMARK_PROFILE_TOKEN`.
pub fn load_config() -> Result<TutormarkConfig> {
    load_config_from(None)
}

/// Load config from an explicit path, or search the default locations.
pub fn load_config_from(path: Option<&Path>) -> Result<TutormarkConfig> {
    let config_path = if let Some(p) = path {
        if p.exists() {
            Some(p.to_path_buf())
        } else {
            anyhow::bail!("config file not found: {}", p.display());
        }
    } else {
        let local = PathBuf::from("tutormark.toml");
        if local.exists() {
            Some(local)
        } else if let Some(home) = dirs_path() {
            let global = home.join("config.toml");
            if global.exists() {
                Some(global)
            } else {
                None
            }
        } else {
            None
        }
    };

    let mut config = match config_path {
        Some(path) => {
            let content = std::fs::read_to_string(&path)
                .with_context(|| format!("failed to read config: {}", path.display()))?;
            toml::from_str::<TutormarkConfig>(&content)
                .with_context(|| format!("failed to parse config: {}", path.display()))?
        }
        None => TutormarkConfig::default(),
    };

    // Apply env var overrides
    if let Ok(url) = std::env::var("TUTORMARK_PROFILE_URL") {
        config.profile.get_or_insert_with(empty_profile).base_url = url;
    }
    if let Ok(token) = std::env::var("TUTORMARK_PROFILE_TOKEN") {
        config.profile.get_or_insert_with(empty_profile).token = token;
    }

    // Resolve env vars in the profile section
    if let Some(profile) = &mut config.profile {
        profile.base_url = resolve_env_vars(&profile.base_url);
        profile.token = resolve_env_vars(&profile.token);
    }

    Ok(config)
}

fn empty_profile() -> ProfileSettings {
    ProfileSettings {
        base_url: String::new(),
        token: String::new(),
        timeout_secs: default_timeout_secs(),
    }
}

fn dirs_path() -> Option<PathBuf> {
    std::env::var("HOME")
        .ok()
        .map(|h| PathBuf::from(h).join(".config").join("tutormark"))
}

/// Create a profile client from its settings.
pub fn create_client(settings: &ProfileSettings) -> Box<dyn ProfileClient> {
    Box::new(HttpProfileClient::with_timeout(
        &settings.base_url,
        &settings.token,
        settings.timeout_secs,
    ))
}
