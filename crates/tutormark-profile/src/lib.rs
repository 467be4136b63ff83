//! tutormark-profile — Learner profile service integrations.
//!
//! Implements the `ProfileClient` trait over the profile HTTP API, plus a
//! mock client for tests and configuration loading for the CLI.

pub mod config;
pub mod http;
pub mod mock;

pub use config::{
    create_client, load_config, load_config_from, EngineSettings, ProfileSettings, TutormarkConfig,
};
