//! Mock profile client for testing.

use std::collections::HashMap;
use std::sync::atomic::{AtomicU32, Ordering};
use std::sync::Mutex;

use async_trait::async_trait;

use tutormark_core::error::ProfileError;
use tutormark_core::traits::{FeedbackTemplate, ProfileClient, ProfileData, TemplateKey};

/// A mock profile client for testing personalization without a live service.
///
/// Returns a canned profile for every user and a configurable template set.
pub struct MockProfileClient {
    /// Profile returned for every user.
    profile: ProfileData,
    /// Templates keyed by template identifier.
    templates: HashMap<String, String>,
    /// When set, every call fails as if the service were down.
    unavailable: bool,
    /// Number of personalization calls made.
    call_count: AtomicU32,
    /// Last user id requested.
    last_user_id: Mutex<Option<String>>,
}

impl MockProfileClient {
    /// Create a mock serving the given profile and the stock templates.
    pub fn new(profile: ProfileData) -> Self {
        let mut templates = HashMap::new();
        templates.insert(
            TemplateKey::Strength.as_str().to_string(),
            "Based on your responses, you consistently show strength in {strength_area}."
                .to_string(),
        );
        templates.insert(
            TemplateKey::Improvement.as_str().to_string(),
            "I notice you sometimes struggle with {weakness_area}. Let's focus on this in upcoming lessons."
                .to_string(),
        );
        templates.insert(
            TemplateKey::Progress.as_str().to_string(),
            "You've made significant progress with {skill_area} since your early lessons."
                .to_string(),
        );

        Self {
            profile,
            templates,
            unavailable: false,
            call_count: AtomicU32::new(0),
            last_user_id: Mutex::new(None),
        }
    }

    /// Create a mock whose every call fails with a network error.
    pub fn unavailable() -> Self {
        Self {
            unavailable: true,
            ..Self::new(ProfileData::default())
        }
    }

    /// Replace one template.
    pub fn with_template(mut self, key: TemplateKey, template: &str) -> Self {
        self.templates
            .insert(key.as_str().to_string(), template.to_string());
        self
    }

    /// Drop all templates, so every template fetch reports an absence.
    pub fn without_templates(mut self) -> Self {
        self.templates.clear();
        self
    }

    /// Number of personalization calls made to this client.
    pub fn call_count(&self) -> u32 {
        self.call_count.load(Ordering::Relaxed)
    }

    /// Last user id passed to `personalization`.
    pub fn last_user_id(&self) -> Option<String> {
        self.last_user_id.lock().unwrap().clone()
    }
}

#[async_trait]
impl ProfileClient for MockProfileClient {
    fn name(&self) -> &str {
        "mock"
    }

    async fn personalization(&self, user_id: &str) -> anyhow::Result<ProfileData> {
        self.call_count.fetch_add(1, Ordering::Relaxed);
        *self.last_user_id.lock().unwrap() = Some(user_id.to_string());

        if self.unavailable {
            return Err(ProfileError::NetworkError("mock profile service unavailable".into()).into());
        }
        Ok(self.profile.clone())
    }

    async fn template(&self, key: TemplateKey) -> anyhow::Result<FeedbackTemplate> {
        if self.unavailable {
            return Err(ProfileError::NetworkError("mock profile service unavailable".into()).into());
        }
        match self.templates.get(key.as_str()) {
            Some(template) => Ok(FeedbackTemplate {
                template: template.clone(),
            }),
            None => Err(ProfileError::TemplateNotFound(key.as_str().to_string()).into()),
        }
    }
}
