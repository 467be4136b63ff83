//! HTTP client for the learner profile service.

use async_trait::async_trait;
use serde::Deserialize;
use tracing::instrument;

use tutormark_core::error::ProfileError;
use tutormark_core::traits::{FeedbackTemplate, ProfileClient, ProfileData, TemplateKey};

const DEFAULT_TIMEOUT_SECS: u64 = 10;

/// Client for the learner profile HTTP API.
pub struct HttpProfileClient {
    base_url: String,
    token: String,
    timeout_secs: u64,
    client: reqwest::Client,
}

impl HttpProfileClient {
    pub fn new(base_url: &str, token: &str) -> Self {
        Self::with_timeout(base_url, token, DEFAULT_TIMEOUT_SECS)
    }

    pub fn with_timeout(base_url: &str, token: &str, timeout_secs: u64) -> Self {
        let client = reqwest::Client::builder()
            .timeout(std::time::Duration::from_secs(timeout_secs))
            .build()
            .expect("failed to build HTTP client");

        Self {
            base_url: base_url.trim_end_matches('/').to_string(),
            token: token.to_string(),
            timeout_secs,
            client,
        }
    }

    async fn get(&self, url: String) -> Result<reqwest::Response, ProfileError> {
        self.client
            .get(url)
            .header("Authorization", format!("Bearer {}", self.token))
            .send()
            .await
            .map_err(|e| {
                if e.is_timeout() {
                    ProfileError::Timeout(self.timeout_secs)
                } else {
                    ProfileError::NetworkError(e.to_string())
                }
            })
    }
}

#[derive(Deserialize)]
struct PersonalizationEnvelope {
    #[serde(default)]
    status: String,
    #[serde(default)]
    data: Option<ProfileData>,
}

#[derive(Deserialize)]
struct TemplatePayload {
    template: String,
}

#[async_trait]
impl ProfileClient for HttpProfileClient {
    fn name(&self) -> &str {
        "profile-api"
    }

    #[instrument(skip(self))]
    async fn personalization(&self, user_id: &str) -> anyhow::Result<ProfileData> {
        let response = self
            .get(format!("{}/feedback/personalization/{user_id}", self.base_url))
            .await?;

        let status = response.status().as_u16();
        if status == 401 {
            let body = response.text().await.unwrap_or_default();
            return Err(ProfileError::AuthenticationFailed(body).into());
        }
        if status == 404 {
            return Err(ProfileError::ProfileNotFound(user_id.to_string()).into());
        }
        if status >= 400 {
            let body = response.text().await.unwrap_or_default();
            return Err(ProfileError::ApiError {
                status,
                message: body,
            }
            .into());
        }

        let envelope: PersonalizationEnvelope = response.json().await.map_err(|e| {
            ProfileError::MalformedPayload(format!("failed to parse response: {e}"))
        })?;

        if envelope.status != "success" {
            return Err(ProfileError::MalformedPayload(format!(
                "unexpected envelope status '{}'",
                envelope.status
            ))
            .into());
        }
        envelope
            .data
            .ok_or_else(|| ProfileError::MalformedPayload("missing data field".to_string()).into())
    }

    #[instrument(skip(self))]
    async fn template(&self, key: TemplateKey) -> anyhow::Result<FeedbackTemplate> {
        let response = self
            .get(format!("{}/feedback/templates/{key}", self.base_url))
            .await?;

        let status = response.status().as_u16();
        if status == 401 {
            let body = response.text().await.unwrap_or_default();
            return Err(ProfileError::AuthenticationFailed(body).into());
        }
        if status == 404 {
            return Err(ProfileError::TemplateNotFound(key.as_str().to_string()).into());
        }
        if status >= 400 {
            let body = response.text().await.unwrap_or_default();
            return Err(ProfileError::ApiError {
                status,
                message: body,
            }
            .into());
        }

        let payload: TemplatePayload = response.json().await.map_err(|e| {
            ProfileError::MalformedPayload(format!("failed to parse response: {e}"))
        })?;

        Ok(FeedbackTemplate {
            template: payload.template,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use wiremock::matchers::{header, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    #[tokio::test]
    async fn fetches_personalization_data() {
        let server = MockServer::start().await;

        let response_body = serde_json::json!({
            "status": "success",
            "data": {
                "top_strengths": ["empathy", "clarity"],
                "top_weaknesses": ["metrics"],
                "response_count": 12
            }
        });

        Mock::given(method("GET"))
            .and(path("/feedback/personalization/user-7"))
            .and(header("Authorization", "Bearer test-token"))
            .respond_with(ResponseTemplate::new(200).set_body_json(&response_body))
            .mount(&server)
            .await;

        let client = HttpProfileClient::new(&server.uri(), "test-token");
        let profile = client.personalization("user-7").await.unwrap();

        assert_eq!(profile.top_strengths, ["empathy", "clarity"]);
        assert_eq!(profile.top_weaknesses, ["metrics"]);
        assert_eq!(profile.response_count, 12);
    }

    #[tokio::test]
    async fn rejects_bad_credentials() {
        let server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/feedback/personalization/user-7"))
            .respond_with(ResponseTemplate::new(401).set_body_string("bad token"))
            .mount(&server)
            .await;

        let client = HttpProfileClient::new(&server.uri(), "wrong-token");
        let err = client.personalization("user-7").await.unwrap_err();

        assert!(matches!(
            err.downcast_ref::<ProfileError>(),
            Some(ProfileError::AuthenticationFailed(_))
        ));
    }

    #[tokio::test]
    async fn missing_profile_is_an_absence() {
        let server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/feedback/personalization/nobody"))
            .respond_with(ResponseTemplate::new(404))
            .mount(&server)
            .await;

        let client = HttpProfileClient::new(&server.uri(), "test-token");
        let err = client.personalization("nobody").await.unwrap_err();

        let profile_err = err.downcast_ref::<ProfileError>().unwrap();
        assert!(matches!(profile_err, ProfileError::ProfileNotFound(_)));
        assert!(profile_err.is_absence());
    }

    #[tokio::test]
    async fn non_success_envelope_is_malformed() {
        let server = MockServer::start().await;

        let response_body = serde_json::json!({
            "status": "error",
            "data": null
        });

        Mock::given(method("GET"))
            .and(path("/feedback/personalization/user-7"))
            .respond_with(ResponseTemplate::new(200).set_body_json(&response_body))
            .mount(&server)
            .await;

        let client = HttpProfileClient::new(&server.uri(), "test-token");
        let err = client.personalization("user-7").await.unwrap_err();

        assert!(matches!(
            err.downcast_ref::<ProfileError>(),
            Some(ProfileError::MalformedPayload(_))
        ));
    }

    #[tokio::test]
    async fn garbage_payload_is_malformed() {
        let server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/feedback/personalization/user-7"))
            .respond_with(ResponseTemplate::new(200).set_body_string("not json"))
            .mount(&server)
            .await;

        let client = HttpProfileClient::new(&server.uri(), "test-token");
        let err = client.personalization("user-7").await.unwrap_err();

        assert!(matches!(
            err.downcast_ref::<ProfileError>(),
            Some(ProfileError::MalformedPayload(_))
        ));
    }

    #[tokio::test]
    async fn fetches_template_by_key() {
        let server = MockServer::start().await;

        let response_body = serde_json::json!({
            "template": "Keep building on your {strength_area} skills!"
        });

        Mock::given(method("GET"))
            .and(path("/feedback/templates/strength_template"))
            .and(header("Authorization", "Bearer test-token"))
            .respond_with(ResponseTemplate::new(200).set_body_json(&response_body))
            .mount(&server)
            .await;

        let client = HttpProfileClient::new(&server.uri(), "test-token");
        let template = client.template(TemplateKey::Strength).await.unwrap();

        assert_eq!(
            template.render(TemplateKey::Strength.placeholder(), "empathy"),
            "Keep building on your empathy skills!"
        );
    }

    #[tokio::test]
    async fn missing_template_is_an_absence() {
        let server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/feedback/templates/progress_template"))
            .respond_with(ResponseTemplate::new(404))
            .mount(&server)
            .await;

        let client = HttpProfileClient::new(&server.uri(), "test-token");
        let err = client.template(TemplateKey::Progress).await.unwrap_err();

        let profile_err = err.downcast_ref::<ProfileError>().unwrap();
        assert!(matches!(profile_err, ProfileError::TemplateNotFound(_)));
        assert!(profile_err.is_absence());
    }

    #[tokio::test]
    async fn server_errors_surface_status() {
        let server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/feedback/personalization/user-7"))
            .respond_with(ResponseTemplate::new(500).set_body_string("internal error"))
            .mount(&server)
            .await;

        let client = HttpProfileClient::new(&server.uri(), "test-token");
        let err = client.personalization("user-7").await.unwrap_err();

        assert!(matches!(
            err.downcast_ref::<ProfileError>(),
            Some(ProfileError::ApiError { status: 500, .. })
        ));
    }
}
