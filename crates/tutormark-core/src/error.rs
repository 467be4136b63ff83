//! Profile service error types.
//!
//! These error types represent failures when talking to a learner profile
//! service. Defined in `tutormark-core` so the feedback engine can downcast
//! and classify errors for its fail-open decisions without string matching.

use thiserror::Error;

/// Errors that can occur when talking to a profile backend.
#[derive(Debug, Error)]
pub enum ProfileError {
    /// Authentication failed (invalid credential).
    #[error("authentication failed: {0}")]
    AuthenticationFailed(String),

    /// No profile exists for the requested learner.
    #[error("no profile for user: {0}")]
    ProfileNotFound(String),

    /// The requested template is not provisioned on the service.
    #[error("template not found: {0}")]
    TemplateNotFound(String),

    /// The service returned an error response.
    #[error("API error (HTTP {status}): {message}")]
    ApiError { status: u16, message: String },

    /// The request timed out.
    #[error("request timed out after {0}s")]
    Timeout(u64),

    /// A network error occurred.
    #[error("network error: {0}")]
    NetworkError(String),

    /// The response body did not match the documented shape.
    #[error("malformed payload: {0}")]
    MalformedPayload(String),
}

impl ProfileError {
    /// Returns `true` when the error means the data simply does not exist
    /// (a new learner, an unprovisioned template) rather than a failure.
    pub fn is_absence(&self) -> bool {
        matches!(
            self,
            ProfileError::ProfileNotFound(_) | ProfileError::TemplateNotFound(_)
        )
    }
}
