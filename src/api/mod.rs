//! Remote collaborators: the team directory and the document generation service.
//!
//! The workflow only talks to these through the [`FormApi`] trait, so it can
//! run against the real HTTP backend or an in-memory double in tests.

mod http;

pub use http::{HealthStatus, HttpFormApi};

use async_trait::async_trait;

use crate::core::{GeneratedDocument, Submission, Team};

/// Result type for API operations.
pub type ApiResult<T> = Result<T, ApiError>;

/// Error types for API operations.
#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    /// The request never got a response.
    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),

    /// The server could not be reached.
    #[error("Connection failed: {0}")]
    Connection(String),

    /// The server answered with a non-success status.
    #[error("Request rejected with status {status}{}", message_suffix(.message))]
    Rejected { status: u16, message: Option<String> },

    /// The server answered with a body we could not understand.
    #[error("Invalid response: {0}")]
    Decode(String),

    #[error("Invalid URL: {0}")]
    InvalidUrl(String),

    #[error("Operation not supported: {0}")]
    Unsupported(&'static str),
}

impl ApiError {
    /// Whether the failure happened before any response was received.
    pub fn is_transport(&self) -> bool {
        matches!(self, Self::Http(_) | Self::Connection(_))
    }

    /// Server-provided message, if the server sent one.
    pub fn server_message(&self) -> Option<&str> {
        match self {
            Self::Rejected { message: Some(message), .. } => Some(message),
            _ => None,
        }
    }
}

fn message_suffix(message: &Option<String>) -> String {
    message.as_deref().map(|m| format!(": {m}")).unwrap_or_default()
}

/// Operations the questionnaire needs from the backend.
#[async_trait]
pub trait FormApi: Send + Sync {
    /// Fetch the list of selectable teams.
    async fn fetch_teams(&self) -> ApiResult<Vec<Team>>;

    /// Submit answers and receive the generated document reference.
    async fn submit_answers(&self, submission: &Submission) -> ApiResult<GeneratedDocument>;

    /// Fetch the bytes of a generated document.
    async fn download_document(&self, _url: &str) -> ApiResult<Vec<u8>> {
        Err(ApiError::Unsupported("document download"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_classification() {
        assert!(ApiError::Connection("refused".into()).is_transport());
        assert!(!ApiError::Decode("bad json".into()).is_transport());

        let rejected = ApiError::Rejected { status: 404, message: Some("team not found".into()) };
        assert!(!rejected.is_transport());
        assert_eq!(rejected.server_message(), Some("team not found"));
        assert_eq!(rejected.to_string(), "Request rejected with status 404: team not found");

        let bare = ApiError::Rejected { status: 500, message: None };
        assert_eq!(bare.server_message(), None);
        assert_eq!(bare.to_string(), "Request rejected with status 500");
    }
}
