//! HTTP implementation of [`FormApi`] backed by reqwest.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::{Client, Response, Url};
use serde::Deserialize;
use tracing::{debug, warn};

use super::{ApiError, ApiResult, FormApi};
use crate::core::{GeneratedDocument, Submission, Team};

/// Client for the compliance procedure backend.
#[derive(Debug, Clone)]
pub struct HttpFormApi {
    client: Client,
    base_url: Url,
}

/// Body of a failed request.
#[derive(Debug, Default, Deserialize)]
struct ErrorBody {
    #[serde(default)]
    message: Option<String>,
}

/// Response of the health endpoint.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct HealthStatus {
    pub status: String,
    #[serde(default)]
    pub service: Option<String>,
}

impl HttpFormApi {
    /// Create a client for the backend at `base_url`.
    pub fn new(base_url: &str, timeout: Duration) -> ApiResult<Self> {
        let mut base_url = Url::parse(base_url.trim())
            .map_err(|e| ApiError::InvalidUrl(format!("{base_url}: {e}")))?;
        if base_url.cannot_be_a_base() {
            return Err(ApiError::InvalidUrl(base_url.to_string()));
        }
        // Relative links resolve under the last path segment, not beside it
        if !base_url.path().ends_with('/') {
            let path = format!("{}/", base_url.path());
            base_url.set_path(&path);
        }

        let client = Client::builder().timeout(timeout).build()?;
        Ok(Self { client, base_url })
    }

    /// The backend base URL.
    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    /// Build an endpoint URL under the base URL.
    fn endpoint(&self, path: &str) -> String {
        format!("{}/{}", self.base_url.as_str().trim_end_matches('/'), path.trim_start_matches('/'))
    }

    /// Resolve a possibly relative link (e.g. `/api/download/x.docx`) against the base URL.
    pub fn resolve_url(&self, link: &str) -> ApiResult<String> {
        if let Ok(url) = Url::parse(link) {
            return Ok(url.to_string());
        }
        self.base_url
            .join(link)
            .map(|url| url.to_string())
            .map_err(|e| ApiError::InvalidUrl(format!("{link}: {e}")))
    }

    /// Download URL for a document stored under `name`.
    pub fn document_url(&self, name: &str) -> String {
        self.endpoint(&format!("api/download/{}", urlencoding::encode(name)))
    }

    /// Check that the backend is up.
    pub async fn health(&self) -> ApiResult<HealthStatus> {
        let url = self.endpoint("");
        debug!("Checking backend health at {}", url);

        let response = self.client.get(&url).send().await?;
        let response = Self::check_status(response).await?;
        Self::decode(response).await
    }

    /// Turn a non-success response into [`ApiError::Rejected`].
    async fn check_status(response: Response) -> ApiResult<Response> {
        let status = response.status();
        if status.is_success() {
            return Ok(response);
        }

        let body = response.text().await.unwrap_or_default();
        let message = serde_json::from_str::<ErrorBody>(&body)
            .ok()
            .and_then(|b| b.message)
            .filter(|m| !m.is_empty());

        Err(ApiError::Rejected { status: status.as_u16(), message })
    }

    async fn decode<T: for<'de> Deserialize<'de>>(response: Response) -> ApiResult<T> {
        let body = response.bytes().await?;
        serde_json::from_slice(&body).map_err(|e| ApiError::Decode(e.to_string()))
    }
}

#[async_trait]
impl FormApi for HttpFormApi {
    async fn fetch_teams(&self) -> ApiResult<Vec<Team>> {
        let url = self.endpoint("api/teams");
        debug!("Loading teams from {}", url);

        let response = self.client.get(&url).send().await?;
        let response = Self::check_status(response).await?;
        let entries: Vec<serde_json::Value> = Self::decode(response).await?;

        let total = entries.len();
        let teams: Vec<Team> = entries.iter().filter_map(Team::from_directory_entry).collect();
        if teams.len() < total {
            warn!("Skipped {} of {} team directory entries", total - teams.len(), total);
        }
        Ok(teams)
    }

    async fn submit_answers(&self, submission: &Submission) -> ApiResult<GeneratedDocument> {
        let url = self.endpoint("api/submit_answers");
        debug!("Submitting {} answers to {}", submission.answers.len(), url);

        let response = self.client.post(&url).json(submission).send().await?;
        let response = Self::check_status(response).await?;
        let mut document: GeneratedDocument = Self::decode(response).await?;
        document.download_url = self.resolve_url(&document.download_url)?;

        Ok(document)
    }

    async fn download_document(&self, url: &str) -> ApiResult<Vec<u8>> {
        let url = self.resolve_url(url)?;
        debug!("Downloading document from {}", url);

        let response = self.client.get(&url).send().await?;
        let response = Self::check_status(response).await?;
        Ok(response.bytes().await?.to_vec())
    }
}
