//! Google Drive v3 API client
//!
//! Provides a typed HTTP client for the two Drive calls galsync needs:
//! paginated `files.list` and `files.get?alt=media`. Handles the bearer
//! header, status classification, JSON decoding and bounded retry.
//!
//! ## Usage
//!
//! ```rust,no_run
//! use galsync_drive::client::DriveClient;
//!
//! # async fn example() -> anyhow::Result<()> {
//! let client = DriveClient::new("access-token-here");
//! let bytes = client.download("1AbCdEf").await?;
//! println!("{} bytes", bytes.len());
//! # Ok(())
//! # }
//! ```

use chrono::{DateTime, Utc};
use reqwest::{Client, Method, RequestBuilder, Response, StatusCode};
use serde::Deserialize;
use tracing::debug;

use crate::query::FileListRequest;
use crate::retry::{parse_retry_after, with_retry, RetryPolicy};
use crate::DriveError;

/// Base URL for the Drive v3 API
pub const DRIVE_BASE_URL: &str = "https://www.googleapis.com/drive/v3";

/// `reason` values Drive reports with a 403 when throttling
const RATE_LIMIT_REASONS: &[&str] = &["rateLimitExceeded", "userRateLimitExceeded"];

// ============================================================================
// Drive API response types
// ============================================================================

/// One entry of a `files.list` response
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DriveFile {
    /// File id
    pub id: String,
    /// File or folder name
    pub name: String,
    /// Mime type
    pub mime_type: String,
    /// Parent folder ids
    #[serde(default)]
    pub parents: Vec<String>,
    /// Creation timestamp
    pub created_time: Option<DateTime<Utc>>,
    /// Last modification timestamp
    pub modified_time: Option<DateTime<Utc>>,
    /// Free-text description
    pub description: Option<String>,
}

/// A page of `files.list`
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct FileList {
    #[serde(default)]
    files: Vec<DriveFile>,
    next_page_token: Option<String>,
}

// ============================================================================
// DriveClient
// ============================================================================

/// HTTP client for Drive v3 calls
///
/// Wraps `reqwest::Client` with the bearer token, base URL and the retry
/// policy applied to every call.
#[derive(Clone)]
pub struct DriveClient {
    /// The underlying HTTP client
    client: Client,
    /// Base URL for API requests
    base_url: String,
    /// OAuth2 access token
    access_token: String,
    /// Retry policy for every call
    retry: RetryPolicy,
}

impl DriveClient {
    /// Creates a client for the public Drive endpoint
    pub fn new(access_token: impl Into<String>) -> Self {
        Self::with_base_url(access_token, DRIVE_BASE_URL)
    }

    /// Creates a client with a custom base URL (useful for testing)
    pub fn with_base_url(access_token: impl Into<String>, base_url: impl Into<String>) -> Self {
        Self {
            client: Client::new(),
            base_url: base_url.into().trim_end_matches('/').to_string(),
            access_token: access_token.into(),
            retry: RetryPolicy::default(),
        }
    }

    /// Replaces the retry policy
    pub fn with_retry_policy(mut self, policy: RetryPolicy) -> Self {
        self.retry = policy;
        self
    }

    /// The retry policy in effect
    pub fn retry_policy(&self) -> &RetryPolicy {
        &self.retry
    }

    /// Creates an authenticated request builder for `path` under the base URL
    pub fn request(&self, method: Method, path: &str) -> RequestBuilder {
        let url = format!("{}{}", self.base_url, path);
        self.client
            .request(method, &url)
            .bearer_auth(&self.access_token)
    }

    /// Sends a request with bounded retry and returns the response body.
    ///
    /// Each attempt classifies the status via [`check_status`]; transient
    /// failures are retried per the client's [`RetryPolicy`].
    pub async fn execute_with_retry(
        &self,
        operation: &str,
        method: Method,
        path: &str,
        params: &[(&str, String)],
    ) -> Result<Vec<u8>, DriveError> {
        with_retry(&self.retry, operation, || {
            let method = method.clone();
            async move {
                let response = self.request(method, path).query(params).send().await?;
                let response = check_status(response).await?;
                Ok(response.bytes().await?.to_vec())
            }
        })
        .await
    }

    /// Lists files matching `request`, following `nextPageToken` unless the
    /// request is single-page.
    pub async fn list_files(&self, request: &FileListRequest) -> Result<Vec<DriveFile>, DriveError> {
        let mut files = Vec::new();
        let mut page_token: Option<String> = None;
        let mut page = 0u32;

        loop {
            let params = request.params(page_token.as_deref());
            let body = self
                .execute_with_retry("files.list", Method::GET, "/files", &params)
                .await?;
            let list: FileList = serde_json::from_slice(&body)
                .map_err(|e| DriveError::InvalidResponse(format!("files.list: {e}")))?;

            page += 1;
            debug!(
                page,
                count = list.files.len(),
                has_more = list.next_page_token.is_some(),
                "Fetched files.list page"
            );
            files.extend(list.files);

            match list.next_page_token {
                Some(token) if !request.single_page => {
                    if page_token.as_deref() == Some(token.as_str()) {
                        return Err(DriveError::InvalidResponse(format!(
                            "files.list returned the same page token twice: {token}"
                        )));
                    }
                    page_token = Some(token);
                }
                _ => break,
            }
        }

        Ok(files)
    }

    /// Downloads a file's content
    pub async fn download(&self, file_id: &str) -> Result<Vec<u8>, DriveError> {
        let path = format!("/files/{file_id}");
        let params = [("alt", "media".to_string())];
        let bytes = self
            .execute_with_retry("files.get", Method::GET, &path, &params)
            .await?;
        debug!(file_id, bytes = bytes.len(), "Downloaded file content");
        Ok(bytes)
    }
}

/// Maps a non-success response to a [`DriveError`].
///
/// A 403 whose body carries a rate-limit reason is treated as a 429.
pub async fn check_status(response: Response) -> Result<Response, DriveError> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }

    let retry_after = response
        .headers()
        .get(reqwest::header::RETRY_AFTER)
        .and_then(|v| v.to_str().ok())
        .and_then(parse_retry_after);
    let body = response.text().await.unwrap_or_default();

    Err(match status {
        StatusCode::TOO_MANY_REQUESTS => DriveError::TooManyRequests { retry_after },
        StatusCode::FORBIDDEN if RATE_LIMIT_REASONS.iter().any(|r| body.contains(r)) => {
            DriveError::TooManyRequests { retry_after }
        }
        StatusCode::UNAUTHORIZED => DriveError::Unauthorized(body),
        StatusCode::FORBIDDEN => DriveError::Forbidden(body),
        StatusCode::NOT_FOUND => DriveError::NotFound(body),
        s if s.is_server_error() => DriveError::ServerError(format!("{s}: {body}")),
        status => DriveError::UnexpectedStatus { status, body },
    })
}
