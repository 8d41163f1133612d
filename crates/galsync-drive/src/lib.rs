//! galsync Drive - Google Drive v3 adapter
//!
//! Provides the remote side of galsync:
//! - Service-account credentials and JWT bearer token exchange
//! - A Drive v3 HTTP client with bounded retry
//! - Rendering of listing queries into the `files.list` grammar
//! - The [`IRemoteStore`](galsync_core::ports::IRemoteStore) implementation
//!
//! ## Modules
//!
//! - [`auth`] - Credential sources, service-account keys, token exchange
//! - [`client`] - Drive v3 HTTP client
//! - [`provider`] - `IRemoteStore` adapter over the client
//! - [`query`] - `files.list` query rendering
//! - [`retry`] - Retry policy, `Retry-After` parsing, backoff loop
//! - [`session`] - Session establishment from configuration

pub mod auth;
pub mod client;
pub mod provider;
pub mod query;
pub mod retry;
pub mod session;

use std::time::Duration;

use reqwest::StatusCode;
use thiserror::Error;

pub use provider::DriveRemoteStore;
pub use session::obtain_session;

/// Errors that can occur when communicating with the Drive API
#[derive(Debug, Error)]
pub enum DriveError {
    /// Access token missing, expired or rejected
    #[error("Unauthorized: {0}")]
    Unauthorized(String),

    /// The service account lacks access to the resource
    #[error("Forbidden: {0}")]
    Forbidden(String),

    /// The requested file or folder does not exist
    #[error("Not found: {0}")]
    NotFound(String),

    /// Rate limit exceeded; `retry_after` is the server's hint, if any
    #[error("Too many requests, retry after {retry_after:?}")]
    TooManyRequests {
        /// Duration to wait before retrying
        retry_after: Option<Duration>,
    },

    /// A server-side error occurred (5xx)
    #[error("Server error: {0}")]
    ServerError(String),

    /// Any other non-success status
    #[error("Unexpected status {status}: {body}")]
    UnexpectedStatus {
        /// HTTP status returned
        status: StatusCode,
        /// Response body, possibly empty
        body: String,
    },

    /// A network-level error occurred
    #[error("Network error: {0}")]
    NetworkError(#[from] reqwest::Error),

    /// The API response could not be parsed or was malformed
    #[error("Invalid response: {0}")]
    InvalidResponse(String),
}

impl DriveError {
    /// Returns true for failures worth retrying: throttling, 5xx and
    /// connection-level errors.
    pub fn is_transient(&self) -> bool {
        match self {
            DriveError::TooManyRequests { .. } | DriveError::ServerError(_) => true,
            DriveError::NetworkError(e) => !e.is_builder() && !e.is_decode(),
            _ => false,
        }
    }
}
