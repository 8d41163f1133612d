//! Session establishment
//!
//! Turns configuration into an authenticated [`DriveRemoteStore`]. This is
//! the only place credentials are read.

use anyhow::Result;
use galsync_core::config::Config;
use galsync_core::domain::SetupError;
use tracing::debug;

use crate::auth::{CredentialSource, TokenExchanger};
use crate::client::DriveClient;
use crate::provider::DriveRemoteStore;
use crate::retry::RetryPolicy;

/// Obtains an authenticated session from configuration.
///
/// Credential problems and a rejected token exchange surface as
/// [`SetupError::Credential`] inside the returned error.
pub async fn obtain_session(config: &Config) -> Result<DriveRemoteStore> {
    let source = CredentialSource::resolve(&config.drive)?;
    debug!(source = ?source, "Resolved credential source");

    let key = source.load_key()?;

    let token_url = match config.drive.token_url.as_deref() {
        Some(url) if !url.is_empty() => url.to_string(),
        _ => key.token_uri().to_string(),
    };
    url::Url::parse(&token_url)
        .map_err(|e| SetupError::Credential(format!("invalid token endpoint {token_url}: {e}")))?;

    let retry_policy = RetryPolicy::from(&config.retry);
    let token = TokenExchanger::new(token_url)
        .with_retry_policy(retry_policy)
        .exchange(&key)
        .await?;

    let client = DriveClient::with_base_url(token.access_token, &config.drive.api_base_url)
        .with_retry_policy(retry_policy);

    Ok(DriveRemoteStore::new(client))
}
