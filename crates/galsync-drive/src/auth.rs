//! Service-account authentication for Google Drive
//!
//! Implements the OAuth2 JWT bearer grant:
//!
//! 1. Resolve a [`CredentialSource`] from configuration: an inline key blob
//!    wins over a key file path, and exactly one is used.
//! 2. Parse it into a [`ServiceAccountKey`].
//! 3. Sign an RS256 assertion with the key's private key.
//! 4. POST the assertion to the token endpoint and receive a bearer token.
//!
//! Every failure in this module is a [`SetupError::Credential`].

use std::path::PathBuf;

use chrono::Utc;
use galsync_core::config::DriveConfig;
use galsync_core::domain::SetupError;
use jsonwebtoken::{Algorithm, EncodingKey, Header};
use reqwest::Client;
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::client::check_status;
use crate::retry::{with_retry, RetryPolicy};

/// Read-only Drive scope
pub const DRIVE_READONLY_SCOPE: &str = "https://www.googleapis.com/auth/drive.readonly";

/// Grant type of the JWT bearer flow
pub const JWT_BEARER_GRANT: &str = "urn:ietf:params:oauth:grant-type:jwt-bearer";

/// Default Google token endpoint, used when the key carries none
pub const DEFAULT_TOKEN_URI: &str = "https://oauth2.googleapis.com/token";

/// Lifetime of a signed assertion in seconds (Google's maximum)
const ASSERTION_LIFETIME_SECS: i64 = 3600;

// ============================================================================
// Credential sources
// ============================================================================

/// Where the service-account key comes from
#[derive(Clone, PartialEq, Eq)]
pub enum CredentialSource {
    /// Serialized key JSON, e.g. from `GOOGLE_CREDENTIALS`
    Inline(String),
    /// Path to a key file, e.g. from `GOOGLE_CREDENTIALS_FILE`
    File(PathBuf),
}

impl std::fmt::Debug for CredentialSource {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            CredentialSource::Inline(_) => f.write_str("Inline(<redacted>)"),
            CredentialSource::File(path) => f.debug_tuple("File").field(path).finish(),
        }
    }
}

impl CredentialSource {
    /// Picks the credential source from configuration.
    ///
    /// The inline blob is tried first, then the file path. Blank values count
    /// as absent.
    pub fn resolve(config: &DriveConfig) -> Result<Self, SetupError> {
        if let Some(json) = config
            .credentials_json
            .as_deref()
            .filter(|s| !s.trim().is_empty())
        {
            return Ok(CredentialSource::Inline(json.to_string()));
        }

        if let Some(path) = config
            .credentials_file
            .as_ref()
            .filter(|p| !p.as_os_str().is_empty())
        {
            return Ok(CredentialSource::File(path.clone()));
        }

        Err(SetupError::Credential(
            "no credentials configured: set GOOGLE_CREDENTIALS or GOOGLE_CREDENTIALS_FILE".into(),
        ))
    }

    /// Reads and parses the key
    pub fn load_key(&self) -> Result<ServiceAccountKey, SetupError> {
        match self {
            CredentialSource::Inline(json) => ServiceAccountKey::from_json(json),
            CredentialSource::File(path) => {
                let json = std::fs::read_to_string(path).map_err(|e| {
                    SetupError::Credential(format!(
                        "cannot read credentials file {}: {e}",
                        path.display()
                    ))
                })?;
                ServiceAccountKey::from_json(&json)
            }
        }
    }
}

// ============================================================================
// Service-account key
// ============================================================================

/// The fields of a service-account key file that the bearer flow needs
#[derive(Clone, Deserialize)]
pub struct ServiceAccountKey {
    /// Service account identity, used as the assertion issuer
    pub client_email: String,
    /// PEM-encoded RSA private key
    pub private_key: String,
    /// Token endpoint the assertion is exchanged at
    #[serde(default)]
    pub token_uri: Option<String>,
}

impl std::fmt::Debug for ServiceAccountKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ServiceAccountKey")
            .field("client_email", &self.client_email)
            .field("private_key", &"<redacted>")
            .field("token_uri", &self.token_uri)
            .finish()
    }
}

impl ServiceAccountKey {
    /// Parses a key from its JSON form
    pub fn from_json(json: &str) -> Result<Self, SetupError> {
        let key: ServiceAccountKey = serde_json::from_str(json)
            .map_err(|e| SetupError::Credential(format!("malformed service-account key: {e}")))?;

        if key.client_email.trim().is_empty() {
            return Err(SetupError::Credential(
                "service-account key has an empty client_email".into(),
            ));
        }
        if key.private_key.trim().is_empty() {
            return Err(SetupError::Credential(
                "service-account key has an empty private_key".into(),
            ));
        }

        Ok(key)
    }

    /// The key's token endpoint, or Google's default
    pub fn token_uri(&self) -> &str {
        self.token_uri
            .as_deref()
            .filter(|s| !s.is_empty())
            .unwrap_or(DEFAULT_TOKEN_URI)
    }
}

// ============================================================================
// Assertion and exchange
// ============================================================================

/// JWT claims of the bearer assertion
#[derive(Debug, Serialize, Deserialize, PartialEq, Eq)]
pub struct AssertionClaims {
    pub iss: String,
    pub scope: String,
    pub aud: String,
    pub iat: i64,
    pub exp: i64,
}

/// Signs an RS256 assertion for `key` addressed to `audience`
pub fn sign_assertion(key: &ServiceAccountKey, audience: &str) -> Result<String, SetupError> {
    let iat = Utc::now().timestamp();
    let claims = AssertionClaims {
        iss: key.client_email.clone(),
        scope: DRIVE_READONLY_SCOPE.to_string(),
        aud: audience.to_string(),
        iat,
        exp: iat + ASSERTION_LIFETIME_SECS,
    };

    let encoding_key = EncodingKey::from_rsa_pem(key.private_key.as_bytes())
        .map_err(|e| SetupError::Credential(format!("invalid private key: {e}")))?;

    jsonwebtoken::encode(&Header::new(Algorithm::RS256), &claims, &encoding_key)
        .map_err(|e| SetupError::Credential(format!("failed to sign assertion: {e}")))
}

/// Successful token endpoint response
#[derive(Debug, Clone, Deserialize)]
pub struct AccessToken {
    /// Bearer token for Drive calls
    pub access_token: String,
    /// Lifetime in seconds
    #[serde(default)]
    pub expires_in: Option<u64>,
    /// Usually `Bearer`
    #[serde(default)]
    pub token_type: Option<String>,
}

/// Exchanges signed assertions for access tokens
pub struct TokenExchanger {
    client: Client,
    token_url: String,
    retry_policy: RetryPolicy,
}

impl TokenExchanger {
    /// Creates an exchanger for the given token endpoint
    pub fn new(token_url: impl Into<String>) -> Self {
        Self {
            client: Client::new(),
            token_url: token_url.into(),
            retry_policy: RetryPolicy::default(),
        }
    }

    /// Sets the retry policy for transient token endpoint failures
    pub fn with_retry_policy(mut self, policy: RetryPolicy) -> Self {
        self.retry_policy = policy;
        self
    }

    /// The token endpoint in use
    pub fn token_url(&self) -> &str {
        &self.token_url
    }

    /// Signs an assertion for `key` and exchanges it for an access token.
    ///
    /// The assertion audience is the endpoint actually contacted. 5xx, 429
    /// and network failures are retried; any other rejection is final.
    pub async fn exchange(&self, key: &ServiceAccountKey) -> Result<AccessToken, SetupError> {
        let assertion = sign_assertion(key, &self.token_url)?;
        debug!(token_url = %self.token_url, "Exchanging service-account assertion");

        let response = with_retry(&self.retry_policy, "token_exchange", || {
            let request = self
                .client
                .post(&self.token_url)
                .form(&[("grant_type", JWT_BEARER_GRANT), ("assertion", assertion.as_str())]);
            async move { check_status(request.send().await?).await }
        })
        .await
        .map_err(|e| SetupError::Credential(format!("token exchange rejected: {e}")))?;

        let token: AccessToken = response
            .json()
            .await
            .map_err(|e| SetupError::Credential(format!("malformed token response: {e}")))?;

        info!(
            client_email = %key.client_email,
            expires_in = token.expires_in,
            "Obtained Drive access token"
        );
        Ok(token)
    }
}
