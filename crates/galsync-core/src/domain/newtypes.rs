//! Domain newtypes with validation
//!
//! Strongly-typed wrappers for remote identifiers and the sync watermark.
//! Each newtype ensures data validity at construction time.

use std::fmt::{self, Display, Formatter};
use std::str::FromStr;

use chrono::{DateTime, SubsecRound, Utc};
use serde::{Deserialize, Serialize};

use super::errors::DomainError;

// ============================================================================
// RemoteId
// ============================================================================

/// Drive file or folder ID
///
/// Format: URL-safe alphanumeric string, typically like
/// "1a2B3c4D5e6F7g8H9i0JkLmNoPqRsTuVw"
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct RemoteId(String);

impl RemoteId {
    /// Create a new RemoteId
    ///
    /// # Errors
    /// Returns error if the ID is empty or contains characters that could
    /// break out of a quoted query literal
    pub fn new(id: String) -> Result<Self, DomainError> {
        if id.is_empty() {
            return Err(DomainError::InvalidRemoteId(
                "Remote ID cannot be empty".to_string(),
            ));
        }

        if !id
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_')
        {
            return Err(DomainError::InvalidRemoteId(format!(
                "Remote ID contains invalid characters: {id}"
            )));
        }

        Ok(Self(id))
    }

    /// Get the inner string reference
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl Display for RemoteId {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl FromStr for RemoteId {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::new(s.to_string())
    }
}

impl TryFrom<String> for RemoteId {
    type Error = DomainError;

    fn try_from(s: String) -> Result<Self, Self::Error> {
        Self::new(s)
    }
}

impl From<RemoteId> for String {
    fn from(id: RemoteId) -> Self {
        id.0
    }
}

// ============================================================================
// Watermark
// ============================================================================

/// The instant marking the boundary between "already synced" and
/// "possibly new" remote state.
///
/// Rendered as `YYYY-MM-DDTHH:MM:SS.000Z`: UTC, whole seconds, a literal
/// zero millisecond field. Parsing accepts any RFC 3339 instant and keeps
/// its full precision.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Watermark(DateTime<Utc>);

impl Watermark {
    /// strftime pattern of the persisted form
    pub const FORMAT: &'static str = "%Y-%m-%dT%H:%M:%S.000Z";

    /// The current wall-clock instant, truncated to whole seconds
    #[must_use]
    pub fn now() -> Self {
        Self::at(Utc::now())
    }

    /// A watermark at the given instant, truncated to whole seconds
    #[must_use]
    pub fn at(instant: DateTime<Utc>) -> Self {
        Self(instant.trunc_subsecs(0))
    }

    /// Get the inner instant
    #[must_use]
    pub const fn as_datetime(&self) -> &DateTime<Utc> {
        &self.0
    }

    /// Returns true if `modified` lies strictly after this watermark
    #[must_use]
    pub fn is_exceeded_by(&self, modified: &DateTime<Utc>) -> bool {
        *modified > self.0
    }
}

impl Display for Watermark {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0.format(Self::FORMAT))
    }
}

impl FromStr for Watermark {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let trimmed = s.trim();
        DateTime::parse_from_rfc3339(trimmed)
            .map(|dt| Self(dt.with_timezone(&Utc)))
            .map_err(|e| DomainError::InvalidWatermark(format!("{trimmed}: {e}")))
    }
}

impl From<DateTime<Utc>> for Watermark {
    fn from(instant: DateTime<Utc>) -> Self {
        Self::at(instant)
    }
}
