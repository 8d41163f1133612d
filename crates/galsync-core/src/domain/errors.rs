//! Domain error types
//!
//! [`DomainError`] covers validation of values entering the domain.
//! [`SetupError`] covers the fatal startup failures: no usable credential
//! and missing configuration.

use thiserror::Error;

/// Errors that can occur when constructing domain values
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum DomainError {
    /// Invalid remote ID format
    #[error("Invalid remote ID: {0}")]
    InvalidRemoteId(String),

    /// Watermark text is not an ISO-8601 UTC instant
    #[error("Invalid watermark: {0}")]
    InvalidWatermark(String),

    /// Remote name cannot be used as a local path component
    #[error("Invalid name: {0}")]
    InvalidName(String),
}

/// Fatal errors raised before any remote work starts
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum SetupError {
    /// No usable credential source, or the credential payload is malformed
    #[error("Credential error: {0}")]
    Credential(String),

    /// A required identifier or setting is missing or invalid
    #[error("Configuration error: {0}")]
    Configuration(String),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = DomainError::InvalidRemoteId("".to_string());
        assert_eq!(err.to_string(), "Invalid remote ID: ");

        let err = DomainError::InvalidWatermark("yesterday".to_string());
        assert_eq!(err.to_string(), "Invalid watermark: yesterday");

        let err = SetupError::Configuration("drive.root_folder_id is not set".to_string());
        assert_eq!(
            err.to_string(),
            "Configuration error: drive.root_folder_id is not set"
        );
    }

    #[test]
    fn test_setup_error_downcasts_through_anyhow() {
        let err: anyhow::Error = SetupError::Credential("no source".to_string()).into();
        let err = err.context("Failed to open Drive session");
        assert!(matches!(
            err.downcast_ref::<SetupError>(),
            Some(SetupError::Credential(_))
        ));
    }
}
