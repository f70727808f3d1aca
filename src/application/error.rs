//! # Application Errors
//!
//! Errors raised while wiring the service together or running operator
//! commands.
//!
//! Request handling itself never fails with these: every accepted quote
//! request ends in a [`SubmissionOutcome`](crate::application::services::SubmissionOutcome).
//!
//! # Error Hierarchy
//!
//! ```text
//! ApplicationError
//! ├── Configuration(String)     - Settings could not be loaded or are invalid
//! ├── Delivery(DeliveryError)   - Mail transports could not be created
//! └── Record(RecordError)       - Fallback store could not be read
//! ```
//!
//! # Examples
//!
//! ```
//! use limo_quote::application::error::ApplicationError;
//! use limo_quote::infrastructure::persistence::RecordError;
//!
//! let err = ApplicationError::configuration("server.port must be non-zero");
//! assert!(err.is_configuration());
//!
//! let err: ApplicationError = RecordError::storage_unavailable("data/pending-quotes.json", "denied").into();
//! assert!(!err.is_configuration());
//! ```

use crate::infrastructure::mail::DeliveryError;
use crate::infrastructure::persistence::RecordError;
use thiserror::Error;

/// Application layer error.
#[derive(Debug, Error)]
pub enum ApplicationError {
    /// Settings could not be loaded or are invalid.
    #[error("configuration error: {0}")]
    Configuration(String),

    /// Mail transports could not be created.
    #[error(transparent)]
    Delivery(#[from] DeliveryError),

    /// The fallback store could not be read.
    #[error(transparent)]
    Record(#[from] RecordError),
}

impl ApplicationError {
    /// Creates a configuration error.
    #[must_use]
    pub fn configuration(msg: impl Into<String>) -> Self {
        Self::Configuration(msg.into())
    }

    /// Returns true if this is a configuration error.
    #[must_use]
    pub fn is_configuration(&self) -> bool {
        matches!(self, Self::Configuration(_))
    }
}

impl From<config::ConfigError> for ApplicationError {
    fn from(err: config::ConfigError) -> Self {
        Self::Configuration(err.to_string())
    }
}

/// Result type for application operations.
pub type ApplicationResult<T> = Result<T, ApplicationError>;
