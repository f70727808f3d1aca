//! # Delivery Errors
//!
//! Error types for outbound mail.
//!
//! Every failure is sorted into one of four categories. The category decides
//! the hint shown to the customer and the `errorCode` returned by the API;
//! the message and optional provider code are kept for the operator.
//!
//! # Examples
//!
//! ```
//! use limo_quote::infrastructure::mail::error::{DeliveryError, DeliveryErrorKind};
//!
//! let error = DeliveryError::auth_failure("535 5.7.8 Username and Password not accepted")
//!     .with_code("535");
//! assert_eq!(error.kind(), DeliveryErrorKind::AuthFailure);
//! assert_eq!(error.error_code(), "AUTH_FAILURE");
//! assert_eq!(error.provider_code(), Some("535"));
//! ```

use crate::domain::entities::DeliveryFailure;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::io;
use thiserror::Error;

/// SMTP reply codes that mean the provider refused our credentials.
const AUTH_REPLY_CODES: [&str; 3] = ["530", "534", "535"];

/// Category of a delivery failure.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum DeliveryErrorKind {
    /// The provider could not be reached (DNS, refused, unreachable).
    NetworkUnreachable,
    /// Credentials were rejected or could not be obtained.
    AuthFailure,
    /// A deadline was exceeded.
    Timeout,
    /// Anything else.
    Unknown,
}

impl DeliveryErrorKind {
    /// Stable code exposed to API clients.
    #[must_use]
    pub fn as_code(&self) -> &'static str {
        match self {
            Self::NetworkUnreachable => "NETWORK_UNREACHABLE",
            Self::AuthFailure => "AUTH_FAILURE",
            Self::Timeout => "TIMEOUT",
            Self::Unknown => "UNKNOWN_ERROR",
        }
    }

    /// What the customer should do about it.
    #[must_use]
    pub fn customer_hint(&self) -> &'static str {
        match self {
            Self::NetworkUnreachable => "Please check your internet connection and try again.",
            Self::AuthFailure => "Email service temporarily unavailable. Please call us directly.",
            Self::Timeout => "Request timed out. Please try again.",
            Self::Unknown => "Please try again or call us directly.",
        }
    }

    /// Sorts a raw failure into a category.
    ///
    /// Inputs are checked from most to least specific: SMTP reply code,
    /// I/O error kind, then wording of the message.
    #[must_use]
    pub fn classify(reply_code: Option<&str>, io_kind: Option<io::ErrorKind>, message: &str) -> Self {
        if reply_code.is_some_and(|code| AUTH_REPLY_CODES.contains(&code)) {
            return Self::AuthFailure;
        }

        if let Some(kind) = io_kind {
            match kind {
                io::ErrorKind::TimedOut => return Self::Timeout,
                io::ErrorKind::ConnectionRefused
                | io::ErrorKind::ConnectionReset
                | io::ErrorKind::ConnectionAborted
                | io::ErrorKind::NotConnected
                | io::ErrorKind::AddrNotAvailable
                | io::ErrorKind::HostUnreachable
                | io::ErrorKind::NetworkUnreachable => return Self::NetworkUnreachable,
                _ => {}
            }
        }

        let message = message.to_ascii_lowercase();
        if message.contains("timed out") || message.contains("timeout") {
            Self::Timeout
        } else if message.contains("authentication")
            || message.contains("credentials")
            || message.contains("invalid_grant")
        {
            Self::AuthFailure
        } else if message.contains("lookup")
            || message.contains("resolve")
            || message.contains("dns")
            || message.contains("connection refused")
            || message.contains("unreachable")
        {
            Self::NetworkUnreachable
        } else {
            Self::Unknown
        }
    }
}

impl fmt::Display for DeliveryErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_code())
    }
}

/// Error type for mail delivery.
#[derive(Debug, Clone, Error)]
pub enum DeliveryError {
    /// The provider could not be reached.
    #[error("mail provider unreachable: {message}")]
    NetworkUnreachable {
        /// Error message.
        message: String,
        /// Provider diagnostic code.
        code: Option<String>,
    },

    /// Credentials were rejected or could not be obtained.
    #[error("mail authentication failed: {message}")]
    AuthFailure {
        /// Error message.
        message: String,
        /// Provider diagnostic code.
        code: Option<String>,
    },

    /// A connection or send deadline was exceeded.
    #[error("mail delivery timed out: {message}")]
    Timeout {
        /// Error message.
        message: String,
        /// Deadline in milliseconds.
        timeout_ms: Option<u64>,
    },

    /// Unclassified failure.
    #[error("mail delivery failed: {message}")]
    Unknown {
        /// Error message.
        message: String,
        /// Provider diagnostic code.
        code: Option<String>,
    },
}

impl DeliveryError {
    /// Creates an error of the given category.
    #[must_use]
    pub fn of_kind(kind: DeliveryErrorKind, message: impl Into<String>) -> Self {
        match kind {
            DeliveryErrorKind::NetworkUnreachable => Self::network_unreachable(message),
            DeliveryErrorKind::AuthFailure => Self::auth_failure(message),
            DeliveryErrorKind::Timeout => Self::timeout(message),
            DeliveryErrorKind::Unknown => Self::unknown(message),
        }
    }

    /// Creates a network unreachable error.
    #[must_use]
    pub fn network_unreachable(message: impl Into<String>) -> Self {
        Self::NetworkUnreachable {
            message: message.into(),
            code: None,
        }
    }

    /// Creates an authentication error.
    #[must_use]
    pub fn auth_failure(message: impl Into<String>) -> Self {
        Self::AuthFailure {
            message: message.into(),
            code: None,
        }
    }

    /// Creates a timeout error.
    #[must_use]
    pub fn timeout(message: impl Into<String>) -> Self {
        Self::Timeout {
            message: message.into(),
            timeout_ms: None,
        }
    }

    /// Creates a timeout error with the deadline that was exceeded.
    #[must_use]
    pub fn timeout_with_duration(message: impl Into<String>, timeout_ms: u64) -> Self {
        Self::Timeout {
            message: message.into(),
            timeout_ms: Some(timeout_ms),
        }
    }

    /// Creates an unclassified error.
    #[must_use]
    pub fn unknown(message: impl Into<String>) -> Self {
        Self::Unknown {
            message: message.into(),
            code: None,
        }
    }

    /// Attaches a provider diagnostic code. Ignored for timeouts.
    #[must_use]
    pub fn with_code(mut self, provider_code: impl Into<String>) -> Self {
        match &mut self {
            Self::NetworkUnreachable { code, .. }
            | Self::AuthFailure { code, .. }
            | Self::Unknown { code, .. } => *code = Some(provider_code.into()),
            Self::Timeout { .. } => {}
        }
        self
    }

    /// Returns the category.
    #[must_use]
    pub fn kind(&self) -> DeliveryErrorKind {
        match self {
            Self::NetworkUnreachable { .. } => DeliveryErrorKind::NetworkUnreachable,
            Self::AuthFailure { .. } => DeliveryErrorKind::AuthFailure,
            Self::Timeout { .. } => DeliveryErrorKind::Timeout,
            Self::Unknown { .. } => DeliveryErrorKind::Unknown,
        }
    }

    /// Returns the error message without the category prefix.
    #[must_use]
    pub fn message(&self) -> &str {
        match self {
            Self::NetworkUnreachable { message, .. }
            | Self::AuthFailure { message, .. }
            | Self::Timeout { message, .. }
            | Self::Unknown { message, .. } => message,
        }
    }

    /// Returns the provider diagnostic code, if one was reported.
    #[must_use]
    pub fn provider_code(&self) -> Option<&str> {
        match self {
            Self::NetworkUnreachable { code, .. }
            | Self::AuthFailure { code, .. }
            | Self::Unknown { code, .. } => code.as_deref(),
            Self::Timeout { .. } => None,
        }
    }

    /// Returns the category code exposed to API clients.
    #[must_use]
    pub fn error_code(&self) -> &'static str {
        self.kind().as_code()
    }

    /// Converts into the form persisted in the fallback store.
    ///
    /// The provider code is kept when known, otherwise the category code.
    #[must_use]
    pub fn to_failure(&self) -> DeliveryFailure {
        DeliveryFailure::new(
            self.message(),
            self.provider_code().unwrap_or_else(|| self.error_code()),
        )
    }
}

/// Result type for mail delivery.
pub type DeliveryResult<T> = Result<T, DeliveryError>;
