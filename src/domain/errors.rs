//! # Domain Errors
//!
//! Validation failures for an incoming quote request.
//!
//! The `Display` text of each variant is exactly what the website shows the
//! customer, so it must stay stable.
//!
//! # Examples
//!
//! ```
//! use limo_quote::domain::errors::ValidationError;
//!
//! let err = ValidationError::missing_field("pickupDate");
//! assert_eq!(err.to_string(), "Missing required field: pickupDate");
//! assert_eq!(err.field(), Some("pickupDate"));
//! ```

use thiserror::Error;

/// A quote request that cannot be accepted.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    /// A required field is absent or blank after trimming.
    #[error("Missing required field: {0}")]
    MissingField(&'static str),

    /// The email is present but not shaped like `local@domain.tld`.
    #[error("Invalid email format")]
    InvalidEmailFormat,
}

impl ValidationError {
    /// Creates a missing field error.
    #[must_use]
    pub fn missing_field(field: &'static str) -> Self {
        Self::MissingField(field)
    }

    /// Returns the offending field name for [`ValidationError::MissingField`].
    #[must_use]
    pub fn field(&self) -> Option<&'static str> {
        match self {
            Self::MissingField(field) => Some(field),
            Self::InvalidEmailFormat => None,
        }
    }

    /// Returns true if this is a missing field error.
    #[must_use]
    pub fn is_missing_field(&self) -> bool {
        matches!(self, Self::MissingField(_))
    }

    /// Returns true if this is an email format error.
    #[must_use]
    pub fn is_invalid_email(&self) -> bool {
        matches!(self, Self::InvalidEmailFormat)
    }
}

/// Result type for validation.
pub type ValidationResult<T> = Result<T, ValidationError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_field_message_names_field() {
        let err = ValidationError::missing_field("city");
        assert_eq!(err.to_string(), "Missing required field: city");
        assert!(err.is_missing_field());
        assert!(!err.is_invalid_email());
    }

    #[test]
    fn invalid_email_message() {
        let err = ValidationError::InvalidEmailFormat;
        assert_eq!(err.to_string(), "Invalid email format");
        assert!(err.is_invalid_email());
        assert_eq!(err.field(), None);
    }
}
