//! # Quote Request Validation
//!
//! Server-side acceptance rules for the quote form.
//!
//! The website runs its own checks before posting, but the endpoint is
//! reachable directly, so everything here is enforced again:
//!
//! 1. every field in [`REQUIRED_FIELDS`] is present and not blank after
//!    trimming; the first missing one (in that order) is reported
//! 2. the email, exactly as submitted, looks like `local@domain.tld`;
//!    surrounding whitespace makes it malformed
//!
//! Dates and phone numbers are not enforced. [`is_plausible_phone`] mirrors
//! the form's advisory rule for logging only.
//!
//! # Examples
//!
//! ```
//! use limo_quote::domain::entities::QuoteRequest;
//! use limo_quote::domain::errors::ValidationError;
//! use limo_quote::domain::services::validator::validate;
//!
//! let request = QuoteRequest {
//!     full_name: Some("Jane Doe".into()),
//!     ..Default::default()
//! };
//! assert_eq!(validate(&request), Err(ValidationError::MissingField("email")));
//! ```

use crate::domain::entities::{QuoteRequest, ValidatedQuoteRequest};
use crate::domain::errors::{ValidationError, ValidationResult};
use regex::Regex;
use std::sync::LazyLock;

/// Required fields in the order they are checked.
pub const REQUIRED_FIELDS: [&str; 12] = [
    "fullName",
    "email",
    "phone",
    "numPassengers",
    "pickupLocation",
    "dropLocation",
    "pickupDate",
    "pickupTime",
    "state",
    "city",
    "tripType",
    "vehicleType",
];

#[allow(clippy::expect_used)]
static EMAIL_PATTERN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^[^\s@]+@[^\s@]+\.[^\s@]+$").expect("email pattern is a valid literal")
});

#[allow(clippy::expect_used)]
static PHONE_PATTERN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^\+?[1-9][0-9]{0,15}$").expect("phone pattern is a valid literal")
});

/// Validates a submitted quote request.
///
/// # Errors
///
/// Returns [`ValidationError::MissingField`] naming the first required field
/// that is absent or blank, or [`ValidationError::InvalidEmailFormat`] when
/// all fields are present but the email is malformed.
pub fn validate(request: &QuoteRequest) -> ValidationResult<ValidatedQuoteRequest> {
    let validated = ValidatedQuoteRequest {
        full_name: required("fullName", &request.full_name)?,
        email: required("email", &request.email)?,
        phone: required("phone", &request.phone)?,
        num_passengers: required("numPassengers", &request.num_passengers)?,
        pickup_location: required("pickupLocation", &request.pickup_location)?,
        drop_location: required("dropLocation", &request.drop_location)?,
        pickup_date: required("pickupDate", &request.pickup_date)?,
        pickup_time: required("pickupTime", &request.pickup_time)?,
        state: required("state", &request.state)?,
        city: required("city", &request.city)?,
        trip_type: required("tripType", &request.trip_type)?,
        vehicle_type: required("vehicleType", &request.vehicle_type)?,
        special_requests: request
            .special_requests
            .as_deref()
            .map(str::trim)
            .unwrap_or_default()
            .to_string(),
    };

    // The pattern applies to the address as submitted, surrounding whitespace included.
    let submitted_email = request.email.as_deref().unwrap_or_default();
    if !is_valid_email(submitted_email) {
        return Err(ValidationError::InvalidEmailFormat);
    }

    Ok(validated)
}

/// Returns true if `email` has the `local@domain.tld` shape.
#[must_use]
pub fn is_valid_email(email: &str) -> bool {
    EMAIL_PATTERN.is_match(email)
}

/// Advisory phone check used by the website form.
///
/// Spaces, dashes and parentheses are ignored; what remains must be an
/// optional `+` followed by 1 to 16 digits not starting with zero.
#[must_use]
pub fn is_plausible_phone(phone: &str) -> bool {
    let compact: String = phone
        .chars()
        .filter(|c| !c.is_whitespace() && !matches!(c, '-' | '(' | ')'))
        .collect();
    PHONE_PATTERN.is_match(&compact)
}

fn required(field: &'static str, value: &Option<String>) -> ValidationResult<String> {
    value
        .as_deref()
        .map(str::trim)
        .filter(|v| !v.is_empty())
        .map(str::to_string)
        .ok_or(ValidationError::MissingField(field))
}
