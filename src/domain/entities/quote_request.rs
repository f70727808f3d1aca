//! # Quote Requests
//!
//! The quote form as submitted ([`QuoteRequest`]) and as accepted
//! ([`ValidatedQuoteRequest`]).
//!
//! Field names on the wire are camelCase and match the website form.
//! Submissions are lenient about JSON types: numbers and booleans are taken
//! as their text, `null` counts as absent. Whether a value is usable is
//! decided by the validator, not by deserialization.
//!
//! # Examples
//!
//! ```
//! use limo_quote::domain::entities::QuoteRequest;
//!
//! let request: QuoteRequest = serde_json::from_str(
//!     r#"{"fullName": "Jane Doe", "numPassengers": 2}"#,
//! ).unwrap();
//! assert_eq!(request.full_name.as_deref(), Some("Jane Doe"));
//! assert_eq!(request.num_passengers.as_deref(), Some("2"));
//! assert!(request.email.is_none());
//! ```

use serde::{Deserialize, Deserializer, Serialize};

/// A quote request exactly as received.
///
/// Every field is optional here; [`validate`](crate::domain::services::validator::validate)
/// turns it into a [`ValidatedQuoteRequest`].
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct QuoteRequest {
    /// Customer's full name.
    #[serde(default, deserialize_with = "lenient_text")]
    pub full_name: Option<String>,
    /// Customer's email address.
    #[serde(default, deserialize_with = "lenient_text")]
    pub email: Option<String>,
    /// Customer's phone number.
    #[serde(default, deserialize_with = "lenient_text")]
    pub phone: Option<String>,
    /// Number of passengers.
    #[serde(default, deserialize_with = "lenient_text")]
    pub num_passengers: Option<String>,
    /// Pickup address.
    #[serde(default, deserialize_with = "lenient_text")]
    pub pickup_location: Option<String>,
    /// Drop-off address.
    #[serde(default, deserialize_with = "lenient_text")]
    pub drop_location: Option<String>,
    /// Pickup date, usually `YYYY-MM-DD`.
    #[serde(default, deserialize_with = "lenient_text")]
    pub pickup_date: Option<String>,
    /// Pickup time, usually `HH:MM`.
    #[serde(default, deserialize_with = "lenient_text")]
    pub pickup_time: Option<String>,
    /// State of service.
    #[serde(default, deserialize_with = "lenient_text")]
    pub state: Option<String>,
    /// City of service.
    #[serde(default, deserialize_with = "lenient_text")]
    pub city: Option<String>,
    /// One-way, round trip, hourly...
    #[serde(default, deserialize_with = "lenient_text")]
    pub trip_type: Option<String>,
    /// Requested vehicle class.
    #[serde(default, deserialize_with = "lenient_text")]
    pub vehicle_type: Option<String>,
    /// Free-form notes.
    #[serde(default, deserialize_with = "lenient_text")]
    pub special_requests: Option<String>,
}

/// A quote request that passed validation.
///
/// All required fields are trimmed and non-empty, the email is well formed.
/// Only the validator constructs it from untrusted input; deserialization is
/// kept for reading the fallback store back.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ValidatedQuoteRequest {
    pub(crate) full_name: String,
    pub(crate) email: String,
    pub(crate) phone: String,
    pub(crate) num_passengers: String,
    pub(crate) pickup_location: String,
    pub(crate) drop_location: String,
    pub(crate) pickup_date: String,
    pub(crate) pickup_time: String,
    pub(crate) state: String,
    pub(crate) city: String,
    pub(crate) trip_type: String,
    pub(crate) vehicle_type: String,
    #[serde(default)]
    pub(crate) special_requests: String,
}

impl ValidatedQuoteRequest {
    /// Customer's full name.
    #[must_use]
    pub fn full_name(&self) -> &str {
        &self.full_name
    }

    /// Customer's email address.
    #[must_use]
    pub fn email(&self) -> &str {
        &self.email
    }

    /// Customer's phone number.
    #[must_use]
    pub fn phone(&self) -> &str {
        &self.phone
    }

    /// Number of passengers as entered.
    #[must_use]
    pub fn num_passengers(&self) -> &str {
        &self.num_passengers
    }

    /// Number of passengers, if it parses as a whole number.
    #[must_use]
    pub fn passenger_count(&self) -> Option<u32> {
        self.num_passengers.parse().ok()
    }

    /// Pickup address.
    #[must_use]
    pub fn pickup_location(&self) -> &str {
        &self.pickup_location
    }

    /// Drop-off address.
    #[must_use]
    pub fn drop_location(&self) -> &str {
        &self.drop_location
    }

    /// Pickup date as entered.
    #[must_use]
    pub fn pickup_date(&self) -> &str {
        &self.pickup_date
    }

    /// Pickup time as entered.
    #[must_use]
    pub fn pickup_time(&self) -> &str {
        &self.pickup_time
    }

    /// State of service.
    #[must_use]
    pub fn state(&self) -> &str {
        &self.state
    }

    /// City of service.
    #[must_use]
    pub fn city(&self) -> &str {
        &self.city
    }

    /// Trip type.
    #[must_use]
    pub fn trip_type(&self) -> &str {
        &self.trip_type
    }

    /// Vehicle class.
    #[must_use]
    pub fn vehicle_type(&self) -> &str {
        &self.vehicle_type
    }

    /// Special requests; empty when none were given.
    #[must_use]
    pub fn special_requests(&self) -> &str {
        &self.special_requests
    }

    /// Returns true if the customer left special requests.
    #[must_use]
    pub fn has_special_requests(&self) -> bool {
        !self.special_requests.is_empty()
    }
}

fn lenient_text<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<serde_json::Value>::deserialize(deserializer)?;
    Ok(match value {
        None | Some(serde_json::Value::Null) => None,
        Some(serde_json::Value::String(s)) => Some(s),
        Some(serde_json::Value::Number(n)) => Some(n.to_string()),
        Some(serde_json::Value::Bool(b)) => Some(b.to_string()),
        // Arrays and objects carry no usable text; treat as blank.
        Some(_) => Some(String::new()),
    })
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::domain::entities::fixtures::jane_doe;
    use serde_json::json;

    #[test]
    fn deserializes_camel_case_fields() {
        let request: QuoteRequest = serde_json::from_value(json!({
            "fullName": "Jane Doe",
            "pickupLocation": "123 Main St",
            "dropLocation": "Airport",
            "specialRequests": "Child seat"
        }))
        .unwrap();

        assert_eq!(request.full_name.as_deref(), Some("Jane Doe"));
        assert_eq!(request.pickup_location.as_deref(), Some("123 Main St"));
        assert_eq!(request.drop_location.as_deref(), Some("Airport"));
        assert_eq!(request.special_requests.as_deref(), Some("Child seat"));
        assert!(request.phone.is_none());
    }

    #[test]
    fn numbers_and_nulls_are_lenient() {
        let request: QuoteRequest = serde_json::from_value(json!({
            "numPassengers": 4,
            "phone": null,
            "city": ["not", "text"]
        }))
        .unwrap();

        assert_eq!(request.num_passengers.as_deref(), Some("4"));
        assert!(request.phone.is_none());
        assert_eq!(request.city.as_deref(), Some(""));
    }

    #[test]
    fn unknown_fields_are_ignored() {
        let request: QuoteRequest =
            serde_json::from_value(json!({"fullName": "A", "honeypot": "x"})).unwrap();
        assert_eq!(request.full_name.as_deref(), Some("A"));
    }

    #[test]
    fn passenger_count_parses_when_numeric() {
        let mut request = jane_doe();
        assert_eq!(request.passenger_count(), Some(2));

        request.num_passengers = "two".to_string();
        assert_eq!(request.passenger_count(), None);
    }

    #[test]
    fn validated_request_serializes_camel_case() {
        let value = serde_json::to_value(jane_doe()).unwrap();
        assert_eq!(value["fullName"], "Jane Doe");
        assert_eq!(value["vehicleType"], "Sedan");
        assert_eq!(value["specialRequests"], "");
    }
}
