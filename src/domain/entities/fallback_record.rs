//! # Fallback Records
//!
//! What gets written to the pending-quotes store when email delivery fails.
//! Records are append-only; the operator processes them by hand.
//!
//! # Example store entry
//!
//! ```json
//! {
//!   "bookingId": "EZL-1748786400000-42",
//!   "receivedAt": "2025-06-01T14:00:00.123Z",
//!   "request": { "fullName": "Jane Doe", "email": "jane@x.com", "...": "..." },
//!   "deliveryError": { "message": "connection refused", "code": "NETWORK_UNREACHABLE" }
//! }
//! ```

use crate::domain::entities::quote_request::ValidatedQuoteRequest;
use crate::domain::value_objects::{BookingId, Timestamp};
use serde::{Deserialize, Serialize};

/// Why delivery failed, as persisted alongside the request.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DeliveryFailure {
    /// Provider diagnostic.
    pub message: String,
    /// Provider or category code.
    pub code: String,
}

impl DeliveryFailure {
    /// Creates a delivery failure entry.
    #[must_use]
    pub fn new(message: impl Into<String>, code: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            code: code.into(),
        }
    }
}

/// One request captured for manual follow-up.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FallbackRecord {
    /// Booking ID that was reported to the customer.
    pub booking_id: BookingId,
    /// When the record was captured.
    pub received_at: Timestamp,
    /// The accepted request.
    pub request: ValidatedQuoteRequest,
    /// Why email delivery failed.
    pub delivery_error: DeliveryFailure,
}

impl FallbackRecord {
    /// Creates a record stamped with the current time.
    #[must_use]
    pub fn new(
        booking_id: BookingId,
        request: ValidatedQuoteRequest,
        delivery_error: DeliveryFailure,
    ) -> Self {
        Self {
            booking_id,
            received_at: Timestamp::now(),
            request,
            delivery_error,
        }
    }
}
