//! # Quote Submission
//!
//! The full life of one quote request:
//!
//! ```text
//! Received ─► Validated ─► Delivered ──────────────────────────► Responded
//!     │                └─► DeliveryFailed ─► Recorded ─────────► Responded
//!     │                                    └─► RecordFailed ──► Responded
//!     └─► Rejected ─────────────────────────────────────────────► Responded
//! ```
//!
//! A booking ID is issued only once the request has been validated. Every
//! accepted request gets exactly one [`SubmissionOutcome`]; the service
//! itself never returns an error.
//!
//! # Examples
//!
//! ```ignore
//! let outcome = service.submit(&request).await;
//! if outcome.is_fallback_mode() {
//!     println!("{} saved for manual follow-up", outcome.booking_id().unwrap());
//! }
//! ```

use crate::application::services::fallback_recorder::FallbackRecorder;
use crate::domain::entities::QuoteRequest;
use crate::domain::errors::ValidationError;
use crate::domain::services::{NotificationComposer, is_plausible_phone, validate};
use crate::domain::value_objects::{BookingId, BookingIdGenerator, BusinessProfile};
use crate::infrastructure::mail::{DeliveryError, DeliveryReceipt, DeliveryService};
use crate::infrastructure::persistence::RecordError;
use std::sync::Arc;
use tracing::{info, warn};

const DELIVERED_MESSAGE: &str =
    "Quote request sent successfully! We will contact you within 24 hours.";
const RECORDED_MESSAGE: &str =
    "Quote request received successfully! We will contact you within 24 hours.";
const FAILED_MESSAGE: &str = "Failed to send quote request.";

/// How a submission ended.
#[derive(Debug)]
pub enum SubmissionOutcome {
    /// The request failed validation. No booking ID was issued.
    Rejected(ValidationError),

    /// Both emails were accepted by the provider.
    Delivered {
        /// Issued booking ID.
        booking_id: BookingId,
        /// Provider receipts.
        receipt: DeliveryReceipt,
    },

    /// Delivery failed but the request was saved for manual follow-up.
    RecordedForFollowUp {
        /// Issued booking ID.
        booking_id: BookingId,
        /// Why delivery failed.
        delivery_error: DeliveryError,
    },

    /// Delivery failed and the request could not be saved either.
    Failed {
        /// Issued booking ID.
        booking_id: BookingId,
        /// Why delivery failed.
        delivery_error: DeliveryError,
        /// Why recording failed.
        record_error: RecordError,
    },
}

impl SubmissionOutcome {
    /// Returns the booking ID, if one was issued.
    #[must_use]
    pub fn booking_id(&self) -> Option<&BookingId> {
        match self {
            Self::Rejected(_) => None,
            Self::Delivered { booking_id, .. }
            | Self::RecordedForFollowUp { booking_id, .. }
            | Self::Failed { booking_id, .. } => Some(booking_id),
        }
    }

    /// Returns true if the customer should be told the request went through.
    #[must_use]
    pub fn is_success(&self) -> bool {
        matches!(
            self,
            Self::Delivered { .. } | Self::RecordedForFollowUp { .. }
        )
    }

    /// Returns true if the request was saved instead of emailed.
    #[must_use]
    pub fn is_fallback_mode(&self) -> bool {
        matches!(self, Self::RecordedForFollowUp { .. })
    }

    /// Returns true if the request was rejected by validation.
    #[must_use]
    pub fn is_rejected(&self) -> bool {
        matches!(self, Self::Rejected(_))
    }

    /// Returns the category code when the submission failed outright.
    #[must_use]
    pub fn error_code(&self) -> Option<&'static str> {
        match self {
            Self::Failed { delivery_error, .. } => Some(delivery_error.error_code()),
            _ => None,
        }
    }

    /// Message shown to the customer.
    ///
    /// Every non-success message after acceptance carries the business phone.
    #[must_use]
    pub fn user_message(&self, profile: &BusinessProfile) -> String {
        match self {
            Self::Rejected(e) => e.to_string(),
            Self::Delivered { .. } => DELIVERED_MESSAGE.to_string(),
            Self::RecordedForFollowUp { .. } => {
                format!("{RECORDED_MESSAGE} If urgent, please call {}.", profile.phone)
            }
            Self::Failed { delivery_error, .. } => format!(
                "{FAILED_MESSAGE} {} Phone: {}",
                delivery_error.kind().customer_hint(),
                profile.phone
            ),
        }
    }
}

/// Runs quote requests through validation, delivery and the fallback store.
#[derive(Debug)]
pub struct QuoteSubmissionService {
    ids: BookingIdGenerator,
    composer: NotificationComposer,
    delivery: Arc<DeliveryService>,
    recorder: FallbackRecorder,
}

impl QuoteSubmissionService {
    /// Creates the service.
    #[must_use]
    pub fn new(
        ids: BookingIdGenerator,
        composer: NotificationComposer,
        delivery: Arc<DeliveryService>,
        recorder: FallbackRecorder,
    ) -> Self {
        Self {
            ids,
            composer,
            delivery,
            recorder,
        }
    }

    /// Returns the business profile used in customer-facing messages.
    #[must_use]
    pub fn profile(&self) -> &BusinessProfile {
        self.composer.profile()
    }

    /// Handles one submitted form.
    pub async fn submit(&self, form: &QuoteRequest) -> SubmissionOutcome {
        let request = match validate(form) {
            Ok(request) => request,
            Err(e) => {
                info!(error = %e, "quote request rejected");
                return SubmissionOutcome::Rejected(e);
            }
        };

        if !is_plausible_phone(request.phone()) {
            warn!(phone = request.phone(), "phone number looks unusual, accepting anyway");
        }

        let booking_id = self.ids.generate();
        info!(
            booking_id = %booking_id,
            customer = request.full_name(),
            vehicle = request.vehicle_type(),
            "quote request accepted"
        );

        let pair = self.composer.compose(&request, &booking_id);

        let delivery_error = match self.delivery.deliver(&pair).await {
            Ok(receipt) => {
                info!(
                    booking_id = %booking_id,
                    strategy = %receipt.transport,
                    business_message_id = %receipt.business.message_id,
                    customer_message_id = %receipt.customer.message_id,
                    "quote request emailed"
                );
                return SubmissionOutcome::Delivered {
                    booking_id,
                    receipt,
                };
            }
            Err(e) => e,
        };

        warn!(
            booking_id = %booking_id,
            error = %delivery_error,
            code = delivery_error.error_code(),
            "email delivery failed, saving for manual processing"
        );

        match self
            .recorder
            .record(&booking_id, &request, &delivery_error)
            .await
        {
            Ok(_) => SubmissionOutcome::RecordedForFollowUp {
                booking_id,
                delivery_error,
            },
            Err(record_error) => SubmissionOutcome::Failed {
                booking_id,
                delivery_error,
                record_error,
            },
        }
    }
}
