//! # Fallback Recorder
//!
//! Captures an accepted request whose emails could not be delivered, so the
//! operator can follow up by hand.

use crate::domain::entities::{FallbackRecord, ValidatedQuoteRequest};
use crate::domain::value_objects::BookingId;
use crate::infrastructure::mail::DeliveryError;
use crate::infrastructure::persistence::{FallbackStore, RecordResult};
use std::sync::Arc;
use tracing::{error, info};

/// Writes [`FallbackRecord`]s to a [`FallbackStore`].
#[derive(Debug, Clone)]
pub struct FallbackRecorder {
    store: Arc<dyn FallbackStore>,
}

impl FallbackRecorder {
    /// Creates a recorder over the given store.
    #[must_use]
    pub fn new(store: Arc<dyn FallbackStore>) -> Self {
        Self { store }
    }

    /// Returns the underlying store.
    #[must_use]
    pub fn store(&self) -> &Arc<dyn FallbackStore> {
        &self.store
    }

    /// Appends one record for the request.
    ///
    /// # Errors
    ///
    /// Returns `RecordError::StorageUnavailable` if the store rejected the write.
    pub async fn record(
        &self,
        booking_id: &BookingId,
        request: &ValidatedQuoteRequest,
        delivery_error: &DeliveryError,
    ) -> RecordResult<FallbackRecord> {
        let record = FallbackRecord::new(
            booking_id.clone(),
            request.clone(),
            delivery_error.to_failure(),
        );

        match self.store.append(&record).await {
            Ok(()) => {
                info!(booking_id = %booking_id, "quote request saved for manual processing");
                Ok(record)
            }
            Err(e) => {
                error!(booking_id = %booking_id, error = %e, "fallback save failed");
                Err(e)
            }
        }
    }
}
