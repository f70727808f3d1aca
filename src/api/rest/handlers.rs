//! # REST Handlers
//!
//! Request handlers and response types for the quote endpoint.

use crate::application::error::ApplicationResult;
use crate::application::services::{FallbackRecorder, QuoteSubmissionService, SubmissionOutcome};
use crate::config::Settings;
use crate::domain::entities::QuoteRequest;
use crate::domain::services::NotificationComposer;
use crate::domain::value_objects::BookingIdGenerator;
use crate::infrastructure::mail::DeliveryService;
use crate::infrastructure::persistence::JsonFileFallbackStore;
use axum::body::Bytes;
use axum::extract::State;
use axum::http::{HeaderValue, StatusCode, header};
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tracing::{error, warn};

/// Methods accepted on the quote endpoint.
pub const ALLOWED_METHODS: &str = "POST, OPTIONS";

/// Application state shared across handlers.
#[derive(Debug, Clone)]
pub struct AppState {
    /// The submission use case.
    pub submissions: Arc<QuoteSubmissionService>,
}

impl AppState {
    /// Wraps an already assembled service.
    #[must_use]
    pub fn new(submissions: QuoteSubmissionService) -> Self {
        Self {
            submissions: Arc::new(submissions),
        }
    }

    /// Assembles the production service from settings.
    ///
    /// # Errors
    ///
    /// Returns an error if the mail transports cannot be created.
    pub fn from_settings(settings: &Settings) -> ApplicationResult<Self> {
        let delivery = DeliveryService::from_config(&settings.mail)?;
        let store = JsonFileFallbackStore::new(settings.storage.fallback_path.clone());

        Ok(Self::new(QuoteSubmissionService::new(
            BookingIdGenerator::new(settings.booking.id_prefix.clone()),
            NotificationComposer::new(
                settings.business.clone(),
                settings.mail.business_mailbox.clone(),
            ),
            Arc::new(delivery),
            FallbackRecorder::new(Arc::new(store)),
        )))
    }
}

/// Body of every quote endpoint response.
///
/// Absent keys are omitted from the JSON.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct QuoteResponse {
    /// Whether the customer should consider the request received.
    pub success: bool,
    /// Message shown to the customer.
    pub message: String,
    /// Issued booking ID.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub booking_id: Option<String>,
    /// Set when the request was saved instead of emailed.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub fallback_mode: Option<bool>,
    /// Failure category when the request could not be handled.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error_code: Option<String>,
}

impl QuoteResponse {
    /// A failure response carrying only a message.
    #[must_use]
    pub fn failure(message: impl Into<String>) -> Self {
        Self {
            success: false,
            message: message.into(),
            booking_id: None,
            fallback_mode: None,
            error_code: None,
        }
    }

    /// Builds the response and status code for a submission outcome.
    #[must_use]
    pub fn from_outcome(outcome: &SubmissionOutcome, state: &AppState) -> (StatusCode, Self) {
        let message = outcome.user_message(state.submissions.profile());
        let booking_id = outcome.booking_id().map(ToString::to_string);

        match outcome {
            SubmissionOutcome::Rejected(_) => (StatusCode::BAD_REQUEST, Self::failure(message)),
            SubmissionOutcome::Delivered { .. } => (
                StatusCode::OK,
                Self {
                    success: true,
                    message,
                    booking_id,
                    fallback_mode: None,
                    error_code: None,
                },
            ),
            SubmissionOutcome::RecordedForFollowUp { .. } => (
                StatusCode::OK,
                Self {
                    success: true,
                    message,
                    booking_id,
                    fallback_mode: Some(true),
                    error_code: None,
                },
            ),
            SubmissionOutcome::Failed { .. } => (
                StatusCode::INTERNAL_SERVER_ERROR,
                Self {
                    success: false,
                    message,
                    booking_id: None,
                    fallback_mode: None,
                    error_code: outcome.error_code().map(str::to_string),
                },
            ),
        }
    }
}

/// Health check endpoint.
pub async fn health() -> &'static str {
    "OK"
}

/// `POST /api/send-quote`
///
/// The body is parsed leniently: the content type is not checked and
/// non-string scalars are accepted as text.
pub async fn send_quote(State(state): State<AppState>, body: Bytes) -> Response {
    let form: QuoteRequest = match serde_json::from_slice(&body) {
        Ok(form) => form,
        Err(e) => {
            warn!(error = %e, "quote request body is not valid JSON");
            return (
                StatusCode::BAD_REQUEST,
                Json(QuoteResponse::failure("Invalid request body: expected a JSON object")),
            )
                .into_response();
        }
    };

    let outcome = state.submissions.submit(&form).await;
    if let SubmissionOutcome::Failed {
        booking_id,
        record_error,
        ..
    } = &outcome
    {
        error!(
            booking_id = %booking_id,
            error = %record_error,
            "quote request lost: neither emailed nor saved"
        );
    }

    let (status, response) = QuoteResponse::from_outcome(&outcome, &state);
    (status, Json(response)).into_response()
}

/// Any other method on the quote endpoint.
pub async fn method_not_allowed() -> Response {
    (
        StatusCode::METHOD_NOT_ALLOWED,
        [(header::ALLOW, HeaderValue::from_static(ALLOWED_METHODS))],
        Json(QuoteResponse::failure("Method not allowed")),
    )
        .into_response()
}
