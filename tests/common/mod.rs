//! Shared helpers for integration tests.

#![allow(dead_code, clippy::unwrap_used)]

use async_trait::async_trait;
use axum::Router;
use axum::body::Body;
use axum::http::{Request, StatusCode};
use limo_quote::api::rest::{AppState, create_router};
use limo_quote::application::services::{FallbackRecorder, QuoteSubmissionService};
use limo_quote::domain::entities::Notification;
use limo_quote::domain::services::NotificationComposer;
use limo_quote::domain::value_objects::{BookingIdGenerator, BusinessProfile};
use limo_quote::infrastructure::mail::{
    DeliveryError, DeliveryResult, DeliveryService, MailTransport, MessageReceipt,
    TransportStrategy,
};
use limo_quote::infrastructure::persistence::FallbackStore;
use serde_json::{Value, json};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;
use tower::ServiceExt;

/// Mailbox that receives operator notifications in tests.
pub const OPERATOR_MAILBOX: &str = "ops@ezairportlimo.com";

/// Transport that records every message it is asked to send.
#[derive(Debug, Default)]
pub struct CapturingTransport {
    pub sent: Mutex<Vec<Notification>>,
}

#[async_trait]
impl MailTransport for CapturingTransport {
    async fn verify(&self) -> DeliveryResult<()> {
        Ok(())
    }

    async fn send(&self, notification: &Notification) -> DeliveryResult<MessageReceipt> {
        self.sent.lock().unwrap().push(notification.clone());
        Ok(MessageReceipt {
            role: notification.role,
            message_id: format!("<{}@test>", notification.role),
        })
    }
}

/// Strategy that either hands out a [`CapturingTransport`] or fails setup.
#[derive(Debug)]
pub struct TestStrategy {
    pub transport: Arc<CapturingTransport>,
    failure: Option<DeliveryError>,
    pub connects: AtomicUsize,
}

impl TestStrategy {
    pub fn working() -> Arc<Self> {
        Arc::new(Self {
            transport: Arc::new(CapturingTransport::default()),
            failure: None,
            connects: AtomicUsize::new(0),
        })
    }

    pub fn failing(error: DeliveryError) -> Arc<Self> {
        Arc::new(Self {
            transport: Arc::new(CapturingTransport::default()),
            failure: Some(error),
            connects: AtomicUsize::new(0),
        })
    }

    pub fn connects(&self) -> usize {
        self.connects.load(Ordering::SeqCst)
    }

    pub fn sent(&self) -> Vec<Notification> {
        self.transport.sent.lock().unwrap().clone()
    }
}

#[async_trait]
impl TransportStrategy for TestStrategy {
    fn name(&self) -> &'static str {
        "test"
    }

    async fn connect(&self) -> DeliveryResult<Arc<dyn MailTransport>> {
        self.connects.fetch_add(1, Ordering::SeqCst);
        match &self.failure {
            Some(e) => Err(e.clone()),
            None => Ok(self.transport.clone() as Arc<dyn MailTransport>),
        }
    }
}

/// Builds the router over the given strategy and store.
pub fn app(strategy: Arc<TestStrategy>, store: Arc<dyn FallbackStore>) -> Router {
    let delivery = DeliveryService::new(
        vec![strategy as Arc<dyn TransportStrategy>],
        Duration::from_secs(2),
        Duration::from_secs(2),
    );
    let service = QuoteSubmissionService::new(
        BookingIdGenerator::default(),
        NotificationComposer::new(BusinessProfile::default(), OPERATOR_MAILBOX),
        Arc::new(delivery),
        FallbackRecorder::new(store),
    );
    create_router(AppState::new(service))
}

/// The reference submission.
pub fn jane_doe() -> Value {
    json!({
        "fullName": "Jane Doe",
        "email": "jane@x.com",
        "phone": "+12025551234",
        "numPassengers": "2",
        "pickupLocation": "123 Main St",
        "dropLocation": "Airport",
        "pickupDate": "2025-06-01",
        "pickupTime": "14:00",
        "state": "MD",
        "city": "Rockville",
        "tripType": "One-way",
        "vehicleType": "Sedan"
    })
}

/// Sends a request and returns the status and the parsed JSON body
/// (`Value::Null` for an empty body).
pub async fn send(app: Router, method: &str, uri: &str, body: Body) -> (StatusCode, Value) {
    let response = app
        .oneshot(
            Request::builder()
                .method(method)
                .uri(uri)
                .header("content-type", "application/json")
                .body(body)
                .unwrap(),
        )
        .await
        .unwrap();

    let status = response.status();
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    let json = if bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&bytes).unwrap()
    };
    (status, json)
}

/// Posts a JSON body to the quote endpoint.
pub async fn post_quote(app: Router, body: &Value) -> (StatusCode, Value) {
    send(app, "POST", "/api/send-quote", Body::from(body.to_string())).await
}
