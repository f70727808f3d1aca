//! # limo-quote
//!
//! Quote-request intake for EZ Airport Limo.
//!
//! A single HTTP endpoint accepts the website's quote form, validates it,
//! assigns a booking ID, emails the operator and the customer, and when email
//! delivery fails captures the request in a durable fallback store for manual
//! follow-up.
//!
//! # Architecture
//!
//! ```text
//! api::rest            HTTP boundary (axum)
//!   └─ application     QuoteSubmissionService (one request, one outcome)
//!        ├─ domain     validation, booking IDs, notification templates
//!        └─ infrastructure
//!             ├─ mail         SMTP delivery with an ordered transport chain
//!             └─ persistence  append-only fallback store
//! ```
//!
//! # Examples
//!
//! ```ignore
//! use limo_quote::config::Settings;
//! use limo_quote::api::rest::{create_router, AppState};
//!
//! let settings = Settings::load(None)?;
//! let state = AppState::from_settings(&settings)?;
//! let listener = tokio::net::TcpListener::bind(settings.bind_address()).await?;
//! axum::serve(listener, create_router(state)).await?;
//! ```

pub mod api;
pub mod application;
pub mod config;
pub mod domain;
pub mod infrastructure;
pub mod telemetry;

pub use application::services::{QuoteSubmissionService, SubmissionOutcome};
pub use config::Settings;
pub use domain::entities::{FallbackRecord, QuoteRequest, ValidatedQuoteRequest};
pub use domain::errors::ValidationError;
pub use domain::value_objects::BookingId;
