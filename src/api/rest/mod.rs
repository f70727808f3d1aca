//! # REST API
//!
//! HTTP surface of the quote service, built on axum.
//!
//! # Endpoints
//!
//! - `POST /api/send-quote` - Submit a quote request
//! - `OPTIONS /api/send-quote` - CORS preflight
//! - any other method on `/api/send-quote` - 405
//! - `GET /health` - Liveness probe
//!
//! # Status codes
//!
//! | Outcome                              | Status |
//! |--------------------------------------|--------|
//! | Validation failure or malformed JSON | 400    |
//! | Emailed                              | 200    |
//! | Saved for manual follow-up           | 200    |
//! | Neither emailed nor saved            | 500    |
//!
//! # Usage
//!
//! ```ignore
//! use limo_quote::api::rest::{create_router, AppState};
//!
//! let state = AppState::from_settings(&settings)?;
//! let router = create_router(state);
//!
//! let listener = tokio::net::TcpListener::bind(settings.bind_address()).await?;
//! axum::serve(listener, router).await?;
//! ```

pub mod handlers;
pub mod routes;

pub use handlers::{AppState, QuoteResponse};
pub use routes::{SEND_QUOTE_PATH, create_router};
