//! # Domain Entities
//!
//! - [`QuoteRequest`] / [`ValidatedQuoteRequest`]: the quote form before and after validation
//! - [`NotificationPair`]: rendered operator and customer messages
//! - [`FallbackRecord`]: a request captured after failed delivery

pub mod fallback_record;
pub mod notification;
pub mod quote_request;

pub use fallback_record::{DeliveryFailure, FallbackRecord};
pub use notification::{MessagePriority, Notification, NotificationPair, RecipientRole};
pub use quote_request::{QuoteRequest, ValidatedQuoteRequest};
