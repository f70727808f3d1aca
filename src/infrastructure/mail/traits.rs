//! # Mail Transport Traits
//!
//! Port definitions for outbound mail.
//!
//! - [`MailTransport`]: an established, authenticated connection to the
//!   provider that can verify itself and send one message at a time
//! - [`TransportStrategy`]: one way of establishing a [`MailTransport`]
//!   (for example XOAUTH2 or an app password)
//!
//! The delivery service tries strategies in order and uses the first whose
//! setup succeeds.
//!
//! # Examples
//!
//! ```ignore
//! use limo_quote::infrastructure::mail::traits::{MailTransport, TransportStrategy};
//!
//! struct LocalRelay;
//!
//! #[async_trait::async_trait]
//! impl TransportStrategy for LocalRelay {
//!     fn name(&self) -> &'static str { "local-relay" }
//!     async fn connect(&self) -> DeliveryResult<Arc<dyn MailTransport>> { /* ... */ }
//! }
//! ```

use crate::domain::entities::{Notification, RecipientRole};
use crate::infrastructure::mail::error::DeliveryResult;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::sync::Arc;

/// Proof that one message was accepted by the provider.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MessageReceipt {
    /// Audience of the message.
    pub role: RecipientRole,
    /// `Message-ID` assigned to the message.
    pub message_id: String,
}

/// Proof that both messages of a pair were accepted.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DeliveryReceipt {
    /// Strategy whose transport carried the messages.
    pub transport: String,
    /// Receipt for the operator notification.
    pub business: MessageReceipt,
    /// Receipt for the customer confirmation.
    pub customer: MessageReceipt,
}

/// An established connection to the mail provider.
#[async_trait]
pub trait MailTransport: Send + Sync + fmt::Debug {
    /// Checks that the provider accepts our connection and credentials.
    ///
    /// # Errors
    ///
    /// Returns a `DeliveryError` describing why the provider is unusable.
    async fn verify(&self) -> DeliveryResult<()>;

    /// Sends one message.
    ///
    /// # Errors
    ///
    /// Returns a `DeliveryError` if the provider did not accept the message.
    async fn send(&self, notification: &Notification) -> DeliveryResult<MessageReceipt>;
}

/// One way of establishing a [`MailTransport`].
#[async_trait]
pub trait TransportStrategy: Send + Sync + fmt::Debug {
    /// Short name used in logs and receipts.
    fn name(&self) -> &'static str;

    /// Performs credential exchange and builds a transport.
    ///
    /// The returned transport has not been verified yet.
    ///
    /// # Errors
    ///
    /// Returns a `DeliveryError` if credentials are missing or rejected, or
    /// the transport cannot be built.
    async fn connect(&self) -> DeliveryResult<Arc<dyn MailTransport>>;
}
