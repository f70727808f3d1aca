//! # Mail Delivery
//!
//! Outbound email for quote requests.
//!
//! - [`config`]: provider settings
//! - [`error`]: delivery error taxonomy and classification
//! - [`traits`]: transport and strategy ports
//! - [`oauth`]: refresh-token exchange
//! - [`smtp`]: lettre transports and strategies
//! - [`delivery`]: the ordered strategy chain

pub mod config;
pub mod delivery;
pub mod error;
pub mod oauth;
pub mod smtp;
pub mod traits;

pub use config::{MailConfig, OAuth2Config, OAuth2Credentials};
pub use delivery::DeliveryService;
pub use error::{DeliveryError, DeliveryErrorKind, DeliveryResult};
pub use smtp::{AppPasswordStrategy, OAuth2Strategy, SmtpMailTransport};
pub use traits::{DeliveryReceipt, MailTransport, MessageReceipt, TransportStrategy};
