//! # Domain Services
//!
//! - [`validator`]: acceptance rules for the quote form
//! - [`notification_composer`]: operator and customer message templates

pub mod notification_composer;
pub mod validator;

pub use notification_composer::NotificationComposer;
pub use validator::{REQUIRED_FIELDS, is_plausible_phone, is_valid_email, validate};
