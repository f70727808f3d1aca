//! # Notifications
//!
//! Rendered messages ready for delivery. A [`NotificationPair`] always holds
//! one message for the operator and one confirmation for the customer.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Who a notification is addressed to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RecipientRole {
    /// The operator mailbox.
    Business,
    /// The customer who submitted the form.
    Customer,
}

impl fmt::Display for RecipientRole {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Business => write!(f, "business"),
            Self::Customer => write!(f, "customer"),
        }
    }
}

/// Delivery priority hint passed to the mail provider.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MessagePriority {
    /// Flagged as urgent in the recipient's client.
    High,
    /// No priority header.
    #[default]
    Normal,
}

impl MessagePriority {
    /// Value for the `X-Priority` header, if any.
    #[must_use]
    pub fn x_priority(&self) -> Option<&'static str> {
        match self {
            Self::High => Some("1 (Highest)"),
            Self::Normal => None,
        }
    }
}

/// A single rendered message.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notification {
    /// Intended audience.
    pub role: RecipientRole,
    /// Destination address.
    pub to: String,
    /// Display name used in the `From` header.
    pub sender_name: String,
    /// Subject line.
    pub subject: String,
    /// HTML body.
    pub html_body: String,
    /// Delivery priority.
    pub priority: MessagePriority,
}

/// The two messages produced for every accepted request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NotificationPair {
    /// Message for the operator.
    pub business: Notification,
    /// Confirmation for the customer.
    pub customer: Notification,
}

impl NotificationPair {
    /// Returns both messages, operator first.
    #[must_use]
    pub fn in_send_order(&self) -> [&Notification; 2] {
        [&self.business, &self.customer]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn only_high_priority_sets_header() {
        assert_eq!(MessagePriority::High.x_priority(), Some("1 (Highest)"));
        assert_eq!(MessagePriority::Normal.x_priority(), None);
    }

    #[test]
    fn role_display() {
        assert_eq!(RecipientRole::Business.to_string(), "business");
        assert_eq!(RecipientRole::Customer.to_string(), "customer");
    }
}
