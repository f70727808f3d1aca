//! # Mail Configuration
//!
//! Provider settings injected into the delivery service.
//!
//! # Examples
//!
//! ```
//! use limo_quote::infrastructure::mail::config::MailConfig;
//!
//! let config = MailConfig::default()
//!     .with_sender("reservation@ezairportlimo.com")
//!     .with_app_password("abcd efgh ijkl mnop");
//! assert_eq!(config.smtp_port, 587);
//! assert!(config.app_password.is_some());
//! assert!(!format!("{config:?}").contains("abcd"));
//! ```

use serde::{Deserialize, Serialize};
use std::fmt;
use std::time::Duration;

/// Default SMTP relay.
const DEFAULT_SMTP_HOST: &str = "smtp.gmail.com";

/// Default submission port (STARTTLS).
const DEFAULT_SMTP_PORT: u16 = 587;

/// Default mailbox used both as sender and as operator inbox.
const DEFAULT_MAILBOX: &str = "reservation@ezairportlimo.com";

/// Google's OAuth2 token endpoint.
const DEFAULT_TOKEN_URL: &str = "https://oauth2.googleapis.com/token";

/// Default deadline for transport setup, in milliseconds.
const DEFAULT_CONNECT_TIMEOUT_MS: u64 = 10_000;

/// Default deadline for each send, in milliseconds.
const DEFAULT_SEND_TIMEOUT_MS: u64 = 15_000;

/// OAuth2 client credentials for XOAUTH2 login.
#[derive(Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct OAuth2Config {
    /// OAuth2 client ID.
    pub client_id: Option<String>,
    /// OAuth2 client secret.
    pub client_secret: Option<String>,
    /// Long-lived refresh token.
    pub refresh_token: Option<String>,
    /// Token endpoint used to exchange the refresh token.
    pub token_url: String,
}

impl OAuth2Config {
    /// Returns the credentials if all three parts are configured.
    #[must_use]
    pub fn credentials(&self) -> Option<OAuth2Credentials> {
        Some(OAuth2Credentials {
            client_id: non_blank(self.client_id.as_deref())?.to_string(),
            client_secret: non_blank(self.client_secret.as_deref())?.to_string(),
            refresh_token: non_blank(self.refresh_token.as_deref())?.to_string(),
        })
    }
}

impl Default for OAuth2Config {
    fn default() -> Self {
        Self {
            client_id: None,
            client_secret: None,
            refresh_token: None,
            token_url: DEFAULT_TOKEN_URL.to_string(),
        }
    }
}

impl fmt::Debug for OAuth2Config {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("OAuth2Config")
            .field("client_id", &self.client_id)
            .field("client_secret", &redacted(&self.client_secret))
            .field("refresh_token", &redacted(&self.refresh_token))
            .field("token_url", &self.token_url)
            .finish()
    }
}

/// Complete OAuth2 credentials.
#[derive(Clone, PartialEq, Eq)]
pub struct OAuth2Credentials {
    /// OAuth2 client ID.
    pub client_id: String,
    /// OAuth2 client secret.
    pub client_secret: String,
    /// Long-lived refresh token.
    pub refresh_token: String,
}

impl fmt::Debug for OAuth2Credentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("OAuth2Credentials")
            .field("client_id", &self.client_id)
            .finish_non_exhaustive()
    }
}

/// Settings for the transactional mail provider.
#[derive(Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct MailConfig {
    /// SMTP relay host.
    pub smtp_host: String,
    /// SMTP submission port.
    pub smtp_port: u16,
    /// Authenticated account; also used as the `From` address.
    pub sender_address: String,
    /// Operator inbox receiving new quote requests.
    pub business_mailbox: String,
    /// Deadline for transport setup (credential exchange and connection check).
    pub connect_timeout_ms: u64,
    /// Deadline for each individual send.
    pub send_timeout_ms: u64,
    /// Primary transport credentials.
    pub oauth2: OAuth2Config,
    /// Secondary transport credential (app password).
    pub app_password: Option<String>,
}

impl MailConfig {
    /// Sets the sender account.
    #[must_use]
    pub fn with_sender(mut self, address: impl Into<String>) -> Self {
        self.sender_address = address.into();
        self
    }

    /// Sets the operator inbox.
    #[must_use]
    pub fn with_business_mailbox(mut self, address: impl Into<String>) -> Self {
        self.business_mailbox = address.into();
        self
    }

    /// Sets the SMTP relay.
    #[must_use]
    pub fn with_smtp(mut self, host: impl Into<String>, port: u16) -> Self {
        self.smtp_host = host.into();
        self.smtp_port = port;
        self
    }

    /// Sets the OAuth2 credentials.
    #[must_use]
    pub fn with_oauth2(mut self, oauth2: OAuth2Config) -> Self {
        self.oauth2 = oauth2;
        self
    }

    /// Sets the app password.
    #[must_use]
    pub fn with_app_password(mut self, password: impl Into<String>) -> Self {
        self.app_password = Some(password.into());
        self
    }

    /// Sets both deadlines.
    #[must_use]
    pub fn with_timeouts(mut self, connect_timeout_ms: u64, send_timeout_ms: u64) -> Self {
        self.connect_timeout_ms = connect_timeout_ms;
        self.send_timeout_ms = send_timeout_ms;
        self
    }

    /// Returns the transport setup deadline.
    #[must_use]
    pub fn connect_timeout(&self) -> Duration {
        Duration::from_millis(self.connect_timeout_ms)
    }

    /// Returns the per-send deadline.
    #[must_use]
    pub fn send_timeout(&self) -> Duration {
        Duration::from_millis(self.send_timeout_ms)
    }

    /// Returns the app password if it is set and not blank.
    #[must_use]
    pub fn app_password(&self) -> Option<&str> {
        non_blank(self.app_password.as_deref())
    }
}

impl Default for MailConfig {
    fn default() -> Self {
        Self {
            smtp_host: DEFAULT_SMTP_HOST.to_string(),
            smtp_port: DEFAULT_SMTP_PORT,
            sender_address: DEFAULT_MAILBOX.to_string(),
            business_mailbox: DEFAULT_MAILBOX.to_string(),
            connect_timeout_ms: DEFAULT_CONNECT_TIMEOUT_MS,
            send_timeout_ms: DEFAULT_SEND_TIMEOUT_MS,
            oauth2: OAuth2Config::default(),
            app_password: None,
        }
    }
}

impl fmt::Debug for MailConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("MailConfig")
            .field("smtp_host", &self.smtp_host)
            .field("smtp_port", &self.smtp_port)
            .field("sender_address", &self.sender_address)
            .field("business_mailbox", &self.business_mailbox)
            .field("connect_timeout_ms", &self.connect_timeout_ms)
            .field("send_timeout_ms", &self.send_timeout_ms)
            .field("oauth2", &self.oauth2)
            .field("app_password", &redacted(&self.app_password))
            .finish()
    }
}

fn non_blank(value: Option<&str>) -> Option<&str> {
    value.map(str::trim).filter(|v| !v.is_empty())
}

fn redacted(value: &Option<String>) -> Option<&'static str> {
    value.as_ref().map(|_| "<redacted>")
}
