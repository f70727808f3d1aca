//! # SMTP Transports
//!
//! [`lettre`]-backed [`MailTransport`] and the two strategies used to build
//! it: XOAUTH2 with an exchanged access token, and a plain app password.
//!
//! Both connect to the relay with STARTTLS on the submission port.
//!
//! # Examples
//!
//! ```ignore
//! use limo_quote::infrastructure::mail::smtp::AppPasswordStrategy;
//!
//! let strategy = AppPasswordStrategy::new(config.clone());
//! let transport = strategy.connect().await?;
//! transport.verify().await?;
//! ```

use crate::domain::entities::Notification;
use crate::infrastructure::mail::config::MailConfig;
use crate::infrastructure::mail::error::{DeliveryError, DeliveryErrorKind, DeliveryResult};
use crate::infrastructure::mail::oauth::OAuthTokenClient;
use crate::infrastructure::mail::traits::{MailTransport, MessageReceipt, TransportStrategy};
use async_trait::async_trait;
use lettre::message::header::{ContentType, Header, HeaderName, HeaderValue};
use lettre::message::Mailbox;
use lettre::transport::smtp::authentication::{Credentials, Mechanism};
use lettre::{Address, AsyncSmtpTransport, AsyncTransport, Message, Tokio1Executor};
use std::error::Error as StdError;
use std::fmt;
use std::io;
use std::sync::Arc;
use tracing::debug;
use uuid::Uuid;

/// `X-Priority` header understood by most mail clients.
#[derive(Debug, Clone, PartialEq, Eq)]
struct XPriority(String);

impl Header for XPriority {
    fn name() -> HeaderName {
        HeaderName::new_from_ascii_str("X-Priority")
    }

    fn parse(s: &str) -> Result<Self, Box<dyn StdError + Send + Sync>> {
        Ok(Self(s.to_string()))
    }

    fn display(&self) -> HeaderValue {
        HeaderValue::new(Self::name(), self.0.clone())
    }
}

/// Mail transport over an authenticated SMTP connection.
#[derive(Clone)]
pub struct SmtpMailTransport {
    inner: AsyncSmtpTransport<Tokio1Executor>,
    sender: Address,
}

impl SmtpMailTransport {
    /// Builds a transport for the configured relay with the given login.
    ///
    /// # Errors
    ///
    /// Returns `DeliveryError::Unknown` if the sender address is invalid and
    /// `DeliveryError::NetworkUnreachable` if the relay cannot be set up.
    pub fn build(
        config: &MailConfig,
        credentials: Credentials,
        mechanisms: Vec<Mechanism>,
    ) -> DeliveryResult<Self> {
        let sender = parse_address(&config.sender_address)
            .map_err(|e| DeliveryError::unknown(format!("Invalid sender address: {e}")))?;

        let inner = AsyncSmtpTransport::<Tokio1Executor>::starttls_relay(&config.smtp_host)
            .map_err(|e| classify_smtp_error(&e))?
            .port(config.smtp_port)
            .credentials(credentials)
            .authentication(mechanisms)
            .timeout(Some(config.connect_timeout()))
            .build();

        Ok(Self { inner, sender })
    }

    /// Returns the `From` address.
    #[must_use]
    pub fn sender(&self) -> &Address {
        &self.sender
    }
}

impl fmt::Debug for SmtpMailTransport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SmtpMailTransport")
            .field("sender", &self.sender.to_string())
            .finish_non_exhaustive()
    }
}

#[async_trait]
impl MailTransport for SmtpMailTransport {
    async fn verify(&self) -> DeliveryResult<()> {
        match self.inner.test_connection().await {
            Ok(true) => Ok(()),
            Ok(false) => Err(DeliveryError::network_unreachable(
                "SMTP relay did not accept the connection",
            )),
            Err(e) => Err(classify_smtp_error(&e)),
        }
    }

    async fn send(&self, notification: &Notification) -> DeliveryResult<MessageReceipt> {
        let (message, message_id) = build_message(&self.sender, notification)?;

        let response = self
            .inner
            .send(message)
            .await
            .map_err(|e| classify_smtp_error(&e))?;

        debug!(
            role = %notification.role,
            message_id = %message_id,
            code = %response.code(),
            "SMTP relay accepted message"
        );

        Ok(MessageReceipt {
            role: notification.role,
            message_id,
        })
    }
}

/// Primary strategy: XOAUTH2 with an access token obtained from a refresh token.
#[derive(Debug, Clone)]
pub struct OAuth2Strategy {
    config: MailConfig,
    token_client: OAuthTokenClient,
}

impl OAuth2Strategy {
    /// Creates the strategy.
    ///
    /// # Errors
    ///
    /// Returns an error if the token HTTP client cannot be created.
    pub fn new(config: MailConfig) -> DeliveryResult<Self> {
        let token_client =
            OAuthTokenClient::new(config.oauth2.token_url.clone(), config.connect_timeout_ms)?;
        Ok(Self {
            config,
            token_client,
        })
    }
}

#[async_trait]
impl TransportStrategy for OAuth2Strategy {
    fn name(&self) -> &'static str {
        "oauth2"
    }

    async fn connect(&self) -> DeliveryResult<Arc<dyn MailTransport>> {
        let credentials = self.config.oauth2.credentials().ok_or_else(|| {
            DeliveryError::auth_failure("OAuth2 credentials are not configured").with_code("EAUTH")
        })?;

        let token = self.token_client.refresh_access_token(&credentials).await?;

        let transport = SmtpMailTransport::build(
            &self.config,
            Credentials::new(self.config.sender_address.clone(), token.secret().to_string()),
            vec![Mechanism::Xoauth2],
        )?;

        Ok(Arc::new(transport))
    }
}

/// Secondary strategy: username and app password.
#[derive(Debug, Clone)]
pub struct AppPasswordStrategy {
    config: MailConfig,
}

impl AppPasswordStrategy {
    /// Creates the strategy.
    #[must_use]
    pub fn new(config: MailConfig) -> Self {
        Self { config }
    }
}

#[async_trait]
impl TransportStrategy for AppPasswordStrategy {
    fn name(&self) -> &'static str {
        "app-password"
    }

    async fn connect(&self) -> DeliveryResult<Arc<dyn MailTransport>> {
        let password = self.config.app_password().ok_or_else(|| {
            DeliveryError::auth_failure("App password is not configured").with_code("EAUTH")
        })?;

        let transport = SmtpMailTransport::build(
            &self.config,
            Credentials::new(self.config.sender_address.clone(), password.to_string()),
            vec![Mechanism::Login, Mechanism::Plain],
        )?;

        Ok(Arc::new(transport))
    }
}

fn parse_address(raw: &str) -> Result<Address, lettre::address::AddressError> {
    raw.trim().parse::<Address>()
}

/// Renders a notification into a MIME message and returns it with its `Message-ID`.
fn build_message(sender: &Address, notification: &Notification) -> DeliveryResult<(Message, String)> {
    let recipient = parse_address(&notification.to).map_err(|e| {
        DeliveryError::unknown(format!("Invalid recipient address {}: {e}", notification.to))
            .with_code("EENVELOPE")
    })?;

    let message_id = format!("<{}@{}>", Uuid::new_v4(), sender.domain());

    let mut builder = Message::builder()
        .from(Mailbox::new(
            Some(notification.sender_name.clone()),
            sender.clone(),
        ))
        .to(Mailbox::new(None, recipient))
        .subject(notification.subject.clone())
        .message_id(Some(message_id.clone()))
        .header(ContentType::TEXT_HTML);

    if let Some(priority) = notification.priority.x_priority() {
        builder = builder.header(XPriority(priority.to_string()));
    }

    let message = builder
        .body(notification.html_body.clone())
        .map_err(|e| DeliveryError::unknown(format!("Failed to build message: {e}")))?;

    Ok((message, message_id))
}

/// Sorts a lettre SMTP error into a delivery category.
fn classify_smtp_error(error: &lettre::transport::smtp::Error) -> DeliveryError {
    let reply_code = error.status().map(|code| code.to_string());
    let io_kind = io_error_kind(error);
    let message = error_chain_message(error);

    let kind = DeliveryErrorKind::classify(reply_code.as_deref(), io_kind, &message);
    let delivery_error = DeliveryError::of_kind(kind, message);

    match (kind, reply_code) {
        (_, Some(code)) => delivery_error.with_code(code),
        (DeliveryErrorKind::AuthFailure, None) => delivery_error.with_code("EAUTH"),
        _ => delivery_error,
    }
}

fn io_error_kind(error: &(dyn StdError + 'static)) -> Option<io::ErrorKind> {
    let mut source: Option<&(dyn StdError + 'static)> = Some(error);
    while let Some(current) = source {
        if let Some(io_error) = current.downcast_ref::<io::Error>() {
            return Some(io_error.kind());
        }
        source = current.source();
    }
    None
}

fn error_chain_message(error: &(dyn StdError + 'static)) -> String {
    let mut message = error.to_string();
    let mut source = error.source();
    while let Some(current) = source {
        message.push_str(": ");
        message.push_str(&current.to_string());
        source = current.source();
    }
    message
}
