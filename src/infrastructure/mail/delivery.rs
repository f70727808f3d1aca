//! # Delivery Service
//!
//! Sends a [`NotificationPair`] over the first transport strategy whose setup
//! succeeds.
//!
//! Setup means credential exchange, transport build and a connection check,
//! all under the connect deadline. A strategy whose setup fails is logged and
//! skipped. Once a transport is established, the operator message and then
//! the customer confirmation are sent, each under the send deadline. A send
//! failure is final: the next strategy is not tried, so the operator never
//! gets the same request twice.
//!
//! # Examples
//!
//! ```ignore
//! use limo_quote::infrastructure::mail::{DeliveryService, MailConfig};
//!
//! let delivery = DeliveryService::from_config(&MailConfig::default())?;
//! let receipt = delivery.deliver(&pair).await?;
//! println!("sent via {}", receipt.transport);
//! ```

use crate::domain::entities::{Notification, NotificationPair};
use crate::infrastructure::mail::config::MailConfig;
use crate::infrastructure::mail::error::{DeliveryError, DeliveryResult};
use crate::infrastructure::mail::smtp::{AppPasswordStrategy, OAuth2Strategy};
use crate::infrastructure::mail::traits::{
    DeliveryReceipt, MailTransport, MessageReceipt, TransportStrategy,
};
use std::fmt;
use std::sync::Arc;
use std::time::Duration;
use tokio::time::timeout;
use tracing::{debug, info, warn};

/// Delivers notification pairs through an ordered chain of transport strategies.
pub struct DeliveryService {
    strategies: Vec<Arc<dyn TransportStrategy>>,
    connect_timeout: Duration,
    send_timeout: Duration,
}

impl DeliveryService {
    /// Creates a delivery service.
    ///
    /// # Arguments
    ///
    /// * `strategies` - Strategies in the order they are tried
    /// * `connect_timeout` - Deadline for one strategy's setup
    /// * `send_timeout` - Deadline for each message
    #[must_use]
    pub fn new(
        strategies: Vec<Arc<dyn TransportStrategy>>,
        connect_timeout: Duration,
        send_timeout: Duration,
    ) -> Self {
        Self {
            strategies,
            connect_timeout,
            send_timeout,
        }
    }

    /// Creates the production chain: XOAUTH2 first, then the app password.
    ///
    /// # Errors
    ///
    /// Returns an error if the OAuth2 token client cannot be created.
    pub fn from_config(config: &MailConfig) -> DeliveryResult<Self> {
        let strategies: Vec<Arc<dyn TransportStrategy>> = vec![
            Arc::new(OAuth2Strategy::new(config.clone())?),
            Arc::new(AppPasswordStrategy::new(config.clone())),
        ];
        Ok(Self::new(
            strategies,
            config.connect_timeout(),
            config.send_timeout(),
        ))
    }

    /// Returns the strategy names in the order they are tried.
    #[must_use]
    pub fn strategy_names(&self) -> Vec<&'static str> {
        self.strategies.iter().map(|s| s.name()).collect()
    }

    /// Sends the operator notification and then the customer confirmation.
    ///
    /// # Errors
    ///
    /// Returns the last setup error if no strategy could establish a
    /// transport, or the first send error otherwise.
    pub async fn deliver(&self, pair: &NotificationPair) -> DeliveryResult<DeliveryReceipt> {
        let (strategy, transport) = self.establish().await?;

        let business = self.send_one(transport.as_ref(), &pair.business).await?;
        let customer = self.send_one(transport.as_ref(), &pair.customer).await?;

        info!(strategy, "quote notifications delivered");

        Ok(DeliveryReceipt {
            transport: strategy.to_string(),
            business,
            customer,
        })
    }

    async fn establish(&self) -> DeliveryResult<(&'static str, Arc<dyn MailTransport>)> {
        let mut last_error =
            DeliveryError::unknown("No mail transport strategies are configured");

        for strategy in &self.strategies {
            let name = strategy.name();
            match timeout(self.connect_timeout, Self::setup(strategy.as_ref())).await {
                Ok(Ok(transport)) => {
                    debug!(strategy = name, "mail transport established");
                    return Ok((name, transport));
                }
                Ok(Err(e)) => {
                    warn!(
                        strategy = name,
                        error = %e,
                        "mail transport setup failed, trying next"
                    );
                    last_error = e;
                }
                Err(_) => {
                    warn!(
                        strategy = name,
                        timeout_ms = duration_ms(self.connect_timeout),
                        "mail transport setup timed out, trying next"
                    );
                    last_error = DeliveryError::timeout_with_duration(
                        format!("{name} transport setup exceeded deadline"),
                        duration_ms(self.connect_timeout),
                    );
                }
            }
        }

        Err(last_error)
    }

    async fn setup(strategy: &dyn TransportStrategy) -> DeliveryResult<Arc<dyn MailTransport>> {
        let transport = strategy.connect().await?;
        transport.verify().await?;
        Ok(transport)
    }

    async fn send_one(
        &self,
        transport: &dyn MailTransport,
        notification: &Notification,
    ) -> DeliveryResult<MessageReceipt> {
        match timeout(self.send_timeout, transport.send(notification)).await {
            Ok(result) => result,
            Err(_) => Err(DeliveryError::timeout_with_duration(
                format!("sending {} notification exceeded deadline", notification.role),
                duration_ms(self.send_timeout),
            )),
        }
    }
}

impl fmt::Debug for DeliveryService {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DeliveryService")
            .field("strategies", &self.strategy_names())
            .field("connect_timeout", &self.connect_timeout)
            .field("send_timeout", &self.send_timeout)
            .finish()
    }
}

fn duration_ms(duration: Duration) -> u64 {
    u64::try_from(duration.as_millis()).unwrap_or(u64::MAX)
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::domain::entities::{MessagePriority, RecipientRole};
    use crate::infrastructure::mail::error::DeliveryErrorKind;
    use async_trait::async_trait;
    use std::sync::Mutex;
    use std::sync::atomic::{AtomicUsize, Ordering};

    #[derive(Debug, Default)]
    struct RecordingTransport {
        sent: Mutex<Vec<RecipientRole>>,
        verify_error: Option<DeliveryError>,
        fail_role: Option<RecipientRole>,
        send_delay_ms: u64,
    }

    #[async_trait]
    impl MailTransport for RecordingTransport {
        async fn verify(&self) -> DeliveryResult<()> {
            match &self.verify_error {
                Some(e) => Err(e.clone()),
                None => Ok(()),
            }
        }

        async fn send(&self, notification: &Notification) -> DeliveryResult<MessageReceipt> {
            if self.send_delay_ms > 0 {
                tokio::time::sleep(Duration::from_millis(self.send_delay_ms)).await;
            }
            if self.fail_role == Some(notification.role) {
                return Err(DeliveryError::unknown("550 mailbox unavailable").with_code("550"));
            }
            self.sent.lock().unwrap().push(notification.role);
            Ok(MessageReceipt {
                role: notification.role,
                message_id: format!("<{}@test>", notification.role),
            })
        }
    }

    #[derive(Debug)]
    struct StubStrategy {
        name: &'static str,
        transport: Arc<RecordingTransport>,
        connect_error: Option<DeliveryError>,
        connect_delay_ms: u64,
        connects: AtomicUsize,
    }

    impl StubStrategy {
        fn working(name: &'static str) -> Self {
            Self::with_transport(name, RecordingTransport::default())
        }

        fn with_transport(name: &'static str, transport: RecordingTransport) -> Self {
            Self {
                name,
                transport: Arc::new(transport),
                connect_error: None,
                connect_delay_ms: 0,
                connects: AtomicUsize::new(0),
            }
        }

        fn failing(name: &'static str, error: DeliveryError) -> Self {
            Self {
                connect_error: Some(error),
                ..Self::working(name)
            }
        }

        fn slow(name: &'static str, delay_ms: u64) -> Self {
            Self {
                connect_delay_ms: delay_ms,
                ..Self::working(name)
            }
        }

        fn sent(&self) -> Vec<RecipientRole> {
            self.transport.sent.lock().unwrap().clone()
        }
    }

    #[async_trait]
    impl TransportStrategy for StubStrategy {
        fn name(&self) -> &'static str {
            self.name
        }

        async fn connect(&self) -> DeliveryResult<Arc<dyn MailTransport>> {
            self.connects.fetch_add(1, Ordering::SeqCst);
            if self.connect_delay_ms > 0 {
                tokio::time::sleep(Duration::from_millis(self.connect_delay_ms)).await;
            }
            match &self.connect_error {
                Some(e) => Err(e.clone()),
                None => Ok(self.transport.clone() as Arc<dyn MailTransport>),
            }
        }
    }

    fn pair() -> NotificationPair {
        let notification = |role, to: &str| Notification {
            role,
            to: to.to_string(),
            sender_name: "EZ Airport Limo".to_string(),
            subject: "subject".to_string(),
            html_body: "<p>body</p>".to_string(),
            priority: MessagePriority::Normal,
        };
        NotificationPair {
            business: notification(RecipientRole::Business, "ops@ezairportlimo.com"),
            customer: notification(RecipientRole::Customer, "jane@x.com"),
        }
    }

    fn service(strategies: Vec<Arc<StubStrategy>>) -> DeliveryService {
        let strategies = strategies
            .into_iter()
            .map(|s| s as Arc<dyn TransportStrategy>)
            .collect();
        DeliveryService::new(
            strategies,
            Duration::from_millis(100),
            Duration::from_millis(100),
        )
    }

    #[tokio::test]
    async fn primary_strategy_sends_business_then_customer() {
        let primary = Arc::new(StubStrategy::working("oauth2"));
        let secondary = Arc::new(StubStrategy::working("app-password"));
        let delivery = service(vec![primary.clone(), secondary.clone()]);

        let receipt = delivery.deliver(&pair()).await.unwrap();

        assert_eq!(receipt.transport, "oauth2");
        assert_eq!(receipt.business.role, RecipientRole::Business);
        assert_eq!(receipt.customer.role, RecipientRole::Customer);
        assert_eq!(
            primary.sent(),
            vec![RecipientRole::Business, RecipientRole::Customer]
        );
        assert_eq!(secondary.connects.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn failed_setup_falls_through_to_next_strategy() {
        let primary = Arc::new(StubStrategy::failing(
            "oauth2",
            DeliveryError::auth_failure("invalid_grant"),
        ));
        let secondary = Arc::new(StubStrategy::working("app-password"));
        let delivery = service(vec![primary, secondary.clone()]);

        let receipt = delivery.deliver(&pair()).await.unwrap();

        assert_eq!(receipt.transport, "app-password");
        assert_eq!(secondary.sent().len(), 2);
    }

    #[tokio::test]
    async fn failed_verification_falls_through_to_next_strategy() {
        let primary = Arc::new(StubStrategy::with_transport(
            "oauth2",
            RecordingTransport {
                verify_error: Some(DeliveryError::auth_failure("535").with_code("535")),
                ..Default::default()
            },
        ));
        let secondary = Arc::new(StubStrategy::working("app-password"));
        let delivery = service(vec![primary.clone(), secondary]);

        let receipt = delivery.deliver(&pair()).await.unwrap();

        assert_eq!(receipt.transport, "app-password");
        assert!(primary.sent().is_empty());
    }

    #[tokio::test]
    async fn all_strategies_failing_returns_last_error() {
        let delivery = service(vec![
            Arc::new(StubStrategy::failing(
                "oauth2",
                DeliveryError::auth_failure("invalid_grant"),
            )),
            Arc::new(StubStrategy::failing(
                "app-password",
                DeliveryError::network_unreachable("connection refused"),
            )),
        ]);

        let err = delivery.deliver(&pair()).await.unwrap_err();
        assert_eq!(err.kind(), DeliveryErrorKind::NetworkUnreachable);
    }

    #[tokio::test]
    async fn slow_setup_times_out_and_falls_through() {
        let delivery = service(vec![
            Arc::new(StubStrategy::slow("oauth2", 1_000)),
            Arc::new(StubStrategy::working("app-password")),
        ]);

        let receipt = delivery.deliver(&pair()).await.unwrap();
        assert_eq!(receipt.transport, "app-password");
    }

    #[tokio::test]
    async fn slow_setup_on_last_strategy_is_timeout() {
        let delivery = service(vec![Arc::new(StubStrategy::slow("oauth2", 1_000))]);

        let err = delivery.deliver(&pair()).await.unwrap_err();
        assert_eq!(err.kind(), DeliveryErrorKind::Timeout);
    }

    #[tokio::test]
    async fn customer_send_failure_fails_delivery_without_retry() {
        let primary = Arc::new(StubStrategy::with_transport(
            "oauth2",
            RecordingTransport {
                fail_role: Some(RecipientRole::Customer),
                ..Default::default()
            },
        ));
        let secondary = Arc::new(StubStrategy::working("app-password"));
        let delivery = service(vec![primary.clone(), secondary.clone()]);

        let err = delivery.deliver(&pair()).await.unwrap_err();

        assert_eq!(err.provider_code(), Some("550"));
        assert_eq!(primary.sent(), vec![RecipientRole::Business]);
        assert_eq!(secondary.connects.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn slow_send_is_timeout() {
        let delivery = service(vec![Arc::new(StubStrategy::with_transport(
            "oauth2",
            RecordingTransport {
                send_delay_ms: 1_000,
                ..Default::default()
            },
        ))]);

        let err = delivery.deliver(&pair()).await.unwrap_err();
        assert_eq!(err.kind(), DeliveryErrorKind::Timeout);
        assert!(err.message().contains("business"));
    }

    #[tokio::test]
    async fn empty_chain_is_unknown_error() {
        let delivery = service(vec![]);
        let err = delivery.deliver(&pair()).await.unwrap_err();
        assert_eq!(err.kind(), DeliveryErrorKind::Unknown);
    }

    #[test]
    fn production_chain_order() {
        let delivery = DeliveryService::from_config(&MailConfig::default()).unwrap();
        assert_eq!(delivery.strategy_names(), vec!["oauth2", "app-password"]);
    }
}
