//! The Mailgun notification service.
//!
//! The service owns at most one [`MailgunClient`], created on first use and
//! kept for the life of the service. Creating the client is also what
//! validates the credentials, so [`connection_is_valid`] warms the client
//! that later sends reuse.
//!
//! [`connection_is_valid`]: MailgunNotificationService::connection_is_valid

use async_trait::async_trait;
use reqwest::Client;
use tracing::Instrument;

use crate::address::Address;
use crate::client::{MailgunClient, SendReceipt};
use crate::config::MailgunConfig;
use crate::error::NotifyError;
use crate::message::{NotifyOptions, OutboundMessage};
use crate::notifier::NotificationService;

/// Sends notifications as email through one Mailgun account.
#[derive(Debug)]
pub struct MailgunNotificationService {
    config: MailgunConfig,
    http: Client,
    client: Option<MailgunClient>,
    domain: Option<String>,
    sender: Option<Address>,
}

impl MailgunNotificationService {
    /// Create the service. No network activity happens here.
    pub fn new(config: MailgunConfig) -> Self {
        Self::with_http_client(config, Client::new())
    }

    /// Create with a custom reqwest client (timeouts, proxies, ...).
    pub fn with_http_client(config: MailgunConfig, http: Client) -> Self {
        let domain = config.domain.clone();
        let sender = config.sender.clone();
        Self {
            config,
            http,
            client: None,
            domain,
            sender,
        }
    }

    pub fn config(&self) -> &MailgunConfig {
        &self.config
    }

    /// The sending domain; the resolved one once the client exists.
    pub fn domain(&self) -> Option<&str> {
        self.domain.as_deref()
    }

    /// The sender address, if configured or already defaulted.
    pub fn sender(&self) -> Option<&Address> {
        self.sender.as_ref()
    }

    /// Whether the Mailgun client has been created.
    pub fn has_client(&self) -> bool {
        self.client.is_some()
    }

    /// Create the Mailgun client unless it already exists.
    ///
    /// On first creation the resolved domain replaces the configured one
    /// and, when no sender was configured, the sender becomes
    /// `hass@{domain}`.
    pub async fn ensure_client(&mut self) -> Result<&MailgunClient, NotifyError> {
        if self.client.is_none() {
            let client = MailgunClient::connect_with(
                &self.config.base_url,
                self.http.clone(),
                &self.config.token,
                self.config.domain.as_deref(),
                self.config.sandbox,
            )
            .await?;

            tracing::debug!(domain = %client.domain(), "Mailgun domain");
            let sender = match self.sender.take() {
                Some(sender) => sender,
                None => Address::default_sender(client.domain())?,
            };

            self.domain = Some(client.domain().to_string());
            self.sender = Some(sender);
            self.client = Some(client);
        }

        self.client
            .as_ref()
            .ok_or_else(|| NotifyError::Configuration("Mailgun client unavailable".into()))
    }

    /// Check whether the configured credentials and domain are accepted.
    ///
    /// Creates the client as a side effect; a later send reuses it.
    pub async fn connection_is_valid(&mut self) -> bool {
        match self.ensure_client().await {
            Ok(_) => true,
            Err(NotifyError::CredentialsInvalid) => {
                tracing::error!(service = %self.config.name, "Invalid credentials");
                false
            }
            Err(NotifyError::DomainInvalid(reason)) => {
                tracing::error!(service = %self.config.name, error = %reason, "Invalid domain");
                false
            }
            Err(e) => {
                tracing::error!(service = %self.config.name, error = %e, "Failed to connect to Mailgun");
                false
            }
        }
    }

    async fn deliver(
        &mut self,
        message: &str,
        options: &NotifyOptions,
    ) -> Result<SendReceipt, NotifyError> {
        self.ensure_client().await?;

        // ensure_client always leaves both set
        let (Some(client), Some(sender)) = (self.client.as_ref(), self.sender.clone()) else {
            return Err(NotifyError::Configuration("Mailgun client unavailable".into()));
        };

        let outbound = OutboundMessage::from_notification(
            sender,
            self.config.recipient.clone(),
            message,
            options,
        );

        client.send_mail(&outbound).await
    }
}

#[async_trait]
impl NotificationService for MailgunNotificationService {
    async fn send_message(&mut self, message: &str, options: NotifyOptions) {
        let span = tracing::info_span!(
            "mailgun.send",
            service = %self.config.name,
            to = %self.config.recipient.email,
            subject = %options.subject(),
        );

        let result = self.deliver(message, &options).instrument(span.clone()).await;

        #[cfg(feature = "metrics")]
        {
            let status = if result.is_ok() { "success" } else { "error" };
            metrics::counter!("mailgun_notify_messages_total", "status" => status).increment(1);
        }

        span.in_scope(|| match result {
            Ok(receipt) => {
                tracing::debug!(id = %receipt.id, response = %receipt.message, "Message sent")
            }
            Err(e) => tracing::error!(error = %e, "Failed to send message"),
        });
    }

    fn service_name(&self) -> &'static str {
        "mailgun"
    }
}
