//! # mailgun-notify
//!
//! Send home-automation notifications, with image attachments, as email
//! through the Mailgun API.
//!
//! ## Quick Start
//!
//! ```rust,ignore
//! use mailgun_notify::{get_service, MailgunConfig, NotificationService, NotifyOptions};
//! use serde_json::json;
//!
//! let config = MailgunConfig::from_value(&json!({
//!     "token": "key-xxxxx",
//!     "recipient": "me@example.com",
//!     "sandbox": true,
//! }))?;
//!
//! // None means the credentials or domain were rejected: don't register.
//! if let Some(mut service) = get_service(config).await {
//!     service
//!         .send_message(
//!             "Someone is at the door",
//!             NotifyOptions::new()
//!                 .title("Doorbell")
//!                 .data(json!({"images": ["/tmp/doorbell.jpg"]})),
//!         )
//!         .await;
//! }
//! ```
//!
//! `send_message` never fails from the caller's point of view: delivery
//! problems are reported through `tracing`.
//!
//! ## Environment Variables
//!
//! [`MailgunConfig::from_env`] reads:
//!
//! | Variable | Description |
//! |----------|-------------|
//! | `MAILGUN_API_KEY` | Mailgun API key |
//! | `MAILGUN_RECIPIENT` | Notification recipient |
//! | `MAILGUN_DOMAIN` | Sending domain (optional) |
//! | `MAILGUN_SENDER` | Sender address (optional, default `hass@{domain}`) |
//! | `MAILGUN_SANDBOX` | Use the account's sandbox domain (optional) |
//! | `MAILGUN_BASE_URL` | API endpoint, e.g. `https://api.eu.mailgun.net/v3` |
//!
//! ## Feature Flags
//!
//! - `metrics` - Prometheus-style metrics
//!
//! ## Metrics
//!
//! | Metric | Type | Labels | Description |
//! |--------|------|--------|-------------|
//! | `mailgun_notify_messages_total` | Counter | status | Notifications sent |

/// The version of the mailgun-notify crate.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

mod address;
mod attachment;
mod client;
mod config;
mod error;
mod message;
mod notifier;
mod service;

use reqwest::Client;

// Re-exports
pub use address::Address;
pub use attachment::Attachment;
pub use client::{MailgunClient, SendReceipt};
pub use config::{MailgunConfig, DEFAULT_NAME, DEFAULT_SANDBOX, MAILGUN_BASE_URL};
pub use error::NotifyError;
pub use message::{NotifyOptions, OutboundMessage, ATTR_IMAGES, ATTR_TITLE_DEFAULT};
pub use notifier::NotificationService;
pub use service::MailgunNotificationService;

/// Build the Mailgun notification service for the host.
///
/// Connects once to validate the credentials and sending domain. Returns
/// `None` when they are rejected, in which case the host should not
/// register the service. The connected client is kept for later sends.
pub async fn get_service(config: MailgunConfig) -> Option<MailgunNotificationService> {
    get_service_with(config, Client::new()).await
}

/// Like [`get_service`], with a custom reqwest client.
pub async fn get_service_with(
    config: MailgunConfig,
    http: Client,
) -> Option<MailgunNotificationService> {
    let mut service = MailgunNotificationService::with_http_client(config, http);
    if service.connection_is_valid().await {
        Some(service)
    } else {
        None
    }
}

/// Prelude module for convenient imports.
pub mod prelude {
    pub use crate::Address;
    pub use crate::MailgunConfig;
    pub use crate::MailgunNotificationService;
    pub use crate::NotificationService;
    pub use crate::NotifyError;
    pub use crate::NotifyOptions;
    pub use crate::{get_service, get_service_with};
}
