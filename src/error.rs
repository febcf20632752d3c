//! Error types for mailgun-notify.

use thiserror::Error;

/// Errors raised while configuring the adapter or talking to Mailgun.
///
/// The notification service never hands these to the host; they are
/// logged at the service boundary. Lower layers (`MailgunConfig`,
/// `MailgunClient`) return them so callers can match on the kind.
#[derive(Debug, Clone, Error)]
pub enum NotifyError {
    /// Configuration error (wrong type, unparsable value, etc.)
    #[error("Configuration error: {0}")]
    Configuration(String),

    /// Missing required configuration field.
    #[error("Missing required field: {0}")]
    MissingField(&'static str),

    /// Invalid email address format.
    #[error("Invalid email address: {0}")]
    InvalidAddress(String),

    /// Mailgun rejected the API token.
    #[error("Invalid credentials")]
    CredentialsInvalid,

    /// The sending domain is unknown to the account, or none could be resolved.
    #[error("Invalid domain: {0}")]
    DomainInvalid(String),

    /// Mailgun refused or failed to accept a message.
    #[error("Send failed ({status}): {message}")]
    SendFailed { status: u16, message: String },

    /// Any other non-success answer from the API.
    #[error("Provider error: {message}")]
    Provider {
        message: String,
        /// Optional HTTP status code
        status: Option<u16>,
    },

    /// Error reading or processing attachment (generic).
    #[error("Attachment error: {0}")]
    AttachmentError(String),

    /// Attachment file not found.
    #[error("Attachment file not found: {0}")]
    AttachmentFileNotFound(String),

    /// Failed to read attachment file.
    #[error("Failed to read attachment: {0}")]
    AttachmentReadError(String),

    /// HTTP request failed.
    #[error("HTTP error: {0}")]
    Http(String),
}

impl NotifyError {
    /// Create a provider error with HTTP status.
    pub fn provider_with_status(message: impl Into<String>, status: u16) -> Self {
        Self::Provider {
            message: message.into(),
            status: Some(status),
        }
    }
}

impl From<reqwest::Error> for NotifyError {
    fn from(err: reqwest::Error) -> Self {
        Self::Http(err.to_string())
    }
}
