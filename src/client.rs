//! Mailgun API client.
//!
//! For reference: [Mailgun API docs](https://documentation.mailgun.com/en/latest/api-sending.html#sending)
//!
//! Connecting resolves the sending domain against the account's domain
//! list, which doubles as the credential check:
//!
//! * a rejected API key fails with [`NotifyError::CredentialsInvalid`]
//! * a configured domain the account does not own, or no usable domain at
//!   all, fails with [`NotifyError::DomainInvalid`]
//!
//! Without a configured domain the client picks the account's first
//! sandbox domain when `sandbox` is set, otherwise its first custom domain.
//!
//! ```rust,ignore
//! use mailgun_notify::MailgunClient;
//!
//! let client = MailgunClient::connect("key-xxxxx", None, true).await?;
//! println!("sending from {}", client.domain());
//! ```

use base64::Engine;
use reqwest::{
    multipart::{Form, Part},
    Client, StatusCode,
};
use serde::{Deserialize, Serialize};

use crate::config::MAILGUN_BASE_URL;
use crate::error::NotifyError;
use crate::message::OutboundMessage;

/// Handle on an authenticated Mailgun account with a resolved sending domain.
#[derive(Debug, Clone)]
pub struct MailgunClient {
    api_key: String,
    domain: String,
    base_url: String,
    http: Client,
}

/// What Mailgun answered for an accepted message.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SendReceipt {
    /// Message ID assigned by Mailgun
    pub id: String,
    /// Status text, usually "Queued. Thank you."
    pub message: String,
}

impl MailgunClient {
    /// Connect to the US endpoint with a default HTTP client.
    pub async fn connect(
        token: &str,
        domain: Option<&str>,
        sandbox: bool,
    ) -> Result<Self, NotifyError> {
        Self::connect_with(MAILGUN_BASE_URL, Client::new(), token, domain, sandbox).await
    }

    /// Connect to a given endpoint with a custom reqwest client.
    pub async fn connect_with(
        base_url: &str,
        http: Client,
        token: &str,
        domain: Option<&str>,
        sandbox: bool,
    ) -> Result<Self, NotifyError> {
        let mut client = Self {
            api_key: token.to_string(),
            domain: String::new(),
            base_url: base_url.trim_end_matches('/').to_string(),
            http,
        };

        let domains = client.list_domains().await?;
        client.domain = resolve_domain(&domains, domain, sandbox)?;

        Ok(client)
    }

    /// The resolved sending domain.
    pub fn domain(&self) -> &str {
        &self.domain
    }

    fn auth_header(&self) -> String {
        let credentials = format!("api:{}", self.api_key);
        let encoded = base64::engine::general_purpose::STANDARD.encode(credentials.as_bytes());
        format!("Basic {}", encoded)
    }

    async fn list_domains(&self) -> Result<Vec<DomainItem>, NotifyError> {
        let url = format!("{}/domains", self.base_url);

        let response = self
            .http
            .get(&url)
            .query(&[("limit", "1000")])
            .header("Authorization", self.auth_header())
            .header("User-Agent", format!("mailgun-notify/{}", crate::VERSION))
            .send()
            .await?;

        let status = response.status();

        if status == StatusCode::UNAUTHORIZED || status == StatusCode::FORBIDDEN {
            return Err(NotifyError::CredentialsInvalid);
        }

        if !status.is_success() {
            let error_body = response.text().await.unwrap_or_default();
            return Err(NotifyError::provider_with_status(
                error_message(error_body),
                status.as_u16(),
            ));
        }

        let list: DomainList = response.json().await?;
        Ok(list.items)
    }

    fn build_form(&self, message: &OutboundMessage) -> Result<Form, NotifyError> {
        let mut form = Form::new()
            .text("from", message.sender.email.clone())
            .text("to", message.recipient.email.clone())
            .text("subject", message.subject.clone())
            .text("text", message.text.clone());

        for attachment in &message.attachments {
            let data = attachment.get_data()?;

            let part = Part::bytes(data)
                .file_name(attachment.filename.clone())
                .mime_str(&attachment.content_type)
                .map_err(|e| {
                    NotifyError::AttachmentError(format!("{}: {}", attachment.filename, e))
                })?;

            form = form.part("attachment", part);
        }

        Ok(form)
    }

    /// Send one message from the resolved domain.
    pub async fn send_mail(&self, message: &OutboundMessage) -> Result<SendReceipt, NotifyError> {
        let form = self.build_form(message)?;
        let url = format!("{}/{}/messages", self.base_url, self.domain);

        let response = self
            .http
            .post(&url)
            .header("Authorization", self.auth_header())
            .header("User-Agent", format!("mailgun-notify/{}", crate::VERSION))
            .multipart(form)
            .send()
            .await?;

        let status = response.status();

        if status.is_success() {
            Ok(response.json().await?)
        } else {
            let error_body = response.text().await.unwrap_or_default();
            Err(NotifyError::SendFailed {
                status: status.as_u16(),
                message: error_message(error_body),
            })
        }
    }
}

/// Pick the sending domain out of the account's domain list.
fn resolve_domain(
    domains: &[DomainItem],
    configured: Option<&str>,
    sandbox: bool,
) -> Result<String, NotifyError> {
    match configured {
        Some(wanted) => domains
            .iter()
            .find(|d| d.name.eq_ignore_ascii_case(wanted))
            .map(|d| d.name.clone())
            .ok_or_else(|| {
                NotifyError::DomainInvalid(format!(
                    "domain '{}' is not registered on this account",
                    wanted
                ))
            }),
        None => domains
            .iter()
            .find(|d| d.is_sandbox() == sandbox)
            .map(|d| d.name.clone())
            .ok_or_else(|| {
                let kind = if sandbox { "sandbox" } else { "custom" };
                NotifyError::DomainInvalid(format!("no {} domain found on this account", kind))
            }),
    }
}

fn error_message(body: String) -> String {
    serde_json::from_str::<MailgunErrorBody>(&body)
        .map(|e| e.message)
        .unwrap_or(body)
}

// ============================================================================
// Mailgun API Types
// ============================================================================

#[derive(Debug, Deserialize)]
struct DomainList {
    #[serde(default)]
    items: Vec<DomainItem>,
}

#[derive(Debug, Clone, Deserialize)]
struct DomainItem {
    name: String,
    #[serde(rename = "type", default)]
    kind: Option<String>,
}

impl DomainItem {
    fn is_sandbox(&self) -> bool {
        match self.kind.as_deref() {
            Some(kind) => kind == "sandbox",
            None => self.name.starts_with("sandbox"),
        }
    }
}

#[derive(Debug, Deserialize)]
struct MailgunErrorBody {
    message: String,
}
