//! Notification options and the outbound message built from them.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::address::Address;
use crate::attachment::Attachment;

/// Subject used when a notification carries no title.
pub const ATTR_TITLE_DEFAULT: &str = "Home Assistant";

/// Key in the data bag holding image paths to attach.
pub const ATTR_IMAGES: &str = "images";

/// Per-notification options passed by the host alongside the body.
///
/// ```
/// use mailgun_notify::NotifyOptions;
/// use serde_json::json;
///
/// let options = NotifyOptions::new()
///     .title("Doorbell")
///     .data(json!({"images": ["/tmp/snapshot.jpg"]}));
///
/// assert_eq!(options.subject(), "Doorbell");
/// assert_eq!(options.image_paths(), vec!["/tmp/snapshot.jpg".to_string()]);
/// ```
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct NotifyOptions {
    /// Title, used as the email subject.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    /// Free-form data bag; only `images` is recognised.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub data: Option<Map<String, Value>>,
}

impl NotifyOptions {
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the title.
    pub fn title(mut self, title: impl Into<String>) -> Self {
        self.title = Some(title.into());
        self
    }

    /// Set the data bag. Non-object values are ignored.
    pub fn data(mut self, data: Value) -> Self {
        match data {
            Value::Object(map) => self.data = Some(map),
            other => tracing::warn!(data = %other, "Ignoring notification data that is not an object"),
        }
        self
    }

    /// Subject line: the title, or `"Home Assistant"`.
    pub fn subject(&self) -> &str {
        self.title.as_deref().unwrap_or(ATTR_TITLE_DEFAULT)
    }

    /// Paths listed under `data.images`.
    ///
    /// A single string is accepted as a one-element list. Non-string
    /// entries are skipped.
    pub fn image_paths(&self) -> Vec<String> {
        let Some(images) = self.data.as_ref().and_then(|d| d.get(ATTR_IMAGES)) else {
            return Vec::new();
        };

        match images {
            Value::String(path) => vec![path.clone()],
            Value::Array(items) => items
                .iter()
                .filter_map(|item| match item.as_str() {
                    Some(path) => Some(path.to_string()),
                    None => {
                        tracing::warn!(entry = %item, "Skipping non-string image entry");
                        None
                    }
                })
                .collect(),
            Value::Null => Vec::new(),
            other => {
                tracing::warn!(images = %other, "Ignoring malformed images value");
                Vec::new()
            }
        }
    }
}

/// A single email handed to the provider client.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OutboundMessage {
    pub sender: Address,
    pub recipient: Address,
    pub subject: String,
    pub text: String,
    pub attachments: Vec<Attachment>,
}

impl OutboundMessage {
    /// Build the message for a notification body and its options.
    pub fn from_notification(
        sender: Address,
        recipient: Address,
        text: &str,
        options: &NotifyOptions,
    ) -> Self {
        Self {
            sender,
            recipient,
            subject: options.subject().to_string(),
            text: text.to_string(),
            attachments: options
                .image_paths()
                .iter()
                .map(Attachment::from_path)
                .collect(),
        }
    }
}
