//! Adapter configuration and its validation.
//!
//! Configuration arrives either as a raw key/value document from the host
//! (`from_value`) or from environment variables (`from_env`).
//!
//! | Key | Env var | Required | Default |
//! |-----|---------|----------|---------|
//! | `token` | `MAILGUN_API_KEY` | yes | |
//! | `recipient` | `MAILGUN_RECIPIENT` | yes | |
//! | `domain` | `MAILGUN_DOMAIN` | no | resolved from the account |
//! | `sender` | `MAILGUN_SENDER` | no | `hass@{domain}` |
//! | `sandbox` | `MAILGUN_SANDBOX` | no | `false` |
//! | `name` | | no | `notify` |
//! | `base_url` | `MAILGUN_BASE_URL` | no | `https://api.mailgun.net/v3` |

use serde::Serialize;
use serde_json::{Map, Value};
use std::env;

use crate::address::Address;
use crate::error::NotifyError;

/// Default Mailgun API endpoint (US region).
pub const MAILGUN_BASE_URL: &str = "https://api.mailgun.net/v3";

/// Default sandbox value.
pub const DEFAULT_SANDBOX: bool = false;

/// Default service name.
pub const DEFAULT_NAME: &str = "notify";

/// Validated adapter configuration.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MailgunConfig {
    /// Mailgun API key.
    #[serde(skip_serializing)]
    pub token: String,
    /// Where notifications go.
    pub recipient: Address,
    /// Sending domain; resolved from the account when absent.
    pub domain: Option<String>,
    /// Explicit sender; `hass@{domain}` when absent.
    pub sender: Option<Address>,
    /// Pick the account's sandbox domain when no domain is configured.
    pub sandbox: bool,
    /// Service name registered with the host.
    pub name: String,
    /// API endpoint.
    pub base_url: String,
}

impl MailgunConfig {
    /// Create a configuration from a token and a recipient address.
    ///
    /// ```
    /// use mailgun_notify::MailgunConfig;
    ///
    /// let config = MailgunConfig::new("key-abc", "me@example.com")
    ///     .unwrap()
    ///     .sandbox(true);
    /// assert!(config.sandbox);
    /// assert!(MailgunConfig::new("key-abc", "nope").is_err());
    /// ```
    pub fn new(token: impl Into<String>, recipient: &str) -> Result<Self, NotifyError> {
        let token = token.into();
        if token.is_empty() {
            return Err(NotifyError::MissingField("token"));
        }

        Ok(Self {
            token,
            recipient: Address::parse(recipient)?,
            domain: None,
            sender: None,
            sandbox: DEFAULT_SANDBOX,
            name: DEFAULT_NAME.to_string(),
            base_url: MAILGUN_BASE_URL.to_string(),
        })
    }

    /// Set the sending domain.
    pub fn domain(mut self, domain: impl Into<String>) -> Self {
        self.domain = Some(domain.into());
        self
    }

    /// Set an explicit sender address.
    pub fn sender(mut self, sender: &str) -> Result<Self, NotifyError> {
        self.sender = Some(Address::parse(sender)?);
        Ok(self)
    }

    /// Set the sandbox flag.
    pub fn sandbox(mut self, sandbox: bool) -> Self {
        self.sandbox = sandbox;
        self
    }

    /// Set the service name.
    pub fn name(mut self, name: impl Into<String>) -> Self {
        self.name = name.into();
        self
    }

    /// Set a custom base URL (e.g., for EU: "https://api.eu.mailgun.net/v3").
    pub fn base_url(mut self, url: impl Into<String>) -> Self {
        self.base_url = url.into();
        self
    }

    /// Validate a raw configuration document.
    ///
    /// Keys this adapter does not know (such as the host's `platform`)
    /// are ignored.
    ///
    /// ```
    /// use mailgun_notify::MailgunConfig;
    /// use serde_json::json;
    ///
    /// let config = MailgunConfig::from_value(&json!({
    ///     "platform": "mailgun",
    ///     "token": "abc",
    ///     "recipient": "a@b.com",
    ///     "sandbox": "yes",
    /// }))
    /// .unwrap();
    /// assert!(config.sandbox);
    /// assert_eq!(config.sender, None);
    /// ```
    pub fn from_value(raw: &Value) -> Result<Self, NotifyError> {
        let map = raw.as_object().ok_or_else(|| {
            NotifyError::Configuration("expected a mapping of configuration keys".into())
        })?;
        Self::from_map(map)
    }

    /// Validate a raw configuration mapping.
    pub fn from_map(map: &Map<String, Value>) -> Result<Self, NotifyError> {
        let token = string_field(map, "token")?.ok_or(NotifyError::MissingField("token"))?;
        let recipient =
            string_field(map, "recipient")?.ok_or(NotifyError::MissingField("recipient"))?;

        let mut config = Self::new(token, &recipient)?;

        if let Some(domain) = string_field(map, "domain")? {
            config = config.domain(domain);
        }
        if let Some(sender) = string_field(map, "sender")? {
            config = config.sender(&sender)?;
        }
        if let Some(value) = map.get("sandbox").filter(|v| !v.is_null()) {
            config.sandbox = coerce_bool("sandbox", value)?;
        }
        if let Some(name) = string_field(map, "name")? {
            config = config.name(name);
        }
        if let Some(base_url) = string_field(map, "base_url")? {
            config = config.base_url(base_url);
        }

        Ok(config)
    }

    /// Build configuration from environment variables.
    ///
    /// ```bash
    /// MAILGUN_API_KEY=key-xxxxx
    /// MAILGUN_RECIPIENT=me@example.com
    /// MAILGUN_SANDBOX=true
    /// ```
    pub fn from_env() -> Result<Self, NotifyError> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    pub(crate) fn from_lookup<F>(lookup: F) -> Result<Self, NotifyError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut map = Map::new();
        for (key, var) in [
            ("token", "MAILGUN_API_KEY"),
            ("recipient", "MAILGUN_RECIPIENT"),
            ("domain", "MAILGUN_DOMAIN"),
            ("sender", "MAILGUN_SENDER"),
            ("sandbox", "MAILGUN_SANDBOX"),
            ("base_url", "MAILGUN_BASE_URL"),
        ] {
            if let Some(value) = lookup(var) {
                map.insert(key.to_string(), Value::String(value));
            }
        }

        Self::from_map(&map).map_err(|e| match e {
            NotifyError::MissingField("token") => {
                NotifyError::Configuration("MAILGUN_API_KEY not set".into())
            }
            NotifyError::MissingField("recipient") => {
                NotifyError::Configuration("MAILGUN_RECIPIENT not set".into())
            }
            other => other,
        })
    }
}

/// Read an optional string field. Numbers and booleans are stringified,
/// null counts as absent.
fn string_field(map: &Map<String, Value>, key: &'static str) -> Result<Option<String>, NotifyError> {
    match map.get(key) {
        None | Some(Value::Null) => Ok(None),
        Some(Value::String(s)) => Ok(Some(s.clone())),
        Some(Value::Number(n)) => Ok(Some(n.to_string())),
        Some(Value::Bool(b)) => Ok(Some(b.to_string())),
        Some(other) => Err(NotifyError::Configuration(format!(
            "expected a string for '{}', got {}",
            key, other
        ))),
    }
}

/// Coerce a configuration value to a boolean the way a YAML-minded user
/// writes it.
fn coerce_bool(key: &str, value: &Value) -> Result<bool, NotifyError> {
    let invalid = || {
        NotifyError::Configuration(format!("invalid boolean value for '{}': {}", key, value))
    };

    match value {
        Value::Bool(b) => Ok(*b),
        Value::Number(n) => n.as_f64().map(|f| f != 0.0).ok_or_else(invalid),
        Value::String(s) => match s.to_lowercase().as_str() {
            "1" | "true" | "yes" | "on" | "enable" => Ok(true),
            "0" | "false" | "no" | "off" | "disable" => Ok(false),
            _ => Err(invalid()),
        },
        _ => Err(invalid()),
    }
}
