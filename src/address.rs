//! Validated email address.

use crate::error::NotifyError;
use email_address::{EmailAddress, Options};
use serde::{Deserialize, Serialize};
use std::fmt;

/// A bare, validated email address.
///
/// # Examples
///
/// ```
/// use mailgun_notify::Address;
///
/// let addr = Address::parse("hass@example.com").unwrap();
/// assert_eq!(addr.email, "hass@example.com");
///
/// assert!(Address::parse("not-an-email").is_err());
/// assert!(Address::parse("Hass <hass@example.com>").is_err());
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Address {
    /// Email address (e.g., "hass@example.com")
    pub email: String,
}

impl Address {
    /// Parse and validate an email address.
    ///
    /// Uses RFC 5321/5322 compliant validation, without display text
    /// (`Name <user@host>`) and with a top-level domain required.
    pub fn parse(email: &str) -> Result<Self, NotifyError> {
        let options = Options::default()
            .without_display_text()
            .with_required_tld();

        EmailAddress::parse_with_options(email, options).map_err(|e| {
            NotifyError::InvalidAddress(format!(
                "'{}' is not a valid email address: {}",
                email, e
            ))
        })?;

        Ok(Self {
            email: email.to_string(),
        })
    }

    /// The default sender for a sending domain: `hass@{domain}`.
    pub fn default_sender(domain: &str) -> Result<Self, NotifyError> {
        Self::parse(&format!("hass@{}", domain))
    }
}

impl fmt::Display for Address {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.email)
    }
}
