//! Notification service trait.
//!
//! The host keeps registered services as `Box<dyn NotificationService>`,
//! which is why this uses `#[async_trait]` rather than a native async
//! trait: native async methods are not object-safe.

use async_trait::async_trait;

use crate::message::NotifyOptions;

/// A target the host can push notifications to.
///
/// `send_message` is fire-and-forget: implementations log delivery
/// problems instead of returning them.
///
/// # Example
///
/// ```ignore
/// use mailgun_notify::{NotificationService, NotifyOptions};
///
/// let mut services: Vec<Box<dyn NotificationService>> = vec![Box::new(mailgun)];
/// for service in &mut services {
///     service
///         .send_message("Front door opened", NotifyOptions::new().title("Alarm"))
///         .await;
/// }
/// ```
#[async_trait]
pub trait NotificationService: Send {
    /// Send a notification body with its options.
    async fn send_message(&mut self, message: &str, options: NotifyOptions);

    /// Service name (for logging/debugging).
    fn service_name(&self) -> &'static str {
        "unknown"
    }
}
