//! Notification service tests.
//!
//! Mailgun is mocked with wiremock; `.expect(n)` on the domains endpoint
//! counts how many times a client was created.

use mailgun_notify::{
    get_service, get_service_with, MailgunConfig, MailgunNotificationService,
    NotificationService, NotifyOptions,
};
use reqwest::Client;
use serde_json::json;
use wiremock::matchers::{body_string_contains, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

// ============================================================================
// Helper Functions
// ============================================================================

fn config(server: &MockServer) -> MailgunConfig {
    MailgunConfig::from_value(&json!({
        "token": "abc",
        "recipient": "a@b.com",
        "sandbox": true,
        "base_url": server.uri(),
    }))
    .unwrap()
}

fn domains_response() -> ResponseTemplate {
    ResponseTemplate::new(200).set_body_json(json!({
        "total_count": 1,
        "items": [{"name": "sandbox123.mailgun.org", "type": "sandbox", "state": "active"}]
    }))
}

fn success_response() -> ResponseTemplate {
    ResponseTemplate::new(200).set_body_json(json!({
        "message": "Queued. Thank you.",
        "id": "<20240101000000.1.1@sandbox123.mailgun.org>"
    }))
}

async fn mount_domains(server: &MockServer, times: u64) {
    Mock::given(method("GET"))
        .and(path("/domains"))
        .respond_with(domains_response())
        .expect(times)
        .mount(server)
        .await;
}

async fn mount_messages(server: &MockServer, times: u64) {
    Mock::given(method("POST"))
        .and(path("/sandbox123.mailgun.org/messages"))
        .respond_with(success_response())
        .expect(times)
        .mount(server)
        .await;
}

// ============================================================================
// Credential Check Tests
// ============================================================================

#[tokio::test]
async fn valid_connection_defaults_sender_to_resolved_domain() {
    let server = MockServer::start().await;
    mount_domains(&server, 1).await;

    let mut service = MailgunNotificationService::new(config(&server));
    assert!(service.sender().is_none());

    assert!(service.connection_is_valid().await);
    assert!(service.has_client());
    assert_eq!(service.domain(), Some("sandbox123.mailgun.org"));
    assert_eq!(
        service.sender().map(|a| a.email.as_str()),
        Some("hass@sandbox123.mailgun.org")
    );
}

#[tokio::test]
async fn configured_sender_is_not_overridden() {
    let server = MockServer::start().await;
    mount_domains(&server, 1).await;

    let config = config(&server).sender("alerts@b.com").unwrap();
    let mut service = MailgunNotificationService::new(config);

    assert!(service.connection_is_valid().await);
    assert_eq!(service.sender().map(|a| a.email.as_str()), Some("alerts@b.com"));
}

#[tokio::test]
async fn repeated_checks_reuse_the_client() {
    let server = MockServer::start().await;
    mount_domains(&server, 1).await;

    let mut service = MailgunNotificationService::new(config(&server));
    assert!(service.connection_is_valid().await);
    assert!(service.connection_is_valid().await);
}

#[tokio::test]
async fn invalid_credentials_yield_no_service() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/domains"))
        .respond_with(ResponseTemplate::new(401).set_body_string("Forbidden"))
        .expect(1)
        .mount(&server)
        .await;

    let mut service = MailgunNotificationService::new(config(&server));
    assert!(!service.connection_is_valid().await);
    assert!(!service.has_client());

    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/domains"))
        .respond_with(ResponseTemplate::new(401).set_body_string("Forbidden"))
        .mount(&server)
        .await;
    assert!(get_service(config(&server)).await.is_none());
}

#[tokio::test]
async fn failed_connection_leaves_domain_and_sender_untouched() {
    let server = MockServer::start().await;
    mount_domains(&server, 1).await;

    let config = config(&server).domain("mg.not-mine.org");
    let mut service = MailgunNotificationService::new(config);

    assert!(!service.connection_is_valid().await);
    assert!(!service.has_client());
    assert_eq!(service.domain(), Some("mg.not-mine.org"));
    assert!(service.sender().is_none());
}

#[tokio::test]
async fn unknown_domain_yields_no_service() {
    let server = MockServer::start().await;
    mount_domains(&server, 1).await;

    let config = config(&server).domain("mg.not-mine.org");
    assert!(get_service_with(config, Client::new()).await.is_none());
}

#[tokio::test]
async fn unreachable_api_yields_no_service() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/domains"))
        .respond_with(ResponseTemplate::new(503))
        .mount(&server)
        .await;

    assert!(get_service(config(&server)).await.is_none());
}

// ============================================================================
// Send Tests
// ============================================================================

#[tokio::test]
async fn two_sends_create_the_client_once() {
    let server = MockServer::start().await;
    mount_domains(&server, 1).await;
    mount_messages(&server, 2).await;

    let mut service = get_service(config(&server)).await.unwrap();
    service.send_message("first", NotifyOptions::new()).await;
    service.send_message("second", NotifyOptions::new()).await;
}

#[tokio::test]
async fn send_without_check_creates_client_lazily() {
    let server = MockServer::start().await;
    mount_domains(&server, 1).await;
    mount_messages(&server, 1).await;

    let mut service = MailgunNotificationService::new(config(&server));
    assert!(!service.has_client());

    service.send_message("hello", NotifyOptions::new()).await;
    assert!(service.has_client());
    assert_eq!(
        service.sender().map(|a| a.email.as_str()),
        Some("hass@sandbox123.mailgun.org")
    );
}

#[tokio::test]
async fn send_without_title_uses_default_subject() {
    let server = MockServer::start().await;
    mount_domains(&server, 1).await;

    Mock::given(method("POST"))
        .and(path("/sandbox123.mailgun.org/messages"))
        .and(body_string_contains("Home Assistant"))
        .and(body_string_contains("hass@sandbox123.mailgun.org"))
        .and(body_string_contains("Washing machine finished"))
        .respond_with(success_response())
        .expect(1)
        .mount(&server)
        .await;

    let mut service = get_service(config(&server)).await.unwrap();
    service
        .send_message("Washing machine finished", NotifyOptions::new())
        .await;
}

#[tokio::test]
async fn send_with_title_and_images_forwards_attachments() {
    let server = MockServer::start().await;
    mount_domains(&server, 1).await;

    let dir = tempfile::tempdir().unwrap();
    let front = dir.path().join("front.jpg");
    let back = dir.path().join("back.jpg");
    std::fs::write(&front, b"front-door-frame").unwrap();
    std::fs::write(&back, b"back-door-frame").unwrap();

    Mock::given(method("POST"))
        .and(path("/sandbox123.mailgun.org/messages"))
        .and(body_string_contains("Motion"))
        .and(body_string_contains("filename=\"front.jpg\""))
        .and(body_string_contains("filename=\"back.jpg\""))
        .and(body_string_contains("front-door-frame"))
        .respond_with(success_response())
        .expect(1)
        .mount(&server)
        .await;

    let options = NotifyOptions::new().title("Motion").data(json!({
        "images": [front.to_str().unwrap(), back.to_str().unwrap()]
    }));

    let mut service = get_service(config(&server)).await.unwrap();
    service
        .send_message("Movement in the garden", options)
        .await;
}

#[tokio::test]
async fn send_failure_is_swallowed() {
    let server = MockServer::start().await;
    mount_domains(&server, 1).await;

    Mock::given(method("POST"))
        .and(path("/sandbox123.mailgun.org/messages"))
        .respond_with(ResponseTemplate::new(400).set_body_json(json!({
            "message": "'to' parameter is not a valid address"
        })))
        .expect(1)
        .mount(&server)
        .await;

    let mut service = get_service(config(&server)).await.unwrap();
    service.send_message("ignored", NotifyOptions::new()).await;

    // The client survives a failed send.
    assert!(service.has_client());
}

#[tokio::test]
async fn missing_image_is_swallowed_without_request() {
    let server = MockServer::start().await;
    mount_domains(&server, 1).await;
    mount_messages(&server, 0).await;

    let options = NotifyOptions::new().data(json!({"images": ["/no/such/camera.jpg"]}));

    let mut service = get_service(config(&server)).await.unwrap();
    service.send_message("Snapshot", options).await;
}

#[tokio::test]
async fn send_with_rejected_credentials_returns_normally() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/domains"))
        .respond_with(ResponseTemplate::new(401))
        .expect(1)
        .mount(&server)
        .await;
    mount_messages(&server, 0).await;

    let mut service = MailgunNotificationService::new(config(&server));
    service.send_message("never delivered", NotifyOptions::new()).await;
    assert!(!service.has_client());
}

#[tokio::test]
async fn works_as_boxed_notification_service() {
    let server = MockServer::start().await;
    mount_domains(&server, 1).await;
    mount_messages(&server, 1).await;

    let service = get_service(config(&server)).await.unwrap();
    let mut boxed: Box<dyn NotificationService> = Box::new(service);

    assert_eq!(boxed.service_name(), "mailgun");
    boxed
        .send_message("via trait object", NotifyOptions::new().title("Boxed"))
        .await;
}
