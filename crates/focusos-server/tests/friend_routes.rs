use axum::{
    body::{to_bytes, Body},
    http::{Request, StatusCode},
    Router,
};
use focusos_core::mail::{InviteSigner, MailClient};
use focusos_core::storage::MailConfig;
use focusos_server::{create_router, state::AppState};
use serde_json::{json, Value};
use tower::ServiceExt;

fn app(mail: MailClient, secret: Option<&str>) -> Router {
    let config = MailConfig {
        invite_secret: secret.map(str::to_string),
        ..MailConfig::default()
    };
    create_router(AppState::new(mail, &config).unwrap())
}

fn unconfigured() -> MailClient {
    MailClient::new("http://127.0.0.1:9", None)
}

fn invite() -> Value {
    json!({
        "friendEmail": "rachel.k@example.com",
        "friendName": "Rachel",
        "senderName": "Sam",
        "senderEmail": "sam@example.com",
    })
}

async fn call(app: Router, method: &str, uri: &str, body: Option<String>) -> (StatusCode, Value) {
    let mut request = Request::builder().method(method).uri(uri);
    let body = match body {
        Some(body) => {
            request = request.header("content-type", "application/json");
            Body::from(body)
        }
        None => Body::empty(),
    };
    let response = app.oneshot(request.body(body).unwrap()).await.unwrap();
    let status = response.status();
    let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    (status, serde_json::from_slice(&bytes).unwrap())
}

async fn post(app: Router, uri: &str, body: Value) -> (StatusCode, Value) {
    call(app, "POST", uri, Some(body.to_string())).await
}

#[tokio::test]
async fn send_request_requires_every_field() {
    let mut body = invite();
    body["senderName"] = json!("");
    let (status, json) = post(app(unconfigured(), None), "/api/friends/send-request", body).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(json, json!({ "error": "Missing required fields" }));
}

#[tokio::test]
async fn null_fields_count_as_missing() {
    for uri in ["/api/friends/send-request", "/api/friends/accept"] {
        let mut body = invite();
        body["senderName"] = Value::Null;
        let (status, json) = post(app(unconfigured(), None), uri, body).await;
        assert_eq!(status, StatusCode::BAD_REQUEST, "{uri}");
        assert_eq!(json, json!({ "error": "Missing required fields" }), "{uri}");
    }
}

#[tokio::test]
async fn malformed_body_is_rejected() {
    let (status, json) = call(
        app(unconfigured(), None),
        "POST",
        "/api/friends/send-request",
        Some("{not json".into()),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(json["error"], "Invalid request body");
}

#[tokio::test]
async fn send_request_without_provider_succeeds_without_sending() {
    let (status, json) = post(app(unconfigured(), None), "/api/friends/send-request", invite()).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(
        json,
        json!({
            "success": true,
            "message": "Friend request processed successfully (email service not configured)",
            "data": null,
        })
    );
}

#[tokio::test]
async fn send_request_delivers_through_provider() {
    let mut provider = mockito::Server::new_async().await;
    let mock = provider
        .mock("POST", "/emails")
        .match_header("authorization", "Bearer re_test")
        .match_body(mockito::Matcher::PartialJson(json!({
            "to": ["rachel.k@example.com"],
            "subject": "Sam wants to be your friend on FocusOS!",
        })))
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_body(r#"{"id":"msg_1"}"#)
        .create_async()
        .await;

    let mail = MailClient::new(provider.url(), Some("re_test".into()));
    let (status, json) = post(app(mail, None), "/api/friends/send-request", invite()).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["message"], "Friend request email sent successfully");
    assert_eq!(json["data"]["id"], "msg_1");
    mock.assert_async().await;
}

#[tokio::test]
async fn provider_failure_is_a_500() {
    let mut provider = mockito::Server::new_async().await;
    provider
        .mock("POST", "/emails")
        .with_status(500)
        .with_body("boom")
        .create_async()
        .await;

    let mail = MailClient::new(provider.url(), Some("re_test".into()));
    let (status, json) = post(app(mail.clone(), None), "/api/friends/send-request", invite()).await;
    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(json, json!({ "error": "Failed to send email" }));

    let (status, json) = post(app(mail, None), "/api/friends/accept", invite()).await;
    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(json, json!({ "error": "Failed to send acceptance email" }));
}

#[tokio::test]
async fn accept_notifies_sender() {
    let mut provider = mockito::Server::new_async().await;
    let mock = provider
        .mock("POST", "/emails")
        .match_body(mockito::Matcher::PartialJson(json!({
            "to": ["sam@example.com"],
            "subject": "Rachel accepted your friend request on FocusOS!",
        })))
        .with_status(200)
        .with_body(r#"{"id":"msg_2"}"#)
        .create_async()
        .await;

    let mail = MailClient::new(provider.url(), Some("re_test".into()));
    let (status, json) = post(app(mail, None), "/api/friends/accept", invite()).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["message"], "Friend request accepted successfully");
    assert_eq!(json["data"]["id"], "msg_2");
    mock.assert_async().await;
}

#[tokio::test]
async fn accept_without_provider() {
    let (status, json) = post(app(unconfigured(), None), "/api/friends/accept", invite()).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(
        json["message"],
        "Friend request accepted successfully (email service not configured)"
    );
    assert!(json["data"].is_null());
}

#[tokio::test]
async fn signed_accept_links_are_verified() {
    let secret = "s3cret";
    let token = InviteSigner::new(secret)
        .unwrap()
        .sign("rachel.k@example.com", "sam@example.com");

    let (status, json) = post(app(unconfigured(), Some(secret)), "/api/friends/accept", invite()).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(json, json!({ "error": "Invalid invitation token" }));

    let mut forged = invite();
    forged["token"] = json!("00ff");
    let (status, _) = post(app(unconfigured(), Some(secret)), "/api/friends/accept", forged).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let mut signed = invite();
    signed["token"] = json!(token);
    let (status, json) = post(app(unconfigured(), Some(secret)), "/api/friends/accept", signed).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["success"], true);
}

#[tokio::test]
async fn mail_status_reports_configuration() {
    let (status, json) = call(app(unconfigured(), None), "GET", "/api/friends/test", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["hasApiKey"], false);
    assert_eq!(json["status"], "Email API not configured");

    let configured = MailClient::new("http://127.0.0.1:9", Some("re_live".into()));
    let (_, json) = call(app(configured, None), "GET", "/api/friends/test", None).await;
    assert_eq!(json["hasApiKey"], true);
    assert_eq!(json["message"], "Email functionality is ready and configured.");
}
