//! Real HTTP round trips against a local Axum server.

use std::net::SocketAddr;
use std::sync::{Arc, Mutex};

use axum::{
    Json, Router,
    http::{HeaderMap, StatusCode},
    routing::post,
};
use orbit_widget::config::WidgetConfig;
use orbit_widget::server::{PreviewState, build_router};
use orbit_widget::session::MemoryStorage;
use orbit_widget::ui::HtmlMount;
use orbit_widget::webhook::{
    CONNECTION_ERROR_REPLY, FALLBACK_REPLY, HttpWebhook, WebhookError, WebhookRequest,
    WebhookTransport,
};
use orbit_widget::widget::{ChatWidget, Message};
use serde_json::{Value, json};

async fn spawn(app: Router) -> SocketAddr {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });
    addr
}

type Captured = Arc<Mutex<Vec<(Option<String>, Value)>>>;

/// Webhook that records content type and body, then answers with `reply`.
fn capturing_hook(reply: (StatusCode, &'static str)) -> (Router, Captured) {
    let captured: Captured = Arc::default();
    let sink = Arc::clone(&captured);
    let app = Router::new().route(
        "/hook",
        post(move |headers: HeaderMap, Json(body): Json<Value>| {
            let sink = Arc::clone(&sink);
            async move {
                let content_type = headers
                    .get("content-type")
                    .and_then(|v| v.to_str().ok())
                    .map(str::to_string);
                sink.lock().unwrap().push((content_type, body));
                (reply.0, reply.1)
            }
        }),
    );
    (app, captured)
}

#[tokio::test]
async fn test_envelope_on_the_wire() {
    let (app, captured) = capturing_hook((StatusCode::OK, r#"{"output":"Hello!"}"#));
    let addr = spawn(app).await;

    let webhook = HttpWebhook::new(format!("http://{addr}/hook")).unwrap();
    let reply = webhook
        .send(&WebhookRequest::new("Hi", "session-abc123xyz"))
        .await
        .unwrap();
    assert_eq!(reply.message(), "Hello!");

    let captured = captured.lock().unwrap();
    assert_eq!(captured.len(), 1);
    let (content_type, body) = &captured[0];
    assert_eq!(content_type.as_deref(), Some("application/json"));
    assert_eq!(body["message"], "Hi");
    assert_eq!(body["sessionId"], "session-abc123xyz");
    let timestamp = body["timestamp"].as_str().unwrap();
    assert!(chrono::DateTime::parse_from_rfc3339(timestamp).is_ok());
    assert_eq!(body.as_object().unwrap().len(), 3);
}

#[tokio::test]
async fn test_error_status_with_json_body_is_a_reply() {
    let (app, _) = capturing_hook((StatusCode::INTERNAL_SERVER_ERROR, r#"{"text":"degraded"}"#));
    let addr = spawn(app).await;

    let webhook = HttpWebhook::new(format!("http://{addr}/hook")).unwrap();
    let reply = webhook.send(&WebhookRequest::new("Hi", "s")).await.unwrap();
    assert_eq!(reply.message(), "degraded");
}

#[tokio::test]
async fn test_non_json_body_is_an_error() {
    let (app, _) = capturing_hook((StatusCode::OK, "<html>gateway</html>"));
    let addr = spawn(app).await;

    let webhook = HttpWebhook::new(format!("http://{addr}/hook")).unwrap();
    let err = webhook.send(&WebhookRequest::new("Hi", "s")).await.unwrap_err();
    assert!(matches!(err, WebhookError::Json(_)));
}

#[tokio::test]
async fn test_json_without_reply_fields_uses_fallback() {
    let (app, _) = capturing_hook((StatusCode::OK, "[1, 2, 3]"));
    let addr = spawn(app).await;

    let webhook = HttpWebhook::new(format!("http://{addr}/hook")).unwrap();
    let reply = webhook.send(&WebhookRequest::new("Hi", "s")).await.unwrap();
    assert_eq!(reply.message(), FALLBACK_REPLY);
}

#[tokio::test]
async fn test_unreachable_webhook_shows_connection_error() {
    // Bind then drop to get a port nothing listens on.
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    drop(listener);

    let mount = Arc::new(HtmlMount::new());
    let widget = ChatWidget::with_http(
        WidgetConfig::new(format!("http://{addr}/hook")),
        &MemoryStorage::new(),
        mount.clone(),
    )
    .unwrap();

    let reply = widget.send_message("Hi").await;
    assert_eq!(reply, Some(Message::bot(CONNECTION_ERROR_REPLY)));
    assert!(!mount.typing_visible());
}

#[tokio::test]
async fn test_widget_against_echo_webhook() {
    let app = build_router(PreviewState {
        widget: Arc::new(WidgetConfig::new("http://unused.invalid/")),
    });
    let addr = spawn(app).await;

    let mount = Arc::new(HtmlMount::new());
    let widget = ChatWidget::with_http(
        WidgetConfig::new(format!("http://{addr}/webhook/echo")),
        &MemoryStorage::new(),
        mount.clone(),
    )
    .unwrap();

    let reply = widget.send_message("  ping\npong  ").await;
    assert_eq!(reply, Some(Message::bot("You said: ping\npong")));
    assert!(mount.transcript()[2].contains("You said: ping<br>pong"));

    let echoed: Value = reqwest::Client::new()
        .post(format!("http://{addr}/webhook/echo"))
        .json(&json!({"message": "x", "sessionId": "s", "timestamp": "t"}))
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    assert_eq!(echoed, json!({"output": "You said: x"}));
}
