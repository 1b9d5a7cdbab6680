//! Preview host.
//!
//! Serves a host page with the widget mounted through declarative shadow DOM,
//! plus a demo echo webhook so the widget can be exercised locally.

use std::sync::Arc;

use axum::{
    Json, Router,
    extract::{Query, State},
    http::StatusCode,
    response::{Html, IntoResponse, Response},
    routing::{get, post},
};
use serde::{Deserialize, Serialize};
use tower_http::trace::TraceLayer;
use tracing::info;

use crate::config::{AppConfig, WidgetConfig};
use crate::session::MemoryStorage;
use crate::ui::HtmlMount;
use crate::webhook::WebhookRequest;
use crate::widget::ChatWidget;

/// State shared across preview handlers.
#[derive(Debug, Clone)]
pub struct PreviewState {
    /// Widget configuration rendered on every page.
    pub widget: Arc<WidgetConfig>,
}

/// Query parameters for preview pages.
#[derive(Debug, Default, Deserialize)]
pub struct PreviewQuery {
    /// Render the panel opened instead of collapsed to the launcher.
    #[serde(default)]
    pub open: bool,
}

/// Reply from the demo echo webhook.
#[derive(Debug, Serialize, Deserialize)]
pub struct EchoReply {
    pub output: String,
}

/// Build the preview router.
pub fn build_router(state: PreviewState) -> Router {
    Router::new()
        .route("/", get(index_handler))
        .route("/widget", get(widget_handler))
        .route("/webhook/echo", post(echo_webhook))
        .route("/health", get(health_handler))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// Start the preview server with the provided configuration.
pub async fn start_server(config: Arc<AppConfig>) -> anyhow::Result<()> {
    info!(
        name: "widget.config.loaded",
        webhook_url = %config.widget.webhook_url,
        "Widget configuration loaded"
    );

    let app = build_router(PreviewState {
        widget: Arc::new(config.widget.clone()),
    });

    let addr = format!("{}:{}", config.server.host, config.server.port);
    let listener = tokio::net::TcpListener::bind(&addr).await?;

    info!(
        name: "server.started",
        address = %addr,
        "Server started"
    );

    axum::serve(listener, app.into_make_service()).await?;
    Ok(())
}

/// Render the widget host fragment for `config`.
///
/// The widget is built against a throwaway in-memory storage, so every render
/// carries a fresh session id and only the welcome message.
pub fn render_widget(config: &WidgetConfig, open: bool) -> Result<String, (StatusCode, String)> {
    let mount = Arc::new(HtmlMount::new());
    let widget = ChatWidget::with_http(config.clone(), &MemoryStorage::new(), mount.clone())
        .map_err(|e| {
            tracing::error!(error = %e, "Failed to build preview widget");
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                format!("Invalid widget configuration: {e}"),
            )
        })?;

    if open {
        widget.toggle();
    }

    mount.host_html().ok_or_else(|| {
        (
            StatusCode::INTERNAL_SERVER_ERROR,
            "Widget did not mount".to_string(),
        )
    })
}

fn html_shell(title: &str, widget: &str) -> String {
    format!(
        r#"<!DOCTYPE html>
<html lang="en">
<head>
    <meta charset="utf-8">
    <meta name="viewport" content="width=device-width, initial-scale=1">
    <title>{title} - Widget Preview</title>
    <style>
        body {{ font-family: system-ui, sans-serif; margin: 0; min-height: 100vh; background: #0f172a; color: #e2e8f0; }}
        main {{ max-width: 40rem; margin: 0 auto; padding: 4rem 1.5rem; }}
        /* Host styles must not reach inside the widget. */
        .bubble, .chat-container {{ outline: 3px solid red; }}
    </style>
</head>
<body>
    <main>
        <h1>{title}</h1>
        <p>The widget is mounted in the bottom-right corner. <a href="/?open=true">Open it</a>.</p>
    </main>
    {widget}
</body>
</html>"#
    )
}

/// GET / - Host page with the widget mounted.
async fn index_handler(
    State(state): State<PreviewState>,
    Query(query): Query<PreviewQuery>,
) -> Response {
    match render_widget(&state.widget, query.open) {
        Ok(widget) => Html(html_shell(
            &crate::ui::escape::escape_attr(&state.widget.chat_title),
            &widget,
        ))
        .into_response(),
        Err(err) => err.into_response(),
    }
}

/// GET /widget - Widget host fragment only.
async fn widget_handler(
    State(state): State<PreviewState>,
    Query(query): Query<PreviewQuery>,
) -> Response {
    match render_widget(&state.widget, query.open) {
        Ok(widget) => Html(widget).into_response(),
        Err(err) => err.into_response(),
    }
}

/// POST /webhook/echo - Demo webhook that repeats the message.
async fn echo_webhook(Json(req): Json<WebhookRequest>) -> Json<EchoReply> {
    tracing::info!(
        session_id = %req.session_id,
        timestamp = %req.timestamp,
        message_length = req.message.len(),
        "Echo webhook received message"
    );
    Json(EchoReply {
        output: format!("You said: {}", req.message),
    })
}

/// GET /health
async fn health_handler() -> impl IntoResponse {
    "ok"
}
