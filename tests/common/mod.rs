//! Test doubles shared by the integration tests.

#![allow(dead_code)]

use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use orbit_widget::config::WidgetConfig;
use orbit_widget::session::MemoryStorage;
use orbit_widget::ui::HtmlMount;
use orbit_widget::webhook::error::Result;
use orbit_widget::webhook::{WebhookError, WebhookReply, WebhookRequest, WebhookTransport};
use orbit_widget::widget::{ChatWidget, Sender};
use serde_json::Value;
use tokio::sync::oneshot;

/// Answers every request with a fixed outcome and records what was sent.
#[derive(Default)]
pub struct RecordingWebhook {
    pub body: Option<Value>,
    pub requests: Mutex<Vec<WebhookRequest>>,
}

impl RecordingWebhook {
    pub fn replying(body: Value) -> Arc<Self> {
        Arc::new(Self {
            body: Some(body),
            requests: Mutex::new(Vec::new()),
        })
    }

    pub fn failing() -> Arc<Self> {
        Arc::new(Self::default())
    }

    pub fn requests(&self) -> Vec<WebhookRequest> {
        self.requests.lock().unwrap().clone()
    }
}

#[async_trait]
impl WebhookTransport for RecordingWebhook {
    async fn send(&self, request: &WebhookRequest) -> Result<WebhookReply> {
        self.requests.lock().unwrap().push(request.clone());
        match &self.body {
            Some(body) => Ok(WebhookReply::from_json(body)),
            None => Err(WebhookError::Transport("connection refused".to_string())),
        }
    }
}

/// Holds each request until the test releases the gate registered for its
/// message text.
#[derive(Default)]
pub struct GatedWebhook {
    gates: Mutex<HashMap<String, oneshot::Receiver<Option<Value>>>>,
}

impl GatedWebhook {
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    /// Register a gate for `message`. Send `Some(body)` to reply, `None` to fail.
    pub fn gate(&self, message: &str) -> oneshot::Sender<Option<Value>> {
        let (tx, rx) = oneshot::channel();
        self.gates.lock().unwrap().insert(message.to_string(), rx);
        tx
    }
}

#[async_trait]
impl WebhookTransport for GatedWebhook {
    async fn send(&self, request: &WebhookRequest) -> Result<WebhookReply> {
        let rx = self
            .gates
            .lock()
            .unwrap()
            .remove(&request.message)
            .ok_or_else(|| WebhookError::Transport(format!("no gate for {}", request.message)))?;
        match rx.await {
            Ok(Some(body)) => Ok(WebhookReply::from_json(&body)),
            Ok(None) | Err(_) => Err(WebhookError::Transport("gate closed".to_string())),
        }
    }
}

pub fn mounted_widget(webhook: Arc<dyn WebhookTransport>) -> (ChatWidget, Arc<HtmlMount>) {
    let mount = Arc::new(HtmlMount::new());
    let widget = ChatWidget::new(
        WidgetConfig::new("https://x/y"),
        &MemoryStorage::new(),
        webhook,
        mount.clone(),
    );
    (widget, mount)
}

pub fn bot_texts(widget: &ChatWidget) -> Vec<String> {
    widget
        .messages()
        .into_iter()
        .filter(|m| m.sender == Sender::Bot)
        .map(|m| m.text)
        .collect()
}
