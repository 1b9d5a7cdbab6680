//! Webhook transports.

use async_trait::async_trait;
use serde_json::Value;
use url::Url;

use super::error::Result;
use super::types::{WebhookReply, WebhookRequest};

/// Delivers a message envelope and returns the parsed reply.
///
/// Implementations must not retry; the widget turns any error into a single
/// connection-error message.
#[async_trait]
pub trait WebhookTransport: Send + Sync {
    /// Post `request` and parse the reply.
    async fn send(&self, request: &WebhookRequest) -> Result<WebhookReply>;
}

/// HTTP transport backed by `reqwest`.
///
/// The response status is not inspected: any body that parses as JSON is
/// treated as a reply.
#[derive(Debug, Clone)]
pub struct HttpWebhook {
    url: Url,
    http: reqwest::Client,
}

impl HttpWebhook {
    /// Create a transport for `url`.
    pub fn new(url: impl AsRef<str>) -> Result<Self> {
        Self::with_client(url, reqwest::Client::new())
    }

    /// Create a transport with a custom reqwest client.
    pub fn with_client(url: impl AsRef<str>, http: reqwest::Client) -> Result<Self> {
        let url = Url::parse(url.as_ref())?;
        Ok(Self { url, http })
    }

    /// Get the webhook URL.
    pub fn url(&self) -> &Url {
        &self.url
    }
}

#[async_trait]
impl WebhookTransport for HttpWebhook {
    async fn send(&self, request: &WebhookRequest) -> Result<WebhookReply> {
        tracing::debug!(
            url = %self.url,
            session_id = %request.session_id,
            message_length = request.message.len(),
            "Posting message to webhook"
        );

        // `.json()` sets `Content-Type: application/json`.
        let response = self
            .http
            .post(self.url.clone())
            .json(request)
            .send()
            .await?;

        let status = response.status();
        let bytes = response.bytes().await?;
        let body: Value = serde_json::from_slice(&bytes)?;

        if !status.is_success() {
            tracing::warn!(status = status.as_u16(), "Webhook answered with non-success status");
        }

        Ok(WebhookReply::from_json(&body))
    }
}
