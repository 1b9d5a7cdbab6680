//! Request envelope and reply extraction.

use chrono::{SecondsFormat, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Bot message used when the webhook reply carries no usable text.
pub const FALLBACK_REPLY: &str = "I received your message.";

/// Bot message shown when the round trip fails.
pub const CONNECTION_ERROR_REPLY: &str = "Connection error. Please try again.";

/// JSON body posted to the webhook.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WebhookRequest {
    /// Trimmed user text.
    pub message: String,
    /// Session id from storage.
    pub session_id: String,
    /// Send time, ISO-8601 UTC with millisecond precision.
    pub timestamp: String,
}

impl WebhookRequest {
    /// Build an envelope stamped with the current time.
    pub fn new(message: impl Into<String>, session_id: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            session_id: session_id.into(),
            timestamp: Utc::now().to_rfc3339_opts(SecondsFormat::Millis, true),
        }
    }
}

/// Reply fields recognised in a webhook response.
///
/// Any JSON shape is accepted. Only non-empty string values of `output` and
/// `text` are picked up; everything else is ignored.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct WebhookReply {
    /// Primary reply field.
    pub output: Option<String>,
    /// Secondary reply field.
    pub text: Option<String>,
}

impl WebhookReply {
    /// Extract the recognised fields from a parsed response body.
    #[must_use]
    pub fn from_json(body: &Value) -> Self {
        let field = |name: &str| {
            body.get(name)
                .and_then(Value::as_str)
                .filter(|s| !s.is_empty())
                .map(str::to_string)
        };
        Self {
            output: field("output"),
            text: field("text"),
        }
    }

    /// Reply shown to the user: `output`, else `text`, else [`FALLBACK_REPLY`].
    #[must_use]
    pub fn message(&self) -> &str {
        self.output
            .as_deref()
            .or(self.text.as_deref())
            .unwrap_or(FALLBACK_REPLY)
    }
}
