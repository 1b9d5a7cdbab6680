//! Error types for the webhook round trip.

use thiserror::Error;

/// Webhook error type.
#[derive(Error, Debug)]
pub enum WebhookError {
    /// The configured webhook URL does not parse.
    #[error("Invalid webhook URL: {0}")]
    InvalidUrl(#[from] url::ParseError),

    /// The request could not be sent or the body could not be read.
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// The response body is not JSON.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Test doubles and alternative transports report failures here.
    #[error("Transport error: {0}")]
    Transport(String),
}

/// Result type alias for webhook operations.
pub type Result<T> = std::result::Result<T, WebhookError>;
