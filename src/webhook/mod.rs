//! The widget's only wire contract: one JSON POST per submitted message.
//!
//! # Structure
//!
//! - [`types`]: Request envelope and reply extraction
//! - [`client`]: [`WebhookTransport`] trait and the `reqwest` implementation
//! - [`error`]: [`WebhookError`]
//!
//! # Example
//!
//! ```rust,no_run
//! use orbit_widget::webhook::{HttpWebhook, WebhookRequest, WebhookTransport};
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let webhook = HttpWebhook::new("https://hooks.example.com/chat")?;
//! let reply = webhook
//!     .send(&WebhookRequest::new("Hello!", "session-abc123xyz"))
//!     .await?;
//! println!("{}", reply.message());
//! # Ok(())
//! # }
//! ```

pub mod client;
pub mod error;
pub mod types;

pub use client::{HttpWebhook, WebhookTransport};
pub use error::WebhookError;
pub use types::{CONNECTION_ERROR_REPLY, FALLBACK_REPLY, WebhookReply, WebhookRequest};
