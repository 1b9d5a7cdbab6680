//! Orbit chat widget
//!
//! An embeddable chat widget: an isolated UI surface that collects user text,
//! posts it to a configured webhook, and renders the textual reply.
//!
//! # Architecture
//!
//! - **Widget**: UI state machine (closed/open, idle/awaiting-reply) and transcript
//! - **Webhook**: One JSON POST per message, reply extracted from `output` or `text`
//! - **Session**: Opaque session id persisted through a storage provider
//! - **UI**: Shadow-root markup rendered into a mount adapter
//! - **Server**: Preview host page and demo echo webhook (Axum)
//!
//! # Modules
//!
//! - [`config`]: Widget and application configuration
//! - [`session`]: Storage providers and session bootstrap
//! - [`webhook`]: Request envelope, reply extraction, HTTP transport
//! - [`ui`]: Escaping, shadow template, mount adapters
//! - [`widget`]: The [`ChatWidget`](widget::ChatWidget) itself
//! - [`server`]: Preview host

// Allow pedantic clippy warnings that don't add value for this codebase
#![allow(clippy::missing_fields_in_debug)]

pub mod config;
pub mod server;
pub mod session;
pub mod ui;
pub mod webhook;
pub mod widget;
