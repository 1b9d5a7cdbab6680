//! The chat widget.
//!
//! [`ChatWidget`] ties the session id, the UI state machine, the transcript,
//! and the webhook round trip together, and mirrors every change into a
//! [`MountAdapter`].
//!
//! All methods take `&self`; state sits behind a lock that is never held
//! across an `.await`, so several submits can be in flight at once. Each one
//! appends its own reply when its request resolves, in resolution order.
//!
//! # Example
//!
//! ```rust,no_run
//! use std::sync::Arc;
//! use orbit_widget::config::WidgetConfig;
//! use orbit_widget::session::MemoryStorage;
//! use orbit_widget::ui::HtmlMount;
//! use orbit_widget::widget::ChatWidget;
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let mount = Arc::new(HtmlMount::new());
//! let widget = ChatWidget::with_http(
//!     WidgetConfig::new("https://hooks.example.com/chat"),
//!     &MemoryStorage::new(),
//!     mount.clone(),
//! )?;
//!
//! widget.toggle();
//! let reply = widget.send_message("Hello!").await;
//! println!("{reply:?}");
//! # Ok(())
//! # }
//! ```

mod message;
mod state;

pub use message::{Message, Sender};
pub use state::{Activity, UiState, Visibility};

use std::sync::{Arc, PoisonError, RwLock, RwLockReadGuard, RwLockWriteGuard};
use std::time::Duration;

use crate::config::WidgetConfig;
use crate::session::{StorageProvider, get_or_create_session_id};
use crate::ui::{MountAdapter, ShadowTemplate, message_html};
use crate::webhook::{
    CONNECTION_ERROR_REPLY, HttpWebhook, WebhookError, WebhookRequest, WebhookTransport,
};

/// Delay between opening the panel and focusing the input.
pub const FOCUS_DELAY: Duration = Duration::from_millis(100);

/// Host interactions the widget reacts to.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum WidgetEvent {
    LauncherClick,
    CloseClick,
    SendClick,
    /// Key pressed in the input field; only `Enter` submits.
    KeyPress(String),
    /// Input field contents changed.
    Input(String),
}

#[derive(Debug, Default)]
struct WidgetInner {
    messages: Vec<Message>,
    ui: UiState,
    input: String,
}

/// Embeddable chat widget.
pub struct ChatWidget {
    config: WidgetConfig,
    session_id: String,
    webhook: Arc<dyn WebhookTransport>,
    mount: Arc<dyn MountAdapter>,
    inner: RwLock<WidgetInner>,
}

impl std::fmt::Debug for ChatWidget {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ChatWidget")
            .field("session_id", &self.session_id)
            .field("webhook_url", &self.config.webhook_url)
            .field("inner", &self.inner)
            .finish_non_exhaustive()
    }
}

impl ChatWidget {
    /// Create and mount a widget.
    ///
    /// Resolves the session id from `storage`, mounts the shadow tree, and
    /// greets with the welcome message when the transcript is empty.
    pub fn new(
        config: WidgetConfig,
        storage: &dyn StorageProvider,
        webhook: Arc<dyn WebhookTransport>,
        mount: Arc<dyn MountAdapter>,
    ) -> Self {
        let session_id = get_or_create_session_id(storage);
        let widget = Self {
            config,
            session_id,
            webhook,
            mount,
            inner: RwLock::new(WidgetInner::default()),
        };
        widget.init();
        widget
    }

    /// Create a widget posting to `config.webhook_url` over HTTP.
    pub fn with_http(
        config: WidgetConfig,
        storage: &dyn StorageProvider,
        mount: Arc<dyn MountAdapter>,
    ) -> Result<Self, WebhookError> {
        let webhook = Arc::new(HttpWebhook::new(&config.webhook_url)?);
        Ok(Self::new(config, storage, webhook, mount))
    }

    fn init(&self) {
        self.mount.mount(&ShadowTemplate::new(&self.config));
        tracing::debug!(session_id = %self.session_id, "Widget mounted");

        if self.read().messages.is_empty() {
            let welcome = self.config.welcome_message.clone();
            self.add_message(welcome, Sender::Bot);
        }
    }

    fn read(&self) -> RwLockReadGuard<'_, WidgetInner> {
        self.inner.read().unwrap_or_else(PoisonError::into_inner)
    }

    fn write(&self) -> RwLockWriteGuard<'_, WidgetInner> {
        self.inner.write().unwrap_or_else(PoisonError::into_inner)
    }

    #[must_use]
    pub fn config(&self) -> &WidgetConfig {
        &self.config
    }

    #[must_use]
    pub fn session_id(&self) -> &str {
        &self.session_id
    }

    /// Snapshot of the transcript, oldest first.
    #[must_use]
    pub fn messages(&self) -> Vec<Message> {
        self.read().messages.clone()
    }

    #[must_use]
    pub fn message_count(&self) -> usize {
        self.read().messages.len()
    }

    #[must_use]
    pub fn ui_state(&self) -> UiState {
        self.read().ui
    }

    #[must_use]
    pub fn is_open(&self) -> bool {
        self.read().ui.is_open()
    }

    #[must_use]
    pub fn is_awaiting_reply(&self) -> bool {
        self.read().ui.is_awaiting_reply()
    }

    /// Current input field contents.
    #[must_use]
    pub fn input(&self) -> String {
        self.read().input.clone()
    }

    /// Replace the input field contents.
    pub fn set_input(&self, text: impl Into<String>) {
        self.write().input = text.into();
    }

    /// Open or close the panel.
    ///
    /// Opening focuses the input after [`FOCUS_DELAY`]. Outside a Tokio
    /// runtime the focus happens immediately.
    pub fn toggle(&self) -> Visibility {
        let visibility = {
            let mut inner = self.write();
            let visibility = inner.ui.toggle();
            self.mount.set_open(visibility == Visibility::Open);
            visibility
        };
        let open = visibility == Visibility::Open;
        tracing::debug!(open, "Widget toggled");

        if open {
            let mount = Arc::clone(&self.mount);
            match tokio::runtime::Handle::try_current() {
                Ok(handle) => {
                    handle.spawn(async move {
                        tokio::time::sleep(FOCUS_DELAY).await;
                        mount.focus_input();
                    });
                }
                Err(_) => mount.focus_input(),
            }
        }
        visibility
    }

    /// Append a message, render it, and scroll to the end.
    pub fn add_message(&self, text: impl Into<String>, sender: Sender) -> Message {
        let message = Message {
            text: text.into(),
            sender,
        };
        // The mount is updated under the state lock so the transcript mirrors
        // `messages` in the same order. Adapters never call back into the widget.
        let mut inner = self.write();
        inner.messages.push(message.clone());
        self.mount.append_message(&message, &message_html(&message));
        self.mount.scroll_to_end();
        drop(inner);
        message
    }

    /// Submit the input field.
    ///
    /// Returns the bot reply, or `None` when the trimmed input is empty (no
    /// message, no request, input left as is).
    pub async fn submit(&self) -> Option<Message> {
        let text = {
            let mut inner = self.write();
            let text = trim_input(&inner.input).to_string();
            if text.is_empty() {
                return None;
            }
            inner.input.clear();
            text
        };

        self.add_message(text.clone(), Sender::User);
        self.mount.clear_input();
        self.show_typing();

        let request = WebhookRequest::new(text, self.session_id.clone());
        let reply = match self.webhook.send(&request).await {
            Ok(reply) => {
                tracing::debug!(session_id = %self.session_id, "Webhook replied");
                reply.message().to_string()
            }
            Err(e) => {
                tracing::error!(error = %e, session_id = %self.session_id, "Widget error");
                CONNECTION_ERROR_REPLY.to_string()
            }
        };

        self.hide_typing();
        Some(self.add_message(reply, Sender::Bot))
    }

    /// Put `text` in the input field and submit it.
    pub async fn send_message(&self, text: impl Into<String>) -> Option<Message> {
        self.set_input(text);
        self.submit().await
    }

    /// Dispatch a host interaction.
    ///
    /// Returns the bot reply when the event submitted a message.
    pub async fn handle_event(&self, event: WidgetEvent) -> Option<Message> {
        match event {
            WidgetEvent::LauncherClick | WidgetEvent::CloseClick => {
                self.toggle();
                None
            }
            WidgetEvent::SendClick => self.submit().await,
            WidgetEvent::KeyPress(key) if key == "Enter" => self.submit().await,
            WidgetEvent::KeyPress(_) => None,
            WidgetEvent::Input(text) => {
                self.set_input(text);
                None
            }
        }
    }

    fn show_typing(&self) {
        let mut inner = self.write();
        inner.ui.begin_reply();
        self.mount.set_typing_visible(true);
        self.mount.scroll_to_end();
    }

    // A single flag: the first reply to land hides the indicator even if
    // other requests are still pending.
    fn hide_typing(&self) {
        let mut inner = self.write();
        inner.ui.finish_reply();
        self.mount.set_typing_visible(false);
    }
}

/// Trim like a browser `String.prototype.trim`, which also strips U+FEFF.
fn trim_input(input: &str) -> &str {
    input.trim_matches(|c: char| c.is_whitespace() || c == '\u{FEFF}')
}
