//! Mount adapters: where the widget's isolated surface lives.
//!
//! The widget drives an adapter with a handful of surface operations. The
//! adapter owns the isolation boundary, whether that is a shadow root in a
//! document, an in-memory render target, or a terminal.

use std::io::Write;
use std::sync::{Mutex, PoisonError, RwLock};

use super::template::{ShadowTemplate, ShadowView};
use crate::widget::{Message, Sender};

/// Rendering surface driven by [`ChatWidget`](crate::widget::ChatWidget).
pub trait MountAdapter: Send + Sync {
    /// Attach the host element and its isolated shadow root.
    fn mount(&self, template: &ShadowTemplate);

    /// Append a transcript row. `html` is the escaped rendition of `message`.
    fn append_message(&self, message: &Message, html: &str);

    /// Scroll the transcript to its end.
    fn scroll_to_end(&self);

    /// Show the panel and hide the launcher, or the reverse.
    fn set_open(&self, open: bool);

    /// Show or hide the typing indicator.
    fn set_typing_visible(&self, visible: bool);

    /// Empty the input field.
    fn clear_input(&self);

    /// Move keyboard focus to the input field.
    fn focus_input(&self);
}

#[derive(Debug, Default)]
struct Surface {
    template: Option<ShadowTemplate>,
    transcript: Vec<String>,
    open: bool,
    typing_visible: bool,
    input_focused: bool,
    input_cleared: usize,
    scroll_top: usize,
}

/// Sandboxed in-memory render target.
///
/// Records the shadow tree the widget builds so it can be inspected or served
/// as HTML.
#[derive(Debug, Default)]
pub struct HtmlMount {
    surface: RwLock<Surface>,
}

impl HtmlMount {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    fn read<R>(&self, f: impl FnOnce(&Surface) -> R) -> R {
        f(&self.surface.read().unwrap_or_else(PoisonError::into_inner))
    }

    fn write<R>(&self, f: impl FnOnce(&mut Surface) -> R) -> R {
        f(&mut self.surface.write().unwrap_or_else(PoisonError::into_inner))
    }

    /// Whether `mount` has been called.
    pub fn is_mounted(&self) -> bool {
        self.read(|s| s.template.is_some())
    }

    /// Rendered transcript rows, oldest first.
    pub fn transcript(&self) -> Vec<String> {
        self.read(|s| s.transcript.clone())
    }

    pub fn is_open(&self) -> bool {
        self.read(|s| s.open)
    }

    pub fn typing_visible(&self) -> bool {
        self.read(|s| s.typing_visible)
    }

    pub fn input_focused(&self) -> bool {
        self.read(|s| s.input_focused)
    }

    /// How many times the input was cleared.
    pub fn input_clear_count(&self) -> usize {
        self.read(|s| s.input_cleared)
    }

    /// Whether the transcript is scrolled to its last row.
    pub fn is_scrolled_to_end(&self) -> bool {
        self.read(|s| s.scroll_top == s.transcript.len())
    }

    /// Shadow-root contents, or `None` before mount.
    pub fn shadow_html(&self) -> Option<String> {
        self.read(|s| {
            s.template
                .as_ref()
                .map(|t| t.render(&Self::view(s)))
        })
    }

    /// Host element including its declarative shadow root, or `None` before
    /// mount.
    pub fn host_html(&self) -> Option<String> {
        self.read(|s| {
            s.template
                .as_ref()
                .map(|t| t.render_host(&Self::view(s)))
        })
    }

    fn view(s: &Surface) -> ShadowView<'_> {
        ShadowView {
            open: s.open,
            typing_visible: s.typing_visible,
            transcript: &s.transcript,
        }
    }
}

impl MountAdapter for HtmlMount {
    fn mount(&self, template: &ShadowTemplate) {
        self.write(|s| s.template = Some(template.clone()));
    }

    fn append_message(&self, _message: &Message, html: &str) {
        self.write(|s| s.transcript.push(html.to_string()));
    }

    fn scroll_to_end(&self) {
        self.write(|s| s.scroll_top = s.transcript.len());
    }

    fn set_open(&self, open: bool) {
        self.write(|s| {
            s.open = open;
            if !open {
                s.input_focused = false;
            }
        });
    }

    fn set_typing_visible(&self, visible: bool) {
        self.write(|s| s.typing_visible = visible);
    }

    fn clear_input(&self) {
        self.write(|s| s.input_cleared += 1);
    }

    fn focus_input(&self) {
        self.write(|s| s.input_focused = true);
    }
}

/// Plain-text surface for terminals.
///
/// Messages are written as `you> ...` / `bot> ...` lines; layout-only
/// operations are ignored.
#[derive(Debug)]
pub struct TerminalMount<W> {
    out: Mutex<W>,
}

impl TerminalMount<std::io::Stdout> {
    pub fn stdout() -> Self {
        Self::new(std::io::stdout())
    }
}

impl<W: Write + Send> TerminalMount<W> {
    pub fn new(out: W) -> Self {
        Self { out: Mutex::new(out) }
    }

    pub fn into_inner(self) -> W {
        self.out.into_inner().unwrap_or_else(PoisonError::into_inner)
    }

    fn line(&self, text: &str) {
        let mut out = self.out.lock().unwrap_or_else(PoisonError::into_inner);
        if let Err(e) = writeln!(out, "{text}").and_then(|()| out.flush()) {
            tracing::warn!(error = %e, "Failed to write to terminal");
        }
    }
}

impl<W: Write + Send> MountAdapter for TerminalMount<W> {
    fn mount(&self, _template: &ShadowTemplate) {}

    fn append_message(&self, message: &Message, _html: &str) {
        let prefix = match message.sender {
            Sender::User => "you>",
            Sender::Bot => "bot>",
        };
        self.line(&format!("{prefix} {}", message.text));
    }

    fn scroll_to_end(&self) {}

    fn set_open(&self, open: bool) {
        self.line(if open { "[chat opened]" } else { "[chat closed]" });
    }

    fn set_typing_visible(&self, visible: bool) {
        if visible {
            self.line("bot is typing...");
        }
    }

    fn clear_input(&self) {}

    fn focus_input(&self) {}
}
