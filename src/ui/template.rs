//! Shadow-root markup and stylesheet.

use crate::config::WidgetConfig;

use super::escape::{escape_attr, sanitize_css_value};

/// Id of the top-level element attached to the host document.
pub const HOST_ELEMENT_ID: &str = "orbit-widget-host";

const LAUNCHER_ICON: &str = r#"<svg class="launcher-icon" viewBox="0 0 24 24"><path d="M20 2H4c-1.1 0-2 .9-2 2v18l4-4h14c1.1 0 2-.9 2-2V4c0-1.1-.9-2-2-2z"/></svg>"#;

const SEND_ICON: &str = r#"<svg viewBox="0 0 24 24" width="20" height="20" fill="currentColor"><path d="M2.01 21L23 12 2.01 3 2 10l15 2-15 2z"/></svg>"#;

const BASE_STYLES: &str = r"
.chat-launcher {
    width: 65px; height: 65px;
    background: rgba(14, 165, 233, 0.7);
    backdrop-filter: blur(10px);
    border: 1px solid rgba(255, 255, 255, 0.2);
    border-radius: 50%; cursor: pointer;
    box-shadow: 0 8px 32px rgba(0,0,0,0.3);
    display: flex; align-items: center; justify-content: center;
    transition: transform 0.3s ease;
    overflow: hidden;
}
.chat-launcher:hover { transform: scale(1.05); background: var(--primary); }
.chat-launcher.hidden { opacity: 0; pointer-events: none; transform: scale(0.5); }
.launcher-img { width: 55%; height: 55%; object-fit: contain; pointer-events: none; }
.launcher-icon { width: 30px; height: 30px; fill: white; }

.chat-container {
    width: 420px; height: 680px; max-height: 85vh;
    background-color: var(--glass-bg);
    backdrop-filter: var(--glass-blur);
    -webkit-backdrop-filter: var(--glass-blur);
    border: 1px solid var(--glass-border);
    border-radius: 20px;
    overflow: hidden;
    box-shadow: 0 25px 50px -12px rgba(0, 0, 0, 0.5);
    display: flex; flex-direction: column;
    position: absolute; bottom: 0; right: 0;
    transform-origin: bottom right;
    transform: scale(0.9) translateY(20px);
    opacity: 0; pointer-events: none;
    transition: all 0.3s cubic-bezier(0.4, 0, 0.2, 1);
}
.chat-container.open { transform: scale(1) translateY(0); opacity: 1; pointer-events: all; }

.chat-header {
    padding: 15px 24px;
    background: rgba(255, 255, 255, 0.03);
    border-bottom: 1px solid rgba(255,255,255,0.05);
    display: flex; justify-content: space-between; align-items: center;
    min-height: 50px;
}
.header-logo { max-height: 40px; max-width: 200px; object-fit: contain; }
.header-title { font-weight: 600; font-size: 18px; color: #ffffff !important; }
.close-btn { background: none; border: none; cursor: pointer; color: #ffffff !important; opacity: 0.7; font-size: 28px; }

.chat-messages {
    flex: 1; padding: 24px; overflow-y: auto; display: flex; flex-direction: column; gap: 16px;
    scrollbar-width: thin; scrollbar-color: rgba(255,255,255,0.2) transparent;
}

.message { display: flex; flex-direction: column; max-width: 85%; }
.message.user { align-self: flex-end; align-items: flex-end; }
.message.bot { align-self: flex-start; align-items: flex-start; }
.bubble { padding: 14px 18px; border-radius: 18px; font-size: 14px; line-height: 1.5; color: white; }
.message.user .bubble {
    background: linear-gradient(135deg, var(--primary), #0369a1);
    border-bottom-right-radius: 4px;
    box-shadow: 0 4px 15px rgba(2, 132, 199, 0.3);
}
.message.bot .bubble {
    background: rgba(255, 255, 255, 0.08);
    border: 1px solid rgba(255,255,255,0.08);
    border-bottom-left-radius: 4px;
}

.typing-indicator { display: none; gap: 6px; padding: 12px 18px; background: rgba(255,255,255,0.05); border-radius: 20px; width: fit-content; margin-left: 24px; margin-bottom: 12px; }
.dot { width: 6px; height: 6px; background: rgba(255,255,255,0.6); border-radius: 50%; animation: bounce 1.4s infinite; }
.dot:nth-child(2) { animation-delay: 0.2s; } .dot:nth-child(3) { animation-delay: 0.4s; }
@keyframes bounce { 0%, 100% { transform: translateY(0); } 50% { transform: translateY(-5px); } }

.chat-input { padding: 20px; background: rgba(0,0,0,0.2); border-top: 1px solid rgba(255,255,255,0.05); display: flex; gap: 12px; }
.chat-input input { font-size: 16px; flex: 1; background: rgba(255,255,255,0.05); border: 1px solid rgba(255,255,255,0.1); padding: 12px 16px; border-radius: 12px; color: white; outline: none; }
.send-btn { background: var(--primary); border: none; width: 44px; height: 44px; border-radius: 12px; color: white; cursor: pointer; display: flex; align-items: center; justify-content: center; }

@media (max-width: 480px) {
    .chat-container {
        position: fixed; bottom: 0 !important; right: 0 !important; left: 0 !important; top: 0 !important;
        width: 100vw !important; height: 100dvh !important; max-height: 100dvh !important;
        border-radius: 0 !important; transform: none !important; margin: 0 !important;
        background-color: rgba(5, 10, 20, 0.95);
    }
    .chat-container.open { opacity: 1; pointer-events: all; transform: none !important; }
    .chat-header { padding-top: 20px; }
}
";

/// Dynamic parts of the shadow tree.
#[derive(Debug, Clone, Copy, Default)]
pub struct ShadowView<'a> {
    /// Panel shown, launcher hidden.
    pub open: bool,
    /// Typing indicator shown.
    pub typing_visible: bool,
    /// Rendered transcript rows, oldest first.
    pub transcript: &'a [String],
}

/// Config-derived markup for the widget's shadow root.
///
/// Built once per widget; [`render`](Self::render) fills in the dynamic
/// state.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ShadowTemplate {
    styles: String,
    launcher: String,
    header: String,
}

impl ShadowTemplate {
    pub fn new(config: &WidgetConfig) -> Self {
        let styles = format!(
            ":host {{\n    --primary: {primary};\n    --glass-bg: rgba(10, 20, 40, 0.65);\n    --glass-blur: blur(20px);\n    --glass-border: rgba(255, 255, 255, 0.1);\n    font-family: 'Segoe UI', Roboto, Helvetica, Arial, sans-serif;\n    z-index: 2147483647;\n    position: fixed;\n    bottom: 25px;\n    right: 25px;\n}}{BASE_STYLES}",
            primary = sanitize_css_value(&config.primary_color),
        );

        let launcher = match &config.logo_url {
            Some(url) => format!(
                r#"<img src="{}" class="launcher-img" alt="Chat" />"#,
                escape_attr(url)
            ),
            None => LAUNCHER_ICON.to_string(),
        };

        let header = match &config.header_logo_url {
            Some(url) => format!(
                r#"<img src="{}" class="header-logo" alt="{}" />"#,
                escape_attr(url),
                escape_attr(&config.chat_title)
            ),
            None => format!(
                r#"<span class="header-title">{}</span>"#,
                escape_attr(&config.chat_title)
            ),
        };

        Self {
            styles,
            launcher,
            header,
        }
    }

    /// Stylesheet placed at the top of the shadow root.
    pub fn styles(&self) -> &str {
        &self.styles
    }

    /// Shadow-root contents for the given state.
    pub fn render(&self, view: &ShadowView<'_>) -> String {
        let launcher_class = if view.open {
            "chat-launcher hidden"
        } else {
            "chat-launcher"
        };
        let container_class = if view.open {
            "chat-container open"
        } else {
            "chat-container"
        };
        let typing_display = if view.typing_visible { "flex" } else { "none" };
        let transcript = view.transcript.concat();

        format!(
            r#"<style>{styles}</style>
<div class="{launcher_class}">{launcher}</div>
<div class="{container_class}">
    <div class="chat-header">
        {header}
        <button class="close-btn">&times;</button>
    </div>
    <div class="chat-messages">{transcript}</div>
    <div class="typing-indicator" style="display: {typing_display}"><div class="dot"></div><div class="dot"></div><div class="dot"></div></div>
    <div class="chat-input">
        <input type="text" placeholder="Type a message..." />
        <button class="send-btn">{SEND_ICON}</button>
    </div>
</div>"#,
            styles = self.styles,
            launcher = self.launcher,
            header = self.header,
        )
    }

    /// Host element with the shadow root declared inline.
    ///
    /// Uses declarative shadow DOM so host page styles stay out of the widget
    /// and widget styles stay out of the page.
    pub fn render_host(&self, view: &ShadowView<'_>) -> String {
        format!(
            r#"<div id="{HOST_ELEMENT_ID}"><template shadowrootmode="open">{}</template></div>"#,
            self.render(view)
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_launcher_and_title() {
        let template = ShadowTemplate::new(&WidgetConfig::new("https://x/y"));
        let html = template.render(&ShadowView::default());

        assert!(html.contains(r#"<svg class="launcher-icon""#));
        assert!(html.contains(r#"<span class="header-title">Orbit Support</span>"#));
        assert!(html.contains(r#"<div class="chat-launcher">"#));
        assert!(html.contains(r#"<div class="chat-container">"#));
        assert!(html.contains(r#"style="display: none""#));
        assert!(template.styles().contains("--primary: #0284c7;"));
    }

    #[test]
    fn test_configured_images() {
        let config = WidgetConfig::new("https://x/y")
            .with_logo_url("/symbol.svg")
            .with_header_logo_url("/header.png");
        let html = ShadowTemplate::new(&config).render(&ShadowView::default());

        assert!(html.contains(r#"<img src="/symbol.svg" class="launcher-img" alt="Chat" />"#));
        assert!(html.contains(r#"<img src="/header.png" class="header-logo""#));
        assert!(!html.contains(r#"class="header-title""#));
        assert!(!html.contains(r#"class="launcher-icon""#));
    }

    #[test]
    fn test_open_state_and_transcript() {
        let template = ShadowTemplate::new(&WidgetConfig::new("https://x/y"));
        let rows = vec!["<p>1</p>".to_string(), "<p>2</p>".to_string()];
        let html = template.render(&ShadowView {
            open: true,
            typing_visible: true,
            transcript: &rows,
        });

        assert!(html.contains(r#"<div class="chat-launcher hidden">"#));
        assert!(html.contains(r#"<div class="chat-container open">"#));
        assert!(html.contains(r#"<div class="chat-messages"><p>1</p><p>2</p></div>"#));
        assert!(html.contains(r#"style="display: flex""#));
    }

    #[test]
    fn test_title_is_escaped() {
        let config = WidgetConfig::new("https://x/y").with_chat_title("<b>Help</b>");
        let html = ShadowTemplate::new(&config).render(&ShadowView::default());
        assert!(html.contains("&lt;b&gt;Help&lt;/b&gt;"));
    }

    #[test]
    fn test_host_wrapper() {
        let template = ShadowTemplate::new(&WidgetConfig::new("https://x/y"));
        let host = template.render_host(&ShadowView::default());
        assert!(host.starts_with(r#"<div id="orbit-widget-host"><template shadowrootmode="open"><style>"#));
        assert!(host.ends_with("</template></div>"));
    }
}
