//! Text escaping for the transcript and the widget shell.

use crate::widget::Message;

/// Make message text safe for the transcript.
///
/// Only `<` and `>` are escaped and newlines become `<br>`; this is the whole
/// of the sanitization applied to user input and webhook replies.
#[must_use]
pub fn format_message_text(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '\n' => out.push_str("<br>"),
            _ => out.push(c),
        }
    }
    out
}

/// Transcript row for `message`.
#[must_use]
pub fn message_html(message: &Message) -> String {
    format!(
        r#"<div class="message {}"><div class="bubble">{}</div></div>"#,
        message.sender,
        format_message_text(&message.text)
    )
}

/// Escape configuration strings placed in markup text or attribute values.
#[must_use]
pub fn escape_attr(value: &str) -> String {
    let mut out = String::with_capacity(value.len());
    for c in value.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(c),
        }
    }
    out
}

/// Keep only characters that can appear in a CSS color value.
#[must_use]
pub fn sanitize_css_value(value: &str) -> String {
    value
        .chars()
        .filter(|c| c.is_ascii_alphanumeric() || matches!(c, '#' | '(' | ')' | ',' | '.' | '%' | ' ' | '-'))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_script_renders_as_text() {
        assert_eq!(
            format_message_text("<script>alert(1)</script>"),
            "&lt;script&gt;alert(1)&lt;/script&gt;"
        );
    }

    #[test]
    fn test_newlines_become_breaks() {
        assert_eq!(format_message_text("a\nb\n"), "a<br>b<br>");
    }

    #[test]
    fn test_other_characters_untouched() {
        assert_eq!(format_message_text("Tom & \"Jerry\""), "Tom & \"Jerry\"");
    }

    #[test]
    fn test_message_html() {
        assert_eq!(
            message_html(&Message::user("<b>hi</b>")),
            r#"<div class="message user"><div class="bubble">&lt;b&gt;hi&lt;/b&gt;</div></div>"#
        );
        assert_eq!(
            message_html(&Message::bot("ok")),
            r#"<div class="message bot"><div class="bubble">ok</div></div>"#
        );
    }

    #[test]
    fn test_escape_attr() {
        assert_eq!(
            escape_attr(r#"/logo.png" onerror="x"#),
            "/logo.png&quot; onerror=&quot;x"
        );
    }

    #[test]
    fn test_sanitize_css_value() {
        assert_eq!(sanitize_css_value("#0284c7"), "#0284c7");
        assert_eq!(sanitize_css_value("rgb(1, 2, 3)"), "rgb(1, 2, 3)");
        assert_eq!(sanitize_css_value("red;}</style><script>"), "redstylescript");
    }
}
