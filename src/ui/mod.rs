//! Widget rendering.
//!
//! This module turns widget state into markup and hands it to a mount
//! adapter.
//!
//! # Structure
//!
//! - [`escape`]: Transcript text escaping
//! - [`template`]: Shadow-root stylesheet and markup
//! - [`mount`]: [`MountAdapter`] plus in-memory and terminal surfaces

pub mod escape;
pub mod mount;
pub mod template;

pub use escape::{format_message_text, message_html};
pub use mount::{HtmlMount, MountAdapter, TerminalMount};
pub use template::{HOST_ELEMENT_ID, ShadowTemplate, ShadowView};
