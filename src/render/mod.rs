//! Markdown conversion behind a swappable [`Renderer`].
//!
//! The area compiler only needs two pure conversions: page body to HTML
//! (with the title pulled out) and page body to plain text for email.
//! [`MarkdownRenderer`] is the default implementation.

mod markdown;
mod plaintext;

pub use markdown::MarkdownRenderer;
pub use plaintext::{WRAP_WIDTH, to_plaintext};

use anyhow::Result;

/// Output of [`Renderer::render`].
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Rendered {
    /// Text of the first level-1 heading, empty if there is none.
    pub title: String,
    pub html: String,
}

/// Converts markdown bodies for pages and email.
pub trait Renderer {
    /// Render `body` to HTML using the highlighting `style`.
    fn render(&self, body: &str, style: &str) -> Result<Rendered>;

    /// Render `body` to plain text wrapped for email.
    fn to_plaintext(&self, body: &str) -> Result<String>;
}
