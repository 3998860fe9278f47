//! Markdown rendering service
//!
//! This module provides Markdown to HTML conversion for publication content.
//! It uses pulldown-cmark for Markdown parsing.
//!
//! # Example
//!
//! ```
//! use pressroom::services::markdown::MarkdownRenderer;
//!
//! let renderer = MarkdownRenderer::new();
//! let html = renderer.render("# Hello World\n\nThis is **bold** text.");
//! assert!(html.contains("<h1>"));
//! assert!(html.contains("<strong>"));
//! ```

use pulldown_cmark::{html, Options, Parser};

/// A Markdown renderer for publication content.
///
/// The renderer supports common Markdown features including:
/// - Headings (h1-h6)
/// - Lists (ordered and unordered)
/// - Links and images
/// - Blockquotes
/// - Code blocks and inline code
/// - Bold, italic, and strikethrough text
/// - Tables
/// - Task lists
/// - Smart punctuation
#[derive(Debug, Clone, Copy, Default)]
pub struct MarkdownRenderer;

impl MarkdownRenderer {
    /// Creates a new MarkdownRenderer.
    pub fn new() -> Self {
        Self
    }

    /// Renders Markdown text to HTML.
    ///
    /// # Arguments
    ///
    /// * `markdown` - The Markdown text to render.
    ///
    /// # Returns
    ///
    /// The rendered HTML string.
    pub fn render(&self, markdown: &str) -> String {
        // Configure parser options
        let mut options = Options::empty();
        options.insert(Options::ENABLE_TABLES);
        options.insert(Options::ENABLE_STRIKETHROUGH);
        options.insert(Options::ENABLE_TASKLISTS);
        options.insert(Options::ENABLE_SMART_PUNCTUATION);

        let parser = Parser::new_ext(markdown, options);

        // Render to HTML
        let mut html_output = String::new();
        html::push_html(&mut html_output, parser);

        html_output
    }
}
