//! Trait-based markdown renderer for Salesforce Knowledge articles.
//!
//! This crate provides a generic [`MarkdownRenderer`] driven by pulldown-cmark
//! events. Output shape is decided by a [`RenderBackend`]:
//!
//! - [`HtmlBackend`]: the baseline HTML formatter, using every provided method
//!   of the trait unchanged
//! - [`KnowledgeBackend`]: the rich-text editor dialect. Overrides paragraphs,
//!   headings, code spans, code blocks and images; everything else falls back
//!   to the baseline
//!
//! Local images are embedded as `data:` URIs by [`AssetInliner`], which sniffs
//! the MIME type from file content through a [`MimeSniffer`].
//!
//! # Example
//!
//! ```
//! use pulldown_cmark::Parser;
//! use md2sf_renderer::{KnowledgeBackend, MarkdownRenderer};
//!
//! let parser = Parser::new("# Hello\n\nUse `cargo`.");
//! let result = MarkdownRenderer::new(KnowledgeBackend::default()).render(parser);
//! assert_eq!(
//!     result.html,
//!     "<p style=\"margin-top: 15px;\"><b>Hello</b></p>\n\
//!      <p>Use <code style=\"font-size:1em;color:#00f;\">cargo</code>.</p>\n"
//! );
//! ```

mod asset;
mod backend;
mod html;
mod knowledge;
mod renderer;
mod state;
mod util;

pub use asset::{AssetError, AssetInliner, MagicSniffer, MimeSniffer};
pub use backend::RenderBackend;
pub use html::HtmlBackend;
pub use knowledge::KnowledgeBackend;
pub use renderer::{MarkdownRenderer, RenderResult};
pub use state::escape_html;
