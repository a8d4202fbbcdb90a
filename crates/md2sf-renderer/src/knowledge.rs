//! Salesforce Knowledge backend.
//!
//! Produces the HTML dialect the Knowledge rich-text editor (CKEditor) keeps
//! intact when an article body is pasted or imported:
//! - Headings become bold paragraphs, the editor strips `<hN>` styling
//! - Code spans carry inline color styling
//! - Code blocks use the editor's `ckeditor_codeblock` class
//! - Local images are embedded as `data:` URIs

use std::fmt::Write;

use crate::asset::{AssetInliner, MagicSniffer, MimeSniffer};
use crate::backend::RenderBackend;
use crate::state::escape_html;

const CODE_SPAN_STYLE: &str = "font-size:1em;color:#00f;";
const CODE_BLOCK_CLASS: &str = "ckeditor_codeblock";
const FIRST_LEVEL_MARGIN: &str = "margin-top: 15px;";
const IMAGE_STYLE: &str = "margin-top: 5px; margin-bottom: 5px;";

/// Knowledge article render backend.
///
/// Overrides paragraphs, headings, code spans, code blocks and images. Every
/// other node kind uses the baseline [`RenderBackend`] rules.
#[derive(Clone, Debug)]
pub struct KnowledgeBackend<S = MagicSniffer> {
    assets: AssetInliner<S>,
}

impl Default for KnowledgeBackend<MagicSniffer> {
    fn default() -> Self {
        Self::new(AssetInliner::new())
    }
}

impl<S: MimeSniffer> KnowledgeBackend<S> {
    /// Create a backend embedding images through `assets`.
    #[must_use]
    pub fn new(assets: AssetInliner<S>) -> Self {
        Self { assets }
    }
}

impl<S: MimeSniffer> RenderBackend for KnowledgeBackend<S> {
    fn paragraph(&self, inline_html: &str, out: &mut String) {
        writeln!(out, "<p>{inline_html}</p>").unwrap();
    }

    fn heading(&self, level: u8, inline_html: &str, out: &mut String) {
        let margin = if level == 1 { FIRST_LEVEL_MARGIN } else { "" };
        writeln!(out, r#"<p style="{margin}"><b>{inline_html}</b></p>"#).unwrap();
    }

    fn code_span(&self, text: &str, out: &mut String) {
        write!(
            out,
            r#"<code style="{CODE_SPAN_STYLE}">{}</code>"#,
            escape_html(text)
        )
        .unwrap();
    }

    // Fence info is accepted but never emitted.
    fn code_block(&self, _info: Option<&str>, code: &str, out: &mut String) {
        writeln!(
            out,
            r#"<pre class="{CODE_BLOCK_CLASS}">{}</pre>"#,
            escape_html(code)
        )
        .unwrap();
    }

    fn image(&self, src: &str, alt: &str, title: Option<&str>, out: &mut String) {
        let src = self.assets.resolve(src);
        write!(
            out,
            r#"<img alt="{}" title="{}" src="{}" style="{IMAGE_STYLE}" />"#,
            escape_html(alt),
            escape_html(title.unwrap_or_default()),
            escape_html(&src)
        )
        .unwrap();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn backend() -> KnowledgeBackend {
        KnowledgeBackend::default()
    }

    #[test]
    fn test_paragraph() {
        let mut out = String::new();
        backend().paragraph("Hello", &mut out);
        assert_eq!(out, "<p>Hello</p>\n");
    }

    #[test]
    fn test_first_level_heading_has_margin() {
        let mut out = String::new();
        backend().heading(1, "Title", &mut out);
        assert_eq!(out, "<p style=\"margin-top: 15px;\"><b>Title</b></p>\n");
    }

    #[test]
    fn test_lower_level_headings_have_no_margin() {
        for level in 2..=6 {
            let mut out = String::new();
            backend().heading(level, "Sub", &mut out);
            assert_eq!(out, "<p style=\"\"><b>Sub</b></p>\n");
        }
    }

    #[test]
    fn test_code_span() {
        let mut out = String::new();
        backend().code_span(r#"<a href="x">&</a>"#, &mut out);
        assert_eq!(
            out,
            r#"<code style="font-size:1em;color:#00f;">&lt;a href=&quot;x&quot;&gt;&amp;&lt;/a&gt;</code>"#
        );
    }

    #[test]
    fn test_code_block_drops_language() {
        let mut out = String::new();
        backend().code_block(Some("python"), "print('<hi>')\n", &mut out);
        assert_eq!(
            out,
            "<pre class=\"ckeditor_codeblock\">print('&lt;hi&gt;')\n</pre>\n"
        );
    }

    #[test]
    fn test_remote_image() {
        let mut out = String::new();
        backend().image("https://example.com/x.png", "Diagram", Some("Flow"), &mut out);
        assert_eq!(
            out,
            r#"<img alt="Diagram" title="Flow" src="https://example.com/x.png" style="margin-top: 5px; margin-bottom: 5px;" />"#
        );
    }

    #[test]
    fn test_image_without_title_renders_empty_title() {
        let mut out = String::new();
        backend().image("https://example.com/x.png", "", None, &mut out);
        assert_eq!(
            out,
            r#"<img alt="" title="" src="https://example.com/x.png" style="margin-top: 5px; margin-bottom: 5px;" />"#
        );
    }

    #[test]
    fn test_local_image_embedded() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("dot.gif"), b"GIF89a\x01\0\x01\0\0\0\0;").unwrap();

        let backend = KnowledgeBackend::new(AssetInliner::new().with_base_dir(dir.path()));
        let mut out = String::new();
        backend.image("dot.gif", "dot", None, &mut out);
        assert!(out.starts_with(r#"<img alt="dot" title="" src="data:image/gif;base64,"#));
        assert!(out.ends_with(r#"" style="margin-top: 5px; margin-bottom: 5px;" />"#));
    }
}
