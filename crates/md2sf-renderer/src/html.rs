//! Baseline HTML backend.
//!
//! Uses every provided [`RenderBackend`] rule unchanged. Useful on its own as a
//! plain HTML formatter and as the reference for what [`KnowledgeBackend`]
//! does not override.
//!
//! [`KnowledgeBackend`]: crate::KnowledgeBackend

use crate::backend::RenderBackend;

/// Baseline HTML render backend.
///
/// Produces plain HTML with:
/// - `<hN>` for headings
/// - `<pre><code class="language-X">` for code blocks
/// - `<img>` with the source left as written
#[derive(Clone, Copy, Debug, Default)]
pub struct HtmlBackend;

impl RenderBackend for HtmlBackend {}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_paragraph() {
        let mut out = String::new();
        HtmlBackend.paragraph("Hello <em>there</em>", &mut out);
        assert_eq!(out, "<p>Hello <em>there</em></p>\n");
    }

    #[test]
    fn test_heading() {
        let mut out = String::new();
        HtmlBackend.heading(3, "Setup", &mut out);
        assert_eq!(out, "<h3>Setup</h3>\n");
    }

    #[test]
    fn test_code_span_escaped() {
        let mut out = String::new();
        HtmlBackend.code_span("a < b", &mut out);
        assert_eq!(out, "<code>a &lt; b</code>");
    }

    #[test]
    fn test_code_block_with_language() {
        let mut out = String::new();
        HtmlBackend.code_block(Some("rust"), "fn main() {}\n", &mut out);
        assert_eq!(
            out,
            "<pre><code class=\"language-rust\">fn main() {}\n</code></pre>\n"
        );
    }

    #[test]
    fn test_code_block_language_ignores_fence_attributes() {
        let mut out = String::new();
        HtmlBackend.code_block(Some("python title=demo.py"), "pass\n", &mut out);
        assert_eq!(
            out,
            "<pre><code class=\"language-python\">pass\n</code></pre>\n"
        );
    }

    #[test]
    fn test_code_block_without_language() {
        let mut out = String::new();
        HtmlBackend.code_block(None, "plain code", &mut out);
        assert_eq!(out, "<pre><code>plain code</code></pre>\n");
    }

    #[test]
    fn test_image() {
        let mut out = String::new();
        HtmlBackend.image("image.png", "Alt text", None, &mut out);
        assert_eq!(out, r#"<img src="image.png" alt="Alt text" />"#);
    }

    #[test]
    fn test_image_with_title() {
        let mut out = String::new();
        HtmlBackend.image("image.png", "Alt text", Some("Image title"), &mut out);
        assert_eq!(
            out,
            r#"<img src="image.png" alt="Alt text" title="Image title" />"#
        );
    }

    #[test]
    fn test_blockquote() {
        let mut out = String::new();
        HtmlBackend.blockquote_start(&mut out);
        out.push_str("<p>content</p>\n");
        HtmlBackend.blockquote_end(&mut out);
        assert_eq!(out, "<blockquote>\n<p>content</p>\n</blockquote>\n");
    }

    #[test]
    fn test_task_list_marker() {
        let mut out = String::new();
        HtmlBackend.task_list_marker(true, &mut out);
        assert_eq!(out, r#"<input type="checkbox" checked disabled /> "#);
    }
}
