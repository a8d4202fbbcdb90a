//! Render backend trait for format-specific rendering.
//!
//! Every provided method is the baseline HTML rule for its node kind. A
//! backend overrides only the kinds whose shape differs from the baseline;
//! anything it leaves alone is still rendered, so no node kind can end up
//! without a rule.

use std::fmt::Write;

use crate::state::escape_html;

/// Backend trait for format-specific rendering operations.
///
/// Block-level rules terminate their output with a newline. Inline rules
/// never do.
pub trait RenderBackend {
    /// Render a paragraph from its already rendered inline content.
    fn paragraph(&self, inline_html: &str, out: &mut String) {
        writeln!(out, "<p>{inline_html}</p>").unwrap();
    }

    /// Render a heading from its already rendered inline content.
    ///
    /// # Arguments
    ///
    /// * `level` - Heading level (1-6)
    /// * `inline_html` - Rendered heading content
    /// * `out` - Output buffer to write to
    fn heading(&self, level: u8, inline_html: &str, out: &mut String) {
        writeln!(out, "<h{level}>{inline_html}</h{level}>").unwrap();
    }

    /// Render an inline code span. `text` is raw, unescaped code.
    fn code_span(&self, text: &str, out: &mut String) {
        write!(out, "<code>{}</code>", escape_html(text)).unwrap();
    }

    /// Render a code block.
    ///
    /// # Arguments
    ///
    /// * `info` - Trimmed fence info string (e.g. `rust`, `python title=x`), if any
    /// * `code` - Raw, unescaped code content
    /// * `out` - Output buffer to write to
    fn code_block(&self, info: Option<&str>, code: &str, out: &mut String) {
        match info.and_then(|info| info.split_whitespace().next()) {
            Some(lang) => writeln!(
                out,
                "<pre><code class=\"language-{}\">{}</code></pre>",
                escape_html(lang),
                escape_html(code)
            )
            .unwrap(),
            None => writeln!(out, "<pre><code>{}</code></pre>", escape_html(code)).unwrap(),
        }
    }

    /// Render an image.
    ///
    /// # Arguments
    ///
    /// * `src` - Image source as written in the document
    /// * `alt` - Plain alt text
    /// * `title` - Title, `None` when the document gives none
    /// * `out` - Output buffer to write to
    fn image(&self, src: &str, alt: &str, title: Option<&str>, out: &mut String) {
        write!(
            out,
            r#"<img src="{}" alt="{}""#,
            escape_html(src),
            escape_html(alt)
        )
        .unwrap();
        if let Some(title) = title {
            write!(out, r#" title="{}""#, escape_html(title)).unwrap();
        }
        out.push_str(" />");
    }

    /// Render blockquote start tag.
    fn blockquote_start(&self, out: &mut String) {
        out.push_str("<blockquote>\n");
    }

    /// Render blockquote end tag.
    fn blockquote_end(&self, out: &mut String) {
        out.push_str("</blockquote>\n");
    }

    /// Render a hard break.
    fn hard_break(&self, out: &mut String) {
        out.push_str("<br />\n");
    }

    /// Render a horizontal rule.
    fn horizontal_rule(&self, out: &mut String) {
        out.push_str("<hr />\n");
    }

    /// Render a task list marker.
    fn task_list_marker(&self, checked: bool, out: &mut String) {
        if checked {
            out.push_str(r#"<input type="checkbox" checked disabled /> "#);
        } else {
            out.push_str(r#"<input type="checkbox" disabled /> "#);
        }
    }
}
