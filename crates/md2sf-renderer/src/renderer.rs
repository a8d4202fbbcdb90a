//! Generic markdown renderer with pluggable backend.

use std::fmt::Write;

use pulldown_cmark::{CodeBlockKind, Event, LinkType, Tag, TagEnd};

use crate::backend::RenderBackend;
use crate::state::{CodeBlockState, ImageState, OutputStack, TableState, escape_html};
use crate::util::heading_level_to_num;

/// Result of rendering markdown.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct RenderResult {
    /// Rendered HTML fragment.
    pub html: String,
    /// Number of images rendered.
    pub images: usize,
    /// Number of code blocks rendered.
    pub code_blocks: usize,
}

/// Generic markdown renderer with pluggable backend.
///
/// Walks the pulldown-cmark event stream once, in document order. Paragraphs,
/// headings, code spans, code blocks and images are handed to the backend;
/// lists, tables, links and inline formatting are rendered here.
pub struct MarkdownRenderer<B: RenderBackend> {
    backend: B,
    out: OutputStack,
    /// Code block rendering state.
    code: CodeBlockState,
    /// Table rendering state.
    table: TableState,
    /// Image alt text capture state.
    image: ImageState,
    /// Pending image data (src, title) waiting for alt text.
    pending_image: Option<(String, String)>,
    /// Whether raw HTML in the document is emitted verbatim.
    raw_html: bool,
    /// Whether we're inside a front matter block.
    in_metadata: bool,
    images: usize,
    code_blocks: usize,
}

impl<B: RenderBackend> MarkdownRenderer<B> {
    /// Create a new renderer.
    #[must_use]
    pub fn new(backend: B) -> Self {
        Self {
            backend,
            out: OutputStack::with_capacity(4096),
            code: CodeBlockState::default(),
            table: TableState::default(),
            image: ImageState::default(),
            pending_image: None,
            raw_html: false,
            in_metadata: false,
            images: 0,
            code_blocks: 0,
        }
    }

    /// Emit raw HTML from the document verbatim instead of escaping it.
    #[must_use]
    pub fn with_raw_html(mut self, enabled: bool) -> Self {
        self.raw_html = enabled;
        self
    }

    /// Render markdown events and return the result.
    pub fn render<'a, I>(&mut self, events: I) -> RenderResult
    where
        I: Iterator<Item = Event<'a>>,
    {
        for event in events {
            self.process_event(event);
        }

        RenderResult {
            html: self.out.finish(),
            images: std::mem::take(&mut self.images),
            code_blocks: std::mem::take(&mut self.code_blocks),
        }
    }

    fn process_event(&mut self, event: Event<'_>) {
        match event {
            Event::Start(tag) => self.start_tag(tag),
            Event::End(tag) => self.end_tag(tag),
            Event::Text(text) => self.text(&text),
            Event::Code(code) => self.inline_code(&code),
            Event::InlineMath(math) | Event::DisplayMath(math) => self.math(&math),
            Event::Html(html) | Event::InlineHtml(html) => self.raw_html(&html),
            Event::FootnoteReference(label) => self.footnote_reference(&label),
            Event::SoftBreak => self.soft_break(),
            Event::HardBreak => self.hard_break(),
            Event::Rule => self.backend.horizontal_rule(self.out.current()),
            Event::TaskListMarker(checked) => {
                self.backend.task_list_marker(checked, self.out.current());
            }
        }
    }

    /// Push markup unless it would land inside an image's alt text.
    fn push_inline(&mut self, content: &str) {
        if !self.image.is_active() {
            self.out.current().push_str(content);
        }
    }

    fn start_tag(&mut self, tag: Tag<'_>) {
        match tag {
            Tag::Paragraph | Tag::Heading { .. } => self.out.begin_capture(),
            Tag::BlockQuote(_) => self.backend.blockquote_start(self.out.current()),
            Tag::CodeBlock(kind) => {
                let info = match kind {
                    CodeBlockKind::Fenced(info) => {
                        Some(info.trim().to_owned()).filter(|info| !info.is_empty())
                    }
                    CodeBlockKind::Indented => None,
                };
                self.code.start(info);
            }
            Tag::List(start) => {
                let out = self.out.current();
                match start {
                    Some(1) => out.push_str("<ol>\n"),
                    Some(n) => writeln!(out, r#"<ol start="{n}">"#).unwrap(),
                    None => out.push_str("<ul>\n"),
                }
            }
            Tag::Item => self.out.current().push_str("<li>"),
            Tag::FootnoteDefinition(label) => {
                writeln!(
                    self.out.current(),
                    r#"<div class="footnote" id="fn-{}">"#,
                    escape_html(&label)
                )
                .unwrap();
            }
            // Escaped block HTML is rendered as a paragraph of text
            Tag::HtmlBlock if !self.raw_html => self.out.begin_capture(),
            Tag::HtmlBlock => {}
            Tag::MetadataBlock(_) => self.in_metadata = true,
            Tag::DefinitionList => self.out.current().push_str("<dl>\n"),
            Tag::DefinitionListTitle => self.out.current().push_str("<dt>"),
            Tag::DefinitionListDefinition => self.out.current().push_str("<dd>"),
            Tag::Table(alignments) => {
                self.table.start(alignments);
                self.out.current().push_str("<table>\n");
            }
            Tag::TableHead => {
                self.table.set_head(true);
                self.out.current().push_str("<thead>\n<tr>\n");
            }
            Tag::TableRow => {
                self.table.start_row();
                self.out.current().push_str("<tr>\n");
            }
            Tag::TableCell => {
                let open = self.table.open_cell();
                self.out.current().push_str(&open);
            }
            Tag::Emphasis => self.push_inline("<em>"),
            Tag::Strong => self.push_inline("<strong>"),
            Tag::Strikethrough => self.push_inline("<del>"),
            Tag::Superscript => self.push_inline("<sup>"),
            Tag::Subscript => self.push_inline("<sub>"),
            Tag::Link {
                link_type,
                dest_url,
                title,
                ..
            } => {
                let href = if link_type == LinkType::Email && !dest_url.starts_with("mailto:") {
                    format!("mailto:{dest_url}")
                } else {
                    dest_url.to_string()
                };
                let mut link_tag = format!(r#"<a href="{}""#, escape_html(&href));
                if !title.is_empty() {
                    write!(link_tag, r#" title="{}""#, escape_html(&title)).unwrap();
                }
                link_tag.push('>');
                self.push_inline(&link_tag);
            }
            Tag::Image {
                dest_url, title, ..
            } => {
                // Alt text arrives as child events; the image is rendered in end_tag
                if self.image.enter() {
                    self.pending_image = Some((dest_url.to_string(), title.to_string()));
                }
            }
        }
    }

    fn end_tag(&mut self, tag: TagEnd) {
        match tag {
            TagEnd::Paragraph => {
                let inline_html = self.out.end_capture();
                self.backend.paragraph(&inline_html, self.out.current());
            }
            TagEnd::Heading(level) => {
                let inline_html = self.out.end_capture();
                self.backend.heading(
                    heading_level_to_num(level),
                    inline_html.trim(),
                    self.out.current(),
                );
            }
            TagEnd::BlockQuote(_) => self.backend.blockquote_end(self.out.current()),
            TagEnd::CodeBlock => {
                let (info, content) = self.code.end();
                self.backend
                    .code_block(info.as_deref(), &content, self.out.current());
                self.code_blocks += 1;
            }
            TagEnd::List(ordered) => {
                self.out
                    .current()
                    .push_str(if ordered { "</ol>\n" } else { "</ul>\n" });
            }
            TagEnd::Item => self.out.current().push_str("</li>\n"),
            TagEnd::FootnoteDefinition => self.out.current().push_str("</div>\n"),
            TagEnd::HtmlBlock if !self.raw_html => {
                let text = self.out.end_capture();
                self.backend.paragraph(text.trim(), self.out.current());
            }
            TagEnd::HtmlBlock => {}
            TagEnd::MetadataBlock(_) => self.in_metadata = false,
            TagEnd::DefinitionList => self.out.current().push_str("</dl>\n"),
            TagEnd::DefinitionListTitle => self.out.current().push_str("</dt>\n"),
            TagEnd::DefinitionListDefinition => self.out.current().push_str("</dd>\n"),
            TagEnd::Table => self.out.current().push_str("</tbody>\n</table>\n"),
            TagEnd::TableHead => {
                self.out.current().push_str("</tr>\n</thead>\n<tbody>\n");
                self.table.set_head(false);
            }
            TagEnd::TableRow => self.out.current().push_str("</tr>\n"),
            TagEnd::TableCell => {
                let close = self.table.close_cell();
                self.out.current().push_str(close);
            }
            TagEnd::Emphasis => self.push_inline("</em>"),
            TagEnd::Strong => self.push_inline("</strong>"),
            TagEnd::Strikethrough => self.push_inline("</del>"),
            TagEnd::Superscript => self.push_inline("</sup>"),
            TagEnd::Subscript => self.push_inline("</sub>"),
            TagEnd::Link => self.push_inline("</a>"),
            TagEnd::Image => {
                if let Some(alt) = self.image.leave()
                    && let Some((src, title)) = self.pending_image.take()
                {
                    let title = (!title.is_empty()).then_some(title.as_str());
                    self.backend.image(&src, &alt, title, self.out.current());
                    self.images += 1;
                }
            }
        }
    }

    fn text(&mut self, text: &str) {
        // Priority: front matter > code > image alt > normal text
        if self.in_metadata {
            return;
        }

        if self.code.is_active() {
            self.code.push_str(text);
            return;
        }

        if self.image.is_active() {
            self.image.push_str(text);
            return;
        }

        self.out.current().push_str(&escape_html(text));
    }

    fn inline_code(&mut self, code: &str) {
        if self.image.is_active() {
            self.image.push_str(code);
        } else {
            self.backend.code_span(code, self.out.current());
        }
    }

    fn math(&mut self, math: &str) {
        if self.image.is_active() {
            self.image.push_str(math);
        } else {
            write!(
                self.out.current(),
                r#"<span class="math">{}</span>"#,
                escape_html(math)
            )
            .unwrap();
        }
    }

    fn raw_html(&mut self, html: &str) {
        if self.raw_html && !self.image.is_active() {
            self.out.current().push_str(html);
        } else {
            self.text(html);
        }
    }

    fn footnote_reference(&mut self, label: &str) {
        let reference = format!(
            r##"<sup class="footnote-ref"><a href="#fn-{0}">[{0}]</a></sup>"##,
            escape_html(label)
        );
        self.push_inline(&reference);
    }

    fn soft_break(&mut self) {
        if self.code.is_active() {
            self.code.push_newline();
        } else if self.image.is_active() {
            self.image.push_str(" ");
        } else {
            self.out.current().push('\n');
        }
    }

    fn hard_break(&mut self) {
        if self.image.is_active() {
            self.image.push_str(" ");
        } else {
            self.backend.hard_break(self.out.current());
        }
    }
}

impl<B: RenderBackend + Default> Default for MarkdownRenderer<B> {
    fn default() -> Self {
        Self::new(B::default())
    }
}
