//! Shared state structs for markdown rendering.
//!
//! These structs track context while the renderer walks the event stream.

use pulldown_cmark::Alignment;

/// Output buffer with nested capture regions.
///
/// Paragraphs and headings are rendered by the backend from their finished
/// inline content, so their children are captured into a separate buffer
/// until the closing event arrives.
pub struct OutputStack {
    /// Document-level output.
    output: String,
    /// Open capture buffers, innermost last.
    captures: Vec<String>,
}

impl OutputStack {
    /// Create an output stack with the given initial capacity.
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            output: String::with_capacity(capacity),
            captures: Vec::new(),
        }
    }

    /// Buffer that content should currently be written to.
    pub fn current(&mut self) -> &mut String {
        match self.captures.last_mut() {
            Some(capture) => capture,
            None => &mut self.output,
        }
    }

    /// Start capturing into a fresh buffer.
    pub fn begin_capture(&mut self) {
        self.captures.push(String::new());
    }

    /// Close the innermost capture and return its content.
    pub fn end_capture(&mut self) -> String {
        self.captures.pop().unwrap_or_default()
    }

    /// Take the finished document, flushing any capture left open.
    pub fn finish(&mut self) -> String {
        for capture in self.captures.drain(..) {
            self.output.push_str(&capture);
        }
        std::mem::take(&mut self.output)
    }
}

/// State for tracking code block rendering.
#[derive(Default)]
pub struct CodeBlockState {
    /// Whether we're inside a code block.
    active: bool,
    /// Trimmed fence info string of the current block.
    info: Option<String>,
    /// Buffer for code block content.
    buffer: String,
}

impl CodeBlockState {
    /// Start a new code block with optional info string.
    pub fn start(&mut self, info: Option<String>) {
        self.active = true;
        self.info = info;
        self.buffer.clear();
    }

    /// End the current code block and return (info, content).
    pub fn end(&mut self) -> (Option<String>, String) {
        self.active = false;
        (self.info.take(), std::mem::take(&mut self.buffer))
    }

    /// Check if we're inside a code block.
    pub fn is_active(&self) -> bool {
        self.active
    }

    /// Append text to the code block buffer.
    pub fn push_str(&mut self, text: &str) {
        self.buffer.push_str(text);
    }

    /// Append a newline to the code block buffer.
    pub fn push_newline(&mut self) {
        self.buffer.push('\n');
    }
}

/// Column layout of the table being rendered.
#[derive(Default)]
pub struct TableState {
    in_head: bool,
    alignments: Vec<Alignment>,
    column: usize,
}

impl TableState {
    /// Begin a table with the parser's column alignments.
    pub fn start(&mut self, alignments: Vec<Alignment>) {
        self.alignments = alignments;
        self.in_head = false;
        self.column = 0;
    }

    /// Enter (`true`) or leave (`false`) the header row.
    pub fn set_head(&mut self, in_head: bool) {
        self.in_head = in_head;
        self.column = 0;
    }

    /// Reset to the first column of a body row.
    pub fn start_row(&mut self) {
        self.column = 0;
    }

    /// Opening tag for the current cell, with its column alignment.
    pub fn open_cell(&self) -> String {
        let tag = if self.in_head { "th" } else { "td" };
        let align = match self.alignments.get(self.column) {
            Some(Alignment::Left) => "left",
            Some(Alignment::Center) => "center",
            Some(Alignment::Right) => "right",
            Some(Alignment::None) | None => return format!("<{tag}>"),
        };
        format!(r#"<{tag} style="text-align:{align}">"#)
    }

    /// Closing tag for the current cell. Advances to the next column.
    pub fn close_cell(&mut self) -> &'static str {
        self.column += 1;
        if self.in_head { "</th>\n" } else { "</td>\n" }
    }
}

/// State for tracking image alt text capture.
///
/// Images nested inside another image's alt text only contribute their own
/// alt text to the outer one.
#[derive(Default)]
pub struct ImageState {
    /// Number of open image tags.
    depth: usize,
    /// Buffer for alt text.
    alt_text: String,
}

impl ImageState {
    /// Enter an image. Returns `true` for the outermost one.
    pub fn enter(&mut self) -> bool {
        self.depth += 1;
        if self.depth == 1 {
            self.alt_text.clear();
            true
        } else {
            false
        }
    }

    /// Leave an image. Returns the alt text when the outermost image closes.
    pub fn leave(&mut self) -> Option<String> {
        self.depth = self.depth.saturating_sub(1);
        (self.depth == 0).then(|| std::mem::take(&mut self.alt_text))
    }

    /// Check if we're inside an image.
    pub fn is_active(&self) -> bool {
        self.depth > 0
    }

    /// Append text to the alt text buffer.
    pub fn push_str(&mut self, text: &str) {
        self.alt_text.push_str(text);
    }
}

/// Escape HTML special characters.
///
/// Encodes `&`, `<`, `>` and `"`. Single quotes are left alone, matching the
/// markup the knowledge editor already stores.
#[must_use]
pub fn escape_html(s: &str) -> String {
    let mut result = String::with_capacity(s.len());
    for c in s.chars() {
        match c {
            '&' => result.push_str("&amp;"),
            '<' => result.push_str("&lt;"),
            '>' => result.push_str("&gt;"),
            '"' => result.push_str("&quot;"),
            _ => result.push(c),
        }
    }
    result
}
