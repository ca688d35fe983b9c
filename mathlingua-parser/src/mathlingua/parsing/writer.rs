//! Code writers
//!
//! The printer describes what it is emitting (a section header, an id, a statement, ...)
//! and the writer decides how it looks. [`PlainWriter`] produces source text;
//! [`HtmlWriter`] escapes it and wraps the interesting parts in classed spans.

pub trait CodeWriter {
    /// Indentation and argument markers
    fn write_indent(&mut self, text: &str);
    /// A section name, written with its trailing colon
    fn write_header(&mut self, name: &str);
    /// An id line including its brackets
    fn write_id(&mut self, text: &str);
    /// A statement including its quotes
    fn write_statement(&mut self, text: &str);
    /// A string literal including its quotes
    fn write_text(&mut self, text: &str);
    /// Anything else: targets and punctuation
    fn write_raw(&mut self, text: &str);
    fn write_newline(&mut self);
    fn output(&self) -> &str;
}

#[derive(Debug, Default)]
pub struct PlainWriter {
    buffer: String,
}

impl PlainWriter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn into_output(self) -> String {
        self.buffer
    }
}

impl CodeWriter for PlainWriter {
    fn write_indent(&mut self, text: &str) {
        self.buffer.push_str(text);
    }

    fn write_header(&mut self, name: &str) {
        self.buffer.push_str(name);
        self.buffer.push(':');
    }

    fn write_id(&mut self, text: &str) {
        self.buffer.push_str(text);
    }

    fn write_statement(&mut self, text: &str) {
        self.buffer.push_str(text);
    }

    fn write_text(&mut self, text: &str) {
        self.buffer.push_str(text);
    }

    fn write_raw(&mut self, text: &str) {
        self.buffer.push_str(text);
    }

    fn write_newline(&mut self) {
        self.buffer.push('\n');
    }

    fn output(&self) -> &str {
        &self.buffer
    }
}

#[derive(Debug)]
pub struct HtmlWriter {
    buffer: String,
    class_prefix: String,
}

impl Default for HtmlWriter {
    fn default() -> Self {
        Self::new("mathlingua")
    }
}

impl HtmlWriter {
    pub fn new(class_prefix: impl Into<String>) -> Self {
        Self {
            buffer: String::new(),
            class_prefix: class_prefix.into(),
        }
    }

    pub fn into_output(self) -> String {
        self.buffer
    }

    fn span(&mut self, class: &str, text: &str) {
        self.buffer.push_str(&format!(
            "<span class='{}-{}'>{}</span>",
            self.class_prefix,
            class,
            escape_html(text)
        ));
    }
}

impl CodeWriter for HtmlWriter {
    fn write_indent(&mut self, text: &str) {
        self.buffer.push_str(&escape_html(text));
    }

    fn write_header(&mut self, name: &str) {
        self.span("header", &format!("{name}:"));
    }

    fn write_id(&mut self, text: &str) {
        self.span("id", text);
    }

    fn write_statement(&mut self, text: &str) {
        self.span("statement", text);
    }

    fn write_text(&mut self, text: &str) {
        self.span("text", text);
    }

    fn write_raw(&mut self, text: &str) {
        self.buffer.push_str(&escape_html(text));
    }

    fn write_newline(&mut self) {
        self.buffer.push('\n');
    }

    fn output(&self) -> &str {
        &self.buffer
    }
}

pub fn escape_html(text: &str) -> String {
    let mut escaped = String::with_capacity(text.len());
    for ch in text.chars() {
        match ch {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            other => escaped.push(other),
        }
    }
    escaped
}
