#![forbid(unsafe_code)]

//! Text frame: the render target `Model::view()` writes to.
//!
//! The lab's presentation is deliberately plain: a frame is an ordered list
//! of lines with a nominal width used for centering and rules. Hosts decide
//! how to show it (terminal host prints it, tests compare it).

/// A rendered page.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Frame {
    width: usize,
    lines: Vec<String>,
}

impl Frame {
    /// Create an empty frame with a nominal width in columns.
    #[must_use]
    pub fn new(width: usize) -> Self {
        Self {
            width,
            lines: Vec::new(),
        }
    }

    #[must_use]
    pub fn width(&self) -> usize {
        self.width
    }

    /// Append one line.
    pub fn line(&mut self, text: impl Into<String>) {
        self.lines.push(text.into());
    }

    /// Append an empty line.
    pub fn blank(&mut self) {
        self.lines.push(String::new());
    }

    /// Append a horizontal rule spanning the frame width.
    pub fn rule(&mut self, ch: char) {
        self.lines.push(std::iter::repeat_n(ch, self.width).collect());
    }

    /// Append `text` indented by `depth` levels of two spaces.
    pub fn indented(&mut self, depth: usize, text: impl AsRef<str>) {
        let mut line = "  ".repeat(depth);
        line.push_str(text.as_ref());
        self.lines.push(line);
    }

    #[must_use]
    pub fn lines(&self) -> &[String] {
        &self.lines
    }

    /// Whether any line contains `needle`.
    #[must_use]
    pub fn contains(&self, needle: &str) -> bool {
        self.lines.iter().any(|l| l.contains(needle))
    }

    /// Drop all lines, keeping the width.
    pub fn clear(&mut self) {
        self.lines.clear();
    }

    /// Join the lines with `\n`.
    #[must_use]
    pub fn to_text(&self) -> String {
        self.lines.join("\n")
    }
}
