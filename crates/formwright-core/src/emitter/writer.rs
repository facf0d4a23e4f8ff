//! Indentation-aware line writer

/// Accumulates output lines at a tracked indentation level
#[derive(Debug, Clone)]
pub struct SourceWriter {
    buffer: String,
    unit: String,
    level: usize,
}

impl SourceWriter {
    pub fn new(indent_width: usize) -> Self {
        Self {
            buffer: String::new(),
            unit: " ".repeat(indent_width),
            level: 0,
        }
    }

    /// Write one line at the current level
    pub fn line(&mut self, text: impl AsRef<str>) -> &mut Self {
        let text = text.as_ref();
        if !text.is_empty() {
            for _ in 0..self.level {
                self.buffer.push_str(&self.unit);
            }
            self.buffer.push_str(text);
        }
        self.buffer.push('\n');
        self
    }

    pub fn blank(&mut self) -> &mut Self {
        self.buffer.push('\n');
        self
    }

    pub fn indent(&mut self) -> &mut Self {
        self.level += 1;
        self
    }

    pub fn dedent(&mut self) -> &mut Self {
        self.level = self.level.saturating_sub(1);
        self
    }

    /// Run `body` one level deeper
    pub fn nested(&mut self, body: impl FnOnce(&mut Self)) -> &mut Self {
        self.indent();
        body(self);
        self.dedent()
    }

    pub fn level(&self) -> usize {
        self.level
    }

    pub fn finish(self) -> String {
        self.buffer
    }
}
