//! Output buffer used by the printer.

/// Accumulates emitted text. Source slices are written verbatim; the writer
/// only tracks what it needs to place inserted statements.
#[derive(Debug, Default)]
pub struct SourceWriter {
    output: String,
    new_line: &'static str,
}

impl SourceWriter {
    #[must_use]
    pub fn new(new_line: &'static str, capacity: usize) -> Self {
        SourceWriter {
            output: String::with_capacity(capacity),
            new_line,
        }
    }

    pub fn write(&mut self, text: &str) {
        self.output.push_str(text);
    }

    pub fn write_char(&mut self, ch: char) {
        self.output.push(ch);
    }

    pub fn write_space(&mut self) {
        self.output.push(' ');
    }

    pub fn write_line(&mut self) {
        self.output.push_str(self.new_line);
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.output.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.output.is_empty()
    }

    #[must_use]
    pub fn get_output(&self) -> &str {
        &self.output
    }

    #[must_use]
    pub fn take_output(self) -> String {
        self.output
    }
}
