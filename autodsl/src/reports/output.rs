//! Line-oriented sink that reports render into.

/// Where a report's lines go.
///
/// Implementors only decide what happens to a finished line; the layout of
/// headings, bullets and dividers is shared.
pub trait Output {
    /// Emit one finished line.
    fn line(&mut self, text: &str);

    fn section(&mut self, name: &str) {
        self.line(&format!("{name}:"));
    }

    fn key_value(&mut self, key: &str, value: &str) {
        self.line(&format!("{key}: {value}"));
    }

    fn list_item(&mut self, text: &str) {
        self.item('-', text);
    }

    /// A file or unit that was produced.
    fn added_item(&mut self, text: &str) {
        self.item('+', text);
    }

    fn failed_item(&mut self, text: &str) {
        self.item('x', text);
    }

    fn item(&mut self, marker: char, text: &str) {
        self.line(&format!("  {marker} {text}"));
    }

    fn divider(&mut self, label: &str) {
        self.line(&format!("── {label} ──"));
    }

    /// Multi-line text, emitted as is.
    fn preformatted(&mut self, text: &str) {
        for line in text.lines() {
            self.line(line);
        }
    }

    fn newline(&mut self) {
        self.line("");
    }
}

/// Something a command prints once it is done.
pub trait Report {
    fn render(&self, out: &mut dyn Output);
}

/// Prints to stdout.
#[derive(Debug, Default, Clone, Copy)]
pub struct TerminalOutput;

impl TerminalOutput {
    pub fn new() -> Self {
        Self
    }
}

impl Output for TerminalOutput {
    fn line(&mut self, text: &str) {
        println!("{text}");
    }
}

/// Keeps every line, for asserting on rendered reports.
#[cfg(test)]
#[derive(Default)]
pub struct RecordingOutput {
    pub lines: Vec<String>,
}

#[cfg(test)]
impl Output for RecordingOutput {
    fn line(&mut self, text: &str) {
        self.lines.push(text.to_string());
    }
}
