use colored::Colorize;
use rustc_hash::FxHashMap;
use std::path::Path;

use extsuper_common::{Diagnostic, DiagnosticCategory, LineMap};

/// Renders diagnostics as `file:line:col - category XS1234: message`
/// followed by the offending source line.
pub struct Reporter {
    color: bool,
    sources: FxHashMap<String, String>,
    line_maps: FxHashMap<String, LineMap>,
}

impl Reporter {
    #[must_use]
    pub fn new(color: bool) -> Self {
        Reporter {
            color,
            sources: FxHashMap::default(),
            line_maps: FxHashMap::default(),
        }
    }

    /// Register the text diagnostics for `file` refer to. Files without a
    /// registered source are read from disk on demand.
    pub fn add_source(&mut self, file: &str, source: &str) {
        self.line_maps.remove(file);
        self.sources.insert(file.to_string(), source.to_string());
    }

    pub fn render<'d>(&mut self, diagnostics: impl IntoIterator<Item = &'d Diagnostic>) -> String {
        let mut out = String::new();
        for diagnostic in diagnostics {
            out.push_str(&self.format_diagnostic(diagnostic));
            out.push('\n');
        }
        out
    }

    pub fn format_diagnostic(&mut self, diagnostic: &Diagnostic) -> String {
        let mut output = match self.format_location(&diagnostic.file, diagnostic.start) {
            Some(location) => location,
            None if !diagnostic.file.is_empty() => diagnostic.file.clone(),
            None => "<unknown>".to_string(),
        };

        output.push_str(" - ");
        output.push_str(&self.format_category(diagnostic.category));
        let code = self.format_code(diagnostic.code);
        if !code.is_empty() {
            output.push(' ');
            output.push_str(&code);
        }
        output.push_str(": ");
        output.push_str(&diagnostic.message_text);

        if let Some(snippet) =
            self.format_snippet(&diagnostic.file, diagnostic.start, diagnostic.length)
        {
            output.push_str(&snippet);
        }
        output
    }

    /// Source line of the diagnostic with its span underlined:
    ///
    /// ```text
    ///     3           this.callParent();
    ///                 ~~~~~~~~~~~~~~~~~
    /// ```
    fn format_snippet(&mut self, file: &str, start: u32, length: u32) -> Option<String> {
        if file.is_empty() || length == 0 {
            return None;
        }
        let (line, column) = self.position_for(file, start)?;
        let (end_line, end_column) = self.position_for(file, start.saturating_add(length))?;

        let source = self.sources.get(file)?;
        let line_map = self.line_maps.get(file)?;
        let line_start = line_map.line_start(line as usize)? as usize;
        let line_end = line_map
            .line_start(line as usize + 1)
            .map_or(source.len(), |next| next as usize);
        let line_text = source
            .get(line_start..line_end)?
            .trim_end_matches(['\n', '\r']);

        let span_end = if end_line == line {
            end_column
        } else {
            line_text.chars().count() as u32
        };

        let mut text = String::new();
        let mut underline = String::new();
        for (i, ch) in line_text.chars().enumerate() {
            let i = i as u32;
            let width = if ch == '\t' { 4 } else { 1 };
            let marker = if i >= column && i < span_end { '~' } else { ' ' };
            for _ in 0..width {
                text.push(if ch == '\t' { ' ' } else { ch });
                if i < span_end {
                    underline.push(marker);
                }
            }
        }
        if !underline.contains('~') {
            underline.push('~');
        }

        let gutter = format!("  {:>3}   ", line + 1);
        let underline = if self.color {
            underline.red().to_string()
        } else {
            underline
        };
        Some(format!(
            "\n{gutter}{text}\n{}{underline}",
            " ".repeat(gutter.len())
        ))
    }

    fn format_location(&mut self, file: &str, offset: u32) -> Option<String> {
        if file.is_empty() {
            return None;
        }
        let (line, column) = self.position_for(file, offset)?;
        Some(format!("{}:{}:{}", file, line + 1, column + 1))
    }

    /// Zero-based line and column of `offset`.
    fn position_for(&mut self, file: &str, offset: u32) -> Option<(u32, u32)> {
        self.ensure_source(file)?;
        let source = self.sources.get(file)?;
        let line_map = self
            .line_maps
            .entry(file.to_string())
            .or_insert_with(|| LineMap::build(source));
        let position = line_map.offset_to_position(offset, source);
        Some((position.line, position.character))
    }

    fn ensure_source(&mut self, file: &str) -> Option<()> {
        if !self.sources.contains_key(file) {
            let contents = std::fs::read_to_string(Path::new(file)).ok()?;
            self.sources.insert(file.to_string(), contents);
        }
        Some(())
    }

    fn format_category(&self, category: DiagnosticCategory) -> String {
        let label = match category {
            DiagnosticCategory::Error => "error",
            DiagnosticCategory::Warning => "warning",
            DiagnosticCategory::Suggestion => "suggestion",
            DiagnosticCategory::Message => "message",
        };

        if !self.color {
            return label.to_string();
        }

        match category {
            DiagnosticCategory::Error => label.red().bold().to_string(),
            DiagnosticCategory::Warning => label.yellow().bold().to_string(),
            DiagnosticCategory::Suggestion => label.blue().bold().to_string(),
            DiagnosticCategory::Message => label.cyan().bold().to_string(),
        }
    }

    fn format_code(&self, code: u32) -> String {
        if code == 0 {
            return String::new();
        }

        let label = format!("XS{code}");
        if self.color {
            label.bright_blue().to_string()
        } else {
            label
        }
    }
}
