use super::Printer;
use extsuper_parser::parser::{NodeIndex, syntax_kind_ext};
use extsuper_parser::syntax::precedence::{OperatorPrecedence, expression_precedence};
use extsuper_scanner::SyntaxKind;

impl<'a> Printer<'a> {
    // =========================================================================
    // Output Helpers
    // =========================================================================

    pub(super) fn write(&mut self, text: &str) {
        self.writer.write(text);
    }

    /// Copy `start..end` of the source text. Out-of-range or non-boundary
    /// offsets write nothing.
    pub(super) fn write_source_range(&mut self, start: u32, end: u32) {
        if start >= end {
            return;
        }
        if let Some(text) = self.source.get(start as usize..end as usize) {
            self.writer.write(text);
        }
    }

    /// Whitespace between the start of the line containing `pos` and `pos`,
    /// or `None` when other text precedes `pos` on that line.
    pub(super) fn line_indentation(&self, pos: u32) -> Option<&'a str> {
        let source = self.source;
        let before = source.get(..pos as usize)?;
        let line_start = memchr::memrchr2(b'\n', b'\r', before.as_bytes()).map_or(0, |i| i + 1);
        let prefix = &before[line_start..];
        prefix
            .bytes()
            .all(|b| b == b' ' || b == b'\t')
            .then_some(prefix)
    }

    // =========================================================================
    // Identifier and Literal Helpers
    // =========================================================================

    pub(super) fn write_identifier_text(&mut self, idx: NodeIndex) {
        if let Some(text) = self.arena.get_identifier_text(idx) {
            self.writer.write(text);
        }
    }

    pub(super) fn emit_literal_text(&mut self, idx: NodeIndex) {
        if let Some(text) = self.arena.get_literal_text(idx) {
            self.writer.write(text);
        }
    }

    /// Double-quoted string literal with the escapes JavaScript requires.
    pub(super) fn emit_string_literal(&mut self, idx: NodeIndex) {
        let Some(value) = self.arena.get_literal_text(idx) else {
            return;
        };
        self.writer.write_char('"');
        for ch in value.chars() {
            match ch {
                '"' => self.writer.write("\\\""),
                '\\' => self.writer.write("\\\\"),
                '\n' => self.writer.write("\\n"),
                '\r' => self.writer.write("\\r"),
                '\t' => self.writer.write("\\t"),
                '\u{2028}' => self.writer.write("\\u2028"),
                '\u{2029}' => self.writer.write("\\u2029"),
                ch if (ch as u32) < 0x20 => {
                    self.writer.write(&format!("\\x{:02x}", ch as u32));
                }
                ch => self.writer.write_char(ch),
            }
        }
        self.writer.write_char('"');
    }

    // =========================================================================
    // Emitter Helpers
    // =========================================================================

    pub(super) fn emit_comma_separated(&mut self, nodes: &[NodeIndex]) {
        let mut first = true;
        for &idx in nodes {
            if !first {
                self.write(", ");
            }
            first = false;
            self.emit_with_min_precedence(idx, OperatorPrecedence::Spread);
        }
    }

    /// Emit `idx`, parenthesized when it binds looser than `min`.
    pub(super) fn emit_with_min_precedence(&mut self, idx: NodeIndex, min: OperatorPrecedence) {
        let parenthesize = expression_precedence(self.arena, idx) < min;
        self.emit_parenthesized_if(idx, parenthesize);
    }

    pub(super) fn emit_parenthesized_if(&mut self, idx: NodeIndex, parenthesize: bool) {
        if parenthesize {
            self.write("(");
            self.emit(idx);
            self.write(")");
        } else {
            self.emit(idx);
        }
    }

    /// Whether `idx` must be parenthesized as the object of a member access
    /// or the callee of a call.
    pub(super) fn needs_parens_as_member_target(&self, idx: NodeIndex) -> bool {
        let Some(node) = self.arena.get(idx) else {
            return false;
        };
        match node.kind {
            // `new X` without arguments would swallow the following call.
            syntax_kind_ext::NEW_EXPRESSION => self
                .arena
                .get_call_expr(node)
                .is_some_and(|call| call.arguments.is_none()),
            // `1.foo` lexes as a malformed number.
            k if k == SyntaxKind::NumericLiteral as u16 => true,
            _ => expression_precedence(self.arena, idx) < OperatorPrecedence::LeftHandSide,
        }
    }
}
