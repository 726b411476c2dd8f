//! Printer - regenerates JavaScript source from a `NodeArena`.
//!
//! Three strategies, chosen per node:
//!
//! - **Verbatim**: an original node whose subtree was never touched is copied
//!   from the source text (`pos..end`), so comments and formatting survive.
//! - **Spliced**: an original node carrying `MODIFIED` is copied piecewise.
//!   The text between its children comes from the source; each child is
//!   printed recursively. A child that replaced another node occupies the
//!   replaced node's source range. Inserted statements are emitted at their
//!   anchor, followed by a newline and the anchor's indentation.
//! - **Structural**: synthesized nodes have no source text and are printed
//!   from their data, adding parentheses where operator precedence requires.
//!
//! An unmodified tree therefore prints back to its input byte for byte.

mod expressions;
mod helpers;
mod statements;

use crate::source_writer::SourceWriter;
use extsuper_common::SourceSpan;
use extsuper_parser::parser::node::{Node, NodeArena};
use extsuper_parser::parser::{NodeIndex, node_flags, syntax_kind_ext};
use extsuper_scanner::SyntaxKind;
use tracing::trace;

/// Line terminator used for text the printer adds itself.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum NewLineKind {
    /// `\r\n` when the source already uses it, `\n` otherwise.
    #[default]
    Detect,
    LineFeed,
    CarriageReturnLineFeed,
}

#[derive(Clone, Debug, Default)]
pub struct PrintOptions {
    pub new_line: NewLineKind,
}

/// Output of a print.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct PrintResult {
    pub code: String,
}

pub struct Printer<'a> {
    pub(super) arena: &'a NodeArena,
    pub(super) source: &'a str,
    pub(super) writer: SourceWriter,
    options: PrintOptions,
}

impl<'a> Printer<'a> {
    #[must_use]
    pub fn new(arena: &'a NodeArena, options: PrintOptions) -> Self {
        Printer {
            arena,
            source: "",
            writer: SourceWriter::default(),
            options,
        }
    }

    /// Source text that verbatim and spliced nodes are copied from. Defaults
    /// to the text of the source file containing the printed node.
    pub fn set_source_text(&mut self, text: &'a str) {
        self.source = text;
    }

    /// Print the subtree at `root`.
    pub fn print(&mut self, root: NodeIndex) {
        if self.source.is_empty() {
            self.source = self.arena.source_text(root).unwrap_or("");
        }
        if self.writer.is_empty() {
            let new_line = resolve_new_line(self.options.new_line, self.source);
            self.writer = SourceWriter::new(new_line, self.source.len());
        }
        self.emit(root);
    }

    #[must_use]
    pub fn finish(self) -> PrintResult {
        PrintResult {
            code: self.writer.take_output(),
        }
    }

    // =========================================================================
    // Dispatch
    // =========================================================================

    pub(super) fn emit(&mut self, idx: NodeIndex) {
        let arena = self.arena;
        let Some(node) = arena.get(idx) else {
            return;
        };

        if node.is_synthesized() {
            self.emit_synthesized(idx, node);
        } else if node.is_modified() {
            self.emit_spliced(idx, node);
        } else {
            self.write_source_range(node.pos, node.end);
        }
    }

    fn emit_spliced(&mut self, idx: NodeIndex, node: &Node) {
        let arena = self.arena;
        let mut cursor = node.pos;

        for child in arena.get_children(idx) {
            let Some(child_node) = arena.get(child) else {
                continue;
            };

            if child_node.has_flag(node_flags::INSERTED) {
                let anchor = self.source_span(child).start.max(cursor);
                self.write_source_range(cursor, anchor);
                cursor = anchor;
                self.emit_inserted_statement(child, anchor);
                continue;
            }

            let span = self.source_span(child);
            if span.start >= cursor {
                self.write_source_range(cursor, span.start);
            }
            self.emit(child);
            cursor = cursor.max(span.end);
        }

        self.write_source_range(cursor, node.end);
    }

    /// Source range a child occupies in its parent's text.
    fn source_span(&self, idx: NodeIndex) -> SourceSpan {
        if let Some(span) = self.arena.get_extended(idx).and_then(|info| info.replaced_span) {
            return span;
        }
        self.arena
            .get(idx)
            .map_or(SourceSpan::default(), |node| SourceSpan::new(node.pos, node.end))
    }

    /// Emit a statement that `insert_statement_before` placed at `anchor`,
    /// then restore the anchor's line layout.
    fn emit_inserted_statement(&mut self, idx: NodeIndex, anchor: u32) {
        let arena = self.arena;
        match arena.get(idx) {
            Some(node) if node.is_synthesized() => self.emit_synthesized(idx, node),
            Some(node) if node.is_modified() => self.emit_spliced(idx, node),
            Some(node) => self.write_source_range(node.pos, node.end),
            None => return,
        }

        match self.line_indentation(anchor) {
            Some(indentation) => {
                self.writer.write_line();
                self.writer.write(indentation);
            }
            None => self.writer.write_space(),
        }
    }

    fn emit_synthesized(&mut self, idx: NodeIndex, node: &Node) {
        match node.kind {
            k if k == SyntaxKind::Identifier as u16 || k == SyntaxKind::PrivateIdentifier as u16 => {
                self.write_identifier_text(idx);
            }
            k if k == SyntaxKind::StringLiteral as u16 => self.emit_string_literal(idx),
            k if k == SyntaxKind::NumericLiteral as u16
                || k == SyntaxKind::BigIntLiteral as u16
                || k == SyntaxKind::RegularExpressionLiteral as u16 =>
            {
                self.emit_literal_text(idx);
            }
            syntax_kind_ext::PROPERTY_ACCESS_EXPRESSION => self.emit_property_access(node),
            syntax_kind_ext::ELEMENT_ACCESS_EXPRESSION => self.emit_element_access(node),
            syntax_kind_ext::CALL_EXPRESSION => self.emit_call_expression(node),
            syntax_kind_ext::NEW_EXPRESSION => self.emit_new_expression(node),
            syntax_kind_ext::BINARY_EXPRESSION => self.emit_binary_expression(node),
            syntax_kind_ext::CONDITIONAL_EXPRESSION => self.emit_conditional_expression(node),
            syntax_kind_ext::PREFIX_UNARY_EXPRESSION => self.emit_prefix_unary(node),
            syntax_kind_ext::POSTFIX_UNARY_EXPRESSION => self.emit_postfix_unary(node),
            syntax_kind_ext::AWAIT_EXPRESSION => self.emit_await_expression(node),
            syntax_kind_ext::PARENTHESIZED_EXPRESSION => self.emit_parenthesized(node),
            syntax_kind_ext::SPREAD_ELEMENT => self.emit_spread_element(node),
            syntax_kind_ext::ARRAY_LITERAL_EXPRESSION => self.emit_array_literal(node),
            syntax_kind_ext::EXPRESSION_STATEMENT => self.emit_expression_statement(node),
            syntax_kind_ext::VARIABLE_STATEMENT => self.emit_variable_statement(node),
            syntax_kind_ext::VARIABLE_DECLARATION_LIST => self.emit_variable_declaration_list(node),
            syntax_kind_ext::VARIABLE_DECLARATION => self.emit_variable_declaration(node),
            syntax_kind_ext::RETURN_STATEMENT | syntax_kind_ext::THROW_STATEMENT => {
                self.emit_return_or_throw(node);
            }
            kind => match SyntaxKind::try_from_u16(kind).and_then(extsuper_scanner::token_to_text) {
                Some(text) => self.write(text),
                None => trace!(kind, "no structural printer for synthesized node"),
            },
        }
    }
}

/// Print the subtree at `root` with default options.
#[must_use]
pub fn print_to_string(arena: &NodeArena, root: NodeIndex) -> String {
    let mut printer = Printer::new(arena, PrintOptions::default());
    printer.print(root);
    printer.finish().code
}

fn resolve_new_line(kind: NewLineKind, source: &str) -> &'static str {
    match kind {
        NewLineKind::LineFeed => "\n",
        NewLineKind::CarriageReturnLineFeed => "\r\n",
        NewLineKind::Detect => {
            if memchr::memmem::find(source.as_bytes(), b"\r\n").is_some() {
                "\r\n"
            } else {
                "\n"
            }
        }
    }
}

#[cfg(test)]
#[path = "../../tests/printer.rs"]
mod tests;
