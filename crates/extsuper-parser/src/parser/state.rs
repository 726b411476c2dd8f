//! Parser state - token handling, diagnostics and the source-file entry
//! point. Expressions and statements live in `state_expressions` and
//! `state_statements`.

use super::base::{NodeIndex, NodeList};
use super::node::*;
use extsuper_common::diagnostics::{
    Diagnostic, SourceSpan, diagnostic_codes, diagnostic_messages, format_message,
};
use extsuper_common::limits::MAX_PARSER_RECURSION_DEPTH;
use extsuper_scanner::{ScannerSnapshot, ScannerState, SyntaxKind, token_to_text};
use std::sync::Arc;
use tracing::{debug, trace};

/// Inside an async function body: `await` is an operator.
pub const CONTEXT_FLAG_ASYNC: u32 = 1 << 0;
/// Inside a generator body: `yield` is an operator.
pub const CONTEXT_FLAG_GENERATOR: u32 = 1 << 1;
/// `in` is not a binary operator (the initializer of a `for` head).
pub const CONTEXT_FLAG_DISALLOW_IN: u32 = 1 << 2;

/// Recursive-descent parser producing a `NodeArena`.
pub struct ParserState {
    pub(crate) scanner: ScannerState,
    pub arena: NodeArena,
    pub(crate) file_name: String,
    pub(crate) context_flags: u32,
    pub(crate) current_token: SyntaxKind,
    /// End offset of the most recently consumed token.
    pub(crate) prev_token_end: u32,
    parse_diagnostics: Vec<Diagnostic>,
    recursion_depth: u32,
    last_error_pos: Option<u32>,
}

struct ParserSnapshot {
    scanner: ScannerSnapshot,
    current_token: SyntaxKind,
    prev_token_end: u32,
    context_flags: u32,
    diagnostics_len: usize,
    last_error_pos: Option<u32>,
}

impl ParserState {
    pub fn new(file_name: String, source_text: String) -> ParserState {
        let estimated_nodes = source_text.len() / 4;
        ParserState {
            scanner: ScannerState::new(source_text, true),
            arena: NodeArena::with_capacity(estimated_nodes),
            file_name,
            context_flags: 0,
            current_token: SyntaxKind::Unknown,
            prev_token_end: 0,
            parse_diagnostics: Vec::new(),
            recursion_depth: 0,
            last_error_pos: None,
        }
    }

    /// Parse the whole text as a script and return the `SourceFile` node.
    pub fn parse_source_file(&mut self) -> NodeIndex {
        self.next_token();

        let mut statements = Vec::new();
        while !self.is_token(SyntaxKind::EndOfFileToken) {
            let before = self.token_pos();
            let statement = self.parse_statement();
            if statement.is_some() {
                statements.push(statement);
            }
            if self.token_pos() == before && !self.is_token(SyntaxKind::EndOfFileToken) {
                // Nothing consumed; skip the offending token.
                self.next_token();
            }
        }

        for diag in self.scanner.take_diagnostics() {
            self.parse_diagnostics.push(Diagnostic::error(
                self.file_name.clone(),
                SourceSpan::new(diag.start, diag.start + diag.length),
                diag.message,
                diag.code,
            ));
        }
        self.parse_diagnostics.sort_by_key(|d| d.start);

        let text: Arc<str> = Arc::from(self.scanner.text());
        let end = text.len() as u32;
        let root = self.arena.add_source_file(
            0,
            end,
            SourceFileData {
                statements: NodeList::from_vec(statements),
                file_name: self.file_name.clone(),
                text,
            },
        );
        debug!(
            file = %self.file_name,
            nodes = self.arena.len(),
            errors = self.parse_diagnostics.len(),
            "parsed source file"
        );
        root
    }

    pub fn get_arena(&self) -> &NodeArena {
        &self.arena
    }

    pub fn into_arena(self) -> NodeArena {
        self.arena
    }

    pub fn get_file_name(&self) -> &str {
        &self.file_name
    }

    pub fn get_source_text(&self) -> &str {
        self.scanner.text()
    }

    pub fn get_diagnostics(&self) -> &[Diagnostic] {
        &self.parse_diagnostics
    }

    pub fn take_diagnostics(&mut self) -> Vec<Diagnostic> {
        std::mem::take(&mut self.parse_diagnostics)
    }

    // =========================================================================
    // Token helpers
    // =========================================================================

    #[inline]
    pub(crate) fn token(&self) -> SyntaxKind {
        self.current_token
    }

    #[inline]
    pub(crate) fn is_token(&self, kind: SyntaxKind) -> bool {
        self.current_token == kind
    }

    #[inline]
    pub(crate) fn token_pos(&self) -> u32 {
        self.scanner.get_token_start()
    }

    #[inline]
    pub(crate) fn token_end(&self) -> u32 {
        self.scanner.get_token_end()
    }

    #[inline]
    pub(crate) fn last_token_end(&self) -> u32 {
        self.prev_token_end
    }

    #[inline]
    pub(crate) fn token_value(&self) -> &str {
        self.scanner.get_token_value()
    }

    #[inline]
    pub(crate) fn has_preceding_line_break(&self) -> bool {
        self.scanner.has_preceding_line_break()
    }

    #[inline]
    pub(crate) fn in_async_context(&self) -> bool {
        self.context_flags & CONTEXT_FLAG_ASYNC != 0
    }

    #[inline]
    pub(crate) fn in_generator_context(&self) -> bool {
        self.context_flags & CONTEXT_FLAG_GENERATOR != 0
    }

    #[inline]
    pub(crate) fn in_disallow_in_context(&self) -> bool {
        self.context_flags & CONTEXT_FLAG_DISALLOW_IN != 0
    }

    pub(crate) fn next_token(&mut self) -> SyntaxKind {
        self.prev_token_end = self.token_end();
        self.current_token = self.scanner.scan();
        trace!(token = ?self.current_token, pos = self.token_pos(), "next token");
        self.current_token
    }

    /// Consume the current token if it is `kind`.
    pub(crate) fn parse_optional(&mut self, kind: SyntaxKind) -> bool {
        if self.is_token(kind) {
            self.next_token();
            true
        } else {
            false
        }
    }

    /// Consume `kind` or report "'x' expected.".
    pub(crate) fn parse_expected(&mut self, kind: SyntaxKind) -> bool {
        if self.parse_optional(kind) {
            return true;
        }
        let text = token_to_text(kind).unwrap_or("token");
        self.error_at_current_token(
            &format_message(diagnostic_messages::TOKEN_EXPECTED, &[text]),
            diagnostic_codes::TOKEN_EXPECTED,
        );
        false
    }

    /// Automatic semicolon insertion: `;`, `}`, end of file or a line break.
    pub(crate) fn parse_semicolon(&mut self) -> bool {
        if self.parse_optional(SyntaxKind::SemicolonToken) {
            return true;
        }
        if self.can_insert_semicolon() {
            return true;
        }
        self.parse_expected(SyntaxKind::SemicolonToken)
    }

    pub(crate) fn can_insert_semicolon(&self) -> bool {
        self.is_token(SyntaxKind::CloseBraceToken)
            || self.is_token(SyntaxKind::EndOfFileToken)
            || self.has_preceding_line_break()
    }

    /// Run `f` speculatively and rewind the scanner afterwards.
    pub(crate) fn look_ahead<T>(&mut self, f: impl FnOnce(&mut ParserState) -> T) -> T {
        let snapshot = self.snapshot();
        let result = f(self);
        self.restore(snapshot);
        result
    }

    fn snapshot(&self) -> ParserSnapshot {
        ParserSnapshot {
            scanner: self.scanner.save_state(),
            current_token: self.current_token,
            prev_token_end: self.prev_token_end,
            context_flags: self.context_flags,
            diagnostics_len: self.parse_diagnostics.len(),
            last_error_pos: self.last_error_pos,
        }
    }

    fn restore(&mut self, snapshot: ParserSnapshot) {
        self.scanner.restore_state(snapshot.scanner);
        self.current_token = snapshot.current_token;
        self.prev_token_end = snapshot.prev_token_end;
        self.context_flags = snapshot.context_flags;
        self.parse_diagnostics.truncate(snapshot.diagnostics_len);
        self.last_error_pos = snapshot.last_error_pos;
    }

    /// Run `f` with `set` flags added and `clear` flags removed.
    pub(crate) fn with_context<T>(
        &mut self,
        set: u32,
        clear: u32,
        f: impl FnOnce(&mut ParserState) -> T,
    ) -> T {
        let saved = self.context_flags;
        self.context_flags = (saved | set) & !clear;
        let result = f(self);
        self.context_flags = saved;
        result
    }

    // =========================================================================
    // Identifiers
    // =========================================================================

    /// Identifier in a binding or reference position. Contextual keywords
    /// count unless the current context makes them operators.
    pub(crate) fn is_identifier(&self) -> bool {
        match self.current_token {
            SyntaxKind::Identifier => true,
            SyntaxKind::AwaitKeyword => !self.in_async_context(),
            SyntaxKind::YieldKeyword => !self.in_generator_context(),
            kind => {
                kind >= SyntaxKind::FIRST_CONTEXTUAL_KEYWORD && kind <= SyntaxKind::LAST_KEYWORD
            }
        }
    }

    /// Any identifier or keyword (property names after `.`, object keys).
    pub(crate) fn is_identifier_or_keyword(&self) -> bool {
        extsuper_scanner::token_is_identifier_or_keyword(self.current_token)
    }

    pub(crate) fn parse_identifier(&mut self) -> NodeIndex {
        if self.is_identifier() {
            return self.create_identifier_from_token();
        }
        self.error_at_current_token(
            diagnostic_messages::IDENTIFIER_EXPECTED,
            diagnostic_codes::IDENTIFIER_EXPECTED,
        );
        NodeIndex::NONE
    }

    pub(crate) fn parse_identifier_name(&mut self) -> NodeIndex {
        if self.is_identifier_or_keyword() {
            return self.create_identifier_from_token();
        }
        self.error_at_current_token(
            diagnostic_messages::IDENTIFIER_EXPECTED,
            diagnostic_codes::IDENTIFIER_EXPECTED,
        );
        NodeIndex::NONE
    }

    pub(crate) fn parse_private_identifier(&mut self) -> NodeIndex {
        let (pos, end) = (self.token_pos(), self.token_end());
        let text = self.scanner.get_token_text().to_string();
        self.next_token();
        self.arena
            .add_identifier(SyntaxKind::PrivateIdentifier as u16, pos, end, &text)
    }

    fn create_identifier_from_token(&mut self) -> NodeIndex {
        let (pos, end) = (self.token_pos(), self.token_end());
        let text = self.token_value().to_string();
        self.next_token();
        self.arena
            .add_identifier(SyntaxKind::Identifier as u16, pos, end, &text)
    }

    // =========================================================================
    // Diagnostics
    // =========================================================================

    pub(crate) fn error_at(&mut self, start: u32, length: u32, message: &str, code: u32) {
        // One error per position keeps cascades out of the report.
        if self.last_error_pos == Some(start) {
            return;
        }
        self.last_error_pos = Some(start);
        self.parse_diagnostics.push(Diagnostic::error(
            self.file_name.clone(),
            SourceSpan::new(start, start + length),
            message,
            code,
        ));
    }

    pub(crate) fn error_at_current_token(&mut self, message: &str, code: u32) {
        let start = self.token_pos();
        let length = self.token_end().saturating_sub(start);
        self.error_at(start, length, message, code);
    }

    pub(crate) fn error_expression_expected(&mut self) {
        self.error_at_current_token(
            diagnostic_messages::EXPRESSION_EXPECTED,
            diagnostic_codes::EXPRESSION_EXPECTED,
        );
    }

    pub(crate) fn error_unexpected_token(&mut self) {
        let text = self.scanner.get_token_text().to_string();
        self.error_at_current_token(
            &format_message(diagnostic_messages::UNEXPECTED_TOKEN, &[&text]),
            diagnostic_codes::UNEXPECTED_TOKEN,
        );
    }

    // =========================================================================
    // Recursion guard
    // =========================================================================

    pub(crate) fn enter_recursion(&mut self) -> bool {
        if self.recursion_depth >= MAX_PARSER_RECURSION_DEPTH {
            self.error_at_current_token(
                diagnostic_messages::MAXIMUM_NESTING_DEPTH_EXCEEDED,
                diagnostic_codes::MAXIMUM_NESTING_DEPTH_EXCEEDED,
            );
            return false;
        }
        self.recursion_depth += 1;
        true
    }

    pub(crate) fn exit_recursion(&mut self) {
        self.recursion_depth = self.recursion_depth.saturating_sub(1);
    }
}
