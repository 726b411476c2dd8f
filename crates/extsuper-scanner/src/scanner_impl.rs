//! Scanner implementation - the tokenizer state machine.
//!
//! Scanning is driven by the parser one token at a time. Two tokens are
//! context dependent and must be re-scanned on request:
//!
//! - `/` and `/=` become a `RegularExpressionLiteral` when the parser expects
//!   an operand (`rescan_slash_token`).
//! - `}` continues a template literal when the parser has just finished a
//!   `${ ... }` substitution (`rescan_template_token`).

use crate::SyntaxKind;
use crate::char_codes::{
    is_binary_digit, is_digit, is_hex_digit, is_identifier_part, is_identifier_start,
    is_line_break, is_octal_digit, is_white_space_single_line,
};
use extsuper_common::diagnostics::{diagnostic_codes, diagnostic_messages};

/// Per-token flags.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[repr(u32)]
pub enum TokenFlags {
    None = 0,
    PrecedingLineBreak = 1 << 0,
    Unterminated = 1 << 1,
    Octal = 1 << 2,
    HexSpecifier = 1 << 3,
    BinarySpecifier = 1 << 4,
    OctalSpecifier = 1 << 5,
    ContainsSeparator = 1 << 6,
}

/// A lexical error reported while scanning.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ScannerDiagnostic {
    pub start: u32,
    pub length: u32,
    pub message: &'static str,
    pub code: u32,
}

/// Saved scanner position for speculative look-ahead.
#[derive(Clone, Debug)]
pub struct ScannerSnapshot {
    pos: usize,
    token_start: usize,
    token: SyntaxKind,
    token_value: String,
    token_flags: u32,
    diagnostics_len: usize,
}

/// Tokenizer over a single source text.
pub struct ScannerState {
    text: String,
    skip_trivia: bool,
    pos: usize,
    token_start: usize,
    token: SyntaxKind,
    token_value: String,
    token_flags: u32,
    diagnostics: Vec<ScannerDiagnostic>,
}

impl ScannerState {
    pub fn new(text: String, skip_trivia: bool) -> Self {
        ScannerState {
            text,
            skip_trivia,
            pos: 0,
            token_start: 0,
            token: SyntaxKind::Unknown,
            token_value: String::new(),
            token_flags: 0,
            diagnostics: Vec::new(),
        }
    }

    // =========================================================================
    // Accessors
    // =========================================================================

    #[inline]
    pub fn text(&self) -> &str {
        &self.text
    }

    #[inline]
    pub fn get_token(&self) -> SyntaxKind {
        self.token
    }

    /// Start offset of the current token (after trivia).
    #[inline]
    pub fn get_token_start(&self) -> u32 {
        self.token_start as u32
    }

    /// End offset of the current token.
    #[inline]
    pub fn get_token_end(&self) -> u32 {
        self.pos as u32
    }

    /// Cooked value of the current token (string contents, identifier name,
    /// numeric text).
    #[inline]
    pub fn get_token_value(&self) -> &str {
        &self.token_value
    }

    /// Raw source text of the current token.
    #[inline]
    pub fn get_token_text(&self) -> &str {
        self.text.get(self.token_start..self.pos).unwrap_or("")
    }

    #[inline]
    pub fn get_token_flags(&self) -> u32 {
        self.token_flags
    }

    #[inline]
    pub fn has_preceding_line_break(&self) -> bool {
        self.token_flags & TokenFlags::PrecedingLineBreak as u32 != 0
    }

    #[inline]
    pub fn is_unterminated(&self) -> bool {
        self.token_flags & TokenFlags::Unterminated as u32 != 0
    }

    pub fn diagnostics(&self) -> &[ScannerDiagnostic] {
        &self.diagnostics
    }

    pub fn take_diagnostics(&mut self) -> Vec<ScannerDiagnostic> {
        std::mem::take(&mut self.diagnostics)
    }

    pub fn save_state(&self) -> ScannerSnapshot {
        ScannerSnapshot {
            pos: self.pos,
            token_start: self.token_start,
            token: self.token,
            token_value: self.token_value.clone(),
            token_flags: self.token_flags,
            diagnostics_len: self.diagnostics.len(),
        }
    }

    pub fn restore_state(&mut self, snapshot: ScannerSnapshot) {
        self.pos = snapshot.pos;
        self.token_start = snapshot.token_start;
        self.token = snapshot.token;
        self.token_value = snapshot.token_value;
        self.token_flags = snapshot.token_flags;
        self.diagnostics.truncate(snapshot.diagnostics_len);
    }

    // =========================================================================
    // Character helpers
    // =========================================================================

    #[inline]
    fn byte_at(&self, pos: usize) -> Option<u8> {
        self.text.as_bytes().get(pos).copied()
    }

    #[inline]
    fn char_at(&self, pos: usize) -> Option<char> {
        self.text.get(pos..).and_then(|rest| rest.chars().next())
    }

    fn error(&mut self, start: usize, length: usize, message: &'static str, code: u32) {
        self.diagnostics.push(ScannerDiagnostic {
            start: start as u32,
            length: length as u32,
            message,
            code,
        });
    }

    // =========================================================================
    // Main scan loop
    // =========================================================================

    /// Scan the next token, skipping trivia when the scanner was created with
    /// `skip_trivia = true`.
    pub fn scan(&mut self) -> SyntaxKind {
        self.token_flags = 0;
        self.token_value.clear();

        loop {
            self.token_start = self.pos;
            let Some(ch) = self.char_at(self.pos) else {
                self.token = SyntaxKind::EndOfFileToken;
                return self.token;
            };

            if is_line_break(ch) {
                self.token_flags |= TokenFlags::PrecedingLineBreak as u32;
                if ch == '\r' && self.byte_at(self.pos + 1) == Some(b'\n') {
                    self.pos += 2;
                } else {
                    self.pos += ch.len_utf8();
                }
                if self.skip_trivia {
                    continue;
                }
                self.token = SyntaxKind::NewLineTrivia;
                return self.token;
            }

            if is_white_space_single_line(ch) {
                self.pos += ch.len_utf8();
                while let Some(next) = self.char_at(self.pos) {
                    if !is_white_space_single_line(next) {
                        break;
                    }
                    self.pos += next.len_utf8();
                }
                if self.skip_trivia {
                    continue;
                }
                self.token = SyntaxKind::WhitespaceTrivia;
                return self.token;
            }

            let token = match ch {
                '/' => match self.byte_at(self.pos + 1) {
                    Some(b'/') => {
                        self.skip_line_comment();
                        if self.skip_trivia {
                            continue;
                        }
                        SyntaxKind::SingleLineCommentTrivia
                    }
                    Some(b'*') => {
                        self.skip_block_comment();
                        if self.skip_trivia {
                            continue;
                        }
                        SyntaxKind::MultiLineCommentTrivia
                    }
                    Some(b'=') => self.punct(2, SyntaxKind::SlashEqualsToken),
                    _ => self.punct(1, SyntaxKind::SlashToken),
                },
                '#' if self.pos == 0 && self.byte_at(1) == Some(b'!') => {
                    // Shebang line
                    self.skip_line_comment();
                    if self.skip_trivia {
                        continue;
                    }
                    SyntaxKind::SingleLineCommentTrivia
                }
                '#' => {
                    let after = self.pos + 1;
                    if self.char_at(after).is_some_and(is_identifier_start) {
                        self.pos = after;
                        self.scan_identifier_rest();
                        self.token_value = self.text[self.token_start..self.pos].to_string();
                        SyntaxKind::PrivateIdentifier
                    } else {
                        self.invalid_character(ch)
                    }
                }
                '"' | '\'' => self.scan_string(ch),
                '`' => {
                    self.pos += 1;
                    self.scan_template(true)
                }
                '0'..='9' => self.scan_number(),
                '.' => {
                    if self.byte_at(self.pos + 1).is_some_and(is_digit) {
                        self.scan_number()
                    } else if self.byte_at(self.pos + 1) == Some(b'.')
                        && self.byte_at(self.pos + 2) == Some(b'.')
                    {
                        self.punct(3, SyntaxKind::DotDotDotToken)
                    } else {
                        self.punct(1, SyntaxKind::DotToken)
                    }
                }
                '{' => self.punct(1, SyntaxKind::OpenBraceToken),
                '}' => self.punct(1, SyntaxKind::CloseBraceToken),
                '(' => self.punct(1, SyntaxKind::OpenParenToken),
                ')' => self.punct(1, SyntaxKind::CloseParenToken),
                '[' => self.punct(1, SyntaxKind::OpenBracketToken),
                ']' => self.punct(1, SyntaxKind::CloseBracketToken),
                ';' => self.punct(1, SyntaxKind::SemicolonToken),
                ',' => self.punct(1, SyntaxKind::CommaToken),
                ':' => self.punct(1, SyntaxKind::ColonToken),
                '~' => self.punct(1, SyntaxKind::TildeToken),
                '?' => self.scan_question(),
                '<' => self.scan_operator(&[
                    ("<<=", SyntaxKind::LessThanLessThanEqualsToken),
                    ("<<", SyntaxKind::LessThanLessThanToken),
                    ("<=", SyntaxKind::LessThanEqualsToken),
                    ("<", SyntaxKind::LessThanToken),
                ]),
                '>' => self.scan_operator(&[
                    (">>>=", SyntaxKind::GreaterThanGreaterThanGreaterThanEqualsToken),
                    (">>>", SyntaxKind::GreaterThanGreaterThanGreaterThanToken),
                    (">>=", SyntaxKind::GreaterThanGreaterThanEqualsToken),
                    (">>", SyntaxKind::GreaterThanGreaterThanToken),
                    (">=", SyntaxKind::GreaterThanEqualsToken),
                    (">", SyntaxKind::GreaterThanToken),
                ]),
                '=' => self.scan_operator(&[
                    ("===", SyntaxKind::EqualsEqualsEqualsToken),
                    ("==", SyntaxKind::EqualsEqualsToken),
                    ("=>", SyntaxKind::EqualsGreaterThanToken),
                    ("=", SyntaxKind::EqualsToken),
                ]),
                '!' => self.scan_operator(&[
                    ("!==", SyntaxKind::ExclamationEqualsEqualsToken),
                    ("!=", SyntaxKind::ExclamationEqualsToken),
                    ("!", SyntaxKind::ExclamationToken),
                ]),
                '+' => self.scan_operator(&[
                    ("++", SyntaxKind::PlusPlusToken),
                    ("+=", SyntaxKind::PlusEqualsToken),
                    ("+", SyntaxKind::PlusToken),
                ]),
                '-' => self.scan_operator(&[
                    ("--", SyntaxKind::MinusMinusToken),
                    ("-=", SyntaxKind::MinusEqualsToken),
                    ("-", SyntaxKind::MinusToken),
                ]),
                '*' => self.scan_operator(&[
                    ("**=", SyntaxKind::AsteriskAsteriskEqualsToken),
                    ("**", SyntaxKind::AsteriskAsteriskToken),
                    ("*=", SyntaxKind::AsteriskEqualsToken),
                    ("*", SyntaxKind::AsteriskToken),
                ]),
                '%' => self.scan_operator(&[
                    ("%=", SyntaxKind::PercentEqualsToken),
                    ("%", SyntaxKind::PercentToken),
                ]),
                '&' => self.scan_operator(&[
                    ("&&=", SyntaxKind::AmpersandAmpersandEqualsToken),
                    ("&&", SyntaxKind::AmpersandAmpersandToken),
                    ("&=", SyntaxKind::AmpersandEqualsToken),
                    ("&", SyntaxKind::AmpersandToken),
                ]),
                '|' => self.scan_operator(&[
                    ("||=", SyntaxKind::BarBarEqualsToken),
                    ("||", SyntaxKind::BarBarToken),
                    ("|=", SyntaxKind::BarEqualsToken),
                    ("|", SyntaxKind::BarToken),
                ]),
                '^' => self.scan_operator(&[
                    ("^=", SyntaxKind::CaretEqualsToken),
                    ("^", SyntaxKind::CaretToken),
                ]),
                _ if is_identifier_start(ch) => self.scan_identifier(),
                _ => self.invalid_character(ch),
            };

            self.token = token;
            return token;
        }
    }

    #[inline]
    fn punct(&mut self, len: usize, kind: SyntaxKind) -> SyntaxKind {
        self.pos += len;
        kind
    }

    /// Longest-match operator scan; `candidates` must be ordered longest first.
    fn scan_operator(&mut self, candidates: &[(&str, SyntaxKind)]) -> SyntaxKind {
        let rest = &self.text[self.pos..];
        for &(text, kind) in candidates {
            if rest.starts_with(text) {
                self.pos += text.len();
                return kind;
            }
        }
        // The last candidate is always the single character we dispatched on.
        self.pos += 1;
        SyntaxKind::Unknown
    }

    fn scan_question(&mut self) -> SyntaxKind {
        let rest = &self.text[self.pos..];
        if rest.starts_with("??=") {
            return self.punct(3, SyntaxKind::QuestionQuestionEqualsToken);
        }
        if rest.starts_with("??") {
            return self.punct(2, SyntaxKind::QuestionQuestionToken);
        }
        // `a?.5:b` is a conditional, not optional chaining
        if rest.starts_with("?.") && !self.byte_at(self.pos + 2).is_some_and(is_digit) {
            return self.punct(2, SyntaxKind::QuestionDotToken);
        }
        self.punct(1, SyntaxKind::QuestionToken)
    }

    fn invalid_character(&mut self, ch: char) -> SyntaxKind {
        self.error(
            self.pos,
            ch.len_utf8(),
            diagnostic_messages::INVALID_CHARACTER,
            diagnostic_codes::INVALID_CHARACTER,
        );
        self.pos += ch.len_utf8();
        SyntaxKind::Unknown
    }

    // =========================================================================
    // Trivia
    // =========================================================================

    fn skip_line_comment(&mut self) {
        let bytes = &self.text.as_bytes()[self.pos..];
        let end = memchr::memchr2(b'\n', b'\r', bytes).unwrap_or(bytes.len());
        self.pos += end;
    }

    fn skip_block_comment(&mut self) {
        let start = self.pos;
        let body_start = self.pos + 2;
        let bytes = &self.text.as_bytes()[body_start..];
        match memchr::memmem::find(bytes, b"*/") {
            Some(offset) => {
                if memchr::memchr2(b'\n', b'\r', &bytes[..offset]).is_some() {
                    self.token_flags |= TokenFlags::PrecedingLineBreak as u32;
                }
                self.pos = body_start + offset + 2;
            }
            None => {
                self.pos = self.text.len();
                self.error(
                    start,
                    2,
                    diagnostic_messages::ASTERISK_SLASH_EXPECTED,
                    diagnostic_codes::ASTERISK_SLASH_EXPECTED,
                );
            }
        }
    }

    // =========================================================================
    // Identifiers
    // =========================================================================

    fn scan_identifier_rest(&mut self) {
        while let Some(ch) = self.char_at(self.pos) {
            if !is_identifier_part(ch) {
                break;
            }
            self.pos += ch.len_utf8();
        }
    }

    fn scan_identifier(&mut self) -> SyntaxKind {
        self.scan_identifier_rest();
        let text = &self.text[self.token_start..self.pos];
        self.token_value = text.to_string();
        crate::text_to_keyword(text).unwrap_or(SyntaxKind::Identifier)
    }

    // =========================================================================
    // Literals
    // =========================================================================

    fn scan_string(&mut self, quote: char) -> SyntaxKind {
        self.pos += 1;
        let mut value = String::new();

        loop {
            let Some(ch) = self.char_at(self.pos) else {
                self.unterminated_string();
                break;
            };
            if ch == quote {
                self.pos += 1;
                break;
            }
            if ch == '\n' || ch == '\r' {
                self.unterminated_string();
                break;
            }
            if ch == '\\' {
                self.pos += 1;
                self.scan_escape_sequence(&mut value);
                continue;
            }
            value.push(ch);
            self.pos += ch.len_utf8();
        }

        self.token_value = value;
        SyntaxKind::StringLiteral
    }

    fn unterminated_string(&mut self) {
        self.token_flags |= TokenFlags::Unterminated as u32;
        self.error(
            self.token_start,
            self.pos - self.token_start,
            diagnostic_messages::UNTERMINATED_STRING_LITERAL,
            diagnostic_codes::UNTERMINATED_STRING_LITERAL,
        );
    }

    /// Decode one escape sequence; `self.pos` is just past the backslash.
    fn scan_escape_sequence(&mut self, out: &mut String) {
        let Some(ch) = self.char_at(self.pos) else {
            return;
        };
        self.pos += ch.len_utf8();
        match ch {
            'n' => out.push('\n'),
            't' => out.push('\t'),
            'r' => out.push('\r'),
            'b' => out.push('\u{0008}'),
            'f' => out.push('\u{000C}'),
            'v' => out.push('\u{000B}'),
            '0' if !self.byte_at(self.pos).is_some_and(is_digit) => out.push('\0'),
            'x' => {
                if let Some(decoded) = self.scan_hex_digits(2) {
                    out.push(decoded);
                }
            }
            'u' => {
                if self.byte_at(self.pos) == Some(b'{') {
                    let close = self.text[self.pos..].find('}');
                    if let Some(close) = close {
                        let digits = &self.text[self.pos + 1..self.pos + close];
                        if let Some(decoded) =
                            u32::from_str_radix(digits, 16).ok().and_then(char::from_u32)
                        {
                            out.push(decoded);
                        }
                        self.pos += close + 1;
                    }
                } else if let Some(decoded) = self.scan_hex_digits(4) {
                    out.push(decoded);
                }
            }
            '\r' => {
                // Line continuation
                if self.byte_at(self.pos) == Some(b'\n') {
                    self.pos += 1;
                }
            }
            '\n' | '\u{2028}' | '\u{2029}' => {}
            other => out.push(other),
        }
    }

    fn scan_hex_digits(&mut self, count: usize) -> Option<char> {
        let digits = self.text.get(self.pos..self.pos + count)?;
        if !digits.bytes().all(is_hex_digit) {
            return None;
        }
        self.pos += count;
        u32::from_str_radix(digits, 16).ok().and_then(char::from_u32)
    }

    fn scan_digits(&mut self, accept: fn(u8) -> bool) {
        while let Some(byte) = self.byte_at(self.pos) {
            if accept(byte) {
                self.pos += 1;
            } else if byte == b'_' && self.byte_at(self.pos + 1).is_some_and(accept) {
                self.token_flags |= TokenFlags::ContainsSeparator as u32;
                self.pos += 1;
            } else {
                break;
            }
        }
    }

    fn scan_number(&mut self) -> SyntaxKind {
        let first = self.byte_at(self.pos);
        let second = self.byte_at(self.pos + 1).map(|b| b.to_ascii_lowercase());

        if first == Some(b'0') && matches!(second, Some(b'x' | b'o' | b'b')) {
            self.pos += 2;
            match second {
                Some(b'x') => {
                    self.token_flags |= TokenFlags::HexSpecifier as u32;
                    self.scan_digits(is_hex_digit);
                }
                Some(b'o') => {
                    self.token_flags |= TokenFlags::OctalSpecifier as u32;
                    self.scan_digits(is_octal_digit);
                }
                _ => {
                    self.token_flags |= TokenFlags::BinarySpecifier as u32;
                    self.scan_digits(is_binary_digit);
                }
            }
            return self.finish_number();
        }

        if first == Some(b'0') && second.is_some_and(is_digit) {
            // Legacy octal literal: 0777
            self.token_flags |= TokenFlags::Octal as u32;
            self.pos += 1;
            self.scan_digits(is_digit);
            return self.finish_number();
        }

        self.scan_digits(is_digit);
        if self.byte_at(self.pos) == Some(b'.') {
            self.pos += 1;
            self.scan_digits(is_digit);
        }
        if matches!(self.byte_at(self.pos), Some(b'e' | b'E')) {
            let mut lookahead = self.pos + 1;
            if matches!(self.byte_at(lookahead), Some(b'+' | b'-')) {
                lookahead += 1;
            }
            if self.byte_at(lookahead).is_some_and(is_digit) {
                self.pos = lookahead;
                self.scan_digits(is_digit);
            }
        }
        self.finish_number()
    }

    fn finish_number(&mut self) -> SyntaxKind {
        if self.byte_at(self.pos) == Some(b'n') {
            self.pos += 1;
            self.token_value = self.text[self.token_start..self.pos].to_string();
            return SyntaxKind::BigIntLiteral;
        }
        self.token_value = self.text[self.token_start..self.pos].to_string();
        SyntaxKind::NumericLiteral
    }

    // =========================================================================
    // Templates
    // =========================================================================

    /// Scan a template piece starting at `self.pos` (just past the opening
    /// backtick or the `}` closing a substitution).
    fn scan_template(&mut self, starts_with_backtick: bool) -> SyntaxKind {
        let content_start = self.pos;
        loop {
            let Some(ch) = self.char_at(self.pos) else {
                self.token_flags |= TokenFlags::Unterminated as u32;
                self.error(
                    self.token_start,
                    self.pos - self.token_start,
                    diagnostic_messages::UNTERMINATED_TEMPLATE_LITERAL,
                    diagnostic_codes::UNTERMINATED_TEMPLATE_LITERAL,
                );
                self.token_value = self.text[content_start..self.pos].to_string();
                return if starts_with_backtick {
                    SyntaxKind::NoSubstitutionTemplateLiteral
                } else {
                    SyntaxKind::TemplateTail
                };
            };
            match ch {
                '`' => {
                    self.token_value = self.text[content_start..self.pos].to_string();
                    self.pos += 1;
                    return if starts_with_backtick {
                        SyntaxKind::NoSubstitutionTemplateLiteral
                    } else {
                        SyntaxKind::TemplateTail
                    };
                }
                '$' if self.byte_at(self.pos + 1) == Some(b'{') => {
                    self.token_value = self.text[content_start..self.pos].to_string();
                    self.pos += 2;
                    return if starts_with_backtick {
                        SyntaxKind::TemplateHead
                    } else {
                        SyntaxKind::TemplateMiddle
                    };
                }
                '\\' => {
                    self.pos += 1;
                    if let Some(escaped) = self.char_at(self.pos) {
                        self.pos += escaped.len_utf8();
                    }
                }
                _ => self.pos += ch.len_utf8(),
            }
        }
    }

    /// Re-scan a `}` token as the continuation of a template literal.
    pub fn rescan_template_token(&mut self) -> SyntaxKind {
        if self.token != SyntaxKind::CloseBraceToken {
            return self.token;
        }
        self.pos = self.token_start + 1;
        self.token = self.scan_template(false);
        self.token
    }

    // =========================================================================
    // Regular expressions
    // =========================================================================

    /// Re-scan a `/` or `/=` token as a regular expression literal.
    pub fn rescan_slash_token(&mut self) -> SyntaxKind {
        if self.token != SyntaxKind::SlashToken && self.token != SyntaxKind::SlashEqualsToken {
            return self.token;
        }

        let mut pos = self.token_start + 1;
        let mut in_class = false;
        let mut terminated = false;

        while let Some(ch) = self.char_at(pos) {
            if is_line_break(ch) {
                break;
            }
            pos += ch.len_utf8();
            match ch {
                '\\' => {
                    if let Some(escaped) = self.char_at(pos) {
                        if is_line_break(escaped) {
                            break;
                        }
                        pos += escaped.len_utf8();
                    }
                }
                '[' => in_class = true,
                ']' => in_class = false,
                '/' if !in_class => {
                    terminated = true;
                    break;
                }
                _ => {}
            }
        }

        self.pos = pos;
        if terminated {
            while let Some(ch) = self.char_at(self.pos) {
                if !is_identifier_part(ch) {
                    break;
                }
                self.pos += ch.len_utf8();
            }
        } else {
            self.token_flags |= TokenFlags::Unterminated as u32;
            self.error(
                self.token_start,
                self.pos - self.token_start,
                diagnostic_messages::UNTERMINATED_REGULAR_EXPRESSION_LITERAL,
                diagnostic_codes::UNTERMINATED_REGULAR_EXPRESSION_LITERAL,
            );
        }

        self.token_value = self.text[self.token_start..self.pos].to_string();
        self.token = SyntaxKind::RegularExpressionLiteral;
        self.token
    }
}

#[cfg(test)]
#[path = "tests/scanner_impl_tests.rs"]
mod scanner_impl_tests;
