//! Diagnostic types and message templates.
//!
//! Parse errors reuse the familiar TypeScript numbering (1xxx) so editors and
//! humans recognise them; rewrite diagnostics live in the 9xxx range.

use serde::Serialize;

/// Diagnostic category.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
pub enum DiagnosticCategory {
    Warning = 0,
    Error = 1,
    Suggestion = 2,
    Message = 3,
}

/// A byte range in a source file.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize)]
pub struct SourceSpan {
    pub start: u32,
    pub end: u32,
}

impl SourceSpan {
    #[must_use]
    pub const fn new(start: u32, end: u32) -> Self {
        Self { start, end }
    }

    #[must_use]
    pub const fn len(self) -> u32 {
        self.end.saturating_sub(self.start)
    }

    #[must_use]
    pub const fn is_empty(self) -> bool {
        self.end <= self.start
    }
}

/// A diagnostic attached to a file position.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct Diagnostic {
    pub file: String,
    pub start: u32,
    pub length: u32,
    pub message_text: String,
    pub category: DiagnosticCategory,
    pub code: u32,
}

impl Diagnostic {
    /// Create a new error diagnostic.
    #[must_use]
    pub fn error(
        file: impl Into<String>,
        span: SourceSpan,
        message: impl Into<String>,
        code: u32,
    ) -> Self {
        Self::with_category(file, span, message, code, DiagnosticCategory::Error)
    }

    /// Create a new warning diagnostic.
    #[must_use]
    pub fn warning(
        file: impl Into<String>,
        span: SourceSpan,
        message: impl Into<String>,
        code: u32,
    ) -> Self {
        Self::with_category(file, span, message, code, DiagnosticCategory::Warning)
    }

    fn with_category(
        file: impl Into<String>,
        span: SourceSpan,
        message: impl Into<String>,
        code: u32,
        category: DiagnosticCategory,
    ) -> Self {
        Self {
            file: file.into(),
            start: span.start,
            length: span.len(),
            message_text: message.into(),
            category,
            code,
        }
    }

    #[must_use]
    pub const fn is_error(&self) -> bool {
        matches!(self.category, DiagnosticCategory::Error)
    }
}

/// Numeric diagnostic codes.
pub mod diagnostic_codes {
    pub const UNTERMINATED_STRING_LITERAL: u32 = 1002;
    pub const IDENTIFIER_EXPECTED: u32 = 1003;
    pub const TOKEN_EXPECTED: u32 = 1005;
    pub const ASTERISK_SLASH_EXPECTED: u32 = 1010;
    pub const UNEXPECTED_TOKEN: u32 = 1012;
    pub const EXPRESSION_EXPECTED: u32 = 1109;
    pub const INVALID_CHARACTER: u32 = 1127;
    pub const DECLARATION_OR_STATEMENT_EXPECTED: u32 = 1128;
    pub const UNTERMINATED_TEMPLATE_LITERAL: u32 = 1160;
    pub const UNTERMINATED_REGULAR_EXPRESSION_LITERAL: u32 = 1161;
    pub const PROPERTY_ASSIGNMENT_EXPECTED: u32 = 1136;
    pub const MAXIMUM_NESTING_DEPTH_EXCEEDED: u32 = 1198;

    pub const DEFINE_CALL_NOT_FOUND: u32 = 9001;
    pub const METHOD_DECLARATION_NOT_FOUND: u32 = 9002;
    pub const CALL_PARENT_UNSUPPORTED_IN_ASYNC: u32 = 9003;
    pub const METHOD_NAME_NOT_STATIC: u32 = 9004;
}

/// Message templates. `{0}`, `{1}` ... are substituted by [`format_message`].
pub mod diagnostic_messages {
    pub const UNTERMINATED_STRING_LITERAL: &str = "Unterminated string literal.";
    pub const IDENTIFIER_EXPECTED: &str = "Identifier expected.";
    pub const TOKEN_EXPECTED: &str = "'{0}' expected.";
    pub const ASTERISK_SLASH_EXPECTED: &str = "'*/' expected.";
    pub const UNEXPECTED_TOKEN: &str = "Unexpected token '{0}'.";
    pub const EXPRESSION_EXPECTED: &str = "Expression expected.";
    pub const INVALID_CHARACTER: &str = "Invalid character.";
    pub const DECLARATION_OR_STATEMENT_EXPECTED: &str = "Declaration or statement expected.";
    pub const UNTERMINATED_TEMPLATE_LITERAL: &str = "Unterminated template literal.";
    pub const UNTERMINATED_REGULAR_EXPRESSION_LITERAL: &str =
        "Unterminated regular expression literal.";
    pub const PROPERTY_ASSIGNMENT_EXPECTED: &str = "Property assignment expected.";
    pub const MAXIMUM_NESTING_DEPTH_EXCEEDED: &str = "Maximum nesting depth exceeded.";

    pub const DEFINE_CALL_NOT_FOUND: &str = "Unable to find '{0}.define' for this 'callParent'";
    pub const METHOD_DECLARATION_NOT_FOUND: &str =
        "Unable to find method declaration for this 'callParent'";
    pub const CALL_PARENT_UNSUPPORTED_IN_ASYNC: &str =
        "callParent is not supported in async functions of the following types: {0}";
    pub const METHOD_NAME_NOT_STATIC: &str =
        "Unable to determine the name of the method containing this 'callParent'";
}

/// Substitute positional `{N}` placeholders in a message template.
#[must_use]
pub fn format_message(message: &str, args: &[&str]) -> String {
    let mut result = message.to_string();
    for (i, arg) in args.iter().enumerate() {
        result = result.replace(&format!("{{{i}}}"), arg);
    }
    result
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn format_message_replaces_placeholders() {
        let text = format_message(diagnostic_messages::TOKEN_EXPECTED, &[")"]);
        assert_eq!(text, "')' expected.");
    }

    #[test]
    fn warning_carries_span_length() {
        let diag = Diagnostic::warning("a.js", SourceSpan::new(4, 10), "careful", 9001);
        assert_eq!(diag.start, 4);
        assert_eq!(diag.length, 6);
        assert!(!diag.is_error());
    }

    #[test]
    fn diagnostics_serialize_to_json() {
        let diag = Diagnostic::error("a.js", SourceSpan::new(0, 1), "bad", 1109);
        let json = serde_json::to_value(&diag).expect("serializable");
        assert_eq!(json["code"], 1109);
        assert_eq!(json["category"], "Error");
    }
}
