use extsuper_common::Diagnostic;
use extsuper_emitter::{RewriteOptions, print_to_string, rewrite_call_parent};
use extsuper_parser::ParserState;
use serde::Serialize;
use tracing::debug;

/// Result of rewriting one file.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RewriteResult {
    /// Rewritten text. Equal to the input when nothing was rewritten or the
    /// file had errors.
    pub code: String,
    /// Whether `code` differs from the input.
    pub changed: bool,
    /// Number of `callParent` calls replaced.
    pub rewritten: usize,
    /// Parse errors, rewrite warnings, or the fatal rewrite error.
    pub diagnostics: Vec<Diagnostic>,
}

impl RewriteResult {
    fn unchanged(source: &str, diagnostics: Vec<Diagnostic>) -> Self {
        RewriteResult {
            code: source.to_string(),
            changed: false,
            rewritten: 0,
            diagnostics,
        }
    }

    #[must_use]
    pub fn has_errors(&self) -> bool {
        self.diagnostics.iter().any(Diagnostic::is_error)
    }
}

/// Parse `source`, rewrite its `callParent` calls and print it back.
///
/// Files with parse errors are not rewritten. A fatal rewrite error leaves
/// the text unchanged and is reported as the only diagnostic.
#[tracing::instrument(level = "debug", skip(source, options), fields(len = source.len()))]
pub fn rewrite_source(file_name: &str, source: &str, options: &RewriteOptions) -> RewriteResult {
    let mut parser = ParserState::new(file_name.to_string(), source.to_string());
    let root = parser.parse_source_file();
    if !parser.get_diagnostics().is_empty() {
        debug!(
            errors = parser.get_diagnostics().len(),
            "skipping file with parse errors"
        );
        return RewriteResult::unchanged(source, parser.get_diagnostics().to_vec());
    }

    let mut arena = parser.into_arena();
    match rewrite_call_parent(&mut arena, root, options) {
        Ok(outcome) if outcome.rewritten == 0 => {
            RewriteResult::unchanged(source, outcome.diagnostics)
        }
        Ok(outcome) => {
            let code = print_to_string(&arena, root);
            RewriteResult {
                changed: code != source,
                code,
                rewritten: outcome.rewritten,
                diagnostics: outcome.diagnostics,
            }
        }
        Err(error) => RewriteResult::unchanged(source, vec![error.to_diagnostic(file_name)]),
    }
}
