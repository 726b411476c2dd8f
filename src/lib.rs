//! extsuper - static `callParent` rewriting for async methods of
//! `Ext.define` class bodies.
//!
//! The workspace is split the usual way:
//!
//! - `extsuper-scanner` - tokens and the JavaScript scanner
//! - `extsuper-parser` - `ParserState`, the `NodeArena` tree and its
//!   mutation API
//! - `extsuper-emitter` - the splicing `Printer` and `transforms::call_parent`
//! - `extsuper-common` - diagnostics, `LineMap` and limits
//!
//! This crate re-exports them and adds [`rewrite_source`], the one-call
//! pipeline used by the CLI.

pub use extsuper_common as common;
pub use extsuper_emitter as emitter;
pub use extsuper_parser as parser;
pub use extsuper_scanner as scanner;

pub use extsuper_common::{Diagnostic, DiagnosticCategory, LineMap, SourceSpan};
pub use extsuper_emitter::{RewriteError, RewriteOptions, RewriteOutcome};

// Tracing subscriber setup (EXTSUPER_LOG / EXTSUPER_LOG_FORMAT)
pub mod tracing_config;

mod rewrite;
pub use rewrite::{RewriteResult, rewrite_source};
