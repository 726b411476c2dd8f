//! Common types and utilities for the extsuper rewriter.
//!
//! This crate provides foundational types used across all extsuper crates:
//! - Diagnostics (`Diagnostic`, `DiagnosticCategory`, diagnostic codes)
//! - Position/Range types and the `LineMap` offset converter
//! - Centralized limits for recursive tree walks

// Diagnostic types shared by the parser, the transforms and the CLI reporter
pub mod diagnostics;
pub use diagnostics::{Diagnostic, DiagnosticCategory, SourceSpan};

// Position/Range types for line/column source locations
pub mod position;
pub use position::{LineMap, Position, Range, SourceLocation};

// Centralized limits and thresholds
pub mod limits;
