//! Tree rewrites applied to a parsed file before printing.
//!
//! Each transform mutates the `NodeArena` in place through the parser's
//! mutation API (`replace_node`, `insert_statement_before`, ...). The
//! `Printer` then splices synthesized nodes into the otherwise verbatim
//! source text.
//!
//! | Transform | Purpose |
//! |-----------|---------|
//! | `call_parent` | Static superclass calls for `callParent` in async methods |

pub mod call_parent;
