//! JavaScript parser and AST types for the extsuper rewriter.
//!
//! - `parser` - `ParserState`, the thin-node `NodeArena`, node construction
//!   and in-place tree mutation
//! - `syntax` - read-only queries over the arena (typed predicates,
//!   operator precedence, traversal helpers used by transforms)

pub mod parser;
pub mod syntax;

pub use parser::{NodeArena, NodeIndex, ParserState};
