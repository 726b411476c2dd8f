//! Printing and rewriting for the extsuper toolchain.
//!
//! - `emitter` - the `Printer`, which regenerates source text from a
//!   (possibly mutated) `NodeArena`
//! - `transforms` - tree rewrites applied before printing

pub mod emitter;
pub mod source_writer;
pub mod transforms;

pub use emitter::{NewLineKind, PrintOptions, PrintResult, Printer, print_to_string};
pub use transforms::call_parent::{
    RewriteError, RewriteOptions, RewriteOutcome, rewrite_call_parent,
};
