//! Read-only queries over a parsed arena.

pub mod precedence;
pub mod predicates;
pub mod transform_utils;
