//! Centralized limits and thresholds.
//!
//! Recursive descent over deeply nested input can overflow the stack; every
//! recursive walk in the workspace checks one of these depths.

/// Maximum nesting depth for the recursive-descent parser.
///
/// Each nested expression or statement adds a handful of frames. Past this
/// depth the parser reports a diagnostic and stops descending.
///
/// ```javascript
/// f(f(f(f(f(f(/* ... 1000 levels ... */))))));
/// ```
pub const MAX_PARSER_RECURSION_DEPTH: u32 = 1_000;

/// Maximum depth for read-only tree walks (ancestor searches, return
/// statement lookups, uid collection).
pub const MAX_TREE_WALK_DEPTH: usize = 2_000;

/// Upper bound on suffixes tried when generating a unique identifier.
pub const MAX_UID_ATTEMPTS: usize = 10_000;
