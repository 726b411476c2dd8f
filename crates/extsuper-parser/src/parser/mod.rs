//! Parser - arena AST, recursive-descent parser and tree mutation.

pub mod base;
pub mod node;
mod node_access;
mod node_arena;
mod node_factory;
mod node_mutation;
pub mod state;
mod state_expressions;
mod state_statements;

pub use base::{NodeIndex, NodeList};
pub use node::{Node, NodeArena, NodeData, node_flags, syntax_kind_ext};
pub use node_mutation::VariableKind;
pub use state::ParserState;
