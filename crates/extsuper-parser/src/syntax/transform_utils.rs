//! Transform utilities for syntax analysis.
//!
//! Common lookups used by the rewrite passes in the emitter crate.

use crate::parser::{NodeArena, NodeIndex, syntax_kind_ext};
use extsuper_common::limits::MAX_TREE_WALK_DEPTH;
use extsuper_scanner::SyntaxKind;

/// Strip any number of wrapping parentheses.
#[must_use]
pub fn skip_parentheses(arena: &NodeArena, mut index: NodeIndex) -> NodeIndex {
    let mut steps = 0;
    while steps < MAX_TREE_WALK_DEPTH {
        let Some(node) = arena.get(index) else {
            return index;
        };
        if node.kind != syntax_kind_ext::PARENTHESIZED_EXPRESSION {
            return index;
        }
        match arena.get_parenthesized(node) {
            Some(paren) => index = paren.expression,
            None => return index,
        }
        steps += 1;
    }
    index
}

/// Name of a property key that is known without evaluation: identifiers,
/// string literals and numeric literals. Computed and private names yield
/// `None`.
#[must_use]
pub fn static_property_name(arena: &NodeArena, name: NodeIndex) -> Option<&str> {
    let node = arena.get(name)?;
    if node.kind == SyntaxKind::Identifier as u16 {
        return arena.get_identifier_text(name);
    }
    if node.kind == SyntaxKind::StringLiteral as u16
        || node.kind == SyntaxKind::NumericLiteral as u16
    {
        return arena.get_literal_text(name);
    }
    None
}

/// Body of a function, arrow function, method or accessor.
#[must_use]
pub fn function_body(arena: &NodeArena, index: NodeIndex) -> Option<NodeIndex> {
    let node = arena.get(index)?;
    let body = if let Some(func) = arena.get_function(node) {
        func.body
    } else if let Some(method) = arena.get_method_decl(node) {
        method.body
    } else if let Some(accessor) = arena.get_accessor(node) {
        accessor.body
    } else {
        return None;
    };
    body.is_some().then_some(body)
}

/// First `return` statement (in source order) that belongs to `function`
/// itself.
///
/// Nested functions, methods and accessors own their returns, so the walk
/// never descends into them. The walk halts as soon as a return is found.
#[must_use]
pub fn find_first_return(arena: &NodeArena, function: NodeIndex) -> Option<NodeIndex> {
    let body = function_body(arena, function)?;
    let mut found = None;
    collect_first_own_return(arena, body, 0, &mut found);
    found
}

fn collect_first_own_return(
    arena: &NodeArena,
    index: NodeIndex,
    depth: usize,
    found: &mut Option<NodeIndex>,
) {
    if found.is_some() || depth > MAX_TREE_WALK_DEPTH {
        return;
    }
    let Some(node) = arena.get(index) else {
        return;
    };
    if node.kind == syntax_kind_ext::RETURN_STATEMENT {
        *found = Some(index);
        return;
    }
    if node.is_function_boundary() {
        return;
    }
    for child in arena.get_children(index) {
        collect_first_own_return(arena, child, depth + 1, found);
        if found.is_some() {
            return;
        }
    }
}

/// The object literal a body factory function produces.
///
/// For a function with a block body this is the argument of its first own
/// `return`, which must itself be an object literal. A concise arrow body is
/// used directly.
#[must_use]
pub fn returned_object_literal(arena: &NodeArena, function: NodeIndex) -> Option<NodeIndex> {
    let node = arena.get(function)?;
    let body = function_body(arena, function)?;

    let returned = if node.kind == syntax_kind_ext::ARROW_FUNCTION
        && arena.kind(body) != Some(syntax_kind_ext::BLOCK)
    {
        body
    } else {
        let statement = find_first_return(arena, function)?;
        let ret = arena.get_return_statement(arena.get(statement)?)?;
        ret.expression
    };

    let returned = skip_parentheses(arena, returned);
    (arena.kind(returned) == Some(syntax_kind_ext::OBJECT_LITERAL_EXPRESSION)).then_some(returned)
}
