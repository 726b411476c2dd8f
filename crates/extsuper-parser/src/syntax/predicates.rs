//! Typed predicates over arena nodes.
//!
//! All predicates return `false` for `NodeIndex::NONE` or unknown indices.

use crate::parser::{NodeArena, NodeIndex, syntax_kind_ext};
use extsuper_scanner::SyntaxKind;

#[inline]
fn kind_is(arena: &NodeArena, index: NodeIndex, kind: u16) -> bool {
    arena.get(index).is_some_and(|node| node.kind == kind)
}

/// `f(...)` (not `new f(...)`).
#[must_use]
pub fn is_call_expression(arena: &NodeArena, index: NodeIndex) -> bool {
    kind_is(arena, index, syntax_kind_ext::CALL_EXPRESSION)
}

/// `a.b` or `a[b]`.
#[must_use]
pub fn is_member_expression(arena: &NodeArena, index: NodeIndex) -> bool {
    arena.get(index).is_some_and(|node| {
        node.kind == syntax_kind_ext::PROPERTY_ACCESS_EXPRESSION
            || node.kind == syntax_kind_ext::ELEMENT_ACCESS_EXPRESSION
    })
}

#[must_use]
pub fn is_property_access(arena: &NodeArena, index: NodeIndex) -> bool {
    kind_is(arena, index, syntax_kind_ext::PROPERTY_ACCESS_EXPRESSION)
}

#[must_use]
pub fn is_identifier(arena: &NodeArena, index: NodeIndex) -> bool {
    kind_is(arena, index, SyntaxKind::Identifier as u16)
}

/// An identifier spelled exactly `name`.
#[must_use]
pub fn is_identifier_named(arena: &NodeArena, index: NodeIndex, name: &str) -> bool {
    arena.get_identifier_text(index).is_some_and(|text| text == name)
        && is_identifier(arena, index)
}

#[must_use]
pub fn is_this_expression(arena: &NodeArena, index: NodeIndex) -> bool {
    kind_is(arena, index, SyntaxKind::ThisKeyword as u16)
}

#[must_use]
pub fn is_string_literal(arena: &NodeArena, index: NodeIndex) -> bool {
    kind_is(arena, index, SyntaxKind::StringLiteral as u16)
}

/// Function declaration, function expression or arrow function.
#[must_use]
pub fn is_function_like(arena: &NodeArena, index: NodeIndex) -> bool {
    arena.get(index).is_some_and(|node| node.is_function_like())
}

#[must_use]
pub fn is_object_literal(arena: &NodeArena, index: NodeIndex) -> bool {
    kind_is(arena, index, syntax_kind_ext::OBJECT_LITERAL_EXPRESSION)
}

#[must_use]
pub fn is_property_assignment(arena: &NodeArena, index: NodeIndex) -> bool {
    kind_is(arena, index, syntax_kind_ext::PROPERTY_ASSIGNMENT)
}

/// Shorthand method in an object literal or a class method.
#[must_use]
pub fn is_method_declaration(arena: &NodeArena, index: NodeIndex) -> bool {
    kind_is(arena, index, syntax_kind_ext::METHOD_DECLARATION)
}

#[must_use]
pub fn is_return_statement(arena: &NodeArena, index: NodeIndex) -> bool {
    kind_is(arena, index, syntax_kind_ext::RETURN_STATEMENT)
}

#[must_use]
pub fn is_block(arena: &NodeArena, index: NodeIndex) -> bool {
    kind_is(arena, index, syntax_kind_ext::BLOCK)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parser::ParserState;

    fn parse(source: &str) -> (NodeArena, NodeIndex) {
        let mut parser = ParserState::new("test.js".to_string(), source.to_string());
        let root = parser.parse_source_file();
        (parser.into_arena(), root)
    }

    fn first_expression(arena: &NodeArena, root: NodeIndex) -> NodeIndex {
        let statement = arena.get_children(root)[0];
        arena.get_children(statement)[0]
    }

    #[test]
    fn call_and_member_predicates() {
        let (arena, root) = parse("a.b(c);");
        let call = first_expression(&arena, root);
        assert!(is_call_expression(&arena, call));
        let callee = arena.get_children(call)[0];
        assert!(is_member_expression(&arena, callee));
        assert!(is_property_access(&arena, callee));
        assert!(!is_call_expression(&arena, callee));
    }

    #[test]
    fn identifier_named_checks_text_and_kind() {
        let (arena, root) = parse("foo;");
        let ident = first_expression(&arena, root);
        assert!(is_identifier_named(&arena, ident, "foo"));
        assert!(!is_identifier_named(&arena, ident, "bar"));
        assert!(!is_identifier_named(&arena, NodeIndex::NONE, "foo"));
    }

    #[test]
    fn this_and_string_literals() {
        let (arena, root) = parse("this; 'x';");
        let statements = arena.get_children(root);
        let this_expr = arena.get_children(statements[0])[0];
        let string = arena.get_children(statements[1])[0];
        assert!(is_this_expression(&arena, this_expr));
        assert!(is_string_literal(&arena, string));
        assert!(!is_string_literal(&arena, this_expr));
    }

    #[test]
    fn function_like_covers_arrows() {
        let (arena, root) = parse("(function () {}); (() => 1); ({});");
        let statements = arena.get_children(root);
        let paren_fn = arena.get_children(statements[0])[0];
        let paren_arrow = arena.get_children(statements[1])[0];
        let paren_obj = arena.get_children(statements[2])[0];
        assert!(is_function_like(&arena, arena.get_children(paren_fn)[0]));
        assert!(is_function_like(&arena, arena.get_children(paren_arrow)[0]));
        assert!(is_object_literal(&arena, arena.get_children(paren_obj)[0]));
    }
}
