//! Tests for tree navigation, mutation and unique-name generation.

use extsuper_common::limits::MAX_TREE_WALK_DEPTH;
use extsuper_parser::parser::{
    NodeArena, NodeIndex, ParserState, VariableKind, node_flags, syntax_kind_ext,
};
use extsuper_parser::syntax::transform_utils::skip_parentheses;
use extsuper_scanner::SyntaxKind;

fn parse(source: &str) -> (NodeArena, NodeIndex) {
    let mut parser = ParserState::new("test.js".to_string(), source.to_string());
    let root = parser.parse_source_file();
    assert!(parser.get_diagnostics().is_empty(), "{:?}", parser.get_diagnostics());
    (parser.into_arena(), root)
}

/// First node in pre-order whose source text equals `text` and whose kind is
/// `kind`.
fn find_node(arena: &NodeArena, root: NodeIndex, kind: u16, text: &str) -> NodeIndex {
    let mut stack = vec![root];
    while let Some(idx) = stack.pop() {
        if arena.kind(idx) == Some(kind) && arena.get_node_text(idx) == Some(text) {
            return idx;
        }
        let mut children = arena.get_children(idx);
        children.reverse();
        stack.extend(children);
    }
    panic!("no node of kind {kind} with text {text:?}");
}

fn identifier(arena: &NodeArena, root: NodeIndex, name: &str) -> NodeIndex {
    find_node(arena, root, SyntaxKind::Identifier as u16, name)
}

#[test]
fn replace_node_rewrites_parent_slot_and_marks_ancestors() {
    let (mut arena, root) = parse("foo(bar);");
    let old = identifier(&arena, root, "bar");
    let call = arena.get_parent(old);
    let statement = arena.get_parent(call);

    let new = arena.create_identifier("baz");
    let placed = arena.replace_node(old, new).unwrap();
    assert_eq!(placed, new);

    assert_eq!(arena.get_children(call)[1], new);
    assert_eq!(arena.get_parent(new), call);
    assert!(arena.is_detached(old));
    assert!(arena.get_parent(old).is_none());

    let new_node = arena.get(new).unwrap();
    assert_eq!((new_node.pos, new_node.end), (4, 7));
    let replaced = arena.get_extended(new).unwrap().replaced_span.unwrap();
    assert_eq!((replaced.start, replaced.end), (4, 7));

    for idx in [call, statement, root] {
        assert!(arena.get(idx).unwrap().is_modified());
    }
    assert!(!arena.get(identifier(&arena, root, "foo")).unwrap().is_modified());
}

#[test]
fn replace_node_parenthesizes_looser_replacement() {
    let (mut arena, root) = parse("a * b;");
    let old = identifier(&arena, root, "a");
    let x = arena.create_identifier("x");
    let y = arena.create_identifier("y");
    let or = arena.create_logical_or(x, y);

    let placed = arena.replace_node(old, or).unwrap();
    assert_ne!(placed, or);
    assert_eq!(arena.kind(placed), Some(syntax_kind_ext::PARENTHESIZED_EXPRESSION));
    assert_eq!(arena.get_children(placed), vec![or]);
}

#[test]
fn replace_node_keeps_tighter_replacement_unwrapped() {
    let (mut arena, root) = parse("a || b;");
    let old = identifier(&arena, root, "a");
    let this = arena.create_this();
    let call = arena.create_call(this, Vec::new());
    assert_eq!(arena.replace_node(old, call), Some(call));
}

#[test]
fn replace_node_without_parent_fails() {
    let (mut arena, root) = parse("a;");
    let new = arena.create_identifier("b");
    assert_eq!(arena.replace_node(root, new), None);
}

#[test]
fn insert_statement_before_enclosing_statement() {
    let (mut arena, root) = parse("function f() {\n    a();\n    b(c);\n}");
    let anchor = identifier(&arena, root, "c");
    let target = find_node(&arena, root, syntax_kind_ext::EXPRESSION_STATEMENT, "b(c);");
    let block = arena.get_parent(target);

    let init = arena.create_identifier("x");
    let declaration = arena.create_variable_statement(VariableKind::Var, "_o", init);
    assert!(arena.insert_statement_before(anchor, declaration));

    let statements = arena.get_children(block);
    assert_eq!(statements.len(), 3);
    assert_eq!(statements[1], declaration);
    assert_eq!(statements[2], target);

    let inserted = arena.get(declaration).unwrap();
    assert!(inserted.has_flag(node_flags::INSERTED));
    let target_pos = arena.get(target).unwrap().pos;
    assert_eq!((inserted.pos, inserted.end), (target_pos, target_pos));
    assert_eq!(arena.get_parent(declaration), block);
    assert!(arena.get(block).unwrap().is_modified());
    assert!(arena.get(root).unwrap().is_modified());
}

#[test]
fn insert_statement_before_root_fails() {
    let (mut arena, root) = parse("a();");
    let statement = arena.create_variable_statement(VariableKind::Let, "x", NodeIndex::NONE);
    assert!(!arena.insert_statement_before(root, statement));
}

#[test]
fn clone_subtree_copies_structure() {
    let (mut arena, root) = parse("a.b.c;");
    let original = find_node(
        &arena,
        root,
        syntax_kind_ext::PROPERTY_ACCESS_EXPRESSION,
        "a.b.c",
    );
    let copy = arena.clone_subtree(original);

    assert_ne!(copy, original);
    assert!(arena.get_parent(copy).is_none());
    let original_node = *arena.get(original).unwrap();
    let copy_node = *arena.get(copy).unwrap();
    assert_eq!(copy_node.kind, original_node.kind);
    assert_eq!((copy_node.pos, copy_node.end), (original_node.pos, original_node.end));

    let copied_children = arena.get_children(copy);
    let original_children = arena.get_children(original);
    assert_eq!(copied_children.len(), original_children.len());
    for (copied, original) in copied_children.iter().zip(&original_children) {
        assert_ne!(copied, original);
        assert_eq!(arena.get_parent(*copied), copy);
    }
}

#[test]
fn generate_uid_skips_names_used_in_file() {
    let (mut arena, root) = parse("var _o = 1;\nfunction f() { return _o2; }");
    assert_eq!(arena.generate_uid(root, "o"), "_o3");
    assert_eq!(arena.generate_uid(root, "o"), "_o4");
}

#[test]
fn generate_uid_starts_without_suffix() {
    let (mut arena, root) = parse("var a;");
    assert_eq!(arena.generate_uid(root, "o"), "_o");
    assert_eq!(arena.generate_uid(root, "o"), "_o2");
}

#[test]
fn generate_uid_sanitizes_base() {
    let (mut arena, root) = parse("var a;");
    assert_eq!(arena.generate_uid(root, "Ext.Base"), "_ExtBase");
    assert_eq!(arena.generate_uid(root, "_temp1"), "_temp");
    assert_eq!(arena.generate_uid(root, "..."), "_temp2");
}

#[test]
fn generate_uid_identifier_is_synthesized() {
    let (mut arena, root) = parse("var a;");
    let ident = arena.generate_uid_identifier(root, "o");
    assert_eq!(arena.get_identifier_text(ident), Some("_o"));
    assert!(arena.get(ident).unwrap().is_synthesized());
}

#[test]
fn find_ancestor_returns_nearest_match() {
    let (arena, root) = parse(
        "Ext.define('A', {\n    m: function () {\n        wrap(this.callParent());\n    }\n});",
    );
    let inner = find_node(
        &arena,
        root,
        syntax_kind_ext::CALL_EXPRESSION,
        "this.callParent()",
    );
    let is_call = |arena: &NodeArena, idx: NodeIndex| {
        arena.kind(idx) == Some(syntax_kind_ext::CALL_EXPRESSION)
    };

    let wrap = arena.find_ancestor(inner, is_call).unwrap();
    assert_eq!(arena.get_node_text(wrap), Some("wrap(this.callParent())"));
    let define = arena.find_ancestor(wrap, is_call).unwrap();
    assert!(arena.get_node_text(define).unwrap().starts_with("Ext.define("));
    assert_eq!(arena.find_ancestor(define, is_call), None);
}

#[test]
fn enclosing_statement_and_scope() {
    let (arena, root) = parse("var f = function () {\n    if (x) {\n        g(y);\n    }\n};");
    let y = identifier(&arena, root, "y");

    let statement = arena.enclosing_statement(y).unwrap();
    assert_eq!(arena.get_node_text(statement), Some("g(y);"));

    let scope = arena.enclosing_scope(y);
    assert_eq!(arena.kind(scope), Some(syntax_kind_ext::FUNCTION_EXPRESSION));

    let f = identifier(&arena, root, "f");
    assert_eq!(arena.enclosing_scope(f), root);
    let top = arena.enclosing_statement(f).unwrap();
    assert_eq!(arena.kind(top), Some(syntax_kind_ext::VARIABLE_STATEMENT));
}

#[test]
fn variable_kind_round_trips_through_list_flags() {
    let (mut arena, _root) = parse("a;");
    for kind in [VariableKind::Var, VariableKind::Let, VariableKind::Const] {
        let statement = arena.create_variable_statement(kind, "x", NodeIndex::NONE);
        let list = arena.get_children(statement)[0];
        let flags = arena.get(list).unwrap().flags;
        assert_eq!(VariableKind::from_list_flags(flags), kind);
    }
    assert_eq!(VariableKind::Const.keyword(), "const");
}

/// Wraps `x` in `depth` synthesized parentheses; returns (innermost, outermost).
fn nested_parentheses(arena: &mut NodeArena, depth: usize) -> (NodeIndex, NodeIndex) {
    let inner = arena.create_identifier("x");
    let mut current = inner;
    for _ in 0..depth {
        current = arena.create_parenthesized(current);
    }
    (inner, current)
}

#[test]
fn walks_below_depth_limit_reach_the_end() {
    let mut arena = NodeArena::new();
    let (inner, outer) = nested_parentheses(&mut arena, 300);

    assert_eq!(skip_parentheses(&arena, outer), inner);
    let top = arena.find_ancestor(inner, |arena, idx| arena.get_parent(idx).is_none());
    assert_eq!(top, Some(outer));

    let copy = arena.clone_subtree(outer);
    assert_ne!(copy, outer);
    let copied_inner = skip_parentheses(&arena, copy);
    assert_ne!(copied_inner, inner);
    assert_eq!(arena.get_identifier_text(copied_inner), Some("x"));
}

#[test]
fn walks_past_depth_limit_stop_early() {
    let mut arena = NodeArena::new();
    let (inner, outer) = nested_parentheses(&mut arena, MAX_TREE_WALK_DEPTH + 10);

    let stopped = skip_parentheses(&arena, outer);
    assert_ne!(stopped, inner);
    assert_eq!(arena.kind(stopped), Some(syntax_kind_ext::PARENTHESIZED_EXPRESSION));

    let top = arena.find_ancestor(inner, |arena, idx| arena.get_parent(idx).is_none());
    assert_eq!(top, None);
}

#[test]
fn insert_statement_into_class_static_block() {
    let (mut arena, root) = parse("class K {\n    static {\n        init();\n    }\n}");
    let init = identifier(&arena, root, "init");

    let scope = arena.enclosing_scope(init);
    assert_eq!(arena.kind(scope), Some(syntax_kind_ext::CLASS_STATIC_BLOCK_DECLARATION));

    let anchor = arena.enclosing_statement(init).unwrap();
    assert_eq!(arena.get_node_text(anchor), Some("init();"));
    let value = arena.create_numeric_literal("1");
    let statement = arena.create_variable_statement(VariableKind::Let, "ready", value);
    assert!(arena.insert_statement_before(init, statement));
    assert_eq!(arena.get_parent(statement), scope);
    assert_eq!(arena.get_children(scope), vec![statement, anchor]);
}
