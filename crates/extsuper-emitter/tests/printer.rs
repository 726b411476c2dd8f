use super::*;
use extsuper_parser::parser::{ParserState, VariableKind};

fn parse(source: &str) -> (NodeArena, NodeIndex) {
    let mut parser = ParserState::new("test.js".to_string(), source.to_string());
    let root = parser.parse_source_file();
    assert!(parser.get_diagnostics().is_empty(), "{:?}", parser.get_diagnostics());
    (parser.into_arena(), root)
}

fn find_identifier(arena: &NodeArena, root: NodeIndex, name: &str) -> NodeIndex {
    let mut stack = vec![root];
    while let Some(idx) = stack.pop() {
        if arena.kind(idx) == Some(SyntaxKind::Identifier as u16)
            && arena.get_identifier_text(idx) == Some(name)
            && !arena.get(idx).unwrap().is_synthesized()
        {
            return idx;
        }
        let mut children = arena.get_children(idx);
        children.reverse();
        stack.extend(children);
    }
    panic!("identifier {name} not found");
}

fn print_detached(arena: &NodeArena, idx: NodeIndex) -> String {
    let mut printer = Printer::new(arena, PrintOptions::default());
    printer.print(idx);
    printer.finish().code
}

#[test]
fn unmodified_tree_prints_verbatim() {
    let source = "// header\nvar a = 1 /* one */;\n\nfunction f(x) {\n\treturn x  +  a;\n}\n";
    let (arena, root) = parse(source);
    assert_eq!(print_to_string(&arena, root), source);
}

#[test]
fn replaced_node_is_spliced_into_original_text() {
    let source = "foo( bar , /* keep */ baz );";
    let (mut arena, root) = parse(source);
    let bar = find_identifier(&arena, root, "bar");
    let qux = arena.create_identifier("qux");
    arena.replace_node(bar, qux).unwrap();

    assert_eq!(print_to_string(&arena, root), "foo( qux , /* keep */ baz );");
}

#[test]
fn replacement_parenthesized_when_looser_than_slot() {
    let (mut arena, root) = parse("a.b;");
    let a = find_identifier(&arena, root, "a");
    let x = arena.create_identifier("x");
    let y = arena.create_identifier("y");
    let or = arena.create_logical_or(x, y);
    arena.replace_node(a, or).unwrap();

    assert_eq!(print_to_string(&arena, root), "(x || y).b;");
}

#[test]
fn inserted_statement_keeps_indentation() {
    let (mut arena, root) = parse("function f() {\n    a();\n}\n");
    let a = find_identifier(&arena, root, "a");
    let init = arena.create_identifier("x");
    let statement = arena.create_variable_statement(VariableKind::Var, "_o", init);
    assert!(arena.insert_statement_before(a, statement));

    assert_eq!(
        print_to_string(&arena, root),
        "function f() {\n    var _o = x;\n    a();\n}\n"
    );
}

#[test]
fn inserted_statement_mid_line_is_space_separated() {
    let (mut arena, root) = parse("a(); b();");
    let b = find_identifier(&arena, root, "b");
    let one = arena.create_numeric_literal("1");
    let statement = arena.create_variable_statement(VariableKind::Const, "x", one);
    assert!(arena.insert_statement_before(b, statement));

    assert_eq!(print_to_string(&arena, root), "a(); const x = 1; b();");
}

#[test]
fn inserted_statement_uses_source_line_endings() {
    let (mut arena, root) = parse("if (ok) {\r\n  go();\r\n}\r\n");
    let go = find_identifier(&arena, root, "go");
    let statement = arena.create_variable_statement(VariableKind::Let, "y", NodeIndex::NONE);
    assert!(arena.insert_statement_before(go, statement));

    assert_eq!(
        print_to_string(&arena, root),
        "if (ok) {\r\n  let y;\r\n  go();\r\n}\r\n"
    );
}

#[test]
fn object_literal_statement_is_parenthesized() {
    let (mut arena, root) = parse("x;\n({a: 1});");
    let object = {
        let mut stack = vec![root];
        let mut found = NodeIndex::NONE;
        while let Some(idx) = stack.pop() {
            if arena.kind(idx) == Some(syntax_kind_ext::OBJECT_LITERAL_EXPRESSION) {
                found = idx;
                break;
            }
            stack.extend(arena.get_children(idx));
        }
        found
    };
    let x = find_identifier(&arena, root, "x");
    arena.replace_node(x, object).unwrap();

    assert_eq!(print_to_string(&arena, root), "({a: 1});\n({a: 1});");
}

#[test]
fn synthesized_string_literal_is_escaped() {
    let mut arena = NodeArena::new();
    let literal = arena.create_string_literal("say \"hi\"\n\\");
    assert_eq!(print_detached(&arena, literal), "\"say \\\"hi\\\"\\n\\\\\"");
}

#[test]
fn synthesized_binary_respects_associativity() {
    let mut arena = NodeArena::new();
    let a = arena.create_identifier("a");
    let b = arena.create_identifier("b");
    let c = arena.create_identifier("c");
    let d = arena.create_identifier("d");
    let left = arena.create_binary(a, SyntaxKind::MinusToken, b);
    let right = arena.create_binary(c, SyntaxKind::MinusToken, d);
    let outer = arena.create_binary(left, SyntaxKind::MinusToken, right);

    assert_eq!(print_detached(&arena, outer), "a - b - (c - d)");
}

#[test]
fn synthesized_coalesce_is_not_mixed_with_logical_or() {
    let mut arena = NodeArena::new();
    let a = arena.create_identifier("a");
    let b = arena.create_identifier("b");
    let c = arena.create_identifier("c");
    let or = arena.create_logical_or(b, c);
    let coalesce = arena.create_binary(a, SyntaxKind::QuestionQuestionToken, or);

    assert_eq!(print_detached(&arena, coalesce), "a ?? (b || c)");
}

#[test]
fn synthesized_call_on_logical_expression() {
    let mut arena = NodeArena::new();
    let a = arena.create_identifier("a");
    let b = arena.create_identifier("b");
    let or = arena.create_logical_or(a, b);
    let callee = arena.create_property_access(or, "call");
    let this = arena.create_this();
    let call = arena.create_call(callee, vec![this]);

    assert_eq!(print_detached(&arena, call), "(a || b).call(this)");
}

#[test]
fn new_line_detection() {
    assert_eq!(resolve_new_line(NewLineKind::Detect, "a;\r\nb;"), "\r\n");
    assert_eq!(resolve_new_line(NewLineKind::Detect, "a;\nb;"), "\n");
    assert_eq!(resolve_new_line(NewLineKind::LineFeed, "a;\r\nb;"), "\n");
    assert_eq!(
        resolve_new_line(NewLineKind::CarriageReturnLineFeed, ""),
        "\r\n"
    );
}
