//! Parser tests: statements, expressions, object literal members and spans.

use extsuper_parser::parser::{NodeArena, NodeIndex, ParserState, node_flags, syntax_kind_ext};
use extsuper_scanner::SyntaxKind;

fn parse_source(source: &str) -> (ParserState, NodeIndex) {
    let mut parser = ParserState::new("test.js".to_string(), source.to_string());
    let root = parser.parse_source_file();
    (parser, root)
}

fn parse_clean(source: &str) -> (NodeArena, NodeIndex) {
    let (parser, root) = parse_source(source);
    assert!(
        parser.get_diagnostics().is_empty(),
        "unexpected diagnostics for {source:?}: {:?}",
        parser.get_diagnostics()
    );
    (parser.into_arena(), root)
}

fn top_level(arena: &NodeArena, root: NodeIndex) -> Vec<NodeIndex> {
    let node = arena.get(root).unwrap();
    arena.get_source_file(node).unwrap().statements.nodes.clone()
}

fn kinds(arena: &NodeArena, nodes: &[NodeIndex]) -> Vec<u16> {
    nodes.iter().map(|&idx| arena.kind(idx).unwrap()).collect()
}

/// Initializer of the first declaration in `var x = <init>;`.
fn first_initializer(arena: &NodeArena, statement: NodeIndex) -> NodeIndex {
    let list = arena.get_children(statement)[0];
    let declaration = arena.get_children(list)[0];
    let node = arena.get(declaration).unwrap();
    arena.get_variable_declaration(node).unwrap().initializer
}

#[test]
fn parse_variable_statements_record_declaration_keyword() {
    let (arena, root) = parse_clean("var a = 1; let b = 2; const c = 3, d = 4;");
    let statements = top_level(&arena, root);
    assert_eq!(
        kinds(&arena, &statements),
        vec![syntax_kind_ext::VARIABLE_STATEMENT; 3]
    );

    let list_flags: Vec<u16> = statements
        .iter()
        .map(|&stmt| arena.get(arena.get_children(stmt)[0]).unwrap().flags)
        .collect();
    assert_eq!(list_flags[0] & (node_flags::LET | node_flags::CONST), 0);
    assert!(list_flags[1] & node_flags::LET != 0);
    assert!(list_flags[2] & node_flags::CONST != 0);

    let const_list = arena.get_children(statements[2])[0];
    assert_eq!(arena.get_children(const_list).len(), 2);
}

#[test]
fn parse_async_and_generator_functions() {
    let (arena, root) = parse_clean(
        "async function load() { await fetch(url); }\nfunction* gen() { yield 1; yield* other(); }",
    );
    let statements = top_level(&arena, root);
    assert_eq!(
        kinds(&arena, &statements),
        vec![syntax_kind_ext::FUNCTION_DECLARATION; 2]
    );

    let load = arena.get_function(arena.get(statements[0]).unwrap()).unwrap();
    assert!(load.is_async);
    assert!(!load.asterisk_token);
    let gen_fn = arena.get_function(arena.get(statements[1]).unwrap()).unwrap();
    assert!(gen_fn.asterisk_token);
    assert!(!gen_fn.is_async);
}

#[test]
fn parse_await_is_an_identifier_outside_async_functions() {
    let (arena, root) = parse_clean("function f() { var await = 1; return await; }");
    assert_eq!(top_level(&arena, root).len(), 1);
}

#[test]
fn parse_object_literal_member_forms() {
    let (arena, root) = parse_clean(
        "var o = {\n\
           a: 1,\n\
           b,\n\
           c() {},\n\
           async d() { await e; },\n\
           get f() { return 1; },\n\
           set f(v) {},\n\
           [g]: 2,\n\
           ...rest,\n\
           'h': function () {},\n\
           get: 3,\n\
           async: 4\n\
         };",
    );
    let statement = top_level(&arena, root)[0];
    let object = first_initializer(&arena, statement);
    assert_eq!(arena.kind(object), Some(syntax_kind_ext::OBJECT_LITERAL_EXPRESSION));

    let members = arena.get_children(object);
    assert_eq!(
        kinds(&arena, &members),
        vec![
            syntax_kind_ext::PROPERTY_ASSIGNMENT,
            syntax_kind_ext::SHORTHAND_PROPERTY_ASSIGNMENT,
            syntax_kind_ext::METHOD_DECLARATION,
            syntax_kind_ext::METHOD_DECLARATION,
            syntax_kind_ext::GET_ACCESSOR,
            syntax_kind_ext::SET_ACCESSOR,
            syntax_kind_ext::PROPERTY_ASSIGNMENT,
            syntax_kind_ext::SPREAD_ASSIGNMENT,
            syntax_kind_ext::PROPERTY_ASSIGNMENT,
            syntax_kind_ext::PROPERTY_ASSIGNMENT,
            syntax_kind_ext::PROPERTY_ASSIGNMENT,
        ]
    );

    let async_method = arena.get_method_decl(arena.get(members[3]).unwrap()).unwrap();
    assert!(async_method.is_async);
    let plain_method = arena.get_method_decl(arena.get(members[2]).unwrap()).unwrap();
    assert!(!plain_method.is_async);
}

#[test]
fn parse_arrow_functions() {
    let (arena, root) = parse_clean(
        "var f = (a, b) => a + b;\n\
         var g = async x => { await x; };\n\
         var h = () => ({});\n\
         var i = async (y, { z }) => z;",
    );
    let statements = top_level(&arena, root);
    let arrows: Vec<NodeIndex> = statements
        .iter()
        .map(|&stmt| first_initializer(&arena, stmt))
        .collect();
    assert_eq!(
        kinds(&arena, &arrows),
        vec![syntax_kind_ext::ARROW_FUNCTION; 4]
    );

    let g = arena.get_function(arena.get(arrows[1]).unwrap()).unwrap();
    assert!(g.is_async);
    let h = arena.get_function(arena.get(arrows[2]).unwrap()).unwrap();
    assert_eq!(arena.kind(h.body), Some(syntax_kind_ext::PARENTHESIZED_EXPRESSION));
    let i = arena.get_function(arena.get(arrows[3]).unwrap()).unwrap();
    assert!(i.is_async);
    assert_eq!(i.parameters.len(), 2);
}

#[test]
fn parse_parenthesized_expression_is_not_an_arrow() {
    let (arena, root) = parse_clean("var x = (a, b);\nvar y = (c) + 1;");
    let statements = top_level(&arena, root);
    assert_eq!(
        arena.kind(first_initializer(&arena, statements[0])),
        Some(syntax_kind_ext::PARENTHESIZED_EXPRESSION)
    );
    assert_eq!(
        arena.kind(first_initializer(&arena, statements[1])),
        Some(syntax_kind_ext::BINARY_EXPRESSION)
    );
}

#[test]
fn parse_regex_and_division() {
    let (arena, root) = parse_clean("var r = /ab+c/g.test(s) ? a / b / c : /[/]/.source;");
    let statement = top_level(&arena, root)[0];
    let conditional = first_initializer(&arena, statement);
    assert_eq!(arena.kind(conditional), Some(syntax_kind_ext::CONDITIONAL_EXPRESSION));
}

#[test]
fn parse_template_literals_with_nested_substitutions() {
    let (arena, root) = parse_clean("var t = `a${b}c${`nested ${d}`}e`;\nvar u = tag`x${y}`;");
    let statements = top_level(&arena, root);
    assert_eq!(
        arena.kind(first_initializer(&arena, statements[0])),
        Some(syntax_kind_ext::TEMPLATE_EXPRESSION)
    );
    assert_eq!(
        arena.kind(first_initializer(&arena, statements[1])),
        Some(syntax_kind_ext::TAGGED_TEMPLATE_EXPRESSION)
    );
}

#[test]
fn parse_classes() {
    let (arena, root) = parse_clean(
        "class A extends B {\n\
           constructor() { super(); }\n\
           static create() { return new A(); }\n\
           get size() { return 1; }\n\
           async load() { await super.load(); }\n\
         }",
    );
    let statement = top_level(&arena, root)[0];
    assert_eq!(arena.kind(statement), Some(syntax_kind_ext::CLASS_DECLARATION));
    let class = arena.get_class(arena.get(statement).unwrap()).unwrap();
    assert!(class.heritage.is_some());
    assert_eq!(class.members.len(), 4);
}

#[test]
fn parse_control_flow_statements() {
    let (arena, root) = parse_clean(
        "for (var i = 0; i < 3; i++) {}\n\
         for (const k in o) {}\n\
         for (const v of xs) {}\n\
         while (x) { break; }\n\
         do { continue; } while (y);\n\
         switch (z) { case 1: f(); break; default: g(); }\n\
         try { h(); } catch (e) { throw e; } finally { }\n\
         outer: for (;;) { break outer; }\n\
         if (a) b(); else c();\n\
         debugger;\n\
         ;",
    );
    assert_eq!(
        kinds(&arena, &top_level(&arena, root)),
        vec![
            syntax_kind_ext::FOR_STATEMENT,
            syntax_kind_ext::FOR_IN_STATEMENT,
            syntax_kind_ext::FOR_OF_STATEMENT,
            syntax_kind_ext::WHILE_STATEMENT,
            syntax_kind_ext::DO_STATEMENT,
            syntax_kind_ext::SWITCH_STATEMENT,
            syntax_kind_ext::TRY_STATEMENT,
            syntax_kind_ext::LABELED_STATEMENT,
            syntax_kind_ext::IF_STATEMENT,
            syntax_kind_ext::DEBUGGER_STATEMENT,
            syntax_kind_ext::EMPTY_STATEMENT,
        ]
    );
}

#[test]
fn parse_destructuring_bindings() {
    parse_clean(
        "var { a, b: [c, d = 1], ...e } = o;\n\
         function f({ x }, [y, , w], ...z) {}",
    );
}

#[test]
fn parse_optional_chaining() {
    let (arena, root) = parse_clean("a?.b?.[c]?.(d);");
    let statement = top_level(&arena, root)[0];
    let call = arena.get_children(statement)[0];
    let call_node = arena.get(call).unwrap();
    assert_eq!(call_node.kind, syntax_kind_ext::CALL_EXPRESSION);
    assert!(call_node.has_flag(node_flags::OPTIONAL_CHAIN));
}

#[test]
fn parse_automatic_semicolon_insertion() {
    let (arena, root) = parse_clean("a = 1\nb = 2\nreturnValue()\n");
    assert_eq!(top_level(&arena, root).len(), 3);
}

#[test]
fn statement_spans_exclude_leading_trivia() {
    let source = "  // leading\n  foo(bar);  \n";
    let (arena, root) = parse_clean(source);
    let statement = top_level(&arena, root)[0];
    assert_eq!(arena.get_node_text(statement), Some("foo(bar);"));

    let call = arena.get_children(statement)[0];
    assert_eq!(arena.get_node_text(call), Some("foo(bar)"));
}

#[test]
fn parent_links_point_upwards() {
    let (arena, root) = parse_clean("foo(1);");
    let statement = top_level(&arena, root)[0];
    let call = arena.get_children(statement)[0];
    assert_eq!(arena.get_parent(call), statement);
    assert_eq!(arena.get_parent(statement), root);
    assert_eq!(arena.get_root(call), root);
}

#[test]
fn string_literals_store_cooked_values() {
    let (arena, root) = parse_clean("var s = 'it\\'s';");
    let statement = top_level(&arena, root)[0];
    let literal = first_initializer(&arena, statement);
    assert_eq!(arena.kind(literal), Some(SyntaxKind::StringLiteral as u16));
    assert_eq!(arena.get_literal_text(literal), Some("it's"));
    assert_eq!(arena.get_node_text(literal), Some("'it\\'s'"));
}

#[test]
fn missing_initializer_reports_expression_expected() {
    let (parser, root) = parse_source("var x = ;\nvar ok = 1;");
    let codes: Vec<u32> = parser.get_diagnostics().iter().map(|d| d.code).collect();
    assert!(codes.contains(&1109), "expected 1109, got {codes:?}");
    let arena = parser.get_arena();
    assert_eq!(top_level(arena, root).len(), 2);
}

#[test]
fn unclosed_call_reports_a_diagnostic() {
    let (parser, _root) = parse_source("foo(1, 2");
    assert!(!parser.get_diagnostics().is_empty());
}

#[test]
fn unterminated_string_is_reported() {
    let (parser, _root) = parse_source("var s = 'abc\n;");
    let codes: Vec<u32> = parser.get_diagnostics().iter().map(|d| d.code).collect();
    assert!(codes.contains(&1002), "expected 1002, got {codes:?}");
}

#[test]
fn deeply_nested_input_reports_nesting_limit() {
    let handle = std::thread::Builder::new()
        .stack_size(256 * 1024 * 1024)
        .spawn(|| {
            let source = format!("var x = {}1{};", "(".repeat(5000), ")".repeat(5000));
            let (parser, _root) = parse_source(&source);
            parser
                .get_diagnostics()
                .iter()
                .map(|d| d.code)
                .collect::<Vec<u32>>()
        })
        .unwrap();
    let codes = handle.join().unwrap();
    assert!(codes.contains(&1198), "expected 1198, got {codes:?}");
}

#[test]
fn node_headers_and_replacement_info_serialize() {
    let (mut arena, root) = parse_clean("foo(bar);");
    let statement = top_level(&arena, root)[0];
    let call = arena.get_children(statement)[0];
    let bar = arena.get_children(call)[1];

    let node = *arena.get(call).unwrap();
    let json = serde_json::to_value(node).unwrap();
    assert_eq!(json["kind"], serde_json::json!(syntax_kind_ext::CALL_EXPRESSION));
    assert_eq!(json["pos"], serde_json::json!(0));
    assert_eq!(json["end"], serde_json::json!(8));

    let baz = arena.create_identifier("baz");
    arena.replace_node(bar, baz).unwrap();
    let info = *arena.get_extended(baz).unwrap();
    let json = serde_json::to_value(info).unwrap();
    assert_eq!(
        json,
        serde_json::json!({ "parent": call.0, "replaced_span": { "start": 4, "end": 7 } })
    );
}

#[test]
fn parse_class_static_blocks() {
    let (arena, root) = parse_clean(
        "class K {\n    static count = 0;\n    static {\n        K.count = 1;\n    }\n    static() {}\n}",
    );
    let class = top_level(&arena, root)[0];
    let members = arena.get_children(class);
    assert_eq!(
        kinds(&arena, &members),
        vec![
            SyntaxKind::Identifier as u16,
            syntax_kind_ext::PROPERTY_DECLARATION,
            syntax_kind_ext::CLASS_STATIC_BLOCK_DECLARATION,
            syntax_kind_ext::METHOD_DECLARATION,
        ]
    );

    let block = members[2];
    assert_eq!(
        arena.get_node_text(block),
        Some("static {\n        K.count = 1;\n    }")
    );
    let statements = arena.get_children(block);
    assert_eq!(kinds(&arena, &statements), vec![syntax_kind_ext::EXPRESSION_STATEMENT]);
    let block_node = arena.get(block).unwrap();
    assert!(block_node.is_statement_container());
    assert!(block_node.is_function_boundary());
}

#[test]
fn empty_class_static_block() {
    let (arena, root) = parse_clean("class K { static { } }");
    let class = top_level(&arena, root)[0];
    let block = *arena.get_children(class).last().unwrap();
    assert_eq!(arena.kind(block), Some(syntax_kind_ext::CLASS_STATIC_BLOCK_DECLARATION));
    assert!(arena.get_children(block).is_empty());
}

#[test]
fn unexpected_token_in_class_body() {
    let (parser, root) = parse_source("class K { ) m() {} }");
    let diagnostics = parser.get_diagnostics();
    assert_eq!(diagnostics.len(), 1, "{diagnostics:?}");
    assert_eq!(diagnostics[0].code, 1012);
    assert_eq!(diagnostics[0].message_text, "Unexpected token ')'.");
    assert_eq!((diagnostics[0].start, diagnostics[0].length), (10, 1));

    let arena = parser.get_arena();
    let class = top_level(arena, root)[0];
    let members = arena.get_children(class);
    assert_eq!(arena.kind(*members.last().unwrap()), Some(syntax_kind_ext::METHOD_DECLARATION));
}
