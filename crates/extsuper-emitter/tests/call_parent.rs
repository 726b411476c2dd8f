use super::*;
use crate::emitter::{PrintOptions, Printer, print_to_string};
use extsuper_parser::parser::ParserState;

fn parse(source: &str) -> (NodeArena, NodeIndex) {
    let mut parser = ParserState::new("test.js".to_string(), source.to_string());
    let root = parser.parse_source_file();
    assert!(parser.get_diagnostics().is_empty(), "{:?}", parser.get_diagnostics());
    (parser.into_arena(), root)
}

/// Call expressions in pre-order.
fn calls(arena: &NodeArena, root: NodeIndex) -> Vec<NodeIndex> {
    let mut found = Vec::new();
    let mut stack = vec![root];
    while let Some(idx) = stack.pop() {
        if arena.kind(idx) == Some(syntax_kind_ext::CALL_EXPRESSION) {
            found.push(idx);
        }
        let mut children = arena.get_children(idx);
        children.reverse();
        stack.extend(children);
    }
    found
}

fn first_call_parent(arena: &NodeArena, root: NodeIndex) -> NodeIndex {
    calls(arena, root)
        .into_iter()
        .find(|&call| is_call_parent_invocation(arena, call))
        .expect("a callParent call")
}

fn ext_names<'a>(names: &[&'a str]) -> FxHashSet<&'a str> {
    names.iter().copied().collect()
}

fn inheritance_of(source: &str) -> (NodeArena, Option<InheritanceProperty>) {
    let (arena, root) = parse(source);
    let define = calls(&arena, root)[0];
    let property = get_inheritance_property(&arena, define);
    (arena, property)
}

fn print_with_source(arena: &NodeArena, idx: NodeIndex, source: &str) -> String {
    let mut printer = Printer::new(arena, PrintOptions::default());
    printer.set_source_text(source);
    printer.print(idx);
    printer.finish().code
}

#[test]
fn call_parent_receivers() {
    let (arena, root) = parse(
        "this.callParent(); me.callParent(arguments); self.callParent(); \
         this.callParent?.(); this.other(); callParent();",
    );
    let matches: Vec<bool> = calls(&arena, root)
        .into_iter()
        .map(|call| is_call_parent_invocation(&arena, call))
        .collect();
    assert_eq!(matches, vec![true, true, false, false, false, false]);
}

#[test]
fn define_call_requires_accepted_root() {
    let (arena, root) = parse(
        "Ext.define('A', {}); App.define('B', {}); Ext.create('C'); Ext['define']('D', {});",
    );
    let calls = calls(&arena, root);

    let default_names = ext_names(&["Ext"]);
    let matches: Vec<bool> = calls
        .iter()
        .map(|&call| is_define_call(&arena, call, &default_names))
        .collect();
    assert_eq!(matches, vec![true, false, false, false]);

    let both = ext_names(&["Ext", "App"]);
    let matches: Vec<bool> = calls
        .iter()
        .map(|&call| is_define_call(&arena, call, &both))
        .collect();
    assert_eq!(matches, vec![true, true, false, false]);
}

#[test]
fn enclosing_define_is_nearest() {
    let (arena, root) = parse(
        "App.define('Outer', { make: function () { Ext.define('Inner', { run: function () { this.callParent(); } }); } });",
    );
    let call = first_call_parent(&arena, root);

    let define = find_enclosing_define(&arena, call, &ext_names(&["Ext", "App"])).unwrap();
    assert_eq!(arena.get_identifier_text(arena.get_children(arena.get_children(define)[0])[0]), Some("Ext"));

    let outer = find_enclosing_define(&arena, call, &ext_names(&["App"])).unwrap();
    assert_ne!(outer, define);
    assert!(find_enclosing_define(&arena, call, &ext_names(&["Foo"])).is_none());
}

#[test]
fn enclosing_method_skips_plain_callbacks() {
    let (arena, root) = parse(
        "Ext.define('A', { load: async function () { list.forEach(function () { this.callParent(); }); } });",
    );
    let call = first_call_parent(&arena, root);
    let method = find_enclosing_method(&arena, call).unwrap();
    assert!(method.is_async);
    assert_eq!(method.name(&arena), Some("load"));
}

#[test]
fn enclosing_method_shapes() {
    let (arena, root) = parse("({ async save() { await this.callParent(); } });");
    let method = find_enclosing_method(&arena, first_call_parent(&arena, root)).unwrap();
    assert!(method.is_async);
    assert_eq!(method.name(&arena), Some("save"));

    let (arena, root) = parse("({ 'do-it': async () => this.callParent() });");
    let method = find_enclosing_method(&arena, first_call_parent(&arena, root)).unwrap();
    assert!(method.is_async);
    assert_eq!(method.name(&arena), Some("do-it"));

    let (arena, root) = parse("({ [key]: function () { this.callParent(); } });");
    let method = find_enclosing_method(&arena, first_call_parent(&arena, root)).unwrap();
    assert!(!method.is_async);
    assert_eq!(method.name(&arena), None);

    let (arena, root) = parse("function run() { this.callParent(); }");
    assert!(find_enclosing_method(&arena, first_call_parent(&arena, root)).is_none());
}

#[test]
fn reserved_names_match_by_prefix() {
    for name in ["apply", "applyFoo", "get", "getterHelper", "set", "setup", "update", "constructor"] {
        assert!(is_reserved_method_name(name), "{name} should be reserved");
    }
    for name in ["load", "doGet", "Apply", "onUpdate", ""] {
        assert!(!is_reserved_method_name(name), "{name} should not be reserved");
    }
}

#[test]
fn inheritance_property_in_object_body() {
    let (arena, property) =
        inheritance_of("Ext.define('A', { foo: 1, extend: 'B', override: 'C' });");
    let property = property.unwrap();
    assert_eq!(property.kind, InheritanceKind::Extend);
    assert_eq!(arena.get_literal_text(property.value), Some("B"));

    let (_, property) = inheritance_of("Ext.define('A', { 'override': 'C' });");
    assert_eq!(property.unwrap().kind, InheritanceKind::Override);
}

#[test]
fn inheritance_property_in_factory_body() {
    let (arena, property) = inheritance_of(
        "Ext.define('A', function (A) {\n\
             function helper() { return { override: 'Wrong' }; }\n\
             if (A) { return { override: 'Right' }; }\n\
             return { extend: 'Never' };\n\
         });",
    );
    let property = property.unwrap();
    assert_eq!(property.kind, InheritanceKind::Override);
    assert_eq!(arena.get_literal_text(property.value), Some("Right"));

    let (arena, property) = inheritance_of("Ext.define('A', () => ({ extend: Base }));");
    let property = property.unwrap();
    assert_eq!(property.kind, InheritanceKind::Extend);
    assert_eq!(arena.get_identifier_text(property.value), Some("Base"));
}

#[test]
fn inheritance_property_absent() {
    for source in [
        "Ext.define('A', { foo: 1 });",
        "Ext.define('A', config);",
        "Ext.define('A');",
        "Ext.define('A', function () { return make(); });",
        "Ext.define('A', function () { var f = function () { return { extend: 'B' }; }; });",
    ] {
        let (_, property) = inheritance_of(source);
        assert!(property.is_none(), "{source}");
    }
}

#[test]
fn ancestor_reference_from_string_path() {
    let cases = [
        ("Ext.define('A', { extend: 'Foo.Bar' });", "Foo.Bar"),
        ("Ext.define('A', { extend: 'Foo..Bar.' });", "Foo.Bar"),
        ("Ext.define('A', { extend: '' });", "Ext.Base"),
        ("Ext.define('A', { foo: 1 });", "Ext.Base"),
    ];
    for (source, expected) in cases {
        let (mut arena, property) = inheritance_of(source);
        let ancestor = build_ancestor_reference(&mut arena, property.as_ref());
        assert_eq!(print_to_string(&arena, ancestor), expected, "{source}");
    }
}

#[test]
fn ancestor_reference_copies_expression() {
    let source = "Ext.define('A', { extend: App.base[kind] });";
    let (mut arena, property) = inheritance_of(source);
    let property = property.unwrap();
    let ancestor = build_ancestor_reference(&mut arena, Some(&property));

    assert_ne!(ancestor, property.value);
    assert_eq!(print_with_source(&arena, ancestor, source), "App.base[kind]");
    assert!(!arena.is_detached(property.value));
}

#[test]
fn method_reference_override_mode() {
    let mut arena = NodeArena::new();
    let ancestor = build_ancestor_reference(&mut arena, None);
    let reference = build_method_reference(&mut arena, ancestor, "load", InheritanceKind::Override);
    assert_eq!(
        print_to_string(&arena, reference),
        "(Ext.Base.prototype || Ext.Base).load.$previous"
    );
}

#[test]
fn method_reference_extend_mode() {
    let mut arena = NodeArena::new();
    let ancestor = build_ancestor_reference(&mut arena, None);
    let reference = build_method_reference(&mut arena, ancestor, "load", InheritanceKind::Extend);
    assert_eq!(
        print_to_string(&arena, reference),
        "arguments.callee.$previous || arguments.callee.$owner && \
         arguments.callee.$owner.superclass[arguments.callee.$name] || \
         (Ext.Base.prototype || Ext.Base).load"
    );
}

#[test]
fn method_reference_quotes_non_identifier_names() {
    let mut arena = NodeArena::new();
    let ancestor = build_ancestor_reference(&mut arena, None);
    let reference =
        build_method_reference(&mut arena, ancestor, "do-it", InheritanceKind::Override);
    assert_eq!(
        print_to_string(&arena, reference),
        "(Ext.Base.prototype || Ext.Base)[\"do-it\"].$previous"
    );
}

#[test]
fn replacement_uses_apply_or_call() {
    let mut arena = NodeArena::new();
    let method = arena.create_identifier("m");
    let args = arena.create_identifier("arguments");
    let with_args = build_replacement(&mut arena, method, Some(args));
    assert_eq!(print_to_string(&arena, with_args), "m.apply(this, arguments)");

    let method = arena.create_identifier("m");
    let without = build_replacement(&mut arena, method, None);
    assert_eq!(print_to_string(&arena, without), "m.call(this)");
}

#[test]
fn error_codes_and_messages() {
    let error = RewriteError::UnsupportedAsyncMethod {
        method: "applyTitle".to_string(),
        span: SourceSpan::new(10, 27),
    };
    assert_eq!(error.code(), 9003);
    assert_eq!(
        error.to_string(),
        "callParent is not supported in async functions of the following types: \
         apply, get, set, update, constructor"
    );
    let diagnostic = error.to_diagnostic("a.js");
    assert!(diagnostic.is_error());
    assert_eq!((diagnostic.start, diagnostic.length), (10, 17));

    let missing = RewriteError::MissingMethod {
        span: SourceSpan::new(0, 4),
    };
    assert_eq!(missing.code(), 9002);
    assert_eq!(
        missing.to_string(),
        "Unable to find method declaration for this 'callParent'"
    );
    assert_eq!(RewriteError::UnnamedMethod { span: SourceSpan::default() }.code(), 9004);
}

#[test]
fn options_deserialize_with_defaults() {
    let options: RewriteOptions = serde_json::from_str(r#"{"extNames": ["Ext", "MyApp"]}"#).unwrap();
    assert_eq!(options.ext_names, vec!["Ext", "MyApp"]);

    let options: RewriteOptions = serde_json::from_str("{}").unwrap();
    assert_eq!(options, RewriteOptions::default());
}
