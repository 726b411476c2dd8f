//! End-to-end tests for the callParent pass: parse, rewrite, print.

use extsuper_common::diagnostics::DiagnosticCategory;
use extsuper_emitter::{RewriteError, RewriteOptions, RewriteOutcome, print_to_string, rewrite_call_parent};
use extsuper_parser::parser::ParserState;

fn rewrite_with(
    source: &str,
    options: &RewriteOptions,
) -> Result<(String, RewriteOutcome), RewriteError> {
    let mut parser = ParserState::new("app.js".to_string(), source.to_string());
    let root = parser.parse_source_file();
    assert!(parser.get_diagnostics().is_empty(), "{:?}", parser.get_diagnostics());
    let mut arena = parser.into_arena();
    let outcome = rewrite_call_parent(&mut arena, root, options)?;
    Ok((print_to_string(&arena, root), outcome))
}

fn rewrite(source: &str) -> (String, RewriteOutcome) {
    rewrite_with(source, &RewriteOptions::default()).expect("rewrite succeeds")
}

fn rewrite_err(source: &str) -> RewriteError {
    rewrite_with(source, &RewriteOptions::default()).expect_err("rewrite fails")
}

/// Method reference for a class body using `extend` (or nothing).
fn extend_reference(ancestor: &str, method: &str) -> String {
    format!(
        "arguments.callee.$previous || arguments.callee.$owner && \
         arguments.callee.$owner.superclass[arguments.callee.$name] || \
         ({ancestor}.prototype || {ancestor}).{method}"
    )
}

#[test]
fn async_method_with_arguments_uses_apply() {
    let source = "Ext.define('App.Child', {\n    extend: 'App.Parent',\n    load: async function (opts) {\n        await this.callParent(arguments);\n        return opts;\n    }\n});\n";
    let (code, outcome) = rewrite(source);

    let expected = format!(
        "Ext.define('App.Child', {{\n    extend: 'App.Parent',\n    load: async function (opts) {{\n        await ({}).apply(this, arguments);\n        return opts;\n    }}\n}});\n",
        extend_reference("App.Parent", "load")
    );
    assert_eq!(code, expected);
    assert_eq!(outcome.rewritten, 1);
    assert!(outcome.diagnostics.is_empty());
}

#[test]
fn async_method_without_arguments_uses_call() {
    let source = "Ext.define('App.Child', { extend: 'App.Parent', save: async function () { return this.callParent(); } });";
    let (code, _) = rewrite(source);
    assert_eq!(
        code,
        format!(
            "Ext.define('App.Child', {{ extend: 'App.Parent', save: async function () {{ return ({}).call(this); }} }});",
            extend_reference("App.Parent", "save")
        )
    );
}

#[test]
fn override_mode_uses_previous_link() {
    let source = "Ext.define(null, {\n    override: 'App.view.Grid',\n    refresh: async function () {\n        await this.callParent(arguments);\n    }\n});";
    let (code, _) = rewrite(source);
    assert!(code.contains(
        "await (App.view.Grid.prototype || App.view.Grid).refresh.$previous.apply(this, arguments);"
    ));
}

#[test]
fn missing_inheritance_defaults_to_base() {
    let source = "Ext.define('A', { run: async function () { var me = this; await me.callParent([1, 2]); } });";
    let (code, outcome) = rewrite(source);
    assert_eq!(outcome.rewritten, 1);
    assert!(code.contains(&format!(
        "await ({}).apply(this, [1, 2]);",
        extend_reference("Ext.Base", "run")
    )));
    assert!(code.contains("var me = this;"));
}

#[test]
fn expression_ancestor_is_copied() {
    let source = "Ext.define('A', { extend: Base.Thing, go: async function () { await this.callParent(); } });";
    let (code, _) = rewrite(source);
    assert!(code.starts_with("Ext.define('A', { extend: Base.Thing, go: "));
    assert!(code.contains(&format!("await ({}).call(this);", extend_reference("Base.Thing", "go"))));
}

#[test]
fn factory_body_uses_first_own_return() {
    let source = "Ext.define('App.Grid', function () {\n    function helper() {\n        return { override: 'Wrong.Target' };\n    }\n    return {\n        extend: 'App.Panel',\n        refresh: async function () {\n            await this.callParent();\n        }\n    };\n});\n";
    let (code, outcome) = rewrite(source);
    assert_eq!(outcome.rewritten, 1);
    assert!(code.contains(&format!(
        "            await ({}).call(this);\n",
        extend_reference("App.Panel", "refresh")
    )));
    assert!(!code.contains("$previous.call"));
    assert!(code.contains("return { override: 'Wrong.Target' };"));
}

#[test]
fn shorthand_and_arrow_methods_are_rewritten() {
    let source = "Ext.define('A', {\n    async reload() { await this.callParent(); },\n    close: async () => this.callParent(arguments)\n});";
    let (code, outcome) = rewrite(source);
    assert_eq!(outcome.rewritten, 2);
    assert!(code.contains(&format!(
        "async reload() {{ await ({}).call(this); }}",
        extend_reference("Ext.Base", "reload")
    )));
    assert!(code.contains(&format!(
        "close: async () => ({}).apply(this, arguments)",
        extend_reference("Ext.Base", "close")
    )));
}

#[test]
fn synchronous_methods_are_untouched() {
    let source = "Ext.define('A', {\n    extend: 'B',\n    // sync methods resolve callParent at runtime\n    init: function () {\n        this.callParent(arguments);\n        me.callParent();\n    },\n    applyTitle: function (title) { return this.callParent([title]); }\n});\n";
    let (code, outcome) = rewrite(source);
    assert_eq!(code, source);
    assert_eq!(outcome.rewritten, 0);
    assert!(outcome.diagnostics.is_empty());
}

#[test]
fn second_pass_is_a_no_op() {
    let source = "Ext.define('A', {\n    extend: 'B',\n    load: async function () {\n        await this.callParent(arguments);\n    },\n    save: async function () {\n        return this.callParent();\n    }\n});\n";
    let (once, first) = rewrite(source);
    assert_eq!(first.rewritten, 2);

    let (twice, second) = rewrite(&once);
    assert_eq!(twice, once);
    assert_eq!(second.rewritten, 0);
}

#[test]
fn nested_call_parent_in_forwarded_argument() {
    let source = "Ext.define('A', { m: async function () { await this.callParent([await this.callParent()]); } });";
    let (code, outcome) = rewrite(source);
    assert_eq!(outcome.rewritten, 2);
    let reference = extend_reference("Ext.Base", "m");
    assert!(code.contains(&format!(
        "await ({reference}).apply(this, [await ({reference}).call(this)]);"
    )));
}

#[test]
fn missing_define_warns_and_continues() {
    let source = "function orphan() { return this.callParent(); }\nExt.define('A', { go: async function () { await this.callParent(); } });\n";
    let (code, outcome) = rewrite(source);

    assert_eq!(outcome.rewritten, 1);
    assert!(code.starts_with("function orphan() { return this.callParent(); }\n"));
    assert!(code.contains(&format!("await ({}).call(this);", extend_reference("Ext.Base", "go"))));

    assert_eq!(outcome.diagnostics.len(), 1);
    let warning = &outcome.diagnostics[0];
    assert_eq!(warning.category, DiagnosticCategory::Warning);
    assert_eq!(warning.code, 9001);
    assert_eq!(warning.file, "app.js");
    assert_eq!(warning.message_text, "Unable to find 'Ext.define' for this 'callParent'");
    assert_eq!(warning.start as usize, source.find("this.callParent").unwrap());
    assert_eq!(warning.length as usize, "this.callParent()".len());
}

#[test]
fn missing_method_is_fatal() {
    let error = rewrite_err("Ext.define('A', { init: this.callParent() });");
    assert!(matches!(error, RewriteError::MissingMethod { .. }));
    assert_eq!(error.code(), 9002);

    let source = "Ext.define('A', function () { this.callParent(); return {}; });";
    let error = rewrite_err(source);
    assert!(matches!(error, RewriteError::MissingMethod { .. }));
    assert_eq!(error.span().start as usize, source.find("this.callParent").unwrap());
}

#[test]
fn reserved_async_methods_are_fatal() {
    for name in ["apply", "applyFoo", "get", "getterHelper", "set", "update", "constructor"] {
        let source = format!(
            "Ext.define('A', {{ {name}: async function () {{ await this.callParent(arguments); }} }});"
        );
        match rewrite_err(&source) {
            RewriteError::UnsupportedAsyncMethod { method, .. } => assert_eq!(method, name),
            other => panic!("unexpected error for {name}: {other:?}"),
        }
    }
}

#[test]
fn fatal_error_after_warning_reports_only_the_error() {
    let source = "this.callParent();\nExt.define('A', { update: async function () { await this.callParent(); } });";
    let error = rewrite_err(source);
    assert_eq!(error.code(), 9003);
}

#[test]
fn computed_async_method_is_fatal() {
    let error = rewrite_err("Ext.define('A', { [name]: async function () { await this.callParent(); } });");
    assert!(matches!(error, RewriteError::UnnamedMethod { .. }));

    let (code, outcome) =
        rewrite("Ext.define('A', { [name]: function () { this.callParent(); } });");
    assert_eq!(code, "Ext.define('A', { [name]: function () { this.callParent(); } });");
    assert_eq!(outcome.rewritten, 0);
}

#[test]
fn custom_ext_names() {
    let source = "MyApp.define('A', { extend: 'B', go: async function () { await this.callParent(); } });";

    let (unchanged, outcome) = rewrite(source);
    assert_eq!(unchanged, source);
    assert_eq!(outcome.diagnostics.len(), 1);

    let options = RewriteOptions {
        ext_names: vec!["MyApp".to_string(), "Ext".to_string()],
    };
    let (code, outcome) = rewrite_with(source, &options).unwrap();
    assert_eq!(outcome.rewritten, 1);
    assert!(outcome.diagnostics.is_empty());
    assert!(code.contains(&format!("await ({}).call(this);", extend_reference("B", "go"))));

    let options = RewriteOptions {
        ext_names: vec!["Other".to_string()],
    };
    let (_, outcome) = rewrite_with(source, &options).unwrap();
    assert_eq!(
        outcome.diagnostics[0].message_text,
        "Unable to find 'Other.define' for this 'callParent'"
    );
}

#[test]
fn string_method_keys_and_comments_survive() {
    let source = "Ext.define('A', {\n    /* keep me */\n    'on-load': async function () {\n        await this.callParent(); // trailing\n    }\n});";
    let (code, _) = rewrite(source);
    assert!(code.contains("/* keep me */"));
    assert!(code.contains("); // trailing\n"));
    assert!(code.contains("(Ext.Base.prototype || Ext.Base)[\"on-load\"]).call(this);"));
}
