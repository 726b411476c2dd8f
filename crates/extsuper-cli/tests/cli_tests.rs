//! End-to-end runs of the driver over a project on disk.

use clap::Parser;
use extsuper_cli::args::CliArgs;
use extsuper_cli::driver::{self, EXIT_ERRORS, EXIT_SUCCESS};
use extsuper_cli::reporter::Reporter;
use std::path::Path;

fn write_file(dir: &Path, name: &str, contents: &str) {
    let path = dir.join(name);
    std::fs::create_dir_all(path.parent().unwrap()).unwrap();
    std::fs::write(path, contents).unwrap();
}

fn parse_args(argv: &[&str]) -> CliArgs {
    CliArgs::try_parse_from(std::iter::once("extsuper").chain(argv.iter().copied())).unwrap()
}

#[test]
fn project_config_drives_the_run() {
    let dir = tempfile::tempdir().unwrap();
    write_file(
        dir.path(),
        "extsuper.json",
        r#"{ "extNames": ["MyApp"], "include": ["src/**/*.js"], "outDir": "dist" }"#,
    );
    write_file(
        dir.path(),
        "src/view/Panel.js",
        "MyApp.define('MyApp.view.Panel', {\n    override: 'MyApp.view.Base',\n    render: async function () {\n        await this.callParent();\n    }\n});\n",
    );
    write_file(dir.path(), "scripts/build.js", "this.callParent();\n");

    let result = driver::run(&parse_args(&[]), dir.path()).unwrap();
    assert_eq!(result.exit_code(false), EXIT_SUCCESS);
    assert_eq!(result.files.len(), 1);

    let output = std::fs::read_to_string(dir.path().join("dist/src/view/Panel.js")).unwrap();
    assert_eq!(
        output,
        "MyApp.define('MyApp.view.Panel', {\n    override: 'MyApp.view.Base',\n    render: async function () {\n        await (MyApp.view.Base.prototype || MyApp.view.Base).render.$previous.call(this);\n    }\n});\n"
    );
    assert!(!dir.path().join("dist/scripts").exists());
}

#[test]
fn errors_are_reported_per_file() {
    let dir = tempfile::tempdir().unwrap();
    write_file(
        dir.path(),
        "Bad.js",
        "Ext.define('Bad', {\n    getValue: async function () {\n        return this.callParent();\n    }\n});\n",
    );
    write_file(
        dir.path(),
        "Good.js",
        "Ext.define('Good', { value: async function () { return this.callParent(); } });\n",
    );

    let result = driver::run(&parse_args(&["--check"]), dir.path()).unwrap();
    assert_eq!(result.exit_code(true), EXIT_ERRORS);

    let mut reporter = Reporter::new(false);
    for file in &result.files {
        reporter.add_source(&file.file_name, &file.source);
    }
    let rendered = reporter.render(result.diagnostics());
    assert!(rendered.starts_with(
        "Bad.js:3:16 - error XS9003: callParent is not supported in async functions of the following types: apply, get, set, update, constructor\n"
    ));
    assert!(rendered.contains(concat!("    3   ", "        return this.callParent();\n")));
}
