use super::args::CliArgs;
use super::config::FileFilter;
use super::driver::{
    EXIT_CHANGES_PENDING, EXIT_ERRORS, EXIT_SUCCESS, discover_files, output_path, run,
};
use clap::Parser;
use std::path::{Path, PathBuf};

const ASYNC_CHILD: &str = "Ext.define('App.Child', {\n    extend: 'App.Parent',\n    load: async function () {\n        await this.callParent(arguments);\n    }\n});\n";
const SYNC_CHILD: &str = "Ext.define('App.Sync', {\n    init: function () {\n        this.callParent();\n    }\n});\n";
const RESERVED: &str = "Ext.define('App.Bad', {\n    applyTitle: async function () {\n        await this.callParent(arguments);\n    }\n});\n";

fn write_file(dir: &Path, name: &str, contents: &str) -> PathBuf {
    let path = dir.join(name);
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent).expect("failed to create test dir");
    }
    std::fs::write(&path, contents).expect("failed to write test file");
    path
}

fn read(path: &Path) -> String {
    std::fs::read_to_string(path).expect("failed to read test file")
}

fn args(extra: &[&str]) -> CliArgs {
    let mut argv = vec!["extsuper"];
    argv.extend_from_slice(extra);
    CliArgs::try_parse_from(argv).unwrap()
}

/// app/Child.js (async), app/Sync.js, a vendored file and a non-source file.
fn project() -> tempfile::TempDir {
    let dir = tempfile::tempdir().unwrap();
    write_file(dir.path(), "app/Child.js", ASYNC_CHILD);
    write_file(dir.path(), "app/view/Sync.mjs", SYNC_CHILD);
    write_file(dir.path(), "node_modules/ext/Vendor.js", ASYNC_CHILD);
    write_file(dir.path(), "app/notes.txt", "this.callParent();");
    dir
}

#[test]
fn discovers_sources_and_applies_filter() {
    let dir = project();
    let filter = FileFilter::new(None, None).unwrap();
    let files = discover_files(&[dir.path().to_path_buf()], &filter, dir.path()).unwrap();
    assert_eq!(
        files,
        vec![
            dir.path().join("app/Child.js"),
            dir.path().join("app/view/Sync.mjs"),
        ]
    );
}

#[test]
fn explicit_files_bypass_filter() {
    let dir = project();
    let filter = FileFilter::new(None, None).unwrap();
    let vendor = dir.path().join("node_modules/ext/Vendor.js");
    let files = discover_files(&[vendor.clone(), vendor.clone()], &filter, dir.path()).unwrap();
    assert_eq!(files, vec![vendor]);
}

#[test]
fn missing_path_is_an_error() {
    let dir = tempfile::tempdir().unwrap();
    let error = run(&args(&["missing"]), dir.path()).unwrap_err();
    assert!(error.to_string().contains("no such file or directory"));
}

#[test]
fn rewrites_in_place() {
    let dir = project();
    let result = run(&args(&[]), dir.path()).unwrap();

    assert_eq!(result.files.len(), 2);
    assert_eq!(result.rewritten(), 1);
    assert_eq!(result.exit_code(false), EXIT_SUCCESS);

    let child = read(&dir.path().join("app/Child.js"));
    assert!(child.contains(
        "await (arguments.callee.$previous || arguments.callee.$owner && \
         arguments.callee.$owner.superclass[arguments.callee.$name] || \
         (App.Parent.prototype || App.Parent).load).apply(this, arguments);"
    ));
    assert_eq!(read(&dir.path().join("app/view/Sync.mjs")), SYNC_CHILD);
    assert_eq!(read(&dir.path().join("node_modules/ext/Vendor.js")), ASYNC_CHILD);

    let written: Vec<_> = result.files.iter().filter_map(|f| f.written.clone()).collect();
    assert_eq!(written, vec![dir.path().join("app/Child.js")]);
}

#[test]
fn check_mode_writes_nothing() {
    let dir = project();
    let result = run(&args(&["--check"]), dir.path()).unwrap();

    assert_eq!(result.exit_code(true), EXIT_CHANGES_PENDING);
    let changed: Vec<_> = result.changed_files().collect();
    assert_eq!(changed, vec![dir.path().join("app/Child.js").as_path()]);
    assert_eq!(read(&dir.path().join("app/Child.js")), ASYNC_CHILD);
}

#[test]
fn check_mode_without_changes_succeeds() {
    let dir = tempfile::tempdir().unwrap();
    write_file(dir.path(), "Sync.js", SYNC_CHILD);
    let result = run(&args(&["--check"]), dir.path()).unwrap();
    assert_eq!(result.exit_code(true), EXIT_SUCCESS);
}

#[test]
fn out_dir_mirrors_layout() {
    let dir = project();
    let result = run(&args(&["--out-dir", "build"]), dir.path()).unwrap();
    assert_eq!(result.exit_code(false), EXIT_SUCCESS);

    let out = dir.path().join("build");
    assert!(read(&out.join("app/Child.js")).contains(".load).apply(this, arguments);"));
    assert_eq!(read(&out.join("app/view/Sync.mjs")), SYNC_CHILD);
    assert_eq!(read(&dir.path().join("app/Child.js")), ASYNC_CHILD);
}

#[test]
fn stdout_mode_keeps_results_in_memory() {
    let dir = project();
    let result = run(&args(&["--stdout", "app/Child.js"]), dir.path()).unwrap();
    assert_eq!(result.files.len(), 1);
    assert!(result.files[0].written.is_none());
    assert!(result.files[0].result.code.contains("$previous"));
    assert_eq!(read(&dir.path().join("app/Child.js")), ASYNC_CHILD);
}

#[test]
fn fatal_rewrite_error_leaves_file_untouched() {
    let dir = project();
    let bad = write_file(dir.path(), "app/Bad.js", RESERVED);
    let result = run(&args(&[]), dir.path()).unwrap();

    assert_eq!(result.exit_code(false), EXIT_ERRORS);
    assert_eq!(read(&bad), RESERVED);
    let codes: Vec<u32> = result.diagnostics().map(|d| d.code).collect();
    assert_eq!(codes, vec![9003]);

    // The other files are still processed.
    assert!(read(&dir.path().join("app/Child.js")).contains("$previous"));
}

#[test]
fn parse_error_leaves_file_untouched() {
    let dir = tempfile::tempdir().unwrap();
    let broken = "Ext.define('A', { go: async function () { await this.callParent( } });\n";
    let path = write_file(dir.path(), "Broken.js", broken);
    let result = run(&args(&[]), dir.path()).unwrap();

    assert_eq!(result.exit_code(false), EXIT_ERRORS);
    assert_eq!(read(&path), broken);
    assert!(result.diagnostics().all(|d| d.code < 9000));
}

#[test]
fn warnings_do_not_fail_the_run() {
    let dir = tempfile::tempdir().unwrap();
    write_file(dir.path(), "Loose.js", "function f() { this.callParent(); }\n");
    let result = run(&args(&[]), dir.path()).unwrap();

    assert_eq!(result.exit_code(false), EXIT_SUCCESS);
    let diagnostics: Vec<_> = result.diagnostics().collect();
    assert_eq!(diagnostics.len(), 1);
    assert_eq!(diagnostics[0].code, 9001);
    assert_eq!(diagnostics[0].file, "Loose.js");
}

#[test]
fn output_path_mapping() {
    let base = Path::new("/work/project");
    let out = Path::new("/work/out");
    assert_eq!(
        output_path(Path::new("/work/project/app/A.js"), base, out),
        PathBuf::from("/work/out/app/A.js")
    );
    assert_eq!(
        output_path(Path::new("/elsewhere/B.js"), base, out),
        PathBuf::from("/work/out/B.js")
    );
}
