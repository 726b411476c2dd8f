use super::args::CliArgs;
use clap::Parser;
use std::path::PathBuf;

#[test]
fn defaults_to_current_directory() {
    let args = CliArgs::try_parse_from(["extsuper"]).unwrap();
    assert_eq!(args.paths, vec![PathBuf::from(".")]);
    assert!(args.ext_names.is_empty());
    assert!(args.config.is_none());
    assert!(!args.check);
    assert!(!args.stdout);
    assert_eq!(args.pretty, None);
}

#[test]
fn ext_name_is_repeatable() {
    let args = CliArgs::try_parse_from([
        "extsuper",
        "--ext-name",
        "Ext",
        "--ext-name",
        "MyApp",
        "app",
        "lib/Base.js",
    ])
    .unwrap();
    assert_eq!(args.ext_names, vec!["Ext", "MyApp"]);
    assert_eq!(
        args.paths,
        vec![PathBuf::from("app"), PathBuf::from("lib/Base.js")]
    );
}

#[test]
fn camel_case_aliases() {
    let args = CliArgs::try_parse_from(["extsuper", "--extName", "App", "--outDir", "build"]).unwrap();
    assert_eq!(args.ext_names, vec!["App"]);
    assert_eq!(args.out_dir, Some(PathBuf::from("build")));
}

#[test]
fn stdout_conflicts_with_check_and_out_dir() {
    assert!(CliArgs::try_parse_from(["extsuper", "--stdout", "--check"]).is_err());
    assert!(CliArgs::try_parse_from(["extsuper", "--stdout", "--out-dir", "out"]).is_err());
    assert!(CliArgs::try_parse_from(["extsuper", "--check", "--out-dir", "out"]).is_ok());
}

#[test]
fn pretty_and_jobs_take_values() {
    let args = CliArgs::try_parse_from(["extsuper", "--pretty", "false", "-j", "2", "a.js"]).unwrap();
    assert_eq!(args.pretty, Some(false));
    assert_eq!(args.jobs, Some(2));
    assert_eq!(args.paths, vec![PathBuf::from("a.js")]);
}
