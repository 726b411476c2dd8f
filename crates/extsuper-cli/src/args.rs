use clap::Parser;
use std::path::PathBuf;

/// CLI arguments for the extsuper binary.
#[derive(Parser, Debug)]
#[command(
    name = "extsuper",
    version,
    about = "Rewrite callParent calls in async methods of Ext.define class bodies"
)]
pub struct CliArgs {
    /// Files or directories to rewrite. Directories are searched for .js,
    /// .mjs and .cjs files.
    #[arg(default_value = ".")]
    pub paths: Vec<PathBuf>,

    /// Path to extsuper.json or a directory containing it.
    #[arg(short = 'p', long = "config")]
    pub config: Option<PathBuf>,

    /// Accepted root of `<root>.define(...)`. Repeat for several roots.
    #[arg(long = "ext-name", alias = "extName", value_name = "NAME")]
    pub ext_names: Vec<String>,

    /// Write output files under this directory instead of in place.
    #[arg(long = "out-dir", alias = "outDir")]
    pub out_dir: Option<PathBuf>,

    /// Report files that would change and exit with status 1; write nothing.
    #[arg(long, conflicts_with = "stdout")]
    pub check: bool,

    /// Print rewritten code to stdout instead of writing files.
    #[arg(long, conflicts_with = "out_dir")]
    pub stdout: bool,

    /// Enable color and formatting in diagnostics.
    #[arg(long)]
    pub pretty: Option<bool>,

    /// Number of worker threads (defaults to the number of CPUs).
    #[arg(short = 'j', long)]
    pub jobs: Option<usize>,
}
