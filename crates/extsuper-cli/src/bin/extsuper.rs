#![allow(clippy::print_stderr)]

use anyhow::{Context, Result};
use clap::Parser;
use std::io::{IsTerminal, Write};

use extsuper_cli::args::CliArgs;
use extsuper_cli::driver;
use extsuper_cli::reporter::Reporter;

#[cfg(not(target_arch = "wasm32"))]
#[global_allocator]
static GLOBAL: mimalloc::MiMalloc = mimalloc::MiMalloc;

fn main() -> Result<()> {
    // Initialize tracing if EXTSUPER_LOG or RUST_LOG is set.
    extsuper::tracing_config::init_tracing();

    let args = CliArgs::parse();
    let cwd = std::env::current_dir().context("failed to resolve current directory")?;
    let result = driver::run(&args, &cwd)?;

    if args.stdout {
        let mut stdout = std::io::stdout().lock();
        for file in &result.files {
            stdout
                .write_all(file.result.code.as_bytes())
                .context("failed to write to stdout")?;
        }
    }

    if args.check {
        for path in result.changed_files() {
            println!("{}", path.strip_prefix(&cwd).unwrap_or(path).display());
        }
    }

    let pretty = args
        .pretty
        .unwrap_or_else(|| std::io::stderr().is_terminal());
    let mut reporter = Reporter::new(pretty);
    for file in result.files.iter().filter(|f| !f.result.diagnostics.is_empty()) {
        reporter.add_source(&file.file_name, &file.source);
    }
    let output = reporter.render(result.diagnostics());
    if !output.is_empty() {
        eprint!("{output}");
    }

    if !args.stdout && !args.check {
        let changed = result.changed_files().count();
        eprintln!(
            "Rewrote {} callParent call(s) in {} of {} file(s).",
            result.rewritten(),
            changed,
            result.files.len()
        );
    }

    std::process::exit(result.exit_code(args.check));
}
