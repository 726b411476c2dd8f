use anyhow::{Context, Result, bail};
use rayon::prelude::*;
use rustc_hash::FxHashSet;
use std::path::{Path, PathBuf};
use tracing::{debug, info};
use walkdir::WalkDir;

use crate::args::CliArgs;
use crate::config::{FileFilter, ResolvedConfig, resolve_config};
use extsuper::{Diagnostic, RewriteResult, rewrite_source};

/// Exit status: nothing to report.
pub const EXIT_SUCCESS: i32 = 0;
/// Exit status: `--check` found files that would change.
pub const EXIT_CHANGES_PENDING: i32 = 1;
/// Exit status: a file had a parse error or a fatal rewrite error.
pub const EXIT_ERRORS: i32 = 2;

/// Worker stack size. Deeply nested sources recurse in the parser.
const WORKER_STACK_SIZE: usize = 16 * 1024 * 1024;

const SOURCE_EXTENSIONS: &[&str] = &["js", "mjs", "cjs"];

/// What to do with rewritten text.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputMode {
    /// Overwrite changed files.
    InPlace,
    /// Write every processed file under the output directory.
    OutDir,
    /// Keep results in memory for the caller to print.
    Stdout,
    /// Write nothing.
    Check,
}

impl OutputMode {
    fn from_args(args: &CliArgs, config: &ResolvedConfig) -> Self {
        if args.check {
            OutputMode::Check
        } else if args.stdout {
            OutputMode::Stdout
        } else if config.out_dir.is_some() {
            OutputMode::OutDir
        } else {
            OutputMode::InPlace
        }
    }
}

/// One processed file.
#[derive(Debug, Clone)]
pub struct FileOutcome {
    pub path: PathBuf,
    /// Name used in diagnostics.
    pub file_name: String,
    /// Text as read from disk.
    pub source: String,
    pub result: RewriteResult,
    /// Where the output was written, if anywhere.
    pub written: Option<PathBuf>,
}

#[derive(Debug, Clone, Default)]
pub struct RunResult {
    pub files: Vec<FileOutcome>,
}

impl RunResult {
    pub fn diagnostics(&self) -> impl Iterator<Item = &Diagnostic> {
        self.files.iter().flat_map(|file| file.result.diagnostics.iter())
    }

    pub fn changed_files(&self) -> impl Iterator<Item = &Path> {
        self.files
            .iter()
            .filter(|file| file.result.changed)
            .map(|file| file.path.as_path())
    }

    #[must_use]
    pub fn rewritten(&self) -> usize {
        self.files.iter().map(|file| file.result.rewritten).sum()
    }

    #[must_use]
    pub fn has_errors(&self) -> bool {
        self.files.iter().any(|file| file.result.has_errors())
    }

    #[must_use]
    pub fn exit_code(&self, check: bool) -> i32 {
        if self.has_errors() {
            EXIT_ERRORS
        } else if check && self.changed_files().next().is_some() {
            EXIT_CHANGES_PENDING
        } else {
            EXIT_SUCCESS
        }
    }
}

/// Rewrite every file selected by `args`.
pub fn run(args: &CliArgs, cwd: &Path) -> Result<RunResult> {
    let config = resolve_config(args, cwd)?;
    let mode = OutputMode::from_args(args, &config);
    let paths: Vec<PathBuf> = args.paths.iter().map(|path| cwd.join(path)).collect();
    let files = discover_files(&paths, &config.filter, &config.base_dir)?;
    info!(files = files.len(), ?mode, "rewriting");

    let pool = rayon::ThreadPoolBuilder::new()
        .num_threads(args.jobs.unwrap_or(0))
        .stack_size(WORKER_STACK_SIZE)
        .build()
        .context("failed to start worker threads")?;

    let files = pool.install(|| {
        files
            .par_iter()
            .map(|path| process_file(path, cwd, &config, mode))
            .collect::<Result<Vec<_>>>()
    })?;

    Ok(RunResult { files })
}

/// Expand `paths` into the sorted list of source files to process.
///
/// Files named explicitly are always taken. Directory entries must have a
/// JavaScript extension and pass `filter`.
pub fn discover_files(paths: &[PathBuf], filter: &FileFilter, base_dir: &Path) -> Result<Vec<PathBuf>> {
    let mut files = Vec::new();
    let mut seen = FxHashSet::default();

    for path in paths {
        if path.is_file() {
            if seen.insert(path.clone()) {
                files.push(path.clone());
            }
            continue;
        }
        if !path.is_dir() {
            bail!("{}: no such file or directory", path.display());
        }

        for entry in WalkDir::new(path).into_iter().filter_map(|e| e.ok()) {
            let entry_path = entry.path();
            if !entry.file_type().is_file() || !has_source_extension(entry_path) {
                continue;
            }
            let relative = entry_path.strip_prefix(base_dir).unwrap_or(entry_path);
            if !filter.is_match(relative) {
                debug!(path = %entry_path.display(), "excluded");
                continue;
            }
            if seen.insert(entry_path.to_path_buf()) {
                files.push(entry_path.to_path_buf());
            }
        }
    }

    files.sort();
    Ok(files)
}

fn has_source_extension(path: &Path) -> bool {
    path.extension()
        .and_then(|ext| ext.to_str())
        .is_some_and(|ext| SOURCE_EXTENSIONS.contains(&ext))
}

fn process_file(path: &Path, cwd: &Path, config: &ResolvedConfig, mode: OutputMode) -> Result<FileOutcome> {
    let source = std::fs::read_to_string(path)
        .with_context(|| format!("failed to read {}", path.display()))?;
    let file_name = path.strip_prefix(cwd).unwrap_or(path).display().to_string();
    let result = rewrite_source(&file_name, &source, &config.options);

    let target = match mode {
        OutputMode::InPlace if result.changed => Some(path.to_path_buf()),
        OutputMode::OutDir => config
            .out_dir
            .as_deref()
            .map(|out_dir| output_path(path, &config.base_dir, out_dir)),
        _ => None,
    };
    if let Some(target) = &target {
        if let Some(parent) = target.parent() {
            std::fs::create_dir_all(parent)
                .with_context(|| format!("failed to create {}", parent.display()))?;
        }
        std::fs::write(target, &result.code)
            .with_context(|| format!("failed to write {}", target.display()))?;
        debug!(path = %target.display(), rewritten = result.rewritten, "wrote");
    }

    Ok(FileOutcome {
        path: path.to_path_buf(),
        file_name,
        source,
        result,
        written: target,
    })
}

/// `out_dir` joined with `path` relative to `base_dir` (or just its file
/// name when it lies outside `base_dir`).
#[must_use]
pub fn output_path(path: &Path, base_dir: &Path, out_dir: &Path) -> PathBuf {
    match path.strip_prefix(base_dir) {
        Ok(relative) => out_dir.join(relative),
        Err(_) => out_dir.join(path.file_name().unwrap_or(path.as_os_str())),
    }
}
