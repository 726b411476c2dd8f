use anyhow::{Context, Result};
use globset::{GlobBuilder, GlobSet, GlobSetBuilder};
use serde::Deserialize;
use std::path::{Path, PathBuf};

use crate::args::CliArgs;
use extsuper_emitter::RewriteOptions;

pub const CONFIG_FILE_NAME: &str = "extsuper.json";

/// Excluded when the config names no `exclude` patterns.
const DEFAULT_EXCLUDE: &[&str] = &["**/node_modules/**"];

/// Contents of `extsuper.json`.
#[derive(Debug, Clone, Deserialize, Default, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct ExtsuperConfig {
    #[serde(default)]
    pub ext_names: Option<Vec<String>>,
    #[serde(default)]
    pub include: Option<Vec<String>>,
    #[serde(default)]
    pub exclude: Option<Vec<String>>,
    #[serde(default)]
    pub out_dir: Option<String>,
}

pub fn parse_config(source: &str) -> Result<ExtsuperConfig> {
    serde_json::from_str(source).context("failed to parse extsuper config")
}

/// Load a config file. `path` may also name the directory holding it.
pub fn load_config(path: &Path) -> Result<ExtsuperConfig> {
    let file = if path.is_dir() {
        path.join(CONFIG_FILE_NAME)
    } else {
        path.to_path_buf()
    };
    let source = std::fs::read_to_string(&file)
        .with_context(|| format!("failed to read config file {}", file.display()))?;
    parse_config(&source).with_context(|| format!("in {}", file.display()))
}

/// `extsuper.json` in `dir`, if present.
#[must_use]
pub fn find_config(dir: &Path) -> Option<PathBuf> {
    let candidate = dir.join(CONFIG_FILE_NAME);
    candidate.is_file().then_some(candidate)
}

/// Include / exclude glob filter applied to paths relative to the base
/// directory.
#[derive(Debug, Clone)]
pub struct FileFilter {
    include: Option<GlobSet>,
    exclude: GlobSet,
}

impl FileFilter {
    pub fn new(include: Option<&[String]>, exclude: Option<&[String]>) -> Result<Self> {
        let include = include.map(build_glob_set).transpose()?;
        let exclude = match exclude {
            Some(patterns) => build_glob_set(patterns)?,
            None => {
                let defaults: Vec<String> =
                    DEFAULT_EXCLUDE.iter().map(|p| (*p).to_string()).collect();
                build_glob_set(&defaults)?
            }
        };
        Ok(FileFilter { include, exclude })
    }

    #[must_use]
    pub fn is_match(&self, relative: &Path) -> bool {
        if self.exclude.is_match(relative) {
            return false;
        }
        self.include
            .as_ref()
            .is_none_or(|include| include.is_match(relative))
    }
}

impl Default for FileFilter {
    fn default() -> Self {
        FileFilter {
            include: None,
            exclude: GlobSet::empty(),
        }
    }
}

fn build_glob_set(patterns: &[String]) -> Result<GlobSet> {
    let mut builder = GlobSetBuilder::new();
    for pattern in patterns {
        let glob = GlobBuilder::new(pattern)
            .literal_separator(true)
            .build()
            .with_context(|| format!("invalid glob pattern '{pattern}'"))?;
        builder.add(glob);
    }
    builder.build().context("failed to compile glob patterns")
}

/// Settings for one run, after merging the config file and the flags.
#[derive(Debug, Clone)]
pub struct ResolvedConfig {
    pub options: RewriteOptions,
    pub filter: FileFilter,
    pub out_dir: Option<PathBuf>,
    /// Directory globs and `out_dir` are relative to.
    pub base_dir: PathBuf,
}

/// Merge `--config` (or `extsuper.json` in `cwd`) with the command line.
/// Flags win over file values.
pub fn resolve_config(args: &CliArgs, cwd: &Path) -> Result<ResolvedConfig> {
    let config_path = match &args.config {
        Some(path) => Some(cwd.join(path)),
        None => find_config(cwd),
    };
    let (config, base_dir) = match config_path {
        Some(path) => {
            let config = load_config(&path)?;
            let base_dir = if path.is_dir() {
                path
            } else {
                path.parent().map_or_else(|| cwd.to_path_buf(), Path::to_path_buf)
            };
            (config, base_dir)
        }
        None => (ExtsuperConfig::default(), cwd.to_path_buf()),
    };

    let mut options = RewriteOptions::default();
    if !args.ext_names.is_empty() {
        options.ext_names = args.ext_names.clone();
    } else if let Some(names) = config.ext_names.filter(|names| !names.is_empty()) {
        options.ext_names = names;
    }

    let filter = FileFilter::new(config.include.as_deref(), config.exclude.as_deref())?;
    let out_dir = match (&args.out_dir, &config.out_dir) {
        (Some(dir), _) => Some(cwd.join(dir)),
        (None, Some(dir)) => Some(base_dir.join(dir)),
        (None, None) => None,
    };

    Ok(ResolvedConfig {
        options,
        filter,
        out_dir,
        base_dir,
    })
}
