//! Runtime configuration.
//!
//! Each setting is resolved from an explicit override (CLI flag), then a
//! `PORTER_*` environment variable, then a built-in default.

use std::path::{Path, PathBuf};
use std::process::Command;

/// Directory under the spine-runtimes root holding the reference sources.
pub const DEFAULT_REFERENCE_DIR: &str = "spine-libgdx/spine-libgdx/src/com/esotericsoftware/spine";

pub const DEFAULT_INDEXER: &str = "lsp-cli";

pub const DEFAULT_CXX: &str = "g++";

#[derive(Debug, Clone)]
pub struct PorterConfig {
    /// Where `porting-plan.json` and the symbol tables live.
    pub workdir: PathBuf,
    /// Indexer executable (name in PATH or explicit path).
    pub indexer: String,
    /// C++ compiler used by the compilation check.
    pub cxx: String,
    /// Reference sub-directory, relative to the spine-runtimes root.
    pub reference_dir: String,
}

impl PorterConfig {
    /// Resolve the configuration from the environment, with an optional
    /// working directory override.
    pub fn resolve(workdir: Option<&Path>) -> Result<Self, std::io::Error> {
        let workdir = match workdir {
            Some(dir) => resolve_absolute(dir)?,
            None => match std::env::var("PORTER_WORKDIR") {
                Ok(dir) if !dir.is_empty() => resolve_absolute(Path::new(&dir))?,
                _ => std::env::current_dir()?,
            },
        };

        Ok(Self {
            workdir,
            indexer: env_or("PORTER_INDEXER", DEFAULT_INDEXER),
            cxx: std::env::var("PORTER_CXX")
                .or_else(|_| std::env::var("CXX"))
                .ok()
                .filter(|v| !v.is_empty())
                .unwrap_or_else(|| DEFAULT_CXX.to_owned()),
            reference_dir: env_or("PORTER_REFERENCE_DIR", DEFAULT_REFERENCE_DIR),
        })
    }

    /// A configuration rooted at `workdir` with every other setting at its
    /// default. Environment variables are ignored.
    pub fn with_workdir(workdir: impl Into<PathBuf>) -> Self {
        Self {
            workdir: workdir.into(),
            indexer: DEFAULT_INDEXER.to_owned(),
            cxx: DEFAULT_CXX.to_owned(),
            reference_dir: DEFAULT_REFERENCE_DIR.to_owned(),
        }
    }
}

fn env_or(key: &str, default: &str) -> String {
    std::env::var(key)
        .ok()
        .filter(|v| !v.is_empty())
        .unwrap_or_else(|| default.to_owned())
}

/// Resolve a potentially relative path to an absolute one.
pub fn resolve_absolute(path: &Path) -> Result<PathBuf, std::io::Error> {
    if path.is_absolute() {
        return Ok(path.to_path_buf());
    }
    let cwd = std::env::current_dir()?;
    Ok(cwd.join(path))
}

/// Absolute, canonical form of `path`. Falls back to the absolute path
/// when canonicalization fails.
pub fn canonical_path(path: &Path) -> Result<PathBuf, std::io::Error> {
    let absolute = resolve_absolute(path)?;
    Ok(absolute.canonicalize().unwrap_or(absolute))
}

/// Resolve an executable in PATH, or accept an explicit path to one.
pub fn find_executable(program: &str) -> Option<PathBuf> {
    let explicit = Path::new(program);
    if explicit.components().count() > 1 {
        return explicit.exists().then(|| explicit.to_path_buf());
    }

    let which_cmd = if cfg!(target_os = "windows") {
        "where"
    } else {
        "which"
    };
    let output = Command::new(which_cmd).arg(program).output().ok()?;
    if !output.status.success() {
        return None;
    }
    let path = String::from_utf8_lossy(&output.stdout)
        .lines()
        .next()
        .unwrap_or("")
        .trim()
        .to_owned();
    (!path.is_empty()).then(|| PathBuf::from(path))
}
