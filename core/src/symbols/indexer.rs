//! The external symbol indexer.
//!
//! Any tool that can turn "a tree + a language" into a symbol table file
//! (see [`super::SymbolTable`]) satisfies [`SymbolIndexer`]. The default is
//! the `lsp-cli` executable, driven as a subprocess.

use crate::config::find_executable;
use std::future::Future;
use std::path::PathBuf;
use std::process::Command;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum IndexerError {
    #[error("Indexer '{0}' not found in PATH")]
    NotFound(String),
    /// The indexer ran and exited non-zero; `output` is its own diagnostics.
    #[error("{output}")]
    Failed { program: String, output: String },
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// One indexing job: index `tree` as `language`, write the table to `output`.
#[derive(Debug, Clone)]
pub struct IndexRequest {
    pub tree: PathBuf,
    pub language: String,
    pub output: PathBuf,
}

impl IndexRequest {
    pub fn new(tree: impl Into<PathBuf>, language: &str, output: impl Into<PathBuf>) -> Self {
        Self {
            tree: tree.into(),
            language: language.to_owned(),
            output: output.into(),
        }
    }
}

/// Capability: produce a symbol table file for a source tree.
///
/// Jobs share no state, so callers may run several concurrently.
pub trait SymbolIndexer: Sync {
    fn index(&self, request: &IndexRequest)
        -> impl Future<Output = Result<(), IndexerError>> + Send;
}

/// `lsp-cli <tree> <language> <output>`
#[derive(Debug, Clone)]
pub struct LspCli {
    program: String,
}

impl LspCli {
    pub fn new(program: impl Into<String>) -> Self {
        Self {
            program: program.into(),
        }
    }

    pub fn program(&self) -> &str {
        &self.program
    }

    /// Resolve the indexer executable in PATH (or accept an explicit path).
    pub fn find_executable(&self) -> Option<PathBuf> {
        find_executable(&self.program)
    }

    /// The indexer's bundled usage documentation (`--llm`), if it has any.
    pub fn documentation(&self) -> Result<Option<String>, IndexerError> {
        let executable = self
            .find_executable()
            .ok_or_else(|| IndexerError::NotFound(self.program.clone()))?;
        let output = Command::new(executable).arg("--llm").output()?;
        if !output.status.success() {
            return Ok(None);
        }
        let text = String::from_utf8_lossy(&output.stdout).to_string();
        Ok((!text.trim().is_empty()).then_some(text))
    }
}

impl SymbolIndexer for LspCli {
    async fn index(&self, request: &IndexRequest) -> Result<(), IndexerError> {
        let executable = self
            .find_executable()
            .ok_or_else(|| IndexerError::NotFound(self.program.clone()))?;

        log::info!(
            "[lsp-cli] Indexing {} ({}) -> {}",
            request.tree.display(),
            request.language,
            request.output.display()
        );

        let output = tokio::process::Command::new(&executable)
            .arg(&request.tree)
            .arg(&request.language)
            .arg(&request.output)
            .output()
            .await?;

        if output.status.success() {
            log::debug!("[lsp-cli] Finished {}", request.output.display());
            Ok(())
        } else {
            let mut combined = String::from_utf8_lossy(&output.stdout).to_string();
            combined.push_str(&String::from_utf8_lossy(&output.stderr));
            Err(IndexerError::Failed {
                program: self.program.clone(),
                output: combined,
            })
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_missing_indexer_is_not_found() {
        let indexer = LspCli::new("porter-no-such-indexer-binary");
        assert!(indexer.find_executable().is_none());
        assert!(matches!(
            indexer.documentation(),
            Err(IndexerError::NotFound(_))
        ));
    }

    #[test]
    fn test_explicit_missing_path() {
        let indexer = LspCli::new("/nonexistent/dir/lsp-cli");
        assert!(indexer.find_executable().is_none());
    }

    #[test]
    fn test_index_reports_missing_executable() {
        let indexer = LspCli::new("porter-no-such-indexer-binary");
        let request = IndexRequest::new("/tmp", "java", "/tmp/out.json");
        let rt = tokio::runtime::Runtime::new().unwrap();
        let result = rt.block_on(indexer.index(&request));
        assert!(matches!(result, Err(IndexerError::NotFound(_))));
    }
}
