use serde::Serialize;
use thiserror::Error;

/// Unified error type for the porter CLI.
///
/// Module errors convert into one of these kinds. Serializes to JSON for
/// `--format json` consumers.
#[derive(Error, Debug, Serialize)]
#[serde(tag = "type", content = "details")]
pub enum AppError {
    #[error("{message}")]
    Environment { message: String },

    #[error("{resource} not found")]
    NotFound { resource: String },

    #[error("{message}")]
    Ambiguous { message: String },

    /// An external tool exited non-zero; `output` is its own diagnostics.
    #[error("{output}")]
    Subprocess { program: String, output: String },

    #[error("{message}")]
    DataFormat { message: String },

    #[error("Git error: {message}")]
    Git { message: String },

    #[error("IO error: {message}")]
    Io { message: String },
}

impl AppError {
    pub fn environment(message: impl Into<String>) -> Self {
        Self::Environment {
            message: message.into(),
        }
    }

    pub fn not_found(resource: impl Into<String>) -> Self {
        Self::NotFound {
            resource: resource.into(),
        }
    }

    pub fn ambiguous(message: impl Into<String>) -> Self {
        Self::Ambiguous {
            message: message.into(),
        }
    }

    pub fn subprocess(program: impl Into<String>, output: impl Into<String>) -> Self {
        Self::Subprocess {
            program: program.into(),
            output: output.into(),
        }
    }

    pub fn data_format(message: impl Into<String>) -> Self {
        Self::DataFormat {
            message: message.into(),
        }
    }

    pub fn git(message: impl Into<String>) -> Self {
        Self::Git {
            message: message.into(),
        }
    }

    pub fn io(message: impl Into<String>) -> Self {
        Self::Io {
            message: message.into(),
        }
    }

    /// Whether this error prevents producing the requested artifact.
    ///
    /// Data-format problems are the only kind that may be downgraded to a
    /// warning, and only when the data was optional enrichment.
    pub fn is_fatal(&self) -> bool {
        !matches!(self, Self::DataFormat { .. })
    }

    /// Subprocess diagnostics are printed verbatim, everything else gets an
    /// `Error:` prefix.
    pub fn is_passthrough(&self) -> bool {
        matches!(self, Self::Subprocess { .. })
    }
}

impl From<crate::sources::local_git::LocalGitError> for AppError {
    fn from(err: crate::sources::local_git::LocalGitError) -> Self {
        use crate::sources::local_git::LocalGitError;
        match err {
            LocalGitError::Git(msg) => AppError::git(msg.trim()),
            LocalGitError::Io(e) => AppError::io(e.to_string()),
            LocalGitError::NotARepo(path) => {
                AppError::environment(format!("Not a git repository: {path}"))
            }
        }
    }
}

impl From<crate::plan::storage::StorageError> for AppError {
    fn from(err: crate::plan::storage::StorageError) -> Self {
        use crate::plan::storage::StorageError;
        match err {
            StorageError::Io(e) => AppError::io(e.to_string()),
            StorageError::Json { .. } | StorageError::Missing(_) => {
                AppError::data_format(err.to_string())
            }
        }
    }
}

impl From<crate::symbols::SymbolTableError> for AppError {
    fn from(err: crate::symbols::SymbolTableError) -> Self {
        AppError::data_format(err.to_string())
    }
}

impl From<crate::symbols::indexer::IndexerError> for AppError {
    fn from(err: crate::symbols::indexer::IndexerError) -> Self {
        use crate::symbols::indexer::IndexerError;
        match err {
            IndexerError::NotFound(program) => {
                AppError::environment(format!("Indexer '{program}' not found in PATH"))
            }
            IndexerError::Failed { program, output } => AppError::subprocess(program, output),
            IndexerError::Io(e) => AppError::io(e.to_string()),
        }
    }
}

impl From<crate::symbols::locate::LocateError> for AppError {
    fn from(err: crate::symbols::locate::LocateError) -> Self {
        use crate::symbols::locate::LocateError;
        match err {
            LocateError::NotFound(name) => AppError::not_found(format!("Type '{name}'")),
            LocateError::Ambiguous { .. } => AppError::ambiguous(err.to_string()),
        }
    }
}

impl From<crate::plan::PlanError> for AppError {
    fn from(err: crate::plan::PlanError) -> Self {
        use crate::plan::PlanError;
        match err {
            PlanError::UnknownFile(_) | PlanError::UnknownType { .. } => {
                AppError::not_found(err.to_string())
            }
            PlanError::AmbiguousFile(_) => AppError::ambiguous(err.to_string()),
        }
    }
}

impl From<crate::compile::CompileError> for AppError {
    fn from(err: crate::compile::CompileError) -> Self {
        use crate::compile::CompileError;
        match err {
            CompileError::UnsupportedRuntime(_) | CompileError::CompilerNotFound(_) => {
                AppError::environment(err.to_string())
            }
            CompileError::Failed { program, diagnostic } => {
                AppError::subprocess(program, diagnostic)
            }
            CompileError::Io(e) => AppError::io(e.to_string()),
        }
    }
}

impl From<std::io::Error> for AppError {
    fn from(err: std::io::Error) -> Self {
        AppError::io(err.to_string())
    }
}
