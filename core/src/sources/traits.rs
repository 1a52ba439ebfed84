use serde::{Deserialize, Serialize};

/// How a file changed between two revisions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ChangeStatus {
    Added,
    Modified,
    Deleted,
}

/// One entry of a revision-range change list.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FileChange {
    pub status: ChangeStatus,
    /// Path relative to the repository root.
    pub path: String,
}

impl FileChange {
    pub fn new(status: ChangeStatus, path: impl Into<String>) -> Self {
        Self {
            status,
            path: path.into(),
        }
    }
}

/// Trait for change sources - abstracts over how revisions are compared
/// and how historical file contents are fetched.
pub trait ChangeSource {
    type Error: std::error::Error;

    /// Files changed between `from` and `to`, limited to `scope`
    /// (a directory relative to the repository root).
    fn changed_files(
        &self,
        from: &str,
        to: &str,
        scope: &str,
    ) -> Result<Vec<FileChange>, Self::Error>;

    /// Content of `path` at `rev`, or `None` if the file does not exist there.
    fn file_at(&self, rev: &str, path: &str) -> Result<Option<String>, Self::Error>;
}
