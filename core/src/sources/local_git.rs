use super::traits::{ChangeSource, ChangeStatus, FileChange};
use std::path::{Path, PathBuf};
use std::process::Command;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum LocalGitError {
    #[error("Git error: {0}")]
    Git(String),
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("Not a git repository: {0}")]
    NotARepo(String),
}

#[derive(Debug)]
pub struct LocalGitSource {
    repo_path: PathBuf,
}

impl LocalGitSource {
    pub fn new(repo_path: PathBuf) -> Result<Self, LocalGitError> {
        // `.git` is a directory in a normal clone and a file in a worktree.
        if !repo_path.join(".git").exists() {
            return Err(LocalGitError::NotARepo(repo_path.display().to_string()));
        }
        Ok(Self { repo_path })
    }

    /// Resolve a revision to its commit hash.
    pub fn resolve_commit(&self, rev: &str) -> Result<String, LocalGitError> {
        let spec = format!("{rev}^{{commit}}");
        let output = self.run_git(&["rev-parse", "--verify", "--quiet", &spec])?;
        Ok(output.trim().to_owned())
    }

    /// Check out `rev` into a detached worktree at `path`.
    pub fn add_worktree(&self, path: &Path, rev: &str) -> Result<(), LocalGitError> {
        let path_str = path.to_string_lossy();
        self.run_git(&["worktree", "add", "--detach", "--force", &path_str, rev])?;
        Ok(())
    }

    /// Remove a worktree created by [`Self::add_worktree`].
    pub fn remove_worktree(&self, path: &Path) -> Result<(), LocalGitError> {
        let path_str = path.to_string_lossy();
        if let Err(e) = self.run_git(&["worktree", "remove", "--force", &path_str]) {
            log::debug!("[remove_worktree] {e}; pruning instead");
            self.run_git(&["worktree", "prune"])?;
        }
        Ok(())
    }

    fn run_git(&self, args: &[&str]) -> Result<String, LocalGitError> {
        let output = Command::new("git")
            .args(args)
            .current_dir(&self.repo_path)
            .output()?;

        if output.status.success() {
            Ok(String::from_utf8_lossy(&output.stdout).to_string())
        } else {
            Err(LocalGitError::Git(
                String::from_utf8_lossy(&output.stderr).to_string(),
            ))
        }
    }

    fn run_git_bytes(&self, args: &[&str]) -> Result<Vec<u8>, LocalGitError> {
        let output = Command::new("git")
            .args(args)
            .current_dir(&self.repo_path)
            .output()?;

        if output.status.success() {
            Ok(output.stdout)
        } else {
            Err(LocalGitError::Git(
                String::from_utf8_lossy(&output.stderr).to_string(),
            ))
        }
    }

    /// Get file content as bytes at the specified ref
    pub fn get_file_bytes(&self, file_path: &str, git_ref: &str) -> Result<Vec<u8>, LocalGitError> {
        let ref_spec = format!("{git_ref}:{file_path}");
        self.run_git_bytes(&["show", &ref_spec])
    }
}

/// Whether a `git show` failure means "no such path at that revision"
/// rather than a bad revision or a broken repository.
fn is_missing_path(stderr: &str) -> bool {
    stderr.contains("does not exist in") || stderr.contains("exists on disk, but not in")
}

/// Parse `git diff --name-status` output.
///
/// Renames become a deletion of the old path plus an addition of the new
/// one; copies become an addition; type changes count as modifications.
pub fn parse_name_status(output: &str) -> Vec<FileChange> {
    let mut changes = Vec::new();

    for line in output.lines() {
        let mut parts = line.split('\t');
        let (Some(status), Some(path)) = (parts.next(), parts.next()) else {
            continue;
        };
        let second = parts.next();

        match status.chars().next() {
            Some('A') => changes.push(FileChange::new(ChangeStatus::Added, path)),
            Some('M' | 'T') => changes.push(FileChange::new(ChangeStatus::Modified, path)),
            Some('D') => changes.push(FileChange::new(ChangeStatus::Deleted, path)),
            Some('R') => {
                if let Some(new_path) = second {
                    changes.push(FileChange::new(ChangeStatus::Deleted, path));
                    changes.push(FileChange::new(ChangeStatus::Added, new_path));
                }
            }
            Some('C') => {
                if let Some(new_path) = second {
                    changes.push(FileChange::new(ChangeStatus::Added, new_path));
                }
            }
            _ => log::debug!("[parse_name_status] Skipping unrecognized line: {line}"),
        }
    }

    changes
}

impl ChangeSource for LocalGitSource {
    type Error = LocalGitError;

    fn changed_files(
        &self,
        from: &str,
        to: &str,
        scope: &str,
    ) -> Result<Vec<FileChange>, Self::Error> {
        let range = format!("{from}..{to}");
        let output = self.run_git(&["diff", "--name-status", &range, "--", scope])?;
        Ok(parse_name_status(&output))
    }

    fn file_at(&self, rev: &str, path: &str) -> Result<Option<String>, Self::Error> {
        match self.get_file_bytes(path, rev) {
            Ok(bytes) => Ok(Some(String::from_utf8_lossy(&bytes).to_string())),
            Err(LocalGitError::Git(stderr)) if is_missing_path(&stderr) => Ok(None),
            Err(e) => Err(e),
        }
    }
}
