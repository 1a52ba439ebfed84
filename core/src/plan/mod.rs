//! The porting plan: a persisted queue of type-level porting work.
//!
//! A plan is generated once per `plan` run (see [`builder`]) and then only
//! ever has its `portingState`/`status` fields moved from pending to done.

pub mod builder;
pub mod storage;

use crate::runtimes::TargetRuntime;
use crate::symbols::SymbolKind;
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use thiserror::Error;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PortingState {
    #[default]
    Pending,
    Done,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PlanMetadata {
    /// Older revision of the comparison.
    pub prev_branch: String,
    /// Newer revision of the comparison.
    pub current_branch: String,
    /// ISO-8601 generation time.
    pub generated: String,
    pub spine_runtimes_dir: String,
    pub reference_path: String,
    pub target_runtime: TargetRuntime,
    pub target_runtime_path: String,
    pub target_runtime_language: String,
    /// Where the older revision was checked out when it was indexed. Paths
    /// in the old symbol table start with this prefix.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub previous_snapshot_root: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TypeInfo {
    pub name: String,
    pub kind: SymbolKind,
    pub start_line: u32,
    pub end_line: u32,
    pub is_inner: bool,
    pub porting_state: PortingState,
    #[serde(default)]
    pub candidate_files: BTreeSet<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PortingEntry {
    pub java_source_path: String,
    pub types: Vec<TypeInfo>,
    /// File-level state, present only when no types were indexed for the
    /// file. Otherwise progress is tracked per type.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub status: Option<PortingState>,
}

impl PortingEntry {
    pub fn new(java_source_path: impl Into<String>, types: Vec<TypeInfo>) -> Self {
        let status = types.is_empty().then_some(PortingState::Pending);
        Self {
            java_source_path: java_source_path.into(),
            types,
            status,
        }
    }

    pub fn is_done(&self) -> bool {
        if self.types.is_empty() {
            return self.status == Some(PortingState::Done);
        }
        self.types
            .iter()
            .all(|t| t.porting_state == PortingState::Done)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DeletedFileEntry {
    pub file_path: String,
    pub status: PortingState,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PortingPlan {
    pub metadata: PlanMetadata,
    pub deleted_files: Vec<DeletedFileEntry>,
    pub porting_order: Vec<PortingEntry>,
}

/// Counts for the `status` command.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PlanProgress {
    pub files_total: usize,
    pub files_done: usize,
    pub types_total: usize,
    pub types_done: usize,
    pub deleted_total: usize,
    pub deleted_done: usize,
}

#[derive(Error, Debug, PartialEq, Eq)]
pub enum PlanError {
    #[error("No plan entry for {0}")]
    UnknownFile(String),
    #[error("Type '{name}' is not part of {file}")]
    UnknownType { file: String, name: String },
    #[error("'{0}' matches more than one plan entry")]
    AmbiguousFile(String),
}

impl PortingPlan {
    pub fn progress(&self) -> PlanProgress {
        let types = self.porting_order.iter().flat_map(|e| e.types.iter());
        PlanProgress {
            files_total: self.porting_order.len(),
            files_done: self.porting_order.iter().filter(|e| e.is_done()).count(),
            types_total: types.clone().count(),
            types_done: types
                .filter(|t| t.porting_state == PortingState::Done)
                .count(),
            deleted_total: self.deleted_files.len(),
            deleted_done: self
                .deleted_files
                .iter()
                .filter(|d| d.status == PortingState::Done)
                .count(),
        }
    }

    /// The first entry in porting order that still has pending work.
    pub fn next_pending(&self) -> Option<&PortingEntry> {
        self.porting_order.iter().find(|e| !e.is_done())
    }

    /// Mark work as done.
    ///
    /// `file` may be a full path or a unique suffix of one (`Animation.java`).
    /// With `type_name`, only that type is marked; without it, every type
    /// of the entry (or the deleted-file entry) is. Returns how many items
    /// changed from pending to done.
    pub fn mark_done(&mut self, file: &str, type_name: Option<&str>) -> Result<usize, PlanError> {
        let entry_index = unique_match(
            self.porting_order.iter().map(|e| e.java_source_path.as_str()),
            file,
        )?;

        if let Some(index) = entry_index {
            let entry = &mut self.porting_order[index];
            if entry.types.is_empty() && type_name.is_none() {
                if entry.is_done() {
                    return Ok(0);
                }
                entry.status = Some(PortingState::Done);
                return Ok(1);
            }
            let mut changed = 0;
            let mut matched = false;
            for info in &mut entry.types {
                if type_name.is_some_and(|name| name != info.name) {
                    continue;
                }
                matched = true;
                if info.porting_state == PortingState::Pending {
                    info.porting_state = PortingState::Done;
                    changed += 1;
                }
            }
            if let (Some(name), false) = (type_name, matched) {
                return Err(PlanError::UnknownType {
                    file: entry.java_source_path.clone(),
                    name: name.to_owned(),
                });
            }
            return Ok(changed);
        }

        if type_name.is_none() {
            let deleted_index = unique_match(
                self.deleted_files.iter().map(|d| d.file_path.as_str()),
                file,
            )?;
            if let Some(index) = deleted_index {
                let deleted = &mut self.deleted_files[index];
                if deleted.status == PortingState::Pending {
                    deleted.status = PortingState::Done;
                    return Ok(1);
                }
                return Ok(0);
            }
        }

        Err(PlanError::UnknownFile(file.to_owned()))
    }
}

/// Index of the single path equal to `query` or ending in `/query`.
fn unique_match<'a>(
    paths: impl Iterator<Item = &'a str>,
    query: &str,
) -> Result<Option<usize>, PlanError> {
    let suffix = format!("/{}", query.trim_start_matches('/'));
    let hits: Vec<usize> = paths
        .enumerate()
        .filter(|(_, path)| *path == query || path.ends_with(&suffix))
        .map(|(i, _)| i)
        .collect();
    match hits.as_slice() {
        [] => Ok(None),
        [index] => Ok(Some(*index)),
        _ => Err(PlanError::AmbiguousFile(query.to_owned())),
    }
}
