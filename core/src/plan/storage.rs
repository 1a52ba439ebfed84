//! Working-directory persistence for plans and symbol tables.
//!
//! Layout:
//! ```text
//! <workdir>/
//!   porting-plan.json                 # PortingPlan
//!   spine-libgdx-symbols.json         # reference tree, newer revision
//!   spine-libgdx-symbols-old.json     # reference tree, older revision (optional)
//!   <runtime>-symbols.json            # target tree
//!   lsp-cli.md                        # indexer documentation (optional)
//! ```
//!
//! Files are read whole and replaced whole. Concurrent writers are not
//! coordinated here.

use super::PortingPlan;
use crate::runtimes::{TargetRuntime, REFERENCE_NAME};
use crate::symbols::{SymbolTable, SymbolTableError};
use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use thiserror::Error;

pub const PLAN_FILE: &str = "porting-plan.json";

pub const INDEXER_DOCS_FILE: &str = "lsp-cli.md";

#[derive(Error, Debug)]
pub enum StorageError {
    #[error("IO error: {0}")]
    Io(#[from] io::Error),
    #[error("JSON error in {path}: {source}")]
    Json {
        path: String,
        source: serde_json::Error,
    },
    #[error("{0} not found. Run 'porter plan' first.")]
    Missing(String),
}

/// Which tree a symbol table describes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TreeId {
    /// Reference tree at the newer revision (the working tree).
    Reference,
    /// Reference tree at the older revision.
    PreviousReference,
    Target(TargetRuntime),
}

impl TreeId {
    pub fn file_name(self) -> String {
        match self {
            Self::Reference => format!("{REFERENCE_NAME}-symbols.json"),
            Self::PreviousReference => format!("{REFERENCE_NAME}-symbols-old.json"),
            Self::Target(runtime) => runtime.symbols_file(),
        }
    }
}

#[derive(Debug, Clone)]
pub struct PlanStore {
    dir: PathBuf,
}

impl PlanStore {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    pub fn plan_path(&self) -> PathBuf {
        self.dir.join(PLAN_FILE)
    }

    pub fn symbol_table_path(&self, tree: TreeId) -> PathBuf {
        self.dir.join(tree.file_name())
    }

    pub fn load(&self) -> Result<PortingPlan, StorageError> {
        let path = self.plan_path();
        if !path.exists() {
            return Err(StorageError::Missing(path.display().to_string()));
        }
        let content = fs::read_to_string(&path)?;
        serde_json::from_str(&content).map_err(|source| StorageError::Json {
            path: path.display().to_string(),
            source,
        })
    }

    /// Replace the plan file (atomic: write tmp + rename).
    pub fn save(&self, plan: &PortingPlan) -> Result<(), StorageError> {
        fs::create_dir_all(&self.dir)?;
        let path = self.plan_path();
        let tmp_path = self.dir.join(format!("{PLAN_FILE}.tmp"));
        let mut content =
            serde_json::to_string_pretty(plan).map_err(|source| StorageError::Json {
                path: path.display().to_string(),
                source,
            })?;
        content.push('\n');
        fs::write(&tmp_path, &content)?;
        fs::rename(&tmp_path, &path)?;
        Ok(())
    }

    pub fn load_symbol_table(&self, tree: TreeId) -> Result<SymbolTable, SymbolTableError> {
        SymbolTable::load(&self.symbol_table_path(tree))
    }

    /// Write an auxiliary file (e.g. the indexer documentation).
    pub fn write_file(&self, name: &str, content: &str) -> Result<PathBuf, StorageError> {
        fs::create_dir_all(&self.dir)?;
        let path = self.dir.join(name);
        fs::write(&path, content)?;
        Ok(path)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::plan::tests::metadata;
    use crate::plan::{PortingEntry, PortingState, TypeInfo};
    use crate::symbols::SymbolKind;
    use std::collections::BTreeSet;
    use tempfile::TempDir;

    fn sample_plan() -> PortingPlan {
        PortingPlan {
            metadata: metadata(),
            deleted_files: Vec::new(),
            porting_order: vec![PortingEntry::new(
                "/spine/ref/Slot.java",
                vec![TypeInfo {
                    name: "Slot".to_owned(),
                    kind: SymbolKind::Class,
                    start_line: 40,
                    end_line: 180,
                    is_inner: false,
                    porting_state: PortingState::Pending,
                    candidate_files: BTreeSet::from(["/spine/cpp/Slot.h".to_owned()]),
                }],
            )],
        }
    }

    #[test]
    fn test_file_names() {
        assert_eq!(TreeId::Reference.file_name(), "spine-libgdx-symbols.json");
        assert_eq!(
            TreeId::PreviousReference.file_name(),
            "spine-libgdx-symbols-old.json"
        );
        assert_eq!(
            TreeId::Target(TargetRuntime::SpineCpp).file_name(),
            "spine-cpp-symbols.json"
        );
    }

    #[test]
    fn test_load_missing_plan() {
        let dir = TempDir::new().unwrap();
        let store = PlanStore::new(dir.path());
        assert!(matches!(store.load(), Err(StorageError::Missing(_))));
    }

    #[test]
    fn test_save_and_load_roundtrip() {
        let dir = TempDir::new().unwrap();
        let store = PlanStore::new(dir.path());
        let plan = sample_plan();

        store.save(&plan).unwrap();
        let loaded = store.load().unwrap();

        assert_eq!(loaded, plan);
        assert!(!dir.path().join("porting-plan.json.tmp").exists());
    }

    #[test]
    fn test_saved_plan_uses_two_space_indent() {
        let dir = TempDir::new().unwrap();
        let store = PlanStore::new(dir.path());
        store.save(&sample_plan()).unwrap();

        let content = fs::read_to_string(store.plan_path()).unwrap();
        assert!(content.starts_with("{\n  \"metadata\": {\n    \"prevBranch\""));
    }

    #[test]
    fn test_corrupt_plan_is_json_error() {
        let dir = TempDir::new().unwrap();
        fs::write(dir.path().join(PLAN_FILE), "{ not json").unwrap();
        let store = PlanStore::new(dir.path());
        assert!(matches!(store.load(), Err(StorageError::Json { .. })));
    }

    #[test]
    fn test_load_symbol_table() {
        let dir = TempDir::new().unwrap();
        let store = PlanStore::new(dir.path());
        fs::write(
            store.symbol_table_path(TreeId::Reference),
            r#"{"symbols": []}"#,
        )
        .unwrap();

        assert!(store.load_symbol_table(TreeId::Reference).is_ok());
        assert!(store.load_symbol_table(TreeId::PreviousReference).is_err());
    }
}
