use super::{print_json, store};
use crate::cli::OutputFormat;
use crate::config::{canonical_path, PorterConfig};
use crate::error::AppError;
use crate::plan::builder::{now_iso8601, PlanBuilder};
use crate::plan::storage::{PlanStore, TreeId, INDEXER_DOCS_FILE};
use crate::plan::PlanMetadata;
use crate::runtimes::{TargetRuntime, REFERENCE_LANGUAGE};
use crate::sources::local_git::LocalGitSource;
use crate::sources::traits::ChangeSource;
use crate::symbols::indexer::{IndexRequest, IndexerError, LspCli, SymbolIndexer};
use crate::symbols::SymbolTable;
use colored::Colorize;
use std::path::{Path, PathBuf};
use tempfile::TempDir;

/// A detached checkout of the older revision, removed on drop.
struct Snapshot<'a> {
    source: &'a LocalGitSource,
    root: PathBuf,
    _dir: TempDir,
}

impl<'a> Snapshot<'a> {
    fn create(source: &'a LocalGitSource, rev: &str) -> Result<Self, AppError> {
        let dir = TempDir::new()?;
        let root = canonical_path(dir.path())?.join("spine-runtimes");
        source.add_worktree(&root, rev)?;
        Ok(Self {
            source,
            root,
            _dir: dir,
        })
    }
}

impl Drop for Snapshot<'_> {
    fn drop(&mut self) {
        if let Err(e) = self.source.remove_worktree(&self.root) {
            log::warn!("[Snapshot::drop] Failed to remove worktree: {e}");
        }
    }
}

pub fn run(
    config: &PorterConfig,
    from: &str,
    to: &str,
    root: &Path,
    runtime: TargetRuntime,
    format: OutputFormat,
) -> Result<(), AppError> {
    let root = canonical_path(root)?;
    let source = LocalGitSource::new(root.clone())?;
    source.resolve_commit(from)?;
    source.resolve_commit(to)?;

    let reference_path = root.join(&config.reference_dir);
    let target_path = root.join(runtime.source_dir());
    for (label, path) in [("Reference", &reference_path), ("Target", &target_path)] {
        if !path.is_dir() {
            return Err(AppError::environment(format!(
                "{label} tree not found: {}",
                path.display()
            )));
        }
    }

    let indexer = LspCli::new(&config.indexer);
    if indexer.find_executable().is_none() {
        return Err(AppError::environment(format!(
            "Indexer '{}' not found in PATH. Set PORTER_INDEXER to its location.",
            config.indexer
        )));
    }

    let store = store(config);
    std::fs::create_dir_all(store.dir())?;
    let show_progress = format == OutputFormat::Text;

    let snapshot = match Snapshot::create(&source, from) {
        Ok(snapshot) => Some(snapshot),
        Err(e) => {
            log::warn!("[plan] Could not check out {from}; old symbols will be missing: {e}");
            None
        }
    };

    if show_progress {
        println!(
            "Indexing {} and {}...",
            "spine-libgdx".cyan(),
            runtime.id().cyan()
        );
    }

    let old_indexed = index_trees(
        &indexer,
        &store,
        &reference_path,
        &target_path,
        runtime,
        snapshot.as_ref().map(|s| s.root.join(&config.reference_dir)),
    )?;
    let previous_snapshot_root = snapshot
        .as_ref()
        .filter(|_| old_indexed)
        .map(|s| s.root.to_string_lossy().to_string());
    drop(snapshot);

    write_indexer_docs(&indexer, &store);

    let changes = source.changed_files(from, to, &config.reference_dir)?;
    log::info!("[plan] {} changed file(s) between {from} and {to}", changes.len());

    let reference = load_optional(&store, TreeId::Reference)?;
    let target = load_optional(&store, TreeId::Target(runtime))?;
    if show_progress {
        print_symbol_count("spine-libgdx", reference.as_ref());
        print_symbol_count(runtime.id(), target.as_ref());
        if previous_snapshot_root.is_some() {
            print_symbol_count(
                &format!("spine-libgdx ({from})"),
                load_optional(&store, TreeId::PreviousReference)?.as_ref(),
            );
        }
    }

    let metadata = PlanMetadata {
        prev_branch: from.to_owned(),
        current_branch: to.to_owned(),
        generated: now_iso8601(),
        spine_runtimes_dir: root.to_string_lossy().to_string(),
        reference_path: reference_path.to_string_lossy().to_string(),
        target_runtime: runtime,
        target_runtime_path: target_path.to_string_lossy().to_string(),
        target_runtime_language: runtime.language().to_owned(),
        previous_snapshot_root,
    };

    let plan = PlanBuilder::new(&root, runtime)
        .reference(reference.as_ref())
        .target(target.as_ref())
        .build(&changes, metadata);
    store.save(&plan)?;

    if format == OutputFormat::Json {
        return print_json(&plan);
    }

    let progress = plan.progress();
    println!();
    println!(
        "{} Wrote {}",
        "✓".green(),
        store.plan_path().display().to_string().bold()
    );
    println!(
        "  {} file(s) to port, {} type(s), {} deleted file(s)",
        progress.files_total.to_string().cyan(),
        progress.types_total.to_string().cyan(),
        progress.deleted_total.to_string().cyan()
    );
    Ok(())
}

/// Index the trees concurrently. Returns whether the older revision was
/// indexed too; that table is optional.
fn index_trees(
    indexer: &LspCli,
    store: &PlanStore,
    reference_path: &Path,
    target_path: &Path,
    runtime: TargetRuntime,
    previous_reference: Option<PathBuf>,
) -> Result<bool, AppError> {
    let reference = IndexRequest::new(
        reference_path,
        REFERENCE_LANGUAGE,
        store.symbol_table_path(TreeId::Reference),
    );
    let target = IndexRequest::new(
        target_path,
        runtime.language(),
        store.symbol_table_path(TreeId::Target(runtime)),
    );
    let previous = previous_reference.map(|tree| {
        IndexRequest::new(
            tree,
            REFERENCE_LANGUAGE,
            store.symbol_table_path(TreeId::PreviousReference),
        )
    });

    let rt = tokio::runtime::Runtime::new()?;
    let (reference, target, previous) = rt.block_on(async {
        tokio::join!(
            indexer.index(&reference),
            indexer.index(&target),
            async {
                match &previous {
                    Some(request) => Some(indexer.index(request).await),
                    None => None,
                }
            }
        )
    });

    reference?;
    target?;
    Ok(match previous {
        Some(Ok(())) => true,
        Some(Err(e)) => {
            log::warn!("[plan] Indexing the older revision failed: {}", describe(&e));
            false
        }
        None => false,
    })
}

fn describe(err: &IndexerError) -> String {
    err.to_string().trim().to_owned()
}

/// Optional enrichment: a table that is missing or does not parse only
/// warns. Anything fatal still aborts the run.
fn load_optional(store: &PlanStore, tree: TreeId) -> Result<Option<SymbolTable>, AppError> {
    match store.load_symbol_table(tree).map_err(AppError::from) {
        Ok(table) => Ok(Some(table)),
        Err(e) if !e.is_fatal() => {
            log::warn!("[plan] {e}");
            Ok(None)
        }
        Err(e) => Err(e),
    }
}

fn print_symbol_count(label: &str, table: Option<&SymbolTable>) {
    match table {
        Some(table) => println!(
            "  {label}: {} symbols",
            table.symbol_count().to_string().cyan()
        ),
        None => println!("  {label}: {}", "no symbol table".yellow()),
    }
}

fn write_indexer_docs(indexer: &LspCli, store: &PlanStore) {
    match indexer.documentation() {
        Ok(Some(docs)) => match store.write_file(INDEXER_DOCS_FILE, &docs) {
            Ok(path) => log::info!("[plan] Wrote {}", path.display()),
            Err(e) => log::warn!("[plan] Could not write {INDEXER_DOCS_FILE}: {e}"),
        },
        Ok(None) => log::debug!("[plan] Indexer has no bundled documentation"),
        Err(e) => log::debug!("[plan] Indexer documentation unavailable: {}", describe(&e)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_unreadable_tables_are_skipped() {
        let dir = TempDir::new().unwrap();
        let store = PlanStore::new(dir.path());

        assert!(load_optional(&store, TreeId::Reference).unwrap().is_none());

        std::fs::write(store.symbol_table_path(TreeId::Reference), "{ not json").unwrap();
        assert!(load_optional(&store, TreeId::Reference).unwrap().is_none());

        std::fs::write(
            store.symbol_table_path(TreeId::Reference),
            r#"{"symbols": []}"#,
        )
        .unwrap();
        let table = load_optional(&store, TreeId::Reference).unwrap();
        assert_eq!(table.map(|t| t.symbol_count()), Some(0));
    }
}
