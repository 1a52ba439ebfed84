pub mod check;
pub mod diff;
pub mod done;
pub mod extract;
pub mod next;
pub mod plan;
pub mod status;

use crate::config::PorterConfig;
use crate::error::AppError;
use crate::plan::storage::PlanStore;
use crate::plan::PortingPlan;
use std::path::Path;

fn store(config: &PorterConfig) -> PlanStore {
    PlanStore::new(&config.workdir)
}

/// Load the plan or explain how to create one.
fn require_plan(config: &PorterConfig) -> Result<(PlanStore, PortingPlan), AppError> {
    let store = store(config);
    let plan = store.load()?;
    Ok((store, plan))
}

/// Serialize a value as pretty-printed JSON and print it to stdout.
fn print_json(value: &impl serde::Serialize) -> Result<(), AppError> {
    let json = serde_json::to_string_pretty(value)
        .map_err(|e| AppError::data_format(format!("JSON output: {e}")))?;
    println!("{json}");
    Ok(())
}

/// `path` relative to `root`, with `/` separators as git expects.
fn relative_to(path: &str, root: &str) -> Option<String> {
    let relative = Path::new(path).strip_prefix(root).ok()?;
    let parts: Vec<String> = relative
        .components()
        .map(|c| c.as_os_str().to_string_lossy().to_string())
        .collect();
    (!parts.is_empty()).then(|| parts.join("/"))
}

/// Path shown to users: relative to the tree root when possible.
fn display_path(path: &str, root: &str) -> String {
    relative_to(path, root).unwrap_or_else(|| path.to_owned())
}
