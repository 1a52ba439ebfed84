use super::{display_path, print_json, require_plan};
use crate::cli::OutputFormat;
use crate::config::PorterConfig;
use crate::error::AppError;
use crate::plan::PortingState;
use colored::Colorize;

pub fn run(config: &PorterConfig, format: OutputFormat) -> Result<(), AppError> {
    let (_, plan) = require_plan(config)?;
    let progress = plan.progress();

    if format == OutputFormat::Json {
        let output = serde_json::json!({
            "metadata": plan.metadata,
            "progress": progress,
        });
        return print_json(&output);
    }

    let metadata = &plan.metadata;
    println!(
        "{} {}..{} → {}",
        "Porting".bold(),
        metadata.prev_branch.cyan(),
        metadata.current_branch.cyan(),
        metadata.target_runtime.id().cyan()
    );
    println!("  Generated: {}", metadata.generated.dimmed());
    println!();
    println!(
        "  Types:   {}/{} done",
        progress.types_done.to_string().green(),
        progress.types_total
    );
    println!(
        "  Files:   {}/{} done",
        progress.files_done.to_string().green(),
        progress.files_total
    );
    println!(
        "  Deleted: {}/{} handled",
        progress.deleted_done.to_string().green(),
        progress.deleted_total
    );

    let pending_deleted: Vec<&str> = plan
        .deleted_files
        .iter()
        .filter(|d| d.status == PortingState::Pending)
        .map(|d| d.file_path.as_str())
        .collect();
    if !pending_deleted.is_empty() {
        println!();
        println!("{}", "Deleted in the reference, still pending:".bold());
        for path in pending_deleted {
            println!(
                "  {} {}",
                "-".red(),
                display_path(path, &metadata.spine_runtimes_dir)
            );
        }
    }
    Ok(())
}
