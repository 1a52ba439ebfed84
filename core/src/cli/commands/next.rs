use super::{display_path, print_json, require_plan};
use crate::cli::OutputFormat;
use crate::config::PorterConfig;
use crate::error::AppError;
use crate::plan::PortingState;
use colored::Colorize;

pub fn run(config: &PorterConfig, format: OutputFormat) -> Result<(), AppError> {
    let (_, plan) = require_plan(config)?;
    let root = &plan.metadata.spine_runtimes_dir;

    let Some(entry) = plan.next_pending() else {
        if format == OutputFormat::Json {
            return print_json(&serde_json::json!({ "next": null }));
        }
        println!("{} Nothing left to port", "✓".green());
        return Ok(());
    };

    if format == OutputFormat::Json {
        return print_json(&serde_json::json!({ "next": entry }));
    }

    println!("{}", display_path(&entry.java_source_path, root).bold());
    if entry.types.is_empty() {
        println!("  {}", "(no types indexed for this file)".dimmed());
    }
    for info in &entry.types {
        let marker = match info.porting_state {
            PortingState::Done => "✓".green(),
            PortingState::Pending => "○".yellow(),
        };
        let inner = if info.is_inner { " (inner)" } else { "" };
        println!(
            "  {marker} {} {}{} {}",
            info.kind.as_str().dimmed(),
            info.name,
            inner.dimmed(),
            format!("lines {}-{}", info.start_line, info.end_line).dimmed()
        );
        if info.porting_state == PortingState::Pending {
            if info.candidate_files.is_empty() {
                println!("      {}", "no candidate files".dimmed());
            }
            for file in &info.candidate_files {
                println!("      → {}", display_path(file, root).cyan());
            }
        }
    }
    Ok(())
}
