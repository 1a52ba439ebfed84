use super::{print_json, relative_to, require_plan};
use crate::cli::OutputFormat;
use crate::config::PorterConfig;
use crate::diff::{diff_ranges, extract, split_lines, DiffLine, LineType};
use crate::error::AppError;
use crate::plan::storage::TreeId;
use crate::sources::local_git::LocalGitSource;
use crate::sources::traits::ChangeSource;
use crate::symbols::locate::{locate, locate_optional, Filter};
use crate::symbols::Symbol;
use colored::Colorize;
use std::path::PathBuf;

pub fn run(config: &PorterConfig, name: &str, format: OutputFormat) -> Result<(), AppError> {
    let (store, plan) = require_plan(config)?;
    let metadata = &plan.metadata;

    let snapshot_root = metadata.previous_snapshot_root.as_deref().ok_or_else(|| {
        AppError::data_format(format!(
            "No symbol table for {}. Re-run 'porter plan' to capture it.",
            metadata.prev_branch
        ))
    })?;
    let new_table = store.load_symbol_table(TreeId::Reference)?;
    let old_table = store.load_symbol_table(TreeId::PreviousReference)?;

    let new_symbol = locate(&new_table, name, Filter::TypesOnly)?;
    let old_symbol = locate_optional(&old_table, name)?;

    let source = LocalGitSource::new(PathBuf::from(&metadata.spine_runtimes_dir))?;

    let new_path = tree_path(new_symbol, &metadata.spine_runtimes_dir)?;
    let new_content = source
        .file_at(&metadata.current_branch, &new_path)?
        .ok_or_else(|| {
            AppError::not_found(format!("{new_path} at {}", metadata.current_branch))
        })?;
    let new_range = extract(new_symbol, &split_lines(&new_content));

    let old_range = match old_symbol {
        Some(symbol) => {
            let old_path = tree_path(symbol, snapshot_root)?;
            let old_content = source.file_at(&metadata.prev_branch, &old_path)?;
            if old_content.is_none() {
                log::info!(
                    "[diff] {old_path} does not exist at {}",
                    metadata.prev_branch
                );
            }
            old_content.map(|content| extract(symbol, &split_lines(&content)))
        }
        None => None,
    };

    let is_new = !old_range.as_ref().is_some_and(|range| !range.is_empty());
    let lines = diff_ranges(old_range.as_ref(), &new_range);

    if format == OutputFormat::Json {
        let output = serde_json::json!({
            "name": name,
            "from": metadata.prev_branch,
            "to": metadata.current_branch,
            "file": new_symbol.file,
            "isNew": is_new,
            "lines": lines,
        });
        return print_json(&output);
    }

    println!(
        "{}",
        format!(
            "=== {name} ({}..{}) ===",
            metadata.prev_branch, metadata.current_branch
        )
        .bold()
    );
    if is_new {
        println!(
            "{}",
            format!("Type '{name}' is new in {}", metadata.current_branch).yellow()
        );
    }
    for line in &lines {
        print_line(line);
    }
    Ok(())
}

/// Repository-relative path of the file declaring `symbol`.
fn tree_path(symbol: &Symbol, root: &str) -> Result<String, AppError> {
    relative_to(&symbol.file, root).ok_or_else(|| {
        AppError::data_format(format!(
            "{} is outside the indexed tree {root}",
            symbol.file
        ))
    })
}

fn print_line(line: &DiffLine) {
    let text = line.render();
    match line.line_type {
        LineType::Added => println!("{}", text.green()),
        LineType::Removed => println!("{}", text.red()),
        LineType::Unchanged => println!("{text}"),
        LineType::Summary => {
            println!();
            println!("{}", text.dimmed());
        }
    }
}
