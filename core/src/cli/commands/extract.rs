use super::{print_json, store};
use crate::cli::OutputFormat;
use crate::config::PorterConfig;
use crate::diff::{extract, split_lines, ExtractedLine, ExtractedRange};
use crate::error::AppError;
use crate::plan::storage::TreeId;
use crate::symbols::locate::{locate, Filter};
use colored::Colorize;

pub fn run(config: &PorterConfig, name: &str, format: OutputFormat) -> Result<(), AppError> {
    let table = store(config).load_symbol_table(TreeId::Reference)?;
    let symbol = locate(&table, name, Filter::TypesOnly)?;

    let content = std::fs::read_to_string(&symbol.file)
        .map_err(|e| AppError::io(format!("{}: {e}", symbol.file)))?;
    let range = extract(symbol, &split_lines(&content));

    if format == OutputFormat::Json {
        let output = serde_json::json!({
            "name": symbol.base_name(),
            "kind": symbol.kind,
            "file": symbol.file,
            "startLine": symbol.start_line(),
            "endLine": symbol.end_line(),
            "lines": range.lines,
        });
        return print_json(&output);
    }

    println!(
        "{}",
        format!(
            "{} {} ({}:{}-{})",
            symbol.kind.as_str(),
            symbol.base_name(),
            symbol.file,
            symbol.start_line(),
            symbol.end_line()
        )
        .dimmed()
    );
    for line in render(&range) {
        println!("{line}");
    }
    Ok(())
}

/// Numbered lines, then a blank line and the summary note if any.
pub(crate) fn render(range: &ExtractedRange) -> Vec<String> {
    let width = range.max_line_number().to_string().len();
    let mut output: Vec<String> = range
        .lines
        .iter()
        .filter_map(|line| match line {
            ExtractedLine::Source { number, content } => {
                Some(format!("{number:>width$}: {content}"))
            }
            ExtractedLine::Summary { .. } => None,
        })
        .collect();

    if let Some(summary) = range.summary() {
        output.push(String::new());
        output.push(summary.to_owned());
    }
    output
}
