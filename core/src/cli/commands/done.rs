use super::{print_json, require_plan};
use crate::cli::OutputFormat;
use crate::config::PorterConfig;
use crate::error::AppError;
use colored::Colorize;

pub fn run(
    config: &PorterConfig,
    file: &str,
    type_name: Option<&str>,
    format: OutputFormat,
) -> Result<(), AppError> {
    let (store, mut plan) = require_plan(config)?;
    let changed = plan.mark_done(file, type_name)?;
    if changed > 0 {
        store.save(&plan)?;
    }

    if format == OutputFormat::Json {
        let output = serde_json::json!({
            "changed": changed,
            "progress": plan.progress(),
        });
        return print_json(&output);
    }

    let target = match type_name {
        Some(name) => format!("{name} in {file}"),
        None => file.to_owned(),
    };
    if changed == 0 {
        println!("{target} was already done");
    } else {
        println!(
            "{} Marked {} item(s) done: {}",
            "✓".green(),
            changed.to_string().cyan(),
            target
        );
    }
    Ok(())
}
