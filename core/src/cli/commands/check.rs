use super::require_plan;
use crate::compile;
use crate::config::PorterConfig;
use crate::error::AppError;
use colored::Colorize;
use std::path::Path;

pub fn run(config: &PorterConfig, file: &Path) -> Result<(), AppError> {
    let (_, plan) = require_plan(config)?;
    if !file.exists() {
        return Err(AppError::not_found(file.display().to_string()));
    }

    compile::check(&config.cxx, &plan.metadata, file)?;
    println!("{} {} compiles", "✓".green(), file.display());
    Ok(())
}
