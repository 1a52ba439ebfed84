pub mod commands;

use crate::config::PorterConfig;
use crate::error::AppError;
use crate::runtimes::TargetRuntime;
use clap::{Parser, Subcommand};
use std::path::PathBuf;

#[derive(Debug, Parser)]
#[command(name = "porter")]
#[command(author, version, about = "Port spine-libgdx changes to the other spine runtimes", long_about = None)]
pub struct Cli {
    /// Directory holding porting-plan.json and the symbol tables
    /// (env: PORTER_WORKDIR, default: current directory)
    #[arg(short, long, global = true)]
    pub workdir: Option<PathBuf>,

    /// Output format
    #[arg(long, global = true, default_value = "text")]
    pub format: OutputFormat,

    /// Log progress to stderr
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, clap::ValueEnum)]
pub enum OutputFormat {
    #[default]
    Text,
    Json,
}

#[derive(Debug, Subcommand)]
pub enum Commands {
    /// Index both trees and write porting-plan.json for a revision range
    Plan {
        /// Older revision (branch, tag or commit)
        from: String,

        /// Newer revision, expected to be checked out in the working tree
        to: String,

        /// Root of the spine-runtimes checkout
        root: PathBuf,

        /// Runtime to port into
        runtime: TargetRuntime,
    },

    /// Print one reference type without its nested types
    Extract {
        /// Type name (e.g. AnimationState)
        name: String,
    },

    /// Show how one reference type changed between the plan's revisions
    Diff {
        /// Type name (e.g. AnimationState)
        name: String,
    },

    /// Syntax-check a spine-cpp source file
    Check {
        /// Source file to check
        file: PathBuf,
    },

    /// Show porting progress
    Status,

    /// Show the next file with pending types
    Next,

    /// Mark a file, one of its types, or a deleted file as done
    Done {
        /// Reference file path or unique suffix (e.g. Animation.java)
        file: String,

        /// Only mark this type
        #[arg(short = 't', long = "type")]
        type_name: Option<String>,
    },
}

/// Run the CLI with parsed arguments
pub fn run(cli: Cli) -> Result<(), AppError> {
    let config = PorterConfig::resolve(cli.workdir.as_deref())?;
    log::debug!("[cli::run] workdir {}", config.workdir.display());

    match cli.command {
        Commands::Plan {
            from,
            to,
            root,
            runtime,
        } => commands::plan::run(&config, &from, &to, &root, runtime, cli.format),
        Commands::Extract { name } => commands::extract::run(&config, &name, cli.format),
        Commands::Diff { name } => commands::diff::run(&config, &name, cli.format),
        Commands::Check { file } => commands::check::run(&config, &file),
        Commands::Status => commands::status::run(&config, cli.format),
        Commands::Next => commands::next::run(&config, cli.format),
        Commands::Done { file, type_name } => {
            commands::done::run(&config, &file, type_name.as_deref(), cli.format)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_plan() {
        let cli = Cli::try_parse_from(["porter", "plan", "4.2", "4.3-beta", "/spine", "spine-cpp"])
            .unwrap();
        match cli.command {
            Commands::Plan { from, runtime, .. } => {
                assert_eq!(from, "4.2");
                assert_eq!(runtime, TargetRuntime::SpineCpp);
            }
            other => panic!("unexpected command {other:?}"),
        }
    }

    #[test]
    fn test_unknown_runtime_is_rejected() {
        let result = Cli::try_parse_from(["porter", "plan", "a", "b", "/spine", "spine-java"]);
        assert!(result.is_err());
    }

    #[test]
    fn test_plan_requires_all_positionals() {
        assert!(Cli::try_parse_from(["porter", "plan", "a", "b"]).is_err());
    }

    #[test]
    fn test_global_flags_after_subcommand() {
        let cli =
            Cli::try_parse_from(["porter", "diff", "Bone", "--format", "json", "-w", "/tmp/x"])
                .unwrap();
        assert_eq!(cli.format, OutputFormat::Json);
        assert_eq!(cli.workdir, Some(PathBuf::from("/tmp/x")));
    }

    #[test]
    fn test_done_with_type() {
        let cli = Cli::try_parse_from(["porter", "done", "Animation.java", "--type", "MixBlend"])
            .unwrap();
        assert!(matches!(
            cli.command,
            Commands::Done { type_name: Some(ref t), .. } if t == "MixBlend"
        ));
    }
}
