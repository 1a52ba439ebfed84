//! porter binary - plan, inspect and track spine runtime ports.

use clap::Parser;
use porter::cli::{run, Cli};

fn main() {
    let cli = match Cli::try_parse() {
        Ok(cli) => cli,
        Err(e) => {
            let code = i32::from(e.use_stderr());
            // Help and version go to stdout and exit 0.
            let _ = e.print();
            std::process::exit(code);
        }
    };

    let default_filter = if cli.verbose { "info" } else { "warn" };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(default_filter))
        .target(env_logger::Target::Stderr)
        .init();

    if let Err(e) = run(cli) {
        if e.is_passthrough() {
            let output = e.to_string();
            eprint!("{output}");
            if !output.ends_with('\n') {
                eprintln!();
            }
        } else {
            eprintln!("Error: {e}");
        }
        std::process::exit(1);
    }
}
