//! Single-file syntax check for the spine-cpp runtime.

use crate::config::{find_executable, resolve_absolute};
use crate::plan::PlanMetadata;
use crate::runtimes::TargetRuntime;
use regex::Regex;
use std::path::Path;
use std::process::Command;
use std::sync::LazyLock;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum CompileError {
    #[error("Compilation check is only available for spine-cpp (plan targets {0})")]
    UnsupportedRuntime(TargetRuntime),
    #[error("Compiler '{0}' not found in PATH")]
    CompilerNotFound(String),
    /// The compiler rejected the file; `diagnostic` is its first error block.
    #[error("{diagnostic}")]
    Failed { program: String, diagnostic: String },
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Matches the line that opens a diagnostic: `path:12:5: error: ...`.
static ERROR_LINE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?:^|:\s*)(?:fatal )?error:").unwrap());

/// Any top-level diagnostic, which ends the current block.
static DIAGNOSTIC_LINE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^\S.*?:\s*(?:fatal error|error|warning):").unwrap());

/// Lines that introduce a diagnostic: include chains and "In function" scopes.
static CONTEXT_LINE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^(?:In file included from |\s+from |\S.*?: (?:In |At global scope|In instantiation))")
        .unwrap()
});

static SUMMARY_LINE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^\d+ (?:errors?|warnings?)(?: and \d+ \w+)? generated\.").unwrap()
});

/// The compiler invocation for `file`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CheckCommand {
    pub program: String,
    pub args: Vec<String>,
}

impl CheckCommand {
    pub fn new(cxx: &str, spine_root: &Path, file: &Path) -> Self {
        let include = spine_root
            .join(TargetRuntime::SpineCpp.source_dir())
            .join("include");
        Self {
            program: cxx.to_owned(),
            args: vec![
                "-std=c++11".to_owned(),
                "-fsyntax-only".to_owned(),
                "-I".to_owned(),
                include.to_string_lossy().to_string(),
                file.to_string_lossy().to_string(),
            ],
        }
    }
}

/// Syntax-check one spine-cpp source file against the plan's tree.
pub fn check(cxx: &str, metadata: &PlanMetadata, file: &Path) -> Result<(), CompileError> {
    if metadata.target_runtime != TargetRuntime::SpineCpp {
        return Err(CompileError::UnsupportedRuntime(metadata.target_runtime));
    }

    let executable =
        find_executable(cxx).ok_or_else(|| CompileError::CompilerNotFound(cxx.to_owned()))?;
    let file = resolve_absolute(file)?;
    let command = CheckCommand::new(cxx, Path::new(&metadata.spine_runtimes_dir), &file);

    log::info!("[compile::check] {} {}", command.program, command.args.join(" "));

    let output = Command::new(executable).args(&command.args).output()?;
    if output.status.success() {
        return Ok(());
    }

    let mut combined = String::from_utf8_lossy(&output.stderr).to_string();
    combined.push_str(&String::from_utf8_lossy(&output.stdout));
    Err(CompileError::Failed {
        program: command.program,
        diagnostic: first_diagnostic_block(&combined),
    })
}

/// The first error of a compiler log with its context and notes.
///
/// The block is the first `error:` line, the include/scope lines directly
/// above it, then its notes and source/caret lines up to the next
/// top-level diagnostic. Output without a recognisable error line
/// is returned unchanged.
pub fn first_diagnostic_block(output: &str) -> String {
    let lines: Vec<&str> = output.lines().collect();
    let Some(error_index) = lines.iter().position(|line| ERROR_LINE.is_match(line)) else {
        return output.to_owned();
    };

    let mut start = error_index;
    while start > 0 && CONTEXT_LINE.is_match(lines[start - 1]) {
        start -= 1;
    }

    let mut end = error_index + 1;
    while let Some(line) = lines.get(end) {
        let next_diagnostic = DIAGNOSTIC_LINE.is_match(line)
            || (CONTEXT_LINE.is_match(line) && !line.starts_with(char::is_whitespace))
            || SUMMARY_LINE.is_match(line);
        if next_diagnostic {
            break;
        }
        end += 1;
    }

    while end > error_index + 1 && lines[end - 1].trim().is_empty() {
        end -= 1;
    }

    let mut block = lines[start..end].join("\n");
    block.push('\n');
    block
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::plan::tests::metadata;

    const GCC_OUTPUT: &str = "\
In file included from /spine/spine-cpp/spine-cpp/src/spine/Bone.cpp:30:
/spine/spine-cpp/spine-cpp/include/spine/Bone.h: In member function 'void spine::Bone::update()':
/spine/spine-cpp/spine-cpp/include/spine/Bone.h:42:9: error: 'foo' was not declared in this scope
   42 |         foo();
      |         ^~~
/spine/spine-cpp/spine-cpp/include/spine/Bone.h:12:7: note: suggested alternative: 'for'
/spine/spine-cpp/spine-cpp/src/spine/Bone.cpp: In function 'int main()':
/spine/spine-cpp/spine-cpp/src/spine/Bone.cpp:80:1: error: expected ';' before '}' token
";

    #[test]
    fn test_first_block_with_context_and_notes() {
        let block = first_diagnostic_block(GCC_OUTPUT);
        let lines: Vec<&str> = block.lines().collect();
        assert_eq!(lines.len(), 6);
        assert!(lines[0].starts_with("In file included from"));
        assert!(lines[1].contains("In member function"));
        assert!(lines[2].contains("error: 'foo'"));
        assert!(lines[5].contains("note: suggested alternative"));
        assert!(!block.contains("expected ';'"));
    }

    #[test]
    fn test_fatal_error_stops_at_summary() {
        let output = "\
Slot.cpp:3:10: fatal error: 'spine/Missing.h' file not found
#include <spine/Missing.h>
         ^~~~~~~~~~~~~~~~~
1 error generated.
";
        let block = first_diagnostic_block(output);
        assert!(block.starts_with("Slot.cpp:3:10: fatal error:"));
        assert!(!block.contains("generated"));
    }

    #[test]
    fn test_unrecognised_output_passes_through() {
        let output = "g++: something unexpected happened\n";
        assert_eq!(first_diagnostic_block(output), output);
    }

    #[test]
    fn test_check_command_arguments() {
        let command = CheckCommand::new(
            "clang++",
            Path::new("/spine"),
            Path::new("/spine/x/Bone.cpp"),
        );
        assert_eq!(command.program, "clang++");
        assert_eq!(
            command.args,
            vec![
                "-std=c++11",
                "-fsyntax-only",
                "-I",
                "/spine/spine-cpp/spine-cpp/include",
                "/spine/x/Bone.cpp",
            ]
        );
    }

    #[test]
    fn test_rejects_other_runtimes() {
        let mut metadata = metadata();
        metadata.target_runtime = TargetRuntime::SpineTs;
        let result = check("g++", &metadata, Path::new("Bone.cpp"));
        assert!(matches!(
            result,
            Err(CompileError::UnsupportedRuntime(TargetRuntime::SpineTs))
        ));
    }

    #[test]
    fn test_missing_compiler() {
        let result = check("porter-no-such-compiler", &metadata(), Path::new("Bone.cpp"));
        assert!(matches!(result, Err(CompileError::CompilerNotFound(_))));
    }
}
