//! Porter library - bookkeeping for porting spine-libgdx changes to other runtimes.
//!
//! This crate provides:
//! - Symbol table loading and type lookup (`symbols`)
//! - Type-scoped source extraction and line alignment (`diff`)
//! - Porting plan generation and persistence (`plan`)
//! - Git change-list and file-content access (`sources`)
//! - Single-file compilation checks for spine-cpp (`compile`)
//!
//! Feature flags:
//! - `cli`: Command-line interface

// Core modules (always compiled)
pub mod compile;
pub mod config;
pub mod diff;
pub mod error;
pub mod plan;
pub mod runtimes;
pub mod sources;
pub mod symbols;

// CLI module (feature-gated)
#[cfg(feature = "cli")]
pub mod cli;

// Re-export commonly used types
pub use plan::PortingPlan;
pub use runtimes::TargetRuntime;
pub use symbols::{Symbol, SymbolKind, SymbolTable};
