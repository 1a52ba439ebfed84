//! Symbol tables produced by the external indexer.
//!
//! The indexer (`lsp-cli` by default) walks a source tree and writes a JSON
//! forest of named declarations with 1-based line ranges. These tables are
//! treated as ground truth: nothing here re-checks that ranges nest or that
//! the referenced files exist.

pub mod indexer;
pub mod locate;

use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::fs;
use std::io;
use std::path::Path;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum SymbolTableError {
    #[error("IO error reading {path}: {source}")]
    Io { path: String, source: io::Error },
    #[error("Invalid symbol table {path}: {source}")]
    Json {
        path: String,
        source: serde_json::Error,
    },
}

/// The kind of a declaration as reported by the indexer.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "camelCase")]
pub enum SymbolKind {
    Class,
    Interface,
    Enum,
    Struct,
    Method,
    Constructor,
    Function,
    Field,
    Property,
    Variable,
    Constant,
    EnumMember,
    Namespace,
    Package,
    Module,
    #[serde(other)]
    Other,
}

impl SymbolKind {
    /// Whether this kind denotes a type (as opposed to a member).
    pub fn is_type(self) -> bool {
        matches!(self, Self::Class | Self::Interface | Self::Enum)
    }

    /// Porting priority: enums first, then interfaces, then classes.
    pub fn port_priority(self) -> u8 {
        match self {
            Self::Enum => 0,
            Self::Interface => 1,
            Self::Class => 2,
            _ => 3,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Class => "class",
            Self::Interface => "interface",
            Self::Enum => "enum",
            Self::Struct => "struct",
            Self::Method => "method",
            Self::Constructor => "constructor",
            Self::Function => "function",
            Self::Field => "field",
            Self::Property => "property",
            Self::Variable => "variable",
            Self::Constant => "constant",
            Self::EnumMember => "enumMember",
            Self::Namespace => "namespace",
            Self::Package => "package",
            Self::Module => "module",
            Self::Other => "other",
        }
    }
}

/// A 1-based line/column position.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub struct Position {
    pub line: u32,
    #[serde(default)]
    pub character: u32,
}

/// An inclusive line range within a file (1-based).
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub struct Range {
    pub start: Position,
    pub end: Position,
}

/// A separate definition location, for languages that split declaration
/// and definition (C and C++ headers vs. sources).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Location {
    pub file: String,
    pub range: Range,
}

/// A node in the indexer's symbol forest.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Symbol {
    pub name: String,
    pub kind: SymbolKind,
    pub file: String,
    pub range: Range,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub definition: Option<Location>,
    #[serde(default)]
    pub children: Vec<Symbol>,
}

impl Symbol {
    /// Name with any generic-parameter suffix removed (`Pool<T>` -> `Pool`).
    pub fn base_name(&self) -> &str {
        strip_generics(&self.name)
    }

    pub fn start_line(&self) -> u32 {
        self.range.start.line
    }

    pub fn end_line(&self) -> u32 {
        self.range.end.line
    }

    /// Direct children that are themselves types.
    pub fn nested_types(&self) -> impl Iterator<Item = &Symbol> {
        self.children.iter().filter(|c| c.kind.is_type())
    }
}

/// Strip a trailing generic-parameter list from a symbol name.
pub fn strip_generics(name: &str) -> &str {
    match name.find('<') {
        Some(idx) => name[..idx].trim_end(),
        None => name,
    }
}

/// A whole symbol table file.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SymbolTable {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub language: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub directory: Option<String>,
    pub symbols: Vec<Symbol>,
}

/// A type declared in a file, as seen by the plan builder.
#[derive(Debug, Clone, Copy)]
pub struct DeclaredType<'a> {
    pub symbol: &'a Symbol,
    pub is_inner: bool,
}

impl SymbolTable {
    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }

    /// Load a symbol table file written by the indexer.
    pub fn load(path: &Path) -> Result<Self, SymbolTableError> {
        let content = fs::read_to_string(path).map_err(|source| SymbolTableError::Io {
            path: path.display().to_string(),
            source,
        })?;
        Self::from_json(&content).map_err(|source| SymbolTableError::Json {
            path: path.display().to_string(),
            source,
        })
    }

    /// Pre-order walk over every symbol in the forest.
    pub fn walk(&self) -> Walk<'_> {
        Walk {
            stack: self.symbols.iter().rev().collect(),
        }
    }

    pub fn symbol_count(&self) -> usize {
        self.walk().count()
    }

    /// Every file the table mentions, either as a declaration or as a
    /// recorded definition location.
    pub fn files(&self) -> BTreeSet<&str> {
        let mut files = BTreeSet::new();
        for symbol in self.walk() {
            files.insert(symbol.file.as_str());
            if let Some(def) = &symbol.definition {
                files.insert(def.file.as_str());
            }
        }
        files
    }

    /// Types declared in `file`: every outermost type plus its direct
    /// nested types (marked inner). Deeper nesting is not flattened.
    pub fn declared_types(&self, file: &Path) -> Vec<DeclaredType<'_>> {
        let mut found = Vec::new();
        let mut stack: Vec<&Symbol> = self.symbols.iter().rev().collect();

        while let Some(symbol) = stack.pop() {
            if symbol.kind.is_type() {
                if Path::new(&symbol.file) == file {
                    found.push(DeclaredType {
                        symbol,
                        is_inner: false,
                    });
                    found.extend(symbol.nested_types().map(|inner| DeclaredType {
                        symbol: inner,
                        is_inner: true,
                    }));
                }
                // Nested types are reached through their outermost type only.
                continue;
            }
            stack.extend(symbol.children.iter().rev());
        }

        found
    }
}

/// Explicit-stack pre-order iterator over a symbol forest.
pub struct Walk<'a> {
    stack: Vec<&'a Symbol>,
}

impl<'a> Iterator for Walk<'a> {
    type Item = &'a Symbol;

    fn next(&mut self) -> Option<Self::Item> {
        let symbol = self.stack.pop()?;
        self.stack.extend(symbol.children.iter().rev());
        Some(symbol)
    }
}
