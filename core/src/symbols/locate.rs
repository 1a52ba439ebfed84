use super::{Symbol, SymbolKind, SymbolTable};
use thiserror::Error;

/// One match reported back when a name is ambiguous.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Candidate {
    pub file: String,
    pub kind: SymbolKind,
    pub line: u32,
}

#[derive(Error, Debug, PartialEq, Eq)]
pub enum LocateError {
    #[error("Type '{0}' not found in symbol table")]
    NotFound(String),
    #[error("Type '{name}' is ambiguous: {}", describe(.matches))]
    Ambiguous {
        name: String,
        matches: Vec<Candidate>,
    },
}

fn describe(matches: &[Candidate]) -> String {
    let listed = matches
        .iter()
        .map(|m| format!("{}:{} ({})", m.file, m.line, m.kind.as_str()))
        .collect::<Vec<_>>()
        .join(", ");
    format!("{} matches: {listed}", matches.len())
}

/// Which symbols a lookup may return.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Filter {
    /// Any symbol except packages.
    AnySymbol,
    /// Only classes, interfaces and enums.
    TypesOnly,
}

impl Filter {
    fn accepts(self, kind: SymbolKind) -> bool {
        match self {
            Self::AnySymbol => kind != SymbolKind::Package,
            Self::TypesOnly => kind.is_type(),
        }
    }
}

/// Every symbol in the forest named exactly `name` (generic suffix ignored).
pub fn find_all<'a>(table: &'a SymbolTable, name: &str, filter: Filter) -> Vec<&'a Symbol> {
    table
        .walk()
        .filter(|s| filter.accepts(s.kind) && s.base_name() == name)
        .collect()
}

/// Locate exactly one symbol named `name`.
///
/// More than one match is an error listing all of them.
pub fn locate<'a>(
    table: &'a SymbolTable,
    name: &str,
    filter: Filter,
) -> Result<&'a Symbol, LocateError> {
    let mut matches = find_all(table, name, filter);
    match matches.len() {
        0 => Err(LocateError::NotFound(name.to_owned())),
        1 => Ok(matches.remove(0)),
        _ => Err(LocateError::Ambiguous {
            name: name.to_owned(),
            matches: matches
                .iter()
                .map(|s| Candidate {
                    file: s.file.clone(),
                    kind: s.kind,
                    line: s.start_line(),
                })
                .collect(),
        }),
    }
}

/// Like [`locate`] restricted to types, but a missing type is not an error.
pub fn locate_optional<'a>(
    table: &'a SymbolTable,
    name: &str,
) -> Result<Option<&'a Symbol>, LocateError> {
    match locate(table, name, Filter::TypesOnly) {
        Ok(symbol) => Ok(Some(symbol)),
        Err(LocateError::NotFound(_)) => Ok(None),
        Err(e) => Err(e),
    }
}
