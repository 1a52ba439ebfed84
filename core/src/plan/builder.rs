//! Turns a revision-range change list into an ordered porting plan.

use super::{DeletedFileEntry, PlanMetadata, PortingEntry, PortingPlan, PortingState, TypeInfo};
use crate::runtimes::{TargetRuntime, REFERENCE_EXTENSION};
use crate::sources::traits::{ChangeStatus, FileChange};
use crate::symbols::locate::{find_all, Filter};
use crate::symbols::{Symbol, SymbolTable};
use std::collections::BTreeSet;
use std::path::Path;

/// Builds a [`PortingPlan`] from a change list and the symbol tables of
/// the reference and target trees.
///
/// Either table may be missing. Without the reference table entries carry
/// no types; without the target table types carry no candidate files.
pub struct PlanBuilder<'a> {
    root: &'a Path,
    runtime: TargetRuntime,
    reference: Option<&'a SymbolTable>,
    target: Option<&'a SymbolTable>,
}

impl<'a> PlanBuilder<'a> {
    /// `root` is the repository root the change-list paths are relative to.
    pub fn new(root: &'a Path, runtime: TargetRuntime) -> Self {
        Self {
            root,
            runtime,
            reference: None,
            target: None,
        }
    }

    #[must_use]
    pub fn reference(mut self, table: Option<&'a SymbolTable>) -> Self {
        self.reference = table;
        self
    }

    #[must_use]
    pub fn target(mut self, table: Option<&'a SymbolTable>) -> Self {
        self.target = table;
        self
    }

    pub fn build(&self, changes: &[FileChange], metadata: PlanMetadata) -> PortingPlan {
        let mut deleted_files: Vec<DeletedFileEntry> = changes
            .iter()
            .filter(|c| c.status == ChangeStatus::Deleted)
            .map(|c| DeletedFileEntry {
                file_path: self.absolute(&c.path),
                status: PortingState::Pending,
            })
            .collect();
        deleted_files.sort_by(|a, b| a.file_path.cmp(&b.file_path));
        deleted_files.dedup_by(|a, b| a.file_path == b.file_path);

        let mut porting_order: Vec<PortingEntry> = changes
            .iter()
            .filter(|c| c.status != ChangeStatus::Deleted && is_reference_source(&c.path))
            .map(|c| self.entry_for(&self.absolute(&c.path)))
            .collect();
        porting_order.sort_by(|a, b| order_key(a).cmp(&order_key(b)));
        porting_order.dedup_by(|a, b| a.java_source_path == b.java_source_path);

        log::info!(
            "[PlanBuilder::build] {} file(s) to port, {} deleted",
            porting_order.len(),
            deleted_files.len()
        );

        PortingPlan {
            metadata,
            deleted_files,
            porting_order,
        }
    }

    fn absolute(&self, relative: &str) -> String {
        self.root.join(relative).to_string_lossy().to_string()
    }

    fn entry_for(&self, java_source_path: &str) -> PortingEntry {
        let mut types: Vec<TypeInfo> = self
            .reference
            .map(|table| {
                table
                    .declared_types(Path::new(java_source_path))
                    .into_iter()
                    .map(|declared| TypeInfo {
                        name: declared.symbol.base_name().to_owned(),
                        kind: declared.symbol.kind,
                        start_line: declared.symbol.start_line(),
                        end_line: declared.symbol.end_line(),
                        is_inner: declared.is_inner,
                        porting_state: PortingState::Pending,
                        candidate_files: BTreeSet::new(),
                    })
                    .collect()
            })
            .unwrap_or_default();

        types.sort_by(|a, b| {
            (a.kind.port_priority(), &a.name).cmp(&(b.kind.port_priority(), &b.name))
        });

        if let Some(target) = self.target {
            for info in &mut types {
                info.candidate_files = candidate_files(target, self.runtime, &info.name);
            }
        }

        PortingEntry::new(java_source_path, types)
    }
}

fn is_reference_source(path: &str) -> bool {
    Path::new(path)
        .extension()
        .is_some_and(|ext| ext == REFERENCE_EXTENSION)
}

/// Fewer types first; single-type files by kind (enum, interface, class);
/// then by path.
fn order_key(entry: &PortingEntry) -> (usize, u8, &str) {
    let priority = match entry.types.as_slice() {
        [only] => only.kind.port_priority(),
        _ => 0,
    };
    (entry.types.len(), priority, entry.java_source_path.as_str())
}

/// Target files that plausibly implement the reference type `name`.
///
/// Every returned path is a declaration or recorded definition file of
/// the type, or of a symbol belonging to it, in `target`. A companion file
/// (`Bone.cpp` next to `Bone.h`) is offered when it holds such a symbol.
pub fn candidate_files(
    target: &SymbolTable,
    runtime: TargetRuntime,
    name: &str,
) -> BTreeSet<String> {
    let matches = find_all(target, name, Filter::TypesOnly);
    let mut files = BTreeSet::new();

    for symbol in &matches {
        files.insert(symbol.file.clone());
        let definitions = std::iter::once(*symbol)
            .chain(symbol.children.iter())
            .filter_map(|s| s.definition.as_ref());
        for definition in definitions {
            files.insert(definition.file.clone());
        }
    }

    if files.is_empty() || runtime.companion_extensions().is_empty() {
        return files;
    }

    let members: BTreeSet<&str> = matches
        .iter()
        .flat_map(|s| s.children.iter())
        .map(Symbol::base_name)
        .collect();
    let qualified = format!("{name}::");
    let belongs_to_type = |symbol: &Symbol| {
        symbol.base_name() == name
            || symbol.name.starts_with(&qualified)
            || members.contains(symbol.base_name())
    };

    let mut companions = BTreeSet::new();
    for symbol in target.walk().filter(|s| belongs_to_type(*s)) {
        let locations = std::iter::once(symbol.file.as_str())
            .chain(symbol.definition.as_ref().map(|d| d.file.as_str()));
        for location in locations {
            let paired = files
                .iter()
                .any(|found| runtime.are_companions(Path::new(found), Path::new(location)));
            if paired {
                companions.insert(location.to_owned());
            }
        }
    }
    files.extend(companions);

    files
}

fn is_leap_year(year: i32) -> bool {
    (year % 4 == 0 && year % 100 != 0) || (year % 400 == 0)
}

/// Current UTC time as `YYYY-MM-DDTHH:MM:SS.mmmZ`.
pub fn now_iso8601() -> String {
    use std::time::{SystemTime, UNIX_EPOCH};
    let duration = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .unwrap_or_default();
    format_iso8601(duration.as_secs(), duration.subsec_millis())
}

fn format_iso8601(secs: u64, millis: u32) -> String {
    let days = secs / 86400;
    let remaining = secs % 86400;
    let hours = remaining / 3600;
    let minutes = (remaining % 3600) / 60;
    let seconds = remaining % 60;

    let mut year = 1970i32;
    let mut remaining_days = days as i32;
    loop {
        let days_in_year = if is_leap_year(year) { 366 } else { 365 };
        if remaining_days < days_in_year {
            break;
        }
        remaining_days -= days_in_year;
        year += 1;
    }

    let days_in_months: [i32; 12] = if is_leap_year(year) {
        [31, 29, 31, 30, 31, 30, 31, 31, 30, 31, 30, 31]
    } else {
        [31, 28, 31, 30, 31, 30, 31, 31, 30, 31, 30, 31]
    };

    let mut month = 1;
    for days_in_month in &days_in_months {
        if remaining_days < *days_in_month {
            break;
        }
        remaining_days -= *days_in_month;
        month += 1;
    }
    let day = remaining_days + 1;

    format!("{year:04}-{month:02}-{day:02}T{hours:02}:{minutes:02}:{seconds:02}.{millis:03}Z")
}
