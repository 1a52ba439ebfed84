//! Extraction and diff properties over realistic Java sources.

use porter::diff::{diff_ranges, extract, split_lines, ExtractedLine, LineType};
use porter::sources::local_git::LocalGitSource;
use porter::sources::traits::ChangeSource;
use porter::symbols::locate::{locate, Filter};
use porter::SymbolTable;
use std::fs;
use std::path::Path;
use std::process::Command;
use tempfile::TempDir;

const SLOT_V1: &str = "\
package com.esotericsoftware.spine;

import com.badlogic.gdx.graphics.Color;

/** Stores a slot's current pose. */
public class Slot {
\tfinal SlotData data;
\tfinal Bone bone;

\t/** Per-slot color. */
\tstatic public class Pose {
\t\tfinal Color color = new Color();
\t}

\tpublic Slot (SlotData data, Bone bone) {
\t\tthis.data = data;
\t\tthis.bone = bone;
\t}
}
";

const SLOT_V2: &str = "\
package com.esotericsoftware.spine;

import com.badlogic.gdx.graphics.Color;

/** Stores a slot's current pose. */
public class Slot {
\tfinal SlotData data;
\tfinal Bone bone;
\tint sequenceIndex;

\t/** Per-slot color. */
\tstatic public class Pose {
\t\tfinal Color color = new Color();
\t\tfinal Color darkColor = new Color();
\t}

\tpublic Slot (SlotData data, Bone bone) {
\t\tthis.data = data;
\t\tthis.bone = bone;
\t\tsequenceIndex = -1;
\t}
}
";

fn table(file: &str, slot_end: u32, pose_start: u32, pose_end: u32) -> SymbolTable {
    SymbolTable::from_json(&format!(
        r#"{{
  "symbols": [
    {{
      "name": "Slot",
      "kind": "class",
      "file": "{file}",
      "range": {{ "start": {{ "line": 6 }}, "end": {{ "line": {slot_end} }} }},
      "children": [
        {{
          "name": "Pose",
          "kind": "class",
          "file": "{file}",
          "range": {{ "start": {{ "line": {pose_start} }}, "end": {{ "line": {pose_end} }} }}
        }}
      ]
    }}
  ]
}}"#
    ))
    .unwrap()
}

fn v1_table() -> SymbolTable {
    table("/old/Slot.java", 19, 11, 13)
}

fn v2_table() -> SymbolTable {
    table("/new/Slot.java", 22, 12, 15)
}

#[test]
fn test_extract_skips_nested_type_and_its_doc() {
    let table = v1_table();
    let slot = locate(&table, "Slot", Filter::TypesOnly).unwrap();
    let range = extract(slot, &split_lines(SLOT_V1));

    let numbers: Vec<u32> = range.source_lines().map(|(n, _)| n).collect();
    assert_eq!(numbers, vec![5, 6, 7, 8, 9, 15, 16, 17, 18, 19]);
    assert!(range.source_lines().all(|(_, text)| !text.contains("Color")));
    assert_eq!(
        range.summary(),
        Some("// 1 inner class(es)/interface(s) excluded")
    );
}

#[test]
fn test_nested_type_extracts_on_its_own() {
    let table = v1_table();
    let pose = locate(&table, "Pose", Filter::TypesOnly).unwrap();
    let range = extract(pose, &split_lines(SLOT_V1));

    let numbers: Vec<u32> = range.source_lines().map(|(n, _)| n).collect();
    assert_eq!(numbers, vec![10, 11, 12, 13]);
    assert!(range.summary().is_none());
}

#[test]
fn test_diff_against_itself_is_unchanged() {
    let table = v1_table();
    let slot = locate(&table, "Slot", Filter::TypesOnly).unwrap();
    let range = extract(slot, &split_lines(SLOT_V1));

    let lines = diff_ranges(Some(&range), &range);
    let real = range.source_lines().count();
    assert_eq!(
        lines
            .iter()
            .filter(|l| l.line_type == LineType::Unchanged)
            .count(),
        real
    );
    assert!(lines
        .iter()
        .all(|l| matches!(l.line_type, LineType::Unchanged | LineType::Summary)));
}

#[test]
fn test_diff_of_new_type_is_all_added() {
    let table = v2_table();
    let slot = locate(&table, "Slot", Filter::TypesOnly).unwrap();
    let range = extract(slot, &split_lines(SLOT_V2));

    let lines = diff_ranges(None, &range);
    assert_eq!(lines.len(), range.lines.len());
    for (line, extracted) in lines.iter().zip(&range.lines) {
        let expected = match extracted {
            ExtractedLine::Source { .. } => LineType::Added,
            ExtractedLine::Summary { .. } => LineType::Summary,
        };
        assert_eq!(line.line_type, expected);
    }
}

#[test]
fn test_diff_between_revisions() {
    let (old_table, new_table) = (v1_table(), v2_table());
    let old = extract(
        locate(&old_table, "Slot", Filter::TypesOnly).unwrap(),
        &split_lines(SLOT_V1),
    );
    let new = extract(
        locate(&new_table, "Slot", Filter::TypesOnly).unwrap(),
        &split_lines(SLOT_V2),
    );

    let lines = diff_ranges(Some(&old), &new);
    let added: Vec<&str> = lines
        .iter()
        .filter(|l| l.line_type == LineType::Added)
        .map(|l| l.content.as_str())
        .collect();
    assert_eq!(added, vec!["\tint sequenceIndex;", "\t\tsequenceIndex = -1;"]);
    assert!(!lines.iter().any(|l| l.line_type == LineType::Removed));
    // The nested Pose change is not part of Slot's diff.
    assert!(!lines.iter().any(|l| l.content.contains("darkColor")));
    // One note from each revision.
    assert_eq!(
        lines
            .iter()
            .filter(|l| l.line_type == LineType::Summary)
            .count(),
        2
    );
}

fn git(dir: &Path, args: &[&str]) -> bool {
    Command::new("git")
        .args(args)
        .current_dir(dir)
        .output()
        .is_ok_and(|o| o.status.success())
}

#[test]
fn test_diff_with_contents_from_git() {
    let dir = TempDir::new().unwrap();
    let root = dir.path();
    if !git(root, &["init", "-q"]) {
        eprintln!("SKIP: git not available");
        return;
    }
    assert!(git(root, &["config", "user.email", "test@example.com"]));
    assert!(git(root, &["config", "user.name", "Test"]));
    assert!(git(root, &["config", "commit.gpgsign", "false"]));
    fs::write(root.join("Slot.java"), SLOT_V1).unwrap();
    assert!(git(root, &["add", "."]));
    assert!(git(root, &["commit", "-q", "-m", "v1"]));
    assert!(git(root, &["tag", "4.2"]));
    fs::write(root.join("Slot.java"), SLOT_V2).unwrap();
    assert!(git(root, &["commit", "-q", "-am", "v2"]));

    let source = LocalGitSource::new(root.to_path_buf()).unwrap();
    let old_content = source.file_at("4.2", "Slot.java").unwrap().unwrap();
    let new_content = source.file_at("HEAD", "Slot.java").unwrap().unwrap();
    assert!(source.file_at("4.2", "Missing.java").unwrap().is_none());

    let (old_table, new_table) = (v1_table(), v2_table());
    let old = extract(
        locate(&old_table, "Slot", Filter::TypesOnly).unwrap(),
        &split_lines(&old_content),
    );
    let new = extract(
        locate(&new_table, "Slot", Filter::TypesOnly).unwrap(),
        &split_lines(&new_content),
    );
    let rendered: Vec<String> = diff_ranges(Some(&old), &new)
        .iter()
        .map(porter::diff::DiffLine::render)
        .collect();
    assert!(rendered.contains(&"+ \tint sequenceIndex;".to_owned()));
    assert!(rendered.contains(&" public class Slot {".to_owned()));
}
