//! Type-scoped range extraction.
//!
//! Cuts a single type declaration out of its source file: the declaration
//! itself, its members and its attached documentation, but not the bodies
//! of nested types. Each run of nested types is replaced by a single
//! summary line so readers know something was left out.

use crate::symbols::Symbol;
use serde::Serialize;

/// One line of an extracted range.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum ExtractedLine {
    /// A real source line with its 1-based line number.
    Source { number: u32, content: String },
    /// Inserted note about excluded nested types. Carries no source text
    /// and never takes part in diff matching.
    Summary { text: String },
}

impl ExtractedLine {
    pub fn text(&self) -> &str {
        match self {
            Self::Source { content, .. } => content,
            Self::Summary { text } => text,
        }
    }

    pub fn is_summary(&self) -> bool {
        matches!(self, Self::Summary { .. })
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ExtractedRange {
    pub lines: Vec<ExtractedLine>,
}

impl ExtractedRange {
    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }

    /// Real source lines only, as `(line_number, content)`.
    pub fn source_lines(&self) -> impl Iterator<Item = (u32, &str)> {
        self.lines.iter().filter_map(|line| match line {
            ExtractedLine::Source { number, content } => Some((*number, content.as_str())),
            ExtractedLine::Summary { .. } => None,
        })
    }

    pub fn summary(&self) -> Option<&str> {
        self.lines.iter().find_map(|line| match line {
            ExtractedLine::Summary { text } => Some(text.as_str()),
            ExtractedLine::Source { .. } => None,
        })
    }

    /// Largest real line number, used to size line-number gutters.
    pub fn max_line_number(&self) -> u32 {
        self.source_lines().map(|(n, _)| n).max().unwrap_or(0)
    }
}

/// Split file content into lines the way the extractor indexes them.
pub fn split_lines(content: &str) -> Vec<&str> {
    content.lines().collect()
}

/// Extract `symbol` from the lines of its file.
pub fn extract<S: AsRef<str>>(symbol: &Symbol, file_lines: &[S]) -> ExtractedRange {
    let total = file_lines.len() as u32;
    let decl_start = symbol.start_line().max(1);
    if total == 0 || decl_start > total {
        return ExtractedRange::default();
    }
    let end = symbol.end_line().clamp(decl_start, total);
    let start = documentation_start(file_lines, decl_start);

    let mut exclusions: Vec<(u32, u32)> = symbol
        .nested_types()
        .filter(|inner| inner.start_line() >= 1 && inner.start_line() <= end)
        .map(|inner| {
            let inner_start = documentation_start(file_lines, inner.start_line()).max(start);
            let mut inner_end = inner.end_line().clamp(inner.start_line(), end);
            while inner_end < end && line_at(file_lines, inner_end + 1).trim().is_empty() {
                inner_end += 1;
            }
            (inner_start, inner_end)
        })
        .collect();
    exclusions.sort_unstable();

    let mut lines = Vec::new();
    let mut next_exclusion = 0;
    for number in start..=end {
        while next_exclusion < exclusions.len() && exclusions[next_exclusion].1 < number {
            next_exclusion += 1;
        }
        if let Some(&(ex_start, ex_end)) = exclusions.get(next_exclusion) {
            if (ex_start..=ex_end).contains(&number) {
                continue;
            }
        }
        lines.push(ExtractedLine::Source {
            number,
            content: line_at(file_lines, number).to_owned(),
        });
    }

    if !exclusions.is_empty() {
        let indent = lines
            .iter()
            .rev()
            .find_map(|line| match line {
                ExtractedLine::Source { content, .. } => Some(indentation(content)),
                ExtractedLine::Summary { .. } => None,
            })
            .unwrap_or_else(|| indentation(line_at(file_lines, decl_start)));
        lines.push(ExtractedLine::Summary {
            text: format!(
                "{indent}// {} inner class(es)/interface(s) excluded",
                exclusions.len()
            ),
        });
    }

    ExtractedRange { lines }
}

/// Walk backwards from a declaration over its attached documentation,
/// annotations and line comments. Blank lines are crossed but only kept
/// when something attached lies beyond them. A block-comment opener is
/// kept and ends the walk.
fn documentation_start<S: AsRef<str>>(file_lines: &[S], decl_start: u32) -> u32 {
    let mut start = decl_start;
    let mut number = decl_start.saturating_sub(1);

    while number >= 1 {
        let text = line_at(file_lines, number).trim();
        if text.is_empty() {
            number -= 1;
            continue;
        }
        if text.starts_with("/*") {
            start = number;
            break;
        }
        if text.starts_with('*') || text.starts_with('@') || text.starts_with("//") {
            start = number;
            number -= 1;
            continue;
        }
        break;
    }

    start
}

fn line_at<S: AsRef<str>>(file_lines: &[S], number: u32) -> &str {
    file_lines
        .get(number as usize - 1)
        .map_or("", |line| line.as_ref())
}

fn indentation(line: &str) -> String {
    line.chars().take_while(|c| c.is_whitespace()).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::symbols::tests::sym;
    use crate::symbols::SymbolKind;

    fn numbers(range: &ExtractedRange) -> Vec<u32> {
        range.source_lines().map(|(n, _)| n).collect()
    }

    /// 25 lines: Foo at 10-20 containing Bar at 14-16.
    fn foo_file() -> Vec<String> {
        let mut lines: Vec<String> = (1..=25).map(|n| format!("stmt{n};")).collect();
        lines[9] = "public class Foo {".to_owned();
        lines[10] = "    int a;".to_owned();
        lines[11] = "    int b;".to_owned();
        lines[12] = "    int c;".to_owned();
        lines[13] = "    static class Bar {".to_owned();
        lines[14] = "        int inner;".to_owned();
        lines[15] = "    }".to_owned();
        lines[16] = "    void run () {".to_owned();
        lines[17] = "        a++;".to_owned();
        lines[18] = "    }".to_owned();
        lines[19] = "}".to_owned();
        lines
    }

    fn foo_symbol() -> Symbol {
        let mut foo = sym("Foo", SymbolKind::Class, "/Foo.java", 10, 20);
        foo.children
            .push(sym("Bar", SymbolKind::Class, "/Foo.java", 14, 16));
        foo.children
            .push(sym("run", SymbolKind::Method, "/Foo.java", 17, 19));
        foo
    }

    #[test]
    fn test_excludes_inner_type() {
        let range = extract(&foo_symbol(), &foo_file());

        assert_eq!(numbers(&range), vec![10, 11, 12, 13, 17, 18, 19, 20]);
        assert_eq!(
            range.summary(),
            Some("// 1 inner class(es)/interface(s) excluded")
        );
        assert!(range.lines.last().unwrap().is_summary());
        assert!(!range.source_lines().any(|(_, text)| text.contains("inner;")));
    }

    #[test]
    fn test_includes_javadoc_and_annotations() {
        let lines = vec![
            "package spine;",
            "",
            "import java.util.List;",
            "",
            "/** Stores a bone's current pose.",
            " * @see Bone */",
            "@SuppressWarnings(\"unused\")",
            "public class BonePose {",
            "    float x;",
            "}",
        ];
        let symbol = sym("BonePose", SymbolKind::Class, "/BonePose.java", 8, 10);

        let range = extract(&symbol, &lines);

        assert_eq!(numbers(&range), vec![5, 6, 7, 8, 9, 10]);
        assert!(range.summary().is_none());
    }

    #[test]
    fn test_stops_at_preceding_code() {
        let lines = vec![
            "class A {",
            "}",
            "",
            "class B {",
            "}",
        ];
        let symbol = sym("B", SymbolKind::Class, "/A.java", 4, 5);

        let range = extract(&symbol, &lines);

        assert_eq!(numbers(&range), vec![4, 5]);
    }

    #[test]
    fn test_blank_lines_only_kept_before_attached_comment() {
        let lines = vec![
            "int x;",
            "// section",
            "",
            "class B {",
            "}",
        ];
        let symbol = sym("B", SymbolKind::Class, "/B.java", 4, 5);

        let range = extract(&symbol, &lines);

        assert_eq!(numbers(&range), vec![2, 3, 4, 5]);
    }

    #[test]
    fn test_inner_javadoc_and_trailing_blanks_excluded() {
        let lines = vec![
            "public class Outer {",  // 1
            "    int a;",            // 2
            "",                      // 3
            "    /** Inner docs. */", // 4
            "    static public enum Mode {", // 5
            "        one, two",      // 6
            "    }",                 // 7
            "",                      // 8
            "",                      // 9
            "    int b;",            // 10
            "}",                     // 11
        ];
        let mut outer = sym("Outer", SymbolKind::Class, "/Outer.java", 1, 11);
        outer
            .children
            .push(sym("Mode", SymbolKind::Enum, "/Outer.java", 5, 7));

        let range = extract(&outer, &lines);

        assert_eq!(numbers(&range), vec![1, 2, 3, 10, 11]);
        assert_eq!(
            range.summary(),
            Some("// 1 inner class(es)/interface(s) excluded")
        );
    }

    #[test]
    fn test_summary_matches_last_line_indentation() {
        let lines = vec![
            "    class Nested {",
            "        class Deeper {",
            "        }",
            "        int x;",
            "    }",
        ];
        let mut nested = sym("Nested", SymbolKind::Class, "/N.java", 1, 5);
        nested
            .children
            .push(sym("Deeper", SymbolKind::Class, "/N.java", 2, 3));

        let range = extract(&nested, &lines);

        assert_eq!(
            range.summary(),
            Some("    // 1 inner class(es)/interface(s) excluded")
        );
    }

    #[test]
    fn test_counts_every_inner_type() {
        let lines = vec![
            "class Holder {",
            "    interface Listener {",
            "    }",
            "    enum Kind { a }",
            "}",
        ];
        let mut holder = sym("Holder", SymbolKind::Class, "/H.java", 1, 5);
        holder
            .children
            .push(sym("Listener", SymbolKind::Interface, "/H.java", 2, 3));
        holder
            .children
            .push(sym("Kind", SymbolKind::Enum, "/H.java", 4, 4));

        let range = extract(&holder, &lines);

        assert_eq!(numbers(&range), vec![1, 5]);
        assert!(range.summary().unwrap().contains("2 inner"));
    }

    #[test]
    fn test_range_past_end_of_file() {
        let lines = vec!["class A {}"];
        let symbol = sym("A", SymbolKind::Class, "/A.java", 5, 9);
        assert!(extract(&symbol, &lines).is_empty());

        let symbol = sym("A", SymbolKind::Class, "/A.java", 1, 9);
        assert_eq!(numbers(&extract(&symbol, &lines)), vec![1]);
    }
}
