//! Type-scoped extraction and line diffing.
//!
//! [`extract`] isolates one type's text; [`diff_ranges`] compares two such
//! extractions line by line. The diff is textual and deliberately simple:
//! see [`align::GreedyAligner`] for the matching rule.

pub mod align;
pub mod extract;

pub use extract::{extract, split_lines, ExtractedLine, ExtractedRange};

use align::{GreedyAligner, LineAligner};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LineType {
    Added,
    Removed,
    Unchanged,
    Summary,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DiffLine {
    #[serde(rename = "type")]
    pub line_type: LineType,
    pub content: String,
}

impl DiffLine {
    fn new(line_type: LineType, content: &str) -> Self {
        Self {
            line_type,
            content: content.to_owned(),
        }
    }

    /// Text form used by the `diff` command: `+ `, `- `, a single space,
    /// or the bare summary text.
    pub fn render(&self) -> String {
        match self.line_type {
            LineType::Added => format!("+ {}", self.content),
            LineType::Removed => format!("- {}", self.content),
            LineType::Unchanged => format!(" {}", self.content),
            LineType::Summary => self.content.clone(),
        }
    }
}

/// Diff two extractions of the same type with the default aligner.
///
/// `old` is `None` (or empty) when the type did not exist in the older
/// revision; every real line is then reported as added.
pub fn diff_ranges(old: Option<&ExtractedRange>, new: &ExtractedRange) -> Vec<DiffLine> {
    diff_ranges_with(&GreedyAligner, old, new)
}

pub fn diff_ranges_with<A: LineAligner>(
    aligner: &A,
    old: Option<&ExtractedRange>,
    new: &ExtractedRange,
) -> Vec<DiffLine> {
    let old = match old {
        Some(range) if !range.is_empty() => range,
        _ => return all_added(new),
    };

    let (old_positions, old_texts) = real_lines(old);
    let (new_positions, new_texts) = real_lines(new);

    let mut old_matched = vec![false; old.lines.len()];
    let mut new_matched = vec![false; new.lines.len()];
    for (old_index, new_index) in aligner.align(&old_texts, &new_texts) {
        old_matched[old_positions[old_index]] = true;
        new_matched[new_positions[new_index]] = true;
    }

    let mut output = Vec::with_capacity(old.lines.len().max(new.lines.len()));
    let (mut i, mut j) = (0, 0);
    while i < old.lines.len() || j < new.lines.len() {
        // Summaries never take part in matching; each side's is emitted as
        // soon as its own cursor reaches it.
        if old.lines.get(i).is_some_and(ExtractedLine::is_summary) {
            output.push(DiffLine::new(LineType::Summary, old.lines[i].text()));
            i += 1;
            continue;
        }
        if new.lines.get(j).is_some_and(ExtractedLine::is_summary) {
            output.push(DiffLine::new(LineType::Summary, new.lines[j].text()));
            j += 1;
            continue;
        }

        if i < old.lines.len() && !old_matched[i] {
            output.push(DiffLine::new(LineType::Removed, old.lines[i].text()));
            i += 1;
        } else if j < new.lines.len() && !new_matched[j] {
            output.push(DiffLine::new(LineType::Added, new.lines[j].text()));
            j += 1;
        } else if j < new.lines.len() {
            output.push(DiffLine::new(LineType::Unchanged, new.lines[j].text()));
            i += 1;
            j += 1;
        } else {
            // Matched counts are equal on both sides, so this only
            // guards against a misbehaving aligner.
            i += 1;
        }
    }

    output
}

fn all_added(new: &ExtractedRange) -> Vec<DiffLine> {
    new.lines
        .iter()
        .map(|line| match line {
            ExtractedLine::Source { content, .. } => DiffLine::new(LineType::Added, content),
            ExtractedLine::Summary { text } => DiffLine::new(LineType::Summary, text),
        })
        .collect()
}

/// Positions and texts of the non-summary lines.
fn real_lines(range: &ExtractedRange) -> (Vec<usize>, Vec<&str>) {
    range
        .lines
        .iter()
        .enumerate()
        .filter(|(_, line)| !line.is_summary())
        .map(|(position, line)| (position, line.text()))
        .unzip()
}
