//! Line alignment between two versions of a type.

use std::collections::HashMap;

/// Pairs up identical lines of `old` and `new`.
///
/// Returns `(old_index, new_index)` pairs. Each index appears at most once.
/// Implementations are free to choose any pairing; [`crate::diff::diff_ranges`]
/// only relies on that uniqueness.
pub trait LineAligner {
    fn align(&self, old: &[&str], new: &[&str]) -> Vec<(usize, usize)>;
}

/// Content-identity matching: each new line, in order, claims the first
/// unclaimed old line with the same content.
///
/// Not an optimal alignment. Duplicate lines that trade places can pair
/// up crosswise and show as unchanged.
#[derive(Debug, Clone, Copy, Default)]
pub struct GreedyAligner;

impl LineAligner for GreedyAligner {
    fn align(&self, old: &[&str], new: &[&str]) -> Vec<(usize, usize)> {
        let mut old_positions: HashMap<&str, Vec<usize>> = HashMap::new();
        for (index, line) in old.iter().enumerate() {
            old_positions.entry(*line).or_default().push(index);
        }
        let mut next_unclaimed: HashMap<&str, usize> = HashMap::new();

        let mut pairs = Vec::new();
        for (new_index, line) in new.iter().enumerate() {
            let Some(positions) = old_positions.get(line) else {
                continue;
            };
            let cursor = next_unclaimed.entry(*line).or_insert(0);
            if let Some(&old_index) = positions.get(*cursor) {
                *cursor += 1;
                pairs.push((old_index, new_index));
            }
        }
        pairs
    }
}
