//! Most-frequent label selection.
//!
//! The frontend may report the same close-approach date several times; the plot only needs one.
//! Ties go to the label that appears first in the input.

use std::collections::HashMap;
use std::hash::Hash;

/// Return the most frequent item of `labels`, ties broken by first occurrence.
///
/// Returns `None` for an empty input.
pub fn most_frequent<T>(labels: &[T]) -> Option<&T>
where
    T: Eq + Hash,
{
    let mut counts: HashMap<&T, (usize, usize)> = HashMap::new();
    for (position, label) in labels.iter().enumerate() {
        counts.entry(label).or_insert((0, position)).0 += 1;
    }

    counts
        .into_iter()
        .max_by(|(_, (count_a, first_a)), (_, (count_b, first_b))| {
            count_a.cmp(count_b).then(first_b.cmp(first_a))
        })
        .map(|(label, _)| label)
}
