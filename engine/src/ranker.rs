use std::cmp::Ordering;

use crate::aggregator::AggregationState;

pub const DEFAULT_TREND_THRESHOLD: usize = 2;
pub const DEFAULT_TREND_TOP_K: usize = 3;

/// One row of the trending banner.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TrendEntry {
    pub subject: String,
    pub count: usize,
    /// Sorted ascending.
    pub seen_actors: Vec<String>,
}

/// Derives the top-`k` subjects whose count is at least `threshold`.
///
/// Sorted by count descending; equal counts are ordered by subject ascending
/// so the output does not depend on map iteration order. Pure: the state is
/// only read.
pub fn rank(state: &AggregationState, threshold: usize, k: usize) -> Vec<TrendEntry> {
    if k == 0 {
        return Vec::new();
    }

    let mut hot: Vec<_> = state
        .iter()
        .filter(|(_, activity)| activity.count() >= threshold)
        .collect();

    hot.sort_by(|(sa, a), (sb, b)| match b.count().cmp(&a.count()) {
        Ordering::Equal => sa.cmp(sb),
        ord => ord,
    });

    hot.into_iter()
        .take(k)
        .map(|(subject, activity)| TrendEntry {
            subject: subject.to_owned(),
            count: activity.count(),
            seen_actors: activity.seen_actors().iter().cloned().collect(),
        })
        .collect()
}
