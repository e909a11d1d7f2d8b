use crate::ScoreResult;
use std::cmp::Ordering;

/// Higher score first, then the earlier candidate. Indices are unique within
/// one call, so this is a total order and any sort yields the same sequence.
#[inline]
pub(crate) fn ranking_order(left: &ScoreResult, right: &ScoreResult) -> Ordering {
    right
        .score
        .total_cmp(&left.score)
        .then_with(|| left.index.cmp(&right.index))
}

/// Sorts `results` into ranking order and keeps at most `limit` of them.
///
/// With a limit below the number of results the top `limit` are selected
/// first, so only the kept prefix is fully sorted.
pub(crate) fn rank(mut results: Vec<ScoreResult>, limit: Option<usize>) -> Vec<ScoreResult> {
    match limit {
        Some(0) => results.clear(),
        Some(limit) if limit < results.len() => {
            results.select_nth_unstable_by(limit - 1, ranking_order);
            results.truncate(limit);
        }
        _ => {}
    }
    results.sort_unstable_by(ranking_order);
    results
}
