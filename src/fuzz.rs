//! Similarity scorers.
//!
//! Every scorer compares two strings `char` by `char` and returns a score
//! ∈ `[0,100]`. The `*_with_cutoff` variants return `0.0` for any score below
//! `score_cutoff`, which lets the distance engine stop early; a score that
//! reaches the cutoff is always identical to the unbounded one.

use crate::distance::indel_distance_with_max;
use crate::{FuzzError, Result, ScoreAlignment};
use itertools::Itertools;
use std::collections::BTreeSet;
use std::fmt;
use std::sync::Arc;

/// Signature of a caller-supplied scorer.
pub type ScoreFn = Arc<dyn Fn(&str, &str) -> f64 + Send + Sync>;

const UNBASE_SCALE: f64 = 0.95;

#[inline]
fn apply_cutoff(score: f64, score_cutoff: f64) -> f64 {
    if score >= score_cutoff { score } else { 0.0 }
}

/// Largest indel distance that may still reach `score_cutoff` over `lensum`
/// units. Rounded up, the final comparison happens on the exact score.
#[inline]
fn max_indel_for(lensum: usize, score_cutoff: f64) -> usize {
    let allowed = lensum as f64 * (1.0 - score_cutoff / 100.0);
    allowed.max(0.0).ceil() as usize
}

fn indel_ratio(a: &[char], b: &[char], score_cutoff: f64) -> f64 {
    let lensum = a.len() + b.len();
    if lensum == 0 {
        return apply_cutoff(100.0, score_cutoff);
    }
    match indel_distance_with_max(a, b, max_indel_for(lensum, score_cutoff)) {
        Some(dist) => {
            let score = 100.0 * (lensum - dist) as f64 / lensum as f64;
            apply_cutoff(score, score_cutoff)
        }
        None => 0.0,
    }
}

#[inline]
fn chars(text: &str) -> Vec<char> {
    text.chars().collect()
}

/// Normalized indel similarity:
/// `100 * (len(a) + len(b) - indel(a, b)) / (len(a) + len(b))`.
///
/// ```rust
/// use fuzzy_ratio::fuzz::ratio;
///
/// assert_eq!(ratio("hello world", "hello world"), 100.0);
/// assert_eq!(ratio("hello world", "hello wold"), 100.0 * 20.0 / 21.0);
/// assert_eq!(ratio("", ""), 100.0);
/// ```
#[must_use]
pub fn ratio(a: &str, b: &str) -> f64 {
    ratio_with_cutoff(a, b, 0.0)
}

#[must_use]
pub fn ratio_with_cutoff(a: &str, b: &str, score_cutoff: f64) -> f64 {
    indel_ratio(&chars(a), &chars(b), score_cutoff)
}

/// Like [`ratio`], but `0` when exactly one side is empty.
#[must_use]
pub fn qratio(a: &str, b: &str) -> f64 {
    qratio_with_cutoff(a, b, 0.0)
}

#[must_use]
pub fn qratio_with_cutoff(a: &str, b: &str, score_cutoff: f64) -> f64 {
    if a.is_empty() != b.is_empty() {
        return 0.0;
    }
    ratio_with_cutoff(a, b, score_cutoff)
}

/// Best window of `longer` for `shorter`, as `(score, start, end)`.
///
/// Windows are tried in a fixed order (growing prefixes, full-width windows
/// left to right, shrinking suffixes); among equal scores the first one
/// wins. Each window is scored with the best score so far as its cutoff.
fn best_window(shorter: &[char], longer: &[char], score_cutoff: f64) -> Option<(f64, usize, usize)> {
    let (short_len, long_len) = (shorter.len(), longer.len());
    debug_assert!(short_len > 0 && short_len <= long_len);

    if let Some(start) = longer.windows(short_len).position(|w| w == shorter) {
        return (100.0 >= score_cutoff).then_some((100.0, start, start + short_len));
    }

    let prefixes = (1..short_len).map(|end| (0, end));
    let full = (0..=long_len - short_len).map(|start| (start, start + short_len));
    let suffixes = (long_len - short_len + 1..long_len).map(|start| (start, long_len));

    let mut best: Option<(f64, usize, usize)> = None;
    let mut threshold = score_cutoff;
    for (start, end) in prefixes.chain(full).chain(suffixes) {
        let score = indel_ratio(shorter, &longer[start..end], threshold);
        if score < threshold || best.is_some_and(|(best_score, _, _)| score <= best_score) {
            continue;
        }
        best = Some((score, start, end));
        threshold = score;
    }
    best
}

fn partial_alignment(a: &[char], b: &[char], score_cutoff: f64) -> Option<ScoreAlignment> {
    if a.is_empty() || b.is_empty() {
        let score = if a.is_empty() && b.is_empty() { 100.0 } else { 0.0 };
        return (score >= score_cutoff).then_some(ScoreAlignment {
            score,
            src_start: 0,
            src_end: a.len(),
            dest_start: 0,
            dest_end: b.len(),
        });
    }

    // `a` against windows of `b`
    let forward = |cutoff| {
        best_window(a, b, cutoff).map(|(score, start, end)| ScoreAlignment {
            score,
            src_start: 0,
            src_end: a.len(),
            dest_start: start,
            dest_end: end,
        })
    };
    // `b` against windows of `a`
    let backward = |cutoff| {
        best_window(b, a, cutoff).map(|(score, start, end)| ScoreAlignment {
            score,
            src_start: start,
            src_end: end,
            dest_start: 0,
            dest_end: b.len(),
        })
    };

    match a.len().cmp(&b.len()) {
        std::cmp::Ordering::Less => forward(score_cutoff),
        std::cmp::Ordering::Greater => backward(score_cutoff),
        std::cmp::Ordering::Equal => {
            let first = forward(score_cutoff);
            if first.is_some_and(|al| al.score >= 100.0) {
                return first;
            }
            let cutoff = first.map_or(score_cutoff, |al| al.score.max(score_cutoff));
            match backward(cutoff) {
                Some(second) if first.is_none_or(|al| second.score > al.score) => Some(second),
                _ => first,
            }
        }
    }
}

/// Best [`ratio`] of the shorter string against any window of the longer
/// one. Windows overhanging either end of the longer string are included.
///
/// ```rust
/// use fuzzy_ratio::fuzz::partial_ratio;
///
/// assert_eq!(partial_ratio("hello world", "world"), 100.0);
/// assert_eq!(partial_ratio("world", "hello world"), 100.0);
/// ```
#[must_use]
pub fn partial_ratio(a: &str, b: &str) -> f64 {
    partial_ratio_with_cutoff(a, b, 0.0)
}

#[must_use]
pub fn partial_ratio_with_cutoff(a: &str, b: &str, score_cutoff: f64) -> f64 {
    partial_alignment(&chars(a), &chars(b), score_cutoff).map_or(0.0, |al| al.score)
}

/// [`partial_ratio`] together with the window it was measured on.
#[must_use]
pub fn partial_ratio_alignment(a: &str, b: &str) -> ScoreAlignment {
    partial_ratio_alignment_with_cutoff(a, b, 0.0).unwrap_or(ScoreAlignment {
        score: 0.0,
        src_start: 0,
        src_end: 0,
        dest_start: 0,
        dest_end: 0,
    })
}

/// `None` when the best window stays below `score_cutoff`.
#[must_use]
pub fn partial_ratio_alignment_with_cutoff(
    a: &str,
    b: &str,
    score_cutoff: f64,
) -> Option<ScoreAlignment> {
    partial_alignment(&chars(a), &chars(b), score_cutoff)
}

/// Whitespace tokens sorted lexicographically and joined by single spaces.
fn sorted_tokens(text: &str) -> String {
    text.split_whitespace().sorted_unstable().join(" ")
}

#[must_use]
pub fn token_sort_ratio(a: &str, b: &str) -> f64 {
    token_sort_ratio_with_cutoff(a, b, 0.0)
}

#[must_use]
pub fn token_sort_ratio_with_cutoff(a: &str, b: &str, score_cutoff: f64) -> f64 {
    ratio_with_cutoff(&sorted_tokens(a), &sorted_tokens(b), score_cutoff)
}

#[must_use]
pub fn partial_token_sort_ratio(a: &str, b: &str) -> f64 {
    partial_token_sort_ratio_with_cutoff(a, b, 0.0)
}

#[must_use]
pub fn partial_token_sort_ratio_with_cutoff(a: &str, b: &str, score_cutoff: f64) -> f64 {
    partial_ratio_with_cutoff(&sorted_tokens(a), &sorted_tokens(b), score_cutoff)
}

/// Deduplicated, sorted token sets of two strings.
struct TokenSets<'a> {
    intersection: Vec<&'a str>,
    diff_ab: Vec<&'a str>,
    diff_ba: Vec<&'a str>,
}

impl<'a> TokenSets<'a> {
    fn new(a: &'a str, b: &'a str) -> Self {
        let tokens_a: BTreeSet<&str> = a.split_whitespace().collect();
        let tokens_b: BTreeSet<&str> = b.split_whitespace().collect();
        Self {
            intersection: tokens_a.intersection(&tokens_b).copied().collect(),
            diff_ab: tokens_a.difference(&tokens_b).copied().collect(),
            diff_ba: tokens_b.difference(&tokens_a).copied().collect(),
        }
    }

    fn a_is_empty(&self) -> bool {
        self.intersection.is_empty() && self.diff_ab.is_empty()
    }

    fn b_is_empty(&self) -> bool {
        self.intersection.is_empty() && self.diff_ba.is_empty()
    }

    /// Score for inputs where at least one side has no tokens at all.
    fn degenerate_score(&self) -> Option<f64> {
        match (self.a_is_empty(), self.b_is_empty()) {
            (true, true) => Some(100.0),
            (true, false) | (false, true) => Some(0.0),
            (false, false) => None,
        }
    }
}

fn token_set_score(sets: &TokenSets<'_>, score_cutoff: f64) -> f64 {
    if let Some(score) = sets.degenerate_score() {
        return apply_cutoff(score, score_cutoff);
    }
    // one token set contains the other
    if !sets.intersection.is_empty() && (sets.diff_ab.is_empty() || sets.diff_ba.is_empty()) {
        return apply_cutoff(100.0, score_cutoff);
    }

    let sect = sets.intersection.join(" ");
    let with_leftover = |diff: &[&str]| {
        if sect.is_empty() {
            diff.join(" ")
        } else {
            format!("{sect} {}", diff.join(" "))
        }
    };
    let sect_ab = with_leftover(&sets.diff_ab);
    let sect_ba = with_leftover(&sets.diff_ba);

    let mut best = ratio_with_cutoff(&sect_ab, &sect_ba, score_cutoff);
    if !sect.is_empty() {
        let cutoff = best.max(score_cutoff);
        best = best
            .max(ratio_with_cutoff(&sect, &sect_ab, cutoff))
            .max(ratio_with_cutoff(&sect, &sect_ba, cutoff));
    }
    best
}

/// Compares the shared tokens against each side's shared + leftover tokens,
/// ignoring word order and repeated words.
///
/// ```rust
/// use fuzzy_ratio::fuzz::token_set_ratio;
///
/// assert_eq!(token_set_ratio("fuzzy was a bear", "fuzzy fuzzy was a bear"), 100.0);
/// ```
#[must_use]
pub fn token_set_ratio(a: &str, b: &str) -> f64 {
    token_set_ratio_with_cutoff(a, b, 0.0)
}

#[must_use]
pub fn token_set_ratio_with_cutoff(a: &str, b: &str, score_cutoff: f64) -> f64 {
    token_set_score(&TokenSets::new(a, b), score_cutoff)
}

fn partial_token_set_score(sets: &TokenSets<'_>, score_cutoff: f64) -> f64 {
    if let Some(score) = sets.degenerate_score() {
        return apply_cutoff(score, score_cutoff);
    }
    if !sets.intersection.is_empty() {
        return apply_cutoff(100.0, score_cutoff);
    }
    partial_ratio_with_cutoff(&sets.diff_ab.join(" "), &sets.diff_ba.join(" "), score_cutoff)
}

/// `100` as soon as the two strings share a token, otherwise the
/// [`partial_ratio`] of their sorted token sets.
#[must_use]
pub fn partial_token_set_ratio(a: &str, b: &str) -> f64 {
    partial_token_set_ratio_with_cutoff(a, b, 0.0)
}

#[must_use]
pub fn partial_token_set_ratio_with_cutoff(a: &str, b: &str, score_cutoff: f64) -> f64 {
    partial_token_set_score(&TokenSets::new(a, b), score_cutoff)
}

/// Maximum of [`token_sort_ratio`] and [`token_set_ratio`].
#[must_use]
pub fn token_ratio(a: &str, b: &str) -> f64 {
    token_ratio_with_cutoff(a, b, 0.0)
}

#[must_use]
pub fn token_ratio_with_cutoff(a: &str, b: &str, score_cutoff: f64) -> f64 {
    let set_score = token_set_score(&TokenSets::new(a, b), score_cutoff);
    if set_score >= 100.0 {
        return set_score;
    }
    let sort_score = token_sort_ratio_with_cutoff(a, b, set_score.max(score_cutoff));
    set_score.max(sort_score)
}

/// Maximum of [`partial_token_sort_ratio`] and [`partial_token_set_ratio`].
#[must_use]
pub fn partial_token_ratio(a: &str, b: &str) -> f64 {
    partial_token_ratio_with_cutoff(a, b, 0.0)
}

#[must_use]
pub fn partial_token_ratio_with_cutoff(a: &str, b: &str, score_cutoff: f64) -> f64 {
    let set_score = partial_token_set_score(&TokenSets::new(a, b), score_cutoff);
    if set_score >= 100.0 {
        return set_score;
    }
    let sort_score = partial_token_sort_ratio_with_cutoff(a, b, set_score.max(score_cutoff));
    set_score.max(sort_score)
}

/// Weighted ratio: picks between the full, partial and token based scorers
/// depending on how different the two lengths are.
///
/// * length ratio below 1.5: `max(ratio, 0.95 * token_ratio)`
/// * otherwise partial scorers join in, scaled by 0.9 (length ratio below 8)
///   or 0.6, and the partial token scorer again by 0.95.
///
/// ```rust
/// use fuzzy_ratio::fuzz::wratio;
///
/// assert_eq!(wratio("this is a test", "this is a test!"), 100.0 * 28.0 / 29.0);
/// assert_eq!(wratio("", ""), 100.0);
/// assert_eq!(wratio("", "abc"), 0.0);
/// ```
#[must_use]
pub fn wratio(a: &str, b: &str) -> f64 {
    wratio_with_cutoff(a, b, 0.0)
}

#[must_use]
pub fn wratio_with_cutoff(a: &str, b: &str, score_cutoff: f64) -> f64 {
    let (len_a, len_b) = (a.chars().count(), b.chars().count());
    if len_a == 0 || len_b == 0 {
        let score = if len_a == len_b { 100.0 } else { 0.0 };
        return apply_cutoff(score, score_cutoff);
    }

    let len_ratio = len_a.max(len_b) as f64 / len_a.min(len_b) as f64;
    let mut end_ratio = ratio(a, b);

    if len_ratio < 1.5 {
        end_ratio = end_ratio.max(token_ratio(a, b) * UNBASE_SCALE);
        return apply_cutoff(end_ratio, score_cutoff);
    }

    let partial_scale = if len_ratio < 8.0 { 0.9 } else { 0.6 };
    end_ratio = end_ratio.max(partial_ratio(a, b) * partial_scale);
    end_ratio = end_ratio.max(partial_token_ratio(a, b) * UNBASE_SCALE * partial_scale);
    apply_cutoff(end_ratio, score_cutoff)
}

/// Scorer selection for the batch matcher.
///
/// The built-in variants cover the scorers of this module; [`Scorer::Custom`]
/// accepts any function with the same `(query, choice) -> score` shape.
#[derive(Clone, Default)]
pub enum Scorer {
    Ratio,
    PartialRatio,
    TokenSortRatio,
    TokenSetRatio,
    TokenRatio,
    PartialTokenSortRatio,
    PartialTokenSetRatio,
    PartialTokenRatio,
    #[default]
    WRatio,
    QRatio,
    Custom(ScoreFn),
}

impl Scorer {
    pub fn custom<F>(f: F) -> Self
    where
        F: Fn(&str, &str) -> f64 + Send + Sync + 'static,
    {
        Self::Custom(Arc::new(f))
    }

    #[must_use]
    pub fn name(&self) -> &'static str {
        match self {
            Self::Ratio => "ratio",
            Self::PartialRatio => "partial_ratio",
            Self::TokenSortRatio => "token_sort_ratio",
            Self::TokenSetRatio => "token_set_ratio",
            Self::TokenRatio => "token_ratio",
            Self::PartialTokenSortRatio => "partial_token_sort_ratio",
            Self::PartialTokenSetRatio => "partial_token_set_ratio",
            Self::PartialTokenRatio => "partial_token_ratio",
            Self::WRatio => "wratio",
            Self::QRatio => "qratio",
            Self::Custom(_) => "custom",
        }
    }

    /// Scores `a` against `b`. A custom scorer's output is clamped into
    /// `[0,100]`; use [`Scorer::try_score`] to reject it instead.
    #[must_use]
    pub fn score(&self, a: &str, b: &str) -> f64 {
        self.score_with_cutoff(a, b, 0.0)
    }

    #[must_use]
    pub fn score_with_cutoff(&self, a: &str, b: &str, score_cutoff: f64) -> f64 {
        match self {
            Self::Ratio => ratio_with_cutoff(a, b, score_cutoff),
            Self::PartialRatio => partial_ratio_with_cutoff(a, b, score_cutoff),
            Self::TokenSortRatio => token_sort_ratio_with_cutoff(a, b, score_cutoff),
            Self::TokenSetRatio => token_set_ratio_with_cutoff(a, b, score_cutoff),
            Self::TokenRatio => token_ratio_with_cutoff(a, b, score_cutoff),
            Self::PartialTokenSortRatio => partial_token_sort_ratio_with_cutoff(a, b, score_cutoff),
            Self::PartialTokenSetRatio => partial_token_set_ratio_with_cutoff(a, b, score_cutoff),
            Self::PartialTokenRatio => partial_token_ratio_with_cutoff(a, b, score_cutoff),
            Self::WRatio => wratio_with_cutoff(a, b, score_cutoff),
            Self::QRatio => qratio_with_cutoff(a, b, score_cutoff),
            Self::Custom(f) => {
                let score = f(a, b);
                let score = if score.is_nan() { 0.0 } else { score.clamp(0.0, 100.0) };
                apply_cutoff(score, score_cutoff)
            }
        }
    }

    /// Like [`Scorer::score_with_cutoff`], but a custom scorer returning a
    /// non-finite or out-of-range score is an [`FuzzError::InvalidInput`].
    pub fn try_score(&self, a: &str, b: &str, score_cutoff: f64) -> Result<f64> {
        match self {
            Self::Custom(f) => {
                let score = f(a, b);
                if !(0.0..=100.0).contains(&score) {
                    return Err(FuzzError::InvalidInput { score });
                }
                Ok(apply_cutoff(score, score_cutoff))
            }
            _ => Ok(self.score_with_cutoff(a, b, score_cutoff)),
        }
    }
}

impl fmt::Debug for Scorer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Custom(_) => f.write_str("Custom(..)"),
            _ => f.write_str(self.name()),
        }
    }
}
