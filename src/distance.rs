//! Edit-distance primitives over arbitrary token sequences.
//!
//! Strings are usually compared as `&[char]`, but every routine accepts any
//! slice of comparable units, e.g. word tokens.

use crate::{Alignment, NumEdits};
use std::collections::HashMap;
use std::hash::Hash;

#[inline]
fn common_prefix<T: PartialEq>(a: &[T], b: &[T]) -> usize {
    a.iter().zip(b).take_while(|(x, y)| x == y).count()
}

#[inline]
fn common_suffix<T: PartialEq>(a: &[T], b: &[T]) -> usize {
    a.iter()
        .rev()
        .zip(b.iter().rev())
        .take_while(|(x, y)| x == y)
        .count()
}

/// Strips the shared prefix and suffix. Neither changes a Levenshtein or
/// indel distance, and both add their full length to the LCS.
fn trim_common<'a, T: PartialEq>(a: &'a [T], b: &'a [T]) -> (&'a [T], &'a [T]) {
    let prefix = common_prefix(a, b);
    let (a, b) = (&a[prefix..], &b[prefix..]);
    let suffix = common_suffix(a, b);
    (&a[..a.len() - suffix], &b[..b.len() - suffix])
}

#[inline]
fn longer_first<'a, T>(a: &'a [T], b: &'a [T]) -> (&'a [T], &'a [T]) {
    if a.len() >= b.len() { (a, b) } else { (b, a) }
}

/// Classic Levenshtein distance: unit cost for insertion, deletion and
/// substitution.
///
/// ```rust
/// use fuzzy_ratio::distance::levenshtein;
///
/// let a: Vec<char> = "kitten".chars().collect();
/// let b: Vec<char> = "sitting".chars().collect();
/// assert_eq!(levenshtein(&a, &b), 3);
/// assert_eq!(levenshtein(&a, &[]), 6);
/// ```
#[must_use]
pub fn levenshtein<T: PartialEq>(a: &[T], b: &[T]) -> NumEdits {
    let (a, b) = trim_common(a, b);
    let (long, short) = longer_first(a, b);
    if short.is_empty() {
        return long.len();
    }

    let mut row: Vec<NumEdits> = (0..=short.len()).collect();
    for (i, x) in long.iter().enumerate() {
        let mut diag = row[0];
        row[0] = i + 1;
        for (j, y) in short.iter().enumerate() {
            let above = row[j + 1];
            row[j + 1] = if x == y {
                diag
            } else {
                1 + diag.min(above).min(row[j])
            };
            diag = above;
        }
    }
    row[short.len()]
}

/// Levenshtein distance bounded by `max`.
///
/// Returns `Some(d)` exactly when the full distance `d` is `<= max`, and
/// `None` otherwise. The row minimum of the DP matrix never decreases, so
/// the computation stops as soon as a whole row exceeds `max`.
#[must_use]
pub fn levenshtein_with_max<T: PartialEq>(a: &[T], b: &[T], max: NumEdits) -> Option<NumEdits> {
    let (a, b) = trim_common(a, b);
    let (long, short) = longer_first(a, b);
    if long.len() - short.len() > max {
        return None;
    }
    if short.is_empty() {
        return Some(long.len());
    }

    let mut row: Vec<NumEdits> = (0..=short.len()).collect();
    for (i, x) in long.iter().enumerate() {
        let mut diag = row[0];
        row[0] = i + 1;
        let mut row_min = row[0];
        for (j, y) in short.iter().enumerate() {
            let above = row[j + 1];
            row[j + 1] = if x == y {
                diag
            } else {
                1 + diag.min(above).min(row[j])
            };
            row_min = row_min.min(row[j + 1]);
            diag = above;
        }
        if row_min > max {
            trace!("levenshtein: row {i} minimum {row_min} exceeds {max}, stopping");
            return None;
        }
    }
    let distance = row[short.len()];
    (distance <= max).then_some(distance)
}

/// Counts the insertions, deletions and substitutions of one optimal
/// Levenshtein alignment of `a` onto `b`.
///
/// Keeps the full `(len(a)+1) × (len(b)+1)` matrix for the backtrace, so it
/// is meant for inspection rather than ranking.
#[must_use]
pub fn levenshtein_alignment<T: PartialEq>(a: &[T], b: &[T]) -> Alignment {
    let (a, b) = trim_common(a, b);
    let width = b.len() + 1;
    let mut matrix = vec![0 as NumEdits; (a.len() + 1) * width];
    for (j, cell) in matrix.iter_mut().take(width).enumerate() {
        *cell = j;
    }
    for i in 1..=a.len() {
        matrix[i * width] = i;
        for j in 1..=b.len() {
            let cost = NumEdits::from(a[i - 1] != b[j - 1]);
            matrix[i * width + j] = (matrix[(i - 1) * width + j - 1] + cost)
                .min(matrix[(i - 1) * width + j] + 1)
                .min(matrix[i * width + j - 1] + 1);
        }
    }

    let mut alignment = Alignment::default();
    let (mut i, mut j) = (a.len(), b.len());
    while i > 0 || j > 0 {
        let current = matrix[i * width + j];
        if i > 0 && j > 0 {
            let diag = matrix[(i - 1) * width + j - 1];
            if a[i - 1] == b[j - 1] && current == diag {
                i -= 1;
                j -= 1;
                continue;
            }
            if current == diag + 1 {
                alignment.substitutions += 1;
                i -= 1;
                j -= 1;
                continue;
            }
        }
        if i > 0 && current == matrix[(i - 1) * width + j] + 1 {
            alignment.deletions += 1;
            i -= 1;
        } else {
            alignment.insertions += 1;
            j -= 1;
        }
    }
    alignment
}

/// Length of the longest common subsequence, by the textbook
/// dynamic-programming recurrence.
#[must_use]
pub fn lcs_length<T: PartialEq>(a: &[T], b: &[T]) -> usize {
    let (trimmed_a, trimmed_b) = trim_common(a, b);
    let affix = a.len() - trimmed_a.len();
    if trimmed_a.is_empty() || trimmed_b.is_empty() {
        return affix;
    }

    let mut row = vec![0usize; trimmed_b.len() + 1];
    for x in trimmed_a {
        let mut diag = 0;
        for (j, y) in trimmed_b.iter().enumerate() {
            let above = row[j + 1];
            row[j + 1] = if x == y { diag + 1 } else { above.max(row[j]) };
            diag = above;
        }
    }
    affix + row[trimmed_b.len()]
}

/// Per-token match masks of `pattern`, 64 positions per block.
struct PatternMatchVector<T> {
    blocks: usize,
    masks: HashMap<T, Vec<u64>>,
}

impl<T: Eq + Hash + Copy> PatternMatchVector<T> {
    fn new(pattern: &[T]) -> Self {
        let blocks = pattern.len().div_ceil(64);
        let mut masks: HashMap<T, Vec<u64>> = HashMap::new();
        for (i, &unit) in pattern.iter().enumerate() {
            masks.entry(unit).or_insert_with(|| vec![0; blocks])[i / 64] |= 1 << (i % 64);
        }
        Self { blocks, masks }
    }

    /// Hyyrö's bit-parallel LCS: `S' = (S + (S & M)) | (S & !M)`, carried
    /// across blocks. Zero bits of the final `S` count the LCS.
    fn lcs(&self, text: &[T]) -> usize {
        let mut s = vec![u64::MAX; self.blocks];
        for unit in text {
            let Some(mask) = self.masks.get(unit) else {
                continue;
            };
            let mut carry = false;
            for (word, &m) in s.iter_mut().zip(mask) {
                let u = *word & m;
                let (sum, overflow_a) = word.overflowing_add(u);
                let (sum, overflow_b) = sum.overflowing_add(u64::from(carry));
                carry = overflow_a || overflow_b;
                *word = sum | (*word & !m);
            }
        }
        s.iter().map(|word| word.count_zeros() as usize).sum()
    }
}

/// Bit-parallel LCS length; always equals [`lcs_length`].
///
/// ```rust
/// use fuzzy_ratio::distance::{lcs_length, lcs_length_bitparallel};
///
/// let a: Vec<char> = "hello world".chars().collect();
/// let b: Vec<char> = "hello wold".chars().collect();
/// assert_eq!(lcs_length_bitparallel(&a, &b), 10);
/// assert_eq!(lcs_length_bitparallel(&a, &b), lcs_length(&a, &b));
/// ```
#[must_use]
pub fn lcs_length_bitparallel<T: Eq + Hash + Copy>(a: &[T], b: &[T]) -> usize {
    let (trimmed_a, trimmed_b) = trim_common(a, b);
    let affix = a.len() - trimmed_a.len();
    if trimmed_a.is_empty() || trimmed_b.is_empty() {
        return affix;
    }
    let (text, pattern) = longer_first(trimmed_a, trimmed_b);
    affix + PatternMatchVector::new(pattern).lcs(text)
}

/// Insertions plus deletions needed to turn `a` into `b`, i.e.
/// `len(a) + len(b) - 2 * lcs(a, b)`.
#[must_use]
pub fn indel_distance<T: Eq + Hash + Copy>(a: &[T], b: &[T]) -> NumEdits {
    a.len() + b.len() - 2 * lcs_length_bitparallel(a, b)
}

/// Indel distance bounded by `max`; `None` when it exceeds `max`.
///
/// The length difference is a lower bound on the distance and is checked
/// before any LCS work. A returned value always equals [`indel_distance`].
#[must_use]
pub fn indel_distance_with_max<T: Eq + Hash + Copy>(
    a: &[T],
    b: &[T],
    max: NumEdits,
) -> Option<NumEdits> {
    if a.len().abs_diff(b.len()) > max {
        return None;
    }
    let distance = indel_distance(a, b);
    (distance <= max).then_some(distance)
}

/// `1 - dist / max_dist`, with two empty inputs treated as identical.
#[inline]
#[must_use]
pub fn normalized_similarity(dist: NumEdits, max_dist: NumEdits) -> f64 {
    if max_dist == 0 {
        1.0
    } else {
        1.0 - dist as f64 / max_dist as f64
    }
}
