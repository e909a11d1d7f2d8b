use crate::CandidateIndex;
use std::borrow::Cow;

pub type NumEdits = usize;

/// Edit operations needed to turn the first sequence into the second, as
/// reported by [`levenshtein_alignment`](crate::distance::levenshtein_alignment).
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Alignment {
    /// Units present only in the second sequence.
    pub insertions: NumEdits,
    /// Units present only in the first sequence.
    pub deletions: NumEdits,
    pub substitutions: NumEdits,
}

impl Alignment {
    /// Unit-cost Levenshtein distance of this alignment.
    #[must_use]
    pub fn distance(&self) -> NumEdits {
        self.insertions + self.deletions + self.substitutions
    }

    /// Indel distance of this alignment: a substitution is a deletion plus an
    /// insertion.
    #[must_use]
    pub fn indel_distance(&self) -> NumEdits {
        self.insertions + self.deletions + 2 * self.substitutions
    }
}

/// Window selected by [`partial_ratio_alignment`](crate::fuzz::partial_ratio_alignment).
///
/// `src_*` offsets index the first argument and `dest_*` offsets the second,
/// both counted in `char`s.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ScoreAlignment {
    /// Score ∈ `[0,100]` of the best window.
    pub score: f64,
    pub src_start: usize,
    pub src_end: usize,
    pub dest_start: usize,
    pub dest_end: usize,
}

/// Result returned by [`extract`](crate::extract) and friends.
#[derive(Debug, Clone, PartialEq)]
pub struct ScoreResult {
    /// Candidate as it was supplied, before any processor ran.
    pub choice: String,
    /// Similarity score ∈ `[0,100]`.
    pub score: f64,
    /// Position of the candidate in the caller's collection.
    pub index: CandidateIndex,
}

/// A candidate paired with its stable index and the text the scorer sees.
#[derive(Debug, Clone)]
pub(crate) struct Candidate<'a> {
    pub(crate) choice: &'a str,
    pub(crate) processed: Cow<'a, str>,
    pub(crate) index: CandidateIndex,
}

impl<'a> Candidate<'a> {
    pub(crate) fn into_result(self, score: f64) -> ScoreResult {
        ScoreResult {
            choice: self.choice.to_owned(),
            score,
            index: self.index,
        }
    }
}
