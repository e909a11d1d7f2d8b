//! Batch matching of one query against a candidate collection.

use crate::normalize::preprocess;
use crate::ranking::rank;
use crate::structs::Candidate;
use crate::{ConfigError, Processor, Result, ScoreResult, Scorer};
use std::borrow::Cow;
use std::time::Instant;

#[cfg(feature = "parallel")]
use rayon::prelude::*;

/// Candidate count from which [`ExtractOptions::parallel`] switches to
/// multi-threaded scoring.
pub const DEFAULT_PARALLEL_THRESHOLD: usize = 1024;

/// Duplicate threshold of [`dedupe`] while `score_cutoff` is left at `0`.
pub const DEFAULT_DEDUPE_THRESHOLD: f64 = 90.0;

/// Per-call configuration of the batch matcher.
///
/// ```rust
/// use fuzzy_ratio::{ExtractOptions, Processor, Scorer};
///
/// let options = ExtractOptions::new()
///     .scorer(Scorer::PartialRatio)
///     .processor(Processor::Normalize)
///     .score_cutoff(80.0)
///     .limit(5);
/// assert!(options.validate().is_ok());
/// ```
#[derive(Debug, Clone)]
pub struct ExtractOptions {
    pub scorer: Scorer,
    /// Applied once to the query and once to every candidate.
    pub processor: Option<Processor>,
    /// Results scoring strictly below this value are dropped.
    pub score_cutoff: f64,
    /// Maximum number of results; `None` keeps every qualifying candidate.
    pub limit: Option<usize>,
    /// Score candidates on the rayon pool once there are at least this many.
    /// Ignored without the `parallel` feature.
    pub parallel_threshold: Option<usize>,
}

impl Default for ExtractOptions {
    fn default() -> Self {
        Self {
            scorer: Scorer::default(),
            processor: None,
            score_cutoff: 0.0,
            limit: None,
            parallel_threshold: None,
        }
    }
}

impl ExtractOptions {
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn scorer(mut self, scorer: Scorer) -> Self {
        self.scorer = scorer;
        self
    }

    #[must_use]
    pub fn processor(mut self, processor: Processor) -> Self {
        self.processor = Some(processor);
        self
    }

    #[must_use]
    pub fn score_cutoff(mut self, score_cutoff: f64) -> Self {
        self.score_cutoff = score_cutoff;
        self
    }

    #[must_use]
    pub fn limit(mut self, limit: usize) -> Self {
        self.limit = Some(limit);
        self
    }

    /// Enables multi-threaded scoring for collections of at least
    /// [`DEFAULT_PARALLEL_THRESHOLD`] candidates.
    #[must_use]
    pub fn parallel(mut self, enabled: bool) -> Self {
        self.parallel_threshold = enabled.then_some(DEFAULT_PARALLEL_THRESHOLD);
        self
    }

    #[must_use]
    pub fn parallel_threshold(mut self, threshold: usize) -> Self {
        self.parallel_threshold = Some(threshold);
        self
    }

    /// Checks the options before any scoring happens.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if !(0.0..=100.0).contains(&self.score_cutoff) {
            trace!("rejecting score_cutoff {}", self.score_cutoff);
            return Err(ConfigError::ScoreCutoff(self.score_cutoff));
        }
        if self.limit == Some(0) {
            trace!("rejecting zero limit");
            return Err(ConfigError::ZeroLimit);
        }
        if self.parallel_threshold == Some(0) {
            trace!("rejecting zero parallel_threshold");
            return Err(ConfigError::ZeroParallelThreshold);
        }
        Ok(())
    }
}

/// Runs `f` for every slot `0..count`, on the rayon pool when the threshold
/// is reached. Output order always follows slot order.
#[cfg(feature = "parallel")]
fn run_slots<T, F>(count: usize, parallel_threshold: Option<usize>, f: F) -> Result<Vec<T>>
where
    T: Send,
    F: Fn(usize) -> Result<T> + Send + Sync,
{
    if parallel_threshold.is_some_and(|threshold| count >= threshold) {
        trace!("scoring {count} slots on the rayon pool");
        (0..count).into_par_iter().map(f).collect()
    } else {
        (0..count).map(f).collect()
    }
}

#[cfg(not(feature = "parallel"))]
fn run_slots<T, F>(count: usize, _parallel_threshold: Option<usize>, f: F) -> Result<Vec<T>>
where
    T: Send,
    F: Fn(usize) -> Result<T> + Send + Sync,
{
    (0..count).map(f).collect()
}

/// Scores `count` candidates against an already processed query, then
/// filters by the cutoff and ranks.
pub(crate) fn extract_candidates<'c, F>(
    query: &str,
    count: usize,
    options: &ExtractOptions,
    candidate: F,
) -> Result<Vec<ScoreResult>>
where
    F: Fn(usize) -> Candidate<'c> + Send + Sync,
{
    let started = Instant::now();
    let slots = run_slots(count, options.parallel_threshold, |index| {
        let candidate = candidate(index);
        let score = options
            .scorer
            .try_score(query, &candidate.processed, options.score_cutoff)?;
        Ok((score >= options.score_cutoff).then(|| candidate.into_result(score)))
    })?;
    let results = rank(slots.into_iter().flatten().collect(), options.limit);
    debug!(
        "{} scored {count} candidates, returning {} in {:?}",
        options.scorer.name(),
        results.len(),
        started.elapsed()
    );
    Ok(results)
}

/// Best candidate for an already processed query.
///
/// Runs sequentially and raises the cutoff to the best score found so far,
/// so weaker candidates are abandoned early. Ties keep the earlier index.
pub(crate) fn extract_one_candidate<'c, F>(
    query: &str,
    count: usize,
    options: &ExtractOptions,
    candidate: F,
) -> Result<Option<ScoreResult>>
where
    F: Fn(usize) -> Candidate<'c>,
{
    let mut best: Option<ScoreResult> = None;
    let mut threshold = options.score_cutoff;
    for index in 0..count {
        let candidate = candidate(index);
        let score = options
            .scorer
            .try_score(query, &candidate.processed, threshold)?;
        if score < threshold || best.as_ref().is_some_and(|b| score <= b.score) {
            continue;
        }
        threshold = score;
        best = Some(candidate.into_result(score));
        if score >= 100.0 {
            break;
        }
    }
    Ok(best)
}

fn candidate_at<'c, S: AsRef<str>>(
    choices: &'c [S],
    processor: Option<&Processor>,
    index: usize,
) -> Candidate<'c> {
    let choice = choices[index].as_ref();
    Candidate {
        choice,
        processed: preprocess(choice, processor),
        index,
    }
}

/// Ranks `choices` against `query`.
///
/// The processor, if any, runs once on the query and once per choice.
/// Results below `score_cutoff` are dropped, the rest are ordered by score
/// (descending) and index (ascending) and truncated to `limit`.
///
/// ```rust
/// use fuzzy_ratio::{extract, ExtractOptions, Scorer};
///
/// let products = ["아이폰 13 프로", "갤럭시 S22 울트라", "아이폰 12", "갤럭시 S21"];
/// let options = ExtractOptions::new().scorer(Scorer::PartialRatio).limit(2);
/// let results = extract("아이폰", &products, &options).unwrap();
/// assert_eq!(results.iter().map(|r| r.index).collect::<Vec<_>>(), vec![0, 2]);
/// ```
pub fn extract<S>(query: &str, choices: &[S], options: &ExtractOptions) -> Result<Vec<ScoreResult>>
where
    S: AsRef<str> + Sync,
{
    options.validate()?;
    let processor = options.processor.as_ref();
    let query = preprocess(query, processor);
    extract_candidates(&query, choices.len(), options, |index| {
        candidate_at(choices, processor, index)
    })
}

/// The single best match, or `None` when nothing reaches `score_cutoff`.
///
/// Always equal to the first element of [`extract`] with the same options;
/// `limit` and `parallel_threshold` are ignored.
pub fn extract_one<S>(
    query: &str,
    choices: &[S],
    options: &ExtractOptions,
) -> Result<Option<ScoreResult>>
where
    S: AsRef<str>,
{
    options.validate()?;
    let processor = options.processor.as_ref();
    let query = preprocess(query, processor);
    extract_one_candidate(&query, choices.len(), options, |index| {
        candidate_at(choices, processor, index)
    })
}

/// Score matrix of every query against every choice; `matrix[q][c]`.
///
/// Scores below `score_cutoff` are reported as `0.0`. Each choice is
/// processed once for the whole matrix; `limit` is ignored.
pub fn cdist<Q, S>(queries: &[Q], choices: &[S], options: &ExtractOptions) -> Result<Vec<Vec<f64>>>
where
    Q: AsRef<str> + Sync,
    S: AsRef<str> + Sync,
{
    options.validate()?;
    let processor = options.processor.as_ref();
    let processed: Vec<Cow<'_, str>> = choices
        .iter()
        .map(|choice| preprocess(choice.as_ref(), processor))
        .collect();
    let started = Instant::now();
    let matrix = run_slots(queries.len(), options.parallel_threshold, |row| {
        let query = preprocess(queries[row].as_ref(), processor);
        processed
            .iter()
            .map(|choice| {
                options
                    .scorer
                    .try_score(&query, choice, options.score_cutoff)
            })
            .collect::<Result<Vec<f64>>>()
    })?;
    debug!(
        "{} scored a {}x{} matrix in {:?}",
        options.scorer.name(),
        queries.len(),
        choices.len(),
        started.elapsed()
    );
    Ok(matrix)
}

/// Order-preserving near-duplicate removal.
///
/// Each entry is scored as the query against the entries kept so far; it
/// is dropped when any of them reaches the threshold, otherwise kept. The
/// threshold is `score_cutoff`, or [`DEFAULT_DEDUPE_THRESHOLD`] when the
/// cutoff is `0` (a zero threshold would make every entry a duplicate of
/// the first).
///
/// ```rust
/// use fuzzy_ratio::{dedupe, ExtractOptions, Scorer};
///
/// let stations = ["신촌역", "신촌 역", "신촌역 (2호선)", "홍대입구역", "홍대 입구"];
/// let options = ExtractOptions::new().scorer(Scorer::PartialRatio).score_cutoff(90.0);
/// let unique = dedupe(&stations, &options).unwrap();
/// assert_eq!(unique, vec!["신촌역", "신촌 역", "홍대입구역", "홍대 입구"]);
/// ```
pub fn dedupe<S>(entries: &[S], options: &ExtractOptions) -> Result<Vec<String>>
where
    S: AsRef<str>,
{
    options.validate()?;
    let threshold = if options.score_cutoff > 0.0 {
        options.score_cutoff
    } else {
        DEFAULT_DEDUPE_THRESHOLD
    };
    let processor = options.processor.as_ref();
    let mut kept: Vec<String> = Vec::new();
    let mut kept_processed: Vec<Cow<'_, str>> = Vec::new();
    for entry in entries {
        let entry = entry.as_ref();
        let processed = preprocess(entry, processor);
        let mut duplicate_of = None;
        for (original, choice) in kept.iter().zip(&kept_processed) {
            let score = options.scorer.try_score(&processed, choice, threshold)?;
            if score >= threshold {
                duplicate_of = Some((original, score));
                break;
            }
        }
        match duplicate_of {
            Some((original, score)) => trace!("{entry:?} duplicates {original:?} ({score:.2})"),
            None => {
                kept.push(entry.to_owned());
                kept_processed.push(processed);
            }
        }
    }
    debug!(
        "dedupe kept {} of {} entries at threshold {threshold}",
        kept.len(),
        entries.len()
    );
    Ok(kept)
}
