use crate::normalize::preprocess;
use crate::process::{extract_candidates, extract_one_candidate};
use crate::structs::Candidate;
use crate::{ExtractOptions, Processor, Result, ScoreResult, Scorer};
use std::borrow::Cow;
use std::fmt;

/// Builder for [`Extractor`].
///
/// ```rust
/// use fuzzy_ratio::{ExtractorBuilder, Processor, Scorer};
///
/// let extractor = ExtractorBuilder::new()
///     .scorer(Scorer::Ratio)
///     .processor(Processor::DefaultProcess)
///     .build(["Hello World", "Goodbye World"])
///     .unwrap();
///
/// let best = extractor.extract_one("hello world").unwrap().unwrap();
/// assert_eq!((best.choice.as_str(), best.score, best.index), ("Hello World", 100.0, 0));
/// ```
#[derive(Debug, Default)]
pub struct ExtractorBuilder {
    options: ExtractOptions,
}

impl ExtractorBuilder {
    /// Starts from [`ExtractOptions::default`]: weighted ratio, no processor,
    /// no cutoff, no limit.
    #[must_use]
    pub fn new() -> Self {
        Self {
            options: ExtractOptions::default(),
        }
    }

    /// Starts from a ready-made set of options.
    #[must_use]
    pub fn with_options(options: ExtractOptions) -> Self {
        Self { options }
    }

    #[must_use]
    pub fn scorer(mut self, scorer: Scorer) -> Self {
        self.options.scorer = scorer;
        self
    }

    /// Processor run once per choice at build time and once per query.
    #[must_use]
    pub fn processor(mut self, processor: Processor) -> Self {
        self.options.processor = Some(processor);
        self
    }

    #[must_use]
    pub fn score_cutoff(mut self, score_cutoff: f64) -> Self {
        self.options.score_cutoff = score_cutoff;
        self
    }

    #[must_use]
    pub fn limit(mut self, limit: usize) -> Self {
        self.options.limit = Some(limit);
        self
    }

    #[must_use]
    pub fn parallel(mut self, enabled: bool) -> Self {
        self.options = self.options.parallel(enabled);
        self
    }

    /// Validates the options and pre-processes every choice.
    pub fn build<T>(self, choices: impl IntoIterator<Item = T>) -> Result<Extractor>
    where
        T: Into<String>,
    {
        self.options.validate()?;
        let choices: Vec<String> = choices.into_iter().map(Into::into).collect();
        let processed = self
            .options
            .processor
            .as_ref()
            .map(|processor| choices.iter().map(|c| processor.apply(c)).collect());
        debug!(
            "built extractor over {} choices (processor: {:?})",
            choices.len(),
            self.options.processor
        );
        Ok(Extractor {
            choices,
            processed,
            options: self.options,
        })
    }
}

/// A candidate collection prepared once and queried many times.
///
/// Processed forms of the choices are kept alongside the originals, so a
/// query only pays for processing itself. The cache belongs to the caller;
/// nothing is shared between extractors.
pub struct Extractor {
    choices: Vec<String>,
    /// Present only when a processor is configured.
    processed: Option<Vec<String>>,
    options: ExtractOptions,
}

impl fmt::Debug for Extractor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Extractor")
            .field("choices", &self.choices.len())
            .field("options", &self.options)
            .finish()
    }
}

impl Extractor {
    #[inline]
    fn candidate(&self, index: usize) -> Candidate<'_> {
        let choice = self.choices[index].as_str();
        let processed = match &self.processed {
            Some(processed) => processed[index].as_str(),
            None => choice,
        };
        Candidate {
            choice,
            processed: Cow::Borrowed(processed),
            index,
        }
    }

    /// Ranked matches for `query`; see [`extract`](crate::extract).
    pub fn extract(&self, query: &str) -> Result<Vec<ScoreResult>> {
        let query = preprocess(query, self.options.processor.as_ref());
        extract_candidates(&query, self.choices.len(), &self.options, |index| {
            self.candidate(index)
        })
    }

    /// Best match for `query`; see [`extract_one`](crate::extract_one).
    pub fn extract_one(&self, query: &str) -> Result<Option<ScoreResult>> {
        let query = preprocess(query, self.options.processor.as_ref());
        extract_one_candidate(&query, self.choices.len(), &self.options, |index| {
            self.candidate(index)
        })
    }

    #[must_use]
    pub fn choices(&self) -> &[String] {
        &self.choices
    }

    #[must_use]
    pub fn options(&self) -> &ExtractOptions {
        &self.options
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.choices.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.choices.is_empty()
    }
}
