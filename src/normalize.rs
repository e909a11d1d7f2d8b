use std::borrow::Cow;
use std::fmt;
use std::sync::Arc;
use unicode_casefold::UnicodeCaseFold;
use unicode_segmentation::UnicodeSegmentation;

/// Signature of a caller-supplied processor.
pub type ProcessFn = Arc<dyn Fn(&str) -> String + Send + Sync>;

/// Canonical comparison form of `text`.
///
/// Applies full Unicode case folding to every word grapheme and collapses
/// each run of whitespace, punctuation or symbols into a single ASCII space;
/// separators at either end are dropped. Works on extended grapheme
/// clusters, so combining marks stay attached to the letter they modify.
/// Marks left without a base are dropped, since they would fuse with the
/// inserted space.
///
/// ```rust
/// use fuzzy_ratio::normalize;
///
/// assert_eq!(normalize("  Hello,   WORLD!! "), "hello world");
/// assert_eq!(normalize("신촌역 (2호선)"), "신촌역 2호선");
/// assert_eq!(normalize("Straße"), normalize("STRASSE"));
/// assert_eq!(normalize(&normalize("C++ / Rust")), normalize("C++ / Rust"));
/// ```
#[must_use]
pub fn normalize(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    let mut separated = false;
    for grapheme in text.graphemes(true) {
        match word_text(grapheme) {
            Some(word) => {
                if separated && !out.is_empty() {
                    out.push(' ');
                }
                separated = false;
                out.extend(word.chars().case_fold());
            }
            None => separated = true,
        }
    }
    out
}

/// Part of `grapheme` kept by [`normalize`]: everything from its first
/// alphanumeric char on, unless that part cannot stand as a cluster of its
/// own after a space.
fn word_text(grapheme: &str) -> Option<&str> {
    let start = grapheme.find(char::is_alphanumeric)?;
    let word = &grapheme[start..];
    (word.starts_with(|c: char| c.is_ascii()) || starts_cluster(word)).then_some(word)
}

fn starts_cluster(word: &str) -> bool {
    let mut spaced = String::with_capacity(word.len() + 1);
    spaced.push(' ');
    spaced.push_str(word);
    spaced.graphemes(true).next() == Some(" ")
}

/// Lower-cases `text`, replaces every non-alphanumeric char with a space and
/// trims both ends. Inner runs of spaces are kept as they are.
///
/// ```rust
/// use fuzzy_ratio::default_process;
///
/// assert_eq!(default_process("Hello, World!"), "hello  world");
/// ```
#[must_use]
pub fn default_process(text: &str) -> String {
    let processed: String = text
        .chars()
        .flat_map(char::to_lowercase)
        .map(|c| if c.is_alphanumeric() { c } else { ' ' })
        .collect();
    processed.trim().to_owned()
}

/// Text preprocessing applied before scoring.
#[derive(Clone)]
pub enum Processor {
    /// [`normalize`]
    Normalize,
    /// [`default_process`]
    DefaultProcess,
    Custom(ProcessFn),
}

impl Processor {
    pub fn custom<F>(f: F) -> Self
    where
        F: Fn(&str) -> String + Send + Sync + 'static,
    {
        Self::Custom(Arc::new(f))
    }

    #[must_use]
    pub fn apply(&self, text: &str) -> String {
        match self {
            Self::Normalize => normalize(text),
            Self::DefaultProcess => default_process(text),
            Self::Custom(f) => f(text),
        }
    }
}

impl fmt::Debug for Processor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Normalize => f.write_str("Normalize"),
            Self::DefaultProcess => f.write_str("DefaultProcess"),
            Self::Custom(_) => f.write_str("Custom(..)"),
        }
    }
}

/// Runs the optional processor, borrowing `text` when there is none.
pub(crate) fn preprocess<'a>(text: &'a str, processor: Option<&Processor>) -> Cow<'a, str> {
    match processor {
        Some(processor) => Cow::Owned(processor.apply(text)),
        None => Cow::Borrowed(text),
    }
}
