//! Fuzzy string matching: edit-distance ratios, partial alignment scoring
//! and top-K extraction from candidate collections.
//!
//! ```rust
//! use fuzzy_ratio::{extract, fuzz, ExtractOptions};
//!
//! assert_eq!(fuzz::partial_ratio("hello world", "world"), 100.0);
//!
//! let choices = ["python programming", "java programming", "c++ programming", "javascript"];
//! let options = ExtractOptions::new().limit(choices.len());
//! let ranked = extract("pythn programing", &choices, &options).unwrap();
//! assert_eq!(ranked[0].choice, "python programming");
//! ```
//!
//! ## Features
//!
//! * `parallel` (default) – score large candidate collections on the rayon
//!   pool, see [`ExtractOptions::parallel`].

#[macro_use]
extern crate log;

mod builder;
pub mod distance;
mod error;
pub mod fuzz;
mod normalize;
pub mod process;
mod ranking;
mod structs;

pub use builder::{Extractor, ExtractorBuilder};
pub use error::{ConfigError, FuzzError, Result};
pub use fuzz::{ScoreFn, Scorer};
pub use normalize::{ProcessFn, Processor, default_process, normalize};
pub use process::{ExtractOptions, cdist, dedupe, extract, extract_one};
pub use structs::*;

/// Position of a candidate in the caller's collection.
pub type CandidateIndex = usize;
