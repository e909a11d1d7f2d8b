use thiserror::Error;

/// Errors reported by the batch matcher.
///
/// Pairwise scorers are total functions and never fail; only configuration
/// and caller-supplied scorers can put a call into an invalid state.
#[derive(Debug, Error, Clone, PartialEq)]
pub enum FuzzError {
    #[error("invalid input: custom scorer returned {score}, scores must lie within [0, 100]")]
    InvalidInput { score: f64 },

    #[error("invalid configuration: {0}")]
    Configuration(#[from] ConfigError),
}

/// Rejected [`ExtractOptions`](crate::ExtractOptions) values.
#[derive(Debug, Error, Clone, PartialEq)]
pub enum ConfigError {
    #[error("score_cutoff must lie within [0, 100], got {0}")]
    ScoreCutoff(f64),

    #[error("limit must be a positive number of results")]
    ZeroLimit,

    #[error("parallel_threshold must be positive")]
    ZeroParallelThreshold,
}

pub type Result<T, E = FuzzError> = std::result::Result<T, E>;
