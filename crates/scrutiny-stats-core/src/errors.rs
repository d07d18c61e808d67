use thiserror::Error;

/// Errors that can occur while interpreting extracted statistical reports
///
/// Business outcomes (an impossible mean, a misreported p-value) are never
/// errors; they are ordinary result values with `is_consistent` flags. This
/// enum covers only the internal seams where a matched capture turns out to
/// be uninterpretable, in which case the candidate is skipped.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum StatsError {
    #[error("Unrecognized test label: {0}")]
    UnknownTestType(String),

    #[error("Unparseable {field} in matched report: {text}")]
    InvalidNumber { field: &'static str, text: String },
}

/// Result type for fallible extraction internals
pub type StatsResult<T> = Result<T, StatsError>;
