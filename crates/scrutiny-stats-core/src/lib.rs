//! scrutiny-stats-core: statistical integrity checks for manuscript auditing
//!
//! This crate is the deterministic core of the manuscript audit pipeline.
//! It scans free text for APA-style statistical reports and SD/percentage
//! reports, then runs four independent mathematical consistency tests
//! against them:
//!
//! - GRIM: is the reported mean achievable for integer data of size n?
//! - GRIMMER: the same question for standard deviations and percentages
//! - Benford: does a number set follow the expected first-digit law?
//! - P-value recalculation: does the reported p match its test statistic?
//!
//! Every operation is a pure function with no I/O, no network, and no
//! state across calls; inconsistencies come back as [`Finding`] values for
//! the caller to merge, re-weight, and persist. Obtaining manuscript text
//! and judging whether a flagged report is a genuine problem are upstream
//! concerns.

pub mod audit;
pub mod checks;
pub mod distributions;
pub mod errors;
pub mod extract;
pub mod types;

pub use audit::{check_benford, extract_and_check_grimmer, extract_and_check_stats};
pub use checks::{
    benford, check_p_consistency, grim, grim_batch, grimmer_percent, grimmer_sd, recalculate_p,
    BenfordOptions, BenfordResult, GrimEntry, GrimResult, GrimmerPercentResult, GrimmerSdResult,
    PValueCheckResult, PValueOptions,
};
pub use distributions::{wilson_hilferty_chi2, StatrsSurvival, SurvivalFunctions};
pub use errors::{StatsError, StatsResult};
pub use extract::{
    extract_percent_candidates, extract_sd_candidates, extract_stat_candidates, PercentCandidate,
    SdCandidate, StatCandidate,
};
pub use types::{CheckOutcome, Df, Finding, TestType};
