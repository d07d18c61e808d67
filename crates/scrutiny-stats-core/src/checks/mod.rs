//! Numeric consistency checks over reported summary statistics
//!
//! - GRIM: can the reported mean arise from integer data of size n?
//! - GRIMMER: same question for standard deviations and percentages
//! - Benford: does the first-digit distribution look natural?
//! - P-value recalculation: does the reported p match the statistic?
//!
//! Every function here is a pure predicate over its inputs. Invalid
//! numeric inputs (non-positive n, negative sd) produce deterministic
//! "inconsistent" results with an explanation, never an error.

pub mod benford;
pub mod grim;
pub mod grimmer;
pub mod pvalue;

pub use benford::{benford, BenfordOptions, BenfordResult};
pub use grim::{grim, grim_batch, GrimEntry, GrimResult};
pub use grimmer::{grimmer_percent, grimmer_sd, GrimmerPercentResult, GrimmerSdResult};
pub use pvalue::{check_p_consistency, recalculate_p, PValueCheckResult, PValueOptions};

/// Slack added to rounding-interval comparisons so floating-point error in
/// `mean * n`-style products cannot flip a verdict at an exact boundary.
pub(crate) const FLOAT_SLACK: f64 = 1e-10;
