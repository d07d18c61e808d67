//! GRIM test (Granularity-Related Inconsistency of Means)
//!
//! For integer-valued underlying data (Likert items, counts) the true sum
//! of responses must be an integer, so `mean * n` can stray from an integer
//! by at most half the reported rounding granularity times n. A reported
//! mean that violates this bound cannot have been produced by any sample
//! of n integers.

use serde::Serialize;

use super::FLOAT_SLACK;

/// Result of a GRIM check
#[derive(Debug, Clone, Serialize)]
pub struct GrimResult {
    /// Reported mean
    pub mean: f64,
    /// Reported sample size, taken as-is
    pub n: i64,
    /// Decimal places the mean was reported to
    pub decimals: i64,
    pub is_consistent: bool,
    pub explanation: String,
}

/// One row of input for [`grim_batch`]
#[derive(Debug, Clone, Default)]
pub struct GrimEntry {
    pub mean: Option<f64>,
    pub n: Option<i64>,
    /// Decimal places; defaults to 2 when absent
    pub decimals: Option<i64>,
}

/// Check whether a reported mean is achievable for integer data of size `n`.
///
/// The reported mean, rounded to `decimals` places, bounds the true mean to
/// an interval of width `10^-decimals`; multiplying by `n` bounds `mean * n`
/// to within `n * 10^-decimals / 2` of the (integer) sum.
///
/// # Arguments
/// * `mean` - Reported mean
/// * `n` - Reported sample size
/// * `decimals` - Decimal places the mean was reported to (typically 2)
pub fn grim(mean: f64, n: i64, decimals: i64) -> GrimResult {
    if n <= 0 {
        return GrimResult {
            mean,
            n,
            decimals,
            is_consistent: false,
            explanation: "sample size must be positive".into(),
        };
    }

    let product = mean * n as f64;
    let granularity = 10f64.powi(-(decimals as i32));
    let tolerance = n as f64 * granularity / 2.0 + FLOAT_SLACK;
    let nearest = product.round();
    let diff = (product - nearest).abs();
    let is_consistent = diff <= tolerance;

    let explanation = if is_consistent {
        format!(
            "mean {mean} with n = {n} is consistent: {mean} x {n} = {product:.4} \
             lies within {tolerance:.4} of the integer sum {nearest:.0}"
        )
    } else {
        format!(
            "mean {mean} with n = {n} is impossible for integer data: \
             {mean} x {n} = {product:.4} is {diff:.4} away from the nearest \
             integer sum {nearest:.0} (tolerance {tolerance:.4})"
        )
    };

    GrimResult {
        mean,
        n,
        decimals,
        is_consistent,
        explanation,
    }
}

/// Apply [`grim`] to each entry independently.
///
/// Missing `mean`/`n` default to `0.0`/`0`, which lands in the
/// non-positive-n branch and deterministically reports the entry as
/// inconsistent instead of raising; missing `decimals` defaults to 2.
/// This fail-safe defaulting is intentional and should not be mistaken
/// for a parsing error.
pub fn grim_batch(entries: &[GrimEntry]) -> Vec<GrimResult> {
    entries
        .iter()
        .map(|e| {
            grim(
                e.mean.unwrap_or(0.0),
                e.n.unwrap_or(0),
                e.decimals.unwrap_or(2),
            )
        })
        .collect()
}
