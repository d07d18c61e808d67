//! GRIMMER tests for standard deviations and percentages
//!
//! Extends the GRIM idea past means: for integer data the sum of squared
//! deviations (SSD) must be an integer, and a reported percentage of n
//! respondents must correspond to an integer count.

use serde::Serialize;

use super::FLOAT_SLACK;

/// Result of a GRIMMER standard-deviation check
#[derive(Debug, Clone, Serialize)]
pub struct GrimmerSdResult {
    pub sd: f64,
    pub n: i64,
    pub decimals: i64,
    pub is_consistent: bool,
    pub explanation: String,
}

/// Result of a GRIMMER percentage check
#[derive(Debug, Clone, Serialize)]
pub struct GrimmerPercentResult {
    /// Reported percentage on the 0-100 scale
    pub percentage: f64,
    pub n: i64,
    pub decimals: i64,
    pub is_consistent: bool,
    pub explanation: String,
}

/// Check whether a reported standard deviation is achievable for integer
/// data of size `n`.
///
/// The reported sd bounds the true sd to `sd ± 10^-decimals / 2`; squaring
/// and scaling by `n - 1` turns that into an interval of possible SSD
/// values, which must contain an integer.
pub fn grimmer_sd(sd: f64, n: i64, decimals: i64) -> GrimmerSdResult {
    if n <= 1 {
        return GrimmerSdResult {
            sd,
            n,
            decimals,
            is_consistent: false,
            explanation: "a standard deviation requires at least two observations".into(),
        };
    }
    if sd < 0.0 {
        return GrimmerSdResult {
            sd,
            n,
            decimals,
            is_consistent: false,
            explanation: "standard deviation cannot be negative".into(),
        };
    }
    if sd == 0.0 {
        return GrimmerSdResult {
            sd,
            n,
            decimals,
            is_consistent: true,
            explanation: "a zero standard deviation is always achievable (all values equal)".into(),
        };
    }

    let granularity = 10f64.powi(-(decimals as i32));
    let sd_lo = sd - granularity / 2.0;
    let sd_hi = sd + granularity / 2.0;
    let ssd_lo = sd_lo.max(0.0).powi(2) * (n - 1) as f64;
    let ssd_hi = sd_hi.powi(2) * (n - 1) as f64;

    let lowest_integer = (ssd_lo - FLOAT_SLACK).ceil();
    let highest_integer = (ssd_hi + FLOAT_SLACK).floor();
    let is_consistent = lowest_integer <= highest_integer;

    let explanation = if is_consistent {
        format!(
            "sd {sd} with n = {n} is consistent: the sum of squared deviations \
             range [{ssd_lo:.4}, {ssd_hi:.4}] contains the integer {lowest_integer:.0}"
        )
    } else {
        format!(
            "sd {sd} with n = {n} is impossible for integer data: the sum of \
             squared deviations range [{ssd_lo:.4}, {ssd_hi:.4}] contains no integer"
        )
    };

    GrimmerSdResult {
        sd,
        n,
        decimals,
        is_consistent,
        explanation,
    }
}

/// Check whether a reported percentage of `n` respondents corresponds to an
/// integer count.
///
/// `pct * n / 100` must land within the rounding tolerance of an integer;
/// the percentage scale divides the usual GRIM tolerance by a further
/// factor of 100.
pub fn grimmer_percent(pct: f64, n: i64, decimals: i64) -> GrimmerPercentResult {
    if n <= 0 {
        return GrimmerPercentResult {
            percentage: pct,
            n,
            decimals,
            is_consistent: false,
            explanation: "sample size must be positive".into(),
        };
    }

    let product = pct * n as f64 / 100.0;
    let granularity = 10f64.powi(-(decimals as i32));
    let tolerance = n as f64 * granularity / 200.0;
    let nearest = product.round();
    let diff = (product - nearest).abs();
    let is_consistent = diff <= tolerance + FLOAT_SLACK;

    let explanation = if is_consistent {
        format!(
            "{pct}% of n = {n} is consistent: it corresponds to {product:.4} cases, \
             within {tolerance:.4} of the count {nearest:.0}"
        )
    } else {
        format!(
            "{pct}% of n = {n} does not correspond to a whole number of cases: \
             {product:.4} is {diff:.4} away from {nearest:.0} (tolerance {tolerance:.4})"
        )
    };

    GrimmerPercentResult {
        percentage: pct,
        n,
        decimals,
        is_consistent,
        explanation,
    }
}
