//! Benford's-Law first-digit analysis
//!
//! In many naturally occurring numeric datasets the leading significant
//! digit d appears with probability log10(1 + 1/d). Fabricated numbers
//! tend to violate that distribution; a chi-squared goodness-of-fit test
//! over the nine digit bins quantifies the deviation.

use serde::Serialize;

use crate::distributions::{wilson_hilferty_chi2, StatrsSurvival, SurvivalFunctions};

/// Significance level for declaring a digit distribution anomalous
const ANOMALY_ALPHA: f64 = 0.05;

/// Values closer to zero than this carry no leading digit
const MIN_MAGNITUDE: f64 = 1e-10;

/// 9 digit categories minus 1
const DEGREES_OF_FREEDOM: f64 = 8.0;

/// Options for Benford analysis
#[derive(Debug, Clone)]
pub struct BenfordOptions {
    /// Minimum number of usable values before the test is attempted;
    /// below this the result reports no anomaly and no statistic.
    pub min_values: usize,
}

impl Default for BenfordOptions {
    fn default() -> Self {
        Self { min_values: 50 }
    }
}

/// Result of a Benford first-digit analysis
#[derive(Debug, Clone, Serialize)]
pub struct BenfordResult {
    /// Count of values that survived filtering and yielded a digit
    pub n_values: usize,
    /// Chi-squared statistic; absent below `min_values`
    pub chi_squared: Option<f64>,
    /// Upper-tail probability of the statistic; absent below `min_values`
    pub p_value: Option<f64>,
    pub is_anomalous: bool,
    /// Observed proportions for digits 1..=9
    pub digit_distribution: Vec<f64>,
    /// Benford expectations log10(1 + 1/d) for digits 1..=9
    pub expected_distribution: Vec<f64>,
}

/// Leading significant decimal digit of a value.
///
/// Scans the plain-decimal text form of `|value|`, skipping zeros and the
/// decimal point. Rust's `f64` Display never emits exponential notation,
/// so the first digit character found is the leading significant digit;
/// NaN and infinities yield no digit.
fn leading_digit(value: f64) -> Option<u32> {
    let text = value.abs().to_string();
    for ch in text.chars() {
        match ch {
            '0' | '.' => continue,
            d if d.is_ascii_digit() => return d.to_digit(10),
            _ => return None,
        }
    }
    None
}

/// Test a sequence of values against Benford's first-digit law.
///
/// Values with magnitude below 1e-10 are dropped. If fewer than
/// `options.min_values` usable values remain, the result carries no
/// statistic and `is_anomalous` is false: too little data is an
/// insufficient-data outcome, not evidence of conformity. Otherwise the
/// chi-squared statistic over the nine digit bins (8 df) is converted to
/// a p-value and the distribution is anomalous when p < 0.05.
pub fn benford(values: &[f64], options: &BenfordOptions) -> BenfordResult {
    let digits: Vec<u32> = values
        .iter()
        .filter(|v| v.abs() >= MIN_MAGNITUDE)
        .filter_map(|v| leading_digit(*v))
        .collect();
    let n = digits.len();

    let expected: Vec<f64> = (1..=9u32)
        .map(|d| (1.0 + 1.0 / d as f64).log10())
        .collect();

    let mut counts = [0usize; 9];
    for d in &digits {
        counts[(*d - 1) as usize] += 1;
    }
    let observed: Vec<f64> = if n == 0 {
        vec![0.0; 9]
    } else {
        counts.iter().map(|c| *c as f64 / n as f64).collect()
    };

    if n < options.min_values {
        return BenfordResult {
            n_values: n,
            chi_squared: None,
            p_value: None,
            is_anomalous: false,
            digit_distribution: observed,
            expected_distribution: expected,
        };
    }

    let chi_squared: f64 = counts
        .iter()
        .zip(&expected)
        .map(|(count, proportion)| {
            let expected_count = proportion * n as f64;
            let diff = *count as f64 - expected_count;
            diff * diff / expected_count
        })
        .sum();

    let p_value = StatrsSurvival
        .survival_chi2(chi_squared, DEGREES_OF_FREEDOM)
        .unwrap_or_else(|| wilson_hilferty_chi2(chi_squared, DEGREES_OF_FREEDOM));

    BenfordResult {
        n_values: n,
        chi_squared: Some(chi_squared),
        p_value: Some(p_value),
        is_anomalous: p_value < ANOMALY_ALPHA,
        digit_distribution: observed,
        expected_distribution: expected,
    }
}
