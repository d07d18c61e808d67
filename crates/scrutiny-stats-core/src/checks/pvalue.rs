//! P-value recalculation and consistency checking
//!
//! Recomputes the p-value implied by a reported test statistic and its
//! degrees of freedom, then compares it against the p-value the authors
//! reported. When the statistics backend cannot produce a value the check
//! fails open: "cannot verify" is deliberately mapped to consistent so the
//! engine never accuses a paper it could not actually check.

use serde::Serialize;

use crate::distributions::{wilson_hilferty_chi2, SurvivalFunctions};
use crate::types::{Df, TestType};

/// Options for p-value consistency checking
#[derive(Debug, Clone)]
pub struct PValueOptions {
    /// Maximum tolerated |reported - recalculated| difference
    pub threshold: f64,
}

impl Default for PValueOptions {
    fn default() -> Self {
        Self { threshold: 0.05 }
    }
}

/// Result of comparing a reported p-value against its recalculation
#[derive(Debug, Clone, Serialize)]
pub struct PValueCheckResult {
    pub test_type: TestType,
    pub reported_statistic: f64,
    pub reported_df: Df,
    pub reported_p: f64,
    /// Absent when the statistic could not be recalculated
    pub recalculated_p: Option<f64>,
    /// Zero when recalculation was impossible
    pub discrepancy: f64,
    /// True when the values agree, or when recalculation was impossible
    pub is_consistent: bool,
}

fn positive_single_df(df: Df) -> Option<f64> {
    match df {
        Df::Single(d) if d > 0 => Some(d as f64),
        _ => None,
    }
}

fn two_tailed_t(statistic: f64, df: f64, provider: Option<&dyn SurvivalFunctions>) -> Option<f64> {
    let tail = provider?.survival_t(statistic.abs(), df)?;
    Some(2.0 * tail)
}

/// Recompute the p-value implied by a reported statistic.
///
/// Returns `None` for df shapes a test family does not support (F without
/// a df pair, t with the Z/Q placeholder df) and when the backend declines
/// to answer. Chi-squared and Q fall back to the Wilson-Hilferty
/// approximation when no backend is injected at all.
pub fn recalculate_p(
    test_type: TestType,
    statistic: f64,
    df: Df,
    provider: Option<&dyn SurvivalFunctions>,
) -> Option<f64> {
    match test_type {
        TestType::T => {
            let d = positive_single_df(df)?;
            two_tailed_t(statistic, d, provider)
        }
        TestType::F => {
            let (d1, d2) = match df {
                Df::Pair(d1, d2) if d1 > 0 && d2 > 0 => (d1 as f64, d2 as f64),
                _ => return None,
            };
            provider?.survival_f(statistic, d1, d2)
        }
        TestType::ChiSquared | TestType::Q => {
            let d = positive_single_df(df)?;
            match provider {
                Some(backend) => backend.survival_chi2(statistic, d),
                None => Some(wilson_hilferty_chi2(statistic, d)),
            }
        }
        TestType::R => {
            // A correlation at or beyond |r| = 1 leaves no sampling
            // variability at all.
            if statistic.abs() >= 1.0 {
                return Some(0.0);
            }
            let d = positive_single_df(df)?;
            let t = statistic * d.sqrt() / (1.0 - statistic * statistic).sqrt();
            two_tailed_t(t, d, provider)
        }
        TestType::Z => {
            let tail = provider?.survival_normal(statistic.abs())?;
            Some(2.0 * tail)
        }
    }
}

/// Compare a reported p-value against its recalculation.
///
/// When [`recalculate_p`] yields a value, the report is consistent iff
/// the absolute difference stays within `options.threshold`. When it
/// yields `None` the check fails open: `is_consistent = true` with zero
/// discrepancy, trading recall for zero false accusations.
pub fn check_p_consistency(
    test_type: TestType,
    statistic: f64,
    df: Df,
    reported_p: f64,
    options: &PValueOptions,
    provider: Option<&dyn SurvivalFunctions>,
) -> PValueCheckResult {
    match recalculate_p(test_type, statistic, df, provider) {
        Some(recalculated) => {
            let discrepancy = (reported_p - recalculated).abs();
            PValueCheckResult {
                test_type,
                reported_statistic: statistic,
                reported_df: df,
                reported_p,
                recalculated_p: Some(recalculated),
                discrepancy,
                is_consistent: discrepancy <= options.threshold,
            }
        }
        None => PValueCheckResult {
            test_type,
            reported_statistic: statistic,
            reported_df: df,
            reported_p,
            recalculated_p: None,
            discrepancy: 0.0,
            is_consistent: true,
        },
    }
}
