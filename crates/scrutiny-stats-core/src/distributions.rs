//! Survival functions for the distributions behind p-value recalculation.
//!
//! The statistics backend is an injectable capability: checkers ask for
//! `P(X > x)` through the [`SurvivalFunctions`] trait and must tolerate the
//! backend declining to answer (`None`). [`StatrsSurvival`] is the default
//! exact backend; [`wilson_hilferty_chi2`] is the built-in approximation
//! used for chi-squared tails when no backend is available at all.

use statrs::distribution::{ChiSquared, ContinuousCDF, FisherSnedecor, Normal, StudentsT};
use statrs::function::erf::erfc;

/// Upper-tail probabilities `P(X > x)` for the distributions the engine
/// recalculates p-values from.
///
/// Implementations return `None` for parameter combinations they cannot
/// evaluate (non-positive df, unsupported distribution); callers map that
/// to the fail-open "cannot verify" outcome rather than an error.
pub trait SurvivalFunctions: Send + Sync {
    /// `P(T > x)` for Student-t with `df` degrees of freedom
    fn survival_t(&self, x: f64, df: f64) -> Option<f64>;

    /// `P(F > x)` for Fisher-Snedecor F with `(df1, df2)` degrees of freedom
    fn survival_f(&self, x: f64, df1: f64, df2: f64) -> Option<f64>;

    /// `P(X > x)` for chi-squared with `df` degrees of freedom
    fn survival_chi2(&self, x: f64, df: f64) -> Option<f64>;

    /// `P(Z > x)` for the standard normal
    fn survival_normal(&self, x: f64) -> Option<f64>;
}

/// Exact survival functions backed by statrs
#[derive(Debug, Default, Clone, Copy)]
pub struct StatrsSurvival;

impl SurvivalFunctions for StatrsSurvival {
    fn survival_t(&self, x: f64, df: f64) -> Option<f64> {
        let dist = StudentsT::new(0.0, 1.0, df).ok()?;
        Some(1.0 - dist.cdf(x))
    }

    fn survival_f(&self, x: f64, df1: f64, df2: f64) -> Option<f64> {
        let dist = FisherSnedecor::new(df1, df2).ok()?;
        Some(1.0 - dist.cdf(x))
    }

    fn survival_chi2(&self, x: f64, df: f64) -> Option<f64> {
        let dist = ChiSquared::new(df).ok()?;
        Some(1.0 - dist.cdf(x))
    }

    fn survival_normal(&self, x: f64) -> Option<f64> {
        let dist = Normal::new(0.0, 1.0).ok()?;
        Some(1.0 - dist.cdf(x))
    }
}

/// Wilson-Hilferty cube-root normal approximation to the chi-squared
/// survival function.
///
/// `(X/df)^(1/3)` is approximately normal with mean `1 - 2/(9 df)` and
/// variance `2/(9 df)`; the standardized value is clamped to `[-6, 6]`
/// (beyond that the tail probability saturates). Non-positive `x` or `df`
/// yields 1.0.
pub fn wilson_hilferty_chi2(x: f64, df: f64) -> f64 {
    if x <= 0.0 || df <= 0.0 {
        return 1.0;
    }
    let variance = 2.0 / (9.0 * df);
    let z = ((x / df).powf(1.0 / 3.0) - (1.0 - variance)) / variance.sqrt();
    if z < -6.0 {
        return 1.0;
    }
    if z > 6.0 {
        return 0.0;
    }
    0.5 * erfc(z / std::f64::consts::SQRT_2)
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;

    #[test]
    fn test_statrs_survival_t_two_tailed_reference() {
        // t(28) = 2.05 is the textbook p = .05 boundary
        let p = 2.0 * StatrsSurvival.survival_t(2.05, 28.0).unwrap();
        assert_abs_diff_eq!(p, 0.0499, epsilon = 1e-3);
    }

    #[test]
    fn test_statrs_survival_chi2_reference() {
        // chi2 critical value at alpha = .05 with 1 df is 3.841
        let p = StatrsSurvival.survival_chi2(3.841, 1.0).unwrap();
        assert_abs_diff_eq!(p, 0.05, epsilon = 1e-3);
    }

    #[test]
    fn test_statrs_survival_normal_reference() {
        let p = StatrsSurvival.survival_normal(1.96).unwrap();
        assert_abs_diff_eq!(p, 0.025, epsilon = 1e-3);
    }

    #[test]
    fn test_statrs_rejects_bad_parameters() {
        assert!(StatrsSurvival.survival_t(1.0, 0.0).is_none());
        assert!(StatrsSurvival.survival_chi2(1.0, -2.0).is_none());
        assert!(StatrsSurvival.survival_f(1.0, 0.0, 10.0).is_none());
    }

    #[test]
    fn test_wilson_hilferty_guards() {
        assert_eq!(wilson_hilferty_chi2(0.0, 8.0), 1.0);
        assert_eq!(wilson_hilferty_chi2(-1.0, 8.0), 1.0);
        assert_eq!(wilson_hilferty_chi2(5.0, 0.0), 1.0);
        // Far into the upper tail the clamp saturates to zero
        assert_eq!(wilson_hilferty_chi2(1000.0, 2.0), 0.0);
    }

    #[test]
    fn test_wilson_hilferty_tracks_exact_values() {
        for &(x, df) in &[(3.84, 1.0), (8.0, 8.0), (15.51, 8.0), (20.0, 10.0)] {
            let exact = StatrsSurvival.survival_chi2(x, df).unwrap();
            let approx_p = wilson_hilferty_chi2(x, df);
            assert_abs_diff_eq!(approx_p, exact, epsilon = 5e-3);
        }
    }

    #[test]
    fn test_wilson_hilferty_is_monotone_in_x() {
        let mut prev = 1.0;
        for i in 1..50 {
            let p = wilson_hilferty_chi2(i as f64, 8.0);
            assert!(p <= prev, "survival must decrease: p({i}) = {p} > {prev}");
            prev = p;
        }
    }
}
