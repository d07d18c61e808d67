//! Shared types for the integrity engine: test families, degrees of
//! freedom, and the `Finding` record returned to the audit pipeline.

use std::fmt;
use std::str::FromStr;

use serde::Serialize;

use crate::checks::{
    BenfordResult, GrimResult, GrimmerPercentResult, GrimmerSdResult, PValueCheckResult,
};
use crate::errors::StatsError;

/// Statistical test families recognized in APA-style reports
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum TestType {
    /// Student's t
    T,
    /// Fisher's F (ANOVA, regression)
    F,
    /// Pearson correlation coefficient
    R,
    /// Standard-normal z
    Z,
    /// Cochran's Q (meta-analysis heterogeneity; chi-squared math)
    Q,
    /// Chi-squared
    ChiSquared,
}

impl FromStr for TestType {
    type Err = StatsError;

    /// Parse a test label as it appears in text (case-insensitive).
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "t" => Ok(TestType::T),
            "f" => Ok(TestType::F),
            "r" => Ok(TestType::R),
            "z" => Ok(TestType::Z),
            "q" => Ok(TestType::Q),
            "chi2" | "χ2" | "χ²" => Ok(TestType::ChiSquared),
            other => Err(StatsError::UnknownTestType(other.to_string())),
        }
    }
}

impl fmt::Display for TestType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            TestType::T => "t",
            TestType::F => "F",
            TestType::R => "r",
            TestType::Z => "Z",
            TestType::Q => "Q",
            TestType::ChiSquared => "chi2",
        };
        write!(f, "{label}")
    }
}

/// Degrees of freedom attached to a reported statistic.
///
/// F requires `Pair`; Z and Q reported without parentheses carry a
/// `Single(0)` placeholder, which the recalculator treats as "no usable
/// df" for every df-dependent test family.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum Df {
    Single(i64),
    Pair(i64, i64),
}

impl fmt::Display for Df {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Df::Single(d) => write!(f, "{d}"),
            Df::Pair(d1, d2) => write!(f, "{d1}, {d2}"),
        }
    }
}

/// Checker-specific result carried inside a [`Finding`]
#[derive(Debug, Clone, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum CheckOutcome {
    Grim(GrimResult),
    GrimmerSd(GrimmerSdResult),
    GrimmerPercent(GrimmerPercentResult),
    Benford(BenfordResult),
    PValue(PValueCheckResult),
}

/// One statistically-detectable inconsistency surfaced by a checker.
///
/// Findings are transient return values owned by the caller: they carry no
/// identity and are created fresh on every call. A Finding is emitted only
/// when the underlying test reports inconsistency; consistent candidates
/// are silently dropped.
#[derive(Debug, Clone, Serialize)]
pub struct Finding {
    /// Always "warning"; downstream re-weighting is the caller's concern
    pub severity: String,
    /// Machine-readable grouping key (e.g. "p_value_inconsistency")
    pub category: String,
    pub title: String,
    pub description: String,
    /// Exact matched substring the finding refers to (empty for checks
    /// that operate on caller-supplied numbers rather than text)
    pub source_text: String,
    /// Fixed per-checker confidence in [0, 1]
    pub confidence: f64,
    /// Name of the checker that produced this finding
    pub checker: String,
    pub sub_result: CheckOutcome,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_test_type_labels_round_trip() {
        for label in ["t", "F", "r", "Z", "Q", "chi2"] {
            let parsed: TestType = label.parse().unwrap();
            assert_eq!(parsed.to_string().to_lowercase(), label.to_lowercase());
        }
    }

    #[test]
    fn test_test_type_accepts_unicode_chi() {
        assert_eq!("χ2".parse::<TestType>().unwrap(), TestType::ChiSquared);
        assert_eq!("χ²".parse::<TestType>().unwrap(), TestType::ChiSquared);
    }

    #[test]
    fn test_test_type_rejects_unknown_label() {
        let err = "w".parse::<TestType>().unwrap_err();
        assert_eq!(err, StatsError::UnknownTestType("w".into()));
    }

    #[test]
    fn test_df_display() {
        assert_eq!(Df::Single(28).to_string(), "28");
        assert_eq!(Df::Pair(2, 45).to_string(), "2, 45");
    }
}
