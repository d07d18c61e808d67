//! Lexical grammars for statistical reports in free text
//!
//! Two complementary grammars recognize APA-style test reports
//! (`t(28) = 2.05, p = .048` and the unparenthesized `Z = 2.10, p < .05`
//! form used for Z and Q), and two further grammars recognize mean/SD
//! reports and percentage reports. Matching is purely lexical: statistics
//! written in non-standard notation are not found, and non-matching text
//! simply yields zero candidates.
//!
//! All pattern tables are compiled once per process and are immutable
//! thereafter, so extraction is freely callable from concurrent tasks.

use std::sync::LazyLock;

use regex::Regex;
use tracing::debug;

use crate::errors::{StatsError, StatsResult};
use crate::types::{Df, TestType};

/// Parenthesized report: `TEST(df1[, df2]) = statistic[,] p{=|<|>}value`.
///
/// The p-value sub-pattern deliberately requires digits after the dot so a
/// sentence-terminating period is never absorbed (`p = .050.` captures
/// `.050`).
static PAREN_STAT_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r"(?i)\b(chi2|χ2|χ²|[FtrZQ])\s*\(\s*(\d+)\s*(?:,\s*(\d+)\s*)?\)\s*=\s*(-?(?:\d+\.\d*|\.\d+|\d+))\s*,?\s*p\s*([=<>])\s*(0?\.\d+)",
    )
    .expect("parenthesized report pattern compiles")
});

/// Unparenthesized report, Z and Q only: `TEST = statistic[,] p{=|<|>}value`
static BARE_STAT_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)\b([ZQ])\s*=\s*(-?(?:\d+\.\d*|\.\d+|\d+))\s*,?\s*p\s*([=<>])\s*(0?\.\d+)")
        .expect("unparenthesized report pattern compiles")
});

/// Mean/SD report: `[M = mean,] SD = sd[, N = n]`
static MEAN_SD_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r"(?i)(?:\bM\s*=\s*(-?(?:\d+\.\d+|\.\d+|\d+))\s*,\s*)?\bSD\s*=\s*(-?(?:\d+\.\d+|\.\d+|\d+))(?:\s*,\s*N\s*=\s*(\d+))?",
    )
    .expect("mean/sd report pattern compiles")
});

/// Percentage report: `pct% [filler] [(N = n)]`. The filler may not cross
/// parentheses, a period, another percentage, or a line break.
static PERCENT_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)\b(\d+(?:\.\d+)?)\s*%(?:[^()%\n.]{0,60}\(\s*N\s*=\s*(\d+)\s*\))?")
        .expect("percentage report pattern compiles")
});

/// A complete statistical report recognized in text
#[derive(Debug, Clone, PartialEq)]
pub struct StatCandidate {
    pub test_type: TestType,
    pub statistic: f64,
    pub df: Df,
    pub reported_p: f64,
    /// Byte range of the matched report within the scanned text
    pub span: (usize, usize),
}

/// A standard-deviation report with an explicit sample size
#[derive(Debug, Clone, PartialEq)]
pub struct SdCandidate {
    /// Reported mean, when the report carried an `M =` prefix
    pub mean: Option<f64>,
    /// Decimal places of the reported mean
    pub mean_decimals: Option<i64>,
    pub sd: f64,
    pub n: i64,
    /// Decimal places of the reported sd
    pub decimals: i64,
    pub span: (usize, usize),
}

/// A percentage report with an explicit sample size
#[derive(Debug, Clone, PartialEq)]
pub struct PercentCandidate {
    /// 0-100 scale
    pub percentage: f64,
    pub n: i64,
    pub decimals: i64,
    pub span: (usize, usize),
}

/// Decimal places in the matched numeric text (digits after the point)
fn count_decimals(text: &str) -> i64 {
    text.split_once('.').map_or(0, |(_, frac)| frac.len() as i64)
}

fn parse_number(field: &'static str, text: &str) -> StatsResult<f64> {
    text.parse::<f64>().map_err(|_| StatsError::InvalidNumber {
        field,
        text: text.to_string(),
    })
}

fn parse_count(field: &'static str, text: &str) -> StatsResult<i64> {
    text.parse::<i64>().map_err(|_| StatsError::InvalidNumber {
        field,
        text: text.to_string(),
    })
}

fn spans_overlap(a: (usize, usize), b: (usize, usize)) -> bool {
    a.0 < b.1 && b.0 < a.1
}

fn stat_candidate_from_paren(caps: &regex::Captures<'_>) -> StatsResult<StatCandidate> {
    let full = caps.get(0).expect("match has a full capture");
    let test_type: TestType = caps[1].parse()?;
    let df1 = parse_count("degrees of freedom", &caps[2])?;
    let df = match caps.get(3) {
        Some(second) => Df::Pair(df1, parse_count("degrees of freedom", second.as_str())?),
        None => Df::Single(df1),
    };
    Ok(StatCandidate {
        test_type,
        statistic: parse_number("statistic", &caps[4])?,
        df,
        reported_p: parse_number("p-value", &caps[6])?,
        span: (full.start(), full.end()),
    })
}

fn stat_candidate_from_bare(caps: &regex::Captures<'_>) -> StatsResult<StatCandidate> {
    let full = caps.get(0).expect("match has a full capture");
    Ok(StatCandidate {
        test_type: caps[1].parse()?,
        statistic: parse_number("statistic", &caps[2])?,
        // No degrees-of-freedom group exists in this form; the placeholder
        // is rejected by every df-dependent recalculation.
        df: Df::Single(0),
        reported_p: parse_number("p-value", &caps[4])?,
        span: (full.start(), full.end()),
    })
}

/// Find all complete statistical reports in `text`.
///
/// Parenthesized matches are collected first; unparenthesized Z/Q matches
/// whose span overlaps an already-claimed region are discarded so no
/// report is counted twice. The result is sorted by position and
/// de-duplicated by span.
pub fn extract_stat_candidates(text: &str) -> Vec<StatCandidate> {
    let mut candidates: Vec<StatCandidate> = Vec::new();

    for caps in PAREN_STAT_RE.captures_iter(text) {
        match stat_candidate_from_paren(&caps) {
            Ok(candidate) => candidates.push(candidate),
            Err(err) => debug!(%err, "skipping uninterpretable report"),
        }
    }

    let claimed: Vec<(usize, usize)> = candidates.iter().map(|c| c.span).collect();
    for caps in BARE_STAT_RE.captures_iter(text) {
        let full = caps.get(0).expect("match has a full capture");
        let span = (full.start(), full.end());
        if claimed.iter().any(|&taken| spans_overlap(taken, span)) {
            continue;
        }
        match stat_candidate_from_bare(&caps) {
            Ok(candidate) => candidates.push(candidate),
            Err(err) => debug!(%err, "skipping uninterpretable report"),
        }
    }

    candidates.sort_by_key(|c| c.span);
    candidates.dedup_by_key(|c| c.span);
    candidates
}

fn sd_candidate_from(caps: &regex::Captures<'_>, n_text: &str) -> StatsResult<SdCandidate> {
    let full = caps.get(0).expect("match has a full capture");
    let mean_text = caps.get(1).map(|m| m.as_str());
    Ok(SdCandidate {
        mean: mean_text.map(|t| parse_number("mean", t)).transpose()?,
        mean_decimals: mean_text.map(count_decimals),
        sd: parse_number("standard deviation", &caps[2])?,
        n: parse_count("sample size", n_text)?,
        decimals: count_decimals(&caps[2]),
        span: (full.start(), full.end()),
    })
}

fn percent_candidate_from(caps: &regex::Captures<'_>, n_text: &str) -> StatsResult<PercentCandidate> {
    let full = caps.get(0).expect("match has a full capture");
    Ok(PercentCandidate {
        percentage: parse_number("percentage", &caps[1])?,
        n: parse_count("sample size", n_text)?,
        decimals: count_decimals(&caps[1]),
        span: (full.start(), full.end()),
    })
}

/// Find standard-deviation reports carrying an explicit sample size.
///
/// SD reports without an `N =` group are not checkable and are dropped
/// here, before any checker sees them.
pub fn extract_sd_candidates(text: &str) -> Vec<SdCandidate> {
    let mut candidates = Vec::new();
    for caps in MEAN_SD_RE.captures_iter(text) {
        let Some(n_group) = caps.get(3) else {
            continue;
        };
        match sd_candidate_from(&caps, n_group.as_str()) {
            Ok(candidate) => candidates.push(candidate),
            Err(err) => debug!(%err, "skipping uninterpretable sd report"),
        }
    }
    candidates
}

/// Find percentage reports carrying an explicit sample size.
pub fn extract_percent_candidates(text: &str) -> Vec<PercentCandidate> {
    let mut candidates = Vec::new();
    for caps in PERCENT_RE.captures_iter(text) {
        let Some(n_group) = caps.get(2) else {
            continue;
        };
        match percent_candidate_from(&caps, n_group.as_str()) {
            Ok(candidate) => candidates.push(candidate),
            Err(err) => debug!(%err, "skipping uninterpretable percentage report"),
        }
    }
    candidates
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parenthesized_t_report() {
        let text = "The groups differed, t(28) = 2.05, p = .048, as predicted.";
        let candidates = extract_stat_candidates(text);
        assert_eq!(candidates.len(), 1);
        let c = &candidates[0];
        assert_eq!(c.test_type, TestType::T);
        assert_eq!(c.df, Df::Single(28));
        assert_eq!(c.statistic, 2.05);
        assert_eq!(c.reported_p, 0.048);
        assert_eq!(&text[c.span.0..c.span.1], "t(28) = 2.05, p = .048");
    }

    #[test]
    fn test_f_report_with_df_pair() {
        let candidates = extract_stat_candidates("F(2, 45) = 4.51, p < .05");
        assert_eq!(candidates.len(), 1);
        assert_eq!(candidates[0].test_type, TestType::F);
        assert_eq!(candidates[0].df, Df::Pair(2, 45));
    }

    #[test]
    fn test_chi_squared_labels() {
        for text in [
            "chi2(1) = 3.84, p = .05",
            "χ2(1) = 3.84, p = .05",
            "χ²(1) = 3.84, p = .05",
            "CHI2(1) = 3.84, p = .05",
        ] {
            let candidates = extract_stat_candidates(text);
            assert_eq!(candidates.len(), 1, "failed on {text:?}");
            assert_eq!(candidates[0].test_type, TestType::ChiSquared);
        }
    }

    #[test]
    fn test_leading_dot_statistic_and_negative_statistic() {
        let candidates = extract_stat_candidates("r(34) = .45, p = .006 but t(10) = -2.3, p = .04");
        assert_eq!(candidates.len(), 2);
        assert_eq!(candidates[0].statistic, 0.45);
        assert_eq!(candidates[1].statistic, -2.3);
    }

    #[test]
    fn test_sentence_period_is_not_absorbed_into_p() {
        let text = "We found t(28) = 2.05, p = .050. The next sentence.";
        let candidates = extract_stat_candidates(text);
        assert_eq!(candidates.len(), 1);
        assert_eq!(candidates[0].reported_p, 0.050);
        assert!(text[candidates[0].span.0..candidates[0].span.1].ends_with(".050"));
    }

    #[test]
    fn test_bare_z_and_q_reports_use_placeholder_df() {
        let candidates = extract_stat_candidates("Z = 2.10, p = .036; Q = 15.2, p > .05");
        assert_eq!(candidates.len(), 2);
        assert_eq!(candidates[0].test_type, TestType::Z);
        assert_eq!(candidates[0].df, Df::Single(0));
        assert_eq!(candidates[1].test_type, TestType::Q);
    }

    #[test]
    fn test_bare_grammar_ignores_other_test_letters() {
        // The unparenthesized form exists only for Z and Q
        assert!(extract_stat_candidates("t = 2.05, p = .048").is_empty());
        assert!(extract_stat_candidates("F = 4.51, p < .05").is_empty());
    }

    #[test]
    fn test_parenthesized_z_is_not_double_counted() {
        let text = "Z(44) = 2.10, p = .036";
        let candidates = extract_stat_candidates(text);
        assert_eq!(candidates.len(), 1);
        assert_eq!(candidates[0].df, Df::Single(44));
    }

    #[test]
    fn test_adjacent_reports_keep_text_order() {
        let text = "Q = 9.9, p = .04 preceded F(1, 12) = 8.8, p = .01 in the table";
        let candidates = extract_stat_candidates(text);
        assert_eq!(candidates.len(), 2);
        assert!(candidates[0].span.0 < candidates[1].span.0);
        assert_eq!(candidates[0].test_type, TestType::Q);
    }

    #[test]
    fn test_non_matching_text_yields_nothing() {
        assert!(extract_stat_candidates("").is_empty());
        assert!(extract_stat_candidates("the mean reaction time was large").is_empty());
        // Incomplete report: statistic but no p-value
        assert!(extract_stat_candidates("t(28) = 2.05 overall").is_empty());
    }

    #[test]
    fn test_sd_report_with_mean_and_n() {
        let text = "(M = 3.57, SD = 1.21, N = 7)";
        let candidates = extract_sd_candidates(text);
        assert_eq!(candidates.len(), 1);
        let c = &candidates[0];
        assert_eq!(c.mean, Some(3.57));
        assert_eq!(c.mean_decimals, Some(2));
        assert_eq!(c.sd, 1.21);
        assert_eq!(c.n, 7);
        assert_eq!(c.decimals, 2);
    }

    #[test]
    fn test_sd_report_without_mean() {
        let candidates = extract_sd_candidates("scores varied (SD = 0.5, N = 20)");
        assert_eq!(candidates.len(), 1);
        assert_eq!(candidates[0].mean, None);
        assert_eq!(candidates[0].decimals, 1);
    }

    #[test]
    fn test_sd_report_without_n_is_dropped() {
        assert!(extract_sd_candidates("(M = 3.57, SD = 1.21)").is_empty());
        assert!(extract_sd_candidates("SD = 1.21").is_empty());
    }

    #[test]
    fn test_percent_report_with_n() {
        let text = "33.3% of participants (N = 3) agreed";
        let candidates = extract_percent_candidates(text);
        assert_eq!(candidates.len(), 1);
        assert_eq!(candidates[0].percentage, 33.3);
        assert_eq!(candidates[0].n, 3);
        assert_eq!(candidates[0].decimals, 1);
    }

    #[test]
    fn test_percent_report_without_n_is_dropped() {
        assert!(extract_percent_candidates("a 12% increase was observed.").is_empty());
    }

    #[test]
    fn test_percent_n_does_not_cross_sentences_or_other_percentages() {
        // The second percentage owns the sample size; the first has none
        let candidates = extract_percent_candidates("40% improved vs 60% declined (N = 10)");
        assert_eq!(candidates.len(), 1);
        assert_eq!(candidates[0].percentage, 60.0);
        assert!(extract_percent_candidates("Twelve percent. 40% gained. (N = 10)").is_empty());
    }

    #[test]
    fn test_overflowing_df_is_skipped_not_panicked() {
        // The df group matches lexically but cannot be represented; the
        // candidate is dropped rather than surfaced or panicked on.
        let text = "t(99999999999999999999) = 2.05, p = .048";
        assert!(extract_stat_candidates(text).is_empty());
    }

    #[test]
    fn test_count_decimals() {
        assert_eq!(count_decimals("3.57"), 2);
        assert_eq!(count_decimals("24"), 0);
        assert_eq!(count_decimals(".45"), 2);
        assert_eq!(count_decimals("1.210"), 3);
    }
}
