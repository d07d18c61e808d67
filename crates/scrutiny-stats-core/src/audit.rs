//! Consistency facade: extraction wired to the numeric checkers
//!
//! These are the entry points the surrounding audit pipeline calls. Each
//! one scans text (or a caller-supplied number list), runs the relevant
//! checkers, and returns a `Finding` per inconsistency. Consistent
//! candidates produce nothing: absence of a finding means "no detectable
//! problem", not "verified correct".

use tracing::debug;

use crate::checks::{
    benford, check_p_consistency, grim, grimmer_percent, grimmer_sd, BenfordOptions, PValueOptions,
};
use crate::distributions::StatrsSurvival;
use crate::extract::{extract_percent_candidates, extract_sd_candidates, extract_stat_candidates};
use crate::types::{CheckOutcome, Finding};

/// Confidence attached to p-value recalculation findings
const STAT_CONFIDENCE: f64 = 0.85;

/// Confidence attached to GRIM/GRIMMER findings
const GRIMMER_CONFIDENCE: f64 = 0.80;

/// Confidence attached to Benford findings
const BENFORD_CONFIDENCE: f64 = 0.75;

const SEVERITY_WARNING: &str = "warning";

/// Scan `text` for APA-style test reports and flag every report whose
/// p-value disagrees with the value recalculated from its statistic.
///
/// Reports the engine cannot recalculate (unsupported df shape, backend
/// unable to answer) are treated as consistent and produce no finding.
pub fn extract_and_check_stats(text: &str) -> Vec<Finding> {
    let provider = StatrsSurvival;
    let candidates = extract_stat_candidates(text);
    debug!(candidates = candidates.len(), "checking statistical reports");

    let mut findings = Vec::new();
    for candidate in candidates {
        let result = check_p_consistency(
            candidate.test_type,
            candidate.statistic,
            candidate.df,
            candidate.reported_p,
            &PValueOptions::default(),
            Some(&provider),
        );
        if result.is_consistent {
            continue;
        }
        let recalculated = result.recalculated_p.unwrap_or(f64::NAN);
        findings.push(Finding {
            severity: SEVERITY_WARNING.into(),
            category: "p_value_inconsistency".into(),
            title: format!(
                "Reported p-value for {} test disagrees with recalculation",
                candidate.test_type
            ),
            description: format!(
                "{}({}) = {} was reported with p = {}, but the statistic implies \
                 p = {:.4} (difference {:.4})",
                candidate.test_type,
                candidate.df,
                candidate.statistic,
                candidate.reported_p,
                recalculated,
                result.discrepancy,
            ),
            source_text: text[candidate.span.0..candidate.span.1].to_string(),
            confidence: STAT_CONFIDENCE,
            checker: "p_value_recalculation".into(),
            sub_result: CheckOutcome::PValue(result),
        });
    }
    findings
}

/// Scan `text` for mean/SD and percentage reports and flag every value the
/// GRIM/GRIMMER tests prove impossible for the reported sample size.
///
/// Reports without an explicit sample size never reach the checkers. When
/// a mean/SD report carries a reported mean, the mean itself is also
/// GRIM-checked at its own decimal precision.
pub fn extract_and_check_grimmer(text: &str) -> Vec<Finding> {
    let mut spanned: Vec<((usize, usize), Finding)> = Vec::new();

    let sd_candidates = extract_sd_candidates(text);
    let percent_candidates = extract_percent_candidates(text);
    debug!(
        sd_candidates = sd_candidates.len(),
        percent_candidates = percent_candidates.len(),
        "checking sd/percentage reports"
    );

    for candidate in sd_candidates {
        let source_text = text[candidate.span.0..candidate.span.1].to_string();

        if let (Some(mean), Some(mean_decimals)) = (candidate.mean, candidate.mean_decimals) {
            let result = grim(mean, candidate.n, mean_decimals);
            if !result.is_consistent {
                spanned.push((
                    candidate.span,
                    Finding {
                        severity: SEVERITY_WARNING.into(),
                        category: "mean_inconsistency".into(),
                        title: "Reported mean is impossible for the reported sample size".into(),
                        description: result.explanation.clone(),
                        source_text: source_text.clone(),
                        confidence: GRIMMER_CONFIDENCE,
                        checker: "grim".into(),
                        sub_result: CheckOutcome::Grim(result),
                    },
                ));
            }
        }

        let result = grimmer_sd(candidate.sd, candidate.n, candidate.decimals);
        if !result.is_consistent {
            spanned.push((
                candidate.span,
                Finding {
                    severity: SEVERITY_WARNING.into(),
                    category: "sd_inconsistency".into(),
                    title: "Reported standard deviation is impossible for the reported sample size"
                        .into(),
                    description: result.explanation.clone(),
                    source_text,
                    confidence: GRIMMER_CONFIDENCE,
                    checker: "grimmer_sd".into(),
                    sub_result: CheckOutcome::GrimmerSd(result),
                },
            ));
        }
    }

    for candidate in percent_candidates {
        let result = grimmer_percent(candidate.percentage, candidate.n, candidate.decimals);
        if !result.is_consistent {
            spanned.push((
                candidate.span,
                Finding {
                    severity: SEVERITY_WARNING.into(),
                    category: "percentage_inconsistency".into(),
                    title: "Reported percentage does not correspond to a whole number of cases"
                        .into(),
                    description: result.explanation.clone(),
                    source_text: text[candidate.span.0..candidate.span.1].to_string(),
                    confidence: GRIMMER_CONFIDENCE,
                    checker: "grimmer_percent".into(),
                    sub_result: CheckOutcome::GrimmerPercent(result),
                },
            ));
        }
    }

    spanned.sort_by_key(|(span, _)| *span);
    spanned.into_iter().map(|(_, finding)| finding).collect()
}

/// Run Benford first-digit analysis over caller-supplied values and wrap an
/// anomalous outcome as a finding.
///
/// The caller owns number collection (this engine does not mine numbers
/// out of text for Benford), so `source_text` is empty.
pub fn check_benford(values: &[f64]) -> Option<Finding> {
    let result = benford(values, &BenfordOptions::default());
    if !result.is_anomalous {
        return None;
    }
    let chi_squared = result.chi_squared.unwrap_or(f64::NAN);
    let p_value = result.p_value.unwrap_or(f64::NAN);
    Some(Finding {
        severity: SEVERITY_WARNING.into(),
        category: "digit_distribution_anomaly".into(),
        title: "Leading digits deviate from Benford's Law".into(),
        description: format!(
            "The leading-digit distribution of {} values deviates from the \
             Benford expectation (chi2 = {:.2}, p = {:.4})",
            result.n_values, chi_squared, p_value,
        ),
        source_text: String::new(),
        confidence: BENFORD_CONFIDENCE,
        checker: "benford".into(),
        sub_result: CheckOutcome::Benford(result),
    })
}
