// File: classifier.rs
// SPDX-License-Identifier: MIT OR Apache-2.0
//
// Copyright (c) 2025
// - byprobe contributors

//! Baseline-vs-variant differential classification.
//!
//! A 200 where the baseline was 403 is not automatically a bypass: soft
//! 404s, error-page redirects and incidental body jitter all masquerade as
//! wins. The verdict table encodes the disqualifiers, first match wins.

use once_cell::sync::Lazy;
use regex::Regex;
use serde::Serialize;

/// Bodies that admit "not found" despite a 2xx status.
static SOFT_404_PATTERNS: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"404|(?i)not found").unwrap());

/// Below this body size a 2xx answer is treated as a stub page, not content.
const SOFT_404_SIZE_LIMIT: usize = 100;

/// Body growth beyond this ratio (with equal status) counts as different
/// content behind the same door.
const SIZE_DELTA_RATIO: f64 = 0.30;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum Reason {
    #[serde(rename = "status_change")]
    StatusChange,
    #[serde(rename = "size_difference")]
    SizeDifference,
    #[serde(rename = "possible_soft_404")]
    PossibleSoft404,
    #[serde(rename = "soft_404_detected")]
    Soft404Detected,
    #[serde(rename = "connection_failed")]
    ConnectionFailed,
    #[serde(rename = "failed")]
    Failed,
}

impl Reason {
    pub fn as_str(&self) -> &'static str {
        match self {
            Reason::StatusChange => "status_change",
            Reason::SizeDifference => "size_difference",
            Reason::PossibleSoft404 => "possible_soft_404",
            Reason::Soft404Detected => "soft_404_detected",
            Reason::ConnectionFailed => "connection_failed",
            Reason::Failed => "failed",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Verdict {
    pub bypass: bool,
    pub reason: Reason,
}

#[derive(Debug, Clone, Serialize)]
pub struct BaselineReport {
    pub status: u16,
    pub size: usize,
    pub time: f64,
}

#[derive(Debug, Clone, Serialize)]
pub struct VariantReport {
    pub variation: String,
    pub status: u16,
    pub size: usize,
    pub time: f64,
    pub bypass: bool,
    pub reason: Reason,
}

#[derive(Debug, Clone, Serialize)]
pub struct Summary {
    pub total_tested: usize,
    pub successful_bypasses: usize,
    pub failed_attempts: usize,
}

#[derive(Debug, Clone, Serialize)]
pub struct ScanResult {
    pub baseline: BaselineReport,
    pub variations: Vec<VariantReport>,
    pub summary: Summary,
}

impl ScanResult {
    pub fn new(baseline: BaselineReport, variations: Vec<VariantReport>) -> Self {
        let total_tested = variations.len();
        let successful_bypasses = variations.iter().filter(|v| v.bypass).count();
        let summary = Summary {
            total_tested,
            successful_bypasses,
            failed_attempts: total_tested - successful_bypasses,
        };
        Self {
            baseline,
            variations,
            summary,
        }
    }
}

/// Pure verdict function over `(baseline status, baseline size, variant
/// status, variant size, variant body)`. Identical inputs always yield
/// identical verdicts.
pub fn classify(
    baseline_status: u16,
    baseline_size: usize,
    status: u16,
    size: usize,
    body: &[u8],
) -> Verdict {
    if status == 0 {
        return Verdict {
            bypass: false,
            reason: Reason::ConnectionFailed,
        };
    }

    if baseline_status >= 400 && (200..400).contains(&status) {
        if size < SOFT_404_SIZE_LIMIT {
            return Verdict {
                bypass: false,
                reason: Reason::PossibleSoft404,
            };
        }
        if SOFT_404_PATTERNS.is_match(&String::from_utf8_lossy(body)) {
            return Verdict {
                bypass: false,
                reason: Reason::Soft404Detected,
            };
        }
        return Verdict {
            bypass: true,
            reason: Reason::StatusChange,
        };
    }

    if status == baseline_status && baseline_size > 0 && size > 0 {
        let delta = (size as f64 - baseline_size as f64) / baseline_size as f64;
        if delta > SIZE_DELTA_RATIO && size > baseline_size {
            return Verdict {
                bypass: true,
                reason: Reason::SizeDifference,
            };
        }
    }

    Verdict {
        bypass: false,
        reason: Reason::Failed,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case(200, 42, false, Reason::PossibleSoft404)]
    #[case(200, 5000, true, Reason::StatusChange)]
    #[case(302, 3000, true, Reason::StatusChange)]
    #[case(500, 5000, false, Reason::Failed)]
    fn denied_baseline_transitions(
        #[case] status: u16,
        #[case] size: usize,
        #[case] bypass: bool,
        #[case] reason: Reason,
    ) {
        let v = classify(403, 500, status, size, b"<html>plenty of page content</html>");
        assert_eq!(v.bypass, bypass);
        assert_eq!(v.reason, reason);
    }

    #[test]
    fn transport_failure_wins_over_everything() {
        let v = classify(403, 500, 0, 0, b"");
        assert!(!v.bypass);
        assert_eq!(v.reason, Reason::ConnectionFailed);
    }

    #[test]
    fn status_change_with_real_body_is_bypass() {
        let v = classify(403, 500, 200, 5000, b"<html><body>dashboard</body></html>");
        assert!(v.bypass);
        assert_eq!(v.reason, Reason::StatusChange);
    }

    #[test]
    fn tiny_body_is_possible_soft_404() {
        let v = classify(403, 500, 200, 42, b"short");
        assert!(!v.bypass);
        assert_eq!(v.reason, Reason::PossibleSoft404);
    }

    #[test]
    fn not_found_body_is_soft_404() {
        let body = vec![b'x'; 50].into_iter().chain(b"Page Not Found".iter().copied()).chain(vec![b'y'; 60]).collect::<Vec<_>>();
        let v = classify(403, 500, 200, body.len(), &body);
        assert!(!v.bypass);
        assert_eq!(v.reason, Reason::Soft404Detected);

        let body404 = vec![b'z'; 120].into_iter().chain(b"error 404".iter().copied()).collect::<Vec<_>>();
        let v = classify(401, 500, 302, body404.len(), &body404);
        assert_eq!(v.reason, Reason::Soft404Detected);
    }

    #[test]
    fn size_growth_beyond_threshold_is_bypass() {
        let v = classify(403, 1000, 403, 2000, b"...");
        assert!(v.bypass);
        assert_eq!(v.reason, Reason::SizeDifference);
    }

    #[test]
    fn small_size_delta_is_not_bypass() {
        let v = classify(403, 1000, 403, 1200, b"...");
        assert!(!v.bypass);
        assert_eq!(v.reason, Reason::Failed);
    }

    #[test]
    fn shrinking_body_is_never_size_difference() {
        let v = classify(403, 1000, 403, 100, b"...");
        assert!(!v.bypass);
        assert_eq!(v.reason, Reason::Failed);
    }

    #[test]
    fn exact_threshold_is_not_bypass() {
        // 30% exactly does not clear the strict > comparison.
        let v = classify(403, 1000, 403, 1300, b"...");
        assert!(!v.bypass);
    }

    #[test]
    fn zero_baseline_size_skips_delta_check() {
        let v = classify(403, 0, 403, 5000, b"...");
        assert_eq!(v.reason, Reason::Failed);
    }

    #[test]
    fn redirect_range_counts_as_status_change() {
        let v = classify(403, 500, 301, 3000, b"<html>moved</html>");
        assert!(v.bypass);
        assert_eq!(v.reason, Reason::StatusChange);
    }

    #[test]
    fn ok_baseline_never_reports_status_change() {
        let v = classify(200, 500, 200, 520, b"...");
        assert_eq!(v.reason, Reason::Failed);
    }

    #[test]
    fn classifier_is_deterministic() {
        for _ in 0..3 {
            assert_eq!(
                classify(403, 500, 200, 42, b"x"),
                classify(403, 500, 200, 42, b"x")
            );
        }
    }

    #[test]
    fn summary_rollup() {
        let baseline = BaselineReport {
            status: 403,
            size: 500,
            time: 10.0,
        };
        let variants = vec![
            VariantReport {
                variation: "/a/".into(),
                status: 200,
                size: 4000,
                time: 9.0,
                bypass: true,
                reason: Reason::StatusChange,
            },
            VariantReport {
                variation: "/a//".into(),
                status: 403,
                size: 500,
                time: 9.5,
                bypass: false,
                reason: Reason::Failed,
            },
        ];
        let result = ScanResult::new(baseline, variants);
        assert_eq!(result.summary.total_tested, 2);
        assert_eq!(result.summary.successful_bypasses, 1);
        assert_eq!(result.summary.failed_attempts, 1);
    }
}
