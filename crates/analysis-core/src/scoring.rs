//! Overall score and good/bad verdict.

use posture_model::analysis::{IssueKind, PostureIssue};
use posture_model::landmark::AnalysisMode;
use posture_model::metrics::PostureMetrics;

/// Score every analysis starts from.
pub const BASE_SCORE: f64 = 100.0;

/// Points removed per unit of issue severity.
pub const SEVERITY_WEIGHT: f64 = 2.0;

/// Scores at or below this are never "good".
pub const GOOD_POSTURE_THRESHOLD: f64 = 70.0;

/// Compute the clamped `[0, 100]` score.
///
/// Every issue costs `severity * 2` regardless of its tier; the mode's
/// metric bonuses are then added before clamping.
pub fn overall_score(
    mode: AnalysisMode,
    issues: &[PostureIssue],
    metrics: &PostureMetrics,
    stability: f64,
) -> f64 {
    let penalty: f64 = issues
        .iter()
        .map(|i| f64::from(i.severity) * SEVERITY_WEIGHT)
        .sum();

    (BASE_SCORE - penalty + bonus(mode, metrics, stability)).clamp(0.0, 100.0)
}

/// Metric bonuses for the mode.
pub fn bonus(mode: AnalysisMode, metrics: &PostureMetrics, stability: f64) -> f64 {
    let mut bonus = 0.0;
    match mode {
        AnalysisMode::Squat => {
            if metrics.squat_depth > 0.7 {
                bonus += 10.0;
            }
            if metrics.knee_tracking < 0.05 {
                bonus += 15.0;
            }
            if metrics.back_curvature < 0.2 {
                bonus += 10.0;
            }
        }
        AnalysisMode::Sitting => {
            if metrics.neck_angle < 15.0 {
                bonus += 10.0;
            }
            if metrics.back_curvature < 0.2 {
                bonus += 10.0;
            }
            if metrics.shoulder_alignment < 0.05 {
                bonus += 10.0;
            }
        }
    }
    if stability > 0.8 {
        bonus += 5.0;
    }
    bonus
}

/// Good posture needs both: no critical issue and a score above 70.
pub fn is_good_posture(issues: &[PostureIssue], score: f64) -> bool {
    let has_critical = issues.iter().any(|i| i.kind == IssueKind::Critical);
    !has_critical && score > GOOD_POSTURE_THRESHOLD
}

#[cfg(test)]
mod tests {
    use super::*;

    fn issue(kind: IssueKind, severity: u8) -> PostureIssue {
        PostureIssue {
            kind,
            message: String::new(),
            severity,
            recommendation: None,
            timestamp_ns: 0,
        }
    }

    #[test]
    fn test_penalty_applies_to_every_tier() {
        let issues = vec![issue(IssueKind::Warning, 6), issue(IssueKind::Minor, 3)];
        // No bonuses: deep-enough squat absent, poor knees/back, low stability.
        let metrics = PostureMetrics::squat(0.1, 0.3, 0.5);
        let score = overall_score(AnalysisMode::Squat, &issues, &metrics, 0.5);
        assert!((score - 82.0).abs() < 1e-12);
    }

    #[test]
    fn test_score_clamps_high() {
        let metrics = PostureMetrics::squat(0.0, 0.0, 1.0);
        let score = overall_score(AnalysisMode::Squat, &[], &metrics, 1.0);
        assert_eq!(score, 100.0);
    }

    #[test]
    fn test_score_clamps_low() {
        let issues: Vec<_> = (0..10).map(|_| issue(IssueKind::Critical, 10)).collect();
        let metrics = PostureMetrics::sitting(60.0, 1.0, 1.0);
        let score = overall_score(AnalysisMode::Sitting, &issues, &metrics, 0.0);
        assert_eq!(score, 0.0);
    }

    #[test]
    fn test_sitting_bonuses() {
        let metrics = PostureMetrics::sitting(10.0, 0.1, 0.01);
        assert_eq!(bonus(AnalysisMode::Sitting, &metrics, 0.9), 35.0);
        assert_eq!(bonus(AnalysisMode::Sitting, &metrics, 0.8), 30.0);
    }

    #[test]
    fn test_critical_issue_vetoes_good_verdict() {
        let issues = vec![issue(IssueKind::Critical, 9)];
        assert!(!is_good_posture(&issues, 95.0));
        assert!(is_good_posture(&[issue(IssueKind::Warning, 5)], 95.0));
        assert!(!is_good_posture(&[], 70.0));
        assert!(is_good_posture(&[], 70.5));
    }
}
