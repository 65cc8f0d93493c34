//! Analysis output: issues, recommendations, and the per-tick record.

use serde::{Deserialize, Serialize};

use crate::landmark::{AnalysisMode, TimestampNs};
use crate::metrics::PostureMetrics;

/// Severity tier of a finding.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum IssueKind {
    /// Injury or chronic-strain risk.
    Critical,
    /// Form degradation worth correcting.
    Warning,
    /// Small deviation, usually instability.
    Minor,
    /// Positive confirmation of good form.
    Good,
}

impl IssueKind {
    pub const ALL: [IssueKind; 4] = [
        IssueKind::Critical,
        IssueKind::Warning,
        IssueKind::Minor,
        IssueKind::Good,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            IssueKind::Critical => "critical",
            IssueKind::Warning => "warning",
            IssueKind::Minor => "minor",
            IssueKind::Good => "good",
        }
    }
}

impl std::fmt::Display for IssueKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One finding raised by a rule.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PostureIssue {
    #[serde(rename = "type")]
    pub kind: IssueKind,

    /// Human-readable description.
    pub message: String,

    /// Scoring weight in `[0, 10]`.
    pub severity: u8,

    /// Corrective advice, when the rule has any.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub recommendation: Option<String>,

    /// Timestamp of the observation that raised it.
    #[serde(rename = "t")]
    pub timestamp_ns: TimestampNs,
}

/// The engine's output for a single observation. Never mutated after creation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PostureAnalysis {
    pub mode: AnalysisMode,

    /// Caller-supplied tick index.
    pub frame_number: u64,

    #[serde(rename = "t")]
    pub timestamp_ns: TimestampNs,

    /// No critical issue and a score above 70.
    pub is_good_posture: bool,

    /// Overall quality in `[0, 100]`.
    pub overall_score: f64,

    /// Findings in rule order (critical tier first).
    pub issues: Vec<PostureIssue>,

    pub metrics: PostureMetrics,

    /// Motion consistency over the history window, `[0, 1]`.
    pub stability: f64,

    /// Trust in this analysis, `[0.1, 1.0]`.
    pub confidence: f64,

    /// Unique recommendations in first-seen order.
    pub recommendations: Vec<String>,
}

impl PostureAnalysis {
    pub fn has_critical(&self) -> bool {
        self.issues.iter().any(|i| i.kind == IssueKind::Critical)
    }

    /// The first (highest tier) issue, as displayed by presentation layers.
    pub fn primary_issue(&self) -> Option<&PostureIssue> {
        self.issues.first()
    }

    pub fn issues_of(&self, kind: IssueKind) -> impl Iterator<Item = &PostureIssue> {
        self.issues.iter().filter(move |i| i.kind == kind)
    }

    pub fn count_of(&self, kind: IssueKind) -> usize {
        self.issues_of(kind).count()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn issue(kind: IssueKind, severity: u8) -> PostureIssue {
        PostureIssue {
            kind,
            message: format!("{kind} finding"),
            severity,
            recommendation: None,
            timestamp_ns: 0,
        }
    }

    fn analysis(issues: Vec<PostureIssue>) -> PostureAnalysis {
        PostureAnalysis {
            mode: AnalysisMode::Squat,
            frame_number: 1,
            timestamp_ns: 0,
            is_good_posture: false,
            overall_score: 50.0,
            issues,
            metrics: PostureMetrics::default(),
            stability: 0.5,
            confidence: 0.5,
            recommendations: vec![],
        }
    }

    #[test]
    fn test_issue_queries() {
        let a = analysis(vec![
            issue(IssueKind::Critical, 9),
            issue(IssueKind::Warning, 6),
            issue(IssueKind::Warning, 5),
        ]);
        assert!(a.has_critical());
        assert_eq!(a.primary_issue().unwrap().severity, 9);
        assert_eq!(a.count_of(IssueKind::Warning), 2);
        assert_eq!(a.count_of(IssueKind::Good), 0);
    }

    #[test]
    fn test_issue_json_uses_type_tag() {
        let json = serde_json::to_string(&issue(IssueKind::Minor, 3)).unwrap();
        assert!(json.contains("\"type\":\"minor\""));
        assert!(json.contains("\"severity\":3"));
        assert!(!json.contains("recommendation"));
    }
}
