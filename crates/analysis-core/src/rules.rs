//! Rule evaluation: fixed, ordered threshold tables per mode.
//!
//! Every rule in a table is checked; each one that fires appends one issue,
//! so a single observation can raise several. Tables are ordered critical
//! tier first, because presentation layers show `issues[0]`.
//!
//! Thresholds are exact contract values. Comparisons are strict where the
//! tables say `>`/`<`, so a metric sitting exactly on a threshold does not
//! fire that rule.

use posture_model::analysis::{IssueKind, PostureIssue};
use posture_model::landmark::{AnalysisMode, TimestampNs};
use posture_model::metrics::PostureMetrics;

/// What a rule condition sees.
#[derive(Debug, Clone, Copy)]
pub struct RuleInput<'a> {
    pub metrics: &'a PostureMetrics,
    pub stability: f64,
}

/// A single threshold rule.
pub struct Rule {
    pub kind: IssueKind,
    pub severity: u8,
    pub message: &'static str,
    pub recommendation: Option<&'static str>,
    pub condition: fn(&RuleInput<'_>) -> bool,
}

impl std::fmt::Debug for Rule {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Rule")
            .field("kind", &self.kind)
            .field("severity", &self.severity)
            .field("message", &self.message)
            .finish()
    }
}

pub const SQUAT_RULES: &[Rule] = &[
    Rule {
        kind: IssueKind::Critical,
        severity: 9,
        message: "Knees are caving inward (knee valgus): high injury risk",
        recommendation: Some("Push your knees out so they track over your toes"),
        condition: |i| i.metrics.knee_tracking > 0.15,
    },
    Rule {
        kind: IssueKind::Critical,
        severity: 8,
        message: "Excessive forward lean",
        recommendation: Some("Keep your chest up and your weight over mid-foot"),
        condition: |i| i.metrics.back_curvature > 0.4,
    },
    Rule {
        kind: IssueKind::Warning,
        severity: 6,
        message: "Squat depth is insufficient",
        recommendation: Some("Lower your hips until your thighs are at least parallel to the floor"),
        condition: |i| i.metrics.squat_depth < 0.3,
    },
    Rule {
        kind: IssueKind::Warning,
        severity: 5,
        message: "Shoulders are uneven",
        recommendation: Some("Level your shoulders and keep the load centered"),
        condition: |i| i.metrics.shoulder_alignment > 0.1,
    },
    Rule {
        kind: IssueKind::Minor,
        severity: 3,
        message: "Movement is unstable",
        recommendation: Some("Slow down and control each phase of the movement"),
        condition: |i| i.stability < 0.6,
    },
    Rule {
        kind: IssueKind::Good,
        severity: 0,
        message: "Excellent squat form",
        recommendation: None,
        condition: |i| {
            i.metrics.squat_depth > 0.7
                && i.metrics.knee_tracking < 0.05
                && i.metrics.back_curvature < 0.2
        },
    },
];

pub const SITTING_RULES: &[Rule] = &[
    Rule {
        kind: IssueKind::Critical,
        severity: 9,
        message: "Severe forward head posture (tech neck)",
        recommendation: Some("Tuck your chin and raise your screen to eye level"),
        condition: |i| i.metrics.neck_angle > 35.0,
    },
    Rule {
        kind: IssueKind::Critical,
        severity: 8,
        message: "Excessive slouching",
        recommendation: Some("Sit back against the chair and keep your spine upright"),
        condition: |i| i.metrics.back_curvature > 0.5,
    },
    Rule {
        kind: IssueKind::Warning,
        severity: 6,
        message: "Moderate forward head posture",
        recommendation: Some("Tuck your chin and raise your screen to eye level"),
        condition: |i| i.metrics.neck_angle > 20.0 && i.metrics.neck_angle <= 35.0,
    },
    Rule {
        kind: IssueKind::Warning,
        severity: 5,
        message: "Shoulder imbalance detected",
        recommendation: Some("Relax your shoulders and keep them level"),
        condition: |i| i.metrics.shoulder_alignment > 0.08,
    },
    Rule {
        kind: IssueKind::Warning,
        severity: 4,
        message: "Mild slouching",
        recommendation: Some("Sit back against the chair and keep your spine upright"),
        condition: |i| i.metrics.back_curvature > 0.25 && i.metrics.back_curvature <= 0.5,
    },
    Rule {
        kind: IssueKind::Minor,
        severity: 2,
        message: "Frequent position changes",
        recommendation: Some("Settle into a supported position and take regular movement breaks"),
        condition: |i| i.stability < 0.7,
    },
    Rule {
        kind: IssueKind::Good,
        severity: 0,
        message: "Excellent posture",
        recommendation: None,
        condition: |i| {
            i.metrics.neck_angle < 15.0
                && i.metrics.back_curvature < 0.2
                && i.metrics.shoulder_alignment < 0.05
        },
    },
];

/// Rule table for a mode.
pub fn rules_for(mode: AnalysisMode) -> &'static [Rule] {
    match mode {
        AnalysisMode::Squat => SQUAT_RULES,
        AnalysisMode::Sitting => SITTING_RULES,
    }
}

/// Order-preserving set of recommendation strings.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RecommendationSet {
    items: Vec<String>,
}

impl RecommendationSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert unless already present. Returns whether it was new.
    pub fn insert(&mut self, recommendation: impl AsRef<str>) -> bool {
        let recommendation = recommendation.as_ref();
        if self.items.iter().any(|r| r == recommendation) {
            return false;
        }
        self.items.push(recommendation.to_string());
        true
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn into_vec(self) -> Vec<String> {
        self.items
    }
}

/// Result of running a rule table.
#[derive(Debug, Clone, Default)]
pub struct RuleOutcome {
    pub issues: Vec<PostureIssue>,
    pub recommendations: RecommendationSet,
}

/// Evaluate every rule of `mode` against the metrics, in table order.
pub fn evaluate(
    mode: AnalysisMode,
    metrics: &PostureMetrics,
    stability: f64,
    timestamp_ns: TimestampNs,
) -> RuleOutcome {
    let input = RuleInput { metrics, stability };
    let mut outcome = RuleOutcome::default();

    for rule in rules_for(mode) {
        if !(rule.condition)(&input) {
            continue;
        }
        outcome.issues.push(PostureIssue {
            kind: rule.kind,
            message: rule.message.to_string(),
            severity: rule.severity,
            recommendation: rule.recommendation.map(str::to_string),
            timestamp_ns,
        });
        if let Some(rec) = rule.recommendation {
            outcome.recommendations.insert(rec);
        }
    }

    outcome
}
