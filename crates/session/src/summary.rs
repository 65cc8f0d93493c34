//! Aggregate statistics for a recorded session.

use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use posture_model::analysis::{IssueKind, PostureAnalysis};
use posture_model::landmark::AnalysisMode;

/// Summary of one analysis session.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SessionSummary {
    pub mode: AnalysisMode,
    pub started_at: DateTime<Utc>,

    /// Span between the first and last analyzed observation.
    pub duration_secs: f64,

    pub total_frames: u64,
    pub good_frames: u64,

    /// `good_frames / total_frames * 100`, 0 for an empty session.
    pub good_posture_pct: f64,

    pub average_score: f64,
    pub min_score: f64,
    pub max_score: f64,
    pub average_confidence: f64,

    /// Longest run of consecutive good-posture frames.
    pub longest_good_streak: u64,

    /// Number of issues raised per tier.
    pub issue_counts: BTreeMap<IssueKind, u64>,

    /// Most often raised non-good issue message.
    pub most_frequent_issue: Option<String>,

    /// Every distinct recommendation seen, in first-seen order.
    pub recommendations: Vec<String>,
}

impl SessionSummary {
    /// Aggregate a sequence of analyses.
    pub fn from_analyses(
        mode: AnalysisMode,
        started_at: DateTime<Utc>,
        analyses: &[PostureAnalysis],
    ) -> Self {
        let mut issue_counts: BTreeMap<IssueKind, u64> =
            IssueKind::ALL.iter().map(|k| (*k, 0)).collect();
        let mut message_counts: Vec<(String, u64)> = Vec::new();
        let mut recommendations: Vec<String> = Vec::new();

        let mut good_frames = 0u64;
        let mut streak = 0u64;
        let mut longest_good_streak = 0u64;
        let mut score_sum = 0.0;
        let mut confidence_sum = 0.0;
        let mut min_score = f64::INFINITY;
        let mut max_score = f64::NEG_INFINITY;

        for analysis in analyses {
            if analysis.is_good_posture {
                good_frames += 1;
                streak += 1;
                longest_good_streak = longest_good_streak.max(streak);
            } else {
                streak = 0;
            }

            score_sum += analysis.overall_score;
            confidence_sum += analysis.confidence;
            min_score = min_score.min(analysis.overall_score);
            max_score = max_score.max(analysis.overall_score);

            for issue in &analysis.issues {
                *issue_counts.entry(issue.kind).or_insert(0) += 1;
                if issue.kind == IssueKind::Good {
                    continue;
                }
                match message_counts.iter_mut().find(|(m, _)| *m == issue.message) {
                    Some((_, count)) => *count += 1,
                    None => message_counts.push((issue.message.clone(), 1)),
                }
            }

            for rec in &analysis.recommendations {
                if !recommendations.contains(rec) {
                    recommendations.push(rec.clone());
                }
            }
        }

        let total_frames = analyses.len() as u64;
        let (average_score, average_confidence, good_posture_pct) = if total_frames == 0 {
            min_score = 0.0;
            max_score = 0.0;
            (0.0, 0.0, 0.0)
        } else {
            let n = total_frames as f64;
            (
                score_sum / n,
                confidence_sum / n,
                good_frames as f64 / n * 100.0,
            )
        };

        let duration_secs = match (analyses.first(), analyses.last()) {
            (Some(first), Some(last)) => {
                last.timestamp_ns.saturating_sub(first.timestamp_ns) as f64 / 1_000_000_000.0
            }
            _ => 0.0,
        };

        // Ties resolve to the message seen first.
        let most_frequent_issue = message_counts
            .iter()
            .fold(None::<&(String, u64)>, |best, entry| match best {
                Some(b) if b.1 >= entry.1 => Some(b),
                _ => Some(entry),
            })
            .map(|(message, _)| message.clone());

        Self {
            mode,
            started_at,
            duration_secs,
            total_frames,
            good_frames,
            good_posture_pct,
            average_score,
            min_score,
            max_score,
            average_confidence,
            longest_good_streak,
            issue_counts,
            most_frequent_issue,
            recommendations,
        }
    }

    pub fn issue_count(&self, kind: IssueKind) -> u64 {
        self.issue_counts.get(&kind).copied().unwrap_or(0)
    }
}
