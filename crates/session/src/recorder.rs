//! In-memory recorder for one analysis session.

use std::path::Path;

use chrono::{DateTime, Utc};

use posture_common::error::{PostureError, PostureResult};
use posture_model::analysis::PostureAnalysis;
use posture_model::landmark::AnalysisMode;

use crate::export::export_session;
use crate::summary::SessionSummary;

/// Collects every analysis produced during a session.
#[derive(Debug, Clone)]
pub struct SessionRecorder {
    mode: AnalysisMode,
    started_at: DateTime<Utc>,
    analyses: Vec<PostureAnalysis>,
}

impl SessionRecorder {
    /// Start recording a session now.
    pub fn new(mode: AnalysisMode) -> Self {
        Self::started_at(mode, Utc::now())
    }

    /// Start recording with an explicit start time.
    pub fn started_at(mode: AnalysisMode, started_at: DateTime<Utc>) -> Self {
        Self {
            mode,
            started_at,
            analyses: Vec::new(),
        }
    }

    /// Record one analysis. Analyses of another mode are rejected.
    pub fn record(&mut self, analysis: PostureAnalysis) -> PostureResult<()> {
        if analysis.mode != self.mode {
            return Err(PostureError::mode_mismatch(
                self.mode.as_str(),
                analysis.mode.as_str(),
            ));
        }
        if let Some(last) = self.analyses.last() {
            if analysis.timestamp_ns < last.timestamp_ns {
                tracing::warn!(
                    previous = last.timestamp_ns,
                    current = analysis.timestamp_ns,
                    "Analysis timestamps went backwards"
                );
            }
        }
        self.analyses.push(analysis);
        Ok(())
    }

    pub fn mode(&self) -> AnalysisMode {
        self.mode
    }

    pub fn started(&self) -> DateTime<Utc> {
        self.started_at
    }

    pub fn len(&self) -> usize {
        self.analyses.len()
    }

    pub fn is_empty(&self) -> bool {
        self.analyses.is_empty()
    }

    pub fn analyses(&self) -> &[PostureAnalysis] {
        &self.analyses
    }

    pub fn summary(&self) -> SessionSummary {
        SessionSummary::from_analyses(self.mode, self.started_at, &self.analyses)
    }

    /// Export to `dir`; see [`export_session`].
    pub fn export(&self, dir: &Path) -> PostureResult<SessionSummary> {
        export_session(self, dir)
    }
}
