//! Replay of recorded observation files.

use std::collections::VecDeque;
use std::path::Path;

use posture_common::error::{PostureError, PostureResult};
use posture_model::landmark::{
    parse_observations, parse_stream_header, AnalysisMode, BodyPosition,
};

use crate::LandmarkSource;

/// Plays back a JSONL observation file in order.
#[derive(Debug)]
pub struct ReplaySource {
    mode: AnalysisMode,
    pending: VecDeque<BodyPosition>,
    name: String,
}

impl ReplaySource {
    /// Load a file, checking that every observation matches `mode`.
    pub fn open(path: &Path, mode: AnalysisMode) -> PostureResult<Self> {
        if !path.exists() {
            return Err(PostureError::FileNotFound {
                path: path.to_path_buf(),
            });
        }
        let content = std::fs::read_to_string(path)?;
        let mut source = Self::from_jsonl(&content, mode)?;
        source.name = format!("replay:{}", path.display());
        tracing::info!(
            path = %path.display(),
            observations = source.remaining(),
            "Loaded observation replay"
        );
        Ok(source)
    }

    /// Parse JSONL content directly.
    pub fn from_jsonl(content: &str, mode: AnalysisMode) -> PostureResult<Self> {
        if let Some(header) = parse_stream_header(content) {
            if header.mode != mode {
                return Err(PostureError::mode_mismatch(
                    mode.as_str(),
                    header.mode.as_str(),
                ));
            }
        }

        let positions =
            parse_observations(content).map_err(|e| PostureError::source(e.to_string()))?;
        if let Some(bad) = positions.iter().find(|p| p.mode != mode) {
            return Err(PostureError::mode_mismatch(mode.as_str(), bad.mode.as_str()));
        }

        Ok(Self {
            mode,
            pending: positions.into(),
            name: "replay".to_string(),
        })
    }

    /// Observations not yet consumed.
    pub fn remaining(&self) -> usize {
        self.pending.len()
    }
}

impl LandmarkSource for ReplaySource {
    fn next_position(&mut self) -> PostureResult<Option<BodyPosition>> {
        Ok(self.pending.pop_front())
    }

    fn name(&self) -> &str {
        &self.name
    }

    fn mode(&self) -> AnalysisMode {
        self.mode
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use posture_model::landmark::{serialize_observations, LandmarkName};

    fn sample(mode: AnalysisMode, t: u64) -> BodyPosition {
        BodyPosition::new(t, mode).with(LandmarkName::Head, 0.5, 0.2)
    }

    #[test]
    fn test_replays_in_order() {
        let content = serialize_observations(&[
            sample(AnalysisMode::Sitting, 0),
            sample(AnalysisMode::Sitting, 100),
        ])
        .unwrap();
        let mut source = ReplaySource::from_jsonl(&content, AnalysisMode::Sitting).unwrap();
        assert_eq!(source.remaining(), 2);
        assert_eq!(source.next_position().unwrap().unwrap().timestamp_ns, 0);
        assert_eq!(source.next_position().unwrap().unwrap().timestamp_ns, 100);
        assert!(source.next_position().unwrap().is_none());
    }

    #[test]
    fn test_rejects_foreign_mode() {
        let content = serialize_observations(&[sample(AnalysisMode::Squat, 0)]).unwrap();
        let err = ReplaySource::from_jsonl(&content, AnalysisMode::Sitting).unwrap_err();
        assert!(matches!(err, PostureError::ModeMismatch { .. }));
    }

    #[test]
    fn test_missing_file() {
        let err = ReplaySource::open(
            Path::new("/nonexistent/posture/observations.jsonl"),
            AnalysisMode::Squat,
        )
        .unwrap_err();
        assert!(matches!(err, PostureError::FileNotFound { .. }));
    }

    #[test]
    fn test_fixture_replay() {
        let path = std::path::PathBuf::from(env!("CARGO_MANIFEST_DIR"))
            .join("..")
            .join("..")
            .join("fixtures")
            .join("squat-session.jsonl");
        let source = ReplaySource::open(&path, AnalysisMode::Squat).unwrap();
        assert_eq!(source.remaining(), 12);
    }
}
