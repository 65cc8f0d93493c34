//! Observation capture: records a landmark stream so it can be replayed.
//!
//! The file is JSONL with the stream header as a leading `#` line, the same
//! layout [`ReplaySource`](crate::ReplaySource) reads back. Lines are
//! buffered and pushed to disk every `flush_every` observations.

use std::fs::{File, OpenOptions};
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};

use posture_common::error::{PostureError, PostureResult};
use posture_model::landmark::{
    observation_line, stream_header_line, AnalysisMode, BodyPosition, ObservationStreamHeader,
    TimestampNs,
};

use crate::LandmarkSource;

/// Observations between forced flushes unless configured otherwise.
pub const DEFAULT_FLUSH_EVERY: u64 = 1000;

/// Writes one mode's observations to a replayable JSONL file.
pub struct ObservationWriter {
    out: BufWriter<File>,
    path: PathBuf,
    header: ObservationStreamHeader,
    flush_every: u64,
    observations_written: u64,
    last_timestamp_ns: Option<TimestampNs>,
}

impl ObservationWriter {
    /// Create (or truncate) `path` and write the stream header.
    pub fn create(path: &Path, header: ObservationStreamHeader) -> PostureResult<Self> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let file = OpenOptions::new()
            .create(true)
            .write(true)
            .truncate(true)
            .open(path)?;

        let mut out = BufWriter::new(file);
        writeln!(out, "{}", stream_header_line(&header)?)?;

        tracing::debug!(
            path = %path.display(),
            mode = %header.mode,
            source = %header.source,
            "Recording observations"
        );

        Ok(Self {
            out,
            path: path.to_path_buf(),
            header,
            flush_every: DEFAULT_FLUSH_EVERY,
            observations_written: 0,
            last_timestamp_ns: None,
        })
    }

    /// Create a writer whose header describes `source`.
    pub fn for_source(
        path: &Path,
        source: &dyn LandmarkSource,
        interval_ms: u64,
        epoch_wall: &str,
    ) -> PostureResult<Self> {
        let header = ObservationStreamHeader::new(source.mode(), source.name(), interval_ms, epoch_wall);
        Self::create(path, header)
    }

    /// Flush after every `n` observations (minimum 1).
    pub fn with_flush_every(mut self, n: u64) -> Self {
        self.flush_every = n.max(1);
        self
    }

    /// Append one observation. Positions of another mode are rejected so the
    /// file always replays under its header's mode.
    pub fn write(&mut self, position: &BodyPosition) -> PostureResult<()> {
        if position.mode != self.header.mode {
            return Err(PostureError::mode_mismatch(
                self.header.mode.as_str(),
                position.mode.as_str(),
            ));
        }
        if self
            .last_timestamp_ns
            .is_some_and(|last| position.timestamp_ns < last)
        {
            tracing::warn!(
                t = position.timestamp_ns,
                "Recorded observation is older than its predecessor"
            );
        }

        writeln!(self.out, "{}", observation_line(position)?)
            .map_err(|e| PostureError::source(format!("Failed to record observation: {e}")))?;
        self.observations_written += 1;
        self.last_timestamp_ns = Some(position.timestamp_ns);

        if self.observations_written % self.flush_every == 0 {
            self.flush()?;
        }
        Ok(())
    }

    pub fn flush(&mut self) -> PostureResult<()> {
        self.out
            .flush()
            .map_err(|e| PostureError::source(format!("Failed to flush observations: {e}")))
    }

    /// Flush and close, returning the number of observations recorded.
    pub fn finish(mut self) -> PostureResult<u64> {
        self.flush()?;
        tracing::debug!(
            path = %self.path.display(),
            observations = self.observations_written,
            "Observation recording closed"
        );
        Ok(self.observations_written)
    }

    pub fn mode(&self) -> AnalysisMode {
        self.header.mode
    }

    pub fn observations_written(&self) -> u64 {
        self.observations_written
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::replay::ReplaySource;
    use crate::synthetic::{SyntheticConfig, SyntheticSource};
    use posture_model::landmark::{parse_stream_header, LandmarkName};

    fn temp_path(name: &str) -> PathBuf {
        let dir = std::env::temp_dir().join(name);
        let _ = std::fs::remove_dir_all(&dir);
        dir.join("observations.jsonl")
    }

    fn sitting(t: u64) -> BodyPosition {
        BodyPosition::new(t, AnalysisMode::Sitting)
            .with(LandmarkName::Head, 0.5, 0.2)
            .with(LandmarkName::Hips, 0.5, 0.7)
    }

    #[test]
    fn test_recorded_synthetic_stream_replays() {
        let path = temp_path("posture_test_writer_replay");
        let mut source = SyntheticSource::new(SyntheticConfig {
            frames: Some(5),
            ..SyntheticConfig::for_mode(AnalysisMode::Squat)
        })
        .unwrap();

        let mut writer =
            ObservationWriter::for_source(&path, &source, 100, "2026-01-01T00:00:00Z").unwrap();
        let mut recorded = Vec::new();
        while let Some(position) = LandmarkSource::next_position(&mut source).unwrap() {
            writer.write(&position).unwrap();
            recorded.push(position);
        }
        assert_eq!(writer.finish().unwrap(), 5);

        let content = std::fs::read_to_string(&path).unwrap();
        let header = parse_stream_header(&content).unwrap();
        assert_eq!(header.mode, AnalysisMode::Squat);
        assert_eq!(header.source, "synthetic");
        assert_eq!(header.interval_ms, 100);

        let mut replay = ReplaySource::open(&path, AnalysisMode::Squat).unwrap();
        assert_eq!(replay.remaining(), 5);
        let first = replay.next_position().unwrap().unwrap();
        assert_eq!(first.timestamp_ns, recorded[0].timestamp_ns);
        assert_eq!(first.landmarks.len(), recorded[0].landmarks.len());

        std::fs::remove_dir_all(path.parent().unwrap()).ok();
    }

    #[test]
    fn test_flushes_every_n_observations() {
        let path = temp_path("posture_test_writer_flush");
        let header = ObservationStreamHeader::new(AnalysisMode::Sitting, "test", 100, "now");
        let mut writer = ObservationWriter::create(&path, header)
            .unwrap()
            .with_flush_every(2);

        writer.write(&sitting(0)).unwrap();
        // Still buffered: nothing on disk yet.
        assert_eq!(std::fs::read_to_string(&path).unwrap().lines().count(), 0);

        writer.write(&sitting(100)).unwrap();
        // Header plus two observations.
        assert_eq!(std::fs::read_to_string(&path).unwrap().lines().count(), 3);

        writer.write(&sitting(200)).unwrap();
        assert_eq!(std::fs::read_to_string(&path).unwrap().lines().count(), 3);

        assert_eq!(writer.finish().unwrap(), 3);
        assert_eq!(std::fs::read_to_string(&path).unwrap().lines().count(), 4);

        std::fs::remove_dir_all(path.parent().unwrap()).ok();
    }

    #[test]
    fn test_rejects_position_of_other_mode() {
        let path = temp_path("posture_test_writer_mode");
        let header = ObservationStreamHeader::new(AnalysisMode::Squat, "test", 100, "now");
        let mut writer = ObservationWriter::create(&path, header).unwrap();

        let err = writer.write(&sitting(0)).unwrap_err();
        assert!(matches!(err, PostureError::ModeMismatch { .. }));
        assert_eq!(writer.observations_written(), 0);
        assert_eq!(writer.mode(), AnalysisMode::Squat);

        std::fs::remove_dir_all(path.parent().unwrap()).ok();
    }
}
