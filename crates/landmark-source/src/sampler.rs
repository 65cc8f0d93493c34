//! Fixed-interval frame sampling over a video's duration.

use posture_common::clock::SessionClock;
use posture_common::error::{PostureError, PostureResult};
use posture_model::landmark::{AnalysisMode, BodyPosition, TimestampNs};

use crate::{LandmarkSource, TimedLandmarks};

/// Produces sample timestamps `0, interval, 2*interval, ...` below the duration.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct VideoFrameSampler {
    duration_ns: u64,
    interval_ns: u64,
}

impl VideoFrameSampler {
    pub fn new(duration_ms: u64, interval_ms: u64) -> PostureResult<Self> {
        if duration_ms == 0 {
            return Err(PostureError::config("video duration must be positive"));
        }
        if interval_ms == 0 {
            return Err(PostureError::config("frame sampling interval must be positive"));
        }
        Ok(Self {
            duration_ns: SessionClock::ms_to_ns(duration_ms),
            interval_ns: SessionClock::ms_to_ns(interval_ms),
        })
    }

    /// Build from a fractional duration in seconds.
    pub fn from_secs(duration_secs: f64, interval_ms: u64) -> PostureResult<Self> {
        if !(duration_secs.is_finite() && duration_secs > 0.0) {
            return Err(PostureError::config("video duration must be positive"));
        }
        Self::new((duration_secs * 1000.0).round() as u64, interval_ms)
    }

    /// Number of frames that will be sampled.
    pub fn sample_count(&self) -> u64 {
        self.duration_ns.div_ceil(self.interval_ns)
    }

    /// Timestamp of the `index`-th sample, if within the video.
    pub fn timestamp(&self, index: u64) -> Option<TimestampNs> {
        let t = index.checked_mul(self.interval_ns)?;
        (t < self.duration_ns).then_some(t)
    }

    pub fn timestamps(&self) -> impl Iterator<Item = TimestampNs> + '_ {
        (0..self.sample_count()).filter_map(move |i| self.timestamp(i))
    }

    pub fn duration_secs(&self) -> f64 {
        SessionClock::ns_to_secs(self.duration_ns)
    }
}

/// Drives a time-addressable source at the sampler's timestamps.
pub struct SampledSource<T> {
    sampler: VideoFrameSampler,
    inner: T,
    next_index: u64,
    name: String,
}

impl<T: TimedLandmarks> SampledSource<T> {
    pub fn new(sampler: VideoFrameSampler, inner: T) -> Self {
        let name = format!("sampled:{}", inner.name());
        tracing::debug!(
            source = %name,
            duration_secs = sampler.duration_secs(),
            samples = sampler.sample_count(),
            "Video frame sampler ready"
        );
        Self {
            sampler,
            inner,
            next_index: 0,
            name,
        }
    }

    pub fn sampler(&self) -> &VideoFrameSampler {
        &self.sampler
    }

    /// Fraction of the video sampled so far, `[0, 1]`.
    pub fn progress(&self) -> f64 {
        let total = self.sampler.sample_count();
        if total == 0 {
            return 1.0;
        }
        self.next_index.min(total) as f64 / total as f64
    }
}

impl<T: TimedLandmarks> LandmarkSource for SampledSource<T> {
    fn next_position(&mut self) -> PostureResult<Option<BodyPosition>> {
        let Some(t) = self.sampler.timestamp(self.next_index) else {
            return Ok(None);
        };
        self.next_index += 1;
        self.inner.position_at(t).map(Some)
    }

    fn name(&self) -> &str {
        &self.name
    }

    fn mode(&self) -> AnalysisMode {
        self.inner.mode()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::synthetic::{SyntheticConfig, SyntheticSource};

    #[test]
    fn test_sample_count_rounds_up() {
        let sampler = VideoFrameSampler::new(1_050, 500).unwrap();
        assert_eq!(sampler.sample_count(), 3);
        let stamps: Vec<u64> = sampler.timestamps().collect();
        assert_eq!(stamps, vec![0, 500_000_000, 1_000_000_000]);
    }

    #[test]
    fn test_exact_multiple_excludes_end() {
        let sampler = VideoFrameSampler::new(1_000, 500).unwrap();
        assert_eq!(sampler.timestamps().count(), 2);
    }

    #[test]
    fn test_zero_values_rejected() {
        assert!(VideoFrameSampler::new(0, 500).is_err());
        assert!(VideoFrameSampler::new(1_000, 0).is_err());
        assert!(VideoFrameSampler::from_secs(f64::NAN, 100).is_err());
    }

    #[test]
    fn test_sampled_source_exhausts() {
        let sampler = VideoFrameSampler::from_secs(2.0, 400).unwrap();
        let synthetic =
            SyntheticSource::new(SyntheticConfig::for_mode(AnalysisMode::Squat)).unwrap();
        let mut source = SampledSource::new(sampler, synthetic);
        assert_eq!(source.name(), "sampled:synthetic");

        let mut stamps = Vec::new();
        while let Some(position) = source.next_position().unwrap() {
            stamps.push(position.timestamp_ns);
        }
        assert_eq!(stamps.len(), 5);
        assert_eq!(stamps.last(), Some(&1_600_000_000));
        assert_eq!(source.progress(), 1.0);
    }
}
