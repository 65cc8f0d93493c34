//! Posture Landmark Sources
//!
//! Supplies one [`BodyPosition`] per tick to the analysis engine. Sources
//! are pluggable so the engine never knows where landmarks come from:
//!
//! - **Synthetic:** Deterministic sinusoidal motion with seeded jitter
//! - **Replay:** Observations recorded earlier as JSONL
//! - **Sampled:** Fixed-interval frame sampling over a video's duration
//!
//! Observations are written in append-only JSONL format for crash safety.

pub mod replay;
pub mod sampler;
pub mod synthetic;
pub mod writer;

use posture_common::error::PostureResult;
use posture_model::landmark::{AnalysisMode, BodyPosition, TimestampNs};

pub use replay::ReplaySource;
pub use sampler::{SampledSource, VideoFrameSampler};
pub use synthetic::{SyntheticConfig, SyntheticSource};
pub use writer::ObservationWriter;

/// Trait for tick-driven landmark sources.
pub trait LandmarkSource: Send {
    /// Produce the next observation. Returns `None` once the stream is exhausted.
    fn next_position(&mut self) -> PostureResult<Option<BodyPosition>>;

    /// Source name for logging and stream headers.
    fn name(&self) -> &str;

    /// Mode every produced observation belongs to.
    fn mode(&self) -> AnalysisMode;
}

/// A source that can be queried at an arbitrary point in time, such as a
/// decoded video or a synthetic motion model.
pub trait TimedLandmarks: Send {
    /// Landmarks at `timestamp_ns` from the start of the stream.
    fn position_at(&mut self, timestamp_ns: TimestampNs) -> PostureResult<BodyPosition>;

    fn name(&self) -> &str;

    fn mode(&self) -> AnalysisMode;
}

impl<S: LandmarkSource + ?Sized> LandmarkSource for Box<S> {
    fn next_position(&mut self) -> PostureResult<Option<BodyPosition>> {
        (**self).next_position()
    }

    fn name(&self) -> &str {
        (**self).name()
    }

    fn mode(&self) -> AnalysisMode {
        (**self).mode()
    }
}
