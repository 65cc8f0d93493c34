//! Deterministic synthetic motion.
//!
//! Stands in for a pose detector during demos and tests. Motion is a pure
//! function of time plus optional jitter drawn from a seeded RNG, so two
//! sources built from the same config produce identical streams.

use std::f64::consts::TAU;

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use posture_common::clock::SessionClock;
use posture_common::error::{PostureError, PostureResult};
use posture_model::landmark::{AnalysisMode, BodyPosition, Landmark, LandmarkName, TimestampNs};

use crate::{LandmarkSource, TimedLandmarks};

/// Configuration for synthetic motion.
#[derive(Debug, Clone)]
pub struct SyntheticConfig {
    pub mode: AnalysisMode,

    /// Duration of one motion cycle (slouch cycle or squat rep), seconds.
    pub period_secs: f64,

    /// Motion strength in `[0, 1]`; 1 reaches the worst posture of the cycle.
    pub amplitude: f64,

    /// Maximum per-coordinate noise (normalized units).
    pub jitter: f64,

    /// How far the knees drift inward at the bottom of a rep.
    pub knee_drift: f64,

    /// RNG seed for jitter.
    pub seed: u64,

    /// Interval between ticks when driven as a [`LandmarkSource`] (ms).
    pub interval_ms: u64,

    /// Stop after this many ticks; `None` runs forever.
    pub frames: Option<u64>,
}

impl SyntheticConfig {
    /// Defaults for a mode: 4s cycles, moderate motion, light jitter.
    pub fn for_mode(mode: AnalysisMode) -> Self {
        Self {
            mode,
            period_secs: 4.0,
            amplitude: 0.6,
            jitter: 0.005,
            knee_drift: 0.08,
            seed: 0x5eed,
            interval_ms: 100,
            frames: None,
        }
    }

    fn validate(&self) -> PostureResult<()> {
        if !(self.period_secs.is_finite() && self.period_secs > 0.0) {
            return Err(PostureError::config("synthetic period must be positive"));
        }
        if !(0.0..=1.0).contains(&self.amplitude) {
            return Err(PostureError::config("synthetic amplitude must be within [0, 1]"));
        }
        if !(self.jitter.is_finite() && self.jitter >= 0.0) {
            return Err(PostureError::config("synthetic jitter must be non-negative"));
        }
        if self.interval_ms == 0 {
            return Err(PostureError::config("synthetic interval must be at least 1 ms"));
        }
        Ok(())
    }
}

/// Synthetic landmark generator.
pub struct SyntheticSource {
    config: SyntheticConfig,
    rng: StdRng,
    frame: u64,
}

impl SyntheticSource {
    pub fn new(config: SyntheticConfig) -> PostureResult<Self> {
        config.validate()?;
        let rng = StdRng::seed_from_u64(config.seed);
        tracing::debug!(
            mode = %config.mode,
            period_secs = config.period_secs,
            amplitude = config.amplitude,
            seed = config.seed,
            "Synthetic landmark source created"
        );
        Ok(Self {
            config,
            rng,
            frame: 0,
        })
    }

    pub fn config(&self) -> &SyntheticConfig {
        &self.config
    }

    /// Cycle position in `[0, 1]`: 0 at rest, 1 at the worst point.
    fn cycle(&self, t_secs: f64) -> f64 {
        let phase = TAU * t_secs / self.config.period_secs;
        0.5 * (1.0 - phase.cos()) * self.config.amplitude
    }

    fn noise(&mut self) -> f64 {
        if self.config.jitter > 0.0 {
            self.rng.gen_range(-self.config.jitter..=self.config.jitter)
        } else {
            0.0
        }
    }

    fn put(&mut self, position: &mut BodyPosition, name: LandmarkName, x: f64, y: f64) {
        let x = x + self.noise();
        let y = y + self.noise();
        position.set(name, Landmark::new(x, y));
    }

    fn sitting_at(&mut self, timestamp_ns: TimestampNs, t_secs: f64) -> BodyPosition {
        let slouch = self.cycle(t_secs);
        // Slow lateral sway, half the slouch frequency.
        let sway = (TAU * t_secs / (self.config.period_secs * 2.0)).sin() * self.config.amplitude;

        let mut position = BodyPosition::new(timestamp_ns, AnalysisMode::Sitting);
        self.put(&mut position, LandmarkName::Head, 0.50 + 0.10 * slouch, 0.20 + 0.04 * slouch);
        self.put(&mut position, LandmarkName::Neck, 0.50 + 0.02 * slouch, 0.30 + 0.02 * slouch);
        self.put(&mut position, LandmarkName::LeftShoulder, 0.40, 0.35 + 0.03 * sway);
        self.put(&mut position, LandmarkName::RightShoulder, 0.60, 0.35 - 0.03 * sway);
        self.put(&mut position, LandmarkName::Spine, 0.50 + 0.35 * slouch, 0.50);
        self.put(&mut position, LandmarkName::Hips, 0.50, 0.70);
        position
    }

    fn squat_at(&mut self, timestamp_ns: TimestampNs, t_secs: f64) -> BodyPosition {
        let depth = self.cycle(t_secs);
        let drift = self.config.knee_drift * depth;
        let lean = 0.15 * depth;
        let shoulder_y = 0.25 + 0.22 * depth;

        let mut position = BodyPosition::new(timestamp_ns, AnalysisMode::Squat);
        self.put(&mut position, LandmarkName::Head, 0.50 + lean, shoulder_y - 0.12);
        self.put(&mut position, LandmarkName::LeftShoulder, 0.45 + lean, shoulder_y);
        self.put(&mut position, LandmarkName::RightShoulder, 0.55 + lean, shoulder_y);
        self.put(&mut position, LandmarkName::Hips, 0.50, 0.50 + 0.22 * depth);
        self.put(&mut position, LandmarkName::LeftKnee, 0.40 + drift, 0.70);
        self.put(&mut position, LandmarkName::RightKnee, 0.60 - drift, 0.70);
        self.put(&mut position, LandmarkName::LeftAnkle, 0.40, 0.90);
        self.put(&mut position, LandmarkName::RightAnkle, 0.60, 0.90);
        position
    }
}

impl TimedLandmarks for SyntheticSource {
    fn position_at(&mut self, timestamp_ns: TimestampNs) -> PostureResult<BodyPosition> {
        let t_secs = timestamp_ns as f64 / 1_000_000_000.0;
        Ok(match self.config.mode {
            AnalysisMode::Sitting => self.sitting_at(timestamp_ns, t_secs),
            AnalysisMode::Squat => self.squat_at(timestamp_ns, t_secs),
        })
    }

    fn name(&self) -> &str {
        "synthetic"
    }

    fn mode(&self) -> AnalysisMode {
        self.config.mode
    }
}

impl LandmarkSource for SyntheticSource {
    fn next_position(&mut self) -> PostureResult<Option<BodyPosition>> {
        if self.config.frames.is_some_and(|limit| self.frame >= limit) {
            return Ok(None);
        }
        let timestamp_ns =
            SessionClock::ms_to_ns(self.config.interval_ms).saturating_mul(self.frame);
        self.frame += 1;
        self.position_at(timestamp_ns).map(Some)
    }

    fn name(&self) -> &str {
        "synthetic"
    }

    fn mode(&self) -> AnalysisMode {
        self.config.mode
    }
}
