//! The posture engine: one instance per observation stream.
//!
//! # Pipeline
//!
//! 1. **Derive** a metrics vector from the body position (pure).
//! 2. **Append** it to the bounded history, evicting the oldest entry.
//! 3. **Stability** from the variance of the history window.
//! 4. **Rules** for the mode, in tier order.
//! 5. **Score** and good/bad verdict.
//! 6. **Confidence** from session maturity and stability.
//!
//! The engine holds no locks; callers needing concurrency create one
//! engine per stream. Repeating a call with the same input still advances
//! the history.

use posture_common::config::EngineDefaults;
use posture_common::error::{PostureError, PostureResult};
use posture_model::analysis::PostureAnalysis;
use posture_model::landmark::{AnalysisMode, BodyPosition, TimestampNs};
use posture_model::metrics::PostureMetrics;

use crate::confidence::{confidence, DEFAULT_RAMP_FRAMES};
use crate::derive::derive_metrics;
use crate::rules::evaluate;
use crate::scoring::{is_good_posture, overall_score};
use crate::stability::{MetricsHistory, DEFAULT_STABILITY_SCALE, DEFAULT_WINDOW};

/// Engine parameters.
#[derive(Debug, Clone, PartialEq)]
pub struct EngineConfig {
    /// History length used for stability (minimum 1).
    pub window: usize,

    /// Variance scale `K` in `1 - avg_variance * K`.
    pub stability_scale: f64,

    /// Frames before frame confidence reaches 1.
    pub confidence_ramp_frames: u32,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            window: DEFAULT_WINDOW,
            stability_scale: DEFAULT_STABILITY_SCALE,
            confidence_ramp_frames: DEFAULT_RAMP_FRAMES,
        }
    }
}

impl From<&EngineDefaults> for EngineConfig {
    fn from(defaults: &EngineDefaults) -> Self {
        Self {
            window: defaults.stability_window,
            stability_scale: defaults.stability_scale,
            confidence_ramp_frames: defaults.confidence_ramp_frames,
        }
    }
}

/// Builder for [`EngineConfig`] / [`PostureEngine`].
#[derive(Debug, Clone, Default)]
pub struct EngineConfigBuilder {
    config: EngineConfig,
}

impl EngineConfigBuilder {
    /// Start from the configured application defaults.
    pub fn from_defaults(mut self, defaults: &EngineDefaults) -> Self {
        self.config = EngineConfig::from(defaults);
        self
    }

    pub fn window(mut self, window: usize) -> Self {
        self.config.window = window;
        self
    }

    pub fn stability_scale(mut self, scale: f64) -> Self {
        self.config.stability_scale = scale;
        self
    }

    pub fn confidence_ramp_frames(mut self, frames: u32) -> Self {
        self.config.confidence_ramp_frames = frames;
        self
    }

    /// Validate and produce the configuration.
    pub fn config(self) -> PostureResult<EngineConfig> {
        if self.config.window == 0 {
            return Err(PostureError::config("stability window must be at least 1"));
        }
        if !self.config.stability_scale.is_finite() || self.config.stability_scale < 0.0 {
            return Err(PostureError::config(
                "stability scale must be a non-negative finite number",
            ));
        }
        if self.config.confidence_ramp_frames == 0 {
            return Err(PostureError::config("confidence ramp must be at least 1 frame"));
        }
        Ok(self.config)
    }

    pub fn build(self) -> PostureResult<PostureEngine> {
        Ok(PostureEngine::new(self.config()?))
    }
}

/// Stateful posture analyzer.
#[derive(Debug, Clone)]
pub struct PostureEngine {
    config: EngineConfig,
    history: MetricsHistory,
    analyses: u64,
}

impl PostureEngine {
    /// Create an engine with the given configuration.
    pub fn new(config: EngineConfig) -> Self {
        let history = MetricsHistory::new(config.window);
        Self {
            config,
            history,
            analyses: 0,
        }
    }

    /// Create an engine with the reference configuration (window 5, K 10).
    pub fn with_defaults() -> Self {
        Self::new(EngineConfig::default())
    }

    pub fn builder() -> EngineConfigBuilder {
        EngineConfigBuilder::default()
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    /// Configured history window.
    pub fn window(&self) -> usize {
        self.history.window()
    }

    /// Number of metrics vectors currently held.
    pub fn history_len(&self) -> usize {
        self.history.len()
    }

    /// Number of successful analyses since creation or the last reset.
    pub fn analyses(&self) -> u64 {
        self.analyses
    }

    /// Forget all history, as at the start of a new session.
    pub fn reset(&mut self) {
        self.history.clear();
        self.analyses = 0;
        tracing::debug!("Posture engine history reset");
    }

    /// Analyze a squat observation.
    pub fn analyze_squat_posture(
        &mut self,
        observation: &BodyPosition,
        frame_number: u64,
    ) -> PostureResult<PostureAnalysis> {
        self.analyze_as(AnalysisMode::Squat, observation, frame_number)
    }

    /// Analyze a sitting observation.
    pub fn analyze_sitting_posture(
        &mut self,
        observation: &BodyPosition,
        frame_number: u64,
    ) -> PostureResult<PostureAnalysis> {
        self.analyze_as(AnalysisMode::Sitting, observation, frame_number)
    }

    /// Analyze an observation in its own mode.
    pub fn analyze(
        &mut self,
        observation: &BodyPosition,
        frame_number: u64,
    ) -> PostureResult<PostureAnalysis> {
        self.analyze_as(observation.mode, observation, frame_number)
    }

    /// Analyze an already-derived metrics vector.
    pub fn analyze_metrics(
        &mut self,
        mode: AnalysisMode,
        metrics: PostureMetrics,
        frame_number: u64,
        timestamp_ns: TimestampNs,
    ) -> PostureAnalysis {
        if !metrics.is_finite() {
            tracing::warn!(mode = %mode, frame = frame_number, "Non-finite posture metrics");
        }
        self.history.push(metrics);
        let stability = self.history.stability(self.config.stability_scale);

        let outcome = evaluate(mode, &metrics, stability, timestamp_ns);
        let overall_score = overall_score(mode, &outcome.issues, &metrics, stability);
        let is_good_posture = is_good_posture(&outcome.issues, overall_score);
        let confidence = confidence(frame_number, stability, self.config.confidence_ramp_frames);

        self.analyses += 1;

        let analysis = PostureAnalysis {
            mode,
            frame_number,
            timestamp_ns,
            is_good_posture,
            overall_score,
            issues: outcome.issues,
            metrics,
            stability,
            confidence,
            recommendations: outcome.recommendations.into_vec(),
        };

        if analysis.has_critical() {
            tracing::debug!(
                mode = %mode,
                frame = frame_number,
                score = analysis.overall_score,
                issue = analysis.primary_issue().map(|i| i.message.as_str()).unwrap_or(""),
                "Critical posture issue"
            );
        }
        tracing::trace!(
            mode = %mode,
            frame = frame_number,
            score = analysis.overall_score,
            stability = analysis.stability,
            confidence = analysis.confidence,
            issues = analysis.issues.len(),
            "Posture analyzed"
        );

        analysis
    }

    fn analyze_as(
        &mut self,
        mode: AnalysisMode,
        observation: &BodyPosition,
        frame_number: u64,
    ) -> PostureResult<PostureAnalysis> {
        if observation.mode != mode {
            return Err(PostureError::mode_mismatch(
                mode.as_str(),
                observation.mode.as_str(),
            ));
        }

        // Derivation fails before the history is touched.
        let metrics = derive_metrics(observation)?;
        Ok(self.analyze_metrics(mode, metrics, frame_number, observation.timestamp_ns))
    }
}
