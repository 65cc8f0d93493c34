//! Stability estimation over a bounded metrics history.
//!
//! Stability measures how consistent recent frames are: it averages the
//! variance of three motion-sensitive metrics across the window and maps
//! the result onto `[0, 1]` (1 = perfectly still).

use std::collections::VecDeque;

use posture_model::metrics::PostureMetrics;

/// Stability reported before there is enough history to judge.
pub const NEUTRAL_STABILITY: f64 = 0.5;

/// Reference scale applied to the averaged variance.
pub const DEFAULT_STABILITY_SCALE: f64 = 10.0;

/// Reference window length.
pub const DEFAULT_WINDOW: usize = 5;

/// Bounded FIFO of the most recent metrics vectors.
#[derive(Debug, Clone)]
pub struct MetricsHistory {
    frames: VecDeque<PostureMetrics>,
    window: usize,
}

impl MetricsHistory {
    /// Create an empty history holding at most `window` vectors (minimum 1).
    pub fn new(window: usize) -> Self {
        let window = window.max(1);
        Self {
            frames: VecDeque::with_capacity(window + 1),
            window,
        }
    }

    /// Append a vector, evicting the oldest beyond the window.
    pub fn push(&mut self, metrics: PostureMetrics) {
        self.frames.push_back(metrics);
        while self.frames.len() > self.window {
            self.frames.pop_front();
        }
    }

    pub fn len(&self) -> usize {
        self.frames.len()
    }

    pub fn is_empty(&self) -> bool {
        self.frames.is_empty()
    }

    pub fn window(&self) -> usize {
        self.window
    }

    pub fn clear(&mut self) {
        self.frames.clear();
    }

    pub fn iter(&self) -> impl Iterator<Item = &PostureMetrics> {
        self.frames.iter()
    }

    /// Stability of the current window using the given variance scale.
    pub fn stability(&self, scale: f64) -> f64 {
        if self.frames.len() < 2 {
            return NEUTRAL_STABILITY;
        }

        let back: Vec<f64> = self.frames.iter().map(|m| m.back_curvature).collect();
        let shoulders: Vec<f64> = self.frames.iter().map(|m| m.shoulder_alignment).collect();
        let balance: Vec<f64> = self.frames.iter().map(|m| m.overall_stability).collect();

        let avg_variance = (variance(&back) + variance(&shoulders) + variance(&balance)) / 3.0;
        if !avg_variance.is_finite() {
            return 0.0;
        }

        (1.0 - avg_variance * scale).clamp(0.0, 1.0)
    }
}

/// Sample variance (`n - 1` divisor); empty and single-element slices have
/// variance 0.
pub fn variance(values: &[f64]) -> f64 {
    if values.len() < 2 {
        return 0.0;
    }
    let n = values.len() as f64;
    let mean = values.iter().sum::<f64>() / n;
    values.iter().map(|v| (v - mean).powi(2)).sum::<f64>() / (n - 1.0)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn frame(back: f64, shoulders: f64, balance: f64) -> PostureMetrics {
        PostureMetrics {
            back_curvature: back,
            shoulder_alignment: shoulders,
            overall_stability: balance,
            ..PostureMetrics::default()
        }
    }

    #[test]
    fn test_variance_edge_cases() {
        assert_eq!(variance(&[]), 0.0);
        assert_eq!(variance(&[0.7]), 0.0);
        assert!((variance(&[1.0, 3.0]) - 2.0).abs() < 1e-12);
        assert!((variance(&[2.0, 4.0, 6.0]) - 4.0).abs() < 1e-12);
    }

    #[test]
    fn test_short_history_is_neutral() {
        let mut history = MetricsHistory::new(DEFAULT_WINDOW);
        assert_eq!(history.stability(DEFAULT_STABILITY_SCALE), 0.5);
        history.push(frame(0.9, 0.9, 0.0));
        assert_eq!(history.stability(DEFAULT_STABILITY_SCALE), 0.5);
    }

    #[test]
    fn test_identical_frames_are_fully_stable() {
        let mut history = MetricsHistory::new(DEFAULT_WINDOW);
        for _ in 0..5 {
            history.push(frame(0.1, 0.01, 0.9));
        }
        assert!((history.stability(DEFAULT_STABILITY_SCALE) - 1.0).abs() < 1e-12);
    }

    #[test]
    fn test_reference_formula() {
        let mut history = MetricsHistory::new(DEFAULT_WINDOW);
        history.push(frame(0.0, 0.0, 0.5));
        history.push(frame(0.2, 0.0, 0.5));
        // back variance 0.02, others 0 -> avg 0.02/3 -> 1 - 0.2/3
        let expected = 1.0 - (0.02 / 3.0) * 10.0;
        assert!((history.stability(DEFAULT_STABILITY_SCALE) - expected).abs() < 1e-12);
    }

    #[test]
    fn test_erratic_frames_clamp_to_zero() {
        let mut history = MetricsHistory::new(DEFAULT_WINDOW);
        for i in 0..5 {
            let v = if i % 2 == 0 { 0.0 } else { 2.0 };
            history.push(frame(v, v, v));
        }
        assert_eq!(history.stability(DEFAULT_STABILITY_SCALE), 0.0);
    }

    #[test]
    fn test_window_evicts_oldest() {
        let mut history = MetricsHistory::new(3);
        for i in 0..10 {
            history.push(frame(i as f64, 0.0, 0.0));
        }
        assert_eq!(history.len(), 3);
        let backs: Vec<f64> = history.iter().map(|m| m.back_curvature).collect();
        assert_eq!(backs, vec![7.0, 8.0, 9.0]);
    }

    #[test]
    fn test_non_finite_metrics_read_as_unstable() {
        let mut history = MetricsHistory::new(DEFAULT_WINDOW);
        history.push(frame(f64::NAN, 0.0, 0.0));
        history.push(frame(0.1, 0.0, 0.0));
        assert_eq!(history.stability(DEFAULT_STABILITY_SCALE), 0.0);
    }
}
