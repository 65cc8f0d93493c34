//! Derived posture metrics.

use serde::{Deserialize, Serialize};

/// Scalar feature vector derived from one body position.
///
/// The shape is the same for every mode; fields that do not apply to the
/// active mode are `0.0`. Ratios are normalized image-fraction offsets and
/// are not clamped, so out-of-range values pass through to the rules.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct PostureMetrics {
    /// Forward head tilt in degrees, nominally `[0, 60]`.
    pub neck_angle: f64,
    /// Slouch (sitting) or forward lean (squat) offset.
    pub back_curvature: f64,
    /// Vertical offset between the shoulders.
    pub shoulder_alignment: f64,
    /// Horizontal offset of the hips over the base of support.
    pub hip_alignment: f64,
    /// Knee-over-toe horizontal offset, worst side.
    pub knee_tracking: f64,
    /// Squat depth in `[0, 1]`; 0 is standing, 1 is hips level with knees.
    pub squat_depth: f64,
    /// Per-frame balance figure in `[0, 1]`.
    pub overall_stability: f64,
}

impl PostureMetrics {
    /// Sitting-mode metrics; squat-only fields stay zero.
    pub fn sitting(neck_angle: f64, back_curvature: f64, shoulder_alignment: f64) -> Self {
        Self {
            neck_angle,
            back_curvature,
            shoulder_alignment,
            ..Self::default()
        }
    }

    /// Squat-mode metrics; `neck_angle` stays zero.
    pub fn squat(knee_tracking: f64, back_curvature: f64, squat_depth: f64) -> Self {
        Self {
            knee_tracking,
            back_curvature,
            squat_depth,
            ..Self::default()
        }
    }

    pub fn with_shoulder_alignment(mut self, value: f64) -> Self {
        self.shoulder_alignment = value;
        self
    }

    pub fn with_overall_stability(mut self, value: f64) -> Self {
        self.overall_stability = value;
        self
    }

    /// Whether every field is a finite number.
    pub fn is_finite(&self) -> bool {
        [
            self.neck_angle,
            self.back_curvature,
            self.shoulder_alignment,
            self.hip_alignment,
            self.knee_tracking,
            self.squat_depth,
            self.overall_stability,
        ]
        .iter()
        .all(|v| v.is_finite())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_constructors_leave_other_mode_fields_zero() {
        let sit = PostureMetrics::sitting(12.0, 0.1, 0.02);
        assert_eq!(sit.knee_tracking, 0.0);
        assert_eq!(sit.squat_depth, 0.0);
        assert_eq!(sit.hip_alignment, 0.0);

        let squat = PostureMetrics::squat(0.02, 0.1, 0.8);
        assert_eq!(squat.neck_angle, 0.0);
    }

    #[test]
    fn test_non_finite_detection() {
        let mut metrics = PostureMetrics::default();
        assert!(metrics.is_finite());
        metrics.back_curvature = f64::NAN;
        assert!(!metrics.is_finite());
    }
}
