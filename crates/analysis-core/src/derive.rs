//! Metrics derivation: body landmarks to a [`PostureMetrics`] vector.
//!
//! Derivation is a pure function of the current position. It never looks at
//! history and takes absolute values so that the side a person faces does
//! not change how thresholds apply.

use posture_common::error::{PostureError, PostureResult};
use posture_model::landmark::{AnalysisMode, BodyPosition, Landmark, LandmarkName};
use posture_model::metrics::PostureMetrics;

/// Smallest knee-to-ankle extent used as the depth reference.
const MIN_SHIN_EXTENT: f64 = 0.01;

/// Derive metrics for the position's own mode.
pub fn derive_metrics(position: &BodyPosition) -> PostureResult<PostureMetrics> {
    warn_out_of_frame(position);
    match position.mode {
        AnalysisMode::Sitting => derive_sitting_metrics(position),
        AnalysisMode::Squat => derive_squat_metrics(position),
    }
}

/// Sitting metrics: head tilt, slouch, and shoulder level.
pub fn derive_sitting_metrics(position: &BodyPosition) -> PostureResult<PostureMetrics> {
    let mode = AnalysisMode::Sitting;
    let head = require(position, mode, LandmarkName::Head)?;
    let neck = require(position, mode, LandmarkName::Neck)?;
    let left_shoulder = require(position, mode, LandmarkName::LeftShoulder)?;
    let right_shoulder = require(position, mode, LandmarkName::RightShoulder)?;
    let spine = require(position, mode, LandmarkName::Spine)?;
    let hips = require(position, mode, LandmarkName::Hips)?;

    Ok(PostureMetrics {
        neck_angle: neck_tilt_degrees(neck, head),
        back_curvature: (spine.x - hips.x).abs(),
        shoulder_alignment: (left_shoulder.y - right_shoulder.y).abs(),
        hip_alignment: 0.0,
        knee_tracking: 0.0,
        squat_depth: 0.0,
        overall_stability: balance(head.x, hips.x),
    })
}

/// Squat metrics: knee tracking, depth, forward lean, and shoulder level.
pub fn derive_squat_metrics(position: &BodyPosition) -> PostureResult<PostureMetrics> {
    let mode = AnalysisMode::Squat;
    require(position, mode, LandmarkName::Head)?;
    let left_shoulder = require(position, mode, LandmarkName::LeftShoulder)?;
    let right_shoulder = require(position, mode, LandmarkName::RightShoulder)?;
    let hips = require(position, mode, LandmarkName::Hips)?;
    let left_knee = require(position, mode, LandmarkName::LeftKnee)?;
    let right_knee = require(position, mode, LandmarkName::RightKnee)?;
    let left_ankle = require(position, mode, LandmarkName::LeftAnkle)?;
    let right_ankle = require(position, mode, LandmarkName::RightAnkle)?;

    let knee_tracking = (left_knee.x - left_ankle.x)
        .abs()
        .max((right_knee.x - right_ankle.x).abs());

    let knee_y = (left_knee.y + right_knee.y) * 0.5;
    let shin = (((left_ankle.y - left_knee.y).abs() + (right_ankle.y - right_knee.y).abs()) * 0.5)
        .max(MIN_SHIN_EXTENT);
    let squat_depth = clamp01(1.0 - (knee_y - hips.y) / shin);

    let shoulder_mid = Landmark::midpoint(left_shoulder, right_shoulder);
    let ankle_mid = Landmark::midpoint(left_ankle, right_ankle);
    let hip_alignment = (hips.x - ankle_mid.x).abs();

    Ok(PostureMetrics {
        neck_angle: 0.0,
        back_curvature: (shoulder_mid.x - hips.x).abs(),
        shoulder_alignment: (left_shoulder.y - right_shoulder.y).abs(),
        hip_alignment,
        knee_tracking,
        squat_depth,
        overall_stability: clamp01(1.0 - hip_alignment),
    })
}

/// Deviation of the neck-to-head vector from upright, in degrees.
///
/// The raw angle is taken against the horizontal, then folded so that a head
/// directly above the neck reads 0 and a head level with the neck reads 90.
pub fn neck_tilt_degrees(neck: &Landmark, head: &Landmark) -> f64 {
    let from_horizontal = (head.y - neck.y).atan2(head.x - neck.x).to_degrees().abs();
    (90.0 - from_horizontal).abs()
}

fn balance(top_x: f64, base_x: f64) -> f64 {
    clamp01(1.0 - (top_x - base_x).abs())
}

fn require(
    position: &BodyPosition,
    mode: AnalysisMode,
    name: LandmarkName,
) -> PostureResult<&Landmark> {
    position
        .get(name)
        .ok_or_else(|| PostureError::missing_landmark(mode.as_str(), name.as_str()))
}

fn warn_out_of_frame(position: &BodyPosition) {
    let outside = position.out_of_frame_landmarks();
    if !outside.is_empty() {
        tracing::warn!(
            t = position.timestamp_ns,
            landmarks = ?outside,
            "Landmarks outside normalized image bounds; upstream capture may be miscalibrated"
        );
    }
}

fn clamp01(value: f64) -> f64 {
    value.clamp(0.0, 1.0)
}
