//! Confidence estimation.

/// Confidence never reads lower than this.
pub const CONFIDENCE_FLOOR: f64 = 0.1;

/// Frames before frame confidence saturates in the reference behavior.
pub const DEFAULT_RAMP_FRAMES: u32 = 10;

/// Blend session maturity and motion stability into `[0.1, 1.0]`.
///
/// `frame_confidence = min(1, frame_number / ramp)`, then
/// `(frame_confidence * 0.4 + stability * 0.6) * 0.9 + 0.1`.
pub fn confidence(frame_number: u64, stability: f64, ramp_frames: u32) -> f64 {
    let ramp = f64::from(ramp_frames.max(1));
    let frame_confidence = (frame_number as f64 / ramp).min(1.0);
    let stability = if stability.is_finite() {
        stability.clamp(0.0, 1.0)
    } else {
        0.0
    };

    ((frame_confidence * 0.4 + stability * 0.6) * 0.9 + CONFIDENCE_FLOOR)
        .clamp(CONFIDENCE_FLOOR, 1.0)
}
