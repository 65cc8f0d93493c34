//! Posture Model
//!
//! Defines the core data contracts for posture analysis:
//! - **Landmarks:** Named body keypoints and per-tick body positions
//! - **Metrics:** The derived scalar feature vector the engine scores
//! - **Analysis:** Issues, recommendations, and the per-tick analysis record
//!
//! All coordinates are normalized to `[0.0, 1.0]` image fractions so that
//! positions survive resolution changes between capture devices.

pub mod analysis;
pub mod landmark;
pub mod metrics;

pub use analysis::*;
pub use landmark::*;
pub use metrics::*;
