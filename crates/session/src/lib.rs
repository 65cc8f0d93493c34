//! Posture Session Recording
//!
//! Consumes the engine's per-tick analyses for one session and turns them
//! into aggregate feedback: share of good-posture frames, score and
//! confidence averages, issue frequencies, and the session's unique
//! recommendations. Sessions can be exported to a directory and their
//! summaries loaded back later.

pub mod export;
pub mod recorder;
pub mod summary;

pub use export::{export_session, load_summary, FRAMES_FILE, SUMMARY_FILE};
pub use recorder::SessionRecorder;
pub use summary::SessionSummary;
