//! Posture Analysis Core: The Engine
//!
//! Turns a stream of body positions into posture analyses:
//! - **Derivation:** Body landmarks to a fixed metrics vector (pure)
//! - **Stability:** Motion consistency over a bounded history window
//! - **Rules:** Ordered per-mode threshold tables producing issues
//! - **Scoring:** Severity-weighted score with metric bonuses, plus confidence
//!
//! This crate is pure computation: no I/O, no platform dependencies.
//! All inputs are data; all outputs are data.

pub mod confidence;
pub mod derive;
pub mod engine;
pub mod rules;
pub mod scoring;
pub mod stability;

pub use engine::{EngineConfig, EngineConfigBuilder, PostureEngine};
