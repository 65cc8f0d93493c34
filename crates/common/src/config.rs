//! Application configuration.

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Global application configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AppConfig {
    /// Directory where exported sessions are stored.
    pub sessions_dir: PathBuf,

    /// Analysis engine parameters.
    #[serde(default)]
    pub engine: EngineDefaults,

    /// Observation sampling cadence.
    #[serde(default)]
    pub sampling: SamplingDefaults,

    /// Logging configuration.
    #[serde(default)]
    pub logging: LoggingConfig,
}

/// Tunable engine parameters.
///
/// Rule thresholds and score bonuses are fixed and deliberately absent here.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EngineDefaults {
    /// Number of metric vectors kept for stability estimation.
    pub stability_window: usize,

    /// Scale applied to the averaged variance before subtracting from 1.
    pub stability_scale: f64,

    /// Observations needed before frame confidence saturates.
    pub confidence_ramp_frames: u32,
}

/// Default observation cadence.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SamplingDefaults {
    /// Tick interval for live sessions (ms).
    pub live_interval_ms: u64,

    /// Frame sampling interval for video jobs (ms).
    pub video_interval_ms: u64,
}

/// Logging configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingConfig {
    /// Log level filter (e.g., "info", "debug", "posture_analysis_core=trace,warn").
    pub level: String,

    /// Whether to output structured JSON logs.
    pub json: bool,

    /// Optional log file path.
    pub file: Option<PathBuf>,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            sessions_dir: dirs_default_sessions(),
            engine: EngineDefaults::default(),
            sampling: SamplingDefaults::default(),
            logging: LoggingConfig::default(),
        }
    }
}

impl Default for EngineDefaults {
    fn default() -> Self {
        Self {
            stability_window: 5,
            stability_scale: 10.0,
            confidence_ramp_frames: 10,
        }
    }
}

impl Default for SamplingDefaults {
    fn default() -> Self {
        Self {
            live_interval_ms: 100,
            video_interval_ms: 500,
        }
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            json: false,
            file: None,
        }
    }
}

impl AppConfig {
    /// Load config from the standard location, falling back to defaults.
    pub fn load() -> Self {
        let config_path = config_file_path();
        if config_path.exists() {
            match std::fs::read_to_string(&config_path) {
                Ok(content) => match serde_json::from_str(&content) {
                    Ok(config) => return config,
                    Err(e) => {
                        tracing::warn!("Failed to parse config at {:?}: {}", config_path, e);
                    }
                },
                Err(e) => {
                    tracing::warn!("Failed to read config at {:?}: {}", config_path, e);
                }
            }
        }
        Self::default()
    }

    /// Save config to the standard location.
    pub fn save(&self) -> Result<PathBuf, std::io::Error> {
        let config_path = config_file_path();
        if let Some(parent) = config_path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let json = serde_json::to_string_pretty(self).map_err(std::io::Error::other)?;
        std::fs::write(&config_path, json)?;
        Ok(config_path)
    }
}

/// Standard config file location.
pub fn config_file_path() -> PathBuf {
    let base = std::env::var("XDG_CONFIG_HOME")
        .map(PathBuf::from)
        .unwrap_or_else(|_| {
            let home = std::env::var("HOME").unwrap_or_else(|_| "/tmp".to_string());
            PathBuf::from(home).join(".config")
        });
    base.join("posture").join("config.json")
}

/// Default sessions directory.
fn dirs_default_sessions() -> PathBuf {
    let base = std::env::var("XDG_DATA_HOME")
        .map(PathBuf::from)
        .unwrap_or_else(|_| {
            let home = std::env::var("HOME").unwrap_or_else(|_| "/tmp".to_string());
            PathBuf::from(home).join(".local").join("share")
        });
    base.join("posture").join("sessions")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_engine_defaults_match_reference_behavior() {
        let engine = EngineDefaults::default();
        assert_eq!(engine.stability_window, 5);
        assert_eq!(engine.stability_scale, 10.0);
        assert_eq!(engine.confidence_ramp_frames, 10);
    }

    #[test]
    fn test_partial_config_fills_missing_sections() {
        let raw = r#"{ "sessions_dir": "/var/lib/posture" }"#;
        let parsed: AppConfig = serde_json::from_str(raw).unwrap();
        assert_eq!(parsed.sessions_dir, PathBuf::from("/var/lib/posture"));
        assert_eq!(parsed.engine.stability_window, 5);
        assert_eq!(parsed.sampling.video_interval_ms, 500);
        assert_eq!(parsed.logging.level, "info");
    }
}
