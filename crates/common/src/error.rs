//! Error types shared across posture crates.

use std::path::PathBuf;

/// Top-level error type for posture operations.
#[derive(Debug, thiserror::Error)]
pub enum PostureError {
    /// A landmark required by the active analysis mode was not supplied.
    #[error("Missing landmark '{landmark}' required for {mode} analysis")]
    MissingLandmark { mode: String, landmark: String },

    /// An observation was handed to the analyzer of a different mode.
    #[error("Mode mismatch: expected {expected}, got {actual}")]
    ModeMismatch { expected: String, actual: String },

    #[error("Landmark source error: {message}")]
    Source { message: String },

    #[error("Session error: {message}")]
    Session { message: String },

    #[error("Configuration error: {message}")]
    Config { message: String },

    #[error("File not found: {path}")]
    FileNotFound { path: PathBuf },

    #[error(transparent)]
    Io(#[from] std::io::Error),

    #[error(transparent)]
    Json(#[from] serde_json::Error),

    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

/// Result type alias using PostureError.
pub type PostureResult<T> = Result<T, PostureError>;

impl PostureError {
    pub fn missing_landmark(mode: impl Into<String>, landmark: impl Into<String>) -> Self {
        Self::MissingLandmark {
            mode: mode.into(),
            landmark: landmark.into(),
        }
    }

    pub fn mode_mismatch(expected: impl Into<String>, actual: impl Into<String>) -> Self {
        Self::ModeMismatch {
            expected: expected.into(),
            actual: actual.into(),
        }
    }

    pub fn source(msg: impl Into<String>) -> Self {
        Self::Source {
            message: msg.into(),
        }
    }

    pub fn session(msg: impl Into<String>) -> Self {
        Self::Session {
            message: msg.into(),
        }
    }

    pub fn config(msg: impl Into<String>) -> Self {
        Self::Config {
            message: msg.into(),
        }
    }

    /// Whether this error is a caller contract violation (bad input) rather
    /// than an environmental failure.
    pub fn is_contract_violation(&self) -> bool {
        matches!(
            self,
            Self::MissingLandmark { .. } | Self::ModeMismatch { .. }
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_missing_landmark_message() {
        let err = PostureError::missing_landmark("squat", "left_knee");
        assert_eq!(
            err.to_string(),
            "Missing landmark 'left_knee' required for squat analysis"
        );
        assert!(err.is_contract_violation());
    }

    #[test]
    fn test_io_error_is_not_contract_violation() {
        let err: PostureError = std::io::Error::other("disk gone").into();
        assert!(!err.is_contract_violation());
    }
}
