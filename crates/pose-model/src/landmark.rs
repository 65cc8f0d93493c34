//! Body landmarks and per-tick body positions.
//!
//! Observations are stored in append-only JSONL format, one
//! [`BodyPosition`] per line. All landmark coordinates are normalized to
//! `[0.0, 1.0]` relative to the image dimensions, with `y` growing downward.

use std::collections::BTreeMap;
use std::fmt;

use serde::{Deserialize, Serialize};

/// Monotonic timestamp in nanoseconds since session start.
pub type TimestampNs = u64;

/// Which exercise or activity is being analyzed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AnalysisMode {
    /// Seated desk posture.
    Sitting,
    /// Bodyweight squat form.
    Squat,
}

impl AnalysisMode {
    /// Landmarks that must be present for this mode.
    pub fn required_landmarks(self) -> &'static [LandmarkName] {
        use LandmarkName::*;
        match self {
            AnalysisMode::Sitting => &[Head, Neck, LeftShoulder, RightShoulder, Spine, Hips],
            AnalysisMode::Squat => &[
                Head,
                LeftShoulder,
                RightShoulder,
                Hips,
                LeftKnee,
                RightKnee,
                LeftAnkle,
                RightAnkle,
            ],
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            AnalysisMode::Sitting => "sitting",
            AnalysisMode::Squat => "squat",
        }
    }
}

impl fmt::Display for AnalysisMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for AnalysisMode {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "sitting" | "sit" | "desk" => Ok(AnalysisMode::Sitting),
            "squat" | "squats" => Ok(AnalysisMode::Squat),
            other => Err(format!("unknown analysis mode '{other}' (expected sitting|squat)")),
        }
    }
}

/// Named body keypoints understood by the analyzer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LandmarkName {
    Head,
    Neck,
    LeftShoulder,
    RightShoulder,
    Spine,
    Hips,
    LeftKnee,
    RightKnee,
    LeftAnkle,
    RightAnkle,
}

impl LandmarkName {
    pub fn as_str(self) -> &'static str {
        match self {
            LandmarkName::Head => "head",
            LandmarkName::Neck => "neck",
            LandmarkName::LeftShoulder => "left_shoulder",
            LandmarkName::RightShoulder => "right_shoulder",
            LandmarkName::Spine => "spine",
            LandmarkName::Hips => "hips",
            LandmarkName::LeftKnee => "left_knee",
            LandmarkName::RightKnee => "right_knee",
            LandmarkName::LeftAnkle => "left_ankle",
            LandmarkName::RightAnkle => "right_ankle",
        }
    }
}

impl fmt::Display for LandmarkName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A single body keypoint.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Landmark {
    /// Normalized X coordinate [0.0, 1.0].
    pub x: f64,
    /// Normalized Y coordinate [0.0, 1.0], growing downward.
    pub y: f64,
    /// Optional relative depth.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub z: Option<f64>,
    /// Detector visibility score [0.0, 1.0], when the source provides one.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub visibility: Option<f64>,
}

impl Landmark {
    /// Create a 2-D landmark.
    pub fn new(x: f64, y: f64) -> Self {
        Self {
            x,
            y,
            z: None,
            visibility: None,
        }
    }

    /// Whether the 2-D coordinates lie inside the normalized image.
    pub fn is_in_frame(&self) -> bool {
        (0.0..=1.0).contains(&self.x) && (0.0..=1.0).contains(&self.y)
    }

    /// Midpoint between two landmarks (2-D).
    pub fn midpoint(a: &Landmark, b: &Landmark) -> Landmark {
        Landmark::new((a.x + b.x) * 0.5, (a.y + b.y) * 0.5)
    }
}

/// One observation: the landmarks seen at a single tick.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BodyPosition {
    /// Monotonic nanoseconds since session start.
    #[serde(rename = "t")]
    pub timestamp_ns: TimestampNs,

    /// Mode the landmark set was captured for.
    pub mode: AnalysisMode,

    /// Landmarks keyed by name.
    pub landmarks: BTreeMap<LandmarkName, Landmark>,
}

impl BodyPosition {
    /// Create an empty position for the given mode.
    pub fn new(timestamp_ns: TimestampNs, mode: AnalysisMode) -> Self {
        Self {
            timestamp_ns,
            mode,
            landmarks: BTreeMap::new(),
        }
    }

    /// Builder-style landmark insertion.
    pub fn with(mut self, name: LandmarkName, x: f64, y: f64) -> Self {
        self.landmarks.insert(name, Landmark::new(x, y));
        self
    }

    /// Insert or replace a landmark.
    pub fn set(&mut self, name: LandmarkName, landmark: Landmark) {
        self.landmarks.insert(name, landmark);
    }

    pub fn get(&self, name: LandmarkName) -> Option<&Landmark> {
        self.landmarks.get(&name)
    }

    /// Required landmarks for this position's mode that are absent.
    pub fn missing_landmarks(&self) -> Vec<LandmarkName> {
        self.mode
            .required_landmarks()
            .iter()
            .copied()
            .filter(|name| !self.landmarks.contains_key(name))
            .collect()
    }

    /// Landmarks whose coordinates fall outside the normalized image.
    pub fn out_of_frame_landmarks(&self) -> Vec<LandmarkName> {
        self.landmarks
            .iter()
            .filter(|(_, lm)| !lm.is_in_frame())
            .map(|(name, _)| *name)
            .collect()
    }
}

/// Metadata written as the `#`-prefixed first line of an observation file.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ObservationStreamHeader {
    /// Schema version for forward compatibility.
    pub schema_version: String,

    /// Mode every observation in the stream was captured for.
    pub mode: AnalysisMode,

    /// Wall-clock time at session start (RFC 3339).
    pub epoch_wall: String,

    /// Name of the landmark source that produced the stream.
    pub source: String,

    /// Nominal interval between observations (ms).
    pub interval_ms: u64,
}

/// Schema version written into new stream headers.
pub const OBSERVATION_SCHEMA_VERSION: &str = "1.0";

impl ObservationStreamHeader {
    pub fn new(
        mode: AnalysisMode,
        source: impl Into<String>,
        interval_ms: u64,
        epoch_wall: impl Into<String>,
    ) -> Self {
        Self {
            schema_version: OBSERVATION_SCHEMA_VERSION.to_string(),
            mode,
            epoch_wall: epoch_wall.into(),
            source: source.into(),
            interval_ms,
        }
    }
}

/// Failure to parse one line of an observation stream.
#[derive(Debug, thiserror::Error)]
#[error("Invalid observation on line {line}: {source}")]
pub struct ObservationParseError {
    /// 1-based line number in the input.
    pub line: usize,
    #[source]
    pub source: serde_json::Error,
}

/// Parse observations from JSONL content (one JSON object per line).
///
/// Blank lines and `#`-prefixed header/comment lines are skipped.
pub fn parse_observations(jsonl: &str) -> Result<Vec<BodyPosition>, ObservationParseError> {
    jsonl
        .lines()
        .enumerate()
        .map(|(idx, line)| (idx + 1, line.trim()))
        .filter(|(_, line)| !line.is_empty() && !line.starts_with('#'))
        .map(|(line, text)| {
            serde_json::from_str(text).map_err(|source| ObservationParseError { line, source })
        })
        .collect()
}

/// Extract the stream header from the first `#` line, if present and valid.
pub fn parse_stream_header(jsonl: &str) -> Option<ObservationStreamHeader> {
    let first = jsonl.lines().map(str::trim).find(|l| !l.is_empty())?;
    let body = first.strip_prefix('#')?.trim();
    serde_json::from_str(body).ok()
}

/// Render a stream header as its `#`-prefixed first line (no newline).
pub fn stream_header_line(header: &ObservationStreamHeader) -> Result<String, serde_json::Error> {
    Ok(format!("# {}", serde_json::to_string(header)?))
}

/// Render one observation as a JSONL line (no newline).
pub fn observation_line(position: &BodyPosition) -> Result<String, serde_json::Error> {
    serde_json::to_string(position)
}

/// Serialize observations to JSONL format.
pub fn serialize_observations(positions: &[BodyPosition]) -> Result<String, serde_json::Error> {
    let mut output = String::new();
    for position in positions {
        output.push_str(&observation_line(position)?);
        output.push('\n');
    }
    Ok(output)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sitting_position() -> BodyPosition {
        BodyPosition::new(1_000_000_000, AnalysisMode::Sitting)
            .with(LandmarkName::Head, 0.50, 0.20)
            .with(LandmarkName::Neck, 0.50, 0.30)
            .with(LandmarkName::LeftShoulder, 0.40, 0.35)
            .with(LandmarkName::RightShoulder, 0.60, 0.35)
            .with(LandmarkName::Spine, 0.50, 0.50)
            .with(LandmarkName::Hips, 0.50, 0.70)
    }

    #[test]
    fn test_complete_sitting_position_has_no_missing_landmarks() {
        assert!(sitting_position().missing_landmarks().is_empty());
    }

    #[test]
    fn test_squat_requirements_report_absent_knees() {
        let position = BodyPosition::new(0, AnalysisMode::Squat)
            .with(LandmarkName::Head, 0.5, 0.1)
            .with(LandmarkName::LeftShoulder, 0.45, 0.25)
            .with(LandmarkName::RightShoulder, 0.55, 0.25)
            .with(LandmarkName::Hips, 0.5, 0.5)
            .with(LandmarkName::LeftAnkle, 0.45, 0.95)
            .with(LandmarkName::RightAnkle, 0.55, 0.95);
        assert_eq!(
            position.missing_landmarks(),
            vec![LandmarkName::LeftKnee, LandmarkName::RightKnee]
        );
    }

    #[test]
    fn test_json_format() {
        let json = serde_json::to_string(&sitting_position()).unwrap();
        assert!(json.contains("\"t\":1000000000"));
        assert!(json.contains("\"mode\":\"sitting\""));
        assert!(json.contains("\"left_shoulder\":{\"x\":0.4,\"y\":0.35}"));
        assert!(!json.contains("visibility"));
    }

    #[test]
    fn test_jsonl_roundtrip_with_header() {
        let header = ObservationStreamHeader {
            schema_version: "1.0".to_string(),
            mode: AnalysisMode::Sitting,
            epoch_wall: "2026-01-01T00:00:00Z".to_string(),
            source: "test".to_string(),
            interval_ms: 100,
        };
        let mut content = stream_header_line(&header).unwrap();
        content.push('\n');
        content.push_str(&serialize_observations(&[sitting_position()]).unwrap());

        assert_eq!(parse_stream_header(&content), Some(header));
        let parsed = parse_observations(&content).unwrap();
        assert_eq!(parsed, vec![sitting_position()]);
    }

    #[test]
    fn test_parse_error_reports_line_number() {
        let content = "# comment\n\n{\"t\":0,\"mode\":\"squat\",\"landmarks\":{}}\n{not json}\n";
        let err = parse_observations(content).unwrap_err();
        assert_eq!(err.line, 4);
    }

    #[test]
    fn test_out_of_frame_detection() {
        let mut position = sitting_position();
        position.set(LandmarkName::Head, Landmark::new(1.2, -0.1));
        assert_eq!(position.out_of_frame_landmarks(), vec![LandmarkName::Head]);
    }

    #[test]
    fn test_mode_from_str() {
        assert_eq!("Squat".parse::<AnalysisMode>(), Ok(AnalysisMode::Squat));
        assert_eq!("desk".parse::<AnalysisMode>(), Ok(AnalysisMode::Sitting));
        assert!("plank".parse::<AnalysisMode>().is_err());
    }
}
