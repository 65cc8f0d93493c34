//! Session export to a directory.
//!
//! Layout:
//! ```text
//! <dir>/frames.jsonl   one PostureAnalysis per line
//! <dir>/summary.json   SessionSummary, pretty-printed
//! ```

use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;

use posture_common::error::{PostureError, PostureResult};

use crate::recorder::SessionRecorder;
use crate::summary::SessionSummary;

pub const FRAMES_FILE: &str = "frames.jsonl";
pub const SUMMARY_FILE: &str = "summary.json";

/// Write the recorder's analyses and summary into `dir`.
pub fn export_session(recorder: &SessionRecorder, dir: &Path) -> PostureResult<SessionSummary> {
    std::fs::create_dir_all(dir)?;

    let frames_path = dir.join(FRAMES_FILE);
    let mut writer = BufWriter::new(File::create(&frames_path)?);
    for analysis in recorder.analyses() {
        serde_json::to_writer(&mut writer, analysis)?;
        writer.write_all(b"\n")?;
    }
    writer
        .flush()
        .map_err(|e| PostureError::session(format!("Failed to flush frames: {e}")))?;

    let summary = recorder.summary();
    let summary_json = serde_json::to_string_pretty(&summary)?;
    std::fs::write(dir.join(SUMMARY_FILE), summary_json)?;

    tracing::info!(
        dir = %dir.display(),
        frames = summary.total_frames,
        good_pct = summary.good_posture_pct,
        "Session exported"
    );

    Ok(summary)
}

/// Read a previously exported summary.
pub fn load_summary(dir: &Path) -> PostureResult<SessionSummary> {
    let path = dir.join(SUMMARY_FILE);
    if !path.exists() {
        return Err(PostureError::FileNotFound { path });
    }
    let content = std::fs::read_to_string(&path)?;
    Ok(serde_json::from_str(&content)?)
}
