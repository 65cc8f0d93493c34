//! Show the summary of an exported session.

use std::path::PathBuf;

use posture_session::{load_summary, FRAMES_FILE};

pub fn run(path: PathBuf) -> anyhow::Result<()> {
    let summary = load_summary(&path)
        .map_err(|e| anyhow::anyhow!("Failed to load session at {}: {e}", path.display()))?;

    println!("Session: {}", path.display());
    let frames = path.join(FRAMES_FILE);
    if frames.exists() {
        println!("  Frames file: {}", frames.display());
    }
    println!();

    super::print_summary(&summary);
    Ok(())
}
