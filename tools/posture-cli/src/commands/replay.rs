//! Analyze a recorded observation stream.

use std::path::PathBuf;

use posture_common::config::AppConfig;
use posture_landmark_source::ReplaySource;
use posture_model::landmark::AnalysisMode;

use super::{drain, Session};

pub fn run(
    config: &AppConfig,
    path: PathBuf,
    mode: AnalysisMode,
    output: Option<PathBuf>,
) -> anyhow::Result<()> {
    println!("Replaying observations from: {}", path.display());

    let mut source = ReplaySource::open(&path, mode)
        .map_err(|e| anyhow::anyhow!("Failed to load observations: {e}"))?;

    println!("  Loaded {} observations", source.remaining());

    if source.remaining() == 0 {
        println!("  No observations to analyze.");
        return Ok(());
    }
    println!();

    let mut session = Session::start(config, &source, 0, output)?;
    drain(&mut source, &mut session)?;
    session.finish()?;
    Ok(())
}
