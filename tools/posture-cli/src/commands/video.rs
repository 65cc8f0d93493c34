//! Sample a synthetic video at a fixed frame interval.

use std::path::PathBuf;

use posture_common::config::AppConfig;
use posture_landmark_source::{SampledSource, SyntheticConfig, SyntheticSource, VideoFrameSampler};
use posture_model::landmark::AnalysisMode;

use super::{drain, Session};

pub fn run(
    config: &AppConfig,
    mode: AnalysisMode,
    duration_secs: f64,
    interval_ms: u64,
    output: Option<PathBuf>,
) -> anyhow::Result<()> {
    let sampler = VideoFrameSampler::from_secs(duration_secs, interval_ms)
        .map_err(|e| anyhow::anyhow!("Invalid sampling: {e}"))?;

    let synthetic = SyntheticSource::new(SyntheticConfig::for_mode(mode))?;
    let mut source = SampledSource::new(sampler, synthetic);

    println!("Sampling {mode} video");
    println!("  Duration: {:.1}s", source.sampler().duration_secs());
    println!("  Interval: {interval_ms}ms");
    println!("  Frames: {}", source.sampler().sample_count());
    if let Some(dir) = &output {
        println!("  Output: {}", dir.display());
    }
    println!();

    let mut session = Session::start(config, &source, interval_ms, output)?;
    drain(&mut source, &mut session)?;
    tracing::debug!(progress = source.progress(), "Video sampling finished");
    session.finish()?;
    Ok(())
}
