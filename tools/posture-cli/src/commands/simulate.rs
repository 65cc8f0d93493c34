//! Analyze a synthetic landmark stream.

use std::path::PathBuf;
use std::time::Duration;

use posture_common::clock::{RateController, SessionClock};
use posture_common::config::AppConfig;
use posture_landmark_source::{LandmarkSource, SyntheticConfig, SyntheticSource, TimedLandmarks};
use posture_model::landmark::AnalysisMode;

use super::{drain, Session};

pub struct SimulateArgs {
    pub mode: AnalysisMode,
    pub frames: Option<u64>,
    pub interval_ms: u64,
    pub seed: u64,
    pub jitter: f64,
    pub realtime: bool,
}

/// Batch runs without a frame limit stop after this many ticks.
const DEFAULT_BATCH_FRAMES: u64 = 100;

pub async fn run(
    config: &AppConfig,
    args: SimulateArgs,
    output: Option<PathBuf>,
) -> anyhow::Result<()> {
    let frames = if args.realtime {
        args.frames
    } else {
        Some(args.frames.unwrap_or(DEFAULT_BATCH_FRAMES))
    };

    let synthetic = SyntheticConfig {
        seed: args.seed,
        jitter: args.jitter,
        interval_ms: args.interval_ms,
        frames,
        ..SyntheticConfig::for_mode(args.mode)
    };
    let mut source = SyntheticSource::new(synthetic)?;

    println!("Simulating {} session", args.mode);
    println!("  Interval: {}ms", args.interval_ms);
    println!("  Seed: {}", args.seed);
    match frames {
        Some(n) => println!("  Frames: {n}"),
        None => println!("  Frames: until Ctrl+C"),
    }
    if let Some(dir) = &output {
        println!("  Output: {}", dir.display());
    }
    println!();

    let mut session = Session::start(config, &source, args.interval_ms, output)?;

    if args.realtime {
        run_realtime(&mut source, &mut session, args.interval_ms, frames).await?;
    } else {
        drain(&mut source as &mut dyn LandmarkSource, &mut session)?;
    }

    session.finish()?;
    Ok(())
}

/// Tick against the wall clock until the frame limit or Ctrl+C.
async fn run_realtime(
    source: &mut SyntheticSource,
    session: &mut Session,
    interval_ms: u64,
    frames: Option<u64>,
) -> anyhow::Result<()> {
    println!("Press Ctrl+C to stop...");
    println!();

    let clock = SessionClock::start();
    let mut rate = RateController::with_interval_ms(interval_ms);
    // Poll at a fraction of the tick interval so ticks land close to schedule.
    let poll = Duration::from_millis((interval_ms / 4).max(1));
    let mut ticks = 0u64;
    tracing::info!(epoch = clock.epoch_wall(), interval_ms, "Live session ticking");

    let ctrl_c = tokio::signal::ctrl_c();
    tokio::pin!(ctrl_c);

    loop {
        if frames.is_some_and(|limit| ticks >= limit) {
            break;
        }

        tokio::select! {
            result = &mut ctrl_c => {
                result?;
                println!();
                tracing::info!(ticks, "Live session interrupted");
                break;
            }
            _ = tokio::time::sleep(poll) => {
                let now = clock.elapsed_ns();
                if rate.should_tick(now) {
                    let position = source.position_at(now)?;
                    session.observe(&position)?;
                    ticks += 1;
                }
            }
        }
    }

    tracing::debug!(
        ticks,
        elapsed_secs = clock.elapsed_secs(),
        "Live session finished"
    );
    Ok(())
}
