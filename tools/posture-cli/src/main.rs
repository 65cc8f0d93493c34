//! Posture CLI: command-line interface for posture analysis sessions.
//!
//! Usage:
//!   posture simulate [OPTIONS]     Analyze synthetic motion (optionally in real time)
//!   posture video [OPTIONS]        Sample a synthetic video at a fixed interval
//!   posture replay <FILE>          Analyze a recorded observation stream
//!   posture report <DIR>           Show the summary of an exported session
//!   posture config                 Show (or write) the effective configuration

use std::path::PathBuf;

use clap::{Parser, Subcommand};

use posture_model::landmark::AnalysisMode;

mod commands;

#[derive(Parser)]
#[command(
    name = "posture",
    about = "Real-time posture analysis for desk sitting and squats",
    version,
    author
)]
struct Cli {
    /// Enable verbose logging
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Analyze a synthetic landmark stream
    Simulate {
        /// Analysis mode: sitting|squat
        #[arg(short, long)]
        mode: AnalysisMode,

        /// Number of ticks to analyze (runs until Ctrl+C when omitted with --realtime)
        #[arg(short, long)]
        frames: Option<u64>,

        /// Tick interval in milliseconds (defaults to the configured live interval)
        #[arg(long)]
        interval_ms: Option<u64>,

        /// Jitter RNG seed
        #[arg(long, default_value = "24301")]
        seed: u64,

        /// Per-coordinate jitter (normalized units)
        #[arg(long, default_value = "0.005")]
        jitter: f64,

        /// Pace ticks against the wall clock
        #[arg(long)]
        realtime: bool,

        /// Export the session to this directory
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// Export the session under the configured sessions directory
        #[arg(long, conflicts_with = "output")]
        save: bool,
    },

    /// Sample a synthetic video at a fixed frame interval
    Video {
        /// Analysis mode: sitting|squat
        #[arg(short, long)]
        mode: AnalysisMode,

        /// Video duration (seconds)
        #[arg(long)]
        duration_secs: f64,

        /// Frame sampling interval in milliseconds (defaults to the configured video interval)
        #[arg(long)]
        interval_ms: Option<u64>,

        /// Export the session to this directory
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// Export the session under the configured sessions directory
        #[arg(long, conflicts_with = "output")]
        save: bool,
    },

    /// Analyze a recorded observation stream (JSONL)
    Replay {
        /// Path to the observation file
        path: PathBuf,

        /// Analysis mode: sitting|squat
        #[arg(short, long)]
        mode: AnalysisMode,

        /// Export the session to this directory
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// Show the summary of an exported session
    Report {
        /// Path to the session directory
        path: PathBuf,
    },

    /// Show the effective configuration
    Config {
        /// Write the effective configuration to the config file
        #[arg(long)]
        write: bool,
    },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let config = posture_common::config::AppConfig::load();

    // Initialize logging
    let mut logging = config.logging.clone();
    if cli.verbose {
        logging.level = "debug".to_string();
    }
    posture_common::logging::init_logging(&logging);

    match cli.command {
        Commands::Simulate {
            mode,
            frames,
            interval_ms,
            seed,
            jitter,
            realtime,
            output,
            save,
        } => {
            let args = commands::simulate::SimulateArgs {
                mode,
                frames,
                interval_ms: interval_ms.unwrap_or(config.sampling.live_interval_ms),
                seed,
                jitter,
                realtime,
            };
            let output = commands::resolve_output(&config, mode, output, save);
            commands::simulate::run(&config, args, output).await
        }
        Commands::Video {
            mode,
            duration_secs,
            interval_ms,
            output,
            save,
        } => {
            let interval_ms = interval_ms.unwrap_or(config.sampling.video_interval_ms);
            let output = commands::resolve_output(&config, mode, output, save);
            commands::video::run(&config, mode, duration_secs, interval_ms, output)
        }
        Commands::Replay { path, mode, output } => {
            commands::replay::run(&config, path, mode, output)
        }
        Commands::Report { path } => commands::report::run(path),
        Commands::Config { write } => commands::config::run(&config, write),
    }
}
