pub mod config;
pub mod replay;
pub mod report;
pub mod simulate;
pub mod video;

use std::path::PathBuf;

use posture_analysis_core::PostureEngine;
use posture_common::clock::SessionClock;
use posture_common::config::AppConfig;
use posture_landmark_source::{LandmarkSource, ObservationWriter};
use posture_model::analysis::{IssueKind, PostureAnalysis};
use posture_model::landmark::{AnalysisMode, BodyPosition};
use posture_session::{SessionRecorder, SessionSummary};

/// Observation stream written next to an exported session.
pub const OBSERVATIONS_FILE: &str = "observations.jsonl";

/// Pick the export directory from `--output` or `--save`.
pub fn resolve_output(
    config: &AppConfig,
    mode: AnalysisMode,
    output: Option<PathBuf>,
    save: bool,
) -> Option<PathBuf> {
    if output.is_some() {
        return output;
    }
    save.then(|| {
        let stamp = chrono::Utc::now().format("%Y%m%d-%H%M%S");
        config.sessions_dir.join(format!("{mode}-{stamp}"))
    })
}

/// One analysis session: engine, recorder, and optional observation capture.
pub struct Session {
    engine: PostureEngine,
    recorder: SessionRecorder,
    observations: Option<ObservationWriter>,
    output: Option<PathBuf>,
    frame_number: u64,
    skipped: u64,
}

impl Session {
    pub fn start(
        config: &AppConfig,
        source: &dyn LandmarkSource,
        interval_ms: u64,
        output: Option<PathBuf>,
    ) -> anyhow::Result<Self> {
        let engine = PostureEngine::builder()
            .from_defaults(&config.engine)
            .build()
            .map_err(|e| anyhow::anyhow!("Invalid engine configuration: {e}"))?;

        let mode = source.mode();
        let recorder = SessionRecorder::new(mode);

        let observations = match &output {
            Some(dir) => Some(ObservationWriter::for_source(
                &dir.join(OBSERVATIONS_FILE),
                source,
                interval_ms,
                &recorder.started().to_rfc3339(),
            )?),
            None => None,
        };

        tracing::info!(
            mode = %mode,
            source = source.name(),
            window = engine.window(),
            "Analysis session started"
        );

        Ok(Self {
            engine,
            recorder,
            observations,
            output,
            frame_number: 0,
            skipped: 0,
        })
    }

    /// Analyze one observation and print its result line.
    ///
    /// Observations the engine rejects are logged and skipped; the session
    /// carries on with the next tick.
    pub fn observe(&mut self, position: &BodyPosition) -> anyhow::Result<()> {
        let frame_number = self.frame_number;
        self.frame_number += 1;

        let analysis = self.engine.analyze(position, frame_number).and_then(|analysis| {
            if let Some(writer) = self.observations.as_mut() {
                writer.write(position)?;
            }
            Ok(analysis)
        });
        let analysis = match analysis {
            Ok(analysis) => analysis,
            Err(e) if e.is_contract_violation() => {
                tracing::warn!(frame = frame_number, error = %e, "Skipping observation");
                self.skipped += 1;
                return Ok(());
            }
            Err(e) => return Err(e.into()),
        };

        print_frame(&analysis);
        self.recorder.record(analysis)?;
        Ok(())
    }

    /// Flush captured observations, export if requested, and print the summary.
    pub fn finish(self) -> anyhow::Result<SessionSummary> {
        if let Some(writer) = self.observations {
            let recorded = writer.finish()?;
            tracing::debug!(observations = recorded, "Observation stream closed");
        }

        let summary = match &self.output {
            Some(dir) => {
                let summary = self.recorder.export(dir)?;
                println!();
                println!("Session saved to: {}", dir.display());
                summary
            }
            None => self.recorder.summary(),
        };

        if self.skipped > 0 {
            println!("Skipped {} incomplete observations", self.skipped);
        }
        println!();
        print_summary(&summary);
        Ok(summary)
    }
}

/// Feed every observation of a source through the session.
pub fn drain(source: &mut dyn LandmarkSource, session: &mut Session) -> anyhow::Result<()> {
    while let Some(position) = source.next_position()? {
        session.observe(&position)?;
    }
    tracing::debug!(source = source.name(), "Landmark source exhausted");
    Ok(())
}

fn print_frame(analysis: &PostureAnalysis) {
    let verdict = if analysis.is_good_posture { "good" } else { "poor" };
    let finding = analysis
        .primary_issue()
        .map(|issue| format!("[{}] {}", issue.kind, issue.message))
        .unwrap_or_default();
    println!(
        "  #{:<5} t={:>7.2}s  score {:>5.1}  {verdict}  stab {:.2}  conf {:.2}  {finding}",
        analysis.frame_number,
        SessionClock::ns_to_secs(analysis.timestamp_ns),
        analysis.overall_score,
        analysis.stability,
        analysis.confidence,
    );
}

pub fn print_summary(summary: &SessionSummary) {
    println!("Session Summary");
    println!("===============");
    println!("  Mode:            {}", summary.mode);
    println!("  Started:         {}", summary.started_at.to_rfc3339());
    println!("  Duration:        {:.1}s", summary.duration_secs);
    println!(
        "  Frames:          {} ({} good, {:.1}%)",
        summary.total_frames, summary.good_frames, summary.good_posture_pct
    );
    println!(
        "  Score:           avg {:.1}, min {:.1}, max {:.1}",
        summary.average_score, summary.min_score, summary.max_score
    );
    println!("  Avg confidence:  {:.2}", summary.average_confidence);
    println!("  Best good streak: {}", summary.longest_good_streak);

    println!();
    println!("  Issues:");
    for kind in IssueKind::ALL {
        println!("    {:<10} {}", kind.as_str(), summary.issue_count(kind));
    }
    if let Some(issue) = &summary.most_frequent_issue {
        println!("  Most frequent:   {issue}");
    }

    if !summary.recommendations.is_empty() {
        println!();
        println!("  Recommendations:");
        for rec in &summary.recommendations {
            println!("    - {rec}");
        }
    }
}
