use std::path::PathBuf;

use posture_analysis_core::PostureEngine;
use posture_model::analysis::IssueKind;
use posture_model::landmark::{parse_observations, parse_stream_header, AnalysisMode, BodyPosition};
use posture_model::metrics::PostureMetrics;
use proptest::prelude::*;

fn load_fixture(name: &str) -> (String, Vec<BodyPosition>) {
    let path = PathBuf::from(env!("CARGO_MANIFEST_DIR"))
        .join("..")
        .join("..")
        .join("fixtures")
        .join(name);

    let content = std::fs::read_to_string(path).expect("fixture should be readable");
    let positions = parse_observations(&content).expect("fixture observations should parse");
    (content, positions)
}

#[test]
fn squat_good_form_over_full_window() {
    let metrics = PostureMetrics {
        knee_tracking: 0.02,
        back_curvature: 0.1,
        squat_depth: 0.8,
        shoulder_alignment: 0.01,
        overall_stability: 0.9,
        ..PostureMetrics::default()
    };

    let mut engine = PostureEngine::with_defaults();
    let mut last = None;
    for frame in 1..=5 {
        last = Some(engine.analyze_metrics(AnalysisMode::Squat, metrics, frame, frame * 100));
    }
    let analysis = last.unwrap();

    assert!((analysis.stability - 1.0).abs() < 1e-9);
    assert_eq!(analysis.issues.len(), 1);
    assert_eq!(analysis.issues[0].kind, IssueKind::Good);
    assert_eq!(analysis.overall_score, 100.0);
    assert!(analysis.is_good_posture);
    assert!(analysis.recommendations.is_empty());
}

#[test]
fn squat_dangerous_form() {
    let metrics = PostureMetrics::squat(0.3, 0.5, 0.2);

    let mut engine = PostureEngine::with_defaults();
    let analysis = engine.analyze_metrics(AnalysisMode::Squat, metrics, 1, 0);

    assert!(analysis.issues.len() >= 3);
    assert_eq!(analysis.count_of(IssueKind::Critical), 2);
    assert!(analysis.overall_score <= 100.0 - ((9.0 + 8.0 + 6.0) * 2.0));
    assert!(!analysis.is_good_posture);
    assert_eq!(analysis.primary_issue().unwrap().severity, 9);
}

#[test]
fn sitting_borderline_neck_stays_in_warning_tier() {
    let metrics = PostureMetrics::sitting(34.0, 0.45, 0.05);

    let mut engine = PostureEngine::with_defaults();
    let analysis = engine.analyze_metrics(AnalysisMode::Sitting, metrics, 1, 0);

    assert_eq!(analysis.count_of(IssueKind::Critical), 0);
    let warnings: Vec<u8> = analysis
        .issues_of(IssueKind::Warning)
        .map(|i| i.severity)
        .collect();
    assert_eq!(warnings, vec![6, 4]);
}

#[test]
fn high_score_with_critical_issue_is_not_good() {
    let (content, positions) = load_fixture("squat-session.jsonl");
    let header = parse_stream_header(&content).expect("fixture has a header");
    assert_eq!(header.mode, AnalysisMode::Squat);
    assert_eq!(positions.len(), 12);

    let mut engine = PostureEngine::with_defaults();
    let analyses: Vec<_> = positions
        .iter()
        .enumerate()
        .map(|(frame, p)| engine.analyze_squat_posture(p, frame as u64).unwrap())
        .collect();

    for analysis in &analyses[..6] {
        assert!(analysis.is_good_posture, "frame {}", analysis.frame_number);
        assert_eq!(analysis.count_of(IssueKind::Critical), 0);
    }

    for analysis in &analyses[6..] {
        assert_eq!(analysis.overall_score, 100.0);
        assert!(analysis.has_critical());
        assert!(!analysis.is_good_posture, "frame {}", analysis.frame_number);
    }

    let confidences: Vec<f64> = analyses.iter().map(|a| a.confidence).collect();
    assert!(confidences.windows(2).all(|w| w[1] >= w[0]));
}

#[test]
fn recommendations_are_unique_per_analysis() {
    let mut engine = PostureEngine::with_defaults();
    let metrics = PostureMetrics::sitting(50.0, 0.9, 0.2).with_overall_stability(0.0);
    for frame in 0..8 {
        let jittered = PostureMetrics {
            overall_stability: (frame % 2) as f64,
            ..metrics
        };
        let analysis = engine.analyze_metrics(AnalysisMode::Sitting, jittered, frame, 0);
        let mut seen = std::collections::HashSet::new();
        assert!(analysis.recommendations.iter().all(|r| seen.insert(r.clone())));
    }
}

fn any_metrics() -> impl Strategy<Value = PostureMetrics> {
    (
        -100.0f64..200.0,
        -5.0f64..5.0,
        -5.0f64..5.0,
        -5.0f64..5.0,
        -5.0f64..5.0,
        -5.0f64..5.0,
        -5.0f64..5.0,
    )
        .prop_map(|(n, b, s, h, k, d, o)| PostureMetrics {
            neck_angle: n,
            back_curvature: b,
            shoulder_alignment: s,
            hip_alignment: h,
            knee_tracking: k,
            squat_depth: d,
            overall_stability: o,
        })
}

proptest! {
    #[test]
    fn score_and_confidence_stay_in_range(
        frames in prop::collection::vec(any_metrics(), 1..12),
        squat in any::<bool>(),
    ) {
        let mode = if squat { AnalysisMode::Squat } else { AnalysisMode::Sitting };
        let mut engine = PostureEngine::with_defaults();
        for (frame, metrics) in frames.into_iter().enumerate() {
            let analysis = engine.analyze_metrics(mode, metrics, frame as u64, 0);
            prop_assert!((0.0..=100.0).contains(&analysis.overall_score));
            prop_assert!((0.1..=1.0).contains(&analysis.confidence));
            prop_assert!((0.0..=1.0).contains(&analysis.stability));
            if analysis.has_critical() {
                prop_assert!(!analysis.is_good_posture);
            }
            prop_assert!(engine.history_len() <= 5);
        }
    }
}

#[test]
fn nan_metrics_still_produce_bounded_score() {
    let mut engine = PostureEngine::with_defaults();
    let metrics = PostureMetrics::squat(f64::NAN, f64::NAN, f64::NAN);
    engine.analyze_metrics(AnalysisMode::Squat, metrics, 0, 0);
    let analysis = engine.analyze_metrics(AnalysisMode::Squat, metrics, 1, 0);
    assert!((0.0..=100.0).contains(&analysis.overall_score));
    assert!((0.1..=1.0).contains(&analysis.confidence));
}
