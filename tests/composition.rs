// Composition tests: the full evaluation chain:
//   raw interactions -> graph -> signals -> detectors -> calibrated envelope
// No I/O beyond JSON (de)serialization in memory.

use chrono::{DateTime, Duration, TimeZone, Utc};

use sponsorscope::calibration::calibrator::BaseScore;
use sponsorscope::calibration::envelope::SuppressedSignal;
use sponsorscope::config::CalibrationConfig;
use sponsorscope::error::ValidationError;
use sponsorscope::graph::metrics::DetectorKind;
use sponsorscope::graph::schema::{GraphStatus, Window};
use sponsorscope::graph::signals::SignalName;
use sponsorscope::ingest::completeness::DataCompleteness;
use sponsorscope::ingest::raw::{parse_interactions, Creator, RawInteraction};
use sponsorscope::pipeline::evaluate::{evaluate, Evaluation};

fn now() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2026, 3, 10, 12, 0, 0).unwrap()
}

/// `n` commenters who all first show up within one short burst and then
/// comment again later in the day.
fn burst_audience(n: usize) -> Vec<RawInteraction> {
    let burst_start = now() - Duration::hours(6);
    let mut out = Vec::new();
    for a in 0..n {
        out.push(RawInteraction::new(
            format!("first{a}"),
            format!("acct{a}"),
            burst_start + Duration::seconds(a as i64 * 3),
        ));
        out.push(RawInteraction::new(
            format!("second{a}"),
            format!("acct{a}"),
            now() - Duration::minutes(a as i64),
        ));
    }
    out
}

/// `n` commenters whose first comments are spread hours apart.
fn spread_audience(n: usize) -> Vec<RawInteraction> {
    let mut out = Vec::new();
    for a in 0..n {
        let first = now() - Duration::days(6) + Duration::hours(a as i64 * 2);
        out.push(RawInteraction::new(format!("f{a}"), format!("fan{a}"), first));
        out.push(RawInteraction::new(
            format!("s{a}"),
            format!("fan{a}"),
            first + Duration::hours(1),
        ));
    }
    out
}

fn run(interactions: &[RawInteraction], base: BaseScore) -> Evaluation {
    evaluate(
        &CalibrationConfig::default(),
        &Creator::new("creator"),
        interactions,
        Window::SevenDays,
        base,
        DataCompleteness::Full,
        now(),
    )
    .unwrap()
}

#[test]
fn burst_audience_is_penalized_within_bounds() {
    let eval = run(&burst_audience(60), BaseScore::new(80.0, 1.0));

    assert_eq!(eval.graph.status(), GraphStatus::Ok);
    assert_eq!(eval.signals.sample_size, 60);
    assert!((eval.signals.timing_concentration - 1.0).abs() < f64::EPSILON);
    assert_eq!(eval.signals.confidence, 1.0);

    // All three signals are strong: penalty is capped at 15%
    assert_eq!(eval.envelope.applied_adjustments.len(), 3);
    assert!((eval.envelope.adjusted_score - 68.0).abs() < 1e-9);
    assert!((eval.envelope.confidence - 0.8).abs() < 1e-12);
}

#[test]
fn spread_audience_gets_a_smaller_penalty() {
    let eval = run(&spread_audience(60), BaseScore::new(80.0, 1.0));

    assert!(eval.signals.timing_concentration < 0.7);
    // Gated edges always have repeat interactions, so reuse and its overlap
    // proxy are both strong and corroborate each other
    assert_eq!(
        eval.envelope.applied_adjustments,
        vec![SignalName::EdgeReuseRatio, SignalName::CommenterOverlap]
    );
    assert!((eval.envelope.adjusted_score - 72.0).abs() < 1e-9);
}

#[test]
fn small_audience_is_never_adjusted() {
    let eval = run(&burst_audience(12), BaseScore::new(90.0, 1.0));

    assert_eq!(eval.graph.status(), GraphStatus::Inconclusive);
    assert_eq!(eval.signals.confidence, 0.0);
    assert!(eval.credibility_signals.is_empty());
    assert_eq!(eval.envelope.adjusted_score, 90.0);
    assert_eq!(
        eval.envelope.suppressed_signals,
        vec![SuppressedSignal::GraphLowConfidence]
    );
}

#[test]
fn mid_sized_audience_is_suppressed_by_low_graph_confidence() {
    // Conclusive graph, but under 50 edges halves signal confidence to 0.5
    let eval = run(&burst_audience(30), BaseScore::new(70.0, 1.0));
    assert_eq!(eval.graph.status(), GraphStatus::Ok);
    assert!((eval.signals.confidence - 0.5).abs() < f64::EPSILON);
    assert_eq!(eval.envelope.adjusted_score, 70.0);
    assert!(eval
        .envelope
        .is_suppressed(SuppressedSignal::GraphLowConfidence));
}

#[test]
fn pod_audience_fires_detector_alongside_calibration() {
    let mut interactions = burst_audience(60);
    // The first 15 accounts all comment on each other twice
    for a in 0..15 {
        for b in 0..15 {
            if a == b {
                continue;
            }
            for k in 0..2 {
                interactions.push(
                    RawInteraction::new(
                        format!("pod{a}-{b}-{k}"),
                        format!("acct{a}"),
                        now() - Duration::hours(2) + Duration::minutes(k),
                    )
                    .aimed_at(format!("acct{b}")),
                );
            }
        }
    }
    let eval = run(&interactions, BaseScore::new(80.0, 1.0));

    // 210 of 60*59 ordered pairs: density ~0.059, below the pod threshold
    assert!(eval
        .credibility_signals
        .iter()
        .all(|s| s.kind != DetectorKind::Pod));
    // Cross edges never change the creator-facing signals
    assert_eq!(eval.signals.sample_size, 60);
}

#[test]
fn evaluation_is_deterministic_and_serializable() {
    let interactions = burst_audience(55);
    let a = run(&interactions, BaseScore::new(64.0, 0.95));
    let b = run(&interactions, BaseScore::new(64.0, 0.95));
    assert_eq!(a, b);

    let json = serde_json::to_string(&a).unwrap();
    assert!(json.contains("\"window\":\"7d\""));
    assert!(json.contains("\"status\":\"OK\""));
    assert!(json.contains("\"calibration_version\":\"v2.3\""));
    let back: Evaluation = serde_json::from_str(&json).unwrap();
    assert_eq!(back.graph.edges().len(), a.graph.edges().len());
    assert_eq!(back.envelope.applied_adjustments, a.envelope.applied_adjustments);
    assert!((back.envelope.adjusted_score - a.envelope.adjusted_score).abs() < 1e-9);
}

#[test]
fn json_input_flows_through_the_pipeline() {
    let mut records = Vec::new();
    for a in 0..20 {
        for k in 0..2 {
            records.push(format!(
                r#"{{"id":"r{a}-{k}","author_id":"acct{a}","timestamp":"2026-03-09T1{k}:00:00-05:00","text":"great post!"}}"#
            ));
        }
    }
    let json = format!("[{}]", records.join(","));
    let interactions = parse_interactions(&json).unwrap();
    let eval = run(&interactions, BaseScore::new(75.0, 0.9));
    assert_eq!(eval.graph.creator_edges().count(), 20);
    assert_eq!(eval.graph.status(), GraphStatus::Ok);
}

#[test]
fn invalid_records_abort_the_whole_evaluation() {
    let mut interactions = burst_audience(60);
    interactions.push(RawInteraction::new("", "acct1", now()));
    let result = evaluate(
        &CalibrationConfig::default(),
        &Creator::new("creator"),
        &interactions,
        Window::SevenDays,
        BaseScore::new(80.0, 1.0),
        DataCompleteness::Full,
        now(),
    );
    assert_eq!(result.unwrap_err(), ValidationError::MissingInteractionId);
}

#[test]
fn out_of_range_base_score_aborts_after_graph_build() {
    let result = evaluate(
        &CalibrationConfig::default(),
        &Creator::new("creator"),
        &burst_audience(60),
        Window::SevenDays,
        BaseScore::new(140.0, 1.0),
        DataCompleteness::Full,
        now(),
    );
    assert!(matches!(
        result,
        Err(ValidationError::ScoreOutOfRange { .. })
    ));
}
