// Single-creator evaluation: builder -> signals -> detectors -> calibrator.
//
// Data flows one way and every stage is a pure function of its inputs, so
// evaluations for different (creator, window) pairs can run concurrently
// without coordination.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tracing::info;

use crate::calibration::calibrator::{BaseScore, ScoreCalibrator};
use crate::calibration::envelope::CalibratedScoreEnvelope;
use crate::config::CalibrationConfig;
use crate::error::Result;
use crate::graph::builder::GraphBuilder;
use crate::graph::engine::GraphEngine;
use crate::graph::metrics::CredibilitySignal;
use crate::graph::schema::{EngagementGraph, Window};
use crate::graph::signals::{CoordinationSignals, SignalEngine};
use crate::ingest::completeness::DataCompleteness;
use crate::ingest::raw::{Creator, RawInteraction};

/// Every artifact of one evaluation, kept for audit and display.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Evaluation {
    pub graph: EngagementGraph,
    pub signals: CoordinationSignals,
    pub credibility_signals: Vec<CredibilitySignal>,
    pub envelope: CalibratedScoreEnvelope,
}

/// Evaluate one creator over one window ending at `now`.
pub fn evaluate(
    config: &CalibrationConfig,
    creator: &Creator,
    interactions: &[RawInteraction],
    window: Window,
    base: BaseScore,
    data_completeness: DataCompleteness,
    now: DateTime<Utc>,
) -> Result<Evaluation> {
    let graph = GraphBuilder::new(config).build_at(creator, interactions, window, now)?;
    let signals = SignalEngine::new(config).compute(&graph);
    let credibility_signals = GraphEngine::new(config).analyze(&graph, &creator.handle);
    let envelope = ScoreCalibrator::new(config).calibrate(base, &signals, data_completeness)?;

    info!(
        creator = creator.handle.as_str(),
        window = window.as_str(),
        status = graph.status().as_str(),
        base = format!("{:.1}", envelope.base_score),
        adjusted = format!("{:.1}", envelope.adjusted_score),
        confidence = format!("{:.2}", envelope.confidence),
        detectors_fired = credibility_signals.len(),
        "Evaluated creator"
    );

    Ok(Evaluation {
        graph,
        signals,
        credibility_signals,
        envelope,
    })
}
