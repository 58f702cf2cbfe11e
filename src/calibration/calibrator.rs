// Score calibrator: an ordered pipeline of safety stages.
//
// Stages run strictly in order and any of them may end calibration early:
// 1. Graph-confidence floor: weak graph evidence suppresses everything
// 2. Corroboration: a lone strong signal triggers nothing
// 3. Confidence before score: penalize confidence first, stop if too low
// 4. Bounded penalty: at most `max_score_penalty_pct` off the base score
//
// The band is computed from the final confidence when the envelope is built.
// Calibration can only lower a score, never raise it.

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::calibration::envelope::{
    self, CalibratedScoreEnvelope, SuppressedSignal, CALIBRATION_VERSION,
};
use crate::config::CalibrationConfig;
use crate::error::{check_score, check_unit, Result};
use crate::graph::signals::{CoordinationSignals, SignalName};
use crate::ingest::completeness::DataCompleteness;

/// Score and confidence from the heuristic pillar.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct BaseScore {
    pub score: f64,
    pub confidence: f64,
}

impl BaseScore {
    pub fn new(score: f64, confidence: f64) -> Self {
        Self { score, confidence }
    }
}

#[derive(Debug, Clone)]
struct CalibrationState {
    base_score: f64,
    adjusted_score: f64,
    confidence: f64,
    strong: Vec<SignalName>,
    applied: Vec<SignalName>,
    suppressed: Vec<SuppressedSignal>,
}

enum StageOutcome {
    Continue(CalibrationState),
    Terminal(CalibrationState),
}

type Stage = fn(&CalibrationConfig, &CoordinationSignals, CalibrationState) -> StageOutcome;

const STAGES: [(&str, Stage); 4] = [
    ("graph_confidence_floor", graph_confidence_floor),
    ("corroboration", corroboration),
    ("confidence_before_score", confidence_before_score),
    ("bounded_penalty", bounded_penalty),
];

fn graph_confidence_floor(
    config: &CalibrationConfig,
    signals: &CoordinationSignals,
    mut state: CalibrationState,
) -> StageOutcome {
    if signals.confidence < config.graph_confidence_floor {
        state.confidence *= config.graph_low_confidence_factor;
        state.suppressed.push(SuppressedSignal::GraphLowConfidence);
        return StageOutcome::Terminal(state);
    }
    StageOutcome::Continue(state)
}

fn corroboration(
    config: &CalibrationConfig,
    signals: &CoordinationSignals,
    mut state: CalibrationState,
) -> StageOutcome {
    state.strong = SignalName::all()
        .iter()
        .copied()
        .filter(|&name| signals.value(name) > config.strong_signal_threshold)
        .collect();

    if state.strong.len() < config.corroboration_minimum {
        let lone = std::mem::take(&mut state.strong);
        state
            .suppressed
            .extend(lone.into_iter().map(SuppressedSignal::from));
    }
    StageOutcome::Continue(state)
}

fn confidence_before_score(
    config: &CalibrationConfig,
    _signals: &CoordinationSignals,
    mut state: CalibrationState,
) -> StageOutcome {
    if !state.strong.is_empty() {
        state.confidence = (state.confidence - config.flat_confidence_penalty).max(0.0);
    }
    if state.confidence < config.confidence_floor_for_adjustment {
        state
            .suppressed
            .push(SuppressedSignal::LowResultantConfidence);
        return StageOutcome::Terminal(state);
    }
    StageOutcome::Continue(state)
}

fn bounded_penalty(
    config: &CalibrationConfig,
    _signals: &CoordinationSignals,
    mut state: CalibrationState,
) -> StageOutcome {
    if !state.strong.is_empty() {
        let penalty = (config.per_signal_penalty_pct * state.strong.len() as f64)
            .min(config.max_score_penalty_pct);
        state.adjusted_score = state.base_score * (1.0 - penalty);
        state.applied = std::mem::take(&mut state.strong);
    }
    StageOutcome::Continue(state)
}

pub struct ScoreCalibrator<'a> {
    config: &'a CalibrationConfig,
}

impl<'a> ScoreCalibrator<'a> {
    pub fn new(config: &'a CalibrationConfig) -> Self {
        Self { config }
    }

    /// Calibrate a heuristic score against graph coordination signals.
    ///
    /// Deterministic: identical inputs produce identical envelopes. Fails only
    /// when an input is out of range; nothing is clamped silently.
    pub fn calibrate(
        &self,
        base: BaseScore,
        signals: &CoordinationSignals,
        data_completeness: DataCompleteness,
    ) -> Result<CalibratedScoreEnvelope> {
        self.validate(base, signals)?;

        let mut state = CalibrationState {
            base_score: base.score,
            adjusted_score: base.score,
            confidence: base.confidence,
            strong: Vec::new(),
            applied: Vec::new(),
            suppressed: Vec::new(),
        };

        for (name, stage) in STAGES {
            match stage(self.config, signals, state) {
                StageOutcome::Continue(next) => state = next,
                StageOutcome::Terminal(last) => {
                    debug!(stage = name, "Calibration ended early");
                    state = last;
                    break;
                }
            }
        }

        debug!(
            base = base.score,
            adjusted = state.adjusted_score,
            confidence = state.confidence,
            applied = state.applied.len(),
            suppressed = state.suppressed.len(),
            "Calibrated score"
        );

        Ok(self.envelope(state, data_completeness))
    }

    fn validate(&self, base: BaseScore, signals: &CoordinationSignals) -> Result<()> {
        check_score("base_score", base.score, self.config.max_score)?;
        check_unit("base_confidence", base.confidence)?;
        check_unit("signals.confidence", signals.confidence)?;
        check_unit("signals.timing_concentration", signals.timing_concentration)?;
        check_unit("signals.edge_reuse_ratio", signals.edge_reuse_ratio)?;
        check_unit("signals.commenter_overlap", signals.commenter_overlap)?;
        check_unit("signals.reciprocity_score", signals.reciprocity_score)?;
        Ok(())
    }

    fn envelope(
        &self,
        state: CalibrationState,
        data_completeness: DataCompleteness,
    ) -> CalibratedScoreEnvelope {
        CalibratedScoreEnvelope {
            base_score: state.base_score,
            adjusted_score: state.adjusted_score,
            uncertainty_band: envelope::uncertainty_band(
                self.config,
                state.adjusted_score,
                state.confidence,
            ),
            confidence: state.confidence,
            applied_adjustments: state.applied,
            suppressed_signals: state.suppressed,
            data_completeness,
            calibration_version: CALIBRATION_VERSION.to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn signals(timing: f64, reuse: f64, overlap: f64, confidence: f64) -> CoordinationSignals {
        CoordinationSignals {
            timing_concentration: timing,
            edge_reuse_ratio: reuse,
            commenter_overlap: overlap,
            sample_size: 60,
            confidence,
            notes: Vec::new(),
            ..CoordinationSignals::empty()
        }
    }

    #[test]
    fn test_stage_order_is_fixed() {
        let names: Vec<&str> = STAGES.iter().map(|(n, _)| *n).collect();
        assert_eq!(
            names,
            vec![
                "graph_confidence_floor",
                "corroboration",
                "confidence_before_score",
                "bounded_penalty"
            ]
        );
    }

    #[test]
    fn test_two_strong_signals_scenario() {
        let config = CalibrationConfig::default();
        let env = ScoreCalibrator::new(&config)
            .calibrate(
                BaseScore::new(80.0, 1.0),
                &signals(0.8, 0.8, 0.2, 1.0),
                DataCompleteness::Full,
            )
            .unwrap();
        assert!((env.adjusted_score - 72.0).abs() < 1e-9);
        assert!((env.confidence - 0.8).abs() < 1e-9);
        assert!((env.uncertainty_band.0 - 67.0).abs() < 1e-9);
        assert!((env.uncertainty_band.1 - 77.0).abs() < 1e-9);
        assert_eq!(
            env.applied_adjustments,
            vec![SignalName::TimingConcentration, SignalName::EdgeReuseRatio]
        );
        assert!(env.suppressed_signals.is_empty());
    }

    #[test]
    fn test_low_base_confidence_stops_without_strong_signals() {
        let config = CalibrationConfig::default();
        let env = ScoreCalibrator::new(&config)
            .calibrate(
                BaseScore::new(50.0, 0.4),
                &signals(0.1, 0.1, 0.1, 1.0),
                DataCompleteness::PartialNoComments,
            )
            .unwrap();
        assert_eq!(env.adjusted_score, 50.0);
        assert_eq!(
            env.suppressed_signals,
            vec![SuppressedSignal::LowResultantConfidence]
        );
        assert_eq!(env.data_completeness, DataCompleteness::PartialNoComments);
    }
}
