// Calibrated score envelope: the audit-ready output of calibration.

use serde::{Deserialize, Serialize};

use crate::config::CalibrationConfig;
use crate::graph::signals::SignalName;
use crate::ingest::completeness::DataCompleteness;

pub const CALIBRATION_VERSION: &str = "v2.3";

/// Why a signal or a whole adjustment was withheld.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SuppressedSignal {
    TimingConcentration,
    EdgeReuseRatio,
    CommenterOverlap,
    /// Graph signals were too weakly supported to act on
    GraphLowConfidence,
    /// Applying a penalty would leave confidence below the adjustment floor
    LowResultantConfidence,
}

impl SuppressedSignal {
    pub fn as_str(&self) -> &'static str {
        match self {
            SuppressedSignal::TimingConcentration => "timing_concentration",
            SuppressedSignal::EdgeReuseRatio => "edge_reuse_ratio",
            SuppressedSignal::CommenterOverlap => "commenter_overlap",
            SuppressedSignal::GraphLowConfidence => "graph_low_confidence",
            SuppressedSignal::LowResultantConfidence => "low_resultant_confidence",
        }
    }
}

impl From<SignalName> for SuppressedSignal {
    fn from(name: SignalName) -> Self {
        match name {
            SignalName::TimingConcentration => SuppressedSignal::TimingConcentration,
            SignalName::EdgeReuseRatio => SuppressedSignal::EdgeReuseRatio,
            SignalName::CommenterOverlap => SuppressedSignal::CommenterOverlap,
        }
    }
}

impl std::fmt::Display for SuppressedSignal {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CalibratedScoreEnvelope {
    pub base_score: f64,
    /// Never above `base_score`
    pub adjusted_score: f64,
    /// (low, high), symmetric around `adjusted_score` before clamping
    pub uncertainty_band: (f64, f64),
    pub confidence: f64,
    pub applied_adjustments: Vec<SignalName>,
    pub suppressed_signals: Vec<SuppressedSignal>,
    pub data_completeness: DataCompleteness,
    pub calibration_version: String,
}

impl CalibratedScoreEnvelope {
    /// Multiplier applied to the base score (1.0 when nothing was applied).
    pub fn penalty_factor(&self) -> f64 {
        if self.base_score == 0.0 {
            1.0
        } else {
            self.adjusted_score / self.base_score
        }
    }

    pub fn was_adjusted(&self) -> bool {
        !self.applied_adjustments.is_empty()
    }

    pub fn is_suppressed(&self, flag: SuppressedSignal) -> bool {
        self.suppressed_signals.contains(&flag)
    }
}

/// Band width for a confidence level: `base + (1 - confidence) * span`.
///
/// Depends on confidence alone. With defaults the range is [6, 26].
pub fn band_width(config: &CalibrationConfig, confidence: f64) -> f64 {
    config.band_base_width + (1.0 - confidence) * config.band_confidence_span
}

/// Band around `adjusted`, clamped to [0, max_score].
pub fn uncertainty_band(config: &CalibrationConfig, adjusted: f64, confidence: f64) -> (f64, f64) {
    let half = band_width(config, confidence) / 2.0;
    (
        (adjusted - half).max(0.0),
        (adjusted + half).min(config.max_score),
    )
}
