// Specialized detectors run over a built graph.
//
// A detector returns `None` when the sample is too small to evaluate or the
// pattern is below its threshold. `None` means "not evaluable / not
// detected", never "clean".

pub mod reciprocity;
pub mod reuse;
pub mod timing;

use serde::{Deserialize, Serialize};

/// Which detector produced a signal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DetectorKind {
    Pod,
    Reuse,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DetectedPattern {
    HighClusterDensity,
    HighEngagementReuse,
}

impl DetectedPattern {
    pub fn as_str(&self) -> &'static str {
        match self {
            DetectedPattern::HighClusterDensity => "high_cluster_density",
            DetectedPattern::HighEngagementReuse => "high_engagement_reuse",
        }
    }
}

/// Report metrics a detector's finding bears on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AffectedMetric {
    TrueEngagement,
    AudienceAuthenticity,
}

impl AffectedMetric {
    pub fn as_str(&self) -> &'static str {
        match self {
            AffectedMetric::TrueEngagement => "true_engagement",
            AffectedMetric::AudienceAuthenticity => "audience_authenticity",
        }
    }
}

/// A pod or reuse finding. Observational: it lowers confidence in the
/// affected metrics but never asserts fraud.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CredibilitySignal {
    pub kind: DetectorKind,
    /// 0.0-1.0
    pub signal_strength: f64,
    pub detected_patterns: Vec<DetectedPattern>,
    pub affected_metrics: Vec<AffectedMetric>,
    pub explanation: String,
    pub confidence_penalty: f64,
}
