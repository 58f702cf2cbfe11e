// Coordination signals: scalar measurements derived purely from a graph.
//
// Signals are observational. They suggest synchronized engagement but
// never prove it, and the notes attached to them stay neutral.

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::config::CalibrationConfig;
use crate::graph::metrics::timing;
use crate::graph::schema::{EngagementGraph, GraphStatus};

pub const SIGNAL_VERSION: &str = "v1.0";

/// The coordination signals the calibrator can act on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SignalName {
    TimingConcentration,
    EdgeReuseRatio,
    CommenterOverlap,
}

impl SignalName {
    /// Evaluation order used by the calibrator.
    pub fn all() -> &'static [SignalName] {
        &[
            SignalName::TimingConcentration,
            SignalName::EdgeReuseRatio,
            SignalName::CommenterOverlap,
        ]
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            SignalName::TimingConcentration => "timing_concentration",
            SignalName::EdgeReuseRatio => "edge_reuse_ratio",
            SignalName::CommenterOverlap => "commenter_overlap",
        }
    }
}

impl std::fmt::Display for SignalName {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CoordinationSignals {
    /// Fraction of edges whose first interaction is within the burst window
    /// of the median first interaction
    pub timing_concentration: f64,
    /// Proxy: equal to `edge_reuse_ratio`. True cross-post overlap needs
    /// per-post segmentation, which a single-window graph does not carry.
    pub commenter_overlap: f64,
    /// Fraction of edges with more than one interaction
    pub edge_reuse_ratio: f64,
    /// Not implemented: needs creator-to-commenter edges, which are not
    /// collected. Always 0.0.
    pub reciprocity_score: f64,
    pub sample_size: usize,
    pub confidence: f64,
    pub notes: Vec<String>,
    pub signal_version: String,
}

impl CoordinationSignals {
    /// Signals for a graph with nothing to measure.
    pub fn empty() -> Self {
        Self {
            timing_concentration: 0.0,
            commenter_overlap: 0.0,
            edge_reuse_ratio: 0.0,
            reciprocity_score: 0.0,
            sample_size: 0,
            confidence: 0.0,
            notes: vec!["Insufficient data".to_string()],
            signal_version: SIGNAL_VERSION.to_string(),
        }
    }

    pub fn value(&self, name: SignalName) -> f64 {
        match name {
            SignalName::TimingConcentration => self.timing_concentration,
            SignalName::EdgeReuseRatio => self.edge_reuse_ratio,
            SignalName::CommenterOverlap => self.commenter_overlap,
        }
    }
}

pub struct SignalEngine<'a> {
    config: &'a CalibrationConfig,
}

impl<'a> SignalEngine<'a> {
    pub fn new(config: &'a CalibrationConfig) -> Self {
        Self { config }
    }

    /// Compute coordination signals over the edges into the graph's creator.
    pub fn compute(&self, graph: &EngagementGraph) -> CoordinationSignals {
        let edges: Vec<_> = graph.creator_edges().collect();
        let total = edges.len();
        if total == 0 {
            return CoordinationSignals::empty();
        }

        let arrivals: Vec<_> = edges.iter().map(|e| e.first_interaction).collect();
        let timing_concentration = timing::burst_ratio(&arrivals, self.config.burst_window_secs);

        let reused = edges.iter().filter(|e| e.comment_count > 1).count();
        let edge_reuse_ratio = reused as f64 / total as f64;
        let commenter_overlap = edge_reuse_ratio;

        let mut confidence = 1.0;
        if total < self.config.signal_min_sample_size {
            confidence *= self.config.small_sample_confidence_factor;
        }
        if graph.status() == GraphStatus::Inconclusive {
            confidence = 0.0;
        }

        let mut notes = Vec::new();
        if timing_concentration > self.config.timing_note_threshold {
            notes.push(format!(
                "{:.0}% of commenters first arrived within {} minutes of the median arrival time.",
                timing_concentration * 100.0,
                self.config.burst_window_secs / 60
            ));
        }
        if edge_reuse_ratio > self.config.reuse_note_threshold {
            notes.push(format!(
                "{:.0}% of commenters interacted more than once in this window.",
                edge_reuse_ratio * 100.0
            ));
        }

        debug!(
            creator = graph.creator(),
            sample_size = total,
            timing = format!("{:.2}", timing_concentration),
            reuse = format!("{:.2}", edge_reuse_ratio),
            confidence,
            "Computed coordination signals"
        );

        CoordinationSignals {
            timing_concentration,
            commenter_overlap,
            edge_reuse_ratio,
            reciprocity_score: 0.0,
            sample_size: total,
            confidence,
            notes,
            signal_version: SIGNAL_VERSION.to_string(),
        }
    }
}
