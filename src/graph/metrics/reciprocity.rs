// Pod detection: do a creator's commenters also engage with each other?
//
// Engagement pods show up as a dense commenter-to-commenter subgraph among
// the accounts that comment on the target. Organic audiences of large
// accounts sit well below 0.05 density.

use std::collections::BTreeSet;

use tracing::debug;

use super::{AffectedMetric, CredibilitySignal, DetectedPattern, DetectorKind};
use crate::config::CalibrationConfig;
use crate::graph::schema::EngagementGraph;

/// Density of the commenter subgraph around one target.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ClusterDensity {
    pub commenters: usize,
    /// Ordered commenter pairs with an edge between them
    pub connections: usize,
    pub density: f64,
}

/// Measure cluster density among the accounts with an edge into `target`.
///
/// Returns `None` when fewer than `min_commenters` accounts comment on the
/// target (or fewer than two, where no pair exists).
pub fn cluster_density(
    graph: &EngagementGraph,
    target: &str,
    min_commenters: usize,
) -> Option<ClusterDensity> {
    let commenters: BTreeSet<&str> = graph
        .inbound_edges(target)
        .map(|e| e.source.as_str())
        .collect();
    let n = commenters.len();
    if n < min_commenters || n < 2 {
        return None;
    }

    // Edges are unique per (source, target), so each hit is one ordered pair
    let connections = graph
        .edges()
        .iter()
        .filter(|e| {
            e.source != e.target
                && commenters.contains(e.source.as_str())
                && commenters.contains(e.target.as_str())
        })
        .count();
    let possible = n * (n - 1);

    Some(ClusterDensity {
        commenters: n,
        connections,
        density: connections as f64 / possible as f64,
    })
}

pub struct PodDetector<'a> {
    config: &'a CalibrationConfig,
}

impl<'a> PodDetector<'a> {
    pub fn new(config: &'a CalibrationConfig) -> Self {
        Self { config }
    }

    pub fn detect(&self, graph: &EngagementGraph, target: &str) -> Option<CredibilitySignal> {
        let measured = cluster_density(graph, target, self.config.reciprocity_min_commenters)?;
        debug!(
            account = target,
            commenters = measured.commenters,
            connections = measured.connections,
            density = format!("{:.3}", measured.density),
            "Measured commenter cluster density"
        );

        if measured.density <= self.config.reciprocity_density_threshold {
            return None;
        }

        Some(CredibilitySignal {
            kind: DetectorKind::Pod,
            signal_strength: measured.density,
            detected_patterns: vec![DetectedPattern::HighClusterDensity],
            affected_metrics: vec![
                AffectedMetric::TrueEngagement,
                AffectedMetric::AudienceAuthenticity,
            ],
            explanation: format!(
                "Commenter cluster density is {:.2} across {} commenters who also engage with each other. \
                 This pattern is consistent with an engagement pod but does not establish one.",
                measured.density, measured.commenters
            ),
            confidence_penalty: (measured.density * 2.0).min(0.5),
        })
    }
}
