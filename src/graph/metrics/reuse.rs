// Reuse detection: is the audience dominated by hyperactive commenters?
//
// Organic comment sections have a long tail of one-off commenters. When a
// large share of commenters show up again and again in one window, the
// audience is either an unusually devoted fan base or a coordinated group.

use tracing::debug;

use super::{AffectedMetric, CredibilitySignal, DetectedPattern, DetectorKind};
use crate::config::CalibrationConfig;
use crate::graph::schema::EngagementGraph;

pub struct ReuseDetector<'a> {
    config: &'a CalibrationConfig,
}

impl<'a> ReuseDetector<'a> {
    pub fn new(config: &'a CalibrationConfig) -> Self {
        Self { config }
    }

    /// Fraction of inbound commenters at or above the hyperactivity threshold.
    ///
    /// `None` when fewer than `reuse_min_commenters` commenters exist.
    pub fn reuse_ratio(&self, graph: &EngagementGraph, target: &str) -> Option<f64> {
        let (total, hyperactive) = graph.inbound_edges(target).fold((0usize, 0usize), |(t, h), e| {
            let hot = e.comment_count >= self.config.hyperactivity_threshold;
            (t + 1, h + usize::from(hot))
        });
        if total < self.config.reuse_min_commenters || total == 0 {
            return None;
        }
        debug!(
            account = target,
            total,
            hyperactive,
            "Counted hyperactive commenters"
        );
        Some(hyperactive as f64 / total as f64)
    }

    pub fn detect(&self, graph: &EngagementGraph, target: &str) -> Option<CredibilitySignal> {
        let ratio = self.reuse_ratio(graph, target)?;
        if ratio <= self.config.reuse_ratio_threshold {
            return None;
        }

        Some(CredibilitySignal {
            kind: DetectorKind::Reuse,
            signal_strength: ratio,
            detected_patterns: vec![DetectedPattern::HighEngagementReuse],
            affected_metrics: vec![AffectedMetric::AudienceAuthenticity],
            explanation: format!(
                "{:.1}% of commenters are hyperactive ({}+ comments in the window). \
                 Comment sections usually show a long tail of one-off commenters.",
                ratio * 100.0,
                self.config.hyperactivity_threshold
            ),
            confidence_penalty: self.config.reuse_confidence_penalty,
        })
    }
}
