// Runs the pod and reuse detectors against a built graph.

use tracing::info;

use crate::config::CalibrationConfig;
use crate::graph::metrics::reciprocity::PodDetector;
use crate::graph::metrics::reuse::ReuseDetector;
use crate::graph::metrics::CredibilitySignal;
use crate::graph::schema::EngagementGraph;

pub struct GraphEngine<'a> {
    pod: PodDetector<'a>,
    reuse: ReuseDetector<'a>,
}

impl<'a> GraphEngine<'a> {
    pub fn new(config: &'a CalibrationConfig) -> Self {
        Self {
            pod: PodDetector::new(config),
            reuse: ReuseDetector::new(config),
        }
    }

    /// Detector signals that fired for `target`, pod first then reuse.
    ///
    /// An inconclusive graph yields no signals: nothing may be derived from it.
    pub fn analyze(&self, graph: &EngagementGraph, target: &str) -> Vec<CredibilitySignal> {
        if !graph.is_conclusive() {
            return Vec::new();
        }

        let signals: Vec<CredibilitySignal> = [self.pod.detect(graph, target), self.reuse.detect(graph, target)]
            .into_iter()
            .flatten()
            .collect();

        if !signals.is_empty() {
            info!(
                account = target,
                fired = signals.len(),
                "Graph detectors produced credibility signals"
            );
        }
        signals
    }
}
