// Graph builder: raw interactions to an immutable, windowed engagement graph.
//
// 1. Drop interactions older than the window cutoff
// 2. Aggregate per (author, target): count, first and last interaction
// 3. Edge gating: drop pairs with fewer than `min_interactions_per_edge`
// 4. Recency weight: linear decay from build time to the cutoff
// 5. Graph gating: too few commenters on the creator -> INCONCLUSIVE
//
// Aggregation is min/max/sum, so input order never changes the result.
// The stable sort below only makes debug traces easier to follow.

use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use tracing::{debug, info};

use crate::config::CalibrationConfig;
use crate::error::{Result, ValidationError};
use crate::graph::schema::{
    EngagementGraph, GraphEdge, GraphNode, GraphStatus, NodeRole, Window,
};
use crate::ingest::raw::{Creator, RawInteraction};

struct EdgeStats {
    count: u32,
    first: DateTime<Utc>,
    last: DateTime<Utc>,
}

pub struct GraphBuilder<'a> {
    config: &'a CalibrationConfig,
}

impl<'a> GraphBuilder<'a> {
    pub fn new(config: &'a CalibrationConfig) -> Self {
        Self { config }
    }

    /// Build a graph for `window` ending now.
    pub fn build(
        &self,
        creator: &Creator,
        interactions: &[RawInteraction],
        window: Window,
    ) -> Result<EngagementGraph> {
        self.build_at(creator, interactions, window, Utc::now())
    }

    /// Build a graph for `window` ending at `now`.
    ///
    /// Every record is validated before any aggregation, so a malformed
    /// input yields an error and never a partially built graph.
    pub fn build_at(
        &self,
        creator: &Creator,
        interactions: &[RawInteraction],
        window: Window,
        now: DateTime<Utc>,
    ) -> Result<EngagementGraph> {
        creator.validate()?;
        for interaction in interactions {
            interaction.validate()?;
        }

        let creator_id = creator.handle.as_str();
        let cutoff = now.checked_sub_signed(window.duration()).ok_or_else(|| {
            ValidationError::WindowOutOfRange {
                window: window.as_str(),
                now: now.to_rfc3339(),
            }
        })?;

        let mut in_window: Vec<&RawInteraction> = interactions
            .iter()
            .filter(|i| i.timestamp >= cutoff)
            .collect();
        in_window.sort_by(|a, b| a.timestamp.cmp(&b.timestamp).then_with(|| a.id.cmp(&b.id)));

        let mut nodes: BTreeMap<String, GraphNode> = BTreeMap::new();
        nodes.insert(
            creator_id.to_string(),
            GraphNode {
                account_id: creator_id.to_string(),
                role: NodeRole::Creator,
                first_seen: now,
            },
        );

        let mut stats: BTreeMap<(&str, &str), EdgeStats> = BTreeMap::new();
        let mut skipped_placeholder = 0usize;
        let mut skipped_self = 0usize;

        for interaction in &in_window {
            if interaction.is_placeholder_author() || interaction.is_placeholder_target() {
                skipped_placeholder += 1;
                continue;
            }
            let author = interaction.author_id.as_str();
            let target = interaction.target_id.as_deref().unwrap_or(creator_id);
            if author == target {
                skipped_self += 1;
                continue;
            }

            for account in [author, target] {
                nodes
                    .entry(account.to_string())
                    .or_insert_with(|| GraphNode {
                        account_id: account.to_string(),
                        role: NodeRole::Commenter,
                        first_seen: interaction.timestamp,
                    });
            }

            let ts = interaction.timestamp;
            let entry = stats.entry((author, target)).or_insert(EdgeStats {
                count: 0,
                first: ts,
                last: ts,
            });
            entry.count += 1;
            entry.first = entry.first.min(ts);
            entry.last = entry.last.max(ts);
        }

        let window_secs = (now - cutoff).num_milliseconds() as f64 / 1000.0;
        let mut edges = Vec::with_capacity(stats.len());
        let mut gated_out = 0usize;

        for ((source, target), s) in stats {
            if s.count < self.config.min_interactions_per_edge {
                gated_out += 1;
                continue;
            }
            edges.push(GraphEdge {
                source: source.to_string(),
                target: target.to_string(),
                comment_count: s.count,
                first_interaction: s.first,
                last_interaction: s.last,
                recency_weight: recency_weight(now, s.last, window_secs),
            });
        }

        let commenters = edges.iter().filter(|e| e.target == creator_id).count();
        let status = if commenters < self.config.min_commenters {
            GraphStatus::Inconclusive
        } else {
            GraphStatus::Ok
        };

        debug!(
            creator = creator_id,
            in_window = in_window.len(),
            skipped_placeholder,
            skipped_self,
            gated_out,
            "Aggregated interactions"
        );
        info!(
            creator = creator_id,
            window = window.as_str(),
            commenters,
            edges = edges.len(),
            status = status.as_str(),
            "Built engagement graph"
        );

        Ok(EngagementGraph::from_parts(
            creator_id, window, nodes, edges, status, now,
        ))
    }
}

/// `1 - age / window`, clamped to [0, 1]. Timestamps after `now` count as
/// fresh activity.
fn recency_weight(now: DateTime<Utc>, last: DateTime<Utc>, window_secs: f64) -> f64 {
    if window_secs <= 0.0 {
        return 0.0;
    }
    let age_secs = (now - last).num_milliseconds() as f64 / 1000.0;
    (1.0 - age_secs / window_secs).clamp(0.0, 1.0)
}
