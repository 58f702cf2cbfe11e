// Engagement graph data model.
//
// A graph is built once per (creator, window, snapshot) and never mutated.
// Fields are private; consumers read through accessors.

use std::collections::BTreeMap;

use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};

use crate::error::ValidationError;

/// Lookback window for graph construction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Window {
    #[serde(rename = "24h")]
    TwentyFourHours,
    #[serde(rename = "7d")]
    SevenDays,
    #[serde(rename = "30d")]
    ThirtyDays,
}

impl Window {
    pub fn duration(&self) -> Duration {
        match self {
            Window::TwentyFourHours => Duration::hours(24),
            Window::SevenDays => Duration::days(7),
            Window::ThirtyDays => Duration::days(30),
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Window::TwentyFourHours => "24h",
            Window::SevenDays => "7d",
            Window::ThirtyDays => "30d",
        }
    }
}

impl std::fmt::Display for Window {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl std::str::FromStr for Window {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim() {
            "24h" => Ok(Window::TwentyFourHours),
            "7d" => Ok(Window::SevenDays),
            "30d" => Ok(Window::ThirtyDays),
            other => Err(ValidationError::UnknownWindow(other.to_string())),
        }
    }
}

/// Whether downstream consumers may derive anything from the graph.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum GraphStatus {
    #[serde(rename = "OK")]
    Ok,
    /// Too few commenters survived gating. Nodes and edges are kept for
    /// diagnostics but no score adjustment may come from this graph.
    #[serde(rename = "INCONCLUSIVE")]
    Inconclusive,
}

impl GraphStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            GraphStatus::Ok => "OK",
            GraphStatus::Inconclusive => "INCONCLUSIVE",
        }
    }
}

impl std::fmt::Display for GraphStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum NodeRole {
    Creator,
    Commenter,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GraphNode {
    pub account_id: String,
    pub role: NodeRole,
    pub first_seen: DateTime<Utc>,
}

/// Aggregated, directed interaction from `source` to `target`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GraphEdge {
    pub source: String,
    pub target: String,
    pub comment_count: u32,
    pub first_interaction: DateTime<Utc>,
    pub last_interaction: DateTime<Utc>,
    /// Linear decay: 1.0 at build time, 0.0 at the window boundary
    pub recency_weight: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EngagementGraph {
    creator: String,
    window: Window,
    nodes: BTreeMap<String, GraphNode>,
    edges: Vec<GraphEdge>,
    status: GraphStatus,
    built_at: DateTime<Utc>,
}

impl EngagementGraph {
    /// Assemble a graph from already-aggregated parts.
    ///
    /// The builder is the normal entry point; this exists for callers that
    /// reconstitute a graph from their own storage or synthesize one.
    pub fn from_parts(
        creator: impl Into<String>,
        window: Window,
        nodes: BTreeMap<String, GraphNode>,
        edges: Vec<GraphEdge>,
        status: GraphStatus,
        built_at: DateTime<Utc>,
    ) -> Self {
        Self {
            creator: creator.into(),
            window,
            nodes,
            edges,
            status,
            built_at,
        }
    }

    pub fn creator(&self) -> &str {
        &self.creator
    }

    pub fn window(&self) -> Window {
        self.window
    }

    pub fn nodes(&self) -> &BTreeMap<String, GraphNode> {
        &self.nodes
    }

    pub fn edges(&self) -> &[GraphEdge] {
        &self.edges
    }

    pub fn status(&self) -> GraphStatus {
        self.status
    }

    pub fn built_at(&self) -> DateTime<Utc> {
        self.built_at
    }

    pub fn is_conclusive(&self) -> bool {
        self.status == GraphStatus::Ok
    }

    /// Edges pointing at `target`.
    pub fn inbound_edges<'a>(&'a self, target: &'a str) -> impl Iterator<Item = &'a GraphEdge> + 'a {
        self.edges.iter().filter(move |e| e.target == target)
    }

    /// Edges pointing at the graph's creator.
    pub fn creator_edges(&self) -> impl Iterator<Item = &GraphEdge> + '_ {
        self.inbound_edges(&self.creator)
    }

    pub fn edge_between(&self, source: &str, target: &str) -> Option<&GraphEdge> {
        self.edges
            .iter()
            .find(|e| e.source == source && e.target == target)
    }
}
