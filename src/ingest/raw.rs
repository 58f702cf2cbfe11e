// Raw interaction records as produced by the ingestion collaborator.
//
// These are read-only inputs. The graph builder borrows them and never
// mutates or retains them.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::error::{Result, ValidationError};

/// Placeholder author id the scrapers emit for deleted or private accounts.
pub const UNKNOWN_AUTHOR: &str = "unknown";

/// The account whose audience is being evaluated.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Creator {
    pub handle: String,
}

impl Creator {
    pub fn new(handle: impl Into<String>) -> Self {
        Self {
            handle: handle.into(),
        }
    }

    pub fn validate(&self) -> Result<()> {
        if self.handle.trim().is_empty() {
            return Err(ValidationError::MissingCreatorId);
        }
        Ok(())
    }
}

/// A single time-stamped interaction (usually a comment).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RawInteraction {
    pub id: String,
    pub author_id: String,
    /// Any RFC 3339 offset is accepted and normalized to UTC
    pub timestamp: DateTime<Utc>,
    #[serde(default)]
    pub text: String,
    #[serde(default)]
    pub like_count: u64,
    #[serde(default)]
    pub reply_count: u64,
    /// Account the interaction was aimed at. `None` means the creator;
    /// `Some` records commenter-to-commenter engagement.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub target_id: Option<String>,
}

impl RawInteraction {
    /// A creator-directed interaction with no text or counters.
    pub fn new(id: impl Into<String>, author_id: impl Into<String>, timestamp: DateTime<Utc>) -> Self {
        Self {
            id: id.into(),
            author_id: author_id.into(),
            timestamp,
            text: String::new(),
            like_count: 0,
            reply_count: 0,
            target_id: None,
        }
    }

    /// Redirect this interaction at another account instead of the creator.
    pub fn aimed_at(mut self, target: impl Into<String>) -> Self {
        self.target_id = Some(target.into());
        self
    }

    pub fn validate(&self) -> Result<()> {
        if self.id.trim().is_empty() {
            return Err(ValidationError::MissingInteractionId);
        }
        if self.author_id.trim().is_empty() {
            return Err(ValidationError::MissingAuthor {
                interaction_id: self.id.clone(),
            });
        }
        if matches!(&self.target_id, Some(t) if t.trim().is_empty()) {
            return Err(ValidationError::EmptyTarget {
                interaction_id: self.id.clone(),
            });
        }
        Ok(())
    }

    /// True when the author is the ingestion layer's deleted/private placeholder.
    pub fn is_placeholder_author(&self) -> bool {
        self.author_id == UNKNOWN_AUTHOR
    }

    /// True when the interaction was aimed at the placeholder account.
    pub fn is_placeholder_target(&self) -> bool {
        self.target_id.as_deref() == Some(UNKNOWN_AUTHOR)
    }
}

/// Parse a JSON array of interaction records.
pub fn parse_interactions(json: &str) -> serde_json::Result<Vec<RawInteraction>> {
    serde_json::from_str(json)
}
