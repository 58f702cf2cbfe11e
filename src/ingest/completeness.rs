// How much of the expected data the ingestion layer actually gathered.

use serde::{Deserialize, Serialize};

/// Completeness of the data gathered for one evaluation.
///
/// Completeness-based confidence discounting happens in the heuristic layer
/// before calibration; the calibrator only carries this value into the
/// envelope so reports can explain degraded results.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DataCompleteness {
    #[default]
    Full,
    PartialNoComments,
    PartialNoImages,
    TextOnly,
    /// Served from history, no fresh scrape
    Archival,
    /// Private or deleted account
    Unavailable,
    Failed,
}

impl DataCompleteness {
    pub fn as_str(&self) -> &'static str {
        match self {
            DataCompleteness::Full => "full",
            DataCompleteness::PartialNoComments => "partial_no_comments",
            DataCompleteness::PartialNoImages => "partial_no_images",
            DataCompleteness::TextOnly => "text_only",
            DataCompleteness::Archival => "archival",
            DataCompleteness::Unavailable => "unavailable",
            DataCompleteness::Failed => "failed",
        }
    }

    pub fn all() -> &'static [DataCompleteness] {
        &[
            DataCompleteness::Full,
            DataCompleteness::PartialNoComments,
            DataCompleteness::PartialNoImages,
            DataCompleteness::TextOnly,
            DataCompleteness::Archival,
            DataCompleteness::Unavailable,
            DataCompleteness::Failed,
        ]
    }
}

impl std::fmt::Display for DataCompleteness {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl std::str::FromStr for DataCompleteness {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        DataCompleteness::all()
            .iter()
            .copied()
            .find(|c| c.as_str() == s)
            .ok_or_else(|| format!("unknown data completeness '{s}'"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_matches_as_str() {
        for c in DataCompleteness::all() {
            assert_eq!(c.as_str().parse::<DataCompleteness>().unwrap(), *c);
        }
        assert!("partial".parse::<DataCompleteness>().is_err());
    }

    #[test]
    fn test_serde_uses_snake_case() {
        let json = serde_json::to_string(&DataCompleteness::PartialNoComments).unwrap();
        assert_eq!(json, "\"partial_no_comments\"");
    }
}
