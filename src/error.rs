// Validation errors: the only failures the scoring core can raise.
//
// Insufficient data is never an error: it is encoded in the outputs
// (graph status, suppressed signals, absent detector signals). These
// variants cover caller contract violations only.

use thiserror::Error;

/// Malformed input or an out-of-range numeric argument.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ValidationError {
    #[error("Creator descriptor has no handle/id")]
    MissingCreatorId,

    #[error("Interaction record has no id")]
    MissingInteractionId,

    #[error("Interaction {interaction_id} has no author id")]
    MissingAuthor { interaction_id: String },

    #[error("Interaction {interaction_id} has an empty target id")]
    EmptyTarget { interaction_id: String },

    #[error("Window {window} reaches before the earliest representable time from {now}")]
    WindowOutOfRange { window: &'static str, now: String },

    #[error("{field} must be a finite score in [0, {max}], got {value}")]
    ScoreOutOfRange {
        field: &'static str,
        value: f64,
        max: f64,
    },

    #[error("{field} must be a finite value in [0, 1], got {value}")]
    ConfidenceOutOfRange { field: &'static str, value: f64 },

    #[error("Invalid configuration for {field}: {reason}")]
    InvalidConfig { field: &'static str, reason: String },

    #[error("Unknown window '{0}' (expected 24h, 7d or 30d)")]
    UnknownWindow(String),
}

pub type Result<T> = std::result::Result<T, ValidationError>;

/// Check that `value` is finite and within [0, 1].
pub(crate) fn check_unit(field: &'static str, value: f64) -> Result<()> {
    if value.is_finite() && (0.0..=1.0).contains(&value) {
        Ok(())
    } else {
        Err(ValidationError::ConfidenceOutOfRange { field, value })
    }
}

/// Check that `value` is finite and within [0, max].
pub(crate) fn check_score(field: &'static str, value: f64, max: f64) -> Result<()> {
    if value.is_finite() && (0.0..=max).contains(&value) {
        Ok(())
    } else {
        Err(ValidationError::ScoreOutOfRange { field, value, max })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_check_unit_bounds() {
        assert!(check_unit("c", 0.0).is_ok());
        assert!(check_unit("c", 1.0).is_ok());
        assert!(check_unit("c", 1.0001).is_err());
        assert!(check_unit("c", -0.1).is_err());
        assert!(check_unit("c", f64::NAN).is_err());
    }

    #[test]
    fn test_check_score_rejects_negative_and_infinite() {
        assert!(check_score("s", 55.5, 100.0).is_ok());
        assert!(check_score("s", -1.0, 100.0).is_err());
        assert!(check_score("s", f64::INFINITY, 100.0).is_err());
    }

    #[test]
    fn test_error_message_names_field() {
        let err = ValidationError::ConfidenceOutOfRange {
            field: "base_confidence",
            value: 1.5,
        };
        assert!(err.to_string().contains("base_confidence"));
    }
}
