use std::env;
use std::str::FromStr;

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

use crate::error::{self, ValidationError};
use crate::graph::schema::Window;

/// Every threshold used by the graph, signal, detector and calibration stages.
///
/// One instance is passed by reference into every component so no stage
/// carries a private copy of a default. Field names match the
/// `SPONSORSCOPE_<FIELD>` environment overrides.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CalibrationConfig {
    // Graph construction
    pub min_commenters: usize,
    pub min_interactions_per_edge: u32,

    // Signal engine
    /// Edge count below which signal confidence is discounted
    pub signal_min_sample_size: usize,
    pub small_sample_confidence_factor: f64,
    /// Half-width of the burst window around the median first interaction
    pub burst_window_secs: i64,
    pub timing_note_threshold: f64,
    pub reuse_note_threshold: f64,

    // Detectors
    pub hyperactivity_threshold: u32,
    pub reciprocity_min_commenters: usize,
    pub reciprocity_density_threshold: f64,
    pub reuse_min_commenters: usize,
    pub reuse_ratio_threshold: f64,
    pub reuse_confidence_penalty: f64,

    // Calibration
    pub strong_signal_threshold: f64,
    pub corroboration_minimum: usize,
    pub graph_confidence_floor: f64,
    pub graph_low_confidence_factor: f64,
    pub confidence_floor_for_adjustment: f64,
    pub flat_confidence_penalty: f64,
    pub max_score_penalty_pct: f64,
    pub per_signal_penalty_pct: f64,
    pub band_base_width: f64,
    pub band_confidence_span: f64,
    pub max_score: f64,
}

impl Default for CalibrationConfig {
    fn default() -> Self {
        Self {
            min_commenters: 15,
            min_interactions_per_edge: 2,
            signal_min_sample_size: 50,
            small_sample_confidence_factor: 0.5,
            burst_window_secs: 300,
            timing_note_threshold: 0.8,
            reuse_note_threshold: 0.5,
            hyperactivity_threshold: 5,
            reciprocity_min_commenters: 10,
            reciprocity_density_threshold: 0.1,
            reuse_min_commenters: 20,
            reuse_ratio_threshold: 0.3,
            reuse_confidence_penalty: 0.2,
            strong_signal_threshold: 0.7,
            corroboration_minimum: 2,
            graph_confidence_floor: 0.6,
            graph_low_confidence_factor: 0.9,
            confidence_floor_for_adjustment: 0.5,
            flat_confidence_penalty: 0.2,
            max_score_penalty_pct: 0.15,
            per_signal_penalty_pct: 0.05,
            band_base_width: 6.0,
            band_confidence_span: 20.0,
            max_score: 100.0,
        }
    }
}

/// Read `SPONSORSCOPE_<suffix>`, falling back to `default` when unset.
fn env_or<T>(suffix: &str, default: T) -> Result<T>
where
    T: FromStr,
    T::Err: std::error::Error + Send + Sync + 'static,
{
    let key = format!("SPONSORSCOPE_{suffix}");
    match env::var(&key) {
        Ok(raw) => raw
            .trim()
            .parse()
            .with_context(|| format!("{key} has an invalid value: {raw:?}")),
        Err(_) => Ok(default),
    }
}

impl CalibrationConfig {
    /// Overlay `SPONSORSCOPE_*` environment variables on the defaults.
    pub fn from_env() -> Result<Self> {
        let d = Self::default();
        let config = Self {
            min_commenters: env_or("MIN_COMMENTERS", d.min_commenters)?,
            min_interactions_per_edge: env_or(
                "MIN_INTERACTIONS_PER_EDGE",
                d.min_interactions_per_edge,
            )?,
            signal_min_sample_size: env_or("SIGNAL_MIN_SAMPLE_SIZE", d.signal_min_sample_size)?,
            small_sample_confidence_factor: env_or(
                "SMALL_SAMPLE_CONFIDENCE_FACTOR",
                d.small_sample_confidence_factor,
            )?,
            burst_window_secs: env_or("BURST_WINDOW_SECS", d.burst_window_secs)?,
            timing_note_threshold: env_or("TIMING_NOTE_THRESHOLD", d.timing_note_threshold)?,
            reuse_note_threshold: env_or("REUSE_NOTE_THRESHOLD", d.reuse_note_threshold)?,
            hyperactivity_threshold: env_or("HYPERACTIVITY_THRESHOLD", d.hyperactivity_threshold)?,
            reciprocity_min_commenters: env_or(
                "RECIPROCITY_MIN_COMMENTERS",
                d.reciprocity_min_commenters,
            )?,
            reciprocity_density_threshold: env_or(
                "RECIPROCITY_DENSITY_THRESHOLD",
                d.reciprocity_density_threshold,
            )?,
            reuse_min_commenters: env_or("REUSE_MIN_COMMENTERS", d.reuse_min_commenters)?,
            reuse_ratio_threshold: env_or("REUSE_RATIO_THRESHOLD", d.reuse_ratio_threshold)?,
            reuse_confidence_penalty: env_or(
                "REUSE_CONFIDENCE_PENALTY",
                d.reuse_confidence_penalty,
            )?,
            strong_signal_threshold: env_or("STRONG_SIGNAL_THRESHOLD", d.strong_signal_threshold)?,
            corroboration_minimum: env_or("CORROBORATION_MINIMUM", d.corroboration_minimum)?,
            graph_confidence_floor: env_or("GRAPH_CONFIDENCE_FLOOR", d.graph_confidence_floor)?,
            graph_low_confidence_factor: env_or(
                "GRAPH_LOW_CONFIDENCE_FACTOR",
                d.graph_low_confidence_factor,
            )?,
            confidence_floor_for_adjustment: env_or(
                "CONFIDENCE_FLOOR_FOR_ADJUSTMENT",
                d.confidence_floor_for_adjustment,
            )?,
            flat_confidence_penalty: env_or("FLAT_CONFIDENCE_PENALTY", d.flat_confidence_penalty)?,
            max_score_penalty_pct: env_or("MAX_SCORE_PENALTY_PCT", d.max_score_penalty_pct)?,
            per_signal_penalty_pct: env_or("PER_SIGNAL_PENALTY_PCT", d.per_signal_penalty_pct)?,
            band_base_width: env_or("BAND_BASE_WIDTH", d.band_base_width)?,
            band_confidence_span: env_or("BAND_CONFIDENCE_SPAN", d.band_confidence_span)?,
            max_score: env_or("MAX_SCORE", d.max_score)?,
        };
        config.validate()?;
        Ok(config)
    }

    /// Reject configurations the pipeline cannot honor.
    pub fn validate(&self) -> error::Result<()> {
        if self.min_interactions_per_edge == 0 {
            return Err(ValidationError::InvalidConfig {
                field: "min_interactions_per_edge",
                reason: "must be at least 1".to_string(),
            });
        }
        if self.corroboration_minimum == 0 {
            return Err(ValidationError::InvalidConfig {
                field: "corroboration_minimum",
                reason: "must be at least 1".to_string(),
            });
        }
        if self.burst_window_secs < 0 {
            return Err(ValidationError::InvalidConfig {
                field: "burst_window_secs",
                reason: "must not be negative".to_string(),
            });
        }

        let ratios = [
            ("small_sample_confidence_factor", self.small_sample_confidence_factor),
            ("timing_note_threshold", self.timing_note_threshold),
            ("reuse_note_threshold", self.reuse_note_threshold),
            ("reciprocity_density_threshold", self.reciprocity_density_threshold),
            ("reuse_ratio_threshold", self.reuse_ratio_threshold),
            ("reuse_confidence_penalty", self.reuse_confidence_penalty),
            ("strong_signal_threshold", self.strong_signal_threshold),
            ("graph_confidence_floor", self.graph_confidence_floor),
            ("graph_low_confidence_factor", self.graph_low_confidence_factor),
            ("confidence_floor_for_adjustment", self.confidence_floor_for_adjustment),
            ("flat_confidence_penalty", self.flat_confidence_penalty),
            ("max_score_penalty_pct", self.max_score_penalty_pct),
            ("per_signal_penalty_pct", self.per_signal_penalty_pct),
        ];
        for (field, value) in ratios {
            if !(value.is_finite() && (0.0..=1.0).contains(&value)) {
                return Err(ValidationError::InvalidConfig {
                    field,
                    reason: format!("{value} is outside [0, 1]"),
                });
            }
        }

        let positives = [
            ("band_base_width", self.band_base_width),
            ("band_confidence_span", self.band_confidence_span),
            ("max_score", self.max_score),
        ];
        for (field, value) in positives {
            if !(value.is_finite() && value >= 0.0) {
                return Err(ValidationError::InvalidConfig {
                    field,
                    reason: format!("{value} must be a non-negative number"),
                });
            }
        }
        Ok(())
    }
}

/// Settings for the command-line front end.
pub struct Config {
    pub calibration: CalibrationConfig,
    /// Window used when `--window` is not given (SPONSORSCOPE_WINDOW)
    pub default_window: Window,
}

impl Config {
    /// Load configuration from environment variables.
    pub fn load() -> Result<Self> {
        let default_window = match env::var("SPONSORSCOPE_WINDOW") {
            Ok(raw) => raw
                .parse::<Window>()
                .with_context(|| format!("SPONSORSCOPE_WINDOW has an invalid value: {raw:?}"))?,
            Err(_) => Window::SevenDays,
        };
        Ok(Self {
            calibration: CalibrationConfig::from_env()?,
            default_window,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_are_valid() {
        assert!(CalibrationConfig::default().validate().is_ok());
    }

    #[test]
    fn test_documented_defaults() {
        let c = CalibrationConfig::default();
        assert_eq!(c.min_commenters, 15);
        assert_eq!(c.min_interactions_per_edge, 2);
        assert_eq!(c.hyperactivity_threshold, 5);
        assert_eq!(c.corroboration_minimum, 2);
        assert!((c.strong_signal_threshold - 0.7).abs() < f64::EPSILON);
        assert!((c.max_score_penalty_pct - 0.15).abs() < f64::EPSILON);
        assert!((c.per_signal_penalty_pct - 0.05).abs() < f64::EPSILON);
    }

    #[test]
    fn test_rejects_ratio_above_one() {
        let config = CalibrationConfig {
            max_score_penalty_pct: 1.5,
            ..CalibrationConfig::default()
        };
        assert!(matches!(
            config.validate(),
            Err(ValidationError::InvalidConfig {
                field: "max_score_penalty_pct",
                ..
            })
        ));
    }

    #[test]
    fn test_rejects_zero_edge_minimum() {
        let config = CalibrationConfig {
            min_interactions_per_edge: 0,
            ..CalibrationConfig::default()
        };
        assert!(config.validate().is_err());
    }

    // Environment variables are process-global, so every override case
    // runs inside this one test.
    #[test]
    fn test_env_overrides() {
        env::set_var("SPONSORSCOPE_MIN_COMMENTERS", "3");
        let config = CalibrationConfig::from_env().unwrap();
        assert_eq!(config.min_commenters, 3);
        assert_eq!(config.min_interactions_per_edge, 2);
        env::remove_var("SPONSORSCOPE_MIN_COMMENTERS");

        env::set_var("SPONSORSCOPE_STRONG_SIGNAL_THRESHOLD", "high");
        let err = CalibrationConfig::from_env().unwrap_err();
        assert!(err.to_string().contains("SPONSORSCOPE_STRONG_SIGNAL_THRESHOLD"));
        env::remove_var("SPONSORSCOPE_STRONG_SIGNAL_THRESHOLD");

        env::set_var("SPONSORSCOPE_MAX_SCORE_PENALTY_PCT", "1.5");
        let err = CalibrationConfig::from_env().unwrap_err();
        assert!(matches!(
            err.downcast_ref::<ValidationError>(),
            Some(ValidationError::InvalidConfig {
                field: "max_score_penalty_pct",
                ..
            })
        ));
        env::remove_var("SPONSORSCOPE_MAX_SCORE_PENALTY_PCT");

        env::set_var("SPONSORSCOPE_WINDOW", "30d");
        assert_eq!(Config::load().unwrap().default_window, Window::ThirtyDays);
        env::set_var("SPONSORSCOPE_WINDOW", "1y");
        let err = Config::load().err().unwrap();
        assert!(err.to_string().contains("SPONSORSCOPE_WINDOW"));
        env::remove_var("SPONSORSCOPE_WINDOW");

        assert_eq!(CalibrationConfig::from_env().unwrap(), CalibrationConfig::default());
        assert_eq!(Config::load().unwrap().default_window, Window::SevenDays);
    }
}
