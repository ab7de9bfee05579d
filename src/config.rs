// Copyright 2026 Hypermesh Foundation. All rights reserved.
// Meme Propagation Arena - Configuration

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::GameError;

/// Balance every session starts with.
pub const STARTING_BALANCE: f64 = 1000.0;

/// Upper bound on samples taken by the peak scan and the result chart.
pub const MAX_CURVE_SAMPLES: f64 = 10_000.0;

// ---------------------------------------------------------------------------
// RoundConfig
// ---------------------------------------------------------------------------

/// Distance constants for a round. Defaults are the tuned game values.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct RoundConfig {
    /// Distance reached after a scenario's `max_duration` seconds.
    pub playable_distance: f64,
    /// A tick landing at or past this distance force-ends the round.
    pub forced_end_distance: f64,
    /// Peak scan covers `[0, peak_scan_limit)`.
    pub peak_scan_limit: f64,
    pub peak_scan_step: f64,
    /// Result chart covers `[0, chart_limit]`.
    pub chart_limit: f64,
    pub chart_step: f64,
}

impl Default for RoundConfig {
    fn default() -> Self {
        Self {
            playable_distance: 8.0,
            forced_end_distance: 10.0,
            peak_scan_limit: 10.0,
            peak_scan_step: 0.1,
            chart_limit: 10.0,
            chart_step: 0.2,
        }
    }
}

impl RoundConfig {
    pub fn validate(&self) -> Result<(), GameError> {
        let positive = [
            ("playable_distance", self.playable_distance),
            ("forced_end_distance", self.forced_end_distance),
            ("peak_scan_limit", self.peak_scan_limit),
            ("peak_scan_step", self.peak_scan_step),
            ("chart_limit", self.chart_limit),
            ("chart_step", self.chart_step),
        ];
        for (name, value) in positive {
            if !(value.is_finite() && value > 0.0) {
                return Err(GameError::InvalidConfig(format!(
                    "{name} must be a positive number, got {value}"
                )));
            }
        }
        if self.forced_end_distance < self.playable_distance {
            return Err(GameError::InvalidConfig(format!(
                "forced_end_distance ({}) must not be below playable_distance ({})",
                self.forced_end_distance, self.playable_distance
            )));
        }
        let sampled = [
            ("peak_scan", self.peak_scan_limit / self.peak_scan_step),
            ("chart", self.chart_limit / self.chart_step),
        ];
        for (name, samples) in sampled {
            if samples > MAX_CURVE_SAMPLES {
                return Err(GameError::InvalidConfig(format!(
                    "{name} would take {samples:.0} samples, max is {MAX_CURVE_SAMPLES}"
                )));
            }
        }
        Ok(())
    }
}

// ---------------------------------------------------------------------------
// GameConfig
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct GameConfig {
    pub starting_balance: f64,
    pub round: RoundConfig,
}

impl Default for GameConfig {
    fn default() -> Self {
        Self {
            starting_balance: STARTING_BALANCE,
            round: RoundConfig::default(),
        }
    }
}

impl GameConfig {
    pub fn validate(&self) -> Result<(), GameError> {
        if !(self.starting_balance.is_finite() && self.starting_balance > 0.0) {
            return Err(GameError::InvalidConfig(format!(
                "starting_balance must be a positive number, got {}",
                self.starting_balance
            )));
        }
        self.round.validate()
    }

    /// Parse and validate. Missing keys fall back to defaults.
    pub fn from_json_str(json: &str) -> Result<Self, GameError> {
        let cfg: GameConfig = serde_json::from_str(json)?;
        cfg.validate()?;
        Ok(cfg)
    }

    pub fn from_json_file(path: impl AsRef<Path>) -> Result<Self, GameError> {
        let contents = std::fs::read_to_string(path)?;
        Self::from_json_str(&contents)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let cfg = GameConfig::default();
        assert_eq!(cfg.starting_balance, 1000.0);
        assert_eq!(cfg.round.playable_distance, 8.0);
        assert_eq!(cfg.round.forced_end_distance, 10.0);
        assert_eq!(cfg.round.peak_scan_step, 0.1);
        assert_eq!(cfg.round.chart_step, 0.2);
        assert!(cfg.validate().is_ok());
    }

    #[test]
    fn test_partial_json_keeps_defaults() {
        let cfg = GameConfig::from_json_str(r#"{"starting_balance": 250.0}"#).unwrap();
        assert_eq!(cfg.starting_balance, 250.0);
        assert_eq!(cfg.round, RoundConfig::default());

        let cfg = GameConfig::from_json_str(r#"{"round": {"forced_end_distance": 12}}"#).unwrap();
        assert_eq!(cfg.round.forced_end_distance, 12.0);
        assert_eq!(cfg.round.playable_distance, 8.0);
    }

    #[test]
    fn test_rejects_non_positive_values() {
        let err = GameConfig::from_json_str(r#"{"round": {"peak_scan_step": 0}}"#).unwrap_err();
        assert!(matches!(err, GameError::InvalidConfig(_)));
        let err = GameConfig::from_json_str(r#"{"starting_balance": -5}"#).unwrap_err();
        assert!(matches!(err, GameError::InvalidConfig(_)));
    }

    #[test]
    fn test_rejects_degenerate_steps() {
        let err = GameConfig::from_json_str(r#"{"round": {"chart_step": 1e-300}}"#).unwrap_err();
        assert!(matches!(err, GameError::InvalidConfig(_)));
        let err = GameConfig::from_json_str(r#"{"round": {"peak_scan_step": 1e-9}}"#).unwrap_err();
        assert!(matches!(err, GameError::InvalidConfig(_)));
        assert!(GameConfig::from_json_str(r#"{"round": {"chart_step": 0.01}}"#).is_ok());
    }

    #[test]
    fn test_rejects_forced_end_before_playable_range() {
        let err = GameConfig::from_json_str(
            r#"{"round": {"playable_distance": 8, "forced_end_distance": 6}}"#,
        ).unwrap_err();
        assert!(matches!(err, GameError::InvalidConfig(_)));
        assert!(GameConfig::from_json_str(
            r#"{"round": {"playable_distance": 8, "forced_end_distance": 8}}"#,
        ).is_ok());
    }

    #[test]
    fn test_malformed_json() {
        let err = GameConfig::from_json_str("{not json").unwrap_err();
        assert!(matches!(err, GameError::ConfigParse(_)));
    }

    #[test]
    fn test_missing_file() {
        let err = GameConfig::from_json_file("/nonexistent/meme-arena.json").unwrap_err();
        assert!(matches!(err, GameError::ConfigIo(_)));
    }
}
