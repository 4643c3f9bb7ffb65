use std::path::Path;
use std::time::Duration;

use serde::Deserialize;

use crate::error::ComparisonError;

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default)]
pub struct ComparisonConfig {
    pub scoring: ScoringConfig,
    pub timing: TimingConfig,
    pub correction: CorrectionConfig,
}

impl ComparisonConfig {
    pub fn load(path: &Path) -> Result<Self, ComparisonError> {
        let data = std::fs::read_to_string(path)
            .map_err(|e| ComparisonError::io("read comparison config", e))?;
        let config: Self = serde_json::from_str(&data)
            .map_err(|e| ComparisonError::json("parse comparison config", e))?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), ComparisonError> {
        let s = &self.scoring;
        if !(s.min_length_ratio > 0.0 && s.min_length_ratio <= s.max_length_ratio) {
            return Err(ComparisonError::invalid_input(format!(
                "length ratio window [{}, {}] is empty",
                s.min_length_ratio, s.max_length_ratio
            )));
        }
        if self.timing.seconds_per_word <= 0.0 {
            return Err(ComparisonError::invalid_input(
                "timing.seconds_per_word must be positive",
            ));
        }
        if self.correction.service_timeout_ms == 0 {
            return Err(ComparisonError::invalid_input(
                "correction.service_timeout_ms must be at least 1",
            ));
        }
        Ok(())
    }
}

/// Weights of the length penalty applied by the fluency score.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct ScoringConfig {
    pub min_length_ratio: f64,
    pub max_length_ratio: f64,
    pub short_penalty_per_ratio: f64,
    pub long_penalty_per_ratio: f64,
    /// Reproduces the extra `* 100` of the historical pronunciation formula,
    /// which saturates almost every score at 100.
    pub legacy_pronunciation_scaling: bool,
}

impl ScoringConfig {
    pub const DEFAULT_MIN_LENGTH_RATIO: f64 = 0.7;
    pub const DEFAULT_MAX_LENGTH_RATIO: f64 = 1.3;
    pub const DEFAULT_SHORT_PENALTY: f64 = 40.0;
    pub const DEFAULT_LONG_PENALTY: f64 = 25.0;
}

impl Default for ScoringConfig {
    fn default() -> Self {
        Self {
            min_length_ratio: Self::DEFAULT_MIN_LENGTH_RATIO,
            max_length_ratio: Self::DEFAULT_MAX_LENGTH_RATIO,
            short_penalty_per_ratio: Self::DEFAULT_SHORT_PENALTY,
            long_penalty_per_ratio: Self::DEFAULT_LONG_PENALTY,
            legacy_pronunciation_scaling: false,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct TimingConfig {
    pub seconds_per_word: f64,
}

impl TimingConfig {
    pub const DEFAULT_SECONDS_PER_WORD: f64 = 0.6;
}

impl Default for TimingConfig {
    fn default() -> Self {
        Self {
            seconds_per_word: Self::DEFAULT_SECONDS_PER_WORD,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct CorrectionConfig {
    pub service_timeout_ms: u64,
    pub max_suggestions: usize,
    pub context_chars: usize,
    pub penalty_per_error: f64,
}

impl CorrectionConfig {
    pub const DEFAULT_SERVICE_TIMEOUT_MS: u64 = 5_000;
    pub const DEFAULT_MAX_SUGGESTIONS: usize = 3;
    pub const DEFAULT_CONTEXT_CHARS: usize = 50;
    pub const DEFAULT_PENALTY_PER_ERROR: f64 = 15.0;

    pub fn service_timeout(&self) -> Duration {
        Duration::from_millis(self.service_timeout_ms)
    }
}

impl Default for CorrectionConfig {
    fn default() -> Self {
        Self {
            service_timeout_ms: Self::DEFAULT_SERVICE_TIMEOUT_MS,
            max_suggestions: Self::DEFAULT_MAX_SUGGESTIONS,
            context_chars: Self::DEFAULT_CONTEXT_CHARS,
            penalty_per_error: Self::DEFAULT_PENALTY_PER_ERROR,
        }
    }
}
