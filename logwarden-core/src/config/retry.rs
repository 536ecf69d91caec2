use super::defaults::{
    DEFAULT_EXPONENTIAL_BASE, DEFAULT_INITIAL_DELAY_SECS, DEFAULT_JITTER, DEFAULT_MAX_ATTEMPTS,
    MODEL_CALL_INITIAL_DELAY_SECS,
};
use super::error::ConfigError;
use serde::{Deserialize, Serialize};

/// Backoff knobs for retrying calls to a rate-limited service.
///
/// ```toml
/// [retry]
/// max_attempts = 5
/// initial_delay_secs = 2.0
/// exponential_base = 2.0
/// jitter = true
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RetryConfig {
    /// Total attempts, the first call included
    pub max_attempts: u32,
    pub initial_delay_secs: f64,
    pub exponential_base: f64,
    /// Add a uniform random `[0, 1)` second addend to each delay
    pub jitter: bool,
}

impl Default for RetryConfig {
    fn default() -> Self {
        Self {
            max_attempts: DEFAULT_MAX_ATTEMPTS,
            initial_delay_secs: DEFAULT_INITIAL_DELAY_SECS,
            exponential_base: DEFAULT_EXPONENTIAL_BASE,
            jitter: DEFAULT_JITTER,
        }
    }
}

impl RetryConfig {
    /// Preset for calls to the inference service.
    pub fn model_calls() -> Self {
        Self {
            initial_delay_secs: MODEL_CALL_INITIAL_DELAY_SECS,
            ..Self::default()
        }
    }

    pub fn with_max_attempts(mut self, max_attempts: u32) -> Self {
        self.max_attempts = max_attempts;
        self
    }

    pub fn with_initial_delay_secs(mut self, secs: f64) -> Self {
        self.initial_delay_secs = secs;
        self
    }

    pub fn with_exponential_base(mut self, base: f64) -> Self {
        self.exponential_base = base;
        self
    }

    pub fn with_jitter(mut self, jitter: bool) -> Self {
        self.jitter = jitter;
        self
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.max_attempts == 0 {
            return Err(ConfigError::invalid(
                "retry.max_attempts",
                "must be at least 1",
            ));
        }
        if !self.initial_delay_secs.is_finite() || self.initial_delay_secs < 0.0 {
            return Err(ConfigError::invalid(
                "retry.initial_delay_secs",
                format!(
                    "must be a finite, non-negative number of seconds (got {})",
                    self.initial_delay_secs
                ),
            ));
        }
        if !self.exponential_base.is_finite() || self.exponential_base < 1.0 {
            return Err(ConfigError::invalid(
                "retry.exponential_base",
                format!("must be finite and >= 1.0 (got {})", self.exponential_base),
            ));
        }
        Ok(())
    }
}
