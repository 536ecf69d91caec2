//! Exponential backoff timing.

use crate::config::{ConfigError, RetryConfig};
use rand::Rng;
use std::time::Duration;

/// Backoff schedule and attempt budget.
///
/// The policy only answers "how long"; whether to retry at all is decided
/// by the caller from the error classification and the remaining budget.
#[derive(Debug, Clone, PartialEq)]
pub struct RetryPolicy {
    config: RetryConfig,
}

impl RetryPolicy {
    pub fn new(config: RetryConfig) -> Result<Self, ConfigError> {
        config.validate()?;
        Ok(Self { config })
    }

    /// Policy used around calls to the inference service.
    pub fn model_calls() -> Self {
        Self {
            config: RetryConfig::model_calls(),
        }
    }

    pub fn config(&self) -> &RetryConfig {
        &self.config
    }

    pub fn max_attempts(&self) -> u32 {
        self.config.max_attempts
    }

    pub fn jitter_enabled(&self) -> bool {
        self.config.jitter
    }

    /// `initial_delay * base^attempt`, without jitter.
    pub fn base_delay(&self, attempt: u32) -> Duration {
        secs_to_duration(self.base_delay_secs(attempt))
    }

    /// Delay to wait after the failed attempt numbered `attempt` (0-based).
    pub fn compute_delay(&self, attempt: u32) -> Duration {
        let mut secs = self.base_delay_secs(attempt);
        if self.config.jitter {
            secs += rand::thread_rng().gen_range(0.0..1.0);
        }
        secs_to_duration(secs)
    }

    fn base_delay_secs(&self, attempt: u32) -> f64 {
        // 0 * inf would be NaN once base^attempt overflows.
        if self.config.initial_delay_secs == 0.0 {
            return 0.0;
        }
        self.config.initial_delay_secs * self.config.exponential_base.powf(f64::from(attempt))
    }
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            config: RetryConfig::default(),
        }
    }
}

fn secs_to_duration(secs: f64) -> Duration {
    Duration::try_from_secs_f64(secs).unwrap_or(Duration::MAX)
}
