use super::error::ConfigError;
use super::model::ModelSettings;
use super::retry::RetryConfig;
use super::transport::TransportConfig;
use std::collections::HashMap;
use std::path::Path;

/// Agent configuration loaded from agent.toml
#[derive(Debug, Clone, PartialEq)]
pub struct AgentConfig {
    pub model: ModelSettings,
    pub transport: TransportConfig,
    pub retry: RetryConfig,
}

impl Default for AgentConfig {
    fn default() -> Self {
        Self {
            model: ModelSettings::default(),
            transport: TransportConfig::default(),
            retry: RetryConfig::model_calls(),
        }
    }
}

impl AgentConfig {
    /// Load configuration from a file path (or default path if None).
    ///
    /// `${NAME}` references resolve against the process environment, then
    /// against a `.env` file next to the config file.
    pub fn load(path: Option<&Path>) -> Result<Self, ConfigError> {
        super::loader::load_config(path)
    }

    /// Load configuration resolving `${NAME}` references against `env`
    /// instead of the process environment.
    pub fn load_with_env(
        path: &Path,
        env: &HashMap<String, String>,
    ) -> Result<Self, ConfigError> {
        super::loader::load_config_with_env(path, env)
    }
}
