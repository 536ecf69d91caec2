use super::app::AgentConfig;
use super::error::ConfigError;
use super::model::ModelSettings;
use super::retry::RetryConfig;
use super::transport::{Credentials, TransportConfig};
use crate::constants::{CONFIG_PATH, ENV_FILE_NAME};
use once_cell::sync::Lazy;
use regex::{Captures, Regex};
use serde::Deserialize;
use std::collections::HashMap;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use tracing::debug;

static ENV_REFERENCE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"\$\{([A-Za-z_][A-Za-z0-9_]*)\}").expect("env reference pattern is valid")
});

/// Raw configuration structure for deserialization from TOML
#[derive(Debug, Deserialize, Default)]
pub(super) struct RawConfig {
    #[serde(default)]
    pub model: RawModel,
    #[serde(default)]
    pub transport: RawTransport,
    #[serde(default)]
    pub retry: RawRetry,
}

#[derive(Debug, Deserialize, Default)]
pub(super) struct RawModel {
    pub model_id: Option<String>,
    pub max_tokens: Option<u32>,
    pub agent_name: Option<String>,
}

#[derive(Debug, Deserialize, Default)]
pub(super) struct RawTransport {
    pub region: Option<String>,
    pub credentials: Option<RawCredentials>,
}

#[derive(Debug, Deserialize)]
pub(super) struct RawCredentials {
    pub access_key_id: String,
    pub secret_access_key: String,
    pub session_token: Option<String>,
}

#[derive(Debug, Deserialize, Default)]
pub(super) struct RawRetry {
    pub max_attempts: Option<u32>,
    pub initial_delay_secs: Option<f64>,
    pub exponential_base: Option<f64>,
    pub jitter: Option<bool>,
}

/// Load and validate configuration from a file path.
///
/// Reads the process environment but never writes to it; values from the
/// `.env` file only fill names the process environment does not define.
pub fn load_config(path: Option<&Path>) -> Result<AgentConfig, ConfigError> {
    let config_path = resolve_path(path);
    let process_env: HashMap<String, String> = std::env::vars().collect();
    load_config_with_env(&config_path, &process_env)
}

/// Load configuration resolving `${NAME}` against `base_env` plus the
/// `.env` file next to the config file.
pub fn load_config_with_env(
    path: &Path,
    base_env: &HashMap<String, String>,
) -> Result<AgentConfig, ConfigError> {
    debug!(path = %path.display(), "Reading agent configuration file");

    let content = fs::read_to_string(path).map_err(|source| {
        if source.kind() == io::ErrorKind::NotFound {
            ConfigError::NotFound {
                path: path.to_path_buf(),
            }
        } else {
            ConfigError::Io {
                path: path.to_path_buf(),
                source,
            }
        }
    })?;

    let env_path = path
        .parent()
        .map(|dir| dir.join(ENV_FILE_NAME))
        .unwrap_or_else(|| PathBuf::from(ENV_FILE_NAME));
    let mut env = read_env_file(&env_path)?;
    // The process environment wins over the file, as with dotenv.
    env.extend(base_env.iter().map(|(k, v)| (k.clone(), v.clone())));

    let parsed: RawConfig = toml::from_str(&content).map_err(|source| ConfigError::Parse {
        path: path.to_path_buf(),
        source,
    })?;

    validate_and_build(parsed, &env)
}

fn resolve_path(path: Option<&Path>) -> PathBuf {
    let raw = path
        .map(|p| p.to_string_lossy().into_owned())
        .unwrap_or_else(|| CONFIG_PATH.to_string());
    PathBuf::from(shellexpand::tilde(&raw).into_owned())
}

fn read_env_file(path: &Path) -> Result<HashMap<String, String>, ConfigError> {
    let entries = match dotenvy::from_path_iter(path) {
        Ok(entries) => entries,
        Err(err) if err.not_found() => {
            debug!(path = %path.display(), "No environment file found");
            return Ok(HashMap::new());
        }
        Err(source) => {
            return Err(ConfigError::EnvFile {
                path: path.to_path_buf(),
                source,
            });
        }
    };

    let mut env = HashMap::new();
    for entry in entries {
        let (key, value) = entry.map_err(|source| ConfigError::EnvFile {
            path: path.to_path_buf(),
            source,
        })?;
        env.insert(key, value);
    }
    debug!(path = %path.display(), count = env.len(), "Loaded environment file");
    Ok(env)
}

/// Replace every `${NAME}` in `value` using `env`.
fn expand(
    field: &str,
    value: &str,
    env: &HashMap<String, String>,
) -> Result<String, ConfigError> {
    let mut missing = None;
    let expanded = ENV_REFERENCE.replace_all(value, |caps: &Captures<'_>| {
        let name = &caps[1];
        match env.get(name) {
            Some(resolved) => resolved.clone(),
            None => {
                missing.get_or_insert_with(|| name.to_string());
                String::new()
            }
        }
    });
    match missing {
        Some(name) => Err(ConfigError::MissingVariable {
            field: field.to_string(),
            name,
        }),
        None => Ok(expanded.into_owned()),
    }
}

fn validate_and_build(
    parsed: RawConfig,
    env: &HashMap<String, String>,
) -> Result<AgentConfig, ConfigError> {
    let defaults = ModelSettings::default();
    let model = ModelSettings {
        model_id: match parsed.model.model_id {
            Some(id) => expand("model.model_id", &id, env)?,
            None => defaults.model_id,
        },
        max_tokens: parsed.model.max_tokens.unwrap_or(defaults.max_tokens),
        agent_name: parsed.model.agent_name.unwrap_or(defaults.agent_name),
    };
    if model.model_id.trim().is_empty() {
        return Err(ConfigError::invalid("model.model_id", "must not be empty"));
    }
    if model.max_tokens == 0 {
        return Err(ConfigError::invalid("model.max_tokens", "must be at least 1"));
    }

    let mut transport = TransportConfig::default();
    if let Some(region) = parsed.transport.region {
        transport.region = expand("transport.region", &region, env)?;
    }
    if let Some(raw) = parsed.transport.credentials {
        let session_token = match raw.session_token {
            Some(token) => Some(expand("transport.credentials.session_token", &token, env)?),
            None => None,
        };
        transport.credentials = Some(Credentials {
            access_key_id: expand(
                "transport.credentials.access_key_id",
                &raw.access_key_id,
                env,
            )?,
            secret_access_key: expand(
                "transport.credentials.secret_access_key",
                &raw.secret_access_key,
                env,
            )?,
            session_token,
        });
    }

    let preset = RetryConfig::model_calls();
    let retry = RetryConfig {
        max_attempts: parsed.retry.max_attempts.unwrap_or(preset.max_attempts),
        initial_delay_secs: parsed
            .retry
            .initial_delay_secs
            .unwrap_or(preset.initial_delay_secs),
        exponential_base: parsed
            .retry
            .exponential_base
            .unwrap_or(preset.exponential_base),
        jitter: parsed.retry.jitter.unwrap_or(preset.jitter),
    };
    retry.validate()?;

    Ok(AgentConfig {
        model,
        transport,
        retry,
    })
}
