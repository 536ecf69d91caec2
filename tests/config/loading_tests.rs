// Config loading tests - testing AgentConfig::load error handling
//
// Tests focused on agent.toml parsing, `${VAR}` resolution and the
// `.env` file read from the configuration directory.

use logwarden_core::config::{AgentConfig, ConfigError, RetryConfig};
use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};
use tempfile::tempdir;

fn write_config(dir: &Path, content: &str) -> PathBuf {
    let path = dir.join("agent.toml");
    fs::write(&path, content).expect("Failed to write agent.toml");
    path
}

fn vars(pairs: &[(&str, &str)]) -> HashMap<String, String> {
    pairs
        .iter()
        .map(|(k, v)| (k.to_string(), v.to_string()))
        .collect()
}

#[test]
fn returns_error_when_file_not_found() {
    let result = AgentConfig::load(Some(Path::new("/nonexistent/path/agent.toml")));
    assert!(matches!(result, Err(ConfigError::NotFound { .. })));
}

#[test]
fn empty_file_uses_model_call_defaults() {
    let dir = tempdir().expect("tempdir");
    let path = write_config(dir.path(), "");

    let config = AgentConfig::load_with_env(&path, &HashMap::new()).expect("load config");

    assert_eq!(config.model.model_id, "us.amazon.nova-premier-v1:0");
    assert_eq!(config.model.max_tokens, 32_000);
    assert_eq!(config.model.agent_name, "CloudWatchLogsAnalyzer");
    assert_eq!(config.transport.region, "us-west-2");
    assert!(config.transport.credentials.is_none());
    assert_eq!(config.retry, RetryConfig::model_calls());
}

#[test]
fn retry_section_overrides_individual_knobs() {
    let dir = tempdir().expect("tempdir");
    let path = write_config(
        dir.path(),
        r#"
[retry]
max_attempts = 3
jitter = false
"#,
    );

    let config = AgentConfig::load_with_env(&path, &HashMap::new()).expect("load config");

    assert_eq!(config.retry.max_attempts, 3);
    assert!(!config.retry.jitter);
    assert_eq!(config.retry.initial_delay_secs, 2.0);
    assert_eq!(config.retry.exponential_base, 2.0);
}

#[test]
fn rejects_zero_attempts() {
    let dir = tempdir().expect("tempdir");
    let path = write_config(dir.path(), "[retry]\nmax_attempts = 0\n");

    let result = AgentConfig::load_with_env(&path, &HashMap::new());
    assert!(matches!(
        result,
        Err(ConfigError::Invalid {
            field: "retry.max_attempts",
            ..
        })
    ));
}

#[test]
fn rejects_malformed_toml() {
    let dir = tempdir().expect("tempdir");
    let path = write_config(dir.path(), "[retry\nmax_attempts = 3");

    let result = AgentConfig::load_with_env(&path, &HashMap::new());
    assert!(matches!(result, Err(ConfigError::Parse { .. })));
}

#[test]
fn credentials_resolve_from_supplied_environment() {
    let dir = tempdir().expect("tempdir");
    let path = write_config(
        dir.path(),
        r#"
[transport]
region = "${AWS_REGION}"

[transport.credentials]
access_key_id = "${AWS_ACCESS_KEY_ID}"
secret_access_key = "${AWS_SECRET_ACCESS_KEY}"
"#,
    );
    let env = vars(&[
        ("AWS_REGION", "eu-central-1"),
        ("AWS_ACCESS_KEY_ID", "AKIAEXAMPLE"),
        ("AWS_SECRET_ACCESS_KEY", "secret"),
    ]);

    let config = AgentConfig::load_with_env(&path, &env).expect("load config");

    assert_eq!(config.transport.region, "eu-central-1");
    let credentials = config.transport.credentials.expect("credentials");
    assert_eq!(credentials.access_key_id, "AKIAEXAMPLE");
    assert_eq!(credentials.secret_access_key, "secret");
    assert!(credentials.session_token.is_none());
}

#[test]
fn env_file_fills_missing_variables_but_does_not_override() {
    let dir = tempdir().expect("tempdir");
    let path = write_config(
        dir.path(),
        r#"
[model]
model_id = "${MODEL_ID}"

[transport]
region = "${AWS_REGION}"
"#,
    );
    fs::write(
        dir.path().join(".env"),
        "MODEL_ID=us.amazon.nova-pro-v1:0\nAWS_REGION=ap-south-1\n",
    )
    .expect("Failed to write .env");
    let env = vars(&[("AWS_REGION", "us-east-1")]);

    let config = AgentConfig::load_with_env(&path, &env).expect("load config");

    assert_eq!(config.model.model_id, "us.amazon.nova-pro-v1:0");
    assert_eq!(config.transport.region, "us-east-1");
}

#[test]
fn reports_unresolved_variable() {
    let dir = tempdir().expect("tempdir");
    let path = write_config(
        dir.path(),
        r#"
[transport.credentials]
access_key_id = "${MISSING_KEY}"
secret_access_key = "literal"
"#,
    );

    let result = AgentConfig::load_with_env(&path, &HashMap::new());
    match result {
        Err(ConfigError::MissingVariable { field, name }) => {
            assert_eq!(field, "transport.credentials.access_key_id");
            assert_eq!(name, "MISSING_KEY");
        }
        other => panic!("unexpected result: {other:?}"),
    }
}
