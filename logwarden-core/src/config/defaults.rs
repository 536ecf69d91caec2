pub const DEFAULT_MODEL_ID: &str = "us.amazon.nova-premier-v1:0";
pub const DEFAULT_MAX_TOKENS: u32 = 32_000;
pub const DEFAULT_AGENT_NAME: &str = "CloudWatchLogsAnalyzer";
pub const DEFAULT_REGION: &str = "us-west-2";

pub const DEFAULT_MAX_ATTEMPTS: u32 = 5;
/// Initial backoff for plain data-fetching calls.
pub const DEFAULT_INITIAL_DELAY_SECS: f64 = 1.0;
/// Initial backoff for calls to the inference service itself.
pub const MODEL_CALL_INITIAL_DELAY_SECS: f64 = 2.0;
pub const DEFAULT_EXPONENTIAL_BASE: f64 = 2.0;
pub const DEFAULT_JITTER: bool = true;
