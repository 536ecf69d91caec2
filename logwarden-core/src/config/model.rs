use super::defaults::{DEFAULT_AGENT_NAME, DEFAULT_MAX_TOKENS, DEFAULT_MODEL_ID};
use serde::{Deserialize, Serialize};

/// Which model the agent talks to and how much it may generate.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ModelSettings {
    pub model_id: String,
    pub max_tokens: u32,
    pub agent_name: String,
}

impl Default for ModelSettings {
    fn default() -> Self {
        Self {
            model_id: DEFAULT_MODEL_ID.to_string(),
            max_tokens: DEFAULT_MAX_TOKENS,
            agent_name: DEFAULT_AGENT_NAME.to_string(),
        }
    }
}
