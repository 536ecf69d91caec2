use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TrackerError {
    #[error("tool call '{tool_id}' is already recorded in this conversation")]
    DuplicateToolCall { tool_id: String },
    #[error("tool result '{tool_id}' is already recorded in this conversation")]
    DuplicateToolResult { tool_id: String },
    #[error("tool result '{tool_id}' has no matching tool call")]
    UnknownToolCall { tool_id: String },
}

impl TrackerError {
    pub fn tool_id(&self) -> &str {
        match self {
            TrackerError::DuplicateToolCall { tool_id }
            | TrackerError::DuplicateToolResult { tool_id }
            | TrackerError::UnknownToolCall { tool_id } => tool_id,
        }
    }

    pub fn user_message(&self) -> String {
        match self {
            TrackerError::DuplicateToolCall { tool_id }
            | TrackerError::DuplicateToolResult { tool_id } => format!(
                "Tool exchange '{tool_id}' was reported twice. Reset the agent to start a clean conversation."
            ),
            TrackerError::UnknownToolCall { tool_id } => format!(
                "The model never asked for tool call '{tool_id}', so its result cannot be added."
            ),
        }
    }
}
