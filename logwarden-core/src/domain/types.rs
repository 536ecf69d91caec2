use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TurnRole {
    System,
    User,
    Assistant,
}

impl TurnRole {
    pub fn as_str(self) -> &'static str {
        match self {
            TurnRole::System => "system",
            TurnRole::User => "user",
            TurnRole::Assistant => "assistant",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConversationTurn {
    pub role: TurnRole,
    pub content: String,
}

impl ConversationTurn {
    pub fn new(role: TurnRole, content: impl Into<String>) -> Self {
        Self {
            role,
            content: content.into(),
        }
    }

    pub fn user(content: impl Into<String>) -> Self {
        Self::new(TurnRole::User, content)
    }

    pub fn assistant(content: impl Into<String>) -> Self {
        Self::new(TurnRole::Assistant, content)
    }

    pub fn system(content: impl Into<String>) -> Self {
        Self::new(TurnRole::System, content)
    }

    pub fn is_user(&self) -> bool {
        self.role == TurnRole::User
    }
}

/// A tool invocation requested by the remote model.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ToolCallRecord {
    pub tool_id: String,
    pub tool_name: String,
    pub args: Value,
    /// Index into the recorded turn history of the turn that issued the call.
    pub issued_at_turn: usize,
    pub recorded_at: DateTime<Utc>,
}

impl ToolCallRecord {
    pub fn new(
        tool_id: impl Into<String>,
        tool_name: impl Into<String>,
        args: Value,
        issued_at_turn: usize,
    ) -> Self {
        Self {
            tool_id: tool_id.into(),
            tool_name: tool_name.into(),
            args,
            issued_at_turn,
            recorded_at: Utc::now(),
        }
    }
}

/// Output of a tool, fed back under the id of the call that requested it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ToolResultRecord {
    pub tool_id: String,
    pub result: Value,
    pub recorded_at: DateTime<Utc>,
}

impl ToolResultRecord {
    pub fn new(tool_id: impl Into<String>, result: Value) -> Self {
        Self {
            tool_id: tool_id.into(),
            result,
            recorded_at: Utc::now(),
        }
    }
}

/// Declaration of a tool the remote model may call.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ToolSpec {
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default)]
    pub input_schema: Value,
}

impl ToolSpec {
    pub fn new(name: impl Into<String>, input_schema: Value) -> Self {
        Self {
            name: name.into(),
            description: None,
            input_schema,
        }
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }
}
