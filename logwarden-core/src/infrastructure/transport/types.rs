//! Transport types - Request, Response, and Error types

use crate::types::{ConversationTurn, ToolSpec};
use futures::StreamExt;
use futures::stream::BoxStream;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use thiserror::Error;

/// One request to the remote inference service
#[derive(Debug, Clone)]
pub struct TransportRequest {
    pub turns: Vec<ConversationTurn>,
    pub tool_specs: Vec<ToolSpec>,
}

impl TransportRequest {
    pub fn new(turns: Vec<ConversationTurn>, tool_specs: Vec<ToolSpec>) -> Self {
        Self { turns, tool_specs }
    }
}

/// A tool invocation the remote model asked for in its reply
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ToolUse {
    pub tool_id: String,
    pub tool_name: String,
    #[serde(default)]
    pub input: Value,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StopReason {
    EndTurn,
    ToolUse,
    MaxTokens,
}

/// Reply from the remote inference service
#[derive(Debug, Clone, PartialEq)]
pub struct TransportResponse {
    pub content: String,
    pub tool_uses: Vec<ToolUse>,
    pub stop_reason: Option<StopReason>,
}

impl TransportResponse {
    pub fn text(content: impl Into<String>) -> Self {
        Self {
            content: content.into(),
            tool_uses: Vec::new(),
            stop_reason: Some(StopReason::EndTurn),
        }
    }

    pub fn with_tool_use(mut self, tool_use: ToolUse) -> Self {
        self.tool_uses.push(tool_use);
        self.stop_reason = Some(StopReason::ToolUse);
        self
    }

    pub fn requests_tools(&self) -> bool {
        !self.tool_uses.is_empty()
    }

    /// Drain `stream` into a complete reply.
    ///
    /// Text chunks are concatenated in order. The first error ends the
    /// stream and is returned as is.
    pub async fn collect(mut stream: ResponseStream) -> Result<Self, TransportError> {
        let mut response = Self {
            content: String::new(),
            tool_uses: Vec::new(),
            stop_reason: None,
        };
        while let Some(chunk) = stream.next().await {
            match chunk? {
                StreamChunk::Text(text) => response.content.push_str(&text),
                StreamChunk::ToolUse(tool_use) => response.tool_uses.push(tool_use),
                StreamChunk::Stop(reason) => response.stop_reason = Some(reason),
            }
        }
        Ok(response)
    }
}

/// Incremental piece of a streamed reply
#[derive(Debug, Clone, PartialEq)]
pub enum StreamChunk {
    Text(String),
    ToolUse(ToolUse),
    Stop(StopReason),
}

pub type ResponseStream = BoxStream<'static, Result<StreamChunk, TransportError>>;

/// Failure reported by a transport.
///
/// The message is the service's own error text; retry classification
/// matches substrings of it.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{message}")]
pub struct TransportError {
    message: String,
}

impl TransportError {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }

    pub fn message(&self) -> &str {
        &self.message
    }
}
