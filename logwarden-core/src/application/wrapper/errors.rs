use super::models::CancelReason;
use crate::resilience::ErrorKind;
use crate::transport::TransportError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum InvokeError {
    #[error("remote service rejected the request: {source}")]
    Fatal {
        #[source]
        source: TransportError,
    },
    #[error("gave up after {attempts} attempts ({kind}): {source}")]
    RetriesExhausted {
        attempts: u32,
        kind: ErrorKind,
        #[source]
        source: TransportError,
    },
    #[error("call stopped after {attempts} attempts: {reason}")]
    Cancelled { attempts: u32, reason: CancelReason },
    #[error("invalid conversation: {0}")]
    InvalidConversation(String),
}

impl InvokeError {
    /// The last error reported by the transport, if the call reached it.
    pub fn transport_error(&self) -> Option<&TransportError> {
        match self {
            InvokeError::Fatal { source } | InvokeError::RetriesExhausted { source, .. } => {
                Some(source)
            }
            InvokeError::Cancelled { .. } | InvokeError::InvalidConversation(_) => None,
        }
    }

    /// Whether discarding the conversation and starting over is the
    /// suggested way forward.
    pub fn is_recoverable_by_reset(&self) -> bool {
        matches!(
            self,
            InvokeError::RetriesExhausted {
                kind: ErrorKind::ToolMismatch,
                ..
            } | InvokeError::InvalidConversation(_)
        )
    }

    pub fn user_message(&self) -> String {
        match self {
            InvokeError::Fatal { source } => {
                format!("The analysis service returned an error: {source}")
            }
            InvokeError::RetriesExhausted {
                kind: ErrorKind::ToolMismatch,
                attempts,
                ..
            } => format!(
                "The conversation got out of sync and could not be repaired after {attempts} attempts. Reset the agent and try again."
            ),
            InvokeError::RetriesExhausted { attempts, .. } => format!(
                "The analysis service is busy. Gave up after {attempts} attempts; please try again later."
            ),
            InvokeError::Cancelled {
                reason: CancelReason::DeadlineExceeded,
                ..
            } => "The request ran out of time before the service answered.".to_string(),
            InvokeError::Cancelled {
                reason: CancelReason::Token,
                ..
            } => "The request was cancelled.".to_string(),
            InvokeError::InvalidConversation(_) => {
                "The conversation is not in a state that can be sent. Reset the agent to start over."
                    .to_string()
            }
        }
    }
}
