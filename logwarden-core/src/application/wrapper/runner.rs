use super::errors::InvokeError;
use super::models::{CallState, CancelReason, InvokeOptions, RetryRecord};
use crate::config::{AgentConfig, ConfigError, TransportConfig};
use crate::conversation::{ConversationStateTracker, TrackerError};
use crate::resilience::{ErrorKind, RetryPolicy, classify};
use crate::transport::{
    ResponseStream, Transport, TransportError, TransportRequest, TransportResponse,
};
use crate::types::{ConversationTurn, ToolCallRecord, ToolResultRecord, ToolSpec};
use std::future::Future;
use std::sync::Arc;
use std::time::Duration;
use tokio::time::{Instant, sleep};
use tracing::{debug, error, info, warn};
use uuid::Uuid;

/// Retry loop around a [`Transport`] for one logical conversation.
///
/// Rate-limited failures are retried with backoff on the same turns.
/// Tool mismatch failures reset the tracked state and resend only the
/// most recent user turn. Everything else fails immediately.
pub struct ResilientCallWrapper<T: Transport> {
    id: Uuid,
    transport: Arc<T>,
    tracker: ConversationStateTracker,
    policy: RetryPolicy,
    state: CallState,
    retries: Vec<RetryRecord>,
}

impl<T: Transport> ResilientCallWrapper<T> {
    pub fn new(transport: Arc<T>) -> Self {
        Self::with_policy(transport, RetryPolicy::model_calls())
    }

    pub fn with_policy(transport: Arc<T>, policy: RetryPolicy) -> Self {
        let id = Uuid::new_v4();
        info!(
            conversation = %id,
            max_attempts = policy.max_attempts(),
            "Initialized resilient call wrapper"
        );
        Self {
            id,
            transport,
            tracker: ConversationStateTracker::new(),
            policy,
            state: CallState::Idle,
            retries: Vec::new(),
        }
    }

    pub fn from_config(transport: Arc<T>, config: &AgentConfig) -> Result<Self, ConfigError> {
        let policy = RetryPolicy::new(config.retry.clone())?;
        Ok(Self::with_policy(transport, policy))
    }

    /// Send `turns` and wait for the complete reply.
    pub async fn invoke(
        &mut self,
        turns: Vec<ConversationTurn>,
        tool_specs: &[ToolSpec],
    ) -> Result<TransportResponse, InvokeError> {
        self.invoke_with(turns, tool_specs, InvokeOptions::default())
            .await
    }

    pub async fn invoke_with(
        &mut self,
        turns: Vec<ConversationTurn>,
        tool_specs: &[ToolSpec],
        options: InvokeOptions,
    ) -> Result<TransportResponse, InvokeError> {
        let response = self
            .run(turns, tool_specs, &options, |transport, request| async move {
                transport.send(request).await
            })
            .await?;
        self.record_reply(&response);
        Ok(response)
    }

    /// Same retry loop as [`invoke`](Self::invoke), returning the reply
    /// stream once the service accepts the request. Failures inside the
    /// stream are not retried.
    pub async fn invoke_stream(
        &mut self,
        turns: Vec<ConversationTurn>,
        tool_specs: &[ToolSpec],
    ) -> Result<ResponseStream, InvokeError> {
        self.invoke_stream_with(turns, tool_specs, InvokeOptions::default())
            .await
    }

    pub async fn invoke_stream_with(
        &mut self,
        turns: Vec<ConversationTurn>,
        tool_specs: &[ToolSpec],
        options: InvokeOptions,
    ) -> Result<ResponseStream, InvokeError> {
        self.run(turns, tool_specs, &options, |transport, request| async move {
            transport.stream(request).await
        })
        .await
    }

    /// Record a reply that arrived through [`invoke_stream`](Self::invoke_stream).
    ///
    /// Streams are handed to the caller untouched, so the assistant turn and
    /// any tool calls it carries are only tracked once the caller passes the
    /// collected reply back here. See [`TransportResponse::collect`].
    pub fn record_streamed_reply(&mut self, response: &TransportResponse) {
        self.record_reply(response);
    }

    /// Feed a tool's output back into the conversation.
    pub fn record_tool_result(&mut self, record: ToolResultRecord) -> Result<(), TrackerError> {
        if !self.tracker.has_tool_call(&record.tool_id) {
            warn!(
                conversation = %self.id,
                tool_id = %record.tool_id,
                "Rejected tool result without matching tool call"
            );
            return Err(TrackerError::UnknownToolCall {
                tool_id: record.tool_id,
            });
        }
        self.tracker.record_tool_result(record)
    }

    /// Discard all conversation state and return to `Idle`.
    pub fn reset(&mut self) {
        self.tracker.reset();
        self.retries.clear();
        self.state = CallState::Idle;
    }

    pub fn validate(&self) -> bool {
        self.tracker.validate()
    }

    /// Hand new connection settings to the shared transport.
    pub async fn refresh(&self, config: &TransportConfig) -> Result<(), TransportError> {
        info!(conversation = %self.id, region = %config.region, "Refreshing transport configuration");
        self.transport.refresh(config).await
    }

    pub fn conversation_id(&self) -> Uuid {
        self.id
    }

    pub fn state(&self) -> CallState {
        self.state
    }

    /// Backoffs taken during the most recent call.
    pub fn retries(&self) -> &[RetryRecord] {
        &self.retries
    }

    pub fn tracker(&self) -> &ConversationStateTracker {
        &self.tracker
    }

    pub fn policy(&self) -> &RetryPolicy {
        &self.policy
    }

    pub fn transport(&self) -> &Arc<T> {
        &self.transport
    }

    async fn run<R, F, Fut>(
        &mut self,
        mut turns: Vec<ConversationTurn>,
        tool_specs: &[ToolSpec],
        options: &InvokeOptions,
        mut dispatch: F,
    ) -> Result<R, InvokeError>
    where
        F: FnMut(Arc<T>, TransportRequest) -> Fut,
        Fut: Future<Output = Result<R, TransportError>>,
    {
        self.retries.clear();
        self.state = CallState::Idle;

        if self.tracker.detect_potential_mismatch(&turns) {
            warn!(
                conversation = %self.id,
                "Potential tool mismatch detected, resetting conversation state"
            );
            self.tracker.reset();
            turns = self.tracker.truncate_to_last_user_turn(&turns);
        }
        self.record_user_turns(&turns);

        let max_attempts = self.policy.max_attempts();
        let mut attempt = 0u32;
        loop {
            if let Some(reason) = options.interrupted() {
                return Err(self.fail(InvokeError::Cancelled {
                    attempts: attempt,
                    reason,
                }));
            }
            if let Err(reason) = check_sendable(&turns) {
                return Err(self.fail(InvokeError::InvalidConversation(reason)));
            }

            self.state = CallState::Sending;
            debug!(
                conversation = %self.id,
                attempt = attempt + 1,
                max_attempts,
                turns = turns.len(),
                "Sending conversation to transport"
            );
            let request = TransportRequest::new(turns.clone(), tool_specs.to_vec());
            let outcome = dispatch(Arc::clone(&self.transport), request).await;

            let err = match outcome {
                Ok(reply) => {
                    if attempt > 0 {
                        info!(
                            conversation = %self.id,
                            attempts = attempt + 1,
                            "Call succeeded after retrying"
                        );
                    }
                    self.state = CallState::Success;
                    return Ok(reply);
                }
                Err(err) => err,
            };

            let kind = classify(err.message());
            if kind == ErrorKind::Fatal {
                return Err(self.fail(InvokeError::Fatal { source: err }));
            }
            if attempt + 1 >= max_attempts {
                return Err(self.fail(InvokeError::RetriesExhausted {
                    attempts: attempt + 1,
                    kind,
                    source: err,
                }));
            }

            if kind == ErrorKind::ToolMismatch {
                warn!(
                    conversation = %self.id,
                    error = %err,
                    "Tool mismatch error detected, resetting conversation"
                );
                self.tracker.reset();
                turns = self.tracker.truncate_to_last_user_turn(&turns);
                self.record_user_turns(&turns);
            }

            let delay = self.policy.compute_delay(attempt);
            warn!(
                conversation = %self.id,
                attempt = attempt + 1,
                max_attempts,
                kind = %kind,
                delay_secs = delay.as_secs_f64(),
                "Retrying after backoff"
            );
            self.retries.push(RetryRecord {
                attempt,
                kind,
                delay,
                error: err.message().to_string(),
            });
            self.state = CallState::Retrying;

            attempt += 1;
            if let Err(reason) = backoff(delay, options).await {
                return Err(self.fail(InvokeError::Cancelled {
                    attempts: attempt,
                    reason,
                }));
            }
        }
    }

    /// Append the user turns of `turns` that are not yet in the history.
    ///
    /// Callers usually resend the whole conversation, so when the recorded
    /// user turns are a prefix of the incoming ones only the rest is added.
    fn record_user_turns(&mut self, turns: &[ConversationTurn]) {
        let incoming: Vec<&ConversationTurn> = turns.iter().filter(|turn| turn.is_user()).collect();
        let recorded: Vec<&ConversationTurn> =
            self.tracker.turns().iter().filter(|turn| turn.is_user()).collect();
        let already_recorded = if incoming.starts_with(&recorded) {
            recorded.len()
        } else {
            0
        };
        for turn in &incoming[already_recorded..] {
            self.tracker.record_turn((*turn).clone());
        }
    }

    fn record_reply(&mut self, response: &TransportResponse) {
        let turn_index = self.tracker.turns().len();
        self.tracker
            .record_turn(ConversationTurn::assistant(response.content.clone()));
        for tool_use in &response.tool_uses {
            let record = ToolCallRecord::new(
                tool_use.tool_id.clone(),
                tool_use.tool_name.clone(),
                tool_use.input.clone(),
                turn_index,
            );
            if let Err(err) = self.tracker.record_tool_call(record) {
                warn!(
                    conversation = %self.id,
                    tool_id = err.tool_id(),
                    "Transport reported a tool call twice, keeping the first"
                );
            }
        }
    }

    fn fail(&mut self, err: InvokeError) -> InvokeError {
        self.state = CallState::Failed;
        error!(conversation = %self.id, error = %err, "Call failed");
        err
    }
}

/// Turns must be non-empty and end with the user's turn.
fn check_sendable(turns: &[ConversationTurn]) -> Result<(), String> {
    match turns.last() {
        None => Err("no turns to send".to_string()),
        Some(turn) if !turn.is_user() => Err(format!(
            "last turn must come from the user, found {}",
            turn.role.as_str()
        )),
        Some(_) => Ok(()),
    }
}

/// Sleep for `delay` unless the call is cancelled first.
///
/// A deadline that falls inside the delay fails at once, since no further
/// attempt could start before it.
async fn backoff(delay: Duration, options: &InvokeOptions) -> Result<(), CancelReason> {
    if let Some(deadline) = options.deadline {
        let resume_at = Instant::now().checked_add(delay);
        if resume_at.is_none_or(|resume_at| resume_at >= deadline) {
            return Err(CancelReason::DeadlineExceeded);
        }
    }

    match &options.cancel {
        Some(token) => {
            tokio::select! {
                _ = token.cancelled() => Err(CancelReason::Token),
                _ = sleep(delay) => Ok(()),
            }
        }
        None => {
            sleep(delay).await;
            Ok(())
        }
    }
}
