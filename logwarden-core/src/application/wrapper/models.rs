use crate::resilience::ErrorKind;
use std::fmt;
use std::time::Duration;
use tokio::time::Instant;
use tokio_util::sync::CancellationToken;

/// Lifecycle of the wrapper's most recent call.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CallState {
    Idle,
    Sending,
    Retrying,
    Success,
    Failed,
}

/// Why a call stopped before exhausting its retry budget.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CancelReason {
    DeadlineExceeded,
    Token,
}

impl fmt::Display for CancelReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CancelReason::DeadlineExceeded => f.write_str("deadline exceeded"),
            CancelReason::Token => f.write_str("cancelled by caller"),
        }
    }
}

/// Per-call knobs for [`ResilientCallWrapper`](super::ResilientCallWrapper).
#[derive(Debug, Clone, Default)]
pub struct InvokeOptions {
    pub deadline: Option<Instant>,
    pub cancel: Option<CancellationToken>,
}

impl InvokeOptions {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_deadline(mut self, deadline: Instant) -> Self {
        self.deadline = Some(deadline);
        self
    }

    /// Deadline `timeout` from now.
    pub fn with_timeout(self, timeout: Duration) -> Self {
        let now = Instant::now();
        match now.checked_add(timeout) {
            Some(deadline) => self.with_deadline(deadline),
            None => self,
        }
    }

    pub fn with_cancellation(mut self, token: CancellationToken) -> Self {
        self.cancel = Some(token);
        self
    }

    /// Reason to stop right now, if any.
    pub(crate) fn interrupted(&self) -> Option<CancelReason> {
        if self.cancel.as_ref().is_some_and(|token| token.is_cancelled()) {
            return Some(CancelReason::Token);
        }
        if self.deadline.is_some_and(|deadline| deadline <= Instant::now()) {
            return Some(CancelReason::DeadlineExceeded);
        }
        None
    }
}

/// One backoff taken by the wrapper.
#[derive(Debug, Clone, PartialEq)]
pub struct RetryRecord {
    /// 0-based attempt that failed
    pub attempt: u32,
    pub kind: ErrorKind,
    pub delay: Duration,
    pub error: String,
}
