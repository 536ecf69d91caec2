use std::fmt;

/// Substrings the service uses when it is shedding load.
const RATE_LIMIT_MARKERS: &[&str] = &[
    "too many requests",
    "throttling",
    "throttled",
    "rate exceeded",
    "serviceunavailableexception",
];

/// Substrings the service uses when tool calls and tool results no longer pair up.
const TOOL_MISMATCH_MARKERS: &[&str] = &[
    "toolresult blocks",
    "tooluse blocks",
    "exceeds the number",
];

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    /// Transient throttling; back off and resend unchanged.
    RateLimited,
    /// Tool call/result desync; reset and resend from the last user turn.
    ToolMismatch,
    /// Anything else. Not retried.
    Fatal,
}

impl ErrorKind {
    pub fn is_retryable(self) -> bool {
        !matches!(self, ErrorKind::Fatal)
    }

    pub fn as_str(self) -> &'static str {
        match self {
            ErrorKind::RateLimited => "rate_limited",
            ErrorKind::ToolMismatch => "tool_mismatch",
            ErrorKind::Fatal => "fatal",
        }
    }
}

impl fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Classify a service error from its message text.
///
/// Tool mismatch is checked first: a corrupted conversation fails again
/// after any amount of backoff.
pub fn classify(error_message: &str) -> ErrorKind {
    let lowered = error_message.to_lowercase();
    if TOOL_MISMATCH_MARKERS.iter().any(|m| lowered.contains(m)) {
        ErrorKind::ToolMismatch
    } else if RATE_LIMIT_MARKERS.iter().any(|m| lowered.contains(m)) {
        ErrorKind::RateLimited
    } else {
        ErrorKind::Fatal
    }
}
