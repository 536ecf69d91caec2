//! # Resilient Call Wrapper
//!
//! Composes error classification, backoff and conversation tracking around
//! a [`Transport`](crate::transport::Transport).
//!
//! ## Call Loop
//!
//! 1. Pre-flight: if tool-result markers outnumber tool-call markers in the
//!    outgoing turns, reset and keep only the last user turn
//! 2. Send; on success record the reply and any tool calls it requests
//! 3. On failure classify the error text:
//!    - fatal errors return immediately
//!    - the last attempt returns `RetriesExhausted`
//!    - tool mismatch resets state and truncates before backing off
//!    - rate limiting backs off and resends the same turns
//!
//! Deadlines and cancellation tokens are honored before every send and
//! during every backoff.

mod errors;
mod models;
mod runner;


pub use errors::InvokeError;
pub use models::{CallState, CancelReason, InvokeOptions, RetryRecord};
pub use runner::ResilientCallWrapper;
