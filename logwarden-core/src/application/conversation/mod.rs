//! # Conversation State
//!
//! Tracks the turns, tool calls and tool results of one conversation and
//! provides the primitives used to recover from a desynchronized exchange:
//! a text-level mismatch heuristic and truncation to the last user turn.

mod errors;
mod history;
mod tracker;

pub use errors::TrackerError;
pub use history::sanitize_message;
pub use tracker::{ConversationState, ConversationStateTracker};
