//! Boundary to the remote inference service.
//!
//! The wire protocol lives outside this crate. Implementations must keep
//! the service's error text intact in [`TransportError`], since retry
//! classification depends on its substrings.

mod traits;
mod types;

pub use traits::Transport;
pub use types::{
    ResponseStream, StopReason, StreamChunk, ToolUse, TransportError, TransportRequest,
    TransportResponse,
};
