//! # logwarden-core
//!
//! Resilience layer between a log-analysis agent and a rate-limited,
//! stateful inference service with tool calling.
//!
//! ## Components
//!
//! - [`resilience::classify`] maps service error text to an [`resilience::ErrorKind`]
//! - [`resilience::RetryPolicy`] computes exponential backoff with jitter
//! - [`conversation::ConversationStateTracker`] enforces tool call/result pairing
//! - [`wrapper::ResilientCallWrapper`] composes the three around a [`transport::Transport`]
//!
//! The wire protocol, the tools themselves and every presentation layer
//! live outside this crate.

pub mod application;
pub mod config;
pub mod constants;
pub mod domain;
pub mod infrastructure;
pub mod logging;

pub use application::{conversation, resilience, response, wrapper};
pub use config::{AgentConfig, ConfigError, RetryConfig, TransportConfig};
pub use domain::types;
pub use infrastructure::transport;
pub use logging::init_tracing;
pub use wrapper::{InvokeError, InvokeOptions, ResilientCallWrapper};
