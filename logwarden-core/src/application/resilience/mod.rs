//! Error classification and backoff for calls to a rate-limited service.

mod classifier;
mod policy;
mod retry;

pub use classifier::{ErrorKind, classify};
pub use policy::RetryPolicy;
pub use retry::retry_rate_limited;
