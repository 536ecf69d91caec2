//! Transport traits

use super::types::{ResponseStream, TransportError, TransportRequest, TransportResponse};
use crate::config::TransportConfig;
use async_trait::async_trait;

/// Client handle for the remote inference service.
///
/// Implementations are constructed once from a [`TransportConfig`] and
/// shared by reference for the lifetime of a conversation.
#[async_trait]
pub trait Transport: Send + Sync {
    /// Send a conversation and wait for the complete reply
    async fn send(&self, request: TransportRequest) -> Result<TransportResponse, TransportError>;

    /// Send a conversation and receive the reply incrementally
    async fn stream(&self, request: TransportRequest) -> Result<ResponseStream, TransportError>;

    /// Swap in new credentials or region after they are known to have changed
    async fn refresh(&self, _config: &TransportConfig) -> Result<(), TransportError> {
        Ok(())
    }
}
