pub mod app;
pub mod defaults;
pub mod error;
pub mod loader;
pub mod model;
pub mod retry;
pub mod transport;

pub use crate::constants::CONFIG_PATH;
pub use app::AgentConfig;
pub use error::ConfigError;
pub use model::ModelSettings;
pub use retry::RetryConfig;
pub use transport::{Credentials, TransportConfig};
