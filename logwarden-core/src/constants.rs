//! Application constants
//!
//! Single source of truth for paths and protocol markers.

/// Default configuration file path
pub const CONFIG_PATH: &str = "config/agent.toml";

/// Environment file read from the configuration directory
pub const ENV_FILE_NAME: &str = ".env";

/// Content-block name the remote protocol uses for a tool call
pub const TOOL_CALL_MARKER: &str = "toolUse";

/// Field suffix that turns the call marker into a result's back-reference
/// (`toolUseId`), which does not count as a call.
pub const TOOL_USE_ID_SUFFIX: &str = "Id";

/// Content-block name the remote protocol uses for a tool result
pub const TOOL_RESULT_MARKER: &str = "toolResult";
