//! Protocol-level error helpers
//!
//! Tool handlers use these for failures that belong to the MCP exchange
//! itself (cancelled request, crashed task), not for domain failures that a
//! tool reports inside its own payload.

use rmcp::ErrorData as McpError;

/// Type alias for MCP tool results
pub type McpResult<T> = Result<T, McpError>;

/// Create an internal error with a message
pub fn internal_error(message: impl Into<String>) -> McpError {
    McpError::internal_error(message.into(), None)
}
