//! In-process tool execution
//!
//! [`EmbeddableMcp`] lets a host call an MCP server's tools directly, without
//! a transport. The HTTP endpoint and an embedded caller then share the same
//! tool implementation.
//!
//! ```rust,ignore
//! use mcp_common::EmbeddableMcp;
//!
//! let tools = server.list_tools();
//! let result = server
//!     .call_tool("search_google", serde_json::json!({"query": "rust"}))
//!     .await?;
//! ```

use async_trait::async_trait;
use rmcp::model::{CallToolResult, Tool};
use serde_json::Value;

/// Error type for embedded tool calls
#[derive(Debug, thiserror::Error)]
pub enum EmbeddableError {
    /// No tool with that name is registered
    #[error("tool not found: {0}")]
    ToolNotFound(String),

    /// Protocol-level failure raised by the tool
    #[error("mcp error: {0}")]
    McpError(String),
}

impl From<rmcp::ErrorData> for EmbeddableError {
    fn from(err: rmcp::ErrorData) -> Self {
        EmbeddableError::McpError(err.message.to_string())
    }
}

/// Result type for embedded tool calls
pub type EmbeddableResult<T> = Result<T, EmbeddableError>;

/// An MCP server whose tools can be invoked in-process
///
/// Implementations must be `Send + Sync`; calls may run concurrently.
#[async_trait]
pub trait EmbeddableMcp: Send + Sync {
    /// Server name used in logs and client configuration
    fn server_name(&self) -> &str;

    /// All tools with their input schemas
    fn list_tools(&self) -> Vec<Tool>;

    /// Invoke a tool by name with JSON arguments
    async fn call_tool(&self, name: &str, params: Value) -> EmbeddableResult<CallToolResult>;

    fn server_description(&self) -> Option<&str> {
        None
    }

    fn server_version(&self) -> Option<&str> {
        None
    }
}
