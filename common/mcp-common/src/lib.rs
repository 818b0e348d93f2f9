//! MCP Common - Shared plumbing for MCP servers
//!
//! - **Initialization**: [`init_tracing`] for stderr/JSON logging
//! - **Results**: [`json_success`] wraps a serializable payload as a tool result
//! - **Errors**: [`McpResult`] and [`internal_error`] for protocol-level failures
//! - **Embeddable**: [`EmbeddableMcp`] for calling tools in-process
//!
//! # Example
//!
//! ```rust,ignore
//! use mcp_common::{json_success, McpResult};
//! use rmcp::model::CallToolResult;
//!
//! async fn my_tool(&self) -> McpResult<CallToolResult> {
//!     let payload = self.compute().await;
//!     json_success(&payload)
//! }
//! ```

pub mod embeddable;
pub mod error;
pub mod init;
pub mod result;

// Re-export commonly used items at crate root
pub use embeddable::{EmbeddableError, EmbeddableMcp, EmbeddableResult};
pub use error::{internal_error, McpResult};
pub use init::init_tracing;
pub use result::json_success;

// Re-export rmcp types that are commonly needed
pub use rmcp::{
    model::{CallToolResult, Content, Tool},
    ErrorData as McpError,
};

// Re-export async_trait for implementing EmbeddableMcp
pub use async_trait::async_trait;
