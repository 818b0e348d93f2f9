//! Google Search MCP Library
//!
//! Google Custom Search exposed as the `search_google` MCP tool over
//! streamable HTTP, with optional bearer-token authentication.
//!
//! # Usage as Library
//!
//! ```rust,ignore
//! use std::sync::Arc;
//! use google_search_mcp::{Gateway, GatewayConfig, GoogleSearchMcpServer};
//!
//! let config = Arc::new(GatewayConfig::load()?);
//! let server = GoogleSearchMcpServer::new(Gateway::google(config)?);
//! // Serve via google_search_mcp::transport::serve or call in-process
//! // through mcp_common::EmbeddableMcp
//! ```
//!
//! # Configuration
//! Set `GOOGLE_API_KEY` and `GOOGLE_CSE_ID`; see [`config`] for the rest.

pub mod auth;
pub mod config;
pub mod gateway;
pub mod provider;
pub mod server;
pub mod transport;
pub mod types;

// Re-export main types
pub use config::GatewayConfig;
pub use gateway::Gateway;
pub use server::GoogleSearchMcpServer;

// Re-export request/response types for direct API usage
pub use server::{SearchArguments, SearchParams};
pub use types::{SearchRequest, SearchResponse, SearchResult};
