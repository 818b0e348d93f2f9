//! MCP Server implementation for Google search
//!
//! This module defines the MCP server that exposes the `search_google` tool
//! and binds each call to the gateway.

use async_trait::async_trait;
use axum::http::{header::AUTHORIZATION, request::Parts};
use mcp_common::{
    internal_error, json_success, EmbeddableError, EmbeddableMcp, EmbeddableResult, McpResult,
};
use rmcp::{
    handler::server::{router::tool::ToolRouter, wrapper::Parameters},
    model::{CallToolResult, JsonObject, ServerCapabilities, ServerInfo, Tool},
    service::RequestContext,
    tool, tool_handler, tool_router, RoleServer,
};
use schemars::{JsonSchema, Schema, SchemaGenerator};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::borrow::Cow;
use tokio_util::sync::CancellationToken;

use crate::auth;
use crate::gateway::Gateway;
use crate::transport::ConnectionCancellation;
use crate::types::SearchResponse;

pub const SEARCH_TOOL: &str = "search_google";

/// The Google Search MCP Server
#[derive(Clone)]
pub struct GoogleSearchMcpServer {
    gateway: Gateway,
    tool_router: ToolRouter<Self>,
}

// ============================================================================
// Parameter Types
// ============================================================================

/// Documented shape of the `search_google` arguments
#[derive(Debug, Serialize, Deserialize, JsonSchema)]
pub struct SearchParams {
    /// The search query
    #[schemars(description = "The search query string")]
    pub query: String,
    /// Number of results to return
    #[schemars(description = "Number of search results to return (default: 5, max: 10)")]
    pub num_results: Option<u32>,
    /// Token for authenticated deployments
    #[schemars(description = "API token, required when the server has authentication enabled")]
    pub auth_token: Option<String>,
}

/// Raw `search_google` arguments
///
/// Accepts any JSON object so the gateway, not the protocol layer, decides
/// what is malformed. Advertises the [`SearchParams`] schema.
#[derive(Debug, Default, Deserialize)]
#[serde(transparent)]
pub struct SearchArguments(pub JsonObject);

impl JsonSchema for SearchArguments {
    fn schema_name() -> Cow<'static, str> {
        SearchParams::schema_name()
    }

    fn json_schema(generator: &mut SchemaGenerator) -> Schema {
        SearchParams::json_schema(generator)
    }
}

// ============================================================================
// Tool Router Implementation
// ============================================================================

#[tool_router]
impl GoogleSearchMcpServer {
    pub fn new(gateway: Gateway) -> Self {
        Self {
            gateway,
            tool_router: Self::tool_router(),
        }
    }

    pub fn gateway(&self) -> &Gateway {
        &self.gateway
    }

    #[tool(
        description = "Perform a Google search and return formatted results. Returns success, \
                       a list of {title, link, snippet}, and the provider's total result count; \
                       on failure returns success=false with an error message."
    )]
    async fn search_google(
        &self,
        Parameters(arguments): Parameters<SearchArguments>,
        context: RequestContext<RoleServer>,
    ) -> McpResult<CallToolResult> {
        let parts = context.extensions.get::<Parts>();
        let bearer = parts
            .and_then(|parts| parts.headers.get(AUTHORIZATION))
            .and_then(|value| value.to_str().ok())
            .and_then(auth::bearer_token)
            .map(str::to_owned);
        // Absent for transports that are not behind the HTTP router
        let disconnected = parts
            .and_then(|parts| parts.extensions.get::<ConnectionCancellation>())
            .map(|cancellation| cancellation.0.clone())
            .unwrap_or_else(CancellationToken::new);

        let response = run_bound(
            self.gateway.clone(),
            Value::Object(arguments.0),
            bearer,
            context.ct.clone(),
            disconnected,
        )
        .await?;

        json_success(&response)
    }
}

/// Run one gateway call as its own task
///
/// The task is aborted, dropping any in-flight provider call, when the MCP
/// request is cancelled (`ct`) or the client's HTTP connection goes away
/// (`disconnected`).
async fn run_bound(
    gateway: Gateway,
    arguments: Value,
    bearer: Option<String>,
    ct: CancellationToken,
    disconnected: CancellationToken,
) -> McpResult<SearchResponse> {
    let mut task =
        tokio::spawn(async move { gateway.handle(&arguments, bearer.as_deref()).await });

    tokio::select! {
        joined = &mut task => {
            joined.map_err(|e| internal_error(format!("search task failed: {}", e)))
        }
        _ = ct.cancelled() => {
            task.abort();
            tracing::info!("search_google call cancelled, discarding provider result");
            Err(internal_error("request cancelled"))
        }
        _ = disconnected.cancelled() => {
            task.abort();
            tracing::info!("Client disconnected, discarding search_google call");
            Err(internal_error("client disconnected"))
        }
    }
}

// ============================================================================
// Server Handler Implementation
// ============================================================================

#[tool_handler]
impl rmcp::ServerHandler for GoogleSearchMcpServer {
    fn get_info(&self) -> ServerInfo {
        ServerInfo {
            instructions: Some(
                "Google Search MCP Server - provides the search_google tool backed by the \
                 Google Custom Search API. When authentication is enabled, send \
                 'Authorization: Bearer <token>' or pass auth_token."
                    .into(),
            ),
            capabilities: ServerCapabilities::builder().enable_tools().build(),
            ..Default::default()
        }
    }
}

// ============================================================================
// In-process execution
// ============================================================================

#[async_trait]
impl EmbeddableMcp for GoogleSearchMcpServer {
    fn server_name(&self) -> &str {
        "google-search"
    }

    fn list_tools(&self) -> Vec<Tool> {
        self.tool_router.list_all()
    }

    async fn call_tool(&self, name: &str, params: Value) -> EmbeddableResult<CallToolResult> {
        if name != SEARCH_TOOL {
            return Err(EmbeddableError::ToolNotFound(name.to_string()));
        }

        let response = self.gateway.handle(&params, None).await;
        Ok(json_success(&response)?)
    }

    fn server_description(&self) -> Option<&str> {
        Some("Google Custom Search over MCP")
    }

    fn server_version(&self) -> Option<&str> {
        Some(env!("CARGO_PKG_VERSION"))
    }
}
