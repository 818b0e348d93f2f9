//! Streamable HTTP transport endpoint
//!
//! Serves the MCP server under `/mcp` (so the documented `/mcp/` base path
//! works) using rmcp's streamable HTTP service with per-client sessions, plus
//! a `/health` probe.

use anyhow::Result;
use axum::{
    body::{Body, Bytes},
    extract::Request,
    middleware::{self, Next},
    response::Response,
    routing::get,
    Json, Router,
};
use http_body::{Body as HttpBody, Frame, SizeHint};
use rmcp::transport::streamable_http_server::{
    session::local::LocalSessionManager, StreamableHttpServerConfig, StreamableHttpService,
};
use serde_json::{json, Value};
use std::future::Future;
use std::pin::Pin;
use std::task::{Context, Poll};
use std::time::Duration;
use tokio::net::TcpListener;
use tokio_util::sync::{CancellationToken, DropGuard};
use tower_http::trace::TraceLayer;

use crate::server::GoogleSearchMcpServer;

/// Base path tool calls are served under
pub const MCP_BASE_PATH: &str = "/mcp";

const SSE_KEEP_ALIVE: Duration = Duration::from_secs(15);

/// Create the router with the MCP endpoint and health probe
pub fn create_router(server: GoogleSearchMcpServer) -> Router {
    let mcp_service = StreamableHttpService::new(
        move || Ok(server.clone()),
        LocalSessionManager::default().into(),
        StreamableHttpServerConfig {
            stateful_mode: true,
            sse_keep_alive: Some(SSE_KEEP_ALIVE),
            ..Default::default()
        },
    );

    let mcp = Router::new()
        .nest_service(MCP_BASE_PATH, mcp_service)
        .layer(middleware::from_fn(cancel_on_disconnect));

    Router::new()
        .route("/health", get(health_check))
        .merge(mcp)
        .layer(TraceLayer::new_for_http())
}

/// Cancelled when the client drops an HTTP request before its response body
/// has been fully sent
///
/// Inserted into the request extensions of every `/mcp` request, so tool
/// handlers find it in the [`http::request::Parts`](axum::http::request::Parts)
/// that rmcp attaches to the request context.
#[derive(Debug, Clone)]
pub struct ConnectionCancellation(pub CancellationToken);

async fn cancel_on_disconnect(mut request: Request, next: Next) -> Response {
    let token = CancellationToken::new();
    request
        .extensions_mut()
        .insert(ConnectionCancellation(token.clone()));

    // Armed until the body finishes; dropping the handler future also cancels
    let guard = token.drop_guard();
    let response = next.run(request).await;

    response.map(|inner| {
        Body::new(GuardedBody {
            inner,
            guard: Some(guard),
        })
    })
}

/// Response body that cancels its connection token if dropped before the end
struct GuardedBody {
    inner: Body,
    guard: Option<DropGuard>,
}

impl HttpBody for GuardedBody {
    type Data = Bytes;
    type Error = axum::Error;

    fn poll_frame(
        mut self: Pin<&mut Self>,
        cx: &mut Context<'_>,
    ) -> Poll<Option<std::result::Result<Frame<Bytes>, axum::Error>>> {
        let polled = Pin::new(&mut self.inner).poll_frame(cx);
        if let Poll::Ready(None) = polled {
            if let Some(guard) = self.guard.take() {
                let _ = guard.disarm();
            }
        }
        polled
    }

    fn is_end_stream(&self) -> bool {
        self.inner.is_end_stream()
    }

    fn size_hint(&self) -> SizeHint {
        self.inner.size_hint()
    }
}

/// Serve on an already-bound listener until `shutdown` resolves
pub async fn serve<F>(listener: TcpListener, server: GoogleSearchMcpServer, shutdown: F) -> Result<()>
where
    F: Future<Output = ()> + Send + 'static,
{
    let addr = listener.local_addr()?;
    tracing::info!("Server will be available at: http://{}{}/", addr, MCP_BASE_PATH);

    axum::serve(listener, create_router(server))
        .with_graceful_shutdown(shutdown)
        .await?;

    Ok(())
}

/// Resolves on Ctrl-C or SIGTERM
pub async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            tracing::error!("Failed to listen for Ctrl-C: {}", e);
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            }
            Err(e) => {
                tracing::error!("Failed to listen for SIGTERM: {}", e);
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {}
        _ = terminate => {}
    }

    tracing::info!("Shutdown signal received");
}

async fn health_check() -> Json<Value> {
    Json(json!({
        "status": "ok",
        "service": "google-search-mcp",
        "version": env!("CARGO_PKG_VERSION"),
    }))
}
