//! Tool invocation gateway
//!
//! Turns raw `search_google` arguments into a [`SearchResponse`]. Every failure
//! (bad input, refused token, provider error) is folded into the response
//! payload, so callers never see an internal fault.

use serde_json::Value;
use std::sync::Arc;
use thiserror::Error;

use crate::auth::{self, AuthError};
use crate::config::GatewayConfig;
use crate::provider::{clamp_results, GoogleSearchProvider, ProviderError, SearchProvider};
use crate::types::{SearchRequest, SearchResponse};

/// Why a call did not produce results
#[derive(Error, Debug)]
enum GatewayFailure {
    #[error("invalid {0}")]
    InvalidArgument(&'static str),

    #[error("authentication failed: {0}")]
    Auth(#[from] AuthError),

    #[error(transparent)]
    Provider(#[from] ProviderError),
}

/// Stateless dispatcher shared by every in-flight call
#[derive(Clone)]
pub struct Gateway {
    config: Arc<GatewayConfig>,
    provider: Arc<dyn SearchProvider>,
}

impl Gateway {
    pub fn new(config: Arc<GatewayConfig>, provider: Arc<dyn SearchProvider>) -> Self {
        Self { config, provider }
    }

    /// Build a gateway backed by Google Custom Search
    pub fn google(config: Arc<GatewayConfig>) -> Result<Self, reqwest::Error> {
        let provider =
            GoogleSearchProvider::new(&config.provider, config.credentials.clone())?;
        Ok(Self::new(config, Arc::new(provider)))
    }

    pub fn provider(&self) -> &dyn SearchProvider {
        self.provider.as_ref()
    }

    /// Handle one `search_google` invocation
    ///
    /// `transport_token` is the bearer token from the carrying HTTP request,
    /// used when the arguments do not include `auth_token`.
    pub async fn handle(&self, arguments: &Value, transport_token: Option<&str>) -> SearchResponse {
        match self.dispatch(arguments, transport_token).await {
            Ok(response) => response,
            Err(failure) => {
                match &failure {
                    GatewayFailure::InvalidArgument(field) => {
                        tracing::warn!(field, "Rejected search_google call with invalid arguments");
                    }
                    GatewayFailure::Auth(reason) => {
                        tracing::warn!(%reason, "Rejected search_google call: authentication failed");
                    }
                    GatewayFailure::Provider(err) => {
                        tracing::error!(
                            provider = self.provider.name(),
                            kind = err.kind(),
                            detail = err.detail(),
                            "Search provider call failed"
                        );
                    }
                }
                SearchResponse::failure(failure.to_string())
            }
        }
    }

    async fn dispatch(
        &self,
        arguments: &Value,
        transport_token: Option<&str>,
    ) -> Result<SearchResponse, GatewayFailure> {
        let request = self.parse_request(arguments)?;

        let token = request
            .auth_token
            .as_deref()
            .filter(|t| !t.is_empty())
            .or(transport_token);
        auth::validate(&self.config.auth, token)?;

        tracing::info!(
            query_len = request.query.len(),
            num_results = request.num_results,
            "Searching"
        );
        tracing::debug!(query = %request.query, "Search query");

        let response = self
            .provider
            .search(&request.query, request.num_results)
            .await?;

        tracing::info!(
            results = response.results.len(),
            total = response.total_results.as_deref().unwrap_or("0"),
            "Search completed"
        );
        Ok(response)
    }

    /// Validate raw arguments into a [`SearchRequest`]
    fn parse_request(&self, arguments: &Value) -> Result<SearchRequest, GatewayFailure> {
        let query = arguments
            .get("query")
            .and_then(Value::as_str)
            .map(str::trim)
            .filter(|q| !q.is_empty())
            .ok_or(GatewayFailure::InvalidArgument("query"))?;

        let max = self.provider.max_results();
        let num_results = match arguments.get("num_results") {
            None | Some(Value::Null) => {
                clamp_results(i64::from(self.config.provider.default_results), max)
            }
            Some(value) => {
                let requested = value
                    .as_i64()
                    .or_else(|| value.as_u64().map(|_| i64::MAX))
                    .or_else(|| whole_number(value))
                    .ok_or(GatewayFailure::InvalidArgument("num_results"))?;
                clamp_results(requested, max)
            }
        };

        let auth_token = match arguments.get("auth_token") {
            None | Some(Value::Null) => None,
            Some(Value::String(token)) => Some(token.clone()),
            Some(_) => return Err(GatewayFailure::InvalidArgument("auth_token")),
        };

        Ok(SearchRequest {
            query: query.to_string(),
            num_results,
            auth_token,
        })
    }
}

/// A float with no fractional part, such as `3.0`, saturated into `i64`
fn whole_number(value: &Value) -> Option<i64> {
    value
        .as_f64()
        .filter(|f| f.is_finite() && f.fract() == 0.0)
        .map(|f| f as i64)
}
