//! Request and response types for the `search_google` tool
//!
//! `SearchResponse` is the only payload callers ever see: successes carry the
//! results, failures carry an error string and an empty result list.

use serde::{Deserialize, Serialize};

/// A validated search request
///
/// Built by the gateway from raw tool arguments; owned by a single call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SearchRequest {
    /// Trimmed, non-empty query text
    pub query: String,
    /// Requested result count, already clamped into the provider range
    pub num_results: u32,
    /// Caller-supplied token, if any
    pub auth_token: Option<String>,
}

/// A single search result as returned by the provider
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SearchResult {
    /// The title of the result
    pub title: String,
    /// The URL of the result
    pub link: String,
    /// A snippet of the result page
    pub snippet: String,
}

/// Uniform payload of every `search_google` call
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SearchResponse {
    pub success: bool,
    /// Results in provider order; empty on failure
    #[serde(default)]
    pub results: Vec<SearchResult>,
    /// Provider-reported total (may be an estimate)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub total_results: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl SearchResponse {
    pub fn success(results: Vec<SearchResult>, total_results: impl Into<String>) -> Self {
        Self {
            success: true,
            results,
            total_results: Some(total_results.into()),
            error: None,
        }
    }

    pub fn failure(error: impl Into<String>) -> Self {
        Self {
            success: false,
            results: Vec::new(),
            total_results: None,
            error: Some(error.into()),
        }
    }
}
