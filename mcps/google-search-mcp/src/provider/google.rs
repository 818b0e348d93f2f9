//! Google Custom Search backend
//!
//! Implements the SearchProvider trait using the Custom Search JSON API.
//! See: https://developers.google.com/custom-search/v1/reference/rest/v1/cse/list

use async_trait::async_trait;
use reqwest::{Client, StatusCode};
use serde::Deserialize;

use super::{clamp_results, ProviderError, SearchProvider};
use crate::config::{ProviderConfig, ProviderCredentials};
use crate::types::{SearchResponse, SearchResult};

/// Google Custom Search provider
pub struct GoogleSearchProvider {
    client: Client,
    endpoint: String,
    credentials: ProviderCredentials,
    max_results: u32,
}

impl GoogleSearchProvider {
    pub fn new(
        config: &ProviderConfig,
        credentials: ProviderCredentials,
    ) -> Result<Self, reqwest::Error> {
        let client = Client::builder()
            .timeout(config.timeout())
            .user_agent(concat!("google-search-mcp/", env!("CARGO_PKG_VERSION")))
            .build()?;

        Ok(Self {
            client,
            endpoint: config.endpoint.clone(),
            credentials,
            max_results: config.max_results,
        })
    }
}

// Custom Search API response types
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct CseResponse {
    #[serde(default)]
    items: Vec<CseItem>,
    search_information: Option<SearchInformation>,
}

// Any field may be absent or null on a single item
#[derive(Debug, Deserialize)]
struct CseItem {
    #[serde(default)]
    title: Option<String>,
    #[serde(default)]
    link: Option<String>,
    #[serde(default)]
    snippet: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct SearchInformation {
    total_results: Option<String>,
}

// Error envelope: {"error": {"code", "message", "status", "errors": [{"reason"}], "details": [{"reason"}]}}
#[derive(Debug, Deserialize)]
struct CseErrorEnvelope {
    error: CseError,
}

#[derive(Debug, Default, Deserialize)]
struct CseError {
    #[serde(default)]
    message: String,
    #[serde(default)]
    errors: Vec<CseErrorReason>,
    #[serde(default)]
    details: Vec<CseErrorReason>,
}

#[derive(Debug, Deserialize)]
struct CseErrorReason {
    reason: Option<String>,
}

const QUOTA_REASONS: &[&str] = &[
    "rateLimitExceeded",
    "userRateLimitExceeded",
    "dailyLimitExceeded",
    "quotaExceeded",
    "RATE_LIMIT_EXCEEDED",
];

const CREDENTIAL_REASONS: &[&str] = &["keyInvalid", "keyExpired", "API_KEY_INVALID"];

/// Map a non-success HTTP status and its body onto a provider error
fn classify_status(status: StatusCode, body: &[u8]) -> ProviderError {
    let error = serde_json::from_slice::<CseErrorEnvelope>(body)
        .map(|envelope| envelope.error)
        .unwrap_or_default();

    let message = if error.message.is_empty() {
        status
            .canonical_reason()
            .unwrap_or("unknown error")
            .to_string()
    } else {
        error.message.clone()
    };

    let has_reason = |wanted: &[&str]| {
        error
            .errors
            .iter()
            .chain(error.details.iter())
            .filter_map(|r| r.reason.as_deref())
            .any(|reason| wanted.contains(&reason))
    };

    match status {
        StatusCode::TOO_MANY_REQUESTS => ProviderError::RateLimited { message },
        StatusCode::FORBIDDEN if has_reason(QUOTA_REASONS) => ProviderError::RateLimited { message },
        StatusCode::UNAUTHORIZED | StatusCode::FORBIDDEN => {
            ProviderError::InvalidCredentials { message }
        }
        StatusCode::BAD_REQUEST
            if has_reason(CREDENTIAL_REASONS) || message.contains("API key not valid") =>
        {
            ProviderError::InvalidCredentials { message }
        }
        s if s.is_server_error() => ProviderError::Unreachable {
            reason: format!("{}: {}", s, message),
        },
        s => ProviderError::Api {
            status: s.as_u16(),
            message,
        },
    }
}

fn transport_error(err: reqwest::Error) -> ProviderError {
    let reason = if err.is_timeout() {
        format!("request timed out: {}", err)
    } else {
        err.to_string()
    };
    ProviderError::Unreachable { reason }
}

#[async_trait]
impl SearchProvider for GoogleSearchProvider {
    fn name(&self) -> &str {
        "google"
    }

    fn max_results(&self) -> u32 {
        self.max_results
    }

    async fn search(&self, query: &str, num_results: u32) -> Result<SearchResponse, ProviderError> {
        let num = clamp_results(i64::from(num_results), self.max_results).to_string();

        let response = self
            .client
            .get(&self.endpoint)
            .query(&[
                ("key", self.credentials.api_key.as_str()),
                ("cx", self.credentials.search_engine_id.as_str()),
                ("q", query),
                ("num", num.as_str()),
            ])
            .send()
            .await
            .map_err(transport_error)?;

        let status = response.status();
        let body = response.bytes().await.map_err(transport_error)?;

        if !status.is_success() {
            return Err(classify_status(status, &body));
        }

        let parsed: CseResponse =
            serde_json::from_slice(&body).map_err(|e| ProviderError::MalformedResponse {
                reason: e.to_string(),
            })?;

        let results = parsed
            .items
            .into_iter()
            .map(|item| SearchResult {
                title: item.title.unwrap_or_default(),
                link: item.link.unwrap_or_default(),
                snippet: item.snippet.unwrap_or_default(),
            })
            .collect();

        let total = parsed
            .search_information
            .and_then(|info| info.total_results)
            .unwrap_or_else(|| "0".to_string());

        Ok(SearchResponse::success(results, total))
    }
}
