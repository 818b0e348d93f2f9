//! Gateway behaviour tests
//!
//! Drive `Gateway::handle` with a counting provider double to check which
//! calls reach the provider, and with a wiremock-backed Google provider for
//! the timeout path.

use async_trait::async_trait;
use serde_json::{json, Value};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::{Duration, Instant};

use google_search_mcp::auth::AuthContext;
use google_search_mcp::config::{FileConfig, GatewayConfig, ProviderConfig, ProviderCredentials};
use google_search_mcp::provider::{ProviderError, SearchProvider};
use google_search_mcp::{Gateway, SearchResponse, SearchResult};

/// Provider double that records calls and replays a fixed outcome
struct CountingProvider {
    calls: AtomicUsize,
    last_call: Mutex<Option<(String, u32)>>,
    outcome: Result<SearchResponse, ProviderError>,
}

impl CountingProvider {
    fn returning(outcome: Result<SearchResponse, ProviderError>) -> Arc<Self> {
        Arc::new(Self {
            calls: AtomicUsize::new(0),
            last_call: Mutex::new(None),
            outcome,
        })
    }

    fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    fn last_call(&self) -> Option<(String, u32)> {
        self.last_call.lock().unwrap().clone()
    }
}

#[async_trait]
impl SearchProvider for CountingProvider {
    fn name(&self) -> &str {
        "counting"
    }

    fn max_results(&self) -> u32 {
        10
    }

    async fn search(&self, query: &str, num_results: u32) -> Result<SearchResponse, ProviderError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        *self.last_call.lock().unwrap() = Some((query.to_string(), num_results));
        self.outcome.clone()
    }
}

fn config(auth: AuthContext, provider: ProviderConfig) -> Arc<GatewayConfig> {
    Arc::new(GatewayConfig {
        server: FileConfig::default().server,
        provider,
        credentials: ProviderCredentials {
            api_key: "test-key".to_string(),
            search_engine_id: "test-cx".to_string(),
        },
        auth,
    })
}

fn gateway(auth: AuthContext, provider: Arc<CountingProvider>) -> Gateway {
    Gateway::new(config(auth, ProviderConfig::default()), provider)
}

fn python_results() -> Vec<SearchResult> {
    vec![
        SearchResult {
            title: "Welcome to Python.org".to_string(),
            link: "https://www.python.org/".to_string(),
            snippet: "The official home of the Python Programming Language".to_string(),
        },
        SearchResult {
            title: "Python (programming language) - Wikipedia".to_string(),
            link: "https://en.wikipedia.org/wiki/Python_(programming_language)".to_string(),
            snippet: "Python is a high-level, general-purpose programming language.".to_string(),
        },
        SearchResult {
            title: "Python Tutorial - W3Schools".to_string(),
            link: "https://www.w3schools.com/python/".to_string(),
            snippet: "Well organized and easy to understand Web building tutorials".to_string(),
        },
    ]
}

#[tokio::test]
async fn test_search_without_auth_returns_provider_results_in_order() {
    let provider = CountingProvider::returning(Ok(SearchResponse::success(
        python_results(),
        "2450000000",
    )));
    let gw = gateway(AuthContext::Disabled, provider.clone());

    let response = gw.handle(&json!({"query": "python", "num_results": 3}), None).await;

    assert_eq!(
        response,
        SearchResponse::success(python_results(), "2450000000")
    );
    assert_eq!(provider.calls(), 1);
    assert_eq!(provider.last_call(), Some(("python".to_string(), 3)));
}

#[tokio::test]
async fn test_missing_token_with_auth_enabled() {
    let provider = CountingProvider::returning(Ok(SearchResponse::success(Vec::new(), "0")));
    let gw = gateway(AuthContext::enabled("secret123"), provider.clone());

    let response = gw.handle(&json!({"query": "python"}), None).await;

    assert_eq!(
        serde_json::to_value(&response).unwrap(),
        json!({
            "success": false,
            "results": [],
            "error": "authentication failed: missing token"
        })
    );
    assert_eq!(provider.calls(), 0);
}

#[tokio::test]
async fn test_wrong_token_with_auth_enabled() {
    let provider = CountingProvider::returning(Ok(SearchResponse::success(Vec::new(), "0")));
    let gw = gateway(AuthContext::enabled("secret123"), provider.clone());

    let response = gw
        .handle(&json!({"query": "python", "auth_token": "wrong"}), None)
        .await;

    assert_eq!(
        response,
        SearchResponse::failure("authentication failed: invalid token")
    );
    assert_eq!(provider.calls(), 0);
}

#[tokio::test]
async fn test_wrong_argument_token_is_not_rescued_by_header() {
    let provider = CountingProvider::returning(Ok(SearchResponse::success(Vec::new(), "0")));
    let gw = gateway(AuthContext::enabled("secret123"), provider.clone());

    let response = gw
        .handle(
            &json!({"query": "python", "auth_token": "wrong"}),
            Some("secret123"),
        )
        .await;

    assert_eq!(
        response.error.as_deref(),
        Some("authentication failed: invalid token")
    );
    assert_eq!(provider.calls(), 0);
}

#[tokio::test]
async fn test_correct_token_from_argument_or_header() {
    let provider = CountingProvider::returning(Ok(SearchResponse::success(Vec::new(), "0")));
    let gw = gateway(AuthContext::enabled("secret123"), provider.clone());

    let from_argument = gw
        .handle(&json!({"query": "python", "auth_token": "secret123"}), None)
        .await;
    assert!(from_argument.success);

    let from_header = gw.handle(&json!({"query": "python"}), Some("secret123")).await;
    assert!(from_header.success);

    // An empty argument falls back to the header
    let empty_argument = gw
        .handle(&json!({"query": "python", "auth_token": ""}), Some("secret123"))
        .await;
    assert!(empty_argument.success);

    assert_eq!(provider.calls(), 3);
}

#[tokio::test]
async fn test_auth_disabled_accepts_any_token() {
    let provider = CountingProvider::returning(Ok(SearchResponse::success(Vec::new(), "0")));
    let gw = gateway(AuthContext::Disabled, provider.clone());

    for args in [
        json!({"query": "rust"}),
        json!({"query": "rust", "auth_token": null}),
        json!({"query": "rust", "auth_token": ""}),
        json!({"query": "rust", "auth_token": "anything"}),
    ] {
        let response = gw.handle(&args, Some("also-anything")).await;
        assert!(response.success, "rejected {}", args);
    }
    assert_eq!(provider.calls(), 4);
}

#[tokio::test]
async fn test_empty_query_never_reaches_provider() {
    let provider = CountingProvider::returning(Ok(SearchResponse::success(Vec::new(), "0")));
    let gw = gateway(AuthContext::Disabled, provider.clone());

    let cases: Vec<Value> = vec![
        json!({"query": ""}),
        json!({"query": "   \t\n"}),
        json!({}),
        json!({"query": null}),
        json!({"num_results": 3}),
    ];

    for args in &cases {
        let response = gw.handle(args, None).await;
        assert_eq!(response, SearchResponse::failure("invalid query"), "args: {}", args);
    }
    assert_eq!(provider.calls(), 0);
}

#[tokio::test]
async fn test_invalid_query_reported_before_auth() {
    let provider = CountingProvider::returning(Ok(SearchResponse::success(Vec::new(), "0")));
    let gw = gateway(AuthContext::enabled("secret123"), provider.clone());

    let response = gw.handle(&json!({"query": ""}), None).await;

    assert_eq!(response.error.as_deref(), Some("invalid query"));
    assert_eq!(provider.calls(), 0);
}

#[tokio::test]
async fn test_num_results_clamped_not_rejected() {
    let provider = CountingProvider::returning(Ok(SearchResponse::success(Vec::new(), "0")));
    let gw = gateway(AuthContext::Disabled, provider.clone());

    let response = gw.handle(&json!({"query": "rust", "num_results": 500}), None).await;
    assert!(response.success);
    assert_eq!(provider.last_call(), Some(("rust".to_string(), 10)));

    let response = gw.handle(&json!({"query": "rust", "num_results": 0}), None).await;
    assert!(response.success);
    assert_eq!(provider.last_call(), Some(("rust".to_string(), 1)));

    let response = gw.handle(&json!({"query": "rust"}), None).await;
    assert!(response.success);
    assert_eq!(provider.last_call(), Some(("rust".to_string(), 5)));
}

#[tokio::test]
async fn test_provider_errors_become_error_payloads() {
    let cases = [
        (
            ProviderError::RateLimited {
                message: "Daily Limit Exceeded".to_string(),
            },
            "provider rate limited",
        ),
        (
            ProviderError::InvalidCredentials {
                message: "API key not valid".to_string(),
            },
            "provider rejected credentials",
        ),
        (
            ProviderError::Unreachable {
                reason: "dns error".to_string(),
            },
            "provider unreachable",
        ),
        (
            ProviderError::MalformedResponse {
                reason: "expected value at line 1".to_string(),
            },
            "provider returned malformed response",
        ),
    ];

    for (err, expected) in cases {
        let provider = CountingProvider::returning(Err(err));
        let gw = gateway(AuthContext::Disabled, provider.clone());

        let response = gw.handle(&json!({"query": "rust"}), None).await;

        assert_eq!(response, SearchResponse::failure(expected));
        assert_eq!(provider.calls(), 1);
    }
}

#[tokio::test]
async fn test_provider_timeout_resolves_as_unreachable() {
    use google_search_mcp::provider::GoogleSearchProvider;
    use wiremock::matchers::method;
    use wiremock::{Mock, MockServer, ResponseTemplate};

    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(json!({"items": []}))
                .set_delay(Duration::from_secs(10)),
        )
        .mount(&server)
        .await;

    let provider_config = ProviderConfig {
        endpoint: server.uri(),
        timeout_seconds: 1,
        ..ProviderConfig::default()
    };
    let config = config(AuthContext::Disabled, provider_config);
    let provider =
        GoogleSearchProvider::new(&config.provider, config.credentials.clone()).unwrap();
    let gw = Gateway::new(config, Arc::new(provider));

    let started = Instant::now();
    let response = gw.handle(&json!({"query": "python"}), None).await;

    assert_eq!(response, SearchResponse::failure("provider unreachable"));
    assert!(started.elapsed() < Duration::from_secs(5));
}

#[tokio::test]
async fn test_concurrent_calls_are_independent() {
    let provider = CountingProvider::returning(Ok(SearchResponse::success(python_results(), "3")));
    let gw = gateway(AuthContext::enabled("secret123"), provider.clone());

    let mut handles = Vec::new();
    for i in 0..16 {
        let gw = gw.clone();
        handles.push(tokio::spawn(async move {
            let token = if i % 2 == 0 { "secret123" } else { "wrong" };
            gw.handle(&json!({"query": "python", "auth_token": token}), None)
                .await
        }));
    }

    let mut successes = 0;
    for handle in handles {
        if handle.await.unwrap().success {
            successes += 1;
        }
    }

    assert_eq!(successes, 8);
    assert_eq!(provider.calls(), 8);
}
