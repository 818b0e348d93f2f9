//! Search provider abstraction
//!
//! The gateway talks to the outside world only through [`SearchProvider`].
//! Currently supports the Google Custom Search JSON API.

use async_trait::async_trait;
use thiserror::Error;

use crate::types::SearchResponse;

pub mod google;

pub use google::GoogleSearchProvider;

/// Normalized provider failures
///
/// The `Display` text is what callers see; the carried detail is for logs.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ProviderError {
    /// Quota exhausted or too many requests
    #[error("provider rate limited")]
    RateLimited { message: String },

    /// API key or engine id refused
    #[error("provider rejected credentials")]
    InvalidCredentials { message: String },

    /// Network failure, timeout or provider outage
    #[error("provider unreachable")]
    Unreachable { reason: String },

    /// Body could not be decoded
    #[error("provider returned malformed response")]
    MalformedResponse { reason: String },

    /// Any other rejection reported by the provider
    #[error("provider error: {status}: {message}")]
    Api { status: u16, message: String },
}

impl ProviderError {
    /// Short label for structured logs
    pub fn kind(&self) -> &'static str {
        match self {
            Self::RateLimited { .. } => "rate_limited",
            Self::InvalidCredentials { .. } => "invalid_credentials",
            Self::Unreachable { .. } => "unreachable",
            Self::MalformedResponse { .. } => "malformed_response",
            Self::Api { .. } => "api",
        }
    }

    /// Underlying detail, never shown to callers
    pub fn detail(&self) -> &str {
        match self {
            Self::RateLimited { message }
            | Self::InvalidCredentials { message }
            | Self::Api { message, .. } => message,
            Self::Unreachable { reason } | Self::MalformedResponse { reason } => reason,
        }
    }
}

/// Trait for search providers
///
/// Implementations must be safe to call concurrently; the gateway shares one
/// instance across all in-flight requests.
#[async_trait]
pub trait SearchProvider: Send + Sync {
    /// Get the name of this provider
    fn name(&self) -> &str;

    /// Largest result count a single request may ask for
    fn max_results(&self) -> u32;

    /// Run a search, returning results in provider relevance order
    ///
    /// `num_results` is clamped into `1..=max_results()` rather than rejected.
    async fn search(&self, query: &str, num_results: u32) -> Result<SearchResponse, ProviderError>;
}

/// Clamp a requested result count into `1..=max`
pub fn clamp_results(requested: i64, max: u32) -> u32 {
    let max = max.max(1);
    requested.clamp(1, i64::from(max)) as u32
}
