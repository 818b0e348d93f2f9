//! Caller authentication
//!
//! Auth is optional - when `ENABLE_AUTH` is not `true` every call is allowed.
//! When enabled, the caller's token must match `API_TOKEN` exactly.

use std::fmt;

use subtle::ConstantTimeEq;
use thiserror::Error;

/// Reasons a caller token was refused
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum AuthError {
    /// No token (or an empty one) was supplied
    #[error("missing token")]
    Missing,

    /// A token was supplied but does not match
    #[error("invalid token")]
    Invalid,
}

/// Process-wide authentication policy, fixed at startup
#[derive(Clone, Default)]
pub enum AuthContext {
    #[default]
    Disabled,
    Enabled {
        expected_token: String,
    },
}

impl AuthContext {
    pub fn enabled(expected_token: impl Into<String>) -> Self {
        Self::Enabled {
            expected_token: expected_token.into(),
        }
    }

    pub fn is_enabled(&self) -> bool {
        matches!(self, Self::Enabled { .. })
    }

    /// Masked form of the expected token for startup logs
    pub fn masked_token(&self) -> Option<String> {
        match self {
            Self::Disabled => None,
            Self::Enabled { expected_token } => Some("*".repeat(expected_token.chars().count())),
        }
    }
}

impl fmt::Debug for AuthContext {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Disabled => f.write_str("AuthContext::Disabled"),
            Self::Enabled { .. } => f.write_str("AuthContext::Enabled { expected_token: <redacted> }"),
        }
    }
}

/// Decide whether `supplied` authorizes a request under `context`
pub fn validate(context: &AuthContext, supplied: Option<&str>) -> Result<(), AuthError> {
    let AuthContext::Enabled { expected_token } = context else {
        return Ok(());
    };

    let supplied = match supplied {
        Some(token) if !token.is_empty() => token,
        _ => return Err(AuthError::Missing),
    };

    if bool::from(supplied.as_bytes().ct_eq(expected_token.as_bytes())) {
        Ok(())
    } else {
        Err(AuthError::Invalid)
    }
}

/// Extract the token from an `Authorization: Bearer <token>` header value
pub fn bearer_token(header: &str) -> Option<&str> {
    let (scheme, token) = header.trim().split_once(' ')?;
    if !scheme.eq_ignore_ascii_case("bearer") {
        return None;
    }

    let token = token.trim();
    (!token.is_empty()).then_some(token)
}
