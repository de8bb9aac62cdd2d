//! Credential collaborator.
//!
//! Tokens are short-lived: one is requested per connection attempt and
//! never reused across endpoints or attempts.

use std::time::Duration;

use async_trait::async_trait;
use thiserror::Error;

use crate::registry::Endpoint;

/// Failure to obtain a token for one endpoint.
#[derive(Debug, Clone, Error)]
pub enum AuthError {
    #[error("credential provider error: {0}")]
    Provider(String),

    #[error("token request timed out after {}ms", .0.as_millis())]
    Timeout(Duration),
}

impl AuthError {
    pub fn kind(&self) -> &'static str {
        match self {
            AuthError::Provider(_) => "auth_provider",
            AuthError::Timeout(_) => "auth_timeout",
        }
    }
}

/// Issues short-lived auth tokens (e.g., IAM database tokens).
#[async_trait]
pub trait TokenProvider: Send + Sync {
    async fn auth_token(&self, endpoint: &Endpoint, user: &str) -> Result<String, AuthError>;
}

/// Shortened form of a token that is safe to log.
pub fn token_preview(token: &str) -> String {
    let chars: Vec<char> = token.chars().collect();
    if chars.len() > 20 {
        let head: String = chars[..10].iter().collect();
        let tail: String = chars[chars.len() - 10..].iter().collect();
        format!("{head}...{tail}")
    } else {
        "<redacted>".to_string()
    }
}
