//! Bearer-token provision for the transport
//!
//! Tokens are attached per call. A provider either hands out a static
//! token or keeps one cached and refreshes it transparently before it
//! expires.

use crate::error::TransportError;
use async_trait::async_trait;
use chrono::{DateTime, Duration, Utc};
use secrecy::{ExposeSecret, Secret};
use tokio::sync::RwLock;

/// One issued token with its expiry
#[derive(Debug, Clone)]
pub struct AuthToken {
    pub access_token: Secret<String>,
    pub refresh_token: Option<Secret<String>>,
    pub expires_at: DateTime<Utc>,
}

impl AuthToken {
    pub fn new(access_token: impl Into<String>, expires_at: DateTime<Utc>) -> Self {
        Self {
            access_token: Secret::new(access_token.into()),
            refresh_token: None,
            expires_at,
        }
    }

    pub fn with_refresh_token(mut self, refresh_token: impl Into<String>) -> Self {
        self.refresh_token = Some(Secret::new(refresh_token.into()));
        self
    }

    /// True if the token expires within the given margin from now
    pub fn expires_within(&self, margin: Duration) -> bool {
        Utc::now() + margin >= self.expires_at
    }
}

/// Trait for token providers
#[async_trait]
pub trait TokenProvider: Send + Sync {
    /// Get a token valid for the next request
    async fn token(&self) -> Result<AuthToken, TransportError>;
}

/// Provider for a fixed API token that never expires
pub struct StaticToken {
    token: AuthToken,
}

impl StaticToken {
    pub fn new(access_token: impl Into<String>) -> Self {
        Self {
            token: AuthToken::new(access_token, DateTime::<Utc>::MAX_UTC),
        }
    }
}

#[async_trait]
impl TokenProvider for StaticToken {
    async fn token(&self) -> Result<AuthToken, TransportError> {
        Ok(self.token.clone())
    }
}

/// Trait for the upstream issuer a refreshing provider pulls from
#[async_trait]
pub trait TokenSource: Send + Sync {
    /// Fetch a fresh token, presenting the previous refresh token if one
    /// is held
    async fn fetch(&self, refresh_token: Option<&str>) -> Result<AuthToken, TransportError>;
}

/// Provider that caches one token and refreshes it before expiry
pub struct RefreshingToken {
    source: Box<dyn TokenSource>,
    margin: Duration,
    cached: RwLock<Option<AuthToken>>,
}

impl RefreshingToken {
    pub fn new(source: Box<dyn TokenSource>) -> Self {
        Self {
            source,
            margin: Duration::seconds(30),
            cached: RwLock::new(None),
        }
    }

    /// Refresh this far ahead of the recorded expiry
    pub fn with_margin(mut self, margin: Duration) -> Self {
        self.margin = margin;
        self
    }
}

#[async_trait]
impl TokenProvider for RefreshingToken {
    async fn token(&self) -> Result<AuthToken, TransportError> {
        {
            let cached = self.cached.read().await;
            if let Some(token) = cached.as_ref() {
                if !token.expires_within(self.margin) {
                    return Ok(token.clone());
                }
            }
        }

        let mut cached = self.cached.write().await;
        // another task may have refreshed while we waited for the lock
        if let Some(token) = cached.as_ref() {
            if !token.expires_within(self.margin) {
                return Ok(token.clone());
            }
        }

        let refresh = cached
            .as_ref()
            .and_then(|token| token.refresh_token.as_ref())
            .map(|secret| secret.expose_secret().clone());
        let fresh = self.source.fetch(refresh.as_deref()).await?;
        *cached = Some(fresh.clone());
        Ok(fresh)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Arc;

    struct CountingSource {
        fetches: Arc<AtomicUsize>,
        ttl: Duration,
    }

    #[async_trait]
    impl TokenSource for CountingSource {
        async fn fetch(&self, refresh_token: Option<&str>) -> Result<AuthToken, TransportError> {
            let count = self.fetches.fetch_add(1, Ordering::SeqCst);
            let access = match refresh_token {
                Some(_) => format!("refreshed-{count}"),
                None => format!("initial-{count}"),
            };
            Ok(AuthToken::new(access, Utc::now() + self.ttl).with_refresh_token("refresh"))
        }
    }

    #[test]
    fn test_expiry_margin() {
        let token = AuthToken::new("t", Utc::now() + Duration::seconds(10));
        assert!(token.expires_within(Duration::seconds(30)));
        assert!(!token.expires_within(Duration::seconds(1)));
    }

    #[tokio::test]
    async fn test_static_token_never_refreshes() {
        let provider = StaticToken::new("fixed");
        let first = provider.token().await.unwrap();
        let second = provider.token().await.unwrap();
        assert_eq!(
            first.access_token.expose_secret(),
            second.access_token.expose_secret()
        );
        assert!(!first.expires_within(Duration::days(365)));
    }

    #[tokio::test]
    async fn test_fresh_token_is_reused() {
        let fetches = Arc::new(AtomicUsize::new(0));
        let provider = RefreshingToken::new(Box::new(CountingSource {
            fetches: fetches.clone(),
            ttl: Duration::hours(1),
        }));

        provider.token().await.unwrap();
        provider.token().await.unwrap();
        assert_eq!(fetches.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn test_expiring_token_is_refreshed() {
        let fetches = Arc::new(AtomicUsize::new(0));
        let provider = RefreshingToken::new(Box::new(CountingSource {
            fetches: fetches.clone(),
            // always inside the refresh margin
            ttl: Duration::seconds(5),
        }));

        provider.token().await.unwrap();
        let second = provider.token().await.unwrap();
        assert_eq!(fetches.load(Ordering::SeqCst), 2);
        // the second fetch presented the first token's refresh token
        assert!(second.access_token.expose_secret().starts_with("refreshed-"));
    }
}
