use std::future::Future;

use tokio::sync::Mutex;

use crate::error::Result;
use crate::types::AccessToken;

/// Seconds before expiry at which a token is treated as stale
pub const DEFAULT_EXPIRY_SKEW_S: u64 = 60;

/// In-memory bearer token cache
///
/// The lock is held across a refresh, so concurrent callers wait for the
/// single in-flight token request instead of issuing their own.
pub struct TokenCache {
    slot: Mutex<Option<AccessToken>>,
    skew_s: u64,
}

impl Default for TokenCache {
    fn default() -> Self {
        Self::new()
    }
}

impl TokenCache {
    pub fn new() -> Self {
        Self::with_skew(DEFAULT_EXPIRY_SKEW_S)
    }

    pub fn with_skew(skew_s: u64) -> Self {
        Self {
            slot: Mutex::new(None),
            skew_s,
        }
    }

    /// Return the cached token, fetching a new one if absent or near expiry
    pub async fn get_or_refresh<F, Fut>(&self, fetch: F) -> Result<AccessToken>
    where
        F: FnOnce() -> Fut,
        Fut: Future<Output = Result<AccessToken>>,
    {
        let mut slot = self.slot.lock().await;
        if let Some(token) = slot.as_ref() {
            if token.is_fresh(self.skew_s) {
                return Ok(token.clone());
            }
        }

        let token = fetch().await?;
        *slot = Some(token.clone());
        Ok(token)
    }
}

#[cfg(test)]
mod tests {
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Arc;

    use super::*;
    use crate::error::Error;
    use crate::types::get_epoch_s;

    fn token(value: &str, ttl: u64) -> AccessToken {
        AccessToken::new(value, ttl)
    }

    /// Token issued an hour ago with `remaining` seconds left
    fn aged_token(value: &str, remaining: u64) -> AccessToken {
        AccessToken {
            value: value.to_string(),
            expires: get_epoch_s() + remaining,
            lifetime: 3600,
        }
    }

    #[tokio::test]
    async fn test_fresh_token_is_reused() {
        let cache = TokenCache::new();
        let calls = AtomicUsize::new(0);

        for _ in 0..3 {
            let t = cache
                .get_or_refresh(|| async {
                    calls.fetch_add(1, Ordering::SeqCst);
                    Ok(token("a", 3600))
                })
                .await
                .unwrap();
            assert_eq!(t.value, "a");
        }
        assert_eq!(calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn test_stale_token_is_refreshed() {
        let cache = TokenCache::new();
        cache
            .get_or_refresh(|| async { Ok(aged_token("old", 10)) })
            .await
            .unwrap();
        let t = cache
            .get_or_refresh(|| async { Ok(token("new", 3600)) })
            .await
            .unwrap();
        assert_eq!(t.value, "new");
    }

    #[tokio::test]
    async fn test_failed_refresh_leaves_cache_empty() {
        let cache = TokenCache::new();
        let err = cache
            .get_or_refresh(|| async { Err(Error::Auth("invalid_client".into())) })
            .await
            .unwrap_err();
        assert!(matches!(err, Error::Auth(_)));

        let t = cache
            .get_or_refresh(|| async { Ok(token("retry", 3600)) })
            .await
            .unwrap();
        assert_eq!(t.value, "retry");
    }

    #[tokio::test]
    async fn test_concurrent_callers_share_one_refresh() {
        let cache = Arc::new(TokenCache::new());
        let calls = Arc::new(AtomicUsize::new(0));

        let handles: Vec<_> = (0..8)
            .map(|_| {
                let cache = Arc::clone(&cache);
                let calls = Arc::clone(&calls);
                tokio::spawn(async move {
                    cache
                        .get_or_refresh(|| async {
                            calls.fetch_add(1, Ordering::SeqCst);
                            tokio::time::sleep(std::time::Duration::from_millis(20)).await;
                            Ok(token("shared", 3600))
                        })
                        .await
                })
            })
            .collect();

        for handle in handles {
            assert_eq!(handle.await.unwrap().unwrap().value, "shared");
        }
        assert_eq!(calls.load(Ordering::SeqCst), 1);
    }
}
