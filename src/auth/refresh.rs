use std::time::Duration;

use moka::sync::Cache;
use uuid::Uuid;

use crate::config::AdminConfig;

/// Bounded TTL store of issued refresh tokens, keyed by token, valued by
/// the owning user id. Clones share the same underlying cache.
#[derive(Clone)]
pub struct RefreshTokenStore {
    tokens: Cache<String, String>,
}

impl RefreshTokenStore {
    /// Longest token lifetime the cache accepts (1000 years of 365 days).
    pub const MAX_TTL: Duration = Duration::from_secs(1_000 * 365 * 24 * 60 * 60);

    /// A store holding at most `max_tokens`; `ttl` is capped at `MAX_TTL`.
    pub fn new(max_tokens: u64, ttl: Duration) -> Self {
        let tokens = Cache::builder()
            .max_capacity(max_tokens)
            .time_to_live(ttl.min(Self::MAX_TTL))
            .eviction_listener(|_token, user, cause| {
                tracing::debug!(user = %user, ?cause, "refresh token evicted");
            })
            .build();
        Self { tokens }
    }

    pub fn from_config(config: &AdminConfig) -> Self {
        Self::new(
            config.refresh_token_capacity,
            Duration::from_secs(config.refresh_token_ttl_secs),
        )
    }

    /// Issue a new opaque token for `user_id`.
    pub fn issue(&self, user_id: &str) -> String {
        let token = Uuid::new_v4().simple().to_string();
        self.tokens.insert(token.clone(), user_id.to_string());
        tracing::debug!(user = %user_id, "issued refresh token");
        token
    }

    /// Revoke `token` and issue a replacement for the same user.
    /// Unknown or expired tokens yield `None`.
    pub fn rotate(&self, token: &str) -> Option<(String, String)> {
        let user = self.tokens.get(token)?;
        self.tokens.invalidate(token);
        let replacement = self.issue(&user);
        Some((user, replacement))
    }

    /// Returns true if the token was live.
    pub fn revoke(&self, token: &str) -> bool {
        let live = self.tokens.contains_key(token);
        self.tokens.invalidate(token);
        live
    }

    pub fn owner(&self, token: &str) -> Option<String> {
        self.tokens.get(token)
    }

    /// Number of live tokens.
    pub fn len(&self) -> u64 {
        self.tokens.run_pending_tasks();
        self.tokens.entry_count()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}
