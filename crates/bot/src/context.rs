//! Short-lived memory of each user's last recognized image.

use std::{sync::Arc, time::Duration};

use {
    async_trait::async_trait,
    dashmap::{DashMap, mapref::entry::Entry},
    tokio::time::Instant,
    tracing::debug,
};

/// How long a recognized image stays eligible for saving.
pub const CONTEXT_TTL: Duration = Duration::from_secs(10 * 60);

/// The most recent successfully recognized image of one user.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UserImageContext {
    pub user_id: String,
    pub content_id: String,
    pub reply_token: String,
    pub expires_at: Instant,
}

impl UserImageContext {
    fn is_expired(&self, now: Instant) -> bool {
        self.expires_at < now
    }
}

/// Per-user context lookup. Implementations must be safe to share across
/// concurrently running event handlers.
#[async_trait]
pub trait UserContextStore: Send + Sync {
    /// Insert or overwrite the user's record. Empty ids are ignored.
    async fn put(&self, user_id: &str, content_id: &str, reply_token: &str);

    /// The user's live record, if any. Never returns an expired record.
    async fn get(&self, user_id: &str) -> Option<UserImageContext>;
}

/// Process-local store with lazy eviction on lookup.
#[derive(Debug, Clone)]
pub struct InMemoryContextStore {
    records: Arc<DashMap<String, UserImageContext>>,
    ttl: Duration,
}

impl Default for InMemoryContextStore {
    fn default() -> Self {
        Self::new()
    }
}

impl InMemoryContextStore {
    pub fn new() -> Self {
        Self::with_ttl(CONTEXT_TTL)
    }

    pub fn with_ttl(ttl: Duration) -> Self {
        Self {
            records: Arc::new(DashMap::new()),
            ttl,
        }
    }

    /// Number of stored records, expired ones included until looked up.
    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}

#[async_trait]
impl UserContextStore for InMemoryContextStore {
    async fn put(&self, user_id: &str, content_id: &str, reply_token: &str) {
        if user_id.is_empty() || content_id.is_empty() {
            return;
        }
        let record = UserImageContext {
            user_id: user_id.to_string(),
            content_id: content_id.to_string(),
            reply_token: reply_token.to_string(),
            expires_at: Instant::now() + self.ttl,
        };
        self.records.insert(user_id.to_string(), record);
    }

    async fn get(&self, user_id: &str) -> Option<UserImageContext> {
        if user_id.is_empty() {
            return None;
        }
        // Check and removal happen under one shard lock.
        match self.records.entry(user_id.to_string()) {
            Entry::Occupied(entry) => {
                if entry.get().is_expired(Instant::now()) {
                    entry.remove();
                    debug!(user_id, "evicted expired image context");
                    None
                } else {
                    Some(entry.get().clone())
                }
            },
            Entry::Vacant(_) => None,
        }
    }
}
