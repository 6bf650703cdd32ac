// src/services/cache.rs
// DOCUMENTATION: Short-lived memory of raw model replies
// PURPOSE: Answer a repeated search from the last reply instead of calling generateContent again

use crate::models::SearchCriteria;
use serde::Serialize;
use std::collections::HashMap;
use std::sync::Arc;
use std::time::{Duration, Instant};
use tokio::sync::RwLock;

/// Reply text as received from the model, before extraction
struct CachedReply {
    text: String,
    stored_at: Instant,
}

/// Model replies keyed by normalized search criteria
/// DOCUMENTATION: Only replies that extracted cleanly are stored (see PlaceQueryService);
/// a stored reply is served until it is older than the TTL
pub struct ReplyCache {
    replies: RwLock<HashMap<String, CachedReply>>,
    ttl: Duration,
}

impl ReplyCache {
    pub fn new(ttl_seconds: u64) -> Self {
        Self {
            replies: RwLock::new(HashMap::new()),
            ttl: Duration::from_secs(ttl_seconds),
        }
    }

    /// Criteria that produce the same prompt share a key
    pub fn key_for(criteria: &SearchCriteria) -> String {
        format!(
            "{}|{}|{}|{}",
            criteria.city.trim(),
            criteria.district.trim(),
            criteria.place_type.trim(),
            criteria.keyword.trim().to_lowercase()
        )
    }

    fn is_fresh(&self, reply: &CachedReply) -> bool {
        reply.stored_at.elapsed() < self.ttl
    }

    /// Last reply for these criteria, unless it has gone stale
    pub async fn lookup(&self, criteria: &SearchCriteria) -> Option<String> {
        let key = Self::key_for(criteria);
        let replies = self.replies.read().await;

        match replies.get(&key) {
            Some(reply) if self.is_fresh(reply) => {
                log::debug!("Reusing model reply for {}", key);
                Some(reply.text.clone())
            }
            _ => None,
        }
    }

    pub async fn store(&self, criteria: &SearchCriteria, reply: &str) {
        let key = Self::key_for(criteria);
        log::debug!("Caching model reply for {} ({} chars)", key, reply.len());
        self.replies.write().await.insert(
            key,
            CachedReply {
                text: reply.to_string(),
                stored_at: Instant::now(),
            },
        );
    }

    /// Drop stale replies, returning how many were removed
    pub async fn evict_stale(&self) -> usize {
        let mut replies = self.replies.write().await;
        let before = replies.len();
        replies.retain(|_, reply| reply.stored_at.elapsed() < self.ttl);
        let evicted = before - replies.len();

        if evicted > 0 {
            log::info!(
                "Evicted {} stale model replies ({} kept)",
                evicted,
                replies.len()
            );
        }
        evicted
    }

    pub async fn stats(&self) -> ReplyCacheStats {
        let replies = self.replies.read().await;
        let fresh = replies.values().filter(|r| self.is_fresh(r)).count();

        ReplyCacheStats {
            cached_replies: replies.len(),
            fresh_replies: fresh,
            ttl_seconds: self.ttl.as_secs(),
        }
    }
}

/// Reported by GET /health when the cache is enabled
#[derive(Debug, Serialize)]
pub struct ReplyCacheStats {
    pub cached_replies: usize,
    pub fresh_replies: usize,
    pub ttl_seconds: u64,
}

/// Evict stale replies every `interval_seconds` in the background
pub fn spawn_eviction_task(cache: Arc<ReplyCache>, interval_seconds: u64) {
    tokio::spawn(async move {
        let mut interval = tokio::time::interval(Duration::from_secs(interval_seconds));

        loop {
            interval.tick().await;
            cache.evict_stale().await;
        }
    });
}
