//! In-memory LRU cache of AI-generated summaries.

use crate::config::CacheConfig;
use crate::models::{Language, SummaryRequest, SummaryResult};
use lru::LruCache;
use std::collections::hash_map::DefaultHasher;
use std::hash::{Hash, Hasher};
use std::num::NonZeroUsize;
use std::time::{Duration, Instant};
use tokio::sync::Mutex;

/// Requests that differ only in case or surrounding whitespace share a key.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct CacheKey {
    book_title: String,
    topic: String,
    course: Option<String>,
    language: Language,
    include_key_points: bool,
    source_digest: Option<u64>,
}

impl CacheKey {
    pub fn from_request(request: &SummaryRequest, source: Option<&str>) -> Self {
        let normalize = |value: &str| value.trim().to_lowercase();

        Self {
            book_title: normalize(request.book_title()),
            topic: normalize(request.topic()),
            course: request.course().map(normalize),
            language: request.language(),
            include_key_points: request.include_key_points(),
            source_digest: source.map(|text| {
                let mut hasher = DefaultHasher::new();
                text.trim().hash(&mut hasher);
                hasher.finish()
            }),
        }
    }
}

#[derive(Debug, Clone)]
struct CacheEntry {
    result: SummaryResult,
    cached_at: Instant,
}

pub struct SummaryCache {
    entries: Mutex<LruCache<CacheKey, CacheEntry>>,
    ttl: Duration,
}

impl SummaryCache {
    pub fn new(capacity: NonZeroUsize, ttl: Duration) -> Self {
        Self {
            entries: Mutex::new(LruCache::new(capacity)),
            ttl,
        }
    }

    /// `None` when the configured capacity is zero.
    pub fn from_config(config: &CacheConfig) -> Option<Self> {
        NonZeroUsize::new(config.capacity).map(|capacity| Self::new(capacity, config.ttl))
    }

    pub async fn get(&self, key: &CacheKey) -> Option<SummaryResult> {
        let mut entries = self.entries.lock().await;

        let expired = entries
            .peek(key)
            .is_some_and(|entry| entry.cached_at.elapsed() >= self.ttl);
        if expired {
            entries.pop(key);
            return None;
        }

        entries.get(key).map(|entry| entry.result.clone())
    }

    pub async fn put(&self, key: CacheKey, result: SummaryResult) {
        let entry = CacheEntry {
            result,
            cached_at: Instant::now(),
        };
        self.entries.lock().await.put(key, entry);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::GenerationPath;

    fn request(topic: &str) -> SummaryRequest {
        SummaryRequest::new("Historia", topic, Language::Es).unwrap()
    }

    fn result(summary: &str) -> SummaryResult {
        SummaryResult {
            summary: summary.to_string(),
            key_points: None,
            progress: "ok".to_string(),
            path: GenerationPath::Ai,
            provider: Some("openrouter".to_string()),
        }
    }

    fn cache(capacity: usize, ttl: Duration) -> SummaryCache {
        SummaryCache::new(NonZeroUsize::new(capacity).unwrap(), ttl)
    }

    #[tokio::test]
    async fn test_hit_after_put() {
        let cache = cache(4, Duration::from_secs(60));
        let key = CacheKey::from_request(&request("La Independencia"), None);

        assert!(cache.get(&key).await.is_none());
        cache.put(key.clone(), result("# Independencia")).await;
        assert_eq!(cache.get(&key).await.unwrap().summary, "# Independencia");
    }

    #[tokio::test]
    async fn test_expired_entry_is_dropped() {
        let cache = cache(4, Duration::ZERO);
        let key = CacheKey::from_request(&request("La Colonia"), None);

        cache.put(key.clone(), result("# Colonia")).await;
        assert!(cache.get(&key).await.is_none());
        assert!(cache.entries.lock().await.is_empty());
    }

    #[tokio::test]
    async fn test_least_recently_used_is_evicted() {
        let cache = cache(2, Duration::from_secs(60));
        let first = CacheKey::from_request(&request("Uno"), None);
        let second = CacheKey::from_request(&request("Dos"), None);
        let third = CacheKey::from_request(&request("Tres"), None);

        cache.put(first.clone(), result("1")).await;
        cache.put(second.clone(), result("2")).await;
        // Touch the first entry so the second becomes the eviction candidate
        assert!(cache.get(&first).await.is_some());
        cache.put(third.clone(), result("3")).await;

        assert!(cache.get(&first).await.is_some());
        assert!(cache.get(&second).await.is_none());
        assert!(cache.get(&third).await.is_some());
    }

    #[test]
    fn test_key_normalization() {
        let a = CacheKey::from_request(&request("  La Colonia "), None);
        let b = CacheKey::from_request(&request("la colonia"), None);
        assert_eq!(a, b);

        let with_source = CacheKey::from_request(&request("la colonia"), Some("texto del libro"));
        assert_ne!(a, with_source);

        let english = CacheKey::from_request(
            &SummaryRequest::new("Historia", "La Colonia", Language::En).unwrap(),
            None,
        );
        assert_ne!(a, english);
    }

    #[test]
    fn test_zero_capacity_disables_cache() {
        let config = CacheConfig {
            capacity: 0,
            ttl: Duration::from_secs(60),
        };
        assert!(SummaryCache::from_config(&config).is_none());
    }
}
