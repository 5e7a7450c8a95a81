use async_trait::async_trait;
use moka::future::Cache;
use tracing::debug;

use crate::cache::{CacheResult, ObjectCache};
use crate::config::AppConfig;
use crate::declare_object_cache_plugin;

declare_object_cache_plugin!("moka", MokaCacheWrapper);

pub struct MokaCacheWrapper {
    inner: Cache<String, String>,
    ttl: u64,
}

impl MokaCacheWrapper {
    pub fn new() -> Result<Self, String> {
        let config = AppConfig::get();
        Ok(Self::with_capacity(
            config.cache.memory.max_capacity,
            config.cache.default_ttl,
        ))
    }

    pub fn with_capacity(max_capacity: u64, ttl: u64) -> Self {
        let inner = Cache::builder()
            .max_capacity(max_capacity)
            .time_to_live(std::time::Duration::from_secs(ttl.max(1)))
            .build();

        debug!(
            "MokaCacheWrapper initialized with max capacity: {}, ttl: {}s",
            max_capacity, ttl
        );
        Self { inner, ttl }
    }
}

#[async_trait]
impl ObjectCache for MokaCacheWrapper {
    async fn get_raw(&self, key: &str) -> CacheResult<String> {
        if let Some(value) = self.inner.get(key).await {
            debug!("Successfully retrieved key: {}", key);
            CacheResult::Found(value)
        } else {
            debug!("Key not found in cache: {}", key);
            CacheResult::NotFound
        }
    }

    async fn insert_raw(&self, key: String, value: String, ttl: u64) {
        // 单条 TTL 不生效，统一使用 cache.default_ttl
        if ttl != 0 && ttl != self.ttl {
            debug!("Moka cache ignores per-item TTL {}s for key {}", ttl, key);
        }
        self.inner.insert(key, value).await;
    }

    async fn remove(&self, key: &str) {
        self.inner.invalidate(key).await;
    }

    async fn invalidate_all(&self) {
        self.inner.invalidate_all();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_insert_get_remove() {
        let cache = MokaCacheWrapper::with_capacity(16, 60);
        cache
            .insert_raw("user:abc".into(), "{\"id\":1}".into(), 0)
            .await;
        assert_eq!(
            cache.get_raw("user:abc").await,
            CacheResult::Found("{\"id\":1}".to_string())
        );

        cache.remove("user:abc").await;
        assert_eq!(cache.get_raw("user:abc").await, CacheResult::NotFound);
    }

    #[tokio::test]
    async fn test_invalidate_all() {
        let cache = MokaCacheWrapper::with_capacity(16, 60);
        cache.insert_raw("a".into(), "1".into(), 0).await;
        cache.insert_raw("b".into(), "2".into(), 0).await;
        cache.invalidate_all().await;
        assert!(cache.get_raw("a").await.into_option().is_none());
        assert!(cache.get_raw("b").await.into_option().is_none());
    }
}
