use async_trait::async_trait;
use redis::{AsyncCommands, aio::MultiplexedConnection};
use tokio::sync::OnceCell;
use tracing::{debug, error, warn};

use crate::cache::{CacheResult, ObjectCache};
use crate::config::AppConfig;
use crate::declare_object_cache_plugin;

declare_object_cache_plugin!("redis", RedisObjectCache);

/// 会话缓存的 Redis 实现；多个实例共享登录状态时使用
pub struct RedisObjectCache {
    client: redis::Client,
    // 多路复用连接可克隆，首次使用时建立
    connection: OnceCell<MultiplexedConnection>,
    key_prefix: String,
    default_ttl: u64,
}

impl RedisObjectCache {
    pub fn new() -> Result<Self, String> {
        let config = AppConfig::get();
        let redis_config = &config.cache.redis;

        let client = redis::Client::open(redis_config.url.as_str())
            .map_err(|e| format!("Invalid Redis URL '{}': {e}", redis_config.url))?;

        // 启动时同步探测一次，失败由调用方回退到 moka
        let mut probe = client
            .get_connection()
            .map_err(|e| format!("Redis connection failed: {e}"))?;
        redis::cmd("PING")
            .query::<String>(&mut probe)
            .map_err(|e| format!("Redis ping failed: {e}"))?;

        debug!(
            "Redis session cache ready at {} (prefix '{}', ttl {}s)",
            redis_config.url, redis_config.key_prefix, config.cache.default_ttl
        );

        Ok(Self {
            client,
            connection: OnceCell::new(),
            key_prefix: redis_config.key_prefix.clone(),
            default_ttl: config.cache.default_ttl,
        })
    }

    /// 取连接；失败记日志并返回 None，缓存降级为未命中
    async fn connection(&self) -> Option<MultiplexedConnection> {
        let conn = self
            .connection
            .get_or_try_init(|| self.client.get_multiplexed_async_connection())
            .await;
        match conn {
            Ok(conn) => Some(conn.clone()),
            Err(e) => {
                error!("Redis connection unavailable: {}", e);
                None
            }
        }
    }

    fn prefixed(&self, key: &str) -> String {
        format!("{}{}", self.key_prefix, key)
    }
}

#[async_trait]
impl ObjectCache for RedisObjectCache {
    async fn get_raw(&self, key: &str) -> CacheResult<String> {
        let Some(mut conn) = self.connection().await else {
            return CacheResult::ExistsButNoValue;
        };

        match conn.get::<_, Option<String>>(self.prefixed(key)).await {
            Ok(Some(data)) => CacheResult::Found(data),
            Ok(None) => CacheResult::NotFound,
            Err(e) => {
                error!("Redis GET '{}' failed: {}", key, e);
                CacheResult::ExistsButNoValue
            }
        }
    }

    async fn insert_raw(&self, key: String, value: String, ttl: u64) {
        let Some(mut conn) = self.connection().await else {
            return;
        };

        let ttl = if ttl == 0 { self.default_ttl } else { ttl };
        if let Err(e) = conn
            .set_ex::<_, _, ()>(self.prefixed(&key), value, ttl)
            .await
        {
            error!("Redis SETEX '{}' failed: {}", key, e);
        }
    }

    async fn remove(&self, key: &str) {
        let Some(mut conn) = self.connection().await else {
            return;
        };

        match conn.del::<_, i64>(self.prefixed(key)).await {
            Ok(0) => debug!("Redis DEL '{}': key absent", key),
            Ok(_) => debug!("Redis DEL '{}'", key),
            Err(e) => error!("Redis DEL '{}' failed: {}", key, e),
        }
    }

    async fn invalidate_all(&self) {
        let Some(mut conn) = self.connection().await else {
            return;
        };

        // 只清理本服务前缀下的键
        let pattern = format!("{}*", self.key_prefix);
        let keys: Vec<String> = match conn.keys(&pattern).await {
            Ok(keys) => keys,
            Err(e) => {
                warn!("Redis KEYS '{}' failed: {}", pattern, e);
                return;
            }
        };
        if keys.is_empty() {
            return;
        }

        let count = keys.len();
        match conn.del::<_, i64>(keys).await {
            Ok(_) => debug!("Invalidated {} session keys", count),
            Err(e) => error!("Redis bulk DEL failed: {}", e),
        }
    }
}
