//! 缓存后端插件表
//!
//! 各后端通过 [`declare_object_cache_plugin!`](crate::declare_object_cache_plugin)
//! 在进程启动前登记构造函数，启动时按名称取用。

use std::collections::BTreeMap;
use std::future::Future;
use std::pin::Pin;
use std::sync::{Arc, PoisonError, RwLock};

use once_cell::sync::Lazy;

use crate::cache::ObjectCache;
use crate::errors::Result;

pub type BoxedObjectCacheFuture =
    Pin<Box<dyn Future<Output = Result<Box<dyn ObjectCache>>> + Send>>;
pub type ObjectCacheConstructor = Arc<dyn Fn() -> BoxedObjectCacheFuture + Send + Sync>;

// 登记只发生在 ctor 阶段，锁中毒时沿用已有内容
static OBJECT_CACHE_REGISTRY: Lazy<RwLock<BTreeMap<String, ObjectCacheConstructor>>> =
    Lazy::new(|| RwLock::new(BTreeMap::new()));

pub fn register_object_cache_plugin<S: Into<String>>(name: S, constructor: ObjectCacheConstructor) {
    OBJECT_CACHE_REGISTRY
        .write()
        .unwrap_or_else(PoisonError::into_inner)
        .insert(name.into(), constructor);
}

pub fn get_object_cache_plugin(name: &str) -> Option<ObjectCacheConstructor> {
    OBJECT_CACHE_REGISTRY
        .read()
        .unwrap_or_else(PoisonError::into_inner)
        .get(name)
        .cloned()
}

/// 已登记的后端名称（有序）
pub fn registered_backends() -> Vec<String> {
    OBJECT_CACHE_REGISTRY
        .read()
        .unwrap_or_else(PoisonError::into_inner)
        .keys()
        .cloned()
        .collect()
}

pub fn debug_object_cache_registry() {
    tracing::debug!("Registered cache backends: {:?}", registered_backends());
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_builtin_backends_registered() {
        let backends = registered_backends();
        assert!(backends.contains(&"moka".to_string()));
        assert!(backends.contains(&"redis".to_string()));
        assert!(get_object_cache_plugin("memcached").is_none());
    }
}
