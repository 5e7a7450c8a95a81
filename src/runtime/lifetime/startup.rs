use std::error::Error;
use std::sync::Arc;

use tracing::{debug, info, warn};

use crate::cache::{ObjectCache, register::get_object_cache_plugin};
use crate::config::AppConfig;
use crate::models::users::entities::{UserProfile, UserRole};
use crate::models::users::requests::CreateUserRequest;
use crate::services::system::DynamicConfig;
use crate::storage::Storage;
use crate::utils::password::hash_password;
use crate::utils::random_code::generate_random_code;

const FALLBACK_CACHE: &str = "moka";
const ADMIN_USERNAME: &str = "admin";

pub struct StartupContext {
    pub storage: Arc<dyn Storage>,
    pub cache: Arc<dyn ObjectCache>,
}

/// 按配置创建缓存，失败时回退到进程内缓存
async fn create_cache() -> Result<Arc<dyn ObjectCache>, Box<dyn Error>> {
    let cache_type = AppConfig::get().cache.cache_type.as_str();

    let mut candidates = vec![cache_type];
    if cache_type != FALLBACK_CACHE {
        candidates.push(FALLBACK_CACHE);
    }

    for name in candidates {
        let Some(constructor) = get_object_cache_plugin(name) else {
            warn!("Cache backend '{}' not found in registry", name);
            continue;
        };

        match constructor().await {
            Ok(cache) => {
                warn!("Cache backend initialized: {}", name);
                return Ok(Arc::from(cache));
            }
            Err(e) => warn!("Failed to create {} cache: {}", name, e),
        }
    }

    Err(format!("No cache backend available (tried: {cache_type})").into())
}

fn generate_random_password(length: usize) -> String {
    // 补齐密码策略要求的大小写与数字
    format!("{}Aa1", generate_random_code(length))
}

/// 从数据库加载动态配置；失败时用空配置，读取会回退到静态配置
async fn init_dynamic_config(storage: &Arc<dyn Storage>) {
    let settings = match storage.list_all_settings().await {
        Ok(settings) => settings.into_iter().map(|s| (s.key, s.value)).collect(),
        Err(e) => {
            warn!("Failed to load dynamic config from database: {}, using defaults", e);
            Vec::new()
        }
    };
    DynamicConfig::init(settings).await;
}

/// 用户表为空时创建初始管理员
async fn seed_admin(storage: &Arc<dyn Storage>) {
    match storage.count_users().await {
        Ok(0) => info!("No users found in database, creating default admin account..."),
        Ok(count) => {
            debug!("Database already has {} user(s), skipping admin seed", count);
            return;
        }
        Err(e) => {
            warn!("Failed to count users: {}, skipping admin seed", e);
            return;
        }
    }

    let password = std::env::var("ADMIN_PASSWORD").unwrap_or_else(|_| {
        let generated = generate_random_password(16);
        warn!("ADMIN_PASSWORD not set, generated admin password: {}", generated);
        generated
    });

    let password_hash = match hash_password(&password) {
        Ok(hash) => hash,
        Err(e) => {
            warn!("Failed to hash admin password: {}, skipping admin seed", e);
            return;
        }
    };

    let admin = CreateUserRequest {
        username: ADMIN_USERNAME.to_string(),
        email: "admin@localhost".to_string(),
        password: password_hash,
        role: UserRole::Admin,
        profile: UserProfile {
            profile_name: "Administrator".to_string(),
            avatar_url: None,
        },
    };

    match storage.create_user(admin).await {
        Ok(user) => info!(
            "Default admin account created (ID: {}, username: {})",
            user.id, user.username
        ),
        Err(e) => warn!("Failed to create admin account: {}", e),
    }
}

/// 准备服务器启动所需的存储、动态配置与缓存
pub async fn prepare_server_startup() -> Result<StartupContext, Box<dyn Error>> {
    rustls::crypto::ring::default_provider()
        .install_default()
        .map_err(|_| "Failed to install rustls crypto provider")?;

    if cfg!(debug_assertions) {
        crate::cache::register::debug_object_cache_registry();
    }

    let storage = crate::storage::create_storage().await?;
    warn!("Storage backend initialized and migrations completed");

    init_dynamic_config(&storage).await;
    seed_admin(&storage).await;

    let cache = create_cache().await?;

    Ok(StartupContext { storage, cache })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::utils::validate::validate_password;

    #[test]
    fn test_generated_password_passes_policy() {
        for _ in 0..20 {
            let password = generate_random_password(16);
            assert_eq!(password.len(), 19);
            assert!(validate_password(&password).is_ok());
        }
    }
}
