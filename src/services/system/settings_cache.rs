//! 数据库动态配置的进程内缓存
//!
//! 启动时整体加载，管理员修改后逐项热更新；读取不到时回落到静态配置。

use std::collections::HashMap;
use std::sync::OnceLock;
use tokio::sync::RwLock;

use crate::config::AppConfig;
use crate::models::system::entities::KnownSettingKey;

/// 动态配置缓存
static DYNAMIC_CONFIG: OnceLock<RwLock<DynamicConfigCache>> = OnceLock::new();

/// 动态配置缓存内部结构
#[derive(Debug, Default)]
struct DynamicConfigCache {
    settings: HashMap<String, String>,
}

/// 动态配置访问接口
pub struct DynamicConfig;

impl DynamicConfig {
    /// 初始化动态配置缓存
    /// 在应用启动时调用，从数据库加载配置
    pub async fn init(settings: Vec<(String, String)>) {
        let cache = DYNAMIC_CONFIG.get_or_init(|| RwLock::new(DynamicConfigCache::default()));

        let mut guard = cache.write().await;
        guard.settings.clear();
        for (key, value) in settings {
            guard.settings.insert(key, value);
        }

        tracing::info!(
            "动态配置缓存初始化完成，加载了 {} 个配置项",
            guard.settings.len()
        );
    }

    /// 更新单个配置项
    pub async fn update(key: &str, value: &str) {
        if let Some(cache) = DYNAMIC_CONFIG.get() {
            let mut guard = cache.write().await;
            guard.settings.insert(key.to_string(), value.to_string());
            tracing::debug!("动态配置更新: {} = {}", key, value);
        }
    }

    async fn get_string(key: &str) -> Option<String> {
        if let Some(cache) = DYNAMIC_CONFIG.get() {
            let guard = cache.read().await;
            return guard.settings.get(key).cloned();
        }
        None
    }

    async fn get_i64(key: &str) -> Option<i64> {
        Self::get_string(key).await.and_then(|v| v.parse().ok())
    }

    async fn get_f64(key: &str) -> Option<f64> {
        Self::get_string(key)
            .await
            .and_then(|v| v.parse::<f64>().ok())
            .filter(|v| v.is_finite())
    }

    async fn get_bool(key: &str) -> Option<bool> {
        Self::get_string(key).await.and_then(|v| v.parse().ok())
    }

    async fn get_json_array(key: &str) -> Option<Vec<String>> {
        Self::get_string(key)
            .await
            .and_then(|v| serde_json::from_str(&v).ok())
    }

    pub async fn system_name() -> String {
        Self::get_string(KnownSettingKey::SystemName.as_str())
            .await
            .unwrap_or_else(|| AppConfig::get().app.system_name.clone())
    }

    /// 是否开放学生自助注册，读取不到时视为关闭
    pub async fn allow_registration() -> bool {
        Self::get_bool(KnownSettingKey::AllowRegistration.as_str())
            .await
            .unwrap_or(false)
    }

    /// Access Token 有效期（分钟）
    pub async fn access_token_expiry() -> i64 {
        Self::get_i64(KnownSettingKey::AccessTokenExpiry.as_str())
            .await
            .unwrap_or_else(|| AppConfig::get().jwt.access_token_expiry)
    }

    /// Refresh Token 有效期（天）
    pub async fn refresh_token_expiry() -> i64 {
        Self::get_i64(KnownSettingKey::RefreshTokenExpiry.as_str())
            .await
            .unwrap_or_else(|| AppConfig::get().jwt.refresh_token_expiry)
    }

    pub async fn refresh_token_remember_me_expiry() -> i64 {
        Self::get_i64(KnownSettingKey::RefreshTokenRememberMeExpiry.as_str())
            .await
            .unwrap_or_else(|| AppConfig::get().jwt.refresh_token_remember_me_expiry)
    }

    /// 单文件大小上限（字节）
    pub async fn upload_max_size() -> usize {
        Self::get_i64(KnownSettingKey::UploadMaxSize.as_str())
            .await
            .map(|v| v as usize)
            .unwrap_or_else(|| AppConfig::get().upload.max_size)
    }

    pub async fn upload_allowed_types() -> Vec<String> {
        Self::get_json_array(KnownSettingKey::UploadAllowedTypes.as_str())
            .await
            .unwrap_or_else(|| AppConfig::get().upload.allowed_types.clone())
    }

    pub async fn cors_allowed_origins() -> Vec<String> {
        Self::get_json_array(KnownSettingKey::CorsAllowedOrigins.as_str())
            .await
            .unwrap_or_else(|| AppConfig::get().cors.allowed_origins.clone())
    }

    pub async fn cors_max_age() -> usize {
        Self::get_i64(KnownSettingKey::CorsMaxAge.as_str())
            .await
            .map(|v| v as usize)
            .unwrap_or_else(|| AppConfig::get().cors.max_age)
    }

    /// 选课所需的最低缴费百分比
    pub async fn registration_threshold() -> f64 {
        Self::get_f64(KnownSettingKey::RegistrationThreshold.as_str())
            .await
            .unwrap_or_else(|| AppConfig::get().fees.registration_threshold)
    }

    pub async fn simulated_success_rate() -> f64 {
        Self::get_f64(KnownSettingKey::PaymentSuccessRate.as_str())
            .await
            .unwrap_or_else(|| AppConfig::get().payment.simulated_success_rate)
            .clamp(0.0, 1.0)
    }

    pub async fn pwa_app_version() -> String {
        Self::get_string(KnownSettingKey::PwaAppVersion.as_str())
            .await
            .unwrap_or_else(|| AppConfig::get().pwa.app_version.clone())
    }
}
