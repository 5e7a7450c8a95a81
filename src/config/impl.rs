use config::{Config, ConfigError, Environment, File};
use std::sync::OnceLock;

use super::AppConfig;

static APP_CONFIG: OnceLock<AppConfig> = OnceLock::new();

/// 部署时常用的扁平环境变量，优先级高于配置文件与 `LMS__` 前缀变量
const ENV_OVERRIDES: &[(&str, &str)] = &[
    ("app.environment", "APP_ENV"),
    ("app.log_level", "RUST_LOG"),
    ("server.host", "SERVER_HOST"),
    ("server.port", "SERVER_PORT"),
    ("server.unix_socket_path", "UNIX_SOCKET"),
    ("server.workers", "CPU_COUNT"),
    ("jwt.secret", "JWT_SECRET"),
    ("database.url", "DATABASE_URL"),
    ("cache.type", "CACHE_TYPE"),
    ("cache.redis.url", "REDIS_URL"),
    ("cache.redis.key_prefix", "REDIS_KEY_PREFIX"),
    ("cache.default_ttl", "REDIS_TTL"),
    ("upload.dir", "UPLOAD_DIR"),
];

impl AppConfig {
    /// 按 config.toml → config.{APP_ENV}.toml → 环境变量的顺序叠加
    pub fn load() -> Result<Self, ConfigError> {
        let environment = std::env::var("APP_ENV").unwrap_or_else(|_| "development".into());

        let mut builder = Config::builder()
            .add_source(File::with_name("config").required(false))
            .add_source(File::with_name(&format!("config.{environment}")).required(false))
            .add_source(
                Environment::with_prefix("LMS")
                    .separator("__")
                    .try_parsing(true),
            );

        for (key, var) in ENV_OVERRIDES {
            builder = builder.set_override_option(*key, std::env::var(var).ok())?;
        }

        let mut app_config: AppConfig = builder.build()?.try_deserialize()?;

        if app_config.server.workers == 0 {
            app_config.server.workers = num_cpus::get().min(app_config.server.max_workers.max(1));
        }
        app_config.validate()?;

        Ok(app_config)
    }

    fn validate(&self) -> Result<(), ConfigError> {
        if !(0.0..=100.0).contains(&self.fees.registration_threshold) {
            return Err(ConfigError::Message(
                "fees.registration_threshold must be within 0-100".into(),
            ));
        }
        if !(0.0..=1.0).contains(&self.payment.simulated_success_rate) {
            return Err(ConfigError::Message(
                "payment.simulated_success_rate must be within 0.0-1.0".into(),
            ));
        }
        if self.pwa.cache_name.trim().is_empty() {
            return Err(ConfigError::Message("pwa.cache_name must not be empty".into()));
        }
        if self.is_production() && self.jwt.secret.len() < 32 {
            return Err(ConfigError::Message(
                "jwt.secret must be at least 32 bytes in production".into(),
            ));
        }
        Ok(())
    }

    /// 全局配置；首次访问时加载，失败直接退出进程
    pub fn get() -> &'static AppConfig {
        APP_CONFIG.get_or_init(|| {
            Self::load().unwrap_or_else(|e| {
                eprintln!("Failed to load configuration: {e}");
                std::process::exit(1);
            })
        })
    }

    /// 启动时调用，只能调用一次
    pub fn init() -> Result<(), ConfigError> {
        let config = Self::load()?;
        APP_CONFIG
            .set(config)
            .map_err(|_| ConfigError::Message("Configuration already initialized".to_string()))
    }

    pub fn is_production(&self) -> bool {
        self.app.environment == "production"
    }

    pub fn is_development(&self) -> bool {
        self.app.environment == "development"
    }

    pub fn server_bind_address(&self) -> String {
        format!("{}:{}", self.server.host, self.server.port)
    }

    #[cfg(unix)]
    pub fn unix_socket_path(&self) -> Option<&str> {
        Some(self.server.unix_socket_path.as_str()).filter(|p| !p.is_empty())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_load_default_config() {
        let config = AppConfig::load().expect("config.toml should be loadable");
        assert!(config.server.workers > 0);
        assert!(config.server.workers <= config.server.max_workers.max(1));
        assert!((0.0..=100.0).contains(&config.fees.registration_threshold));
        assert!((0.0..=1.0).contains(&config.payment.simulated_success_rate));
        assert!(!config.pwa.cache_name.is_empty());
    }

    #[test]
    fn test_out_of_range_threshold_is_rejected() {
        let mut config = AppConfig::load().expect("config.toml should be loadable");
        config.fees.registration_threshold = 120.0;
        assert!(config.validate().is_err());
    }
}
