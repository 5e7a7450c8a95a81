use serde::{Deserialize, Serialize};
use ts_rs::TS;

/// 配置值类型
#[derive(Debug, Clone, Serialize, PartialEq, TS)]
#[serde(rename_all = "snake_case")]
#[ts(export, export_to = "../frontend/src/types/generated/system.ts")]
pub enum SettingValueType {
    String,
    Integer,
    Float,
    Boolean,
    JsonArray,
}

impl<'de> Deserialize<'de> for SettingValueType {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        let s = String::deserialize(deserializer)?;
        s.parse().map_err(|_| {
            serde::de::Error::custom(format!(
                "无效的配置值类型: '{s}'. 支持的类型: string, integer, float, boolean, json_array"
            ))
        })
    }
}

impl std::fmt::Display for SettingValueType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            SettingValueType::String => write!(f, "string"),
            SettingValueType::Integer => write!(f, "integer"),
            SettingValueType::Float => write!(f, "float"),
            SettingValueType::Boolean => write!(f, "boolean"),
            SettingValueType::JsonArray => write!(f, "json_array"),
        }
    }
}

impl std::str::FromStr for SettingValueType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "string" => Ok(SettingValueType::String),
            "integer" => Ok(SettingValueType::Integer),
            "float" => Ok(SettingValueType::Float),
            "boolean" => Ok(SettingValueType::Boolean),
            "json_array" => Ok(SettingValueType::JsonArray),
            _ => Err(format!("Invalid setting value type: {s}")),
        }
    }
}

/// 已知配置键
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum KnownSettingKey {
    SystemName,
    AllowRegistration,
    AccessTokenExpiry,
    RefreshTokenExpiry,
    RefreshTokenRememberMeExpiry,
    UploadMaxSize,
    UploadAllowedTypes,
    CorsAllowedOrigins,
    CorsMaxAge,
    RegistrationThreshold,
    PaymentSuccessRate,
    PwaAppVersion,
}

impl KnownSettingKey {
    pub const ALL: [KnownSettingKey; 12] = [
        KnownSettingKey::SystemName,
        KnownSettingKey::AllowRegistration,
        KnownSettingKey::AccessTokenExpiry,
        KnownSettingKey::RefreshTokenExpiry,
        KnownSettingKey::RefreshTokenRememberMeExpiry,
        KnownSettingKey::UploadMaxSize,
        KnownSettingKey::UploadAllowedTypes,
        KnownSettingKey::CorsAllowedOrigins,
        KnownSettingKey::CorsMaxAge,
        KnownSettingKey::RegistrationThreshold,
        KnownSettingKey::PaymentSuccessRate,
        KnownSettingKey::PwaAppVersion,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            KnownSettingKey::SystemName => "app.system_name",
            KnownSettingKey::AllowRegistration => "auth.allow_registration",
            KnownSettingKey::AccessTokenExpiry => "jwt.access_token_expiry",
            KnownSettingKey::RefreshTokenExpiry => "jwt.refresh_token_expiry",
            KnownSettingKey::RefreshTokenRememberMeExpiry => "jwt.refresh_token_remember_me_expiry",
            KnownSettingKey::UploadMaxSize => "upload.max_size",
            KnownSettingKey::UploadAllowedTypes => "upload.allowed_types",
            KnownSettingKey::CorsAllowedOrigins => "cors.allowed_origins",
            KnownSettingKey::CorsMaxAge => "cors.max_age",
            KnownSettingKey::RegistrationThreshold => "fees.registration_threshold",
            KnownSettingKey::PaymentSuccessRate => "payment.simulated_success_rate",
            KnownSettingKey::PwaAppVersion => "pwa.app_version",
        }
    }

    pub fn value_type(&self) -> SettingValueType {
        match self {
            KnownSettingKey::SystemName | KnownSettingKey::PwaAppVersion => {
                SettingValueType::String
            }
            KnownSettingKey::AllowRegistration => SettingValueType::Boolean,
            KnownSettingKey::AccessTokenExpiry
            | KnownSettingKey::RefreshTokenExpiry
            | KnownSettingKey::RefreshTokenRememberMeExpiry
            | KnownSettingKey::UploadMaxSize
            | KnownSettingKey::CorsMaxAge => SettingValueType::Integer,
            KnownSettingKey::UploadAllowedTypes | KnownSettingKey::CorsAllowedOrigins => {
                SettingValueType::JsonArray
            }
            KnownSettingKey::RegistrationThreshold | KnownSettingKey::PaymentSuccessRate => {
                SettingValueType::Float
            }
        }
    }

    /// 按键的类型和取值范围校验新值
    pub fn validate(&self, value: &str) -> Result<(), String> {
        let value = value.trim();
        match self.value_type() {
            SettingValueType::String => {
                if value.is_empty() {
                    return Err(format!("{} must not be empty", self.as_str()));
                }
            }
            SettingValueType::Boolean => {
                value
                    .parse::<bool>()
                    .map_err(|_| format!("{} must be true or false", self.as_str()))?;
            }
            SettingValueType::Integer => {
                let v = value
                    .parse::<i64>()
                    .map_err(|_| format!("{} must be an integer", self.as_str()))?;
                if v <= 0 {
                    return Err(format!("{} must be positive", self.as_str()));
                }
            }
            SettingValueType::Float => {
                let v = value
                    .parse::<f64>()
                    .map_err(|_| format!("{} must be a number", self.as_str()))?;
                let (min, max) = match self {
                    KnownSettingKey::PaymentSuccessRate => (0.0, 1.0),
                    _ => (0.0, 100.0),
                };
                if !v.is_finite() || v < min || v > max {
                    return Err(format!(
                        "{} must be between {} and {}",
                        self.as_str(),
                        min,
                        max
                    ));
                }
            }
            SettingValueType::JsonArray => {
                serde_json::from_str::<Vec<String>>(value)
                    .map_err(|_| format!("{} must be a JSON array of strings", self.as_str()))?;
            }
        }
        Ok(())
    }
}

impl std::str::FromStr for KnownSettingKey {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        KnownSettingKey::ALL
            .iter()
            .find(|k| k.as_str() == s)
            .copied()
            .ok_or_else(|| format!("Unknown setting key: {s}"))
    }
}

/// 系统设置实体
#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/system.ts")]
pub struct SystemSetting {
    pub key: String,
    pub value: String,
    pub value_type: SettingValueType,
    pub description: Option<String>,
    pub updated_at: chrono::DateTime<chrono::Utc>,
    pub updated_by: Option<i64>,
}

/// 设置审计日志实体
#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/system.ts")]
pub struct SettingAudit {
    pub id: i64,
    pub setting_key: String,
    pub old_value: Option<String>,
    pub new_value: String,
    pub changed_by: i64,
    pub changed_at: chrono::DateTime<chrono::Utc>,
    pub ip_address: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_known_keys_parse() {
        for key in KnownSettingKey::ALL {
            assert_eq!(key.as_str().parse::<KnownSettingKey>().unwrap(), key);
        }
        assert!("app.unknown".parse::<KnownSettingKey>().is_err());
    }

    #[test]
    fn test_validate_threshold() {
        let key = KnownSettingKey::RegistrationThreshold;
        assert!(key.validate("60").is_ok());
        assert!(key.validate("0").is_ok());
        assert!(key.validate("100").is_ok());
        assert!(key.validate("100.5").is_err());
        assert!(key.validate("-1").is_err());
        assert!(key.validate("abc").is_err());
    }

    #[test]
    fn test_validate_other_types() {
        assert!(KnownSettingKey::PaymentSuccessRate.validate("0.75").is_ok());
        assert!(KnownSettingKey::PaymentSuccessRate.validate("1.5").is_err());
        assert!(KnownSettingKey::AllowRegistration.validate("false").is_ok());
        assert!(KnownSettingKey::AllowRegistration.validate("maybe").is_err());
        assert!(KnownSettingKey::UploadMaxSize.validate("0").is_err());
        assert!(KnownSettingKey::UploadAllowedTypes
            .validate(r#"[".pdf",".png"]"#)
            .is_ok());
        assert!(KnownSettingKey::UploadAllowedTypes.validate(".pdf").is_err());
        assert!(KnownSettingKey::SystemName.validate("  ").is_err());
    }
}
