use argon2::password_hash::{SaltString, rand_core::OsRng};
use argon2::{Algorithm, Argon2, Params, PasswordHash, PasswordHasher, PasswordVerifier, Version};

use crate::config::AppConfig;
use crate::errors::{LmsError, Result};

fn hasher() -> Result<Argon2<'static>> {
    let cfg = &AppConfig::get().argon2;
    let params = Params::new(cfg.memory_cost, cfg.time_cost, cfg.parallelism, None)
        .map_err(|e| LmsError::validation(format!("Invalid argon2 parameters: {e}")))?;
    Ok(Argon2::new(Algorithm::Argon2id, Version::V0x13, params))
}

/// Argon2id 哈希，返回 PHC 字符串
pub fn hash_password(password: &str) -> Result<String> {
    let salt = SaltString::generate(&mut OsRng);
    hasher()?
        .hash_password(password.as_bytes(), &salt)
        .map(|h| h.to_string())
        .map_err(|e| LmsError::validation(format!("Password hashing failed: {e}")))
}

/// 参数从 PHC 字符串中读取，调整配置不影响旧哈希
pub fn verify_password(password: &str, hash: &str) -> bool {
    PasswordHash::new(hash)
        .map(|parsed| {
            Argon2::default()
                .verify_password(password.as_bytes(), &parsed)
                .is_ok()
        })
        .unwrap_or(false)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_hash_and_verify() {
        let hash = hash_password("Lecture2025").unwrap();
        assert!(hash.starts_with("$argon2id$"));
        assert!(verify_password("Lecture2025", &hash));
        assert!(!verify_password("lecture2025", &hash));
    }

    #[test]
    fn test_malformed_hash() {
        assert!(!verify_password("anything", "plain-text"));
    }
}
