use actix_web::cookie::{Cookie, SameSite};
use chrono::TimeDelta;
use jsonwebtoken::{DecodingKey, EncodingKey, Header, Validation, decode, encode};
use serde::{Deserialize, Serialize};

use crate::config::AppConfig;
use crate::errors::{LmsError, Result};
use crate::models::users::entities::UserRole;

pub const REFRESH_TOKEN_COOKIE: &str = "refresh_token";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TokenKind {
    Access,
    Refresh,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Claims {
    /// 用户 ID
    pub sub: String,
    pub role: UserRole,
    pub token_type: TokenKind,
    pub exp: usize,
    pub iat: usize,
}

impl Claims {
    pub fn user_id(&self) -> Option<i64> {
        self.sub.parse().ok()
    }
}

#[derive(Debug, Serialize, Deserialize)]
pub struct TokenPair {
    pub access_token: String,
    pub refresh_token: String,
}

pub struct JwtUtils;

impl JwtUtils {
    fn secret() -> &'static str {
        &AppConfig::get().jwt.secret
    }

    fn sign(user_id: i64, role: UserRole, kind: TokenKind, ttl: TimeDelta) -> Result<String> {
        let now = chrono::Utc::now();
        let claims = Claims {
            sub: user_id.to_string(),
            role,
            token_type: kind,
            exp: (now + ttl).timestamp() as usize,
            iat: now.timestamp() as usize,
        };

        encode(
            &Header::default(),
            &claims,
            &EncodingKey::from_secret(Self::secret().as_bytes()),
        )
        .map_err(|e| LmsError::authentication(format!("Failed to sign token: {e}")))
    }

    /// 签发 Access Token，有效期取静态配置
    pub fn generate_access_token(user_id: i64, role: UserRole) -> Result<String> {
        let minutes = AppConfig::get().jwt.access_token_expiry;
        Self::generate_access_token_with_expiry(user_id, role, TimeDelta::minutes(minutes))
    }

    pub fn generate_access_token_with_expiry(
        user_id: i64,
        role: UserRole,
        ttl: TimeDelta,
    ) -> Result<String> {
        Self::sign(user_id, role, TokenKind::Access, ttl)
    }

    pub fn generate_refresh_token(
        user_id: i64,
        role: UserRole,
        ttl: Option<TimeDelta>,
    ) -> Result<String> {
        let ttl =
            ttl.unwrap_or_else(|| TimeDelta::days(AppConfig::get().jwt.refresh_token_expiry));
        Self::sign(user_id, role, TokenKind::Refresh, ttl)
    }

    pub fn generate_token_pair(
        user_id: i64,
        role: UserRole,
        refresh_ttl: Option<TimeDelta>,
    ) -> Result<TokenPair> {
        Ok(TokenPair {
            access_token: Self::generate_access_token(user_id, role)?,
            refresh_token: Self::generate_refresh_token(user_id, role, refresh_ttl)?,
        })
    }

    fn verify(token: &str, expected: TokenKind) -> Result<Claims> {
        let claims = decode::<Claims>(
            token,
            &DecodingKey::from_secret(Self::secret().as_bytes()),
            &Validation::default(),
        )
        .map(|data| data.claims)
        .map_err(|e| LmsError::authentication(format!("Invalid token: {e}")))?;

        if claims.token_type != expected {
            return Err(LmsError::authentication("Unexpected token type"));
        }
        Ok(claims)
    }

    pub fn verify_access_token(token: &str) -> Result<Claims> {
        Self::verify(token, TokenKind::Access)
    }

    pub fn verify_refresh_token(token: &str) -> Result<Claims> {
        Self::verify(token, TokenKind::Refresh)
    }

    /// 构造 HttpOnly 的 refresh cookie，max_age 与 token 有效期一致
    pub fn refresh_token_cookie(refresh_token: &str, max_age: TimeDelta) -> Cookie<'static> {
        Cookie::build(REFRESH_TOKEN_COOKIE, refresh_token.to_string())
            .path("/")
            .max_age(actix_web::cookie::time::Duration::seconds(
                max_age.num_seconds(),
            ))
            .same_site(SameSite::Strict)
            .http_only(true)
            .secure(AppConfig::get().is_production())
            .finish()
    }

    /// 注销时下发的过期 cookie
    pub fn expired_refresh_token_cookie() -> Cookie<'static> {
        Self::refresh_token_cookie("", TimeDelta::zero())
    }

    pub fn extract_refresh_token(req: &actix_web::HttpRequest) -> Option<String> {
        req.cookie(REFRESH_TOKEN_COOKIE)
            .map(|c| c.value().to_string())
            .filter(|v| !v.is_empty())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_access_token_round_trip() {
        let token = JwtUtils::generate_access_token(42, UserRole::Lecturer).unwrap();
        let claims = JwtUtils::verify_access_token(&token).unwrap();
        assert_eq!(claims.user_id(), Some(42));
        assert_eq!(claims.role, UserRole::Lecturer);
        assert_eq!(claims.token_type, TokenKind::Access);
    }

    #[test]
    fn test_token_kind_is_enforced() {
        let pair = JwtUtils::generate_token_pair(7, UserRole::Student, None).unwrap();
        assert!(JwtUtils::verify_refresh_token(&pair.access_token).is_err());
        assert!(JwtUtils::verify_access_token(&pair.refresh_token).is_err());
        assert!(JwtUtils::verify_refresh_token(&pair.refresh_token).is_ok());
    }

    #[test]
    fn test_expired_token_rejected() {
        let token = JwtUtils::generate_access_token_with_expiry(
            1,
            UserRole::Admin,
            TimeDelta::minutes(-10),
        )
        .unwrap();
        assert!(JwtUtils::verify_access_token(&token).is_err());
    }

    #[test]
    fn test_garbage_token_rejected() {
        assert!(JwtUtils::verify_access_token("not-a-jwt").is_err());
    }
}
