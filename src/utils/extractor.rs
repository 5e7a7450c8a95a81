//! 路径参数提取器
//!
//! 解析失败时直接返回统一的 BadRequest 响应信封，处理函数里不再重复校验。

use actix_web::{FromRequest, HttpRequest, HttpResponse, dev::Payload, error::InternalError};
use futures_util::future::{Ready, ready};
use once_cell::sync::Lazy;
use regex::Regex;

use crate::models::{ApiResponse, ErrorCode};

static FILE_TOKEN_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^[A-Za-z0-9-]{16,64}$").expect("file token regex"));

static SETTING_KEY_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^[a-z][a-z0-9_]*(\.[a-z][a-z0-9_]*)+$").expect("setting key regex"));

fn bad_path(message: String) -> actix_web::Error {
    let response = HttpResponse::BadRequest()
        .json(ApiResponse::<()>::error_empty(ErrorCode::BadRequest, &message));
    InternalError::from_response(message, response).into()
}

fn path_segment<'a>(req: &'a HttpRequest, name: &str) -> Result<&'a str, actix_web::Error> {
    req.match_info()
        .get(name)
        .ok_or_else(|| bad_path(format!("Missing path parameter '{name}'")))
}

/// 正整数 ID
pub fn parse_positive_id(raw: &str) -> Result<i64, String> {
    match raw.parse::<i64>() {
        Ok(id) if id > 0 => Ok(id),
        _ => Err(format!("Invalid id: '{raw}'")),
    }
}

macro_rules! define_id_extractor {
    ($name:ident, $param:literal) => {
        #[derive(Debug, Clone, Copy)]
        pub struct $name(pub i64);

        impl FromRequest for $name {
            type Error = actix_web::Error;
            type Future = Ready<Result<Self, Self::Error>>;

            fn from_request(req: &HttpRequest, _: &mut Payload) -> Self::Future {
                ready(
                    path_segment(req, $param)
                        .and_then(|raw| parse_positive_id(raw).map_err(bad_path))
                        .map($name),
                )
            }
        }
    };
}

define_id_extractor!(SafeIDI64, "id");
define_id_extractor!(SafeUserIdI64, "user_id");

/// 文件下载令牌
#[derive(Debug, Clone)]
pub struct SafeFileToken(pub String);

impl FromRequest for SafeFileToken {
    type Error = actix_web::Error;
    type Future = Ready<Result<Self, Self::Error>>;

    fn from_request(req: &HttpRequest, _: &mut Payload) -> Self::Future {
        ready(path_segment(req, "token").and_then(|raw| {
            if FILE_TOKEN_RE.is_match(raw) {
                Ok(SafeFileToken(raw.to_string()))
            } else {
                Err(bad_path("Invalid file token".to_string()))
            }
        }))
    }
}

/// `section.name` 形式的配置键
#[derive(Debug, Clone)]
pub struct SafeSettingKey(pub String);

impl FromRequest for SafeSettingKey {
    type Error = actix_web::Error;
    type Future = Ready<Result<Self, Self::Error>>;

    fn from_request(req: &HttpRequest, _: &mut Payload) -> Self::Future {
        ready(path_segment(req, "key").and_then(|raw| {
            if raw.len() <= 64 && SETTING_KEY_RE.is_match(raw) {
                Ok(SafeSettingKey(raw.to_string()))
            } else {
                Err(bad_path(format!("Invalid setting key: '{raw}'")))
            }
        }))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_positive_id() {
        assert_eq!(parse_positive_id("42"), Ok(42));
        assert!(parse_positive_id("0").is_err());
        assert!(parse_positive_id("-3").is_err());
        assert!(parse_positive_id("1; DROP TABLE").is_err());
    }

    #[test]
    fn test_patterns() {
        assert!(FILE_TOKEN_RE.is_match("3f2b8c1e-7d4a-4c55-9b1e-0a9d2e6f7c31"));
        assert!(!FILE_TOKEN_RE.is_match("../../etc/passwd"));
        assert!(SETTING_KEY_RE.is_match("fees.registration_threshold"));
        assert!(!SETTING_KEY_RE.is_match("fees"));
        assert!(!SETTING_KEY_RE.is_match("Fees.Threshold"));
    }
}
