//! 查询串反序列化辅助
//!
//! `#[serde(flatten)]` 会把查询参数统一缓冲成字符串，数字和布尔字段需要手动解析。

use serde::{Deserialize, Deserializer};

#[derive(Deserialize)]
#[serde(untagged)]
enum StringOr<T> {
    Value(T),
    Str(String),
}

/// 缺省或空串时返回 `default`
pub fn deserialize_i64_or<'de, D>(deserializer: D, default: i64) -> Result<i64, D::Error>
where
    D: Deserializer<'de>,
{
    deserialize_optional_i64(deserializer).map(|value| value.unwrap_or(default))
}

pub fn deserialize_optional_i64<'de, D>(deserializer: D) -> Result<Option<i64>, D::Error>
where
    D: Deserializer<'de>,
{
    match Option::<StringOr<i64>>::deserialize(deserializer)? {
        None => Ok(None),
        Some(StringOr::Value(v)) => Ok(Some(v)),
        Some(StringOr::Str(s)) if s.trim().is_empty() => Ok(None),
        Some(StringOr::Str(s)) => s
            .trim()
            .parse()
            .map(Some)
            .map_err(|_| serde::de::Error::custom(format!("invalid integer: '{s}'"))),
    }
}

pub fn deserialize_optional_bool<'de, D>(deserializer: D) -> Result<Option<bool>, D::Error>
where
    D: Deserializer<'de>,
{
    match Option::<StringOr<bool>>::deserialize(deserializer)? {
        None => Ok(None),
        Some(StringOr::Value(v)) => Ok(Some(v)),
        Some(StringOr::Str(s)) => match s.trim().to_ascii_lowercase().as_str() {
            "" => Ok(None),
            "true" | "1" | "yes" => Ok(Some(true)),
            "false" | "0" | "no" => Ok(Some(false)),
            _ => Err(serde::de::Error::custom(format!("invalid boolean: '{s}'"))),
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::PaginationQuery;
    use actix_web::web::Query;

    #[derive(Debug, Deserialize)]
    struct Params {
        #[serde(flatten)]
        pagination: PaginationQuery,
        #[serde(default, deserialize_with = "deserialize_optional_i64")]
        course_id: Option<i64>,
        #[serde(default, deserialize_with = "deserialize_optional_bool")]
        mine: Option<bool>,
    }

    #[test]
    fn test_flattened_query_string() {
        let params: Params =
            Query::<Params>::from_query("page=2&size=5&course_id=42&mine=true")
                .unwrap()
                .into_inner();
        assert_eq!(params.pagination.page, 2);
        assert_eq!(params.pagination.size, 5);
        assert_eq!(params.course_id, Some(42));
        assert_eq!(params.mine, Some(true));
    }

    #[test]
    fn test_missing_and_empty_values() {
        let params = Query::<Params>::from_query("course_id=").unwrap().into_inner();
        assert_eq!(params.pagination.page, 1);
        assert_eq!(params.course_id, None);
        assert_eq!(params.mine, None);
    }

    #[test]
    fn test_invalid_integer() {
        assert!(Query::<Params>::from_query("course_id=abc").is_err());
    }
}
