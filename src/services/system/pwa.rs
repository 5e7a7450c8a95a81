use actix_web::{HttpResponse, Result as ActixResult};

use super::{DynamicConfig, SystemService};
use crate::models::{ApiResponse, pwa::PwaVersionResponse};

/// 缓存名带上版本号，版本变化时旧缓存会在 activate 阶段被清理
pub fn versioned_cache_name(prefix: &str, version: &str) -> String {
    format!("{prefix}-v{version}")
}

pub async fn pwa_version(service: &SystemService) -> ActixResult<HttpResponse> {
    let version = DynamicConfig::pwa_app_version().await;
    let cache_name = versioned_cache_name(&service.get_config().pwa.cache_name, &version);

    Ok(HttpResponse::Ok()
        .insert_header(("Cache-Control", "no-cache"))
        .json(ApiResponse::success(
            PwaVersionResponse {
                version,
                cache_name,
            },
            "Version retrieved successfully",
        )))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_versioned_cache_name() {
        assert_eq!(versioned_cache_name("lms-shell", "1.2.0"), "lms-shell-v1.2.0");
    }
}
