//! 前端静态资源路由
//!
//! 使用 rust-embed 嵌入前端构建产物，支持：
//! - SPA fallback（未找到的路由返回 index.html）
//! - 自定义前端目录覆盖（开发用）
//! - PWA manifest 与 service worker 的专用响应头

use actix_web::{HttpRequest, HttpResponse, Result as ActixResult, web};
use rust_embed::Embed;
use std::path::Path;

use crate::config::AppConfig;
use crate::services::system::{DynamicConfig, versioned_cache_name};

/// 编译时从 frontend/dist/ 目录读取文件
#[derive(Embed)]
#[folder = "frontend/dist/"]
struct FrontendAssets;

const SERVICE_WORKER: &str = "sw.js";
const CACHE_NAME_PLACEHOLDER: &str = "%CACHE_NAME%";

fn get_mime_type(path: &str) -> &'static str {
    let ext = Path::new(path)
        .extension()
        .and_then(|s| s.to_str())
        .unwrap_or("");

    match ext {
        "html" => "text/html; charset=utf-8",
        "js" | "mjs" => "application/javascript; charset=utf-8",
        "css" => "text/css; charset=utf-8",
        "json" | "map" => "application/json; charset=utf-8",
        "webmanifest" => "application/manifest+json",
        "png" => "image/png",
        "jpg" | "jpeg" => "image/jpeg",
        "svg" => "image/svg+xml",
        "ico" => "image/x-icon",
        "woff" => "font/woff",
        "woff2" => "font/woff2",
        "webp" => "image/webp",
        "txt" => "text/plain; charset=utf-8",
        _ => "application/octet-stream",
    }
}

/// 带 hash 的静态资源可以长期缓存；sw.js 和 manifest 必须每次校验
fn cache_control(path: &str) -> &'static str {
    if path == SERVICE_WORKER || path.ends_with(".webmanifest") {
        return "no-cache";
    }

    let ext = Path::new(path)
        .extension()
        .and_then(|s| s.to_str())
        .unwrap_or("");

    match ext {
        "js" | "css" | "woff" | "woff2" | "png" | "jpg" | "jpeg" | "svg" | "webp" => {
            "public, max-age=31536000, immutable"
        }
        _ => "no-cache, no-store, must-revalidate",
    }
}

/// API 前缀下未匹配的路径不走 SPA fallback
fn is_api_path(path: &str) -> bool {
    path == "api" || path.starts_with("api/")
}

fn try_custom_file(path: &str) -> Option<Vec<u8>> {
    let custom_path = format!("./frontend-custom/{}", path);
    std::fs::read(&custom_path).ok()
}

fn get_embedded_file(path: &str) -> Option<Vec<u8>> {
    FrontendAssets::get(path).map(|f| f.data.to_vec())
}

/// 优先自定义目录，然后嵌入资源
fn get_file(path: &str) -> Option<Vec<u8>> {
    try_custom_file(path).or_else(|| get_embedded_file(path))
}

/// 把 sw.js 中的缓存名占位符替换为当前版本的缓存名
fn render_service_worker(content: &[u8], cache_name: &str) -> Vec<u8> {
    String::from_utf8_lossy(content)
        .replace(CACHE_NAME_PLACEHOLDER, cache_name)
        .into_bytes()
}

pub async fn serve_frontend(req: HttpRequest) -> ActixResult<HttpResponse> {
    let path = req.match_info().query("tail").trim_start_matches('/');

    if is_api_path(path) {
        return Ok(HttpResponse::NotFound().finish());
    }

    let (content, file_path) = if path.is_empty() {
        (get_file("index.html"), "index.html")
    } else if let Some(content) = get_file(path) {
        (Some(content), path)
    } else {
        // SPA fallback
        (get_file("index.html"), "index.html")
    };

    let Some(mut data) = content else {
        return Ok(HttpResponse::NotFound()
            .content_type("text/html; charset=utf-8")
            .body(
                r#"<!DOCTYPE html>
<html>
<head>
    <meta charset="utf-8">
    <title>Campus LMS</title>
</head>
<body>
    <h1>Frontend Not Found</h1>
    <p>The frontend assets have not been built or embedded.</p>
</body>
</html>"#,
            ));
    };

    if file_path == SERVICE_WORKER {
        let version = DynamicConfig::pwa_app_version().await;
        let cache_name = versioned_cache_name(&AppConfig::get().pwa.cache_name, &version);
        data = render_service_worker(&data, &cache_name);
    }

    let mut response = HttpResponse::Ok();
    response
        .content_type(get_mime_type(file_path))
        .insert_header(("Cache-Control", cache_control(file_path)));

    if file_path == SERVICE_WORKER {
        response.insert_header(("Service-Worker-Allowed", "/"));
    }

    Ok(response.body(data))
}

/// 所有非 API 路由都交给前端处理，必须最后注册
pub fn configure_frontend_routes(cfg: &mut web::ServiceConfig) {
    cfg.route("/{tail:.*}", web::get().to(serve_frontend));
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_get_mime_type() {
        assert_eq!(get_mime_type("index.html"), "text/html; charset=utf-8");
        assert_eq!(
            get_mime_type("sw.js"),
            "application/javascript; charset=utf-8"
        );
        assert_eq!(
            get_mime_type("manifest.webmanifest"),
            "application/manifest+json"
        );
        assert_eq!(get_mime_type("unknown.xyz"), "application/octet-stream");
    }

    #[test]
    fn test_cache_control() {
        assert_eq!(cache_control("sw.js"), "no-cache");
        assert_eq!(cache_control("manifest.webmanifest"), "no-cache");
        assert_eq!(
            cache_control("assets/app-1a2b.js"),
            "public, max-age=31536000, immutable"
        );
        assert_eq!(
            cache_control("index.html"),
            "no-cache, no-store, must-revalidate"
        );
    }

    #[test]
    fn test_is_api_path() {
        assert!(is_api_path("api/v1/unknown"));
        assert!(is_api_path("api"));
        assert!(!is_api_path("apiary"));
        assert!(!is_api_path("courses/12"));
    }

    #[test]
    fn test_render_service_worker() {
        let rendered = render_service_worker(
            b"const CACHE_NAME = '%CACHE_NAME%';",
            "lms-shell-v1.0.0",
        );
        assert_eq!(
            String::from_utf8(rendered).unwrap(),
            "const CACHE_NAME = 'lms-shell-v1.0.0';"
        );
    }
}
