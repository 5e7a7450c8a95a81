mod common;

use actix_web::http::StatusCode;
use actix_web::test;
use serde_json::Value;

use common::setup;

#[actix_web::test]
async fn test_service_worker_headers_and_cache_name() {
    let ctx = setup().await;
    let app = init_app!(ctx);

    let req = test::TestRequest::get().uri("/sw.js").to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::OK);
    assert_eq!(resp.headers().get("Cache-Control").unwrap(), "no-cache");
    assert_eq!(resp.headers().get("Service-Worker-Allowed").unwrap(), "/");

    let body = test::read_body(resp).await;
    let script = String::from_utf8(body.to_vec()).unwrap();
    assert!(!script.contains("%CACHE_NAME%"));
    assert!(script.contains("lms-shell-v1.0.0"));
    assert!(script.contains("SKIP_WAITING"));
}

#[actix_web::test]
async fn test_manifest_and_spa_fallback() {
    let ctx = setup().await;
    let app = init_app!(ctx);

    let req = test::TestRequest::get()
        .uri("/manifest.webmanifest")
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::OK);
    assert_eq!(
        resp.headers().get("Content-Type").unwrap(),
        "application/manifest+json"
    );

    let req = test::TestRequest::get().uri("/courses/42").to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::OK);
    assert!(
        resp.headers()
            .get("Content-Type")
            .unwrap()
            .to_str()
            .unwrap()
            .starts_with("text/html")
    );

    // 未知 API 不回落到前端
    let req = test::TestRequest::get().uri("/api/v1/unknown").to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::NOT_FOUND);
}

#[actix_web::test]
async fn test_pwa_version_endpoint() {
    let ctx = setup().await;
    let app = init_app!(ctx);

    let req = test::TestRequest::get()
        .uri("/api/v1/pwa/version")
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::OK);
    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body["data"]["version"], "1.0.0");
    assert_eq!(body["data"]["cache_name"], "lms-shell-v1.0.0");

    let req = test::TestRequest::get()
        .uri("/api/v1/system/settings")
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::OK);
    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body["data"]["system_name"], "Campus LMS");
}
