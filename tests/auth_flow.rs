mod common;

use actix_web::http::StatusCode;
use actix_web::test;
use serde_json::{Value, json};

use common::{PASSWORD, setup};
use lms_server::models::users::entities::UserRole;

#[actix_web::test]
async fn test_self_registration_always_creates_student() {
    let ctx = setup().await;
    let app = init_app!(ctx);

    let req = test::TestRequest::post()
        .uri("/api/v1/auth/register")
        .peer_addr("10.20.0.1:5000".parse().unwrap())
        .set_json(json!({
            "username": "new_student",
            "email": "new_student@campus.test",
            "password": "Enrol2024x",
            "role": "admin"
        }))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::CREATED);

    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body["data"]["user"]["role"], "student");
    assert_eq!(body["data"]["user"]["status"], "active");
    assert!(body["data"]["user"].get("password_hash").is_none());
}

#[actix_web::test]
async fn test_registration_rejects_weak_password() {
    let ctx = setup().await;
    let app = init_app!(ctx);

    let req = test::TestRequest::post()
        .uri("/api/v1/auth/register")
        .peer_addr("10.20.0.2:5000".parse().unwrap())
        .set_json(json!({
            "username": "weakling",
            "email": "weakling@campus.test",
            "password": "password"
        }))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
}

#[actix_web::test]
async fn test_login_returns_role_dashboard() {
    let ctx = setup().await;
    ctx.create_user("lecturer_one", UserRole::Lecturer).await;
    let app = init_app!(ctx);

    let req = test::TestRequest::post()
        .uri("/api/v1/auth/login")
        .peer_addr("10.20.0.3:5000".parse().unwrap())
        .set_json(json!({ "username": "lecturer_one", "password": PASSWORD }))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::OK);
    assert!(resp.response().cookies().any(|c| c.name() == "refresh_token"));

    let body: Value = test::read_body_json(resp).await;
    let data = &body["data"];
    assert!(data["access_token"].as_str().is_some_and(|t| !t.is_empty()));
    assert_eq!(data["user"]["role"], "lecturer");

    let permissions: Vec<&str> = data["dashboard"]["permissions"]
        .as_array()
        .unwrap()
        .iter()
        .filter_map(Value::as_str)
        .collect();
    assert!(permissions.contains(&"grades:manage"));
    assert!(!permissions.contains(&"fees:pay"));
}

#[actix_web::test]
async fn test_login_with_wrong_password_is_unauthorized() {
    let ctx = setup().await;
    ctx.create_user("student_wrong", UserRole::Student).await;
    let app = init_app!(ctx);

    let req = test::TestRequest::post()
        .uri("/api/v1/auth/login")
        .peer_addr("10.20.0.4:5000".parse().unwrap())
        .set_json(json!({ "username": "student_wrong", "password": "Wrong2024x" }))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);
}

#[actix_web::test]
async fn test_protected_routes_require_token_and_role() {
    let ctx = setup().await;
    let (_, student_auth) = ctx.login_as("student_guard", UserRole::Student).await;
    let app = init_app!(ctx);

    let req = test::TestRequest::get().uri("/api/v1/courses").to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);

    let req = test::TestRequest::get()
        .uri("/api/v1/users")
        .insert_header(("Authorization", student_auth.as_str()))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::FORBIDDEN);

    let req = test::TestRequest::get()
        .uri("/api/v1/dashboard/permissions/check?permission=fees:pay")
        .insert_header(("Authorization", student_auth.as_str()))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::OK);
    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body["data"]["allowed"], true);
}
