mod common;

use actix_web::http::{StatusCode, header};
use actix_web::test;
use serde_json::Value;

use common::setup;
use lms_server::models::ErrorCode;
use lms_server::models::users::entities::UserRole;

const BOUNDARY: &str = "----lms-test-boundary";

/// 只含一个 `file` 字段的 multipart 请求体
fn multipart_body(file_name: &str, content_type: &str, content: &[u8]) -> Vec<u8> {
    let mut body = Vec::new();
    body.extend_from_slice(format!("--{BOUNDARY}\r\n").as_bytes());
    body.extend_from_slice(
        format!(
            "Content-Disposition: form-data; name=\"file\"; filename=\"{file_name}\"\r\n\
             Content-Type: {content_type}\r\n\r\n"
        )
        .as_bytes(),
    );
    body.extend_from_slice(content);
    body.extend_from_slice(format!("\r\n--{BOUNDARY}--\r\n").as_bytes());
    body
}

fn upload_request(auth: &str, body: Vec<u8>) -> test::TestRequest {
    test::TestRequest::post()
        .uri("/api/v1/files/upload")
        .peer_addr("10.40.0.1:5000".parse().unwrap())
        .insert_header(("Authorization", auth))
        .insert_header((
            header::CONTENT_TYPE,
            format!("multipart/form-data; boundary={BOUNDARY}"),
        ))
        .set_payload(body)
}

#[actix_web::test]
async fn test_upload_and_download_round_trip() {
    let ctx = setup().await;
    let (_, student_auth) = ctx.login_as("stud_files", UserRole::Student).await;
    let app = init_app!(ctx);

    let content = b"%PDF-1.7\n1 0 obj << /Type /Catalog >> endobj\n%%EOF\n";
    let req = upload_request(
        &student_auth,
        multipart_body("../essay.pdf", "application/pdf", content),
    )
    .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::OK);
    let body: Value = test::read_body_json(resp).await;
    // 路径部分被去掉
    assert_eq!(body["data"]["file_name"], "essay.pdf");
    assert_eq!(body["data"]["size"], content.len() as i64);
    let token = body["data"]["download_token"].as_str().unwrap().to_string();

    let req = test::TestRequest::get()
        .uri(&format!("/api/v1/files/download/{token}"))
        .insert_header(("Authorization", student_auth.as_str()))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::OK);
    assert_eq!(
        resp.headers().get(header::CONTENT_DISPOSITION).unwrap(),
        "attachment; filename=\"essay.pdf\""
    );
    assert_eq!(
        resp.headers().get(header::CONTENT_TYPE).unwrap(),
        "application/pdf"
    );
    let bytes = test::read_body(resp).await;
    assert_eq!(&bytes[..], content);

    // 下载同样需要登录
    let req = test::TestRequest::get()
        .uri(&format!("/api/v1/files/download/{token}"))
        .to_request();
    assert_eq!(
        test::call_service(&app, req).await.status(),
        StatusCode::UNAUTHORIZED
    );

    let req = test::TestRequest::get()
        .uri(&format!(
            "/api/v1/files/download/{}",
            uuid::Uuid::new_v4().simple()
        ))
        .insert_header(("Authorization", student_auth.as_str()))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::NOT_FOUND);
    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body["code"], ErrorCode::FileNotFound as i32);
}

#[actix_web::test]
async fn test_upload_rejects_disguised_and_disallowed_files() {
    let ctx = setup().await;
    let (_, student_auth) = ctx.login_as("stud_disguise", UserRole::Student).await;
    let app = init_app!(ctx);

    // 扩展名是 pdf，内容是可执行文件
    let req = upload_request(
        &student_auth,
        multipart_body("notes.pdf", "application/pdf", b"MZ\x90\x00\x03\x00\x00\x00"),
    )
    .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body["code"], ErrorCode::FileTypeNotAllowed as i32);

    let req = upload_request(
        &student_auth,
        multipart_body("setup.exe", "application/octet-stream", b"MZ\x90\x00"),
    )
    .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body["code"], ErrorCode::FileTypeNotAllowed as i32);

    // 文本文件只要求不含 NUL
    let req = upload_request(
        &student_auth,
        multipart_body("answers.txt", "text/plain", b"1. a\n2. c\n"),
    )
    .to_request();
    assert_eq!(test::call_service(&app, req).await.status(), StatusCode::OK);

    let req = test::TestRequest::post()
        .uri("/api/v1/files/upload")
        .insert_header((
            header::CONTENT_TYPE,
            format!("multipart/form-data; boundary={BOUNDARY}"),
        ))
        .set_payload(multipart_body("answers.txt", "text/plain", b"x"))
        .to_request();
    assert_eq!(
        test::call_service(&app, req).await.status(),
        StatusCode::UNAUTHORIZED
    );
}
