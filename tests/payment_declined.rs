mod common;

use actix_web::http::StatusCode;
use actix_web::test;
use serde_json::{Value, json};

use common::setup_with;
use lms_server::models::ErrorCode;
use lms_server::models::users::entities::UserRole;

// 动态设置在进程内共享，网关拒绝的场景单独成一个测试二进制
#[actix_web::test]
async fn test_declined_payment_is_recorded_and_blocks_registration() {
    let ctx = setup_with(&[("payment.simulated_success_rate", "0")]).await;
    let (_, lecturer_auth) = ctx.login_as("lect_declined", UserRole::Lecturer).await;
    let (_, dean_auth) = ctx.login_as("dean_declined", UserRole::Dean).await;
    let (student, student_auth) = ctx.login_as("stud_declined", UserRole::Student).await;
    let app = init_app!(ctx);

    let req = test::TestRequest::post()
        .uri("/api/v1/fees")
        .insert_header(("Authorization", dean_auth.as_str()))
        .set_json(json!({ "student_id": student.id, "title": "Lab fee", "amount": 80.0 }))
        .to_request();
    let body: Value = test::call_and_read_body_json(&app, req).await;
    let fee_id = body["data"]["fee"]["id"].as_i64().unwrap();

    let req = test::TestRequest::post()
        .uri(&format!("/api/v1/fees/{fee_id}/payments"))
        .peer_addr("10.60.0.1:5000".parse().unwrap())
        .insert_header(("Authorization", student_auth.as_str()))
        .set_json(json!({ "amount": 80.0, "method": "bank_transfer" }))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::PAYMENT_REQUIRED);
    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body["code"], ErrorCode::PaymentFailed as i32);
    assert_eq!(body["data"]["payment"]["status"], "failed");
    assert_eq!(body["data"]["summary"]["paid"], 0.0);
    assert_eq!(body["data"]["summary"]["can_register"], false);

    // 失败的缴款也有记录
    let req = test::TestRequest::get()
        .uri("/api/v1/fees/payments")
        .insert_header(("Authorization", student_auth.as_str()))
        .to_request();
    let body: Value = test::call_and_read_body_json(&app, req).await;
    let items = body["data"]["items"].as_array().unwrap();
    assert_eq!(items.len(), 1);
    assert_eq!(items[0]["status"], "failed");
    assert_eq!(items[0]["amount"], 80.0);

    let req = test::TestRequest::get()
        .uri("/api/v1/fees/summary")
        .insert_header(("Authorization", student_auth.as_str()))
        .to_request();
    let body: Value = test::call_and_read_body_json(&app, req).await;
    assert_eq!(body["data"]["paid"], 0.0);
    assert_eq!(body["data"]["balance"], 80.0);

    // 学生收到失败通知
    let req = test::TestRequest::get()
        .uri("/api/v1/notifications/unread-count")
        .insert_header(("Authorization", student_auth.as_str()))
        .to_request();
    let body: Value = test::call_and_read_body_json(&app, req).await;
    assert_eq!(body["data"]["unread_count"], 1);

    let req = test::TestRequest::post()
        .uri("/api/v1/courses")
        .insert_header(("Authorization", lecturer_auth.as_str()))
        .set_json(json!({ "code": "CHE-120", "title": "Organic Chemistry", "credits": 4 }))
        .to_request();
    let body: Value = test::call_and_read_body_json(&app, req).await;
    let course_id = body["data"]["course"]["id"].as_i64().unwrap();

    let req = test::TestRequest::post()
        .uri(&format!("/api/v1/courses/{course_id}/enrollment"))
        .insert_header(("Authorization", student_auth.as_str()))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::FORBIDDEN);
    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body["code"], ErrorCode::FeeRegistrationBlocked as i32);
}
