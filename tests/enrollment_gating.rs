mod common;

use actix_web::http::StatusCode;
use actix_web::test;
use serde_json::{Value, json};

use common::setup;
use lms_server::models::ErrorCode;
use lms_server::models::users::entities::UserRole;

#[actix_web::test]
async fn test_fee_threshold_gates_course_enrollment() {
    let ctx = setup().await;
    let (_, lecturer_auth) = ctx.login_as("lect_gate", UserRole::Lecturer).await;
    let (_, dean_auth) = ctx.login_as("dean_gate", UserRole::Dean).await;
    let (student, student_auth) = ctx.login_as("stud_gate", UserRole::Student).await;
    let app = init_app!(ctx);

    // 讲师开课，课程代码规范化为大写
    let req = test::TestRequest::post()
        .uri("/api/v1/courses")
        .insert_header(("Authorization", lecturer_auth.as_str()))
        .set_json(json!({ "code": "cs-101", "title": "Intro to Computing", "credits": 3 }))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::CREATED);
    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body["data"]["course"]["code"], "CS-101");
    let course_id = body["data"]["course"]["id"].as_i64().unwrap();

    // 院长为学生开具 100 的学费
    let req = test::TestRequest::post()
        .uri("/api/v1/fees")
        .insert_header(("Authorization", dean_auth.as_str()))
        .set_json(json!({ "student_id": student.id, "title": "Tuition", "amount": 100.0 }))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::CREATED);
    let body: Value = test::read_body_json(resp).await;
    let fee_id = body["data"]["fee"]["id"].as_i64().unwrap();

    let enroll_uri = format!("/api/v1/courses/{course_id}/enrollment");

    // 未缴费时不能选课
    let req = test::TestRequest::post()
        .uri(&enroll_uri)
        .insert_header(("Authorization", student_auth.as_str()))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::FORBIDDEN);
    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body["code"], ErrorCode::FeeRegistrationBlocked as i32);

    // 超过未缴余额的付款被拒绝
    let pay_uri = format!("/api/v1/fees/{fee_id}/payments");
    let req = test::TestRequest::post()
        .uri(&pay_uri)
        .peer_addr("10.30.0.1:5000".parse().unwrap())
        .insert_header(("Authorization", student_auth.as_str()))
        .set_json(json!({ "amount": 150.0, "method": "card" }))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);

    // 缴纳 60%，正好达到默认门槛
    let req = test::TestRequest::post()
        .uri(&pay_uri)
        .peer_addr("10.30.0.1:5000".parse().unwrap())
        .insert_header(("Authorization", student_auth.as_str()))
        .set_json(json!({ "amount": 60.0, "method": "mobile_money" }))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::OK);
    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body["data"]["payment"]["status"], "completed");
    assert_eq!(body["data"]["summary"]["paid_percentage"], 60.0);
    assert_eq!(body["data"]["summary"]["can_register"], true);

    let req = test::TestRequest::post()
        .uri(&enroll_uri)
        .insert_header(("Authorization", student_auth.as_str()))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::OK);

    // 重复选课
    let req = test::TestRequest::post()
        .uri(&enroll_uri)
        .insert_header(("Authorization", student_auth.as_str()))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::CONFLICT);

    // 讲师能看到选课学生
    let req = test::TestRequest::get()
        .uri(&format!("/api/v1/courses/{course_id}/students"))
        .insert_header(("Authorization", lecturer_auth.as_str()))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::OK);
    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body["data"]["items"].as_array().unwrap().len(), 1);

    // 付款结果通知
    let req = test::TestRequest::get()
        .uri("/api/v1/notifications/unread-count")
        .insert_header(("Authorization", student_auth.as_str()))
        .to_request();
    let resp = test::call_service(&app, req).await;
    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body["data"]["unread_count"], 1);
}

#[actix_web::test]
async fn test_student_without_fees_can_enroll_and_drop() {
    let ctx = setup().await;
    let (_, lecturer_auth) = ctx.login_as("lect_free", UserRole::Lecturer).await;
    let (_, student_auth) = ctx.login_as("stud_free", UserRole::Student).await;
    let app = init_app!(ctx);

    let req = test::TestRequest::post()
        .uri("/api/v1/courses")
        .insert_header(("Authorization", lecturer_auth.as_str()))
        .set_json(json!({ "code": "MATH-200", "title": "Linear Algebra", "credits": 4 }))
        .to_request();
    let body: Value = test::call_and_read_body_json(&app, req).await;
    let course_id = body["data"]["course"]["id"].as_i64().unwrap();
    let enroll_uri = format!("/api/v1/courses/{course_id}/enrollment");

    let req = test::TestRequest::post()
        .uri(&enroll_uri)
        .insert_header(("Authorization", student_auth.as_str()))
        .to_request();
    assert_eq!(test::call_service(&app, req).await.status(), StatusCode::OK);

    let req = test::TestRequest::delete()
        .uri(&enroll_uri)
        .insert_header(("Authorization", student_auth.as_str()))
        .to_request();
    assert_eq!(test::call_service(&app, req).await.status(), StatusCode::OK);

    // 退课后可以重新选课
    let req = test::TestRequest::post()
        .uri(&enroll_uri)
        .insert_header(("Authorization", student_auth.as_str()))
        .to_request();
    assert_eq!(test::call_service(&app, req).await.status(), StatusCode::OK);

    // 讲师不能选课
    let req = test::TestRequest::post()
        .uri(&enroll_uri)
        .insert_header(("Authorization", lecturer_auth.as_str()))
        .to_request();
    assert_eq!(
        test::call_service(&app, req).await.status(),
        StatusCode::FORBIDDEN
    );
}

#[actix_web::test]
async fn test_concurrent_payments_cannot_overpay_fee() {
    let ctx = setup().await;
    let (_, dean_auth) = ctx.login_as("dean_race", UserRole::Dean).await;
    let (student, student_auth) = ctx.login_as("stud_race", UserRole::Student).await;
    let app = init_app!(ctx);

    let req = test::TestRequest::post()
        .uri("/api/v1/fees")
        .insert_header(("Authorization", dean_auth.as_str()))
        .set_json(json!({ "student_id": student.id, "title": "Housing", "amount": 100.0 }))
        .to_request();
    let body: Value = test::call_and_read_body_json(&app, req).await;
    let fee_id = body["data"]["fee"]["id"].as_i64().unwrap();

    // 两笔 60 同时提交，余额只够一笔
    let pay = || {
        test::TestRequest::post()
            .uri(&format!("/api/v1/fees/{fee_id}/payments"))
            .peer_addr("10.30.0.2:5000".parse().unwrap())
            .insert_header(("Authorization", student_auth.as_str()))
            .set_json(json!({ "amount": 60.0, "method": "card" }))
            .to_request()
    };
    let (first, second) = futures_util::future::join(
        test::call_service(&app, pay()),
        test::call_service(&app, pay()),
    )
    .await;

    let mut statuses = vec![first.status(), second.status()];
    statuses.sort();
    assert_eq!(statuses, vec![StatusCode::OK, StatusCode::BAD_REQUEST]);

    let req = test::TestRequest::get()
        .uri("/api/v1/fees/summary")
        .insert_header(("Authorization", student_auth.as_str()))
        .to_request();
    let body: Value = test::call_and_read_body_json(&app, req).await;
    assert_eq!(body["data"]["paid"], 60.0);
    assert_eq!(body["data"]["balance"], 40.0);
}
