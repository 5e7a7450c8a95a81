mod common;

use actix_web::http::StatusCode;
use actix_web::test;
use serde_json::{Value, json};

use common::setup;
use lms_server::models::users::entities::UserRole;

#[actix_web::test]
async fn test_dashboard_summary_per_role() {
    let ctx = setup().await;
    let (_, lecturer_auth) = ctx.login_as("lect_dash", UserRole::Lecturer).await;
    let (_, dean_auth) = ctx.login_as("dean_dash", UserRole::Dean).await;
    let (student, student_auth) = ctx.login_as("stud_dash", UserRole::Student).await;
    let app = init_app!(ctx);

    let req = test::TestRequest::post()
        .uri("/api/v1/fees")
        .insert_header(("Authorization", dean_auth.as_str()))
        .set_json(json!({ "student_id": student.id, "title": "Tuition", "amount": 200.0 }))
        .to_request();
    let body: Value = test::call_and_read_body_json(&app, req).await;
    let fee_id = body["data"]["fee"]["id"].as_i64().unwrap();

    let req = test::TestRequest::post()
        .uri(&format!("/api/v1/fees/{fee_id}/payments"))
        .peer_addr("10.50.0.1:5000".parse().unwrap())
        .insert_header(("Authorization", student_auth.as_str()))
        .set_json(json!({ "amount": 150.0, "method": "card" }))
        .to_request();
    assert_eq!(test::call_service(&app, req).await.status(), StatusCode::OK);

    let req = test::TestRequest::post()
        .uri("/api/v1/courses")
        .insert_header(("Authorization", lecturer_auth.as_str()))
        .set_json(json!({ "code": "ECO-101", "title": "Microeconomics", "credits": 3 }))
        .to_request();
    let body: Value = test::call_and_read_body_json(&app, req).await;
    let course_id = body["data"]["course"]["id"].as_i64().unwrap();

    let req = test::TestRequest::post()
        .uri(&format!("/api/v1/courses/{course_id}/enrollment"))
        .insert_header(("Authorization", student_auth.as_str()))
        .to_request();
    assert_eq!(test::call_service(&app, req).await.status(), StatusCode::OK);

    let mut assignment_ids = Vec::new();
    for title in ["Supply and demand", "Elasticity"] {
        let due = (chrono::Utc::now() + chrono::Duration::days(5)).to_rfc3339();
        let req = test::TestRequest::post()
            .uri("/api/v1/assignments")
            .insert_header(("Authorization", lecturer_auth.as_str()))
            .set_json(json!({
                "course_id": course_id,
                "title": title,
                "due_date": due,
                "total_points": 10.0
            }))
            .to_request();
        let body: Value = test::call_and_read_body_json(&app, req).await;
        assignment_ids.push(body["data"]["id"].as_i64().unwrap());
    }

    let req = test::TestRequest::post()
        .uri(&format!("/api/v1/assignments/{}/submissions", assignment_ids[0]))
        .insert_header(("Authorization", student_auth.as_str()))
        .set_json(json!({ "content": "Prices rise when demand exceeds supply." }))
        .to_request();
    assert_eq!(test::call_service(&app, req).await.status(), StatusCode::OK);

    // 学生：已提交的作业不再算待办
    let req = test::TestRequest::get()
        .uri("/api/v1/dashboard/summary")
        .insert_header(("Authorization", student_auth.as_str()))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::OK);
    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body["data"]["kind"], "student");
    let summary = &body["data"]["data"];
    assert_eq!(summary["enrolled_courses"], 1);
    assert_eq!(summary["upcoming_assignments"], 1);
    assert_eq!(summary["gpa"], 0.0);
    assert_eq!(summary["fee"]["total"], 200.0);
    assert_eq!(summary["fee"]["paid"], 150.0);
    assert_eq!(summary["fee"]["balance"], 50.0);
    assert_eq!(summary["fee"]["paid_percentage"], 75.0);
    assert_eq!(summary["fee"]["can_register"], true);
    // 一条缴费通知与两条作业通知
    assert_eq!(summary["unread_notifications"], 3);

    // 讲师
    let req = test::TestRequest::get()
        .uri("/api/v1/dashboard/summary")
        .insert_header(("Authorization", lecturer_auth.as_str()))
        .to_request();
    let body: Value = test::call_and_read_body_json(&app, req).await;
    assert_eq!(body["data"]["kind"], "lecturer");
    let summary = &body["data"]["data"];
    assert_eq!(summary["taught_courses"], 1);
    assert_eq!(summary["ungraded_submissions"], 1);
    assert_eq!(summary["unread_notifications"], 0);

    // 院长看到全院概览
    let req = test::TestRequest::get()
        .uri("/api/v1/dashboard/summary")
        .insert_header(("Authorization", dean_auth.as_str()))
        .to_request();
    let body: Value = test::call_and_read_body_json(&app, req).await;
    assert_eq!(body["data"]["kind"], "overview");
    let summary = &body["data"]["data"];
    assert_eq!(summary["total_courses"], 1);
    assert_eq!(summary["outstanding_fees"], 50.0);

    let count_for = |role: &str| {
        summary["users_by_role"]
            .as_array()
            .unwrap()
            .iter()
            .find(|entry| entry["role"] == role)
            .map(|entry| entry["count"].as_i64().unwrap())
    };
    assert_eq!(count_for("student"), Some(1));
    assert_eq!(count_for("lecturer"), Some(1));
    assert_eq!(count_for("dean"), Some(1));
    assert_eq!(count_for("admin"), Some(0));

    let req = test::TestRequest::get()
        .uri("/api/v1/dashboard/summary")
        .to_request();
    assert_eq!(
        test::call_service(&app, req).await.status(),
        StatusCode::UNAUTHORIZED
    );
}
