mod common;

use actix_web::http::StatusCode;
use actix_web::test;
use serde_json::{Value, json};

use common::setup;
use lms_server::models::users::entities::UserRole;

macro_rules! unread_count {
    ($app:expr, $auth:expr) => {{
        let req = test::TestRequest::get()
            .uri("/api/v1/notifications/unread-count")
            .insert_header(("Authorization", $auth.as_str()))
            .to_request();
        let body: Value = test::call_and_read_body_json(&$app, req).await;
        body["data"]["unread_count"].as_i64().unwrap()
    }};
}

/// 按标题排序的可见公告
macro_rules! visible_titles {
    ($app:expr, $auth:expr) => {{
        let req = test::TestRequest::get()
            .uri("/api/v1/announcements")
            .insert_header(("Authorization", $auth.as_str()))
            .to_request();
        let body: Value = test::call_and_read_body_json(&$app, req).await;
        let mut titles: Vec<String> = body["data"]["items"]
            .as_array()
            .unwrap()
            .iter()
            .map(|a| a["title"].as_str().unwrap().to_string())
            .collect();
        titles.sort();
        titles
    }};
}

#[actix_web::test]
async fn test_announcement_fan_out_and_visibility() {
    let ctx = setup().await;
    let (_, lecturer_auth) = ctx.login_as("lect_news", UserRole::Lecturer).await;
    let (_, dean_auth) = ctx.login_as("dean_news", UserRole::Dean).await;
    let (_, enrolled_auth) = ctx.login_as("stud_enrolled", UserRole::Student).await;
    let (_, outsider_auth) = ctx.login_as("stud_other", UserRole::Student).await;
    let app = init_app!(ctx);

    let req = test::TestRequest::post()
        .uri("/api/v1/courses")
        .insert_header(("Authorization", lecturer_auth.as_str()))
        .set_json(json!({ "code": "HIS-200", "title": "Modern History", "credits": 2 }))
        .to_request();
    let body: Value = test::call_and_read_body_json(&app, req).await;
    let course_id = body["data"]["course"]["id"].as_i64().unwrap();

    let req = test::TestRequest::post()
        .uri(&format!("/api/v1/courses/{course_id}/enrollment"))
        .insert_header(("Authorization", enrolled_auth.as_str()))
        .to_request();
    assert_eq!(test::call_service(&app, req).await.status(), StatusCode::OK);

    // 课程公告只通知在读学生
    let req = test::TestRequest::post()
        .uri("/api/v1/announcements")
        .insert_header(("Authorization", lecturer_auth.as_str()))
        .set_json(json!({
            "course_id": course_id,
            "title": "Essay deadline moved",
            "content": "The essay is now due on Friday."
        }))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::CREATED);
    let body: Value = test::read_body_json(resp).await;
    let course_announcement_id = body["data"]["id"].as_i64().unwrap();

    assert_eq!(unread_count!(app, enrolled_auth), 1);
    assert_eq!(unread_count!(app, outsider_auth), 0);

    // 讲师不能发全局公告
    let req = test::TestRequest::post()
        .uri("/api/v1/announcements")
        .insert_header(("Authorization", lecturer_auth.as_str()))
        .set_json(json!({ "title": "Campus closed", "content": "Snow day." }))
        .to_request();
    assert_eq!(
        test::call_service(&app, req).await.status(),
        StatusCode::FORBIDDEN
    );

    // 面向讲师的全局公告，作者本人不收通知
    let req = test::TestRequest::post()
        .uri("/api/v1/announcements")
        .insert_header(("Authorization", dean_auth.as_str()))
        .set_json(json!({
            "title": "Faculty meeting",
            "content": "Monday 10:00 in the senate hall.",
            "audience": "lecturer"
        }))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::CREATED);
    let body: Value = test::read_body_json(resp).await;
    let faculty_announcement_id = body["data"]["id"].as_i64().unwrap();

    assert_eq!(unread_count!(app, lecturer_auth), 1);
    assert_eq!(unread_count!(app, enrolled_auth), 1);
    assert_eq!(unread_count!(app, dean_auth), 0);

    // 面向所有人的全局公告
    let req = test::TestRequest::post()
        .uri("/api/v1/announcements")
        .insert_header(("Authorization", dean_auth.as_str()))
        .set_json(json!({ "title": "Library hours", "content": "Open until midnight." }))
        .to_request();
    assert_eq!(test::call_service(&app, req).await.status(), StatusCode::CREATED);

    assert_eq!(unread_count!(app, enrolled_auth), 2);
    assert_eq!(unread_count!(app, outsider_auth), 1);

    assert_eq!(
        visible_titles!(app, enrolled_auth),
        vec!["Essay deadline moved", "Library hours"]
    );
    assert_eq!(visible_titles!(app, outsider_auth), vec!["Library hours"]);
    assert_eq!(
        visible_titles!(app, lecturer_auth),
        vec!["Essay deadline moved", "Faculty meeting", "Library hours"]
    );
    assert_eq!(visible_titles!(app, dean_auth).len(), 3);

    // 单条读取遵循同样的可见性
    let req = test::TestRequest::get()
        .uri(&format!("/api/v1/announcements/{course_announcement_id}"))
        .insert_header(("Authorization", outsider_auth.as_str()))
        .to_request();
    assert_eq!(
        test::call_service(&app, req).await.status(),
        StatusCode::FORBIDDEN
    );

    let req = test::TestRequest::get()
        .uri(&format!("/api/v1/announcements/{faculty_announcement_id}"))
        .insert_header(("Authorization", enrolled_auth.as_str()))
        .to_request();
    assert_eq!(
        test::call_service(&app, req).await.status(),
        StatusCode::FORBIDDEN
    );

    let req = test::TestRequest::get()
        .uri(&format!("/api/v1/announcements/{course_announcement_id}"))
        .insert_header(("Authorization", enrolled_auth.as_str()))
        .to_request();
    assert_eq!(test::call_service(&app, req).await.status(), StatusCode::OK);
}

#[actix_web::test]
async fn test_notification_failure_does_not_fail_assignment_creation() {
    let ctx = setup().await;
    let (_, lecturer_auth) = ctx.login_as("lect_fanout", UserRole::Lecturer).await;
    let (_, student_auth) = ctx.login_as("stud_fanout", UserRole::Student).await;
    let app = init_app!(ctx);

    let req = test::TestRequest::post()
        .uri("/api/v1/courses")
        .insert_header(("Authorization", lecturer_auth.as_str()))
        .set_json(json!({ "code": "BIO-150", "title": "Cell Biology", "credits": 4 }))
        .to_request();
    let body: Value = test::call_and_read_body_json(&app, req).await;
    let course_id = body["data"]["course"]["id"].as_i64().unwrap();

    let req = test::TestRequest::post()
        .uri(&format!("/api/v1/courses/{course_id}/enrollment"))
        .insert_header(("Authorization", student_auth.as_str()))
        .to_request();
    assert_eq!(test::call_service(&app, req).await.status(), StatusCode::OK);

    // 通知表不可写时，布置作业仍然成功
    ctx.execute_sql("DROP TABLE notifications").await;

    let due = (chrono::Utc::now() + chrono::Duration::days(3)).to_rfc3339();
    let req = test::TestRequest::post()
        .uri("/api/v1/assignments")
        .insert_header(("Authorization", lecturer_auth.as_str()))
        .set_json(json!({
            "course_id": course_id,
            "title": "Lab report 1",
            "due_date": due,
            "total_points": 20.0
        }))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::CREATED);
    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body["data"]["title"], "Lab report 1");

    let req = test::TestRequest::get()
        .uri("/api/v1/assignments/upcoming")
        .insert_header(("Authorization", student_auth.as_str()))
        .to_request();
    let body: Value = test::call_and_read_body_json(&app, req).await;
    assert_eq!(body["data"]["items"].as_array().unwrap().len(), 1);
}
