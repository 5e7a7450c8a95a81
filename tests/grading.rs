mod common;

use actix_web::http::StatusCode;
use actix_web::test;
use serde_json::{Value, json};

use common::setup;
use lms_server::models::ErrorCode;
use lms_server::models::users::entities::UserRole;

#[actix_web::test]
async fn test_submission_grading_and_transcript() {
    let ctx = setup().await;
    let (_, lecturer_auth) = ctx.login_as("lect_grade", UserRole::Lecturer).await;
    let (student, student_auth) = ctx.login_as("stud_grade", UserRole::Student).await;
    let (_, outsider_auth) = ctx.login_as("stud_outside", UserRole::Student).await;
    let app = init_app!(ctx);

    let req = test::TestRequest::post()
        .uri("/api/v1/courses")
        .insert_header(("Authorization", lecturer_auth.as_str()))
        .set_json(json!({ "code": "PHY-110", "title": "Mechanics", "credits": 3 }))
        .to_request();
    let body: Value = test::call_and_read_body_json(&app, req).await;
    let course_id = body["data"]["course"]["id"].as_i64().unwrap();

    let req = test::TestRequest::post()
        .uri(&format!("/api/v1/courses/{course_id}/enrollment"))
        .insert_header(("Authorization", student_auth.as_str()))
        .to_request();
    assert_eq!(test::call_service(&app, req).await.status(), StatusCode::OK);

    let due = (chrono::Utc::now() + chrono::Duration::days(7)).to_rfc3339();
    let req = test::TestRequest::post()
        .uri("/api/v1/assignments")
        .insert_header(("Authorization", lecturer_auth.as_str()))
        .set_json(json!({
            "course_id": course_id,
            "title": "Problem Set 1",
            "due_date": due,
            "total_points": 50.0
        }))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::CREATED);
    let body: Value = test::read_body_json(resp).await;
    let assignment_id = body["data"]["id"].as_i64().unwrap();

    // 待办作业
    let req = test::TestRequest::get()
        .uri("/api/v1/assignments/upcoming")
        .insert_header(("Authorization", student_auth.as_str()))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::OK);

    // 未选课的学生不能提交
    let submit_uri = format!("/api/v1/assignments/{assignment_id}/submissions");
    let req = test::TestRequest::post()
        .uri(&submit_uri)
        .insert_header(("Authorization", outsider_auth.as_str()))
        .set_json(json!({ "content": "my answers" }))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::FORBIDDEN);

    // 内容与文件都为空
    let req = test::TestRequest::post()
        .uri(&submit_uri)
        .insert_header(("Authorization", student_auth.as_str()))
        .set_json(json!({ "content": "   " }))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);

    let req = test::TestRequest::post()
        .uri(&submit_uri)
        .insert_header(("Authorization", student_auth.as_str()))
        .set_json(json!({ "content": "F = ma, so a = 2 m/s^2" }))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::OK);
    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body["data"]["status"], "submitted");
    let submission_id = body["data"]["id"].as_i64().unwrap();

    let grade_uri = format!("/api/v1/submissions/{submission_id}/grade");

    // 学生不能评分
    let req = test::TestRequest::put()
        .uri(&grade_uri)
        .insert_header(("Authorization", student_auth.as_str()))
        .set_json(json!({ "score": 50.0 }))
        .to_request();
    assert_eq!(
        test::call_service(&app, req).await.status(),
        StatusCode::FORBIDDEN
    );

    // 分数超出满分
    let req = test::TestRequest::put()
        .uri(&grade_uri)
        .insert_header(("Authorization", lecturer_auth.as_str()))
        .set_json(json!({ "score": 60.0 }))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body["code"], ErrorCode::GradeScoreOutOfRange as i32);

    let req = test::TestRequest::put()
        .uri(&grade_uri)
        .insert_header(("Authorization", lecturer_auth.as_str()))
        .set_json(json!({ "score": 46.0, "feedback": "Clear working" }))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::OK);

    // 已评分后不能再提交
    let req = test::TestRequest::post()
        .uri(&submit_uri)
        .insert_header(("Authorization", student_auth.as_str()))
        .set_json(json!({ "content": "revised" }))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::CONFLICT);

    // 成绩与提交状态一起落库
    let req = test::TestRequest::get()
        .uri(&format!("/api/v1/submissions/{submission_id}"))
        .insert_header(("Authorization", student_auth.as_str()))
        .to_request();
    let body: Value = test::call_and_read_body_json(&app, req).await;
    assert_eq!(body["data"]["submission"]["status"], "graded");
    assert_eq!(body["data"]["grade"]["score"], 46.0);

    // 满分不能低于已给出的分数
    let assignment_uri = format!("/api/v1/assignments/{assignment_id}");
    let req = test::TestRequest::put()
        .uri(&assignment_uri)
        .insert_header(("Authorization", lecturer_auth.as_str()))
        .set_json(json!({ "total_points": 40.0 }))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body["code"], ErrorCode::GradeScoreOutOfRange as i32);

    let req = test::TestRequest::put()
        .uri(&assignment_uri)
        .insert_header(("Authorization", lecturer_auth.as_str()))
        .set_json(json!({ "total_points": 46.0 }))
        .to_request();
    assert_eq!(test::call_service(&app, req).await.status(), StatusCode::OK);

    // 46/46 = 100% -> A
    let req = test::TestRequest::get()
        .uri("/api/v1/grades/transcript")
        .insert_header(("Authorization", student_auth.as_str()))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::OK);
    let body: Value = test::read_body_json(resp).await;
    let transcript = &body["data"];
    assert_eq!(transcript["student_id"], student.id);
    assert_eq!(transcript["rows"][0]["letter"], "A");
    assert_eq!(transcript["gpa"], 4.0);
    assert_eq!(transcript["total_credits"], 3);

    // 讲师可以查看任意学生的成绩单，学生不能查看别人的
    let req = test::TestRequest::get()
        .uri(&format!("/api/v1/grades/transcript?student_id={}", student.id))
        .insert_header(("Authorization", lecturer_auth.as_str()))
        .to_request();
    assert_eq!(test::call_service(&app, req).await.status(), StatusCode::OK);

    let req = test::TestRequest::get()
        .uri(&format!("/api/v1/grades/transcript?student_id={}", student.id))
        .insert_header(("Authorization", outsider_auth.as_str()))
        .to_request();
    assert_eq!(
        test::call_service(&app, req).await.status(),
        StatusCode::FORBIDDEN
    );

    // 作业发布与成绩发布各一条通知
    let req = test::TestRequest::get()
        .uri("/api/v1/notifications/unread-count")
        .insert_header(("Authorization", student_auth.as_str()))
        .to_request();
    let body: Value = test::call_and_read_body_json(&app, req).await;
    assert_eq!(body["data"]["unread_count"], 2);

    let req = test::TestRequest::put()
        .uri("/api/v1/notifications/read-all")
        .insert_header(("Authorization", student_auth.as_str()))
        .to_request();
    assert_eq!(test::call_service(&app, req).await.status(), StatusCode::OK);

    let req = test::TestRequest::get()
        .uri("/api/v1/notifications/unread-count")
        .insert_header(("Authorization", student_auth.as_str()))
        .to_request();
    let body: Value = test::call_and_read_body_json(&app, req).await;
    assert_eq!(body["data"]["unread_count"], 0);
}
