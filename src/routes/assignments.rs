use actix_web::{HttpRequest, HttpResponse, Result as ActixResult, web};
use once_cell::sync::Lazy;

use crate::middlewares::{self, RequireRole};
use crate::models::assignments::requests::{
    AssignmentListParams, CreateAssignmentRequest, UpdateAssignmentRequest,
};
use crate::models::submissions::requests::{SubmissionListParams, SubmitAssignmentRequest};
use crate::models::users::entities::UserRole;
use crate::services::{AssignmentService, SubmissionService};
use crate::utils::SafeIDI64;

// 懒加载的全局服务实例
static ASSIGNMENT_SERVICE: Lazy<AssignmentService> = Lazy::new(AssignmentService::new_lazy);
static SUBMISSION_SERVICE: Lazy<SubmissionService> = Lazy::new(SubmissionService::new_lazy);

pub async fn list_assignments(
    req: HttpRequest,
    query: web::Query<AssignmentListParams>,
) -> ActixResult<HttpResponse> {
    ASSIGNMENT_SERVICE
        .list_assignments(query.into_inner(), &req)
        .await
}

pub async fn list_upcoming(req: HttpRequest) -> ActixResult<HttpResponse> {
    ASSIGNMENT_SERVICE.list_upcoming(&req).await
}

pub async fn create_assignment(
    req: HttpRequest,
    body: web::Json<CreateAssignmentRequest>,
) -> ActixResult<HttpResponse> {
    ASSIGNMENT_SERVICE
        .create_assignment(body.into_inner(), &req)
        .await
}

pub async fn get_assignment(req: HttpRequest, path: SafeIDI64) -> ActixResult<HttpResponse> {
    ASSIGNMENT_SERVICE.get_assignment(path.0, &req).await
}

pub async fn update_assignment(
    req: HttpRequest,
    path: SafeIDI64,
    body: web::Json<UpdateAssignmentRequest>,
) -> ActixResult<HttpResponse> {
    ASSIGNMENT_SERVICE
        .update_assignment(path.0, body.into_inner(), &req)
        .await
}

pub async fn delete_assignment(req: HttpRequest, path: SafeIDI64) -> ActixResult<HttpResponse> {
    ASSIGNMENT_SERVICE.delete_assignment(path.0, &req).await
}

pub async fn submit(
    req: HttpRequest,
    path: SafeIDI64,
    body: web::Json<SubmitAssignmentRequest>,
) -> ActixResult<HttpResponse> {
    SUBMISSION_SERVICE
        .submit(path.0, body.into_inner(), &req)
        .await
}

pub async fn list_submissions(
    req: HttpRequest,
    path: SafeIDI64,
    query: web::Query<SubmissionListParams>,
) -> ActixResult<HttpResponse> {
    SUBMISSION_SERVICE
        .list_for_assignment(path.0, query.into_inner(), &req)
        .await
}

// 配置路由
pub fn configure_assignment_routes(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/api/v1/assignments")
            .wrap(middlewares::RequireJWT)
            .service(
                web::resource("")
                    // 业务层按课程成员资格过滤
                    .route(web::get().to(list_assignments))
                    .route(
                        web::post()
                            .to(create_assignment)
                            .wrap(RequireRole::new_any(UserRole::staff_roles())),
                    ),
            )
            .service(
                web::resource("/upcoming")
                    .wrap(RequireRole::new_any(UserRole::student_roles()))
                    .route(web::get().to(list_upcoming)),
            )
            .service(
                web::resource("/{id}")
                    .route(web::get().to(get_assignment))
                    .route(
                        web::put()
                            .to(update_assignment)
                            .wrap(RequireRole::new_any(UserRole::staff_roles())),
                    )
                    .route(
                        web::delete()
                            .to(delete_assignment)
                            .wrap(RequireRole::new_any(UserRole::staff_roles())),
                    ),
            )
            .service(
                web::resource("/{id}/submissions")
                    .route(
                        web::post()
                            .to(submit)
                            .wrap(RequireRole::new_any(UserRole::student_roles())),
                    )
                    .route(
                        web::get()
                            .to(list_submissions)
                            .wrap(RequireRole::new_any(UserRole::staff_roles())),
                    ),
            ),
    );
}
