use actix_web::{HttpRequest, HttpResponse, Result as ActixResult, web};
use once_cell::sync::Lazy;

use crate::middlewares::{self, RequireRole};
use crate::models::grades::requests::GradeSubmissionRequest;
use crate::models::submissions::requests::SubmissionListParams;
use crate::models::users::entities::UserRole;
use crate::services::{GradeService, SubmissionService};
use crate::utils::SafeIDI64;

// 懒加载的全局服务实例
static SUBMISSION_SERVICE: Lazy<SubmissionService> = Lazy::new(SubmissionService::new_lazy);
static GRADE_SERVICE: Lazy<GradeService> = Lazy::new(GradeService::new_lazy);

pub async fn list_mine(
    req: HttpRequest,
    query: web::Query<SubmissionListParams>,
) -> ActixResult<HttpResponse> {
    SUBMISSION_SERVICE.list_mine(query.into_inner(), &req).await
}

pub async fn get_submission(req: HttpRequest, path: SafeIDI64) -> ActixResult<HttpResponse> {
    SUBMISSION_SERVICE.get_submission(path.0, &req).await
}

pub async fn grade_submission(
    req: HttpRequest,
    path: SafeIDI64,
    body: web::Json<GradeSubmissionRequest>,
) -> ActixResult<HttpResponse> {
    GRADE_SERVICE
        .grade_submission(path.0, body.into_inner(), &req)
        .await
}

// 配置路由
pub fn configure_submission_routes(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/api/v1/submissions")
            .wrap(middlewares::RequireJWT)
            .route("/mine", web::get().to(list_mine))
            // 本人或课程管理者，业务层校验
            .route("/{id}", web::get().to(get_submission))
            .service(
                web::resource("/{id}/grade")
                    .wrap(RequireRole::new_any(UserRole::staff_roles()))
                    .route(web::put().to(grade_submission)),
            ),
    );
}
