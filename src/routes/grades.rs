use actix_web::{HttpRequest, HttpResponse, Result as ActixResult, web};
use once_cell::sync::Lazy;

use crate::middlewares;
use crate::models::grades::requests::{GradeListParams, TranscriptParams};
use crate::services::GradeService;

// 懒加载的全局 GradeService 实例
static GRADE_SERVICE: Lazy<GradeService> = Lazy::new(GradeService::new_lazy);

pub async fn list_grades(
    req: HttpRequest,
    query: web::Query<GradeListParams>,
) -> ActixResult<HttpResponse> {
    GRADE_SERVICE.list_grades(query.into_inner(), &req).await
}

pub async fn transcript(
    req: HttpRequest,
    query: web::Query<TranscriptParams>,
) -> ActixResult<HttpResponse> {
    GRADE_SERVICE.transcript(query.student_id, &req).await
}

// 配置路由；按角色的可见范围在业务层处理
pub fn configure_grade_routes(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/api/v1/grades")
            .wrap(middlewares::RequireJWT)
            .route("", web::get().to(list_grades))
            .route("/transcript", web::get().to(transcript)),
    );
}
