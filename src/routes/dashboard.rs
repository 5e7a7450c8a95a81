use actix_web::{HttpRequest, HttpResponse, Result as ActixResult, web};
use once_cell::sync::Lazy;

use crate::middlewares;
use crate::models::dashboard::requests::PermissionCheckQuery;
use crate::services::DashboardService;

// 懒加载的全局 DashboardService 实例
static DASHBOARD_SERVICE: Lazy<DashboardService> = Lazy::new(DashboardService::new_lazy);

pub async fn get_config(req: HttpRequest) -> ActixResult<HttpResponse> {
    DASHBOARD_SERVICE.get_config(&req).await
}

pub async fn check_permission(
    req: HttpRequest,
    query: web::Query<PermissionCheckQuery>,
) -> ActixResult<HttpResponse> {
    DASHBOARD_SERVICE
        .check_permission(query.into_inner(), &req)
        .await
}

pub async fn get_summary(req: HttpRequest) -> ActixResult<HttpResponse> {
    DASHBOARD_SERVICE.get_summary(&req).await
}

// 配置路由
pub fn configure_dashboard_routes(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/api/v1/dashboard")
            .wrap(middlewares::RequireJWT)
            .route("/config", web::get().to(get_config))
            .route("/permissions/check", web::get().to(check_permission))
            .route("/summary", web::get().to(get_summary)),
    );
}
