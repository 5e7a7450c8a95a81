use actix_web::{HttpRequest, HttpResponse, Result as ActixResult, web};
use once_cell::sync::Lazy;

use crate::middlewares::{self, RequireRole};
use crate::models::announcements::requests::{
    AnnouncementListParams, CreateAnnouncementRequest, UpdateAnnouncementRequest,
};
use crate::models::users::entities::UserRole;
use crate::services::AnnouncementService;
use crate::utils::SafeIDI64;

// 懒加载的全局 AnnouncementService 实例
static ANNOUNCEMENT_SERVICE: Lazy<AnnouncementService> =
    Lazy::new(AnnouncementService::new_lazy);

pub async fn list_announcements(
    req: HttpRequest,
    query: web::Query<AnnouncementListParams>,
) -> ActixResult<HttpResponse> {
    ANNOUNCEMENT_SERVICE
        .list_announcements(query.into_inner(), &req)
        .await
}

pub async fn create_announcement(
    req: HttpRequest,
    body: web::Json<CreateAnnouncementRequest>,
) -> ActixResult<HttpResponse> {
    ANNOUNCEMENT_SERVICE
        .create_announcement(body.into_inner(), &req)
        .await
}

pub async fn get_announcement(req: HttpRequest, path: SafeIDI64) -> ActixResult<HttpResponse> {
    ANNOUNCEMENT_SERVICE.get_announcement(path.0, &req).await
}

pub async fn update_announcement(
    req: HttpRequest,
    path: SafeIDI64,
    body: web::Json<UpdateAnnouncementRequest>,
) -> ActixResult<HttpResponse> {
    ANNOUNCEMENT_SERVICE
        .update_announcement(path.0, body.into_inner(), &req)
        .await
}

pub async fn delete_announcement(req: HttpRequest, path: SafeIDI64) -> ActixResult<HttpResponse> {
    ANNOUNCEMENT_SERVICE.delete_announcement(path.0, &req).await
}

// 配置路由
pub fn configure_announcement_routes(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/api/v1/announcements")
            .wrap(middlewares::RequireJWT)
            .service(
                web::resource("")
                    .route(web::get().to(list_announcements))
                    .route(
                        web::post()
                            .to(create_announcement)
                            .wrap(RequireRole::new_any(UserRole::staff_roles())),
                    ),
            )
            .service(
                web::resource("/{id}")
                    .route(web::get().to(get_announcement))
                    // 作者身份在业务层校验
                    .route(
                        web::put()
                            .to(update_announcement)
                            .wrap(RequireRole::new_any(UserRole::staff_roles())),
                    )
                    .route(
                        web::delete()
                            .to(delete_announcement)
                            .wrap(RequireRole::new_any(UserRole::staff_roles())),
                    ),
            ),
    );
}
