use actix_web::{HttpRequest, HttpResponse, Result as ActixResult, web};
use once_cell::sync::Lazy;

use crate::middlewares::{self, RequireRole};
use crate::models::users::entities::UserRole;
use crate::models::users::requests::{CreateUserRequest, UpdateUserRequest, UserListParams};
use crate::services::UserService;
use crate::utils::SafeUserIdI64;

static USER_SERVICE: Lazy<UserService> = Lazy::new(UserService::new_lazy);

pub async fn list_users(
    req: HttpRequest,
    query: web::Query<UserListParams>,
) -> ActixResult<HttpResponse> {
    USER_SERVICE.list_users(query.into_inner(), &req).await
}

pub async fn create_user(
    req: HttpRequest,
    body: web::Json<CreateUserRequest>,
) -> ActixResult<HttpResponse> {
    USER_SERVICE.create_user(body.into_inner(), &req).await
}

pub async fn get_user(req: HttpRequest, path: SafeUserIdI64) -> ActixResult<HttpResponse> {
    USER_SERVICE.get_user(path.0, &req).await
}

pub async fn update_user(
    req: HttpRequest,
    path: SafeUserIdI64,
    body: web::Json<UpdateUserRequest>,
) -> ActixResult<HttpResponse> {
    USER_SERVICE
        .update_user(path.0, body.into_inner(), &req)
        .await
}

pub async fn delete_user(req: HttpRequest, path: SafeUserIdI64) -> ActixResult<HttpResponse> {
    USER_SERVICE.delete_user(path.0, &req).await
}

// 院长只读（开具学费、指定讲师时需要查人），写操作仅管理员
pub fn configure_user_routes(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/api/v1/users")
            .wrap(middlewares::RequireJWT)
            .service(
                web::resource("")
                    .route(
                        web::get()
                            .to(list_users)
                            .wrap(RequireRole::new_any(UserRole::manager_roles())),
                    )
                    .route(
                        web::post()
                            .to(create_user)
                            .wrap(RequireRole::new(&UserRole::Admin)),
                    ),
            )
            .service(
                web::resource("/{user_id}")
                    .route(
                        web::get()
                            .to(get_user)
                            .wrap(RequireRole::new_any(UserRole::manager_roles())),
                    )
                    .route(
                        web::put()
                            .to(update_user)
                            .wrap(RequireRole::new(&UserRole::Admin)),
                    )
                    .route(
                        web::delete()
                            .to(delete_user)
                            .wrap(RequireRole::new(&UserRole::Admin)),
                    ),
            ),
    );
}
