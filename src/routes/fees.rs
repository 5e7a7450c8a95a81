use actix_web::{HttpRequest, HttpResponse, Result as ActixResult, web};
use once_cell::sync::Lazy;

use crate::middlewares::{self, RateLimit, RequireRole};
use crate::models::fees::requests::{
    CreateFeeRequest, FeeListParams, FeeSummaryParams, PaymentListParams, SubmitPaymentRequest,
};
use crate::models::users::entities::UserRole;
use crate::services::FeeService;
use crate::utils::SafeIDI64;

// 懒加载的全局 FeeService 实例
static FEE_SERVICE: Lazy<FeeService> = Lazy::new(FeeService::new_lazy);

pub async fn list_fees(
    req: HttpRequest,
    query: web::Query<FeeListParams>,
) -> ActixResult<HttpResponse> {
    FEE_SERVICE.list_fees(query.into_inner(), &req).await
}

pub async fn create_fee(
    req: HttpRequest,
    body: web::Json<CreateFeeRequest>,
) -> ActixResult<HttpResponse> {
    FEE_SERVICE.create_fee(body.into_inner(), &req).await
}

pub async fn delete_fee(req: HttpRequest, path: SafeIDI64) -> ActixResult<HttpResponse> {
    FEE_SERVICE.delete_fee(path.0, &req).await
}

pub async fn get_summary(
    req: HttpRequest,
    query: web::Query<FeeSummaryParams>,
) -> ActixResult<HttpResponse> {
    FEE_SERVICE.get_summary(query.into_inner(), &req).await
}

pub async fn submit_payment(
    req: HttpRequest,
    path: SafeIDI64,
    body: web::Json<SubmitPaymentRequest>,
) -> ActixResult<HttpResponse> {
    FEE_SERVICE
        .submit_payment(path.0, body.into_inner(), &req)
        .await
}

pub async fn list_payments(
    req: HttpRequest,
    query: web::Query<PaymentListParams>,
) -> ActixResult<HttpResponse> {
    FEE_SERVICE.list_payments(query.into_inner(), &req).await
}

// 配置路由
pub fn configure_fee_routes(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/api/v1/fees")
            .wrap(middlewares::RequireJWT)
            .service(
                web::resource("")
                    // 学生只看自己的，业务层处理
                    .route(web::get().to(list_fees))
                    .route(
                        web::post()
                            .to(create_fee)
                            .wrap(RequireRole::new_any(UserRole::manager_roles())),
                    ),
            )
            .route("/summary", web::get().to(get_summary))
            .route("/payments", web::get().to(list_payments))
            .service(
                web::resource("/{id}")
                    .wrap(RequireRole::new(&UserRole::Admin))
                    .route(web::delete().to(delete_fee)),
            )
            .service(
                web::resource("/{id}/payments")
                    .wrap(RateLimit::payment())
                    .wrap(RequireRole::new_any(UserRole::student_roles()))
                    .route(web::post().to(submit_payment)),
            ),
    );
}
