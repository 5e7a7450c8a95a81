/*!
 * 速率限制中间件
 *
 * 固定窗口计数。窗口按 `当前秒数 / 窗口长度` 编号，计数键带上窗口编号，
 * 进入下一个窗口时自然换键，旧键由 moka 的 TTL 回收。
 *
 * ```rust,ignore
 * web::resource("/login")
 *     .route(web::post().to(login).wrap(RateLimit::login()))
 * ```
 *
 * 已认证请求按用户计数，匿名请求按客户端 IP 计数。超限返回 429，
 * 并带上 `Retry-After`（距离窗口结束的秒数）。
 */

use actix_service::{Service, Transform};
use actix_web::{
    Error, HttpMessage, HttpResponse,
    body::EitherBody,
    dev::{ServiceRequest, ServiceResponse},
    http::StatusCode,
};
use chrono::Utc;
use futures_util::future::{LocalBoxFuture, Ready, ready};
use moka::future::Cache;
use once_cell::sync::Lazy;
use std::net::IpAddr;
use std::rc::Rc;
use std::time::Duration;

use crate::models::{ApiResponse, ErrorCode, users::entities::User};

/// 最长窗口；计数项存活时间不会超过它
const MAX_WINDOW_SECS: u64 = 600;

static COUNTERS: Lazy<Cache<String, u32>> = Lazy::new(|| {
    Cache::builder()
        .time_to_live(Duration::from_secs(MAX_WINDOW_SECS))
        .max_capacity(100_000)
        .build()
});

#[derive(Clone)]
pub struct RateLimit {
    max_requests: u32,
    window_secs: u64,
    key_prefix: String,
}

impl RateLimit {
    pub fn new(max_requests: u32, window_secs: u64) -> Self {
        Self {
            max_requests,
            window_secs: window_secs.clamp(1, MAX_WINDOW_SECS),
            key_prefix: String::new(),
        }
    }

    /// 区分端点的计数前缀
    pub fn with_prefix(mut self, prefix: &str) -> Self {
        self.key_prefix = prefix.to_string();
        self
    }

    /// 登录：次数取自 `server.limits.login_attempts_per_minute`
    pub fn login() -> Self {
        let limit = crate::config::AppConfig::get()
            .server
            .limits
            .login_attempts_per_minute
            .max(1);
        Self::new(limit, 60).with_prefix("login")
    }

    pub fn register() -> Self {
        Self::new(3, 60).with_prefix("register")
    }

    pub fn refresh_token() -> Self {
        Self::new(10, 60).with_prefix("refresh")
    }

    pub fn file_upload() -> Self {
        Self::new(10, 60).with_prefix("upload")
    }

    /// 模拟网关也按真实支付对待，限制重复提交
    pub fn payment() -> Self {
        Self::new(5, 60).with_prefix("payment")
    }
}

/// 计数主体：登录用户优先，其次是客户端地址
enum Subject {
    User(i64),
    Ip(String),
}

impl Subject {
    fn of(req: &ServiceRequest) -> Self {
        if let Some(id) = req.extensions().get::<User>().map(|u| u.id) {
            return Subject::User(id);
        }
        Subject::Ip(client_ip(req))
    }

    fn key(&self, prefix: &str, window: u64) -> String {
        match self {
            Subject::User(id) => format!("{prefix}:user:{id}:{window}"),
            Subject::Ip(ip) => format!("{prefix}:ip:{ip}:{window}"),
        }
    }
}

/// 连接地址可解析时直接使用；否则退回代理头，只接受合法 IP
fn client_ip(req: &ServiceRequest) -> String {
    let peer = req.connection_info().realip_remote_addr().map(str::to_owned);
    if let Some(ip) = peer.as_deref().filter(|ip| ip.parse::<IpAddr>().is_ok()) {
        return ip.to_owned();
    }

    let forwarded = req
        .headers()
        .get("X-Forwarded-For")
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.split(',').next());
    let real_ip = req.headers().get("X-Real-IP").and_then(|v| v.to_str().ok());

    [forwarded, real_ip]
        .into_iter()
        .flatten()
        .map(str::trim)
        .find(|ip| ip.parse::<IpAddr>().is_ok())
        .map(str::to_owned)
        .or(peer)
        .unwrap_or_else(|| "unknown".to_string())
}

/// 返回 (窗口编号, 距窗口结束的秒数)
fn current_window(window_secs: u64) -> (u64, u64) {
    let now = Utc::now().timestamp().max(0) as u64;
    (now / window_secs, window_secs - now % window_secs)
}

fn too_many_requests(limit: u32, retry_after: u64) -> HttpResponse {
    HttpResponse::build(StatusCode::TOO_MANY_REQUESTS)
        .insert_header(("Retry-After", retry_after.to_string()))
        .insert_header(("X-RateLimit-Limit", limit.to_string()))
        .insert_header(("X-RateLimit-Remaining", "0"))
        .json(ApiResponse::<()>::error_empty(
            ErrorCode::RateLimitExceeded,
            "Too many requests, please try again later",
        ))
}

impl<S, B> Transform<S, ServiceRequest> for RateLimit
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error> + 'static,
    B: 'static,
{
    type Response = ServiceResponse<EitherBody<B>>;
    type Error = Error;
    type InitError = ();
    type Transform = RateLimitMiddleware<S>;
    type Future = Ready<Result<Self::Transform, Self::InitError>>;

    fn new_transform(&self, service: S) -> Self::Future {
        ready(Ok(RateLimitMiddleware {
            service: Rc::new(service),
            policy: Rc::new(self.clone()),
        }))
    }
}

pub struct RateLimitMiddleware<S> {
    service: Rc<S>,
    policy: Rc<RateLimit>,
}

impl<S, B> Service<ServiceRequest> for RateLimitMiddleware<S>
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error> + 'static,
    B: 'static,
{
    type Response = ServiceResponse<EitherBody<B>>;
    type Error = Error;
    type Future = LocalBoxFuture<'static, Result<Self::Response, Self::Error>>;

    actix_service::forward_ready!(service);

    fn call(&self, req: ServiceRequest) -> Self::Future {
        let srv = self.service.clone();
        let policy = self.policy.clone();

        Box::pin(async move {
            let (window, retry_after) = current_window(policy.window_secs);
            let key = Subject::of(&req).key(&policy.key_prefix, window);
            let used = COUNTERS.get(&key).await.unwrap_or(0);

            if used >= policy.max_requests {
                tracing::warn!(
                    "Rate limit hit: {} ({}/{})",
                    key,
                    used,
                    policy.max_requests
                );
                let response = too_many_requests(policy.max_requests, retry_after);
                return Ok(req.into_response(response).map_into_right_body());
            }

            COUNTERS.insert(key, used + 1).await;
            Ok(srv.call(req).await?.map_into_left_body())
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use actix_web::{App, HttpResponse, test as actix_test, web};

    #[test]
    fn test_rate_limit_presets() {
        let register = RateLimit::register();
        assert_eq!(register.max_requests, 3);
        assert_eq!(register.window_secs, 60);
        assert_eq!(register.key_prefix, "register");

        let payment = RateLimit::payment();
        assert_eq!(payment.max_requests, 5);
        assert_eq!(payment.key_prefix, "payment");
    }

    #[test]
    fn test_window_is_clamped() {
        assert_eq!(RateLimit::new(1, 0).window_secs, 1);
        assert_eq!(RateLimit::new(1, 3600).window_secs, MAX_WINDOW_SECS);
        let (_, remaining) = current_window(60);
        assert!((1..=60).contains(&remaining));
    }

    #[test]
    fn test_subject_keys_are_scoped() {
        assert_eq!(Subject::User(7).key("upload", 3), "upload:user:7:3");
        assert_eq!(
            Subject::Ip("10.0.0.1".into()).key("login", 3),
            "login:ip:10.0.0.1:3"
        );
    }

    #[actix_web::test]
    async fn test_requests_over_limit_are_rejected() {
        let app = actix_test::init_service(
            App::new().service(
                web::scope("/limited")
                    .wrap(RateLimit::new(2, 600).with_prefix("test-over-limit"))
                    .route("", web::get().to(HttpResponse::Ok)),
            ),
        )
        .await;

        for _ in 0..2 {
            let req = actix_test::TestRequest::get()
                .uri("/limited")
                .peer_addr("10.1.2.3:4000".parse().unwrap())
                .to_request();
            assert!(actix_test::call_service(&app, req).await.status().is_success());
        }

        let req = actix_test::TestRequest::get()
            .uri("/limited")
            .peer_addr("10.1.2.3:4000".parse().unwrap())
            .to_request();
        let resp = actix_test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::TOO_MANY_REQUESTS);
        let retry_after: u64 = resp
            .headers()
            .get("Retry-After")
            .unwrap()
            .to_str()
            .unwrap()
            .parse()
            .unwrap();
        assert!((1..=600).contains(&retry_after));

        // 其他 IP 不受影响
        let req = actix_test::TestRequest::get()
            .uri("/limited")
            .peer_addr("10.9.9.9:4000".parse().unwrap())
            .to_request();
        assert!(actix_test::call_service(&app, req).await.status().is_success());
    }
}
