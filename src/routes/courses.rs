use actix_web::{HttpRequest, HttpResponse, Result as ActixResult, web};
use once_cell::sync::Lazy;

use crate::middlewares::{self, RequireRole};
use crate::models::courses::requests::{
    CourseListParams, CreateCourseRequest, UpdateCourseRequest,
};
use crate::models::users::entities::UserRole;
use crate::services::CourseService;
use crate::utils::SafeIDI64;

// 懒加载的全局 CourseService 实例
static COURSE_SERVICE: Lazy<CourseService> = Lazy::new(CourseService::new_lazy);

pub async fn list_courses(
    req: HttpRequest,
    query: web::Query<CourseListParams>,
) -> ActixResult<HttpResponse> {
    COURSE_SERVICE.list_courses(query.into_inner(), &req).await
}

pub async fn create_course(
    req: HttpRequest,
    body: web::Json<CreateCourseRequest>,
) -> ActixResult<HttpResponse> {
    COURSE_SERVICE.create_course(body.into_inner(), &req).await
}

pub async fn get_course(req: HttpRequest, path: SafeIDI64) -> ActixResult<HttpResponse> {
    COURSE_SERVICE.get_course(path.0, &req).await
}

pub async fn update_course(
    req: HttpRequest,
    path: SafeIDI64,
    body: web::Json<UpdateCourseRequest>,
) -> ActixResult<HttpResponse> {
    COURSE_SERVICE
        .update_course(path.0, body.into_inner(), &req)
        .await
}

pub async fn delete_course(req: HttpRequest, path: SafeIDI64) -> ActixResult<HttpResponse> {
    COURSE_SERVICE.delete_course(path.0, &req).await
}

pub async fn enroll(req: HttpRequest, path: SafeIDI64) -> ActixResult<HttpResponse> {
    COURSE_SERVICE.enroll(path.0, &req).await
}

pub async fn drop_course(req: HttpRequest, path: SafeIDI64) -> ActixResult<HttpResponse> {
    COURSE_SERVICE.drop_course(path.0, &req).await
}

pub async fn list_students(req: HttpRequest, path: SafeIDI64) -> ActixResult<HttpResponse> {
    COURSE_SERVICE.list_students(path.0, &req).await
}

// 配置路由
pub fn configure_course_routes(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/api/v1/courses")
            .wrap(middlewares::RequireJWT)
            .service(
                web::resource("")
                    // 所有登录用户可浏览课程
                    .route(web::get().to(list_courses))
                    // 讲师为自己开课，院长/管理员可指定讲师
                    .route(
                        web::post()
                            .to(create_course)
                            .wrap(RequireRole::new_any(UserRole::staff_roles())),
                    ),
            )
            .service(
                web::resource("/{id}")
                    .route(web::get().to(get_course))
                    // 授课讲师本人在业务层校验
                    .route(
                        web::put()
                            .to(update_course)
                            .wrap(RequireRole::new_any(UserRole::staff_roles())),
                    )
                    .route(
                        web::delete()
                            .to(delete_course)
                            .wrap(RequireRole::new_any(UserRole::manager_roles())),
                    ),
            )
            .service(
                web::resource("/{id}/enrollment")
                    .wrap(RequireRole::new_any(UserRole::student_roles()))
                    .route(web::post().to(enroll))
                    .route(web::delete().to(drop_course)),
            )
            .service(
                web::resource("/{id}/students")
                    .wrap(RequireRole::new_any(UserRole::staff_roles()))
                    .route(web::get().to(list_students)),
            ),
    );
}
