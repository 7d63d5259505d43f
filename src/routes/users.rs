use actix_web::{HttpRequest, HttpResponse, Result as ActixResult, web};
use once_cell::sync::Lazy;

use crate::middlewares;
use crate::services::UserService;

// 懒加载的全局 UserService 实例
static USER_SERVICE: Lazy<UserService> = Lazy::new(UserService::new_lazy);

pub async fn get_user(req: HttpRequest, user_id: web::Path<i64>) -> ActixResult<HttpResponse> {
    USER_SERVICE.get_user(user_id.into_inner(), &req).await
}

pub async fn list_unit_tutors(
    req: HttpRequest,
    unit_code: web::Path<String>,
) -> ActixResult<HttpResponse> {
    USER_SERVICE
        .list_unit_tutors(unit_code.into_inner(), &req)
        .await
}

// 配置路由
pub fn configure_user_routes(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/api/users")
            .wrap(middlewares::RequireUser)
            .route("/{id}", web::get().to(get_user)),
    )
    .service(
        web::scope("/api/units")
            .wrap(middlewares::RequireUser)
            .route("/{unit_code}/tutors", web::get().to(list_unit_tutors)),
    );
}
