use actix_web::{HttpRequest, HttpResponse, Result as ActixResult, web};
use once_cell::sync::Lazy;

use crate::middlewares;
use crate::models::users::entities::UserRole;
use crate::services::PaycodeService;

// 懒加载的全局 PaycodeService 实例
static PAYCODE_SERVICE: Lazy<PaycodeService> = Lazy::new(PaycodeService::new_lazy);

pub async fn list_paycodes(req: HttpRequest) -> ActixResult<HttpResponse> {
    PAYCODE_SERVICE.list_paycodes(&req).await
}

// 配置路由
pub fn configure_paycode_routes(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/api/admin/paycodes")
            .wrap(middlewares::RequireRole::new_any(UserRole::admin_roles()))
            .wrap(middlewares::RequireUser)
            .route("", web::get().to(list_paycodes)),
    );
}
