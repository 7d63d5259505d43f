use actix_web::{HttpRequest, HttpResponse, Result as ActixResult, web};
use once_cell::sync::Lazy;

use crate::middlewares;
use crate::models::activities::requests::OccurrenceQuery;
use crate::models::users::entities::UserRole;
use crate::services::ActivityService;

// 懒加载的全局 ActivityService 实例
static ACTIVITY_SERVICE: Lazy<ActivityService> = Lazy::new(ActivityService::new_lazy);

pub async fn list_occurrences(
    req: HttpRequest,
    activity_id: web::Path<i64>,
    query: web::Query<OccurrenceQuery>,
) -> ActixResult<HttpResponse> {
    ACTIVITY_SERVICE
        .list_occurrences(activity_id.into_inner(), query.into_inner(), &req)
        .await
}

// 配置路由
pub fn configure_activity_routes(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/api/admin/activities")
            .wrap(middlewares::RequireRole::new_any(UserRole::admin_roles()))
            .wrap(middlewares::RequireUser)
            .route("/{id}/occurrences", web::get().to(list_occurrences)),
    );
}
