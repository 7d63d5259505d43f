use actix_web::{HttpRequest, HttpResponse, Result as ActixResult, web};
use once_cell::sync::Lazy;

use crate::middlewares;
use crate::models::allocations::requests::{
    AllocationExportParams, AllocationListParams, AllocationPatch, CreateUnscheduledRequest,
};
use crate::models::users::entities::UserRole;
use crate::services::AllocationService;

// 懒加载的全局 AllocationService 实例
static ALLOCATION_SERVICE: Lazy<AllocationService> = Lazy::new(AllocationService::new_lazy);

// HTTP处理程序
pub async fn list_allocations(
    req: HttpRequest,
    query: web::Query<AllocationListParams>,
) -> ActixResult<HttpResponse> {
    ALLOCATION_SERVICE
        .list_allocations(query.into_inner(), &req)
        .await
}

pub async fn export_allocations(
    req: HttpRequest,
    query: web::Query<AllocationExportParams>,
) -> ActixResult<HttpResponse> {
    ALLOCATION_SERVICE
        .export_allocations(query.into_inner(), &req)
        .await
}

pub async fn get_allocation(
    req: HttpRequest,
    allocation_id: web::Path<i64>,
) -> ActixResult<HttpResponse> {
    ALLOCATION_SERVICE
        .get_allocation(allocation_id.into_inner(), &req)
        .await
}

pub async fn update_allocation(
    req: HttpRequest,
    allocation_id: web::Path<i64>,
    patch: web::Json<AllocationPatch>,
) -> ActixResult<HttpResponse> {
    ALLOCATION_SERVICE
        .update_allocation(allocation_id.into_inner(), patch.into_inner(), &req)
        .await
}

pub async fn create_unscheduled(
    req: HttpRequest,
    body: web::Json<CreateUnscheduledRequest>,
) -> ActixResult<HttpResponse> {
    ALLOCATION_SERVICE
        .create_unscheduled(body.into_inner(), &req)
        .await
}

// 配置路由
pub fn configure_allocation_routes(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/api/admin/allocations")
            .wrap(middlewares::RequireRole::new_any(UserRole::admin_roles()))
            .wrap(middlewares::RequireUser)
            .route("", web::get().to(list_allocations))
            .route("/export", web::get().to(export_allocations))
            .route("/unscheduled", web::post().to(create_unscheduled))
            .route("/{id}", web::get().to(get_allocation))
            .route("/{id}", web::patch().to(update_allocation)),
    );
}
