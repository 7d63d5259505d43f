use actix_web::{HttpRequest, HttpResponse, Result as ActixResult, web};
use once_cell::sync::Lazy;

use crate::middlewares;
use crate::models::requests::requests::{CreateRequestBody, DecisionBody, OpenRequestQuery};
use crate::models::users::entities::UserRole;
use crate::services::RequestService;

// 懒加载的全局 RequestService 实例
static REQUEST_SERVICE: Lazy<RequestService> = Lazy::new(RequestService::new_lazy);

// HTTP处理程序
pub async fn create_request(
    req: HttpRequest,
    body: web::Json<CreateRequestBody>,
) -> ActixResult<HttpResponse> {
    REQUEST_SERVICE
        .create_request(body.into_inner(), &req)
        .await
}

pub async fn list_open_requests(
    req: HttpRequest,
    query: web::Query<OpenRequestQuery>,
) -> ActixResult<HttpResponse> {
    REQUEST_SERVICE
        .list_open_requests(query.into_inner(), &req)
        .await
}

pub async fn get_request(req: HttpRequest, request_id: web::Path<i64>) -> ActixResult<HttpResponse> {
    REQUEST_SERVICE
        .get_request(request_id.into_inner(), &req)
        .await
}

pub async fn review_request(
    req: HttpRequest,
    request_id: web::Path<i64>,
) -> ActixResult<HttpResponse> {
    REQUEST_SERVICE
        .review_request(request_id.into_inner(), &req)
        .await
}

pub async fn decide_request(
    req: HttpRequest,
    request_id: web::Path<i64>,
    body: web::Json<DecisionBody>,
) -> ActixResult<HttpResponse> {
    REQUEST_SERVICE
        .decide_request(request_id.into_inner(), body.into_inner(), &req)
        .await
}

// 配置路由
pub fn configure_request_routes(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/api/requests")
            .wrap(middlewares::RequireUser)
            .route("", web::post().to(create_request))
            .route("", web::get().to(list_open_requests))
            .route("/{id}", web::get().to(get_request))
            .route("/{id}/review", web::get().to(review_request))
            .service(
                web::resource("/{id}/decision")
                    .wrap(middlewares::RequireRole::new_any(UserRole::reviewer_roles()))
                    .route(web::post().to(decide_request)),
            ),
    );
}
