use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};

use super::RequestService;
use crate::models::{ApiResponse, ErrorCode};
use crate::services::error_response;

pub async fn get_request(
    service: &RequestService,
    request_id: i64,
    request: &HttpRequest,
) -> ActixResult<HttpResponse> {
    let storage = service.get_storage(request);

    match storage.get_request_by_id(request_id).await {
        Ok(Some(record)) => Ok(HttpResponse::Ok().json(ApiResponse::success(
            record,
            "Request retrieved successfully",
        ))),
        Ok(None) => Ok(HttpResponse::NotFound().json(ApiResponse::error_empty(
            ErrorCode::RequestNotFound,
            "Request not found",
        ))),
        Err(e) => Ok(error_response(&e, None)),
    }
}
