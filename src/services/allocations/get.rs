use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};

use super::AllocationService;
use crate::models::{ApiResponse, ErrorCode};
use crate::services::error_response;

pub async fn get_allocation(
    service: &AllocationService,
    allocation_id: i64,
    request: &HttpRequest,
) -> ActixResult<HttpResponse> {
    let storage = service.get_storage(request);

    match storage.get_allocation_row(allocation_id).await {
        Ok(Some(row)) => Ok(HttpResponse::Ok().json(ApiResponse::success(
            row,
            "Allocation retrieved successfully",
        ))),
        Ok(None) => Ok(HttpResponse::NotFound().json(ApiResponse::error_empty(
            ErrorCode::AllocationNotFound,
            "Allocation not found",
        ))),
        Err(e) => Ok(error_response(&e, None)),
    }
}
