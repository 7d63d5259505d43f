use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};

use super::AllocationService;
use crate::models::allocations::requests::CreateUnscheduledRequest;
use crate::models::{ApiResponse, ErrorCode};
use crate::services::error_response;

pub async fn create_unscheduled(
    service: &AllocationService,
    body: CreateUnscheduledRequest,
    request: &HttpRequest,
) -> ActixResult<HttpResponse> {
    if let Err(e) = body.validate() {
        return Ok(error_response(
            &e,
            Some(ErrorCode::AllocationCreationFailed),
        ));
    }

    let storage = service.get_storage(request);

    match storage.create_unscheduled_allocation(body).await {
        Ok(row) => Ok(HttpResponse::Created().json(ApiResponse::success(
            row,
            "Unscheduled allocation created successfully",
        ))),
        Err(e) => Ok(error_response(
            &e,
            Some(ErrorCode::AllocationCreationFailed),
        )),
    }
}
