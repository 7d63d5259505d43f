use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};

use super::PaycodeService;
use crate::models::ApiResponse;
use crate::services::error_response;

pub async fn list_paycodes(
    service: &PaycodeService,
    request: &HttpRequest,
) -> ActixResult<HttpResponse> {
    let storage = service.get_storage(request);

    match storage.list_paycodes().await {
        Ok(paycodes) => Ok(HttpResponse::Ok().json(ApiResponse::success(
            paycodes,
            "Paycodes retrieved successfully",
        ))),
        Err(e) => Ok(error_response(&e, None)),
    }
}
