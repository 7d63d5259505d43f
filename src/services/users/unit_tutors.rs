use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};

use super::UserService;
use crate::models::users::responses::UnitTutorsResponse;
use crate::models::ApiResponse;
use crate::services::error_response;

/// 在该单元持有分配的导师（取消申请的替换候选）
pub async fn list_unit_tutors(
    service: &UserService,
    unit_code: String,
    request: &HttpRequest,
) -> ActixResult<HttpResponse> {
    let storage = service.get_storage(request);

    match storage.list_tutors_by_unit(&unit_code).await {
        Ok(items) => Ok(HttpResponse::Ok().json(ApiResponse::success(
            UnitTutorsResponse { unit_code, items },
            "Unit tutors retrieved successfully",
        ))),
        Err(e) => Ok(error_response(&e, None)),
    }
}
