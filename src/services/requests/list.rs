use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};

use super::RequestService;
use crate::middlewares::RequireUser;
use crate::models::requests::requests::OpenRequestQuery;
use crate::models::requests::responses::RequestListResponse;
use crate::models::ApiResponse;
use crate::services::error_response;

/// 未结申请，`mine` 时只返回当前用户提交的
pub async fn list_open_requests(
    service: &RequestService,
    query: OpenRequestQuery,
    request: &HttpRequest,
) -> ActixResult<HttpResponse> {
    let storage = service.get_storage(request);
    let requester_id = if query.mine() {
        RequireUser::extract_user_id(request)
    } else {
        None
    };

    match storage
        .list_open_requests(query.allocation_id, requester_id)
        .await
    {
        Ok(items) => Ok(HttpResponse::Ok().json(ApiResponse::success(
            RequestListResponse { items },
            "Open requests retrieved successfully",
        ))),
        Err(e) => Ok(error_response(&e, None)),
    }
}
