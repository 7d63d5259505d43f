use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};
use tracing::info;

use super::RequestService;
use crate::middlewares::RequireUser;
use crate::models::requests::details::RequestDetails;
use crate::models::requests::entities::RequestType;
use crate::models::requests::requests::{CreateRequestBody, NewRequest};
use crate::models::{ApiResponse, ErrorCode};
use crate::services::error_response;

/// 提交申请，申请人为当前用户
pub async fn create_request(
    service: &RequestService,
    body: CreateRequestBody,
    request: &HttpRequest,
) -> ActixResult<HttpResponse> {
    let Some(requester_id) = RequireUser::extract_user_id(request) else {
        return Ok(HttpResponse::Unauthorized().json(ApiResponse::error_empty(
            ErrorCode::Unauthorized,
            "Unauthorized: missing current user",
        )));
    };

    let kind = match body.request_type.trim().parse::<RequestType>() {
        Ok(kind) => kind,
        Err(msg) => {
            return Ok(HttpResponse::BadRequest().json(ApiResponse::error_empty(
                ErrorCode::RequestTypeUnsupported,
                msg,
            )));
        }
    };

    let details = match RequestDetails::parse(kind, &body.details) {
        Ok(details) => details,
        Err(e) => return Ok(error_response(&e, Some(ErrorCode::RequestDetailsInvalid))),
    };

    let storage = service.get_storage(request);

    match storage.get_allocation_row(body.allocation_id).await {
        Ok(Some(_)) => {}
        Ok(None) => {
            return Ok(HttpResponse::NotFound().json(ApiResponse::error_empty(
                ErrorCode::AllocationNotFound,
                "Allocation not found",
            )));
        }
        Err(e) => return Ok(error_response(&e, None)),
    }

    match storage
        .find_open_request(requester_id, body.allocation_id, kind.as_str())
        .await
    {
        Ok(Some(existing)) => {
            return Ok(HttpResponse::Conflict().json(ApiResponse::error_empty(
                ErrorCode::RequestAlreadyOpen,
                format!(
                    "An open {kind} request ({}) already exists for this allocation",
                    existing.id
                ),
            )));
        }
        Ok(None) => {}
        Err(e) => return Ok(error_response(&e, None)),
    }

    let new_request = NewRequest {
        requester_id,
        allocation_id: body.allocation_id,
        request_type: kind.as_str().to_string(),
        request_status: kind.initial_status(),
        request_reason: body.request_reason.filter(|r| !r.trim().is_empty()),
        details: details.to_value(),
    };

    match storage.create_request(new_request).await {
        Ok(record) => {
            info!(
                "用户 {} 提交了 {} 申请 {}（分配 {}）",
                requester_id, kind, record.id, record.allocation_id
            );
            Ok(HttpResponse::Created().json(ApiResponse::success(
                record,
                "Request submitted successfully",
            )))
        }
        Err(e) => Ok(error_response(&e, None)),
    }
}
