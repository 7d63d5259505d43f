use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};
use tracing::info;

use super::RequestService;
use crate::errors::TeachAllocError;
use crate::middlewares::RequireUser;
use crate::models::requests::entities::{RequestDecision, RequestStatus, decide};
use crate::models::requests::requests::DecisionBody;
use crate::models::requests::responses::FALLBACK_MESSAGE;
use crate::models::{ApiResponse, ErrorCode};
use crate::services::error_response;

fn non_empty(value: Option<String>) -> Option<String> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

// 审核失败时对应的业务错误代码
fn decision_error_code(err: &TeachAllocError) -> Option<ErrorCode> {
    match err {
        TeachAllocError::Validation(_) => Some(ErrorCode::RequestTypeUnsupported),
        TeachAllocError::Conflict(_) => Some(ErrorCode::RequestAlreadyDecided),
        TeachAllocError::Authorization(_) => Some(ErrorCode::RequestActionNotAllowed),
        _ => None,
    }
}

/// 审核申请
///
/// 任何失败都不修改申请；未知类型的申请不可审核。
pub async fn decide_request(
    service: &RequestService,
    request_id: i64,
    body: DecisionBody,
    request: &HttpRequest,
) -> ActixResult<HttpResponse> {
    let Some(reviewer) = RequireUser::extract_user(request) else {
        return Ok(HttpResponse::Unauthorized().json(ApiResponse::error_empty(
            ErrorCode::Unauthorized,
            "Unauthorized: missing current user",
        )));
    };
    let storage = service.get_storage(request);

    let record = match storage.get_request_by_id(request_id).await {
        Ok(Some(record)) => record,
        Ok(None) => {
            return Ok(HttpResponse::NotFound().json(ApiResponse::error_empty(
                ErrorCode::RequestNotFound,
                "Request not found",
            )));
        }
        Err(e) => return Ok(error_response(&e, None)),
    };

    let kind = record.kind();
    if kind.is_none() {
        return Ok(HttpResponse::BadRequest().json(ApiResponse::error_empty(
            ErrorCode::RequestTypeUnsupported,
            FALLBACK_MESSAGE,
        )));
    }

    let next_status = match decide(kind, record.request_status, &reviewer.role, body.action) {
        Ok(status) => status,
        Err(e) => return Ok(error_response(&e, decision_error_code(&e))),
    };

    let decision = RequestDecision {
        status: next_status,
        reviewer_id: reviewer.id,
        reviewer_note: non_empty(body.comment),
        rejection_reason: if next_status == RequestStatus::Rejected {
            non_empty(body.reason)
        } else {
            None
        },
    };

    match storage.decide_request(request_id, decision).await {
        Ok(Some(updated)) => {
            info!(
                "用户 {} ({}) 将申请 {} 从 {} 改为 {}",
                reviewer.id, reviewer.role, request_id, record.request_status, next_status
            );
            Ok(HttpResponse::Ok().json(ApiResponse::success(
                updated,
                "Decision recorded successfully",
            )))
        }
        Ok(None) => Ok(HttpResponse::NotFound().json(ApiResponse::error_empty(
            ErrorCode::RequestNotFound,
            "Request not found",
        ))),
        Err(e) => Ok(error_response(&e, decision_error_code(&e))),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn blank_comments_are_dropped() {
        assert_eq!(non_empty(Some("  ".to_string())), None);
        assert_eq!(non_empty(Some(" ok ".to_string())), Some("ok".to_string()));
        assert_eq!(non_empty(None), None);
    }

    #[test]
    fn decision_errors_carry_request_codes() {
        assert_eq!(
            decision_error_code(&TeachAllocError::conflict("x")),
            Some(ErrorCode::RequestAlreadyDecided)
        );
        assert_eq!(
            decision_error_code(&TeachAllocError::authorization("x")),
            Some(ErrorCode::RequestActionNotAllowed)
        );
        assert_eq!(decision_error_code(&TeachAllocError::database_operation("x")), None);
    }
}
