use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};
use std::sync::Arc;
use tracing::warn;

use super::RequestService;
use crate::errors::Result;
use crate::middlewares::RequireUser;
use crate::models::allocations::entities::AllocationRow;
use crate::models::requests::details::RequestDetails;
use crate::models::requests::entities::{RequestRecord, available_actions};
use crate::models::requests::responses::{
    FALLBACK_MESSAGE, FALLBACK_TITLE, ReviewPanel, ReviewView,
};
use crate::models::{ApiResponse, ErrorCode};
use crate::services::error_response;
use crate::storage::Storage;

/// 申请审核视图
///
/// 未知类型返回兜底视图，不带任何动作；已知类型但详情损坏时返回
/// `InvalidDetails` 面板，动作仍按状态与角色给出。
pub async fn review_request(
    service: &RequestService,
    request_id: i64,
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

    match build_view(&storage, record, &reviewer.role).await {
        Ok(view) => Ok(HttpResponse::Ok().json(ApiResponse::success(
            view,
            "Review retrieved successfully",
        ))),
        Err(e) => Ok(error_response(&e, None)),
    }
}

async fn build_view(
    storage: &Arc<dyn Storage>,
    record: RequestRecord,
    role: &crate::models::users::entities::UserRole,
) -> Result<ReviewView> {
    let requester = storage.get_user_by_id(record.requester_id).await?;
    let allocation = storage.get_allocation_row(record.allocation_id).await?;

    let Some(kind) = record.kind() else {
        warn!(
            "申请 {} 的类型 '{}' 无法识别，返回兜底视图",
            record.id, record.request_type
        );
        return Ok(ReviewView {
            title: FALLBACK_TITLE.to_string(),
            request: record,
            requester,
            allocation,
            panel: ReviewPanel::Unsupported {
                message: FALLBACK_MESSAGE.to_string(),
            },
            actions: Vec::new(),
        });
    };

    let panel = match record.parsed_details() {
        Ok(details) => build_panel(storage, details, &record, allocation.as_ref()).await?,
        Err(e) => {
            warn!("申请 {} 的详情无法解析: {}", record.id, e.message());
            ReviewPanel::InvalidDetails {
                error: e.message().to_string(),
            }
        }
    };

    Ok(ReviewView {
        title: kind.review_title().to_string(),
        actions: available_actions(Some(kind), record.request_status, role),
        request: record,
        requester,
        allocation,
        panel,
    })
}

async fn build_panel(
    storage: &Arc<dyn Storage>,
    details: RequestDetails,
    record: &RequestRecord,
    allocation: Option<&AllocationRow>,
) -> Result<ReviewPanel> {
    let panel = match details {
        RequestDetails::Claim(claim) => {
            let system_hours = allocation.and_then(|a| a.hours);
            let system_paycode = allocation.and_then(|a| a.paycode_id.clone());
            ReviewPanel::Claim {
                hours_differ: claim.hours_differ(system_hours),
                paycode_differs: claim.paycode_differs(system_paycode.as_deref()),
                claimed_hours: claim.hours,
                claimed_paycode: claim.paycode,
                system_hours,
                system_paycode,
            }
        }
        RequestDetails::Swap(swap) => {
            let suggested_tutor = match swap.suggested_tutor_id {
                Some(id) => storage.get_user_by_id(id).await?,
                None => None,
            };
            let eligible_allocations = match allocation {
                Some(current) => storage.list_swap_candidates(current).await?,
                None => Vec::new(),
            };
            ReviewPanel::Swap {
                suggested_tutor,
                suggested_allocation_id: swap.suggested_alloc_id,
                eligible_allocations,
            }
        }
        RequestDetails::Correction(correction) => {
            let changed_fields = match allocation {
                Some(current) => correction
                    .changed_fields(current)
                    .into_iter()
                    .map(String::from)
                    .collect(),
                None => Vec::new(),
            };
            ReviewPanel::Correction {
                proposed: correction,
                changed_fields,
            }
        }
        RequestDetails::Cancellation => {
            let current_tutor = allocation.and_then(|a| a.user_id);
            let replacement_candidates = match allocation.and_then(|a| a.unit_code.as_deref()) {
                Some(unit_code) => storage
                    .list_tutors_by_unit(unit_code)
                    .await?
                    .into_iter()
                    .filter(|u| Some(u.id) != current_tutor)
                    .collect(),
                None => Vec::new(),
            };
            ReviewPanel::Cancellation {
                replacement_candidates,
            }
        }
        RequestDetails::Query => ReviewPanel::Query {
            reason: record.request_reason.clone(),
        },
    };

    Ok(panel)
}
