use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};
use tracing::{debug, info};

use super::AllocationService;
use crate::middlewares::RequireUser;
use crate::models::allocations::requests::AllocationPatch;
use crate::models::allocations::responses::AllocationUpdateResponse;
use crate::models::{ApiResponse, ErrorCode};
use crate::services::error_response;

/// 编辑分配
///
/// 输入校验先于数据库访问；分配不存在返回 404；
/// 写入与传播在存储层同一事务内完成。
pub async fn update_allocation(
    service: &AllocationService,
    allocation_id: i64,
    patch: AllocationPatch,
    request: &HttpRequest,
) -> ActixResult<HttpResponse> {
    let edit = match patch.validate() {
        Ok(edit) => edit,
        Err(e) => {
            debug!("分配 {} 编辑请求校验失败: {}", allocation_id, e.message());
            return Ok(error_response(
                &e,
                Some(ErrorCode::AllocationValidationFailed),
            ));
        }
    };

    let storage = service.get_storage(request);
    let editor = RequireUser::extract_user_id(request);

    match storage.update_allocation(allocation_id, edit).await {
        Ok(Some(update)) => {
            info!(
                "用户 {:?} 编辑了分配 {}，忽略的传播目标: {:?}",
                editor, allocation_id, update.dropped_occurrence_ids
            );
            Ok(HttpResponse::Ok().json(ApiResponse::success(
                AllocationUpdateResponse {
                    ok: true,
                    row: update.row,
                    dropped_occurrence_ids: update.dropped_occurrence_ids,
                },
                "Allocation updated successfully",
            )))
        }
        Ok(None) => Ok(HttpResponse::NotFound().json(ApiResponse::error_empty(
            ErrorCode::AllocationNotFound,
            "Allocation not found",
        ))),
        Err(e) => Ok(error_response(
            &e,
            Some(ErrorCode::AllocationValidationFailed),
        )),
    }
}
