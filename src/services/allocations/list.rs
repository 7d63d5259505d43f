use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};

use super::AllocationService;
use crate::config::AppConfig;
use crate::models::allocations::requests::AllocationListParams;
use crate::models::allocations::responses::AllocationListResponse;
use crate::models::{ApiResponse, ErrorCode};
use crate::services::error_response;
use crate::utils::{DataTable, SortDirection};

/// 可排序的列
pub(crate) const SORTABLE_COLUMNS: &[&str] = &[
    "id",
    "first_name",
    "last_name",
    "email",
    "unit_code",
    "unit_name",
    "activity_type",
    "activity_name",
    "session_date",
    "start_at",
    "end_at",
    "location",
    "status",
    "paycode_id",
    "teaching_role",
    "mode",
    "hours",
];

/// 排序列不在白名单中时按课次日期排序
pub(crate) fn sort_key(sort: Option<&str>) -> &str {
    sort.map(str::trim)
        .and_then(|s| SORTABLE_COLUMNS.iter().copied().find(|c| *c == s))
        .unwrap_or("session_date")
}

pub async fn list_allocations(
    service: &AllocationService,
    params: AllocationListParams,
    request: &HttpRequest,
) -> ActixResult<HttpResponse> {
    let storage = service.get_storage(request);
    let config = &AppConfig::get().allocation;

    let (page, limit) = params.pagination.normalized(
        config.default_page_size as i64,
        config.max_page_size as i64,
    );

    let rows = match storage.list_allocation_rows(&params.filter, None).await {
        Ok(rows) => rows,
        Err(e) => {
            return Ok(error_response(
                &e,
                Some(ErrorCode::AllocationValidationFailed),
            ));
        }
    };

    let table = match DataTable::new(rows) {
        Ok(table) => table,
        Err(e) => return Ok(error_response(&e, None)),
    };

    let (items, pagination) = table
        .search(params.q.as_deref())
        .sort(
            Some(sort_key(params.sort.as_deref())),
            SortDirection::from_param(params.dir.as_deref()),
        )
        .page(page, limit);

    Ok(HttpResponse::Ok().json(ApiResponse::success(
        AllocationListResponse { items, pagination },
        "Allocations retrieved successfully",
    )))
}
