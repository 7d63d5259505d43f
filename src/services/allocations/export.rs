//! 分配导出服务

use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};
use tracing::{error, info};

use super::AllocationService;
use super::list::sort_key;
use crate::config::AppConfig;
use crate::models::allocations::requests::AllocationExportParams;
use crate::models::{ApiResponse, ErrorCode};
use crate::services::error_response;
use crate::utils::{DataTable, ExportOptions, SortDirection, export_csv, export_json};

/// 导出格式
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum ExportFormat {
    Csv,
    Json,
}

impl ExportFormat {
    fn from_param(format: Option<&str>) -> Option<Self> {
        match format.map(|f| f.trim().to_ascii_lowercase()).as_deref() {
            None | Some("") | Some("csv") => Some(ExportFormat::Csv),
            Some("json") => Some(ExportFormat::Json),
            _ => None,
        }
    }
}

/// 导出分配列表（与列表接口相同的筛选、搜索和排序，不分页）
pub async fn export_allocations(
    service: &AllocationService,
    params: AllocationExportParams,
    request: &HttpRequest,
) -> ActixResult<HttpResponse> {
    let Some(format) = ExportFormat::from_param(params.format.as_deref()) else {
        return Ok(HttpResponse::BadRequest().json(ApiResponse::error_empty(
            ErrorCode::BadRequest,
            "format must be csv or json",
        )));
    };

    let storage = service.get_storage(request);
    let max_rows = AppConfig::get().allocation.max_export_rows;

    let rows = match storage
        .list_allocation_rows(&params.filter, Some(max_rows))
        .await
    {
        Ok(rows) => rows,
        Err(e) => return Ok(error_response(&e, Some(ErrorCode::ExportFailed))),
    };

    let values = match DataTable::new(rows) {
        Ok(table) => table
            .search(params.q.as_deref())
            .sort(
                Some(sort_key(params.sort.as_deref())),
                SortDirection::from_param(params.dir.as_deref()),
            )
            .into_values(),
        Err(e) => return Ok(error_response(&e, Some(ErrorCode::ExportFailed))),
    };

    let options = ExportOptions::from_params(params.exclude.as_deref(), params.columns.as_deref());

    match format {
        ExportFormat::Csv => match export_csv(&values, &options) {
            Ok(Some(data)) => {
                info!("导出分配 CSV，共 {} 行", values.len());
                Ok(HttpResponse::Ok()
                    .content_type("text/csv; charset=utf-8")
                    .insert_header((
                        "Content-Disposition",
                        "attachment; filename=\"allocations.csv\"",
                    ))
                    .body(data))
            }
            Ok(None) => Ok(HttpResponse::NoContent().finish()),
            Err(e) => {
                error!("导出分配失败: {}", e);
                Ok(error_response(&e, Some(ErrorCode::ExportFailed)))
            }
        },
        ExportFormat::Json => match export_json(&values, &options) {
            Ok(Some(data)) => {
                info!("导出分配 JSON，共 {} 行", values.len());
                Ok(HttpResponse::Ok()
                    .content_type("application/json; charset=utf-8")
                    .insert_header((
                        "Content-Disposition",
                        "attachment; filename=\"allocations.json\"",
                    ))
                    .body(data))
            }
            Ok(None) => Ok(HttpResponse::NoContent().finish()),
            Err(e) => {
                error!("导出分配失败: {}", e);
                Ok(error_response(&e, Some(ErrorCode::ExportFailed)))
            }
        },
    }
}
