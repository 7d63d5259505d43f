use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};

use super::ActivityService;
use crate::models::activities::requests::OccurrenceQuery;
use crate::models::activities::responses::{OccurrenceListResponse, OccurrenceOption};
use crate::models::{ApiResponse, ErrorCode};
use crate::services::error_response;

/// 课次列表，供传播选择器使用
pub async fn list_occurrences(
    service: &ActivityService,
    activity_id: i64,
    query: OccurrenceQuery,
    request: &HttpRequest,
) -> ActixResult<HttpResponse> {
    let storage = service.get_storage(request);

    match storage.activity_exists(activity_id).await {
        Ok(true) => {}
        Ok(false) => {
            return Ok(HttpResponse::NotFound().json(ApiResponse::error_empty(
                ErrorCode::ActivityNotFound,
                "Activity not found",
            )));
        }
        Err(e) => return Ok(error_response(&e, None)),
    }

    let from = query
        .future_only()
        .then(|| chrono::Local::now().date_naive());

    match storage.list_occurrences(activity_id, from).await {
        Ok(occurrences) => Ok(HttpResponse::Ok().json(ApiResponse::success(
            OccurrenceListResponse {
                activity_id,
                items: occurrences.iter().map(OccurrenceOption::from).collect(),
            },
            "Occurrences retrieved successfully",
        ))),
        Err(e) => Ok(error_response(&e, None)),
    }
}
