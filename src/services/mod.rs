pub mod activities;
pub mod allocations;
pub mod paycodes;
pub mod requests;
pub mod users;

pub use activities::ActivityService;
pub use allocations::AllocationService;
pub use paycodes::PaycodeService;
pub use requests::RequestService;
pub use users::UserService;

use actix_web::{HttpRequest, HttpResponse, http::StatusCode};
use std::sync::Arc;
use tracing::error;

use crate::errors::TeachAllocError;
use crate::models::{ApiResponse, ErrorCode};
use crate::storage::Storage;

// 从 app data 取存储层
pub(crate) fn storage_from_request(request: &HttpRequest) -> Arc<dyn Storage> {
    request
        .app_data::<actix_web::web::Data<Arc<dyn Storage>>>()
        .expect("Storage not found in app data")
        .get_ref()
        .clone()
}

/// 错误类别对应的 HTTP 状态码
pub(crate) fn status_for(err: &TeachAllocError) -> StatusCode {
    match err {
        TeachAllocError::Validation(_)
        | TeachAllocError::Serialization(_)
        | TeachAllocError::DateParse(_) => StatusCode::BAD_REQUEST,
        TeachAllocError::NotFound(_) => StatusCode::NOT_FOUND,
        TeachAllocError::Conflict(_) => StatusCode::CONFLICT,
        TeachAllocError::Authentication(_) => StatusCode::UNAUTHORIZED,
        TeachAllocError::Authorization(_) => StatusCode::FORBIDDEN,
        _ => StatusCode::INTERNAL_SERVER_ERROR,
    }
}

/// 把业务错误转换为响应；服务端错误保留原始信息并记录日志
pub(crate) fn error_response(err: &TeachAllocError, code: Option<ErrorCode>) -> HttpResponse {
    let status = status_for(err);
    if status.is_server_error() {
        error!("{}", err);
    }
    let mut body = ApiResponse::<()>::from_error(err);
    if let Some(code) = code.filter(|_| status.is_client_error()) {
        body.code = code as i32;
    }
    HttpResponse::build(status).json(body)
}
