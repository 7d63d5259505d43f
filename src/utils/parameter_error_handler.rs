//! 参数解析错误处理
//!
//! 把 actix 的 JSON / 查询 / 路径提取错误统一包装为 400 的 `ApiResponse`。

use actix_web::error::{JsonPayloadError, PathError, QueryPayloadError};
use actix_web::{Error, HttpRequest, HttpResponse};
use tracing::debug;

use crate::models::{ApiResponse, ErrorCode};

fn bad_request(kind: &str, detail: String) -> Error {
    debug!("{kind} 参数解析失败: {detail}");
    let response = HttpResponse::BadRequest().json(ApiResponse::error_empty(
        ErrorCode::BadRequest,
        format!("Invalid {kind}: {detail}"),
    ));
    actix_web::error::InternalError::from_response(detail, response).into()
}

pub fn json_error_handler(err: JsonPayloadError, _req: &HttpRequest) -> Error {
    bad_request("request body", err.to_string())
}

pub fn query_error_handler(err: QueryPayloadError, _req: &HttpRequest) -> Error {
    bad_request("query parameters", err.to_string())
}

pub fn path_error_handler(err: PathError, _req: &HttpRequest) -> Error {
    bad_request("path parameters", err.to_string())
}
