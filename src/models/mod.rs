//! 数据模型定义
//!
//! 请求体、响应体与业务实体。数据库实体见 `entity` 模块。

pub mod activities;
pub mod allocations;
pub mod common;
pub mod paycodes;
pub mod requests;
pub mod users;

use serde::{Deserialize, Serialize};

pub use common::pagination::{PaginationInfo, PaginationQuery};
pub use common::response::ApiResponse;

/// 业务错误代码，随响应体中的 `code` 字段返回
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[repr(i32)]
pub enum ErrorCode {
    Success = 0,

    // 通用错误
    BadRequest = 1000,
    Unauthorized = 1001,
    Forbidden = 1003,
    NotFound = 1004,
    Conflict = 1009,
    InternalServerError = 1500,

    // 分配相关
    AllocationValidationFailed = 2000,
    AllocationNotFound = 2004,
    AllocationCreationFailed = 2005,
    ExportFailed = 2010,

    // 教学活动相关
    ActivityNotFound = 3004,

    // 申请相关
    RequestTypeUnsupported = 4000,
    RequestDetailsInvalid = 4001,
    RequestNotFound = 4004,
    RequestAlreadyOpen = 4009,
    RequestAlreadyDecided = 4010,
    RequestActionNotAllowed = 4030,

    // 用户相关
    UserNotFound = 5004,
}
