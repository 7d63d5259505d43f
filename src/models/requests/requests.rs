use serde::{Deserialize, Serialize};
use ts_rs::TS;

use super::entities::{RequestStatus, ReviewAction};
use crate::models::common::pagination::deserialize_optional_string_to_i64;

// 创建申请请求（申请人为当前用户）
#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[serde(deny_unknown_fields)]
#[ts(export, export_to = "../frontend/src/types/generated/request.ts")]
pub struct CreateRequestBody {
    pub allocation_id: i64,
    pub request_type: String,
    pub request_reason: Option<String>,
    #[serde(default)]
    pub details: serde_json::Value,
}

// 未结申请查询参数
#[derive(Debug, Clone, Default, Deserialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/request.ts")]
pub struct OpenRequestQuery {
    #[serde(default, deserialize_with = "deserialize_optional_string_to_i64")]
    pub allocation_id: Option<i64>,
    /// 仅返回当前用户提交的申请，接受 `1` / `true`
    pub mine: Option<String>,
}

impl OpenRequestQuery {
    pub fn mine(&self) -> bool {
        matches!(self.mine.as_deref(), Some("1") | Some("true"))
    }
}

// 审核决定请求
#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[serde(deny_unknown_fields)]
#[ts(export, export_to = "../frontend/src/types/generated/request.ts")]
pub struct DecisionBody {
    pub action: ReviewAction,
    /// 审核意见
    pub comment: Option<String>,
    /// 驳回原因，仅在驳回时记录
    pub reason: Option<String>,
}

/// 写入存储层的新申请
#[derive(Debug, Clone)]
pub struct NewRequest {
    pub requester_id: i64,
    pub allocation_id: i64,
    pub request_type: String,
    pub request_status: RequestStatus,
    pub request_reason: Option<String>,
    pub details: serde_json::Value,
}
