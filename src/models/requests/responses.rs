use serde::Serialize;
use ts_rs::TS;

use super::details::CorrectionDetails;
use super::entities::{RequestRecord, ReviewAction};
use crate::models::allocations::entities::AllocationRow;
use crate::models::users::entities::User;

pub const FALLBACK_TITLE: &str = "Unknown Request Type";
pub const FALLBACK_MESSAGE: &str = "This request type is not recognized or supported yet.";

// 各类型审核面板
#[derive(Debug, Clone, Serialize, TS)]
#[serde(tag = "kind", rename_all = "snake_case")]
#[ts(export, export_to = "../frontend/src/types/generated/request.ts")]
pub enum ReviewPanel {
    Claim {
        claimed_hours: f64,
        claimed_paycode: String,
        system_hours: Option<f64>,
        system_paycode: Option<String>,
        hours_differ: bool,
        paycode_differs: bool,
    },
    Swap {
        suggested_tutor: Option<User>,
        suggested_allocation_id: Option<i64>,
        eligible_allocations: Vec<AllocationRow>,
    },
    Correction {
        proposed: CorrectionDetails,
        changed_fields: Vec<String>,
    },
    Cancellation {
        replacement_candidates: Vec<User>,
    },
    Query {
        reason: Option<String>,
    },
    /// 已知类型但详情无法解析
    InvalidDetails {
        error: String,
    },
    Unsupported {
        message: String,
    },
}

// 审核视图
#[derive(Debug, Clone, Serialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/request.ts")]
pub struct ReviewView {
    pub title: String,
    pub request: RequestRecord,
    pub requester: Option<User>,
    pub allocation: Option<AllocationRow>,
    pub panel: ReviewPanel,
    pub actions: Vec<ReviewAction>,
}

// 申请列表响应
#[derive(Debug, Clone, Serialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/request.ts")]
pub struct RequestListResponse {
    pub items: Vec<RequestRecord>,
}
