use serde::{Deserialize, Serialize};
use ts_rs::TS;

use super::details::RequestDetails;
use crate::errors::{Result, TeachAllocError};
use crate::models::users::entities::UserRole;

// 申请类型
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, TS)]
#[serde(rename_all = "snake_case")]
#[ts(export, export_to = "../frontend/src/types/generated/request.ts")]
pub enum RequestType {
    Claim,
    Swap,
    Correction,
    Cancellation,
    Query,
}

impl RequestType {
    pub const ALL: [RequestType; 5] = [
        RequestType::Claim,
        RequestType::Swap,
        RequestType::Correction,
        RequestType::Cancellation,
        RequestType::Query,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            RequestType::Claim => "claim",
            RequestType::Swap => "swap",
            RequestType::Correction => "correction",
            RequestType::Cancellation => "cancellation",
            RequestType::Query => "query",
        }
    }

    /// 新建申请的初始状态
    pub fn initial_status(self) -> RequestStatus {
        match self {
            RequestType::Claim | RequestType::Correction => RequestStatus::PendingTa,
            RequestType::Swap | RequestType::Cancellation | RequestType::Query => {
                RequestStatus::PendingUc
            }
        }
    }

    /// 审核页标题
    pub fn review_title(self) -> &'static str {
        match self {
            RequestType::Claim => "Claim Request",
            RequestType::Swap => "Swap Request",
            RequestType::Correction => "Correction Request",
            RequestType::Cancellation => "Cancellation Request",
            RequestType::Query => "Query",
        }
    }
}

impl std::fmt::Display for RequestType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for RequestType {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        RequestType::ALL
            .iter()
            .copied()
            .find(|t| t.as_str() == s)
            .ok_or_else(|| format!("Invalid request type: {s}"))
    }
}

// 申请状态
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, TS)]
#[serde(rename_all = "snake_case")]
#[ts(export, export_to = "../frontend/src/types/generated/request.ts")]
pub enum RequestStatus {
    Pending,
    PendingTa,
    PendingUc,
    Approved,
    Rejected,
}

impl RequestStatus {
    pub fn as_str(self) -> &'static str {
        match self {
            RequestStatus::Pending => "pending",
            RequestStatus::PendingTa => "pending_ta",
            RequestStatus::PendingUc => "pending_uc",
            RequestStatus::Approved => "approved",
            RequestStatus::Rejected => "rejected",
        }
    }

    pub fn is_terminal(self) -> bool {
        matches!(self, RequestStatus::Approved | RequestStatus::Rejected)
    }

    /// 计入"未结申请"的状态
    pub fn open_statuses() -> [RequestStatus; 2] {
        [RequestStatus::PendingTa, RequestStatus::PendingUc]
    }
}

impl std::fmt::Display for RequestStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for RequestStatus {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s {
            "pending" => Ok(RequestStatus::Pending),
            "pending_ta" => Ok(RequestStatus::PendingTa),
            "pending_uc" => Ok(RequestStatus::PendingUc),
            "approved" => Ok(RequestStatus::Approved),
            "rejected" => Ok(RequestStatus::Rejected),
            _ => Err(format!("Invalid request status: {s}")),
        }
    }
}

// 审核动作
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, TS)]
#[serde(rename_all = "snake_case")]
#[ts(export, export_to = "../frontend/src/types/generated/request.ts")]
pub enum ReviewAction {
    Approve,
    Reject,
    Forward,
}

/// 当前角色在该申请上可执行的动作
///
/// UC（含管理员）可批准或驳回，查询类申请只能驳回（关闭）；
/// TA 可转交 UC 或驳回；导师只读。终态或未知类型的申请没有可用动作。
pub fn available_actions(
    kind: Option<RequestType>,
    status: RequestStatus,
    role: &UserRole,
) -> Vec<ReviewAction> {
    let Some(kind) = kind else {
        return Vec::new();
    };
    if status.is_terminal() {
        return Vec::new();
    }

    match role {
        UserRole::Admin | UserRole::Coordinator => {
            if kind == RequestType::Query {
                vec![ReviewAction::Reject]
            } else {
                vec![ReviewAction::Approve, ReviewAction::Reject]
            }
        }
        UserRole::Assistant => {
            if matches!(status, RequestStatus::Pending | RequestStatus::PendingTa) {
                vec![ReviewAction::Forward, ReviewAction::Reject]
            } else {
                vec![ReviewAction::Reject]
            }
        }
        UserRole::Tutor => Vec::new(),
    }
}

/// 计算审核动作后的新状态，不修改任何数据
pub fn decide(
    kind: Option<RequestType>,
    status: RequestStatus,
    role: &UserRole,
    action: ReviewAction,
) -> Result<RequestStatus> {
    if kind.is_none() {
        return Err(TeachAllocError::validation(
            "This request type is not recognized or supported yet.",
        ));
    }
    if status.is_terminal() {
        return Err(TeachAllocError::conflict(format!(
            "Request has already been {status}"
        )));
    }
    if !available_actions(kind, status, role).contains(&action) {
        return Err(TeachAllocError::authorization(format!(
            "Role {role} cannot perform this action on a {status} request"
        )));
    }

    Ok(match action {
        ReviewAction::Approve => RequestStatus::Approved,
        ReviewAction::Reject => RequestStatus::Rejected,
        ReviewAction::Forward => RequestStatus::PendingUc,
    })
}

// 申请记录
#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/request.ts")]
pub struct RequestRecord {
    pub id: i64,
    pub requester_id: i64,
    pub allocation_id: i64,
    /// 原样保存的类型字符串，未知类型也能读出
    pub request_type: String,
    pub request_status: RequestStatus,
    pub request_reason: Option<String>,
    pub details: serde_json::Value,
    pub reviewer_id: Option<i64>,
    pub reviewer_note: Option<String>,
    pub rejection_reason: Option<String>,
    pub created_at: chrono::DateTime<chrono::Utc>,
    pub updated_at: chrono::DateTime<chrono::Utc>,
}

impl RequestRecord {
    pub fn kind(&self) -> Option<RequestType> {
        self.request_type.parse().ok()
    }

    pub fn parsed_details(&self) -> Result<RequestDetails> {
        match self.kind() {
            Some(kind) => RequestDetails::parse(kind, &self.details),
            None => Err(TeachAllocError::validation(format!(
                "Unsupported request type: {}",
                self.request_type
            ))),
        }
    }
}

/// 审核结果（写入存储层）
#[derive(Debug, Clone, PartialEq)]
pub struct RequestDecision {
    pub status: RequestStatus,
    pub reviewer_id: i64,
    pub reviewer_note: Option<String>,
    pub rejection_reason: Option<String>,
}
