use serde::{Deserialize, Serialize};
use ts_rs::TS;

use super::entities::AllocationRow;
use crate::models::PaginationInfo;

// 分配编辑响应
#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/allocation.ts")]
pub struct AllocationUpdateResponse {
    pub ok: bool,
    pub row: AllocationRow,
    /// 不属于该教学活动、被过滤掉的目标课次
    pub dropped_occurrence_ids: Vec<i64>,
}

// 分配列表响应
#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/allocation.ts")]
pub struct AllocationListResponse {
    pub items: Vec<AllocationRow>,
    pub pagination: PaginationInfo,
}
