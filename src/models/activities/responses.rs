use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use ts_rs::TS;

use super::entities::Occurrence;

// 课次选项（传播选择器使用）
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/activity.ts")]
pub struct OccurrenceOption {
    pub occurrence_id: i64,
    pub session_date: Option<NaiveDate>,
    pub status: Option<String>,
}

impl From<&Occurrence> for OccurrenceOption {
    fn from(occ: &Occurrence) -> Self {
        Self {
            occurrence_id: occ.id,
            session_date: occ.session_date,
            status: occ.is_cancelled.then(|| "cancelled".to_string()),
        }
    }
}

// 课次列表响应
#[derive(Debug, Serialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/activity.ts")]
pub struct OccurrenceListResponse {
    pub activity_id: i64,
    pub items: Vec<OccurrenceOption>,
}
