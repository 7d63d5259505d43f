use chrono::{NaiveDate, NaiveTime};
use serde::{Deserialize, Serialize};
use ts_rs::TS;

use super::entities::AllocationStatus;
use super::propagation::{NotesMode, PropagateField, PropagationIntent, PropagationPayload};
use super::weekday::Dow;
use crate::errors::{Result, TeachAllocError};
use crate::models::common::pagination::{PaginationQuery, deserialize_optional_string_to_i64};

// 分配编辑请求（PATCH），缺省或 null 的字段保持不变
#[derive(Debug, Clone, Default, Serialize, Deserialize, TS)]
#[serde(deny_unknown_fields)]
#[ts(export, export_to = "../frontend/src/types/generated/allocation.ts")]
pub struct AllocationPatch {
    pub user_id: Option<i64>,
    pub paycode_id: Option<String>,
    #[ts(type = "string | null")]
    pub status: Option<AllocationStatus>,
    pub note: Option<String>,
    pub session_date: Option<String>,
    pub start_at: Option<String>,
    pub end_at: Option<String>,
    pub location: Option<String>,
    pub hours: Option<f64>,
    pub propagate_fields: Option<Vec<PropagateField>>,
    pub propagate_notes_mode: Option<NotesMode>,
    pub propagate_dow: Option<Dow>,
    pub propagate_occurrence_ids: Option<Vec<i64>>,
}

/// 课次时间三元组
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ScheduleEdit {
    pub session_date: NaiveDate,
    pub start_at: NaiveTime,
    pub end_at: NaiveTime,
}

/// 校验后的编辑意图
#[derive(Debug, Clone, Default, PartialEq)]
pub struct AllocationEdit {
    pub user_id: Option<i64>,
    pub paycode_id: Option<String>,
    pub status: Option<AllocationStatus>,
    pub note: Option<String>,
    pub schedule: Option<ScheduleEdit>,
    pub location: Option<String>,
    pub hours: Option<f64>,
    pub propagation: PropagationIntent,
}

impl AllocationPatch {
    /// 不访问数据库的输入校验
    pub fn validate(self) -> Result<AllocationEdit> {
        if let Some(user_id) = self.user_id {
            if user_id <= 0 {
                return Err(TeachAllocError::validation("user_id must be positive"));
            }
        }

        let paycode_id = match self.paycode_id {
            Some(code) if code.trim().is_empty() => {
                return Err(TeachAllocError::validation("paycode_id must not be empty"));
            }
            other => other,
        };

        let schedule = parse_schedule(
            non_empty(self.session_date),
            non_empty(self.start_at),
            non_empty(self.end_at),
        )?;

        if let Some(hours) = self.hours {
            if !(hours.is_finite() && hours > 0.0) {
                return Err(TeachAllocError::validation("hours must be a positive number"));
            }
        }

        let mut occurrence_ids: Vec<i64> = Vec::new();
        for id in self.propagate_occurrence_ids.unwrap_or_default() {
            if !occurrence_ids.contains(&id) {
                occurrence_ids.push(id);
            }
        }

        let mut fields: Vec<PropagateField> = Vec::new();
        for field in self.propagate_fields.unwrap_or_default() {
            if !fields.contains(&field) {
                fields.push(field);
            }
        }

        Ok(AllocationEdit {
            user_id: self.user_id,
            paycode_id,
            status: self.status,
            note: non_empty(self.note),
            schedule,
            location: non_empty(self.location),
            hours: self.hours,
            propagation: PropagationIntent {
                fields,
                notes_mode: self.propagate_notes_mode.unwrap_or_default(),
                dow: self.propagate_dow,
                occurrence_ids,
            },
        })
    }

    /// 写入选择器生成的传播载荷
    ///
    /// 客户端构造 PATCH 请求体时使用，服务端处理路径不经过此方法。
    pub fn with_propagation(mut self, payload: PropagationPayload) -> Self {
        self.propagate_fields = Some(payload.fields);
        self.propagate_notes_mode = payload.notes_mode;
        self.propagate_dow = payload.dow;
        self.propagate_occurrence_ids = if payload.occurrence_ids.is_empty() {
            None
        } else {
            Some(payload.occurrence_ids)
        };
        self
    }
}

fn non_empty(value: Option<String>) -> Option<String> {
    value.filter(|v| !v.trim().is_empty())
}

fn parse_schedule(
    date: Option<String>,
    start: Option<String>,
    end: Option<String>,
) -> Result<Option<ScheduleEdit>> {
    match (date, start, end) {
        (None, None, None) => Ok(None),
        (Some(date), Some(start), Some(end)) => {
            let schedule = ScheduleEdit {
                session_date: parse_date(&date)?,
                start_at: parse_time("start_at", &start)?,
                end_at: parse_time("end_at", &end)?,
            };
            if schedule.end_at < schedule.start_at {
                return Err(TeachAllocError::validation(
                    "end_at must not be earlier than start_at",
                ));
            }
            Ok(Some(schedule))
        }
        _ => Err(TeachAllocError::validation(
            "session_date, start_at and end_at must be provided together",
        )),
    }
}

/// 取前 10 个字符按 YYYY-MM-DD 解析，允许传入完整时间戳
pub fn parse_date(value: &str) -> Result<NaiveDate> {
    let trimmed = value.trim();
    let head = trimmed.get(..10).unwrap_or(trimmed);
    NaiveDate::parse_from_str(head, "%Y-%m-%d")
        .map_err(|_| TeachAllocError::validation(format!("invalid session_date: {value}")))
}

/// 接受 HH:MM 或 HH:MM:SS
pub fn parse_time(field: &str, value: &str) -> Result<NaiveTime> {
    let trimmed = value.trim();
    NaiveTime::parse_from_str(trimmed, "%H:%M:%S")
        .or_else(|_| NaiveTime::parse_from_str(trimmed, "%H:%M"))
        .map_err(|_| TeachAllocError::validation(format!("invalid {field}: {value}")))
}

// 分配列表查询参数（来自HTTP请求）
#[derive(Debug, Clone, Default, Deserialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/allocation.ts")]
pub struct AllocationListParams {
    #[serde(flatten)]
    #[ts(flatten)]
    pub pagination: PaginationQuery,
    #[serde(flatten)]
    #[ts(flatten)]
    pub filter: AllocationFilter,
    pub q: Option<String>,
    pub sort: Option<String>,
    pub dir: Option<String>,
}

// 分配筛选条件（由存储层下推为 SQL 条件）
#[derive(Debug, Clone, Default, Deserialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/allocation.ts")]
pub struct AllocationFilter {
    pub unit_code: Option<String>,
    pub activity_type: Option<String>,
    #[serde(default, deserialize_with = "deserialize_optional_string_to_i64")]
    pub activity_id: Option<i64>,
    pub status: Option<String>,
    #[serde(default, deserialize_with = "deserialize_optional_string_to_i64")]
    pub user_id: Option<i64>,
    pub mode: Option<String>,
}

// 分配导出参数
#[derive(Debug, Clone, Default, Deserialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/allocation.ts")]
pub struct AllocationExportParams {
    #[serde(flatten)]
    #[ts(flatten)]
    pub filter: AllocationFilter,
    pub q: Option<String>,
    pub sort: Option<String>,
    pub dir: Option<String>,
    /// csv（默认）或 json
    pub format: Option<String>,
    /// 逗号分隔的排除字段，缺省为 id
    pub exclude: Option<String>,
    /// 逗号分隔的列顺序
    pub columns: Option<String>,
}

// 创建未排课分配请求
#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/allocation.ts")]
pub struct CreateUnscheduledRequest {
    pub offering_id: i64,
    pub user_id: i64,
    pub hours: f64,
    pub activity_type: Option<String>,
    pub note: Option<String>,
}

impl CreateUnscheduledRequest {
    pub const DEFAULT_ACTIVITY_TYPE: &'static str = "Marking";

    pub fn activity_type(&self) -> String {
        self.activity_type
            .as_deref()
            .map(str::trim)
            .filter(|t| !t.is_empty())
            .unwrap_or(Self::DEFAULT_ACTIVITY_TYPE)
            .to_string()
    }

    pub fn validate(&self) -> Result<()> {
        if self.offering_id <= 0 || self.user_id <= 0 {
            return Err(TeachAllocError::validation(
                "offering_id and user_id must be positive",
            ));
        }
        if !(self.hours.is_finite() && self.hours > 0.0) {
            return Err(TeachAllocError::validation("hours must be a positive number"));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn patch(json: serde_json::Value) -> AllocationPatch {
        serde_json::from_value(json).unwrap()
    }

    #[test]
    fn partial_time_triple_is_rejected() {
        let cases = [
            serde_json::json!({"session_date": "2025-03-17"}),
            serde_json::json!({"start_at": "09:00", "end_at": "10:00"}),
            serde_json::json!({"session_date": "2025-03-17", "end_at": "10:00"}),
        ];
        for case in cases {
            let err = patch(case).validate().unwrap_err();
            assert_eq!(err.code(), "E005");
        }
    }

    #[test]
    fn full_triple_accepts_both_time_formats() {
        let edit = patch(serde_json::json!({
            "session_date": "2025-03-17T00:00:00Z",
            "start_at": "09:00",
            "end_at": "10:30:00"
        }))
        .validate()
        .unwrap();
        let schedule = edit.schedule.unwrap();
        assert_eq!(schedule.session_date, NaiveDate::from_ymd_opt(2025, 3, 17).unwrap());
        assert_eq!(schedule.end_at, NaiveTime::from_hms_opt(10, 30, 0).unwrap());
    }

    #[test]
    fn end_before_start_is_rejected() {
        let err = patch(serde_json::json!({
            "session_date": "2025-03-17",
            "start_at": "11:00",
            "end_at": "10:00"
        }))
        .validate()
        .unwrap_err();
        assert!(err.message().contains("end_at"));
    }

    #[test]
    fn nulls_and_blanks_are_absent() {
        let edit = patch(serde_json::json!({
            "user_id": null,
            "note": "",
            "location": "  ",
            "session_date": null
        }))
        .validate()
        .unwrap();
        assert_eq!(edit, AllocationEdit::default());
    }

    #[test]
    fn unknown_fields_and_statuses_are_rejected() {
        assert!(serde_json::from_value::<AllocationPatch>(serde_json::json!({"foo": 1})).is_err());
        assert!(
            serde_json::from_value::<AllocationPatch>(serde_json::json!({"status": "Done"}))
                .is_err()
        );
    }

    #[test]
    fn propagation_defaults_and_dedup() {
        let edit = patch(serde_json::json!({
            "propagate_fields": ["tutor", "tutor", "note"],
            "propagate_occurrence_ids": [3, 3, 4]
        }))
        .validate()
        .unwrap();
        assert_eq!(
            edit.propagation.fields,
            vec![PropagateField::Tutor, PropagateField::Note]
        );
        assert_eq!(edit.propagation.notes_mode, NotesMode::Overwrite);
        assert_eq!(edit.propagation.occurrence_ids, vec![3, 4]);
    }

    #[test]
    fn non_positive_hours_rejected() {
        assert!(patch(serde_json::json!({"hours": 0.0})).validate().is_err());
        assert!(patch(serde_json::json!({"hours": 1.5})).validate().is_ok());
    }

    #[test]
    fn selector_payload_fills_patch() {
        let payload = PropagationPayload {
            fields: vec![PropagateField::Note],
            notes_mode: Some(NotesMode::Append),
            dow: Some(Dow::Fri),
            occurrence_ids: vec![9],
        };
        let edit = AllocationPatch::default()
            .with_propagation(payload)
            .validate()
            .unwrap();
        assert_eq!(edit.propagation.notes_mode, NotesMode::Append);
        assert_eq!(edit.propagation.dow, Some(Dow::Fri));
        assert_eq!(edit.propagation.occurrence_ids, vec![9]);
    }

    #[test]
    fn unscheduled_defaults_to_marking() {
        let req = CreateUnscheduledRequest {
            offering_id: 1,
            user_id: 2,
            hours: 3.0,
            activity_type: Some(" ".to_string()),
            note: None,
        };
        assert_eq!(req.activity_type(), "Marking");
        assert!(req.validate().is_ok());
    }
}
