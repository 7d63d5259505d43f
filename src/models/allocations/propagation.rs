//! 跨周传播
//!
//! `PropagationSelector` 记录编辑者勾选的字段、备注合并方式、星期平移和目标课次，
//! 并按固定约定生成提交给 PATCH 接口的 `PropagationPayload`：
//! - `notes_mode` 仅在勾选了 `note` 时出现；
//! - `dow` 仅在勾选"移到该星期"且能从主课次日期推出星期时出现；
//! - `occurrence_ids` 为空表示只修改当前课次。

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use ts_rs::TS;

use super::weekday::Dow;
use crate::models::activities::responses::OccurrenceOption;

pub const EMPTY_STATE_MESSAGE: &str = "No existing weeks found for this activity.";

// 可传播字段
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, TS)]
#[serde(rename_all = "snake_case")]
#[ts(export, export_to = "../frontend/src/types/generated/allocation.ts")]
pub enum PropagateField {
    Tutor,
    Paycode,
    Start,
    End,
    Note,
    Status,
    Location,
}

// 备注合并方式
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, TS)]
#[serde(rename_all = "snake_case")]
#[ts(export, export_to = "../frontend/src/types/generated/allocation.ts")]
pub enum NotesMode {
    #[default]
    Overwrite,
    Append,
}

/// 合并备注：追加时以空行分隔，原备注为空则直接使用新备注
pub fn merge_note(existing: Option<&str>, incoming: &str, mode: NotesMode) -> String {
    match mode {
        NotesMode::Overwrite => incoming.to_string(),
        NotesMode::Append => match existing {
            Some(prev) if !prev.is_empty() => format!("{prev}\n\n{incoming}"),
            _ => incoming.to_string(),
        },
    }
}

/// 已校验的传播意图
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PropagationIntent {
    pub fields: Vec<PropagateField>,
    pub notes_mode: NotesMode,
    pub dow: Option<Dow>,
    pub occurrence_ids: Vec<i64>,
}

impl PropagationIntent {
    pub fn has(&self, field: PropagateField) -> bool {
        self.fields.contains(&field)
    }

    /// 没有目标课次时只修改当前课次
    pub fn is_noop(&self) -> bool {
        self.occurrence_ids.is_empty()
    }
}

// 选择器生成的传播载荷
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/allocation.ts")]
pub struct PropagationPayload {
    pub fields: Vec<PropagateField>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub notes_mode: Option<NotesMode>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub dow: Option<Dow>,
    pub occurrence_ids: Vec<i64>,
}

/// 传播选择器状态
///
/// 供客户端构造 PATCH 请求的传播部分，服务端只接收其生成的 `PropagationPayload`。
/// 与 `AllocationPatch::with_propagation` 配合使用。
#[derive(Debug, Clone, Default)]
pub struct PropagationSelector {
    activity_id: Option<i64>,
    occurrences: Vec<OccurrenceOption>,
    selected: Vec<i64>,
    fields: Vec<PropagateField>,
    notes_mode: NotesMode,
    move_to_weekday: bool,
    derived_dow: Option<Dow>,
}

impl PropagationSelector {
    pub fn new() -> Self {
        Self::default()
    }

    /// 载入某教学活动的课次列表，切换活动时清空已选课次
    pub fn load(&mut self, activity_id: i64, occurrences: Vec<OccurrenceOption>) {
        self.activity_id = Some(activity_id);
        self.occurrences = occurrences;
        self.selected.clear();
    }

    pub fn activity_id(&self) -> Option<i64> {
        self.activity_id
    }

    pub fn occurrences(&self) -> &[OccurrenceOption] {
        &self.occurrences
    }

    /// 活动没有任何课次时显示空状态
    pub fn empty_state(&self) -> Option<&'static str> {
        self.occurrences.is_empty().then_some(EMPTY_STATE_MESSAGE)
    }

    /// 主课次日期变化时重新推导星期
    pub fn set_primary_date(&mut self, date: Option<NaiveDate>) {
        self.derived_dow = date.map(Dow::from_date);
    }

    pub fn derived_dow(&self) -> Option<Dow> {
        self.derived_dow
    }

    pub fn toggle_field(&mut self, field: PropagateField) {
        if let Some(pos) = self.fields.iter().position(|f| *f == field) {
            self.fields.remove(pos);
        } else {
            self.fields.push(field);
        }
    }

    pub fn set_notes_mode(&mut self, mode: NotesMode) {
        self.notes_mode = mode;
    }

    pub fn set_move_to_weekday(&mut self, enabled: bool) {
        self.move_to_weekday = enabled;
    }

    /// 切换单个课次，不在列表中的 ID 被忽略
    pub fn toggle_occurrence(&mut self, occurrence_id: i64) {
        if let Some(pos) = self.selected.iter().position(|id| *id == occurrence_id) {
            self.selected.remove(pos);
        } else if self
            .occurrences
            .iter()
            .any(|o| o.occurrence_id == occurrence_id)
        {
            self.selected.push(occurrence_id);
        }
    }

    pub fn select_all(&mut self) {
        self.selected = self.occurrences.iter().map(|o| o.occurrence_id).collect();
    }

    pub fn clear_all(&mut self) {
        self.selected.clear();
    }

    pub fn is_selected(&self, occurrence_id: i64) -> bool {
        self.selected.contains(&occurrence_id)
    }

    pub fn payload(&self) -> PropagationPayload {
        let has_note = self.fields.contains(&PropagateField::Note);
        PropagationPayload {
            fields: self.fields.clone(),
            notes_mode: has_note.then_some(self.notes_mode),
            dow: if self.move_to_weekday {
                self.derived_dow
            } else {
                None
            },
            occurrence_ids: self.selected.clone(),
        }
    }
}
