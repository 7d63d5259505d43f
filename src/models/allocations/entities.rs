use chrono::{NaiveDate, NaiveTime};
use serde::{Deserialize, Serialize};
use ts_rs::TS;

// 分配模式：排课分配绑定课次，未排课分配记录手工工时
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, TS)]
#[serde(rename_all = "snake_case")]
#[ts(export, export_to = "../frontend/src/types/generated/allocation.ts")]
pub enum AllocationMode {
    Scheduled,
    Unscheduled,
}

impl AllocationMode {
    pub const SCHEDULED: &'static str = "scheduled";
    pub const UNSCHEDULED: &'static str = "unscheduled";
}

impl std::fmt::Display for AllocationMode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            AllocationMode::Scheduled => write!(f, "{}", AllocationMode::SCHEDULED),
            AllocationMode::Unscheduled => write!(f, "{}", AllocationMode::UNSCHEDULED),
        }
    }
}

impl std::str::FromStr for AllocationMode {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            AllocationMode::SCHEDULED => Ok(AllocationMode::Scheduled),
            AllocationMode::UNSCHEDULED => Ok(AllocationMode::Unscheduled),
            _ => Err(format!("Invalid allocation mode: {s}")),
        }
    }
}

// 分配状态（基础状态 + 工作流标签）
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AllocationStatus {
    Confirmed,
    Pending,
    Cancelled,
    AcademicStaff,
    ApprovedAllocation,
    HoursForApproval,
    IgnoreClass,
    VariationComplete,
    DraftCasual,
    HoursForReview,
    RejectedByApprover,
}

// 仪表盘使用的简化状态
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/allocation.ts")]
pub enum SimplifiedStatus {
    Draft,
    Approved,
    Cancelled,
}

impl AllocationStatus {
    pub const ALL: [AllocationStatus; 11] = [
        AllocationStatus::Confirmed,
        AllocationStatus::Pending,
        AllocationStatus::Cancelled,
        AllocationStatus::AcademicStaff,
        AllocationStatus::ApprovedAllocation,
        AllocationStatus::HoursForApproval,
        AllocationStatus::IgnoreClass,
        AllocationStatus::VariationComplete,
        AllocationStatus::DraftCasual,
        AllocationStatus::HoursForReview,
        AllocationStatus::RejectedByApprover,
    ];

    pub fn label(self) -> &'static str {
        match self {
            AllocationStatus::Confirmed => "Confirmed",
            AllocationStatus::Pending => "Pending",
            AllocationStatus::Cancelled => "Cancelled",
            AllocationStatus::AcademicStaff => "Academic Staff",
            AllocationStatus::ApprovedAllocation => "Approved Allocation",
            AllocationStatus::HoursForApproval => "Hours for Approval",
            AllocationStatus::IgnoreClass => "Ignore class",
            AllocationStatus::VariationComplete => "Variation complete",
            AllocationStatus::DraftCasual => "Draft Casual",
            AllocationStatus::HoursForReview => "Hours for Review",
            AllocationStatus::RejectedByApprover => "Rejected by Approver",
        }
    }

    pub fn simplified(self) -> SimplifiedStatus {
        match self {
            AllocationStatus::Confirmed
            | AllocationStatus::ApprovedAllocation
            | AllocationStatus::VariationComplete => SimplifiedStatus::Approved,
            AllocationStatus::Cancelled
            | AllocationStatus::RejectedByApprover
            | AllocationStatus::IgnoreClass
            | AllocationStatus::AcademicStaff => SimplifiedStatus::Cancelled,
            AllocationStatus::Pending
            | AllocationStatus::HoursForApproval
            | AllocationStatus::HoursForReview
            | AllocationStatus::DraftCasual => SimplifiedStatus::Draft,
        }
    }
}

impl std::fmt::Display for AllocationStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.label())
    }
}

impl std::str::FromStr for AllocationStatus {
    type Err = String;

    /// 标签匹配不区分大小写
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = s.trim();
        AllocationStatus::ALL
            .iter()
            .copied()
            .find(|status| status.label().eq_ignore_ascii_case(wanted))
            .ok_or_else(|| format!("Invalid allocation status: {s}"))
    }
}

impl Serialize for AllocationStatus {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        serializer.serialize_str(self.label())
    }
}

impl<'de> Deserialize<'de> for AllocationStatus {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        let s = String::deserialize(deserializer)?;
        s.parse::<AllocationStatus>().map_err(serde::de::Error::custom)
    }
}

/// 排课分配的工时由开始、结束时间推导
pub fn derived_hours(start: Option<NaiveTime>, end: Option<NaiveTime>) -> Option<f64> {
    match (start, end) {
        (Some(start), Some(end)) if end >= start => {
            Some((end - start).num_minutes() as f64 / 60.0)
        }
        _ => None,
    }
}

// 分配行（反规范化，供列表、导出和编辑响应使用）
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/allocation.ts")]
pub struct AllocationRow {
    pub id: i64,
    pub user_id: Option<i64>,
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub email: Option<String>,
    pub unit_code: Option<String>,
    pub unit_name: Option<String>,
    pub offering_id: Option<i64>,
    pub activity_id: i64,
    pub activity_type: Option<String>,
    pub activity_name: Option<String>,
    pub occurrence_id: Option<i64>,
    pub session_date: Option<NaiveDate>,
    pub start_at: Option<NaiveTime>,
    pub end_at: Option<NaiveTime>,
    pub location: Option<String>,
    pub note: Option<String>,
    #[ts(type = "string")]
    pub status: AllocationStatus,
    pub simplified_status: SimplifiedStatus,
    pub paycode_id: Option<String>,
    pub teaching_role: Option<String>,
    pub mode: AllocationMode,
    pub hours: Option<f64>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn status_labels_round_trip() {
        for status in AllocationStatus::ALL {
            assert_eq!(status.label().parse::<AllocationStatus>().unwrap(), status);
        }
    }

    #[test]
    fn unknown_status_is_rejected() {
        let err = serde_json::from_str::<AllocationStatus>("\"Maybe\"").unwrap_err();
        assert!(err.to_string().contains("Invalid allocation status"));
    }

    #[test]
    fn status_parse_ignores_case() {
        assert_eq!(
            "hours for review".parse::<AllocationStatus>().unwrap(),
            AllocationStatus::HoursForReview
        );
    }

    #[test]
    fn simplified_status_mapping() {
        use AllocationStatus::*;
        assert_eq!(ApprovedAllocation.simplified(), SimplifiedStatus::Approved);
        assert_eq!(VariationComplete.simplified(), SimplifiedStatus::Approved);
        assert_eq!(HoursForApproval.simplified(), SimplifiedStatus::Draft);
        assert_eq!(DraftCasual.simplified(), SimplifiedStatus::Draft);
        assert_eq!(RejectedByApprover.simplified(), SimplifiedStatus::Cancelled);
        assert_eq!(AcademicStaff.simplified(), SimplifiedStatus::Cancelled);
        assert_eq!(IgnoreClass.simplified(), SimplifiedStatus::Cancelled);
    }

    #[test]
    fn hours_from_session_times() {
        let t = |s: &str| NaiveTime::parse_from_str(s, "%H:%M").ok();
        assert_eq!(derived_hours(t("09:00"), t("11:30")), Some(2.5));
        assert_eq!(derived_hours(t("11:00"), t("09:00")), None);
        assert_eq!(derived_hours(None, t("09:00")), None);
    }

    #[test]
    fn mode_serializes_snake_case() {
        assert_eq!(
            serde_json::to_string(&AllocationMode::Unscheduled).unwrap(),
            "\"unscheduled\""
        );
    }
}
