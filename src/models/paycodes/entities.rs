use serde::{Deserialize, Serialize};
use ts_rs::TS;

// 薪酬代码
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/paycode.ts")]
pub struct Paycode {
    pub code: String,
    pub paycode_description: Option<String>,
    pub amount: f64,
}

/// 按活动类型选择未排课分配的薪酬代码，未知类型按批改处理
pub fn paycode_for_activity_type(activity_type: &str) -> &'static str {
    match activity_type.trim().to_ascii_lowercase().as_str() {
        "consultation" => "CONS",
        "tutorial" => "TU2",
        "laboratory" => "LAB2",
        _ => "MARK",
    }
}
