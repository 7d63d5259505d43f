//! 申请详情
//!
//! `details` 按申请类型区分结构，写入前统一在这里校验。

use chrono::{NaiveDate, NaiveTime};
use serde::{Deserialize, Serialize};
use ts_rs::TS;

use super::entities::RequestType;
use crate::errors::{Result, TeachAllocError};
use crate::models::allocations::entities::AllocationRow;
use crate::models::allocations::requests::{parse_date, parse_time};

// 工时申报
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[serde(deny_unknown_fields)]
#[ts(export, export_to = "../frontend/src/types/generated/request.ts")]
pub struct ClaimDetails {
    #[serde(deserialize_with = "deserialize_number_or_string")]
    pub hours: f64,
    pub paycode: String,
}

// 换班
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, TS)]
#[serde(deny_unknown_fields)]
#[ts(export, export_to = "../frontend/src/types/generated/request.ts")]
pub struct SwapDetails {
    #[serde(default)]
    pub suggested_tutor_id: Option<i64>,
    #[serde(default)]
    pub suggested_alloc_id: Option<i64>,
}

// 课次更正
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/request.ts")]
pub struct CorrectionDetails {
    pub date: NaiveDate,
    pub start_at: NaiveTime,
    pub end_at: NaiveTime,
    pub location: Option<String>,
    pub hours: f64,
    pub session_type: Option<String>,
}

// 更正申请的原始输入，日期时间为字符串
#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct RawCorrection {
    date: String,
    start_at: String,
    end_at: String,
    #[serde(default)]
    location: Option<String>,
    #[serde(deserialize_with = "deserialize_number_or_string")]
    hours: f64,
    #[serde(default)]
    session_type: Option<String>,
}

/// 按类型区分的申请详情
#[derive(Debug, Clone, PartialEq)]
pub enum RequestDetails {
    Claim(ClaimDetails),
    Swap(SwapDetails),
    Correction(CorrectionDetails),
    Cancellation,
    Query,
}

impl RequestDetails {
    /// 校验 `details` 是否符合申请类型
    pub fn parse(kind: RequestType, value: &serde_json::Value) -> Result<Self> {
        let invalid = |e: serde_json::Error| {
            TeachAllocError::validation(format!("Invalid {kind} details: {e}"))
        };

        match kind {
            RequestType::Claim => {
                let details: ClaimDetails =
                    serde_json::from_value(value.clone()).map_err(invalid)?;
                if !(details.hours.is_finite() && details.hours > 0.0) {
                    return Err(TeachAllocError::validation(
                        "Invalid claim details: hours must be positive",
                    ));
                }
                if details.paycode.trim().is_empty() {
                    return Err(TeachAllocError::validation(
                        "Invalid claim details: paycode is required",
                    ));
                }
                Ok(RequestDetails::Claim(details))
            }
            RequestType::Swap => {
                if value.is_null() {
                    return Ok(RequestDetails::Swap(SwapDetails::default()));
                }
                let details: SwapDetails =
                    serde_json::from_value(value.clone()).map_err(invalid)?;
                Ok(RequestDetails::Swap(details))
            }
            RequestType::Correction => {
                let raw: RawCorrection = serde_json::from_value(value.clone()).map_err(invalid)?;
                let details = CorrectionDetails {
                    date: parse_date(&raw.date)?,
                    start_at: parse_time("start_at", &raw.start_at)?,
                    end_at: parse_time("end_at", &raw.end_at)?,
                    location: raw.location.filter(|l| !l.trim().is_empty()),
                    hours: raw.hours,
                    session_type: raw.session_type.filter(|s| !s.trim().is_empty()),
                };
                if details.end_at < details.start_at {
                    return Err(TeachAllocError::validation(
                        "Invalid correction details: end_at must not be earlier than start_at",
                    ));
                }
                Ok(RequestDetails::Correction(details))
            }
            RequestType::Cancellation | RequestType::Query => {
                let empty = match value {
                    serde_json::Value::Null => true,
                    serde_json::Value::Object(map) => map.is_empty(),
                    _ => false,
                };
                if !empty {
                    return Err(TeachAllocError::validation(format!(
                        "Invalid {kind} details: this request type carries no details"
                    )));
                }
                Ok(if kind == RequestType::Query {
                    RequestDetails::Query
                } else {
                    RequestDetails::Cancellation
                })
            }
        }
    }

    /// 规范化后写回数据库的 JSON
    pub fn to_value(&self) -> serde_json::Value {
        let value = match self {
            RequestDetails::Claim(d) => serde_json::to_value(d),
            RequestDetails::Swap(d) => serde_json::to_value(d),
            RequestDetails::Correction(d) => serde_json::to_value(d),
            RequestDetails::Cancellation | RequestDetails::Query => {
                return serde_json::Value::Object(serde_json::Map::new());
            }
        };
        value.unwrap_or(serde_json::Value::Null)
    }
}

impl ClaimDetails {
    /// 与系统记录的工时、薪酬代码比较
    pub fn hours_differ(&self, system_hours: Option<f64>) -> bool {
        match system_hours {
            Some(h) => (h - self.hours).abs() > f64::EPSILON,
            None => true,
        }
    }

    pub fn paycode_differs(&self, system_paycode: Option<&str>) -> bool {
        system_paycode != Some(self.paycode.as_str())
    }
}

impl CorrectionDetails {
    /// 与当前分配相比发生变化的字段
    pub fn changed_fields(&self, current: &AllocationRow) -> Vec<&'static str> {
        let mut changed = Vec::new();
        if current.session_date != Some(self.date) {
            changed.push("date");
        }
        if current.start_at != Some(self.start_at) {
            changed.push("start_at");
        }
        if current.end_at != Some(self.end_at) {
            changed.push("end_at");
        }
        if self.location.is_some() && current.location != self.location {
            changed.push("location");
        }
        let hours_same = current
            .hours
            .map(|h| (h - self.hours).abs() <= f64::EPSILON)
            .unwrap_or(false);
        if !hours_same {
            changed.push("hours");
        }
        if self.session_type.is_some() && current.activity_type != self.session_type {
            changed.push("session_type");
        }
        changed
    }
}

// 工时既可以是数字也可以是数字字符串
fn deserialize_number_or_string<'de, D>(deserializer: D) -> std::result::Result<f64, D::Error>
where
    D: serde::Deserializer<'de>,
{
    use serde::de::{Error, Unexpected, Visitor};
    use std::fmt;

    struct F64Visitor;

    impl<'de> Visitor<'de> for F64Visitor {
        type Value = f64;

        fn expecting(&self, formatter: &mut fmt::Formatter) -> fmt::Result {
            formatter.write_str("a number or a string containing a number")
        }

        fn visit_f64<E>(self, value: f64) -> std::result::Result<Self::Value, E>
        where
            E: Error,
        {
            Ok(value)
        }

        fn visit_i64<E>(self, value: i64) -> std::result::Result<Self::Value, E>
        where
            E: Error,
        {
            Ok(value as f64)
        }

        fn visit_u64<E>(self, value: u64) -> std::result::Result<Self::Value, E>
        where
            E: Error,
        {
            Ok(value as f64)
        }

        fn visit_str<E>(self, value: &str) -> std::result::Result<Self::Value, E>
        where
            E: Error,
        {
            value
                .trim()
                .parse()
                .map_err(|_| Error::invalid_value(Unexpected::Str(value), &self))
        }
    }

    deserializer.deserialize_any(F64Visitor)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn claim_requires_hours_and_paycode() {
        let parsed =
            RequestDetails::parse(RequestType::Claim, &json!({"hours": "2.5", "paycode": "TU2"}))
                .unwrap();
        assert_eq!(
            parsed,
            RequestDetails::Claim(ClaimDetails {
                hours: 2.5,
                paycode: "TU2".to_string()
            })
        );
        assert!(RequestDetails::parse(RequestType::Claim, &json!({"hours": 2})).is_err());
    }

    #[test]
    fn mismatched_shape_is_rejected() {
        let err = RequestDetails::parse(
            RequestType::Claim,
            &json!({"suggested_tutor_id": 4}),
        )
        .unwrap_err();
        assert_eq!(err.code(), "E005");

        assert!(
            RequestDetails::parse(RequestType::Swap, &json!({"hours": 1, "paycode": "X"}))
                .is_err()
        );
    }

    #[test]
    fn swap_fields_are_optional() {
        let parsed = RequestDetails::parse(RequestType::Swap, &json!({})).unwrap();
        assert_eq!(parsed, RequestDetails::Swap(SwapDetails::default()));
        let parsed =
            RequestDetails::parse(RequestType::Swap, &json!({"suggested_tutor_id": 9})).unwrap();
        assert_eq!(
            parsed,
            RequestDetails::Swap(SwapDetails {
                suggested_tutor_id: Some(9),
                suggested_alloc_id: None
            })
        );
    }

    #[test]
    fn correction_parses_date_and_times() {
        let parsed = RequestDetails::parse(
            RequestType::Correction,
            &json!({
                "date": "2025-03-18",
                "start_at": "10:00",
                "end_at": "12:00",
                "hours": "2",
                "location": "Room 1"
            }),
        )
        .unwrap();
        let RequestDetails::Correction(details) = parsed else {
            panic!("expected correction details");
        };
        assert_eq!(details.hours, 2.0);
        assert_eq!(details.start_at, NaiveTime::from_hms_opt(10, 0, 0).unwrap());
        assert_eq!(details.session_type, None);
    }

    #[test]
    fn payloadless_types_accept_null_or_empty_object() {
        assert_eq!(
            RequestDetails::parse(RequestType::Query, &json!(null)).unwrap(),
            RequestDetails::Query
        );
        assert_eq!(
            RequestDetails::parse(RequestType::Cancellation, &json!({})).unwrap(),
            RequestDetails::Cancellation
        );
        assert!(RequestDetails::parse(RequestType::Query, &json!({"hours": 1})).is_err());
    }

    #[test]
    fn claim_comparison_flags() {
        let claim = ClaimDetails {
            hours: 2.0,
            paycode: "TU2".to_string(),
        };
        assert!(!claim.hours_differ(Some(2.0)));
        assert!(claim.hours_differ(Some(1.5)));
        assert!(claim.hours_differ(None));
        assert!(!claim.paycode_differs(Some("TU2")));
        assert!(claim.paycode_differs(Some("TU1")));
    }
}
