use chrono::{NaiveDate, NaiveTime};
use serde::{Deserialize, Serialize};
use std::cmp::Ordering;
use ts_rs::TS;

// 课次（某教学活动的一次周课）
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/activity.ts")]
pub struct Occurrence {
    pub id: i64,
    pub activity_id: i64,
    pub session_date: Option<NaiveDate>,
    pub start_at: Option<NaiveTime>,
    pub end_at: Option<NaiveTime>,
    pub location: Option<String>,
    pub note: Option<String>,
    pub is_cancelled: bool,
}

impl Occurrence {
    /// 课次排序：日期（空值最后）、开始时间（空值最后）、ID
    pub fn schedule_order(a: &Occurrence, b: &Occurrence) -> Ordering {
        nulls_last(&a.session_date, &b.session_date)
            .then_with(|| nulls_last(&a.start_at, &b.start_at))
            .then_with(|| a.id.cmp(&b.id))
    }
}

fn nulls_last<T: Ord>(a: &Option<T>, b: &Option<T>) -> Ordering {
    match (a, b) {
        (Some(a), Some(b)) => a.cmp(b),
        (Some(_), None) => Ordering::Less,
        (None, Some(_)) => Ordering::Greater,
        (None, None) => Ordering::Equal,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn occ(id: i64, date: Option<&str>, start: Option<&str>) -> Occurrence {
        Occurrence {
            id,
            activity_id: 1,
            session_date: date.map(|d| NaiveDate::parse_from_str(d, "%Y-%m-%d").unwrap()),
            start_at: start.map(|t| NaiveTime::parse_from_str(t, "%H:%M").unwrap()),
            end_at: None,
            location: None,
            note: None,
            is_cancelled: false,
        }
    }

    #[test]
    fn orders_by_date_then_start_then_id_with_nulls_last() {
        let mut list = vec![
            occ(5, None, None),
            occ(4, Some("2025-03-10"), None),
            occ(3, Some("2025-03-10"), Some("09:00")),
            occ(2, Some("2025-03-03"), Some("14:00")),
            occ(1, Some("2025-03-10"), Some("09:00")),
        ];
        list.sort_by(Occurrence::schedule_order);
        let ids: Vec<i64> = list.iter().map(|o| o.id).collect();
        assert_eq!(ids, vec![2, 1, 3, 4, 5]);
    }
}
