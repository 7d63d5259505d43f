//! 星期换算
//!
//! 传播时的"移到该星期几"按目标课次所在周的周一加固定偏移计算。

use chrono::{Datelike, NaiveDate, TimeDelta, Weekday};
use serde::{Deserialize, Serialize};
use ts_rs::TS;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/allocation.ts")]
pub enum Dow {
    Mon,
    Tue,
    Wed,
    Thu,
    Fri,
    Sat,
    Sun,
}

impl Dow {
    /// 相对周一的天数偏移
    pub fn offset(self) -> i64 {
        match self {
            Dow::Mon => 0,
            Dow::Tue => 1,
            Dow::Wed => 2,
            Dow::Thu => 3,
            Dow::Fri => 4,
            Dow::Sat => 5,
            Dow::Sun => 6,
        }
    }

    pub fn from_date(date: NaiveDate) -> Self {
        match date.weekday() {
            Weekday::Mon => Dow::Mon,
            Weekday::Tue => Dow::Tue,
            Weekday::Wed => Dow::Wed,
            Weekday::Thu => Dow::Thu,
            Weekday::Fri => Dow::Fri,
            Weekday::Sat => Dow::Sat,
            Weekday::Sun => Dow::Sun,
        }
    }
}

impl std::fmt::Display for Dow {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            Dow::Mon => "Mon",
            Dow::Tue => "Tue",
            Dow::Wed => "Wed",
            Dow::Thu => "Thu",
            Dow::Fri => "Fri",
            Dow::Sat => "Sat",
            Dow::Sun => "Sun",
        };
        f.write_str(s)
    }
}

impl std::str::FromStr for Dow {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "Mon" => Ok(Dow::Mon),
            "Tue" => Ok(Dow::Tue),
            "Wed" => Ok(Dow::Wed),
            "Thu" => Ok(Dow::Thu),
            "Fri" => Ok(Dow::Fri),
            "Sat" => Ok(Dow::Sat),
            "Sun" => Ok(Dow::Sun),
            _ => Err(format!("Invalid weekday: {s}")),
        }
    }
}

/// 日期所在周的周一
pub fn week_monday(date: NaiveDate) -> NaiveDate {
    date - TimeDelta::days(i64::from(date.weekday().num_days_from_monday()))
}

/// 把日期移到同一周（周一开始）的指定星期
pub fn shift_to_weekday(date: NaiveDate, dow: Dow) -> NaiveDate {
    week_monday(date) + TimeDelta::days(dow.offset())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn d(s: &str) -> NaiveDate {
        NaiveDate::parse_from_str(s, "%Y-%m-%d").unwrap()
    }

    #[test]
    fn every_day_of_week_shifts_to_wednesday() {
        // 2025-03-17 是周一
        for day in 17..=23 {
            let date = d(&format!("2025-03-{day}"));
            assert_eq!(shift_to_weekday(date, Dow::Wed), d("2025-03-19"));
        }
    }

    #[test]
    fn sunday_belongs_to_preceding_monday() {
        assert_eq!(week_monday(d("2025-03-23")), d("2025-03-17"));
        assert_eq!(shift_to_weekday(d("2025-03-23"), Dow::Mon), d("2025-03-17"));
        assert_eq!(shift_to_weekday(d("2025-03-17"), Dow::Sun), d("2025-03-23"));
    }

    #[test]
    fn shift_crosses_month_boundary() {
        // 2025-04-01 是周二，所在周周一为 03-31
        assert_eq!(shift_to_weekday(d("2025-04-01"), Dow::Mon), d("2025-03-31"));
    }

    #[test]
    fn derives_weekday_from_date() {
        assert_eq!(Dow::from_date(d("2025-03-19")), Dow::Wed);
        assert_eq!(Dow::from_date(d("2025-03-23")), Dow::Sun);
    }

    #[test]
    fn parses_three_letter_codes() {
        assert_eq!("Fri".parse::<Dow>().unwrap(), Dow::Fri);
        assert!("Friday".parse::<Dow>().is_err());
        assert_eq!(serde_json::from_str::<Dow>("\"Sat\"").unwrap(), Dow::Sat);
    }
}
