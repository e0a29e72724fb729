//! Date range presets for analytics queries

use chrono::{Datelike, Duration, NaiveDate};
use diary_config::TimeRange;
use serde::{Deserialize, Serialize};

/// Inclusive calendar date range
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct DateRange {
    pub from: NaiveDate,
    pub to: NaiveDate,
}

impl DateRange {
    /// Range in the given order; reversed bounds are swapped
    pub fn new(from: NaiveDate, to: NaiveDate) -> Self {
        if from <= to {
            Self { from, to }
        } else {
            Self { from: to, to: from }
        }
    }

    /// The preset range that contains `today`
    pub fn for_preset(range: TimeRange, today: NaiveDate) -> Self {
        match range {
            TimeRange::Week => {
                let monday = today - Duration::days(today.weekday().num_days_from_monday() as i64);
                Self::new(monday, monday + Duration::days(6))
            }
            TimeRange::Month => {
                let start = today.with_day(1).unwrap_or(today);
                Self::new(start, last_day_of_month(today.year(), today.month()).unwrap_or(today))
            }
            TimeRange::Quarter => {
                let first_month = (today.month0() / 3) * 3 + 1;
                let start = NaiveDate::from_ymd_opt(today.year(), first_month, 1).unwrap_or(today);
                let end = last_day_of_month(today.year(), first_month + 2).unwrap_or(today);
                Self::new(start, end)
            }
            TimeRange::Year => {
                let start = NaiveDate::from_ymd_opt(today.year(), 1, 1).unwrap_or(today);
                let end = NaiveDate::from_ymd_opt(today.year(), 12, 31).unwrap_or(today);
                Self::new(start, end)
            }
        }
    }

    pub fn description(&self) -> String {
        if self.from == self.to {
            self.from.format("%Y-%m-%d").to_string()
        } else {
            format!("{} to {}", self.from.format("%Y-%m-%d"), self.to.format("%Y-%m-%d"))
        }
    }
}

fn last_day_of_month(year: i32, month: u32) -> Option<NaiveDate> {
    let (next_year, next_month) = if month == 12 { (year + 1, 1) } else { (year, month + 1) };
    NaiveDate::from_ymd_opt(next_year, next_month, 1).and_then(|d| d.pred_opt())
}

/// Parse a `YYYY-MM-DD` date
pub fn parse_date(s: &str) -> Option<NaiveDate> {
    NaiveDate::parse_from_str(s.trim(), "%Y-%m-%d").ok()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn test_week_starts_on_monday() {
        // 2024-03-14 is a Thursday
        let range = DateRange::for_preset(TimeRange::Week, date(2024, 3, 14));
        assert_eq!(range.from, date(2024, 3, 11));
        assert_eq!(range.to, date(2024, 3, 17));
    }

    #[test]
    fn test_month_and_december() {
        let range = DateRange::for_preset(TimeRange::Month, date(2024, 2, 10));
        assert_eq!(range.from, date(2024, 2, 1));
        assert_eq!(range.to, date(2024, 2, 29));

        let range = DateRange::for_preset(TimeRange::Month, date(2023, 12, 5));
        assert_eq!(range.to, date(2023, 12, 31));
    }

    #[test]
    fn test_quarter_and_year() {
        let range = DateRange::for_preset(TimeRange::Quarter, date(2024, 11, 2));
        assert_eq!(range.from, date(2024, 10, 1));
        assert_eq!(range.to, date(2024, 12, 31));

        let range = DateRange::for_preset(TimeRange::Year, date(2024, 6, 1));
        assert_eq!(range.from, date(2024, 1, 1));
        assert_eq!(range.to, date(2024, 12, 31));
    }

    #[test]
    fn test_reversed_bounds() {
        let range = DateRange::new(date(2024, 5, 31), date(2024, 5, 1));
        assert_eq!(range.from, date(2024, 5, 1));
        assert_eq!(range.to, date(2024, 5, 31));
        assert_eq!(range.description(), "2024-05-01 to 2024-05-31");
    }

    #[test]
    fn test_parse_date() {
        assert_eq!(parse_date("2024-01-09"), Some(date(2024, 1, 9)));
        assert_eq!(parse_date("09.01.2024"), None);
    }
}
