//! Calendar-month horizon arithmetic

use chrono::{Datelike, Months, NaiveDate};

/// Whole calendar months from `start` to `end`, ignoring day-of-month
///
/// Negative when `end` falls in an earlier month than `start`.
pub fn months_between(start: NaiveDate, end: NaiveDate) -> i64 {
    let years = i64::from(end.year()) - i64::from(start.year());
    let months = i64::from(end.month()) - i64::from(start.month());
    years * 12 + months
}

/// Date `months` calendar months after `start`
///
/// Day-of-month is clamped to the end of shorter months (Jan 31 + 1 month is
/// Feb 28/29). Returns `None` only past chrono's representable range.
pub fn month_offset(start: NaiveDate, months: u32) -> Option<NaiveDate> {
    start.checked_add_months(Months::new(months))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn test_months_between_ignores_day() {
        assert_eq!(months_between(date(2024, 1, 31), date(2024, 2, 1)), 1);
        assert_eq!(months_between(date(2024, 1, 1), date(2024, 1, 31)), 0);
        assert_eq!(months_between(date(2024, 3, 15), date(2034, 3, 15)), 120);
    }

    #[test]
    fn test_months_between_negative() {
        assert_eq!(months_between(date(2025, 6, 1), date(2024, 6, 1)), -12);
        assert_eq!(months_between(date(2025, 1, 1), date(2024, 12, 31)), -1);
    }

    #[test]
    fn test_month_offset_clamps_day() {
        assert_eq!(month_offset(date(2024, 1, 31), 1), Some(date(2024, 2, 29)));
        assert_eq!(month_offset(date(2023, 1, 31), 1), Some(date(2023, 2, 28)));
        // Clamping does not accumulate: offsets are always from the start date
        assert_eq!(month_offset(date(2024, 1, 31), 2), Some(date(2024, 3, 31)));
        assert_eq!(month_offset(date(2024, 11, 15), 3), Some(date(2025, 2, 15)));
        assert_eq!(month_offset(date(2024, 5, 10), 0), Some(date(2024, 5, 10)));
    }
}
