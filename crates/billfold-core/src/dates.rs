//! Calendar-date helpers shared by the generator and the repository.
//!
//! All dates in this crate are plain calendar dates (`NaiveDate`), never
//! instants: bills are due on a day, not at a moment in a timezone.
//! External request shapes carry dates as `YYYY-MM-DD` strings and months
//! as `YYYY-MM` tokens; both are parsed here and malformed input surfaces
//! as [`CoreError::InvalidInput`].

use crate::error::CoreError;
use chrono::{Datelike, Days, Months, NaiveDate};

/// Parse a `YYYY-MM-DD` calendar date.
pub fn parse_date(s: &str) -> Result<NaiveDate, CoreError> {
    NaiveDate::parse_from_str(s, "%Y-%m-%d")
        .map_err(|_| CoreError::InvalidInput(format!("Invalid date: {}", s)))
}

/// First and last calendar day of the month named by a `YYYY-MM` token.
pub fn month_bounds(month_token: &str) -> Result<(NaiveDate, NaiveDate), CoreError> {
    let invalid = || CoreError::InvalidInput(format!("Invalid month token: {}", month_token));

    let (year_str, month_str) = month_token.split_once('-').ok_or_else(invalid)?;
    if year_str.len() != 4 || month_str.len() != 2 {
        return Err(invalid());
    }
    let year: i32 = year_str.parse().map_err(|_| invalid())?;
    let month: u32 = month_str.parse().map_err(|_| invalid())?;

    let first = NaiveDate::from_ymd_opt(year, month, 1).ok_or_else(invalid)?;
    let last = first
        .checked_add_months(Months::new(1))
        .and_then(|next| next.pred_opt())
        .ok_or_else(invalid)?;

    Ok((first, last))
}

/// `date + months`, clamping the day-of-month to shorter months
/// (2024-01-31 + 1 month = 2024-02-29).
pub fn add_months_clamped(date: NaiveDate, months: u32) -> Result<NaiveDate, CoreError> {
    date.checked_add_months(Months::new(months))
        .ok_or_else(|| CoreError::InvalidInput(format!("Date out of range: {} + {} months", date, months)))
}

/// `date + days`.
pub fn add_days(date: NaiveDate, days: u64) -> Result<NaiveDate, CoreError> {
    date.checked_add_days(Days::new(days))
        .ok_or_else(|| CoreError::InvalidInput(format!("Date out of range: {} + {} days", date, days)))
}

/// Number of whole calendar months from `from` to `to`, by year/month
/// component only. Negative when `to` is in an earlier month.
pub fn months_between(from: NaiveDate, to: NaiveDate) -> i32 {
    (to.year() - from.year()) * 12 + (to.month() as i32 - from.month() as i32)
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[test]
    fn parses_calendar_dates() {
        assert_eq!(
            parse_date("2024-01-15").unwrap(),
            NaiveDate::from_ymd_opt(2024, 1, 15).unwrap()
        );
        assert!(parse_date("2024-13-01").is_err());
        assert!(parse_date("15/01/2024").is_err());
        assert!(parse_date("").is_err());
    }

    #[rstest]
    #[case("2024-02", 1, 29)] // leap year
    #[case("2023-02", 1, 28)]
    #[case("2024-12", 1, 31)]
    #[case("2024-04", 1, 30)]
    fn month_bounds_cover_whole_month(#[case] token: &str, #[case] first_day: u32, #[case] last_day: u32) {
        let (first, last) = month_bounds(token).unwrap();
        assert_eq!(first.day(), first_day);
        assert_eq!(last.day(), last_day);
        assert_eq!(first.month(), last.month());
    }

    #[test]
    fn month_bounds_rejects_malformed_tokens() {
        for token in ["2024", "2024-00", "2024-13", "24-01", "2024-1", "march"] {
            assert!(month_bounds(token).is_err(), "accepted {:?}", token);
        }
    }

    #[rstest]
    #[case("2024-01-31", 1, "2024-02-29")]
    #[case("2023-01-31", 1, "2023-02-28")]
    #[case("2024-01-15", 3, "2024-04-15")]
    #[case("2024-01-31", 3, "2024-04-30")]
    fn month_arithmetic_clamps_short_months(#[case] start: &str, #[case] months: u32, #[case] expected: &str) {
        let start = parse_date(start).unwrap();
        let expected = parse_date(expected).unwrap();
        assert_eq!(add_months_clamped(start, months).unwrap(), expected);
    }

    #[test]
    fn months_between_uses_calendar_components() {
        let anchor = parse_date("2024-01-15").unwrap();
        assert_eq!(months_between(anchor, parse_date("2024-03-01").unwrap()), 2);
        assert_eq!(months_between(anchor, parse_date("2024-01-01").unwrap()), 0);
        assert_eq!(months_between(anchor, parse_date("2023-12-01").unwrap()), -1);
        assert_eq!(months_between(anchor, parse_date("2025-01-31").unwrap()), 12);
    }
}
