//! Due-date expression normalization
//!
//! Language models return due dates as ISO dates, bare weekday names,
//! holiday names, or dates stamped with a stale year. This module resolves
//! all of them to a canonical calendar date, or `None` when the expression
//! cannot be understood.
//!
//! `None` is the unresolved sentinel of the public contract: the store
//! keeps a typed nullable date column, so an unresolvable expression
//! persists as NULL rather than failing the request.

use chrono::{Datelike, Days, Local, NaiveDate, Weekday};

use super::holiday;

/// Normalize a raw due-date expression against today's date
pub fn normalize_due_date(raw: &str) -> Option<NaiveDate> {
    normalize_due_date_on(raw, Local::now().date_naive())
}

/// Normalize a raw due-date expression against an explicit reference date.
///
/// Resolution order:
/// 1. Tax Day shorthands resolve to the current year's April 15.
/// 2. An ISO date with a past year is re-stamped to the current year,
///    month and day preserved (stale model output). A re-stamped Feb 29
///    that does not exist in the current year is unresolved.
/// 3. A weekday name resolves to its next strictly-future occurrence:
///    naming today's weekday means next week, never today.
/// 4. A US federal holiday name resolves against the calendars for the
///    current year, then the next.
/// 5. An ISO date with a current or future year passes through unchanged.
///
/// Never panics; anything else is unresolved.
pub fn normalize_due_date_on(raw: &str, today: NaiveDate) -> Option<NaiveDate> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return None;
    }
    let lowered = trimmed.to_lowercase();
    let current_year = today.year();

    if matches!(lowered.as_str(), "tax day" | "april 15" | "4/15") {
        return NaiveDate::from_ymd_opt(current_year, 4, 15);
    }

    if let Ok(date) = NaiveDate::parse_from_str(trimmed, "%Y-%m-%d") {
        if date.year() < current_year {
            return date.with_year(current_year);
        }
        return Some(date);
    }

    if let Some(weekday) = parse_weekday(&lowered) {
        let mut days_ahead = i64::from(weekday.num_days_from_monday())
            - i64::from(today.weekday().num_days_from_monday());
        days_ahead = days_ahead.rem_euclid(7);
        if days_ahead == 0 {
            days_ahead = 7;
        }
        return today.checked_add_days(Days::new(days_ahead as u64));
    }

    if let Some(date) = holiday::find_holiday(trimmed, &[current_year, current_year + 1]) {
        return Some(date);
    }

    None
}

/// Parse one of the seven English weekday names, already lowercased
fn parse_weekday(name: &str) -> Option<Weekday> {
    match name {
        "monday" => Some(Weekday::Mon),
        "tuesday" => Some(Weekday::Tue),
        "wednesday" => Some(Weekday::Wed),
        "thursday" => Some(Weekday::Thu),
        "friday" => Some(Weekday::Fri),
        "saturday" => Some(Weekday::Sat),
        "sunday" => Some(Weekday::Sun),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    // 2025-06-04 is a Wednesday
    fn wednesday() -> NaiveDate {
        date(2025, 6, 4)
    }

    #[test]
    fn tax_day_literals_resolve_to_current_year() {
        for raw in ["tax day", "Tax Day", "april 15", "4/15"] {
            assert_eq!(
                normalize_due_date_on(raw, wednesday()),
                Some(date(2025, 4, 15)),
                "failed for {raw:?}"
            );
        }
    }

    #[test]
    fn stale_year_is_restamped() {
        assert_eq!(
            normalize_due_date_on("2020-04-15", wednesday()),
            Some(date(2025, 4, 15))
        );
        assert_eq!(
            normalize_due_date_on("1999-12-31", wednesday()),
            Some(date(2025, 12, 31))
        );
    }

    #[test]
    fn current_and_future_dates_pass_through() {
        assert_eq!(
            normalize_due_date_on("2025-01-01", wednesday()),
            Some(date(2025, 1, 1))
        );
        assert_eq!(
            normalize_due_date_on("2030-07-04", wednesday()),
            Some(date(2030, 7, 4))
        );
    }

    #[test]
    fn restamped_leap_day_is_unresolved() {
        // 2024-02-29 re-stamped to 2025 does not exist
        assert_eq!(normalize_due_date_on("2024-02-29", wednesday()), None);
    }

    #[test]
    fn weekday_resolves_to_next_occurrence() {
        // On a Wednesday, "friday" is two days ahead
        assert_eq!(
            normalize_due_date_on("friday", wednesday()),
            Some(date(2025, 6, 6))
        );
        // And "monday" wraps into next week
        assert_eq!(
            normalize_due_date_on("Monday", wednesday()),
            Some(date(2025, 6, 9))
        );
    }

    #[test]
    fn naming_todays_weekday_rolls_a_full_week() {
        // Asked on the Friday itself, "friday" is seven days out
        let friday = date(2025, 6, 6);
        assert_eq!(
            normalize_due_date_on("friday", friday),
            Some(date(2025, 6, 13))
        );
    }

    #[test]
    fn holiday_names_resolve_through_the_calendar() {
        assert_eq!(
            normalize_due_date_on("Thanksgiving", wednesday()),
            Some(date(2025, 11, 27))
        );
        assert_eq!(
            normalize_due_date_on("christmas", wednesday()),
            Some(date(2025, 12, 25))
        );
    }

    #[test]
    fn unresolvable_expressions_are_none() {
        for raw in ["", "   ", "whenever", "2025-13-45", "next sprint", "12/25"] {
            assert_eq!(normalize_due_date_on(raw, wednesday()), None, "for {raw:?}");
        }
    }
}
