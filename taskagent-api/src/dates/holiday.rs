//! US federal holiday calendar
//!
//! Computed per year from the statutory rules rather than a lookup table,
//! so due dates like "Thanksgiving" resolve for any current or future year.
//! Names follow the official federal designations; lookup is by
//! case-insensitive substring, so "mlk day", "thanksgiving", and
//! "christmas" all resolve.

use chrono::{Datelike, NaiveDate, Weekday};

/// A named federal holiday observance
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Holiday {
    pub date: NaiveDate,
    pub name: &'static str,
}

/// The eleven US federal holidays for a given year, in calendar order
pub fn federal_holidays(year: i32) -> Vec<Holiday> {
    vec![
        Holiday {
            date: ymd(year, 1, 1),
            name: "New Year's Day",
        },
        Holiday {
            date: nth_weekday(year, 1, Weekday::Mon, 3),
            name: "Birthday of Martin Luther King, Jr.",
        },
        Holiday {
            date: nth_weekday(year, 2, Weekday::Mon, 3),
            name: "Washington's Birthday",
        },
        Holiday {
            date: last_weekday(year, 5, Weekday::Mon),
            name: "Memorial Day",
        },
        Holiday {
            date: ymd(year, 6, 19),
            name: "Juneteenth National Independence Day",
        },
        Holiday {
            date: ymd(year, 7, 4),
            name: "Independence Day",
        },
        Holiday {
            date: nth_weekday(year, 9, Weekday::Mon, 1),
            name: "Labor Day",
        },
        Holiday {
            date: nth_weekday(year, 10, Weekday::Mon, 2),
            name: "Columbus Day",
        },
        Holiday {
            date: ymd(year, 11, 11),
            name: "Veterans Day",
        },
        Holiday {
            date: nth_weekday(year, 11, Weekday::Thu, 4),
            name: "Thanksgiving Day",
        },
        Holiday {
            date: ymd(year, 12, 25),
            name: "Christmas Day",
        },
    ]
}

/// Look up a holiday by (partial) name over the given years, in order.
///
/// Matching mirrors the upstream behavior: the query must appear as a
/// substring of the official name, case-insensitively. Returns the first
/// hit, so earlier years win.
pub fn find_holiday(name: &str, years: &[i32]) -> Option<NaiveDate> {
    let needle = name.trim().to_lowercase();
    if needle.is_empty() {
        return None;
    }

    for &year in years {
        for holiday in federal_holidays(year) {
            if holiday.name.to_lowercase().contains(&needle) {
                return Some(holiday.date);
            }
        }
    }
    None
}

fn ymd(year: i32, month: u32, day: u32) -> NaiveDate {
    // All fixed-date holidays exist in every year
    NaiveDate::from_ymd_opt(year, month, day).expect("valid holiday date")
}

fn nth_weekday(year: i32, month: u32, weekday: Weekday, n: u8) -> NaiveDate {
    NaiveDate::from_weekday_of_month_opt(year, month, weekday, n)
        .expect("nth weekday exists for all federal holiday rules")
}

fn last_weekday(year: i32, month: u32, weekday: Weekday) -> NaiveDate {
    // Walk back from the last day of the month
    let last_day = if month == 12 {
        ymd(year + 1, 1, 1).pred_opt().expect("valid date")
    } else {
        ymd(year, month + 1, 1).pred_opt().expect("valid date")
    };

    let mut date = last_day;
    while date.weekday() != weekday {
        date = date.pred_opt().expect("valid date");
    }
    date
}
