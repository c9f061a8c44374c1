//! Date arithmetic for medication courses.
//!
//! A course runs `number_of_days` doses from a chosen start date. With
//! `Everyday` frequency a dose is taken each calendar day; `Alternate`
//! spaces doses every second day. All arithmetic is calendar-day based
//! (`chrono::NaiveDate`), never 24-hour durations, so daylight-saving
//! shifts can never change a projected day.

use chrono::{Duration, Local, NaiveDate};

use crate::models::Frequency;

/// Today's date in the local timezone.
pub fn today() -> NaiveDate {
    Local::now().date_naive()
}

/// Today as a `YYYY-MM-DD` string.
pub fn today_string() -> String {
    to_iso_date_string(today())
}

/// Format a date as `YYYY-MM-DD`, the form every date field travels in.
pub fn to_iso_date_string(date: NaiveDate) -> String {
    date.format("%Y-%m-%d").to_string()
}

/// Last day of a course, or `None` while the inputs are incomplete.
///
/// `None` is not an error: the start date may be unset and a zero-day
/// course has no last day. Callers leave the end date blank until the
/// inputs arrive.
///
/// The projected span is `number_of_days - 1` calendar days for
/// `Everyday` and `2 * number_of_days - 1` for `Alternate`, one day
/// beyond the final alternate-day dose. The reminder service has always
/// projected alternate courses with that extra day; submitted schedules
/// must keep lining up with it.
pub fn course_end_date(
    start_date: Option<NaiveDate>,
    number_of_days: u32,
    frequency: &Frequency,
) -> Option<NaiveDate> {
    let start = start_date?;
    if number_of_days == 0 {
        return None;
    }

    let span_days = match frequency {
        Frequency::Alternate => 2 * i64::from(number_of_days) - 1,
        Frequency::Everyday => i64::from(number_of_days) - 1,
    };

    start.checked_add_signed(Duration::days(span_days))
}
