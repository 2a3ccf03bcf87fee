use chrono::{Datelike, Duration, NaiveDate, Weekday};

use crate::errors::{NseError, Result};

// Fixed-date exchange holidays as (month, day)
const KNOWN_HOLIDAYS: [(u32, u32); 5] = [
    (1, 26),  // Republic Day
    (5, 1),   // Labour Day
    (8, 15),  // Independence Day
    (10, 2),  // Gandhi Jayanti
    (12, 25), // Christmas
];

pub fn is_weekend(date: NaiveDate) -> bool {
    matches!(date.weekday(), Weekday::Sat | Weekday::Sun)
}

pub fn is_known_holiday(date: NaiveDate) -> bool {
    KNOWN_HOLIDAYS.contains(&(date.month(), date.day()))
}

/// The latest trading day on or before `date`.
pub fn nearest_business_day(date: NaiveDate) -> NaiveDate {
    let mut d = date;
    while is_weekend(d) || is_known_holiday(d) {
        d -= Duration::days(1);
    }
    d
}

/// Trading days between `from` and `to` inclusive, after snapping both ends
/// back to the nearest business day. Dates in `skip` are left out.
pub fn date_range(from: NaiveDate, to: NaiveDate, skip: &[NaiveDate]) -> Vec<NaiveDate> {
    let from = nearest_business_day(from);
    let to = nearest_business_day(to);

    from.iter_days()
        .take_while(|d| *d <= to)
        .filter(|d| !is_weekend(*d) && !is_known_holiday(*d) && !skip.contains(d))
        .collect()
}

/// Accepts "today", "yesterday", "day before yesterday" or a day-first date
/// such as `14-12-2023`, `14/12/2023`, `14-Dec-2023`, or ISO `2023-12-14`.
pub fn parse_fuzzy_date(text: &str, today: NaiveDate) -> Result<NaiveDate> {
    let text = text.trim();
    match text.to_lowercase().as_str() {
        "today" => return Ok(today),
        "yesterday" => return Ok(today - Duration::days(1)),
        "day before yesterday" => return Ok(today - Duration::days(2)),
        _ => {}
    }

    for format in ["%Y-%m-%d", "%d-%m-%Y", "%d/%m/%Y", "%d-%b-%Y", "%d %b %Y"] {
        if let Ok(date) = NaiveDate::parse_from_str(text, format) {
            return Ok(date);
        }
    }
    Err(NseError::DateFormatError(format!("unrecognised date '{}'", text)))
}

/// Parses with [`parse_fuzzy_date`] and snaps to the nearest business day.
pub fn usable_date(text: &str, today: NaiveDate) -> Result<NaiveDate> {
    parse_fuzzy_date(text, today).map(nearest_business_day)
}
