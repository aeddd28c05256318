//! Free-form date/time parsing for notification text.
//!
//! The time of day is located first (12-hour forms before 24-hour forms),
//! cut out of the expression, and the remainder is read as a date after
//! weekday names, ordinal suffixes and filler words are dropped.

use std::sync::LazyLock;

use chrono::{Datelike, NaiveDate, NaiveDateTime, NaiveTime, TimeDelta};
use itertools::Itertools;
use regex::{Captures, Regex};

use crate::error::{ExtractError, Result};

static TIME_12H: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)\b(\d{1,2})(?::(\d{2}))?\s*([ap])\.?\s?m\b\.?").expect("valid 12h pattern")
});
static TIME_24H: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"\b([01]?\d|2[0-3])[:h]([0-5]\d)\b").expect("valid 24h pattern")
});
static YEAR: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\b\d{4}\b").expect("valid year pattern"));
static ORDINAL: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)^(\d{1,2})(st|nd|rd|th)$").expect("valid ordinal pattern"));

const DATE_FORMATS: [&str; 6] = [
    "%B %d %Y",
    "%d %B %Y",
    "%Y-%m-%d",
    "%m/%d/%Y",
    "%Y/%m/%d",
    "%d.%m.%Y",
];
const YEARLESS_DATE_FORMATS: [&str; 3] = ["%B %d %Y", "%d %B %Y", "%m/%d %Y"];

const WEEKDAYS: [&str; 17] = [
    "monday", "tuesday", "wednesday", "thursday", "friday", "saturday", "sunday", "mon", "tue",
    "tues", "wed", "thu", "thur", "thurs", "fri", "sat", "sun",
];
const FILLER: [&str; 5] = ["at", "on", "@", "-", "|"];
/// Zone abbreviations mail clients append to times; the wall-clock time is kept.
const TIME_ZONES: [&str; 14] = [
    "pst", "pdt", "pt", "mst", "mdt", "mt", "cst", "cdt", "est", "edt", "et", "utc", "gmt", "z",
];

const STRICT_DATE_FORMAT: &str = "%d.%m.%Y";
const STRICT_TIME_FORMAT: &str = "%H:%M";

/// Parse a free-form expression such as `Monday, March 3 2025 1:00 PM` or
/// `Sat Mar 8 10:00am`. A missing year is taken from `reference`; `today`
/// and `tomorrow` resolve against it.
pub fn parse_datetime(input: &str, reference: NaiveDate) -> Option<NaiveDateTime> {
    let (time, rest) = take_time(input)?;
    let date = parse_date(&rest, reference)?;
    Some(date.and_time(time))
}

/// Parse the strict `dd.mm.yyyy` + `HH:MM` pair; no fallback forms.
pub fn parse_strict(date: &str, time: &str) -> Option<NaiveDateTime> {
    let date = NaiveDate::parse_from_str(date.trim(), STRICT_DATE_FORMAT).ok()?;
    let time = NaiveTime::parse_from_str(time.trim(), STRICT_TIME_FORMAT).ok()?;
    Some(date.and_time(time))
}

/// End of a match starting at `start` and lasting `minutes`.
///
/// Fails unless the end falls later on the same day.
pub fn end_after(start: NaiveTime, minutes: u32) -> Result<NaiveTime> {
    let (end, overflow) = start.overflowing_add_signed(TimeDelta::minutes(i64::from(minutes)));
    if minutes == 0 || overflow != 0 {
        return Err(ExtractError::InvalidSpan { start, minutes });
    }
    Ok(end)
}

fn take_time(input: &str) -> Option<(NaiveTime, String)> {
    if let Some(caps) = TIME_12H.captures(input) {
        let time = twelve_hour(&caps)?;
        let range = caps.get(0)?.range();
        return Some((time, cut(input, range)));
    }
    let caps = TIME_24H.captures(input)?;
    let hour = caps[1].parse().ok()?;
    let minute = caps[2].parse().ok()?;
    let time = NaiveTime::from_hms_opt(hour, minute, 0)?;
    let range = caps.get(0)?.range();
    Some((time, cut(input, range)))
}

fn twelve_hour(caps: &Captures) -> Option<NaiveTime> {
    let hour: u32 = caps[1].parse().ok()?;
    let minute: u32 = match caps.get(2) {
        Some(m) => m.as_str().parse().ok()?,
        None => 0,
    };
    if !(1..=12).contains(&hour) {
        return None;
    }
    let pm = caps[3].eq_ignore_ascii_case("p");
    let hour = match (hour, pm) {
        (12, false) => 0,
        (12, true) => 12,
        (h, false) => h,
        (h, true) => h + 12,
    };
    NaiveTime::from_hms_opt(hour, minute, 0)
}

fn cut(input: &str, range: std::ops::Range<usize>) -> String {
    format!("{} {}", &input[..range.start], &input[range.end..])
}

fn parse_date(rest: &str, reference: NaiveDate) -> Option<NaiveDate> {
    let cleaned = rest
        .replace(',', " ")
        .split_whitespace()
        .filter(|token| {
            let token = token.trim_end_matches('.').to_ascii_lowercase();
            !WEEKDAYS.contains(&token.as_str())
                && !FILLER.contains(&token.as_str())
                && !TIME_ZONES.contains(&token.as_str())
        })
        .map(|token| match ORDINAL.captures(token) {
            Some(caps) => caps[1].to_string(),
            None => token.trim_end_matches('.').to_string(),
        })
        .join(" ");

    match cleaned.to_ascii_lowercase().as_str() {
        "today" => return Some(reference),
        "tomorrow" => return reference.succ_opt(),
        "" => return None,
        _ => {}
    }

    if YEAR.is_match(&cleaned) {
        DATE_FORMATS
            .iter()
            .find_map(|format| NaiveDate::parse_from_str(&cleaned, format).ok())
    } else {
        let with_year = format!("{cleaned} {}", reference.year());
        YEARLESS_DATE_FORMATS
            .iter()
            .find_map(|format| NaiveDate::parse_from_str(&with_year, format).ok())
    }
}
