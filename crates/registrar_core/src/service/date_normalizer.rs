//! Lenient normalization of user-supplied date strings.
//!
//! # Responsibility
//! - Accept the date shapes clients actually send and turn them into a
//!   calendar date-time.
//!
//! # Invariants
//! - Never fails: blank, unrecognized or out-of-range input becomes "now".
//! - Precedence is fixed: ISO date-time (contains `T`), then strict
//!   `YYYY-MM-DD`, then strict `DD-MM-YYYY`. `01-02-2024` is therefore always
//!   day-month-year, never a partial ISO date.
//! - Every field must be zero-padded; `2024-3-5` is not a date.
//! - Date-only inputs resolve to local midnight.

use chrono::{Local, NaiveDate, NaiveDateTime, NaiveTime};
use log::warn;
use once_cell::sync::Lazy;
use regex::Regex;

static ISO_DATE_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^\d{4}-\d{2}-\d{2}$").expect("valid iso date regex"));
static ISO_DATETIME_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^\d{4}-\d{2}-\d{2}T\d{2}:\d{2}(:\d{2}(\.\d+)?)?$")
        .expect("valid iso datetime regex")
});
static LEGACY_DATE_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^(\d{2})-(\d{2})-(\d{4})$").expect("valid legacy date regex")
});

const ISO_DATETIME_FORMATS: [&str; 2] = ["%Y-%m-%dT%H:%M:%S%.f", "%Y-%m-%dT%H:%M"];

/// Outcome of date normalization, keeping the fallback observable.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NormalizedDate {
    /// Input matched a recognized shape.
    Parsed(NaiveDateTime),
    /// Input was blank or unusable; value is the call-time "now".
    Defaulted(NaiveDateTime),
}

impl NormalizedDate {
    pub fn value(self) -> NaiveDateTime {
        match self {
            Self::Parsed(value) | Self::Defaulted(value) => value,
        }
    }

    pub fn is_defaulted(self) -> bool {
        matches!(self, Self::Defaulted(_))
    }
}

/// Normalizes `raw`, falling back to the current local time.
pub fn normalize(raw: Option<&str>) -> NaiveDateTime {
    parse_date_input(raw).value()
}

/// Tagged variant of [`normalize`].
pub fn parse_date_input(raw: Option<&str>) -> NormalizedDate {
    parse_date_input_at(raw, Local::now().naive_local())
}

/// Same as [`parse_date_input`] with an explicit fallback instant.
pub fn parse_date_input_at(raw: Option<&str>, now: NaiveDateTime) -> NormalizedDate {
    let Some(value) = raw.map(str::trim).filter(|value| !value.is_empty()) else {
        return NormalizedDate::Defaulted(now);
    };

    match parse_recognized(value) {
        Some(parsed) => NormalizedDate::Parsed(parsed),
        None => {
            warn!(
                "event=date_normalize module=service status=fallback input_len={}",
                value.len()
            );
            NormalizedDate::Defaulted(now)
        }
    }
}

fn parse_recognized(value: &str) -> Option<NaiveDateTime> {
    if value.contains('T') {
        if !ISO_DATETIME_RE.is_match(value) {
            return None;
        }
        return ISO_DATETIME_FORMATS
            .iter()
            .find_map(|format| NaiveDateTime::parse_from_str(value, format).ok());
    }

    if ISO_DATE_RE.is_match(value) {
        let date = NaiveDate::parse_from_str(value, "%Y-%m-%d").ok()?;
        return Some(date.and_time(NaiveTime::MIN));
    }

    let caps = LEGACY_DATE_RE.captures(value)?;
    let day = caps[1].parse::<u32>().ok()?;
    let month = caps[2].parse::<u32>().ok()?;
    let year = caps[3].parse::<i32>().ok()?;
    NaiveDate::from_ymd_opt(year, month, day).map(|date| date.and_time(NaiveTime::MIN))
}

#[cfg(test)]
mod tests {
    use super::{parse_date_input_at, NormalizedDate};
    use chrono::{NaiveDate, NaiveDateTime};

    fn at(y: i32, m: u32, d: u32, hh: u32, mm: u32, ss: u32) -> NaiveDateTime {
        NaiveDate::from_ymd_opt(y, m, d)
            .unwrap()
            .and_hms_opt(hh, mm, ss)
            .unwrap()
    }

    fn fixed_now() -> NaiveDateTime {
        at(2030, 1, 1, 12, 0, 0)
    }

    #[test]
    fn iso_date_resolves_to_midnight() {
        assert_eq!(
            parse_date_input_at(Some("2024-03-15"), fixed_now()),
            NormalizedDate::Parsed(at(2024, 3, 15, 0, 0, 0))
        );
    }

    #[test]
    fn legacy_date_is_day_month_year() {
        assert_eq!(
            parse_date_input_at(Some("15-03-2024"), fixed_now()),
            NormalizedDate::Parsed(at(2024, 3, 15, 0, 0, 0))
        );
        assert_eq!(
            parse_date_input_at(Some("01-02-2024"), fixed_now()),
            NormalizedDate::Parsed(at(2024, 2, 1, 0, 0, 0))
        );
    }

    #[test]
    fn iso_datetime_keeps_time_component() {
        assert_eq!(
            parse_date_input_at(Some("2024-03-15T08:45:30"), fixed_now()),
            NormalizedDate::Parsed(at(2024, 3, 15, 8, 45, 30))
        );
        assert_eq!(
            parse_date_input_at(Some("2024-03-15T08:45"), fixed_now()),
            NormalizedDate::Parsed(at(2024, 3, 15, 8, 45, 0))
        );
        assert_eq!(
            parse_date_input_at(Some("2024-03-15T08:45:30.250"), fixed_now()),
            NormalizedDate::Parsed(
                NaiveDate::from_ymd_opt(2024, 3, 15)
                    .unwrap()
                    .and_hms_milli_opt(8, 45, 30, 250)
                    .unwrap()
            )
        );
    }

    #[test]
    fn unusable_input_defaults_to_now() {
        for raw in [
            None,
            Some(""),
            Some("   "),
            Some("not-a-date"),
            Some("2024-13-40"),
            Some("31-02-2024"),
            Some("2024-03-15T25:00"),
            Some("2024/03/15"),
            Some("2024-3-5T8:4"),
            Some("2024-03-15T8:45"),
            Some("2024-03-15T08:45:3"),
        ] {
            assert_eq!(
                parse_date_input_at(raw, fixed_now()),
                NormalizedDate::Defaulted(fixed_now()),
                "input {raw:?}"
            );
        }
    }
}
