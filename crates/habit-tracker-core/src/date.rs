//! Calendar-date helpers.
//!
//! Dates are plain local calendar days with no time component. User input
//! goes through [`from_iso_date`], which never fails: unusable input yields
//! [`IsoDate::Invalid`], and arithmetic on that sentinel stays invalid.
//! Callers must check [`IsoDate::valid`] before handing a date to the model.

use std::fmt;

use chrono::{Days, Local, Months, NaiveDate};

/// Format used for every persisted and displayed date.
pub const ISO_FORMAT: &str = "%Y-%m-%d";

/// Result of parsing a `YYYY-MM-DD` string.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum IsoDate {
    Day(NaiveDate),
    Invalid,
}

impl IsoDate {
    pub fn valid(self) -> Option<NaiveDate> {
        match self {
            IsoDate::Day(day) => Some(day),
            IsoDate::Invalid => None,
        }
    }

    pub fn is_valid(self) -> bool {
        matches!(self, IsoDate::Day(_))
    }
}

impl From<NaiveDate> for IsoDate {
    fn from(day: NaiveDate) -> Self {
        IsoDate::Day(day)
    }
}

impl fmt::Display for IsoDate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            IsoDate::Day(day) => write!(f, "{}", day.format(ISO_FORMAT)),
            IsoDate::Invalid => f.write_str("Invalid Date"),
        }
    }
}

/// Format a date as `YYYY-MM-DD` (zero-padded month and day).
pub fn to_iso_date(date: impl Into<IsoDate>) -> String {
    date.into().to_string()
}

/// Parse `YYYY-MM-DD` into a calendar day.
///
/// The input must split on `-` into exactly three integers. Month and day
/// values outside the calendar roll over the way calendar arithmetic does,
/// so `2024-02-30` is March 1st and `2024-13-01` is January 1st 2025.
pub fn from_iso_date(input: &str) -> IsoDate {
    let parts: Vec<&str> = input.split('-').collect();
    if parts.len() != 3 {
        return IsoDate::Invalid;
    }

    let mut numbers = [0i64; 3];
    for (slot, part) in numbers.iter_mut().zip(&parts) {
        match part.trim().parse::<i64>() {
            Ok(n) => *slot = n,
            Err(_) => return IsoDate::Invalid,
        }
    }
    let [year, month, day] = numbers;

    compose(year, month, day).map_or(IsoDate::Invalid, IsoDate::Day)
}

fn compose(year: i64, month: i64, day: i64) -> Option<NaiveDate> {
    let year = i32::try_from(year).ok()?;
    let jan_first = NaiveDate::from_ymd_opt(year, 1, 1)?;

    let month_offset = month - 1;
    let month_start = if month_offset >= 0 {
        jan_first.checked_add_months(Months::new(u32::try_from(month_offset).ok()?))?
    } else {
        jan_first.checked_sub_months(Months::new(u32::try_from(-month_offset).ok()?))?
    };

    shift(month_start, day - 1)
}

/// Add `delta` days (may be negative). Invalid input or overflow stays invalid.
pub fn add_days(date: impl Into<IsoDate>, delta: i64) -> IsoDate {
    match date.into() {
        IsoDate::Day(day) => shift(day, delta).map_or(IsoDate::Invalid, IsoDate::Day),
        IsoDate::Invalid => IsoDate::Invalid,
    }
}

/// Checked day arithmetic on a known-good date.
pub fn shift(day: NaiveDate, delta: i64) -> Option<NaiveDate> {
    if delta >= 0 {
        day.checked_add_days(Days::new(delta.unsigned_abs()))
    } else {
        day.checked_sub_days(Days::new(delta.unsigned_abs()))
    }
}

/// `max(min, min(max, n))`.
pub fn clamp<T: PartialOrd>(n: T, min: T, max: T) -> T {
    let upper = if n > max { max } else { n };
    if upper < min {
        min
    } else {
        upper
    }
}

/// Today's date in the local time zone.
pub fn today() -> NaiveDate {
    Local::now().date_naive()
}

/// Parse a canonical `YYYY-MM-DD` key, or `None`. Used for persisted keys,
/// where `2024-1-3` and rollover values are rejected.
pub fn parse_strict(input: &str) -> Option<NaiveDate> {
    NaiveDate::parse_from_str(input, ISO_FORMAT)
        .ok()
        .filter(|day| day.format(ISO_FORMAT).to_string() == input)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ymd(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn formats_with_zero_padding() {
        assert_eq!(to_iso_date(ymd(2024, 3, 4)), "2024-03-04");
        assert_eq!(to_iso_date(ymd(2024, 12, 31)), "2024-12-31");
    }

    #[test]
    fn parses_plain_dates() {
        assert_eq!(from_iso_date("2024-01-03"), IsoDate::Day(ymd(2024, 1, 3)));
        assert_eq!(from_iso_date("2024-1-3"), IsoDate::Day(ymd(2024, 1, 3)));
    }

    #[test]
    fn malformed_input_is_invalid() {
        assert_eq!(from_iso_date(""), IsoDate::Invalid);
        assert_eq!(from_iso_date("2024-01"), IsoDate::Invalid);
        assert_eq!(from_iso_date("2024-01-02-03"), IsoDate::Invalid);
        assert_eq!(from_iso_date("2024-ab-02"), IsoDate::Invalid);
        assert_eq!(from_iso_date("2024--02"), IsoDate::Invalid);
    }

    #[test]
    fn out_of_range_components_roll_over() {
        assert_eq!(from_iso_date("2024-02-30"), IsoDate::Day(ymd(2024, 3, 1)));
        assert_eq!(from_iso_date("2024-13-01"), IsoDate::Day(ymd(2025, 1, 1)));
        assert_eq!(from_iso_date("2024-01-00"), IsoDate::Day(ymd(2023, 12, 31)));
        assert_eq!(from_iso_date("2024-00-15"), IsoDate::Day(ymd(2023, 12, 15)));
    }

    #[test]
    fn add_days_crosses_month_and_year() {
        assert_eq!(add_days(ymd(2024, 2, 28), 2), IsoDate::Day(ymd(2024, 3, 1)));
        assert_eq!(add_days(ymd(2024, 1, 1), -1), IsoDate::Day(ymd(2023, 12, 31)));
        assert_eq!(add_days(ymd(2024, 3, 10), -6), IsoDate::Day(ymd(2024, 3, 4)));
    }

    #[test]
    fn invalid_propagates() {
        let bad = from_iso_date("nope");
        assert_eq!(add_days(bad, 3), IsoDate::Invalid);
        assert_eq!(to_iso_date(bad), "Invalid Date");
        assert!(bad.valid().is_none());
    }

    #[test]
    fn clamp_is_three_way() {
        assert_eq!(clamp(200, 7, 120), 120);
        assert_eq!(clamp(3, 7, 120), 7);
        assert_eq!(clamp(30, 7, 120), 30);
        assert_eq!(clamp(0.5, 0.0, 1.0), 0.5);
    }

    #[test]
    fn strict_parse_rejects_rollover() {
        assert!(parse_strict("2024-02-30").is_none());
        assert!(parse_strict("2024-1-3").is_none());
        assert_eq!(parse_strict("2024-02-29"), Some(ymd(2024, 2, 29)));
    }
}
