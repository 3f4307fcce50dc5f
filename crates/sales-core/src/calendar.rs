//! Month table and date parsing helpers.

use chrono::{DateTime, NaiveDate, NaiveDateTime};

// ── Month table ───────────────────────────────────────────────────────────────

/// English month name, month number, localized (Spanish) month name.
pub const MONTHS: [(&str, u32, &str); 12] = [
    ("january", 1, "Enero"),
    ("february", 2, "Febrero"),
    ("march", 3, "Marzo"),
    ("april", 4, "Abril"),
    ("may", 5, "Mayo"),
    ("june", 6, "Junio"),
    ("july", 7, "Julio"),
    ("august", 8, "Agosto"),
    ("september", 9, "Septiembre"),
    ("october", 10, "Octubre"),
    ("november", 11, "Noviembre"),
    ("december", 12, "Diciembre"),
];

/// Look up an English month name, ignoring case.
///
/// Returns `(number, localized_name)`.
pub fn month_by_english_name(name: &str) -> Option<(u32, &'static str)> {
    let folded = name.to_lowercase();
    MONTHS
        .iter()
        .find(|(english, _, _)| *english == folded)
        .map(|(_, number, local)| (*number, *local))
}

/// Localized name for a month number in `1..=12`.
pub fn month_name(month: u32) -> Option<&'static str> {
    MONTHS
        .iter()
        .find(|(_, number, _)| *number == month)
        .map(|(_, _, local)| *local)
}

// ── Date parsing ──────────────────────────────────────────────────────────────

/// How to read ambiguous numeric dates such as `03/04/2024`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DateOrder {
    /// `03/04/2024` is 3 April.
    DayFirst,
    /// `03/04/2024` is 4 March.
    MonthFirst,
}

/// Year-first layouts are never ambiguous.
const ISO_FORMATS: &[&str] = &["%Y-%m-%d", "%Y/%m/%d", "%Y.%m.%d"];
const ISO_DATETIME_FORMATS: &[&str] = &[
    "%Y-%m-%d %H:%M:%S%.f",
    "%Y-%m-%dT%H:%M:%S%.f",
    "%Y-%m-%d %H:%M:%S",
    "%Y-%m-%dT%H:%M:%S",
    "%Y-%m-%d %H:%M",
];

/// Year-first layouts carrying a UTC offset; the wall-clock date is kept.
const ISO_OFFSET_FORMATS: &[&str] = &[
    "%Y-%m-%d %H:%M:%S%:z",
    "%Y-%m-%d %H:%M:%S%.f%:z",
    "%Y-%m-%d %H:%M:%S%z",
];

// Two-digit years first: `%Y` would otherwise read `24` as year 24.
const DAY_FIRST_FORMATS: &[&str] = &[
    "%d/%m/%y", "%d-%m-%y", "%d.%m.%y", "%d/%m/%Y", "%d-%m-%Y", "%d.%m.%Y",
];
const MONTH_FIRST_FORMATS: &[&str] = &[
    "%m/%d/%y", "%m-%d-%y", "%m.%d.%y", "%m/%d/%Y", "%m-%d-%Y", "%m.%d.%Y",
];

/// Layouts with a month name; never ambiguous. `%b` and `%B` each accept
/// both the abbreviated and the full English name.
const NAMED_MONTH_FORMATS: &[&str] = &[
    "%d-%b-%y",
    "%d-%b-%Y",
    "%d %B %Y",
    "%b %d, %Y",
    "%B %d, %Y",
];

/// Parse a textual date.
///
/// Year-first forms (with or without a time part) are tried first. Then the
/// preferred `order` is tried; if that yields no valid date the opposite
/// order is tried, so `25/12/2024` parses even when month-first is preferred.
/// Forms with an English month name (`05-Mar-2024`, `5 March 2024`,
/// `Mar 5, 2024`) and year-first forms with a UTC offset are accepted too.
/// A trailing time part after a space is ignored for the numeric day/month
/// forms.
pub fn parse_date(s: &str, order: DateOrder) -> Option<NaiveDate> {
    let s = s.trim();
    if s.is_empty() {
        return None;
    }

    if starts_with_year(s) {
        for fmt in ISO_FORMATS {
            if let Ok(d) = NaiveDate::parse_from_str(s, fmt) {
                return Some(d);
            }
        }
        for fmt in ISO_DATETIME_FORMATS {
            if let Ok(dt) = NaiveDateTime::parse_from_str(s, fmt) {
                return Some(dt.date());
            }
        }
        if let Ok(dt) = DateTime::parse_from_rfc3339(s) {
            return Some(dt.date_naive());
        }
        return ISO_OFFSET_FORMATS
            .iter()
            .find_map(|fmt| DateTime::parse_from_str(s, fmt).ok())
            .map(|dt| dt.date_naive());
    }

    if let Some(d) = NAMED_MONTH_FORMATS
        .iter()
        .find_map(|fmt| NaiveDate::parse_from_str(s, fmt).ok())
    {
        return Some(d);
    }

    let date_part = s.split_whitespace().next().unwrap_or(s);
    let (preferred, fallback) = match order {
        DateOrder::DayFirst => (DAY_FIRST_FORMATS, MONTH_FIRST_FORMATS),
        DateOrder::MonthFirst => (MONTH_FIRST_FORMATS, DAY_FIRST_FORMATS),
    };
    preferred
        .iter()
        .chain(fallback.iter())
        .find_map(|fmt| NaiveDate::parse_from_str(date_part, fmt).ok())
}

fn starts_with_year(s: &str) -> bool {
    let bytes = s.as_bytes();
    bytes.len() > 4 && bytes[..4].iter().all(u8::is_ascii_digit) && !bytes[4].is_ascii_digit()
}

/// Render a date as `dd/mm/YYYY` for report output.
pub fn format_date(date: NaiveDate) -> String {
    date.format("%d/%m/%Y").to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ymd(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    // ── Month table ───────────────────────────────────────────────────────────

    #[test]
    fn test_month_lookup_is_case_insensitive() {
        assert_eq!(month_by_english_name("March"), Some((3, "Marzo")));
        assert_eq!(month_by_english_name("DECEMBER"), Some((12, "Diciembre")));
        assert_eq!(month_by_english_name("marzo"), None);
    }

    #[test]
    fn test_month_table_is_complete() {
        for (i, (english, number, local)) in MONTHS.iter().enumerate() {
            assert_eq!(*number as usize, i + 1);
            assert_eq!(month_by_english_name(english), Some((*number, *local)));
            assert_eq!(month_name(*number), Some(*local));
        }
        assert_eq!(month_name(0), None);
        assert_eq!(month_name(13), None);
    }

    // ── parse_date ────────────────────────────────────────────────────────────

    #[test]
    fn test_day_first_ambiguous() {
        assert_eq!(parse_date("03/04/2024", DateOrder::DayFirst), Some(ymd(2024, 4, 3)));
    }

    #[test]
    fn test_month_first_ambiguous() {
        assert_eq!(parse_date("03/04/2024", DateOrder::MonthFirst), Some(ymd(2024, 3, 4)));
    }

    #[test]
    fn test_impossible_order_falls_back() {
        assert_eq!(parse_date("12/25/2024", DateOrder::DayFirst), Some(ymd(2024, 12, 25)));
        assert_eq!(parse_date("25/12/2024", DateOrder::MonthFirst), Some(ymd(2024, 12, 25)));
    }

    #[test]
    fn test_iso_forms() {
        assert_eq!(parse_date("2024-03-15", DateOrder::DayFirst), Some(ymd(2024, 3, 15)));
        assert_eq!(
            parse_date("2024-03-15 00:00:00", DateOrder::DayFirst),
            Some(ymd(2024, 3, 15))
        );
        assert_eq!(
            parse_date("2024-03-15T10:30:00", DateOrder::MonthFirst),
            Some(ymd(2024, 3, 15))
        );
    }

    #[test]
    fn test_trailing_time_ignored() {
        assert_eq!(
            parse_date("15/03/2024 08:00", DateOrder::DayFirst),
            Some(ymd(2024, 3, 15))
        );
    }

    #[test]
    fn test_two_digit_year() {
        assert_eq!(parse_date("03/04/24", DateOrder::DayFirst), Some(ymd(2024, 4, 3)));
        assert_eq!(parse_date("03-04-24", DateOrder::DayFirst), Some(ymd(2024, 4, 3)));
        assert_eq!(parse_date("05.03.24", DateOrder::DayFirst), Some(ymd(2024, 3, 5)));
        assert_eq!(parse_date("05.03.24", DateOrder::MonthFirst), Some(ymd(2024, 5, 3)));
        assert_eq!(parse_date("05.03.2024", DateOrder::DayFirst), Some(ymd(2024, 3, 5)));
    }

    #[test]
    fn test_named_month_forms() {
        let expected = Some(ymd(2024, 3, 5));
        for s in [
            "05-Mar-2024",
            "05-Mar-24",
            "5 March 2024",
            "5 Mar 2024",
            "Mar 5, 2024",
            "March 5, 2024",
        ] {
            assert_eq!(parse_date(s, DateOrder::DayFirst), expected, "{}", s);
            assert_eq!(parse_date(s, DateOrder::MonthFirst), expected, "{}", s);
        }
    }

    #[test]
    fn test_iso_with_offset() {
        let expected = Some(ymd(2024, 3, 5));
        assert_eq!(parse_date("2024-03-05T10:00:00Z", DateOrder::DayFirst), expected);
        assert_eq!(parse_date("2024-03-05T23:30:00-05:00", DateOrder::DayFirst), expected);
        assert_eq!(
            parse_date("2024-03-05 10:00:00+00:00", DateOrder::DayFirst),
            expected
        );
        assert_eq!(
            parse_date("2024-03-05 10:00:00.250+01:00", DateOrder::MonthFirst),
            expected
        );
    }

    #[test]
    fn test_garbage_is_none() {
        assert_eq!(parse_date("", DateOrder::DayFirst), None);
        assert_eq!(parse_date("   ", DateOrder::DayFirst), None);
        assert_eq!(parse_date("yesterday", DateOrder::DayFirst), None);
        assert_eq!(parse_date("32/13/2024", DateOrder::DayFirst), None);
    }

    #[test]
    fn test_format_date() {
        assert_eq!(format_date(ymd(2024, 3, 5)), "05/03/2024");
    }
}
