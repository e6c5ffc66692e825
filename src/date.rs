//! Lenient, day-first date parsing for export columns.
//!
//! Exports mix ISO dates (`2024-05-20`, `20240520`), Australian style numeric
//! dates (`20/05/2024`) and the odd textual month (`20-May-2024`,
//! `May 20, 2024`). Numeric dates are read day first; month first is only used
//! when day first can't be a real date, as in `05/20/2024`.
//!
//! Still unreadable, and so dropped by the recency filter: bare times,
//! weekday names (`Mon 20 May 2024`), relative words (`yesterday`),
//! spreadsheet serial numbers (`45432`) and non-English month names.
use chrono::NaiveDate;
use regex::Regex;
use std::sync::OnceLock;

const MONTHS: [&str; 12] = [
    "january", "february", "march", "april", "may", "june",
    "july", "august", "september", "october", "november", "december",
];

fn year_first() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        Regex::new(r"^(\d{4})[/.\-](\d{1,2})[/.\-](\d{1,2})(?:[T ].*)?$").expect("valid regex")
    })
}

fn compact() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"^(\d{4})(\d{2})(\d{2})$").expect("valid regex"))
}

fn day_first() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        Regex::new(r"^(\d{1,2})[/.\-](\d{1,2})[/.\-](\d{4}|\d{2})(?:[T ].*)?$").expect("valid regex")
    })
}

fn textual() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        Regex::new(r"^(\d{1,2})[ \-]([A-Za-z]{3,9})\.?[ \-,]+(\d{4}|\d{2})$").expect("valid regex")
    })
}

fn month_first_textual() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        Regex::new(r"^([A-Za-z]{3,9})\.?[ \-]+(\d{1,2})(?:st|nd|rd|th)?[ \-,]+(\d{4}|\d{2})$")
            .expect("valid regex")
    })
}

/// Two digit years pivot like strptime's `%y`: 00-68 is 20xx, 69-99 is 19xx.
fn full_year(text: &str) -> Option<i32> {
    let year: i32 = text.parse().ok()?;

    Some(match text.len() {
        2 if year <= 68 => 2000 + year,
        2 => 1900 + year,
        _ => year,
    })
}

fn month_number(name: &str) -> Option<u32> {
    let name = name.to_lowercase();

    MONTHS
        .iter()
        .position(|m| m.starts_with(&name))
        .map(|i| i as u32 + 1)
}

/// Parses `value` as a calendar date, resolving ambiguous numeric dates day
/// first. Anything that doesn't look like a date gives `None`.
pub fn parse_day_first(value: &str) -> Option<NaiveDate> {
    let value = value.trim();

    if let Some(caps) = year_first()
        .captures(value)
        .or_else(|| compact().captures(value))
    {
        return NaiveDate::from_ymd_opt(
            caps[1].parse().ok()?,
            caps[2].parse().ok()?,
            caps[3].parse().ok()?,
        );
    }

    if let Some(caps) = day_first().captures(value) {
        let first: u32 = caps[1].parse().ok()?;
        let second: u32 = caps[2].parse().ok()?;
        let year = full_year(&caps[3])?;

        return NaiveDate::from_ymd_opt(year, second, first)
            .or_else(|| NaiveDate::from_ymd_opt(year, first, second));
    }

    if let Some(caps) = textual().captures(value) {
        return NaiveDate::from_ymd_opt(
            full_year(&caps[3])?,
            month_number(&caps[2])?,
            caps[1].parse().ok()?,
        );
    }

    if let Some(caps) = month_first_textual().captures(value) {
        return NaiveDate::from_ymd_opt(
            full_year(&caps[3])?,
            month_number(&caps[1])?,
            caps[2].parse().ok()?,
        );
    }

    None
}
