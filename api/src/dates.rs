use crate::error::{DegradedKind, ParseDegraded};
use crate::ScheduleEntry;
use chrono::{Datelike, NaiveDate, Weekday};
use log::debug;
use regex::Regex;
use std::sync::LazyLock;

static ANNOTATION: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\s*\([^)]*\)").expect("annotation pattern"));

/// `"Monday, Apr 3 (1)"` → `"Monday, Apr 3"`.
pub fn strip_annotation(raw: &str) -> String {
    ANNOTATION.replace_all(raw, "").trim().to_owned()
}

fn month_day(text: &str, year: i32) -> Option<NaiveDate> {
    NaiveDate::parse_from_str(&format!("{text} {year}"), "%b %d %Y").ok()
}

/// Resolve `raw` against `now`. `None` when the text is not a
/// weekday + month/day pair; callers keep the raw text in that case.
///
/// The year is the most recent one that does not put the date after `now`.
pub fn resolve_date(raw: &str, now: NaiveDate) -> Option<NaiveDate> {
    let cleaned = strip_annotation(raw);
    let (weekday, rest) = cleaned.split_once(',')?;
    weekday.trim().parse::<Weekday>().ok()?;
    let rest = rest.trim();

    let year = now.year();
    match month_day(rest, year) {
        Some(date) if date > now => date.with_year(year - 1),
        Some(date) => Some(date),
        // Feb 29 outside a leap year
        None => month_day(rest, year - 1).filter(|d| *d <= now),
    }
}

/// The day a season's dates are resolved against: today while the season
/// is running (or not yet started), its last day once it is over.
pub fn reference_date(season: i32, today: NaiveDate) -> NaiveDate {
    if season >= today.year() {
        today
    } else {
        NaiveDate::from_ymd_opt(season, 12, 31).unwrap_or(today)
    }
}

/// Fill in `date` on every entry that lacks one. Entries that cannot be
/// resolved keep `date: None` and their raw text, and are reported back.
pub fn resolve_schedule_dates(
    entries: &mut [ScheduleEntry],
    season: i32,
    today: NaiveDate,
) -> Vec<ParseDegraded> {
    let anchor = reference_date(season, today);
    let mut degraded = Vec::new();

    for entry in entries.iter_mut().filter(|e| e.date.is_none()) {
        entry.date = resolve_date(&entry.raw_date, anchor);
        if entry.date.is_none() {
            debug!("unparsed schedule date {:?}", entry.raw_date);
            degraded.push(ParseDegraded::new(DegradedKind::Date, entry.raw_date.as_str()));
        }
    }
    degraded
}
