use crate::aggregate::TallyRow;
use chrono::{DateTime, NaiveDate, NaiveDateTime};
use log::debug;
use rollbook_types::PartyCode;
use serde::Serialize;
use std::collections::BTreeMap;

/// Returns received on one calendar day, with running totals.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DailyReturnEntry {
    /// `YYYY-MM-DD`
    pub date: String,
    pub returned_that_day: u64,
    pub cumulative_returned: u64,
    pub per_party_returned_that_day: BTreeMap<PartyCode, u64>,
    pub per_party_cumulative: BTreeMap<PartyCode, u64>,
}

const DATETIME_FORMATS: [&str; 4] = [
    "%Y-%m-%d %H:%M:%S",
    "%Y-%m-%dT%H:%M:%S",
    "%Y-%m-%dT%H:%M:%S%.f",
    "%m/%d/%Y %H:%M:%S",
];

/// Parses the date formats found in ballot exports into a calendar day.
///
/// Accepts ISO dates and datetimes (with or without offset) and US
/// `M/D/YYYY` / `M/D/YY` dates. Anything else is `None`.
pub fn normalize_date(raw: &str) -> Option<NaiveDate> {
    let value = raw.trim();
    if value.is_empty() {
        return None;
    }

    if let Ok(date) = NaiveDate::parse_from_str(value, "%Y-%m-%d") {
        return Some(date);
    }
    if let Ok(dt) = DateTime::parse_from_rfc3339(value) {
        return Some(dt.date_naive());
    }
    for format in DATETIME_FORMATS {
        if let Ok(dt) = NaiveDateTime::parse_from_str(value, format) {
            return Some(dt.date());
        }
    }

    let date_part = value.split_whitespace().next()?;
    let year_len = date_part.rsplit('/').next().map(str::len)?;
    let format = match year_len {
        2 => "%m/%d/%y",
        4 => "%m/%d/%Y",
        _ => return None,
    };
    NaiveDate::parse_from_str(date_part, format).ok()
}

/// Builds the per-day return series over the returned rows.
///
/// Rows whose return date does not parse are left out. Days are in ascending
/// order; the cumulative columns are running sums of the per-day columns.
pub fn daily_return_curve<R, D>(rows: &[R], returned_on: D) -> Vec<DailyReturnEntry>
where
    R: TallyRow,
    D: Fn(&R) -> Option<&str>,
{
    let mut days: BTreeMap<String, (u64, BTreeMap<PartyCode, u64>)> = BTreeMap::new();
    let mut skipped = 0usize;

    for row in rows.iter().filter(|r| r.is_returned()) {
        let Some(date) = returned_on(row).and_then(normalize_date) else {
            skipped += 1;
            continue;
        };
        let day = days
            .entry(date.format("%Y-%m-%d").to_string())
            .or_insert_with(|| (0, zeroed_parties()));
        day.0 += 1;
        if let Some(code) = row.party() {
            *day.1.entry(code).or_default() += 1;
        }
    }

    if skipped > 0 {
        debug!("{skipped} returned rows without a parseable return date");
    }

    let mut cumulative = 0u64;
    let mut party_cumulative = zeroed_parties();
    days.into_iter()
        .map(|(date, (count, parties))| {
            cumulative += count;
            for (code, n) in &parties {
                *party_cumulative.entry(*code).or_default() += n;
            }
            DailyReturnEntry {
                date,
                returned_that_day: count,
                cumulative_returned: cumulative,
                per_party_returned_that_day: parties,
                per_party_cumulative: party_cumulative.clone(),
            }
        })
        .collect()
}

fn zeroed_parties() -> BTreeMap<PartyCode, u64> {
    PartyCode::ALL.into_iter().map(|code| (code, 0)).collect()
}
