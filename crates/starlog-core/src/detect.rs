//! Missing-data detection: flag calendar dates whose telemetry volume fell
//! below the expected minimum for their day kind (workday vs. holiday) and
//! year. Weekend/holiday-aware thresholds avoid false positives on naturally
//! quiet days; per-year values track organic traffic growth.

use std::collections::{BTreeMap, BTreeSet};

use chrono::{Datelike, NaiveDate, Weekday};
use tracing::debug;

use crate::calendar;
use crate::error::Error;
use crate::storage::models::ProcessedEntry;

/// First date of the telemetry history window.
pub const DEFAULT_WINDOW_START: NaiveDate = match NaiveDate::from_ymd_opt(2021, 12, 1) {
    Some(d) => d,
    None => panic!("invalid window start"),
};

/// Year-end/new-year `MM-DD` dates treated as holidays in addition to
/// weekends.
pub const YEAR_END_HOLIDAYS: [&str; 13] = [
    "12-24", "12-25", "12-26", "12-27", "12-28", "12-29", "12-30", "12-31",
    "01-01", "01-02", "01-03", "01-04", "01-05",
];

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DayKind {
    Workday,
    Holiday,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DayThresholds {
    pub workday: u64,
    pub holiday: u64,
}

impl DayThresholds {
    fn for_kind(&self, kind: DayKind) -> u64 {
        match kind {
            DayKind::Workday => self.workday,
            DayKind::Holiday => self.holiday,
        }
    }
}

/// Minimum expected daily volume per year. Years beyond the last explicit
/// entry inherit the last entry's thresholds; years before the first entry
/// have no defensible expectation and fail the lookup.
#[derive(Debug, Clone)]
pub struct ThresholdTable {
    years: BTreeMap<i32, DayThresholds>,
}

impl ThresholdTable {
    pub fn new(years: BTreeMap<i32, DayThresholds>) -> Self {
        Self { years }
    }

    /// Values observed over the 2021–2025 history.
    pub fn builtin() -> Self {
        let mut years = BTreeMap::new();
        years.insert(2021, DayThresholds { workday: 0, holiday: 0 });
        years.insert(2022, DayThresholds { workday: 0, holiday: 0 });
        years.insert(2023, DayThresholds { workday: 60, holiday: 20 });
        years.insert(2024, DayThresholds { workday: 80, holiday: 30 });
        years.insert(2025, DayThresholds { workday: 100, holiday: 40 });
        Self { years }
    }

    pub fn lookup(&self, year: i32) -> Result<DayThresholds, Error> {
        self.years
            .range(..=year)
            .next_back()
            .map(|(_, t)| *t)
            .ok_or(Error::ThresholdGap(year))
    }
}

/// Classify a date as workday or holiday.
pub fn day_kind(date: NaiveDate, holidays: &[&str]) -> DayKind {
    let weekend = matches!(date.weekday(), Weekday::Sat | Weekday::Sun);
    if weekend || holidays.contains(&calendar::month_day(date).as_str()) {
        DayKind::Holiday
    } else {
        DayKind::Workday
    }
}

/// Per-calendar-day count of distinct ipHash values. Distinct visitors,
/// not raw entry counts, is what the thresholds were calibrated against.
///
/// The map is dense over the observed span: every date between the first
/// and last entry gets a bin, with 0 for days that logged nothing at all.
/// A total-outage day inside the span is a zero data point to judge, not
/// an absent one; only dates outside the span carry no bin.
pub fn daily_unique_visitors(entries: &[ProcessedEntry]) -> BTreeMap<NaiveDate, u64> {
    let mut per_day: BTreeMap<NaiveDate, BTreeSet<&str>> = BTreeMap::new();
    for entry in entries {
        per_day
            .entry(entry.datetime.date())
            .or_default()
            .insert(entry.ip_hash.as_str());
    }

    let mut counts: BTreeMap<NaiveDate, u64> = per_day
        .iter()
        .map(|(date, hashes)| (*date, hashes.len() as u64))
        .collect();

    if let (Some(first), Some(last)) = (
        per_day.keys().next().copied(),
        per_day.keys().next_back().copied(),
    ) {
        let mut date = first;
        while date < last {
            counts.entry(date).or_insert(0);
            date = match date.succ_opt() {
                Some(next) => next,
                None => break,
            };
        }
    }

    counts
}

/// Flag every date in `[first, last)` whose observed volume fell below the
/// threshold for its day kind and year. Dates with no data point at all are
/// skipped: there is nothing to judge, which is distinct from being flagged.
pub fn detect(
    daily_counts: &BTreeMap<NaiveDate, u64>,
    first: NaiveDate,
    last: NaiveDate,
    thresholds: &ThresholdTable,
    holidays: &[&str],
) -> Result<BTreeSet<NaiveDate>, Error> {
    let mut flagged = BTreeSet::new();

    let mut date = first;
    while date < last {
        if let Some(&count) = daily_counts.get(&date) {
            let kind = day_kind(date, holidays);
            let threshold = thresholds.lookup(date.year())?.for_kind(kind);
            if count < threshold {
                debug!(
                    "Flagging {}: {} < {} ({:?})",
                    date, count, threshold, kind
                );
                flagged.insert(date);
            }
        }
        date = date.succ_opt().ok_or_else(|| {
            Error::Other(format!("date overflow stepping past {}", date))
        })?;
    }

    Ok(flagged)
}
